use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use txhandler_lib::commands::KeyPair;
use txhandler_lib::{
    OutputIndex, Sha256, SignatureScheme, Transaction, TransactionHash, TransactionOutput,
    TxHandler, Utxo, UtxoPool, Verifier,
};

const VALUE: i64 = 1_000;

fn genesis_hash() -> TransactionHash {
    TransactionHash::new(Sha256::digest(b"genesis"))
}

fn create_pool(key_pair: &KeyPair) -> UtxoPool {
    let mut pool = UtxoPool::new();
    pool.add(
        Utxo::new(genesis_hash(), OutputIndex::new(0)),
        TransactionOutput::new(VALUE, key_pair.public_key()),
    );
    pool
}

/// Creates a chain in which every transaction spends the only output of the previous one.
/// The chain is returned in reverse, so the handler accepts exactly one transaction per pass,
/// and each pass has to skip over all transactions that are still waiting for their parent.
fn create_reversed_chain(key_pair: &KeyPair, length: usize) -> Vec<Transaction> {
    let mut chain = Vec::with_capacity(length);
    let mut parent = genesis_hash();
    for _ in 0..length {
        let mut transaction = Transaction::new();
        transaction.add_input(parent, OutputIndex::new(0));
        transaction.add_output(VALUE, key_pair.public_key());
        let message = transaction.signing_message(0).unwrap();
        transaction
            .add_signature(0, key_pair.sign(&message))
            .unwrap();
        transaction.finalize().unwrap();
        parent = *transaction.hash();
        chain.push(transaction);
    }
    chain.reverse();
    chain
}

fn handle_txs_benchmark(c: &mut Criterion) {
    let key_pair = KeyPair::from_seed(SignatureScheme::Ed25519, "benchmark");
    let pool = create_pool(&key_pair);

    let mut group = c.benchmark_group("handle_txs");
    for length in [10, 50, 100].iter() {
        let chain = create_reversed_chain(&key_pair, *length);
        group.throughput(Throughput::Elements(*length as u64));
        group.bench_with_input(
            BenchmarkId::new("reversed chain", length),
            &chain,
            |b, chain| {
                b.iter(|| {
                    let mut handler =
                        TxHandler::new(&pool, Verifier::new(SignatureScheme::Ed25519));
                    let accepted = handler.handle_txs(black_box(chain.clone())).unwrap();
                    assert_eq!(accepted.len(), chain.len());
                    black_box(accepted);
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, handle_txs_benchmark);

criterion_main!(benches);
