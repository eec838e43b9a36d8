use crate::commands::KeyPair;
use crate::{
    OutputIndex, SignatureScheme, Transaction, TransactionHash, TxHandler, Utxo, UtxoPool,
    Verifier,
};
use clap::{App, Arg, ArgMatches};
use std::error::Error;

struct DemoCliOptions {
    scheme: SignatureScheme,
    seed: String,
    num_outputs: u32,
    value: i64,
}

impl DemoCliOptions {
    pub fn parse(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let num_outputs = matches.value_of_t::<u32>("outputs")?;
        if num_outputs == 0 {
            return Err("The genesis transaction needs at least one output.".into());
        }
        Ok(Self {
            scheme: matches.value_of_t::<SignatureScheme>("scheme")?,
            seed: matches.value_of("seed").unwrap_or("txhandler").to_string(),
            num_outputs,
            value: matches.value_of_t::<i64>("value")?,
        })
    }
}

pub fn demo_command() -> App<'static> {
    App::new("demo")
        .version("0.1")
        .about("Builds a UTXO pool and a batch of signed transactions, and runs the handler on it.")
        .arg(
            Arg::new("scheme")
                .long("scheme")
                .value_name("SCHEME")
                .help("Signature scheme used by the output owners.")
                .takes_value(true)
                .possible_values(SignatureScheme::ALL)
                .default_value("ed25519"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("TEXT")
                .help("Seed from which the owner's key pair is derived.")
                .takes_value(true)
                .default_value("txhandler"),
        )
        .arg(
            Arg::new("outputs")
                .short('n')
                .long("outputs")
                .value_name("COUNT")
                .help("Number of outputs in the genesis transaction.")
                .takes_value(true)
                .default_value("5"),
        )
        .arg(
            Arg::new("value")
                .long("value")
                .value_name("AMOUNT")
                .help("Value of each genesis output.")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("100"),
        )
}

pub fn run_demo_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let options = DemoCliOptions::parse(matches)?;
    let key_pair = KeyPair::from_seed(options.scheme, &options.seed);

    // Create the pool of previous transaction outputs.
    let mut genesis = Transaction::new();
    for _ in 0..options.num_outputs {
        genesis.add_output(options.value, key_pair.public_key());
    }
    genesis.finalize()?;
    let mut pool = UtxoPool::new();
    for (position, output) in genesis.outputs().iter().enumerate() {
        pool.add(
            Utxo::new(*genesis.hash(), OutputIndex::from_position(position)?),
            output.clone(),
        );
    }
    println!(
        "Genesis transaction: {} with {} outputs of {}",
        genesis.hash(),
        options.num_outputs,
        options.value
    );

    // Spend all genesis outputs at once.
    let large_value = options
        .value
        .checked_mul(3)
        .ok_or("Output value is too large.")?;
    let spend_all = create_transaction(
        genesis.hash(),
        &(0..options.num_outputs).collect::<Vec<u32>>(),
        &[options.value, large_value],
        &key_pair,
    )?;

    let mut handler = TxHandler::new(&pool, Verifier::new(options.scheme));
    let validity = handler.validate(&spend_all)?;
    if validity.is_valid() {
        println!("Transaction: {} is valid", spend_all.hash());
    } else {
        println!("Transaction: {} is invalid", spend_all.hash());
        for rule in validity.failed_rules() {
            println!("  violates: {}", rule);
        }
    }

    let accepted = handler.handle_txs(vec![spend_all])?;
    print_accepted(&accepted);
    println!("UTXO pool after the batch:");
    print_pool(handler.pool());

    // Two transactions spending the same output: whichever comes first wins.
    let first = create_transaction(genesis.hash(), &[0], &[options.value], &key_pair)?;
    let second = create_transaction(genesis.hash(), &[0], &[0], &key_pair)?;
    for batch in [
        vec![first.clone(), second.clone()],
        vec![second.clone(), first.clone()],
    ]
    .iter()
    {
        let mut handler = TxHandler::new(&pool, Verifier::new(options.scheme));
        println!(
            "Double spend batch: [{}]",
            batch
                .iter()
                .map(|transaction| transaction.hash().to_string())
                .collect::<Vec<String>>()
                .join(", ")
        );
        print_accepted(&handler.handle_txs(batch.clone())?);
    }
    Ok(())
}

/// Builds a transaction that spends the given outputs of the origin transaction, signs every
/// input, and sets the hash from the contents.
fn create_transaction(
    origin: &TransactionHash,
    output_indices: &[u32],
    values: &[i64],
    key_pair: &KeyPair,
) -> Result<Transaction, Box<dyn Error>> {
    let mut transaction = Transaction::new();
    for value in values {
        transaction.add_output(*value, key_pair.public_key());
    }
    for index in output_indices {
        transaction.add_input(*origin, OutputIndex::new(*index));
    }
    for index in 0..transaction.inputs().len() {
        let message = transaction.signing_message(index)?;
        transaction.add_signature(index, key_pair.sign(&message))?;
    }
    transaction.finalize()?;
    Ok(transaction)
}

fn print_accepted(accepted: &[Transaction]) {
    println!("Accepted {} transaction(s):", accepted.len());
    for transaction in accepted {
        println!("  {}", transaction.hash());
    }
}

fn print_pool(pool: &UtxoPool) {
    for utxo in pool.all_utxos() {
        if let Some(output) = pool.get(&utxo) {
            println!("  {} = {}", utxo, output);
        }
    }
}
