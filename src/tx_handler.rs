use crate::{
    OutputIndex, SignatureVerifier, Transaction, TransactionError, TransactionOutput,
    TransactionValidator, Utxo, UtxoPool, Validity,
};
use log::{debug, info};

/// The public ledger: a private copy of the UTXO pool and the rules for changing it.
///
/// The handler accepts transactions in batches. Accepted transactions consume the UTXOs their
/// inputs claim and create one UTXO per output, so later transactions in the same batch may
/// spend them.
pub struct TxHandler<V> {
    pool: UtxoPool,
    verifier: V,
}

impl<V: SignatureVerifier> TxHandler<V> {
    /// Creates a handler whose ledger starts as a copy of `pool`.
    /// Later changes to `pool` are not visible to the handler, and vice versa.
    pub fn new(pool: &UtxoPool, verifier: V) -> Self {
        Self {
            pool: pool.clone(),
            verifier,
        }
    }

    pub fn pool(&self) -> &UtxoPool {
        &self.pool
    }

    /// Evaluates every validity rule against the current pool.
    pub fn validate(&self, transaction: &Transaction) -> Result<Validity, TransactionError> {
        TransactionValidator::validate(transaction, &self.pool, &self.verifier)
    }

    /// Returns whether:
    ///   - all outputs claimed by the transaction are in the current UTXO pool,
    ///   - the signature on each input is valid,
    ///   - no UTXO is claimed more than once,
    ///   - all output values are non-negative, and
    ///   - the sum of input values is greater than or equal to the sum of output values.
    ///
    /// An error is returned only if the transaction data can't be encoded for verification.
    pub fn is_valid_tx(&self, transaction: &Transaction) -> Result<bool, TransactionError> {
        let messages = transaction.signing_messages()?;
        Ok(self.check(transaction, &messages))
    }

    /// Handles one epoch: repeatedly accepts the first candidate that is valid against the
    /// current pool, until a full pass accepts nothing.
    /// Returns the accepted transactions in the order they were applied.
    ///
    /// The selection is greedy, so when two candidates spend the same UTXO, the one that comes
    /// first wins, even if accepting the other would let more transactions through.
    ///
    /// Every candidate is prepared before the pool is touched, so on error nothing has been
    /// applied.
    pub fn handle_txs(
        &mut self,
        candidates: Vec<Transaction>,
    ) -> Result<Vec<Transaction>, TransactionError> {
        let num_candidates = candidates.len();
        // Undecided candidates; a slot becomes None once its transaction is accepted.
        let mut pending = candidates
            .into_iter()
            .map(|transaction| Candidate::prepare(transaction).map(Some))
            .collect::<Result<Vec<_>, _>>()?;
        let mut accepted = vec![];

        // Each acceptance restarts the scan from the first undecided candidate.
        while let Some(index) = self.find_first_valid(&pending) {
            if let Some(candidate) = pending[index].take() {
                self.apply_accepted(&candidate);
                debug!("Accepted transaction: {}", candidate.transaction.hash());
                accepted.push(candidate.transaction);
            }
        }

        info!(
            "Accepted {} out of {} transactions, UTXO pool size: {}",
            accepted.len(),
            num_candidates,
            self.pool.len()
        );
        Ok(accepted)
    }

    fn check(&self, transaction: &Transaction, messages: &[Vec<u8>]) -> bool {
        let validity = TransactionValidator::validate_with_messages(
            transaction,
            messages,
            &self.pool,
            &self.verifier,
        );
        for rule in validity.failed_rules() {
            debug!("Transaction: {} violates rule: {}", transaction.hash(), rule);
        }
        validity.is_valid()
    }

    fn find_first_valid(&self, pending: &[Option<Candidate>]) -> Option<usize> {
        pending.iter().position(|slot| match slot {
            Some(candidate) => self.check(&candidate.transaction, &candidate.signing_messages),
            None => false,
        })
    }

    /// Consumes the claimed UTXOs and adds the transaction outputs to the pool.
    ///
    /// Preconditions:
    ///   - The transaction is valid against the current pool.
    fn apply_accepted(&mut self, candidate: &Candidate) {
        for input in candidate.transaction.inputs() {
            self.pool.remove(&Utxo::from(input));
        }
        for (utxo, output) in &candidate.created {
            self.pool.add(*utxo, output.clone());
        }
    }
}

/// A transaction together with everything derived from it that can fail to compute.
struct Candidate {
    transaction: Transaction,
    signing_messages: Vec<Vec<u8>>,
    // The UTXOs that accepting the transaction creates, one per output.
    created: Vec<(Utxo, TransactionOutput)>,
}

impl Candidate {
    fn prepare(transaction: Transaction) -> Result<Self, TransactionError> {
        let signing_messages = transaction.signing_messages()?;
        let created = transaction
            .outputs()
            .iter()
            .enumerate()
            .map(|(position, output)| {
                OutputIndex::from_position(position)
                    .map(|index| (Utxo::new(*transaction.hash(), index), output.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            transaction,
            signing_messages,
            created,
        })
    }
}
