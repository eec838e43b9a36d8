use crate::{TransactionOutput, Utxo};
use std::collections::HashMap;

/// A pool of confirmed and unspent transaction outputs.
/// Cloning the pool copies every entry, so the clone and the original evolve independently.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct UtxoPool {
    // Unspent transaction outputs, indexed by their transaction hash and their index in the
    // transaction.
    utxos: HashMap<Utxo, TransactionOutput>,
}

impl UtxoPool {
    pub fn new() -> Self {
        Self {
            utxos: HashMap::new(),
        }
    }

    /// Adds the output to the pool, replacing the output previously stored under the same UTXO.
    pub fn add(&mut self, utxo: Utxo, output: TransactionOutput) {
        self.utxos.insert(utxo, output);
    }

    /// Removes the UTXO from the pool. Removing a UTXO that isn't in the pool has no effect.
    pub fn remove(&mut self, utxo: &Utxo) {
        self.utxos.remove(utxo);
    }

    pub fn contains(&self, utxo: &Utxo) -> bool {
        self.utxos.contains_key(utxo)
    }

    pub fn get(&self, utxo: &Utxo) -> Option<&TransactionOutput> {
        self.utxos.get(utxo)
    }

    /// Returns all UTXOs in the pool, ordered by transaction hash and output index.
    pub fn all_utxos(&self) -> Vec<Utxo> {
        let mut utxos = self.utxos.keys().copied().collect::<Vec<Utxo>>();
        utxos.sort();
        utxos
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Utxo, &TransactionOutput)> {
        self.utxos.iter()
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }
}
