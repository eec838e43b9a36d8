use crate::{OutputIndex, TransactionHash, TransactionInput};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Identifies exactly one output of one transaction.
#[derive(Debug, Hash, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct Utxo {
    transaction_hash: TransactionHash,
    output_index: OutputIndex,
}

impl Utxo {
    pub fn new(transaction_hash: TransactionHash, output_index: OutputIndex) -> Self {
        Self {
            transaction_hash,
            output_index,
        }
    }

    pub fn transaction_hash(&self) -> &TransactionHash {
        &self.transaction_hash
    }

    pub fn output_index(&self) -> OutputIndex {
        self.output_index
    }
}

impl From<&TransactionInput> for Utxo {
    fn from(input: &TransactionInput) -> Self {
        Self::new(*input.transaction_hash(), input.output_index())
    }
}

impl Display for Utxo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.transaction_hash, self.output_index)
    }
}
