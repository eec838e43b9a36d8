use crate::{PublicKey, Sha256};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// A label that identifies the transaction.
/// The handler treats it as opaque: it is assigned by whoever builds the transaction, either
/// directly via `Transaction::set_hash` or as a digest of the contents via `Transaction::finalize`.
#[derive(
    Debug, Default, Hash, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Serialize, Deserialize,
)]
pub struct TransactionHash(Sha256);

impl Display for TransactionHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TransactionHash {
    pub const fn new(data: Sha256) -> Self {
        Self(data)
    }
}

/// The index of the output within its transaction, the first one is 0.
#[derive(Debug, Hash, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct OutputIndex(u32);

impl Display for OutputIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OutputIndex {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the index of the output at `position` in a transaction's output list.
    pub fn from_position(position: usize) -> Result<Self, TransactionError> {
        u32::try_from(position)
            .map(Self)
            .map_err(|_| TransactionError::TooManyOutputs(position))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

#[derive(Error, Debug)]
pub enum TransactionError {
    #[error("Input index: {index} is out of range for a transaction with {len} inputs")]
    InputIndexOutOfRange { index: usize, len: usize },
    #[error("Output at position: {0} can't be addressed by an output index")]
    TooManyOutputs(usize),
    #[error("Failed to encode transaction data: {0}")]
    Encoding(#[from] bincode::Error),
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    // A pointer to the transaction containing the UTXO to be spent.
    transaction_hash: TransactionHash,
    output_index: OutputIndex,
    // Proves that the owner of the referenced output authorized this transaction.
    // Empty until the input is signed.
    signature: Vec<u8>,
}

impl Display for TransactionInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.transaction_hash, self.output_index)
    }
}

impl TransactionInput {
    pub fn new(transaction_hash: TransactionHash, output_index: OutputIndex) -> Self {
        Self {
            transaction_hash,
            output_index,
            signature: vec![],
        }
    }

    pub fn transaction_hash(&self) -> &TransactionHash {
        &self.transaction_hash
    }

    pub fn output_index(&self) -> OutputIndex {
        self.output_index
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionOutput {
    // Amount in the smallest unit. Signed so that malformed outputs can be expressed, and
    // rejected by the validator.
    value: i64,
    owner: PublicKey,
}

impl Display for TransactionOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.value, self.owner)
    }
}

impl TransactionOutput {
    pub fn new(value: i64, owner: PublicKey) -> Self {
        Self { value, owner }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn owner(&self) -> &PublicKey {
        &self.owner
    }
}

/// The data covered by an input's signature.
#[derive(Serialize)]
struct SigningPayload<'a> {
    inputs: Vec<(&'a TransactionHash, &'a OutputIndex)>,
    outputs: &'a [TransactionOutput],
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    hash: TransactionHash,
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
}

impl Transaction {
    /// Creates an empty transaction with a zeroed hash.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hash(&self) -> &TransactionHash {
        &self.hash
    }

    pub fn inputs(&self) -> &[TransactionInput] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TransactionOutput] {
        &self.outputs
    }

    pub fn add_input(&mut self, transaction_hash: TransactionHash, output_index: OutputIndex) {
        self.inputs.push(TransactionInput::new(transaction_hash, output_index));
    }

    /// Removes the input at the given position, if it exists.
    pub fn remove_input(&mut self, index: usize) -> Option<TransactionInput> {
        if index < self.inputs.len() {
            Some(self.inputs.remove(index))
        } else {
            None
        }
    }

    pub fn add_output(&mut self, value: i64, owner: PublicKey) {
        self.outputs.push(TransactionOutput::new(value, owner));
    }

    pub fn add_signature(
        &mut self,
        input_index: usize,
        signature: Vec<u8>,
    ) -> Result<(), TransactionError> {
        let len = self.inputs.len();
        match self.inputs.get_mut(input_index) {
            None => Err(TransactionError::InputIndexOutOfRange {
                index: input_index,
                len,
            }),
            Some(input) => {
                input.signature = signature;
                Ok(())
            }
        }
    }

    pub fn set_hash(&mut self, hash: TransactionHash) {
        self.hash = hash;
    }

    /// Sets the hash to the double SHA-256 of the encoded inputs (signatures included) and
    /// outputs.
    /// Must be called after all inputs are signed, since signing doesn't depend on the hash.
    pub fn finalize(&mut self) -> Result<(), TransactionError> {
        let data = bincode::serialize(&(&self.inputs, &self.outputs))?;
        self.hash = TransactionHash::new(Sha256::double_digest(&data));
        Ok(())
    }

    /// Returns the bytes that the input at `input_index` must sign: the coordinates of every
    /// input up to and including `input_index`, followed by all outputs.
    /// Signatures are never part of the message.
    pub fn signing_message(&self, input_index: usize) -> Result<Vec<u8>, TransactionError> {
        if input_index >= self.inputs.len() {
            return Err(TransactionError::InputIndexOutOfRange {
                index: input_index,
                len: self.inputs.len(),
            });
        }
        let payload = SigningPayload {
            inputs: self.inputs[..=input_index]
                .iter()
                .map(|input| (&input.transaction_hash, &input.output_index))
                .collect(),
            outputs: &self.outputs,
        };
        Ok(bincode::serialize(&payload)?)
    }

    /// Returns the signing message of every input, in input order.
    pub fn signing_messages(&self) -> Result<Vec<Vec<u8>>, TransactionError> {
        (0..self.inputs.len())
            .map(|index| self.signing_message(index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signing_message_depends_on_input_position() {
        let transaction = create_transaction();
        let first = transaction.signing_message(0).unwrap();
        let second = transaction.signing_message(1).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn signing_message_ignores_signatures() {
        let mut transaction = create_transaction();
        let before = transaction.signing_message(1).unwrap();
        transaction.add_signature(0, vec![1, 2, 3]).unwrap();
        transaction.add_signature(1, vec![4, 5, 6]).unwrap();
        assert_eq!(transaction.signing_message(1).unwrap(), before);
    }

    #[test]
    fn signing_message_covers_outputs_and_earlier_inputs() {
        let transaction = create_transaction();
        let message = transaction.signing_message(1).unwrap();

        let mut changed_output = create_transaction();
        changed_output.add_output(1, PublicKey::new(vec![9]));
        assert_ne!(changed_output.signing_message(1).unwrap(), message);

        let mut changed_input = Transaction::new();
        changed_input.add_input(origin_hash(), OutputIndex::new(7));
        changed_input.add_input(origin_hash(), OutputIndex::new(1));
        changed_input.add_output(10, PublicKey::new(vec![1]));
        assert_ne!(changed_input.signing_message(1).unwrap(), message);
    }

    #[test]
    fn signing_message_out_of_range_is_an_error() {
        let transaction = create_transaction();
        match transaction.signing_message(2) {
            Err(TransactionError::InputIndexOutOfRange { index, len }) => {
                assert_eq!(index, 2);
                assert_eq!(len, 2);
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn signing_messages_match_each_input() {
        let transaction = create_transaction();
        let messages = transaction.signing_messages().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], transaction.signing_message(0).unwrap());
        assert_eq!(messages[1], transaction.signing_message(1).unwrap());
        assert!(Transaction::new().signing_messages().unwrap().is_empty());
    }

    #[test]
    fn output_index_from_position() {
        assert_eq!(OutputIndex::from_position(0).unwrap(), OutputIndex::new(0));
        assert_eq!(
            OutputIndex::from_position(u32::MAX as usize).unwrap(),
            OutputIndex::new(u32::MAX)
        );
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn output_position_beyond_u32_is_an_error() {
        let position = u32::MAX as usize + 1;
        match OutputIndex::from_position(position) {
            Err(TransactionError::TooManyOutputs(reported)) => assert_eq!(reported, position),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn add_signature_out_of_range_is_an_error() {
        let mut transaction = create_transaction();
        assert!(transaction.add_signature(5, vec![1]).is_err());
    }

    #[test]
    fn finalize_hashes_contents() {
        let mut first = create_transaction();
        let mut second = create_transaction();
        first.finalize().unwrap();
        second.finalize().unwrap();
        assert_eq!(first.hash(), second.hash());
        assert_ne!(*first.hash(), TransactionHash::default());

        second.add_signature(0, vec![1]).unwrap();
        second.finalize().unwrap();
        assert_ne!(first.hash(), second.hash());
    }

    #[test]
    fn remove_input() {
        let mut transaction = create_transaction();
        let removed = transaction.remove_input(0).unwrap();
        assert_eq!(removed.output_index(), OutputIndex::new(0));
        assert_eq!(transaction.inputs().len(), 1);
        assert!(transaction.remove_input(1).is_none());
    }

    fn origin_hash() -> TransactionHash {
        TransactionHash::new(Sha256::digest(b"origin"))
    }

    fn create_transaction() -> Transaction {
        let mut transaction = Transaction::new();
        transaction.add_input(origin_hash(), OutputIndex::new(0));
        transaction.add_input(origin_hash(), OutputIndex::new(1));
        transaction.add_output(10, PublicKey::new(vec![1]));
        transaction
    }
}
