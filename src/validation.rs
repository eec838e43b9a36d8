use crate::{SignatureVerifier, Transaction, TransactionError, Utxo, UtxoPool};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

/// A single condition that a transaction must satisfy to be accepted.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Rule {
    ClaimedOutputsExist,
    SignaturesValid,
    NoOutputClaimedTwice,
    OutputValuesNonNegative,
    InputsCoverOutputs,
}

impl Rule {
    pub const ALL: [Rule; 5] = [
        Rule::ClaimedOutputsExist,
        Rule::SignaturesValid,
        Rule::NoOutputClaimedTwice,
        Rule::OutputValuesNonNegative,
        Rule::InputsCoverOutputs,
    ];
}

impl Display for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let description = match self {
            Rule::ClaimedOutputsExist => "all claimed outputs are in the UTXO pool",
            Rule::SignaturesValid => "all input signatures are valid",
            Rule::NoOutputClaimedTwice => "no UTXO is claimed more than once",
            Rule::OutputValuesNonNegative => "all output values are non-negative",
            Rule::InputsCoverOutputs => "input values cover output values",
        };
        write!(f, "{}", description)
    }
}

/// The outcome of every rule for one transaction against one pool.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Validity {
    failed_rules: Vec<Rule>,
}

impl Validity {
    pub fn is_valid(&self) -> bool {
        self.failed_rules.is_empty()
    }

    pub fn failed_rules(&self) -> &[Rule] {
        &self.failed_rules
    }

    pub fn passed(&self, rule: Rule) -> bool {
        !self.failed_rules.contains(&rule)
    }
}

// Responsible for checking whether a transaction may be applied to the UTXO pool.
// Each rule is evaluated independently of the others, so a report lists every violated rule.
pub struct TransactionValidator {}

impl TransactionValidator {
    /// An error is returned only if the transaction data can't be encoded into signing messages.
    pub fn validate<V: SignatureVerifier>(
        transaction: &Transaction,
        pool: &UtxoPool,
        verifier: &V,
    ) -> Result<Validity, TransactionError> {
        let messages = transaction.signing_messages()?;
        Ok(Self::validate_with_messages(transaction, &messages, pool, verifier))
    }

    /// Preconditions:
    ///   - `messages` holds the signing message of every input, as returned by
    ///     `Transaction::signing_messages`.
    pub fn validate_with_messages<V: SignatureVerifier>(
        transaction: &Transaction,
        messages: &[Vec<u8>],
        pool: &UtxoPool,
        verifier: &V,
    ) -> Validity {
        let outcomes = [
            (
                Rule::ClaimedOutputsExist,
                Self::validate_claimed_outputs_exist(transaction, pool),
            ),
            (
                Rule::SignaturesValid,
                Self::validate_signatures(transaction, messages, pool, verifier),
            ),
            (
                Rule::NoOutputClaimedTwice,
                Self::validate_no_output_claimed_twice(transaction),
            ),
            (
                Rule::OutputValuesNonNegative,
                Self::validate_output_values_non_negative(transaction),
            ),
            (
                Rule::InputsCoverOutputs,
                Self::validate_inputs_cover_outputs(transaction, pool),
            ),
        ];
        let failed_rules = outcomes
            .iter()
            .filter(|(_, passed)| !*passed)
            .map(|(rule, _)| *rule)
            .collect();
        Validity { failed_rules }
    }

    pub fn validate_claimed_outputs_exist(transaction: &Transaction, pool: &UtxoPool) -> bool {
        transaction
            .inputs()
            .iter()
            .all(|input| pool.contains(&Utxo::from(input)))
    }

    /// Inputs whose UTXO is missing from the pool are skipped, since there is no owner to verify
    /// against. Those inputs are reported by `validate_claimed_outputs_exist`.
    ///
    /// Preconditions:
    ///   - `messages[i]` is the signing message of input `i`.
    pub fn validate_signatures<V: SignatureVerifier>(
        transaction: &Transaction,
        messages: &[Vec<u8>],
        pool: &UtxoPool,
        verifier: &V,
    ) -> bool {
        transaction
            .inputs()
            .iter()
            .zip(messages)
            .all(|(input, message)| match pool.get(&Utxo::from(input)) {
                None => true,
                Some(output) => verifier.verify(output.owner(), message, input.signature()),
            })
    }

    pub fn validate_no_output_claimed_twice(transaction: &Transaction) -> bool {
        let mut claimed = HashSet::new();
        transaction
            .inputs()
            .iter()
            .all(|input| claimed.insert(Utxo::from(input)))
    }

    pub fn validate_output_values_non_negative(transaction: &Transaction) -> bool {
        transaction
            .outputs()
            .iter()
            .all(|output| output.value() >= 0)
    }

    /// Sums are computed in 128 bits so that no combination of 64-bit values can overflow.
    /// Missing UTXOs contribute nothing to the input sum.
    pub fn validate_inputs_cover_outputs(transaction: &Transaction, pool: &UtxoPool) -> bool {
        let input_sum = transaction
            .inputs()
            .iter()
            .filter_map(|input| pool.get(&Utxo::from(input)))
            .map(|output| output.value() as i128)
            .sum::<i128>();
        let output_sum = transaction
            .outputs()
            .iter()
            .map(|output| output.value() as i128)
            .sum::<i128>();
        input_sum >= output_sum
    }
}
