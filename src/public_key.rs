use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The identity that owns a transaction output.
/// It holds the encoded public key of whichever signature scheme the handler is configured with,
/// so its bytes are only interpreted by a `SignatureVerifier`.
#[derive(Debug, Clone, Hash, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd)]
pub struct PublicKey(Vec<u8>);

impl PublicKey {
    pub fn new(public_key: Vec<u8>) -> Self {
        Self(public_key)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0[..]
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}
