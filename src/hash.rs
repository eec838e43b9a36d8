use serde::{Deserialize, Serialize};
use sha2::Digest;
use std::fmt::{Display, Formatter};

const SHA256_BYTE_COUNT: usize = 32;

/// Sha-256 is a 256-bit array or 32 bytes.
/// It provides an API to display as hex-encoded string and parse it from a hex-encoded string.
#[derive(
    Copy, Clone, Debug, Default, Hash, Ord, PartialOrd, Eq, PartialEq, Serialize, Deserialize,
)]
pub struct Sha256([u8; SHA256_BYTE_COUNT]);

impl Sha256 {
    pub const fn from_raw(raw_bytes: [u8; SHA256_BYTE_COUNT]) -> Self {
        Self(raw_bytes)
    }

    pub fn digest(data: &[u8]) -> Self {
        let result = sha2::Sha256::digest(data);
        let mut output = [0; SHA256_BYTE_COUNT];
        output.copy_from_slice(result.as_slice());
        Sha256::from_raw(output)
    }

    /// Hashes the data twice, the way transaction contents are committed to.
    pub fn double_digest(data: &[u8]) -> Self {
        let first_hash = Self::digest(data);
        Self::digest(first_hash.as_slice())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0[..]
    }

    pub fn to_raw(&self) -> [u8; SHA256_BYTE_COUNT] {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.as_slice())
    }

    pub fn from_hex(s: &str) -> Result<Self, String> {
        match hex::decode(&s) {
            Ok(bytes) => {
                if bytes.len() == SHA256_BYTE_COUNT {
                    let mut sha = [0; SHA256_BYTE_COUNT];
                    sha.copy_from_slice(&bytes);
                    Ok(Sha256::from_raw(sha))
                } else {
                    Err(format!(
                        "Invalid SHA-256 length. Expected: {} but got: {} in: {}",
                        SHA256_BYTE_COUNT,
                        bytes.len(),
                        s
                    ))
                }
            }
            Err(e) => Err(e.to_string()),
        }
    }
}

impl Display for Sha256 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
