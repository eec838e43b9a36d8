use crate::{PublicKey, Sha256};
use ed25519_dalek::Verifier as _;
use std::convert::TryInto;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Checks that a signature over a message was produced by the owner of a public key.
///
/// Implementations must return false for keys or signatures that can't be decoded, rather than
/// panicking, because both come from untrusted transactions.
pub trait SignatureVerifier {
    fn verify(&self, owner: &PublicKey, message: &[u8], signature: &[u8]) -> bool;
}

impl<T: SignatureVerifier + ?Sized> SignatureVerifier for &T {
    fn verify(&self, owner: &PublicKey, message: &[u8], signature: &[u8]) -> bool {
        (**self).verify(owner, message, signature)
    }
}

/// Ed25519 signatures over the raw message.
/// Public keys are 32 bytes and signatures are 64 bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, owner: &PublicKey, message: &[u8], signature: &[u8]) -> bool {
        let key_bytes: [u8; 32] = match owner.as_slice().try_into() {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };
        let verifying_key = match ed25519_dalek::VerifyingKey::from_bytes(&key_bytes) {
            Ok(key) => key,
            Err(_) => return false,
        };
        let signature = match ed25519_dalek::Signature::from_slice(signature) {
            Ok(signature) => signature,
            Err(_) => return false,
        };
        verifying_key.verify(message, &signature).is_ok()
    }
}

/// ECDSA over secp256k1.
/// The message is hashed with SHA-256 before verification, public keys are SEC1-encoded
/// (compressed or uncompressed) and signatures use the 64-byte compact encoding.
pub struct Secp256k1Verifier {
    secp: secp256k1::Secp256k1<secp256k1::VerifyOnly>,
}

impl Secp256k1Verifier {
    pub fn new() -> Self {
        Self {
            secp: secp256k1::Secp256k1::verification_only(),
        }
    }
}

impl Default for Secp256k1Verifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SignatureVerifier for Secp256k1Verifier {
    fn verify(&self, owner: &PublicKey, message: &[u8], signature: &[u8]) -> bool {
        let public_key = match secp256k1::PublicKey::from_slice(owner.as_slice()) {
            Ok(key) => key,
            Err(_) => return false,
        };
        let signature = match secp256k1::ecdsa::Signature::from_compact(signature) {
            Ok(signature) => signature,
            Err(_) => return false,
        };
        let digest = secp256k1::Message::from_digest(Sha256::digest(message).to_raw());
        self.secp
            .verify_ecdsa(&digest, &signature, &public_key)
            .is_ok()
    }
}

/// The signature scheme that output owners are expected to sign with.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SignatureScheme {
    Ed25519,
    Secp256k1,
}

impl SignatureScheme {
    pub const ALL: [&'static str; 2] = ["ed25519", "secp256k1"];
}

impl Display for SignatureScheme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SignatureScheme::Ed25519 => write!(f, "ed25519"),
            SignatureScheme::Secp256k1 => write!(f, "secp256k1"),
        }
    }
}

impl FromStr for SignatureScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ed25519" => Ok(SignatureScheme::Ed25519),
            "secp256k1" => Ok(SignatureScheme::Secp256k1),
            _ => Err(format!(
                "Unknown signature scheme: {}. Expected one of: {}",
                s,
                Self::ALL.join(", ")
            )),
        }
    }
}

/// A verifier selected at runtime from a `SignatureScheme`.
pub enum Verifier {
    Ed25519(Ed25519Verifier),
    Secp256k1(Secp256k1Verifier),
}

impl Verifier {
    pub fn new(scheme: SignatureScheme) -> Self {
        match scheme {
            SignatureScheme::Ed25519 => Verifier::Ed25519(Ed25519Verifier),
            SignatureScheme::Secp256k1 => Verifier::Secp256k1(Secp256k1Verifier::new()),
        }
    }

    pub fn scheme(&self) -> SignatureScheme {
        match self {
            Verifier::Ed25519(_) => SignatureScheme::Ed25519,
            Verifier::Secp256k1(_) => SignatureScheme::Secp256k1,
        }
    }
}

impl SignatureVerifier for Verifier {
    fn verify(&self, owner: &PublicKey, message: &[u8], signature: &[u8]) -> bool {
        match self {
            Verifier::Ed25519(verifier) => verifier.verify(owner, message, signature),
            Verifier::Secp256k1(verifier) => verifier.verify(owner, message, signature),
        }
    }
}
