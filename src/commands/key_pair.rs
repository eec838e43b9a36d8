use crate::{PublicKey, Sha256, SignatureScheme};
use ed25519_dalek::Signer;

/// A signing key for one of the supported signature schemes.
/// Keys are derived deterministically from a seed, which is only suitable for demos and tests.
pub enum KeyPair {
    Ed25519(ed25519_dalek::SigningKey),
    Secp256k1(secp256k1::SecretKey),
}

impl KeyPair {
    pub fn from_seed(scheme: SignatureScheme, seed: &str) -> Self {
        let mut raw = Sha256::digest(seed.as_bytes()).to_raw();
        match scheme {
            SignatureScheme::Ed25519 => {
                KeyPair::Ed25519(ed25519_dalek::SigningKey::from_bytes(&raw))
            }
            SignatureScheme::Secp256k1 => loop {
                // A hash is a valid secret key unless it's zero or not below the curve order,
                // in which case we hash again.
                match secp256k1::SecretKey::from_slice(&raw) {
                    Ok(secret_key) => break KeyPair::Secp256k1(secret_key),
                    Err(_) => raw = Sha256::digest(&raw).to_raw(),
                }
            },
        }
    }

    pub fn scheme(&self) -> SignatureScheme {
        match self {
            KeyPair::Ed25519(_) => SignatureScheme::Ed25519,
            KeyPair::Secp256k1(_) => SignatureScheme::Secp256k1,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        match self {
            KeyPair::Ed25519(signing_key) => {
                PublicKey::new(signing_key.verifying_key().to_bytes().to_vec())
            }
            KeyPair::Secp256k1(secret_key) => {
                let secp = secp256k1::Secp256k1::signing_only();
                let public_key = secp256k1::PublicKey::from_secret_key(&secp, secret_key);
                PublicKey::new(public_key.serialize().to_vec())
            }
        }
    }

    /// Signs the message in the format the matching `SignatureVerifier` expects.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        match self {
            KeyPair::Ed25519(signing_key) => signing_key.sign(message).to_bytes().to_vec(),
            KeyPair::Secp256k1(secret_key) => {
                let secp = secp256k1::Secp256k1::signing_only();
                let digest = secp256k1::Message::from_digest(Sha256::digest(message).to_raw());
                secp.sign_ecdsa(&digest, secret_key)
                    .serialize_compact()
                    .to_vec()
            }
        }
    }
}
