use crate::hash::decode_hex_array;
use crate::PublicKey;
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Serialize, Serializer};
use std::fmt::{Debug, Display, Formatter};

const SIGNATURE_BYTE_COUNT: usize = 64;
const SECRET_KEY_BYTE_COUNT: usize = 32;

/// An ed25519 signature over the signable payload of one transaction input.
#[derive(Copy, Clone, Hash, Eq, PartialEq)]
pub struct Signature([u8; SIGNATURE_BYTE_COUNT]);

impl Signature {
    pub const fn from_raw(raw_bytes: [u8; SIGNATURE_BYTE_COUNT]) -> Self {
        Self(raw_bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_BYTE_COUNT] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, String> {
        decode_hex_array::<SIGNATURE_BYTE_COUNT>(s, "signature").map(Self::from_raw)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// The signature-verification primitive consulted by the validator.
pub trait SignatureVerifier {
    /// Returns true iff `signature` is a valid signature of `message` under `public_key`.
    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool;
}

/// Verifies ed25519 signatures, rejecting non-canonical encodings and weak keys.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
        match VerifyingKey::from_bytes(public_key.as_bytes()) {
            Ok(key) => {
                let signature = ed25519_dalek::Signature::from_bytes(signature.as_bytes());
                key.verify_strict(message, &signature).is_ok()
            }
            // Bytes that are not a curve point cannot own anything.
            Err(_) => false,
        }
    }
}

/// An ed25519 key pair used to sign transaction inputs.
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    pub fn from_secret_bytes(secret: &[u8; SECRET_KEY_BYTE_COUNT]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(secret),
        }
    }

    pub fn from_secret_hex(s: &str) -> Result<Self, String> {
        decode_hex_array::<SECRET_KEY_BYTE_COUNT>(s, "secret key")
            .map(|secret| Self::from_secret_bytes(&secret))
    }

    pub fn secret_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::from(self.signing_key.verifying_key())
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.signing_key.sign(message).to_bytes())
    }
}
