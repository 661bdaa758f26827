use crate::hash::decode_hex_array;
use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

const PUBLIC_KEY_BYTE_COUNT: usize = 32;

/// The ed25519 public key that owns a transaction output.
///
/// Only the raw key bytes are stored. Whether they decode to a valid curve point is decided
/// when a signature is verified against them.
#[derive(Debug, Copy, Clone, Hash, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd)]
pub struct PublicKey([u8; PUBLIC_KEY_BYTE_COUNT]);

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_BYTE_COUNT] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, String> {
        decode_hex_array::<PUBLIC_KEY_BYTE_COUNT>(s, "public key").map(Self)
    }
}

impl From<VerifyingKey> for PublicKey {
    fn from(key: VerifyingKey) -> Self {
        Self(key.to_bytes())
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
