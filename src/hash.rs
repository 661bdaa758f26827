use serde::{Deserialize, Serialize};
use sha2::Digest;
use std::fmt::{Display, Formatter};

const SHA256_BYTE_COUNT: usize = 32;

/// Sha-256 is a 256-bit array or 32 bytes.
/// It provides an API to display as hex-encoded string and parse it from a hex-encoded string.
#[derive(Copy, Clone, Debug, Hash, Ord, PartialOrd, Eq, PartialEq, Serialize, Deserialize)]
pub struct Sha256([u8; SHA256_BYTE_COUNT]);

impl Sha256 {
    pub const fn from_raw(raw_bytes: [u8; SHA256_BYTE_COUNT]) -> Self {
        Self(raw_bytes)
    }

    pub fn digest(data: &[u8]) -> Self {
        let mut hasher = sha2::Sha256::new();
        hasher.update(data);
        let mut output = [0; SHA256_BYTE_COUNT];
        output.copy_from_slice(&hasher.finalize());
        Sha256::from_raw(output)
    }

    /// Hashes the data twice, the way transaction identifiers are derived.
    pub fn double_digest(data: &[u8]) -> Self {
        let first_hash = Self::digest(data);
        Self::digest(first_hash.as_slice())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0[..]
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.as_slice())
    }

    pub fn from_hex(s: &str) -> Result<Self, String> {
        decode_hex_array::<SHA256_BYTE_COUNT>(s, "SHA-256").map(Sha256::from_raw)
    }
}

impl Display for Sha256 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Decodes a hex string into a fixed-size byte array.
/// `what` names the decoded value in the error message.
pub(crate) fn decode_hex_array<const N: usize>(s: &str, what: &str) -> Result<[u8; N], String> {
    let bytes = hex::decode(s).map_err(|e| format!("Invalid {} hex: {}: {}", what, s, e))?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        format!(
            "Invalid {} length. Expected: {} but got: {} in: {}",
            what, N, len, s
        )
    })
}
