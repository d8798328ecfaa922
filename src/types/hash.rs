//! 160-bit script hash used for contracts and accounts.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Address version byte for NEO 2.x mainnet and testnet.
pub const ADDRESS_VERSION: u8 = 0x17;

/// Errors produced when parsing a [`UInt160`] from text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HashParseError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("expected 20 bytes, got {0}")]
    Length(usize),
    #[error("invalid base58check address: {0}")]
    Address(String),
    #[error("unexpected address version 0x{0:02x}")]
    Version(u8),
}

/// A 20-byte script hash.
///
/// Stored in little-endian order, which is the order the VM expects inside
/// scripts. The textual form is big-endian hex with a `0x` prefix, matching
/// what the node prints.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct UInt160([u8; 20]);

impl UInt160 {
    pub const LEN: usize = 20;

    /// Build from little-endian bytes.
    pub fn from_le_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Build from a little-endian byte slice of exactly 20 bytes.
    pub fn from_le_slice(bytes: &[u8]) -> Result<Self, HashParseError> {
        let arr: [u8; 20] = bytes
            .try_into()
            .map_err(|_| HashParseError::Length(bytes.len()))?;
        Ok(Self(arr))
    }

    /// Little-endian view, as pushed into invocation scripts.
    pub fn as_le_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Big-endian hex without prefix.
    pub fn to_hex_be(&self) -> String {
        let mut be = self.0;
        be.reverse();
        hex::encode(be)
    }

    /// Decode a NEO 2.x address (`A...`) into its script hash.
    pub fn from_address(address: &str) -> Result<Self, HashParseError> {
        let decoded = bs58::decode(address)
            .with_check(None)
            .into_vec()
            .map_err(|e| HashParseError::Address(e.to_string()))?;
        match decoded.split_first() {
            Some((&ADDRESS_VERSION, hash)) => Self::from_le_slice(hash),
            Some((&version, _)) => Err(HashParseError::Version(version)),
            None => Err(HashParseError::Length(0)),
        }
    }

    /// Encode as a NEO 2.x base58check address.
    pub fn to_address(&self) -> String {
        let mut payload = Vec::with_capacity(1 + Self::LEN);
        payload.push(ADDRESS_VERSION);
        payload.extend_from_slice(&self.0);
        bs58::encode(payload).with_check().into_string()
    }
}

impl FromStr for UInt160 {
    type Err = HashParseError;

    /// Parses big-endian hex, with or without a `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let mut bytes = hex::decode(trimmed)?;
        if bytes.len() != Self::LEN {
            return Err(HashParseError::Length(bytes.len()));
        }
        bytes.reverse();
        Self::from_le_slice(&bytes)
    }
}

impl fmt::Display for UInt160 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex_be())
    }
}

impl fmt::Debug for UInt160 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UInt160({self})")
    }
}

impl Serialize for UInt160 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for UInt160 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
