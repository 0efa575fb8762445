//! Content keys and their storage-key encoding.

use core::{fmt, str::FromStr};

use alloy_primitives::{B256, hex, keccak256};

/// Size of a [`Key`] in bytes.
pub const KEY_SIZE: usize = 32;

/// Prefix for keys under which block data is persisted.
const BLOCKS_PREFIX: &str = "/blocks/";

/// Errors from parsing or decoding a [`Key`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    /// Raw bytes had the wrong length.
    #[error("key must be exactly {KEY_SIZE} bytes, got {0}")]
    InvalidLength(usize),

    /// Input was not valid hex.
    #[error("invalid hex key: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Storage key did not carry the blocks prefix.
    #[error("not a block storage key: {0}")]
    NotBlockKey(String),
}

/// A 256 bit content key: the keccak-256 digest of a block's bytes.
///
/// Equality is byte equality. Displays as lowercase hex without a prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Key(B256);

impl Key {
    /// Creates a key from raw bytes.
    pub const fn new(bytes: [u8; KEY_SIZE]) -> Self {
        Self(B256::new(bytes))
    }

    /// Computes the key naming `data`.
    pub fn digest(data: impl AsRef<[u8]>) -> Self {
        Self(keccak256(data))
    }

    /// Creates a key from a slice, checking the length.
    pub fn from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        if slice.len() != KEY_SIZE {
            return Err(KeyError::InvalidLength(slice.len()));
        }
        Ok(Self(B256::from_slice(slice)))
    }

    /// Returns the underlying bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// Returns the key under which this block is persisted locally.
    pub fn storage_key(&self) -> DatastoreKey {
        DatastoreKey::from(self)
    }
}

impl From<B256> for Key {
    fn from(value: B256) -> Self {
        Self(value)
    }
}

impl From<[u8; KEY_SIZE]> for Key {
    fn from(bytes: [u8; KEY_SIZE]) -> Self {
        Self::new(bytes)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for Key {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes)
    }
}

/// Opaque key under which a block's bytes live in a datastore.
///
/// The encoding is `/blocks/<hex key>`: stable, and collision-free because
/// the hex digest is.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DatastoreKey(String);

impl DatastoreKey {
    /// Wraps an already encoded storage key.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the encoded key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the encoded key as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Decodes the content key this storage key was derived from.
    pub fn to_key(&self) -> Result<Key, KeyError> {
        self.0
            .strip_prefix(BLOCKS_PREFIX)
            .ok_or_else(|| KeyError::NotBlockKey(self.0.clone()))?
            .parse()
    }
}

impl From<&Key> for DatastoreKey {
    fn from(key: &Key) -> Self {
        Self(format!("{BLOCKS_PREFIX}{key}"))
    }
}

impl fmt::Display for DatastoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
