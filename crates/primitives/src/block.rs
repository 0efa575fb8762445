//! Content-addressed blocks.

use core::fmt;

use bytes::Bytes;

use crate::Key;

/// Bytes addressed by their [`Key`].
///
/// A block built with [`Block::new`] always satisfies `key == digest(data)`.
/// [`Block::with_key`] trusts the caller; use [`Block::verify`] on anything
/// that came from an untrusted source.
#[derive(Clone, PartialEq, Eq)]
pub struct Block {
    key: Key,
    data: Bytes,
}

impl Block {
    /// Creates a block, deriving its key from the data.
    pub fn new(data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self {
            key: Key::digest(&data),
            data,
        }
    }

    /// Creates a block under a caller-supplied key without checking it.
    pub fn with_key(key: Key, data: impl Into<Bytes>) -> Self {
        Self {
            key,
            data: data.into(),
        }
    }

    /// The key naming this block.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The block's bytes.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Consumes the block, returning its bytes.
    pub fn into_data(self) -> Bytes {
        self.data
    }

    /// Size of the block's data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the data hashes to the block's key.
    pub fn verify(&self) -> bool {
        Key::digest(&self.data) == self.key
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("key", &self.key)
            .field("size", &self.size())
            .finish()
    }
}
