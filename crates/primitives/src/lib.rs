//! Core primitive types for Lodestone.
//!
//! Content is named by a [`Key`], the keccak-256 digest of its bytes. A
//! [`Block`] pairs a key with the bytes it names, and a [`Peer`] is an opaque
//! network identity that may provide blocks.
//!
//! These types are kept in their own crate so the provider registry and the
//! block service can share them without depending on each other.

mod block;
mod key;
mod peer;

pub use block::Block;
pub use key::{DatastoreKey, KEY_SIZE, Key, KeyError};
pub use peer::{Peer, PeerId};

/// Re-exported so callers can build blocks without naming `bytes` directly.
pub use bytes::Bytes;
