//! Peer identities.

use core::{fmt, str::FromStr};
use std::net::SocketAddr;

use alloy_primitives::{B256, hex};

use crate::KeyError;

/// Opaque 256 bit identity of a peer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeerId(B256);

impl PeerId {
    /// Creates a peer id from raw bytes.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(B256::new(bytes))
    }

    /// Generates a random peer id.
    pub fn random() -> Self {
        Self::new(rand::random())
    }

    /// Returns the underlying bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for PeerId {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(KeyError::InvalidLength(bytes.len()));
        }
        Ok(Self(B256::from_slice(&bytes)))
    }
}

/// A peer known to the network: its identity plus the addresses it was last
/// seen on.
///
/// Identity is what matters for ownership decisions; two `Peer` values with
/// the same [`PeerId`] refer to the same node even if their addresses differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Peer {
    id: PeerId,
    addresses: Vec<SocketAddr>,
}

impl Peer {
    /// Creates a peer with no known addresses.
    pub fn new(id: PeerId) -> Self {
        Self {
            id,
            addresses: Vec::new(),
        }
    }

    /// Creates a peer reachable on the given addresses.
    pub fn with_addresses(id: PeerId, addresses: Vec<SocketAddr>) -> Self {
        Self { id, addresses }
    }

    /// The peer's identity.
    pub fn id(&self) -> &PeerId {
        &self.id
    }

    /// Addresses the peer was seen on.
    pub fn addresses(&self) -> &[SocketAddr] {
        &self.addresses
    }

    /// Returns true if this peer has the given identity.
    pub fn is(&self, id: &PeerId) -> bool {
        &self.id == id
    }
}

impl From<PeerId> for Peer {
    fn from(id: PeerId) -> Self {
        Self::new(id)
    }
}
