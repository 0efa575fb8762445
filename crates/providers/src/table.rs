//! Provider table owned by the registry service.
//!
//! The table is plain data with no interior locking. It is only ever touched
//! from inside [`ProviderService`](crate::ProviderService), which serializes
//! every access through its inbox.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use lodestone_primitives::{Key, Peer, PeerId};
use tokio::time::Instant;

/// One provider announcement: a peer claiming a key at a point in time.
#[derive(Debug, Clone)]
pub struct ProviderRecord {
    /// The announcing peer.
    pub peer: Peer,
    /// When the announcement was recorded.
    pub created_at: Instant,
}

impl ProviderRecord {
    /// Age of the record at `now`.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }
}

/// Key to provider records, plus the set of keys the local peer provides.
#[derive(Debug)]
pub struct ProviderTable {
    /// Identity of the peer owning this table.
    local: PeerId,
    /// Records per key, in insertion order.
    providers: HashMap<Key, Vec<ProviderRecord>>,
    /// Keys announced by the local peer.
    local_keys: HashSet<Key>,
    /// Total records across all keys.
    records: usize,
    /// Refresh an existing (key, peer) record instead of appending.
    dedup: bool,
}

impl ProviderTable {
    /// Create an empty table for the given local identity.
    pub fn new(local: PeerId, dedup: bool) -> Self {
        Self {
            local,
            providers: HashMap::new(),
            local_keys: HashSet::new(),
            records: 0,
            dedup,
        }
    }

    /// The local peer's identity.
    pub fn local(&self) -> &PeerId {
        &self.local
    }

    /// Record that `peer` provides `key` as of `now`.
    ///
    /// Returns true if a new record was appended, false if an existing one
    /// was refreshed (only possible with dedup enabled).
    pub fn add(&mut self, key: Key, peer: Peer, now: Instant) -> bool {
        if peer.is(&self.local) {
            self.local_keys.insert(key);
        }

        let records = self.providers.entry(key).or_default();
        if self.dedup {
            if let Some(existing) = records.iter_mut().find(|r| r.peer.id() == peer.id()) {
                existing.created_at = now;
                existing.peer = peer;
                return false;
            }
        }

        records.push(ProviderRecord {
            peer,
            created_at: now,
        });
        self.records += 1;
        true
    }

    /// Snapshot of the peers on record for `key`, in table order.
    pub fn providers(&self, key: &Key) -> Vec<Peer> {
        self.providers
            .get(key)
            .map(|records| records.iter().map(|r| r.peer.clone()).collect())
            .unwrap_or_default()
    }

    /// Snapshot of the keys the local peer provides, in no particular order.
    pub fn local_keys(&self) -> Vec<Key> {
        self.local_keys.iter().copied().collect()
    }

    /// Drop every record whose age at `now` is at least `retention`.
    ///
    /// Keys left without records are removed. Returns the number of records
    /// dropped.
    pub fn sweep(&mut self, now: Instant, retention: Duration) -> usize {
        let mut expired = 0;
        self.providers.retain(|_, records| {
            let before = records.len();
            records.retain(|r| r.age(now) < retention);
            expired += before - records.len();
            !records.is_empty()
        });
        self.records -= expired;
        expired
    }

    /// Number of keys with at least one record.
    pub fn key_count(&self) -> usize {
        self.providers.len()
    }

    /// Total number of records across all keys.
    pub fn record_count(&self) -> usize {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(60 * 60);

    fn key(n: u8) -> Key {
        Key::new([n; 32])
    }

    fn peer(n: u8) -> Peer {
        Peer::new(PeerId::new([n; 32]))
    }

    #[test]
    fn test_unknown_key_has_no_providers() {
        let table = ProviderTable::new(PeerId::new([0; 32]), false);
        assert!(table.providers(&key(1)).is_empty());
        assert!(table.local_keys().is_empty());
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut table = ProviderTable::new(PeerId::new([0; 32]), false);
        let now = Instant::now();

        table.add(key(1), peer(2), now);
        table.add(key(1), peer(3), now);
        table.add(key(1), peer(4), now);

        assert_eq!(table.providers(&key(1)), vec![peer(2), peer(3), peer(4)]);
    }

    #[test]
    fn test_repeated_adds_are_not_deduplicated() {
        let mut table = ProviderTable::new(PeerId::new([0; 32]), false);
        let now = Instant::now();

        for _ in 0..5 {
            assert!(table.add(key(1), peer(2), now));
        }

        assert_eq!(table.providers(&key(1)).len(), 5);
        assert_eq!(table.record_count(), 5);
    }

    #[test]
    fn test_dedup_refreshes_existing_record() {
        let mut table = ProviderTable::new(PeerId::new([0; 32]), true);
        let start = Instant::now();

        assert!(table.add(key(1), peer(2), start));
        assert!(table.add(key(1), peer(3), start));
        assert!(!table.add(key(1), peer(2), start + 20 * HOUR));

        assert_eq!(table.providers(&key(1)), vec![peer(2), peer(3)]);

        // The refreshed record survives a sweep that expires its sibling.
        let expired = table.sweep(start + 25 * HOUR, 24 * HOUR);
        assert_eq!(expired, 1);
        assert_eq!(table.providers(&key(1)), vec![peer(2)]);
    }

    #[test]
    fn test_local_set_only_tracks_local_peer() {
        let local = PeerId::new([9; 32]);
        let mut table = ProviderTable::new(local, false);
        let now = Instant::now();

        table.add(key(1), Peer::new(local), now);
        table.add(key(2), peer(3), now);

        assert_eq!(table.local_keys(), vec![key(1)]);
    }

    #[test]
    fn test_sweep_boundary() {
        let mut table = ProviderTable::new(PeerId::new([0; 32]), false);
        let start = Instant::now();
        let retention = 24 * HOUR;

        // Ages at `now`: 30h, exactly 24h, 24h - 1ms, 1h, 0.
        let now = start + 30 * HOUR;
        table.add(key(1), peer(1), start);
        table.add(key(1), peer(2), now - retention);
        table.add(key(1), peer(3), now - retention + Duration::from_millis(1));
        table.add(key(2), peer(4), now - HOUR);
        table.add(key(3), peer(5), now);

        let expired = table.sweep(now, retention);

        assert_eq!(expired, 2);
        assert_eq!(table.providers(&key(1)), vec![peer(3)]);
        assert_eq!(table.providers(&key(2)), vec![peer(4)]);
        assert_eq!(table.providers(&key(3)), vec![peer(5)]);
    }

    #[test]
    fn test_sweep_removes_fully_expired_keys() {
        let local = PeerId::new([9; 32]);
        let mut table = ProviderTable::new(local, false);
        let start = Instant::now();

        table.add(key(1), peer(1), start);
        table.add(key(1), Peer::new(local), start);
        assert_eq!(table.key_count(), 1);

        assert_eq!(table.sweep(start + 48 * HOUR, 24 * HOUR), 2);
        assert_eq!(table.key_count(), 0);
        assert!(table.providers(&key(1)).is_empty());

        // The local set is never pruned.
        assert_eq!(table.local_keys(), vec![key(1)]);
    }
}
