//! Holding area for packets that arrive before their binding.
//!
//! The speaking notification and the packet stream are independent event
//! sources with no ordering guarantee between them, so the first packets of
//! a stream routinely precede the event naming their sender. Instead of
//! permanently labeling those packets unknown, their metadata is held here
//! for a short window and re-attributed once the binding lands.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::voice::attribution::AttributionTable;

/// Metadata of a packet whose SSRC had no binding at arrival time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnresolvedPacket {
    pub ssrc: u32,
    pub audio_bytes: usize,
    pub received_at: Instant,
}

/// Bounded FIFO of unattributed packet metadata.
///
/// Bounded both by entry count (oldest evicted first) and by age: entries
/// older than the window are expired and reported as permanently
/// unresolved, which is a normal outcome rather than a fault.
#[derive(Debug)]
pub struct UnresolvedBuffer {
    entries: VecDeque<UnresolvedPacket>,
    capacity: usize,
    window: Duration,
}

impl UnresolvedBuffer {
    pub fn new(capacity: usize, window: Duration) -> Self {
        UnresolvedBuffer {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            window,
        }
    }

    /// Records a packet that could not be attributed yet.
    ///
    /// Expired entries are dropped first; if the buffer is still full the
    /// oldest entry is evicted. Returns the evicted entry, if any.
    pub fn push(
        &mut self,
        ssrc: u32,
        audio_bytes: usize,
        now: Instant,
    ) -> Option<UnresolvedPacket> {
        self.drop_expired(now);

        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };

        self.entries.push_back(UnresolvedPacket {
            ssrc,
            audio_bytes,
            received_at: now,
        });
        evicted
    }

    /// Removes and returns every held packet whose SSRC now resolves,
    /// paired with the user it resolved to. Arrival order is preserved.
    pub fn drain_resolved(&mut self, table: &AttributionTable) -> Vec<(u64, UnresolvedPacket)> {
        let mut resolved = Vec::new();
        let mut remaining = VecDeque::with_capacity(self.entries.len());

        for entry in self.entries.drain(..) {
            match table.lookup(entry.ssrc) {
                Some(user_id) => resolved.push((user_id, entry)),
                None => remaining.push_back(entry),
            }
        }
        self.entries = remaining;
        resolved
    }

    /// Removes entries older than the window and returns them so the
    /// caller can report them as permanently unresolved.
    pub fn evict_expired(&mut self, now: Instant) -> Vec<UnresolvedPacket> {
        let mut expired = Vec::new();
        while self
            .entries
            .front()
            .is_some_and(|front| now.duration_since(front.received_at) > self.window)
        {
            if let Some(entry) = self.entries.pop_front() {
                expired.push(entry);
            }
        }
        expired
    }

    fn drop_expired(&mut self, now: Instant) {
        let _ = self.evict_expired(now);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
