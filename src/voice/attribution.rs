//! SSRC to user attribution.
//!
//! Every packet the voice driver delivers is tagged only with a numeric
//! stream id (SSRC). Which user owns that stream arrives separately, on the
//! voice websocket's speaking payload. This table bridges the two event
//! sources for one voice session.

use std::time::Instant;

use dashmap::DashMap;

/// A live claim that an SSRC currently belongs to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SsrcBinding {
    pub ssrc: u32,
    pub user_id: u64,
    pub bound_at: Instant,
}

/// Concurrent SSRC → user binding table, scoped to one voice session.
///
/// Two independent producers touch it: the speaking-notification path
/// writes bindings, the packet path reads them. Entries are sharded-locked,
/// so a lookup never observes a partially written binding and no operation
/// blocks for unbounded time.
#[derive(Debug, Default)]
pub struct AttributionTable {
    bindings: DashMap<u32, SsrcBinding>,
}

impl AttributionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the binding for `ssrc`.
    ///
    /// Overwriting a differing prior binding is expected: the platform may
    /// reassign an SSRC within a session.
    pub fn bind(&self, ssrc: u32, user_id: u64) {
        self.bindings.insert(
            ssrc,
            SsrcBinding {
                ssrc,
                user_id,
                bound_at: Instant::now(),
            },
        );
    }

    /// Resolves an SSRC to the user currently bound to it, if any.
    ///
    /// Never blocks on a future bind; an unknown SSRC is a normal outcome,
    /// not an error.
    pub fn lookup(&self, ssrc: u32) -> Option<u64> {
        self.bindings.get(&ssrc).map(|b| b.user_id)
    }

    /// Drops any binding held by `user_id`.
    ///
    /// Called when a user disconnects from the channel, so that a reused
    /// SSRC cannot be misattributed to them.
    pub fn unbind_user(&self, user_id: u64) {
        self.bindings.retain(|_, b| b.user_id != user_id);
    }

    /// Removes all bindings. Called on session teardown; late packets for
    /// previously bound SSRCs resolve to absent afterwards.
    pub fn clear(&self) {
        self.bindings.clear();
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
