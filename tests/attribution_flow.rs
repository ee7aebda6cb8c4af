//! End-to-end attribution flow over the library types: bindings arriving
//! before, after, and never relative to the packets they describe.

use std::time::{Duration, Instant};

use voicetag::voice::{AttributionTable, SessionRegistry, UnresolvedBuffer, VoiceSession};

const WINDOW: Duration = Duration::from_millis(500);

/// Resolve a packet the way the receiver does: table first, held buffer
/// for misses.
fn receive(
    table: &AttributionTable,
    held: &mut UnresolvedBuffer,
    ssrc: u32,
    bytes: usize,
    now: Instant,
) -> Option<u64> {
    match table.lookup(ssrc) {
        Some(user) => Some(user),
        None => {
            held.push(ssrc, bytes, now);
            None
        }
    }
}

#[test]
fn packets_resolve_across_binding_order() {
    let session = VoiceSession::new(serenity::model::id::GuildId::new(1));
    let table = session.table();
    let mut held = UnresolvedBuffer::new(64, WINDOW);
    let now = Instant::now();

    // Binding first: every following packet resolves.
    table.bind(1001, 100);
    for _ in 0..3 {
        assert_eq!(receive(&table, &mut held, 1001, 120, now), Some(100));
    }

    // Packet before its binding: unresolved, held for retry.
    assert_eq!(receive(&table, &mut held, 2002, 80, now), None);
    assert_eq!(held.len(), 1);

    // The binding lands; the held packet is retroactively attributed and
    // the next packet resolves directly.
    table.bind(2002, 200);
    let late = held.drain_resolved(&table);
    assert_eq!(late.len(), 1);
    assert_eq!(late[0].0, 200);
    assert_eq!(late[0].1.ssrc, 2002);
    assert_eq!(receive(&table, &mut held, 2002, 80, now), Some(200));
}

#[test]
fn unresolved_packets_expire_instead_of_lingering() {
    let table = AttributionTable::new();
    let mut held = UnresolvedBuffer::new(64, WINDOW);
    let start = Instant::now();

    receive(&table, &mut held, 3003, 60, start);
    let expired = held.evict_expired(start + WINDOW + Duration::from_millis(1));
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].ssrc, 3003);

    // A binding arriving after expiry attributes nothing retroactively.
    table.bind(3003, 300);
    assert!(held.drain_resolved(&table).is_empty());
}

#[test]
fn session_teardown_makes_late_packets_unresolvable() {
    let registry = SessionRegistry::new();
    let guild = serenity::model::id::GuildId::new(7);

    let session = VoiceSession::new(guild);
    let table = session.table();
    registry.insert(session);

    table.bind(1001, 100);
    assert_eq!(table.lookup(1001), Some(100));

    assert!(registry.remove(guild));
    assert_eq!(table.lookup(1001), None);
}

#[test]
fn sessions_do_not_share_bindings() {
    let registry = SessionRegistry::new();
    let first = VoiceSession::new(serenity::model::id::GuildId::new(10));
    let second = VoiceSession::new(serenity::model::id::GuildId::new(11));

    first.table().bind(1001, 100);
    let second_table = second.table();

    registry.insert(first);
    registry.insert(second);

    assert_eq!(second_table.lookup(1001), None);
    assert_eq!(registry.len(), 2);
}
