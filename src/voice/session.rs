//! Per-guild voice session state.

use std::sync::Arc;

use dashmap::DashMap;
use serenity::model::id::GuildId;
use tracing::debug;

use crate::voice::attribution::AttributionTable;

/// State owned by one active voice connection.
///
/// Each session gets its own attribution table, created at join time and
/// cleared at teardown, so bindings never leak across guilds or across
/// reconnects to the same guild.
pub struct VoiceSession {
    guild_id: GuildId,
    table: Arc<AttributionTable>,
}

impl VoiceSession {
    pub fn new(guild_id: GuildId) -> Self {
        VoiceSession {
            guild_id,
            table: Arc::new(AttributionTable::new()),
        }
    }

    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    /// Shared handle to the session's attribution table, for the driver
    /// event handlers.
    pub fn table(&self) -> Arc<AttributionTable> {
        self.table.clone()
    }

    /// Tears the session down. Late packets for previously bound SSRCs
    /// resolve to absent from here on.
    pub fn close(&self) {
        self.table.clear();
        debug!("Voice session for guild {} closed", self.guild_id);
    }
}

/// Active voice sessions, at most one per guild.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<GuildId, VoiceSession>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session for a guild, tearing down any previous one.
    pub fn insert(&self, session: VoiceSession) {
        if let Some(previous) = self.sessions.insert(session.guild_id(), session) {
            previous.close();
        }
    }

    /// Removes and tears down the session for a guild, if one exists.
    /// Returns whether a session was present.
    pub fn remove(&self, guild_id: GuildId) -> bool {
        match self.sessions.remove(&guild_id) {
            Some((_, session)) => {
                session.close();
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, guild_id: GuildId) -> bool {
        self.sessions.contains_key(&guild_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
