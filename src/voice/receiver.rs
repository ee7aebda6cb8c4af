//! Voice driver event handling.
//!
//! Attached as a set of global events on the songbird call at join time.
//! Speaking payloads populate the attribution table, RTP packets consult
//! it, and a driver disconnect tears it down.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use serenity::async_trait;
use songbird::model::payload::{ClientDisconnect, Speaking};
use songbird::{Event, EventContext, EventHandler as VoiceEventHandler};
use tracing::{debug, info, warn};

use crate::config::{UNRESOLVED_CAPACITY, UNRESOLVED_WINDOW};
use crate::voice::attribution::AttributionTable;
use crate::voice::unresolved::UnresolvedBuffer;

/// Receives driver events for one voice session and attributes packets.
#[derive(Clone)]
pub struct VoiceReceiver {
    table: Arc<AttributionTable>,
    held: Arc<Mutex<UnresolvedBuffer>>,
}

impl VoiceReceiver {
    pub fn new(table: Arc<AttributionTable>) -> Self {
        VoiceReceiver {
            table,
            held: Arc::new(Mutex::new(UnresolvedBuffer::new(
                UNRESOLVED_CAPACITY,
                UNRESOLVED_WINDOW,
            ))),
        }
    }

    /// The voice websocket announced which user owns an SSRC.
    fn on_speaking(&self, payload: &Speaking) {
        let Some(user_id) = payload.user_id else {
            // Speaking payloads without a user id carry nothing to bind.
            debug!("Speaking update for ssrc={} without user id", payload.ssrc);
            return;
        };

        self.table.bind(payload.ssrc, user_id.0);
        info!("Bound ssrc={} to user={}", payload.ssrc, user_id.0);

        let Ok(mut held) = self.held.lock() else {
            warn!("Unresolved packet buffer poisoned, skipping retry");
            return;
        };
        for (user, packet) in held.drain_resolved(&self.table) {
            info!(
                "Received audio (late attribution): ssrc={} user={} bytes={}",
                packet.ssrc, user, packet.audio_bytes
            );
        }
        for packet in held.evict_expired(Instant::now()) {
            debug!(
                "Packet permanently unresolved: ssrc={} bytes={}",
                packet.ssrc, packet.audio_bytes
            );
        }
    }

    /// An audio packet arrived; resolve its SSRC or hold it.
    fn on_packet(&self, ssrc: u32, audio_bytes: usize) {
        match self.table.lookup(ssrc) {
            Some(user_id) => {
                info!(
                    "Received audio: ssrc={} user={} bytes={}",
                    ssrc, user_id, audio_bytes
                );
            }
            None => {
                debug!(
                    "Received audio: ssrc={} (user unknown yet) bytes={}",
                    ssrc, audio_bytes
                );
                if let Ok(mut held) = self.held.lock() {
                    if let Some(evicted) = held.push(ssrc, audio_bytes, Instant::now()) {
                        debug!(
                            "Packet permanently unresolved: ssrc={} bytes={}",
                            evicted.ssrc, evicted.audio_bytes
                        );
                    }
                }
            }
        }
    }

    fn on_client_disconnect(&self, payload: &ClientDisconnect) {
        self.table.unbind_user(payload.user_id.0);
        debug!("User {} left the channel, binding dropped", payload.user_id.0);
    }
}

#[async_trait]
impl VoiceEventHandler for VoiceReceiver {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        match ctx {
            EventContext::SpeakingStateUpdate(payload) => self.on_speaking(payload),
            EventContext::RtpPacket(packet) => {
                let audio_bytes = packet
                    .packet
                    .len()
                    .saturating_sub(packet.payload_offset + packet.payload_end_pad);
                self.on_packet(packet.rtp().get_ssrc(), audio_bytes);
            }
            EventContext::ClientDisconnect(payload) => self.on_client_disconnect(payload),
            EventContext::DriverDisconnect(_) => {
                info!("Voice driver disconnected, clearing attribution table");
                self.table.clear();
            }
            _ => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packets_before_bind_are_held_then_attributed() {
        let table = Arc::new(AttributionTable::new());
        let receiver = VoiceReceiver::new(table.clone());

        receiver.on_packet(2002, 120);
        assert_eq!(receiver.held.lock().unwrap().len(), 1);

        receiver.on_speaking(&Speaking {
            delay: None,
            speaking: songbird::model::SpeakingState::MICROPHONE,
            ssrc: 2002,
            user_id: Some(songbird::model::id::UserId(200)),
        });

        assert_eq!(table.lookup(2002), Some(200));
        assert!(receiver.held.lock().unwrap().is_empty());
    }

    #[test]
    fn speaking_without_user_id_binds_nothing() {
        let table = Arc::new(AttributionTable::new());
        let receiver = VoiceReceiver::new(table.clone());

        receiver.on_speaking(&Speaking {
            delay: None,
            speaking: songbird::model::SpeakingState::MICROPHONE,
            ssrc: 1001,
            user_id: None,
        });

        assert!(table.is_empty());
    }

    #[test]
    fn client_disconnect_drops_binding() {
        let table = Arc::new(AttributionTable::new());
        let receiver = VoiceReceiver::new(table.clone());

        table.bind(1001, 100);
        receiver.on_client_disconnect(&ClientDisconnect {
            user_id: songbird::model::id::UserId(100),
        });

        assert_eq!(table.lookup(1001), None);
    }
}
