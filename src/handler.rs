//! Gateway event handling and command dispatch.

use std::sync::Arc;

use serenity::async_trait;
use serenity::client::{Context, EventHandler};
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::id::ChannelId;
use songbird::CoreEvent;
use tracing::{error, info};

use crate::commands::Command;
use crate::error::BotError;
use crate::voice::{SessionRegistry, VoiceReceiver, VoiceSession};

/// Serenity event handler: dispatches chat commands and owns the voice
/// session registry.
pub struct Handler {
    sessions: Arc<SessionRegistry>,
}

impl Handler {
    pub fn new() -> Self {
        Handler {
            sessions: Arc::new(SessionRegistry::new()),
        }
    }

    /// Joins the voice channel the message author is currently in and
    /// attaches the packet receiver to it.
    async fn join_voice(&self, ctx: &Context, msg: &Message) -> Result<(), BotError> {
        let guild_id = msg.guild_id.ok_or(BotError::NotInGuild)?;

        // Cache lookup must not be held across an await point.
        let connect_to = msg.guild(&ctx.cache).and_then(|guild| {
            guild
                .voice_states
                .get(&msg.author.id)
                .and_then(|state| state.channel_id)
        });

        let Some(channel_id) = connect_to else {
            say(ctx, msg.channel_id, "You are not in a voice channel.").await;
            return Ok(());
        };

        let manager = songbird::get(ctx)
            .await
            .ok_or(BotError::VoiceNotRegistered)?
            .clone();

        let call = manager.join(guild_id, channel_id).await?;

        let session = VoiceSession::new(guild_id);
        let receiver = VoiceReceiver::new(session.table());
        {
            let mut call = call.lock().await;
            call.add_global_event(CoreEvent::SpeakingStateUpdate.into(), receiver.clone());
            call.add_global_event(CoreEvent::RtpPacket.into(), receiver.clone());
            call.add_global_event(CoreEvent::ClientDisconnect.into(), receiver.clone());
            call.add_global_event(CoreEvent::DriverDisconnect.into(), receiver);
        }
        self.sessions.insert(session);

        info!("Joined voice channel {} in guild {}", channel_id, guild_id);
        say(
            ctx,
            msg.channel_id,
            "Joined your voice channel! I'm now listening.",
        )
        .await;
        Ok(())
    }

    /// Disconnects from the guild's voice channel and tears the session
    /// down.
    async fn leave_voice(&self, ctx: &Context, msg: &Message) -> Result<(), BotError> {
        let guild_id = msg.guild_id.ok_or(BotError::NotInGuild)?;

        let manager = songbird::get(ctx)
            .await
            .ok_or(BotError::VoiceNotRegistered)?
            .clone();

        if manager.get(guild_id).is_none() {
            say(ctx, msg.channel_id, "I'm not in a voice channel.").await;
            return Ok(());
        }

        manager.remove(guild_id).await?;
        self.sessions.remove(guild_id);

        info!("Left voice channel in guild {}", guild_id);
        say(ctx, msg.channel_id, "Left the voice channel.").await;
        Ok(())
    }
}

impl Default for Handler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("Bot is now running as {}. Press CTRL-C to exit.", ready.user.name);
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        match Command::parse(&msg.content) {
            Some(Command::Ping) => say(&ctx, msg.channel_id, "Pong!").await,
            Some(Command::Pong) => say(&ctx, msg.channel_id, "Ping!").await,
            Some(Command::Join) => {
                if let Err(e) = self.join_voice(&ctx, &msg).await {
                    error!("Voice join failed: {}", e);
                    say(&ctx, msg.channel_id, "Failed to join the voice channel.").await;
                }
            }
            Some(Command::Leave) => {
                if let Err(e) = self.leave_voice(&ctx, &msg).await {
                    error!("Voice leave failed: {}", e);
                    say(&ctx, msg.channel_id, "Failed to leave the voice channel.").await;
                }
            }
            None => {}
        }
    }
}

/// Sends a reply, logging instead of failing when the channel rejects it.
async fn say(ctx: &Context, channel_id: ChannelId, text: &str) {
    if let Err(e) = channel_id.say(&ctx.http, text).await {
        error!("Failed to send message to {}: {}", channel_id, e);
    }
}
