//! Error types for the voicetag bot.

use thiserror::Error;

/// Errors that can occur while running the bot.
#[derive(Error, Debug)]
pub enum BotError {
    #[error("DISCORD_BOT_TOKEN environment variable not set")]
    MissingToken,

    #[error("gateway error: {0}")]
    Gateway(#[from] serenity::Error),

    #[error("voice join error: {0}")]
    VoiceJoin(#[from] songbird::error::JoinError),

    #[error("songbird voice client was not registered at startup")]
    VoiceNotRegistered,

    #[error("message was not sent from a guild")]
    NotInGuild,
}
