//! Configuration for the voicetag bot.

use std::env;
use std::time::Duration;

use crate::error::BotError;

/// Environment variable holding the bot token.
pub const TOKEN_ENV: &str = "DISCORD_BOT_TOKEN";

/// Maximum number of unattributed packets held while waiting for a binding.
pub const UNRESOLVED_CAPACITY: usize = 64;

/// How long an unattributed packet is held before it is reported as
/// permanently unresolved.
pub const UNRESOLVED_WINDOW: Duration = Duration::from_millis(500);

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// A missing token is fatal: the caller is expected to report it and
    /// exit before opening any connection.
    pub fn from_env() -> Result<Self, BotError> {
        let discord_token = env::var(TOKEN_ENV).map_err(|_| BotError::MissingToken)?;
        Ok(Config { discord_token })
    }
}
