//! voicetag: a Discord chat-and-voice bot that attributes incoming audio
//! packets to the users speaking.
//!
//! The gateway and voice plumbing are delegated to serenity and songbird;
//! this crate's own work is the per-session attribution table correlating
//! the speaking notifications with the packet stream.

pub mod commands;
pub mod config;
pub mod error;
pub mod handler;
pub mod voice;

pub use commands::Command;
pub use config::Config;
pub use error::BotError;
pub use handler::Handler;
