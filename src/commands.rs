//! Chat command parsing.
//!
//! The command surface is four literal message bodies; anything else is
//! ignored. No prefix handling, no arguments.

/// A recognized chat command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `ping` — reply `Pong!`.
    Ping,
    /// `pong` — reply `Ping!`.
    Pong,
    /// `!join` — join the author's voice channel and start listening.
    Join,
    /// `!leave` — leave the current voice channel.
    Leave,
}

impl Command {
    /// Matches a message body against the command set. The match is exact;
    /// surrounding whitespace or extra text yields `None`.
    pub fn parse(content: &str) -> Option<Self> {
        match content {
            "ping" => Some(Command::Ping),
            "pong" => Some(Command::Pong),
            "!join" => Some(Command::Join),
            "!leave" => Some(Command::Leave),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_the_command_set() {
        assert_eq!(Command::parse("ping"), Some(Command::Ping));
        assert_eq!(Command::parse("pong"), Some(Command::Pong));
        assert_eq!(Command::parse("!join"), Some(Command::Join));
        assert_eq!(Command::parse("!leave"), Some(Command::Leave));
    }

    #[test]
    fn match_is_exact() {
        assert_eq!(Command::parse("ping "), None);
        assert_eq!(Command::parse("Ping"), None);
        assert_eq!(Command::parse("!join now"), None);
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("hello"), None);
    }
}
