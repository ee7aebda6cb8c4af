//! Voice session handling: SSRC attribution and driver event wiring.

pub mod attribution;
pub mod receiver;
pub mod session;
pub mod unresolved;

pub use attribution::{AttributionTable, SsrcBinding};
pub use receiver::VoiceReceiver;
pub use session::{SessionRegistry, VoiceSession};
pub use unresolved::{UnresolvedBuffer, UnresolvedPacket};
