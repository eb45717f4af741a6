//! Client-side logic for a server-authoritative minesweeper service.
//!
//! The server owns every game rule; this crate only decodes snapshots into
//! view state, keeps a presentation timer honest, sequences user intents
//! against their responses, and drives the lobby and top-level navigation.
//! Nothing in here touches the network or a clock: the current time is
//! always a parameter.

pub use board::*;
pub use error::*;
pub use lobby::*;
pub use navigator::*;
pub use session::*;
pub use timer::*;
pub use types::*;

mod board;
mod error;
mod lobby;
mod navigator;
mod session;
mod timer;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

impl MessageKind {
    pub const fn css_class(self) -> &'static str {
        use MessageKind::*;
        match self {
            Info => "info",
            Success => "success",
            Error => "error",
        }
    }
}

/// Transient user-facing notice shown next to the board or the room list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl StatusMessage {
    /// How long a message stays on screen before it expires on its own.
    pub const TTL_MS: u32 = 3_000;

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }
}
