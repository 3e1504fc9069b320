//! Command/argument state machine
//!
//! The host writes a command code to CMD, and for argument-taking commands
//! follows up with a value on ARG. Everything else is a function of the
//! current state and the register written.

use shortwire_protocol::Command;

use crate::request::RequestTicket;

/// Engine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineState {
    /// No command pending
    #[default]
    Idle,
    /// Command received, waiting for its argument on ARG
    AwaitingArg(Command),
}

impl EngineState {
    /// Check if a command is waiting for its argument
    pub fn is_awaiting_arg(&self) -> bool {
        matches!(self, EngineState::AwaitingArg(_))
    }

    /// The command waiting for its argument, if any
    pub fn pending_command(&self) -> Option<Command> {
        match self {
            EngineState::AwaitingArg(cmd) => Some(*cmd),
            EngineState::Idle => None,
        }
    }
}

/// Side effect requested by a register write
///
/// The engine itself only touches its queue and flags. Anything involving
/// the outside world is handed back to the caller, after the engine has
/// already returned to [`EngineState::Idle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Nothing to do
    None,
    /// Call the playback hook with this track id
    Play(u8),
    /// Call the playback stop hook
    Stop,
    /// Call the volume hook with this level
    SetVolume(u8),
    /// Start a text lookup; feed the result back through
    /// [`ProtocolEngine::complete_request`](super::ProtocolEngine::complete_request)
    FetchText(RequestTicket),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        let state = EngineState::default();
        assert_eq!(state, EngineState::Idle);
        assert!(!state.is_awaiting_arg());
        assert!(state.pending_command().is_none());
    }

    #[test]
    fn test_pending_command() {
        let state = EngineState::AwaitingArg(Command::SetVolume);
        assert!(state.is_awaiting_arg());
        assert_eq!(state.pending_command(), Some(Command::SetVolume));
    }
}
