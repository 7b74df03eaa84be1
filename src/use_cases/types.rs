// Use-case level inputs/outputs for the room world loops.

use crate::domain::{AbilityKind, PlayerId, PlayerInput};

/// Everything the transport can ask of a room. The world task is the only consumer.
#[derive(Debug, Clone)]
pub enum GameEvent {
    Join { player_id: PlayerId },
    Leave { player_id: PlayerId },
    Input { player_id: PlayerId, input: PlayerInput },
    Ability { player_id: PlayerId, kind: AbilityKind },
}

/// Reasons a join request can be turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinError {
    /// The room already holds its configured maximum of players.
    RoomFull,
    /// The room's world loop is gone (shutting down).
    RoomUnavailable,
}

impl JoinError {
    /// Text sent back to the client in `joinDenied`.
    pub fn reason(self) -> &'static str {
        match self {
            JoinError::RoomFull => "Room is full",
            JoinError::RoomUnavailable => "Room is unavailable",
        }
    }
}
