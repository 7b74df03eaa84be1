// Use cases layer: application workflows for the arena server.

pub mod game;
pub mod rooms;
pub mod types;

pub use rooms::{JoinAccepted, RegistrySettings, RoomHandle, RoomRegistry, RoomSummary};
pub use types::{GameEvent, JoinError};
