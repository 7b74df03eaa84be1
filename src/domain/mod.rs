// Domain layer: core simulation types and rules.

pub mod geometry;
pub mod room;
pub mod snapshot;
pub mod state;
pub mod systems;
pub mod tuning;

pub use room::Room;
pub use snapshot::RoomSnapshot;
pub use state::{AbilityKind, Difficulty, PlayerId, PlayerInput, RoomSettings, WorldBounds};
