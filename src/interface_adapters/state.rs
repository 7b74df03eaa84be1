use crate::use_cases::RoomRegistry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    // Owns every live room and its world task.
    pub room_registry: Arc<RoomRegistry>,
}
