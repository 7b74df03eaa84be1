use crate::interface_adapters::http::ErrorResponse;
use crate::interface_adapters::net::client::spawn_room_serializer;
use crate::interface_adapters::protocol::{SettingsDto, SettingsRequestDto, WorldDto};
use crate::interface_adapters::state::AppState;
use crate::use_cases::RoomSummary;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomCreateRequest {
    room_id: String,
    // Ignored when the room already exists.
    #[serde(default)]
    settings: Option<SettingsRequestDto>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct RoomResponse {
    room_id: String,
    settings: SettingsDto,
    world: WorldDto,
    players: usize,
}

impl From<RoomSummary> for RoomResponse {
    fn from(room: RoomSummary) -> Self {
        Self {
            room_id: room.room_id.to_string(),
            settings: room.settings.into(),
            world: room.world.into(),
            players: room.players,
        }
    }
}

fn error_response(status: StatusCode, error: &str) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

pub async fn create_room_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RoomCreateRequest>,
) -> impl IntoResponse {
    // Ensure we have a room id to create.
    let room_id = payload.room_id.trim().to_string();
    if room_id.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "roomId is required");
    }

    let settings = payload
        .settings
        .as_ref()
        .map(SettingsRequestDto::to_settings)
        .unwrap_or_default();

    let (room, created) = state
        .room_registry
        .create_or_get(&room_id, settings)
        .await;
    if created {
        // Create the serializer so clients can subscribe immediately.
        spawn_room_serializer(&room);
    }

    // The room can be reclaimed between the two calls if it sat idle for the whole grace period.
    let Some(summary) = state.room_registry.get_room(&room_id).await else {
        return error_response(StatusCode::NOT_FOUND, "room not found");
    };
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    (status, Json(RoomResponse::from(summary))).into_response()
}

pub async fn get_room_handler(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> impl IntoResponse {
    match state.room_registry.get_room(&room_id).await {
        Some(summary) => (StatusCode::OK, Json(RoomResponse::from(summary))).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "room not found"),
    }
}
