// Room orchestration: creating worlds on demand, admitting players and retiring idle rooms.

use crate::domain::{PlayerId, Room, RoomSettings, RoomSnapshot, WorldBounds};
use crate::use_cases::game::{now_ms, world_task};
use crate::use_cases::{GameEvent, JoinError};
use axum::extract::ws::Utf8Bytes;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Notify, RwLock, broadcast, mpsc, watch};
use tracing::{debug, info, warn};

/// Shared configuration for spawning room worlds.
#[derive(Debug, Clone)]
pub struct RegistrySettings {
    /// Capacity for inbound player events.
    pub input_channel_capacity: usize,
    /// Capacity for broadcast world snapshots.
    pub world_broadcast_capacity: usize,
    /// Fixed tick interval for the game loop.
    pub tick_interval: Duration,
    /// How long an empty room survives before it is torn down.
    pub idle_grace: Duration,
    /// Playable area for every room.
    pub world: WorldBounds,
}

/// Per-room channels and metadata.
#[derive(Clone)]
pub struct RoomHandle {
    /// Identifier clients use to target this room.
    pub room_id: Arc<str>,
    pub settings: RoomSettings,
    pub world: WorldBounds,
    /// Sender for game events into the room world task.
    pub input_tx: mpsc::Sender<GameEvent>,
    /// Broadcast sender for raw snapshots.
    pub world_tx: broadcast::Sender<RoomSnapshot>,
    /// Broadcast sender for serialized snapshots.
    pub frames_tx: broadcast::Sender<Utf8Bytes>,
    /// Watch sender holding the latest serialized snapshot.
    pub latest_frame_tx: watch::Sender<Utf8Bytes>,
    shutdown: Arc<Notify>,
}

/// Successful join: the freshly allocated player id and the room it belongs to.
#[derive(Clone)]
pub struct JoinAccepted {
    pub player_id: PlayerId,
    pub room: RoomHandle,
    /// True when this join brought the room into existence.
    pub created: bool,
}

/// Read-only view of a room for the HTTP surface.
#[derive(Debug, Clone)]
pub struct RoomSummary {
    pub room_id: Arc<str>,
    pub settings: RoomSettings,
    pub world: WorldBounds,
    pub players: usize,
}

struct RoomEntry {
    handle: RoomHandle,
    members: HashSet<PlayerId>,
    // Bumped each time the room becomes empty; a pending idle check only acts if it still
    // matches when it fires.
    vacancy: u64,
}

impl RoomEntry {
    fn summary(&self) -> RoomSummary {
        RoomSummary {
            room_id: self.handle.room_id.clone(),
            settings: self.handle.settings,
            world: self.handle.world,
            players: self.members.len(),
        }
    }
}

/// Thread-safe registry for active rooms.
pub struct RoomRegistry {
    /// Global settings applied to newly created rooms.
    settings: RegistrySettings,
    /// Map of room id to live room.
    rooms: RwLock<HashMap<String, RoomEntry>>,
    /// Process-wide player id source, shared by every room.
    next_player_id: AtomicU64,
}

impl RoomRegistry {
    pub fn new(settings: RegistrySettings) -> Self {
        Self {
            settings,
            rooms: RwLock::new(HashMap::new()),
            next_player_id: AtomicU64::new(1),
        }
    }

    /// Returns the existing room (its settings untouched) or creates one with `settings`.
    /// The flag is true when the room was created by this call.
    pub async fn create_or_get(
        self: &Arc<Self>,
        room_id: &str,
        settings: RoomSettings,
    ) -> (RoomHandle, bool) {
        let mut rooms = self.rooms.write().await;
        match rooms.entry(room_id.to_string()) {
            Entry::Occupied(entry) => (entry.get().handle.clone(), false),
            Entry::Vacant(entry) => {
                let handle = entry.insert(self.open_room(room_id, settings)).handle.clone();
                // Rooms created without a player still get reclaimed.
                self.schedule_idle_check(room_id.to_string(), 0);
                (handle, true)
            }
        }
    }

    /// Admits a new player into `room_id`, creating the room with `settings` if needed.
    pub async fn join(
        self: &Arc<Self>,
        room_id: &str,
        settings: RoomSettings,
    ) -> Result<JoinAccepted, JoinError> {
        let player_id = self.next_player_id.fetch_add(1, Ordering::Relaxed);
        // No await between the capacity check and the membership insert: a caller cancelled
        // mid-join must never leave a seat taken without a player behind it.
        let (room, created) = {
            let mut rooms = self.rooms.write().await;
            let (entry, created) = match rooms.entry(room_id.to_string()) {
                Entry::Occupied(entry) => (entry.into_mut(), false),
                Entry::Vacant(entry) => {
                    // Reclaims the room if this first join is refused below.
                    self.schedule_idle_check(room_id.to_string(), 0);
                    (entry.insert(self.open_room(room_id, settings)), true)
                }
            };

            if entry.members.len() >= usize::from(entry.handle.settings.max_players) {
                return Err(JoinError::RoomFull);
            }

            // The world task creates the player at a random spawn point.
            if let Err(err) = entry.handle.input_tx.try_send(GameEvent::Join { player_id }) {
                warn!(room_id, player_id, error = %err, "room not accepting joins");
                return Err(JoinError::RoomUnavailable);
            }
            entry.members.insert(player_id);
            (entry.handle.clone(), created)
        };

        Ok(JoinAccepted {
            player_id,
            room,
            created,
        })
    }

    /// Drops `player_id` from the room. Unknown rooms or players are ignored.
    pub async fn leave(self: &Arc<Self>, room_id: &str, player_id: PlayerId) {
        let Some(input_tx) = self.release(room_id, player_id).await else {
            return;
        };
        if input_tx.send(GameEvent::Leave { player_id }).await.is_err() {
            debug!(room_id, player_id, "room already stopped before leave");
        }
    }

    /// Returns a room summary for the provided id, if it exists.
    pub async fn get_room(&self, room_id: &str) -> Option<RoomSummary> {
        let rooms = self.rooms.read().await;
        rooms.get(room_id).map(RoomEntry::summary)
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// Removes the room if it is still empty and nobody has come and gone since the check
    /// was scheduled. Returns true when the room was removed.
    pub async fn remove_if_idle(&self, room_id: &str, vacancy: u64) -> bool {
        let mut rooms = self.rooms.write().await;
        let idle = rooms
            .get(room_id)
            .is_some_and(|entry| entry.members.is_empty() && entry.vacancy == vacancy);
        if !idle {
            return false;
        }

        if let Some(entry) = rooms.remove(room_id) {
            entry.handle.shutdown.notify_one();
            info!(room_id, "idle room removed");
        }
        true
    }

    // Removes the membership and schedules an idle check when the room empties.
    async fn release(
        self: &Arc<Self>,
        room_id: &str,
        player_id: PlayerId,
    ) -> Option<mpsc::Sender<GameEvent>> {
        let mut rooms = self.rooms.write().await;
        let entry = rooms.get_mut(room_id)?;
        if !entry.members.remove(&player_id) {
            return None;
        }
        if entry.members.is_empty() {
            entry.vacancy += 1;
            self.schedule_idle_check(room_id.to_string(), entry.vacancy);
        }
        Some(entry.handle.input_tx.clone())
    }

    fn schedule_idle_check(self: &Arc<Self>, room_id: String, vacancy: u64) {
        let registry = Arc::clone(self);
        let grace = self.settings.idle_grace;
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            registry.remove_if_idle(&room_id, vacancy).await;
        });
    }

    fn open_room(&self, room_id: &str, settings: RoomSettings) -> RoomEntry {
        // Channel wiring for the room world loop.
        let (input_tx, input_rx) = mpsc::channel::<GameEvent>(self.settings.input_channel_capacity);
        let (world_tx, _world_rx) =
            broadcast::channel::<RoomSnapshot>(self.settings.world_broadcast_capacity);
        let (frames_tx, _frames_rx) =
            broadcast::channel::<Utf8Bytes>(self.settings.world_broadcast_capacity);
        let (latest_frame_tx, _latest_frame_rx) = watch::channel::<Utf8Bytes>(Utf8Bytes::from(""));
        let shutdown = Arc::new(Notify::new());

        let room_id: Arc<str> = Arc::from(room_id);
        let room = Room::new(
            room_id.clone(),
            settings,
            self.settings.world,
            now_ms(),
            StdRng::from_os_rng(),
        );

        // Spawn the authoritative world loop for this room.
        tokio::spawn(world_task(
            room,
            input_rx,
            world_tx.clone(),
            self.settings.tick_interval,
            shutdown.clone(),
        ));
        info!(
            room_id = %room_id,
            max_players = settings.max_players,
            difficulty = ?settings.difficulty,
            "room created"
        );

        RoomEntry {
            handle: RoomHandle {
                room_id,
                settings,
                world: self.settings.world,
                input_tx,
                world_tx,
                frames_tx,
                latest_frame_tx,
                shutdown,
            },
            members: HashSet::new(),
            vacancy: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Difficulty;

    const GRACE: Duration = Duration::from_secs(10);

    fn registry() -> Arc<RoomRegistry> {
        registry_with_queue(64)
    }

    fn registry_with_queue(input_channel_capacity: usize) -> Arc<RoomRegistry> {
        Arc::new(RoomRegistry::new(RegistrySettings {
            input_channel_capacity,
            world_broadcast_capacity: 8,
            tick_interval: Duration::from_millis(50),
            idle_grace: GRACE,
            world: WorldBounds::default(),
        }))
    }

    fn duo() -> RoomSettings {
        RoomSettings::new(2, Difficulty::Easy)
    }

    #[tokio::test]
    async fn when_room_is_at_capacity_then_join_is_denied() {
        let registry = registry();

        let first = registry.join("cap", duo()).await.expect("first join");
        let second = registry.join("cap", duo()).await.expect("second join");
        let third = registry.join("cap", duo()).await;

        assert!(first.created);
        assert!(!second.created);
        assert_ne!(first.player_id, second.player_id);
        assert_eq!(third.err(), Some(JoinError::RoomFull));
        assert_eq!(registry.get_room("cap").await.expect("room").players, 2);
    }

    #[tokio::test]
    async fn when_room_queue_is_full_then_join_is_refused_without_taking_a_seat() {
        // One slot and no yield in between: the world task cannot drain the first join yet.
        let registry = registry_with_queue(1);
        registry.join("busy", duo()).await.expect("first join");

        let refused = registry.join("busy", duo()).await;

        assert!(matches!(refused, Err(JoinError::RoomUnavailable)));
        let summary = registry.get_room("busy").await.expect("room");
        assert_eq!(summary.players, 1);
    }

    #[tokio::test]
    async fn when_room_exists_then_later_settings_are_ignored() {
        let registry = registry();
        registry.join("keep", duo()).await.expect("join");

        let (handle, created) = registry
            .create_or_get("keep", RoomSettings::new(4, Difficulty::Insane))
            .await;

        assert!(!created);
        assert_eq!(handle.settings, duo());
    }

    #[tokio::test]
    async fn when_unknown_player_leaves_then_nothing_changes() {
        let registry = registry();
        registry.join("stale", duo()).await.expect("join");

        registry.leave("stale", 999_999).await;
        registry.leave("missing", 1).await;

        assert_eq!(registry.get_room("stale").await.expect("room").players, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn when_room_stays_empty_past_grace_then_it_is_removed() {
        let registry = registry();
        let joined = registry.join("idle", duo()).await.expect("join");

        registry.leave("idle", joined.player_id).await;
        tokio::time::sleep(GRACE - Duration::from_secs(1)).await;
        assert!(registry.get_room("idle").await.is_some());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(registry.get_room("idle").await.is_none());
        assert_eq!(registry.room_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn when_player_rejoins_within_grace_then_room_survives() {
        let registry = registry();
        let joined = registry.join("back", duo()).await.expect("join");

        registry.leave("back", joined.player_id).await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        registry.join("back", duo()).await.expect("rejoin");
        tokio::time::sleep(Duration::from_secs(6)).await;

        let room = registry.get_room("back").await.expect("room kept");
        assert_eq!(room.players, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn when_room_empties_twice_then_only_the_latest_check_counts() {
        let registry = registry();
        let first = registry.join("flap", duo()).await.expect("join");
        registry.leave("flap", first.player_id).await;

        tokio::time::sleep(Duration::from_secs(4)).await;
        let second = registry.join("flap", duo()).await.expect("rejoin");
        registry.leave("flap", second.player_id).await;

        // First check fires here but the vacancy moved on.
        tokio::time::sleep(Duration::from_secs(7)).await;
        assert!(registry.get_room("flap").await.is_some());

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(registry.get_room("flap").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn when_room_is_created_without_players_then_it_is_reclaimed() {
        let registry = registry();
        let (_, created) = registry.create_or_get("empty", duo()).await;
        assert!(created);

        tokio::time::sleep(GRACE + Duration::from_secs(1)).await;

        assert!(registry.get_room("empty").await.is_none());
    }
}
