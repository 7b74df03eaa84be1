use super::types::GameEvent;
use crate::domain::{Room, RoomSnapshot};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::{Notify, broadcast, mpsc};
use tracing::{debug, info};

/// Wall-clock milliseconds since the Unix epoch; all room timestamps use this clock.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Authoritative loop for one room. Sole writer of the room state: events are drained at the
/// start of each tick, then the simulation advances and a snapshot is broadcast.
pub async fn world_task(
    mut room: Room,
    mut input_rx: mpsc::Receiver<GameEvent>,
    world_tx: broadcast::Sender<RoomSnapshot>,
    tick_interval: Duration,
    shutdown: Arc<Notify>,
) {
    // Drive the fixed-step game loop at the configured tick rate.
    let mut interval = tokio::time::interval(tick_interval);
    let dt = tick_interval.as_secs_f32();

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                // Exit cleanly when the room is removed.
                break;
            }
            _ = interval.tick() => {}
        }

        let now = now_ms();

        while let Ok(ev) = input_rx.try_recv() {
            apply_event(&mut room, ev, now);
        }

        room.tick(now, dt);

        // No receivers just means nobody is watching yet.
        let _ = world_tx.send(room.snapshot(now));
    }

    info!(room_id = %room.id, ticks = room.tick, "world task stopped");
}

fn apply_event(room: &mut Room, ev: GameEvent, now: u64) {
    match ev {
        GameEvent::Join { player_id } => {
            if room.add_player(player_id) {
                info!(room_id = %room.id, player_id, "player joined");
            }
        }
        GameEvent::Leave { player_id } => {
            if room.remove_player(player_id) {
                info!(room_id = %room.id, player_id, "player left");
            }
        }
        GameEvent::Input { player_id, input } => {
            room.apply_input(player_id, input);
        }
        GameEvent::Ability { player_id, kind } => {
            if !room.use_ability(player_id, kind, now) {
                debug!(room_id = %room.id, player_id, ?kind, "ability ignored");
            }
        }
    }
}
