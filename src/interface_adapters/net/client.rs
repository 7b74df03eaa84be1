use crate::domain::{PlayerId, PlayerInput, RoomSnapshot};
use crate::interface_adapters::protocol::{
    ClientMessage, InitDto, JoinPayload, ServerMessage, StateDto,
};
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::utils::rng::conn_id;
use crate::use_cases::{GameEvent, JoinAccepted, RoomHandle, RoomRegistry};

use axum::{
    Error,
    extract::{
        State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures::SinkExt;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::timeout;
use tracing::{Instrument, Span, debug, error, info, info_span, warn};

/// Why a connection ended early. Only used for logging; the socket is gone either way.
#[derive(Debug)]
enum NetError {
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
    RoomQueueClosed,
    FramesClosed,
    ProtocolViolation,
    JoinTimeout,
    ClosedBeforeJoin,
}

impl From<axum::Error> for NetError {
    fn from(e: axum::Error) -> Self {
        NetError::Ws(e)
    }
}

const LOG_THROTTLE: Duration = Duration::from_secs(2);
const MAX_INVALID_JSON: u32 = 10;
const JOIN_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

const TOO_MANY_INVALID: &str = "too many invalid messages";
const BINARY_UNSUPPORTED: &str = "binary messages not supported";

/// Turns each room snapshot into a `state` frame once and fans the shared bytes out to every
/// connection in the room.
pub async fn room_snapshot_serializer(
    mut snapshots: broadcast::Receiver<RoomSnapshot>,
    frames_tx: broadcast::Sender<Utf8Bytes>,
    latest_frame_tx: watch::Sender<Utf8Bytes>,
) {
    loop {
        let snapshot = match snapshots.recv().await {
            Ok(snapshot) => snapshot,
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(missed = n, "snapshot serializer lagged; skipping to latest");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!("room snapshots closed; serializer exiting");
                return;
            }
        };

        let frame = match serde_json::to_string(&ServerMessage::State(StateDto::from(&snapshot)))
        {
            Ok(txt) => Utf8Bytes::from(txt),
            Err(e) => {
                error!(room_id = %snapshot.room_id, error = ?e, "failed to serialize room snapshot");
                continue;
            }
        };

        // Lagging connections resync from the watch value.
        latest_frame_tx.send_replace(frame.clone());
        let _ = frames_tx.send(frame);
    }
}

pub fn spawn_room_serializer(room: &RoomHandle) {
    tokio::spawn(room_snapshot_serializer(
        room.world_tx.subscribe(),
        room.frames_tx.clone(),
        room.latest_frame_tx.clone(),
    ));
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let room_registry = state.room_registry.clone();
    ws.on_upgrade(move |socket| {
        // Room and player are unknown until the join handshake completes.
        let span = info_span!(
            "conn",
            conn_id = conn_id(),
            room_id = tracing::field::Empty,
            player_id = tracing::field::Empty
        );
        handle_socket(socket, room_registry, span.clone()).instrument(span)
    })
}

async fn handle_socket(mut socket: WebSocket, room_registry: Arc<RoomRegistry>, span: Span) {
    let mut ctx = match bootstrap_connection(&mut socket, room_registry).await {
        Ok(ctx) => ctx,
        Err(NetError::ClosedBeforeJoin) => {
            info!("client left before joining a room");
            return;
        }
        Err(e) => {
            warn!(error = ?e, "join handshake failed");
            return;
        }
    };

    span.record("room_id", &*ctx.room.room_id);
    span.record("player_id", ctx.player_id);
    info!("client joined room");

    if let Err(e) = run_client_loop(&mut socket, &mut ctx).await {
        warn!(error = ?e, "client loop exited with error");
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<usize, NetError> {
    let txt = serde_json::to_string(msg).map_err(NetError::Serialization)?;
    let len = txt.len();
    socket.send(Message::Text(txt.into())).await?;
    Ok(len)
}

async fn close_with(socket: &mut WebSocket, code: u16, reason: &'static str) {
    let frame = CloseFrame {
        code,
        reason: reason.into(),
    };
    if socket.send(Message::Close(Some(frame))).await.is_ok() {
        let _ = socket.close().await;
    }
}

/// Rate limiter for repetitive warnings from a single connection.
struct LogGate(Instant);

impl LogGate {
    fn open() -> Self {
        Self(Instant::now() - LOG_THROTTLE)
    }

    fn allow(&mut self) -> bool {
        if self.0.elapsed() < LOG_THROTTLE {
            return false;
        }
        self.0 = Instant::now();
        true
    }
}

struct LogGates {
    queue_full: LogGate,
    frame_lag: LogGate,
    bad_message: LogGate,
}

impl LogGates {
    fn new() -> Self {
        Self {
            queue_full: LogGate::open(),
            frame_lag: LogGate::open(),
            bad_message: LogGate::open(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct ConnStats {
    msgs_in: u64,
    msgs_out: u64,
    bytes_in: u64,
    bytes_out: u64,
    invalid_json: u32,
    resyncs: u64,
}

impl ConnStats {
    fn received(&mut self, len: usize) {
        self.msgs_in += 1;
        self.bytes_in += len as u64;
    }

    fn sent(&mut self, len: usize) {
        self.msgs_out += 1;
        self.bytes_out += len as u64;
    }
}

/// Everything a joined connection needs for the rest of its life.
struct ConnCtx {
    player_id: PlayerId,
    room: RoomHandle,
    room_registry: Arc<RoomRegistry>,
    frames_rx: broadcast::Receiver<Utf8Bytes>,
    latest_frame_rx: watch::Receiver<Utf8Bytes>,
    stats: ConnStats,
    gates: LogGates,
    close_frame: Option<CloseFrame>,
}

async fn bootstrap_connection(
    socket: &mut WebSocket,
    room_registry: Arc<RoomRegistry>,
) -> Result<ConnCtx, NetError> {
    let mut stats = ConnStats::default();

    let handshake = timeout(
        JOIN_HANDSHAKE_TIMEOUT,
        read_join_handshake(socket, &room_registry, &mut stats),
    )
    .await;
    let JoinAccepted {
        player_id, room, ..
    } = match handshake {
        Ok(result) => result?,
        Err(_) => {
            close_with(socket, close_code::POLICY, "join timeout").await;
            return Err(NetError::JoinTimeout);
        }
    };

    // Subscribe before init so the first state frame after it is not missed.
    let frames_rx = room.frames_tx.subscribe();
    let latest_frame_rx = room.latest_frame_tx.subscribe();

    let init = ServerMessage::Init(InitDto {
        id: player_id,
        world: room.world.into(),
        room_id: room.room_id.to_string(),
        settings: room.settings.into(),
    });
    match send_message(socket, &init).await {
        Ok(len) => stats.sent(len),
        Err(err) => {
            // The world task already has the player; take it back out.
            room_registry.leave(&room.room_id, player_id).await;
            return Err(err);
        }
    }

    Ok(ConnCtx {
        player_id,
        room,
        room_registry,
        frames_rx,
        latest_frame_rx,
        stats,
        gates: LogGates::new(),
        close_frame: None,
    })
}

// Loops until a join is accepted. Denied joins are answered and the client may retry.
async fn read_join_handshake(
    socket: &mut WebSocket,
    room_registry: &Arc<RoomRegistry>,
    stats: &mut ConnStats,
) -> Result<JoinAccepted, NetError> {
    loop {
        let Some(incoming) = socket.recv().await else {
            return Err(NetError::ClosedBeforeJoin);
        };

        let text = match incoming? {
            Message::Text(text) => text,
            Message::Binary(_) => {
                close_with(socket, close_code::UNSUPPORTED, BINARY_UNSUPPORTED).await;
                return Err(NetError::ProtocolViolation);
            }
            Message::Ping(_) | Message::Pong(_) => continue,
            Message::Close(_) => return Err(NetError::ClosedBeforeJoin),
        };
        stats.received(text.len());

        let payload: JoinPayload = match serde_json::from_str::<ClientMessage>(&text) {
            Ok(ClientMessage::Join(payload)) => payload,
            Ok(_) => {
                debug!("message before join ignored");
                continue;
            }
            Err(_) => {
                stats.invalid_json += 1;
                if stats.invalid_json > MAX_INVALID_JSON {
                    close_with(socket, close_code::POLICY, TOO_MANY_INVALID).await;
                    return Err(NetError::ProtocolViolation);
                }
                continue;
            }
        };

        let room_id = payload.room_id();
        match room_registry.join(&room_id, payload.settings()).await {
            Ok(accepted) => {
                if accepted.created {
                    spawn_room_serializer(&accepted.room);
                }
                return Ok(accepted);
            }
            Err(err) => {
                info!(room_id = %room_id, reason = err.reason(), "join denied");
                let denied = ServerMessage::JoinDenied {
                    reason: err.reason().to_string(),
                };
                let len = send_message(socket, &denied).await?;
                stats.sent(len);
            }
        }
    }
}

enum LoopControl {
    Continue,
    Disconnect,
}

// Never waits on the room: a full queue drops the event.
fn enqueue_event(
    player_id: PlayerId,
    input_tx: &mpsc::Sender<GameEvent>,
    event: GameEvent,
    gate: &mut LogGate,
) -> Result<LoopControl, NetError> {
    match input_tx.try_send(event) {
        Ok(()) => Ok(LoopControl::Continue),
        Err(mpsc::error::TrySendError::Full(_)) => {
            if gate.allow() {
                warn!(player_id, "room event queue full; dropping event");
            }
            Ok(LoopControl::Continue)
        }
        Err(mpsc::error::TrySendError::Closed(_)) => Err(NetError::RoomQueueClosed),
    }
}

async fn run_client_loop(socket: &mut WebSocket, ctx: &mut ConnCtx) -> Result<(), NetError> {
    let player_id = ctx.player_id;
    let ConnCtx {
        room,
        room_registry,
        frames_rx,
        latest_frame_rx,
        stats,
        gates,
        close_frame,
        ..
    } = ctx;

    let mut fatal: Option<NetError> = None;

    loop {
        let control = tokio::select! {
            incoming = socket.recv() => {
                handle_incoming_ws(incoming, player_id, &room.input_tx, stats, gates, close_frame)
            }

            frame = frames_rx.recv() => match frame {
                Ok(bytes) => Ok(forward_frame(bytes, socket, stats).await),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    if gates.frame_lag.allow() {
                        warn!(missed = n, "state frames lagged; sending latest");
                    }
                    let latest = latest_frame_rx.borrow().clone();
                    if latest.is_empty() {
                        Ok(LoopControl::Continue)
                    } else {
                        stats.resyncs += 1;
                        Ok(forward_frame(latest, socket, stats).await)
                    }
                }
                Err(broadcast::error::RecvError::Closed) => Err(NetError::FramesClosed),
            },
        };

        match control {
            Ok(LoopControl::Continue) => continue,
            Ok(LoopControl::Disconnect) => {}
            Err(e) => fatal = Some(e),
        }

        if let Some(frame) = close_frame.take() {
            let _ = socket.send(Message::Close(Some(frame))).await;
        }
        if let Err(err) = socket.close().await {
            debug!(error = ?err, "socket close error");
        }
        break;
    }

    // Membership is released right away; room teardown is deferred by the registry.
    room_registry.leave(&room.room_id, player_id).await;

    debug!(
        msgs_in = stats.msgs_in,
        msgs_out = stats.msgs_out,
        bytes_in = stats.bytes_in,
        bytes_out = stats.bytes_out,
        invalid_json = stats.invalid_json,
        resyncs = stats.resyncs,
        "connection stats"
    );
    info!("client left room");

    fatal.map_or(Ok(()), Err)
}

fn handle_incoming_ws(
    incoming: Option<Result<Message, Error>>,
    player_id: PlayerId,
    input_tx: &mpsc::Sender<GameEvent>,
    stats: &mut ConnStats,
    gates: &mut LogGates,
    close_frame: &mut Option<CloseFrame>,
) -> Result<LoopControl, NetError> {
    let text = match incoming {
        Some(Ok(Message::Text(text))) => text,
        Some(Ok(Message::Binary(_))) => {
            *close_frame = Some(CloseFrame {
                code: close_code::UNSUPPORTED,
                reason: BINARY_UNSUPPORTED.into(),
            });
            return Ok(LoopControl::Disconnect);
        }
        Some(Ok(Message::Ping(_) | Message::Pong(_))) => return Ok(LoopControl::Continue),
        Some(Ok(Message::Close(_))) | None => return Ok(LoopControl::Disconnect),
        Some(Err(e)) => {
            warn!(error = %e, "websocket recv error");
            return Ok(LoopControl::Disconnect);
        }
    };
    stats.received(text.len());

    match serde_json::from_str::<ClientMessage>(&text) {
        Ok(ClientMessage::Join(_)) => {
            // Already in a room; switching requires a new connection.
            if gates.bad_message.allow() {
                warn!("duplicate join ignored");
            }
            Ok(LoopControl::Continue)
        }
        Ok(ClientMessage::Input(input)) => {
            let input: PlayerInput = input.into();
            enqueue_event(
                player_id,
                input_tx,
                GameEvent::Input { player_id, input },
                &mut gates.queue_full,
            )
        }
        Ok(ClientMessage::Ability(ability)) => enqueue_event(
            player_id,
            input_tx,
            GameEvent::Ability {
                player_id,
                kind: ability.kind.into(),
            },
            &mut gates.queue_full,
        ),
        Err(parse_err) => {
            stats.invalid_json += 1;
            if gates.bad_message.allow() {
                warn!(bytes = text.len(), error = %parse_err, "unparseable client message");
            }
            if stats.invalid_json <= MAX_INVALID_JSON {
                return Ok(LoopControl::Continue);
            }
            *close_frame = Some(CloseFrame {
                code: close_code::POLICY,
                reason: TOO_MANY_INVALID.into(),
            });
            Ok(LoopControl::Disconnect)
        }
    }
}

async fn forward_frame(frame: Utf8Bytes, socket: &mut WebSocket, stats: &mut ConnStats) -> LoopControl {
    let len = frame.len();
    match socket.send(Message::Text(frame)).await {
        Ok(()) => {
            stats.sent(len);
            LoopControl::Continue
        }
        Err(err) => {
            debug!(error = ?err, "failed to send state frame");
            LoopControl::Disconnect
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_gate_fires_then_it_stays_closed_for_the_throttle_window() {
        let mut gate = LogGate::open();
        assert!(gate.allow());
        assert!(!gate.allow());
    }

    #[tokio::test]
    async fn when_snapshot_is_published_then_serializer_emits_state_frame() {
        use crate::domain::{Room, RoomSettings, WorldBounds};
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let (world_tx, world_rx) = broadcast::channel(4);
        let (frames_tx, mut frames_rx) = broadcast::channel(4);
        let (latest_tx, latest_rx) = watch::channel(Utf8Bytes::from(""));
        let task = tokio::spawn(room_snapshot_serializer(world_rx, frames_tx, latest_tx));

        let mut room = Room::new(
            Arc::from("frames"),
            RoomSettings::default(),
            WorldBounds::default(),
            1_000,
            StdRng::seed_from_u64(1),
        );
        room.add_player(3);
        world_tx.send(room.snapshot(1_000)).expect("subscriber");

        let frame = frames_rx.recv().await.expect("frame");
        let value: serde_json::Value = serde_json::from_str(&frame).expect("json");
        assert_eq!(value["type"], "state");
        assert_eq!(value["data"]["roomId"], "frames");
        assert_eq!(value["data"]["players"][0]["id"], 3);
        assert_eq!(*latest_rx.borrow(), frame);

        drop(world_tx);
        task.await.expect("serializer exits");
    }
}
