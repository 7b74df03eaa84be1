// Wire protocol DTOs and conversions for public arena server messages.
// HTTP-only request/response shapes live next to their handlers in `net::internal`.

use crate::domain::snapshot::{
    BombSnapshot, BulletSnapshot, MonsterSnapshot, NeutralSnapshot, PlayerSnapshot,
    PowerupSnapshot,
};
use crate::domain::state::{Cooldowns, Effect, EffectKind, MonsterKind, PowerupKind};
use crate::domain::{
    AbilityKind, Difficulty, PlayerId, PlayerInput, RoomSettings, RoomSnapshot, WorldBounds,
};
use serde::{Deserialize, Serialize};

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    // Sent once when a join is accepted.
    Init(InitDto),
    // Join refused; the socket stays open so the client can try another room.
    JoinDenied { reason: String },
    // Snapshot of the room for a given tick.
    State(StateDto),
}

/// Messages the client sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    Join(JoinPayload),
    Input(PlayerInputDto),
    Ability(AbilityPayload),
}

/// Room selection for the join handshake. Missing fields fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinPayload {
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub settings: Option<SettingsRequestDto>,
}

pub const DEFAULT_ROOM_ID: &str = "default";

impl JoinPayload {
    /// Trimmed room id, or the shared default room when blank.
    pub fn room_id(&self) -> String {
        self.room_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(DEFAULT_ROOM_ID)
            .to_string()
    }

    pub fn settings(&self) -> RoomSettings {
        self.settings
            .as_ref()
            .map(SettingsRequestDto::to_settings)
            .unwrap_or_default()
    }
}

/// Requested room settings. Out-of-range player counts are clamped and unknown difficulty
/// labels fall back to normal.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRequestDto {
    #[serde(default)]
    pub max_players: Option<i64>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

impl SettingsRequestDto {
    pub fn to_settings(&self) -> RoomSettings {
        let max_players = self
            .max_players
            .map(|n| n.clamp(1, i64::from(RoomSettings::MAX_PLAYERS)) as u8)
            .unwrap_or(RoomSettings::MAX_PLAYERS);
        let difficulty = self
            .difficulty
            .as_deref()
            .map(parse_difficulty)
            .unwrap_or_default();
        RoomSettings::new(max_players, difficulty)
    }
}

fn parse_difficulty(label: &str) -> Difficulty {
    match label.trim().to_ascii_lowercase().as_str() {
        "easy" => Difficulty::Easy,
        "hard" => Difficulty::Hard,
        "insane" => Difficulty::Insane,
        _ => Difficulty::Normal,
    }
}

/// Latest intent flags. Missing booleans are false; a missing angle keeps the current facing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerInputDto {
    #[serde(default)]
    pub up: bool,
    #[serde(default)]
    pub down: bool,
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    #[serde(default)]
    pub shooting: bool,
    #[serde(default)]
    pub angle: Option<f32>,
}

impl From<PlayerInputDto> for PlayerInput {
    fn from(input: PlayerInputDto) -> Self {
        Self {
            up: input.up,
            down: input.down,
            left: input.left,
            right: input.right,
            shooting: input.shooting,
            angle: input.angle.filter(|a| a.is_finite()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbilityPayload {
    #[serde(rename = "type")]
    pub kind: AbilityKindDto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbilityKindDto {
    Burst,
    Dash,
    Grenade,
    Beam,
}

impl From<AbilityKindDto> for AbilityKind {
    fn from(kind: AbilityKindDto) -> Self {
        match kind {
            AbilityKindDto::Burst => AbilityKind::Burst,
            AbilityKindDto::Dash => AbilityKind::Dash,
            AbilityKindDto::Grenade => AbilityKind::Grenade,
            AbilityKindDto::Beam => AbilityKind::Beam,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorldDto {
    pub width: f32,
    pub height: f32,
}

impl From<WorldBounds> for WorldDto {
    fn from(world: WorldBounds) -> Self {
        Self {
            width: world.width,
            height: world.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDto {
    pub max_players: u8,
    pub difficulty: DifficultyDto,
}

/// Echoed with the variant names clients see in the settings schema (`"Normal"`), whatever
/// casing the join request used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DifficultyDto {
    Easy,
    Normal,
    Hard,
    Insane,
}

impl From<Difficulty> for DifficultyDto {
    fn from(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self::Easy,
            Difficulty::Normal => Self::Normal,
            Difficulty::Hard => Self::Hard,
            Difficulty::Insane => Self::Insane,
        }
    }
}

impl From<RoomSettings> for SettingsDto {
    fn from(settings: RoomSettings) -> Self {
        Self {
            max_players: settings.max_players,
            difficulty: settings.difficulty.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitDto {
    pub id: PlayerId,
    pub world: WorldDto,
    pub room_id: String,
    pub settings: SettingsDto,
}

/// Snapshot of a room sent to clients on each tick. Positions and radii are rounded to whole
/// units to keep frames small.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDto {
    pub tick: u64,
    pub server_time: u64,
    pub room_id: String,
    pub world: WorldDto,
    pub settings: SettingsDto,
    pub players: Vec<PlayerDto>,
    pub bullets: Vec<BulletDto>,
    pub monsters: Vec<MonsterDto>,
    pub neutrals: Vec<NeutralDto>,
    pub powerups: Vec<PowerupDto>,
    pub bombs: Vec<BombDto>,
    pub effects: Vec<EffectDto>,
}

fn round(v: f32) -> i32 {
    v.round() as i32
}

impl From<&RoomSnapshot> for StateDto {
    fn from(s: &RoomSnapshot) -> Self {
        Self {
            tick: s.tick,
            server_time: s.server_time,
            room_id: s.room_id.to_string(),
            world: s.world.into(),
            settings: s.settings.into(),
            players: s.players.iter().map(PlayerDto::from).collect(),
            bullets: s.bullets.iter().map(BulletDto::from).collect(),
            monsters: s.monsters.iter().map(MonsterDto::from).collect(),
            neutrals: s.neutrals.iter().map(NeutralDto::from).collect(),
            powerups: s.powerups.iter().map(PowerupDto::from).collect(),
            bombs: s.bombs.iter().map(BombDto::from).collect(),
            effects: s.effects.iter().map(EffectDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CooldownsDto {
    pub burst: u64,
    pub dash: u64,
    pub grenade: u64,
    pub beam: u64,
}

impl From<Cooldowns> for CooldownsDto {
    fn from(c: Cooldowns) -> Self {
        Self {
            burst: c.burst,
            dash: c.dash,
            grenade: c.grenade,
            beam: c.beam,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    pub id: PlayerId,
    pub x: i32,
    pub y: i32,
    pub r: i32,
    pub dir_x: f32,
    pub dir_y: f32,
    pub kills: u32,
    pub shield: bool,
    pub invulnerable: bool,
    pub dashing: bool,
    pub multishot: u32,
    pub cooldowns: CooldownsDto,
}

impl From<&PlayerSnapshot> for PlayerDto {
    fn from(p: &PlayerSnapshot) -> Self {
        Self {
            id: p.id,
            x: round(p.x),
            y: round(p.y),
            r: round(p.radius),
            dir_x: p.dir_x,
            dir_y: p.dir_y,
            kills: p.kills,
            shield: p.shielded,
            invulnerable: p.invulnerable,
            dashing: p.dashing,
            multishot: p.multishot,
            cooldowns: p.cooldowns.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletDto {
    pub id: u64,
    pub owner_id: PlayerId,
    pub x: i32,
    pub y: i32,
    pub r: i32,
}

impl From<&BulletSnapshot> for BulletDto {
    fn from(b: &BulletSnapshot) -> Self {
        Self {
            id: b.id,
            owner_id: b.owner_id,
            x: round(b.x),
            y: round(b.y),
            r: round(b.radius),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterDto {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub x: i32,
    pub y: i32,
    pub r: i32,
    pub hp: i32,
    pub max_hp: i32,
}

fn monster_label(kind: MonsterKind) -> &'static str {
    match kind {
        MonsterKind::Chaser => "chaser",
        MonsterKind::Dasher => "dasher",
        MonsterKind::Orbiter => "orbiter",
        MonsterKind::Splitter => "splitter",
        MonsterKind::Sniper => "sniper",
        MonsterKind::Mini => "mini",
    }
}

impl From<&MonsterSnapshot> for MonsterDto {
    fn from(m: &MonsterSnapshot) -> Self {
        Self {
            id: m.id,
            kind: monster_label(m.kind),
            x: round(m.x),
            y: round(m.y),
            r: round(m.radius),
            hp: m.hp,
            max_hp: m.max_hp,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NeutralDto {
    pub id: u64,
    pub x: i32,
    pub y: i32,
    pub r: i32,
    pub hp: i32,
    pub max_hp: i32,
}

impl From<&NeutralSnapshot> for NeutralDto {
    fn from(n: &NeutralSnapshot) -> Self {
        Self {
            id: n.id,
            x: round(n.x),
            y: round(n.y),
            r: round(n.radius),
            hp: n.hp,
            max_hp: n.max_hp,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerupDto {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub x: i32,
    pub y: i32,
    pub r: i32,
    pub expires_at: u64,
}

fn powerup_label(kind: PowerupKind) -> &'static str {
    match kind {
        PowerupKind::Speed => "speed",
        PowerupKind::FireRate => "firerate",
        PowerupKind::Multishot => "multishot",
        PowerupKind::Heal => "heal",
        PowerupKind::Shield => "shield",
    }
}

impl From<&PowerupSnapshot> for PowerupDto {
    fn from(p: &PowerupSnapshot) -> Self {
        Self {
            id: p.id,
            kind: powerup_label(p.kind),
            x: round(p.x),
            y: round(p.y),
            r: round(p.radius),
            expires_at: p.expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BombDto {
    pub id: u64,
    pub owner_id: PlayerId,
    pub x: i32,
    pub y: i32,
    pub r: i32,
    pub explode_at: u64,
}

impl From<&BombSnapshot> for BombDto {
    fn from(b: &BombSnapshot) -> Self {
        Self {
            id: b.id,
            owner_id: b.owner_id,
            x: round(b.x),
            y: round(b.y),
            r: round(b.radius),
            explode_at: b.explode_at,
        }
    }
}

/// Visual effect, forwarded as-is.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectDto {
    #[serde(flatten)]
    pub kind: EffectKindDto,
    pub expires_at: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EffectKindDto {
    Explosion {
        x: f32,
        y: f32,
        radius: f32,
    },
    Beam {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        thickness: f32,
    },
    DashTrail {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
}

impl From<&Effect> for EffectDto {
    fn from(e: &Effect) -> Self {
        let kind = match e.kind {
            EffectKind::Explosion { x, y, radius } => EffectKindDto::Explosion { x, y, radius },
            EffectKind::Beam {
                x1,
                y1,
                x2,
                y2,
                thickness,
            } => EffectKindDto::Beam {
                x1,
                y1,
                x2,
                y2,
                thickness,
            },
            EffectKind::DashTrail { x1, y1, x2, y2 } => EffectKindDto::DashTrail { x1, y1, x2, y2 },
        };
        Self {
            kind,
            expires_at: e.expires_at,
        }
    }
}
