// Domain-level simulation entities, room settings and player intent.

pub type PlayerId = u64;
pub type EntityId = u64;

/// Playable area; positions live in `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            width: 2400.0,
            height: 1800.0,
        }
    }
}

/// Difficulty label chosen by the room creator. Stored and echoed only; scaling is driven by
/// player count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Insane,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomSettings {
    pub max_players: u8,
    pub difficulty: Difficulty,
}

impl RoomSettings {
    pub const MAX_PLAYERS: u8 = 4;

    /// Builds settings, clamping `max_players` into `1..=4`.
    pub fn new(max_players: u8, difficulty: Difficulty) -> Self {
        Self {
            max_players: max_players.clamp(1, Self::MAX_PLAYERS),
            difficulty,
        }
    }
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self::new(Self::MAX_PLAYERS, Difficulty::Normal)
    }
}

/// Latest intent reported by a client. Last value wins.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub shooting: bool,
    /// Aim angle in radians; `None` keeps the current facing.
    pub angle: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbilityKind {
    Burst,
    Dash,
    Grenade,
    Beam,
}

/// Absolute timestamps at which each ability becomes usable again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cooldowns {
    pub burst: u64,
    pub dash: u64,
    pub grenade: u64,
    pub beam: u64,
}

impl Cooldowns {
    pub fn ready_at(&self, kind: AbilityKind) -> u64 {
        match kind {
            AbilityKind::Burst => self.burst,
            AbilityKind::Dash => self.dash,
            AbilityKind::Grenade => self.grenade,
            AbilityKind::Beam => self.beam,
        }
    }

    pub fn set_ready_at(&mut self, kind: AbilityKind, at: u64) {
        match kind {
            AbilityKind::Burst => self.burst = at,
            AbilityKind::Dash => self.dash = at,
            AbilityKind::Grenade => self.grenade = at,
            AbilityKind::Beam => self.beam = at,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Temporary stat changes from powerups. Each buff carries its own expiry and is reverted by
/// `reconcile` once that time has passed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Buffs {
    pub speed: f32,
    pub speed_until: u64,
    pub fire_rate: f32,
    pub fire_rate_until: u64,
    pub multishot: u32,
    pub multishot_until: u64,
    pub shield_until: u64,
}

impl Default for Buffs {
    fn default() -> Self {
        Self {
            speed: 1.0,
            speed_until: 0,
            fire_rate: 1.0,
            fire_rate_until: 0,
            multishot: 1,
            multishot_until: 0,
            shield_until: 0,
        }
    }
}

impl Buffs {
    pub fn reconcile(&mut self, now: u64) {
        if now >= self.speed_until {
            self.speed = 1.0;
        }
        if now >= self.fire_rate_until {
            self.fire_rate = 1.0;
        }
        if now >= self.multishot_until {
            self.multishot = 1;
        }
    }

    pub fn shielded(&self, now: u64) -> bool {
        now < self.shield_until
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub x: f32,
    pub y: f32,
    // Facing unit vector from the last finite aim angle.
    pub dir_x: f32,
    pub dir_y: f32,
    pub input: PlayerInput,
    pub last_shot_at: Option<u64>,
    pub kills: u32,
    pub radius: f32,
    pub buffs: Buffs,
    pub cooldowns: Cooldowns,
    pub dash_until: u64,
    pub invulnerable_until: u64,
}

impl Player {
    pub fn new(id: PlayerId, x: f32, y: f32, radius: f32) -> Self {
        Self {
            id,
            x,
            y,
            dir_x: 1.0,
            dir_y: 0.0,
            input: PlayerInput::default(),
            last_shot_at: None,
            kills: 0,
            radius,
            buffs: Buffs::default(),
            cooldowns: Cooldowns::default(),
            dash_until: 0,
            invulnerable_until: 0,
        }
    }

    /// Stores the intent; a finite angle also updates facing.
    pub fn apply_input(&mut self, input: PlayerInput) {
        if let Some(angle) = input.angle.filter(|a| a.is_finite()) {
            self.dir_x = angle.cos();
            self.dir_y = angle.sin();
        }
        self.input = input;
    }

    pub fn is_dashing(&self, now: u64) -> bool {
        now < self.dash_until
    }

    pub fn is_invulnerable(&self, now: u64) -> bool {
        now < self.invulnerable_until
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonsterKind {
    Chaser,
    Dasher,
    Orbiter,
    Splitter,
    Sniper,
    Mini,
}

impl MonsterKind {
    /// Kinds the spawner may create directly; minis only come from splitters.
    pub const SPAWNABLE: [MonsterKind; 5] = [
        MonsterKind::Chaser,
        MonsterKind::Dasher,
        MonsterKind::Orbiter,
        MonsterKind::Splitter,
        MonsterKind::Sniper,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DasherMode {
    Windup,
    Dash,
}

/// Per-kind AI state. Each variant holds only what its state machine needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
    Chaser,
    Dasher {
        mode: DasherMode,
        // Seconds left in the current mode.
        timer: f32,
        // Direction frozen at the windup -> dash transition.
        dx: f32,
        dy: f32,
    },
    Orbiter {
        seed: f32,
    },
    Splitter {
        // Seconds until the next pulse.
        cooldown: f32,
    },
    Sniper,
    Mini,
}

impl Behavior {
    /// Fresh behavior state for a newly created monster of `kind`.
    pub fn initial(kind: MonsterKind, windup_secs: f32, seed: f32) -> Self {
        match kind {
            MonsterKind::Chaser => Behavior::Chaser,
            MonsterKind::Dasher => Behavior::Dasher {
                mode: DasherMode::Windup,
                timer: windup_secs,
                dx: 0.0,
                dy: 0.0,
            },
            MonsterKind::Orbiter => Behavior::Orbiter { seed },
            MonsterKind::Splitter => Behavior::Splitter { cooldown: 0.0 },
            MonsterKind::Sniper => Behavior::Sniper,
            MonsterKind::Mini => Behavior::Mini,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Monster {
    pub id: EntityId,
    pub kind: MonsterKind,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub hp: i32,
    pub max_hp: i32,
    // Population-scaled speed in units per second.
    pub speed: f32,
    pub behavior: Behavior,
    // Most recent damaging player; receives the kill credit.
    pub last_hit_by: Option<PlayerId>,
}

impl Monster {
    /// Applies damage, keeping `hp` within `0..=max_hp`.
    pub fn take_damage(&mut self, amount: i32, attacker: Option<PlayerId>) {
        self.hp = (self.hp - amount).clamp(0, self.max_hp);
        if attacker.is_some() {
            self.last_hit_by = attacker;
        }
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }
}

#[derive(Debug, Clone)]
pub struct Bullet {
    pub id: EntityId,
    pub owner_id: PlayerId,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub damage: i32,
    pub created_at: u64,
}

#[derive(Debug, Clone)]
pub struct Neutral {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub hp: i32,
    pub max_hp: i32,
    // Seconds until the next wander decision.
    pub wander_timer: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerupKind {
    Speed,
    FireRate,
    Multishot,
    Heal,
    Shield,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 5] = [
        PowerupKind::Speed,
        PowerupKind::FireRate,
        PowerupKind::Multishot,
        PowerupKind::Heal,
        PowerupKind::Shield,
    ];
}

#[derive(Debug, Clone)]
pub struct Powerup {
    pub id: EntityId,
    pub kind: PowerupKind,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub expires_at: u64,
}

#[derive(Debug, Clone)]
pub struct Bomb {
    pub id: EntityId,
    pub owner_id: PlayerId,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub explode_at: u64,
    pub radius: f32,
    pub damage: i32,
}

/// What a transient effect looks like; carries no gameplay meaning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectKind {
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

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Effect {
    pub kind: EffectKind,
    pub expires_at: u64,
}
