// Read-only copies of room state published after every tick.

use super::room::Room;
use super::state::{
    Bomb, Bullet, Cooldowns, Effect, EntityId, Monster, MonsterKind, Neutral, Player, PlayerId,
    Powerup, PowerupKind, RoomSettings, WorldBounds,
};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub dir_x: f32,
    pub dir_y: f32,
    pub kills: u32,
    pub shielded: bool,
    pub invulnerable: bool,
    pub dashing: bool,
    pub multishot: u32,
    pub cooldowns: Cooldowns,
}

impl PlayerSnapshot {
    pub fn capture(p: &Player, now: u64) -> Self {
        Self {
            id: p.id,
            x: p.x,
            y: p.y,
            radius: p.radius,
            dir_x: p.dir_x,
            dir_y: p.dir_y,
            kills: p.kills,
            shielded: p.buffs.shielded(now),
            invulnerable: p.is_invulnerable(now),
            dashing: p.is_dashing(now),
            multishot: p.buffs.multishot,
            cooldowns: p.cooldowns,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BulletSnapshot {
    pub id: EntityId,
    pub owner_id: PlayerId,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl From<&Bullet> for BulletSnapshot {
    fn from(b: &Bullet) -> Self {
        Self {
            id: b.id,
            owner_id: b.owner_id,
            x: b.x,
            y: b.y,
            radius: b.radius,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MonsterSnapshot {
    pub id: EntityId,
    pub kind: MonsterKind,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub hp: i32,
    pub max_hp: i32,
}

impl From<&Monster> for MonsterSnapshot {
    fn from(m: &Monster) -> Self {
        Self {
            id: m.id,
            kind: m.kind,
            x: m.x,
            y: m.y,
            radius: m.radius,
            hp: m.hp,
            max_hp: m.max_hp,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NeutralSnapshot {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub hp: i32,
    pub max_hp: i32,
}

impl From<&Neutral> for NeutralSnapshot {
    fn from(n: &Neutral) -> Self {
        Self {
            id: n.id,
            x: n.x,
            y: n.y,
            radius: n.radius,
            hp: n.hp,
            max_hp: n.max_hp,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PowerupSnapshot {
    pub id: EntityId,
    pub kind: PowerupKind,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub expires_at: u64,
}

impl From<&Powerup> for PowerupSnapshot {
    fn from(p: &Powerup) -> Self {
        Self {
            id: p.id,
            kind: p.kind,
            x: p.x,
            y: p.y,
            radius: p.radius,
            expires_at: p.expires_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BombSnapshot {
    pub id: EntityId,
    pub owner_id: PlayerId,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub explode_at: u64,
}

impl From<&Bomb> for BombSnapshot {
    fn from(b: &Bomb) -> Self {
        Self {
            id: b.id,
            owner_id: b.owner_id,
            x: b.x,
            y: b.y,
            radius: b.radius,
            explode_at: b.explode_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoomSnapshot {
    pub room_id: Arc<str>,
    pub tick: u64,
    pub server_time: u64,
    pub world: WorldBounds,
    pub settings: RoomSettings,
    pub players: Vec<PlayerSnapshot>,
    pub bullets: Vec<BulletSnapshot>,
    pub monsters: Vec<MonsterSnapshot>,
    pub neutrals: Vec<NeutralSnapshot>,
    pub powerups: Vec<PowerupSnapshot>,
    pub bombs: Vec<BombSnapshot>,
    pub effects: Vec<Effect>,
}

impl RoomSnapshot {
    pub fn capture(room: &Room, now: u64) -> Self {
        Self {
            room_id: room.id.clone(),
            tick: room.tick,
            server_time: now,
            world: room.world,
            settings: room.settings,
            players: room
                .players
                .iter()
                .map(|p| PlayerSnapshot::capture(p, now))
                .collect(),
            bullets: room.bullets.iter().map(BulletSnapshot::from).collect(),
            monsters: room
                .monsters
                .iter()
                .filter(|m| !m.is_dead())
                .map(MonsterSnapshot::from)
                .collect(),
            neutrals: room.neutrals.iter().map(NeutralSnapshot::from).collect(),
            powerups: room.powerups.iter().map(PowerupSnapshot::from).collect(),
            bombs: room.bombs.iter().map(BombSnapshot::from).collect(),
            effects: room.effects.clone(),
        }
    }
}
