// Time-gated creation of monsters, powerups and neutrals.

use super::scaling::PopulationScale;
use crate::domain::geometry::clamp_to_bounds;
use crate::domain::room::{Room, alloc_id};
use crate::domain::state::{
    Behavior, EntityId, Monster, MonsterKind, Neutral, Powerup, PowerupKind, WorldBounds,
};
use rand::Rng;
use std::f32::consts::TAU;
use tracing::trace;

pub fn random_point(rng: &mut impl Rng, world: WorldBounds) -> (f32, f32) {
    (
        rng.random_range(0.0..=world.width),
        rng.random_range(0.0..=world.height),
    )
}

/// Runs the three spawn gates. Each gate fires only when its interval has elapsed since the
/// room's previous spawn of that category and the population cap leaves room.
pub fn run_spawns(room: &mut Room, now: u64) {
    // Nothing to spawn for until somebody (re)joins.
    if room.players.is_empty() {
        return;
    }

    let scale = PopulationScale::for_players(room.players.len());
    let tuning = room.tuning.spawn;

    let monster_interval = scale.monster_interval_ms(tuning.monster_interval_ms);
    if now.saturating_sub(room.last_monster_spawn) >= monster_interval
        && room.monsters.len() < scale.monster_cap
    {
        let kind = MonsterKind::SPAWNABLE[room.rng.random_range(0..MonsterKind::SPAWNABLE.len())];
        let (x, y) = random_point(&mut room.rng, room.world);
        let id = spawn_monster(room, kind, x, y, scale);
        room.last_monster_spawn = now;
        trace!(room_id = %room.id, monster_id = id, ?kind, "monster spawned");
    }

    if now.saturating_sub(room.last_powerup_spawn) >= tuning.powerup_interval_ms
        && room.powerups.len() < tuning.powerup_cap
    {
        spawn_powerup(room, now);
        room.last_powerup_spawn = now;
    }

    if now.saturating_sub(room.last_neutral_spawn) >= tuning.neutral_interval_ms
        && room.neutrals.len() < tuning.neutral_cap
    {
        spawn_neutral(room);
        room.last_neutral_spawn = now;
    }
}

/// Creates a monster of `kind` at (x, y) with stats scaled for `scale`.
pub fn spawn_monster(
    room: &mut Room,
    kind: MonsterKind,
    x: f32,
    y: f32,
    scale: PopulationScale,
) -> EntityId {
    let stats = scale.scale_stats(kind.base_stats());
    let seed = room.rng.random_range(0.0..TAU);
    let id = alloc_id(&mut room.next_entity_id);
    room.monsters.push(Monster {
        id,
        kind,
        x,
        y,
        vx: 0.0,
        vy: 0.0,
        radius: stats.radius,
        hp: stats.hp,
        max_hp: stats.hp,
        speed: stats.speed,
        behavior: Behavior::initial(kind, room.tuning.ai.dasher_windup_secs, seed),
        last_hit_by: None,
    });
    id
}

/// Splitter death byproduct: exactly two minis scattered around (x, y).
pub fn spawn_minis(room: &mut Room, x: f32, y: f32) {
    let scale = PopulationScale::for_players(room.players.len());
    let max_offset = room.tuning.ai.splitter_spawn_offset;
    for _ in 0..2 {
        let angle = room.rng.random_range(0.0..TAU);
        let offset = room.rng.random_range(0.0..=max_offset);
        let (mx, my) = clamp_to_bounds(
            x + angle.cos() * offset,
            y + angle.sin() * offset,
            room.world,
        );
        spawn_monster(room, MonsterKind::Mini, mx, my, scale);
    }
}

pub fn spawn_powerup(room: &mut Room, now: u64) -> EntityId {
    let tuning = room.tuning.spawn;
    let kind = PowerupKind::ALL[room.rng.random_range(0..PowerupKind::ALL.len())];
    let (x, y) = random_point(&mut room.rng, room.world);
    let id = alloc_id(&mut room.next_entity_id);
    room.powerups.push(Powerup {
        id,
        kind,
        x,
        y,
        radius: tuning.powerup_radius,
        expires_at: now + tuning.powerup_life_ms,
    });
    id
}

pub fn spawn_neutral(room: &mut Room) -> EntityId {
    let tuning = room.tuning.neutral;
    let (x, y) = random_point(&mut room.rng, room.world);
    let wander_timer = room
        .rng
        .random_range(tuning.wander_min_secs..=tuning.wander_max_secs);
    let id = alloc_id(&mut room.next_entity_id);
    room.neutrals.push(Neutral {
        id,
        x,
        y,
        vx: 0.0,
        vy: 0.0,
        radius: tuning.radius,
        hp: tuning.hp,
        max_hp: tuning.hp,
        wander_timer,
    });
    id
}
