// Player-triggered abilities. Each one is gated by its own ready-at timestamp.

use super::projectiles::{fan_angles, spawn_bullet};
use crate::domain::geometry::{clamp_to_bounds, point_segment_distance};
use crate::domain::room::{Room, alloc_id};
use crate::domain::state::{AbilityKind, Bomb, Effect, EffectKind, Player, PlayerId};
use tracing::trace;

/// Fires `kind` for `player_id` if it's off cooldown.
///
/// Returns false without touching any state for unknown players or while the ability is still
/// cooling down.
pub fn activate(room: &mut Room, player_id: PlayerId, kind: AbilityKind, now: u64) -> bool {
    let cfg = room.tuning.ability;
    let Some(player) = room.player_mut(player_id) else {
        return false;
    };
    if now < player.cooldowns.ready_at(kind) {
        return false;
    }

    let cooldown = match kind {
        AbilityKind::Burst => cfg.burst_cooldown_ms,
        AbilityKind::Dash => cfg.dash_cooldown_ms,
        AbilityKind::Grenade => cfg.grenade_cooldown_ms,
        AbilityKind::Beam => cfg.beam_cooldown_ms,
    };
    player.cooldowns.set_ready_at(kind, now + cooldown);

    match kind {
        AbilityKind::Burst => burst(room, player_id, now),
        AbilityKind::Dash => dash(room, player_id, now),
        AbilityKind::Grenade => grenade(room, player_id, now),
        AbilityKind::Beam => beam(room, player_id, now),
    }
    trace!(room_id = %room.id, player_id, ?kind, "ability used");
    true
}

fn caster(room: &Room, player_id: PlayerId) -> Option<Player> {
    room.player(player_id).cloned()
}

fn burst(room: &mut Room, player_id: PlayerId, now: u64) {
    let Some(p) = caster(room, player_id) else {
        return;
    };
    let cfg = room.tuning.ability;
    let projectile = room.tuning.projectile;

    let center = p.dir_y.atan2(p.dir_x);
    for angle in fan_angles(center, cfg.burst_spread, cfg.burst_count) {
        spawn_bullet(
            &mut room.bullets,
            &mut room.next_entity_id,
            &p,
            angle,
            projectile.speed * cfg.burst_speed_multiplier,
            projectile.radius + cfg.burst_extra_radius,
            projectile.damage,
            now,
        );
    }
}

fn dash(room: &mut Room, player_id: PlayerId, now: u64) {
    let cfg = room.tuning.ability;
    let world = room.world;
    let Some(p) = room.player_mut(player_id) else {
        return;
    };

    let (x1, y1) = (p.x, p.y);
    (p.x, p.y) = clamp_to_bounds(
        p.x + p.dir_x * cfg.dash_distance,
        p.y + p.dir_y * cfg.dash_distance,
        world,
    );
    p.invulnerable_until = p.invulnerable_until.max(now + cfg.dash_invulnerable_ms);
    p.dash_until = now + cfg.dash_boost_ms;
    let (x2, y2) = (p.x, p.y);

    room.effects.push(Effect {
        kind: EffectKind::DashTrail { x1, y1, x2, y2 },
        expires_at: now + cfg.dash_trail_ms,
    });
}

fn grenade(room: &mut Room, player_id: PlayerId, now: u64) {
    let Some(p) = caster(room, player_id) else {
        return;
    };
    let cfg = room.tuning.ability;

    let id = alloc_id(&mut room.next_entity_id);
    room.bombs.push(Bomb {
        id,
        owner_id: p.id,
        x: p.x + p.dir_x * cfg.grenade_offset,
        y: p.y + p.dir_y * cfg.grenade_offset,
        vx: p.dir_x * cfg.grenade_speed,
        vy: p.dir_y * cfg.grenade_speed,
        explode_at: now + cfg.grenade_fuse_ms,
        radius: cfg.grenade_radius,
        damage: cfg.grenade_damage,
    });
}

fn beam(room: &mut Room, player_id: PlayerId, now: u64) {
    let Some(p) = caster(room, player_id) else {
        return;
    };
    let cfg = room.tuning.ability;

    let (x1, y1) = (p.x, p.y);
    let x2 = x1 + p.dir_x * cfg.beam_length;
    let y2 = y1 + p.dir_y * cfg.beam_length;

    for m in room.monsters.iter_mut().filter(|m| !m.is_dead()) {
        if point_segment_distance(m.x, m.y, x1, y1, x2, y2) <= m.radius + cfg.beam_thickness {
            m.take_damage(cfg.beam_damage, Some(p.id));
        }
    }

    room.effects.push(Effect {
        kind: EffectKind::Beam {
            x1,
            y1,
            x2,
            y2,
            thickness: cfg.beam_thickness,
        },
        expires_at: now + cfg.beam_effect_ms,
    });

    room.reap_dead_monsters();
}
