use crate::domain::geometry::{circles_overlap, outside_bounds};
use crate::domain::room::alloc_id;
use crate::domain::state::{Bullet, EntityId, Monster, Neutral, Player, WorldBounds};
use crate::domain::tuning::player::PlayerTuning;
use crate::domain::tuning::projectile::ProjectileTuning;

/// Angles for `count` projectiles spread evenly across `spread` radians around `center`.
pub fn fan_angles(center: f32, spread: f32, count: usize) -> impl Iterator<Item = f32> {
    (0..count).map(move |i| {
        if count <= 1 {
            center
        } else {
            center - spread / 2.0 + spread * i as f32 / (count - 1) as f32
        }
    })
}

/// Total auto-fire spread for a multishot count, growing per projectile up to a cap.
pub fn multishot_spread(count: u32, cfg: &PlayerTuning) -> f32 {
    (cfg.multishot_step * count.saturating_sub(1) as f32).min(cfg.multishot_max_spread)
}

#[allow(clippy::too_many_arguments)]
pub fn spawn_bullet(
    bullets: &mut Vec<Bullet>,
    next_id: &mut EntityId,
    owner: &Player,
    angle: f32,
    speed: f32,
    radius: f32,
    damage: i32,
    now: u64,
) {
    let dir_x = angle.cos();
    let dir_y = angle.sin();
    bullets.push(Bullet {
        id: alloc_id(next_id),
        owner_id: owner.id,
        // Spawn at the edge of the shooter, in the direction it's facing.
        x: owner.x + dir_x * owner.radius,
        y: owner.y + dir_y * owner.radius,
        vx: dir_x * speed,
        vy: dir_y * speed,
        radius,
        damage,
        created_at: now,
    });
}

/// Auto-fire for every player holding the shoot intent, gated by their fire-rate buff.
pub fn fire_weapons(
    players: &mut [Player],
    bullets: &mut Vec<Bullet>,
    next_id: &mut EntityId,
    now: u64,
    player_cfg: &PlayerTuning,
    cfg: &ProjectileTuning,
) {
    for p in players.iter_mut() {
        if !p.input.shooting {
            continue;
        }

        let interval = (player_cfg.fire_interval_ms as f32 / p.buffs.fire_rate.max(0.01)) as u64;
        if p
            .last_shot_at
            .is_some_and(|last| now.saturating_sub(last) < interval)
        {
            continue;
        }
        p.last_shot_at = Some(now);

        let count = p.buffs.multishot.max(1);
        let spread = multishot_spread(count, player_cfg);
        let center = p.dir_y.atan2(p.dir_x);
        for angle in fan_angles(center, spread, count as usize) {
            spawn_bullet(
                bullets, next_id, p, angle, cfg.speed, cfg.radius, cfg.damage, now,
            );
        }
    }
}

/// Moves bullets and drops those past their lifetime or beyond the cull margin.
pub fn integrate_bullets(
    bullets: &mut Vec<Bullet>,
    now: u64,
    dt: f32,
    cfg: &ProjectileTuning,
    world: WorldBounds,
) {
    for b in bullets.iter_mut() {
        b.x += b.vx * dt;
        b.y += b.vy * dt;
    }

    bullets.retain(|b| {
        now.saturating_sub(b.created_at) < cfg.life_time_ms
            && !outside_bounds(b.x, b.y, world, cfg.cull_margin)
    });
}

/// Bullet vs monster (naive O(B*M)). Each bullet damages at most the first live monster it
/// overlaps and is consumed. Dead monsters are left for the room to reap.
pub fn hit_monsters(bullets: &mut Vec<Bullet>, monsters: &mut [Monster]) {
    bullets.retain(|b| {
        let Some(m) = monsters
            .iter_mut()
            .find(|m| !m.is_dead() && circles_overlap(b.x, b.y, b.radius, m.x, m.y, m.radius))
        else {
            return true;
        };
        m.take_damage(b.damage, Some(b.owner_id));
        false
    });
}

/// Bullet vs neutral wildlife. No kill credit; dead neutrals are removed here.
pub fn hit_neutrals(bullets: &mut Vec<Bullet>, neutrals: &mut Vec<Neutral>) {
    bullets.retain(|b| {
        let Some(n) = neutrals
            .iter_mut()
            .find(|n| n.hp > 0 && circles_overlap(b.x, b.y, b.radius, n.x, n.y, n.radius))
        else {
            return true;
        };
        n.hp = (n.hp - b.damage).max(0);
        false
    });
    neutrals.retain(|n| n.hp > 0);
}
