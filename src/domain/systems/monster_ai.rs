// Per-kind monster steering against the nearest player.

use crate::domain::geometry::{
    clamp_to_bounds, distance_sq, length, lerp, normalize, perpendicular,
};
use crate::domain::state::{Behavior, DasherMode, Monster, Player, WorldBounds};
use crate::domain::tuning::monster::AiTuning;
use rand::Rng;
use std::f32::consts::TAU;

/// Nearest player to (x, y). Exact distance ties go to the lowest player id.
pub fn nearest_player(players: &[Player], x: f32, y: f32) -> Option<&Player> {
    players.iter().min_by(|a, b| {
        let da = distance_sq(x, y, a.x, a.y);
        let db = distance_sq(x, y, b.x, b.y);
        da.total_cmp(&db).then(a.id.cmp(&b.id))
    })
}

/// Steers and integrates every monster. Rooms without players leave monsters untouched.
pub fn update_monsters(
    monsters: &mut [Monster],
    players: &[Player],
    rng: &mut impl Rng,
    now: u64,
    dt: f32,
    ai: &AiTuning,
    world: WorldBounds,
) {
    if players.is_empty() {
        return;
    }

    for m in monsters.iter_mut() {
        let Some(target) = nearest_player(players, m.x, m.y) else {
            continue;
        };
        steer(m, target.x, target.y, now, dt, ai, rng);

        m.x += m.vx * dt;
        m.y += m.vy * dt;
        (m.x, m.y) = clamp_to_bounds(m.x, m.y, world);
    }
}

/// Updates the monster's velocity (and behavior state) toward a target position.
pub fn steer(
    m: &mut Monster,
    target_x: f32,
    target_y: f32,
    now: u64,
    dt: f32,
    ai: &AiTuning,
    rng: &mut impl Rng,
) {
    let to_x = target_x - m.x;
    let to_y = target_y - m.y;
    let dist = length(to_x, to_y);
    let (dir_x, dir_y) = normalize(to_x, to_y);
    let (tan_x, tan_y) = perpendicular(dir_x, dir_y);
    let speed = m.speed;

    match &mut m.behavior {
        Behavior::Chaser => {
            // Exponential smoothing gives the chaser some inertia.
            m.vx = lerp(m.vx, dir_x * speed, ai.chaser_smoothing);
            m.vy = lerp(m.vy, dir_y * speed, ai.chaser_smoothing);
        }
        Behavior::Dasher {
            mode,
            timer,
            dx,
            dy,
        } => {
            *timer -= dt;
            let windup_vx = (dir_x * ai.dasher_approach_weight + tan_x * ai.dasher_strafe_weight)
                * speed;
            let windup_vy = (dir_y * ai.dasher_approach_weight + tan_y * ai.dasher_strafe_weight)
                * speed;

            match *mode {
                DasherMode::Windup if *timer <= 0.0 => {
                    // Commit to the current line; it is not re-aimed during the dash.
                    *mode = DasherMode::Dash;
                    *timer = ai.dasher_dash_secs;
                    *dx = dir_x;
                    *dy = dir_y;
                    m.vx = dir_x * speed * ai.dasher_dash_multiplier;
                    m.vy = dir_y * speed * ai.dasher_dash_multiplier;
                }
                DasherMode::Windup => {
                    m.vx = windup_vx;
                    m.vy = windup_vy;
                }
                DasherMode::Dash if *timer <= 0.0 => {
                    *mode = DasherMode::Windup;
                    *timer = ai.dasher_windup_secs;
                    m.vx = windup_vx;
                    m.vy = windup_vy;
                }
                DasherMode::Dash => {
                    m.vx = *dx * speed * ai.dasher_dash_multiplier;
                    m.vy = *dy * speed * ai.dasher_dash_multiplier;
                }
            }
        }
        Behavior::Orbiter { seed } => {
            let phase = now as f64 / ai.orbiter_period_ms as f64 + *seed as f64;
            let desired = ai.orbiter_radius + ai.orbiter_amplitude * phase.sin() as f32;
            let error = dist - desired;
            m.vx = tan_x * speed + dir_x * error * ai.orbiter_gain;
            m.vy = tan_y * speed + dir_y * error * ai.orbiter_gain;
        }
        Behavior::Splitter { cooldown } => {
            *cooldown -= dt;
            if *cooldown <= 0.0 {
                let jitter = rng.random_range(0.0..TAU);
                let (nx, ny) = normalize(
                    dir_x * ai.splitter_target_weight + jitter.cos() * ai.splitter_jitter_weight,
                    dir_y * ai.splitter_target_weight + jitter.sin() * ai.splitter_jitter_weight,
                );
                m.vx = nx * speed * ai.splitter_pulse_multiplier;
                m.vy = ny * speed * ai.splitter_pulse_multiplier;
                *cooldown = ai.splitter_pulse_secs;
            } else {
                m.vx *= ai.splitter_drag;
                m.vy *= ai.splitter_drag;
            }
        }
        Behavior::Sniper => {
            // Positive error (too far) pulls inward, negative pushes away.
            let error = dist - ai.sniper_standoff;
            m.vx = tan_x * speed * ai.sniper_strafe_multiplier + dir_x * error * ai.sniper_gain;
            m.vy = tan_y * speed * ai.sniper_strafe_multiplier + dir_y * error * ai.sniper_gain;
        }
        Behavior::Mini => {
            m.vx = dir_x * speed;
            m.vy = dir_y * speed;
        }
    }
}
