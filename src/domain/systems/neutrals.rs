use crate::domain::geometry::clamp_to_bounds;
use crate::domain::state::{Neutral, WorldBounds};
use crate::domain::tuning::monster::NeutralTuning;
use rand::Rng;
use std::f32::consts::TAU;

/// Aimless drifting. When a neutral's timer runs out it picks a new heading (or stops) and a
/// new timer.
pub fn wander(
    neutrals: &mut [Neutral],
    rng: &mut impl Rng,
    dt: f32,
    cfg: &NeutralTuning,
    world: WorldBounds,
) {
    for n in neutrals.iter_mut() {
        n.wander_timer -= dt;
        if n.wander_timer <= 0.0 {
            n.wander_timer = rng.random_range(cfg.wander_min_secs..=cfg.wander_max_secs);
            if rng.random_bool(0.25) {
                n.vx = 0.0;
                n.vy = 0.0;
            } else {
                let angle = rng.random_range(0.0..TAU);
                n.vx = angle.cos() * cfg.speed;
                n.vy = angle.sin() * cfg.speed;
            }
        }

        n.x += n.vx * dt;
        n.y += n.vy * dt;
        (n.x, n.y) = clamp_to_bounds(n.x, n.y, world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn neutral(x: f32, timer: f32) -> Neutral {
        Neutral {
            id: 1,
            x,
            y: 100.0,
            vx: -40.0,
            vy: 0.0,
            radius: 14.0,
            hp: 2,
            max_hp: 2,
            wander_timer: timer,
        }
    }

    #[test]
    fn when_timer_is_running_then_heading_is_kept() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut neutrals = vec![neutral(100.0, 2.0)];

        wander(&mut neutrals, &mut rng, 0.5, &NeutralTuning::default(), WorldBounds::default());

        assert_eq!(neutrals[0].x, 80.0);
        assert!((neutrals[0].wander_timer - 1.5).abs() < 1e-6);
    }

    #[test]
    fn when_timer_expires_then_a_new_timer_is_drawn_in_range() {
        let cfg = NeutralTuning::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut neutrals = vec![neutral(100.0, 0.01)];

        wander(&mut neutrals, &mut rng, 0.02, &cfg, WorldBounds::default());

        let n = &neutrals[0];
        assert!((cfg.wander_min_secs..=cfg.wander_max_secs).contains(&n.wander_timer));
        let speed = (n.vx * n.vx + n.vy * n.vy).sqrt();
        assert!(speed == 0.0 || (speed - cfg.speed).abs() < 1e-3);
    }

    #[test]
    fn when_neutral_drifts_past_wall_then_it_is_clamped() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut neutrals = vec![neutral(5.0, 10.0)];

        wander(&mut neutrals, &mut rng, 1.0, &NeutralTuning::default(), WorldBounds::default());

        assert_eq!(neutrals[0].x, 0.0);
    }
}
