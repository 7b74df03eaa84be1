use crate::domain::geometry::{clamp_to_bounds, normalize};
use crate::domain::state::{Player, WorldBounds};
use crate::domain::tuning::player::PlayerTuning;

/// Integrates player movement from intent flags. Expired buffs are reverted first so the
/// speed used this tick is current.
pub fn move_players(
    players: &mut [Player],
    now: u64,
    dt: f32,
    cfg: &PlayerTuning,
    world: WorldBounds,
) {
    for p in players.iter_mut() {
        p.buffs.reconcile(now);
        tick_player(p, now, dt, cfg, world);
    }
}

pub fn tick_player(p: &mut Player, now: u64, dt: f32, cfg: &PlayerTuning, world: WorldBounds) {
    // +Y points down, matching the client's canvas coordinates.
    let mut ix = 0.0;
    let mut iy = 0.0;
    if p.input.left {
        ix -= 1.0;
    }
    if p.input.right {
        ix += 1.0;
    }
    if p.input.up {
        iy -= 1.0;
    }
    if p.input.down {
        iy += 1.0;
    }

    // Diagonals are normalized so they are not faster than straight lines.
    let (dir_x, dir_y) = normalize(ix, iy);
    let boost = if p.is_dashing(now) {
        cfg.dash_speed_multiplier
    } else {
        1.0
    };
    let speed = cfg.speed * p.buffs.speed * boost;

    p.x += dir_x * speed * dt;
    p.y += dir_y * speed * dt;
    (p.x, p.y) = clamp_to_bounds(p.x, p.y, world);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::PlayerInput;

    fn player_with(input: PlayerInput) -> Player {
        let mut p = Player::new(1, 1000.0, 1000.0, 18.0);
        p.apply_input(input);
        p
    }

    #[test]
    fn when_moving_diagonally_then_speed_is_normalized() {
        let cfg = PlayerTuning::default();
        let mut p = player_with(PlayerInput {
            up: true,
            right: true,
            ..PlayerInput::default()
        });

        tick_player(&mut p, 0, 1.0, &cfg, WorldBounds::default());

        let moved = ((p.x - 1000.0).powi(2) + (p.y - 1000.0).powi(2)).sqrt();
        assert!((moved - cfg.speed).abs() < 1e-2);
        assert!(p.x > 1000.0 && p.y < 1000.0);
    }

    #[test]
    fn when_opposite_flags_are_held_then_player_stays_put() {
        let mut p = player_with(PlayerInput {
            left: true,
            right: true,
            ..PlayerInput::default()
        });
        tick_player(&mut p, 0, 0.5, &PlayerTuning::default(), WorldBounds::default());
        assert_eq!((p.x, p.y), (1000.0, 1000.0));
    }

    #[test]
    fn when_speed_buff_and_dash_are_active_then_multipliers_stack() {
        let cfg = PlayerTuning::default();
        let mut p = player_with(PlayerInput {
            right: true,
            ..PlayerInput::default()
        });
        p.buffs.speed = 1.5;
        p.buffs.speed_until = 500;
        p.dash_until = 100;

        move_players(std::slice::from_mut(&mut p), 50, 0.1, &cfg, WorldBounds::default());

        let expected = cfg.speed * 1.5 * cfg.dash_speed_multiplier * 0.1;
        assert!((p.x - 1000.0 - expected).abs() < 1e-2);
    }

    #[test]
    fn when_speed_buff_has_expired_then_base_speed_is_used() {
        let cfg = PlayerTuning::default();
        let mut p = player_with(PlayerInput {
            right: true,
            ..PlayerInput::default()
        });
        p.buffs.speed = 1.5;
        p.buffs.speed_until = 500;

        move_players(std::slice::from_mut(&mut p), 500, 0.1, &cfg, WorldBounds::default());

        assert!((p.x - 1000.0 - cfg.speed * 0.1).abs() < 1e-2);
    }

    #[test]
    fn when_player_walks_into_wall_then_position_is_clamped() {
        let mut p = player_with(PlayerInput {
            left: true,
            ..PlayerInput::default()
        });
        p.x = 5.0;
        tick_player(&mut p, 0, 1.0, &PlayerTuning::default(), WorldBounds::default());
        assert_eq!(p.x, 0.0);
    }
}
