use crate::domain::geometry::distance_sq;
use crate::domain::state::{Bomb, Effect, EffectKind, Monster};
use crate::domain::tuning::ability::AbilityTuning;

/// Moves bombs with per-tick drag and detonates every bomb whose fuse has run out.
/// Killed monsters are left in place for the room to reap.
pub fn update_bombs(
    bombs: &mut Vec<Bomb>,
    monsters: &mut [Monster],
    effects: &mut Vec<Effect>,
    now: u64,
    dt: f32,
    cfg: &AbilityTuning,
) {
    for b in bombs.iter_mut() {
        b.x += b.vx * dt;
        b.y += b.vy * dt;
        b.vx *= cfg.grenade_drag;
        b.vy *= cfg.grenade_drag;
    }

    bombs.retain(|b| {
        if now < b.explode_at {
            return true;
        }
        detonate(b, monsters, effects, now, cfg);
        false
    });
}

/// Area damage to every live monster whose body reaches into the blast circle.
pub fn detonate(
    bomb: &Bomb,
    monsters: &mut [Monster],
    effects: &mut Vec<Effect>,
    now: u64,
    cfg: &AbilityTuning,
) {
    for m in monsters.iter_mut().filter(|m| !m.is_dead()) {
        let reach = bomb.radius + m.radius;
        if distance_sq(bomb.x, bomb.y, m.x, m.y) <= reach * reach {
            m.take_damage(bomb.damage, Some(bomb.owner_id));
        }
    }

    effects.push(Effect {
        kind: EffectKind::Explosion {
            x: bomb.x,
            y: bomb.y,
            radius: bomb.radius,
        },
        expires_at: now + cfg.explosion_ms,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::{Behavior, MonsterKind};

    fn bomb(explode_at: u64) -> Bomb {
        Bomb {
            id: 1,
            owner_id: 9,
            x: 500.0,
            y: 500.0,
            vx: 0.0,
            vy: 0.0,
            explode_at,
            radius: 120.0,
            damage: 3,
        }
    }

    fn monster(id: u64, x: f32, radius: f32, hp: i32) -> Monster {
        Monster {
            id,
            kind: MonsterKind::Chaser,
            x,
            y: 500.0,
            vx: 0.0,
            vy: 0.0,
            radius,
            hp,
            max_hp: hp,
            speed: 0.0,
            behavior: Behavior::Chaser,
            last_hit_by: None,
        }
    }

    #[test]
    fn when_fuse_has_not_run_out_then_bomb_drifts_with_drag() {
        let cfg = AbilityTuning::default();
        let mut bombs = vec![Bomb {
            vx: 100.0,
            ..bomb(1000)
        }];
        let mut effects = Vec::new();

        update_bombs(&mut bombs, &mut [], &mut effects, 999, 0.1, &cfg);

        assert_eq!(bombs.len(), 1);
        assert!((bombs[0].x - 510.0).abs() < 1e-3);
        assert!((bombs[0].vx - 98.0).abs() < 1e-3);
        assert!(effects.is_empty());
    }

    #[test]
    fn when_monster_edge_is_inside_blast_then_it_takes_damage() {
        let cfg = AbilityTuning::default();
        let mut bombs = vec![bomb(1000)];
        // Centers 130 apart: outside 120 but inside 120 + 16.
        let mut monsters = vec![monster(1, 630.0, 16.0, 5), monster(2, 640.0, 16.0, 5)];
        let mut effects = Vec::new();

        update_bombs(&mut bombs, &mut monsters, &mut effects, 1000, 0.0, &cfg);

        assert!(bombs.is_empty());
        assert_eq!(monsters[0].hp, 2);
        assert_eq!(monsters[0].last_hit_by, Some(9));
        assert_eq!(monsters[1].hp, 5);
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].expires_at, 1000 + cfg.explosion_ms);
    }

    #[test]
    fn when_bomb_overkills_then_hp_bottoms_out_at_zero() {
        let cfg = AbilityTuning::default();
        let mut monsters = vec![monster(1, 500.0, 10.0, 1)];
        let mut effects = Vec::new();

        detonate(&bomb(0), &mut monsters, &mut effects, 0, &cfg);

        assert_eq!(monsters[0].hp, 0);
        assert!(monsters[0].is_dead());
    }
}
