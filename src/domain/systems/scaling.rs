// Player-count driven difficulty scaling for monster stats and spawn cadence.

use crate::domain::tuning::monster::MonsterStats;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationScale {
    pub factor: f32,
    pub monster_cap: usize,
}

impl PopulationScale {
    /// Scale for `players` connected players; an empty room scales like a single player.
    pub fn for_players(players: usize) -> Self {
        let extra = players.max(1) - 1;
        Self {
            factor: 1.0 + 0.35 * extra as f32,
            monster_cap: 16 + 10 * extra,
        }
    }

    /// Health grows with the square root so single shots stay meaningful.
    pub fn monster_hp(&self, base_hp: i32) -> i32 {
        ((base_hp as f32) * self.factor.sqrt()).round().max(1.0) as i32
    }

    pub fn monster_speed(&self, base_speed: f32) -> f32 {
        base_speed * (0.75 + 0.25 * self.factor)
    }

    pub fn monster_interval_ms(&self, base_interval_ms: f32) -> u64 {
        (base_interval_ms / self.factor).round() as u64
    }

    /// Base stats for a kind with hp and speed scaled for this population.
    pub fn scale_stats(&self, stats: MonsterStats) -> MonsterStats {
        MonsterStats {
            hp: self.monster_hp(stats.hp),
            radius: stats.radius,
            speed: self.monster_speed(stats.speed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_room_has_one_or_zero_players_then_factor_is_one() {
        let one = PopulationScale::for_players(1);
        assert_eq!(one.factor, 1.0);
        assert_eq!(one.monster_cap, 16);
        assert_eq!(PopulationScale::for_players(0), one);
    }

    #[test]
    fn when_room_has_three_players_then_factor_and_cap_grow() {
        let scale = PopulationScale::for_players(3);
        assert!((scale.factor - 1.7).abs() < 1e-6);
        assert_eq!(scale.monster_cap, 36);
    }

    #[test]
    fn when_scaling_stats_then_hp_uses_sqrt_and_speed_is_linear() {
        let scale = PopulationScale::for_players(4);
        // factor = 2.05; sqrt ~= 1.432
        assert_eq!(scale.monster_hp(6), 9);
        assert!((scale.monster_speed(100.0) - 126.25).abs() < 1e-3);
        assert_eq!(scale.monster_interval_ms(2400.0), 1171);
    }

    #[test]
    fn when_base_hp_is_one_then_scaled_hp_is_at_least_one() {
        let scale = PopulationScale::for_players(1);
        assert_eq!(scale.monster_hp(1), 1);
    }
}
