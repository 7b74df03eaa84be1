/// Spawn cadence and population caps.

#[derive(Debug, Clone, Copy)]
pub struct SpawnTuning {
    /// Monster interval for a single player; divided by the population factor.
    pub monster_interval_ms: f32,
    pub powerup_interval_ms: u64,
    pub powerup_cap: usize,
    pub powerup_radius: f32,
    pub powerup_life_ms: u64,
    pub neutral_interval_ms: u64,
    pub neutral_cap: usize,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            monster_interval_ms: 2400.0,
            powerup_interval_ms: 6000,
            powerup_cap: 8,
            powerup_radius: 14.0,
            powerup_life_ms: 45_000,
            neutral_interval_ms: 7000,
            neutral_cap: 12,
        }
    }
}
