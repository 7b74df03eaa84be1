/// Gameplay tuning for projectiles.

#[derive(Debug, Clone, Copy)]
pub struct ProjectileTuning {
    /// Initial projectile speed in units per second.
    pub speed: f32,

    /// Lifetime in milliseconds before the projectile is despawned.
    pub life_time_ms: u64,

    /// World-space collision radius.
    pub radius: f32,

    /// Hit points removed on impact.
    pub damage: i32,

    /// How far outside the world a projectile may travel before it is culled.
    pub cull_margin: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 720.0,
            life_time_ms: 1200,
            radius: 5.0,
            damage: 1,
            cull_margin: 50.0,
        }
    }
}
