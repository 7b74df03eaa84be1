/// Gameplay tuning for player avatars.
///
/// Keep this separate from runtime/server configuration (tick rates, buffer sizes, etc.).

#[derive(Debug, Clone, Copy)]
pub struct PlayerTuning {
    /// Base movement speed in units per second.
    pub speed: f32,

    /// World-space collision radius (server-side hit checks).
    pub radius: f32,

    /// Base time between auto-fire shots in milliseconds.
    pub fire_interval_ms: u64,

    /// Movement multiplier while a dash window is active.
    pub dash_speed_multiplier: f32,

    /// Invulnerability granted after any monster contact, in milliseconds.
    pub contact_invulnerable_ms: u64,

    /// Total auto-fire fan spread per extra projectile, in radians.
    pub multishot_step: f32,

    /// Upper bound on the auto-fire fan spread, in radians.
    pub multishot_max_spread: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 260.0,
            radius: 18.0,
            fire_interval_ms: 180,
            dash_speed_multiplier: 3.2,
            contact_invulnerable_ms: 1000,
            multishot_step: 6f32.to_radians(),
            multishot_max_spread: 20f32.to_radians(),
        }
    }
}

/// Effects and durations applied by powerup pickups.
#[derive(Debug, Clone, Copy)]
pub struct BuffTuning {
    pub speed_multiplier: f32,
    pub speed_ms: u64,
    pub fire_rate_multiplier: f32,
    pub fire_rate_ms: u64,
    /// Extra projectiles granted per multishot pickup.
    pub multishot_step: u32,
    pub multishot_max: u32,
    pub multishot_ms: u64,
    pub shield_ms: u64,
}

impl Default for BuffTuning {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.5,
            speed_ms: 8000,
            fire_rate_multiplier: 1.8,
            fire_rate_ms: 8000,
            multishot_step: 2,
            multishot_max: 7,
            multishot_ms: 10_000,
            shield_ms: 6000,
        }
    }
}
