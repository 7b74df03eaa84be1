/// Cooldowns and effect parameters for the four player abilities.

#[derive(Debug, Clone, Copy)]
pub struct AbilityTuning {
    pub burst_cooldown_ms: u64,
    pub burst_count: usize,
    /// Full angular width of the burst fan, in radians.
    pub burst_spread: f32,
    pub burst_speed_multiplier: f32,
    pub burst_extra_radius: f32,

    pub dash_cooldown_ms: u64,
    pub dash_distance: f32,
    pub dash_invulnerable_ms: u64,
    pub dash_boost_ms: u64,
    pub dash_trail_ms: u64,

    pub grenade_cooldown_ms: u64,
    pub grenade_offset: f32,
    pub grenade_speed: f32,
    /// Per-tick velocity retention.
    pub grenade_drag: f32,
    pub grenade_fuse_ms: u64,
    pub grenade_radius: f32,
    pub grenade_damage: i32,
    pub explosion_ms: u64,

    pub beam_cooldown_ms: u64,
    pub beam_length: f32,
    pub beam_thickness: f32,
    pub beam_damage: i32,
    pub beam_effect_ms: u64,
}

impl Default for AbilityTuning {
    fn default() -> Self {
        Self {
            burst_cooldown_ms: 3000,
            burst_count: 9,
            burst_spread: 75f32.to_radians(),
            burst_speed_multiplier: 0.9,
            burst_extra_radius: 2.0,

            dash_cooldown_ms: 6000,
            dash_distance: 60.0,
            dash_invulnerable_ms: 360,
            dash_boost_ms: 240,
            dash_trail_ms: 220,

            grenade_cooldown_ms: 5000,
            grenade_offset: 20.0,
            grenade_speed: 260.0,
            grenade_drag: 0.98,
            grenade_fuse_ms: 900,
            grenade_radius: 120.0,
            grenade_damage: 3,
            explosion_ms: 220,

            beam_cooldown_ms: 8000,
            beam_length: 800.0,
            beam_thickness: 18.0,
            beam_damage: 2,
            beam_effect_ms: 150,
        }
    }
}
