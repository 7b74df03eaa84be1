/// Gameplay tuning for monsters and their behaviors.
use crate::domain::state::MonsterKind;

/// Unscaled stats for one monster kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonsterStats {
    pub hp: i32,
    pub radius: f32,
    /// Base speed in units per second, before population scaling.
    pub speed: f32,
}

impl MonsterKind {
    pub fn base_stats(self) -> MonsterStats {
        match self {
            MonsterKind::Chaser => MonsterStats {
                hp: 3,
                radius: 18.0,
                speed: 120.0,
            },
            MonsterKind::Dasher => MonsterStats {
                hp: 3,
                radius: 16.0,
                speed: 140.0,
            },
            MonsterKind::Orbiter => MonsterStats {
                hp: 4,
                radius: 16.0,
                speed: 150.0,
            },
            MonsterKind::Splitter => MonsterStats {
                hp: 6,
                radius: 24.0,
                speed: 90.0,
            },
            MonsterKind::Sniper => MonsterStats {
                hp: 3,
                radius: 14.0,
                speed: 120.0,
            },
            MonsterKind::Mini => MonsterStats {
                hp: 1,
                radius: 10.0,
                speed: 170.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AiTuning {
    /// Per-tick velocity smoothing toward the chase direction.
    pub chaser_smoothing: f32,

    pub dasher_windup_secs: f32,
    pub dasher_dash_secs: f32,
    pub dasher_dash_multiplier: f32,
    pub dasher_approach_weight: f32,
    pub dasher_strafe_weight: f32,

    pub orbiter_radius: f32,
    pub orbiter_amplitude: f32,
    /// Milliseconds of server time per radian of orbit oscillation.
    pub orbiter_period_ms: f32,
    pub orbiter_gain: f32,

    pub splitter_pulse_secs: f32,
    pub splitter_pulse_multiplier: f32,
    pub splitter_target_weight: f32,
    pub splitter_jitter_weight: f32,
    /// Per-tick velocity retention between pulses.
    pub splitter_drag: f32,
    /// Maximum distance minis are scattered from the splitter's death position.
    pub splitter_spawn_offset: f32,

    pub sniper_standoff: f32,
    pub sniper_strafe_multiplier: f32,
    pub sniper_gain: f32,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            chaser_smoothing: 0.08,

            dasher_windup_secs: 0.8,
            dasher_dash_secs: 0.28,
            dasher_dash_multiplier: 3.2,
            dasher_approach_weight: 0.4,
            dasher_strafe_weight: 0.7,

            orbiter_radius: 160.0,
            orbiter_amplitude: 40.0,
            orbiter_period_ms: 500.0,
            orbiter_gain: 0.8,

            splitter_pulse_secs: 0.6,
            splitter_pulse_multiplier: 2.0,
            splitter_target_weight: 0.8,
            splitter_jitter_weight: 0.4,
            splitter_drag: 0.86,
            splitter_spawn_offset: 12.0,

            sniper_standoff: 420.0,
            sniper_strafe_multiplier: 1.1,
            sniper_gain: 0.8,
        }
    }
}

/// Neutral wildlife tuning.
#[derive(Debug, Clone, Copy)]
pub struct NeutralTuning {
    pub hp: i32,
    pub radius: f32,
    pub speed: f32,
    /// Range of seconds between wander re-decisions.
    pub wander_min_secs: f32,
    pub wander_max_secs: f32,
}

impl Default for NeutralTuning {
    fn default() -> Self {
        Self {
            hp: 2,
            radius: 14.0,
            speed: 40.0,
            wander_min_secs: 1.0,
            wander_max_secs: 3.0,
        }
    }
}
