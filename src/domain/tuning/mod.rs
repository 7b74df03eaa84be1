// Gameplay tuning, kept apart from runtime/server configuration.

pub mod ability;
pub mod monster;
pub mod player;
pub mod projectile;
pub mod spawn;

use ability::AbilityTuning;
use monster::{AiTuning, NeutralTuning};
use player::{BuffTuning, PlayerTuning};
use projectile::ProjectileTuning;
use spawn::SpawnTuning;

/// Every tuning table a room simulation reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub buffs: BuffTuning,
    pub projectile: ProjectileTuning,
    pub ai: AiTuning,
    pub neutral: NeutralTuning,
    pub ability: AbilityTuning,
    pub spawn: SpawnTuning,
}
