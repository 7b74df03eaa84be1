// Per-tick simulation systems. Each takes the slices it touches plus its tuning.

pub mod abilities;
pub mod bombs;
pub mod contact;
pub mod monster_ai;
pub mod movement;
pub mod neutrals;
pub mod pickups;
pub mod projectiles;
pub mod scaling;
pub mod spawner;
