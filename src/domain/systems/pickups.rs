use crate::domain::geometry::circles_overlap;
use crate::domain::state::{Player, Powerup, PowerupKind};
use crate::domain::tuning::player::BuffTuning;

/// Culls expired powerups, then hands each remaining one to the first player touching it.
pub fn collect_powerups(
    players: &mut [Player],
    powerups: &mut Vec<Powerup>,
    now: u64,
    cfg: &BuffTuning,
) {
    powerups.retain(|p| p.expires_at > now);

    powerups.retain(|pu| {
        let Some(player) = players
            .iter_mut()
            .find(|p| circles_overlap(p.x, p.y, p.radius, pu.x, pu.y, pu.radius))
        else {
            return true;
        };
        apply_powerup(player, pu.kind, now, cfg);
        false
    });
}

/// Applies a powerup to `player`. Timed buffs restart their window on every pickup.
pub fn apply_powerup(player: &mut Player, kind: PowerupKind, now: u64, cfg: &BuffTuning) {
    let buffs = &mut player.buffs;
    match kind {
        PowerupKind::Speed => {
            buffs.speed = cfg.speed_multiplier;
            buffs.speed_until = now + cfg.speed_ms;
        }
        PowerupKind::FireRate => {
            buffs.fire_rate = cfg.fire_rate_multiplier;
            buffs.fire_rate_until = now + cfg.fire_rate_ms;
        }
        PowerupKind::Multishot => {
            buffs.multishot = (buffs.multishot + cfg.multishot_step).min(cfg.multishot_max);
            buffs.multishot_until = now + cfg.multishot_ms;
        }
        // Players have no health pool; heal refreshes every ability instead.
        PowerupKind::Heal => player.cooldowns.reset(),
        PowerupKind::Shield => buffs.shield_until = now + cfg.shield_ms,
    }
}
