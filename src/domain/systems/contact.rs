use super::spawner::random_point;
use crate::domain::geometry::circles_overlap;
use crate::domain::state::{Monster, Player, WorldBounds};
use crate::domain::tuning::player::PlayerTuning;
use rand::Rng;

/// Player vs monster body contact, evaluated once per player per tick.
///
/// An unprotected player is knocked back to a random spawn point and loses one kill. Shield and
/// invulnerability both protect. Any contact refreshes the invulnerability window so the same
/// monster can't hit again on the next tick.
pub fn resolve_monster_contact(
    players: &mut [Player],
    monsters: &[Monster],
    rng: &mut impl Rng,
    now: u64,
    cfg: &PlayerTuning,
    world: WorldBounds,
) {
    for p in players.iter_mut() {
        let touching = monsters
            .iter()
            .any(|m| !m.is_dead() && circles_overlap(p.x, p.y, p.radius, m.x, m.y, m.radius));
        if !touching {
            continue;
        }

        if !p.buffs.shielded(now) && !p.is_invulnerable(now) {
            (p.x, p.y) = random_point(rng, world);
            p.kills = p.kills.saturating_sub(1);
        }
        p.invulnerable_until = now + cfg.contact_invulnerable_ms;
    }
}
