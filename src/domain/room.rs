// Room aggregate: owns every live entity and runs the fixed-step tick.

use super::snapshot::RoomSnapshot;
use super::state::{
    AbilityKind, Bomb, Bullet, Effect, EntityId, Monster, MonsterKind, Neutral, Player,
    PlayerId, PlayerInput, Powerup, RoomSettings, WorldBounds,
};
use super::systems::{
    abilities, bombs, contact, monster_ai, movement, neutrals, pickups, projectiles, spawner,
};
use super::tuning::Tuning;
use rand::rngs::StdRng;
use std::sync::Arc;
use tracing::debug;

pub struct Room {
    pub id: Arc<str>,
    pub settings: RoomSettings,
    pub world: WorldBounds,
    pub tuning: Tuning,

    pub players: Vec<Player>,
    pub bullets: Vec<Bullet>,
    pub monsters: Vec<Monster>,
    pub neutrals: Vec<Neutral>,
    pub powerups: Vec<Powerup>,
    pub bombs: Vec<Bomb>,
    pub effects: Vec<Effect>,

    // Spawn gates, measured from this room's own history.
    pub last_monster_spawn: u64,
    pub last_powerup_spawn: u64,
    pub last_neutral_spawn: u64,

    pub tick: u64,
    pub next_entity_id: EntityId,
    pub rng: StdRng,
}

/// Hands out the next id from a room-local counter.
pub fn alloc_id(next: &mut EntityId) -> EntityId {
    let id = *next;
    *next = next.wrapping_add(1);
    id
}

impl Room {
    pub fn new(
        id: Arc<str>,
        settings: RoomSettings,
        world: WorldBounds,
        now: u64,
        rng: StdRng,
    ) -> Self {
        Self {
            id,
            settings,
            world,
            tuning: Tuning::default(),
            players: Vec::new(),
            bullets: Vec::new(),
            monsters: Vec::new(),
            neutrals: Vec::new(),
            powerups: Vec::new(),
            bombs: Vec::new(),
            effects: Vec::new(),
            last_monster_spawn: now,
            last_powerup_spawn: now,
            last_neutral_spawn: now,
            tick: 0,
            next_entity_id: 1,
            rng,
        }
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn player_mut(&mut self, player_id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == player_id)
    }

    /// Spawns a player at a random in-bounds point. Returns false if the id is already present.
    pub fn add_player(&mut self, player_id: PlayerId) -> bool {
        if self.player(player_id).is_some() {
            return false;
        }
        let (x, y) = spawner::random_point(&mut self.rng, self.world);
        self.players
            .push(Player::new(player_id, x, y, self.tuning.player.radius));
        true
    }

    /// Removes the player. Bullets and bombs they already fired stay in flight; kills they score
    /// afterwards are simply not credited.
    pub fn remove_player(&mut self, player_id: PlayerId) -> bool {
        let before = self.players.len();
        self.players.retain(|p| p.id != player_id);
        self.players.len() != before
    }

    /// Records the latest intent. Unknown ids are ignored.
    pub fn apply_input(&mut self, player_id: PlayerId, input: PlayerInput) -> bool {
        match self.player_mut(player_id) {
            Some(player) => {
                player.apply_input(input);
                true
            }
            None => false,
        }
    }

    /// Triggers an ability; returns false for unknown players or abilities still cooling down.
    pub fn use_ability(&mut self, player_id: PlayerId, kind: AbilityKind, now: u64) -> bool {
        abilities::activate(self, player_id, kind, now)
    }

    /// Advances the simulation by one fixed step ending at `now`.
    pub fn tick(&mut self, now: u64, dt: f32) {
        self.tick += 1;

        spawner::run_spawns(self, now);

        movement::move_players(&mut self.players, now, dt, &self.tuning.player, self.world);
        projectiles::fire_weapons(
            &mut self.players,
            &mut self.bullets,
            &mut self.next_entity_id,
            now,
            &self.tuning.player,
            &self.tuning.projectile,
        );

        monster_ai::update_monsters(
            &mut self.monsters,
            &self.players,
            &mut self.rng,
            now,
            dt,
            &self.tuning.ai,
            self.world,
        );

        bombs::update_bombs(
            &mut self.bombs,
            &mut self.monsters,
            &mut self.effects,
            now,
            dt,
            &self.tuning.ability,
        );
        self.reap_dead_monsters();

        self.effects.retain(|e| e.expires_at > now);

        projectiles::integrate_bullets(
            &mut self.bullets,
            now,
            dt,
            &self.tuning.projectile,
            self.world,
        );
        projectiles::hit_monsters(&mut self.bullets, &mut self.monsters);
        self.reap_dead_monsters();

        pickups::collect_powerups(&mut self.players, &mut self.powerups, now, &self.tuning.buffs);

        neutrals::wander(
            &mut self.neutrals,
            &mut self.rng,
            dt,
            &self.tuning.neutral,
            self.world,
        );
        projectiles::hit_neutrals(&mut self.bullets, &mut self.neutrals);

        contact::resolve_monster_contact(
            &mut self.players,
            &self.monsters,
            &mut self.rng,
            now,
            &self.tuning.player,
            self.world,
        );
    }

    /// Removes monsters with no hp left, credits the last attacker and splits splitters.
    pub fn reap_dead_monsters(&mut self) {
        if !self.monsters.iter().any(Monster::is_dead) {
            return;
        }

        let mut fallen = Vec::new();
        self.monsters.retain(|m| {
            if m.is_dead() {
                fallen.push((m.id, m.kind, m.x, m.y, m.last_hit_by));
                false
            } else {
                true
            }
        });

        for (monster_id, kind, x, y, killer) in fallen {
            if let Some(player) = killer.and_then(|id| self.player_mut(id)) {
                player.kills += 1;
            }
            debug!(
                room_id = %self.id,
                monster_id,
                ?kind,
                killer_id = ?killer,
                "monster killed"
            );
            if kind == MonsterKind::Splitter {
                spawner::spawn_minis(self, x, y);
            }
        }
    }

    pub fn snapshot(&self, now: u64) -> RoomSnapshot {
        RoomSnapshot::capture(self, now)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::domain::state::{Behavior, Difficulty};
    use crate::domain::systems::scaling::PopulationScale;
    use rand::SeedableRng;

    pub const T0: u64 = 1_000_000;
    pub const DT: f32 = 1.0 / 60.0;

    /// Single-seat room with deterministic randomness and no spawns due before `T0 + 2400`.
    pub fn room() -> Room {
        Room::new(
            Arc::from("test-room"),
            RoomSettings::new(1, Difficulty::Normal),
            WorldBounds::default(),
            T0,
            StdRng::seed_from_u64(42),
        )
    }

    /// Inserts a player at a fixed position.
    pub fn place_player(room: &mut Room, id: PlayerId, x: f32, y: f32) {
        room.add_player(id);
        let player = room.player_mut(id).expect("player just added");
        player.x = x;
        player.y = y;
    }

    /// Inserts a stationary monster with the given hp at a fixed position.
    pub fn place_monster(room: &mut Room, kind: MonsterKind, x: f32, y: f32, hp: i32) -> EntityId {
        let id = spawner::spawn_monster(room, kind, x, y, PopulationScale::for_players(1));
        let monster = room
            .monsters
            .iter_mut()
            .find(|m| m.id == id)
            .expect("monster just spawned");
        monster.hp = hp;
        monster.max_hp = monster.max_hp.max(hp);
        monster.speed = 0.0;
        monster.behavior = Behavior::Mini;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn when_player_joins_then_spawn_is_inside_bounds() {
        let mut room = room();
        assert!(room.add_player(1));
        assert!(!room.add_player(1));

        let p = room.player(1).expect("player");
        assert!((0.0..=room.world.width).contains(&p.x));
        assert!((0.0..=room.world.height).contains(&p.y));
    }

    #[test]
    fn when_player_leaves_then_record_is_removed_and_projectiles_keep_flying() {
        let mut room = room();
        place_player(&mut room, 1, 500.0, 500.0);
        assert!(room.use_ability(1, AbilityKind::Grenade, T0));
        assert!(room.use_ability(1, AbilityKind::Burst, T0));
        let bullets = room.bullets.len();
        assert!(bullets > 0);

        assert!(room.remove_player(1));
        assert!(room.players.is_empty());
        assert_eq!(room.bullets.len(), bullets);
        assert_eq!(room.bombs.len(), 1);
        assert!(!room.remove_player(1));
    }

    #[test]
    fn when_owner_left_then_their_grenade_still_kills() {
        let mut room = room();
        place_player(&mut room, 1, 100.0, 100.0);
        place_player(&mut room, 2, 2000.0, 1500.0);
        room.apply_input(
            1,
            PlayerInput {
                angle: Some(0.0),
                ..PlayerInput::default()
            },
        );
        let target = place_monster(&mut room, MonsterKind::Chaser, 260.0, 100.0, 3);
        assert!(room.use_ability(1, AbilityKind::Grenade, T0));
        room.remove_player(1);

        let mut now = T0;
        while !room.bombs.is_empty() {
            now += 16;
            room.tick(now, DT);
        }

        assert!(room.monsters.iter().all(|m| m.id != target));
        assert_eq!(room.player(2).expect("player").kills, 0);
    }

    #[test]
    fn when_input_targets_unknown_player_then_it_is_dropped() {
        let mut room = room();
        assert!(!room.apply_input(99, PlayerInput::default()));
        assert!(!room.use_ability(99, AbilityKind::Burst, T0));
    }

    #[test]
    fn when_bullet_kills_one_hp_monster_then_owner_is_credited_once() {
        let mut room = room();
        place_player(&mut room, 1, 100.0, 100.0);
        place_monster(&mut room, MonsterKind::Chaser, 800.0, 800.0, 1);
        let monster = room.monsters[0].clone();
        room.bullets.push(Bullet {
            id: 500,
            owner_id: 1,
            x: monster.x,
            y: monster.y,
            vx: 0.0,
            vy: 0.0,
            radius: 5.0,
            damage: 1,
            created_at: T0,
        });

        room.tick(T0 + 16, DT);

        assert!(room.monsters.is_empty());
        assert!(room.bullets.iter().all(|b| b.id != 500));
        assert_eq!(room.player(1).expect("player").kills, 1);
    }

    #[test]
    fn when_one_bullet_overlaps_two_monsters_then_only_one_is_damaged() {
        let mut room = room();
        place_player(&mut room, 1, 100.0, 100.0);
        place_monster(&mut room, MonsterKind::Chaser, 800.0, 800.0, 3);
        place_monster(&mut room, MonsterKind::Chaser, 805.0, 800.0, 3);
        room.bullets.push(Bullet {
            id: 500,
            owner_id: 1,
            x: 802.0,
            y: 800.0,
            vx: 0.0,
            vy: 0.0,
            radius: 5.0,
            damage: 1,
            created_at: T0,
        });

        room.tick(T0 + 16, DT);

        let total_hp: i32 = room.monsters.iter().map(|m| m.hp).sum();
        assert_eq!(total_hp, 5);
        assert!(room.bullets.is_empty());
    }

    #[test]
    fn when_splitter_dies_then_exactly_two_minis_appear() {
        let mut room = room();
        place_player(&mut room, 1, 100.0, 100.0);
        let id = place_monster(&mut room, MonsterKind::Splitter, 1200.0, 900.0, 1);
        room.monsters
            .iter_mut()
            .find(|m| m.id == id)
            .expect("splitter")
            .take_damage(1, Some(1));

        room.reap_dead_monsters();

        assert_eq!(room.monsters.len(), 2);
        assert!(room.monsters.iter().all(|m| m.kind == MonsterKind::Mini));
        let mini = MonsterKind::Mini.base_stats();
        for m in &room.monsters {
            assert_eq!(m.max_hp, mini.hp);
            assert_eq!(m.hp, mini.hp);
            assert_eq!(m.radius, mini.radius);
            assert!((m.x - 1200.0).abs() <= room.tuning.ai.splitter_spawn_offset + 1e-3);
        }
        assert_eq!(room.player(1).expect("player").kills, 1);
    }

    #[test]
    fn when_bullet_kills_splitter_then_two_minis_appear() {
        let mut room = room();
        place_player(&mut room, 1, 100.0, 100.0);
        place_monster(&mut room, MonsterKind::Splitter, 1200.0, 900.0, 1);
        room.bullets.push(Bullet {
            id: 500,
            owner_id: 1,
            x: 1200.0,
            y: 900.0,
            vx: 0.0,
            vy: 0.0,
            radius: 5.0,
            damage: 1,
            created_at: T0,
        });

        room.tick(T0 + 16, DT);

        assert_eq!(room.monsters.len(), 2);
        assert!(room.monsters.iter().all(|m| m.kind == MonsterKind::Mini));
        assert_eq!(room.player(1).expect("player").kills, 1);
    }

    #[test]
    fn when_bomb_kills_splitter_then_two_minis_appear() {
        let mut room = room();
        place_player(&mut room, 1, 100.0, 100.0);
        room.apply_input(
            1,
            PlayerInput {
                angle: Some(0.0),
                ..PlayerInput::default()
            },
        );
        place_monster(&mut room, MonsterKind::Splitter, 260.0, 100.0, 3);
        assert!(room.use_ability(1, AbilityKind::Grenade, T0));

        let mut now = T0;
        while !room.bombs.is_empty() {
            now += 16;
            room.tick(now, DT);
        }

        assert_eq!(room.monsters.len(), 2);
        assert!(room.monsters.iter().all(|m| m.kind == MonsterKind::Mini));
        assert_eq!(room.player(1).expect("player").kills, 1);
    }

    #[test]
    fn when_monster_has_zero_hp_then_snapshot_never_contains_it() {
        let mut room = room();
        place_player(&mut room, 1, 100.0, 100.0);
        place_monster(&mut room, MonsterKind::Sniper, 900.0, 900.0, 1);
        room.monsters[0].take_damage(1, None);

        room.tick(T0 + 16, DT);
        let snapshot = room.snapshot(T0 + 16);

        assert!(snapshot.monsters.is_empty());
    }

    #[test]
    fn when_effects_expire_then_tick_prunes_them() {
        let mut room = room();
        room.effects.push(Effect {
            kind: crate::domain::state::EffectKind::Explosion {
                x: 0.0,
                y: 0.0,
                radius: 10.0,
            },
            expires_at: T0 + 10,
        });

        room.tick(T0 + 5, DT);
        assert_eq!(room.effects.len(), 1);
        room.tick(T0 + 10, DT);
        assert!(room.effects.is_empty());
    }
}
