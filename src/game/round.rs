//! Gameplay Round
//!
//! One arena round: the world, the map, the event queues and the active
//! game mode. `step` runs the fixed per-frame pipeline:
//!
//! 1. Input snapshots into each player's InputComponent
//! 2. Timers (invincibility, respawns, star expiry)
//! 3. Physics for every body, then collision for every body
//! 4. Interactions: hazards, stomps, star contact, item pickups
//! 5. Animation selection and sprite facing
//! 6. Lifecycle: drain deaths and pickups, item respawns, sweep
//! 7. Mode clock and win check
//!
//! Once an outcome is recorded the round is frozen.

use macroquad::math::{Rect, Vec2};

use super::collision::{self, CollisionResult, WorldBounds};
use super::components::{Animation, Health, InputComponent, Item, ItemType, Physics, Player, PowerUp, Sprite};
use super::entity::Entity;
use super::event::{DamageEvent, DeathCause, DeathEvent, Events, ItemCollectedEvent, RespawnEvent};
use super::physics;
use super::world::World;
use crate::config::GameSettings;
use crate::error::ConfigError;
use crate::input::FrameInput;
use crate::map::{validate_map, GameMap};
use crate::mode::{CaptureTheFlag, GameMode, GameModeKind, Presence, ScoreLine};

/// Invincibility after a respawn.
pub const SPAWN_INVINCIBILITY: f32 = 2.0;
/// Invincibility after a hit that wasn't fatal.
pub const HIT_INVINCIBILITY: f32 = 2.0;
pub const STAR_DURATION: f32 = 10.0;
/// How far below the victim's head a stomper's feet may have been last frame.
const STOMP_TOLERANCE: f32 = 4.0;
/// Horizontal speed above which the walk clip plays.
const WALK_THRESHOLD: f32 = 10.0;

/// How a finished round ended.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    /// Slots in roster order; more than one on a tie
    pub winners: Vec<usize>,
    pub winner_names: Vec<String>,
    pub scoreboard: Vec<ScoreLine>,
    pub elapsed: f32,
}

impl RoundOutcome {
    pub fn headline(&self) -> String {
        match self.winner_names.as_slice() {
            [] => "No winner".to_string(),
            [one] => format!("{} wins!", one),
            many => format!("Tie: {}", many.join(", ")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ItemSlot {
    Live(Entity),
    /// Seconds until the spawn produces again
    Waiting(f32),
}

/// Clip for a body's motion this frame.
pub fn pick_clip(velocity: Vec2, on_ground: bool) -> &'static str {
    if !on_ground {
        if velocity.y < 0.0 {
            "jump"
        } else {
            "fall"
        }
    } else if velocity.x.abs() > WALK_THRESHOLD {
        "walk"
    } else {
        "idle"
    }
}

/// Strict overlap; boxes that only share an edge don't touch.
fn overlapping(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && b.x < a.x + a.w && a.y < b.y + b.h && b.y < a.y + a.h
}

#[derive(Debug)]
pub struct Round {
    pub world: World,
    pub events: Events,
    map: GameMap,
    mode: Box<dyn GameMode>,
    settings: GameSettings,
    bounds: WorldBounds,
    item_slots: Vec<ItemSlot>,
    outcome: Option<RoundOutcome>,
}

impl Round {
    /// Validate the configuration against the map and spawn everyone.
    pub fn new(settings: GameSettings, map: GameMap) -> Result<Self, ConfigError> {
        settings.validate()?;
        validate_map(&map).map_err(|e| ConfigError::InvalidMap(e.to_string()))?;

        let mut spawns = Vec::with_capacity(settings.player_count);
        for slot in 0..settings.player_count {
            let spawn = map.spawn_for(slot).ok_or(ConfigError::MissingSpawn {
                player: slot,
                available: map.spawn_points.len(),
            })?;
            spawns.push(spawn.position());
        }

        let mode = settings.mode.build(&settings, &map);
        let mut world = World::new();
        for (slot, &spawn) in spawns.iter().enumerate() {
            let player = Player::new(slot, &settings.player_name(slot), settings.lives, spawn);
            world.spawn_player(player, &settings.physics);
        }
        let item_slots = map
            .item_spawns
            .iter()
            .enumerate()
            .map(|(idx, spawn)| ItemSlot::Live(world.spawn_item(spawn.item_type, idx, spawn.position())))
            .collect();

        log::info!(
            "round start: {} on '{}' with {} players",
            mode.name(),
            map.name,
            settings.player_count
        );

        Ok(Self {
            world,
            events: Events::new(),
            bounds: WorldBounds::from_map(&map),
            map,
            mode,
            settings,
            item_slots,
            outcome: None,
        })
    }

    pub fn map(&self) -> &GameMap {
        &self.map
    }

    pub fn mode(&self) -> &dyn GameMode {
        self.mode.as_ref()
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn outcome(&self) -> Option<&RoundOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn time_remaining(&self) -> Option<std::time::Duration> {
        self.mode.time_remaining()
    }

    pub fn status_text(&self) -> String {
        self.mode.status_text()
    }

    /// Where every player is, for zone-based modes and the HUD.
    pub fn presences(&self) -> Vec<Presence> {
        self.world
            .player_entities()
            .into_iter()
            .filter_map(|e| {
                let player = self.world.get::<Player>(e)?;
                Some(Presence { slot: player.slot, bounds: self.world.bounds(e)?, alive: !player.dead })
            })
            .collect()
    }

    /// Advance one fixed step.
    pub fn step(&mut self, input: &FrameInput, dt: f32) {
        if self.outcome.is_some() {
            return;
        }
        self.events.damage.clear();
        self.events.respawn.clear();

        // =====================================================================
        // Input
        // =====================================================================
        for entity in self.world.player_entities() {
            if let Some(ic) = self.world.get_mut::<InputComponent>(entity) {
                let snapshot = input.player(ic.slot);
                ic.push(snapshot);
            }
        }

        self.tick_timers(dt);

        // =====================================================================
        // Movement: all physics, then all collision
        // =====================================================================
        physics::run(&mut self.world, &self.settings.physics, dt);
        let results = collision::run(&mut self.world, &self.map, &self.bounds);

        // =====================================================================
        // Interactions
        // =====================================================================
        self.apply_hazards(&results);
        self.apply_stomps();
        self.apply_star_contact();
        self.collect_items();

        self.animate(dt);

        // =====================================================================
        // Lifecycle
        // =====================================================================
        self.process_deaths();
        self.tick_item_spawns(dt);
        self.process_pickups();
        self.world.sweep();

        // =====================================================================
        // Win check
        // =====================================================================
        let presences = self.presences();
        self.mode.update(dt, &presences);
        let (over, winners) = self.mode.check_win_condition();
        if over {
            let roster = self.mode.roster();
            let outcome = RoundOutcome {
                winner_names: winners.iter().map(|&s| roster.name(s).to_string()).collect(),
                winners,
                scoreboard: self.mode.scoreboard(),
                elapsed: roster.elapsed(),
            };
            log::info!("round over after {:.1}s: {}", outcome.elapsed, outcome.headline());
            self.outcome = Some(outcome);
        }
    }

    fn tick_timers(&mut self, dt: f32) {
        for entity in self.world.player_entities() {
            if let Some(health) = self.world.get_mut::<Health>(entity) {
                health.tick(dt);
            }
            let invincible = self.world.get::<Health>(entity).map(|h| h.invincible).unwrap_or(false);

            let Some(player) = self.world.get_mut::<Player>(entity) else { continue };
            if player.power_up == PowerUp::Star && !invincible {
                player.power_up = PowerUp::None;
            }
            if !player.dead || player.is_eliminated() {
                continue;
            }
            player.respawn_timer -= dt;
            if player.respawn_timer <= 0.0 {
                self.respawn(entity);
            }
        }
    }

    fn respawn(&mut self, entity: Entity) {
        let Some(player) = self.world.get_mut::<Player>(entity) else { return };
        player.dead = false;
        player.respawn_timer = 0.0;
        let (slot, spawn) = (player.slot, player.spawn_position);

        let mut health = Health::new(1);
        health.set_invincible(SPAWN_INVINCIBILITY);
        self.world.insert(entity, health);
        if let Some(physics) = self.world.get_mut::<Physics>(entity) {
            physics.velocity = Vec2::ZERO;
            physics.acceleration = Vec2::ZERO;
            physics.on_ground = false;
            physics.ground_tile = None;
            physics.last_position = spawn;
        }
        if let Some(info) = self.world.info_mut(entity) {
            info.position = spawn;
            info.velocity = Vec2::ZERO;
            info.visible = true;
        }
        self.events.respawn.send(RespawnEvent { entity, slot });
        log::debug!("player {} respawned", slot);
    }

    fn alive_player(&self, entity: Entity) -> Option<&Player> {
        let player = self.world.get::<Player>(entity)?;
        let health = self.world.get::<Health>(entity)?;
        (!player.dead && !health.is_dead()).then_some(player)
    }

    /// Deal damage and queue the death when it's fatal. Returns whether
    /// the target died.
    fn damage(&mut self, target: Entity, source: Option<Entity>, amount: i32, cause: DeathCause) -> bool {
        let Some(victim_slot) = self.world.get::<Player>(target).map(|p| p.slot) else { return false };
        let Some(health) = self.world.get_mut::<Health>(target) else { return false };

        let before = health.current;
        let died = health.take_damage(amount);
        let dealt = before - health.current;
        if dealt <= 0 {
            return false;
        }
        if !died {
            health.max = health.current;
            health.set_invincible(HIT_INVINCIBILITY);
        }

        self.events.damage.send(DamageEvent { target, source, amount: dealt });
        if died {
            let killer_slot = source.and_then(|s| self.world.get::<Player>(s)).map(|p| p.slot);
            self.events.death.send(DeathEvent { victim: target, victim_slot, killer: source, killer_slot, cause });
        } else if let Some(player) = self.world.get_mut::<Player>(target) {
            player.power_up = PowerUp::None;
        }
        died
    }

    fn apply_hazards(&mut self, results: &[(Entity, CollisionResult)]) {
        for &(entity, ref result) in results {
            if !result.hazard || self.alive_player(entity).is_none() {
                continue;
            }
            let current = self.world.get::<Health>(entity).map(|h| h.current).unwrap_or(0);
            self.damage(entity, None, current, DeathCause::Hazard);
        }
    }

    fn same_team_protected(&self, a: usize, b: usize) -> bool {
        self.settings.mode == GameModeKind::CaptureTheFlag
            && !self.settings.friendly_fire
            && CaptureTheFlag::team_of(a) == CaptureTheFlag::team_of(b)
    }

    /// A falling player whose feet were above the victim's head last
    /// frame and whose box now overlaps the victim's.
    fn find_stomps(&self) -> Vec<(Entity, Entity)> {
        let players = self.world.player_entities();
        let mut stomps = Vec::new();
        for &stomper in &players {
            let Some(attacker) = self.alive_player(stomper) else { continue };
            let Some(body) = self.world.get::<Physics>(stomper) else { continue };
            if body.velocity.y <= 0.0 {
                continue;
            }
            let Some(now) = self.world.bounds(stomper) else { continue };
            let feet_before = body.world_bounds(body.last_position).bottom();

            for &victim in &players {
                if victim == stomper || stomps.iter().any(|&(_, v)| v == victim) {
                    continue;
                }
                let Some(target) = self.alive_player(victim) else { continue };
                if self.same_team_protected(attacker.slot, target.slot) {
                    continue;
                }
                let (Some(other), Some(victim_now)) = (self.world.get::<Physics>(victim), self.world.bounds(victim)) else {
                    continue;
                };
                let head_before = other.world_bounds(other.last_position).top();
                if feet_before <= head_before + STOMP_TOLERANCE && overlapping(&now, &victim_now) {
                    stomps.push((stomper, victim));
                    break;
                }
            }
        }
        stomps
    }

    fn apply_stomps(&mut self) {
        let bounce = self.settings.physics.stomp_bounce;
        for (stomper, victim) in self.find_stomps() {
            self.damage(victim, Some(stomper), 1, DeathCause::Stomp);
            if let Some(body) = self.world.get_mut::<Physics>(stomper) {
                body.velocity.y = -bounce;
                body.on_ground = false;
            }
        }
    }

    fn apply_star_contact(&mut self) {
        let players = self.world.player_entities();
        for &star in &players {
            let Some(attacker) = self.alive_player(star) else { continue };
            if attacker.power_up != PowerUp::Star {
                continue;
            }
            let attacker_slot = attacker.slot;
            let Some(star_box) = self.world.bounds(star) else { continue };
            for &victim in &players {
                if victim == star {
                    continue;
                }
                let Some(target) = self.alive_player(victim) else { continue };
                if self.same_team_protected(attacker_slot, target.slot) {
                    continue;
                }
                let touching = self.world.bounds(victim).map(|b| overlapping(&star_box, &b)).unwrap_or(false);
                if touching {
                    let current = self.world.get::<Health>(victim).map(|h| h.current).unwrap_or(0);
                    self.damage(victim, Some(star), current, DeathCause::Star);
                }
            }
        }
    }

    fn collect_items(&mut self) {
        let players = self.world.player_entities();
        for item in self.world.item_entities() {
            let Some(item_box) = self.world.bounds(item) else { continue };
            let collector = players.iter().copied().find(|&p| {
                self.alive_player(p).is_some()
                    && self.world.bounds(p).map(|b| overlapping(&b, &item_box)).unwrap_or(false)
            });
            let Some(collector) = collector else { continue };
            let Some(&Item { item_type, spawn_index }) = self.world.get::<Item>(item) else { continue };

            self.apply_item(collector, item_type);
            let slot = self.world.get::<Player>(collector).map(|p| p.slot).unwrap_or_default();
            self.events.item_collected.send(ItemCollectedEvent { collector, slot, item_type, spawn_index });
            self.world.despawn(item);
        }
    }

    fn apply_item(&mut self, collector: Entity, item_type: ItemType) {
        let power_up = match item_type {
            ItemType::Mushroom => Some(PowerUp::Super),
            ItemType::FireFlower => Some(PowerUp::Fire),
            ItemType::IceFlower => Some(PowerUp::Ice),
            ItemType::Star => Some(PowerUp::Star),
            ItemType::Coin | ItemType::OneUp => None,
        };

        if let Some(health) = self.world.get_mut::<Health>(collector) {
            match item_type {
                ItemType::Star => health.set_invincible(STAR_DURATION),
                ItemType::Mushroom | ItemType::FireFlower | ItemType::IceFlower => health.grow(2),
                _ => {}
            }
        }
        if let Some(player) = self.world.get_mut::<Player>(collector) {
            player.score += item_type.score();
            if let Some(power_up) = power_up {
                player.power_up = power_up;
            }
            if item_type == ItemType::OneUp {
                if let Some(lives) = player.lives.as_mut() {
                    *lives += 1;
                }
            }
        }
    }

    fn animate(&mut self, dt: f32) {
        for entity in self.world.player_entities() {
            if self.alive_player(entity).is_none() {
                continue;
            }
            let Some((velocity, on_ground)) = self.world.get::<Physics>(entity).map(|p| (p.velocity, p.on_ground)) else {
                continue;
            };
            let Some(anim) = self.world.get_mut::<Animation>(entity) else { continue };
            anim.play(pick_clip(velocity, on_ground));
            anim.advance(dt);
            let frame = anim.current_frame_rect();

            if let Some(sprite) = self.world.get_mut::<Sprite>(entity) {
                sprite.face_velocity(velocity.x);
                if let Some(frame) = frame {
                    sprite.source = frame;
                }
            }
        }
    }

    fn process_deaths(&mut self) {
        let deaths: Vec<DeathEvent> = self.events.death.drain().collect();
        for death in deaths {
            let mut eliminated = false;
            if let Some(player) = self.world.get_mut::<Player>(death.victim) {
                eliminated = !player.die();
            }
            if let Some(physics) = self.world.get_mut::<Physics>(death.victim) {
                physics.velocity = Vec2::ZERO;
                physics.acceleration = Vec2::ZERO;
            }
            if let Some(info) = self.world.info_mut(death.victim) {
                info.velocity = Vec2::ZERO;
                info.visible = false;
            }

            let bonus = self.mode.on_player_death(death.victim_slot, death.killer_slot);
            if bonus != 0 {
                let killer = death.killer_slot.and_then(|k| self.world.player_by_slot(k));
                if let Some(player) = killer.and_then(|k| self.world.get_mut::<Player>(k)) {
                    player.score += bonus;
                }
            }
            log::info!(
                "player {} died ({:?}), killer: {:?}",
                death.victim_slot,
                death.cause,
                death.killer_slot
            );

            if eliminated {
                self.mode.on_player_eliminated(death.victim_slot);
                log::info!("player {} is out of lives", death.victim_slot);
            }
        }
    }

    fn tick_item_spawns(&mut self, dt: f32) {
        for idx in 0..self.item_slots.len() {
            let ItemSlot::Waiting(remaining) = self.item_slots[idx] else { continue };
            let remaining = remaining - dt;
            self.item_slots[idx] = match self.map.item_spawns.get(idx) {
                Some(spawn) if remaining <= 0.0 => {
                    ItemSlot::Live(self.world.spawn_item(spawn.item_type, idx, spawn.position()))
                }
                _ => ItemSlot::Waiting(remaining),
            };
        }
    }

    fn process_pickups(&mut self) {
        let pickups: Vec<ItemCollectedEvent> = self.events.item_collected.drain().collect();
        for pickup in pickups {
            self.mode.on_item_collected(pickup.slot, pickup.item_type);
            let delay = self.map.item_spawns.get(pickup.spawn_index).map(|s| s.respawn_time);
            if let (Some(slot), Some(delay)) = (self.item_slots.get_mut(pickup.spawn_index), delay) {
                *slot = ItemSlot::Waiting(delay);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FIXED_DT;
    use crate::map::{ItemSpawn, SpawnPoint, TileType};
    use macroquad::math::vec2;

    fn floor_map(spawns: &[(f32, f32)]) -> GameMap {
        let mut map = GameMap::new(20, 10);
        map.fill(0..=19, 9..=9, TileType::Solid);
        map.spawn_points = spawns
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| SpawnPoint { x, y, player_index: i })
            .collect();
        map
    }

    fn settings(players: usize) -> GameSettings {
        GameSettings { player_count: players, time_limit: 0.0, ..GameSettings::default() }
    }

    fn run(round: &mut Round, frames: usize) {
        for _ in 0..frames {
            round.step(&FrameInput::default(), FIXED_DT);
        }
    }

    fn player(round: &Round, slot: usize) -> &Player {
        let e = round.world.player_by_slot(slot).unwrap();
        round.world.get::<Player>(e).unwrap()
    }

    #[test]
    fn test_missing_spawn_is_a_config_error() {
        let map = floor_map(&[(100.0, 288.0)]);
        let err = Round::new(settings(2), map).unwrap_err();
        assert_eq!(err, ConfigError::MissingSpawn { player: 1, available: 1 });
    }

    #[test]
    fn test_invalid_settings_never_build_a_round() {
        let map = floor_map(&[(100.0, 288.0)]);
        assert_eq!(Round::new(settings(0), map).unwrap_err(), ConfigError::NoPlayers);
        assert!(matches!(
            Round::new(settings(1), GameMap::new(0, 0)),
            Err(ConfigError::InvalidMap(_))
        ));
    }

    #[test]
    fn test_players_settle_on_the_floor() {
        let mut round = Round::new(settings(4), GameMap::arena()).unwrap();
        run(&mut round, 120);
        for e in round.world.player_entities() {
            assert!(round.world.get::<Physics>(e).unwrap().on_ground);
        }
        assert!(!round.is_over());
    }

    #[test]
    fn test_stomp_kills_and_credits_the_stomper() {
        let mut s = settings(2);
        s.kill_limit = 1;
        let map = floor_map(&[(100.0, 200.0), (100.0, 288.0)]);
        let mut round = Round::new(s, map).unwrap();
        run(&mut round, 60);

        assert!(player(&round, 1).dead);
        assert_eq!(player(&round, 1).lives, Some(2));
        assert_eq!(player(&round, 0).score, crate::mode::KILL_BONUS);
        assert_eq!(round.mode().kills(0), 1);

        let outcome = round.outcome().unwrap();
        assert_eq!(outcome.winners, vec![0]);
        assert_eq!(outcome.headline(), "Red wins!");
    }

    #[test]
    fn test_hazard_death_then_respawn_with_invincibility() {
        let mut map = floor_map(&[(100.0, 288.0)]);
        map.fill(0..=19, 8..=8, TileType::Hazard);
        let mut round = Round::new(settings(1), map).unwrap();

        run(&mut round, 1);
        assert!(player(&round, 0).dead);
        assert_eq!(player(&round, 0).lives, Some(2));
        assert_eq!(round.mode().kills(0), 0);

        run(&mut round, 185);
        let e = round.world.player_by_slot(0).unwrap();
        assert!(!player(&round, 0).dead);
        assert!(round.world.get::<Health>(e).unwrap().invincible);
        assert_eq!(round.world.position(e), Some(vec2(100.0, 288.0)));
    }

    #[test]
    fn test_last_life_eliminates() {
        let mut map = floor_map(&[(100.0, 288.0), (500.0, 288.0)]);
        map.fill(0..=5, 8..=8, TileType::Hazard);
        let mut s = settings(2);
        s.lives = 1;
        let mut round = Round::new(s, map).unwrap();

        run(&mut round, 1);
        assert!(player(&round, 0).is_eliminated());
        assert_eq!(round.outcome().map(|o| o.winners.clone()), Some(vec![1]));
    }

    #[test]
    fn test_coin_pickup_scores_and_respawns() {
        let mut map = floor_map(&[(100.0, 288.0)]);
        map.item_spawns = vec![ItemSpawn { x: 100.0, y: 288.0, item_type: ItemType::Coin, respawn_time: 1.0 }];
        let mut s = settings(1);
        s.mode = GameModeKind::CoinCollection;
        s.coin_limit = 0;
        let mut round = Round::new(s, map).unwrap();

        run(&mut round, 1);
        assert_eq!(player(&round, 0).score, ItemType::Coin.score());
        assert!(round.world.item_entities().is_empty());

        run(&mut round, 70);
        assert_eq!(player(&round, 0).score, 2 * ItemType::Coin.score());
        assert_eq!(round.mode().scoreboard()[0].value, 2.0);
    }

    #[test]
    fn test_mushroom_absorbs_one_stomp() {
        let mut map = floor_map(&[(100.0, 200.0), (100.0, 288.0)]);
        map.item_spawns = vec![ItemSpawn { x: 100.0, y: 288.0, item_type: ItemType::Mushroom, respawn_time: 60.0 }];
        let mut round = Round::new(settings(2), map).unwrap();
        run(&mut round, 60);

        let victim = round.world.player_by_slot(1).unwrap();
        assert!(!player(&round, 1).dead);
        assert_eq!(player(&round, 1).power_up, PowerUp::None);
        assert!(round.world.get::<Health>(victim).unwrap().invincible);
    }

    #[test]
    fn test_friendly_fire_off_protects_teammates() {
        let mut s = settings(3);
        s.mode = GameModeKind::CaptureTheFlag;
        s.friendly_fire = false;
        let map = floor_map(&[(100.0, 200.0), (500.0, 288.0), (100.0, 288.0)]);
        let mut round = Round::new(s, map).unwrap();
        run(&mut round, 60);
        assert!(!player(&round, 2).dead);
    }

    #[test]
    fn test_ground_flag_clears_the_frame_after_a_jump() {
        let mut round = Round::new(settings(1), floor_map(&[(100.0, 288.0)])).unwrap();
        run(&mut round, 10);
        let e = round.world.player_by_slot(0).unwrap();
        assert!(round.world.get::<Physics>(e).unwrap().on_ground);

        let jump = FrameInput::with_player(0, crate::input::PlayerInput { jump: true, ..Default::default() });
        round.step(&jump, FIXED_DT);

        let body = round.world.get::<Physics>(e).unwrap();
        assert!(!body.on_ground);
        assert!(body.velocity.y < 0.0);
        assert!(round.world.position(e).unwrap().y < 288.0);
    }

    #[test]
    fn test_fall_into_floor_ends_flush_in_one_step() {
        let mut round = Round::new(settings(1), floor_map(&[(100.0, 200.0)])).unwrap();
        let e = round.world.player_by_slot(0).unwrap();
        round.world.set_position(e, vec2(100.0, 284.0));
        if let Some(body) = round.world.get_mut::<Physics>(e) {
            body.velocity.y = 600.0;
        }

        // Integration alone would put the feet 6px inside the floor
        round.step(&FrameInput::default(), FIXED_DT);

        let body = round.world.get::<Physics>(e).unwrap();
        assert_eq!(round.world.position(e), Some(vec2(100.0, 288.0)));
        assert!(body.on_ground);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn test_clip_selection() {
        assert_eq!(pick_clip(vec2(0.0, -50.0), false), "jump");
        assert_eq!(pick_clip(vec2(0.0, 50.0), false), "fall");
        assert_eq!(pick_clip(vec2(120.0, 0.0), true), "walk");
        assert_eq!(pick_clip(vec2(5.0, 0.0), true), "idle");
    }

    #[test]
    fn test_running_player_walks_and_faces_left() {
        let map = floor_map(&[(300.0, 288.0)]);
        let mut round = Round::new(settings(1), map).unwrap();
        let left = FrameInput::with_player(0, crate::input::PlayerInput { left: true, ..Default::default() });
        for _ in 0..30 {
            round.step(&left, FIXED_DT);
        }
        let e = round.world.player_by_slot(0).unwrap();
        assert_eq!(round.world.get::<Animation>(e).unwrap().current(), Some("walk"));
        assert!(round.world.get::<Sprite>(e).unwrap().flip_x);
    }
}
