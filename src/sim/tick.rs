//! Fixed timestep simulation tick
//!
//! Core game loop that advances a session deterministically. Within one tick
//! the order is: spawn timer, launches, movement, contacts, arrivals. Contacts
//! are therefore always resolved before a same-tick arrival can remove (or
//! lose with) an entity that was just hit.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::contact::{ContactResolution, resolve_contact};
use super::host::{EntityFactory, PresentationHandoff};
use super::launch::Launcher;
use super::movement::handle_arrival;
use super::spawn::SpawnScheduler;
use super::state::{EntityId, EntityKind, EntitySpec, GameEvent, GameSession, Outcome};
use super::timer::IntervalTimer;
use super::world::World;
use crate::consts::PLAYER_ASSET;
use crate::settings::Settings;

/// Seconds between autoplay shots
const AUTOPLAY_COOLDOWN: f32 = 0.25;
/// Autoplay ignores monsters closer than this to the player (horizontally)
const AUTOPLAY_MIN_LEAD: f32 = 40.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Tapped points in scene coordinates, one launch each
    pub taps: Vec<Vec2>,
    /// Idle/demo mode - AI aims at incoming monsters
    pub autoplay: bool,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub session: GameSession,
    pub world: World,
    pub rng: Pcg32,
    pub spawn_timer: IntervalTimer,
    pub spawner: SpawnScheduler,
    pub launcher: Launcher,
    pub player: EntityId,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated seconds
    pub elapsed: f32,
    /// Events since the last `drain_events`
    pub events: Vec<GameEvent>,
    autoplay_cooldown: f32,
}

impl GameState {
    /// Create a new session; the player is placed immediately
    pub fn new(settings: Settings) -> Self {
        let mut world = World::new();
        let player = world.create_entity(EntitySpec {
            asset: PLAYER_ASSET,
            kind: EntityKind::Player,
            position: settings.player_position(),
            body: None,
        });

        Self {
            session: GameSession::new(settings.win_threshold, settings.loss_enabled),
            world,
            rng: Pcg32::seed_from_u64(settings.seed),
            spawn_timer: IntervalTimer::every(settings.spawn_interval),
            spawner: SpawnScheduler::from_settings(&settings),
            launcher: Launcher::from_settings(&settings),
            player,
            time_ticks: 0,
            elapsed: 0.0,
            events: Vec::new(),
            autoplay_cooldown: 0.0,
            settings,
        }
    }

    pub fn player_position(&self) -> Vec2 {
        self.world
            .get(self.player)
            .map_or_else(|| self.settings.player_position(), |p| p.pos)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.session.outcome()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Pick an intercept point for the monster closest to escaping
    fn autoplay_target(&self) -> Option<Vec2> {
        let origin = self.player_position();
        let speed = self.launcher.range / self.launcher.flight_secs;

        let monster = self
            .world
            .active(EntityKind::Monster)
            .filter(|m| m.pos.x > origin.x + AUTOPLAY_MIN_LEAD)
            .min_by(|a, b| {
                a.pos
                    .x
                    .partial_cmp(&b.pos.x)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })?;

        let t = intercept_time(monster.pos - origin, monster.velocity(), speed)
            .filter(|&t| t <= self.launcher.flight_secs)
            .unwrap_or(0.0);
        Some(monster.pos + monster.velocity() * t)
    }
}

/// Earliest time a shot at `speed` from the origin meets a target at `rel`
/// moving with `vel`, if any
pub fn intercept_time(rel: Vec2, vel: Vec2, speed: f32) -> Option<f32> {
    // |rel + vel * t| = speed * t
    let a = vel.length_squared() - speed * speed;
    let b = 2.0 * rel.dot(vel);
    let c = rel.length_squared();

    if a.abs() < 1e-6 {
        if b.abs() < 1e-6 {
            return None;
        }
        let t = -c / b;
        return (t > 0.0).then_some(t);
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sqrt = disc.sqrt();
    let t1 = (-b - sqrt) / (2.0 * a);
    let t2 = (-b + sqrt) / (2.0 * a);
    [t1, t2]
        .into_iter()
        .filter(|t| *t > 0.0)
        .min_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal))
}

/// Advance the game state by one fixed timestep
pub fn tick<P>(state: &mut GameState, input: &TickInput, dt: f32, presenter: &mut P)
where
    P: PresentationHandoff + ?Sized,
{
    // A finished session stops ticking
    if state.session.is_over() {
        return;
    }

    state.time_ticks += 1;
    state.elapsed += dt;

    // Spawns
    let fires = state.spawn_timer.advance(dt);
    for _ in 0..fires {
        if let Some(spawned) = state
            .spawner
            .tick(&state.session, &mut state.world, &mut state.rng)
        {
            state.events.push(GameEvent::MonsterSpawned {
                id: spawned.id,
                y: spawned.event.y,
                duration: spawned.event.duration,
            });
        }
    }

    // Launches
    let mut taps = input.taps.clone();
    if input.autoplay {
        state.autoplay_cooldown -= dt;
        if state.autoplay_cooldown <= 0.0 {
            if let Some(target) = state.autoplay_target() {
                taps.push(target);
                state.autoplay_cooldown = AUTOPLAY_COOLDOWN;
            }
        }
    }
    let origin = state.player_position();
    for target in taps {
        match state.launcher.launch(&mut state.world, origin, target) {
            Some(launched) => state.events.push(GameEvent::ProjectileLaunched {
                id: launched.id,
                direction: launched.direction,
            }),
            None => state.events.push(GameEvent::LaunchRejected { target }),
        }
    }

    // Movement
    let arrivals = state.world.advance(dt);

    // Contacts
    for contact in state.world.detect_contacts() {
        let resolution = resolve_contact(
            &mut state.session,
            &mut state.world,
            presenter,
            contact.a,
            contact.b,
        );
        if let ContactResolution::Hit {
            monster,
            projectile,
            destroyed,
            outcome,
        } = resolution
        {
            state.events.push(GameEvent::MonsterDestroyed {
                monster,
                projectile,
                total: destroyed,
            });
            if let Some(outcome) = outcome {
                state.events.push(GameEvent::SessionOver { outcome });
            }
        }
    }

    // Arrivals of entities that survived their contacts
    for arrival in arrivals {
        let kind = state.world.get(arrival.id).map(|e| e.kind);
        let resolution = handle_arrival(&mut state.session, &mut state.world, presenter, arrival);
        if let Some(outcome) = resolution.outcome {
            state.events.push(GameEvent::SessionOver { outcome });
        }
        if let (true, Some(kind)) = (resolution.removed, kind) {
            state.events.push(GameEvent::Despawned {
                id: arrival.id,
                kind,
                action: arrival.action,
            });
        }
    }

    state.world.sweep();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Variant;
    use crate::consts::SIM_DT;

    #[test]
    fn test_player_placed_at_start() {
        let state = GameState::new(Settings::default());
        let player = state.world.get(state.player).unwrap();
        assert_eq!(player.kind, EntityKind::Player);
        assert_eq!(player.pos, state.settings.player_position());
        assert!(player.body.is_none());
    }

    #[test]
    fn test_first_tick_spawns_monster() {
        let mut state = GameState::new(Settings::default());
        let mut outcomes: Vec<Outcome> = Vec::new();
        tick(&mut state, &TickInput::default(), SIM_DT, &mut outcomes);

        assert_eq!(state.world.active_count(EntityKind::Monster), 1);
        let events = state.drain_events();
        assert!(matches!(events[0], GameEvent::MonsterSpawned { .. }));
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_spawn_cadence() {
        let mut state = GameState::new(Settings::from_variant(Variant::Circles));
        let mut outcomes: Vec<Outcome> = Vec::new();
        // 1.5 seconds of play: spawns at t=0 and t=1
        for _ in 0..90 {
            tick(&mut state, &TickInput::default(), SIM_DT, &mut outcomes);
        }
        let spawned = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::MonsterSpawned { .. }))
            .count();
        assert_eq!(spawned, 2);
    }

    #[test]
    fn test_spawn_cadence_over_ten_seconds() {
        let mut state = GameState::new(Settings::from_variant(Variant::Circles));
        let mut outcomes: Vec<Outcome> = Vec::new();
        for _ in 0..600 {
            tick(&mut state, &TickInput::default(), SIM_DT, &mut outcomes);
        }
        let spawned = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::MonsterSpawned { .. }))
            .count();
        assert_eq!(spawned, 10);
    }

    #[test]
    fn test_unvalidated_tiny_interval_still_ticks() {
        let settings = Settings {
            spawn_interval: 1e-10,
            ..Settings::from_variant(Variant::Circles)
        };
        let mut state = GameState::new(settings);
        let mut outcomes: Vec<Outcome> = Vec::new();
        tick(&mut state, &TickInput::default(), SIM_DT, &mut outcomes);
        tick(&mut state, &TickInput::default(), SIM_DT, &mut outcomes);
        assert_eq!(state.time_ticks, 2);
    }

    #[test]
    fn test_tap_launches_and_leftward_tap_rejected() {
        let mut state = GameState::new(Settings::default());
        let mut outcomes: Vec<Outcome> = Vec::new();
        let origin = state.player_position();
        let input = TickInput {
            taps: vec![origin + Vec2::new(100.0, 0.0), origin - Vec2::new(100.0, 0.0)],
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT, &mut outcomes);

        assert_eq!(state.world.active_count(EntityKind::Projectile), 1);
        assert!(state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::LaunchRejected { .. })));
    }

    #[test]
    fn test_projectile_removed_after_flight() {
        let mut state = GameState::new(Settings::from_variant(Variant::Circles));
        let mut outcomes: Vec<Outcome> = Vec::new();
        let origin = state.player_position();
        let input = TickInput {
            // Straight up, away from every monster lane's spawn point
            taps: vec![origin + Vec2::new(0.0, 10.0)],
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT, &mut outcomes);
        assert_eq!(state.world.active_count(EntityKind::Projectile), 1);

        for _ in 0..130 {
            tick(&mut state, &TickInput::default(), SIM_DT, &mut outcomes);
        }
        assert_eq!(state.world.active_count(EntityKind::Projectile), 0);
        assert!(state.events.iter().any(|e| matches!(
            e,
            GameEvent::Despawned {
                kind: EntityKind::Projectile,
                ..
            }
        )));
    }

    #[test]
    fn test_intercept_time() {
        // Target 100 units ahead, standing still, shot at 50 u/s
        let t = intercept_time(Vec2::new(100.0, 0.0), Vec2::ZERO, 50.0).unwrap();
        assert!((t - 2.0).abs() < 1e-4);

        // Target approaching head-on at 50 u/s
        let t = intercept_time(Vec2::new(100.0, 0.0), Vec2::new(-50.0, 0.0), 50.0).unwrap();
        assert!((t - 1.0).abs() < 1e-4);

        // Target running away faster than the shot
        assert!(intercept_time(Vec2::new(100.0, 0.0), Vec2::new(80.0, 0.0), 50.0).is_none());
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let settings = Settings {
            seed: 99999,
            ..Settings::default()
        };
        let mut state1 = GameState::new(settings.clone());
        let mut state2 = GameState::new(settings);
        let mut outcomes1: Vec<Outcome> = Vec::new();
        let mut outcomes2: Vec<Outcome> = Vec::new();

        let input = TickInput {
            autoplay: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut state1, &input, SIM_DT, &mut outcomes1);
            tick(&mut state2, &input, SIM_DT, &mut outcomes2);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.events, state2.events);
        assert_eq!(outcomes1, outcomes2);
        assert_eq!(
            state1.session.monsters_destroyed,
            state2.session.monsters_destroyed
        );
    }

    #[test]
    fn test_finished_session_stops_ticking() {
        let mut state = GameState::new(Settings::default());
        let mut outcomes: Vec<Outcome> = Vec::new();
        state.session.finish(Outcome::Lost);
        tick(&mut state, &TickInput::default(), SIM_DT, &mut outcomes);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.world.active_count(EntityKind::Monster), 0);
    }
}
