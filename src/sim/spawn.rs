//! Periodic monster spawning
//!
//! Each fire of the spawn timer creates one monster just off the right edge
//! at a random height and sends it to just off the left edge at a random
//! constant speed.

use glam::Vec2;

use super::category::ContactFilter;
use super::collision::Shape;
use super::host::{EntityFactory, MovementScheduler, RandomSource};
use super::movement::ArrivalAction;
use super::state::{EntityId, EntityKind, EntitySpec, GameSession, PhysicsBody};
use crate::consts::MONSTER_ASSET;
use crate::settings::{MonsterShape, Settings};

/// Random parameters for one spawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnEvent {
    pub y: f32,
    /// Seconds to cross the field
    pub duration: f32,
}

/// A monster created by the scheduler
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawned {
    pub id: EntityId,
    pub event: SpawnEvent,
}

/// Creates monsters and schedules their traversal
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    pub field_size: Vec2,
    pub monster_size: Vec2,
    pub shape: MonsterShape,
    pub min_duration: f32,
    pub max_duration: f32,
    pub loss_enabled: bool,
}

impl SpawnScheduler {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            field_size: settings.field_size,
            monster_size: settings.monster_size,
            shape: settings.monster_shape,
            min_duration: settings.min_duration,
            max_duration: settings.max_duration,
            loss_enabled: settings.loss_enabled,
        }
    }

    /// Draw a height that keeps the whole sprite on screen, and a duration
    pub fn draw<R: RandomSource + ?Sized>(&self, rng: &mut R) -> SpawnEvent {
        let half_height = self.monster_size.y / 2.0;
        let y = rng.uniform(half_height, self.field_size.y - half_height);
        let duration = rng.uniform(self.min_duration, self.max_duration);
        SpawnEvent { y, duration }
    }

    /// Collision shape for a monster under the configured policy
    pub fn monster_shape(&self) -> Shape {
        match self.shape {
            MonsterShape::Circle => Shape::circle(self.monster_size.x / 4.0),
            MonsterShape::Rectangle => Shape::rect(self.monster_size),
        }
    }

    /// Just off the right edge
    pub fn spawn_position(&self, y: f32) -> Vec2 {
        Vec2::new(self.field_size.x + self.monster_size.x / 2.0, y)
    }

    /// Just off the left edge
    pub fn exit_position(&self, y: f32) -> Vec2 {
        Vec2::new(-self.monster_size.x / 2.0, y)
    }

    pub fn arrival_action(&self) -> ArrivalAction {
        if self.loss_enabled {
            ArrivalAction::LoseThenRemove
        } else {
            ArrivalAction::Remove
        }
    }

    /// Spawn one monster from a drawn event
    pub fn spawn<W>(&self, world: &mut W, event: SpawnEvent) -> EntityId
    where
        W: EntityFactory + MovementScheduler + ?Sized,
    {
        let from = self.spawn_position(event.y);
        let to = self.exit_position(event.y);
        let id = world.create_entity(EntitySpec {
            asset: MONSTER_ASSET,
            kind: EntityKind::Monster,
            position: from,
            body: Some(PhysicsBody {
                shape: self.monster_shape(),
                filter: ContactFilter::MONSTER,
                precise: false,
            }),
        });
        world.move_linear(id, from, to, event.duration, self.arrival_action());
        log::debug!(
            "Spawned monster {} at y={:.1}, crossing in {:.2}s",
            id,
            event.y,
            event.duration
        );
        id
    }

    /// One timer fire. Nothing spawns once the session has ended.
    pub fn tick<W, R>(&self, session: &GameSession, world: &mut W, rng: &mut R) -> Option<Spawned>
    where
        W: EntityFactory + MovementScheduler + ?Sized,
        R: RandomSource + ?Sized,
    {
        if session.is_over() {
            return None;
        }
        let event = self.draw(rng);
        let id = self.spawn(world, event);
        Some(Spawned { id, event })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Variant;
    use crate::sim::category::CategoryMask;
    use crate::sim::state::Outcome;
    use crate::sim::world::World;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_draw_within_bounds() {
        let spawner = SpawnScheduler::from_settings(&Settings::default());
        let mut rng = Pcg32::seed_from_u64(7);
        let half = spawner.monster_size.y / 2.0;
        for _ in 0..500 {
            let event = spawner.draw(&mut rng);
            assert!(event.y >= half && event.y <= spawner.field_size.y - half);
            assert!(event.duration >= 2.0 && event.duration <= 4.0);
        }
    }

    #[test]
    fn test_spawned_monster_body_and_path() {
        let spawner = SpawnScheduler::from_settings(&Settings::default());
        let mut world = World::new();
        let id = spawner.spawn(&mut world, SpawnEvent { y: 200.0, duration: 3.0 });

        let monster = world.get(id).unwrap();
        assert_eq!(monster.kind, EntityKind::Monster);
        assert_eq!(monster.pos, Vec2::new(spawner.field_size.x + 32.0, 200.0));

        let body = monster.body.unwrap();
        assert_eq!(body.shape, Shape::circle(16.0));
        assert_eq!(body.filter.category, CategoryMask::MONSTER);
        assert_eq!(body.filter.notify, CategoryMask::PROJECTILE);
        assert_eq!(body.filter.collide, CategoryMask::NONE);
        assert!(!body.precise);

        let movement = monster.movement.as_ref().unwrap();
        assert_eq!(movement.to, Vec2::new(-32.0, 200.0));
        assert_eq!(movement.duration, 3.0);
        assert_eq!(movement.on_arrival, ArrivalAction::LoseThenRemove);
    }

    #[test]
    fn test_rectangle_policy() {
        let spawner = SpawnScheduler::from_settings(&Settings::from_variant(Variant::Classic));
        assert_eq!(spawner.monster_shape(), Shape::rect(spawner.monster_size));
        assert_eq!(spawner.arrival_action(), ArrivalAction::Remove);
    }

    #[test]
    fn test_no_spawn_after_outcome() {
        let spawner = SpawnScheduler::from_settings(&Settings::default());
        let mut world = World::new();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut session = GameSession::new(15, true);

        assert!(spawner.tick(&session, &mut world, &mut rng).is_some());
        session.finish(Outcome::Lost);
        assert!(spawner.tick(&session, &mut world, &mut rng).is_none());
        assert_eq!(world.active_count(EntityKind::Monster), 1);
    }
}
