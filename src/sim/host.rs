//! Seams between the simulation core and whatever hosts it
//!
//! The core never owns rendering, audio or scene transitions. It creates and
//! removes entities, schedules their moves, draws random numbers and hands a
//! finished session off through these traits. [`World`](super::World) is the
//! built-in implementation of the entity and movement seams.

use glam::Vec2;
use rand::{Rng, RngCore};

use super::category::CategoryMask;
use super::movement::ArrivalAction;
use super::state::{EntityId, EntitySpec, Outcome};

/// Creates and removes entities in the host's scene
pub trait EntityFactory {
    fn create_entity(&mut self, spec: EntitySpec) -> EntityId;

    /// Remove an entity, cancelling its pending move.
    ///
    /// Returns false if it was already removed (or can never be removed).
    fn remove_entity(&mut self, id: EntityId) -> bool;

    fn is_active(&self, id: EntityId) -> bool;

    /// Category bits of an active entity
    fn category_of(&self, id: EntityId) -> Option<CategoryMask>;
}

/// Moves entities along straight lines and reports arrivals
pub trait MovementScheduler {
    /// Start a constant-velocity move. Returns false if the entity is gone.
    fn move_linear(
        &mut self,
        id: EntityId,
        from: Vec2,
        to: Vec2,
        duration: f32,
        on_arrival: ArrivalAction,
    ) -> bool;
}

/// Uniform random draws
pub trait RandomSource {
    /// Draw from `[min, max]`; returns `min` for an empty or inverted range
    fn uniform(&mut self, min: f32, max: f32) -> f32;
}

impl<R: RngCore> RandomSource for R {
    fn uniform(&mut self, min: f32, max: f32) -> f32 {
        if !(max > min) {
            return min;
        }
        self.random_range(min..=max)
    }
}

/// Receives the session outcome (scene transition, sound, UI)
pub trait PresentationHandoff {
    fn present_outcome(&mut self, outcome: Outcome);
}

/// Collects outcomes, mostly for tests and headless runs
impl PresentationHandoff for Vec<Outcome> {
    fn present_outcome(&mut self, outcome: Outcome) {
        self.push(outcome);
    }
}
