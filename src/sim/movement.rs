//! Linear moves and what happens when they finish

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::host::{EntityFactory, PresentationHandoff};
use super::state::{EntityId, GameSession, Outcome};

/// What to do when an entity reaches the end of its move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArrivalAction {
    /// Remove the entity
    Remove,
    /// End the session as Lost, then remove the entity
    LoseThenRemove,
}

/// Constant-velocity move from `from` to `to` over `duration` seconds
#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    pub from: Vec2,
    pub to: Vec2,
    pub duration: f32,
    pub elapsed: f32,
    pub on_arrival: ArrivalAction,
}

impl Movement {
    pub fn new(from: Vec2, to: Vec2, duration: f32, on_arrival: ArrivalAction) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            on_arrival,
        }
    }

    /// Fraction of the move completed, in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.from.lerp(self.to, self.progress())
    }

    pub fn velocity(&self) -> Vec2 {
        if self.duration <= 0.0 {
            Vec2::ZERO
        } else {
            (self.to - self.from) / self.duration
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Advance by `dt`, returning true once the destination is reached
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        self.is_finished()
    }
}

/// An entity that reached the end of its move this step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrival {
    pub id: EntityId,
    pub action: ArrivalAction,
}

/// Result of handling one arrival
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArrivalResolution {
    /// The entity was still active and has now been removed
    pub removed: bool,
    /// The arrival ended the session
    pub outcome: Option<Outcome>,
}

/// Finish a move: entities already removed (e.g. by a contact) are skipped,
/// a loss-triggering arrival ends the session before the entity goes away.
pub fn handle_arrival<F, P>(
    session: &mut GameSession,
    entities: &mut F,
    presenter: &mut P,
    arrival: Arrival,
) -> ArrivalResolution
where
    F: EntityFactory + ?Sized,
    P: PresentationHandoff + ?Sized,
{
    if !entities.is_active(arrival.id) {
        return ArrivalResolution::default();
    }

    let mut outcome = None;
    if arrival.action == ArrivalAction::LoseThenRemove && session.finish(Outcome::Lost) {
        log::debug!("Entity {} escaped the field", arrival.id);
        presenter.present_outcome(Outcome::Lost);
        outcome = Some(Outcome::Lost);
    }

    ArrivalResolution {
        removed: entities.remove_entity(arrival.id),
        outcome,
    }
}
