//! Entities, session bookkeeping and events
//!
//! The session counters are explicit state handed to the resolvers, never
//! module-level globals.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::category::{CategoryMask, ContactFilter};
use super::collision::Shape;
use super::movement::{ArrivalAction, Movement};

/// Entity identifier, allocated in increasing order
pub type EntityId = u32;

/// What an entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Created once at scene start, never removed
    Player,
    Monster,
    Projectile,
}

impl EntityKind {
    /// Category bits an entity of this kind carries
    pub fn category(&self) -> CategoryMask {
        match self {
            EntityKind::Player => CategoryMask::NONE,
            EntityKind::Monster => CategoryMask::MONSTER,
            EntityKind::Projectile => CategoryMask::PROJECTILE,
        }
    }
}

/// Lifecycle of an entity within the active set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    Active,
    /// Removed this tick; swept out at the end of the tick
    PendingRemoval,
}

/// Physics body attached to an entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsBody {
    pub shape: Shape,
    pub filter: ContactFilter,
    /// Swept (continuous) detection for fast, small bodies
    pub precise: bool,
}

/// Everything the entity factory needs to create an entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySpec {
    /// Sprite asset name for the host's renderer
    pub asset: &'static str,
    pub kind: EntityKind,
    pub position: Vec2,
    pub body: Option<PhysicsBody>,
}

/// A live game object
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub asset: &'static str,
    pub pos: Vec2,
    /// Position at the start of the current step (for swept contacts)
    pub prev_pos: Vec2,
    pub body: Option<PhysicsBody>,
    pub lifecycle: Lifecycle,
    /// Pending linear move, cancelled on removal
    pub movement: Option<Movement>,
}

impl Entity {
    pub fn new(id: EntityId, spec: EntitySpec) -> Self {
        Self {
            id,
            kind: spec.kind,
            asset: spec.asset,
            pos: spec.position,
            prev_pos: spec.position,
            body: spec.body,
            lifecycle: Lifecycle::Active,
            movement: None,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Active
    }

    /// Category bits from the body, or the kind if there is no body
    pub fn category(&self) -> CategoryMask {
        self.body
            .map(|b| b.filter.category)
            .unwrap_or_else(|| self.kind.category())
    }

    /// Current velocity implied by the pending move
    pub fn velocity(&self) -> Vec2 {
        self.movement.as_ref().map_or(Vec2::ZERO, Movement::velocity)
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

/// Session state machine: `Playing -> Won | Lost`, terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Playing,
    Over(Outcome),
}

/// Per-session scoring and outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub monsters_destroyed: u32,
    pub phase: SessionPhase,
    /// Won once `monsters_destroyed` is strictly greater than this
    pub win_threshold: u32,
    /// Escaped monsters end the session
    pub loss_enabled: bool,
}

impl GameSession {
    pub fn new(win_threshold: u32, loss_enabled: bool) -> Self {
        Self {
            monsters_destroyed: 0,
            phase: SessionPhase::Playing,
            win_threshold,
            loss_enabled,
        }
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        matches!(self.phase, SessionPhase::Over(_))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            SessionPhase::Playing => None,
            SessionPhase::Over(outcome) => Some(outcome),
        }
    }

    /// End the session. Returns false if it had already ended.
    pub fn finish(&mut self, outcome: Outcome) -> bool {
        if self.is_over() {
            return false;
        }
        self.phase = SessionPhase::Over(outcome);
        log::info!(
            "Session over: {:?} ({} monsters destroyed)",
            outcome,
            self.monsters_destroyed
        );
        true
    }

    /// Count a destroyed monster, returning `Won` if this hit crossed the threshold
    pub fn record_hit(&mut self) -> Option<Outcome> {
        self.monsters_destroyed += 1;
        if self.monsters_destroyed > self.win_threshold && self.finish(Outcome::Won) {
            return Some(Outcome::Won);
        }
        None
    }
}

/// Events emitted by the simulation for the host (sound, effects, HUD)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    MonsterSpawned {
        id: EntityId,
        y: f32,
        duration: f32,
    },
    ProjectileLaunched {
        id: EntityId,
        direction: Vec2,
    },
    LaunchRejected {
        target: Vec2,
    },
    MonsterDestroyed {
        monster: EntityId,
        projectile: EntityId,
        total: u32,
    },
    /// Reached the end of its move without being hit
    Despawned {
        id: EntityId,
        kind: EntityKind,
        action: ArrivalAction,
    },
    SessionOver {
        outcome: Outcome,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_fires_after_threshold() {
        let mut session = GameSession::new(15, false);
        for _ in 0..15 {
            assert_eq!(session.record_hit(), None);
        }
        assert!(!session.is_over());

        // 16th hit: 16 > 15
        assert_eq!(session.record_hit(), Some(Outcome::Won));
        assert_eq!(session.outcome(), Some(Outcome::Won));

        // Never fires twice
        assert_eq!(session.record_hit(), None);
        assert!(!session.finish(Outcome::Lost));
        assert_eq!(session.outcome(), Some(Outcome::Won));
    }

    #[test]
    fn test_lost_is_terminal() {
        let mut session = GameSession::new(15, true);
        assert!(session.finish(Outcome::Lost));
        assert!(!session.finish(Outcome::Lost));
        assert!(!session.finish(Outcome::Won));
        assert_eq!(session.phase, SessionPhase::Over(Outcome::Lost));
    }

    #[test]
    fn test_zero_threshold() {
        let mut session = GameSession::new(0, false);
        assert_eq!(session.record_hit(), Some(Outcome::Won));
    }

    #[test]
    fn test_entity_category_prefers_body() {
        let spec = EntitySpec {
            asset: "Tomato",
            kind: EntityKind::Monster,
            position: Vec2::ZERO,
            body: None,
        };
        let mut entity = Entity::new(1, spec);
        assert_eq!(entity.category(), CategoryMask::MONSTER);

        entity.body = Some(PhysicsBody {
            shape: Shape::circle(4.0),
            filter: ContactFilter {
                category: CategoryMask::from_bits(0b100),
                notify: CategoryMask::NONE,
                collide: CategoryMask::NONE,
            },
            precise: false,
        });
        assert_eq!(entity.category(), CategoryMask::from_bits(0b100));
        assert!(entity.is_active());
        assert_eq!(entity.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_event_json_tag() {
        let event = GameEvent::SessionOver {
            outcome: Outcome::Won,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"SessionOver""#));
        assert!(json.contains(r#""outcome":"Won""#));
    }
}
