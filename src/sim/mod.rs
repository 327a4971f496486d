//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod category;
pub mod collision;
pub mod contact;
pub mod host;
pub mod launch;
pub mod movement;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timer;
pub mod world;

pub use category::{CategoryMask, ContactFilter};
pub use collision::{Shape, shapes_overlap, swept_overlap};
pub use contact::{ContactResolution, resolve_contact};
pub use host::{EntityFactory, MovementScheduler, PresentationHandoff, RandomSource};
pub use launch::{Launched, Launcher};
pub use movement::{Arrival, ArrivalAction, ArrivalResolution, Movement, handle_arrival};
pub use spawn::{SpawnEvent, SpawnScheduler, Spawned};
pub use state::{
    Entity, EntityId, EntityKind, EntitySpec, GameEvent, GameSession, Lifecycle, Outcome,
    PhysicsBody, SessionPhase,
};
pub use tick::{GameState, TickInput, intercept_time, tick};
pub use timer::IntervalTimer;
pub use world::{Contact, ContactBody, World};
