//! Pea Shooter - spawn, contact and outcome core for a 2D shooting game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, movement, contacts, session outcome)
//! - `settings`: Data-driven tuning and snapshot variants

pub mod settings;
pub mod sim;

pub use settings::{ConfigError, MonsterShape, Settings, Variant};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play field dimensions (scene units)
    pub const FIELD_WIDTH: f32 = 1024.0;
    pub const FIELD_HEIGHT: f32 = 768.0;

    /// Player anchor as a fraction of the field size
    pub const PLAYER_X_FRACTION: f32 = 0.1;
    pub const PLAYER_Y_FRACTION: f32 = 0.5;

    /// Sprite sizes
    pub const PLAYER_SIZE: (f32, f32) = (54.0, 80.0);
    pub const MONSTER_SIZE: (f32, f32) = (64.0, 64.0);
    pub const PROJECTILE_SIZE: (f32, f32) = (24.0, 24.0);

    /// Monster spawn cadence (seconds)
    pub const SPAWN_INTERVAL: f32 = 1.0;
    /// Shortest accepted spawn cadence: one spawn per simulation step
    pub const MIN_SPAWN_INTERVAL: f32 = SIM_DT;
    /// Monster traversal duration range (seconds)
    pub const MONSTER_MIN_DURATION: f32 = 2.0;
    pub const MONSTER_MAX_DURATION: f32 = 4.0;

    /// Projectile flight: distance along the aim, then removed
    pub const PROJECTILE_RANGE: f32 = 1000.0;
    pub const PROJECTILE_FLIGHT_SECS: f32 = 2.0;

    /// Win fires once destroyed count is strictly greater than this
    pub const WIN_THRESHOLD: u32 = 15;

    /// Sprite asset names handed to the host's entity factory
    pub const PLAYER_ASSET: &str = "Pod";
    pub const MONSTER_ASSET: &str = "Tomato";
    pub const PROJECTILE_ASSET: &str = "Pea";
}

/// Unit vector from `origin` toward `target`, or `None` when the two points
/// coincide (or the offset is not finite)
#[inline]
pub fn aim_direction(origin: Vec2, target: Vec2) -> Option<Vec2> {
    (target - origin).try_normalize()
}

/// Point reached after travelling `distance` from `origin` along `direction`
#[inline]
pub fn project_along(origin: Vec2, direction: Vec2, distance: f32) -> Vec2 {
    origin + direction * distance
}
