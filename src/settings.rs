//! Game settings and tuning
//!
//! Loaded from a JSON file on native; every field falls back to its default.

use std::fmt;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Collision shape used for spawned monsters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MonsterShape {
    /// Axis-aligned rectangle sized to the sprite
    Rectangle,
    /// Circle of radius width / 4
    #[default]
    Circle,
}

/// Snapshot variants of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Rectangle monsters, monsters leaving the field are simply removed
    Classic,
    /// Circle monsters, no loss condition
    Circles,
    /// Circle monsters, an escaped monster loses the session
    #[default]
    Final,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "Classic",
            Variant::Circles => "Circles",
            Variant::Final => "Final",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "rect" => Some(Variant::Classic),
            "circles" | "circle" => Some(Variant::Circles),
            "final" | "loss" => Some(Variant::Final),
            _ => None,
        }
    }

    pub fn monster_shape(&self) -> MonsterShape {
        match self {
            Variant::Classic => MonsterShape::Rectangle,
            Variant::Circles | Variant::Final => MonsterShape::Circle,
        }
    }

    pub fn loss_enabled(&self) -> bool {
        matches!(self, Variant::Final)
    }
}

/// Failure to read or parse a settings file
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read settings: {e}"),
            ConfigError::Parse(e) => write!(f, "failed to parse settings: {e}"),
            ConfigError::Invalid(reason) => write!(f, "invalid settings: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Session tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed for reproducibility
    pub seed: u64,

    // === Field ===
    pub field_size: Vec2,
    pub player_size: Vec2,
    pub monster_size: Vec2,
    pub projectile_size: Vec2,

    // === Monsters ===
    pub monster_shape: MonsterShape,
    /// Seconds between spawns
    pub spawn_interval: f32,
    pub min_duration: f32,
    pub max_duration: f32,

    // === Projectiles ===
    pub projectile_range: f32,
    pub projectile_flight_secs: f32,

    // === Outcome ===
    pub win_threshold: u32,
    /// Escaped monster ends the session as Lost
    pub loss_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_variant(Variant::default())
    }
}

impl Settings {
    /// Settings matching one of the game snapshots
    pub fn from_variant(variant: Variant) -> Self {
        Self {
            seed: 0,

            field_size: Vec2::new(FIELD_WIDTH, FIELD_HEIGHT),
            player_size: Vec2::from(PLAYER_SIZE),
            monster_size: Vec2::from(MONSTER_SIZE),
            projectile_size: Vec2::from(PROJECTILE_SIZE),

            monster_shape: variant.monster_shape(),
            spawn_interval: SPAWN_INTERVAL,
            min_duration: MONSTER_MIN_DURATION,
            max_duration: MONSTER_MAX_DURATION,

            projectile_range: PROJECTILE_RANGE,
            projectile_flight_secs: PROJECTILE_FLIGHT_SECS,

            win_threshold: WIN_THRESHOLD,
            loss_enabled: variant.loss_enabled(),
        }
    }

    /// Apply a variant on top of the current tuning
    pub fn apply_variant(&mut self, variant: Variant) {
        self.monster_shape = variant.monster_shape();
        self.loss_enabled = variant.loss_enabled();
    }

    /// Where the player sits and projectiles launch from
    pub fn player_position(&self) -> Vec2 {
        Vec2::new(
            self.field_size.x * PLAYER_X_FRACTION,
            self.field_size.y * PLAYER_Y_FRACTION,
        )
    }

    /// Reject tuning the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.field_size.x > 0.0 && self.field_size.y > 0.0) {
            return Err(ConfigError::Invalid("field_size must be positive"));
        }
        if !(self.spawn_interval >= MIN_SPAWN_INTERVAL) {
            return Err(ConfigError::Invalid("spawn_interval must be at least one step"));
        }
        if !(self.min_duration > 0.0 && self.min_duration <= self.max_duration) {
            return Err(ConfigError::Invalid("duration range must be positive and ordered"));
        }
        if !(self.projectile_flight_secs > 0.0) {
            return Err(ConfigError::Invalid("projectile_flight_secs must be positive"));
        }
        Ok(())
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings from a file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match Self::read(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Write settings to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
