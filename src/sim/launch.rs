//! Projectile launch from a tap

use glam::Vec2;

use super::category::ContactFilter;
use super::collision::Shape;
use super::host::{EntityFactory, MovementScheduler};
use super::movement::ArrivalAction;
use super::state::{EntityId, EntityKind, EntitySpec, PhysicsBody};
use crate::consts::PROJECTILE_ASSET;
use crate::settings::Settings;
use crate::{aim_direction, project_along};

/// A projectile that left the launcher
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launched {
    pub id: EntityId,
    /// Unit aim vector, x >= 0
    pub direction: Vec2,
    pub destination: Vec2,
}

/// Fires projectiles toward tapped points
#[derive(Debug, Clone)]
pub struct Launcher {
    pub projectile_size: Vec2,
    /// Distance travelled along the aim before removal
    pub range: f32,
    pub flight_secs: f32,
}

impl Launcher {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            projectile_size: settings.projectile_size,
            range: settings.projectile_range,
            flight_secs: settings.projectile_flight_secs,
        }
    }

    /// Aim from `origin` toward `target`.
    ///
    /// Only rightward shots are allowed: a target behind the origin, or on
    /// top of it, yields `None`.
    pub fn aim(origin: Vec2, target: Vec2) -> Option<Vec2> {
        let offset = target - origin;
        if offset.x < 0.0 {
            return None;
        }
        aim_direction(origin, target)
    }

    pub fn projectile_shape(&self) -> Shape {
        Shape::circle(self.projectile_size.x / 3.0)
    }

    /// Launch a projectile, or do nothing if the aim is rejected
    pub fn launch<W>(&self, world: &mut W, origin: Vec2, target: Vec2) -> Option<Launched>
    where
        W: EntityFactory + MovementScheduler + ?Sized,
    {
        let Some(direction) = Self::aim(origin, target) else {
            log::debug!("Rejected launch toward ({:.1}, {:.1})", target.x, target.y);
            return None;
        };

        let id = world.create_entity(EntitySpec {
            asset: PROJECTILE_ASSET,
            kind: EntityKind::Projectile,
            position: origin,
            body: Some(PhysicsBody {
                shape: self.projectile_shape(),
                filter: ContactFilter::PROJECTILE,
                // Fast relative to its size
                precise: true,
            }),
        });

        let destination = project_along(origin, direction, self.range);
        world.move_linear(id, origin, destination, self.flight_secs, ArrivalAction::Remove);
        log::debug!(
            "Launched projectile {} along ({:.3}, {:.3})",
            id,
            direction.x,
            direction.y
        );

        Some(Launched {
            id,
            direction,
            destination,
        })
    }
}
