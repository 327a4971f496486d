//! Built-in host world: entity storage, linear movement and contact detection
//!
//! Stands in for an engine's scene graph. Entities are kept sorted by id so
//! iteration order (and therefore contact order) is deterministic.

use std::collections::BTreeSet;

use glam::Vec2;

use super::category::CategoryMask;
use super::collision::{shapes_overlap, swept_overlap};
use super::host::{EntityFactory, MovementScheduler};
use super::movement::{Arrival, ArrivalAction, Movement};
use super::state::{Entity, EntityId, EntityKind, EntitySpec, Lifecycle, PhysicsBody};

/// One side of a reported contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactBody {
    pub id: EntityId,
    pub category: CategoryMask,
}

/// Two bodies that started overlapping this step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: ContactBody,
    pub b: ContactBody,
}

/// Entity store and physics stand-in
#[derive(Debug, Clone, Default)]
pub struct World {
    /// Sorted by id
    entities: Vec<Entity>,
    /// Pairs (lower id first) that were overlapping at the end of the last step
    touching: BTreeSet<(EntityId, EntityId)>,
    next_id: EntityId,
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            touching: BTreeSet::new(),
            next_id: 1,
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|i| &self.entities[i])
    }

    fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|i| &mut self.entities[i])
    }

    /// Active entities of one kind
    pub fn active(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(move |e| e.kind == kind && e.is_active())
    }

    pub fn active_count(&self, kind: EntityKind) -> usize {
        self.active(kind).count()
    }

    /// Advance every pending move by `dt`.
    ///
    /// Returns the entities that reached their destination, in id order.
    /// Their moves are consumed; removal is left to the caller.
    pub fn advance(&mut self, dt: f32) -> Vec<Arrival> {
        let mut arrivals = Vec::new();
        for entity in self.entities.iter_mut().filter(|e| e.is_active()) {
            entity.prev_pos = entity.pos;
            let Some(movement) = entity.movement.as_mut() else {
                continue;
            };
            let arrived = movement.advance(dt);
            entity.pos = movement.position();
            if arrived {
                arrivals.push(Arrival {
                    id: entity.id,
                    action: movement.on_arrival,
                });
                entity.movement = None;
            }
        }
        arrivals
    }

    /// Find pairs that began overlapping since the last call.
    ///
    /// A pair is considered only if either body's notify mask names the
    /// other's category. If either body is precise, both are swept from
    /// their previous positions so crossing paths still touch.
    pub fn detect_contacts(&mut self) -> Vec<Contact> {
        let bodies: Vec<(&Entity, &PhysicsBody)> = self
            .entities
            .iter()
            .filter(|e| e.is_active())
            .filter_map(|e| e.body.as_ref().map(|b| (e, b)))
            .collect();

        let mut touching = BTreeSet::new();
        let mut contacts = Vec::new();

        for (i, &(ea, ba)) in bodies.iter().enumerate() {
            for &(eb, bb) in &bodies[i + 1..] {
                if !ba.filter.should_notify(&bb.filter) {
                    continue;
                }
                let overlapping = if ba.precise || bb.precise {
                    swept_overlap(
                        ea.prev_pos,
                        ea.pos,
                        &ba.shape,
                        eb.prev_pos,
                        eb.pos,
                        &bb.shape,
                    )
                } else {
                    shapes_overlap(ea.pos, &ba.shape, eb.pos, &bb.shape)
                };
                if !overlapping {
                    continue;
                }

                let key = (ea.id, eb.id);
                if !self.touching.contains(&key) {
                    contacts.push(Contact {
                        a: ContactBody {
                            id: ea.id,
                            category: ba.filter.category,
                        },
                        b: ContactBody {
                            id: eb.id,
                            category: bb.filter.category,
                        },
                    });
                }
                touching.insert(key);
            }
        }

        self.touching = touching;
        contacts
    }

    /// Drop entities removed during this step
    pub fn sweep(&mut self) {
        self.entities.retain(|e| e.is_active());
        let entities = &self.entities;
        self.touching.retain(|&(a, b)| {
            entities.binary_search_by_key(&a, |e| e.id).is_ok()
                && entities.binary_search_by_key(&b, |e| e.id).is_ok()
        });
    }
}

impl EntityFactory for World {
    fn create_entity(&mut self, spec: EntitySpec) -> EntityId {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        // Ids only grow, so pushing keeps the store sorted
        self.entities.push(Entity::new(id, spec));
        id
    }

    fn remove_entity(&mut self, id: EntityId) -> bool {
        match self.get_mut(id) {
            Some(entity) if entity.is_active() && entity.kind != EntityKind::Player => {
                entity.lifecycle = Lifecycle::PendingRemoval;
                entity.movement = None;
                true
            }
            _ => false,
        }
    }

    fn is_active(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(Entity::is_active)
    }

    fn category_of(&self, id: EntityId) -> Option<CategoryMask> {
        self.get(id).filter(|e| e.is_active()).map(Entity::category)
    }
}

impl MovementScheduler for World {
    fn move_linear(
        &mut self,
        id: EntityId,
        from: Vec2,
        to: Vec2,
        duration: f32,
        on_arrival: ArrivalAction,
    ) -> bool {
        match self.get_mut(id) {
            Some(entity) if entity.is_active() => {
                entity.pos = from;
                entity.prev_pos = from;
                entity.movement = Some(Movement::new(from, to, duration, on_arrival));
                true
            }
            _ => false,
        }
    }
}
