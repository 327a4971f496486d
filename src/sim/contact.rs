//! Contact resolution between monsters and projectiles
//!
//! The host calls [`resolve_contact`] for every pair of bodies that began
//! overlapping. Only a (monster, projectile) pair scores; everything else is
//! ignored. A pair whose entities are already gone is a no-op, so duplicate
//! notifications can never score twice.

use super::category::CategoryMask;
use super::host::{EntityFactory, PresentationHandoff};
use super::state::{EntityId, GameSession, Outcome};
use super::world::ContactBody;

/// What a contact did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactResolution {
    /// Both entities removed and the hit counted
    Hit {
        monster: EntityId,
        projectile: EntityId,
        /// Destroyed count after this hit
        destroyed: u32,
        /// Set when this hit won the session
        outcome: Option<Outcome>,
    },
    /// Not a (monster, projectile) pair
    Ignored,
    /// One of the entities was already removed, or no longer matches its
    /// reported category
    Stale,
    /// Session already ended
    SessionOver,
}

/// Order a pair so the lower category comes first
#[inline]
pub fn order_pair(a: ContactBody, b: ContactBody) -> (ContactBody, ContactBody) {
    if a.category <= b.category { (a, b) } else { (b, a) }
}

/// True if the ordered pair is a monster hit by a projectile
#[inline]
pub fn is_hit(first: &ContactBody, second: &ContactBody) -> bool {
    first.category.intersects(CategoryMask::MONSTER)
        && second.category.intersects(CategoryMask::PROJECTILE)
}

/// Resolve one contact notification
pub fn resolve_contact<F, P>(
    session: &mut GameSession,
    entities: &mut F,
    presenter: &mut P,
    a: ContactBody,
    b: ContactBody,
) -> ContactResolution
where
    F: EntityFactory + ?Sized,
    P: PresentationHandoff + ?Sized,
{
    if session.is_over() {
        return ContactResolution::SessionOver;
    }

    let (first, second) = order_pair(a, b);
    if !is_hit(&first, &second) {
        return ContactResolution::Ignored;
    }

    // Re-check against the live scene; the reported categories may be stale
    let live = (entities.category_of(first.id), entities.category_of(second.id));
    match live {
        (Some(m), Some(p)) if m.intersects(first.category) && p.intersects(second.category) => {}
        _ => return ContactResolution::Stale,
    }

    entities.remove_entity(first.id);
    entities.remove_entity(second.id);

    let outcome = session.record_hit();
    log::debug!(
        "Projectile {} hit monster {} ({} destroyed)",
        second.id,
        first.id,
        session.monsters_destroyed
    );
    if let Some(outcome) = outcome {
        presenter.present_outcome(outcome);
    }

    ContactResolution::Hit {
        monster: first.id,
        projectile: second.id,
        destroyed: session.monsters_destroyed,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::host::EntityFactory;
    use crate::sim::state::{EntityKind, EntitySpec};
    use crate::sim::world::World;
    use glam::Vec2;

    fn add(world: &mut World, kind: EntityKind) -> ContactBody {
        let id = world.create_entity(EntitySpec {
            asset: "test",
            kind,
            position: Vec2::ZERO,
            body: None,
        });
        ContactBody {
            id,
            category: kind.category(),
        }
    }

    #[test]
    fn test_order_pair() {
        let m = ContactBody { id: 5, category: CategoryMask::MONSTER };
        let p = ContactBody { id: 2, category: CategoryMask::PROJECTILE };
        assert_eq!(order_pair(p, m), (m, p));
        assert_eq!(order_pair(m, p), (m, p));
    }

    #[test]
    fn test_hit_removes_both_and_counts() {
        let mut world = World::new();
        let mut session = GameSession::new(15, true);
        let mut outcomes: Vec<Outcome> = Vec::new();
        let m = add(&mut world, EntityKind::Monster);
        let p = add(&mut world, EntityKind::Projectile);
        let bystander = add(&mut world, EntityKind::Monster);

        // Reported in either order
        let result = resolve_contact(&mut session, &mut world, &mut outcomes, p, m);
        assert_eq!(
            result,
            ContactResolution::Hit {
                monster: m.id,
                projectile: p.id,
                destroyed: 1,
                outcome: None
            }
        );
        assert_eq!(session.monsters_destroyed, 1);
        assert!(!world.is_active(m.id));
        assert!(!world.is_active(p.id));
        assert!(world.is_active(bystander.id));
        assert!(outcomes.is_empty());
    }

    #[test]
    fn test_duplicate_notification_is_noop() {
        let mut world = World::new();
        let mut session = GameSession::new(15, true);
        let mut outcomes: Vec<Outcome> = Vec::new();
        let m = add(&mut world, EntityKind::Monster);
        let p = add(&mut world, EntityKind::Projectile);
        let p2 = add(&mut world, EntityKind::Projectile);

        resolve_contact(&mut session, &mut world, &mut outcomes, m, p);
        assert_eq!(
            resolve_contact(&mut session, &mut world, &mut outcomes, m, p),
            ContactResolution::Stale
        );
        // A second projectile touching the dead monster scores nothing
        assert_eq!(
            resolve_contact(&mut session, &mut world, &mut outcomes, m, p2),
            ContactResolution::Stale
        );
        assert!(world.is_active(p2.id));
        assert_eq!(session.monsters_destroyed, 1);
    }

    #[test]
    fn test_misreported_category_is_stale() {
        let mut world = World::new();
        let mut session = GameSession::new(15, true);
        let mut outcomes: Vec<Outcome> = Vec::new();
        let m = add(&mut world, EntityKind::Monster);
        let other = add(&mut world, EntityKind::Monster);
        // A "projectile" that is really a monster in the scene
        let fake = ContactBody {
            id: other.id,
            category: CategoryMask::PROJECTILE,
        };

        assert_eq!(
            resolve_contact(&mut session, &mut world, &mut outcomes, m, fake),
            ContactResolution::Stale
        );
        assert!(world.is_active(m.id));
        assert!(world.is_active(other.id));
        assert_eq!(session.monsters_destroyed, 0);
    }

    #[test]
    fn test_same_category_pairs_ignored() {
        let mut world = World::new();
        let mut session = GameSession::new(15, true);
        let mut outcomes: Vec<Outcome> = Vec::new();
        let m1 = add(&mut world, EntityKind::Monster);
        let m2 = add(&mut world, EntityKind::Monster);
        let p1 = add(&mut world, EntityKind::Projectile);
        let p2 = add(&mut world, EntityKind::Projectile);

        assert_eq!(
            resolve_contact(&mut session, &mut world, &mut outcomes, m1, m2),
            ContactResolution::Ignored
        );
        assert_eq!(
            resolve_contact(&mut session, &mut world, &mut outcomes, p1, p2),
            ContactResolution::Ignored
        );
        assert_eq!(session.monsters_destroyed, 0);
        assert_eq!(world.active_count(EntityKind::Monster), 2);
        assert_eq!(world.active_count(EntityKind::Projectile), 2);
    }

    #[test]
    fn test_player_pair_ignored() {
        let mut world = World::new();
        let mut session = GameSession::new(15, true);
        let mut outcomes: Vec<Outcome> = Vec::new();
        let player = add(&mut world, EntityKind::Player);
        let m = add(&mut world, EntityKind::Monster);

        assert_eq!(
            resolve_contact(&mut session, &mut world, &mut outcomes, player, m),
            ContactResolution::Ignored
        );
    }

    #[test]
    fn test_sixteenth_hit_wins_once() {
        let mut world = World::new();
        let mut session = GameSession::new(15, true);
        let mut outcomes: Vec<Outcome> = Vec::new();

        for i in 1..=16 {
            let m = add(&mut world, EntityKind::Monster);
            let p = add(&mut world, EntityKind::Projectile);
            let result = resolve_contact(&mut session, &mut world, &mut outcomes, m, p);
            if i < 16 {
                assert!(outcomes.is_empty(), "won early at hit {i}");
            } else {
                assert!(matches!(
                    result,
                    ContactResolution::Hit {
                        destroyed: 16,
                        outcome: Some(Outcome::Won),
                        ..
                    }
                ));
            }
        }
        assert_eq!(outcomes, vec![Outcome::Won]);

        // Further contacts do nothing
        let m = add(&mut world, EntityKind::Monster);
        let p = add(&mut world, EntityKind::Projectile);
        assert_eq!(
            resolve_contact(&mut session, &mut world, &mut outcomes, m, p),
            ContactResolution::SessionOver
        );
        assert!(world.is_active(m.id));
        assert_eq!(session.monsters_destroyed, 16);
        assert_eq!(outcomes.len(), 1);
    }
}
