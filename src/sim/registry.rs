//! Live object registry
//!
//! Membership is the single gate for every exit path: an object removed by
//! one path (off-screen, slice, session end) is never reachable by another.

use serde::{Deserialize, Serialize};

use super::object::GameObject;

/// Live objects, kept sorted by id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectRegistry {
    objects: Vec<GameObject>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a freshly spawned object. Ids are allocated increasing, so a push
    /// keeps the list sorted.
    pub fn insert(&mut self, object: GameObject) {
        debug_assert!(self.objects.last().is_none_or(|o| o.id < object.id));
        self.objects.push(object);
    }

    /// Remove every object below `world_bottom`, returning them in id order
    pub fn expire_offscreen(&mut self, world_bottom: f32) -> Vec<GameObject> {
        for object in &mut self.objects {
            if object.pos.y < world_bottom {
                object.removed = true;
            }
        }
        self.compact()
    }

    /// Remove a specific live object. `None` if it already left by another path.
    pub fn remove_on_hit(&mut self, id: u32) -> Option<GameObject> {
        let index = self.objects.binary_search_by_key(&id, |o| o.id).ok()?;
        let mut object = self.objects.remove(index);
        object.removed = true;
        Some(object)
    }

    /// Remove everything (session end cleanup)
    pub fn drain_all(&mut self) -> Vec<GameObject> {
        self.objects
            .drain(..)
            .map(|mut o| {
                o.removed = true;
                o
            })
            .collect()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.objects.binary_search_by_key(&id, |o| o.id).is_ok()
    }

    pub fn get(&self, id: u32) -> Option<&GameObject> {
        let index = self.objects.binary_search_by_key(&id, |o| o.id).ok()?;
        self.objects.get(index)
    }

    pub fn has_bomb(&self) -> bool {
        self.objects.iter().any(|o| o.kind.is_bomb())
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameObject> {
        self.objects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut GameObject> {
        self.objects.iter_mut()
    }

    /// Split marked objects out, preserving order on both sides
    fn compact(&mut self) -> Vec<GameObject> {
        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.objects).into_iter().partition(|o| o.removed);
        self.objects = kept;
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::object::{BombSubpart, ObjectKind};
    use glam::Vec2;

    fn object(id: u32, kind: ObjectKind, y: f32) -> GameObject {
        GameObject::new(id, kind, Vec2::new(100.0, y), Vec2::ZERO, 0.0)
    }

    fn bomb_kind() -> ObjectKind {
        ObjectKind::Bomb {
            subpart: BombSubpart {
                offset: Vec2::ZERO,
                radius: 10.0,
            },
        }
    }

    #[test]
    fn test_expire_offscreen() {
        let mut registry = ObjectRegistry::new();
        registry.insert(object(1, ObjectKind::Normal { radius: 64.0 }, -200.0));
        registry.insert(object(2, ObjectKind::Fast { radius: 64.0 }, 300.0));
        registry.insert(object(3, bomb_kind(), -150.0));

        let expired = registry.expire_offscreen(-140.0);
        let ids: Vec<u32> = expired.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(expired.iter().all(|o| o.removed));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(2));
    }

    #[test]
    fn test_removed_exactly_once() {
        let mut registry = ObjectRegistry::new();
        registry.insert(object(1, ObjectKind::Normal { radius: 64.0 }, -200.0));

        assert!(registry.remove_on_hit(1).is_some());
        assert!(registry.remove_on_hit(1).is_none());
        assert!(registry.expire_offscreen(-140.0).is_empty());
        assert!(registry.drain_all().is_empty());
    }

    #[test]
    fn test_has_bomb() {
        let mut registry = ObjectRegistry::new();
        registry.insert(object(1, ObjectKind::Normal { radius: 64.0 }, 0.0));
        assert!(!registry.has_bomb());
        registry.insert(object(2, bomb_kind(), 0.0));
        assert!(registry.has_bomb());
        registry.remove_on_hit(2);
        assert!(!registry.has_bomb());
    }
}
