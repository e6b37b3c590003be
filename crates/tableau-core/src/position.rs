//! Committed widget positions.

use std::collections::HashMap;
use std::fmt;

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::tools::WidgetDescriptor;

/// Identifier of a mounted widget (e.g. `timer-0`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WidgetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Mapping from widget id to its committed canvas position.
///
/// Only the canvas controller writes to the store. Each entry carries its own
/// revision so a view can tell that *its* widget moved without diffing the
/// whole map; [`PositionStore::set`] never touches the revision of any other id.
#[derive(Debug, Clone, Default)]
pub struct PositionStore {
    positions: HashMap<WidgetId, Point>,
    revisions: HashMap<WidgetId, u64>,
    /// Ids whose entry changed since the last `take_changed`.
    changed: Vec<WidgetId>,
}

impl PositionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from the initial positions of the given widgets.
    pub fn from_descriptors<'a>(descriptors: impl IntoIterator<Item = &'a WidgetDescriptor>) -> Self {
        let mut store = Self::new();
        store.reconcile(descriptors);
        store.changed.clear();
        store
    }

    /// Position of `id`, or `initial` when the store has no entry for it.
    pub fn get(&self, id: &WidgetId, initial: Point) -> Point {
        self.positions.get(id).copied().unwrap_or(initial)
    }

    /// Stored position of `id`, if any.
    pub fn stored(&self, id: &WidgetId) -> Option<Point> {
        self.positions.get(id).copied()
    }

    /// Upsert the position of `id`.
    pub fn set(&mut self, id: WidgetId, position: Point) {
        *self.revisions.entry(id.clone()).or_insert(0) += 1;
        if !self.changed.contains(&id) {
            self.changed.push(id.clone());
        }
        self.positions.insert(id, position);
    }

    /// Add entries for widgets the store has not seen yet.
    ///
    /// Existing entries are left as they are, so a widget that was already
    /// dragged keeps its position when the widget list grows. Returns the
    /// number of entries added.
    pub fn reconcile<'a>(&mut self, descriptors: impl IntoIterator<Item = &'a WidgetDescriptor>) -> usize {
        let mut added = 0;
        for descriptor in descriptors {
            if !self.positions.contains_key(&descriptor.id) {
                self.set(descriptor.id.clone(), descriptor.initial_position);
                added += 1;
            }
        }
        added
    }

    /// Revision counter of `id` (0 if never written).
    pub fn revision(&self, id: &WidgetId) -> u64 {
        self.revisions.get(id).copied().unwrap_or(0)
    }

    /// Drain the ids that changed since the last call.
    pub fn take_changed(&mut self) -> Vec<WidgetId> {
        std::mem::take(&mut self.changed)
    }

    pub fn contains(&self, id: &WidgetId) -> bool {
        self.positions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WidgetId, &Point)> {
        self.positions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::WidgetKind;

    fn descriptor(id: &str, x: f64, y: f64) -> WidgetDescriptor {
        WidgetDescriptor {
            id: WidgetId::new(id),
            kind: WidgetKind::Timer,
            initial_position: Point::new(x, y),
        }
    }

    #[test]
    fn test_get_falls_back_to_initial() {
        let store = PositionStore::new();
        let id = WidgetId::new("timer-0");
        assert_eq!(store.get(&id, Point::new(800.0, 400.0)), Point::new(800.0, 400.0));
        assert!(store.stored(&id).is_none());
    }

    #[test]
    fn test_set_overrides_initial() {
        let mut store = PositionStore::new();
        let id = WidgetId::new("timer-0");
        store.set(id.clone(), Point::new(10.0, 20.0));
        assert_eq!(store.get(&id, Point::new(800.0, 400.0)), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_set_only_bumps_own_revision() {
        let a = descriptor("timer-0", 0.0, 0.0);
        let b = descriptor("timer-1", 50.0, 50.0);
        let mut store = PositionStore::from_descriptors([&a, &b]);
        let rev_a = store.revision(&a.id);
        let rev_b = store.revision(&b.id);

        store.set(a.id.clone(), Point::new(5.0, 5.0));

        assert_eq!(store.revision(&a.id), rev_a + 1);
        assert_eq!(store.revision(&b.id), rev_b);
        assert_eq!(store.take_changed(), vec![a.id.clone()]);
        assert!(store.take_changed().is_empty());
    }

    #[test]
    fn test_reconcile_preserves_existing() {
        let a = descriptor("instruction-0", 400.0, 200.0);
        let mut store = PositionStore::from_descriptors([&a]);
        store.set(a.id.clone(), Point::new(12.0, 34.0));

        let b = descriptor("instruction-1", 400.0, 200.0);
        let added = store.reconcile([&a, &b]);

        assert_eq!(added, 1);
        assert_eq!(store.get(&a.id, a.initial_position), Point::new(12.0, 34.0));
        assert_eq!(store.get(&b.id, b.initial_position), Point::new(400.0, 200.0));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_from_descriptors_starts_clean() {
        let a = descriptor("timer-0", 1.0, 2.0);
        let mut store = PositionStore::from_descriptors([&a]);
        assert!(store.take_changed().is_empty());
        assert!(store.contains(&a.id));
    }
}
