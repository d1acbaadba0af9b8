use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::record::Slot;

/// Identifies a record shape by content, so that content-equal shapes share one entry.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct ShapeKey {
    name: &'static str,
    slots: &'static [Slot],
}

impl ShapeKey {
    pub(crate) fn new(name: &'static str, slots: &'static [Slot]) -> Self {
        Self { name, slots }
    }
}

/// Process-wide memo of per-shape values.
///
/// Each entry is computed at most once.  Concurrent first callers block on the same cell until
/// the computation finishes, and no caller ever observes a half-built value.
#[derive(Debug)]
pub(crate) struct ShapeCache<V> {
    cells: RwLock<HashMap<ShapeKey, Arc<OnceLock<V>>>>,
}

impl<V> ShapeCache<V>
where
    V: Clone,
{
    pub(crate) fn new() -> Self {
        Self {
            cells: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) fn get_or_compute<F>(&self, key: ShapeKey, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        // `compute` runs outside the map lock.
        self.cell(key).get_or_init(compute).clone()
    }

    fn cell(&self, key: ShapeKey) -> Arc<OnceLock<V>> {
        if let Some(cell) = self
            .cells
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return cell.clone();
        }
        self.cells
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_default()
            .clone()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.cells
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
