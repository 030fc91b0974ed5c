//! Identifiers for layers and scene items.
//!
//! Layers and scene items share one numbering space: a layer and the scene
//! item created together for the same asset carry the same id, so layer
//! visibility/lock toggles gate that item.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Fixed id of the background layer. It is never removable.
    pub const BACKGROUND: EntityId = EntityId(0);

    /// Smallest id strictly greater than every id in `taken`.
    ///
    /// Derived from the current state rather than a monotonic counter:
    /// frame reconstruction can replace the whole scene with an older
    /// snapshot, which would leave a counter out of sync.
    pub fn next_free(taken: impl Iterator<Item = EntityId>) -> EntityId {
        EntityId(taken.map(|id| id.0).max().map_or(1, |m| m + 1))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
