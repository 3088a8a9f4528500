// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! RAM accounting for data textures.

The encoder reports the size of each packed buffer it allocates to a [`RamAccountant`] passed in
by the caller.  [`DataTextureRamStats`] is the stock accountant: one byte counter per tracked
category plus a texture count.  Counters only ever go up here; whoever disposes of textures is
responsible for any decrement.

Camera and model textures are a few hundred bytes each and are not reported.

```
use data_textures::layout::Category;
use data_textures::stats::{DataTextureRamStats, RamAccountant};

static STATS: DataTextureRamStats = DataTextureRamStats::new();
STATS.texture_created(Category::Positions, 4096 * 6);
assert_eq!(STATS.snapshot().positions, 4096 * 6);
assert_eq!(STATS.snapshot().number_of_textures, 1);
```
*/

use crate::layout::Category;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Receives one report per texture the encoder creates.
pub trait RamAccountant {
    /// A texture of `category` holding `bytes` bytes of packed data was created.
    fn texture_created(&self, category: Category, bytes: usize);
}

impl<A: RamAccountant + ?Sized> RamAccountant for &A {
    fn texture_created(&self, category: Category, bytes: usize) {
        (**self).texture_created(category, bytes)
    }
}

impl<A: RamAccountant + ?Sized> RamAccountant for Arc<A> {
    fn texture_created(&self, category: Category, bytes: usize) {
        (**self).texture_created(category, bytes)
    }
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAccounting;

impl RamAccountant for NoAccounting {
    fn texture_created(&self, _category: Category, _bytes: usize) {}
}

/// Process-wide byte counters, one per tracked category.
#[derive(Debug, Default)]
pub struct DataTextureRamStats {
    colors_and_flags: AtomicUsize,
    object_offsets: AtomicUsize,
    positions_decode_matrices: AtomicUsize,
    indices: AtomicUsize,
    edge_indices: AtomicUsize,
    positions: AtomicUsize,
    portion_ids: AtomicUsize,
    number_of_textures: AtomicUsize,
}

/// A point-in-time copy of [`DataTextureRamStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RamStatsSnapshot {
    pub colors_and_flags: usize,
    pub object_offsets: usize,
    pub positions_decode_matrices: usize,
    pub indices: usize,
    pub edge_indices: usize,
    pub positions: usize,
    pub portion_ids: usize,
    pub number_of_textures: usize,
}

impl RamStatsSnapshot {
    pub fn total_bytes(&self) -> usize {
        self.colors_and_flags
            + self.object_offsets
            + self.positions_decode_matrices
            + self.indices
            + self.edge_indices
            + self.positions
            + self.portion_ids
    }
}

impl DataTextureRamStats {
    pub const fn new() -> Self {
        DataTextureRamStats {
            colors_and_flags: AtomicUsize::new(0),
            object_offsets: AtomicUsize::new(0),
            positions_decode_matrices: AtomicUsize::new(0),
            indices: AtomicUsize::new(0),
            edge_indices: AtomicUsize::new(0),
            positions: AtomicUsize::new(0),
            portion_ids: AtomicUsize::new(0),
            number_of_textures: AtomicUsize::new(0),
        }
    }

    fn counter(&self, category: Category) -> Option<&AtomicUsize> {
        match category {
            Category::Camera | Category::Model => None,
            Category::ColorsAndFlags => Some(&self.colors_and_flags),
            Category::ObjectOffsets => Some(&self.object_offsets),
            Category::PositionsDecodeMatrices => Some(&self.positions_decode_matrices),
            Category::Indices => Some(&self.indices),
            Category::EdgeIndices => Some(&self.edge_indices),
            Category::Positions => Some(&self.positions),
            Category::PortionIds => Some(&self.portion_ids),
        }
    }

    /// Bytes reported so far for `category`.  Always 0 for untracked categories.
    pub fn bytes(&self, category: Category) -> usize {
        self.counter(category)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn number_of_textures(&self) -> usize {
        self.number_of_textures.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> RamStatsSnapshot {
        RamStatsSnapshot {
            colors_and_flags: self.bytes(Category::ColorsAndFlags),
            object_offsets: self.bytes(Category::ObjectOffsets),
            positions_decode_matrices: self.bytes(Category::PositionsDecodeMatrices),
            indices: self.bytes(Category::Indices),
            edge_indices: self.bytes(Category::EdgeIndices),
            positions: self.bytes(Category::Positions),
            portion_ids: self.bytes(Category::PortionIds),
            number_of_textures: self.number_of_textures(),
        }
    }
}

impl RamAccountant for DataTextureRamStats {
    fn texture_created(&self, category: Category, bytes: usize) {
        if let Some(counter) = self.counter(category) {
            counter.fetch_add(bytes, Ordering::Relaxed);
            self.number_of_textures.fetch_add(1, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_per_category() {
        let stats = DataTextureRamStats::new();
        stats.texture_created(Category::Indices, 100);
        stats.texture_created(Category::Indices, 20);
        stats.texture_created(Category::EdgeIndices, 8);
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.indices, 120);
        assert_eq!(snapshot.edge_indices, 8);
        assert_eq!(snapshot.number_of_textures, 3);
        assert_eq!(snapshot.total_bytes(), 128);
    }

    #[test]
    fn camera_and_model_untracked() {
        let stats = DataTextureRamStats::new();
        stats.texture_created(Category::Camera, 192);
        stats.texture_created(Category::Model, 128);
        assert_eq!(stats.snapshot(), RamStatsSnapshot::default());
        assert_eq!(stats.bytes(Category::Camera), 0);
    }

    #[test]
    fn shared_through_arc() {
        let stats = Arc::new(DataTextureRamStats::new());
        let accountant: Arc<DataTextureRamStats> = stats.clone();
        accountant.texture_created(Category::PortionIds, 8192);
        assert_eq!(stats.bytes(Category::PortionIds), 8192);
    }
}
