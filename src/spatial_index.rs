//! Chunk-bucketed region cache.
//!
//! Buckets are keyed by world, then chunk column `(x >> 4, z >> 4)`, then
//! vertical band `y >> 4`. A region is listed in every cell its bounding box
//! touches, so bucket membership is a superset filter: callers always re-test
//! exact containment.

use crate::bounding_box::{chunk_coord, Vec3};
use crate::region::Region;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

type Column = FxHashMap<i32, Vec<SmolStr>>;

#[derive(Debug, Default, Clone)]
pub struct SpatialIndex {
    worlds: FxHashMap<SmolStr, FxHashMap<(i32, i32), Column>>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the region's name to every cell it overlaps.
    ///
    /// Not idempotent: registering twice lists the name twice.
    pub fn register(&mut self, region: &Region) {
        let span = region.bounding_box().chunk_span();
        let columns = self.worlds.entry(SmolStr::new(region.world())).or_default();
        for (cx, cz, cy) in span.cells() {
            columns
                .entry((cx, cz))
                .or_default()
                .entry(cy)
                .or_default()
                .push(region.key().clone());
        }
    }

    /// Removes the region's name from every cell it could occupy and prunes
    /// emptied bands and columns. Returns the number of entries removed.
    pub fn unregister(&mut self, region: &Region) -> usize {
        let Some(columns) = self.worlds.get_mut(region.world()) else {
            return 0;
        };
        let span = region.bounding_box().chunk_span();
        let name = region.name();
        let mut removed = 0;
        for (cx, cz) in span.columns() {
            let Some(column) = columns.get_mut(&(cx, cz)) else {
                continue;
            };
            for cy in span.min.1..=span.max.1 {
                if let Some(band) = column.get_mut(&cy) {
                    let before = band.len();
                    band.retain(|entry| entry != name);
                    removed += before - band.len();
                    if band.is_empty() {
                        column.remove(&cy);
                    }
                }
            }
            if column.is_empty() {
                columns.remove(&(cx, cz));
            }
        }
        if columns.is_empty() {
            self.worlds.remove(region.world());
        }
        removed
    }

    /// Candidate names for the cell holding `position`, in registration order.
    ///
    /// Names for which `is_live` returns false are stripped from the bucket in
    /// place before the slice is returned.
    pub fn query(
        &mut self,
        world: &str,
        position: Vec3,
        mut is_live: impl FnMut(&str) -> bool,
    ) -> &[SmolStr] {
        let (cx, cy, cz) = position.chunk_cell();
        let Some(band) = self
            .worlds
            .get_mut(world)
            .and_then(|columns| columns.get_mut(&(cx, cz)))
            .and_then(|column| column.get_mut(&cy))
        else {
            return &[];
        };
        let before = band.len();
        band.retain(|name| is_live(name.as_str()));
        if band.len() != before {
            tracing::debug!(
                world,
                chunk = ?(cx, cy, cz),
                healed = before - band.len(),
                "dropped stale region entries"
            );
        }
        band.as_slice()
    }

    /// Read-only lookup, without healing.
    pub fn candidates(&self, world: &str, position: Vec3) -> &[SmolStr] {
        let (cx, cy, cz) = position.chunk_cell();
        self.worlds
            .get(world)
            .and_then(|columns| columns.get(&(cx, cz)))
            .and_then(|column| column.get(&cy))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether any band of this chunk column lists a region.
    pub fn has_any_region_in_chunk(&self, world: &str, chunk_x: i32, chunk_z: i32) -> bool {
        self.worlds
            .get(world)
            .and_then(|columns| columns.get(&(chunk_x, chunk_z)))
            .is_some_and(|column| column.values().any(|band| !band.is_empty()))
    }

    /// Same as [`Self::has_any_region_in_chunk`] for a world-space point.
    pub fn has_any_region_at(&self, world: &str, position: Vec3) -> bool {
        self.has_any_region_in_chunk(world, chunk_coord(position.x), chunk_coord(position.z))
    }

    pub fn clear_world(&mut self, world: &str) {
        self.worlds.remove(world);
    }

    pub fn clear(&mut self) {
        self.worlds.clear();
    }

    /// Number of non-empty `(world, column, band)` cells.
    pub fn bucket_count(&self) -> usize {
        self.worlds
            .values()
            .flat_map(|columns| columns.values())
            .map(|column| column.values().filter(|band| !band.is_empty()).count())
            .sum()
    }
}
