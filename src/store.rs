use crate::bounding_box::Vec3;
use crate::error::{FormatError, GuardError, Result};
use crate::flags::FlagValue;
use crate::formats::schema::{regions_to_table, table_to_regions, RegionTable};
use crate::formats::FormatManager;
use crate::region::Region;
use crate::spatial_index::SpatialIndex;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use smol_str::SmolStr;
use std::path::Path;
use tracing::{debug, info};

/// Authoritative region table plus the chunk index that accelerates it.
///
/// Keys are lower-cased region names; iteration follows insertion order
/// (file order after a load, then creation order).
pub struct RegionStore {
    regions: IndexMap<SmolStr, Region, FxBuildHasher>,
    index: SpatialIndex,
    formats: FormatManager,
}

impl Default for RegionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionStore {
    pub fn new() -> Self {
        Self::with_formats(FormatManager::default())
    }

    pub fn with_formats(formats: FormatManager) -> Self {
        RegionStore {
            regions: IndexMap::with_hasher(FxBuildHasher),
            index: SpatialIndex::new(),
            formats,
        }
    }

    /// Creates and indexes a region. Fails with [`GuardError::Conflict`] when
    /// the name is taken, compared case-insensitively.
    pub fn create(
        &mut self,
        name: &str,
        corner1: Vec3,
        corner2: Vec3,
        world: &str,
    ) -> Result<&Region> {
        self.insert(Region::new(name, corner1, corner2, world))
    }

    /// Adds an already built region and indexes it.
    pub fn insert(&mut self, region: Region) -> Result<&Region> {
        if self.regions.contains_key(region.name()) {
            return Err(GuardError::Conflict(region.name().to_string()));
        }
        self.index.register(&region);
        info!(
            region = region.name(),
            world = region.world(),
            bounds = %region.bounding_box(),
            "created region"
        );
        let (index, _) = self.regions.insert_full(region.key().clone(), region);
        Ok(&self.regions[index])
    }

    /// Removes a region and purges it from the index. Returns false when no
    /// such region exists.
    pub fn delete(&mut self, name: &str) -> bool {
        let key = name.to_lowercase();
        match self.regions.shift_remove(key.as_str()) {
            Some(region) => {
                let purged = self.index.unregister(&region);
                info!(region = region.name(), purged, "deleted region");
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Region> {
        self.regions.get(name.to_lowercase().as_str())
    }

    /// Mutable access for flag and whitelist edits. Geometry has no setters,
    /// so the index stays valid.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Region> {
        self.regions.get_mut(name.to_lowercase().as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn list(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(SmolStr::as_str)
    }

    pub fn regions_in_world<'a>(&'a self, world: &'a str) -> impl Iterator<Item = &'a Region> {
        self.regions.values().filter(move |r| r.world() == world)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn formats(&self) -> &FormatManager {
        &self.formats
    }

    /// First registered region whose box contains `position`.
    ///
    /// Bucket entries naming deleted regions are dropped along the way.
    pub fn find_containing(&mut self, world: &str, position: Vec3) -> Option<&Region> {
        let regions = &self.regions;
        self.index
            .query(world, position, |name| regions.contains_key(name))
            .iter()
            .filter_map(|name| regions.get(name))
            .find(|region| region.contains(position))
    }

    pub fn has_any_region_in_chunk(&self, world: &str, chunk_x: i32, chunk_z: i32) -> bool {
        self.index.has_any_region_in_chunk(world, chunk_x, chunk_z)
    }

    pub fn set_flag(&mut self, name: &str, flag: &str, value: FlagValue) -> Result<()> {
        let region = self
            .get_mut(name)
            .ok_or_else(|| GuardError::NotFound(name.to_string()))?;
        region.set_flag(flag, value);
        Ok(())
    }

    /// Returns whether the flag was set before.
    pub fn remove_flag(&mut self, name: &str, flag: &str) -> Result<bool> {
        let region = self
            .get_mut(name)
            .ok_or_else(|| GuardError::NotFound(name.to_string()))?;
        Ok(region.remove_flag(flag))
    }

    /// Re-indexes every region of one world, dropping that world's previous
    /// buckets first. Called when a world is (re)activated.
    pub fn rebuild_chunk_index(&mut self, world: &str) -> usize {
        self.index.clear_world(world);
        let mut count = 0;
        for region in self.regions.values().filter(|r| r.world() == world) {
            self.index.register(region);
            count += 1;
        }
        if count > 0 {
            info!(world, count, "found and loaded regions");
        }
        count
    }

    /// Replaces the whole table and rebuilds the index from scratch.
    ///
    /// The table is fully validated before anything is replaced; a bad entry
    /// leaves the store untouched.
    pub fn load_table(&mut self, table: &RegionTable) -> std::result::Result<usize, FormatError> {
        let loaded = table_to_regions(table)?;
        self.regions.clear();
        self.index.clear();
        for region in loaded {
            self.index.register(&region);
            self.regions.insert(region.key().clone(), region);
        }
        debug!(buckets = self.index.bucket_count(), "rebuilt chunk index");
        Ok(self.regions.len())
    }

    pub fn to_table(&self) -> RegionTable {
        regions_to_table(self.regions.values())
    }

    /// Loads the table from a file, choosing the format by extension.
    pub fn load_all(&mut self, path: &Path) -> std::result::Result<usize, FormatError> {
        if !self.formats.supports(path) {
            return Err(FormatError::UnsupportedExtension(path.to_path_buf()));
        }
        let data = std::fs::read_to_string(path)?;
        let table = self.formats.read_auto(path, &data)?;
        let count = self.load_table(&table)?;
        info!(path = %path.display(), count, "loaded regions");
        Ok(count)
    }

    pub fn save_all(&self, path: &Path) -> std::result::Result<(), FormatError> {
        let data = self.formats.write_auto(path, &self.to_table())?;
        std::fs::write(path, data)?;
        info!(path = %path.display(), count = self.regions.len(), "saved regions");
        Ok(())
    }
}
