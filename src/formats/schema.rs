//! Logical on-disk schema shared by every format.
//!
//! ```text
//! region_name:
//!   world: <string>
//!   pos1: "x:y:z"
//!   pos2: "x:y:z"
//!   whitelist: [<actor>, ...]   (optional)
//!   flags:
//!     <flag-name>: "true" | "false" | <string>
//! ```

use crate::bounding_box::Vec3;
use crate::error::FormatError;
use crate::flags::{FlagSet, FlagValue};
use crate::region::Region;
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::collections::BTreeMap;

/// Region name to record, in table order.
pub type RegionTable = IndexMap<String, RegionRecord>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RegionRecord {
    pub world: String,
    pub pos1: String,
    pub pos2: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub whitelist: Vec<String>,
    pub flags: BTreeMap<String, RawFlag>,
}

/// Flag values are written as strings, but hand-edited files often carry
/// bare booleans.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RawFlag {
    Bool(bool),
    Text(String),
}

impl RawFlag {
    fn to_value(&self) -> FlagValue {
        match self {
            RawFlag::Bool(b) => FlagValue::from(*b),
            RawFlag::Text(text) => FlagValue::parse(text),
        }
    }
}

impl RegionRecord {
    pub fn from_region(region: &Region) -> Self {
        RegionRecord {
            world: region.world().to_string(),
            pos1: encode_position(region.min()),
            pos2: encode_position(region.max()),
            whitelist: region.whitelist().map(str::to_string).collect(),
            flags: region
                .flags()
                .to_raw()
                .into_iter()
                .map(|(name, value)| (name, RawFlag::Text(value)))
                .collect(),
        }
    }

    pub fn to_region(&self, name: &str) -> Result<Region, FormatError> {
        let pos1 = decode_position(name, &self.pos1)?;
        let pos2 = decode_position(name, &self.pos2)?;
        let mut flags = FlagSet::new();
        for (flag, raw) in &self.flags {
            flags.set(flag, raw.to_value());
        }
        Ok(Region::new(name, pos1, pos2, self.world.as_str())
            .with_flags(flags)
            .with_whitelist(&self.whitelist))
    }
}

pub fn encode_position(p: Vec3) -> String {
    format!("{}:{}:{}", p.x, p.y, p.z)
}

/// Parses `x:y:z`. Anything but exactly three finite numbers is an error.
pub fn decode_position(region: &str, value: &str) -> Result<Vec3, FormatError> {
    let invalid = || FormatError::InvalidPosition {
        region: region.to_string(),
        value: value.to_string(),
    };
    let mut parts = value.split(':').map(|part| part.trim().parse::<f64>());
    let mut next = || match parts.next() {
        Some(Ok(v)) if v.is_finite() => Ok(v),
        _ => Err(invalid()),
    };
    let position = Vec3::new(next()?, next()?, next()?);
    if parts.next().is_some() {
        return Err(invalid());
    }
    Ok(position)
}

/// Converts a decoded table into regions, failing on the first bad entry.
///
/// Keys are matched case-insensitively, so `Shop` and `shop` in one file is a
/// duplicate.
pub fn table_to_regions(table: &RegionTable) -> Result<Vec<Region>, FormatError> {
    let mut regions: Vec<Region> = Vec::with_capacity(table.len());
    let mut seen: FxHashSet<SmolStr> = FxHashSet::default();
    seen.reserve(table.len());
    for (name, record) in table {
        let region = record.to_region(name)?;
        if !seen.insert(SmolStr::new(region.name())) {
            return Err(FormatError::DuplicateRegion(region.name().to_string()));
        }
        regions.push(region);
    }
    Ok(regions)
}

pub fn regions_to_table<'a>(regions: impl IntoIterator<Item = &'a Region>) -> RegionTable {
    regions
        .into_iter()
        .map(|region| (region.name().to_string(), RegionRecord::from_region(region)))
        .collect()
}
