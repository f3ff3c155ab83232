//! Administrative operations behind the region command.
//!
//! Argument parsing and permission checks happen in the command layer; these
//! functions validate their input and report failures as [`GuardError`]s.

use crate::bounding_box::{BoundingBox, Vec3};
use crate::error::{GuardError, Result, ValidationError};
use crate::event::Actor;
use crate::flags::{Flag, FlagValue};
use crate::guard::RegionGuard;
use crate::region::Region;
use crate::session::{ActorId, Corner};
use tracing::info;

/// One page of `list` output.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 1-based page number actually shown.
    pub page: usize,
    pub pages: usize,
    pub names: Vec<String>,
}

/// Summary shown by `info`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionInfo {
    pub name: String,
    pub world: String,
    pub bounds: BoundingBox,
    pub flags: Vec<(String, String)>,
    pub whitelist: Vec<String>,
}

impl RegionInfo {
    fn from_region(region: &Region) -> Self {
        RegionInfo {
            name: region.name().to_string(),
            world: region.world().to_string(),
            bounds: *region.bounding_box(),
            flags: region
                .flags()
                .iter()
                .filter_map(|(name, value)| value.as_str().map(|v| (name.to_string(), v.to_string())))
                .collect(),
            whitelist: region.whitelist().map(str::to_string).collect(),
        }
    }
}

/// Region names are ASCII alphanumeric and non-empty.
pub fn validate_name(name: &str) -> std::result::Result<(), ValidationError> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Parses a command-line flag value for `flag`.
pub fn parse_flag_value(flag: Flag, value: &str) -> std::result::Result<FlagValue, ValidationError> {
    if flag.is_text() {
        return Ok(FlagValue::Text(value.into()));
    }
    match value.to_ascii_lowercase().as_str() {
        "true" => Ok(FlagValue::True),
        "false" => Ok(FlagValue::False),
        _ => Err(ValidationError::InvalidFlagValue {
            flag: flag.name().to_string(),
            value: value.to_string(),
        }),
    }
}

impl RegionGuard {
    /// Stores the actor's current position as corner 1 or 2.
    pub fn select_corner(&mut self, actor: &Actor, corner: usize) -> Result<Vec3> {
        if !(1..=2).contains(&corner) {
            return Err(ValidationError::InvalidCorner(corner).into());
        }
        self.sessions.session_mut(actor.id).set_corner(
            corner - 1,
            Corner {
                position: actor.position,
                world: actor.world.clone(),
            },
        );
        Ok(actor.position)
    }

    /// The next two right-clicked blocks become the selection corners.
    pub fn start_wand(&mut self, actor: ActorId) {
        self.sessions.session_mut(actor).start_wand();
    }

    /// Creates a region from the actor's two selected corners.
    ///
    /// The selection is consumed only when creation succeeds.
    pub fn create_region(&mut self, actor: &Actor, name: &str) -> Result<&Region> {
        let (first, second) = self
            .sessions
            .get(actor.id)
            .and_then(|session| session.selection())
            .map(|(a, b)| (a.clone(), b.clone()))
            .ok_or(ValidationError::MissingCorners)?;
        validate_name(name)?;
        if first.world != second.world {
            return Err(ValidationError::WorldMismatch {
                first: first.world.to_string(),
                second: second.world.to_string(),
            }
            .into());
        }
        if self.store.contains(name) {
            return Err(GuardError::Conflict(name.to_lowercase()));
        }
        self.sessions.session_mut(actor.id).clear_selection();
        self.store
            .create(name, first.position, second.position, &first.world)
    }

    pub fn delete_region(&mut self, name: &str) -> Result<()> {
        if !self.store.delete(name) {
            return Err(GuardError::NotFound(name.to_string()));
        }
        self.sessions.forget_region(&name.to_lowercase());
        Ok(())
    }

    /// Sets a known flag from its command-line spelling.
    pub fn set_region_flag(&mut self, name: &str, flag: &str, value: &str) -> Result<FlagValue> {
        let flag = Flag::from_name(flag).ok_or_else(|| ValidationError::UnknownFlag(flag.to_string()))?;
        let value = parse_flag_value(flag, value)?;
        self.store.set_flag(name, flag.name(), value.clone())?;
        info!(region = %name.to_lowercase(), flag = flag.name(), value = %value, "flag set");
        Ok(value)
    }

    /// Removes a flag. Returns whether it was set.
    pub fn unset_region_flag(&mut self, name: &str, flag: &str) -> Result<bool> {
        let flag = Flag::from_name(flag).ok_or_else(|| ValidationError::UnknownFlag(flag.to_string()))?;
        self.store.remove_flag(name, flag.name())
    }

    pub fn whitelist_add(&mut self, name: &str, player: &str) -> Result<bool> {
        let region = self
            .store
            .get_mut(name)
            .ok_or_else(|| GuardError::NotFound(name.to_string()))?;
        Ok(region.add_to_whitelist(player))
    }

    pub fn whitelist_remove(&mut self, name: &str, player: &str) -> Result<bool> {
        let region = self
            .store
            .get_mut(name)
            .ok_or_else(|| GuardError::NotFound(name.to_string()))?;
        Ok(region.remove_from_whitelist(player))
    }

    /// Region names on a 1-based page. Out-of-range pages clamp to the last one.
    pub fn list_regions(&self, page: usize) -> Page {
        let per_page = self.config.list_page_size.max(1);
        let total = self.store.len();
        let pages = total.div_ceil(per_page).max(1);
        let page = page.clamp(1, pages);
        let names = self
            .store
            .names()
            .skip((page - 1) * per_page)
            .take(per_page)
            .map(str::to_string)
            .collect();
        Page { page, pages, names }
    }

    pub fn region_info(&self, name: &str) -> Result<RegionInfo> {
        self.store
            .get(name)
            .map(RegionInfo::from_region)
            .ok_or_else(|| GuardError::NotFound(name.to_string()))
    }

    /// All flag names, for `setflag` help output.
    pub fn available_flags() -> impl Iterator<Item = &'static str> {
        Flag::ALL.into_iter().map(Flag::name)
    }
}
