use crate::bounding_box::{BoundingBox, Vec3};
use crate::event::Actor;
use crate::flags::{Flag, FlagSet, FlagValue};
use smol_str::SmolStr;
use std::collections::BTreeSet;

/// A named cuboid inside one world.
///
/// Name, world and geometry are fixed at construction. Flags and the
/// whitelist can change freely afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    name: SmolStr,
    world: SmolStr,
    bbox: BoundingBox,
    flags: FlagSet,
    whitelist: BTreeSet<SmolStr>,
}

impl Region {
    /// Corners may be given in any order; the name is stored lower-cased.
    pub fn new(name: &str, corner1: Vec3, corner2: Vec3, world: impl Into<SmolStr>) -> Self {
        Region {
            name: lower(name),
            world: world.into(),
            bbox: BoundingBox::from_corners(corner1, corner2),
            flags: FlagSet::new(),
            whitelist: BTreeSet::new(),
        }
    }

    pub fn with_flags(mut self, flags: FlagSet) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_flag(mut self, flag: Flag, value: impl Into<FlagValue>) -> Self {
        self.flags.set(flag.name(), value.into());
        self
    }

    pub fn with_whitelist<I, S>(mut self, actors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for actor in actors {
            self.whitelist.insert(lower(actor.as_ref()));
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn key(&self) -> &SmolStr {
        &self.name
    }

    pub fn world(&self) -> &str {
        &self.world
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn min(&self) -> Vec3 {
        self.bbox.min
    }

    pub fn max(&self) -> Vec3 {
        self.bbox.max
    }

    /// Inclusive point test. The caller is responsible for matching worlds.
    #[inline(always)]
    pub fn contains(&self, point: Vec3) -> bool {
        self.bbox.contains(point)
    }

    pub fn flags(&self) -> &FlagSet {
        &self.flags
    }

    pub fn get_flag(&self, name: &str) -> &FlagValue {
        self.flags.get(name)
    }

    pub fn flag(&self, flag: Flag) -> &FlagValue {
        self.flags.flag(flag)
    }

    pub fn set_flag(&mut self, name: &str, value: FlagValue) {
        self.flags.set(name, value);
    }

    pub fn remove_flag(&mut self, name: &str) -> bool {
        self.flags.remove(name)
    }

    /// True when the flag is explicitly `false`.
    pub fn restricts(&self, flag: Flag) -> bool {
        self.flags.flag(flag).is_false()
    }

    /// True when the flag is explicitly `true`.
    pub fn has_flag(&self, flag: Flag) -> bool {
        self.flags.flag(flag).is_true()
    }

    pub fn whitelist(&self) -> impl Iterator<Item = &str> {
        self.whitelist.iter().map(SmolStr::as_str)
    }

    pub fn add_to_whitelist(&mut self, actor: &str) -> bool {
        self.whitelist.insert(lower(actor))
    }

    pub fn remove_from_whitelist(&mut self, actor: &str) -> bool {
        self.whitelist.remove(lower(actor).as_str())
    }

    pub fn is_whitelisted(&self, actor: &Actor) -> bool {
        self.whitelist.contains(lower(&actor.name).as_str())
    }

    /// Checks the region's command lists.
    ///
    /// A non-empty `allowed-cmds` list admits only the commands it names.
    /// Otherwise anything in `blocked-cmds` is refused.
    pub fn is_command_allowed(&self, command: &str) -> bool {
        let command = command_name(command);
        if let Some(allowed) = self.flags.flag(Flag::AllowedCmds).as_str() {
            let mut entries = command_list(allowed).peekable();
            if entries.peek().is_some() {
                return entries.any(|entry| entry.eq_ignore_ascii_case(command));
            }
        }
        match self.flags.flag(Flag::BlockedCmds).as_str() {
            Some(blocked) => !command_list(blocked).any(|entry| entry.eq_ignore_ascii_case(command)),
            None => true,
        }
    }
}

fn lower(s: &str) -> SmolStr {
    SmolStr::new(s.to_lowercase())
}

fn command_name(command: &str) -> &str {
    let first = command.split_whitespace().next().unwrap_or("");
    first.strip_prefix('/').unwrap_or(first)
}

fn command_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',')
        .map(|entry| entry.trim())
        .map(|entry| entry.strip_prefix('/').unwrap_or(entry))
        .filter(|entry| !entry.is_empty())
}
