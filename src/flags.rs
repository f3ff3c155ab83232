//! Region flags.
//!
//! Boolean flags are tri-state: unset, `"true"` or `"false"`. An unset flag
//! never restricts anything; `"false"` restricts the action it names for every
//! actor that is not whitelisted in the region. Transition flags
//! (`cannot-enter`, `cannot-leave`, `can-fly`) are the exception: they act when
//! set to `"true"`.

use smol_str::SmolStr;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Flag {
    Use,
    Potions,
    Editable,
    Pvp,
    ItemDrop,
    SendChat,
    Sleep,
    Explosion,
    Enderpearl,
    CannotEnter,
    CannotLeave,
    CanFly,
    AllowedCmds,
    BlockedCmds,
}

impl Flag {
    pub const ALL: [Flag; 14] = [
        Flag::Use,
        Flag::Potions,
        Flag::Editable,
        Flag::Pvp,
        Flag::ItemDrop,
        Flag::SendChat,
        Flag::Sleep,
        Flag::Explosion,
        Flag::Enderpearl,
        Flag::CannotEnter,
        Flag::CannotLeave,
        Flag::CanFly,
        Flag::AllowedCmds,
        Flag::BlockedCmds,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Flag::Use => "use",
            Flag::Potions => "potions",
            Flag::Editable => "editable",
            Flag::Pvp => "pvp",
            Flag::ItemDrop => "item-drop",
            Flag::SendChat => "send-chat",
            Flag::Sleep => "sleep",
            Flag::Explosion => "explosion",
            Flag::Enderpearl => "enderpearl",
            Flag::CannotEnter => "cannot-enter",
            Flag::CannotLeave => "cannot-leave",
            Flag::CanFly => "can-fly",
            Flag::AllowedCmds => "allowed-cmds",
            Flag::BlockedCmds => "blocked-cmds",
        }
    }

    /// Case-insensitive lookup by persisted name.
    pub fn from_name(name: &str) -> Option<Flag> {
        Flag::ALL
            .iter()
            .copied()
            .find(|flag| flag.name().eq_ignore_ascii_case(name))
    }

    /// String-valued flags carry free text instead of `true`/`false`.
    pub const fn is_text(self) -> bool {
        matches!(self, Flag::AllowedCmds | Flag::BlockedCmds)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FlagValue {
    #[default]
    Unset,
    True,
    False,
    Text(SmolStr),
}

static UNSET: FlagValue = FlagValue::Unset;

impl FlagValue {
    /// Parses a stored value. Only the exact strings `true` and `false` are
    /// booleans; everything else is kept as text.
    pub fn parse(raw: &str) -> FlagValue {
        match raw {
            "true" => FlagValue::True,
            "false" => FlagValue::False,
            other => FlagValue::Text(other.into()),
        }
    }

    /// Stored form, `None` when unset.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FlagValue::Unset => None,
            FlagValue::True => Some("true"),
            FlagValue::False => Some("false"),
            FlagValue::Text(text) => Some(text.as_str()),
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, FlagValue::Unset)
    }

    pub fn is_true(&self) -> bool {
        matches!(self, FlagValue::True)
    }

    /// `false` means restricted.
    pub fn is_false(&self) -> bool {
        matches!(self, FlagValue::False)
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        if value {
            FlagValue::True
        } else {
            FlagValue::False
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or("unset"))
    }
}

/// Flag name to value map. Unset values are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlagSet {
    values: BTreeMap<SmolStr, FlagValue>,
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> &FlagValue {
        let key = normalize_name(name);
        self.values.get(key.as_str()).unwrap_or(&UNSET)
    }

    pub fn flag(&self, flag: Flag) -> &FlagValue {
        self.values.get(flag.name()).unwrap_or(&UNSET)
    }

    /// Setting [`FlagValue::Unset`] removes the entry.
    pub fn set(&mut self, name: &str, value: FlagValue) {
        let key = normalize_name(name);
        if value.is_set() {
            self.values.insert(key, value);
        } else {
            self.values.remove(key.as_str());
        }
    }

    pub fn with(mut self, flag: Flag, value: impl Into<FlagValue>) -> Self {
        self.set(flag.name(), value.into());
        self
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.values.remove(normalize_name(name).as_str()).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Raw `name -> "value"` view used for persistence.
    pub fn to_raw(&self) -> BTreeMap<String, String> {
        self.iter()
            .filter_map(|(name, value)| value.as_str().map(|v| (name.to_string(), v.to_string())))
            .collect()
    }

    pub fn from_raw<'a>(raw: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut set = FlagSet::new();
        for (name, value) in raw {
            set.set(name, FlagValue::parse(value));
        }
        set
    }
}

fn normalize_name(name: &str) -> SmolStr {
    if name.bytes().any(|b| b.is_ascii_uppercase()) {
        SmolStr::new(name.to_ascii_lowercase())
    } else {
        SmolStr::new(name)
    }
}
