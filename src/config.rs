use crate::error::FormatError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Guard settings. Every field has a default, so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Region table location; the extension picks the format.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// Exempts a player from every region restriction.
    #[serde(default = "default_bypass_permission")]
    pub bypass_permission: String,
    /// Keeps flight when leaving a `can-fly` region.
    #[serde(default = "default_fly_bypass_permission")]
    pub fly_bypass_permission: String,
    /// Block ids gated by the `use` flag (doors, chests, furnaces, levers...).
    #[serde(default = "default_usable_blocks")]
    pub usable_blocks: Vec<u32>,
    /// Item ids gated by the `potions` flag.
    #[serde(default = "default_potion_items")]
    pub potion_items: Vec<u32>,
    /// Item ids gated by the `editable` flag (buckets, hoes, flint and steel...).
    #[serde(default = "default_tool_items")]
    pub tool_items: Vec<u32>,
    /// Network id of the ender pearl projectile.
    #[serde(default = "default_pearl_entity_id")]
    pub pearl_entity_id: u32,
    /// Speed of the push-back applied when a move is refused.
    #[serde(default = "default_knockback_strength")]
    pub knockback_strength: f64,
    #[serde(default = "default_list_page_size")]
    pub list_page_size: usize,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("regions.json")
}
fn default_bypass_permission() -> String {
    "worldguard.bypass".to_string()
}
fn default_fly_bypass_permission() -> String {
    "worldguard.fly.bypass".to_string()
}
fn default_usable_blocks() -> Vec<u32> {
    vec![
        23, 25, 54, 58, 61, 62, 63, 64, 68, 69, 71, 77, 92, 93, 94, 96, 116, 117, 118, 130, 135,
        138, 145, 146, 149, 150, 154, 183, 184, 185, 186, 187, 193, 194, 195, 196, 197,
    ]
}
fn default_potion_items() -> Vec<u32> {
    vec![373, 374, 437, 438, 444]
}
fn default_tool_items() -> Vec<u32> {
    vec![256, 259, 269, 273, 277, 284, 290, 291, 292, 293, 294, 325]
}
fn default_pearl_entity_id() -> u32 {
    87
}
fn default_knockback_strength() -> f64 {
    4.0
}
fn default_list_page_size() -> usize {
    5
}

impl Default for GuardConfig {
    fn default() -> Self {
        GuardConfig {
            data_file: default_data_file(),
            bypass_permission: default_bypass_permission(),
            fly_bypass_permission: default_fly_bypass_permission(),
            usable_blocks: default_usable_blocks(),
            potion_items: default_potion_items(),
            tool_items: default_tool_items(),
            pearl_entity_id: default_pearl_entity_id(),
            knockback_strength: default_knockback_strength(),
            list_page_size: default_list_page_size(),
        }
    }
}

impl GuardConfig {
    /// Reads a `.json` or `.toml` config file.
    pub fn from_file(path: &Path) -> Result<Self, FormatError> {
        let data = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();
        match extension.as_str() {
            "json" => Ok(serde_json::from_str(&data)?),
            "toml" => Ok(toml::from_str(&data)?),
            _ => Err(FormatError::UnsupportedExtension(path.to_path_buf())),
        }
    }

    pub fn with_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = GuardConfig::default();
        assert_eq!(config.data_file, PathBuf::from("regions.json"));
        assert_eq!(config.pearl_entity_id, 87);
        assert_eq!(config.knockback_strength, 4.0);
        assert!(config.usable_blocks.contains(&54));
        assert!(config.potion_items.contains(&373));
        assert!(config.tool_items.contains(&325));
    }

    #[test]
    fn test_config_partial_json() {
        let json = r#"{"list_page_size": 10, "bypass_permission": "guard.admin"}"#;
        let config: GuardConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.list_page_size, 10);
        assert_eq!(config.bypass_permission, "guard.admin");
        assert_eq!(config.fly_bypass_permission, "worldguard.fly.bypass");
    }

    #[test]
    fn test_config_partial_toml() {
        let config: GuardConfig =
            toml::from_str("data_file = \"data/regions.toml\"\npotion_items = [1, 2]\n").unwrap();
        assert_eq!(config.data_file, PathBuf::from("data/regions.toml"));
        assert_eq!(config.potion_items, vec![1, 2]);
        assert_eq!(config.pearl_entity_id, 87);
    }

    #[test]
    fn test_config_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guard.ini");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(
            GuardConfig::from_file(&path),
            Err(FormatError::UnsupportedExtension(_))
        ));
    }
}
