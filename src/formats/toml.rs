use crate::error::FormatError;
use crate::formats::manager::{RegionExporter, RegionImporter};
use crate::formats::schema::RegionTable;

pub struct TomlFormat;

impl RegionImporter for TomlFormat {
    fn name(&self) -> String {
        "toml".to_string()
    }

    fn extensions(&self) -> Vec<String> {
        vec!["toml".to_string()]
    }

    fn read(&self, data: &str) -> Result<RegionTable, FormatError> {
        Ok(::toml::from_str(data)?)
    }
}

impl RegionExporter for TomlFormat {
    fn name(&self) -> String {
        "toml".to_string()
    }

    fn extensions(&self) -> Vec<String> {
        vec!["toml".to_string()]
    }

    fn write(&self, table: &RegionTable) -> Result<String, FormatError> {
        Ok(::toml::to_string(table)?)
    }
}
