use crate::error::FormatError;
use crate::formats::manager::{RegionExporter, RegionImporter};
use crate::formats::schema::RegionTable;

pub struct JsonFormat;

impl RegionImporter for JsonFormat {
    fn name(&self) -> String {
        "json".to_string()
    }

    fn extensions(&self) -> Vec<String> {
        vec!["json".to_string()]
    }

    fn read(&self, data: &str) -> Result<RegionTable, FormatError> {
        Ok(serde_json::from_str(data)?)
    }
}

impl RegionExporter for JsonFormat {
    fn name(&self) -> String {
        "json".to_string()
    }

    fn extensions(&self) -> Vec<String> {
        vec!["json".to_string()]
    }

    fn write(&self, table: &RegionTable) -> Result<String, FormatError> {
        Ok(serde_json::to_string_pretty(table)?)
    }
}
