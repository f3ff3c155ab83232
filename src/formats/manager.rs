use crate::error::FormatError;
use crate::formats::schema::RegionTable;
use std::path::Path;
use tracing::debug;

pub trait RegionImporter {
    fn name(&self) -> String;
    fn extensions(&self) -> Vec<String>;
    fn read(&self, data: &str) -> Result<RegionTable, FormatError>;
}

pub trait RegionExporter {
    fn name(&self) -> String;
    fn extensions(&self) -> Vec<String>;
    fn write(&self, table: &RegionTable) -> Result<String, FormatError>;
}

/// Picks a region table format by file extension.
pub struct FormatManager {
    importers: Vec<Box<dyn RegionImporter>>,
    exporters: Vec<Box<dyn RegionExporter>>,
}

impl FormatManager {
    /// An empty manager. Use [`FormatManager::default`] for the built-in formats.
    pub fn new() -> Self {
        Self {
            importers: Vec::new(),
            exporters: Vec::new(),
        }
    }

    pub fn register_importer<I: RegionImporter + 'static>(&mut self, importer: I) {
        self.importers.push(Box::new(importer));
    }

    pub fn register_exporter<E: RegionExporter + 'static>(&mut self, exporter: E) {
        self.exporters.push(Box::new(exporter));
    }

    pub fn read_auto(&self, path: &Path, data: &str) -> Result<RegionTable, FormatError> {
        let extension = extension_of(path);
        for importer in &self.importers {
            if importer.extensions().contains(&extension) {
                debug!(format = %importer.name(), path = %path.display(), "reading region table");
                return importer.read(data);
            }
        }
        Err(FormatError::UnsupportedExtension(path.to_path_buf()))
    }

    pub fn write_auto(&self, path: &Path, table: &RegionTable) -> Result<String, FormatError> {
        let extension = extension_of(path);
        for exporter in &self.exporters {
            if exporter.extensions().contains(&extension) {
                debug!(format = %exporter.name(), path = %path.display(), "writing region table");
                return exporter.write(table);
            }
        }
        Err(FormatError::UnsupportedExtension(path.to_path_buf()))
    }

    /// Whether some importer claims this path's extension.
    pub fn supports(&self, path: &Path) -> bool {
        let extension = extension_of(path);
        self.importers
            .iter()
            .any(|importer| importer.extensions().contains(&extension))
    }
}

impl Default for FormatManager {
    fn default() -> Self {
        let mut manager = FormatManager::new();
        manager.register_importer(crate::formats::json::JsonFormat);
        manager.register_exporter(crate::formats::json::JsonFormat);
        manager.register_importer(crate::formats::toml::TomlFormat);
        manager.register_exporter(crate::formats::toml::TomlFormat);
        manager
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase()
}
