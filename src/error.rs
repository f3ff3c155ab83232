use std::path::PathBuf;

/// Errors raised while reading or writing a persisted region table.
///
/// Any of these during load is fatal: the store keeps its previous table and
/// the caller must not continue activation.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("Could not read file {}, invalid format", .0.display())]
    UnsupportedExtension(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Region '{region}' has a malformed position '{value}' (expected x:y:z)")]
    InvalidPosition { region: String, value: String },
    #[error("Region '{0}' is defined more than once")]
    DuplicateRegion(String),
}

/// Input rejected before any region state is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Region name must be alpha-numeric")]
    InvalidName(String),
    #[error("Please select two points before creating a new region")]
    MissingCorners,
    #[error("Both points must be in the same world ('{first}' and '{second}')")]
    WorldMismatch { first: String, second: String },
    #[error("Invalid flag '{0}'")]
    UnknownFlag(String),
    #[error("Invalid value '{value}' for flag '{flag}', expected 'true' or 'false'")]
    InvalidFlagValue { flag: String, value: String },
    #[error("Corner index must be 1 or 2, got {0}")]
    InvalidCorner(usize),
}

/// Error type for store and administrative operations.
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error("No region with the name '{0}' exists")]
    NotFound(String),
    #[error("A region by the name {0} already exists")]
    Conflict(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Format error: {0}")]
    Format(#[from] FormatError),
}

pub type Result<T> = std::result::Result<T, GuardError>;
