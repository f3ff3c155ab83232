//! Persistence formats for the region table.
//!
//! Every format reads and writes the same logical [`schema::RegionTable`];
//! [`manager::FormatManager`] picks one from a file extension.

pub mod json;
pub mod manager;
pub mod schema;
pub mod toml;

pub use manager::FormatManager;
pub use schema::{RegionRecord, RegionTable};
