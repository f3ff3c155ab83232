//! Cuboid region protection for voxel game servers.
//!
//! Regions are named axis-aligned boxes living in one world, each carrying a
//! set of flags. A chunk-bucketed [`SpatialIndex`] keeps per-event containment
//! queries cheap, [`RegionStore`] owns the authoritative table, and
//! [`RegionGuard`] turns decoded game events into allow/deny verdicts.
//!
//! ```ignore
//! use regionguard::{GuardConfig, RegionGuard, Vec3};
//!
//! let mut guard = RegionGuard::start(GuardConfig::default())?;
//! guard.activate_world("earth");
//! let verdict = guard.handle(event);
//! if verdict.cancelled {
//!     // cancel the engine event
//! }
//! guard.stop()?;
//! ```

pub mod admin;
pub mod bounding_box;
pub mod config;
pub mod error;
pub mod event;
pub mod flags;
pub mod formats;
pub mod guard;
pub mod logging;
pub mod region;
pub mod session;
pub mod spatial_index;
pub mod store;
pub mod transition;

pub use bounding_box::{BoundingBox, Vec3};
pub use config::GuardConfig;
pub use error::{FormatError, GuardError, Result, ValidationError};
pub use event::{Actor, Denial, Effect, GuardEvent, Verdict};
pub use flags::{Flag, FlagSet, FlagValue};
pub use guard::RegionGuard;
pub use region::Region;
pub use session::{ActorId, MuteList, PlayerSession, Sessions};
pub use spatial_index::SpatialIndex;
pub use store::RegionStore;
pub use transition::{Transition, TransitionEvaluator};
