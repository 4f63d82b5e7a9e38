//! Worker grouping for redundant execution.
//!
//! # Module layout
//!
//! - [`group`]: `Group`, `GroupId`, `GrowthState`
//! - [`sizing`]: `min_size`, `GroupSizing`
//! - [`extension`]: `select_extension`, `ExtensionChoice`
//! - [`grouper`]: `ResourcesGrouper`, `GreedyGracefulGrouper`

pub mod extension;
pub mod group;
pub mod grouper;
mod registry;
pub mod sizing;

pub use extension::{select_extension, ExtensionChoice};
pub use group::{Group, GroupId, GrowthState};
pub use grouper::{GreedyGracefulGrouper, ResourcesGrouper};
pub use sizing::{
    colluding_majority_probability, min_size, GroupSizing, MAX_SUPPORTED_GROUP_SIZE,
};
