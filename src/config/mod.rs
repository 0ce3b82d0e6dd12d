//! Configuration module for billtrack
//!
//! XDG-style path resolution and persisted user settings.

pub mod paths;
pub mod settings;

pub use paths::BilltrackPaths;
pub use settings::Settings;
