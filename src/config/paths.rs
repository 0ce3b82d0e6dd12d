//! Path management for billtrack
//!
//! ## Path Resolution Order
//!
//! 1. `BILLTRACK_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/billtrack` or `~/.config/billtrack`
//! 3. Windows: `%APPDATA%\billtrack`

use std::path::{Path, PathBuf};

use crate::error::BilltrackError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "BILLTRACK_DATA_DIR";

/// Manages all paths used by billtrack
#[derive(Debug, Clone)]
pub struct BilltrackPaths {
    base_dir: PathBuf,
}

impl BilltrackPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home or application-data directory can be found.
    pub fn new() -> Result<Self, BilltrackError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory holding the series collections
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Default destination for exports
    pub fn export_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// The bill collection
    pub fn bills_file(&self) -> PathBuf {
        self.data_dir().join("bills.json")
    }

    /// The pay series collection
    pub fn pay_periods_file(&self) -> PathBuf {
        self.data_dir().join("pay_periods.json")
    }

    /// Create the base and data directories
    pub fn ensure_directories(&self) -> Result<(), BilltrackError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BilltrackError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| BilltrackError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if billtrack has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, BilltrackError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                BilltrackError::Config("HOME environment variable not set".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("billtrack"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, BilltrackError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| BilltrackError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("billtrack"))
}
