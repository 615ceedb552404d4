//! # Session Configuration
//!
//! Explicit configuration for one POS session: no ambient globals, no
//! storage reads at construction time. The selected location is an
//! explicit object loaded and selected through [`LocationDirectory`].
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`CANTEEN_*`)
//! 2. Config file (`canteen.toml`)
//! 3. Defaults (this file)

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use canteen_client::Backend;
use canteen_core::types::Location;

use crate::error::{SessionError, SessionResult};

/// Default quiet period for the identity resolver's text search.
pub const DEFAULT_DEBOUNCE_MS: u64 = 400;

// =============================================================================
// Session Config
// =============================================================================

/// Configuration passed into the session constructor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Base URL of the canteen server.
    pub base_url: String,

    /// Quiet period (ms) after the last keystroke before a search fires.
    pub debounce_ms: u64,

    /// Preferred location id; validated against the loaded directory.
    pub location_id: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            base_url: "http://localhost:4000/api".to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            location_id: None,
        }
    }
}

/// Configuration load failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl SessionConfig {
    /// Creates a config from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `CANTEEN_BASE_URL`: Override server base URL
    /// - `CANTEEN_DEBOUNCE_MS`: Override the debounce window
    /// - `CANTEEN_LOCATION_ID`: Preferred location
    pub fn from_env() -> Self {
        let mut config = SessionConfig::default();

        if let Ok(base_url) = std::env::var("CANTEEN_BASE_URL") {
            config.base_url = base_url;
        }

        if let Ok(debounce) = std::env::var("CANTEEN_DEBOUNCE_MS") {
            if let Ok(ms) = debounce.parse::<u64>() {
                config.debounce_ms = ms;
            }
        }

        if let Ok(location_id) = std::env::var("CANTEEN_LOCATION_ID") {
            config.location_id = Some(location_id);
        }

        config
    }

    /// Loads a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config = toml::from_str(&raw)?;
        debug!(path = %path.display(), "session config loaded");
        Ok(config)
    }

    /// The debounce window as a Duration.
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

// =============================================================================
// Location Directory
// =============================================================================

/// Loaded locations plus the explicit current selection.
///
/// Selection rules (on every load): a previous selection that still exists
/// is kept; otherwise the first loaded location becomes selected. There is
/// no implicit storage read - callers load and select explicitly.
#[derive(Debug, Default)]
pub struct LocationDirectory {
    locations: Mutex<Vec<Location>>,
    selected: Mutex<Option<Location>>,
}

impl LocationDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches the location list and reconciles the selection.
    pub async fn load(&self, backend: &dyn Backend) -> SessionResult<()> {
        let list = backend.list_locations().await?;

        {
            let mut selected = self.selected.lock().expect("Location mutex poisoned");
            let still_exists = selected
                .as_ref()
                .map(|loc| list.iter().any(|l| l.id == loc.id))
                .unwrap_or(false);
            if !still_exists {
                *selected = list.first().cloned();
                if let Some(loc) = selected.as_ref() {
                    info!(location_id = %loc.id, name = %loc.name, "default location selected");
                }
            }
        }

        *self.locations.lock().expect("Location mutex poisoned") = list;
        Ok(())
    }

    /// Selects a location by id from the loaded directory.
    pub fn select(&self, location_id: &str) -> SessionResult<Location> {
        let locations = self.locations.lock().expect("Location mutex poisoned");
        let location = locations
            .iter()
            .find(|l| l.id == location_id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownLocation(location_id.to_string()))?;

        *self.selected.lock().expect("Location mutex poisoned") = Some(location.clone());
        info!(location_id = %location.id, "location selected");
        Ok(location)
    }

    /// Currently selected location, if any.
    pub fn selected(&self) -> Option<Location> {
        self.selected
            .lock()
            .expect("Location mutex poisoned")
            .clone()
    }

    /// All loaded locations.
    pub fn locations(&self) -> Vec<Location> {
        self.locations
            .lock()
            .expect("Location mutex poisoned")
            .clone()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
