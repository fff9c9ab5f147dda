//! Layout tuning and the header manifest.
//!
//! `LayoutConfig` carries every constant the engine uses. Each field has a
//! serde default, so a manifest only needs to name what it changes, and a
//! handful of fields can be overridden from the environment.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::descriptor::{WidgetDescriptor, validate_descriptors};
use crate::error::ConfigError;
use crate::geometry::DEFAULT_MIN_HEIGHT;

/// Default application prefix for storage keys.
const DEFAULT_STORAGE_PREFIX: &str = "pinboard-";
/// Distance (px) from a viewport edge that starts auto-scroll.
const DEFAULT_EDGE_THRESHOLD: f32 = 50.0;
/// Auto-scroll distance (px) per frame.
const DEFAULT_SCROLL_SPEED: f32 = 5.0;
/// Keyboard nudge distance (px) per arrow press.
const DEFAULT_KEYBOARD_STEP: f32 = 10.0;
/// Trailing debounce for batched re-measurement.
const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 150;
const DEFAULT_BASE_Z_INDEX: i32 = 10;
const DEFAULT_ACTIVE_Z_INDEX: i32 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub storage_prefix: String,
    pub edge_threshold: f32,
    pub scroll_speed: f32,
    pub keyboard_step: f32,
    pub resize_debounce_ms: u64,
    pub default_min_height: f32,
    pub base_z_index: i32,
    pub active_z_index: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
            scroll_speed: DEFAULT_SCROLL_SPEED,
            keyboard_step: DEFAULT_KEYBOARD_STEP,
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
            default_min_height: DEFAULT_MIN_HEIGHT,
            base_z_index: DEFAULT_BASE_Z_INDEX,
            active_z_index: DEFAULT_ACTIVE_Z_INDEX,
        }
    }
}

impl LayoutConfig {
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    /// Apply `PINBOARD_*` environment overrides. Unparseable values are
    /// ignored with a warning.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(prefix) = lookup("PINBOARD_STORAGE_PREFIX") {
            self.storage_prefix = prefix;
        }
        override_parsed(&lookup, "PINBOARD_EDGE_THRESHOLD", &mut self.edge_threshold);
        override_parsed(&lookup, "PINBOARD_SCROLL_SPEED", &mut self.scroll_speed);
        override_parsed(&lookup, "PINBOARD_KEYBOARD_STEP", &mut self.keyboard_step);
        override_parsed(
            &lookup,
            "PINBOARD_RESIZE_DEBOUNCE_MS",
            &mut self.resize_debounce_ms,
        );
        self
    }
}

fn override_parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    target: &mut T,
) {
    let Some(raw) = lookup(name) else { return };
    match raw.trim().parse() {
        Ok(value) => *target = value,
        Err(_) => tracing::warn!("ignoring {name}={raw:?}: not a valid value"),
    }
}

/// Everything needed to build a header: tuning plus the widget list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderManifest {
    #[serde(default)]
    pub layout: LayoutConfig,
    pub widgets: Vec<WidgetDescriptor>,
}

impl HeaderManifest {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let manifest: Self = serde_json::from_str(json)?;
        validate_descriptors(&manifest.widgets)?;
        Ok(manifest)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = Self::from_json_str(&contents)?;
        tracing::info!(
            "loaded header manifest with {} widgets from {}",
            manifest.widgets.len(),
            path.display()
        );
        Ok(manifest)
    }
}
