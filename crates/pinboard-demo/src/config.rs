//! Application configuration for the demo.

use std::path::PathBuf;

use bevy::prelude::*;
use pinboard_core::storage::default_storage_dir;

/// Default window width.
const DEFAULT_WIDTH: u32 = 1280;
/// Default window height.
const DEFAULT_HEIGHT: u32 = 720;
/// Height (px) of the draggable header region.
const DEFAULT_HEADER_HEIGHT: f32 = 340.0;
/// Width (px) of the scrollable content inside the header.
const DEFAULT_CONTENT_WIDTH: f32 = 1800.0;

/// Runtime configuration for the Pinboard demo application.
#[derive(Resource, Clone, Debug)]
pub struct AppConfig {
    /// Directory holding persisted positions and widget data.
    pub storage_dir: PathBuf,
    /// Optional JSON manifest replacing the built-in widget set.
    pub manifest: Option<PathBuf>,
    /// Keep everything in memory; nothing survives a restart.
    pub ephemeral: bool,
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    pub header_height: f32,
    pub content_width: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_dir: std::env::var_os("PINBOARD_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_storage_dir),
            manifest: std::env::var_os("PINBOARD_MANIFEST").map(PathBuf::from),
            ephemeral: std::env::var("PINBOARD_EPHEMERAL").is_ok(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            header_height: DEFAULT_HEADER_HEIGHT,
            content_width: DEFAULT_CONTENT_WIDTH,
        }
    }
}
