//! Built-in widget set and manifest loading.

use pinboard_core::{HeaderManifest, LayoutConfig, WidgetDescriptor};

use crate::config::AppConfig;

pub const BIO: &str = "bio";
pub const SKETCHPAD: &str = "sketchpad";
pub const NOW_PLAYING: &str = "now-playing";
pub const GAME: &str = "game";

/// The header shipped with the demo.
pub fn default_manifest() -> HeaderManifest {
    HeaderManifest {
        layout: LayoutConfig::default(),
        widgets: vec![
            WidgetDescriptor::new(BIO, 24.0, 24.0, 300.0)
                .with_min_height(140.0)
                .with_content("Hi! I build small tools and draw on the side. Drag me around."),
            WidgetDescriptor::new(SKETCHPAD, 360.0, 40.0, 280.0).with_height(240.0),
            WidgetDescriptor::new(NOW_PLAYING, 680.0, 24.0, 260.0)
                .with_min_height(100.0)
                .with_content("Boards of Canada - Roygbiv"),
            WidgetDescriptor::new(GAME, 980.0, 60.0, 200.0).with_height(200.0),
        ],
    }
}

/// Load the manifest named by the config, falling back to the built-in one.
pub fn load_manifest(config: &AppConfig) -> HeaderManifest {
    let Some(path) = &config.manifest else {
        return default_manifest();
    };
    match HeaderManifest::load(path) {
        Ok(manifest) => {
            tracing::info!(
                "Loaded {} widgets from {}",
                manifest.widgets.len(),
                path.display()
            );
            manifest
        }
        Err(e) => {
            tracing::error!("Failed to load manifest {}: {e}", path.display());
            default_manifest()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinboard_core::descriptor::validate_descriptors;

    #[test]
    fn test_default_manifest_is_valid() {
        let manifest = default_manifest();
        assert!(validate_descriptors(&manifest.widgets).is_ok());
        assert_eq!(manifest.widgets.len(), 4);
    }

    #[test]
    fn test_missing_manifest_falls_back() {
        let config = AppConfig {
            manifest: Some("/nonexistent/pinboard-manifest.json".into()),
            ..AppConfig::default()
        };
        assert_eq!(load_manifest(&config).widgets.len(), 4);
    }
}
