//! Pinboard Demo: a draggable widget header in a Bevy window.
//!
//! Widgets persist their positions (and the sketchpad its strokes) to the
//! local data directory, or to memory when `PINBOARD_EPHEMERAL` is set.

mod config;
mod ui;
mod widgets;

use std::sync::Arc;

use bevy::prelude::*;
use pinboard_bevy::PinboardPlugin;
use pinboard_core::{FileStore, KeyValueStore, MemoryStore};

use config::AppConfig;
use ui::HeaderUiPlugin;

fn open_store(config: &AppConfig) -> Arc<dyn KeyValueStore> {
    if config.ephemeral {
        tracing::info!("Using in-memory storage");
        Arc::new(MemoryStore::new())
    } else {
        tracing::info!("Using storage at {}", config.storage_dir.display());
        Arc::new(FileStore::new(config.storage_dir.clone()))
    }
}

fn main() -> AppExit {
    let config = AppConfig::default();

    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Pinboard".into(),
            resolution: (config.width, config.height).into(),
            ..default()
        }),
        ..default()
    }));

    // LogPlugin is live from here on.
    let manifest = widgets::load_manifest(&config);
    let layout_config = manifest.layout.clone().with_env_overrides();
    let store = open_store(&config);

    app.insert_resource(config)
        .add_plugins(PinboardPlugin::new(layout_config, manifest.widgets, store))
        .add_plugins(HeaderUiPlugin)
        .run()
}
