//! Pinboard Bevy Plugin: drives the widget layout engine from Bevy's ECS.
//!
//! Provides `PinboardPlugin`, which owns a [`WidgetLayout`] as a resource and
//! registers the messages, picking observers, and systems that connect it to
//! `bevy_ui` nodes tagged with [`components::HeaderWidget`].

pub mod components;
pub mod events;
pub mod input;
pub mod resources;
pub mod systems;

use std::sync::Arc;

use bevy::prelude::*;
use pinboard_core::{KeyValueStore, LayoutConfig, Persistence, WidgetDescriptor, WidgetLayout};

use events::{LayoutCommand, LayoutWasReset, PositionCommitted, WidgetDataCleared, WidgetDragStarted};
use resources::{DragSession, FocusedWidget, HeaderGeometry, HeaderLayout, WidgetEntities};
use systems::{
    apply_widget_layout, drive_auto_scroll, handle_layout_commands, measure_widget_heights,
    sync_header_geometry, teardown_on_unmount, track_widget_mounts,
};

/// Main Bevy plugin for the draggable header.
///
/// Registers resources, messages, and systems for:
/// - Holding the layout engine as the `HeaderLayout` resource
/// - Pointer drags via `bevy_picking` observers, keyboard moves via `ButtonInput`
/// - Debounced widget measurement and container sizing from `ComputedNode`
/// - Auto-scrolling the header viewport during edge drags
/// - Writing positions and z-indices back to widget nodes
pub struct PinboardPlugin {
    pub config: LayoutConfig,
    pub widgets: Vec<WidgetDescriptor>,
    pub store: Arc<dyn KeyValueStore>,
}

impl PinboardPlugin {
    pub fn new(
        config: LayoutConfig,
        widgets: Vec<WidgetDescriptor>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            config,
            widgets,
            store,
        }
    }
}

impl Plugin for PinboardPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<LayoutCommand>()
            .add_message::<WidgetDragStarted>()
            .add_message::<PositionCommitted>()
            .add_message::<LayoutWasReset>()
            .add_message::<WidgetDataCleared>()
            .init_resource::<HeaderGeometry>()
            .init_resource::<DragSession>()
            .init_resource::<FocusedWidget>()
            .init_resource::<WidgetEntities>()
            .add_systems(
                Update,
                (
                    track_widget_mounts,
                    sync_header_geometry,
                    measure_widget_heights,
                    handle_layout_commands,
                    input::handle_keyboard_moves,
                    drive_auto_scroll,
                    apply_widget_layout,
                    teardown_on_unmount,
                )
                    .chain(),
            )
            .add_observer(input::on_widget_drag_start)
            .add_observer(input::on_widget_drag)
            .add_observer(input::on_widget_drag_end)
            .add_observer(input::on_widget_drag_cancel)
            .add_observer(input::on_widget_click);

        let persistence = Persistence::new(Arc::clone(&self.store), self.config.storage_prefix.clone());
        match WidgetLayout::new(self.config.clone(), self.widgets.clone(), persistence) {
            Ok(layout) => {
                app.insert_resource(HeaderLayout(layout));
            }
            Err(e) => {
                tracing::error!("Failed to build widget layout: {e}");
                tracing::warn!("Header widgets will not be draggable without a layout");
            }
        }
    }
}
