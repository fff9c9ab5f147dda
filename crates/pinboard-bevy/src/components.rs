//! Marker components and spawn helpers for header nodes.

use bevy::prelude::*;
use pinboard_core::{WidgetDescriptor, WidgetLayout};

/// The horizontally scrolling header viewport (carries `ScrollPosition`).
/// Removing it tears the layout down.
#[derive(Component, Default)]
pub struct HeaderViewport;

/// The scrollable content inside the viewport. Its computed size is the
/// container widgets are bounded by.
#[derive(Component, Default)]
pub struct HeaderContent;

/// A draggable widget, linked to its descriptor by id.
#[derive(Component, Debug, Clone)]
pub struct HeaderWidget {
    pub id: String,
}

/// Components for a widget node placed where the layout currently has it.
///
/// Fixed-height widgets get an exact height; others size to content with
/// their configured minimum.
pub fn widget_bundle(descriptor: &WidgetDescriptor, layout: &WidgetLayout) -> impl Bundle {
    let position = layout
        .position(&descriptor.id)
        .unwrap_or(descriptor.default_position);

    let mut node = Node {
        position_type: PositionType::Absolute,
        left: Val::Px(position.x),
        top: Val::Px(position.y),
        width: Val::Px(descriptor.width),
        flex_direction: FlexDirection::Column,
        ..default()
    };
    if let Some(height) = descriptor.height {
        node.height = Val::Px(height);
    }
    if let Some(min_height) = descriptor.min_height {
        node.min_height = Val::Px(min_height);
    }

    (
        node,
        ZIndex(layout.z_index(&descriptor.id)),
        HeaderWidget {
            id: descriptor.id.clone(),
        },
    )
}
