//! Bevy systems that keep the layout engine and the widget nodes in sync.

use std::collections::HashMap;
use std::time::Instant;

use bevy::prelude::*;
use bevy::ui::{ComputedNode, UiGlobalTransform};
use pinboard_core::{AutoScrollState, Size, Viewport};

use crate::components::{HeaderContent, HeaderViewport, HeaderWidget};
use crate::events::{LayoutCommand, LayoutWasReset, WidgetDataCleared};
use crate::resources::{DragSession, FocusedWidget, HeaderGeometry, HeaderLayout, WidgetEntities};

/// Start observing widgets as they spawn, stop when they despawn.
pub fn track_widget_mounts(
    layout: Option<ResMut<HeaderLayout>>,
    added: Query<(Entity, &HeaderWidget), Added<HeaderWidget>>,
    mut removed: RemovedComponents<HeaderWidget>,
    mut entities: ResMut<WidgetEntities>,
    mut session: ResMut<DragSession>,
) {
    let Some(mut layout) = layout else {
        return;
    };

    for (entity, widget) in added.iter() {
        layout.observe_widget(&widget.id);
        entities.0.insert(entity, widget.id.clone());
    }

    for entity in removed.read() {
        let Some(id) = entities.0.remove(&entity) else {
            continue;
        };
        layout.unobserve_widget(&id);
        if session.active.as_ref().is_some_and(|d| d.widget_id == id) {
            session.active = None;
        }
        tracing::debug!("Widget unmounted: {id}");
    }
}

/// Mirror the viewport rectangle, scroll offset, and content size into
/// [`HeaderGeometry`] and the layout's container size.
pub fn sync_header_geometry(
    layout: Option<ResMut<HeaderLayout>>,
    q_viewport: Query<(&ComputedNode, &UiGlobalTransform, &ScrollPosition), With<HeaderViewport>>,
    q_content: Query<&ComputedNode, With<HeaderContent>>,
    mut geometry: ResMut<HeaderGeometry>,
) {
    let Ok((viewport_node, transform, scroll)) = q_viewport.single() else {
        return;
    };
    let scale = viewport_node.inverse_scale_factor();
    let viewport_size = viewport_node.size() * scale;
    // UiGlobalTransform is centred on the node, in physical pixels.
    let left = transform.translation.x * scale - viewport_size.x / 2.0;

    let content_size = q_content
        .single()
        .map(|node| node.size() * node.inverse_scale_factor())
        .unwrap_or(viewport_size);

    let viewport = Viewport::new(left, viewport_size.x);
    if geometry.viewport != viewport {
        geometry.viewport = viewport;
    }
    let max_scroll = (content_size.x - viewport_size.x).max(0.0);
    if geometry.max_scroll != max_scroll {
        geometry.max_scroll = max_scroll;
    }
    if geometry.scroll_offset != scroll.x {
        geometry.scroll_offset = scroll.x;
    }

    if let Some(mut layout) = layout {
        let container = Size::new(content_size.x, content_size.y);
        if layout.container_size() != container {
            layout.set_container_size(container);
        }
    }
}

/// Report widget size changes to the debounced observer and apply the
/// batch once it settles.
pub fn measure_widget_heights(
    layout: Option<ResMut<HeaderLayout>>,
    q_changed: Query<(), (With<HeaderWidget>, Changed<ComputedNode>)>,
    q_widgets: Query<(&HeaderWidget, &ComputedNode)>,
) {
    let Some(mut layout) = layout else {
        return;
    };
    let now = Instant::now();

    if !q_changed.is_empty() {
        layout.bypass_change_detection().notify_resize(now);
    }
    if !layout.resize_pending() {
        return;
    }

    let heights: HashMap<&str, f32> = q_widgets
        .iter()
        .map(|(widget, node)| {
            (
                widget.id.as_str(),
                node.size().y * node.inverse_scale_factor(),
            )
        })
        .collect();
    let applied = layout
        .bypass_change_detection()
        .poll_dimensions(now, |id| heights.get(id).copied());
    if applied {
        layout.set_changed();
        tracing::debug!("Re-measured {} widget heights", heights.len());
    }
}

/// Apply reset and clear-data requests from the surrounding UI.
pub fn handle_layout_commands(
    mut commands: MessageReader<LayoutCommand>,
    layout: Option<ResMut<HeaderLayout>>,
    mut session: ResMut<DragSession>,
    mut was_reset: MessageWriter<LayoutWasReset>,
    mut data_cleared: MessageWriter<WidgetDataCleared>,
) {
    let Some(mut layout) = layout else {
        commands.clear();
        return;
    };

    for cmd in commands.read() {
        match cmd {
            LayoutCommand::Reset => {
                layout.reset();
                session.active = None;
                was_reset.write(LayoutWasReset);
                tracing::info!("Widget layout reset to defaults");
            }
            LayoutCommand::ClearWidgetData { widget_id } => {
                let removed = layout.persistence().clear_widget_data(widget_id);
                data_cleared.write(WidgetDataCleared {
                    widget_id: widget_id.clone(),
                    removed,
                });
                tracing::info!("Cleared {removed} data entries for widget '{widget_id}'");
            }
        }
    }
}

/// Advance edge auto-scroll by one frame. The dragged widget rides along
/// with the scrolled content.
pub fn drive_auto_scroll(
    layout: Option<ResMut<HeaderLayout>>,
    session: Res<DragSession>,
    mut geometry: ResMut<HeaderGeometry>,
    mut q_viewport: Query<&mut ScrollPosition, With<HeaderViewport>>,
) {
    let Some(mut layout) = layout else {
        return;
    };
    if layout.auto_scroll_state() == AutoScrollState::Idle {
        return;
    }
    let Ok(mut scroll) = q_viewport.single_mut() else {
        return;
    };

    let next = layout.auto_scroll_tick(geometry.scroll_offset, geometry.max_scroll);
    if next == geometry.scroll_offset {
        return;
    }
    scroll.x = next;
    geometry.scroll_offset = next;

    if let Some(active) = session.active.as_ref() {
        let live = active.live_position(next);
        let live = layout
            .bounds_for(&active.widget_id)
            .map_or(live, |bounds| bounds.clamp(live));
        layout.update_position(&active.widget_id, live);
    }
}

/// Write positions and z-indices to widget nodes whenever the layout changes.
pub fn apply_widget_layout(
    layout: Option<Res<HeaderLayout>>,
    mut q_widgets: Query<(&HeaderWidget, &mut Node, &mut ZIndex)>,
) {
    let Some(layout) = layout else {
        return;
    };
    if !layout.is_changed() {
        return;
    }

    for (widget, mut node, mut z_index) in q_widgets.iter_mut() {
        let Some(position) = layout.position(&widget.id) else {
            continue;
        };
        let left = Val::Px(position.x);
        let top = Val::Px(position.y);
        if node.left != left || node.top != top {
            node.left = left;
            node.top = top;
        }
        let z = ZIndex(layout.z_index(&widget.id));
        if *z_index != z {
            *z_index = z;
        }
    }
}

/// When the header viewport goes away, stop scrolling, cancel pending
/// measurement, and drop any gesture in flight.
pub fn teardown_on_unmount(
    mut removed: RemovedComponents<HeaderViewport>,
    q_viewport: Query<(), With<HeaderViewport>>,
    layout: Option<ResMut<HeaderLayout>>,
    mut session: ResMut<DragSession>,
    mut focused: ResMut<FocusedWidget>,
) {
    if removed.read().count() == 0 || !q_viewport.is_empty() {
        return;
    }
    if let Some(mut layout) = layout {
        layout.teardown();
    }
    session.active = None;
    focused.0 = None;
}
