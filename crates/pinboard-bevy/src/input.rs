//! Pointer observers and keyboard handling for header widgets.
//!
//! Pointer drags come from `bevy_picking` observers targeting entities with
//! [`HeaderWidget`]. Pointer coordinates are divided by `UiScale` so they
//! share units with `Node` offsets.

use bevy::picking::events::{Cancel, Click, Drag, DragEnd, DragStart, Pointer};
use bevy::picking::pointer::PointerId;
use bevy::prelude::*;
use bevy::ui::UiScale;
use pinboard_core::{Nudge, PointerInput, Position, TouchPoint, WidgetLayout};

use crate::components::HeaderWidget;
use crate::events::{PositionCommitted, WidgetDragStarted};
use crate::resources::{DragSession, FocusedWidget, HeaderGeometry, HeaderLayout, PointerDrag};

/// Translate a picking pointer into the engine's input shape.
pub fn pointer_input(pointer_id: PointerId, position: Vec2) -> PointerInput {
    match pointer_id {
        PointerId::Mouse => PointerInput::Mouse {
            client_x: position.x,
            client_y: position.y,
        },
        PointerId::Touch(_) => PointerInput::Touch {
            touches: vec![TouchPoint {
                client_x: position.x,
                client_y: position.y,
            }],
        },
        PointerId::Custom(_) => PointerInput::Unknown,
    }
}

/// Clamp a live drag position to the widget's current bounds.
fn clamp_live(layout: &WidgetLayout, id: &str, position: Position) -> Position {
    layout
        .bounds_for(id)
        .map_or(position, |bounds| bounds.clamp(position))
}

// ── Observers (pointer interaction) ─────────────────────────────────────────

pub fn on_widget_drag_start(
    mut drag_start: On<Pointer<DragStart>>,
    q_widgets: Query<&HeaderWidget>,
    layout: Option<ResMut<HeaderLayout>>,
    geometry: Res<HeaderGeometry>,
    ui_scale: Res<UiScale>,
    mut session: ResMut<DragSession>,
    mut focused: ResMut<FocusedWidget>,
    mut started: MessageWriter<WidgetDragStarted>,
) {
    let Ok(widget) = q_widgets.get(drag_start.entity) else {
        return;
    };
    let Some(mut layout) = layout else {
        return;
    };
    drag_start.propagate(false);

    if !layout.drag_start(&widget.id) {
        return;
    }
    let Some(origin) = layout.position(&widget.id) else {
        return;
    };

    let pointer = drag_start.pointer_location.position / ui_scale.0;
    session.active = Some(PointerDrag {
        widget_id: widget.id.clone(),
        origin,
        pointer_start: pointer,
        pointer,
        scroll_start: geometry.scroll_offset,
    });
    focused.0 = Some(widget.id.clone());
    started.write(WidgetDragStarted {
        widget_id: widget.id.clone(),
    });
    tracing::debug!("Drag started: {}", widget.id);
}

pub fn on_widget_drag(
    mut drag: On<Pointer<Drag>>,
    q_widgets: Query<&HeaderWidget>,
    layout: Option<ResMut<HeaderLayout>>,
    geometry: Res<HeaderGeometry>,
    ui_scale: Res<UiScale>,
    mut session: ResMut<DragSession>,
) {
    let Ok(widget) = q_widgets.get(drag.entity) else {
        return;
    };
    drag.propagate(false);
    let Some(mut layout) = layout else {
        return;
    };
    let Some(active) = session.active.as_mut() else {
        return;
    };
    if active.widget_id != widget.id {
        return;
    }

    let pointer = drag.pointer_location.position / ui_scale.0;
    active.pointer = pointer;
    let live = clamp_live(&layout, &widget.id, active.live_position(geometry.scroll_offset));
    let input = pointer_input(drag.pointer_id, pointer);
    layout.drag_move(&input, geometry.viewport, Some(live));
}

pub fn on_widget_drag_end(
    mut drag_end: On<Pointer<DragEnd>>,
    q_widgets: Query<&HeaderWidget>,
    layout: Option<ResMut<HeaderLayout>>,
    geometry: Res<HeaderGeometry>,
    mut session: ResMut<DragSession>,
    mut committed: MessageWriter<PositionCommitted>,
) {
    let Ok(widget) = q_widgets.get(drag_end.entity) else {
        return;
    };
    drag_end.propagate(false);
    let Some(mut layout) = layout else {
        return;
    };
    let Some(active) = session.active.take_if(|d| d.widget_id == widget.id) else {
        return;
    };

    let target = active.live_position(geometry.scroll_offset);
    if let Some(position) = layout.drag_end(&widget.id, target.x, target.y) {
        committed.write(PositionCommitted {
            widget_id: widget.id.clone(),
            position,
        });
        tracing::debug!("Drag ended: {} at ({}, {})", widget.id, position.x, position.y);
    }
}

pub fn on_widget_drag_cancel(
    drag_cancel: On<Pointer<Cancel>>,
    q_widgets: Query<&HeaderWidget>,
    layout: Option<ResMut<HeaderLayout>>,
    mut session: ResMut<DragSession>,
) {
    let Ok(widget) = q_widgets.get(drag_cancel.entity) else {
        return;
    };
    if session
        .active
        .take_if(|d| d.widget_id == widget.id)
        .is_none()
    {
        return;
    }
    if let Some(mut layout) = layout {
        layout.abandon_drag();
    }
    tracing::debug!("Drag cancelled: {}", widget.id);
}

/// Clicking a widget gives it keyboard focus.
pub fn on_widget_click(
    click: On<Pointer<Click>>,
    q_widgets: Query<&HeaderWidget>,
    mut focused: ResMut<FocusedWidget>,
) {
    if let Ok(widget) = q_widgets.get(click.entity) {
        focused.0 = Some(widget.id.clone());
    }
}

// ── Keyboard ────────────────────────────────────────────────────────────────

/// Space/Enter grabs or releases the focused widget, arrows nudge it,
/// Escape puts it back.
pub fn handle_keyboard_moves(
    keys: Res<ButtonInput<KeyCode>>,
    focused: Res<FocusedWidget>,
    layout: Option<ResMut<HeaderLayout>>,
    mut committed: MessageWriter<PositionCommitted>,
) {
    let Some(mut layout) = layout else {
        return;
    };

    if keys.any_just_pressed([KeyCode::Space, KeyCode::Enter]) {
        let target = layout
            .grabbed()
            .map(str::to_string)
            .or_else(|| focused.0.clone());
        if let Some(id) = target
            && let Some(position) = layout.toggle_grab(&id)
        {
            committed.write(PositionCommitted {
                widget_id: id,
                position,
            });
        }
        return;
    }

    if layout.grabbed().is_none() {
        return;
    }
    if keys.just_pressed(KeyCode::Escape) {
        layout.cancel_grab();
        return;
    }

    let nudges = [
        (KeyCode::ArrowLeft, Nudge::Left),
        (KeyCode::ArrowRight, Nudge::Right),
        (KeyCode::ArrowUp, Nudge::Up),
        (KeyCode::ArrowDown, Nudge::Down),
    ];
    for (key, nudge) in nudges {
        if keys.just_pressed(key) {
            layout.nudge(nudge);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinboard_core::geometry::extract_pointer_x;

    #[test]
    fn test_pointer_input_mouse_and_touch_share_x() {
        let pos = Vec2::new(120.0, 40.0);
        let mouse = pointer_input(PointerId::Mouse, pos);
        let touch = pointer_input(PointerId::Touch(7), pos);
        assert_eq!(extract_pointer_x(&mouse), 120.0);
        assert_eq!(extract_pointer_x(&touch), 120.0);
    }
}
