//! Sketchpad widget: freehand strokes stored as widget data.
//!
//! Dragging on the canvas draws instead of moving the widget; the card's
//! title strip still drags it. Strokes are written once per finished stroke.

use bevy::picking::Pickable;
use bevy::picking::events::{Drag, DragEnd, DragStart, Pointer};
use bevy::prelude::*;
use bevy::ui::{ComputedNode, ComputedUiRenderTargetInfo, UiGlobalTransform, UiScale};
use pinboard_bevy::events::{LayoutCommand, WidgetDataCleared};
use pinboard_bevy::resources::HeaderLayout;
use serde::{Deserialize, Serialize};

use super::theme;
use crate::widgets;

const STROKES_KEY: &str = "strokes";
/// Points closer than this (px) to the previous one are dropped.
const MIN_SEGMENT: f32 = 2.0;
/// Hard cap on stored points across all strokes.
const MAX_POINTS: usize = 4000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub points: Vec<[f32; 2]>,
}

#[derive(Resource, Debug, Default)]
pub struct SketchpadState {
    pub strokes: Vec<Stroke>,
    drawing: bool,
}

impl SketchpadState {
    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(|s| s.points.len()).sum()
    }

    fn has_room(&self) -> bool {
        self.point_count() < MAX_POINTS
    }

    pub fn begin_stroke(&mut self, at: Vec2) {
        if !self.has_room() {
            return;
        }
        self.strokes.push(Stroke {
            points: vec![at.to_array()],
        });
        self.drawing = true;
    }

    /// Append to the open stroke. Returns whether a point was added.
    pub fn extend_stroke(&mut self, at: Vec2) -> bool {
        if !self.drawing || !self.has_room() {
            return false;
        }
        let Some(stroke) = self.strokes.last_mut() else {
            return false;
        };
        if let Some(last) = stroke.points.last()
            && Vec2::from_array(*last).distance(at) < MIN_SEGMENT
        {
            return false;
        }
        stroke.points.push(at.to_array());
        true
    }

    /// Close the open stroke. Returns whether there was one.
    pub fn end_stroke(&mut self) -> bool {
        std::mem::take(&mut self.drawing)
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.drawing = false;
    }
}

/// Marker for the drawing surface.
#[derive(Component)]
pub struct SketchCanvas;

/// Marker for one rendered ink dot.
#[derive(Component)]
pub struct InkDot;

/// Marker for the "Clear" button under the canvas.
#[derive(Component)]
pub struct SketchClearButton;

pub fn load_sketchpad(layout: Option<Res<HeaderLayout>>, mut state: ResMut<SketchpadState>) {
    let Some(layout) = layout else {
        return;
    };
    state.strokes = layout
        .persistence()
        .read_widget_data(widgets::SKETCHPAD, STROKES_KEY, Vec::new());
    tracing::debug!("Loaded {} sketchpad strokes", state.strokes.len());
}

pub fn spawn_sketchpad(parent: &mut ChildSpawnerCommands) {
    parent.spawn((
        SketchCanvas,
        Node {
            position_type: PositionType::Relative,
            flex_grow: 1.0,
            margin: UiRect::horizontal(Val::Px(8.0)),
            overflow: Overflow::clip(),
            ..default()
        },
        BackgroundColor(theme::BG_CANVAS),
    ));

    parent
        .spawn((
            SketchClearButton,
            Button,
            Node {
                align_self: AlignSelf::FlexEnd,
                margin: UiRect::all(Val::Px(6.0)),
                padding: UiRect::axes(Val::Px(8.0), Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(theme::BG_BUTTON),
        ))
        .with_children(|button| {
            button.spawn((
                Text::new("Clear"),
                TextFont {
                    font_size: theme::FONT_SIZE_TITLE,
                    ..default()
                },
                TextColor(theme::TEXT_ON_BUTTON),
            ));
        });
}

/// Pointer position relative to the canvas's top-left corner, in UI pixels.
fn pointer_to_canvas(
    pointer_pos: Vec2,
    node: &ComputedNode,
    node_target: &ComputedUiRenderTargetInfo,
    transform: &UiGlobalTransform,
    ui_scale: f32,
) -> Option<Vec2> {
    let local_pos = transform
        .try_inverse()?
        .transform_point2(pointer_pos * node_target.scale_factor() / ui_scale);
    let top_left = (local_pos + node.size() / 2.0).clamp(Vec2::ZERO, node.size());
    Some(top_left * node.inverse_scale_factor())
}

// ── Observers (pointer interaction) ─────────────────────────────────────────

pub fn on_canvas_drag_start(
    mut drag_start: On<Pointer<DragStart>>,
    q_canvas: Query<
        (
            &ComputedNode,
            &ComputedUiRenderTargetInfo,
            &UiGlobalTransform,
        ),
        With<SketchCanvas>,
    >,
    ui_scale: Res<UiScale>,
    mut state: ResMut<SketchpadState>,
) {
    let Ok((node, node_target, transform)) = q_canvas.get(drag_start.entity) else {
        return;
    };
    drag_start.propagate(false);
    if let Some(at) = pointer_to_canvas(
        drag_start.pointer_location.position,
        node,
        node_target,
        transform,
        ui_scale.0,
    ) {
        state.begin_stroke(at);
    }
}

pub fn on_canvas_drag(
    mut drag: On<Pointer<Drag>>,
    q_canvas: Query<
        (
            &ComputedNode,
            &ComputedUiRenderTargetInfo,
            &UiGlobalTransform,
        ),
        With<SketchCanvas>,
    >,
    ui_scale: Res<UiScale>,
    mut state: ResMut<SketchpadState>,
) {
    let Ok((node, node_target, transform)) = q_canvas.get(drag.entity) else {
        return;
    };
    drag.propagate(false);
    if let Some(at) = pointer_to_canvas(
        drag.pointer_location.position,
        node,
        node_target,
        transform,
        ui_scale.0,
    ) {
        state.extend_stroke(at);
    }
}

pub fn on_canvas_drag_end(
    mut drag_end: On<Pointer<DragEnd>>,
    q_canvas: Query<(), With<SketchCanvas>>,
    layout: Option<Res<HeaderLayout>>,
    mut state: ResMut<SketchpadState>,
) {
    if q_canvas.get(drag_end.entity).is_err() {
        return;
    }
    drag_end.propagate(false);
    if state.end_stroke()
        && let Some(layout) = layout
    {
        layout
            .persistence()
            .write_widget_data(widgets::SKETCHPAD, STROKES_KEY, &state.strokes);
    }
}

// ── Systems ─────────────────────────────────────────────────────────────────

pub fn handle_clear_button(
    interactions: Query<&Interaction, (Changed<Interaction>, With<SketchClearButton>)>,
    mut commands: MessageWriter<LayoutCommand>,
) {
    for interaction in interactions.iter() {
        if *interaction == Interaction::Pressed {
            commands.write(LayoutCommand::ClearWidgetData {
                widget_id: widgets::SKETCHPAD.to_string(),
            });
        }
    }
}

pub fn apply_cleared_data(
    mut cleared: MessageReader<WidgetDataCleared>,
    mut state: ResMut<SketchpadState>,
) {
    if cleared.read().any(|msg| msg.widget_id == widgets::SKETCHPAD) {
        state.clear();
    }
}

/// Spawn dots for new points; rebuild from scratch after a clear.
pub fn redraw_sketchpad(
    mut commands: Commands,
    state: Res<SketchpadState>,
    q_canvas: Query<Entity, With<SketchCanvas>>,
    q_dots: Query<Entity, With<InkDot>>,
    mut rendered: Local<usize>,
) {
    if !state.is_changed() {
        return;
    }
    let Ok(canvas) = q_canvas.single() else {
        return;
    };

    let total = state.point_count();
    if total < *rendered {
        for dot in q_dots.iter() {
            commands.entity(dot).despawn();
        }
        *rendered = 0;
    }
    if total == *rendered {
        return;
    }

    let skip = *rendered;
    commands.entity(canvas).with_children(|canvas| {
        let points = state.strokes.iter().flat_map(|s| s.points.iter()).skip(skip);
        for [x, y] in points {
            canvas.spawn((
                InkDot,
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(x - theme::INK_DOT / 2.0),
                    top: Val::Px(y - theme::INK_DOT / 2.0),
                    width: Val::Px(theme::INK_DOT),
                    height: Val::Px(theme::INK_DOT),
                    ..default()
                },
                BackgroundColor(theme::INK),
                Pickable::IGNORE,
            ));
        }
    });
    *rendered = total;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_lifecycle() {
        let mut state = SketchpadState::default();
        assert!(!state.extend_stroke(Vec2::new(1.0, 1.0)));

        state.begin_stroke(Vec2::new(0.0, 0.0));
        assert!(!state.extend_stroke(Vec2::new(1.0, 0.0)));
        assert!(state.extend_stroke(Vec2::new(5.0, 0.0)));
        assert!(state.end_stroke());
        assert!(!state.end_stroke());

        assert_eq!(state.strokes.len(), 1);
        assert_eq!(state.point_count(), 2);

        state.clear();
        assert_eq!(state.point_count(), 0);
    }

    #[test]
    fn test_strokes_serialize_as_point_arrays() {
        let strokes = vec![Stroke {
            points: vec![[1.0, 2.0]],
        }];
        let json = serde_json::to_string(&strokes).unwrap();
        assert_eq!(json, r#"[{"points":[[1.0,2.0]]}]"#);
    }
}
