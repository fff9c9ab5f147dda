//! Native Bevy UI for the Pinboard demo: a nav bar with a reset button
//! and the scrollable header holding the draggable widgets.

pub mod header;
pub mod sketchpad;
pub mod theme;

use bevy::prelude::*;

/// Top-level UI plugin. Spawns the header and wires widget interactions.
pub struct HeaderUiPlugin;

impl Plugin for HeaderUiPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(theme::BG_PAGE))
            .init_resource::<sketchpad::SketchpadState>()
            .init_resource::<header::GameScore>()
            .add_systems(
                Startup,
                (
                    sketchpad::load_sketchpad,
                    header::load_game_score,
                    header::spawn_header,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    header::handle_reset_button,
                    header::sync_reset_button,
                    header::handle_game_button,
                    header::log_layout_messages,
                    sketchpad::handle_clear_button,
                    sketchpad::apply_cleared_data,
                    sketchpad::redraw_sketchpad,
                ),
            )
            .add_observer(sketchpad::on_canvas_drag_start)
            .add_observer(sketchpad::on_canvas_drag)
            .add_observer(sketchpad::on_canvas_drag_end);
    }
}
