//! Bevy messages exchanged between the header and the surrounding UI.

use bevy::prelude::*;
use pinboard_core::Position;

/// Inbound requests from the surrounding UI (nav bar, widget chrome).
#[derive(Message, Debug, Clone)]
pub enum LayoutCommand {
    /// Restore every widget to its default position and drop persisted positions.
    Reset,
    /// Delete every persisted data entry owned by one widget.
    ClearWidgetData { widget_id: String },
}

/// Fired when a pointer drag picks up a widget.
#[derive(Message, Debug, Clone)]
pub struct WidgetDragStarted {
    pub widget_id: String,
}

/// Fired after a move was clamped and persisted (drag end or keyboard release).
#[derive(Message, Debug, Clone)]
pub struct PositionCommitted {
    pub widget_id: String,
    pub position: Position,
}

/// Fired after a [`LayoutCommand::Reset`] was applied.
#[derive(Message, Debug, Clone)]
pub struct LayoutWasReset;

/// Fired after a [`LayoutCommand::ClearWidgetData`] was applied.
#[derive(Message, Debug, Clone)]
pub struct WidgetDataCleared {
    pub widget_id: String,
    /// Number of storage entries removed.
    pub removed: usize,
}
