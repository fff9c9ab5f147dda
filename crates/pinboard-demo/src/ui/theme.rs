//! Colors and sizing shared by the header UI.

use bevy::color::Color;

// ── Background colors ───────────────────────────────────────────────────────

/// Window background.
pub const BG_PAGE: Color = Color::srgb(0.95, 0.94, 0.91);

/// Header strip behind the widgets.
pub const BG_HEADER: Color = Color::srgb(0.89, 0.87, 0.82);

/// Widget card surface.
pub const BG_CARD: Color = Color::srgb(1.0, 1.0, 1.0);

/// Sketchpad canvas.
pub const BG_CANVAS: Color = Color::srgb(0.98, 0.97, 0.93);

/// Buttons.
pub const BG_BUTTON: Color = Color::srgb(0.2, 0.2, 0.22);

// ── Text colors ─────────────────────────────────────────────────────────────

pub const TEXT_PRIMARY: Color = Color::srgb(0.12, 0.12, 0.12);

pub const TEXT_DIM: Color = Color::srgb(0.45, 0.45, 0.45);

pub const TEXT_ON_BUTTON: Color = Color::srgb(0.95, 0.95, 0.95);

// ── Accent ──────────────────────────────────────────────────────────────────

/// Ink for sketchpad strokes.
pub const INK: Color = Color::srgb(0.15, 0.25, 0.65);

// ── Sizing ──────────────────────────────────────────────────────────────────

/// Height (px) of the nav bar above the header.
pub const NAV_HEIGHT: f32 = 40.0;

/// Height (px) of a widget's title strip.
pub const TITLE_HEIGHT: f32 = 24.0;

/// Side length (px) of one sketchpad ink dot.
pub const INK_DOT: f32 = 3.0;

// ── Typography ──────────────────────────────────────────────────────────────

pub const FONT_SIZE_TITLE: f32 = 12.0;

pub const FONT_SIZE_BODY: f32 = 14.0;
