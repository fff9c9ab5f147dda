//! Pinboard Core: domain layer for the draggable widget header.
//!
//! This crate owns widget positioning, persistence, stacking, and
//! auto-scroll logic. No rendering or framework dependencies; the Bevy
//! integration lives in `pinboard-bevy`.

pub mod auto_scroll;
pub mod config;
pub mod descriptor;
pub mod dimensions;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod keyboard;
pub mod persistence;
pub mod positions;
pub mod stack;
pub mod storage;

// Re-exports for convenience.
pub use auto_scroll::{AutoScroll, AutoScrollState, ScrollDirection, Viewport};
pub use config::{HeaderManifest, LayoutConfig};
pub use descriptor::WidgetDescriptor;
pub use dimensions::DimensionObserver;
pub use engine::WidgetLayout;
pub use error::{ConfigError, LayoutError, StorageError};
pub use geometry::{Bounds, PointerInput, Position, Size, TouchPoint};
pub use keyboard::Nudge;
pub use persistence::{Persistence, StorageKeys};
pub use positions::{PositionMap, PositionStore, SubscriptionId};
pub use stack::StackOrder;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
