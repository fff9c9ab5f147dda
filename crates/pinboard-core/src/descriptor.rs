//! Static per-widget configuration.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::geometry::Position;

/// Describes one positionable widget. Immutable for the lifetime of a layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetDescriptor {
    /// Unique identifier, also used in storage keys.
    pub id: String,
    /// Position used until the user moves the widget (and after a reset).
    pub default_position: Position,
    /// Fixed width in pixels.
    pub width: f32,
    /// Fixed height, if the widget does not size to its content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    /// Lower bound on the content-driven height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<f32>,
    /// Opaque reference to the widget's visual content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl WidgetDescriptor {
    pub fn new(id: impl Into<String>, x: f32, y: f32, width: f32) -> Self {
        Self {
            id: id.into(),
            default_position: Position::new(x, y),
            width,
            height: None,
            min_height: None,
            content: None,
        }
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_min_height(mut self, min_height: f32) -> Self {
        self.min_height = Some(min_height);
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// Reject empty ids, duplicate ids, widths that are not positive and finite,
/// and ids that extend another id with `-` (their widget-data keys overlap).
pub fn validate_descriptors(descriptors: &[WidgetDescriptor]) -> Result<(), LayoutError> {
    let mut seen = HashSet::new();
    for d in descriptors {
        if d.id.is_empty() {
            return Err(LayoutError::EmptyWidgetId);
        }
        if !seen.insert(d.id.as_str()) {
            return Err(LayoutError::DuplicateWidget(d.id.clone()));
        }
        if !d.width.is_finite() || d.width <= 0.0 {
            return Err(LayoutError::InvalidWidth {
                id: d.id.clone(),
                width: d.width,
            });
        }
    }

    for outer in descriptors {
        let namespace = format!("{}-", outer.id);
        if let Some(nested) = descriptors.iter().find(|d| d.id.starts_with(&namespace)) {
            return Err(LayoutError::NamespaceOverlap {
                id: outer.id.clone(),
                nested: nested.id.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_unique_ids() {
        let widgets = [
            WidgetDescriptor::new("bio", 40.0, 40.0, 360.0),
            WidgetDescriptor::new("sketchpad", 440.0, 60.0, 240.0).with_height(240.0),
        ];
        assert_eq!(validate_descriptors(&widgets), Ok(()));
    }

    #[test]
    fn test_validate_rejects_duplicates_and_bad_widths() {
        let dup = [
            WidgetDescriptor::new("bio", 0.0, 0.0, 10.0),
            WidgetDescriptor::new("bio", 5.0, 5.0, 10.0),
        ];
        assert_eq!(
            validate_descriptors(&dup),
            Err(LayoutError::DuplicateWidget("bio".into()))
        );

        let empty = [WidgetDescriptor::new("", 0.0, 0.0, 10.0)];
        assert_eq!(validate_descriptors(&empty), Err(LayoutError::EmptyWidgetId));

        let zero = [WidgetDescriptor::new("game", 0.0, 0.0, 0.0)];
        assert!(matches!(
            validate_descriptors(&zero),
            Err(LayoutError::InvalidWidth { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_overlapping_namespaces() {
        let widgets = [
            WidgetDescriptor::new("game-2", 0.0, 0.0, 10.0),
            WidgetDescriptor::new("game", 0.0, 0.0, 10.0),
        ];
        assert_eq!(
            validate_descriptors(&widgets),
            Err(LayoutError::NamespaceOverlap {
                id: "game".into(),
                nested: "game-2".into(),
            })
        );

        // "a" + type "b-c" and "a-b" + type "c" would share one key.
        let widgets = [
            WidgetDescriptor::new("a", 0.0, 0.0, 10.0),
            WidgetDescriptor::new("a-b", 0.0, 0.0, 10.0),
        ];
        assert!(matches!(
            validate_descriptors(&widgets),
            Err(LayoutError::NamespaceOverlap { .. })
        ));

        let siblings = [
            WidgetDescriptor::new("now-playing", 0.0, 0.0, 10.0),
            WidgetDescriptor::new("now", 0.0, 0.0, 10.0),
            WidgetDescriptor::new("game", 0.0, 0.0, 10.0),
            WidgetDescriptor::new("gamepad", 0.0, 0.0, 10.0),
        ];
        assert!(matches!(
            validate_descriptors(&siblings),
            Err(LayoutError::NamespaceOverlap { .. })
        ));
        assert_eq!(validate_descriptors(&siblings[2..]), Ok(()));
    }

    #[test]
    fn test_deserialize_optional_fields() {
        let json = r#"{"id":"now-playing","default_position":{"x":10,"y":20},"width":280,"min_height":120}"#;
        let d: WidgetDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(d.default_position, Position::new(10.0, 20.0));
        assert_eq!(d.height, None);
        assert_eq!(d.min_height, Some(120.0));
    }
}
