use std::path::PathBuf;

/// Failures raised by a [`KeyValueStore`](crate::storage::KeyValueStore)
/// backend. The persistence adapter swallows and logs these.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage is unavailable: {0}")]
    Unavailable(String),
    #[error("storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid widget configuration, rejected when a layout is built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("widget id must not be empty")]
    EmptyWidgetId,
    #[error("duplicate widget id: {0}")]
    DuplicateWidget(String),
    #[error("widget '{id}' has invalid width {width}")]
    InvalidWidth { id: String, width: f32 },
    /// `nested` starts with `id` followed by `-`, so their data keys overlap.
    #[error("widget id '{nested}' extends '{id}-' and would share its data namespace")]
    NamespaceOverlap { id: String, nested: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse header manifest: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}
