use std::path::PathBuf;

/// Errors raised by a key-value storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid storage key {0:?}")]
    InvalidKey(String),

    #[error("storage quota exceeded writing {key:?}: {needed} bytes needed, limit is {limit}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },
}

/// Failures while loading or saving a trainer's settings record.
///
/// None of these reach the caller of the settings store: reads fall back to
/// the default preset and writes are dropped, both after logging.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to read saved settings under {key:?}: {source}")]
    Read { key: String, source: StorageError },

    #[error("saved settings under {key:?} are malformed: {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },

    #[error("failed to persist settings under {key:?}: {source}")]
    Write { key: String, source: StorageError },

    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

impl PersistenceError {
    /// True for the read-side failures that trigger a fallback to defaults
    pub fn is_read_error(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Corrupt { .. })
    }
}

/// Errors building settings values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("grid size {size} is out of range ({min}..={max})")]
    GridSizeOutOfRange { size: u32, min: u32, max: u32 },
}
