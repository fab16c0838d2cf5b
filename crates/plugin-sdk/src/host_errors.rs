//! Host capability error type.
//!
//! Every fallible host capability returns [`HostError`]. Plugins do not
//! recover from these locally: a failing store, page registry or media
//! library aborts the current user action and the error propagates to the
//! caller unchanged.
//!
//! # Variants by capability
//!
//! | Capability | Variants |
//! |------------|----------|
//! | `StateStore` | `Storage`, `Serialization` |
//! | `PageRegistry` | `Storage`, `NotFound` |
//! | `MediaLibrary` | `Upload` |
//! | `PluginApi` | `Registration`, `NotFound` |

use thiserror::Error;

/// Errors raised by host capabilities.
#[derive(Debug, Error)]
pub enum HostError {
    /// The backing store could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),

    /// The requested page, plugin or entry does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The media library rejected an upload.
    #[error("media upload failed: {0}")]
    Upload(String),

    /// A plugin never registered or its registration was dropped.
    #[error("plugin registration failed: {0}")]
    Registration(String),

    /// A stored value did not have the expected JSON shape.
    #[error("serialization error")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for host capability calls.
pub type HostResult<T> = Result<T, HostError>;

impl From<std::io::Error> for HostError {
    fn from(e: std::io::Error) -> Self {
        HostError::Storage(e.to_string())
    }
}
