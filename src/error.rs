//! Error types for Tickerview.
//!
//! This module provides a unified error handling approach using `thiserror`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Tickerview operations.
pub type Result<T> = std::result::Result<T, TickerError>;

/// Errors that can occur in Tickerview.
#[derive(Debug, Error)]
pub enum TickerError {
    /// Snapshot text could not be decoded.
    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(#[from] serde_json::Error),

    /// The accelerated renderer could not be constructed.
    #[error("Renderer initialization failed for {surface}: {reason}")]
    RendererInit {
        /// Surface the renderer was bound to.
        surface: String,
        /// Backend-provided failure reason.
        reason: String,
    },

    /// A quote source failed to produce a snapshot.
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// Failed to open a file.
    #[error("Failed to open file: {path}")]
    FileOpen {
        /// Path that could not be opened.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl TickerError {
    /// Create a RendererInit error.
    pub fn renderer_init(surface: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RendererInit {
            surface: surface.into(),
            reason: reason.into(),
        }
    }

    /// Create a Fetch error.
    pub fn fetch(reason: impl Into<String>) -> Self {
        Self::Fetch(reason.into())
    }

    /// Create a FileOpen error.
    pub fn file_open(path: PathBuf, source: std::io::Error) -> Self {
        Self::FileOpen { path, source }
    }
}
