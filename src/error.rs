//! Error types for vite-assets operations.
//!
//! This module defines [`ViteError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `ViteError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `ViteError::Other`) for unexpected errors
//! - Transport failures (probe, manifest fetch) never escape raw: they are
//!   downgraded to a boolean or wrapped into `ManifestParse`

use thiserror::Error;

/// Core error type for vite-assets operations.
#[derive(Debug, Error)]
pub enum ViteError {
    /// Manifest file unreadable or structurally invalid (I/O, HTTP or JSON
    /// failure). The message carries the underlying cause.
    #[error("Cannot read Vite manifest for app '{app}' at {manifest_path}: {message}")]
    ManifestParse {
        app: String,
        manifest_path: String,
        message: String,
    },

    /// Requested logical path absent from the manifest table, or requested
    /// while the manifest was never parsed (dev serving).
    #[error("Cannot find {path} for app '{app}' in Vite manifest at {manifest_path}")]
    AssetNotFound {
        path: String,
        app: String,
        manifest_path: String,
    },

    /// Requested application name is not registered.
    #[error("Cannot find app '{app}' in Vite settings")]
    AppConfigNotFound { app: String },

    /// Import cycle detected among manifest entries during the CSS walk.
    #[error("Circular imports in Vite manifest involving {path}: {cycle}")]
    CircularImports { path: String, cycle: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for vite-assets operations.
pub type Result<T> = std::result::Result<T, ViteError>;
