//! vite-assets - Vite manifest resolution and HTML tag generation.
//!
//! This crate resolves logical Vite asset paths (JS/TS module entry
//! points) to the URLs and HTML tags a server-rendered page needs,
//! sourcing that information either from a live Vite dev server or from
//! the build-time `manifest.json`. The host framework registers one
//! [`AssetLoader`] at startup and calls its `generate_*` operations from
//! template-rendering code.
//!
//! # Modules
//!
//! - [`client`] - Per-application asset client and the dependency walk
//! - [`config`] - Configuration schema and host-supplied settings
//! - [`error`] - Error types and result aliases
//! - [`loader`] - Application registry, settings layering, global handle
//! - [`manifest`] - Manifest model, loading and lookup
//! - [`probe`] - Dev-server liveness probe
//! - [`tag`] - Pure HTML tag building
//!
//! # Example
//!
//! ```
//! use vite_assets::tag::{self, Attrs};
//!
//! // Caller attributes merge over defaults, caller wins on collision
//! let attrs = Attrs::new().with("type", "module").merge(
//!     &Attrs::new().with("defer", ""),
//! );
//! let html = tag::script("assets/main.abc123.js", &attrs);
//! assert_eq!(
//!     html,
//!     "<script type=\"module\" defer src=\"assets/main.abc123.js\"></script>"
//! );
//! ```
//!
//! For end-to-end manifest loading, see the integration tests.

pub mod client;
pub mod config;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod probe;
pub mod tag;

pub use client::AppClient;
pub use config::{LegacySettings, StaticUrlResolver, ViteConfig, ViteSettings};
pub use error::{Result, ViteError};
pub use loader::{global, init_global, AssetLoader, DEFAULT_APP_NAME};
pub use manifest::{Diagnostic, ManifestEntry, ManifestResolver, MANIFEST_WARNING_ID};
pub use probe::{HttpProbe, ServerProbe, StaticProbe};
pub use tag::{Attrs, Tag};
