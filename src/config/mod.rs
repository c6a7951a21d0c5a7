//! Configuration schema and host-supplied settings.
//!
//! This module handles the configuration surface of the crate:
//! - Per-application schema in [`schema`]
//! - Host settings and the deprecated flat schema in [`settings`]
//!
//! Layering of the settings sources into registered applications happens in
//! [`crate::loader::AssetLoader::from_settings`].

pub mod schema;
pub mod settings;

pub use schema::ViteConfig;
pub use settings::{LegacySettings, StaticUrlResolver, ViteSettings};
