//! Host-supplied settings and the deprecated flat settings schema.
//!
//! The host framework hands the crate one [`ViteSettings`] value. It
//! carries, in priority order:
//!
//! 1. `apps` — the structured multi-application setting (wins outright)
//! 2. `legacy` — deprecated flat keys mapped into a single `"default"` app
//! 3. nothing — one `"default"` app built from hard defaults
//!
//! It also carries the two host capabilities the crate consumes at its
//! boundary: the static files root (for the default manifest location) and
//! an optional static URL resolution hook.

use crate::config::schema::ViteConfig;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Host hook rewriting a prefixed asset path into its final URL
/// (hashed/versioned filenames, CDN domains). When absent, the prefixed
/// path is used directly.
pub type StaticUrlResolver = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Everything the host environment supplies at initialization time.
#[derive(Clone, Default)]
pub struct ViteSettings {
    /// Structured multi-application setting: one [`ViteConfig`] per app
    /// name. Presence of this field (even empty) makes legacy keys inert.
    pub apps: Option<HashMap<String, ViteConfig>>,

    /// Deprecated flat single-application keys.
    pub legacy: LegacySettings,

    /// Static files base directory, used for the default manifest location
    /// `<static_root>/<static_url_prefix>/manifest.json`.
    pub static_root: Option<PathBuf>,

    /// Optional static URL resolution capability from the host framework.
    pub static_url_resolver: Option<StaticUrlResolver>,
}

impl std::fmt::Debug for ViteSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViteSettings")
            .field("apps", &self.apps)
            .field("legacy", &self.legacy)
            .field("static_root", &self.static_root)
            .field(
                "static_url_resolver",
                &self.static_url_resolver.as_ref().map(|_| "<fn>"),
            )
            .finish()
    }
}

/// The deprecated flat settings schema: one optional value per legacy key,
/// all mapping one-to-one onto [`ViteConfig`] fields.
#[derive(Debug, Clone, Default)]
pub struct LegacySettings {
    pub dev_mode: Option<bool>,
    pub dev_server_protocol: Option<String>,
    pub dev_server_host: Option<String>,
    pub dev_server_port: Option<u16>,
    pub static_url_prefix: Option<String>,
    pub manifest_path: Option<String>,
    pub legacy_polyfills_motif: Option<String>,
    pub ws_client_url: Option<String>,
    pub react_refresh_url: Option<String>,
}

impl LegacySettings {
    /// Names of the legacy keys that were actually supplied, for
    /// deprecation warnings.
    pub fn present_keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.dev_mode.is_some() {
            keys.push("VITE_DEV_MODE");
        }
        if self.dev_server_protocol.is_some() {
            keys.push("VITE_DEV_SERVER_PROTOCOL");
        }
        if self.dev_server_host.is_some() {
            keys.push("VITE_DEV_SERVER_HOST");
        }
        if self.dev_server_port.is_some() {
            keys.push("VITE_DEV_SERVER_PORT");
        }
        if self.static_url_prefix.is_some() {
            keys.push("VITE_STATIC_URL_PREFIX");
        }
        if self.manifest_path.is_some() {
            keys.push("VITE_MANIFEST_PATH");
        }
        if self.legacy_polyfills_motif.is_some() {
            keys.push("VITE_LEGACY_POLYFILLS_MOTIF");
        }
        if self.ws_client_url.is_some() {
            keys.push("VITE_WS_CLIENT_URL");
        }
        if self.react_refresh_url.is_some() {
            keys.push("VITE_REACT_REFRESH_URL");
        }
        keys
    }

    /// Whether no legacy key was supplied at all.
    pub fn is_empty(&self) -> bool {
        self.present_keys().is_empty()
    }

    /// Map the supplied keys onto a [`ViteConfig`], defaults filling the
    /// gaps.
    pub fn to_config(&self) -> ViteConfig {
        let defaults = ViteConfig::default();
        ViteConfig {
            dev_mode: self.dev_mode.unwrap_or(defaults.dev_mode),
            dev_server_protocol: self
                .dev_server_protocol
                .clone()
                .unwrap_or(defaults.dev_server_protocol),
            dev_server_host: self
                .dev_server_host
                .clone()
                .unwrap_or(defaults.dev_server_host),
            dev_server_port: self.dev_server_port.unwrap_or(defaults.dev_server_port),
            static_url_prefix: self
                .static_url_prefix
                .clone()
                .unwrap_or(defaults.static_url_prefix),
            manifest_path: self.manifest_path.clone().or(defaults.manifest_path),
            legacy_polyfills_motif: self
                .legacy_polyfills_motif
                .clone()
                .unwrap_or(defaults.legacy_polyfills_motif),
            ws_client_url: self.ws_client_url.clone().unwrap_or(defaults.ws_client_url),
            react_refresh_url: self
                .react_refresh_url
                .clone()
                .unwrap_or(defaults.react_refresh_url),
        }
    }
}
