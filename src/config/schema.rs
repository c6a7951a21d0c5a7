//! Per-application configuration schema.
//!
//! This module contains [`ViteConfig`], the struct that maps to one
//! application's entry in the host's structured Vite settings. Defaults
//! mirror the Vite CLI's own conventions (dev server on localhost:5173,
//! HMR client at `@vite/client`).

use serde::Deserialize;

/// Configuration for one named Vite application.
///
/// Immutable once constructed: the owning client never mutates it, and the
/// manifest table derived from it is built exactly once.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViteConfig {
    /// Whether assets should be served by a live dev server. Even when
    /// true, the dev server's reachability is re-checked per request.
    pub dev_mode: bool,

    /// Dev server protocol (http or https).
    pub dev_server_protocol: String,

    /// Dev server hostname.
    pub dev_server_host: String,

    /// Dev server port.
    pub dev_server_port: u16,

    /// Prefix joined onto asset paths, for both URL strategies.
    pub static_url_prefix: String,

    /// Path to the manifest generated by Vite: a local filesystem path or
    /// an http(s) URL. Defaults to `<static root>/<prefix>/manifest.json`.
    pub manifest_path: Option<String>,

    /// Substring locating the `@vitejs/plugin-legacy` polyfills entry
    /// inside the manifest.
    pub legacy_polyfills_motif: String,

    /// Dev server path to the HMR client script.
    pub ws_client_url: String,

    /// Dev server path to the React RefreshRuntime for
    /// `@vitejs/plugin-react`.
    pub react_refresh_url: String,
}

impl Default for ViteConfig {
    fn default() -> Self {
        Self {
            dev_mode: false,
            dev_server_protocol: default_protocol(),
            dev_server_host: default_host(),
            dev_server_port: default_port(),
            static_url_prefix: String::new(),
            manifest_path: None,
            legacy_polyfills_motif: default_polyfills_motif(),
            ws_client_url: default_ws_client_url(),
            react_refresh_url: default_react_refresh_url(),
        }
    }
}

fn default_protocol() -> String {
    "http".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5173
}

fn default_polyfills_motif() -> String {
    "legacy-polyfills".to_string()
}

fn default_ws_client_url() -> String {
    "@vite/client".to_string()
}

fn default_react_refresh_url() -> String {
    "@react-refresh".to_string()
}
