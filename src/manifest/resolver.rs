//! Manifest loading, parsing and lookup.
//!
//! A [`ManifestResolver`] reads the Vite `manifest.json` (local file, or
//! remote URL as a fallback), builds the lookup table keyed by logical
//! asset path, and remembers the legacy-polyfills entry located by motif
//! substring match.
//!
//! Construction never fails: a missing or invalid manifest must not block
//! process startup, so the parse outcome is stored as an explicit
//! `Result` on the resolver. Per-request lookups then fail with
//! [`ViteError::AssetNotFound`], and the startup health check surfaces the
//! underlying parse problem via [`check`](ManifestResolver::check).

use crate::config::ViteConfig;
use crate::error::{Result, ViteError};
use crate::manifest::diagnostic::{Diagnostic, MANIFEST_WARNING_ID};
use crate::manifest::entry::ManifestEntry;
use anyhow::Context;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Timeout for fetching a remote manifest; surfaced as a parse error.
pub const MANIFEST_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Successfully parsed manifest contents.
#[derive(Debug, Default)]
pub struct ManifestState {
    entries: HashMap<String, ManifestEntry>,
    /// Key and entry of the legacy polyfills bundle, last motif match in
    /// document order.
    legacy_polyfills: Option<(String, ManifestEntry)>,
}

/// Loads and queries one application's manifest.
pub struct ManifestResolver {
    app_name: String,
    manifest_path: String,
    legacy_polyfills_motif: String,
    /// True when the effective mode at construction was dev serving: the
    /// manifest is deliberately never parsed and every `get` misses.
    skip_parse: bool,
    state: std::result::Result<ManifestState, ViteError>,
}

impl ManifestResolver {
    /// Build a resolver for `config`. With `skip_parse` (dev serving
    /// confirmed by the probe) the table stays empty by design; otherwise
    /// the manifest is parsed eagerly and a failure is stored, logged and
    /// otherwise swallowed.
    pub fn new(
        config: &ViteConfig,
        app_name: &str,
        static_root: Option<&Path>,
        skip_parse: bool,
    ) -> Self {
        let mut resolver = Self {
            app_name: app_name.to_string(),
            manifest_path: resolve_manifest_path(config, static_root),
            legacy_polyfills_motif: config.legacy_polyfills_motif.clone(),
            skip_parse,
            state: Ok(ManifestState::default()),
        };
        if !skip_parse {
            resolver.state = resolver.parse();
            if let Err(error) = &resolver.state {
                tracing::warn!(
                    "Manifest for app '{}' unavailable, startup continues: {}",
                    resolver.app_name,
                    error
                );
            }
        }
        resolver
    }

    /// The path (or URL) this resolver reads the manifest from.
    pub fn manifest_path(&self) -> &str {
        &self.manifest_path
    }

    /// Look up the entry for a logical asset path.
    ///
    /// Misses — including every lookup while dev serving or after a failed
    /// parse — fail with [`ViteError::AssetNotFound`]; that is the only
    /// lookup failure mode exposed to callers.
    pub fn get(&self, path: &str) -> Result<&ManifestEntry> {
        let entry = match &self.state {
            Ok(state) => state.entries.get(path),
            Err(_) => None,
        };
        entry.ok_or_else(|| ViteError::AssetNotFound {
            path: path.to_string(),
            app: self.app_name.clone(),
            manifest_path: self.manifest_path.clone(),
        })
    }

    /// The legacy polyfills entry, if the motif matched any manifest key.
    pub fn legacy_polyfills_entry(&self) -> Option<&ManifestEntry> {
        match &self.state {
            Ok(state) => state.legacy_polyfills.as_ref().map(|(_, entry)| entry),
            Err(_) => None,
        }
    }

    /// Eager health check: re-runs the parse and reports a failure as a
    /// non-fatal diagnostic instead of an error. Empty while dev serving,
    /// since the manifest is never consulted then.
    pub fn check(&self) -> Vec<Diagnostic> {
        if self.skip_parse {
            return Vec::new();
        }
        match self.parse() {
            Ok(_) => Vec::new(),
            Err(error) => vec![Diagnostic::new(
                MANIFEST_WARNING_ID,
                error.to_string(),
                format!(
                    "Make sure you have generated a manifest file, and that \
                     apps[\"{}\"].manifest_path points to the correct location \
                     ({}).",
                    self.app_name, self.manifest_path
                ),
            )],
        }
    }

    /// Read and parse the manifest document. Every failure — file open,
    /// fetch, JSON decode, schema mismatch — collapses into one
    /// [`ViteError::ManifestParse`] naming the app and attempted path.
    fn parse(&self) -> std::result::Result<ManifestState, ViteError> {
        self.parse_inner().map_err(|error| ViteError::ManifestParse {
            app: self.app_name.clone(),
            manifest_path: self.manifest_path.clone(),
            message: format!("{error:#}"),
        })
    }

    fn parse_inner(&self) -> anyhow::Result<ManifestState> {
        let text = read_manifest_text(&self.manifest_path)?;
        // serde_json's preserve_order keeps document order, which decides
        // the last-match-wins polyfills pick below.
        let document: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&text).context("Malformed manifest JSON")?;

        let mut state = ManifestState::default();
        for (path, value) in document {
            let entry: ManifestEntry = serde_json::from_value(value)
                .with_context(|| format!("Invalid manifest entry '{path}'"))?;
            if path.contains(&self.legacy_polyfills_motif) {
                state.legacy_polyfills = Some((path.clone(), entry.clone()));
            }
            state.entries.insert(path, entry);
        }
        Ok(state)
    }
}

/// Raw manifest text. The local filesystem is tried first; on any open
/// failure the path is treated as a URL and fetched.
fn read_manifest_text(path: &str) -> anyhow::Result<String> {
    let open_error = match std::fs::read_to_string(path) {
        Ok(text) => return Ok(text),
        Err(error) => error,
    };
    tracing::debug!(
        "Failed to open manifest at {}, trying it as a URL: {}",
        path,
        open_error
    );
    fetch_manifest_text(path).with_context(|| format!("Failed to open {path} ({open_error})"))
}

fn fetch_manifest_text(url: &str) -> anyhow::Result<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(MANIFEST_FETCH_TIMEOUT)
        .build()
        .context("Failed to create HTTP client")?;
    let response = client
        .get(url)
        .send()
        .with_context(|| format!("Failed to fetch {url}"))?;
    if !response.status().is_success() {
        anyhow::bail!("HTTP {} fetching {}", response.status(), url);
    }
    response
        .text()
        .with_context(|| format!("Failed to read response from {url}"))
}

/// Effective manifest location: an explicit config path (file or URL) wins;
/// otherwise `<static_root>/<static_url_prefix>/manifest.json`.
fn resolve_manifest_path(config: &ViteConfig, static_root: Option<&Path>) -> String {
    match &config.manifest_path {
        Some(path) => path.clone(),
        None => static_root
            .unwrap_or_else(|| Path::new("static"))
            .join(&config.static_url_prefix)
            .join("manifest.json")
            .to_string_lossy()
            .into_owned(),
    }
}
