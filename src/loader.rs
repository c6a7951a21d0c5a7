//! Application registry and settings layering.
//!
//! [`AssetLoader`] owns one [`AppClient`] per configured application and
//! routes every public operation to the right one. It is an explicitly
//! constructed service object; hosts that want a process-wide handle use
//! [`init_global`], a one-shot initializer backed by `OnceLock`.
//!
//! Settings layering, first match wins:
//! 1. The structured `apps` mapping — one client per entry.
//! 2. Otherwise, legacy flat keys map into one `"default"` app, with a
//!    deprecation warning naming every legacy key seen. When both sources
//!    are present the legacy keys are ignored entirely, with a different
//!    warning.
//! 3. Otherwise, one `"default"` app from hard defaults.

use crate::client::AppClient;
use crate::config::{ViteConfig, ViteSettings};
use crate::error::{Result, ViteError};
use crate::manifest::Diagnostic;
use crate::probe::{HttpProbe, ServerProbe};
use crate::tag::Attrs;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Application name used when the host configures nothing else.
pub const DEFAULT_APP_NAME: &str = "default";

/// Routes asset and URL generation to the proper [`AppClient`].
pub struct AssetLoader {
    apps: HashMap<String, AppClient>,
}

impl AssetLoader {
    /// Build the registry from host settings, probing dev servers over
    /// HTTP.
    pub fn from_settings(settings: ViteSettings) -> Self {
        Self::from_settings_with_probe(settings, Arc::new(HttpProbe::new()))
    }

    /// Build the registry with a custom probe implementation.
    pub fn from_settings_with_probe(settings: ViteSettings, probe: Arc<dyn ServerProbe>) -> Self {
        let mut apps = HashMap::new();
        let structured_present = settings.apps.is_some();

        if let Some(configured) = &settings.apps {
            for (name, config) in configured {
                apps.insert(
                    name.clone(),
                    AppClient::new(
                        config.clone(),
                        name.clone(),
                        settings.static_root.clone(),
                        settings.static_url_resolver.clone(),
                        probe.clone(),
                    ),
                );
            }
        }

        let legacy_keys = settings.legacy.present_keys();
        if !legacy_keys.is_empty() {
            if structured_present {
                tracing::warn!(
                    "You're mixing the structured apps setting with these legacy \
                     settings: [{}]. Those legacy settings will be ignored since a \
                     structured setting is configured. Please remove them.",
                    legacy_keys.join(", ")
                );
            } else {
                tracing::warn!(
                    "The settings [{}] are deprecated and will be removed in a \
                     future release. Please switch to the structured apps setting \
                     with a \"{}\" entry.",
                    legacy_keys.join(", "),
                    DEFAULT_APP_NAME
                );
                apps.insert(
                    DEFAULT_APP_NAME.to_string(),
                    AppClient::new(
                        settings.legacy.to_config(),
                        DEFAULT_APP_NAME,
                        settings.static_root.clone(),
                        settings.static_url_resolver.clone(),
                        probe.clone(),
                    ),
                );
            }
        }

        if apps.is_empty() {
            apps.insert(
                DEFAULT_APP_NAME.to_string(),
                AppClient::new(
                    ViteConfig::default(),
                    DEFAULT_APP_NAME,
                    settings.static_root.clone(),
                    settings.static_url_resolver.clone(),
                    probe,
                ),
            );
        }

        Self { apps }
    }

    /// Names of the registered applications.
    pub fn app_names(&self) -> impl Iterator<Item = &str> {
        self.apps.keys().map(String::as_str)
    }

    fn app_client(&self, app: &str) -> Result<&AppClient> {
        self.apps
            .get(app)
            .ok_or_else(|| ViteError::AppConfigNotFound {
                app: app.to_string(),
            })
    }

    /// Script tag plus CSS and modulepreload tags for an asset.
    pub fn generate_asset(&self, path: &str, app: &str, attrs: &Attrs) -> Result<String> {
        self.app_client(app)?.generate_asset(path, attrs)
    }

    /// Preload hints for an asset and its dependencies.
    pub fn preload_asset(&self, path: &str, app: &str) -> Result<String> {
        self.app_client(app)?.preload_asset(path)
    }

    /// URL of a single asset.
    pub fn generate_asset_url(&self, path: &str, app: &str) -> Result<String> {
        self.app_client(app)?.generate_asset_url(path)
    }

    /// Script tag for the legacy polyfills bundle.
    pub fn generate_legacy_polyfills(&self, app: &str, attrs: &Attrs) -> Result<String> {
        self.app_client(app)?.generate_legacy_polyfills(attrs)
    }

    /// Script tag for a legacy (nomodule) asset.
    pub fn generate_legacy_asset(&self, path: &str, app: &str, attrs: &Attrs) -> Result<String> {
        self.app_client(app)?.generate_legacy_asset(path, attrs)
    }

    /// HMR client bootstrap tag (dev mode only).
    pub fn generate_ws_client(&self, app: &str, attrs: &Attrs) -> Result<String> {
        self.app_client(app)?.generate_ws_client(attrs)
    }

    /// React refresh preamble (dev mode only).
    pub fn generate_react_refresh(&self, app: &str, attrs: &Attrs) -> Result<String> {
        self.app_client(app)?.generate_react_refresh(attrs)
    }

    /// Startup health check: manifest diagnostics aggregated across every
    /// registered application.
    pub fn check(&self) -> Vec<Diagnostic> {
        self.apps.values().flat_map(AppClient::check).collect()
    }
}

static GLOBAL: OnceLock<AssetLoader> = OnceLock::new();

/// Initialize the process-wide loader. Idempotent: the first call builds
/// the registry, later calls return it unchanged (their settings are
/// dropped).
pub fn init_global(settings: ViteSettings) -> &'static AssetLoader {
    GLOBAL.get_or_init(|| AssetLoader::from_settings(settings))
}

/// The process-wide loader, if [`init_global`] has run.
pub fn global() -> Option<&'static AssetLoader> {
    GLOBAL.get()
}
