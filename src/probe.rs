//! Dev-server liveness probe.
//!
//! When a configuration enables dev mode, the crate still has to decide per
//! request whether the Vite dev server is actually reachable; if it is not,
//! manifest-based production assets are the safe fallback. The probe result
//! is intentionally never cached, so a dev server going up or down
//! mid-session is observed on the very next render.
//!
//! A running Vite dev server answers `GET /` with 404 (up, but no root
//! document); that status is the liveness signal. Any transport failure or
//! timeout means "not live".

use crate::config::ViteConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Default probe timeout; an unreachable dev server must not stall page
/// rendering.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Reachability check against a dev-server root URL.
pub trait ServerProbe: Send + Sync {
    /// Whether the server at `url` is up and answering.
    fn is_live(&self, url: &str) -> bool;
}

/// HTTP implementation of [`ServerProbe`]: a single GET with a bounded
/// timeout and zero retries.
pub struct HttpProbe {
    client: reqwest::blocking::Client,
}

impl HttpProbe {
    /// Create a probe with [`DEFAULT_PROBE_TIMEOUT`].
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_PROBE_TIMEOUT)
    }

    /// Create a probe with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::blocking::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerProbe for HttpProbe {
    fn is_live(&self, url: &str) -> bool {
        match self.client.get(url).send() {
            Ok(response) => response.status() == reqwest::StatusCode::NOT_FOUND,
            Err(error) => {
                tracing::debug!("Dev server probe to {} failed: {}", url, error);
                false
            }
        }
    }
}

/// Fixed-answer probe for tests and hosts that manage liveness themselves.
/// The answer can be flipped between calls.
pub struct StaticProbe {
    live: AtomicBool,
}

impl StaticProbe {
    pub fn new(live: bool) -> Self {
        Self {
            live: AtomicBool::new(live),
        }
    }

    pub fn set_live(&self, live: bool) {
        self.live.store(live, Ordering::Relaxed);
    }
}

impl ServerProbe for StaticProbe {
    fn is_live(&self, _url: &str) -> bool {
        self.live.load(Ordering::Relaxed)
    }
}

/// Root URL of the configured dev server.
pub fn dev_server_root(config: &ViteConfig) -> String {
    format!(
        "{}://{}:{}/",
        config.dev_server_protocol, config.dev_server_host, config.dev_server_port
    )
}

/// Decide the effective mode for one request.
///
/// With `dev_mode` off this is unconditionally false and no network call is
/// made. With it on, the configured dev server root is probed.
pub fn vite_is_serving(config: &ViteConfig, probe: &dyn ServerProbe) -> bool {
    if !config.dev_mode {
        return false;
    }
    let url = dev_server_root(config);
    let live = probe.is_live(&url);
    tracing::debug!("Dev server at {} live: {}", url, live);
    live
}
