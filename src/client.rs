//! Per-application asset client.
//!
//! An [`AppClient`] combines one [`ViteConfig`] with one
//! [`ManifestResolver`] and turns logical asset paths into the tag
//! sequences a page embeds. Every operation decides its URL strategy per
//! call: if dev mode is on and the probe confirms the dev server live,
//! URLs point at the dev server and the manifest is never consulted;
//! otherwise URLs come from the manifest, optionally rewritten by the
//! host's static URL resolver.

use crate::config::{StaticUrlResolver, ViteConfig};
use crate::error::{Result, ViteError};
use crate::manifest::{Diagnostic, ManifestResolver};
use crate::probe::{vite_is_serving, ServerProbe};
use crate::tag::{self, Attrs, Tag};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Asset and URL generation for one named Vite application.
pub struct AppClient {
    config: ViteConfig,
    app_name: String,
    manifest: ManifestResolver,
    probe: Arc<dyn ServerProbe>,
    static_url_resolver: Option<StaticUrlResolver>,
}

impl AppClient {
    /// Build a client. The probe is consulted once here to decide whether
    /// manifest parsing can be skipped (dev serving), and again on every
    /// tag-generation call.
    pub fn new(
        config: ViteConfig,
        app_name: impl Into<String>,
        static_root: Option<PathBuf>,
        static_url_resolver: Option<StaticUrlResolver>,
        probe: Arc<dyn ServerProbe>,
    ) -> Self {
        let app_name = app_name.into();
        let skip_parse = vite_is_serving(&config, probe.as_ref());
        let manifest = ManifestResolver::new(&config, &app_name, static_root.as_deref(), skip_parse);
        Self {
            config,
            app_name,
            manifest,
            probe,
            static_url_resolver,
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Health check for this app's manifest.
    pub fn check(&self) -> Vec<Diagnostic> {
        self.manifest.check()
    }

    /// Effective mode for this request. Never cached.
    fn is_serving(&self) -> bool {
        vite_is_serving(&self.config, self.probe.as_ref())
    }

    /// URL of an asset served live by the dev server. An absolute
    /// `static_url_prefix` replaces the dev-server origin entirely, which
    /// lets a reverse proxy front the dev server; a path with a leading
    /// slash supersedes the prefix.
    fn dev_server_url(&self, path: &str) -> String {
        let mut prefix = self.config.static_url_prefix.clone();
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        let joined = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("{prefix}{path}")
        };
        if joined.starts_with("http://") || joined.starts_with("https://") {
            joined
        } else {
            format!(
                "{}://{}:{}/{}",
                self.config.dev_server_protocol,
                self.config.dev_server_host,
                self.config.dev_server_port,
                joined.trim_start_matches('/')
            )
        }
    }

    /// URL of a compiled asset in production: the prefixed output path,
    /// rewritten by the host's static URL resolver when one is installed.
    fn production_url(&self, file: &str) -> String {
        let prefixed = if self.config.static_url_prefix.is_empty() {
            file.to_string()
        } else {
            let mut prefix = self.config.static_url_prefix.clone();
            if !prefix.ends_with('/') {
                prefix.push('/');
            }
            format!("{prefix}{file}")
        };
        match &self.static_url_resolver {
            Some(resolve) => resolve(&prefixed),
            None => prefixed,
        }
    }

    /// Script tag for a JS/TS asset, preceded by stylesheet tags for its
    /// transitive CSS dependencies and followed by modulepreload tags for
    /// its direct static imports. In dev mode a single module script tag;
    /// Vite loads everything else itself.
    pub fn generate_asset(&self, path: &str, attrs: &Attrs) -> Result<String> {
        if self.is_serving() {
            let url = self.dev_server_url(path);
            let script_attrs = Attrs::new().with("type", "module").merge(attrs);
            return Ok(tag::script(&url, &script_attrs));
        }

        let entry = self.manifest.get(path)?;
        let mut tags = self.collect_css_tags(path, tag::stylesheet)?;

        let script_attrs = Attrs::new()
            .with("type", "module")
            .with("crossorigin", "")
            .merge(attrs);
        tags.push(tag::script(&self.production_url(&entry.file), &script_attrs));

        let preload_attrs = module_preload_attrs();
        for dep in &entry.imports {
            let dep_entry = self.manifest.get(dep)?;
            tags.push(tag::preload(
                &self.production_url(&dep_entry.file),
                &preload_attrs,
            ));
        }

        Ok(tags.join("\n"))
    }

    /// Preload hints for a JS/TS asset: a modulepreload for the asset, CSS
    /// preload tags for its transitive stylesheets, and a modulepreload per
    /// direct import. Empty in dev mode, where nothing is compiled yet.
    pub fn preload_asset(&self, path: &str) -> Result<String> {
        if self.is_serving() {
            return Ok(String::new());
        }

        let entry = self.manifest.get(path)?;
        let preload_attrs = module_preload_attrs();

        let mut tags = vec![tag::preload(
            &self.production_url(&entry.file),
            &preload_attrs,
        )];
        tags.extend(self.collect_css_tags(path, tag::stylesheet_preload)?);
        for dep in &entry.imports {
            let dep_entry = self.manifest.get(dep)?;
            tags.push(tag::preload(
                &self.production_url(&dep_entry.file),
                &preload_attrs,
            ));
        }

        Ok(tags.join("\n"))
    }

    /// URL of a single asset, without any dependency tags.
    pub fn generate_asset_url(&self, path: &str) -> Result<String> {
        if self.is_serving() {
            return Ok(self.dev_server_url(path));
        }
        let entry = self.manifest.get(path)?;
        Ok(self.production_url(&entry.file))
    }

    /// Script tag for the `@vitejs/plugin-legacy` polyfills bundle. Empty
    /// in dev mode; `AssetNotFound` when the motif matched no manifest key.
    pub fn generate_legacy_polyfills(&self, attrs: &Attrs) -> Result<String> {
        if self.is_serving() {
            return Ok(String::new());
        }

        let entry =
            self.manifest
                .legacy_polyfills_entry()
                .ok_or_else(|| ViteError::AssetNotFound {
                    path: self.config.legacy_polyfills_motif.clone(),
                    app: self.app_name.clone(),
                    manifest_path: self.manifest.manifest_path().to_string(),
                })?;
        let script_attrs = legacy_script_attrs().merge(attrs);
        Ok(tag::script(&self.production_url(&entry.file), &script_attrs))
    }

    /// Script tag for a `@vitejs/plugin-legacy` asset (nomodule). Empty in
    /// dev mode.
    pub fn generate_legacy_asset(&self, path: &str, attrs: &Attrs) -> Result<String> {
        if self.is_serving() {
            return Ok(String::new());
        }

        let entry = self.manifest.get(path)?;
        let script_attrs = legacy_script_attrs().merge(attrs);
        Ok(tag::script(&self.production_url(&entry.file), &script_attrs))
    }

    /// Script tag bootstrapping the dev server's HMR client. Empty outside
    /// dev mode.
    pub fn generate_ws_client(&self, attrs: &Attrs) -> Result<String> {
        if !self.is_serving() {
            return Ok(String::new());
        }

        let url = self.dev_server_url(&self.config.ws_client_url);
        let script_attrs = Attrs::new().with("type", "module").merge(attrs);
        Ok(tag::script(&url, &script_attrs))
    }

    /// Inline script installing the React refresh preamble for
    /// `@vitejs/plugin-react`. Empty outside dev mode.
    pub fn generate_react_refresh(&self, attrs: &Attrs) -> Result<String> {
        if !self.is_serving() {
            return Ok(String::new());
        }

        let url = self.dev_server_url(&self.config.react_refresh_url);
        let mut open = String::from("<script type=\"module\"");
        if !attrs.is_empty() {
            open.push(' ');
            open.push_str(&attrs.to_html());
        }
        open.push('>');
        Ok(format!(
            "{open}\n    import RefreshRuntime from '{url}'\n    \
             RefreshRuntime.injectIntoGlobalHook(window)\n    \
             window.$RefreshReg$ = () => {{}}\n    \
             window.$RefreshSig$ = () => (type) => type\n    \
             window.__vite_plugin_react_preamble_installed__ = true\n</script>"
        ))
    }

    /// Transitive CSS tags for an asset: depth-first over `imports` edges
    /// in declaration order, each stylesheet emitted once at its first
    /// encounter. The visiting stack fails fast on import cycles, which
    /// the manifest format does not rule out.
    fn collect_css_tags(&self, path: &str, build: fn(&str) -> Tag) -> Result<Vec<Tag>> {
        let mut tags = Vec::new();
        let mut seen_css = HashSet::new();
        let mut visiting = Vec::new();
        self.walk_css(path, build, &mut tags, &mut seen_css, &mut visiting)?;
        Ok(tags)
    }

    fn walk_css(
        &self,
        path: &str,
        build: fn(&str) -> Tag,
        tags: &mut Vec<Tag>,
        seen_css: &mut HashSet<String>,
        visiting: &mut Vec<String>,
    ) -> Result<()> {
        if visiting.iter().any(|p| p == path) {
            return Err(ViteError::CircularImports {
                path: path.to_string(),
                cycle: format!("{} -> {}", visiting.join(" -> "), path),
            });
        }

        let entry = self.manifest.get(path)?;
        visiting.push(path.to_string());
        for import in &entry.imports {
            self.walk_css(import, build, tags, seen_css, visiting)?;
        }
        visiting.pop();

        for css in &entry.css {
            if seen_css.insert(css.clone()) {
                tags.push(build(&self.production_url(css)));
            }
        }
        Ok(())
    }
}

fn module_preload_attrs() -> Attrs {
    Attrs::new()
        .with("type", "text/javascript")
        .with("crossorigin", "anonymous")
        .with("rel", "modulepreload")
        .with("as", "script")
}

fn legacy_script_attrs() -> Attrs {
    Attrs::new().with("nomodule", "").with("crossorigin", "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::StaticProbe;
    use std::fs;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"{
        "main.js": {"file": "main.abc123.js", "imports": ["lib.js"], "css": ["main.css"]},
        "lib.js": {"file": "lib.def456.js", "css": ["lib.css"]}
    }"#;

    struct Fixture {
        _temp: TempDir,
        probe: Arc<StaticProbe>,
        client: AppClient,
    }

    fn fixture(manifest: &str, config: ViteConfig, live: bool) -> Fixture {
        fixture_with(manifest, config, live, None)
    }

    fn fixture_with(
        manifest: &str,
        mut config: ViteConfig,
        live: bool,
        resolver: Option<StaticUrlResolver>,
    ) -> Fixture {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("manifest.json");
        fs::write(&path, manifest).unwrap();
        config.manifest_path = Some(path.to_string_lossy().into_owned());
        let probe = Arc::new(StaticProbe::new(live));
        let client = AppClient::new(config, "default", None, resolver, probe.clone());
        Fixture {
            _temp: temp,
            probe,
            client,
        }
    }

    #[test]
    fn generate_asset_orders_css_script_then_preloads() {
        let f = fixture(MANIFEST, ViteConfig::default(), false);
        let html = f.client.generate_asset("main.js", &Attrs::new()).unwrap();
        let expected = "<link rel=\"stylesheet\" href=\"lib.css\" />\n\
            <link rel=\"stylesheet\" href=\"main.css\" />\n\
            <script type=\"module\" crossorigin src=\"main.abc123.js\"></script>\n\
            <link href=\"lib.def456.js\" type=\"text/javascript\" crossorigin=\"anonymous\" rel=\"modulepreload\" as=\"script\" />";
        assert_eq!(html, expected);
    }

    #[test]
    fn generate_asset_applies_static_url_prefix() {
        let config = ViteConfig {
            static_url_prefix: "bundled".into(),
            ..Default::default()
        };
        let f = fixture(MANIFEST, config, false);
        let html = f.client.generate_asset("main.js", &Attrs::new()).unwrap();
        assert!(html.contains("src=\"bundled/main.abc123.js\""));
        assert!(html.contains("href=\"bundled/lib.css\""));
    }

    #[test]
    fn static_url_resolver_rewrites_production_urls() {
        let resolver: StaticUrlResolver = Arc::new(|path| format!("https://cdn.example.com/{path}"));
        let f = fixture_with(MANIFEST, ViteConfig::default(), false, Some(resolver));
        let url = f.client.generate_asset_url("main.js").unwrap();
        assert_eq!(url, "https://cdn.example.com/main.abc123.js");
    }

    #[test]
    fn caller_attrs_override_defaults() {
        let f = fixture(MANIFEST, ViteConfig::default(), false);
        let attrs = Attrs::new().with("type", "text/custom").with("defer", "");
        let html = f.client.generate_asset("lib.js", &attrs).unwrap();
        assert!(html.contains("<script type=\"text/custom\" crossorigin defer src="));
    }

    #[test]
    fn shared_css_is_emitted_once_at_first_encounter() {
        let manifest = r#"{
            "app.js": {"file": "app.js", "imports": ["a.js", "b.js"]},
            "a.js": {"file": "a.js", "imports": ["shared.js"], "css": ["a.css"]},
            "b.js": {"file": "b.js", "imports": ["shared.js"], "css": ["b.css"]},
            "shared.js": {"file": "shared.js", "css": ["shared.css"]}
        }"#;
        let f = fixture(manifest, ViteConfig::default(), false);
        let html = f.client.generate_asset("app.js", &Attrs::new()).unwrap();
        let css_positions: Vec<_> = ["shared.css", "a.css", "b.css"]
            .iter()
            .map(|css| html.find(css).unwrap())
            .collect();
        // Depth-first order: shared.css reached through a.js comes first
        assert!(css_positions[0] < css_positions[1]);
        assert!(css_positions[1] < css_positions[2]);
        assert_eq!(html.matches("shared.css").count(), 1);
    }

    #[test]
    fn css_walk_is_idempotent() {
        let f = fixture(MANIFEST, ViteConfig::default(), false);
        let first = f.client.generate_asset("main.js", &Attrs::new()).unwrap();
        let second = f.client.generate_asset("main.js", &Attrs::new()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn import_cycle_fails_fast() {
        let manifest = r#"{
            "a.js": {"file": "a.js", "imports": ["b.js"]},
            "b.js": {"file": "b.js", "imports": ["a.js"]}
        }"#;
        let f = fixture(manifest, ViteConfig::default(), false);
        let err = f.client.generate_asset("a.js", &Attrs::new()).unwrap_err();
        match err {
            ViteError::CircularImports { path, cycle } => {
                assert_eq!(path, "a.js");
                assert_eq!(cycle, "a.js -> b.js -> a.js");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn diamond_imports_are_not_a_cycle() {
        let manifest = r#"{
            "app.js": {"file": "app.js", "imports": ["a.js", "b.js"]},
            "a.js": {"file": "a.js", "imports": ["leaf.js"]},
            "b.js": {"file": "b.js", "imports": ["leaf.js"]},
            "leaf.js": {"file": "leaf.js", "css": ["leaf.css"]}
        }"#;
        let f = fixture(manifest, ViteConfig::default(), false);
        assert!(f.client.generate_asset("app.js", &Attrs::new()).is_ok());
    }

    #[test]
    fn missing_import_is_asset_not_found() {
        let manifest = r#"{"main.js": {"file": "main.js", "imports": ["ghost.js"]}}"#;
        let f = fixture(manifest, ViteConfig::default(), false);
        let err = f.client.generate_asset("main.js", &Attrs::new()).unwrap_err();
        assert!(matches!(err, ViteError::AssetNotFound { path, .. } if path == "ghost.js"));
    }

    #[test]
    fn preload_asset_orders_entry_css_then_imports() {
        let f = fixture(MANIFEST, ViteConfig::default(), false);
        let html = f.client.preload_asset("main.js").unwrap();
        let expected = "<link href=\"main.abc123.js\" type=\"text/javascript\" crossorigin=\"anonymous\" rel=\"modulepreload\" as=\"script\" />\n\
            <link rel=\"preload\" href=\"lib.css\" as=\"style\" />\n\
            <link rel=\"preload\" href=\"main.css\" as=\"style\" />\n\
            <link href=\"lib.def456.js\" type=\"text/javascript\" crossorigin=\"anonymous\" rel=\"modulepreload\" as=\"script\" />";
        assert_eq!(html, expected);
    }

    fn dev_config() -> ViteConfig {
        ViteConfig {
            dev_mode: true,
            ..Default::default()
        }
    }

    #[test]
    fn dev_mode_emits_single_dev_server_script() {
        // Manifest is malformed on purpose: dev serving must never touch it
        let f = fixture("garbage", dev_config(), true);
        let html = f.client.generate_asset("src/main.ts", &Attrs::new()).unwrap();
        assert_eq!(
            html,
            "<script type=\"module\" src=\"http://localhost:5173/src/main.ts\"></script>"
        );
    }

    #[test]
    fn dev_mode_production_only_operations_render_empty() {
        let f = fixture("garbage", dev_config(), true);
        assert_eq!(f.client.preload_asset("src/main.ts").unwrap(), "");
        assert_eq!(
            f.client
                .generate_legacy_asset("src/main-legacy.ts", &Attrs::new())
                .unwrap(),
            ""
        );
        assert_eq!(
            f.client.generate_legacy_polyfills(&Attrs::new()).unwrap(),
            ""
        );
    }

    #[test]
    fn dev_server_url_joins_relative_prefix() {
        let config = ViteConfig {
            dev_mode: true,
            static_url_prefix: "app".into(),
            ..Default::default()
        };
        let f = fixture("{}", config, true);
        let url = f.client.generate_asset_url("src/main.ts").unwrap();
        assert_eq!(url, "http://localhost:5173/app/src/main.ts");
    }

    #[test]
    fn leading_slash_path_supersedes_the_prefix() {
        let config = ViteConfig {
            dev_mode: true,
            static_url_prefix: "app".into(),
            ..Default::default()
        };
        let f = fixture("{}", config, true);
        let url = f.client.generate_asset_url("/src/main.ts").unwrap();
        assert_eq!(url, "http://localhost:5173/src/main.ts");
    }

    #[test]
    fn absolute_prefix_replaces_dev_server_origin() {
        let config = ViteConfig {
            dev_mode: true,
            static_url_prefix: "http://assets.local:9000/vite".into(),
            ..Default::default()
        };
        let f = fixture("{}", config, true);
        let url = f.client.generate_asset_url("src/main.ts").unwrap();
        assert_eq!(url, "http://assets.local:9000/vite/src/main.ts");
    }

    #[test]
    fn mode_switch_is_observed_on_the_next_call() {
        let f = fixture(MANIFEST, dev_config(), false);
        // Probe reported down at construction, so the manifest was parsed
        let prod = f.client.generate_asset_url("main.js").unwrap();
        assert_eq!(prod, "main.abc123.js");

        f.probe.set_live(true);
        let dev = f.client.generate_asset_url("main.js").unwrap();
        assert_eq!(dev, "http://localhost:5173/main.js");

        f.probe.set_live(false);
        assert_eq!(f.client.generate_asset_url("main.js").unwrap(), prod);
    }

    #[test]
    fn legacy_polyfills_tag_uses_nomodule() {
        let manifest = r#"{
            "vite/legacy-polyfills": {"file": "assets/polyfills.1234.js"},
            "main.js": {"file": "main.js"}
        }"#;
        let f = fixture(manifest, ViteConfig::default(), false);
        let html = f.client.generate_legacy_polyfills(&Attrs::new()).unwrap();
        assert_eq!(
            html,
            "<script nomodule crossorigin src=\"assets/polyfills.1234.js\"></script>"
        );
    }

    #[test]
    fn absent_polyfills_entry_is_asset_not_found() {
        let f = fixture(MANIFEST, ViteConfig::default(), false);
        let err = f
            .client
            .generate_legacy_polyfills(&Attrs::new())
            .unwrap_err();
        assert!(
            matches!(err, ViteError::AssetNotFound { path, .. } if path == "legacy-polyfills")
        );
    }

    #[test]
    fn legacy_asset_tag_uses_nomodule() {
        let manifest = r#"{"main-legacy.js": {"file": "assets/main-legacy.1234.js"}}"#;
        let f = fixture(manifest, ViteConfig::default(), false);
        let html = f
            .client
            .generate_legacy_asset("main-legacy.js", &Attrs::new())
            .unwrap();
        assert_eq!(
            html,
            "<script nomodule crossorigin src=\"assets/main-legacy.1234.js\"></script>"
        );
    }

    #[test]
    fn ws_client_only_in_dev_mode() {
        let f = fixture("{}", dev_config(), true);
        let html = f.client.generate_ws_client(&Attrs::new()).unwrap();
        assert_eq!(
            html,
            "<script type=\"module\" src=\"http://localhost:5173/@vite/client\"></script>"
        );

        f.probe.set_live(false);
        assert_eq!(f.client.generate_ws_client(&Attrs::new()).unwrap(), "");
    }

    #[test]
    fn react_refresh_preamble_imports_from_dev_server() {
        let f = fixture("{}", dev_config(), true);
        let html = f.client.generate_react_refresh(&Attrs::new()).unwrap();
        assert!(html.starts_with("<script type=\"module\">"));
        assert!(html.contains("import RefreshRuntime from 'http://localhost:5173/@react-refresh'"));
        assert!(html.contains("window.__vite_plugin_react_preamble_installed__ = true"));
        assert!(html.ends_with("</script>"));

        f.probe.set_live(false);
        assert_eq!(f.client.generate_react_refresh(&Attrs::new()).unwrap(), "");
    }

    #[test]
    fn react_refresh_carries_extra_attrs() {
        let f = fixture("{}", dev_config(), true);
        let attrs = Attrs::new().with("nonce", "abc");
        let html = f.client.generate_react_refresh(&attrs).unwrap();
        assert!(html.starts_with("<script type=\"module\" nonce=\"abc\">"));
    }
}
