//! Typed model for one manifest record.

use serde::Deserialize;

/// One record of the Vite `manifest.json`: a compiled asset plus its
/// dependency edges.
///
/// Fields beyond this schema are ignored on purpose — newer Vite versions
/// add keys this crate has no use for, and a manifest carrying them must
/// still parse.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManifestEntry {
    /// Resolved output path of the compiled asset. The only required field.
    pub file: String,

    /// Original source path.
    #[serde(default)]
    pub src: Option<String>,

    /// Whether this record is a configured entry point.
    #[serde(default, rename = "isEntry")]
    pub is_entry: bool,

    /// Whether this record is a dynamic entry point.
    #[serde(default, rename = "isDynamicEntry")]
    pub is_dynamic_entry: bool,

    /// Stylesheets this asset pulls in, in emit order.
    #[serde(default)]
    pub css: Vec<String>,

    /// Logical paths of static imports; each must itself be a manifest key.
    #[serde(default)]
    pub imports: Vec<String>,

    /// Logical paths of dynamic imports.
    #[serde(default, rename = "dynamicImports")]
    pub dynamic_imports: Vec<String>,
}
