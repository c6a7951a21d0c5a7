//! Pure HTML tag building.
//!
//! A [`Tag`] is a plain string carrying one fully formed HTML element;
//! equality on the text is the deduplication key for stylesheet tags within
//! one render. [`Attrs`] is the typed attribute map every tag-producing
//! operation accepts: defaults are inserted first, caller overrides are
//! merged over them, and a caller value wins on key collision while keeping
//! the default's position. Attribute values are not HTML-escaped here;
//! escaping is the host template layer's concern.

/// One fully formed HTML element.
pub type Tag = String;

/// Insertion-ordered attribute map with replace-in-place semantics.
///
/// An empty value renders as a bare attribute (`crossorigin`, `nomodule`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs {
    entries: Vec<(String, String)>,
}

impl Attrs {
    /// Create an empty attribute map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute. Replaces an existing attribute of the same name in
    /// place, preserving its position; otherwise appends.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Merge `overrides` over `self`: every override is applied via
    /// [`set`](Self::set), so overrides win on collision and defaults keep
    /// their position.
    pub fn merge(mut self, overrides: &Attrs) -> Self {
        for (name, value) in &overrides.entries {
            self.set(name.clone(), value.clone());
        }
        self
    }

    /// Look up an attribute value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as a space-separated attribute list, empty values bare.
    pub fn to_html(&self) -> String {
        self.entries
            .iter()
            .map(|(name, value)| {
                if value.is_empty() {
                    name.clone()
                } else {
                    format!("{name}=\"{value}\"")
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// `<script>` tag loading `url`.
pub fn script(url: &str, attrs: &Attrs) -> Tag {
    if attrs.is_empty() {
        format!("<script src=\"{url}\"></script>")
    } else {
        format!("<script {} src=\"{url}\"></script>", attrs.to_html())
    }
}

/// `<link>` preload hint for `url`; the relation (`modulepreload`,
/// `preload`) comes from `attrs`.
pub fn preload(url: &str, attrs: &Attrs) -> Tag {
    if attrs.is_empty() {
        format!("<link href=\"{url}\" />")
    } else {
        format!("<link href=\"{url}\" {} />", attrs.to_html())
    }
}

/// `<link rel="stylesheet">` tag for `href`.
pub fn stylesheet(href: &str) -> Tag {
    format!("<link rel=\"stylesheet\" href=\"{href}\" />")
}

/// `<link rel="preload" as="style">` hint for `href`.
pub fn stylesheet_preload(href: &str) -> Tag {
    format!("<link rel=\"preload\" href=\"{href}\" as=\"style\" />")
}
