//! Health-check diagnostics.
//!
//! [`Diagnostic`] is the non-fatal reporting vehicle for manifest problems
//! found by the startup health check, distinct from the per-request
//! [`crate::ViteError`] failures.

/// Stable identifier for the "manifest unreadable or invalid" diagnostic.
pub const MANIFEST_WARNING_ID: &str = "vite.W001";

/// A non-fatal issue found by a health check.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Stable code, e.g. [`MANIFEST_WARNING_ID`].
    pub id: &'static str,
    /// Human-readable description of the failure.
    pub message: String,
    /// Actionable fix suggestion, naming the offending app's manifest path.
    pub hint: String,
}

impl Diagnostic {
    pub fn new(id: &'static str, message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            id,
            message: message.into(),
            hint: hint.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {} ({})", self.id, self.message, self.hint)
    }
}
