//! Manifest model, loading and lookup.
//!
//! - Entry schema in [`entry`]
//! - Loading, parsing and lookup in [`resolver`]
//! - Health-check reporting in [`diagnostic`]

pub mod diagnostic;
pub mod entry;
pub mod resolver;

pub use diagnostic::{Diagnostic, MANIFEST_WARNING_ID};
pub use entry::ManifestEntry;
pub use resolver::{ManifestResolver, MANIFEST_FETCH_TIMEOUT};
