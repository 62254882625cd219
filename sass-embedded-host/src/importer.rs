// SPDX-License-Identifier: Apache-2.0

//! `ImportResolver` (design §3): either a filesystem load-path the
//! compiler resolves itself, or a custom importer the host must answer
//! `canonicalize`/`load` callbacks for.

use sass_embedded_common::InputSyntax;
use std::path::PathBuf;

/// A host-implemented stylesheet importer. Both operations may block
/// freely (design §5) and report failure as any error `anyhow` can
/// carry; the driver narrates that into the wire's error-response
/// variant.
pub trait CustomImporter: Send + Sync {
    /// Resolves `url` (as written in an `@use`/`@import`) to an absolute
    /// canonical URL, or `Ok(None)` to mean "not handled by this
    /// importer — try the next one."
    fn canonicalize(&self, url: &str) -> anyhow::Result<Option<String>>;

    /// Loads the contents previously canonicalized by this importer.
    /// Returns the stylesheet text, its syntax, and an optional
    /// source-map URL.
    fn load(&self, canonical_url: &str) -> anyhow::Result<LoadedStylesheet>;
}

/// The result of a successful [`CustomImporter::load`].
pub struct LoadedStylesheet {
    pub contents: String,
    pub syntax: InputSyntax,
    pub source_map_url: Option<String>,
}

/// One slot in the ordered importer list for a compilation (design §3,
/// §4.6): either a filesystem load-path — resolved by the compiler
/// itself, never producing a callback — or a host-implemented
/// [`CustomImporter`].
pub enum ImportResolver {
    LoadPath(PathBuf),
    Custom(std::sync::Arc<dyn CustomImporter>),
}

impl Clone for ImportResolver {
    fn clone(&self) -> Self {
        match self {
            ImportResolver::LoadPath(path) => ImportResolver::LoadPath(path.clone()),
            ImportResolver::Custom(importer) => ImportResolver::Custom(std::sync::Arc::clone(importer)),
        }
    }
}

impl ImportResolver {
    pub fn load_path(path: impl Into<PathBuf>) -> Self {
        ImportResolver::LoadPath(path.into())
    }

    pub fn custom(importer: impl CustomImporter + 'static) -> Self {
        ImportResolver::Custom(std::sync::Arc::new(importer))
    }

    pub fn is_load_path(&self) -> bool {
        matches!(self, ImportResolver::LoadPath(_))
    }
}
