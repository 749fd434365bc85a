//! Catalog source selection.
//!
//! Precedence: explicit path, then `SKYCLOCK_CATALOG`, then
//! `<config dir>/skyclock/catalog.json` when it exists, then the built-in table.

use crate::location::{Catalog, LocationError};
use std::path::{Path, PathBuf};
use tracing::info;

pub const CATALOG_ENV: &str = "SKYCLOCK_CATALOG";

/// Where the catalog came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Builtin,
}

impl CatalogSource {
    /// Pick a source without touching the process environment.
    pub fn select(explicit: Option<&Path>, env_value: Option<&str>, user_file: Option<PathBuf>) -> Self {
        if let Some(path) = explicit {
            return Self::File(path.to_path_buf());
        }
        if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
            return Self::File(PathBuf::from(value));
        }
        match user_file {
            Some(path) if path.is_file() => Self::File(path),
            _ => Self::Builtin,
        }
    }

    /// Pick a source from a CLI flag, the environment, and the user config dir.
    pub fn detect(explicit: Option<&Path>) -> Self {
        let env_value = std::env::var(CATALOG_ENV).ok();
        Self::select(explicit, env_value.as_deref(), default_catalog_path())
    }

    pub fn load(&self) -> Result<Catalog, LocationError> {
        let catalog = match self {
            Self::File(path) => Catalog::load_from(path)?,
            Self::Builtin => Catalog::builtin(),
        };
        info!(source = %self, entries = catalog.len(), "catalog loaded");
        Ok(catalog)
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Builtin => write!(f, "built-in"),
        }
    }
}

/// `~/.config/skyclock/catalog.json` on Linux, platform equivalents elsewhere.
pub fn default_catalog_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("skyclock").join("catalog.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_path_wins() {
        let src = CatalogSource::select(Some(Path::new("/tmp/a.json")), Some("/tmp/b.json"), None);
        assert_eq!(src, CatalogSource::File(PathBuf::from("/tmp/a.json")));
    }

    #[test]
    fn test_env_before_user_file() {
        let dir = TempDir::new().unwrap();
        let user = dir.path().join("catalog.json");
        fs::write(&user, "[]").unwrap();
        let src = CatalogSource::select(None, Some("/tmp/b.json"), Some(user));
        assert_eq!(src, CatalogSource::File(PathBuf::from("/tmp/b.json")));
    }

    #[test]
    fn test_user_file_only_if_present() {
        let dir = TempDir::new().unwrap();
        let user = dir.path().join("catalog.json");
        assert_eq!(CatalogSource::select(None, None, Some(user.clone())), CatalogSource::Builtin);

        fs::write(&user, "[]").unwrap();
        assert_eq!(CatalogSource::select(None, Some("  "), Some(user.clone())), CatalogSource::File(user));
    }

    #[test]
    fn test_load_builtin() {
        let catalog = CatalogSource::Builtin.load().unwrap();
        assert_eq!(catalog.len(), 15);
    }

    #[test]
    fn test_load_file_errors_propagate() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, "[]").unwrap();
        // An empty list parses but is not a valid catalog.
        let err = CatalogSource::File(path).load().unwrap_err();
        assert!(matches!(err, LocationError::InvalidCatalog(_)));
    }
}
