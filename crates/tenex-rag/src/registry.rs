//! Registry of open tenant indexes
//!
//! The registry is the sole owner of TenantStore handles: no component
//! outside it may open a tenant's storage directly. It is an explicitly
//! owned, constructor-injected object; the command loop holds the single
//! mutable reference for the life of the process.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::retrieval::TenantStore;

/// In-memory mapping of tenant identifier to its open vector index
pub struct IndexRegistry {
    storage_root: PathBuf,
    dimensions: usize,
    open: HashMap<String, TenantStore>,
}

impl IndexRegistry {
    /// Create a registry over a storage root
    pub fn new(storage_root: PathBuf, dimensions: usize) -> Self {
        Self {
            storage_root,
            dimensions,
            open: HashMap::new(),
        }
    }

    /// Return the resident handle for a tenant, opening or creating the
    /// index on first use. Subsequent calls return the same handle; entries
    /// stay resident for the lifetime of the process.
    pub fn resolve(&mut self, tenant: &str) -> Result<&TenantStore> {
        match self.open.entry(tenant.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                tracing::debug!(tenant, "opening tenant index");
                let store = TenantStore::open_or_create(&self.storage_root, tenant, self.dimensions)?;
                Ok(entry.insert(store))
            }
        }
    }

    /// Check whether a tenant has a resident handle or a persisted index
    /// without opening anything
    pub fn is_known(&self, tenant: &str) -> bool {
        self.open.contains_key(tenant)
            || TenantStore::index_path(&self.storage_root, tenant).exists()
    }

    /// Number of resident handles
    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    /// Discover tenants by scanning the corpus root for subdirectories.
    ///
    /// Sorted for deterministic processing order. An unreadable corpus root
    /// is a configuration error and fatal for ingestion.
    pub fn list_known_tenants(&self, corpus_root: &Path) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(corpus_root).map_err(|e| {
            Error::config(format!(
                "corpus root {} is unreadable: {e}",
                corpus_root.display()
            ))
        })?;

        let mut tenants = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                Error::config(format!(
                    "corpus root {} is unreadable: {e}",
                    corpus_root.display()
                ))
            })?;
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                tenants.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        tenants.sort();
        Ok(tenants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_keeps_one_handle_per_tenant() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = IndexRegistry::new(dir.path().to_path_buf(), 2);

        registry.resolve("acme").unwrap();
        registry.resolve("acme").unwrap();
        registry.resolve("globex").unwrap();

        assert_eq!(registry.open_count(), 2);
    }

    #[test]
    fn test_is_known_sees_persisted_indexes() {
        let dir = tempfile::tempdir().unwrap();

        {
            let mut registry = IndexRegistry::new(dir.path().to_path_buf(), 2);
            registry.resolve("acme").unwrap();
        }

        // Fresh registry, nothing resident, but the index file persists
        let registry = IndexRegistry::new(dir.path().to_path_buf(), 2);
        assert!(registry.is_known("acme"));
        assert!(!registry.is_known("globex"));
    }

    #[test]
    fn test_list_known_tenants_sorted() {
        let corpus = tempfile::tempdir().unwrap();
        std::fs::create_dir(corpus.path().join("globex")).unwrap();
        std::fs::create_dir(corpus.path().join("acme")).unwrap();
        std::fs::write(corpus.path().join("stray.txt"), "not a tenant").unwrap();

        let storage = tempfile::tempdir().unwrap();
        let registry = IndexRegistry::new(storage.path().to_path_buf(), 2);
        let tenants = registry.list_known_tenants(corpus.path()).unwrap();
        assert_eq!(tenants, vec!["acme".to_string(), "globex".to_string()]);
    }

    #[test]
    fn test_missing_corpus_root_is_config_error() {
        let storage = tempfile::tempdir().unwrap();
        let registry = IndexRegistry::new(storage.path().to_path_buf(), 2);
        let result = registry.list_known_tenants(Path::new("/nonexistent/corpus"));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
