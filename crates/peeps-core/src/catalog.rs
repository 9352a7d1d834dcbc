//! Asset catalog: the ordered `directory.json` listing of every fragment.

use crate::error::CatalogError;
use crate::id::{CategoryKey, FragmentId};
use crate::store::AssetStore;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Conventional file name of a library's catalog.
pub const CATALOG_FILE: &str = "directory.json";

/// One catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "symbol")]
    pub category: CategoryKey,
    pub id: FragmentId,
    #[serde(rename = "url")]
    pub locator: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Parse a `directory.json` listing.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a `directory.json` file.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Register every record with the store. Nothing is fetched.
    pub fn populate(&self, store: &mut AssetStore) {
        for entry in &self.entries {
            store.register(entry.category, entry.id, entry.locator.clone());
        }
        log::debug!("registered {} catalog entries", self.entries.len());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{AssetLoader, AssetStatus};

    struct NoLoader;

    impl AssetLoader for NoLoader {
        fn load(&self, _: &str) -> Result<String, String> {
            Err("offline".into())
        }
    }

    const DIRECTORY: &str = r#"[
      { "symbol": "a-person", "id": "bust", "url": "assets/peeps/a-person/bust.json" },
      { "symbol": "eye", "id": "round", "url": "assets/peeps/eye/round.json" },
      { "symbol": "eye", "id": "narrow", "url": "assets/peeps/eye/narrow.json" }
    ]"#;

    #[test]
    fn parses_directory_records_in_order() {
        let catalog = Catalog::from_json(DIRECTORY).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.entries[0].category.as_str(), "a-person");
        assert_eq!(catalog.entries[2].id.as_str(), "narrow");
        assert_eq!(catalog.entries[1].locator, "assets/peeps/eye/round.json");
    }

    #[test]
    fn populate_registers_without_fetching() {
        let catalog = Catalog::from_json(DIRECTORY).unwrap();
        let mut store = AssetStore::new(NoLoader);
        catalog.populate(&mut store);

        let eye = CategoryKey::intern("eye");
        assert_eq!(store.ids(eye).len(), 2);
        assert!(matches!(
            store.status(eye, FragmentId::intern("round")),
            Some(AssetStatus::Idle)
        ));
        assert!(store.is_idle());
    }

    #[test]
    fn rejects_non_list_catalog() {
        assert!(matches!(
            Catalog::from_json(r#"{"symbol":"eye"}"#),
            Err(CatalogError::Json(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Catalog::from_path(Path::new("/nonexistent/directory.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/directory.json"));
    }
}
