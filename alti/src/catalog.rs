//! The remote tile catalog.
//!
//! The catalog maps tile keys to the archive that holds them on the remote
//! server, together with the md5 checksum of that archive. It is loaded
//! once (from a JSON file or built programmatically) and read-only
//! afterwards; a key missing from the catalog means the dataset has no
//! tile for that cell — open ocean, or outside SRTM coverage.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::key::TileKey;

/// Default archive root, the USGS SRTM3 v2.1 layout.
pub const DEFAULT_BASE_URL: &str = "http://dds.cr.usgs.gov/srtm/version2_1/SRTM3/";

/// One downloadable tile archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Path of the archive relative to the catalog base URL,
    /// e.g. `Eurasia/N48E002.hgt.zip`.
    pub path: String,
    /// md5sum of the archive file, lowercase hex.
    pub md5: String,
}

/// Mapping from tile keys to remote archives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// URL prefix every entry path is joined onto.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Entries keyed by tile name, e.g. `"N48E002"`.
    #[serde(default)]
    pub tiles: BTreeMap<String, CatalogEntry>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            tiles: BTreeMap::new(),
        }
    }
}

impl Catalog {
    /// An empty catalog with the default base URL. Every lookup misses, so
    /// a store built on it only ever serves tiles already present in its
    /// cache directory.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read a catalog from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let catalog = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(catalog)
    }

    /// Add or replace the entry for a key.
    pub fn insert(&mut self, key: TileKey, entry: CatalogEntry) {
        self.tiles.insert(key.to_string(), entry);
    }

    /// Entry for a key, if the dataset has a tile there.
    pub fn get(&self, key: &TileKey) -> Option<&CatalogEntry> {
        self.tiles.get(&key.to_string())
    }

    /// Full download URL for an entry.
    pub fn url_for(&self, entry: &CatalogEntry) -> String {
        format!("{}{}", self.base_url, entry.path)
    }

    /// Number of cataloged tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the catalog has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn paris_key() -> TileKey {
        TileKey { lat: 48, lon: 2 }
    }

    #[test]
    fn test_insert_and_get() {
        let mut catalog = Catalog::empty();
        assert!(catalog.is_empty());
        assert!(catalog.get(&paris_key()).is_none());

        catalog.insert(
            paris_key(),
            CatalogEntry {
                path: "Eurasia/N48E002.hgt.zip".to_string(),
                md5: "d41d8cd98f00b204e9800998ecf8427e".to_string(),
            },
        );
        assert_eq!(catalog.len(), 1);

        let entry = catalog.get(&paris_key()).unwrap();
        assert_eq!(
            catalog.url_for(entry),
            "http://dds.cr.usgs.gov/srtm/version2_1/SRTM3/Eurasia/N48E002.hgt.zip"
        );
    }

    #[test]
    fn test_load_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "base_url": "https://tiles.example.org/srtm3/",
                "tiles": {{
                    "N48E002": {{ "path": "Eurasia/N48E002.hgt.zip", "md5": "abc123" }},
                    "S34E151": {{ "path": "Australia/S34E151.hgt.zip", "md5": "def456" }}
                }}
            }}"#
        )
        .unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        let entry = catalog.get(&TileKey { lat: -34, lon: 151 }).unwrap();
        assert_eq!(entry.md5, "def456");
        assert_eq!(
            catalog.url_for(entry),
            "https://tiles.example.org/srtm3/Australia/S34E151.hgt.zip"
        );
    }

    #[test]
    fn test_load_defaults_base_url() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "tiles": {{}} }}"#).unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(Catalog::load(file.path()).is_err());
    }
}
