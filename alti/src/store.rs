//! Tile store: lazy resolve, persistent cache and the resident-tile bound.
//!
//! A [`TileStore`] maps tile keys to decoded tiles, fetching on first
//! access: local cache file, then the catalog, then the network. Once a
//! key has resolved — to a tile or to "known absent" — the answer is fixed
//! for the store's lifetime; nothing is refreshed or evicted.
//!
//! A store is scoped to one logical session and is deliberately
//! single-threaded (interior mutability via `RefCell`, so the type is not
//! `Sync`). Callers that want parallelism run one store per worker.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::{NamedTempFile, TempDir};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::download::{self, Fetch};
use crate::error::{AltiError, Result};
use crate::key::TileKey;
use crate::tile::Tile;

/// Lazily resolved cache of decoded tiles.
///
/// `None` entries record that a key has no data (no catalog entry, or a
/// persisted zero-byte marker) so repeated lookups stay off the network.
pub struct TileStore {
    catalog: Catalog,
    fetcher: Box<dyn Fetch>,
    /// Directory holding `<key>.hgt` files; zero-byte files mark confirmed
    /// absence.
    cache_dir: PathBuf,
    /// Per-instance scratch directory, removed on drop. Doubles as the
    /// cache directory when the caller doesn't provide one.
    scratch: TempDir,
    tiles: RefCell<HashMap<TileKey, Option<Arc<Tile>>>>,
    loaded: Cell<usize>,
    capacity: Option<usize>,
}

impl TileStore {
    /// Create a store.
    ///
    /// `cache_dir` must be an existing directory when given; when `None`,
    /// tiles are cached in the scratch directory and discarded with it.
    /// `capacity` bounds the number of decoded tiles resident at once
    /// (`None` = unbounded); exceeding it fails the resolve rather than
    /// evicting.
    pub fn new(
        catalog: Catalog,
        fetcher: Box<dyn Fetch>,
        cache_dir: Option<PathBuf>,
        capacity: Option<usize>,
    ) -> Result<Self> {
        let scratch = TempDir::new()?;
        let cache_dir = match cache_dir {
            Some(dir) => {
                if !dir.is_dir() {
                    return Err(AltiError::Io(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("{} is not a directory", dir.display()),
                    )));
                }
                dir
            }
            None => scratch.path().to_path_buf(),
        };

        Ok(Self {
            catalog,
            fetcher,
            cache_dir,
            scratch,
            tiles: RefCell::new(HashMap::new()),
            loaded: Cell::new(0),
            capacity,
        })
    }

    /// Resolve a key to its tile, or to `None` when the dataset has no
    /// data there.
    ///
    /// The first resolve of a key may hit the disk cache or the network;
    /// every later resolve answers from memory.
    pub fn resolve(&self, key: TileKey) -> Result<Option<Arc<Tile>>> {
        if let Some(slot) = self.tiles.borrow().get(&key) {
            return Ok(slot.clone());
        }

        let slot = self.locate(key)?;
        self.tiles.borrow_mut().insert(key, slot.clone());
        Ok(slot)
    }

    /// Whether the dataset is known to have a tile for this key: a
    /// non-empty cached file, or a catalog entry. Never touches the
    /// network and never decodes.
    ///
    /// A `true` here does not promise an elevation value — the tile may
    /// still hold voids at the queried nodes.
    pub fn is_known(&self, key: TileKey) -> Result<bool> {
        let path = self.tile_path(key);
        if path.exists() {
            return Ok(fs::metadata(&path)?.len() != 0);
        }
        Ok(self.catalog.get(&key).is_some())
    }

    /// Number of decoded tiles currently resident.
    pub fn loaded(&self) -> usize {
        self.loaded.get()
    }

    /// The configured resident-tile bound, if any.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Directory the store caches `.hgt` files in.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn tile_path(&self, key: TileKey) -> PathBuf {
        self.cache_dir.join(key.hgt_name())
    }

    /// First-time resolution: cache file, catalog, then network.
    fn locate(&self, key: TileKey) -> Result<Option<Arc<Tile>>> {
        let path = self.tile_path(key);

        if path.exists() {
            if fs::metadata(&path)?.len() == 0 {
                debug!(key = %key, "cached absence marker");
                return Ok(None);
            }
            self.check_capacity()?;
            return self.admit(&path);
        }

        let Some(entry) = self.catalog.get(&key) else {
            // persist the miss so the next session skips the catalog too
            debug!(key = %key, "no catalog entry, writing absence marker");
            fs::File::create(&path)?;
            return Ok(None);
        };

        self.check_capacity()?;

        let url = self.catalog.url_for(entry);
        info!(key = %key, url = %url, "fetching tile");
        let archive = self.fetcher.fetch(&url)?;
        download::verify_checksum(&archive, &entry.md5, &key.hgt_name())?;
        let content = download::unpack(&archive)?;

        // Stage in a temp file and rename, so a failure part-way never
        // leaves a truncated .hgt at the cache path.
        let mut staged = NamedTempFile::new_in(&self.cache_dir)?;
        staged.write_all(&content)?;
        staged.persist(&path).map_err(|e| AltiError::Io(e.error))?;

        self.admit(&path)
    }

    /// Decode a cached file and count it against the bound.
    fn admit(&self, path: &Path) -> Result<Option<Arc<Tile>>> {
        let tile = Arc::new(Tile::from_file(path)?);
        self.loaded.set(self.loaded.get() + 1);
        Ok(Some(tile))
    }

    fn check_capacity(&self) -> Result<()> {
        if let Some(limit) = self.capacity {
            if self.loaded.get() >= limit {
                return Err(AltiError::CapacityExceeded { limit });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell as StdRefCell;
    use std::io::Cursor;

    use crate::catalog::CatalogEntry;
    use crate::tile::{SAMPLES, TILE_FILE_SIZE};

    /// In-memory fetch backend recording every requested URL.
    struct MockFetch {
        responses: HashMap<String, Vec<u8>>,
        requests: StdRefCell<Vec<String>>,
    }

    impl MockFetch {
        fn new() -> Self {
            Self {
                responses: HashMap::new(),
                requests: StdRefCell::new(Vec::new()),
            }
        }

        fn with_response(mut self, url: &str, bytes: Vec<u8>) -> Self {
            self.responses.insert(url.to_string(), bytes);
            self
        }
    }

    impl Fetch for MockFetch {
        fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            self.requests.borrow_mut().push(url.to_string());
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| AltiError::DownloadFailed {
                    url: url.to_string(),
                    reason: "HTTP 404 Not Found".to_string(),
                })
        }
    }

    /// A fetch backend that must never be called.
    struct NoFetch;

    impl Fetch for NoFetch {
        fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            panic!("unexpected network access: {}", url);
        }
    }

    fn grid_bytes(fill: i16) -> Vec<u8> {
        let mut data = Vec::with_capacity(TILE_FILE_SIZE);
        for _ in 0..SAMPLES * SAMPLES {
            data.extend_from_slice(&fill.to_be_bytes());
        }
        data
    }

    fn zip_single(name: &str, content: &[u8]) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut writer = zip::ZipWriter::new(Cursor::new(&mut buffer));
            let options = zip::write::SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Stored);
            writer.start_file(name, options).unwrap();
            writer.write_all(content).unwrap();
            writer.finish().unwrap();
        }
        buffer
    }

    fn md5_hex(bytes: &[u8]) -> String {
        format!("{:x}", md5::compute(bytes))
    }

    fn paris() -> TileKey {
        TileKey { lat: 48, lon: 2 }
    }

    fn catalog_with(key: TileKey, path: &str, md5: &str) -> Catalog {
        let mut catalog = Catalog::empty();
        catalog.base_url = "http://tiles.test/".to_string();
        catalog.insert(
            key,
            CatalogEntry {
                path: path.to_string(),
                md5: md5.to_string(),
            },
        );
        catalog
    }

    #[test]
    fn test_resolve_fetches_verifies_and_caches() {
        let grid = grid_bytes(120);
        let archive = zip_single("N48E002.hgt", &grid);
        let checksum = md5_hex(&archive);
        let catalog = catalog_with(paris(), "Eurasia/N48E002.hgt.zip", &checksum);
        let fetcher =
            MockFetch::new().with_response("http://tiles.test/Eurasia/N48E002.hgt.zip", archive);

        let cache = TempDir::new().unwrap();
        let store = TileStore::new(
            catalog,
            Box::new(fetcher),
            Some(cache.path().to_path_buf()),
            None,
        )
        .unwrap();

        let tile = store.resolve(paris()).unwrap().expect("tile should load");
        assert_eq!(tile.sample(0.5, 0.5), Some(120.0));
        assert_eq!(store.loaded(), 1);

        // the unpacked .hgt landed in the cache directory, full-length
        let cached = cache.path().join("N48E002.hgt");
        assert_eq!(fs::metadata(&cached).unwrap().len() as usize, TILE_FILE_SIZE);
    }

    #[test]
    fn test_resolve_is_memoized() {
        let grid = grid_bytes(5);
        let archive = zip_single("N48E002.hgt", &grid);
        let checksum = md5_hex(&archive);
        let catalog = catalog_with(paris(), "Eurasia/N48E002.hgt.zip", &checksum);
        let fetcher =
            MockFetch::new().with_response("http://tiles.test/Eurasia/N48E002.hgt.zip", archive);

        let store = TileStore::new(catalog, Box::new(fetcher), None, None).unwrap();

        let first = store.resolve(paris()).unwrap().unwrap();
        let second = store.resolve(paris()).unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.loaded(), 1);
    }

    #[test]
    fn test_uncataloged_key_is_absent_without_network() {
        let store = TileStore::new(Catalog::empty(), Box::new(NoFetch), None, None).unwrap();

        let key = TileKey { lat: 11, lon: 142 }; // Mariana Trench
        assert!(store.resolve(key).unwrap().is_none());

        // the miss is persisted as a zero-byte marker
        let marker = store.cache_dir().join("N11E142.hgt");
        assert!(marker.exists());
        assert_eq!(fs::metadata(&marker).unwrap().len(), 0);

        // and answered from memory afterwards
        assert!(store.resolve(key).unwrap().is_none());
        assert_eq!(store.loaded(), 0);
    }

    #[test]
    fn test_empty_marker_from_prior_session_is_absent() {
        let cache = TempDir::new().unwrap();
        fs::File::create(cache.path().join("N48E002.hgt")).unwrap();

        // catalog knows the tile, but the marker wins: no fetch happens
        let catalog = catalog_with(paris(), "Eurasia/N48E002.hgt.zip", "unused");
        let store = TileStore::new(
            catalog,
            Box::new(NoFetch),
            Some(cache.path().to_path_buf()),
            None,
        )
        .unwrap();

        assert!(store.resolve(paris()).unwrap().is_none());
    }

    #[test]
    fn test_cached_file_decodes_without_network() {
        let cache = TempDir::new().unwrap();
        fs::write(cache.path().join("N48E002.hgt"), grid_bytes(77)).unwrap();

        let store = TileStore::new(
            Catalog::empty(),
            Box::new(NoFetch),
            Some(cache.path().to_path_buf()),
            None,
        )
        .unwrap();

        let tile = store.resolve(paris()).unwrap().unwrap();
        assert_eq!(tile.sample(0.25, 0.25), Some(77.0));
    }

    #[test]
    fn test_checksum_mismatch_fails_and_leaves_no_cache_file() {
        let archive = zip_single("N48E002.hgt", &grid_bytes(1));
        let catalog = catalog_with(paris(), "Eurasia/N48E002.hgt.zip", "00000000000000000000000000000000");
        let fetcher =
            MockFetch::new().with_response("http://tiles.test/Eurasia/N48E002.hgt.zip", archive);

        let cache = TempDir::new().unwrap();
        let store = TileStore::new(
            catalog,
            Box::new(fetcher),
            Some(cache.path().to_path_buf()),
            None,
        )
        .unwrap();

        assert!(matches!(
            store.resolve(paris()),
            Err(AltiError::Checksum { .. })
        ));
        assert!(!cache.path().join("N48E002.hgt").exists());

        // the failure is not memoized as absence; a retry re-attempts
        assert!(store.resolve(paris()).is_err());
    }

    #[test]
    fn test_multi_entry_archive_fails() {
        let mut buffer = Vec::new();
        {
            let mut writer = zip::ZipWriter::new(Cursor::new(&mut buffer));
            let options = zip::write::SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Stored);
            writer.start_file("a.hgt", options).unwrap();
            writer.write_all(b"a").unwrap();
            writer.start_file("b.hgt", options).unwrap();
            writer.write_all(b"b").unwrap();
            writer.finish().unwrap();
        }
        let checksum = md5_hex(&buffer);
        let catalog = catalog_with(paris(), "Eurasia/N48E002.hgt.zip", &checksum);
        let fetcher =
            MockFetch::new().with_response("http://tiles.test/Eurasia/N48E002.hgt.zip", buffer);

        let cache = TempDir::new().unwrap();
        let store = TileStore::new(
            catalog,
            Box::new(fetcher),
            Some(cache.path().to_path_buf()),
            None,
        )
        .unwrap();

        assert!(matches!(
            store.resolve(paris()),
            Err(AltiError::Archive { .. })
        ));
        assert!(!cache.path().join("N48E002.hgt").exists());
    }

    #[test]
    fn test_capacity_bound_fails_without_evicting() {
        let cache = TempDir::new().unwrap();
        fs::write(cache.path().join("N48E002.hgt"), grid_bytes(10)).unwrap();
        fs::write(cache.path().join("N48E003.hgt"), grid_bytes(20)).unwrap();
        fs::write(cache.path().join("N48E004.hgt"), grid_bytes(30)).unwrap();

        let store = TileStore::new(
            Catalog::empty(),
            Box::new(NoFetch),
            Some(cache.path().to_path_buf()),
            Some(2),
        )
        .unwrap();

        let k2 = TileKey { lat: 48, lon: 2 };
        let k3 = TileKey { lat: 48, lon: 3 };
        let k4 = TileKey { lat: 48, lon: 4 };

        assert!(store.resolve(k2).unwrap().is_some());
        assert!(store.resolve(k3).unwrap().is_some());

        match store.resolve(k4) {
            Err(AltiError::CapacityExceeded { limit }) => assert_eq!(limit, 2),
            other => panic!("expected CapacityExceeded, got {:?}", other.map(|_| ())),
        }

        // earlier tiles stay resident and queryable
        assert!(store.resolve(k2).unwrap().is_some());
        assert!(store.resolve(k3).unwrap().is_some());
        assert_eq!(store.loaded(), 2);
    }

    #[test]
    fn test_absent_keys_do_not_count_against_capacity() {
        let store = TileStore::new(Catalog::empty(), Box::new(NoFetch), None, Some(1)).unwrap();

        for lon in 0..5 {
            let key = TileKey { lat: 10, lon };
            assert!(store.resolve(key).unwrap().is_none());
        }
        assert_eq!(store.loaded(), 0);
    }

    #[test]
    fn test_is_known() {
        let cache = TempDir::new().unwrap();
        fs::write(cache.path().join("N48E002.hgt"), grid_bytes(1)).unwrap();
        fs::File::create(cache.path().join("N11E142.hgt")).unwrap();

        let catalog = catalog_with(TileKey { lat: 48, lon: 3 }, "Eurasia/N48E003.hgt.zip", "x");
        let store = TileStore::new(
            catalog,
            Box::new(NoFetch),
            Some(cache.path().to_path_buf()),
            None,
        )
        .unwrap();

        // non-empty cache file
        assert!(store.is_known(TileKey { lat: 48, lon: 2 }).unwrap());
        // zero-byte marker
        assert!(!store.is_known(TileKey { lat: 11, lon: 142 }).unwrap());
        // catalog-only
        assert!(store.is_known(TileKey { lat: 48, lon: 3 }).unwrap());
        // nowhere
        assert!(!store.is_known(TileKey { lat: 0, lon: 0 }).unwrap());
    }

    #[test]
    fn test_scratch_directory_removed_on_drop() {
        let scratch_path;
        {
            let store =
                TileStore::new(Catalog::empty(), Box::new(NoFetch), None, None).unwrap();
            scratch_path = store.scratch.path().to_path_buf();
            assert!(scratch_path.is_dir());
            // leave something behind to prove cleanup is recursive
            let _ = store.resolve(TileKey { lat: 1, lon: 1 }).unwrap();
        }
        assert!(!scratch_path.exists());
    }

    #[test]
    fn test_rejects_missing_cache_dir() {
        let result = TileStore::new(
            Catalog::empty(),
            Box::new(NoFetch),
            Some(PathBuf::from("/nonexistent/alti-cache")),
            None,
        );
        assert!(result.is_err());
    }
}
