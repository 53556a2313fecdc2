//! Elevation data sources.
//!
//! [`DataSource`] is the contract consumers program against; [`SrtmTiles`]
//! is the implementation backed by locally cached SRTM3 tiles. Alternate
//! backends (a remote elevation database, say) implement the same trait
//! and swap in behind it.

use std::path::PathBuf;

use crate::catalog::Catalog;
use crate::download::Fetch;
use crate::error::{AltiError, Result};
use crate::geodesy::Coord;
use crate::key::TileKey;
use crate::store::TileStore;

/// SRTM3 grid spacing in meters.
const SRTM3_PRECISION: f64 = 90.0;

/// A queryable source of ground elevation.
pub trait DataSource {
    /// Elevation at a coordinate in meters, or `None` where the source has
    /// no data. Out-of-range coordinates are a caller error
    /// ([`AltiError::OutOfBounds`]), distinct from absence.
    fn altitude(&self, coord: Coord) -> Result<Option<f64>>;

    /// Whether the source has any record for the cell containing `coord`.
    ///
    /// `true` is necessary but not sufficient for [`Self::altitude`] to
    /// return a value: a covered tile can still hold voids around the
    /// queried point. `false` does guarantee `altitude` returns `None`.
    fn is_covered(&self, coord: Coord) -> Result<bool>;

    /// Native resolution of the source in meters.
    fn precision(&self) -> f64;
}

fn check_range(coord: Coord) -> Result<()> {
    if !(-180.0..=180.0).contains(&coord.lon) || !(-90.0..=90.0).contains(&coord.lat) {
        return Err(AltiError::OutOfBounds {
            lon: coord.lon,
            lat: coord.lat,
        });
    }
    Ok(())
}

/// Elevation source backed by SRTM3 tiles, fetched on demand and cached.
///
/// # Example
///
/// ```no_run
/// use alti::{Coord, DataSource, SrtmTiles};
///
/// let source = SrtmTiles::builder()
///     .catalog_path("srtm-catalog.json")
///     .cache_dir("/var/cache/alti")
///     .build()?;
///
/// match source.altitude(Coord::new(2.343, 48.8861))? {
///     Some(meters) => println!("Montmartre: {:.1} m", meters),
///     None => println!("no data"),
/// }
/// # Ok::<(), alti::AltiError>(())
/// ```
pub struct SrtmTiles {
    store: TileStore,
}

impl SrtmTiles {
    /// Start building a source.
    pub fn builder() -> SrtmTilesBuilder {
        SrtmTilesBuilder::new()
    }

    /// The underlying tile store.
    pub fn store(&self) -> &TileStore {
        &self.store
    }
}

impl DataSource for SrtmTiles {
    fn altitude(&self, coord: Coord) -> Result<Option<f64>> {
        check_range(coord)?;

        let key = TileKey::for_coord(coord);
        let Some(tile) = self.store.resolve(key)? else {
            return Ok(None);
        };

        let dx = coord.lon - coord.lon.floor();
        let dy = (coord.lat + 1.0).floor() - coord.lat;
        Ok(tile.sample(dx, dy))
    }

    fn is_covered(&self, coord: Coord) -> Result<bool> {
        check_range(coord)?;
        self.store.is_known(TileKey::for_coord(coord))
    }

    fn precision(&self) -> f64 {
        SRTM3_PRECISION
    }
}

/// Builder for [`SrtmTiles`].
///
/// # Example
///
/// ```no_run
/// use alti::SrtmTiles;
///
/// let source = SrtmTiles::builder()
///     .catalog_path("srtm-catalog.json")
///     .cache_dir("/var/cache/alti")
///     .max_tiles(16)
///     .build()?;
/// # Ok::<(), alti::AltiError>(())
/// ```
pub struct SrtmTilesBuilder {
    catalog: Option<Catalog>,
    catalog_path: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
    max_tiles: Option<usize>,
    fetcher: Option<Box<dyn Fetch>>,
    timeout_secs: Option<u64>,
}

impl Default for SrtmTilesBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SrtmTilesBuilder {
    /// Create a builder with no catalog, no persistent cache directory and
    /// no tile bound.
    pub fn new() -> Self {
        Self {
            catalog: None,
            catalog_path: None,
            cache_dir: None,
            max_tiles: None,
            fetcher: None,
            timeout_secs: None,
        }
    }

    /// Create a builder configured from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `ALTI_CATALOG` | Path to the catalog JSON file |
    /// | `ALTI_CACHE_DIR` | Directory for cached `.hgt` files |
    /// | `ALTI_MAX_TILES` | Bound on resident decoded tiles |
    ///
    /// Unset variables leave the corresponding option at its default.
    pub fn from_env() -> Self {
        let mut builder = Self::new();
        if let Ok(path) = std::env::var("ALTI_CATALOG") {
            builder.catalog_path = Some(PathBuf::from(path));
        }
        if let Ok(dir) = std::env::var("ALTI_CACHE_DIR") {
            builder.cache_dir = Some(PathBuf::from(dir));
        }
        if let Ok(max) = std::env::var("ALTI_MAX_TILES") {
            builder.max_tiles = max.parse().ok();
        }
        builder
    }

    /// Use an already-built catalog.
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Load the catalog from a JSON file at build time.
    pub fn catalog_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    /// Cache `.hgt` files in an existing directory that outlives the
    /// source. Without this, tiles live in a per-instance scratch
    /// directory and are discarded on drop.
    pub fn cache_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Bound the number of decoded tiles resident at once. Resolving a
    /// tile beyond the bound fails with [`AltiError::CapacityExceeded`];
    /// nothing is evicted.
    pub fn max_tiles(mut self, max: usize) -> Self {
        self.max_tiles = Some(max);
        self
    }

    /// Inject a fetch backend. Defaults to the built-in HTTP backend when
    /// the `http` feature is enabled.
    pub fn fetcher(mut self, fetcher: Box<dyn Fetch>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Timeout in seconds for the built-in HTTP backend. Ignored when a
    /// custom fetcher is injected.
    pub fn http_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Build the source.
    ///
    /// # Errors
    ///
    /// Fails if the catalog file cannot be read, the cache directory does
    /// not exist, or no fetch backend is available (no injected fetcher
    /// and the `http` feature disabled).
    pub fn build(self) -> Result<SrtmTiles> {
        let catalog = match (self.catalog, self.catalog_path) {
            (Some(catalog), _) => catalog,
            (None, Some(path)) => Catalog::load(path)?,
            (None, None) => Catalog::empty(),
        };

        let fetcher = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Self::default_fetcher(self.timeout_secs)?,
        };

        let store = TileStore::new(catalog, fetcher, self.cache_dir, self.max_tiles)?;
        Ok(SrtmTiles { store })
    }

    #[cfg(feature = "http")]
    fn default_fetcher(timeout_secs: Option<u64>) -> Result<Box<dyn Fetch>> {
        use crate::download::HttpFetch;
        let fetcher = match timeout_secs {
            Some(secs) => HttpFetch::with_timeout(secs)?,
            None => HttpFetch::new()?,
        };
        Ok(Box::new(fetcher))
    }

    #[cfg(not(feature = "http"))]
    fn default_fetcher(_timeout_secs: Option<u64>) -> Result<Box<dyn Fetch>> {
        Err(AltiError::Io(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "no fetch backend available: enable the `http` feature or inject one",
        )))
    }
}
