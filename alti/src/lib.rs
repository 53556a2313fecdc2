//! # alti — SRTM elevation queries
//!
//! Answers "what is the ground elevation at (lon, lat)?" for points,
//! routes and nested point collections, using SRTM3 `.hgt` tiles fetched
//! on demand from a remote archive and cached locally. Also computes
//! geodesic distances (Vincenty inverse on WGS-84) and densifies paths so
//! consecutive samples stay within the data's 90 m resolution.
//!
//! ## Quick start
//!
//! ```no_run
//! use alti::{Coord, DataSource, SrtmTiles};
//!
//! let source = SrtmTiles::builder()
//!     .catalog_path("srtm-catalog.json")
//!     .cache_dir("/var/cache/alti")
//!     .build()?;
//!
//! // Tile is downloaded, checksum-verified and cached on first use
//! match source.altitude(Coord::new(2.343, 48.8861))? {
//!     Some(meters) => println!("{:.1} m", meters),
//!     None => println!("no data here"),
//! }
//! # Ok::<(), alti::AltiError>(())
//! ```
//!
//! ## Tile format
//!
//! Each tile covers 1° × 1° with a 1201 × 1201 grid of big-endian signed
//! 16-bit samples (meters), row-major from the northwest corner. The value
//! -32768 marks a void — no data at that grid node. Elevation lookups
//! bilinearly interpolate the four surrounding nodes and report `None` if
//! any of them is void, keeping "no data" distinct from sea level.
//!
//! ## Absence vs. failure
//!
//! Three outcomes are kept structurally apart: `Ok(Some(_))` is an
//! elevation, `Ok(None)` means the dataset has no data there, and `Err(_)`
//! is an actual failure (bad input, malformed tile, fetch error). Coverage
//! checks ([`DataSource::is_covered`]) tell whether a cell exists at all.
//!
//! ## Threading
//!
//! A [`SrtmTiles`] source is single-threaded by design — the tile cache is
//! not synchronized. Run one source per worker thread when querying in
//! parallel.

pub mod catalog;
pub mod download;
pub mod error;
pub mod geodesy;
pub mod key;
pub mod path;
pub mod query;
pub mod source;
pub mod store;
pub mod tile;

// Re-export main types at crate root for convenience
pub use catalog::{Catalog, CatalogEntry};
pub use download::Fetch;
#[cfg(feature = "http")]
pub use download::HttpFetch;
pub use error::{AltiError, Result};
pub use geodesy::Coord;
pub use key::TileKey;
pub use query::{Alti, Elevations, Input};
pub use source::{DataSource, SrtmTiles, SrtmTilesBuilder};
pub use store::TileStore;
pub use tile::{Tile, VOID_VALUE};
