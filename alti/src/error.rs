//! Error types for the alti library.

use thiserror::Error;

/// Errors that can occur when querying elevation data.
///
/// A missing elevation value is *not* an error: lookups return `Ok(None)`
/// when the underlying grid has no data, so absence stays structurally
/// distinct from invalid input and from I/O failures.
#[derive(Error, Debug)]
pub enum AltiError {
    /// IO error when reading or writing cache files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tile file length doesn't match the SRTM3 grid (1201 × 1201 × 2 bytes).
    #[error("invalid tile size: {size} bytes (expected {expected})", expected = crate::tile::TILE_FILE_SIZE)]
    InvalidSize { size: u64 },

    /// Coordinates are outside the valid longitude/latitude range.
    #[error("coordinates out of bounds: lon={lon}, lat={lat} (valid: lon ±180°, lat ±90°)")]
    OutOfBounds { lon: f64, lat: f64 },

    /// A remote fetch failed (transport error or non-success status).
    #[error("download of {url} failed: {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Downloaded archive content doesn't match the cataloged checksum.
    #[error("invalid checksum for {name}")]
    Checksum { name: String },

    /// The downloaded archive is malformed or doesn't hold exactly one entry.
    #[error("invalid tile archive: {reason}")]
    Archive { reason: String },

    /// The geodesic inverse iteration failed to converge (near-antipodal
    /// points). Retrying with the same inputs reproduces the failure.
    #[error("geodesic distance iteration did not converge")]
    NotConverged,

    /// Loading one more tile would exceed the configured resident-tile
    /// bound. The store never evicts; query in smaller batches instead.
    #[error("tile capacity exceeded: {limit} tiles already loaded")]
    CapacityExceeded { limit: usize },
}

/// Result type alias using [`AltiError`].
pub type Result<T> = std::result::Result<T, AltiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AltiError::InvalidSize { size: 1000 };
        assert!(err.to_string().contains("1000"));
        assert!(err.to_string().contains("2884802"));

        let err = AltiError::OutOfBounds {
            lon: 0.0,
            lat: 91.0,
        };
        assert!(err.to_string().contains("91"));

        let err = AltiError::CapacityExceeded { limit: 4 };
        assert!(err.to_string().contains('4'));
    }
}
