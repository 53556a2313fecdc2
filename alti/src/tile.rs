//! SRTM3 tile decoding and bilinear sampling.
//!
//! A tile file holds a 1201 × 1201 grid of big-endian signed 16-bit
//! elevation samples in meters, row-major with row 0 at the north edge.
//! The file is memory-mapped; a [`Tile`] is immutable after construction
//! and never partially valid — a file of the wrong length is rejected
//! outright.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::error::{AltiError, Result};

/// Grid cells per tile edge.
pub const GRID_SIZE: usize = 1200;

/// Samples per row/column (grid edge + 1, nodes shared with neighbors).
pub const SAMPLES: usize = GRID_SIZE + 1;

/// Expected tile file length: 1201 × 1201 × 2 bytes.
pub const TILE_FILE_SIZE: usize = SAMPLES * SAMPLES * 2;

/// Sentinel sample value meaning "no data at this grid node".
pub const VOID_VALUE: i16 = -32768;

/// A decoded, memory-mapped elevation tile.
pub struct Tile {
    data: Mmap,
}

impl Tile {
    /// Map a tile from an uncompressed `.hgt` file.
    ///
    /// # Errors
    ///
    /// Returns [`AltiError::InvalidSize`] if the file length is not exactly
    /// [`TILE_FILE_SIZE`], and an IO error if the file cannot be opened or
    /// mapped.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;

        // SAFETY: the mapping is read-only and the cache never rewrites a
        // tile file in place once it has been atomically put in position.
        let data = unsafe { Mmap::map(&file)? };

        if data.len() != TILE_FILE_SIZE {
            return Err(AltiError::InvalidSize {
                size: data.len() as u64,
            });
        }

        Ok(Self { data })
    }

    /// Raw sample at a grid node, row 0 = north edge, column 0 = west edge.
    fn node(&self, row: usize, col: usize) -> i16 {
        let offset = (row * SAMPLES + col) * 2;
        i16::from_be_bytes([self.data[offset], self.data[offset + 1]])
    }

    /// Bilinearly interpolated elevation at a fractional offset inside the
    /// cell.
    ///
    /// `dx` is the fractional longitude from the west edge, in `[0, 1)`;
    /// `dy` is the distance down from the north edge, in `(0, 1]`. Returns
    /// `None` when any of the four enclosing grid nodes is void — absence
    /// of data, as opposed to an elevation of zero.
    pub fn sample(&self, dx: f64, dy: f64) -> Option<f64> {
        let size = GRID_SIZE as f64;
        let left = (dx * size).floor() as usize;
        let right = left + 1;
        let top = ((dy * size).ceil() as usize).saturating_sub(1);
        let bottom = top + 1;

        let tl = self.node(top, left);
        let tr = self.node(top, right);
        let bl = self.node(bottom, left);
        let br = self.node(bottom, right);
        if tl == VOID_VALUE || tr == VOID_VALUE || bl == VOID_VALUE || br == VOID_VALUE {
            return None;
        }

        let (tl, tr, bl, br) = (tl as f64, tr as f64, bl as f64, br as f64);
        let a = dy * size - top as f64;
        let b = dx * size - left as f64;
        Some(tl + (bl - tl) * a + (tr - tl) * b + (tl - bl - tr + br) * a * b)
    }
}
