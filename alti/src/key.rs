//! Tile keys and `.hgt` file naming.
//!
//! A [`TileKey`] identifies one 1° × 1° SRTM cell by the integer degrees of
//! its lower-left (southwest) corner. Keys render in the SRTM naming
//! convention `{N|S}{lat:02}{E|W}{lon:03}`, e.g. `N48E002`, and two
//! coordinates map to the same key exactly when they fall in the same cell.

use std::fmt;
use std::str::FromStr;

use crate::geodesy::Coord;

/// Identifier of a 1° × 1° elevation cell by its southwest corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileKey {
    /// Latitude of the southwest corner (integer degrees).
    pub lat: i32,
    /// Longitude of the southwest corner (integer degrees).
    pub lon: i32,
}

impl TileKey {
    /// Key of the cell containing `coord`.
    ///
    /// Uses `floor`, so `(-0.5, -0.5)` lands in `S01W001` and a coordinate
    /// exactly on a cell's south/west edge belongs to that cell.
    pub fn for_coord(coord: Coord) -> Self {
        Self {
            lat: coord.lat.floor() as i32,
            lon: coord.lon.floor() as i32,
        }
    }

    /// The cache filename for this key, e.g. `N48E002.hgt`.
    pub fn hgt_name(&self) -> String {
        format!("{}.hgt", self)
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lat_prefix = if self.lat >= 0 { 'N' } else { 'S' };
        let lon_prefix = if self.lon >= 0 { 'E' } else { 'W' };
        write!(
            f,
            "{}{:02}{}{:03}",
            lat_prefix,
            self.lat.abs(),
            lon_prefix,
            self.lon.abs()
        )
    }
}

impl FromStr for TileKey {
    type Err = ();

    /// Parse a key like `N35E138` or `s12w077`, with or without a trailing
    /// `.hgt` extension.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_suffix(".hgt").unwrap_or(s);
        if name.len() != 7 {
            return Err(());
        }

        let bytes = name.as_bytes();
        let lat_sign = match bytes[0] {
            b'N' | b'n' => 1,
            b'S' | b's' => -1,
            _ => return Err(()),
        };
        let lat: i32 = name[1..3].parse().map_err(|_| ())?;
        let lon_sign = match bytes[3] {
            b'E' | b'e' => 1,
            b'W' | b'w' => -1,
            _ => return Err(()),
        };
        let lon: i32 = name[4..7].parse().map_err(|_| ())?;

        Ok(Self {
            lat: lat * lat_sign,
            lon: lon * lon_sign,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(lon: f64, lat: f64) -> String {
        TileKey::for_coord(Coord::new(lon, lat)).to_string()
    }

    #[test]
    fn test_positive_coords() {
        assert_eq!(key(138.7, 35.5), "N35E138");
        assert_eq!(key(0.5, 0.5), "N00E000");
        assert_eq!(key(2.2001, 48.80906), "N48E002");
        assert_eq!(key(179.9, 59.9), "N59E179");
    }

    #[test]
    fn test_negative_coords() {
        // floor(-12.3) = -13, floor(-77.1) = -78
        assert_eq!(key(-77.1, -12.3), "S13W078");
        // floor(-0.5) = -1
        assert_eq!(key(-0.5, -0.5), "S01W001");
        assert_eq!(key(-1.0, -1.0), "S01W001");
        assert_eq!(key(-179.9, -59.9), "S60W180");
    }

    #[test]
    fn test_mixed_coords() {
        assert_eq!(key(-122.4, 35.5), "N35W123");
        assert_eq!(key(151.2, -33.9), "S34E151");
        assert_eq!(key(-99.1, 19.4), "N19W100");
    }

    #[test]
    fn test_boundary_cases() {
        // exactly on the southwest corner
        assert_eq!(key(138.0, 35.0), "N35E138");
        assert_eq!(key(0.0, 0.0), "N00E000");
        // floor(-0.1) = -1
        assert_eq!(key(-0.1, -0.1), "S01W001");
    }

    #[test]
    fn test_stable_within_cell() {
        let corner = TileKey::for_coord(Coord::new(2.0, 48.0));
        for (lon, lat) in [(2.0, 48.0), (2.0001, 48.9999), (2.9999, 48.0001), (2.5, 48.5)] {
            assert_eq!(TileKey::for_coord(Coord::new(lon, lat)), corner);
        }
        assert_ne!(TileKey::for_coord(Coord::new(3.0, 48.0)), corner);
        assert_ne!(TileKey::for_coord(Coord::new(2.0, 49.0)), corner);
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            "N35E138".parse::<TileKey>().unwrap(),
            TileKey { lat: 35, lon: 138 }
        );
        assert_eq!(
            "S12W077.hgt".parse::<TileKey>().unwrap(),
            TileKey { lat: -12, lon: -77 }
        );
        assert_eq!(
            "s12w077".parse::<TileKey>().unwrap(),
            TileKey { lat: -12, lon: -77 }
        );
        assert!("invalid".parse::<TileKey>().is_err());
        assert!("N35E13".parse::<TileKey>().is_err());
        assert!("X35E138".parse::<TileKey>().is_err());
        assert!("NAAE138".parse::<TileKey>().is_err());
    }

    #[test]
    fn test_roundtrip() {
        for (lon, lat) in [
            (138.7, 35.5),
            (-77.1, -12.3),
            (-0.5, 0.5),
            (0.5, -0.5),
            (179.9, 59.9),
            (-179.9, -59.9),
        ] {
            let k = TileKey::for_coord(Coord::new(lon, lat));
            assert_eq!(k.to_string().parse::<TileKey>().unwrap(), k);
            assert_eq!(k.hgt_name(), format!("{}.hgt", k));
        }
    }
}
