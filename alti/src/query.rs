//! Shape-polymorphic queries.
//!
//! Callers hold anything from a single point to nested point collections
//! (multi-line strings, polygon rings, geometry collections flattened to
//! coordinates). [`Input`] models that as a tagged tree, and [`Alti`] runs
//! elevation and coverage queries over it, returning results in the same
//! shape: a scalar in gives a scalar out, a nested list gives the same
//! nested list.

use crate::error::Result;
use crate::geodesy::{self, Coord};
use crate::path;
use crate::source::DataSource;

/// A point or an arbitrarily nested collection of points.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Point(Coord),
    List(Vec<Input>),
}

impl Input {
    /// A flat list input from a point slice.
    pub fn from_points(points: &[Coord]) -> Self {
        Input::List(points.iter().copied().map(Input::Point).collect())
    }
}

impl From<Coord> for Input {
    fn from(coord: Coord) -> Self {
        Input::Point(coord)
    }
}

impl From<(f64, f64)> for Input {
    /// Convert from a `(lon, lat)` pair.
    fn from(pair: (f64, f64)) -> Self {
        Input::Point(pair.into())
    }
}

impl From<Vec<Input>> for Input {
    fn from(items: Vec<Input>) -> Self {
        Input::List(items)
    }
}

/// Elevation results mirroring the shape of the queried [`Input`].
#[derive(Debug, Clone, PartialEq)]
pub enum Elevations {
    /// Elevation in meters, or `None` where the source has no data.
    Point(Option<f64>),
    List(Vec<Elevations>),
}

impl Elevations {
    /// All point results in depth-first order, collapsing the shape.
    pub fn flatten(&self) -> Vec<Option<f64>> {
        match self {
            Elevations::Point(value) => vec![*value],
            Elevations::List(items) => items.iter().flat_map(|e| e.flatten()).collect(),
        }
    }
}

/// High-level elevation queries over any [`DataSource`].
///
/// # Example
///
/// ```no_run
/// use alti::{Alti, Coord, Input, SrtmTiles};
///
/// let alti = Alti::new(SrtmTiles::builder().catalog_path("catalog.json").build()?);
///
/// let route = [Coord::new(2.2001, 48.80906), Coord::new(2.19121, 48.80773)];
/// let dense = alti.interpolate(&route)?;
/// let profile = alti.altitude(&Input::from_points(&dense))?;
/// # Ok::<(), alti::AltiError>(())
/// ```
pub struct Alti {
    source: Box<dyn DataSource>,
}

impl Alti {
    /// Wrap a data source.
    pub fn new(source: impl DataSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Elevations for the input, in the input's shape.
    pub fn altitude(&self, input: &Input) -> Result<Elevations> {
        match input {
            Input::Point(coord) => Ok(Elevations::Point(self.source.altitude(*coord)?)),
            Input::List(items) => {
                let results = items
                    .iter()
                    .map(|item| self.altitude(item))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Elevations::List(results))
            }
        }
    }

    /// Whether every point of the input lies in a covered cell.
    pub fn is_covered(&self, input: &Input) -> Result<bool> {
        match input {
            Input::Point(coord) => self.source.is_covered(*coord),
            Input::List(items) => {
                for item in items {
                    if !self.is_covered(item)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }

    /// Densify a route so consecutive points stay within the source's
    /// native resolution.
    pub fn interpolate(&self, points: &[Coord]) -> Result<Vec<Coord>> {
        path::densify(points, self.source.precision())
    }

    /// Geodesic distance between two points in meters.
    pub fn distance(&self, p1: Coord, p2: Coord) -> Result<f64> {
        geodesy::distance(p1, p2)
    }

    /// The wrapped source.
    pub fn source(&self) -> &dyn DataSource {
        self.source.as_ref()
    }
}
