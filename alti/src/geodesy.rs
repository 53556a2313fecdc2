//! Geodesic distance and coordinate interpolation on the WGS-84 ellipsoid.
//!
//! The distance computation is the iterative Vincenty inverse solution:
//! reduced latitudes, then an iterative update of the longitude difference
//! λ on the auxiliary sphere until successive values settle.

use serde::{Deserialize, Serialize};

use crate::error::{AltiError, Result};

/// WGS-84 semi-major axis (equatorial radius) in meters.
const WGS84_A: f64 = 6_378_137.0;

/// WGS-84 semi-minor axis (polar radius) in meters.
const WGS84_B: f64 = 6_356_752.3142;

/// WGS-84 flattening.
const WGS84_F: f64 = 1.0 / 298.257223563;

/// Convergence tolerance on successive λ values, in radians.
const LAMBDA_TOLERANCE: f64 = 1e-12;

/// Maximum λ iterations before the inverse solution is declared divergent.
const MAX_ITERATIONS: u32 = 20;

/// A longitude/latitude pair in decimal degrees (WGS-84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    /// Longitude in decimal degrees, -180 to 180.
    pub lon: f64,
    /// Latitude in decimal degrees, -90 to 90.
    pub lat: f64,
}

impl Coord {
    /// Create a coordinate from longitude and latitude in decimal degrees.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<(f64, f64)> for Coord {
    /// Convert from a `(lon, lat)` pair.
    fn from((lon, lat): (f64, f64)) -> Self {
        Self { lon, lat }
    }
}

/// Ellipsoidal distance between two points in meters.
///
/// Coincident points return exactly `0.0` without iterating. The result is
/// rounded to millimeter precision (3 decimal places).
///
/// # Errors
///
/// Returns [`AltiError::NotConverged`] when the λ iteration does not settle
/// within [`MAX_ITERATIONS`], which happens for near-antipodal points.
///
/// # Example
///
/// ```
/// use alti::geodesy::{distance, Coord};
///
/// let d = distance(Coord::new(2.2001, 48.80906), Coord::new(2.19121, 48.80773)).unwrap();
/// assert_eq!(d, 669.53);
/// ```
pub fn distance(p1: Coord, p2: Coord) -> Result<f64> {
    let l = (p2.lon - p1.lon).to_radians();
    let u1 = ((1.0 - WGS84_F) * p1.lat.to_radians().tan()).atan();
    let u2 = ((1.0 - WGS84_F) * p2.lat.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    let mut lambda_p = 2.0 * std::f64::consts::PI;
    let mut iter_limit = MAX_ITERATIONS;

    let mut sin_sigma = 0.0;
    let mut cos_sigma = 0.0;
    let mut sigma = 0.0;
    let mut cos_sq_alpha = 0.0;
    let mut cos2_sigma_m = 0.0;

    while (lambda - lambda_p).abs() > LAMBDA_TOLERANCE {
        iter_limit -= 1;
        if iter_limit == 0 {
            return Err(AltiError::NotConverged);
        }

        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        sin_sigma = ((cos_u2 * sin_lambda) * (cos_u2 * sin_lambda)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda)
                * (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda))
            .sqrt();
        if sin_sigma == 0.0 {
            // co-incident points
            return Ok(0.0);
        }
        cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        sigma = sin_sigma.atan2(cos_sigma);
        let alpha = (cos_u1 * cos_u2 * sin_lambda / sin_sigma).asin();
        cos_sq_alpha = alpha.cos() * alpha.cos();
        cos2_sigma_m = cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha;
        let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));
        lambda_p = lambda;
        lambda = l
            + (1.0 - c)
                * WGS84_F
                * alpha.sin()
                * (sigma
                    + c * sin_sigma
                        * (cos2_sigma_m
                            + c * cos_sigma * (-1.0 + 2.0 * cos2_sigma_m * cos2_sigma_m)));
    }

    let u_sq = cos_sq_alpha * (WGS84_A * WGS84_A - WGS84_B * WGS84_B) / (WGS84_B * WGS84_B);
    let big_a =
        1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
    let delta_sigma = big_b
        * sin_sigma
        * (cos2_sigma_m
            + big_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos2_sigma_m * cos2_sigma_m)
                    - big_b / 6.0
                        * cos2_sigma_m
                        * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                        * (-3.0 + 4.0 * cos2_sigma_m * cos2_sigma_m)));
    let s = WGS84_B * big_a * (sigma - delta_sigma);

    // round to 1mm precision
    Ok((s * 1000.0).round() / 1000.0)
}

/// Componentwise linear interpolation between two coordinates.
///
/// This interpolates in lon/lat space, not along the geodesic. It is meant
/// for inserting points between neighbors already closer than the data
/// resolution, where the difference is negligible.
pub fn lerp(p1: Coord, p2: Coord, fraction: f64) -> Coord {
    Coord {
        lon: p1.lon + fraction * (p2.lon - p1.lon),
        lat: p1.lat + fraction * (p2.lat - p1.lat),
    }
}
