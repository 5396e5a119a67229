//! Map projections between geographic coordinates and a flat local system.
//!
//! The inspector shows positions as easting/northing in the configured
//! projected coordinate system, and horizontal gizmo translation is applied in
//! that system so that moving an object follows the ellipsoid instead of a
//! tangent plane.

use glam::{DMat2, DVec2};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrascopeError};
use crate::geo::{Cartographic, Ellipsoid};

/// Converts between geographic positions and projected plane coordinates.
pub trait Projection: Send + Sync {
    /// Projects a geographic position to `(easting, northing)`. Height is ignored.
    fn forward(&self, position: Cartographic) -> DVec2;

    /// Unprojects `(easting, northing)` back to a geographic position at `height`.
    fn inverse(&self, point: DVec2, height: f64) -> Cartographic;
}

/// Serializable projection definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProjectionDef {
    /// Plain longitude/latitude in degrees.
    Geographic,
    /// Spherical web mercator (EPSG:3857).
    WebMercator,
    /// Universal transverse mercator zone on WGS84.
    Utm {
        zone: u8,
        #[serde(default)]
        south: bool,
    },
    /// Generic transverse mercator on WGS84. Angles in degrees.
    TransverseMercator {
        central_meridian: f64,
        #[serde(default)]
        latitude_of_origin: f64,
        scale_factor: f64,
        #[serde(default)]
        false_easting: f64,
        #[serde(default)]
        false_northing: f64,
    },
}

impl Default for ProjectionDef {
    fn default() -> Self {
        Self::Utm {
            zone: 32,
            south: false,
        }
    }
}

impl ProjectionDef {
    /// Builds the projection described by this definition.
    pub fn to_projection(&self) -> Result<Box<dyn Projection>> {
        match *self {
            Self::Geographic => Ok(Box::new(Geographic)),
            Self::WebMercator => Ok(Box::new(WebMercator::default())),
            Self::Utm { zone, south } => Ok(Box::new(TransverseMercator::utm(zone, south)?)),
            Self::TransverseMercator {
                central_meridian,
                latitude_of_origin,
                scale_factor,
                false_easting,
                false_northing,
            } => {
                if scale_factor.is_nan() || scale_factor <= 0.0 {
                    return Err(TerrascopeError::InvalidProjection(format!(
                        "scale factor must be positive, got {scale_factor}"
                    )));
                }
                Ok(Box::new(TransverseMercator {
                    ellipsoid: Ellipsoid::WGS84,
                    central_meridian: central_meridian.to_radians(),
                    latitude_of_origin: latitude_of_origin.to_radians(),
                    scale_factor,
                    false_easting,
                    false_northing,
                }))
            }
        }
    }
}

/// Longitude/latitude in degrees as plane coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct Geographic;

impl Projection for Geographic {
    fn forward(&self, position: Cartographic) -> DVec2 {
        DVec2::new(position.longitude_degrees(), position.latitude_degrees())
    }

    fn inverse(&self, point: DVec2, height: f64) -> Cartographic {
        Cartographic::from_degrees(point.x, point.y, height)
    }
}

/// Spherical mercator on the WGS84 semi-major axis.
#[derive(Debug, Clone, Copy)]
pub struct WebMercator {
    radius: f64,
}

impl Default for WebMercator {
    fn default() -> Self {
        Self {
            radius: Ellipsoid::WGS84.semi_major_axis,
        }
    }
}

impl Projection for WebMercator {
    fn forward(&self, position: Cartographic) -> DVec2 {
        let y = (std::f64::consts::FRAC_PI_4 + position.latitude / 2.0).tan().ln();
        DVec2::new(self.radius * position.longitude, self.radius * y)
    }

    fn inverse(&self, point: DVec2, height: f64) -> Cartographic {
        let latitude = 2.0 * (point.y / self.radius).exp().atan() - std::f64::consts::FRAC_PI_2;
        Cartographic::new(point.x / self.radius, latitude, height)
    }
}

/// Ellipsoidal transverse mercator (Snyder's series).
#[derive(Debug, Clone, Copy)]
pub struct TransverseMercator {
    ellipsoid: Ellipsoid,
    /// Radians.
    central_meridian: f64,
    /// Radians.
    latitude_of_origin: f64,
    scale_factor: f64,
    false_easting: f64,
    false_northing: f64,
}

impl TransverseMercator {
    /// The UTM projection for a zone in `1..=60`.
    pub fn utm(zone: u8, south: bool) -> Result<Self> {
        if !(1..=60).contains(&zone) {
            return Err(TerrascopeError::InvalidProjection(format!(
                "UTM zone must be in 1..=60, got {zone}"
            )));
        }
        Ok(Self {
            ellipsoid: Ellipsoid::WGS84,
            central_meridian: (f64::from(zone) * 6.0 - 183.0).to_radians(),
            latitude_of_origin: 0.0,
            scale_factor: 0.9996,
            false_easting: 500_000.0,
            false_northing: if south { 10_000_000.0 } else { 0.0 },
        })
    }

    /// Meridian arc length from the equator to `latitude`.
    fn meridian_distance(&self, latitude: f64) -> f64 {
        let e2 = self.ellipsoid.eccentricity_squared();
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        self.ellipsoid.semi_major_axis
            * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * latitude
                - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * latitude).sin()
                + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * latitude).sin()
                - (35.0 * e6 / 3072.0) * (6.0 * latitude).sin())
    }
}

impl Projection for TransverseMercator {
    fn forward(&self, position: Cartographic) -> DVec2 {
        let a = self.ellipsoid.semi_major_axis;
        let e2 = self.ellipsoid.eccentricity_squared();
        let ep2 = e2 / (1.0 - e2);
        let k0 = self.scale_factor;
        let phi = position.latitude;

        let (sin_phi, cos_phi) = phi.sin_cos();
        let tan_phi = phi.tan();
        let n = a / (1.0 - e2 * sin_phi * sin_phi).sqrt();
        let t = tan_phi * tan_phi;
        let c = ep2 * cos_phi * cos_phi;
        let big_a = (position.longitude - self.central_meridian) * cos_phi;
        let m = self.meridian_distance(phi);
        let m0 = self.meridian_distance(self.latitude_of_origin);

        let x = k0
            * n
            * (big_a
                + (1.0 - t + c) * big_a.powi(3) / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * big_a.powi(5) / 120.0);
        let y = k0
            * (m - m0
                + n * tan_phi
                    * (big_a * big_a / 2.0
                        + (5.0 - t + 9.0 * c + 4.0 * c * c) * big_a.powi(4) / 24.0
                        + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * big_a.powi(6)
                            / 720.0));

        DVec2::new(x + self.false_easting, y + self.false_northing)
    }

    fn inverse(&self, point: DVec2, height: f64) -> Cartographic {
        let a = self.ellipsoid.semi_major_axis;
        let e2 = self.ellipsoid.eccentricity_squared();
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        let ep2 = e2 / (1.0 - e2);
        let k0 = self.scale_factor;

        let m = self.meridian_distance(self.latitude_of_origin)
            + (point.y - self.false_northing) / k0;
        let mu = m / (a * (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));
        let root = (1.0 - e2).sqrt();
        let e1 = (1.0 - root) / (1.0 + root);

        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        let (sin_phi1, cos_phi1) = phi1.sin_cos();
        let tan_phi1 = phi1.tan();
        let c1 = ep2 * cos_phi1 * cos_phi1;
        let t1 = tan_phi1 * tan_phi1;
        let w = 1.0 - e2 * sin_phi1 * sin_phi1;
        let n1 = a / w.sqrt();
        let r1 = a * (1.0 - e2) / w.powf(1.5);
        let d = (point.x - self.false_easting) / (n1 * k0);

        let latitude = phi1
            - (n1 * tan_phi1 / r1)
                * (d * d / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d.powi(4) / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2
                        - 3.0 * c1 * c1)
                        * d.powi(6)
                        / 720.0);
        let longitude = self.central_meridian
            + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1)
                    * d.powi(5)
                    / 120.0)
                / cos_phi1;

        self.refine(point, Cartographic::new(longitude, latitude, height))
    }
}

impl TransverseMercator {
    /// Polishes a series inverse with Newton steps against `forward`, so that
    /// `forward(inverse(p))` reproduces `p` to well below a millimetre.
    fn refine(&self, target: DVec2, mut position: Cartographic) -> Cartographic {
        const STEP: f64 = 1e-7;
        for _ in 0..3 {
            let base = self.forward(position);
            let residual = target - base;
            if residual.length() < 1e-9 {
                break;
            }
            let d_lon = (self.forward(Cartographic {
                longitude: position.longitude + STEP,
                ..position
            }) - base)
                / STEP;
            let d_lat = (self.forward(Cartographic {
                latitude: position.latitude + STEP,
                ..position
            }) - base)
                / STEP;
            let jacobian = DMat2::from_cols(d_lon, d_lat);
            if jacobian.determinant().abs() < f64::EPSILON {
                break;
            }
            let correction = jacobian.inverse() * residual;
            position.longitude += correction.x;
            position.latitude += correction.y;
        }
        position
    }
}
