//! Geodesy primitives: the WGS84 ellipsoid, east-north-up frames, rays and planes.
//!
//! All positions are Earth-centred, Earth-fixed (ECEF) cartesian coordinates in
//! metres unless stated otherwise. Angles on [`Cartographic`] are radians.

use glam::{DMat3, DMat4, DQuat, DVec3, EulerRot};

/// Tolerance below which a ray is treated as parallel to a plane.
const PARALLEL_EPSILON: f64 = 1e-12;

/// A geographic position: longitude and latitude in radians, height in metres.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cartographic {
    /// Longitude in radians, positive east.
    pub longitude: f64,
    /// Latitude in radians, positive north.
    pub latitude: f64,
    /// Height above the ellipsoid in metres.
    pub height: f64,
}

impl Cartographic {
    /// Creates a cartographic position from radians.
    pub fn new(longitude: f64, latitude: f64, height: f64) -> Self {
        Self {
            longitude,
            latitude,
            height,
        }
    }

    /// Creates a cartographic position from degrees.
    pub fn from_degrees(longitude: f64, latitude: f64, height: f64) -> Self {
        Self::new(longitude.to_radians(), latitude.to_radians(), height)
    }

    /// Longitude in degrees.
    pub fn longitude_degrees(&self) -> f64 {
        self.longitude.to_degrees()
    }

    /// Latitude in degrees.
    pub fn latitude_degrees(&self) -> f64 {
        self.latitude.to_degrees()
    }
}

/// A reference ellipsoid of revolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis in metres.
    pub semi_major_axis: f64,
    /// Flattening.
    pub flattening: f64,
}

impl Ellipsoid {
    /// The WGS84 ellipsoid.
    pub const WGS84: Self = Self {
        semi_major_axis: 6_378_137.0,
        flattening: 1.0 / 298.257_223_563,
    };

    /// First eccentricity squared.
    pub fn eccentricity_squared(&self) -> f64 {
        self.flattening * (2.0 - self.flattening)
    }

    /// Radius of curvature in the prime vertical at the given latitude.
    fn prime_vertical_radius(&self, latitude: f64) -> f64 {
        let sin_lat = latitude.sin();
        self.semi_major_axis / (1.0 - self.eccentricity_squared() * sin_lat * sin_lat).sqrt()
    }

    /// Converts a geographic position to ECEF cartesian coordinates.
    pub fn cartographic_to_cartesian(&self, position: Cartographic) -> DVec3 {
        let n = self.prime_vertical_radius(position.latitude);
        let (sin_lat, cos_lat) = position.latitude.sin_cos();
        let (sin_lon, cos_lon) = position.longitude.sin_cos();
        let h = position.height;
        DVec3::new(
            (n + h) * cos_lat * cos_lon,
            (n + h) * cos_lat * sin_lon,
            (n * (1.0 - self.eccentricity_squared()) + h) * sin_lat,
        )
    }

    /// Converts ECEF cartesian coordinates to a geographic position.
    ///
    /// Iterates on latitude until it settles; converges to sub-millimetre
    /// accuracy within a handful of steps for any point near the surface.
    pub fn cartesian_to_cartographic(&self, position: DVec3) -> Cartographic {
        let e2 = self.eccentricity_squared();
        let p = position.x.hypot(position.y);
        let longitude = position.y.atan2(position.x);
        let mut latitude = position.z.atan2(p * (1.0 - e2));

        for _ in 0..10 {
            let n = self.prime_vertical_radius(latitude);
            let next = (position.z + e2 * n * latitude.sin()).atan2(p);
            let converged = (next - latitude).abs() < 1e-14;
            latitude = next;
            if converged {
                break;
            }
        }

        let (sin_lat, cos_lat) = latitude.sin_cos();
        let height = p * cos_lat + position.z * sin_lat
            - self.semi_major_axis * (1.0 - e2 * sin_lat * sin_lat).sqrt();

        Cartographic::new(longitude, latitude, height)
    }

    /// Returns the outward surface normal of the ellipsoid at a geographic position.
    pub fn geodetic_surface_normal(&self, position: Cartographic) -> DVec3 {
        let (sin_lat, cos_lat) = position.latitude.sin_cos();
        let (sin_lon, cos_lon) = position.longitude.sin_cos();
        DVec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
    }

    /// Builds the local east-north-up frame anchored at an ECEF position.
    ///
    /// The returned matrix maps frame-local coordinates (x east, y north,
    /// z up) to ECEF.
    pub fn east_north_up_to_fixed_frame(&self, origin: DVec3) -> DMat4 {
        let position = self.cartesian_to_cartographic(origin);
        let rotation = self.east_north_up_rotation(position);
        DMat4::from_cols(
            rotation.x_axis.extend(0.0),
            rotation.y_axis.extend(0.0),
            rotation.z_axis.extend(0.0),
            origin.extend(1.0),
        )
    }

    /// The rotation part of the east-north-up frame at a geographic position.
    pub fn east_north_up_rotation(&self, position: Cartographic) -> DMat3 {
        let (sin_lat, cos_lat) = position.latitude.sin_cos();
        let (sin_lon, cos_lon) = position.longitude.sin_cos();
        let east = DVec3::new(-sin_lon, cos_lon, 0.0);
        let north = DVec3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);
        let up = self.geodetic_surface_normal(position);
        DMat3::from_cols(east, north, up)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

/// A half-line with an origin and a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point of the ray.
    pub origin: DVec3,
    /// Unit direction of the ray.
    pub direction: DVec3,
}

impl Ray {
    /// Creates a ray, normalizing the direction.
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Returns the point at parameter `t` along the ray.
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Transforms the ray by an affine matrix.
    pub fn transformed(&self, matrix: &DMat4) -> Self {
        Self::new(
            matrix.transform_point3(self.origin),
            matrix.transform_vector3(self.direction),
        )
    }
}

/// A plane in Hessian normal form: `normal . p + distance = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal of the plane.
    pub normal: DVec3,
    /// Signed distance from the origin along the negated normal.
    pub distance: f64,
}

impl Plane {
    /// Creates the plane through `point` with the given normal.
    pub fn from_point_normal(point: DVec3, normal: DVec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            normal,
            distance: -normal.dot(point),
        }
    }

    /// Signed distance from a point to the plane.
    pub fn signed_distance(&self, point: DVec3) -> f64 {
        self.normal.dot(point) + self.distance
    }

    /// Intersects a ray with the plane.
    ///
    /// Returns `None` if the ray is parallel to the plane or the plane lies
    /// behind the ray origin.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<DVec3> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = -self.signed_distance(ray.origin) / denom;
        if t < 0.0 {
            return None;
        }
        Some(ray.at(t))
    }
}

/// Orientation as heading, pitch and roll in radians.
///
/// Heading turns clockwise about the local up axis, pitch turns about the
/// negated local north axis and roll turns about the local east axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeadingPitchRoll {
    pub heading: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl HeadingPitchRoll {
    pub fn new(heading: f64, pitch: f64, roll: f64) -> Self {
        Self {
            heading,
            pitch,
            roll,
        }
    }

    /// Builds the frame-relative rotation for this orientation.
    pub fn to_quat(self) -> DQuat {
        DQuat::from_euler(EulerRot::ZYX, -self.heading, -self.pitch, self.roll)
    }

    /// Extracts heading, pitch and roll from a frame-relative rotation.
    pub fn from_quat(rotation: DQuat) -> Self {
        let (z, y, x) = rotation.to_euler(EulerRot::ZYX);
        Self::new(-z, -y, x)
    }
}

/// Returns the angle in radians between two vectors.
pub fn angle_between(a: DVec3, b: DVec3) -> f64 {
    let denom = a.length() * b.length();
    if denom <= 0.0 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cartographic_roundtrip() {
        let ellipsoid = Ellipsoid::WGS84;
        let position = Cartographic::from_degrees(9.18, 48.78, 250.0);
        let cartesian = ellipsoid.cartographic_to_cartesian(position);
        let back = ellipsoid.cartesian_to_cartographic(cartesian);

        assert!((back.longitude - position.longitude).abs() < 1e-12);
        assert!((back.latitude - position.latitude).abs() < 1e-12);
        assert!((back.height - position.height).abs() < 1e-6);
    }

    #[test]
    fn test_equator_prime_meridian() {
        let cartesian =
            Ellipsoid::WGS84.cartographic_to_cartesian(Cartographic::from_degrees(0.0, 0.0, 0.0));
        assert!((cartesian - DVec3::new(6_378_137.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_enu_frame_axes() {
        let ellipsoid = Ellipsoid::WGS84;
        let origin = ellipsoid.cartographic_to_cartesian(Cartographic::from_degrees(0.0, 0.0, 0.0));
        let frame = ellipsoid.east_north_up_to_fixed_frame(origin);

        assert!((frame.x_axis.truncate() - DVec3::Y).length() < 1e-12);
        assert!((frame.y_axis.truncate() - DVec3::Z).length() < 1e-12);
        assert!((frame.z_axis.truncate() - DVec3::X).length() < 1e-12);
        assert!((frame.w_axis.truncate() - origin).length() < 1e-9);
    }

    #[test]
    fn test_ray_plane_intersection() {
        let plane = Plane::from_point_normal(DVec3::new(0.0, 0.0, 2.0), DVec3::Z);
        let ray = Ray::new(DVec3::new(1.0, 1.0, 10.0), DVec3::NEG_Z);
        let hit = plane.intersect_ray(&ray).unwrap();
        assert!((hit - DVec3::new(1.0, 1.0, 2.0)).length() < 1e-12);
    }

    #[test]
    fn test_parallel_ray_misses() {
        let plane = Plane::from_point_normal(DVec3::ZERO, DVec3::Z);
        let ray = Ray::new(DVec3::new(0.0, 0.0, 1.0), DVec3::X);
        assert!(plane.intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_plane_behind_ray() {
        let plane = Plane::from_point_normal(DVec3::ZERO, DVec3::Z);
        let ray = Ray::new(DVec3::new(0.0, 0.0, 1.0), DVec3::Z);
        assert!(plane.intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_heading_pitch_roll_roundtrip() {
        let hpr = HeadingPitchRoll::new(0.4, -0.2, 0.1);
        let back = HeadingPitchRoll::from_quat(hpr.to_quat());
        assert!((back.heading - hpr.heading).abs() < 1e-12);
        assert!((back.pitch - hpr.pitch).abs() < 1e-12);
        assert!((back.roll - hpr.roll).abs() < 1e-12);
    }

    #[test]
    fn test_positive_heading_turns_clockwise() {
        let q = HeadingPitchRoll::new(std::f64::consts::FRAC_PI_2, 0.0, 0.0).to_quat();
        // Facing north, a quarter turn clockwise faces east.
        let facing = q * DVec3::Y;
        assert!((facing - DVec3::X).length() < 1e-12);
    }
}
