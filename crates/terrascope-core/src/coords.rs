//! The coordinate systems an edited object lives in.

use std::fmt;

use glam::{DMat4, DVec2, DVec3};

use crate::error::Result;
use crate::geo::Ellipsoid;
use crate::gizmo::Bounds;
use crate::projection::{Projection, ProjectionDef};

/// Ties the ellipsoid to the configured projected system.
///
/// Projected positions are `(easting, northing, height)`.
pub struct CoordinateSystem {
    pub ellipsoid: Ellipsoid,
    projection: Box<dyn Projection>,
}

impl CoordinateSystem {
    pub fn new(projection: Box<dyn Projection>) -> Self {
        Self {
            ellipsoid: Ellipsoid::WGS84,
            projection,
        }
    }

    /// Builds the coordinate system for a projection definition.
    pub fn from_def(def: &ProjectionDef) -> Result<Self> {
        Ok(Self::new(def.to_projection()?))
    }

    pub fn projection(&self) -> &dyn Projection {
        self.projection.as_ref()
    }

    /// ECEF to `(easting, northing, height)`.
    pub fn to_projected(&self, world: DVec3) -> DVec3 {
        let position = self.ellipsoid.cartesian_to_cartographic(world);
        self.projection.forward(position).extend(position.height)
    }

    /// `(easting, northing, height)` to ECEF.
    pub fn from_projected(&self, projected: DVec3) -> DVec3 {
        let position = self
            .projection
            .inverse(DVec2::new(projected.x, projected.y), projected.z);
        self.ellipsoid.cartographic_to_cartesian(position)
    }

    /// Clips an ECEF position to `bounds` in the projected system.
    ///
    /// Returns the position unchanged when no bound is configured.
    pub fn clip(&self, world: DVec3, bounds: &Bounds) -> DVec3 {
        if bounds.easting.is_none() && bounds.northing.is_none() && bounds.height.is_none() {
            return world;
        }
        let projected = self.to_projected(world);
        let clipped = bounds.clip(projected);
        if clipped == projected {
            world
        } else {
            self.from_projected(clipped)
        }
    }

    /// The east-north-up frame at an ECEF position.
    pub fn enu_frame(&self, world: DVec3) -> DMat4 {
        self.ellipsoid.east_north_up_to_fixed_frame(world)
    }
}

impl Default for CoordinateSystem {
    fn default() -> Self {
        // UTM 32N
        Self::from_def(&ProjectionDef::default())
            .unwrap_or_else(|_| Self::new(Box::new(crate::projection::Geographic)))
    }
}

impl fmt::Debug for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoordinateSystem")
            .field("ellipsoid", &self.ellipsoid)
            .finish_non_exhaustive()
    }
}
