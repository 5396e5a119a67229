//! Dropping an object onto the terrain below it.
//!
//! The host answers a [`DropRequest`] asynchronously. Every request carries a
//! fresh id and only the most recent one may move the object; answers to
//! superseded requests are discarded.

use glam::{DMat4, DVec3};
use terrascope_core::{first_terrain_hit, CoordinateSystem, Ray, RayHit};

/// A downward raycast the host should perform against terrain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropRequest {
    pub id: u64,
    pub ray: Ray,
}

/// Issues drop ids and remembers which one is still current.
#[derive(Debug, Clone, Default)]
pub struct DropSequencer {
    last_id: u64,
    pending: Option<u64>,
}

impl DropSequencer {
    /// Issues a new id, superseding any outstanding request.
    pub fn issue(&mut self) -> u64 {
        self.last_id += 1;
        self.pending = Some(self.last_id);
        self.last_id
    }

    /// Consumes `id` if it is the outstanding request.
    pub fn accept(&mut self, id: u64) -> bool {
        if self.pending == Some(id) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn pending(&self) -> Option<u64> {
        self.pending
    }
}

/// The ray from `height` metres above `position` straight down the local
/// surface normal.
pub fn drop_ray(position: DVec3, height: f64, coords: &CoordinateSystem) -> Ray {
    let up = coords
        .ellipsoid
        .geodetic_surface_normal(coords.ellipsoid.cartesian_to_cartographic(position));
    Ray::new(position + up * height, -up)
}

/// Moves `model` to the first terrain hit, keeping its world rotation and scale.
pub fn dropped_matrix(model: DMat4, hits: &[RayHit]) -> Option<DMat4> {
    let point = first_terrain_hit(hits)?;
    let mut moved = model;
    moved.w_axis = point.extend(1.0);
    Some(moved)
}
