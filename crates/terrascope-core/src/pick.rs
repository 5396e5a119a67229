//! Picking results reported by the host scene.

use glam::DVec3;

use crate::gizmo::GizmoAxis;

/// One object under the cursor, as reported by the host's pick or drill pick.
#[derive(Debug, Clone, PartialEq)]
pub struct PickResult {
    /// Identifier attached to the picked primitive (gizmo handles use their tag).
    pub id: String,

    /// Index of the editable object, if the primitive belongs to one.
    pub object: Option<usize>,

    /// The world position of the pick point, if the host resolved one.
    pub world_position: Option<DVec3>,
}

impl PickResult {
    /// Creates a new pick result.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            object: None,
            world_position: None,
        }
    }

    /// Attaches the picked world position.
    #[must_use]
    pub fn with_position(mut self, position: DVec3) -> Self {
        self.world_position = Some(position);
        self
    }

    /// Attaches the index of the editable object.
    #[must_use]
    pub fn with_object(mut self, index: usize) -> Self {
        self.object = Some(index);
        self
    }

    /// The gizmo handle this pick refers to, if any.
    pub fn handle(&self) -> Option<GizmoAxis> {
        GizmoAxis::from_tag(&self.id)
    }
}

/// One intersection from a terrain raycast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World position of the hit.
    pub position: DVec3,
    /// Whether the hit belongs to terrain (as opposed to models, tiles, labels).
    pub terrain: bool,
}

/// Returns the first terrain hit in ray order.
pub fn first_terrain_hit(hits: &[RayHit]) -> Option<DVec3> {
    hits.iter().find(|h| h.terrain).map(|h| h.position)
}
