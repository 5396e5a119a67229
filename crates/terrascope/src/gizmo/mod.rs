//! The transform gizmo interaction engine.
//!
//! A [`GizmoSession`] exists while one object is being edited. It owns the
//! object's current model matrix, the handle geometry and the drag state:
//!
//! - idle: pointer moves hover-highlight the topmost handle
//! - armed: pointer-down on a highlighted handle picks a manipulation plane
//!   and disables camera navigation
//! - each tick while armed intersects the previous and current cursor rays
//!   with that plane and commits the snapped delta
//! - pointer-up restores the handle color and schedules camera re-enable

pub mod calc;
pub mod terrain;

use std::time::{Duration, Instant};

use glam::{DMat4, DVec2, DVec3};
use terrascope_core::{
    CoordinateSystem, GizmoAxis, GizmoConfig, GizmoMode, GizmoPrimitiveBuilder, GizmoPrimitives,
    PickResult, Ray, RayHit, HIGHLIGHT_COLOR,
};

use crate::host::{CameraInputs, Scene};
use calc::{Decomposed, PlaneChoice};
use terrain::{DropRequest, DropSequencer};

/// Number of candidates requested from the host when hovering handles.
pub const HOVER_PICK_LIMIT: usize = 8;

/// An armed drag gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    /// The picked handle.
    pub axis: GizmoAxis,
    /// Manipulation-plane normal in the gizmo frame.
    pub normal: DVec3,
    /// The cursor ray of the last committed tick, in ECEF.
    pub previous_ray: Option<Ray>,
}

/// Interaction phase of the gizmo.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GizmoPhase {
    #[default]
    Idle,
    Armed(Drag),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Highlight {
    axis: GizmoAxis,
    original: [f32; 4],
}

/// Editing session for one registered object.
#[derive(Debug, Clone)]
pub struct GizmoSession {
    object: usize,
    model_matrix: DMat4,
    global_frame: DMat4,
    primitives: GizmoPrimitives,
    phase: GizmoPhase,
    highlight: Option<Highlight>,
    cursor: Option<DVec2>,
    camera_release_at: Option<Instant>,
    drops: DropSequencer,
}

impl GizmoSession {
    /// Starts editing `object` whose current matrix is `model_matrix`.
    pub fn new(
        object: usize,
        model_matrix: DMat4,
        config: &GizmoConfig,
        coords: &CoordinateSystem,
    ) -> Self {
        let mut primitives =
            GizmoPrimitiveBuilder::new(config.length as f32, config.radius as f32).build_all();
        primitives.set_mode(config.mode);
        Self {
            object,
            model_matrix,
            global_frame: coords.enu_frame(model_matrix.w_axis.truncate()),
            primitives,
            phase: GizmoPhase::Idle,
            highlight: None,
            cursor: None,
            camera_release_at: None,
            drops: DropSequencer::default(),
        }
    }

    /// Index of the edited object in the registry.
    pub fn object(&self) -> usize {
        self.object
    }

    pub fn model_matrix(&self) -> DMat4 {
        self.model_matrix
    }

    /// The east-north-up frame at the object's position.
    pub fn global_frame(&self) -> DMat4 {
        self.global_frame
    }

    pub fn primitives(&self) -> &GizmoPrimitives {
        &self.primitives
    }

    pub fn phase(&self) -> GizmoPhase {
        self.phase
    }

    /// Returns true while a handle is picked.
    pub fn is_armed(&self) -> bool {
        matches!(self.phase, GizmoPhase::Armed(_))
    }

    /// The handle being dragged, if any.
    pub fn picked_axis(&self) -> Option<GizmoAxis> {
        match self.phase {
            GizmoPhase::Armed(drag) => Some(drag.axis),
            GizmoPhase::Idle => None,
        }
    }

    /// The hover-highlighted handle, if any.
    pub fn highlighted(&self) -> Option<GizmoAxis> {
        self.highlight.map(|h| h.axis)
    }

    /// Replaces the model matrix and recomputes the global frame.
    pub fn set_model_matrix(&mut self, matrix: DMat4, coords: &CoordinateSystem) {
        self.model_matrix = matrix;
        self.global_frame = coords.enu_frame(matrix.w_axis.truncate());
    }

    /// Switches the visible handle family. An armed drag is cancelled.
    ///
    /// Returns true if a drag was cancelled.
    pub fn set_mode(&mut self, mode: GizmoMode) -> bool {
        let cancelled = self.is_armed();
        self.set_highlight(None);
        self.phase = GizmoPhase::Idle;
        self.primitives.set_mode(mode);
        cancelled
    }

    /// Records the cursor position used by the next tick.
    pub fn set_cursor(&mut self, position: DVec2) {
        self.cursor = Some(position);
    }

    /// Highlights the topmost visible handle under the cursor.
    ///
    /// Does nothing while armed.
    pub fn hover(&mut self, scene: &dyn Scene, position: DVec2) -> Option<GizmoAxis> {
        if self.is_armed() {
            return self.highlighted();
        }
        let hit = scene
            .drill_pick(position, HOVER_PICK_LIMIT)
            .iter()
            .filter_map(PickResult::handle)
            .find(|axis| self.primitives.handle(*axis).is_some());
        self.set_highlight(hit);
        hit
    }

    fn set_highlight(&mut self, axis: Option<GizmoAxis>) {
        if self.highlight.map(|h| h.axis) == axis {
            return;
        }
        if let Some(previous) = self.highlight.take() {
            self.primitives.set_color(previous.axis, previous.original);
        }
        if let Some(axis) = axis {
            if let Some(original) = self.primitives.color(axis) {
                self.primitives.set_color(axis, HIGHLIGHT_COLOR);
                self.highlight = Some(Highlight { axis, original });
            }
        }
    }

    /// Arms a drag on the highlighted handle.
    ///
    /// Returns false if no handle is highlighted.
    pub fn press(
        &mut self,
        scene: &dyn Scene,
        position: DVec2,
        config: &GizmoConfig,
        coords: &CoordinateSystem,
        camera: &mut CameraInputs,
    ) -> bool {
        let Some(Highlight { axis, .. }) = self.highlight else {
            return false;
        };
        let ray = scene.pick_ray(position);
        let to_local = Decomposed::of(self.model_matrix, coords)
            .gizmo_frame(config.space)
            .inverse();
        let view = ray.map_or(DVec3::NEG_Z, |r| r.transformed(&to_local).direction);
        let normal = calc::manipulation_normal(config.mode, axis, view);

        self.phase = GizmoPhase::Armed(Drag {
            axis,
            normal,
            previous_ray: ray,
        });
        self.cursor = Some(position);
        self.camera_release_at = None;
        camera.set_all(false);
        log::debug!("gizmo armed on {} handle ({:?})", axis.tag(), config.mode);
        true
    }

    /// Computes one drag tick.
    ///
    /// Returns the new model matrix when the tick commits a change; the
    /// caller pushes it through the gizmo loop. Missing rays or plane
    /// intersections skip the tick.
    pub fn drag(
        &mut self,
        scene: &dyn Scene,
        config: &GizmoConfig,
        coords: &CoordinateSystem,
    ) -> Option<DMat4> {
        let GizmoPhase::Armed(mut drag) = self.phase else {
            return None;
        };
        let ray = scene.pick_ray(self.cursor?)?;
        let Some(previous) = drag.previous_ray else {
            drag.previous_ray = Some(ray);
            self.phase = GizmoPhase::Armed(drag);
            return None;
        };

        let parts = Decomposed::of(self.model_matrix, coords);
        let to_local = parts.gizmo_frame(config.space).inverse();
        let current = ray.transformed(&to_local);
        let previous = previous.transformed(&to_local);

        let choice = calc::select_plane(drag.normal, &current);
        let from = choice.plane().intersect_ray(&previous)?;
        let to = choice.plane().intersect_ray(&current)?;

        let updated = self.manipulate(drag.axis, from, to, &choice, parts, config, coords)?;
        drag.previous_ray = Some(ray);
        self.phase = GizmoPhase::Armed(drag);
        Some(updated)
    }

    #[allow(clippy::too_many_arguments)]
    fn manipulate(
        &self,
        axis: GizmoAxis,
        from: DVec3,
        to: DVec3,
        choice: &PlaneChoice,
        parts: Decomposed,
        config: &GizmoConfig,
        coords: &CoordinateSystem,
    ) -> Option<DMat4> {
        let delta = to - from;
        match (config.mode, axis.direction()) {
            (GizmoMode::Rotate, Some(direction)) => {
                let step = calc::calc_rotation(direction, from, to, choice, config);
                step.commit.then(|| {
                    calc::rotate(self.model_matrix, direction, step.value, config.space, coords)
                })
            }
            (GizmoMode::Scale, Some(_)) => {
                let step = calc::calc_scale(axis, delta, parts.scale, config);
                step.commit
                    .then(|| calc::rescale(self.model_matrix, step.value, coords))
            }
            // translate mode, and the center handle in every mode
            _ => {
                let step = calc::calc_translation(axis, delta, config);
                step.commit.then(|| {
                    calc::translate(self.model_matrix, axis, step.value, config, coords)
                })
            }
        }
    }

    /// Ends a drag gesture.
    ///
    /// Returns true if a drag was armed. Camera navigation comes back once
    /// [`GizmoSession::release_camera`] sees the configured delay elapse.
    pub fn release(&mut self, now: Instant, config: &GizmoConfig) -> bool {
        if !self.is_armed() {
            return false;
        }
        self.phase = GizmoPhase::Idle;
        self.set_highlight(None);
        self.camera_release_at = Some(now + Duration::from_millis(config.camera_release_delay_ms));
        log::debug!("gizmo released");
        true
    }

    /// Re-enables camera navigation once the release delay has passed.
    pub fn release_camera(&mut self, now: Instant, camera: &mut CameraInputs) -> bool {
        match self.camera_release_at {
            Some(at) if now >= at => {
                self.camera_release_at = None;
                camera.set_all(true);
                true
            }
            _ => false,
        }
    }

    /// Issues a terrain drop for the current position.
    pub fn drop_on_terrain(
        &mut self,
        config: &GizmoConfig,
        coords: &CoordinateSystem,
    ) -> DropRequest {
        let id = self.drops.issue();
        let ray = terrain::drop_ray(self.model_matrix.w_axis.truncate(), config.drop_height, coords);
        log::debug!("terrain drop {id} requested");
        DropRequest { id, ray }
    }

    /// Resolves a terrain drop.
    ///
    /// Returns the dropped matrix, or `None` if the request was superseded or
    /// nothing terrain-tagged was hit.
    pub fn complete_drop(&mut self, id: u64, hits: &[RayHit]) -> Option<DMat4> {
        if !self.drops.accept(id) {
            log::debug!("discarding stale terrain drop {id}");
            return None;
        }
        terrain::dropped_matrix(self.model_matrix, hits)
    }
}
