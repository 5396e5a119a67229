//! Per-tick manipulation arithmetic.
//!
//! All vectors here live in the gizmo frame: the east-north-up frame at the
//! object in global space, or that frame rotated by the object in local space.
//! The frame origin is the object position, so every manipulation plane passes
//! through the origin.

use glam::{DMat4, DQuat, DVec3};
use terrascope_core::{
    angle_between, snap, CoordinateSystem, GizmoAxis, GizmoConfig, GizmoMode, GizmoSpace, Plane,
    Ray,
};

/// Incidence band, in degrees between view ray and plane normal, where the
/// axis plane is replaced by a camera-facing plane.
pub const GRAZING_BAND: (f64, f64) = (85.0, 95.0);

const EPSILON: f64 = 1e-9;

/// The plane a drag tick intersects the view rays with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaneChoice {
    /// The plane defined by the picked handle.
    Axis(Plane),
    /// A plane facing the camera, used near grazing incidence.
    CameraFacing(Plane),
}

impl PlaneChoice {
    pub fn plane(&self) -> &Plane {
        match self {
            Self::Axis(plane) | Self::CameraFacing(plane) => plane,
        }
    }

    pub fn is_camera_facing(&self) -> bool {
        matches!(self, Self::CameraFacing(_))
    }
}

/// The outcome of one tick's delta computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step<T> {
    /// The delta (or resulting value) to commit.
    pub value: T,
    /// False when snapping rounded the movement away and the tick is a no-op.
    pub commit: bool,
}

/// Chooses the manipulation-plane normal for a handle.
///
/// `view` is the camera ray direction in the gizmo frame at pointer-down.
pub fn manipulation_normal(mode: GizmoMode, axis: GizmoAxis, view: DVec3) -> DVec3 {
    match (mode, axis) {
        (GizmoMode::Rotate, GizmoAxis::X) => DVec3::X,
        (GizmoMode::Rotate, GizmoAxis::Y) => DVec3::Y,
        (GizmoMode::Rotate, GizmoAxis::Z) => DVec3::Z,
        (_, GizmoAxis::Z) => {
            // vertical plane through Z, turned towards the camera
            let horizontal = DVec3::new(view.x, view.y, 0.0);
            if horizontal.length_squared() < EPSILON {
                DVec3::Y
            } else {
                horizontal.normalize()
            }
        }
        _ => DVec3::Z,
    }
}

/// Returns the axis plane through the origin, or the camera-facing plane when
/// the ray meets the axis plane at a grazing angle.
pub fn select_plane(normal: DVec3, ray: &Ray) -> PlaneChoice {
    let incidence = angle_between(ray.direction, normal).to_degrees();
    if (GRAZING_BAND.0..=GRAZING_BAND.1).contains(&incidence) {
        PlaneChoice::CameraFacing(Plane::from_point_normal(DVec3::ZERO, -ray.direction))
    } else {
        PlaneChoice::Axis(Plane::from_point_normal(DVec3::ZERO, normal))
    }
}

/// Masks a raw delta to the components a handle moves along.
fn mask(axis: GizmoAxis, delta: DVec3) -> DVec3 {
    match axis {
        GizmoAxis::X => DVec3::new(delta.x, 0.0, 0.0),
        GizmoAxis::Y => DVec3::new(0.0, delta.y, 0.0),
        GizmoAxis::Z => DVec3::new(0.0, 0.0, delta.z),
        GizmoAxis::Center => DVec3::new(delta.x, delta.y, 0.0),
    }
}

/// Scales and snaps a translation delta.
///
/// Each relevant component is rounded to the nearest multiple of the
/// translation increment; the step does not commit if all of them round to
/// zero.
pub fn calc_translation(axis: GizmoAxis, delta: DVec3, config: &GizmoConfig) -> Step<DVec3> {
    let increment = config.translation_increment();
    let scaled = mask(axis, delta) * config.translation_scaler;
    let value = DVec3::new(
        snap(scaled.x, increment),
        snap(scaled.y, increment),
        snap(scaled.z, increment),
    );
    Step {
        value,
        commit: value.abs().max_element() > EPSILON,
    }
}

/// Computes the signed rotation angle in radians between two plane hits.
///
/// On an axis plane the angle is measured between the hits as seen from the
/// origin, with its sign taken from the plane normal. On a camera-facing plane
/// the movement is converted to an arc length around `axis_direction` and
/// divided by the radius.
pub fn calc_rotation(
    axis_direction: DVec3,
    from: DVec3,
    to: DVec3,
    plane: &PlaneChoice,
    config: &GizmoConfig,
) -> Step<f64> {
    let raw = match plane {
        PlaneChoice::Axis(plane) => {
            let a = from.normalize_or_zero();
            let b = to.normalize_or_zero();
            if a == DVec3::ZERO || b == DVec3::ZERO {
                0.0
            } else {
                let angle = angle_between(a, b);
                if a.cross(b).dot(plane.normal) < 0.0 {
                    -angle
                } else {
                    angle
                }
            }
        }
        PlaneChoice::CameraFacing(_) => {
            let tangent = axis_direction.cross(from);
            let radius = tangent.length();
            if radius < EPSILON {
                0.0
            } else {
                (to - from).dot(tangent / radius) / radius
            }
        }
    };
    let value = snap(raw * config.rotation_scaler, config.rotation_increment());
    Step {
        value,
        commit: value.abs() > EPSILON,
    }
}

/// Applies a scale delta along a handle and returns the resulting scale.
///
/// The result never drops below the configured scale floor.
pub fn calc_scale(
    axis: GizmoAxis,
    delta: DVec3,
    current: DVec3,
    config: &GizmoConfig,
) -> Step<DVec3> {
    let raw = match axis {
        GizmoAxis::X => delta.x,
        GizmoAxis::Y => delta.y,
        GizmoAxis::Z => delta.z,
        GizmoAxis::Center => 0.0,
    };
    let amount = snap(raw * config.scale_scaler, config.scale_increment());
    if amount.abs() <= EPSILON {
        return Step {
            value: current,
            commit: false,
        };
    }
    let added = if config.uniform_scale {
        current + DVec3::splat(amount)
    } else {
        current + mask(axis, DVec3::splat(amount))
    };
    let value = added.max(DVec3::splat(config.scale_floor()));
    Step {
        value,
        commit: value != current,
    }
}

/// A model matrix split relative to the east-north-up frame at its position.
#[derive(Debug, Clone, Copy)]
pub struct Decomposed {
    pub translation: DVec3,
    pub frame: DMat4,
    pub rotation: DQuat,
    pub scale: DVec3,
}

impl Decomposed {
    pub fn of(model: DMat4, coords: &CoordinateSystem) -> Self {
        let translation = model.w_axis.truncate();
        let frame = coords.enu_frame(translation);
        let (scale, rotation, _) = (frame.inverse() * model).to_scale_rotation_translation();
        Self {
            translation,
            frame,
            rotation,
            scale,
        }
    }

    /// Reassembles the matrix on a (possibly new) east-north-up frame.
    pub fn compose(frame: DMat4, rotation: DQuat, scale: DVec3) -> DMat4 {
        frame * DMat4::from_scale_rotation_translation(scale, rotation, DVec3::ZERO)
    }

    /// The gizmo frame for a manipulation space.
    pub fn gizmo_frame(&self, space: GizmoSpace) -> DMat4 {
        match space {
            GizmoSpace::Global => self.frame,
            GizmoSpace::Local => self.frame * DMat4::from_quat(self.rotation),
        }
    }
}

/// Moves a model matrix by a gizmo-frame delta.
///
/// The delta is in ground metres whatever projection is configured.
/// Horizontal movement follows the ellipsoid: the object lands at the
/// geodetic position of the moved point, keeping its height above the
/// ellipsoid plus the vertical part of the delta. Pure vertical movement is
/// applied along the local up axis. Both results are clipped to the
/// configured bounds, and the object keeps its orientation relative to the
/// local east-north-up frame.
pub fn translate(
    model: DMat4,
    axis: GizmoAxis,
    delta: DVec3,
    config: &GizmoConfig,
    coords: &CoordinateSystem,
) -> DMat4 {
    let parts = Decomposed::of(model, coords);
    let delta = match config.space {
        GizmoSpace::Global => delta,
        GizmoSpace::Local => parts.rotation * delta,
    };
    let target = parts.translation + parts.frame.transform_vector3(delta);
    let world = if axis == GizmoAxis::Z {
        target
    } else {
        let ellipsoid = &coords.ellipsoid;
        let mut position = ellipsoid.cartesian_to_cartographic(target);
        position.height = ellipsoid.cartesian_to_cartographic(parts.translation).height + delta.z;
        ellipsoid.cartographic_to_cartesian(position)
    };
    let translation = coords.clip(world, &config.bounds);
    Decomposed::compose(coords.enu_frame(translation), parts.rotation, parts.scale)
}

/// Rotates a model matrix about a gizmo-frame axis.
pub fn rotate(
    model: DMat4,
    axis_direction: DVec3,
    angle: f64,
    space: GizmoSpace,
    coords: &CoordinateSystem,
) -> DMat4 {
    let parts = Decomposed::of(model, coords);
    let delta = DQuat::from_axis_angle(axis_direction, angle);
    let rotation = match space {
        GizmoSpace::Global => delta * parts.rotation,
        GizmoSpace::Local => parts.rotation * delta,
    };
    Decomposed::compose(parts.frame, rotation.normalize(), parts.scale)
}

/// Replaces the scale of a model matrix.
pub fn rescale(model: DMat4, scale: DVec3, coords: &CoordinateSystem) -> DMat4 {
    let parts = Decomposed::of(model, coords);
    Decomposed::compose(parts.frame, parts.rotation, scale)
}
