//! Numeric transform fields bound to the edited object's matrix.
//!
//! Position is shown in the configured projected system as easting, northing
//! and height. Rotation is shown in degrees about the object's east-north-up
//! frame and composes as `Rz * Ry * Rx`, so X matches roll, Y the negated
//! pitch and Z the negated heading. Scale is the per-axis factor.

use glam::{DMat4, DVec3};
use terrascope_core::{
    CoordinateSystem, GizmoConfig, HeadingPitchRoll, Result, TerrascopeError,
};

use crate::gizmo::calc::Decomposed;

/// The values shown by the inspector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InspectorValues {
    pub easting: f64,
    pub northing: f64,
    pub height: f64,
    /// Rotation about X, Y and Z in degrees.
    pub rotation: DVec3,
    pub scale: DVec3,
}

impl InspectorValues {
    /// Reads the fields from a model matrix.
    pub fn read(matrix: DMat4, coords: &CoordinateSystem) -> Self {
        let parts = Decomposed::of(matrix, coords);
        let position = coords.to_projected(parts.translation);
        let hpr = HeadingPitchRoll::from_quat(parts.rotation);
        let rotation = DVec3::new(hpr.roll, -hpr.pitch, -hpr.heading);
        Self {
            easting: position.x,
            northing: position.y,
            height: position.z,
            rotation: rotation * (180.0 / std::f64::consts::PI),
            scale: parts.scale,
        }
    }

    /// The rotation fields as heading, pitch and roll.
    pub fn orientation(&self) -> HeadingPitchRoll {
        HeadingPitchRoll::new(
            -self.rotation.z.to_radians(),
            -self.rotation.y.to_radians(),
            self.rotation.x.to_radians(),
        )
    }

    /// Builds the model matrix for these fields.
    ///
    /// The position is clipped to the configured bounds and every scale
    /// component is raised to the scale floor.
    pub fn to_matrix(&self, config: &GizmoConfig, coords: &CoordinateSystem) -> DMat4 {
        let projected = config
            .bounds
            .clip(DVec3::new(self.easting, self.northing, self.height));
        let world = coords.from_projected(projected);
        let rotation = self.orientation().to_quat();
        let scale = self.scale.max(DVec3::splat(config.scale_floor()));
        Decomposed::compose(coords.enu_frame(world), rotation, scale)
    }
}

/// The inspector's text fields as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InspectorForm {
    pub easting: String,
    pub northing: String,
    pub height: String,
    pub rotation_x: String,
    pub rotation_y: String,
    pub rotation_z: String,
    pub scale_x: String,
    pub scale_y: String,
    pub scale_z: String,
}

impl InspectorForm {
    /// Fills the fields from values, using the shortest exact representation.
    pub fn from_values(values: &InspectorValues) -> Self {
        Self {
            easting: values.easting.to_string(),
            northing: values.northing.to_string(),
            height: values.height.to_string(),
            rotation_x: values.rotation.x.to_string(),
            rotation_y: values.rotation.y.to_string(),
            rotation_z: values.rotation.z.to_string(),
            scale_x: values.scale.x.to_string(),
            scale_y: values.scale.y.to_string(),
            scale_z: values.scale.z.to_string(),
        }
    }

    /// Parses every field.
    ///
    /// Fails with [`TerrascopeError::InvalidField`] naming the first field
    /// that is not a finite number.
    pub fn parse(&self) -> Result<InspectorValues> {
        Ok(InspectorValues {
            easting: parse_field("easting", &self.easting)?,
            northing: parse_field("northing", &self.northing)?,
            height: parse_field("height", &self.height)?,
            rotation: DVec3::new(
                parse_field("rotation_x", &self.rotation_x)?,
                parse_field("rotation_y", &self.rotation_y)?,
                parse_field("rotation_z", &self.rotation_z)?,
            ),
            scale: DVec3::new(
                parse_field("scale_x", &self.scale_x)?,
                parse_field("scale_y", &self.scale_y)?,
                parse_field("scale_z", &self.scale_z)?,
            ),
        })
    }
}

fn parse_field(field: &'static str, text: &str) -> Result<f64> {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(TerrascopeError::InvalidField {
            field,
            value: text.to_string(),
        }),
    }
}
