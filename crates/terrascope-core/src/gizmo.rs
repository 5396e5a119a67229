//! Transformation gizmo value types.
//!
//! The interactive part lives in the `terrascope` crate; this module holds
//! the modes, handles, configuration and snapping rules it works with.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// The type of transformation gizmo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GizmoMode {
    /// Translation gizmo (arrows along axes).
    #[default]
    Translate,
    /// Rotation gizmo (rings around axes).
    Rotate,
    /// Scale gizmo (cubes at the axis tips).
    Scale,
}

impl GizmoMode {
    /// All modes in toolbar order.
    pub const ALL: [Self; 3] = [Self::Translate, Self::Rotate, Self::Scale];
}

/// The coordinate space for gizmo operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GizmoSpace {
    /// Axes follow the east-north-up frame at the object.
    #[default]
    Global,
    /// Axes follow the object's own rotation.
    Local,
}

/// A pickable gizmo handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GizmoAxis {
    /// X axis (red).
    X,
    /// Y axis (green).
    Y,
    /// Z axis (blue).
    Z,
    /// Center handle: planar movement in the horizontal plane.
    Center,
}

impl GizmoAxis {
    /// All handles.
    pub const ALL: [Self; 4] = [Self::X, Self::Y, Self::Z, Self::Center];

    /// The identifier attached to the handle's geometry for picking.
    pub fn tag(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
            Self::Center => "center",
        }
    }

    /// Looks up a handle by its pick identifier.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "z" => Some(Self::Z),
            "center" => Some(Self::Center),
            _ => None,
        }
    }

    /// Returns the unit direction for single-axis handles.
    pub fn direction(self) -> Option<DVec3> {
        match self {
            Self::X => Some(DVec3::X),
            Self::Y => Some(DVec3::Y),
            Self::Z => Some(DVec3::Z),
            Self::Center => None,
        }
    }

    /// Returns the resting color for this handle.
    pub fn color(self) -> [f32; 4] {
        match self {
            Self::X => [1.0, 0.2, 0.2, 1.0],      // Red
            Self::Y => [0.2, 1.0, 0.2, 1.0],      // Green
            Self::Z => [0.2, 0.2, 1.0, 1.0],      // Blue
            Self::Center => [1.0, 0.6, 0.0, 1.0], // Orange
        }
    }
}

/// Color applied to the hovered handle.
pub const HIGHLIGHT_COLOR: [f32; 4] = [1.0, 1.0, 0.0, 1.0];

/// An inclusive range that clips a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn clip(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

/// Optional boundary clipping for positions in the projected system.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Bounds {
    pub easting: Option<AxisRange>,
    pub northing: Option<AxisRange>,
    pub height: Option<AxisRange>,
}

impl Bounds {
    /// Clips `(easting, northing, height)` to the configured ranges.
    pub fn clip(&self, position: DVec3) -> DVec3 {
        let clip = |range: Option<AxisRange>, value: f64| range.map_or(value, |r| r.clip(value));
        DVec3::new(
            clip(self.easting, position.x),
            clip(self.northing, position.y),
            clip(self.height, position.z),
        )
    }
}

/// Configuration for the transformation gizmo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GizmoConfig {
    /// The current gizmo mode.
    pub mode: GizmoMode,
    /// The coordinate space.
    pub space: GizmoSpace,
    /// Handle length in metres.
    pub length: f64,
    /// Shaft radius in metres.
    pub radius: f64,
    /// Translation increment in metres.
    pub translation_snap: Option<f64>,
    /// Rotation increment in degrees.
    pub rotation_snap: Option<f64>,
    /// Scale increment.
    pub scale_snap: Option<f64>,
    /// Multiplier applied to raw translation deltas.
    pub translation_scaler: f64,
    /// Multiplier applied to raw rotation deltas.
    pub rotation_scaler: f64,
    /// Multiplier applied to raw scale deltas.
    pub scale_scaler: f64,
    /// Lower bound for every scale component.
    pub min_scale: f64,
    /// Scale all axes together.
    pub uniform_scale: bool,
    /// Drop the object onto the terrain after each drag.
    pub clamp_to_ground: bool,
    /// Position clipping in the projected system.
    pub bounds: Bounds,
    /// Delay before camera navigation is re-enabled after a drag.
    pub camera_release_delay_ms: u64,
    /// Height above the object where the terrain drop ray starts.
    pub drop_height: f64,
}

impl Default for GizmoConfig {
    fn default() -> Self {
        Self {
            mode: GizmoMode::Translate,
            space: GizmoSpace::Global,
            length: 10.0,
            radius: 0.15,
            translation_snap: None,
            rotation_snap: None,
            scale_snap: None,
            translation_scaler: 1.0,
            rotation_scaler: 1.0,
            scale_scaler: 0.1,
            min_scale: 0.01,
            uniform_scale: false,
            clamp_to_ground: false,
            bounds: Bounds::default(),
            camera_release_delay_ms: 250,
            drop_height: 10_000.0,
        }
    }
}

impl GizmoConfig {
    /// Creates a new gizmo configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the gizmo mode.
    #[must_use]
    pub fn with_mode(mut self, mode: GizmoMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the coordinate space.
    #[must_use]
    pub fn with_space(mut self, space: GizmoSpace) -> Self {
        self.space = space;
        self
    }

    /// Sets the translation snap increment in metres.
    #[must_use]
    pub fn with_translation_snap(mut self, snap: f64) -> Self {
        self.translation_snap = Some(snap);
        self
    }

    /// Sets the rotation snap increment in degrees.
    #[must_use]
    pub fn with_rotation_snap(mut self, snap_degrees: f64) -> Self {
        self.rotation_snap = Some(snap_degrees);
        self
    }

    /// Sets the scale snap increment.
    #[must_use]
    pub fn with_scale_snap(mut self, snap: f64) -> Self {
        self.scale_snap = Some(snap);
        self
    }

    /// Sets the minimum scale.
    #[must_use]
    pub fn with_min_scale(mut self, min_scale: f64) -> Self {
        self.min_scale = min_scale;
        self
    }

    /// Effective translation increment; non-positive values count as unset.
    pub fn translation_increment(&self) -> Option<f64> {
        valid_increment(self.translation_snap)
    }

    /// Effective rotation increment in radians.
    pub fn rotation_increment(&self) -> Option<f64> {
        valid_increment(self.rotation_snap).map(f64::to_radians)
    }

    /// Effective scale increment.
    pub fn scale_increment(&self) -> Option<f64> {
        valid_increment(self.scale_snap)
    }

    /// Effective scale floor. Never below `f64::EPSILON` so matrices stay invertible.
    pub fn scale_floor(&self) -> f64 {
        if self.min_scale.is_finite() {
            self.min_scale.max(f64::EPSILON)
        } else {
            f64::EPSILON
        }
    }
}

fn valid_increment(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Rounds `value` to the nearest multiple of `increment`, or returns it unchanged.
pub fn snap(value: f64, increment: Option<f64>) -> f64 {
    match increment {
        Some(step) => (value / step).round() * step,
        None => value,
    }
}
