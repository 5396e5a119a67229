//! Configuration options for terrascope.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::gizmo::GizmoConfig;
use crate::projection::ProjectionDef;

/// Global configuration options, usually loaded from the viewer's JSON config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Projected coordinate system shown in the inspector and used for
    /// horizontal gizmo movement.
    pub projection: ProjectionDef,

    /// Transformation gizmo settings.
    pub gizmo: GizmoConfig,

    /// Metres moved by one directional nudge.
    pub nudge_step: f64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            projection: ProjectionDef::default(),
            gizmo: GizmoConfig::default(),
            nudge_step: 1.0,
        }
    }
}

impl Options {
    /// Parses options from JSON; absent keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.projection.to_projection()?;
        Ok(options)
    }

    /// Reads options from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let options = Self::from_json_str(&json)?;
        log::info!("loaded options from {}", path.display());
        Ok(options)
    }

    /// Serializes the options as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
