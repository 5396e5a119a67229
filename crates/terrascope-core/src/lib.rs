//! Core abstractions for terrascope.
//!
//! This crate provides the data and math the interactive layer builds on:
//! - [`geo`]: the WGS84 ellipsoid, east-north-up frames, rays and planes
//! - [`projection`] and [`coords`]: pluggable map projections for the inspector
//!   and for horizontal gizmo movement
//! - [`gizmo`] and [`primitive`]: gizmo modes, handles, snapping and handle geometry
//! - [`registry`]: the editable-object registry
//! - [`options`]: JSON-loadable configuration

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Tessellation loops convert small vertex counts to f32
#![allow(clippy::cast_precision_loss)]

pub mod coords;
pub mod error;
pub mod geo;
pub mod gizmo;
pub mod options;
pub mod pick;
pub mod primitive;
pub mod projection;
pub mod registry;

pub use coords::CoordinateSystem;
pub use error::{Result, TerrascopeError};
pub use geo::{angle_between, Cartographic, Ellipsoid, HeadingPitchRoll, Plane, Ray};
pub use gizmo::{
    snap, AxisRange, Bounds, GizmoAxis, GizmoConfig, GizmoMode, GizmoSpace, HIGHLIGHT_COLOR,
};
pub use options::Options;
pub use pick::{first_terrain_hit, PickResult, RayHit};
pub use primitive::{GizmoPrimitiveBuilder, GizmoPrimitives, HandlePrimitive, HandleVertex};
pub use projection::{Geographic, Projection, ProjectionDef, TransverseMercator, WebMercator};
pub use registry::{EditableObject, Registry};

// Re-export glam types for convenience
pub use glam::{DMat3, DMat4, DQuat, DVec2, DVec3};
