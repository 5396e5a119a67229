//! terrascope: the interactive layer of a 3D geospatial viewer.
//!
//! The host engine renders the globe and answers picking queries through the
//! [`Scene`] trait. terrascope decides which interactive tool is active and
//! turns pointer input on the transform gizmo into model matrix updates.
//!
//! # Quick Start
//!
//! ```no_run
//! use terrascope::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let mut app = Application::new(Options::default())?;
//!     app.apply_state(StateKind::Default)?;
//!     app.apply_state(StateKind::Information)?;
//!
//!     let frame = app.context().coords.enu_frame(DVec3::new(4_157_000.0, 671_000.0, 4_774_000.0));
//!     let crane = app.add_object(EditableObject::new("crane", frame));
//!     app.enter_gizmo_edit_mode(crane)?;
//!     app.set_gizmo_mode(GizmoMode::Rotate);
//!     app.nudge(Direction::North)?;
//!     Ok(())
//! }
//! ```
//!
//! # States
//!
//! Interaction modes implement [`State`]. The [`Application`] activates them
//! with [`Application::apply_state`], which honours each state's exclusive,
//! dependent and restore relations.
//!
//! # Gizmo
//!
//! While an object is edited, pointer events go to its [`GizmoSession`] and
//! every [`Application::tick`] applies at most one snapped drag step. All
//! matrix changes go through [`Application::gizmo_loop`], which also keeps
//! the registry and the inspector fields in sync.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Handle dimensions are configured in f64 and meshed in f32
#![allow(clippy::cast_possible_truncation)]

mod app;
pub mod context;
pub mod gizmo;
pub mod host;
mod init;
pub mod inspector;
pub mod states;

pub use app::{Application, Direction};
pub use context::{
    Context, ExcavationSketch, InfoPanel, InputBinding, Measurement, MeasurementKind, Tool,
};
pub use gizmo::calc::{PlaneChoice, Step};
pub use gizmo::terrain::DropRequest;
pub use gizmo::{Drag, GizmoPhase, GizmoSession};
pub use host::{CameraInputs, Modifiers, PointerEvent, PointerKind, Scene};
pub use init::init_logging;
pub use inspector::{InspectorForm, InspectorValues};
pub use states::{State, StateKind, StateRegistry};

// Re-export core types
pub use terrascope_core::{
    AxisRange, Bounds, Cartographic, CoordinateSystem, EditableObject, Ellipsoid, GizmoAxis,
    GizmoConfig, GizmoMode, GizmoSpace, HeadingPitchRoll, Options, PickResult, Plane, Projection,
    ProjectionDef, Ray, RayHit, Registry, Result, TerrascopeError, HIGHLIGHT_COLOR,
};

// Re-export glam types for convenience
pub use glam::{DMat4, DQuat, DVec2, DVec3};
