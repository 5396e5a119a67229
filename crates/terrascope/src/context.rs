//! The session context shared by states, the gizmo and the inspector.

use std::collections::BTreeMap;

use glam::{DMat4, DVec3};
use terrascope_core::{
    CoordinateSystem, Options, PickResult, Registry, Result, TerrascopeError,
};

use crate::gizmo::GizmoSession;
use crate::host::{CameraInputs, Modifiers};
use crate::inspector::InspectorValues;

/// Input handlers a state can bind while it is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InputBinding {
    /// Clicks select objects for the info window.
    ObjectPick,
    /// Clicks add measurement points.
    MeasurePointer,
    /// Keyboard walking.
    WalkKeys,
    /// Clicks add excavation outline vertices.
    ExcavationPointer,
    /// Clicks close the excavation outline.
    ExcavationFinish,
    /// Clicks place the viewshed observer.
    ViewshedPointer,
    /// Pointer events drive the transform gizmo.
    GizmoPointer,
}

/// Measurement tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementKind {
    Line,
    Area,
    Height,
}

/// An in-progress measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub kind: MeasurementKind,
    pub points: Vec<DVec3>,
}

impl Measurement {
    pub fn new(kind: MeasurementKind) -> Self {
        Self {
            kind,
            points: Vec::new(),
        }
    }
}

/// The outline of an excavation being drawn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExcavationSketch {
    pub vertices: Vec<DVec3>,
    pub closed: bool,
}

impl ExcavationSketch {
    /// Returns true while an outline has been started but not closed.
    pub fn is_drawing(&self) -> bool {
        !self.vertices.is_empty() && !self.closed
    }

    /// Closes the outline. Returns false if there is nothing to close.
    pub fn close(&mut self) -> bool {
        if self.vertices.is_empty() {
            return false;
        }
        self.closed = true;
        true
    }
}

/// The object information panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfoPanel {
    pub selection: Option<PickResult>,
}

impl InfoPanel {
    pub fn is_window_open(&self) -> bool {
        self.selection.is_some()
    }
}

/// The exclusive interactive tool, if any.
#[derive(Debug, Clone, Default)]
pub enum Tool {
    #[default]
    None,
    Measure(Measurement),
    Walk,
    Excavate(ExcavationSketch),
    Viewshed { observer: Option<DVec3> },
    EditModel(Box<GizmoSession>),
}

/// Everything states and the gizmo read and mutate.
#[derive(Debug)]
pub struct Context {
    pub options: Options,
    pub coords: CoordinateSystem,
    pub registry: Registry,
    /// Authoritative camera controller flags, mirrored by the host.
    pub camera: CameraInputs,
    /// Bound input handlers and the modifiers each one requires.
    pub bindings: BTreeMap<InputBinding, Modifiers>,
    pub tool: Tool,
    /// Present while the information state is active.
    pub info: Option<InfoPanel>,
    /// Present while the water level overlay is active.
    pub water_level: Option<f64>,
    /// The object model edit mode should attach to.
    pub edit_target: Option<usize>,
    /// Inspector fields for the edited object.
    pub inspector: Option<InspectorValues>,
}

impl Context {
    pub fn new(options: Options) -> Result<Self> {
        let coords = CoordinateSystem::from_def(&options.projection)?;
        Ok(Self {
            options,
            coords,
            registry: Registry::new(),
            camera: CameraInputs::default(),
            bindings: BTreeMap::new(),
            tool: Tool::None,
            info: None,
            water_level: None,
            edit_target: None,
            inspector: None,
        })
    }

    /// Binds a handler that fires without modifier keys.
    pub fn bind(&mut self, binding: InputBinding) {
        self.bind_with(binding, Modifiers::NONE);
    }

    /// Binds a handler qualified by modifier keys, replacing any earlier
    /// qualifier.
    pub fn bind_with(&mut self, binding: InputBinding, modifiers: Modifiers) {
        self.bindings.insert(binding, modifiers);
    }

    pub fn unbind(&mut self, binding: InputBinding) {
        self.bindings.remove(&binding);
    }

    pub fn is_bound(&self, binding: InputBinding) -> bool {
        self.bindings.contains_key(&binding)
    }

    /// Returns true if `binding` is bound and qualified by exactly `modifiers`.
    pub fn accepts(&self, binding: InputBinding, modifiers: Modifiers) -> bool {
        self.bindings.get(&binding) == Some(&modifiers)
    }

    pub fn gizmo(&self) -> Option<&GizmoSession> {
        match &self.tool {
            Tool::EditModel(session) => Some(session),
            _ => None,
        }
    }

    pub fn gizmo_mut(&mut self) -> Option<&mut GizmoSession> {
        match &mut self.tool {
            Tool::EditModel(session) => Some(session),
            _ => None,
        }
    }

    /// Returns true while a gizmo drag is armed.
    pub fn gizmo_active(&self) -> bool {
        self.gizmo().is_some_and(GizmoSession::is_armed)
    }

    /// Opens a gizmo session on a registered object.
    pub fn start_gizmo(&mut self, index: usize) -> Result<()> {
        let matrix = self
            .registry
            .transform(index)
            .ok_or(TerrascopeError::ObjectNotFound(index))?;
        let session = GizmoSession::new(index, matrix, &self.options.gizmo, &self.coords);
        self.tool = Tool::EditModel(Box::new(session));
        self.inspector = Some(InspectorValues::read(matrix, &self.coords));
        Ok(())
    }

    /// Closes the gizmo session, if one is open.
    pub fn stop_gizmo(&mut self) -> Option<GizmoSession> {
        match std::mem::take(&mut self.tool) {
            Tool::EditModel(session) => {
                self.inspector = None;
                Some(*session)
            }
            other => {
                self.tool = other;
                None
            }
        }
    }

    /// Publishes a new matrix for the edited object.
    ///
    /// Updates the gizmo, writes the registry entry and refreshes the
    /// inspector. A registry entry that disappeared is skipped silently.
    pub fn gizmo_loop(&mut self, matrix: DMat4) -> Result<()> {
        let Tool::EditModel(session) = &mut self.tool else {
            return Err(TerrascopeError::NoActiveGizmo);
        };
        session.set_model_matrix(matrix, &self.coords);
        if !self.registry.set_transform(session.object(), matrix) {
            log::debug!(
                "object {} is gone, only the gizmo was updated",
                session.object()
            );
        }
        self.inspector = Some(InspectorValues::read(matrix, &self.coords));
        Ok(())
    }
}
