//! The application controller.
//!
//! [`Application`] owns the session [`Context`], the [`StateRegistry`] and the
//! set of active states. All mode changes go through
//! [`Application::apply_state`] and [`Application::remove_state`].

mod input;

use std::collections::BTreeSet;

use glam::{DMat4, DVec3};
use terrascope_core::{
    EditableObject, GizmoAxis, GizmoConfig, GizmoMode, GizmoSpace, Options, RayHit, Result,
    TerrascopeError,
};

use crate::context::{Context, Tool};
use crate::gizmo::calc;
use crate::gizmo::terrain::DropRequest;
use crate::host::CameraInputs;
use crate::inspector::InspectorForm;
use crate::states::{StateKind, StateRegistry};

/// Directions for nudging the edited object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    East,
    West,
    North,
    South,
    Up,
    Down,
}

impl Direction {
    /// Unit offset in the east-north-up frame.
    pub fn offset(self) -> DVec3 {
        match self {
            Self::East => DVec3::X,
            Self::West => DVec3::NEG_X,
            Self::North => DVec3::Y,
            Self::South => DVec3::NEG_Y,
            Self::Up => DVec3::Z,
            Self::Down => DVec3::NEG_Z,
        }
    }
}

/// Tracks active states and exposes the gizmo API.
#[derive(Debug)]
pub struct Application {
    context: Context,
    states: StateRegistry,
    active: BTreeSet<StateKind>,
}

impl Application {
    /// Creates an application with the built-in states.
    pub fn new(options: Options) -> Result<Self> {
        let states = StateRegistry::with_defaults();
        states.validate()?;
        Self::with_states(options, states)
    }

    /// Creates an application with a custom state registry.
    ///
    /// The registry is taken as is; run [`StateRegistry::validate`] first to
    /// reject cycles up front; otherwise [`Application::apply_state`]
    /// reports them when it runs into one.
    pub fn with_states(options: Options, states: StateRegistry) -> Result<Self> {
        Ok(Self {
            context: Context::new(options)?,
            states,
            active: BTreeSet::new(),
        })
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    pub fn states(&self) -> &StateRegistry {
        &self.states
    }

    /// Camera controller flags the host should apply this frame.
    pub fn camera_inputs(&self) -> CameraInputs {
        self.context.camera
    }

    /// Registers an editable object and returns its index.
    pub fn add_object(&mut self, object: EditableObject) -> usize {
        self.context.registry.register(object)
    }

    pub fn is_active(&self, kind: StateKind) -> bool {
        self.active.contains(&kind)
    }

    /// Active states in kind order.
    pub fn active_states(&self) -> impl Iterator<Item = StateKind> + '_ {
        self.active.iter().copied()
    }

    /// Activates a state.
    ///
    /// An active instance of the same kind is left first. Exclusive states
    /// are deactivated and missing dependencies activated before the state's
    /// own `apply` runs.
    pub fn apply_state(&mut self, kind: StateKind) -> Result<()> {
        let mut in_progress = Vec::new();
        self.activate(kind, &mut in_progress)
    }

    /// Deactivates a state and reactivates its restore states.
    ///
    /// Returns false if the state was not active or vetoed its removal; a
    /// vetoed removal restores nothing.
    pub fn remove_state(&mut self, kind: StateKind) -> Result<bool> {
        self.states.get(kind)?;
        if !self.is_active(kind) {
            return Ok(false);
        }
        let mut in_progress = Vec::new();
        self.deactivate(kind, &mut in_progress, &[])
    }

    fn activate(&mut self, kind: StateKind, in_progress: &mut Vec<StateKind>) -> Result<()> {
        if in_progress.contains(&kind) {
            let mut path: Vec<String> = in_progress.iter().map(|k| k.name().to_string()).collect();
            path.push(kind.name().to_string());
            return Err(TerrascopeError::DependencyCycle(path));
        }
        let (exclusive, dependent) = {
            let state = self.states.get(kind)?;
            (
                state.exclusive_states().to_vec(),
                state.dependent_states().to_vec(),
            )
        };

        in_progress.push(kind);
        let result = self.enter(kind, &exclusive, &dependent, in_progress);
        in_progress.pop();
        result
    }

    fn enter(
        &mut self,
        kind: StateKind,
        exclusive: &[StateKind],
        dependent: &[StateKind],
        in_progress: &mut Vec<StateKind>,
    ) -> Result<()> {
        if self.is_active(kind) {
            // re-entry leaves without restoring anything
            if !self.states.get_mut(kind)?.remove(&mut self.context) {
                log::warn!("state {kind} refused to re-enter");
                return Ok(());
            }
            self.active.remove(&kind);
        }

        for other in exclusive {
            if *other != kind
                && self.is_active(*other)
                && !self.deactivate(*other, in_progress, exclusive)?
            {
                log::warn!("state {other} stays active alongside {kind}");
            }
        }

        for dependency in dependent {
            if !self.is_active(*dependency) {
                self.activate(*dependency, in_progress)?;
            }
        }

        self.states.get_mut(kind)?.apply(&mut self.context);
        self.active.insert(kind);
        log::debug!("state {kind} applied");
        Ok(())
    }

    /// Removes an active state. Restore states listed in `skip` or already
    /// being activated are left alone.
    fn deactivate(
        &mut self,
        kind: StateKind,
        in_progress: &mut Vec<StateKind>,
        skip: &[StateKind],
    ) -> Result<bool> {
        let restore = self.states.get(kind)?.restore_states().to_vec();
        if !self.states.get_mut(kind)?.remove(&mut self.context) {
            log::warn!("state {kind} vetoed its removal");
            return Ok(false);
        }
        self.active.remove(&kind);
        log::debug!("state {kind} removed");

        for other in restore {
            if self.is_active(other) || skip.contains(&other) || in_progress.contains(&other) {
                continue;
            }
            self.activate(other, in_progress)?;
        }
        Ok(true)
    }

    /// Starts editing a registered object with the gizmo.
    ///
    /// Returns false, leaving the current session untouched, while a drag is
    /// armed on the edited object.
    pub fn enter_gizmo_edit_mode(&mut self, index: usize) -> Result<bool> {
        if !self.context.registry.contains(index) {
            return Err(TerrascopeError::ObjectNotFound(index));
        }
        if self.context.gizmo_active() {
            log::warn!("gizmo drag in progress, not switching to object {index}");
            return Ok(false);
        }
        self.context.edit_target = Some(index);
        self.apply_state(StateKind::ModelEdit)?;
        Ok(self
            .context
            .gizmo()
            .is_some_and(|session| session.object() == index))
    }

    /// Stops gizmo editing. Returns false if a drag is still armed.
    pub fn exit_gizmo_edit_mode(&mut self) -> Result<bool> {
        let removed = self.remove_state(StateKind::ModelEdit)?;
        if removed {
            self.context.edit_target = None;
        }
        Ok(removed)
    }

    /// Switches the gizmo mode; only that mode's handles stay visible.
    pub fn set_gizmo_mode(&mut self, mode: GizmoMode) {
        self.context.options.gizmo.mode = mode;
        let cancelled = self
            .context
            .gizmo_mut()
            .is_some_and(|session| session.set_mode(mode));
        if cancelled {
            self.context.camera.set_all(true);
        }
        log::debug!("gizmo mode set to {mode:?}");
    }

    pub fn set_gizmo_space(&mut self, space: GizmoSpace) {
        self.context.options.gizmo.space = space;
    }

    /// Publishes a matrix for the edited object.
    pub fn gizmo_loop(&mut self, matrix: DMat4) -> Result<()> {
        self.context.gizmo_loop(matrix)
    }

    /// Moves the edited object by the configured `nudge_step`.
    pub fn nudge(&mut self, direction: Direction) -> Result<()> {
        self.nudge_by(direction, self.context.options.nudge_step)
    }

    /// Moves the edited object by `step` metres in a geographic direction.
    pub fn nudge_by(&mut self, direction: Direction, step: f64) -> Result<()> {
        let session = self.context.gizmo().ok_or(TerrascopeError::NoActiveGizmo)?;
        let axis = match direction {
            Direction::Up | Direction::Down => GizmoAxis::Z,
            _ => GizmoAxis::Center,
        };
        let config = GizmoConfig {
            space: GizmoSpace::Global,
            ..self.context.options.gizmo.clone()
        };
        let matrix = calc::translate(
            session.model_matrix(),
            axis,
            direction.offset() * step,
            &config,
            &self.context.coords,
        );
        self.gizmo_loop(matrix)
    }

    /// Asks the host to raycast the terrain below the edited object.
    pub fn drop_on_terrain(&mut self) -> Result<DropRequest> {
        let ctx = &mut self.context;
        let Tool::EditModel(session) = &mut ctx.tool else {
            return Err(TerrascopeError::NoActiveGizmo);
        };
        Ok(session.drop_on_terrain(&ctx.options.gizmo, &ctx.coords))
    }

    /// Applies the host's answer to a terrain drop.
    ///
    /// Returns true if the object moved. Answers to superseded requests and
    /// raycasts without a terrain hit leave it in place.
    pub fn complete_drop(&mut self, id: u64, hits: &[RayHit]) -> Result<bool> {
        let session = self
            .context
            .gizmo_mut()
            .ok_or(TerrascopeError::NoActiveGizmo)?;
        match session.complete_drop(id, hits) {
            Some(matrix) => {
                self.gizmo_loop(matrix)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// The inspector fields for the edited object.
    pub fn inspector_form(&self) -> Option<InspectorForm> {
        self.context.inspector.as_ref().map(InspectorForm::from_values)
    }

    /// Applies the inspector fields to the edited object.
    pub fn apply_inspector(&mut self, form: &InspectorForm) -> Result<()> {
        let values = form.parse()?;
        if self.context.gizmo().is_none() {
            return Err(TerrascopeError::NoActiveGizmo);
        }
        let matrix = values.to_matrix(&self.context.options.gizmo, &self.context.coords);
        self.gizmo_loop(matrix)
    }

    /// Closes the excavation outline and returns its vertices.
    pub fn finish_excavation(&mut self) -> Option<Vec<DVec3>> {
        match &mut self.context.tool {
            Tool::Excavate(sketch) => sketch.close().then(|| sketch.vertices.clone()),
            _ => None,
        }
    }

    /// Sets the water level while the overlay is shown.
    pub fn set_water_level(&mut self, level: f64) -> bool {
        match &mut self.context.water_level {
            Some(current) => {
                *current = level;
                true
            }
            None => false,
        }
    }
}
