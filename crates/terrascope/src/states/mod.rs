//! Interactive tool states.
//!
//! A [`State`] is one interaction mode of the viewer. It declares three
//! relations to other states, all by [`StateKind`]:
//!
//! - exclusive states are deactivated when it activates
//! - dependent states must be active first and are activated if missing
//! - restore states are reactivated when it deactivates
//!
//! One long-lived instance per kind lives in the [`StateRegistry`]; the
//! [`Application`](crate::Application) decides which of them are active.

mod default;
mod excavation;
mod information;
mod measurement;
mod model_edit;
mod pedestrian;
mod viewshed;
mod water_level;

use std::collections::HashMap;
use std::fmt;

use terrascope_core::{Result, TerrascopeError};

use crate::context::Context;

pub use default::DefaultState;
pub use excavation::ExcavationState;
pub use information::InformationState;
pub use measurement::MeasurementState;
pub use model_edit::ModelEditState;
pub use pedestrian::PedestrianState;
pub use viewshed::ViewshedState;
pub use water_level::WaterLevelState;

/// Identifies a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StateKind {
    Default,
    Information,
    LineMeasurement,
    AreaMeasurement,
    HeightMeasurement,
    Pedestrian,
    Excavation,
    Viewshed,
    WaterLevel,
    ModelEdit,
}

impl StateKind {
    pub const ALL: [Self; 10] = [
        Self::Default,
        Self::Information,
        Self::LineMeasurement,
        Self::AreaMeasurement,
        Self::HeightMeasurement,
        Self::Pedestrian,
        Self::Excavation,
        Self::Viewshed,
        Self::WaterLevel,
        Self::ModelEdit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Information => "information",
            Self::LineMeasurement => "line_measurement",
            Self::AreaMeasurement => "area_measurement",
            Self::HeightMeasurement => "height_measurement",
            Self::Pedestrian => "pedestrian",
            Self::Excavation => "excavation",
            Self::Viewshed => "viewshed",
            Self::WaterLevel => "water_level",
            Self::ModelEdit => "model_edit",
        }
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pointer tools and the information panel. Each excludes all the others.
pub(crate) const TOOLS: &[StateKind] = &[
    StateKind::Information,
    StateKind::LineMeasurement,
    StateKind::AreaMeasurement,
    StateKind::HeightMeasurement,
    StateKind::Pedestrian,
    StateKind::Excavation,
    StateKind::Viewshed,
    StateKind::ModelEdit,
];

/// An interaction mode with an apply/remove lifecycle.
pub trait State {
    /// The kind this instance is registered under.
    fn kind(&self) -> StateKind;

    /// States deactivated when this one activates.
    fn exclusive_states(&self) -> &[StateKind] {
        &[]
    }

    /// States reactivated when this one deactivates.
    fn restore_states(&self) -> &[StateKind] {
        &[]
    }

    /// States that must be active before this one.
    fn dependent_states(&self) -> &[StateKind] {
        &[]
    }

    /// Enters the state.
    fn apply(&mut self, ctx: &mut Context);

    /// Leaves the state. Returning false vetoes the removal.
    fn remove(&mut self, ctx: &mut Context) -> bool;
}

/// Owns one instance per state kind.
pub struct StateRegistry {
    states: HashMap<StateKind, Box<dyn State>>,
}

impl StateRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
        }
    }

    /// Creates a registry with the built-in state for every kind.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(DefaultState));
        registry.register(Box::new(InformationState));
        registry.register(Box::new(MeasurementState::line()));
        registry.register(Box::new(MeasurementState::area()));
        registry.register(Box::new(MeasurementState::height()));
        registry.register(Box::new(PedestrianState));
        registry.register(Box::new(ExcavationState));
        registry.register(Box::new(ViewshedState));
        registry.register(Box::new(WaterLevelState::default()));
        registry.register(Box::new(ModelEditState));
        registry
    }

    /// Registers a state under its kind, returning the instance it replaces.
    pub fn register(&mut self, state: Box<dyn State>) -> Option<Box<dyn State>> {
        self.states.insert(state.kind(), state)
    }

    pub fn contains(&self, kind: StateKind) -> bool {
        self.states.contains_key(&kind)
    }

    pub fn get(&self, kind: StateKind) -> Result<&dyn State> {
        self.states
            .get(&kind)
            .map(Box::as_ref)
            .ok_or_else(|| TerrascopeError::StateNotRegistered(kind.name().to_string()))
    }

    pub fn get_mut(&mut self, kind: StateKind) -> Result<&mut Box<dyn State>> {
        self.states
            .get_mut(&kind)
            .ok_or_else(|| TerrascopeError::StateNotRegistered(kind.name().to_string()))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Checks that every referenced state is registered and that the
    /// dependency graph has no cycles.
    pub fn validate(&self) -> Result<()> {
        for state in self.states.values() {
            for kind in state
                .exclusive_states()
                .iter()
                .chain(state.restore_states())
                .chain(state.dependent_states())
            {
                self.get(*kind)?;
            }
        }

        let mut done = Vec::new();
        let mut kinds: Vec<StateKind> = self.states.keys().copied().collect();
        kinds.sort();
        for kind in kinds {
            let mut path = Vec::new();
            self.visit(kind, &mut path, &mut done)?;
        }
        Ok(())
    }

    fn visit(
        &self,
        kind: StateKind,
        path: &mut Vec<StateKind>,
        done: &mut Vec<StateKind>,
    ) -> Result<()> {
        if done.contains(&kind) {
            return Ok(());
        }
        if let Some(start) = path.iter().position(|k| *k == kind) {
            let mut cycle: Vec<String> = path[start..].iter().map(|k| k.name().to_string()).collect();
            cycle.push(kind.name().to_string());
            return Err(TerrascopeError::DependencyCycle(cycle));
        }
        path.push(kind);
        for dependency in self.get(kind)?.dependent_states() {
            self.visit(*dependency, path, done)?;
        }
        path.pop();
        done.push(kind);
        Ok(())
    }
}

impl Default for StateRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for StateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<StateKind> = self.states.keys().copied().collect();
        kinds.sort();
        f.debug_struct("StateRegistry")
            .field("states", &kinds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Linked {
        kind: StateKind,
        dependencies: Vec<StateKind>,
    }

    impl State for Linked {
        fn kind(&self) -> StateKind {
            self.kind
        }

        fn dependent_states(&self) -> &[StateKind] {
            &self.dependencies
        }

        fn apply(&mut self, _ctx: &mut Context) {}

        fn remove(&mut self, _ctx: &mut Context) -> bool {
            true
        }
    }

    #[test]
    fn test_default_registry_is_complete_and_acyclic() {
        let registry = StateRegistry::with_defaults();
        assert_eq!(registry.len(), StateKind::ALL.len());
        for kind in StateKind::ALL {
            assert_eq!(registry.get(kind).unwrap().kind(), kind);
        }
        registry.validate().unwrap();
    }

    #[test]
    fn test_validate_reports_cycle() {
        let mut registry = StateRegistry::new();
        registry.register(Box::new(Linked {
            kind: StateKind::Viewshed,
            dependencies: vec![StateKind::WaterLevel],
        }));
        registry.register(Box::new(Linked {
            kind: StateKind::WaterLevel,
            dependencies: vec![StateKind::Viewshed],
        }));
        match registry.validate() {
            Err(TerrascopeError::DependencyCycle(path)) => {
                assert_eq!(path, ["viewshed", "water_level", "viewshed"]);
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_reports_missing_state() {
        let mut registry = StateRegistry::new();
        registry.register(Box::new(Linked {
            kind: StateKind::Viewshed,
            dependencies: vec![StateKind::Default],
        }));
        assert!(matches!(
            registry.validate(),
            Err(TerrascopeError::StateNotRegistered(name)) if name == "default"
        ));
    }

    #[test]
    fn test_register_replaces_instance() {
        let mut registry = StateRegistry::with_defaults();
        let previous = registry.register(Box::new(Linked {
            kind: StateKind::Excavation,
            dependencies: Vec::new(),
        }));
        assert!(previous.is_some());
        assert!(registry.get(StateKind::Excavation).unwrap().dependent_states().is_empty());
    }
}
