use crate::context::Context;

use super::{State, StateKind};

const DEPENDENCIES: &[StateKind] = &[StateKind::Default];

/// Floods the scene up to a water level. Overlays any tool.
#[derive(Debug, Default)]
pub struct WaterLevelState {
    /// The level restored when the overlay is shown again.
    last_level: f64,
}

impl State for WaterLevelState {
    fn kind(&self) -> StateKind {
        StateKind::WaterLevel
    }

    fn dependent_states(&self) -> &[StateKind] {
        DEPENDENCIES
    }

    fn apply(&mut self, ctx: &mut Context) {
        ctx.water_level = Some(self.last_level);
    }

    fn remove(&mut self, ctx: &mut Context) -> bool {
        if let Some(level) = ctx.water_level.take() {
            self.last_level = level;
        }
        true
    }
}
