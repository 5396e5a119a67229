use crate::context::{Context, InputBinding, Tool};

use super::{State, StateKind};

const EXCLUSIVE: &[StateKind] = &[
    StateKind::Default,
    StateKind::Information,
    StateKind::LineMeasurement,
    StateKind::AreaMeasurement,
    StateKind::HeightMeasurement,
    StateKind::Excavation,
    StateKind::Viewshed,
    StateKind::ModelEdit,
];
const RESTORE: &[StateKind] = &[StateKind::Default, StateKind::Information];

/// First-person walking at street level.
///
/// Takes the camera over from free navigation: only looking around stays
/// enabled and inertia is switched off while walking.
#[derive(Debug, Default)]
pub struct PedestrianState;

impl State for PedestrianState {
    fn kind(&self) -> StateKind {
        StateKind::Pedestrian
    }

    fn exclusive_states(&self) -> &[StateKind] {
        EXCLUSIVE
    }

    fn restore_states(&self) -> &[StateKind] {
        RESTORE
    }

    fn apply(&mut self, ctx: &mut Context) {
        ctx.tool = Tool::Walk;
        ctx.camera.set_all(false);
        ctx.camera.enable_look = true;
        ctx.camera.inertia_enabled = false;
        ctx.bind(InputBinding::WalkKeys);
    }

    fn remove(&mut self, ctx: &mut Context) -> bool {
        if matches!(ctx.tool, Tool::Walk) {
            ctx.tool = Tool::None;
        }
        ctx.camera.set_all(true);
        ctx.camera.inertia_enabled = true;
        ctx.unbind(InputBinding::WalkKeys);
        true
    }
}
