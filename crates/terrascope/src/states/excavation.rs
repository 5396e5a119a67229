use crate::context::{Context, ExcavationSketch, InputBinding, Tool};
use crate::host::Modifiers;

use super::{State, StateKind, TOOLS};

const DEPENDENCIES: &[StateKind] = &[StateKind::Default];
const RESTORE: &[StateKind] = &[StateKind::Information];

/// Draws an excavation outline into the terrain.
///
/// Plain clicks add vertices and shift-clicks close the outline. Refuses to
/// be removed while an outline is started but not closed.
#[derive(Debug, Default)]
pub struct ExcavationState;

impl State for ExcavationState {
    fn kind(&self) -> StateKind {
        StateKind::Excavation
    }

    fn exclusive_states(&self) -> &[StateKind] {
        TOOLS
    }

    fn restore_states(&self) -> &[StateKind] {
        RESTORE
    }

    fn dependent_states(&self) -> &[StateKind] {
        DEPENDENCIES
    }

    fn apply(&mut self, ctx: &mut Context) {
        ctx.tool = Tool::Excavate(ExcavationSketch::default());
        ctx.bind(InputBinding::ExcavationPointer);
        ctx.bind_with(InputBinding::ExcavationFinish, Modifiers::SHIFT);
    }

    fn remove(&mut self, ctx: &mut Context) -> bool {
        if let Tool::Excavate(sketch) = &ctx.tool {
            if sketch.is_drawing() {
                return false;
            }
            ctx.tool = Tool::None;
        }
        ctx.unbind(InputBinding::ExcavationPointer);
        ctx.unbind(InputBinding::ExcavationFinish);
        true
    }
}
