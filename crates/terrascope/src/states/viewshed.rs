use crate::context::{Context, InputBinding, Tool};

use super::{State, StateKind, TOOLS};

const DEPENDENCIES: &[StateKind] = &[StateKind::Default];
const RESTORE: &[StateKind] = &[StateKind::Information];

/// Visibility analysis from an observer point placed by clicking.
#[derive(Debug, Default)]
pub struct ViewshedState;

impl State for ViewshedState {
    fn kind(&self) -> StateKind {
        StateKind::Viewshed
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
        ctx.tool = Tool::Viewshed { observer: None };
        ctx.bind(InputBinding::ViewshedPointer);
    }

    fn remove(&mut self, ctx: &mut Context) -> bool {
        if matches!(ctx.tool, Tool::Viewshed { .. }) {
            ctx.tool = Tool::None;
        }
        ctx.unbind(InputBinding::ViewshedPointer);
        true
    }
}
