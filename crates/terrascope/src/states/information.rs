use crate::context::{Context, InfoPanel, InputBinding};

use super::{State, StateKind};

/// Clicking an object shows its attributes in the info window.
#[derive(Debug, Default)]
pub struct InformationState;

impl State for InformationState {
    fn kind(&self) -> StateKind {
        StateKind::Information
    }

    fn apply(&mut self, ctx: &mut Context) {
        ctx.info = Some(InfoPanel::default());
        ctx.bind(InputBinding::ObjectPick);
    }

    fn remove(&mut self, ctx: &mut Context) -> bool {
        // closes the window with it
        ctx.info = None;
        ctx.unbind(InputBinding::ObjectPick);
        true
    }
}
