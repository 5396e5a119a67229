use crate::context::Context;

use super::{State, StateKind};

/// Free camera navigation.
#[derive(Debug, Default)]
pub struct DefaultState;

impl State for DefaultState {
    fn kind(&self) -> StateKind {
        StateKind::Default
    }

    fn apply(&mut self, ctx: &mut Context) {
        ctx.camera.set_all(true);
        ctx.camera.inertia_enabled = true;
    }

    fn remove(&mut self, _ctx: &mut Context) -> bool {
        true
    }
}
