use crate::context::{Context, InputBinding};

use super::{State, StateKind, TOOLS};

const DEPENDENCIES: &[StateKind] = &[StateKind::Default];
const RESTORE: &[StateKind] = &[StateKind::Information];

/// Transform editing of one object with the gizmo.
///
/// Attaches to `Context::edit_target` on apply. Refuses to be removed while
/// a gizmo drag is armed.
#[derive(Debug, Default)]
pub struct ModelEditState;

impl State for ModelEditState {
    fn kind(&self) -> StateKind {
        StateKind::ModelEdit
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
        let Some(index) = ctx.edit_target else {
            log::warn!("model edit entered without a target object");
            return;
        };
        match ctx.start_gizmo(index) {
            Ok(()) => ctx.bind(InputBinding::GizmoPointer),
            Err(err) => log::warn!("cannot edit object {index}: {err}"),
        }
    }

    fn remove(&mut self, ctx: &mut Context) -> bool {
        if ctx.gizmo_active() {
            return false;
        }
        ctx.stop_gizmo();
        ctx.unbind(InputBinding::GizmoPointer);
        ctx.camera.set_all(true);
        true
    }
}
