//! Pointer and tick handling.

use std::time::Instant;

use glam::DVec2;
use terrascope_core::Result;

use super::Application;
use crate::context::{InputBinding, Tool};
use crate::gizmo::terrain::DropRequest;
use crate::host::{Modifiers, PointerEvent, PointerKind, Scene};

impl Application {
    /// Routes a pointer event to the gizmo or the active tool.
    ///
    /// Presses and clicks only reach handlers whose binding is qualified by
    /// the event's modifier keys. Releases always end a gizmo drag. Returns a
    /// terrain drop request when a drag ends with clamp-to-ground enabled.
    pub fn handle_pointer(
        &mut self,
        scene: &dyn Scene,
        event: PointerEvent,
        now: Instant,
    ) -> Option<DropRequest> {
        match event.kind {
            PointerKind::Move => {
                self.pointer_move(scene, event.position);
                None
            }
            PointerKind::Down => {
                self.pointer_down(scene, event.position, event.modifiers);
                None
            }
            PointerKind::Up => self.pointer_up(scene, event.position, event.modifiers, now),
        }
    }

    fn pointer_move(&mut self, scene: &dyn Scene, position: DVec2) {
        if let Some(session) = self.context.gizmo_mut() {
            session.set_cursor(position);
            session.hover(scene, position);
        }
    }

    fn pointer_down(&mut self, scene: &dyn Scene, position: DVec2, modifiers: Modifiers) {
        let ctx = &mut self.context;
        let bindings = &ctx.bindings;
        let accepts = |binding: InputBinding| bindings.get(&binding) == Some(&modifiers);

        let picked = || {
            scene
                .drill_pick(position, 1)
                .into_iter()
                .find_map(|pick| pick.world_position)
        };
        match &mut ctx.tool {
            Tool::EditModel(session) if accepts(InputBinding::GizmoPointer) => {
                session.press(
                    scene,
                    position,
                    &ctx.options.gizmo,
                    &ctx.coords,
                    &mut ctx.camera,
                );
            }
            Tool::Measure(measurement) if accepts(InputBinding::MeasurePointer) => {
                if let Some(point) = picked() {
                    measurement.points.push(point);
                }
            }
            Tool::Excavate(sketch) if accepts(InputBinding::ExcavationFinish) => {
                sketch.close();
            }
            Tool::Excavate(sketch) if accepts(InputBinding::ExcavationPointer) => {
                if let Some(point) = picked() {
                    if sketch.closed {
                        sketch.vertices.clear();
                        sketch.closed = false;
                    }
                    sketch.vertices.push(point);
                }
            }
            Tool::Viewshed { observer } if accepts(InputBinding::ViewshedPointer) => {
                *observer = picked();
            }
            _ => {}
        }
    }

    fn pointer_up(
        &mut self,
        scene: &dyn Scene,
        position: DVec2,
        modifiers: Modifiers,
        now: Instant,
    ) -> Option<DropRequest> {
        let ctx = &mut self.context;
        if let Tool::EditModel(session) = &mut ctx.tool {
            let config = &ctx.options.gizmo;
            if session.release(now, config) && config.clamp_to_ground {
                return Some(session.drop_on_terrain(config, &ctx.coords));
            }
            return None;
        }

        if ctx.accepts(InputBinding::ObjectPick, modifiers) {
            if let Some(info) = &mut ctx.info {
                info.selection = scene.drill_pick(position, 1).into_iter().next();
            }
        }
        None
    }

    /// Advances one rendered frame.
    ///
    /// Re-enables the camera once the post-drag delay has passed and applies
    /// one drag step while a handle is armed. Returns true if the edited
    /// object moved.
    pub fn tick(&mut self, scene: &dyn Scene, now: Instant) -> Result<bool> {
        let ctx = &mut self.context;
        let Tool::EditModel(session) = &mut ctx.tool else {
            return Ok(false);
        };
        session.release_camera(now, &mut ctx.camera);
        let Some(matrix) = session.drag(scene, &ctx.options.gizmo, &ctx.coords) else {
            return Ok(false);
        };
        self.context.gizmo_loop(matrix)?;
        Ok(true)
    }
}
