//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use terrascope::*;

/// A host scene looking down at an object from a fixed eye point.
///
/// Screen positions are metres east and north of the object on its local
/// horizontal plane, so a cursor offset of `(dx, dy)` moves the plane hit by
/// exactly that much.
pub struct FakeScene {
    pub frame: DMat4,
    pub eye: DVec3,
    pub picks: Vec<PickResult>,
    /// When set, no pick ray can be built.
    pub blind: bool,
}

impl FakeScene {
    pub fn looking_at(frame: DMat4) -> Self {
        Self {
            frame,
            eye: DVec3::new(0.0, -60.0, 120.0),
            picks: Vec::new(),
            blind: false,
        }
    }

    /// Makes the next drill picks report a gizmo handle on top.
    pub fn hover_handle(&mut self, axis: GizmoAxis) {
        self.picks = vec![PickResult::new(axis.tag()), PickResult::new("building")];
    }

    /// Makes the next drill picks report a surface point.
    pub fn hover_point(&mut self, position: DVec3) {
        self.picks = vec![PickResult::new("terrain").with_position(position)];
    }
}

impl Scene for FakeScene {
    fn drill_pick(&self, _position: DVec2, limit: usize) -> Vec<PickResult> {
        self.picks.iter().take(limit).cloned().collect()
    }

    fn pick_ray(&self, position: DVec2) -> Option<Ray> {
        if self.blind {
            return None;
        }
        let target = DVec3::new(position.x, position.y, 0.0);
        Some(Ray::new(
            self.frame.transform_point3(self.eye),
            self.frame.transform_vector3(target - self.eye),
        ))
    }
}

/// ECEF position of the test site.
pub fn site(coords: &CoordinateSystem) -> DVec3 {
    coords
        .ellipsoid
        .cartographic_to_cartesian(Cartographic::from_degrees(9.18, 48.78, 250.0))
}

/// An application editing one object placed upright at the test site.
pub fn editing(options: Options) -> (Application, usize, FakeScene) {
    let mut app = Application::new(options).expect("application");
    let frame = app.context().coords.enu_frame(site(&app.context().coords));
    let index = app.add_object(EditableObject::new("crane", frame));
    assert!(app.enter_gizmo_edit_mode(index).expect("edit mode"));
    (app, index, FakeScene::looking_at(frame))
}

/// An application editing one object, using `projection` for the inspector.
pub fn editing_in(projection: ProjectionDef) -> (Application, usize, FakeScene) {
    editing(Options {
        projection,
        ..Options::default()
    })
}

/// The edited object's model matrix.
pub fn model(app: &Application) -> DMat4 {
    app.context()
        .gizmo()
        .map(GizmoSession::model_matrix)
        .expect("gizmo session")
}

/// Metres east, north and up from `before` to `after`, in the frame of `before`.
pub fn ground_offset(app: &Application, before: DMat4, after: DMat4) -> DVec3 {
    app.context()
        .coords
        .enu_frame(before.w_axis.truncate())
        .inverse()
        .transform_point3(after.w_axis.truncate())
}

/// Picks `axis` at the cursor origin and drags it to `to`, one tick.
pub fn drag(
    app: &mut Application,
    scene: &mut FakeScene,
    axis: GizmoAxis,
    from: DVec2,
    to: DVec2,
    now: std::time::Instant,
) -> Option<DropRequest> {
    scene.hover_handle(axis);
    app.handle_pointer(&*scene, PointerEvent::moved(from), now);
    app.handle_pointer(&*scene, PointerEvent::down(from), now);
    app.handle_pointer(&*scene, PointerEvent::moved(to), now);
    app.tick(&*scene, now).expect("tick");
    app.handle_pointer(&*scene, PointerEvent::up(to), now)
}

/// Inspector fields of the edited object.
pub fn inspector(app: &Application) -> InspectorValues {
    app.context().inspector.expect("inspector values")
}

/// Event log shared between scripted states and the test.
pub type Journal = Rc<RefCell<Vec<String>>>;

/// A state with configurable relations that records its lifecycle calls.
pub struct ScriptedState {
    pub kind: StateKind,
    pub exclusive: Vec<StateKind>,
    pub restore: Vec<StateKind>,
    pub dependent: Vec<StateKind>,
    pub veto: bool,
    pub journal: Journal,
}

impl ScriptedState {
    pub fn new(kind: StateKind, journal: &Journal) -> Self {
        Self {
            kind,
            exclusive: Vec::new(),
            restore: Vec::new(),
            dependent: Vec::new(),
            veto: false,
            journal: Rc::clone(journal),
        }
    }

    pub fn exclusive(mut self, kinds: &[StateKind]) -> Self {
        self.exclusive = kinds.to_vec();
        self
    }

    pub fn restore(mut self, kinds: &[StateKind]) -> Self {
        self.restore = kinds.to_vec();
        self
    }

    pub fn dependent(mut self, kinds: &[StateKind]) -> Self {
        self.dependent = kinds.to_vec();
        self
    }

    pub fn vetoing(mut self) -> Self {
        self.veto = true;
        self
    }
}

impl State for ScriptedState {
    fn kind(&self) -> StateKind {
        self.kind
    }

    fn exclusive_states(&self) -> &[StateKind] {
        &self.exclusive
    }

    fn restore_states(&self) -> &[StateKind] {
        &self.restore
    }

    fn dependent_states(&self) -> &[StateKind] {
        &self.dependent
    }

    fn apply(&mut self, _ctx: &mut Context) {
        self.journal.borrow_mut().push(format!("apply {}", self.kind));
    }

    fn remove(&mut self, _ctx: &mut Context) -> bool {
        self.journal
            .borrow_mut()
            .push(format!("remove {}", self.kind));
        !self.veto
    }
}
