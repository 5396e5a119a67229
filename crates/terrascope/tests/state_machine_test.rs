//! Activation, exclusivity, dependency and restore behaviour of states.

mod common;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use common::{editing, FakeScene, Journal, ScriptedState};
use terrascope::*;

fn app() -> Application {
    Application::new(Options::default()).unwrap()
}

fn active(app: &Application) -> Vec<StateKind> {
    app.active_states().collect()
}

#[test]
fn test_reapplying_a_state_is_idempotent() {
    let mut once = app();
    once.apply_state(StateKind::Information).unwrap();

    let mut twice = app();
    twice.apply_state(StateKind::Information).unwrap();
    twice.apply_state(StateKind::Information).unwrap();

    assert_eq!(active(&once), active(&twice));
    assert_eq!(active(&twice), vec![StateKind::Information]);
    assert_eq!(once.context().info, twice.context().info);
    assert_eq!(once.context().bindings, twice.context().bindings);
}

#[test]
fn test_reapplying_runs_remove_then_apply() {
    let journal = Journal::default();
    let mut states = StateRegistry::with_defaults();
    states.register(Box::new(
        ScriptedState::new(StateKind::Viewshed, &journal).restore(&[StateKind::Information]),
    ));
    let mut app = Application::with_states(Options::default(), states).unwrap();

    app.apply_state(StateKind::Viewshed).unwrap();
    app.apply_state(StateKind::Viewshed).unwrap();

    assert_eq!(
        *journal.borrow(),
        ["apply viewshed", "remove viewshed", "apply viewshed"]
    );
    // re-entry does not run restore logic
    assert!(!app.is_active(StateKind::Information));
}

#[test]
fn test_exclusive_state_is_removed() {
    let mut app = app();
    app.apply_state(StateKind::Information).unwrap();
    assert!(app.context().info.is_some());

    app.apply_state(StateKind::Excavation).unwrap();

    assert!(!app.is_active(StateKind::Information));
    assert!(app.is_active(StateKind::Excavation));
    assert!(app.context().info.is_none());
    assert!(!app.context().is_bound(InputBinding::ObjectPick));
}

#[test]
fn test_exclusive_removal_invokes_remove_hook() {
    let journal = Journal::default();
    let mut states = StateRegistry::with_defaults();
    states.register(Box::new(ScriptedState::new(StateKind::Information, &journal)));
    let mut app = Application::with_states(Options::default(), states).unwrap();

    app.apply_state(StateKind::Information).unwrap();
    app.apply_state(StateKind::Excavation).unwrap();

    assert_eq!(*journal.borrow(), ["apply information", "remove information"]);
    assert_eq!(
        active(&app),
        vec![StateKind::Default, StateKind::Excavation]
    );
}

#[test]
fn test_vetoing_exclusive_state_stays_active() {
    let journal = Journal::default();
    let mut states = StateRegistry::with_defaults();
    states.register(Box::new(
        ScriptedState::new(StateKind::Information, &journal).vetoing(),
    ));
    let mut app = Application::with_states(Options::default(), states).unwrap();

    app.apply_state(StateKind::Information).unwrap();
    app.apply_state(StateKind::Viewshed).unwrap();

    assert!(app.is_active(StateKind::Information));
    assert!(app.is_active(StateKind::Viewshed));
}

#[test]
fn test_dependencies_apply_first() {
    let journal = Journal::default();
    let mut states = StateRegistry::with_defaults();
    states.register(Box::new(ScriptedState::new(StateKind::Default, &journal)));
    states.register(Box::new(
        ScriptedState::new(StateKind::Viewshed, &journal).dependent(&[StateKind::Default]),
    ));
    let mut app = Application::with_states(Options::default(), states).unwrap();

    app.apply_state(StateKind::Viewshed).unwrap();
    assert_eq!(*journal.borrow(), ["apply default", "apply viewshed"]);

    // an active dependency is not applied again
    app.remove_state(StateKind::Viewshed).unwrap();
    app.apply_state(StateKind::Viewshed).unwrap();
    assert_eq!(
        *journal.borrow(),
        [
            "apply default",
            "apply viewshed",
            "remove viewshed",
            "apply viewshed"
        ]
    );
}

#[test]
fn test_removing_measurement_restores_information() {
    let mut app = app();
    app.apply_state(StateKind::LineMeasurement).unwrap();
    assert!(!app.is_active(StateKind::Information));

    assert!(app.remove_state(StateKind::LineMeasurement).unwrap());

    assert!(app.is_active(StateKind::Information));
    assert!(!app.is_active(StateKind::LineMeasurement));
    assert!(app.context().info.is_some());
    assert!(matches!(app.context().tool, Tool::None));
}

#[test]
fn test_measurements_exclude_each_other() {
    let mut app = app();
    app.apply_state(StateKind::LineMeasurement).unwrap();
    app.apply_state(StateKind::AreaMeasurement).unwrap();

    assert!(!app.is_active(StateKind::LineMeasurement));
    assert!(app.is_active(StateKind::AreaMeasurement));
    // the line tool's restore of information was suppressed
    assert!(!app.is_active(StateKind::Information));
    match &app.context().tool {
        Tool::Measure(measurement) => assert_eq!(measurement.kind, MeasurementKind::Area),
        other => panic!("unexpected tool {other:?}"),
    }
}

#[test]
fn test_measurement_collects_clicked_points() {
    let mut app = app();
    app.apply_state(StateKind::HeightMeasurement).unwrap();
    let mut scene = FakeScene::looking_at(DMat4::IDENTITY);
    let now = Instant::now();

    for point in [DVec3::new(1.0, 2.0, 3.0), DVec3::new(1.0, 2.0, 40.0)] {
        scene.hover_point(point);
        app.handle_pointer(&scene, PointerEvent::down(DVec2::ZERO), now);
    }

    match &app.context().tool {
        Tool::Measure(measurement) => {
            assert_eq!(measurement.kind, MeasurementKind::Height);
            assert_eq!(measurement.points.len(), 2);
        }
        other => panic!("unexpected tool {other:?}"),
    }
}

#[test]
fn test_vetoed_removal_skips_restore() {
    let mut app = app();
    app.apply_state(StateKind::Excavation).unwrap();
    let mut scene = FakeScene::looking_at(DMat4::IDENTITY);
    scene.hover_point(DVec3::new(5.0, 5.0, 0.0));
    app.handle_pointer(&scene, PointerEvent::down(DVec2::ZERO), Instant::now());

    assert!(!app.remove_state(StateKind::Excavation).unwrap());
    assert!(app.is_active(StateKind::Excavation));
    assert!(!app.is_active(StateKind::Information));

    assert_eq!(app.finish_excavation().map(|v| v.len()), Some(1));
    assert!(app.remove_state(StateKind::Excavation).unwrap());
    assert!(app.is_active(StateKind::Information));
}

#[test]
fn test_shift_click_closes_excavation() {
    let mut app = app();
    app.apply_state(StateKind::Excavation).unwrap();
    let mut scene = FakeScene::looking_at(DMat4::IDENTITY);
    let now = Instant::now();
    for point in [DVec3::new(0.0, 0.0, 0.0), DVec3::new(8.0, 0.0, 0.0)] {
        scene.hover_point(point);
        app.handle_pointer(&scene, PointerEvent::down(DVec2::ZERO), now);
    }

    let shift_click = PointerEvent::down(DVec2::ZERO).with_modifiers(Modifiers::SHIFT);
    app.handle_pointer(&scene, shift_click, now);

    match &app.context().tool {
        Tool::Excavate(sketch) => {
            assert_eq!(sketch.vertices.len(), 2);
            assert!(sketch.closed);
        }
        other => panic!("unexpected tool {other:?}"),
    }
    assert!(app.remove_state(StateKind::Excavation).unwrap());
    assert!(app.is_active(StateKind::Information));
}

#[test]
fn test_clicks_with_unbound_modifiers_are_ignored() {
    let mut app = app();
    app.apply_state(StateKind::LineMeasurement).unwrap();
    let mut scene = FakeScene::looking_at(DMat4::IDENTITY);
    scene.hover_point(DVec3::new(1.0, 2.0, 3.0));

    let ctrl_click = PointerEvent::down(DVec2::ZERO).with_modifiers(Modifiers::CTRL);
    app.handle_pointer(&scene, ctrl_click, Instant::now());

    match &app.context().tool {
        Tool::Measure(measurement) => assert!(measurement.points.is_empty()),
        other => panic!("unexpected tool {other:?}"),
    }
}

#[test]
fn test_modified_press_does_not_arm_gizmo() {
    let (mut app, _, mut scene) = editing(Options::default());
    let now = Instant::now();
    scene.hover_handle(GizmoAxis::X);
    app.handle_pointer(&scene, PointerEvent::moved(DVec2::ZERO), now);

    let shift_press = PointerEvent::down(DVec2::ZERO).with_modifiers(Modifiers::SHIFT);
    app.handle_pointer(&scene, shift_press, now);

    assert!(!app.context().gizmo_active());
    assert!(app.camera_inputs().all_enabled());
}

#[test]
fn test_pedestrian_takes_over_camera() {
    let mut app = app();
    app.apply_state(StateKind::Default).unwrap();
    app.apply_state(StateKind::Information).unwrap();

    app.apply_state(StateKind::Pedestrian).unwrap();
    assert_eq!(active(&app), vec![StateKind::Pedestrian]);
    let camera = app.camera_inputs();
    assert!(camera.enable_look);
    assert!(!camera.enable_translate && !camera.enable_zoom);
    assert!(!camera.inertia_enabled);

    app.remove_state(StateKind::Pedestrian).unwrap();
    assert_eq!(
        active(&app),
        vec![StateKind::Default, StateKind::Information]
    );
    assert!(app.camera_inputs().all_enabled());
    assert!(app.camera_inputs().inertia_enabled);
}

#[test]
fn test_water_level_overlays_tools() {
    let mut app = app();
    app.apply_state(StateKind::WaterLevel).unwrap();
    app.apply_state(StateKind::Viewshed).unwrap();
    assert!(app.is_active(StateKind::WaterLevel));
    assert!(app.is_active(StateKind::Viewshed));
}

#[test]
fn test_model_edit_lifecycle() {
    let mut app = app();
    app.apply_state(StateKind::Information).unwrap();
    let frame = app
        .context()
        .coords
        .enu_frame(common::site(&app.context().coords));
    let index = app.add_object(EditableObject::new("crane", frame));

    assert!(app.enter_gizmo_edit_mode(index).unwrap());
    assert!(app.is_active(StateKind::ModelEdit));
    assert!(!app.is_active(StateKind::Information));
    assert_eq!(app.context().gizmo().map(GizmoSession::object), Some(index));
    assert!(app.inspector_form().is_some());

    assert!(app.exit_gizmo_edit_mode().unwrap());
    assert!(app.context().gizmo().is_none());
    assert!(app.context().inspector.is_none());
    assert!(app.is_active(StateKind::Information));
}

#[test]
fn test_model_edit_vetoes_exit_during_drag() {
    let (mut app, _, mut scene) = editing(Options::default());
    let now = Instant::now();
    scene.hover_handle(GizmoAxis::X);
    app.handle_pointer(&scene, PointerEvent::moved(DVec2::ZERO), now);
    app.handle_pointer(&scene, PointerEvent::down(DVec2::ZERO), now);

    assert!(!app.exit_gizmo_edit_mode().unwrap());
    assert!(app.context().gizmo().is_some());

    app.handle_pointer(&scene, PointerEvent::up(DVec2::ZERO), now);
    assert!(app.exit_gizmo_edit_mode().unwrap());
}

#[test]
fn test_switching_edited_object() {
    let (mut app, first, _) = editing(Options::default());
    let matrix = app.context().registry.transform(first).unwrap();
    let second = app.add_object(EditableObject::new("tower", matrix));

    assert!(app.enter_gizmo_edit_mode(second).unwrap());
    assert_eq!(app.context().gizmo().map(GizmoSession::object), Some(second));
    assert_eq!(
        active(&app),
        vec![StateKind::Default, StateKind::ModelEdit]
    );
}

#[test]
fn test_switching_object_during_drag_is_refused() {
    let (mut app, first, mut scene) = editing(Options::default());
    let matrix = app.context().registry.transform(first).unwrap();
    let second = app.add_object(EditableObject::new("tower", matrix));
    let now = Instant::now();
    scene.hover_handle(GizmoAxis::X);
    app.handle_pointer(&scene, PointerEvent::moved(DVec2::ZERO), now);
    app.handle_pointer(&scene, PointerEvent::down(DVec2::ZERO), now);

    assert!(!app.enter_gizmo_edit_mode(second).unwrap());
    assert_eq!(app.context().edit_target, Some(first));
    assert_eq!(app.context().gizmo().map(GizmoSession::object), Some(first));
    assert!(app.context().gizmo_active());

    app.handle_pointer(&scene, PointerEvent::up(DVec2::ZERO), now);
    assert!(app.enter_gizmo_edit_mode(second).unwrap());
    assert_eq!(app.context().edit_target, Some(second));
}

#[test]
fn test_information_click_selects_object() {
    let mut app = app();
    app.apply_state(StateKind::Information).unwrap();
    let mut scene = FakeScene::looking_at(DMat4::IDENTITY);
    scene.picks = vec![PickResult::new("building-7").with_object(7)];

    app.handle_pointer(&scene, PointerEvent::up(DVec2::ZERO), Instant::now());

    let info = app.context().info.as_ref().unwrap();
    assert!(info.is_window_open());
    assert_eq!(info.selection.as_ref().and_then(|p| p.object), Some(7));
}

#[test]
fn test_dependency_cycle_is_reported() {
    let journal: Journal = Rc::new(RefCell::new(Vec::new()));
    let mut states = StateRegistry::with_defaults();
    states.register(Box::new(
        ScriptedState::new(StateKind::Viewshed, &journal).dependent(&[StateKind::WaterLevel]),
    ));
    states.register(Box::new(
        ScriptedState::new(StateKind::WaterLevel, &journal).dependent(&[StateKind::Viewshed]),
    ));
    assert!(matches!(
        states.validate(),
        Err(TerrascopeError::DependencyCycle(_))
    ));

    let mut app = Application::with_states(Options::default(), states).unwrap();
    match app.apply_state(StateKind::Viewshed) {
        Err(TerrascopeError::DependencyCycle(path)) => {
            assert_eq!(path, ["viewshed", "water_level", "viewshed"]);
        }
        other => panic!("expected cycle, got {other:?}"),
    }
    assert!(journal.borrow().is_empty());
    assert!(!app.is_active(StateKind::Viewshed));
}

#[test]
fn test_unregistered_state() {
    let mut app = Application::with_states(Options::default(), StateRegistry::new()).unwrap();
    assert!(matches!(
        app.apply_state(StateKind::Default),
        Err(TerrascopeError::StateNotRegistered(name)) if name == "default"
    ));
    assert!(app.remove_state(StateKind::Default).is_err());
}
