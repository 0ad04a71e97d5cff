//! End-to-end locomotion scenarios against the headless world.

use std::rc::Rc;
use std::sync::Arc;

use locomotion::game::animation::AnimatorParameters;
use locomotion::game::collision::LayerMask;
use locomotion::game::events::{LocomotionEvent, LocomotionEventData};
use locomotion::game::world::{Aabb, FixedViewpoint, KinematicBody, StaticWorld};
use locomotion::{
    Actor, DriverConfig, FixedStepDriver, InputEvent, LocomotionConfig, LocomotionController, Vec3,
};

type Controller = LocomotionController<Arc<StaticWorld>, KinematicBody, AnimatorParameters, Rc<FixedViewpoint>>;

const DT: f32 = 0.02;
const GROUND: LayerMask = LayerMask::layer(0);
const WALLS: LayerMask = LayerMask::layer(1);

fn spawn(world: Arc<StaticWorld>, config: LocomotionConfig, at: Vec3) -> Controller {
    let mut controller = LocomotionController::builder(config)
        .ground(world.clone())
        .executor(KinematicBody::new(world, at, 0.3, 1.8))
        .animator(AnimatorParameters::new())
        .viewpoint(Rc::new(FixedViewpoint::new(0.0)))
        .build()
        .unwrap();
    controller.on_spawn().unwrap();
    controller
}

fn position_of(events: &[LocomotionEvent], pred: impl Fn(&LocomotionEventData) -> bool) -> Option<usize> {
    events.iter().rposition(|e| pred(&e.data))
}

#[test]
fn walk_off_ledge_falls_clamps_and_lands() {
    let world = Arc::new(
        StaticWorld::new()
            .with_floor(0.0, 100.0, GROUND)
            .with_box(Aabb::new(Vec3::new(-5.0, 0.0, -5.0), Vec3::new(5.0, 5.0, 5.0)), GROUND),
    );
    let mut c = spawn(world, LocomotionConfig::default(), Vec3::new(0.0, 5.0, 0.0));

    c.on_input_event(InputEvent::movement(0.0, 1.0)).unwrap();
    let mut events = Vec::new();
    for _ in 0..400 {
        events.extend(c.on_step(DT).unwrap().events);
    }

    let left = position_of(&events, |d| *d == LocomotionEventData::LeftGround).expect("never left the ledge");
    let clamped = position_of(&events, |d| matches!(d, LocomotionEventData::FallClamped { .. }))
        .expect("never reached terminal speed");
    let landed = position_of(&events, |d| matches!(d, LocomotionEventData::Landed { .. })).unwrap();
    assert!(left < clamped && clamped < landed);

    if let LocomotionEventData::FallClamped { velocity } = events[clamped].data {
        assert_eq!(velocity, -10.0);
    }
    if let LocomotionEventData::Landed { impact_velocity, overrode_jump } = events[landed].data {
        assert_eq!(impact_velocity, -10.0);
        assert!(!overrode_jump);
    }

    assert!(c.state().is_grounded);
    assert_eq!(c.state().vertical_velocity, -2.0);
    assert!(c.position().y < 0.01);
    assert!(c.position().z > 5.3);
    assert!(!c.animator().airborne());
}

#[test]
fn json_config_with_unlimited_fall_speed() {
    let config = LocomotionConfig::from_json_str(r#"{ "gravity": 20.0, "fall_speed_limit": null }"#).unwrap();
    assert!(config.fall_speed_unlimited());
    assert_eq!(config.jump_force, 5.0);

    let world = Arc::new(StaticWorld::new());
    let mut c = spawn(world, config, Vec3::new(0.0, 500.0, 0.0));
    for _ in 0..100 {
        let report = c.on_step(DT).unwrap();
        assert!(!report.grounded);
    }
    assert!(c.state().vertical_velocity < -30.0);
}

#[test]
fn wall_blocks_motion_but_facing_still_turns() {
    let world = Arc::new(
        StaticWorld::new()
            .with_floor(0.0, 50.0, GROUND)
            .with_box(Aabb::new(Vec3::new(2.0, 0.0, -10.0), Vec3::new(3.0, 3.0, 10.0)), WALLS),
    );
    let mut c = spawn(world, LocomotionConfig::default(), Vec3::ZERO);
    c.on_step(DT).unwrap();

    c.on_input_event(InputEvent::movement(1.0, 0.0)).unwrap();
    let mut blocked = false;
    for _ in 0..200 {
        let report = c.on_step(DT).unwrap();
        blocked |= report.outcome.was_blocked() && report.outcome.applied.x < report.outcome.requested.x;
    }

    assert!(blocked);
    assert!(c.position().x <= 2.0 - 0.3);
    assert!((c.yaw() - 90.0).abs() < 0.01);
    assert_eq!(c.animator().speed(), 1.0);
}

#[test]
fn driver_runs_one_second_at_fifty_hertz() {
    let world = Arc::new(StaticWorld::new().with_floor(0.0, 50.0, GROUND));
    let mut c = spawn(world, LocomotionConfig::default(), Vec3::ZERO);
    let mut driver = FixedStepDriver::new(DriverConfig::default()).unwrap();

    c.on_input_event(InputEvent::movement(0.0, 1.0)).unwrap();
    let mut steps = 0;
    for _ in 0..50 {
        steps += driver.advance(DT, &mut c).unwrap().len();
    }

    assert_eq!(steps, 50);
    assert_eq!(c.state().step, 50);
    // input is drained at the start of step 0, so all 50 steps walk
    assert!((c.position().z - 5.0).abs() < 1e-3, "z = {}", c.position().z);
}

#[test]
fn held_jump_reapplies_while_airborne_but_pressed_jump_does_not() {
    let world = Arc::new(StaticWorld::new().with_floor(0.0, 50.0, GROUND));
    let mut c = spawn(world, LocomotionConfig::default(), Vec3::new(0.0, 20.0, 0.0));
    for _ in 0..5 {
        c.on_step(DT).unwrap();
    }
    assert!(!c.state().is_grounded);

    c.on_input_event(InputEvent::jump_pressed()).unwrap();
    let pressed = c.on_step(DT).unwrap();
    assert!(!pressed.jumped());
    assert!(c.state().vertical_velocity < 0.0);

    c.on_input_event(InputEvent::Jump { edge: false }).unwrap();
    let held = c.on_step(DT).unwrap();
    assert!(held.jumped());
    assert!(c.state().vertical_velocity > 0.0);
    assert!(c.animator().airborne());
}
