use box_stacks::input::{on_mouse_motion, on_mouse_press, on_mouse_release};
use box_stacks::{
    tick, EntityId, EntityKind, InputState, MouseButton, Scene, SceneConfig, VisualTransform,
};

fn default_scene() -> Scene {
    Scene::new(SceneConfig::default()).expect("default config is valid")
}

fn empty_scene() -> Scene {
    Scene::new(SceneConfig {
        columns: 0,
        rows: 0,
        ..SceneConfig::default()
    })
    .expect("empty config is valid")
}

fn grab_first_box(scene: &mut Scene, input: &mut InputState) -> EntityId {
    let first = scene.entities()[0].clone();
    let position = scene.world().body_snapshot(first.body).unwrap().position;
    on_mouse_press(scene, input, position, MouseButton::Primary).unwrap();
    assert_eq!(input.dragged, Some(first.id));
    first.id
}

#[test]
fn transforms_match_bodies_after_every_tick() {
    let mut scene = default_scene();
    let mut input = InputState::default();
    grab_first_box(&mut scene, &mut input);

    for _ in 0..20 {
        tick(&mut scene, &mut input).unwrap();
        for entity in scene.entities() {
            let snapshot = scene.world().body_snapshot(entity.body).unwrap();
            assert_eq!(entity.transform, VisualTransform::from_snapshot(&snapshot));
        }
    }
}

#[test]
fn shooting_adds_exactly_one_coin() {
    let mut scene = default_scene();
    let mut input = InputState::default();
    let entities = scene.entities().len();
    let bodies = scene.world().body_count();
    let colliders = scene.world().collider_count();

    on_mouse_press(&mut scene, &mut input, [100.0, 200.0], MouseButton::Secondary).unwrap();

    assert_eq!(scene.entities().len(), entities + 1);
    assert_eq!(scene.world().body_count(), bodies + 1);
    assert_eq!(scene.world().collider_count(), colliders + 1);

    let coin = scene.entities().last().unwrap();
    assert_eq!(coin.kind, EntityKind::Circle { radius: 10.0 });
    let snapshot = scene.world().body_snapshot(coin.body).unwrap();
    assert_eq!(snapshot.position, [100.0, 200.0]);
    assert_eq!(snapshot.velocity, [2000.0, 0.0]);
    assert_eq!(input.dragged, None);
}

#[test]
fn dragged_box_is_pinned_to_the_pointer() {
    let mut scene = default_scene();
    let mut input = InputState::default();
    let id = grab_first_box(&mut scene, &mut input);

    on_mouse_motion(&mut scene, &mut input, [500.0, 500.0], [200.0, 397.5]).unwrap();
    tick(&mut scene, &mut input).unwrap();

    let body = scene.entity(id).unwrap().body;
    let snapshot = scene.world().body_snapshot(body).unwrap();
    assert_eq!(snapshot.position, [500.0, 500.0]);
    assert_eq!(scene.entity(id).unwrap().transform.position, [500.0, 500.0]);

    // Gravity does not pull it down while held.
    for _ in 0..10 {
        tick(&mut scene, &mut input).unwrap();
    }
    assert!(input.is_dragging());
    let snapshot = scene.world().body_snapshot(body).unwrap();
    assert_eq!(snapshot.position, [500.0, 500.0]);
}

#[test]
fn drag_motion_velocity_is_zeroed_by_the_next_tick() {
    let mut scene = default_scene();
    let mut input = InputState::default();
    let id = grab_first_box(&mut scene, &mut input);
    let body = scene.entity(id).unwrap().body;

    on_mouse_motion(&mut scene, &mut input, [320.0, 300.0], [20.0, 10.0]).unwrap();
    assert_eq!(
        scene.world().body_snapshot(body).unwrap().velocity,
        [400.0, 200.0]
    );

    tick(&mut scene, &mut input).unwrap();
    assert_eq!(scene.world().body_snapshot(body).unwrap().velocity, [0.0, 0.0]);
}

#[test]
fn releasing_restores_physics() {
    let mut scene = default_scene();
    let mut input = InputState::default();
    let id = grab_first_box(&mut scene, &mut input);
    on_mouse_motion(&mut scene, &mut input, [900.0, 600.0], [600.0, 500.0]).unwrap();
    tick(&mut scene, &mut input).unwrap();

    on_mouse_release(&mut input, MouseButton::Primary);
    assert!(!input.is_dragging());
    for _ in 0..10 {
        tick(&mut scene, &mut input).unwrap();
    }
    let body = scene.entity(id).unwrap().body;
    assert!(scene.world().body_snapshot(body).unwrap().position[1] < 600.0);
}

#[test]
fn fallen_entities_are_removed_from_scene_and_world() {
    let mut scene = default_scene();
    let mut input = InputState::default();
    let victim = scene.entities()[5].clone();
    scene
        .world_mut()
        .set_body_position(victim.body, [600.0, -50.0])
        .unwrap();

    let timing = tick(&mut scene, &mut input).unwrap();

    assert_eq!(timing.removed, 1);
    assert!(scene.entity(victim.id).is_none());
    assert!(!scene.world().contains_body(victim.body));
    assert!(!scene.world().contains_collider(victim.collider));
    assert_eq!(scene.entities().len(), 71);
}

#[test]
fn cleanup_is_idempotent() {
    let mut scene = default_scene();
    let victim = scene.entities()[0].clone();
    scene
        .world_mut()
        .set_body_position(victim.body, [600.0, -10.0])
        .unwrap();

    assert_eq!(scene.remove_fallen().unwrap(), vec![victim.id]);
    let entities = scene.entities().len();
    let bodies = scene.world().body_count();

    assert!(scene.remove_fallen().unwrap().is_empty());
    assert_eq!(scene.entities().len(), entities);
    assert_eq!(scene.world().body_count(), bodies);
}

#[test]
fn dragging_an_entity_off_screen_releases_it() {
    let mut scene = default_scene();
    let mut input = InputState::default();
    let id = grab_first_box(&mut scene, &mut input);

    on_mouse_motion(&mut scene, &mut input, [600.0, -50.0], [300.0, -150.0]).unwrap();
    tick(&mut scene, &mut input).unwrap();

    assert_eq!(input.dragged, None);
    assert!(scene.entity(id).is_none());
    // Further ticks and moves are fine without a drag.
    on_mouse_motion(&mut scene, &mut input, [10.0, 10.0], [1.0, 1.0]).unwrap();
    tick(&mut scene, &mut input).unwrap();
}

#[test]
fn eighty_ticks_is_one_simulated_second() {
    let mut scene = default_scene();
    let mut input = InputState::default();
    for _ in 0..80 {
        tick(&mut scene, &mut input).unwrap();
    }
    assert_eq!(scene.world().steps(), 80);
    assert!((scene.world().time() - 1.0).abs() < 1e-5);
}

#[test]
fn stacks_settle_on_the_floor() {
    let mut scene = default_scene();
    let mut input = InputState::default();
    for _ in 0..160 {
        tick(&mut scene, &mut input).unwrap();
    }
    assert_eq!(scene.entities().len(), 72);
    for entity in scene.entities() {
        assert!(entity.transform.position[1] > 80.0);
    }
}

#[test]
fn coin_cap_evicts_the_oldest_entity() {
    let mut scene = Scene::new(SceneConfig {
        columns: 1,
        rows: 2,
        max_entities: 3,
        ..SceneConfig::default()
    })
    .unwrap();
    let mut input = InputState::default();
    let oldest = scene.entities()[0].id;

    on_mouse_press(&mut scene, &mut input, [100.0, 600.0], MouseButton::Secondary).unwrap();
    assert_eq!(scene.entities().len(), 3);

    let bodies = scene.world().body_count();
    on_mouse_press(&mut scene, &mut input, [100.0, 650.0], MouseButton::Secondary).unwrap();
    assert_eq!(scene.entities().len(), 3);
    assert!(scene.entity(oldest).is_none());
    assert_eq!(scene.world().body_count(), bodies);
}

#[test]
fn coin_cap_never_evicts_the_dragged_entity() {
    let mut scene = Scene::new(SceneConfig {
        columns: 1,
        rows: 2,
        max_entities: 3,
        ..SceneConfig::default()
    })
    .unwrap();
    let mut input = InputState::default();
    let held = grab_first_box(&mut scene, &mut input);
    let other = scene.entities()[1].id;

    on_mouse_press(&mut scene, &mut input, [100.0, 600.0], MouseButton::Secondary).unwrap();
    assert!(scene.entity(other).is_some());
    on_mouse_press(&mut scene, &mut input, [100.0, 650.0], MouseButton::Secondary).unwrap();
    assert!(scene.entity(held).is_some());
    assert!(scene.entity(other).is_none());
    assert_eq!(input.dragged, Some(held));
}

#[test]
fn coin_is_not_spawned_when_only_the_dragged_entity_remains() {
    let mut scene = Scene::new(SceneConfig {
        columns: 0,
        rows: 0,
        max_entities: 1,
        ..SceneConfig::default()
    })
    .unwrap();
    let mut input = InputState::default();
    on_mouse_press(&mut scene, &mut input, [600.0, 400.0], MouseButton::Secondary).unwrap();
    let held = grab_first_box(&mut scene, &mut input);

    on_mouse_press(&mut scene, &mut input, [100.0, 600.0], MouseButton::Secondary).unwrap();
    assert_eq!(scene.entities().len(), 1);
    assert_eq!(scene.entities()[0].id, held);
}

#[test]
fn full_grid_cannot_start_above_the_entity_cap() {
    let result = Scene::new(SceneConfig {
        max_entities: 10,
        ..SceneConfig::default()
    });
    assert!(result.is_err());
}

#[test]
fn coins_knock_boxes_over() {
    let mut scene = empty_scene();
    let mut input = InputState::default();
    let target = scene.spawn_box([600.0, 102.5]);
    on_mouse_press(&mut scene, &mut input, [400.0, 102.5], MouseButton::Secondary).unwrap();
    for _ in 0..40 {
        tick(&mut scene, &mut input).unwrap();
    }
    let entity = scene.entity(target).unwrap();
    assert!(entity.transform.position[0] > 600.0);
}
