use std::cell::Cell;

use approx::assert_abs_diff_eq;
use glam::Vec2;

use pivot2d::components::{CollisionType, Hitbox, RigidBody, Shape};
use pivot2d::config::BodyConfig;

fn body(shape: Shape, at: Vec2, collision: CollisionType) -> RigidBody {
    let config = BodyConfig {
        collision,
        ..BodyConfig::default()
    };
    RigidBody::new(Hitbox::new(shape), at, &config).unwrap()
}

fn floor() -> RigidBody {
    body(
        Shape::rect(10.0, 1.0).unwrap(),
        Vec2::new(0.0, 5.0),
        CollisionType::Static,
    )
}

#[test]
fn falling_body_lands_on_static_floor() {
    let mut floor = floor();
    let mut crate_ = body(
        Shape::rect(1.0, 1.0).unwrap(),
        Vec2::new(0.0, 4.3),
        CollisionType::Dynamic,
    );
    crate_.velocity = Vec2::new(0.0, 50.0);

    let col = crate_.collide(&mut floor, |_| {}).unwrap();

    assert_abs_diff_eq!(col.depth(), 0.3, epsilon = 1e-4);
    assert_abs_diff_eq!(crate_.position.y, 4.0, epsilon = 1e-4);
    assert_abs_diff_eq!(crate_.velocity.y, 0.0);
    assert!(crate_.grounded);
    assert_eq!(floor.position, Vec2::new(0.0, 5.0));
}

#[test]
fn static_first_ordering_grounds_the_other_body() {
    let mut floor = floor();
    let mut ball = body(
        Shape::circle(0.5).unwrap(),
        Vec2::new(1.0, 4.2),
        CollisionType::Dynamic,
    );
    ball.velocity = Vec2::new(0.0, 10.0);

    floor.collide(&mut ball, |_| {}).unwrap();

    assert_abs_diff_eq!(ball.position.y, 4.0, epsilon = 1e-4);
    assert!(ball.grounded);
    assert!(!floor.grounded);
    assert_abs_diff_eq!(ball.velocity.y, 0.0);
}

#[test]
fn equal_dynamic_bodies_split_the_correction() {
    let mut a = body(Shape::rect(1.0, 1.0).unwrap(), Vec2::ZERO, CollisionType::Dynamic);
    let mut b = body(
        Shape::rect(1.0, 1.0).unwrap(),
        Vec2::new(0.6, 0.0),
        CollisionType::Dynamic,
    );

    a.collide(&mut b, |_| {}).unwrap();

    assert_abs_diff_eq!(a.position.x, -0.2, epsilon = 1e-4);
    assert_abs_diff_eq!(b.position.x, 0.8, epsilon = 1e-4);
    // Now touching, which does not count.
    assert!(a.collide(&mut b, |_| {}).map_or(true, |c| c.depth() < 1e-4));
}

#[test]
fn bounce_callback_fires_once() {
    let mut a = body(Shape::circle(1.0).unwrap(), Vec2::ZERO, CollisionType::Dynamic);
    let mut b = body(Shape::circle(1.0).unwrap(), Vec2::new(1.5, 0.0), CollisionType::Dynamic);
    let calls = Cell::new(0);

    a.bounce(&mut b, |col| {
        calls.set(calls.get() + 1);
        assert!(col.sep.x > 0.0);
    });

    assert_eq!(calls.get(), 1);
    assert_abs_diff_eq!(a.position.x, -0.25, epsilon = 1e-4);
    assert_abs_diff_eq!(b.position.x, 1.75, epsilon = 1e-4);
}

#[test]
fn trigger_hitboxes_only_report() {
    let mut sensor = RigidBody::new(
        Hitbox::new(Shape::rect(4.0, 4.0).unwrap()).as_trigger(),
        Vec2::ZERO,
        &BodyConfig::default(),
    )
    .unwrap();
    let mut ball = body(Shape::circle(1.0).unwrap(), Vec2::new(1.0, 0.0), CollisionType::Dynamic);

    let col = ball.collide(&mut sensor, |_| {}).unwrap();

    assert!(col.shape_b.trigger);
    assert_eq!(ball.position, Vec2::new(1.0, 0.0));
    assert_eq!(sensor.position, Vec2::ZERO);
}

#[test]
fn overlap_resets_grounded_without_moving() {
    let floor = floor();
    let mut ball = body(
        Shape::circle(0.5).unwrap(),
        Vec2::new(0.0, 4.2),
        CollisionType::Dynamic,
    );
    ball.grounded = true;

    assert!(ball.overlap(&floor, |_| {}).is_some());
    assert!(!ball.grounded);
    assert_eq!(ball.position, Vec2::new(0.0, 4.2));
}

#[test]
fn elastic_impulse_swaps_head_on_velocities() {
    let config = BodyConfig {
        bounciness: 1.0,
        ..BodyConfig::default()
    };
    let mut a = RigidBody::new(Hitbox::new(Shape::circle(1.0).unwrap()), Vec2::ZERO, &config).unwrap();
    let mut b = RigidBody::new(
        Hitbox::new(Shape::circle(1.0).unwrap()),
        Vec2::new(1.5, 0.0),
        &config,
    )
    .unwrap();
    a.velocity = Vec2::new(1.0, 0.0);
    b.velocity = Vec2::new(-1.0, 0.0);

    a.resolve_impulse(&mut b, |_| {}).unwrap();

    assert_abs_diff_eq!(a.velocity.x, -1.0, epsilon = 1e-4);
    assert_abs_diff_eq!(b.velocity.x, 1.0, epsilon = 1e-4);
    // Partial correction only: still closer than touching.
    assert!(b.position.x - a.position.x < 2.0);
    assert!(b.position.x - a.position.x > 1.5);
}

#[test]
fn impulse_against_static_keeps_the_wall_still() {
    let mut wall = floor();
    let mut ball = body(
        Shape::circle(0.5).unwrap(),
        Vec2::new(0.0, 4.2),
        CollisionType::Dynamic,
    );
    ball.velocity = Vec2::new(0.0, 3.0);

    ball.resolve_impulse(&mut wall, |_| {}).unwrap();

    assert_eq!(wall.position, Vec2::new(0.0, 5.0));
    assert_eq!(wall.velocity, Vec2::ZERO);
    assert_abs_diff_eq!(ball.velocity.y, 0.0, epsilon = 1e-4);
    assert!(ball.grounded);
}
