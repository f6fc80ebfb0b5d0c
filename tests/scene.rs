use std::time::Duration;

use approx::assert_abs_diff_eq;
use glam::Vec2;
use hecs::Entity;

use pivot2d::components::{CollisionType, Hitbox, RigidBody, Shape};
use pivot2d::config::{BodyConfig, TimeConfig};
use pivot2d::engine::scheduler::Scheduler;
use pivot2d::engine::time::ManualClock;
use pivot2d::scene::{BodyWorld, Response};

fn square(world: &mut BodyWorld, at: Vec2, collision: CollisionType) -> Entity {
    let config = BodyConfig {
        collision,
        ..BodyConfig::default()
    };
    let hitbox = Hitbox::new(Shape::rect(1.0, 1.0).unwrap());
    world.spawn(RigidBody::new(hitbox, at, &config).unwrap())
}

fn scheduler() -> Scheduler<ManualClock> {
    let time = TimeConfig {
        fixed_delta_ms: 10,
        fps_cap: None,
    };
    Scheduler::new(ManualClock::new(), &time).unwrap()
}

#[test]
fn timed_impulse_clears_after_its_duration() {
    let mut world = BodyWorld::new();
    let config = BodyConfig {
        mass: 10.0,
        ..BodyConfig::default()
    };
    let ball = world.spawn(
        RigidBody::new(Hitbox::new(Shape::circle(1.0).unwrap()), Vec2::ZERO, &config).unwrap(),
    );
    let mut scheduler = scheduler();

    world
        .apply_impulse(
            ball,
            Vec2::new(0.0, -500.0),
            Duration::from_millis(200),
            scheduler.timer_mut(),
        )
        .unwrap();
    assert_eq!(world.body(ball).unwrap().acceleration, Vec2::new(0.0, -50.0));

    assert_eq!(scheduler.accumulate(Duration::from_millis(190), &mut world), 19);
    assert_eq!(world.body(ball).unwrap().acceleration, Vec2::new(0.0, -50.0));
    assert_abs_diff_eq!(world.body(ball).unwrap().velocity.y, -9.5, epsilon = 1e-3);

    // The reset runs before the 20th tick integrates, so that tick adds nothing.
    assert_eq!(scheduler.accumulate(Duration::from_millis(10), &mut world), 1);
    let body = world.body(ball).unwrap();
    assert_eq!(body.acceleration, Vec2::ZERO);
    assert_abs_diff_eq!(body.velocity.y, -9.5, epsilon = 1e-3);
    assert_eq!(scheduler.timer().pending(), 0);
}

#[test]
fn impulse_on_despawned_body_is_dropped_quietly() {
    let mut world = BodyWorld::new();
    let a = square(&mut world, Vec2::ZERO, CollisionType::Dynamic);
    let mut scheduler = scheduler();

    world
        .apply_impulse(a, Vec2::X, Duration::from_millis(20), scheduler.timer_mut())
        .unwrap();
    world.despawn(a).unwrap();

    scheduler.accumulate(Duration::from_millis(50), &mut world);
    assert_eq!(scheduler.timer().pending(), 0);
    assert!(world.is_empty());
}

#[test]
fn later_pairs_see_earlier_corrections() {
    // a pushes b into the wall; the b/wall pair only overlaps after that.
    let mut world = BodyWorld::new();
    let a = square(&mut world, Vec2::ZERO, CollisionType::Dynamic);
    let b = square(&mut world, Vec2::new(0.8, 0.0), CollisionType::Dynamic);
    let wall = square(&mut world, Vec2::new(1.85, 0.0), CollisionType::Static);

    world.add_pair(a, b, Response::Collide);
    world.add_pair(b, wall, Response::Collide);
    let contacts = world.step(0.0).to_vec();

    assert_eq!(contacts.len(), 2);
    assert_eq!((contacts[0].a, contacts[0].b), (a, b));
    assert_eq!((contacts[1].a, contacts[1].b), (b, wall));
    assert_abs_diff_eq!(world.body(a).unwrap().position.x, -0.1, epsilon = 1e-4);
    assert_abs_diff_eq!(world.body(b).unwrap().position.x, 0.85, epsilon = 1e-4);
}

#[test]
fn pair_order_changes_the_outcome() {
    let mut world = BodyWorld::new();
    let a = square(&mut world, Vec2::ZERO, CollisionType::Dynamic);
    let b = square(&mut world, Vec2::new(0.8, 0.0), CollisionType::Dynamic);
    let wall = square(&mut world, Vec2::new(1.85, 0.0), CollisionType::Static);

    world.add_pair(b, wall, Response::Collide);
    world.add_pair(a, b, Response::Collide);
    let contacts = world.step(0.0).to_vec();

    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].response, Response::Collide);
    assert_abs_diff_eq!(world.body(b).unwrap().position.x, 0.9, epsilon = 1e-4);
}

#[test]
fn overlap_pairs_report_without_moving() {
    let mut world = BodyWorld::new();
    let a = square(&mut world, Vec2::ZERO, CollisionType::Dynamic);
    let b = square(&mut world, Vec2::new(0.5, 0.0), CollisionType::Dynamic);

    world.add_pair(a, b, Response::Overlap);
    world.step(0.0);

    assert_eq!(world.contacts().len(), 1);
    assert_eq!(world.contacts()[0].info.shape_a.owner, Some(a));
    assert_eq!(world.body(a).unwrap().position, Vec2::ZERO);
    assert_eq!(world.body(b).unwrap().position, Vec2::new(0.5, 0.0));
}

#[test]
fn world_runs_under_the_scheduler_loop() {
    use pivot2d::engine::scheduler::{Host, LoopEvent};

    struct Frames(u32);
    impl Host<BodyWorld> for Frames {
        fn poll_events(&mut self) -> Vec<LoopEvent> {
            if self.0 == 0 {
                return vec![LoopEvent::Quit];
            }
            self.0 -= 1;
            Vec::new()
        }
    }

    let mut world = BodyWorld::new();
    let config = BodyConfig {
        gravity: Vec2::new(0.0, 100.0),
        ..BodyConfig::default()
    };
    let falling = world.spawn(
        RigidBody::new(Hitbox::new(Shape::rect(1.0, 1.0).unwrap()), Vec2::ZERO, &config).unwrap(),
    );
    let floor = square(&mut world, Vec2::new(0.0, 3.0), CollisionType::Static);
    world.add_pair(falling, floor, Response::Collide);

    let mut scheduler = scheduler();
    scheduler.run(&mut Frames(2000), &mut world);

    let body = world.body(falling).unwrap();
    assert!(body.grounded);
    assert_abs_diff_eq!(body.position.y, 2.0, epsilon = 0.05);
}
