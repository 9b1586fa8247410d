mod common;

use cgmath::{Deg, InnerSpace, MetricSpace, Point3};
use common::test_utils::{Fixture, assert_close, assert_close_point};
use living_room::camera::{DragMode, Projection};

fn projection() -> Projection {
    Projection::new(800, 600, Deg(75.0), 0.1, 1000.0)
}

#[test]
fn camera_orbits_the_origin() {
    let mut fx = Fixture::new();
    fx.frame(10_000);

    let angle = 1.0f32;
    assert_close_point(
        fx.camera.position,
        Point3::new(angle.sin() * 5.0, 0.0, angle.cos() * 5.0),
    );
    assert_eq!(fx.camera.look_at, Point3::new(0.0, 0.0, 0.0));
}

#[test]
fn dragging_pauses_the_orbit() {
    let mut fx = Fixture::new();
    fx.room.on_drag_start();
    assert!(fx.room.animator.is_user_interacting());
    fx.frame(10_000);
    assert_close_point(fx.camera.position, Point3::new(0.0, 0.0, 5.0));

    fx.room.on_drag_end();
    assert!(!fx.room.animator.is_user_interacting());
    fx.frame(20_000);
    let angle = 2.0f32;
    assert_close_point(
        fx.camera.position,
        Point3::new(angle.sin() * 5.0, 0.0, angle.cos() * 5.0),
    );
}

#[test]
fn reset_view_places_camera_over_the_table() {
    let mut fx = Fixture::new();
    fx.frame(3_000);
    let config = fx.config.clone();
    fx.room
        .reset_view(&mut fx.camera, &mut fx.controls, &config);

    assert_close_point(fx.camera.position, Point3::new(0.0, 2.0, 5.0));
    assert_eq!(fx.camera.look_at, Point3::new(0.0, 0.5, 0.0));
    assert_eq!(fx.controls.target, Point3::new(0.0, 0.5, 0.0));
}

#[test]
fn dolly_respects_min_distance() {
    let mut fx = Fixture::new();
    for _ in 0..60 {
        fx.controls.dolly(1.0);
    }
    fx.controls.update(&mut fx.camera);
    assert_close(fx.camera.position.distance(fx.controls.target), 2.0);

    for _ in 0..60 {
        fx.controls.dolly(-1.0);
    }
    fx.controls.update(&mut fx.camera);
    assert_close(fx.camera.position.distance(fx.controls.target), 10.0);
}

#[test]
fn rotate_drag_keeps_the_distance() {
    let mut fx = Fixture::new();
    let projection = projection();
    fx.controls.start_drag(DragMode::Rotate, [100.0, 100.0]);
    fx.controls
        .drag_to([200.0, 100.0], 600.0, &fx.camera, &projection);
    assert!(fx.controls.update(&mut fx.camera));

    assert!(fx.camera.position.x.abs() > 1e-3);
    assert_close(fx.camera.position.distance(fx.controls.target), 5.0);
    assert!(fx.controls.end_drag());
    assert!(!fx.controls.is_dragging());
}

#[test]
fn drag_without_start_is_ignored() {
    let mut fx = Fixture::new();
    let projection = projection();
    fx.controls
        .drag_to([200.0, 100.0], 600.0, &fx.camera, &projection);
    fx.controls.update(&mut fx.camera);
    assert_close_point(fx.camera.position, Point3::new(0.0, 0.0, 5.0));
}

#[test]
fn centre_cursor_ray_points_at_the_target() {
    let mut fx = Fixture::new();
    let config = fx.config.clone();
    fx.room
        .reset_view(&mut fx.camera, &mut fx.controls, &config);

    let ray = fx
        .camera
        .cast_ray_from_cursor([400.0, 300.0], [800.0, 600.0], &projection())
        .unwrap();
    let expected = (Point3::new(0.0, 0.5, 0.0) - fx.camera.position).normalize();
    assert!((ray.direction - expected).magnitude() < 1e-3);
    assert_close_point(ray.origin, fx.camera.position);
}

#[test]
fn zero_sized_viewport_has_no_ray() {
    let fx = Fixture::new();
    let ray = fx
        .camera
        .cast_ray_from_cursor([0.0, 0.0], [0.0, 0.0], &projection());
    assert!(ray.is_none());
}
