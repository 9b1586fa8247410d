mod common;

use cgmath::{Point3, Vector3};
use common::test_utils::{Fixture, assert_close, ray_at_table, ray_at_tv};
use living_room::{data_structures::material::Color, pick::Ray};

const PARTS: [&str; 31] = [
    "Sofa Seat",
    "Sofa Back",
    "Sofa Left Arm",
    "Sofa Right Arm",
    "Sofa Cushion 1",
    "Sofa Cushion 2",
    "Sofa Cushion 3",
    "Pillow 1",
    "Pillow 2",
    "Table Top",
    "Table Leg 1",
    "Table Leg 2",
    "Table Leg 3",
    "Table Leg 4",
    "Wall",
    "TV Body",
    "TV Screen",
    "TV Stand",
    "Lamp Stand",
    "Lamp Bulb",
    "Lamp Shade",
    "Flower Vase",
    "Flower Stem",
    "Flower Blossom",
    "Petal 1",
    "Petal 2",
    "Petal 3",
    "Petal 4",
    "Petal 5",
    "Flower Center",
    "Ground",
];

#[test]
fn room_has_every_part() {
    let fx = Fixture::new();
    assert_eq!(fx.room.scene.meshes().count(), 31);
    // scene root, room and sofa groups
    assert_eq!(fx.room.scene.len(), 34);
    assert_eq!(fx.room.materials.len(), 27);
    for part in PARTS {
        let id = fx.node(part);
        assert!(fx.room.scene.node(id).unwrap().is_mesh(), "{part} has no mesh");
    }
}

#[test]
fn table_shares_one_wood_material() {
    let fx = Fixture::new();
    let wood = fx.room.handles.wood;
    for part in ["Table Top", "Table Leg 1", "Table Leg 2", "Table Leg 3", "Table Leg 4"] {
        let id = fx.node(part);
        assert_eq!(fx.room.scene.node(id).unwrap().material(), Some(wood));
    }
    let map = fx.room.materials.get(wood).unwrap().map.as_ref().unwrap();
    assert_eq!(map.source, fx.config.wood_texture_url);
    assert_eq!(map.repeat, [2.0, 2.0]);
}

#[test]
fn shade_is_the_only_transparent_part() {
    let fx = Fixture::new();
    let transparent: Vec<&str> = fx
        .room
        .scene
        .meshes()
        .filter(|(_, node)| {
            let material = node.material().and_then(|m| fx.room.materials.get(m));
            material.is_some_and(|m| m.transparent)
        })
        .map(|(_, node)| node.name.as_str())
        .collect();
    assert_eq!(transparent, ["Lamp Shade"]);
}

#[test]
fn ground_receives_but_casts_no_shadow() {
    let fx = Fixture::new();
    let ground = fx.room.scene.node(fx.room.ground).unwrap();
    assert!(ground.receive_shadow);
    assert!(!ground.cast_shadow);
    assert_eq!(
        fx.room.materials.get(ground.material().unwrap()).unwrap().color,
        Color::from_hex(0x808080)
    );
}

#[test]
fn raycast_orders_hits_by_distance() {
    let fx = Fixture::new();
    let hits = fx.room.scene.raycast(&ray_at_table());
    let names: Vec<&str> = hits
        .iter()
        .map(|hit| fx.room.scene.node(hit.node).unwrap().name.as_str())
        .collect();
    assert_eq!(names, ["Table Top", "Ground"]);
    assert_close(hits[0].distance, 2.45);
    assert_close(hits[1].distance, 3.5);
}

#[test]
fn nearest_hit_in_front_of_the_tv_is_the_screen() {
    let fx = Fixture::new();
    let hit = fx.room.scene.pick(&ray_at_tv()).unwrap();
    assert_eq!(hit.node, fx.node("TV Screen"));
    assert_close(hit.distance, 4.615);
}

#[test]
fn back_faces_are_not_hit() {
    let fx = Fixture::new();
    // starts inside the table top and looks down
    let ray = Ray::new(Point3::new(0.5, 0.5, 0.9), -Vector3::unit_y());
    let hit = fx.room.scene.pick(&ray).unwrap();
    assert_eq!(hit.node, fx.room.ground);
    assert_close(hit.distance, 1.0);
}
