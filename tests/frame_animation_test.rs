mod common;

use common::test_utils::{Fixture, assert_close};
use living_room::data_structures::material::Color;

#[test]
fn lamp_bulb_bobs_around_its_rest_height() {
    let mut fx = Fixture::new();
    let bulb = fx.node("Lamp Bulb");
    for ms in [0u64, 250, 785, 1600] {
        fx.frame(ms);
        let y = fx.room.scene.node(bulb).unwrap().local.position.y;
        let expected = 1.25 + (ms as f64 * 0.002).sin() as f32 * 0.08;
        assert_close(y, expected);
    }
}

#[test]
fn tv_switches_only_after_the_interval() {
    let mut fx = Fixture::new();
    fx.frame(1000);
    assert_eq!(fx.room.screen_index(), 0);
    assert_eq!(fx.colour_of("TV Screen"), Color::from_hex(0x1e90ff));

    fx.frame(1001);
    assert_eq!(fx.room.screen_index(), 1);
    let material = fx.room.handles.tv_screen_material.unwrap();
    let material = fx.room.materials.get(material).unwrap();
    assert_eq!(material.color, Color::from_hex(0x00ff99));
    assert_eq!(material.emissive, Color::from_hex(0x00ff99));

    fx.frame(1500);
    assert_eq!(fx.room.screen_index(), 1);

    fx.frame(2002);
    assert_eq!(fx.room.screen_index(), 2);
    assert_eq!(fx.colour_of("TV Screen"), Color::from_hex(0xff69b4));
}

#[test]
fn tv_palette_wraps_around() {
    let mut fx = Fixture::new();
    for step in 1..=5u64 {
        fx.frame(step * 1100);
    }
    assert_eq!(fx.room.screen_index(), 0);
    assert_eq!(fx.colour_of("TV Screen"), Color::from_hex(0x1e90ff));
}

#[test]
fn lamp_light_pulses() {
    let mut fx = Fixture::new();
    for ms in [0u64, 300, 523, 2000] {
        fx.frame(ms);
        let expected = 1.2 + (ms as f64 * 0.003).sin() as f32 * 0.5;
        assert_close(fx.room.lights.lamp_spot.intensity, expected);
    }
}

#[test]
fn world_transforms_follow_the_bob() {
    let mut fx = Fixture::new();
    let bulb = fx.node("Lamp Bulb");
    fx.frame(785);
    let node = fx.room.scene.node(bulb).unwrap();
    assert_close(node.world().position.y, node.local.position.y);
}
