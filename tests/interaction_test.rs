mod common;

use cgmath::Vector3;
use common::test_utils::{Fixture, ray_at_nothing, ray_at_table, ray_at_tv};
use living_room::data_structures::material::Color;

#[test]
fn hover_highlights_and_moving_off_restores() {
    let mut fx = Fixture::new();
    let screen = fx.node("TV Screen");

    assert_eq!(fx.room.on_pointer_move(&ray_at_tv()), Some(screen));
    assert_eq!(fx.room.interaction.hovered(), Some(screen));
    assert_eq!(fx.colour_of("TV Screen"), Color::from_hex(0xff0000));
    let scale = fx.room.scene.node(screen).unwrap().local.scale;
    assert_eq!(scale, Vector3::new(1.1, 1.1, 1.1));

    assert_eq!(fx.room.on_pointer_move(&ray_at_nothing()), None);
    assert_eq!(fx.room.interaction.hovered(), None);
    assert_eq!(fx.colour_of("TV Screen"), Color::from_hex(0x1e90ff));
    let scale = fx.room.scene.node(screen).unwrap().local.scale;
    assert_eq!(scale, Vector3::new(1.0, 1.0, 1.0));
}

#[test]
fn first_hover_record_wins() {
    let mut fx = Fixture::new();
    fx.room.on_pointer_move(&ray_at_tv());
    fx.room.on_pointer_move(&ray_at_nothing());

    // the screen switches to its second palette colour
    fx.frame(1001);
    assert_eq!(fx.colour_of("TV Screen"), Color::from_hex(0x00ff99));

    fx.room.on_pointer_move(&ray_at_tv());
    fx.room.on_pointer_move(&ray_at_nothing());
    assert_eq!(fx.colour_of("TV Screen"), Color::from_hex(0x1e90ff));

    let screen = fx.node("TV Screen");
    assert_eq!(
        fx.room.interaction.original_colour(screen),
        Some(Color::from_hex(0x1e90ff))
    );
    assert_eq!(
        fx.room.interaction.original_scale(screen),
        Some(Vector3::new(1.0, 1.0, 1.0))
    );
}

#[test]
fn hovering_the_table_reddens_all_wood() {
    let mut fx = Fixture::new();
    let top = fx.node("Table Top");
    assert_eq!(fx.room.on_pointer_move(&ray_at_table()), Some(top));

    for leg in 1..=4 {
        assert_eq!(
            fx.colour_of(&format!("Table Leg {leg}")),
            Color::from_hex(0xff0000)
        );
    }
    let leg = fx.node("Table Leg 1");
    let scale = fx.room.scene.node(leg).unwrap().local.scale;
    assert_eq!(scale, Vector3::new(1.0, 1.0, 1.0));
}

#[test]
fn moving_between_meshes_restores_the_previous_one() {
    let mut fx = Fixture::new();
    fx.room.on_pointer_move(&ray_at_tv());
    let top = fx.node("Table Top");
    assert_eq!(fx.room.on_pointer_move(&ray_at_table()), Some(top));
    assert_eq!(fx.colour_of("TV Screen"), Color::from_hex(0x1e90ff));
    assert_eq!(fx.colour_of("Table Top"), Color::from_hex(0xff0000));
}

#[test]
fn click_shows_part_name_then_hides() {
    let mut fx = Fixture::new();
    fx.room.on_pointer_move(&ray_at_tv());
    let now = fx.at_ms(100);
    fx.room.on_click(now, &mut fx.page);

    assert_eq!(fx.page.last_info(), Some("Part: TV Screen"));
    assert!(fx.page.info_visible());
    assert!(fx.room.interaction.info_panel().is_visible());

    fx.frame(2000);
    assert!(fx.page.info_visible());
    assert_eq!(fx.page.hides(), 0);

    fx.frame(2100);
    assert!(!fx.page.info_visible());
    assert!(!fx.room.interaction.info_panel().is_visible());
    assert_eq!(fx.page.hides(), 1);
}

#[test]
fn click_without_hover_does_nothing() {
    let mut fx = Fixture::new();
    fx.room.on_pointer_move(&ray_at_nothing());
    let now = fx.at_ms(100);
    fx.room.on_click(now, &mut fx.page);

    assert!(fx.page.infos.is_empty());
    assert_eq!(fx.room.interaction.info_panel().pending_hides(), 0);
}

#[test]
fn every_click_schedules_its_own_hide() {
    let mut fx = Fixture::new();
    fx.room.on_pointer_move(&ray_at_tv());
    let first = fx.at_ms(100);
    fx.room.on_click(first, &mut fx.page);

    fx.room.on_pointer_move(&ray_at_table());
    let second = fx.at_ms(1500);
    fx.room.on_click(second, &mut fx.page);
    assert_eq!(fx.page.last_info(), Some("Part: Table Top"));
    assert_eq!(fx.room.interaction.info_panel().pending_hides(), 2);

    // the first timer hides the panel even though the second text is showing
    fx.frame(2100);
    assert!(!fx.page.info_visible());
    assert_eq!(fx.page.hides(), 1);

    fx.frame(3500);
    assert_eq!(fx.page.hides(), 2);
    assert_eq!(fx.room.interaction.info_panel().pending_hides(), 0);
}
