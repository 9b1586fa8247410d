mod common;

use anyhow::anyhow;
use common::test_utils::{Fixture, RecordingPage};
use living_room::{
    data_structures::material::Color,
    page::{TEXTURE_ERROR_TEXT, canvas_missing, report_startup, report_startup_error},
    resources::scene::report_map,
};

#[test]
fn failed_map_is_reported_and_skipped() {
    let fx = Fixture::new();
    let mut page = RecordingPage::default();
    let source = fx.config.wood_texture_url.clone();

    let loaded: anyhow::Result<u32> = Err(anyhow!("could not load {source}"));
    assert_eq!(report_map(&source, loaded, &mut page), None);
    assert_eq!(page.errors, [TEXTURE_ERROR_TEXT]);

    // the wood keeps its plain white base colour and its map reference
    let wood = fx.room.materials.get(fx.room.handles.wood).unwrap();
    assert_eq!(wood.color, Color::from_hex(0xffffff));
    assert_eq!(wood.map.as_ref().unwrap().source, source);
}

#[test]
fn every_failed_map_is_reported() {
    let mut page = RecordingPage::default();
    for source in ["a.jpg", "b.jpg"] {
        let loaded: anyhow::Result<u32> = Err(anyhow!("missing {source}"));
        assert!(report_map(source, loaded, &mut page).is_none());
    }
    assert_eq!(page.errors, [TEXTURE_ERROR_TEXT, TEXTURE_ERROR_TEXT]);
}

#[test]
fn loaded_map_is_kept_silently() {
    let mut page = RecordingPage::default();
    assert_eq!(report_map("wood.jpg", Ok(7u32), &mut page), Some(7));
    assert!(page.errors.is_empty());
}

#[test]
fn startup_failure_reaches_the_error_element() {
    let mut page = RecordingPage::default();
    let started: anyhow::Result<()> = Err(anyhow!("no suitable graphics adapter"));
    assert!(report_startup(started, &mut page).is_none());
    assert_eq!(page.errors, ["Error: no suitable graphics adapter"]);

    assert_eq!(report_startup(Ok(3), &mut page), Some(3));
    assert_eq!(page.errors.len(), 1);
}

#[test]
fn missing_canvas_is_a_startup_failure() {
    let mut page = RecordingPage::default();
    report_startup_error(&canvas_missing(), &mut page);
    assert_eq!(page.errors, ["Error: Canvas element not found!"]);
    assert!(page.infos.is_empty());
}
