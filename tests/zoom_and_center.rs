mod common;

use std::rc::Rc;

use common::{LADDER, assert_close, browser, descriptor, loaded_browser};
use futures::executor::block_on;
use hic_browser_wasm::application::{InitialView, ZoomDirection};
use hic_browser_wasm::domain::dataset::Dataset;
use hic_browser_wasm::infrastructure::StaticMatrixSource;

#[test]
fn click_on_whole_genome_opens_that_chromosome_pair() {
    let (browser, _) = loaded_browser();
    assert!(browser.is_whole_genome());

    // 100 px → 75 Mb (chr1), 400 px → 300 Mb (chr2 starts at 250 Mb).
    let state = block_on(browser.zoom_and_center(ZoomDirection::In, Some(100.0), Some(400.0))).unwrap();

    assert_eq!((state.chr1, state.chr2, state.zoom), (1, 2, 2));
    assert_close(state.pixel_size, 1.2);
}

#[test]
fn whole_genome_click_uses_the_whole_genome_resolution() {
    let mut descriptor = descriptor("wg", &LADDER);
    descriptor.whole_genome_resolution = Some(1_000_000);
    let dataset = Dataset::new(descriptor, Rc::new(StaticMatrixSource::new(LADDER.to_vec()))).unwrap();
    let browser = browser(1);
    let start = block_on(browser.load_dataset(dataset, InitialView::Default)).unwrap();
    assert_close(start.pixel_size, 600.0 / 180.0);

    // 400 px at 1 Mb per bin is 120 Mb, inside chr1. Ladder bins would say 300 Mb.
    let state = block_on(browser.zoom_and_center(ZoomDirection::In, Some(400.0), Some(400.0))).unwrap();

    assert_eq!((state.chr1, state.chr2), (1, 1));
}

#[test]
fn zooming_out_steps_one_level_and_keeps_the_centre() {
    let (browser, _) = loaded_browser();
    block_on(browser.set_chromosomes(1, 2)).unwrap();

    let state = block_on(browser.zoom_and_center(ZoomDirection::Out, None, None)).unwrap();

    assert_eq!(state.zoom, 1);
    assert_close(state.pixel_size, 2.4);
    assert_close(state.x, 0.0);
    assert_close(state.y, 0.0);
}

#[test]
fn at_finest_zoom_pixels_double_around_the_centre() {
    let (browser, _) = loaded_browser();
    block_on(browser.set_chromosomes(1, 2)).unwrap();

    let state = block_on(browser.zoom_and_center(ZoomDirection::In, None, None)).unwrap();

    assert_eq!(state.zoom, 2);
    assert_close(state.pixel_size, 2.4);
    // Centre bin 250 before and after.
    assert_close(state.x + 300.0 / state.pixel_size, 250.0);
    assert_close(state.y + 300.0 / state.pixel_size, 250.0);
}

#[test]
fn resolution_lock_changes_pixel_size_only() {
    let (browser, _) = loaded_browser();
    block_on(browser.set_chromosomes(1, 2)).unwrap();
    browser.set_resolution_locked(true);

    let state = block_on(browser.zoom_and_center(ZoomDirection::Out, None, None)).unwrap();

    // Halving would drop below the 1.2 floor, so pixel size stays put.
    assert_eq!(state.zoom, 2);
    assert_close(state.pixel_size, 1.2);
}

#[test]
fn set_zoom_keeps_the_centre_in_base_pairs() {
    let (browser, _) = loaded_browser();
    block_on(browser.set_chromosomes(1, 2)).unwrap();
    block_on(browser.zoom_and_center(ZoomDirection::In, None, None)).unwrap();

    let state = block_on(browser.set_zoom(1)).unwrap();

    // 250 bins of 500 kb is 125 Mb; at 1 Mb bins that is bin 125.
    assert_eq!(state.zoom, 1);
    assert_close(state.pixel_size, 2.4);
    assert_close(state.x + 300.0 / state.pixel_size, 125.0);
}

#[test]
fn wheel_out_at_coarsest_legal_zoom_goes_to_whole_genome() {
    let (browser, _) = loaded_browser();
    block_on(browser.set_chromosomes(1, 2)).unwrap();

    let state = block_on(browser.wheel_click_zoom(ZoomDirection::Out, 300.0, 300.0)).unwrap();

    assert_eq!((state.chr1, state.chr2), (0, 0));
}

#[test]
fn wheel_in_delegates_to_zoom_and_center() {
    let (browser, _) = loaded_browser();
    block_on(browser.set_chromosomes(1, 2)).unwrap();

    let state = block_on(browser.wheel_click_zoom(ZoomDirection::In, 300.0, 300.0)).unwrap();

    assert_eq!((state.chr1, state.chr2, state.zoom), (1, 2, 2));
    assert_close(state.pixel_size, 2.4);
}
