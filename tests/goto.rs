mod common;

use common::{assert_close, loaded_browser, record_events};
use futures::executor::block_on;
use hic_browser_wasm::application::GenomicRange;
use hic_browser_wasm::domain::errors::NavigationError;
use hic_browser_wasm::domain::events::HicEvent;

#[test]
fn megabase_window_lands_on_finest_bin_with_max_pixel_size() {
    let (browser, _) = loaded_browser();
    let range = GenomicRange::new(1, 1_000_000.0, Some(2_000_000.0));

    let state = browser.goto(range, range, None).unwrap();

    assert_eq!((state.chr1, state.chr2, state.zoom), (1, 1, 2));
    assert_close(state.x, 2.0);
    assert_close(state.y, 2.0);
    assert_close(state.pixel_size, 12.0);
}

#[test]
fn axes_are_swapped_when_x_chromosome_is_higher() {
    let (browser, _) = loaded_browser();
    let x = GenomicRange::new(2, 10_000_000.0, Some(11_000_000.0));
    let y = GenomicRange::new(1, 20_000_000.0, Some(21_000_000.0));

    let state = browser.goto(x, y, None).unwrap();

    assert_eq!((state.chr1, state.chr2), (1, 2));
    assert_close(state.x, 40.0);
    assert_close(state.y, 20.0);
}

#[test]
fn minimum_resolution_widens_small_windows() {
    let (browser, _) = loaded_browser();
    let range = GenomicRange::new(1, 100_000_000.0, Some(100_001_000.0));

    let state = browser.goto(range, range, Some(600_000.0)).unwrap();

    // 600 px at 600 kb per px: coarsest entry still at least that wide is 1 Mb.
    assert_eq!(state.zoom, 1);
    assert_close(state.pixel_size, 1_000_000.0 / 600_000.0);
}

#[test]
fn invalidates_tiles_before_the_locus_change() {
    let (browser, _) = loaded_browser();
    let events = record_events(&browser);
    let range = GenomicRange::new(1, 1_000_000.0, Some(2_000_000.0));

    browser.goto(range, range, None).unwrap();

    let kinds: Vec<&'static str> = events.borrow().iter().map(<&'static str>::from).collect();
    assert_eq!(kinds, vec!["TileCacheInvalidated", "LocusChange"]);
    let change = events.borrow()[1].as_locus_change().cloned().unwrap();
    assert!(change.resolution_changed && change.chr_changed);
    assert!(matches!(events.borrow()[0], HicEvent::TileCacheInvalidated));
}

#[test]
fn unknown_chromosome_is_rejected() {
    let (browser, _) = loaded_browser();
    let range = GenomicRange::new(9, 0.0, Some(1_000.0));
    assert_eq!(browser.goto(range, range, None), Err(NavigationError::UnknownChromosome(9)));
}

#[test]
fn goto_from_the_sweep_rectangle() {
    use hic_browser_wasm::application::sweep::SweepZoom;

    let (browser, _) = loaded_browser();
    block_on(browser.set_chromosomes(1, 2)).unwrap();

    let mut sweep = SweepZoom::begin(browser.view_dimensions(), 0.0, 0.0);
    sweep.update(60.0, 60.0);
    let state = sweep.dismiss(&browser).unwrap();

    // 60 px at 1.2 px per 500 kb bin is 25 Mb on each axis.
    assert_eq!((state.chr1, state.chr2, state.zoom), (1, 2, 2));
    assert_close(state.x, 0.0);
    assert_close(state.pixel_size, 12.0);
}
