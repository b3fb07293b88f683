mod common;

use common::{assert_close, loaded_browser, record_events};
use futures::executor::block_on;
use hic_browser_wasm::domain::events::HicEvent;

#[test]
fn opens_pair_at_coarsest_zoom_that_fits() {
    let (browser, _) = loaded_browser();

    // 250 Mb over 600 px wants bins of at least 416,667 bp; 500 kb fits.
    let state = block_on(browser.set_chromosomes(1, 2)).unwrap();
    assert_eq!((state.chr1, state.chr2, state.zoom), (1, 2, 2));
    assert_eq!((state.x, state.y), (0.0, 0.0));
    assert_close(state.pixel_size, 1.2);
    assert_eq!(browser.state(), state);
}

#[test]
fn reversed_pair_gives_the_same_state() {
    let (forward, _) = loaded_browser();
    let (reversed, _) = loaded_browser();

    let expected = block_on(forward.set_chromosomes(1, 2)).unwrap();
    let state = block_on(reversed.set_chromosomes(2, 1)).unwrap();

    assert_eq!((state.chr1, state.chr2), (1, 2));
    assert_eq!(state, expected);
    assert_eq!(reversed.state(), forward.state());
}

#[test]
fn publishes_one_locus_change_with_both_flags() {
    let (browser, _) = loaded_browser();
    let events = record_events(&browser);

    block_on(browser.set_chromosomes(1, 2)).unwrap();

    let changes: Vec<_> = events.borrow().iter().filter_map(|e| e.as_locus_change().cloned()).collect();
    assert_eq!(changes.len(), 1);
    assert!(changes[0].resolution_changed);
    assert!(changes[0].chr_changed);
    assert!(!changes[0].dragging);
    assert_eq!(changes[0].state, browser.state());

    let shield: Vec<bool> = events
        .borrow()
        .iter()
        .filter_map(|e| match e {
            HicEvent::InteractionShield { engaged } => Some(*engaged),
            _ => None,
        })
        .collect();
    assert_eq!(shield, vec![true, false]);
}

#[test]
fn unknown_chromosome_leaves_state_alone() {
    let (browser, _) = loaded_browser();
    let before = browser.state();
    assert!(block_on(browser.set_chromosomes(1, 7)).is_err());
    assert_eq!(browser.state(), before);
}
