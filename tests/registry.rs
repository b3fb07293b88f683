mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{config, dataset, VIEW};
use futures::executor::block_on;
use hic_browser_wasm::application::{BrowserRegistry, InitialView};
use hic_browser_wasm::domain::events::HicEvent;
use hic_browser_wasm::domain::view::ViewDimensions;

fn registry_with_two() -> BrowserRegistry {
    let registry = BrowserRegistry::new();
    for name in ["a", "b"] {
        let browser = registry.create_browser(config(), Rc::new(ViewDimensions::new(VIEW, VIEW)));
        let (dataset, _) = dataset(name);
        block_on(browser.load_dataset(dataset, InitialView::Default)).unwrap();
    }
    registry
}

#[test]
fn single_browser_is_current_by_default() {
    let registry = BrowserRegistry::new();
    let browser = registry.create_browser(config(), Rc::new(ViewDimensions::new(VIEW, VIEW)));
    assert_eq!(registry.current_browser().map(|b| b.id()), Some(browser.id()));
}

#[test]
fn selection_is_announced_on_the_page_channel() {
    let registry = registry_with_two();
    let selected = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&selected);
    registry.global_events().subscribe(move |event: &HicEvent| {
        if let HicEvent::BrowserSelect { browser } = event {
            sink.borrow_mut().push(*browser);
        }
    });

    let second = registry.browsers()[1].id();
    assert!(registry.current_browser().is_none());
    assert!(registry.set_current_browser(second));
    assert!(!registry.set_current_browser(second));

    assert_eq!(*selected.borrow(), vec![second]);
    assert_eq!(registry.current_browser().map(|b| b.id()), Some(second));
}

#[test]
fn synced_browsers_move_together_until_removed() {
    let registry = registry_with_two();
    let browsers = registry.browsers();
    let ids: Vec<_> = browsers.iter().map(|b| b.id()).collect();

    assert_eq!(registry.sync_browsers(&ids), ids);
    block_on(browsers[0].set_chromosomes(1, 2)).unwrap();
    assert_eq!(browsers[1].state(), browsers[0].state());

    registry.remove_browser(ids[1]);
    assert_eq!(registry.len(), 1);
    assert!(browsers[0].sync_coordinator().peer_ids().is_empty());

    block_on(browsers[0].set_chromosomes(1, 1)).unwrap();
    assert_ne!(browsers[1].state(), browsers[0].state());
}

#[test]
fn first_load_announces_the_genome() {
    let registry = BrowserRegistry::new();
    let genomes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&genomes);
    registry.global_events().subscribe(move |event: &HicEvent| {
        if let HicEvent::GenomeChange { genome_id } = event {
            sink.borrow_mut().push(genome_id.clone());
        }
    });

    let browser = registry.create_browser(config(), Rc::new(ViewDimensions::new(VIEW, VIEW)));
    for name in ["a", "b"] {
        let (dataset, _) = dataset(name);
        block_on(browser.load_dataset(dataset, InitialView::Default)).unwrap();
    }

    assert_eq!(*genomes.borrow(), vec!["hg19".to_string()]);
}
