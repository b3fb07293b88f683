mod common;

use common::{assert_close, dataset};
use futures::executor::block_on;
use hic_browser_wasm::application::{BrowserRegistry, InitialView};
use hic_browser_wasm::config::BrowserConfig;

#[test]
fn configured_state_positions_the_first_map() {
    let config = BrowserConfig::from_json(r#"{"width":600,"height":600,"state":"1,2,1,0,0,1,KR"}"#).unwrap();
    let initial = InitialView::from_config(&config).unwrap();
    let registry = BrowserRegistry::new();
    let browser = registry.create_browser(config.clone(), std::rc::Rc::new(config.dimensions()));

    let (dataset, _) = dataset("configured");
    let state = block_on(browser.load_dataset(dataset, initial)).unwrap();

    // Pixel size is raised until chr1 fills the 600 px view at 1 Mb bins.
    assert_eq!((state.chr1, state.chr2, state.zoom), (1, 2, 1));
    assert_close(state.pixel_size, 2.4);
    assert_eq!(state.normalization.as_str(), "KR");
}

#[test]
fn malformed_state_in_config_is_rejected() {
    assert!(BrowserConfig::from_json(r#"{"state":"1,2"}"#).is_err());
}

#[test]
fn mini_mode_is_an_alias_for_figure_mode() {
    let config = BrowserConfig::from_json(r#"{"miniMode":true}"#).unwrap();
    assert!(config.figure_mode);
}
