use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture};
use js_sys::{Function, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, future_to_promise};

use crate::application::{BrowserRegistry, HicBrowser, InitialView, ZoomDirection};
use crate::config::BrowserConfig;
use crate::domain::dataset::{Dataset, DatasetDescriptor, GeneLocator, MatrixDescriptor, MatrixSource};
use crate::domain::errors::{DatasetError, DatasetResult, NavResult};
use crate::domain::events::{DomainEvent, HicEvent, SubscriptionId};
use crate::domain::genome::Normalization;
use crate::domain::logging::{LogComponent, Logger, get_logger};
use crate::domain::view::{BrowserId, DisplayMode, SyncState, ViewDimensions};
use crate::infrastructure::BrowserSession;
use crate::view_state::ViewState;

// Browsers on one page share a registry so they can be linked.
thread_local! {
    static REGISTRY: BrowserRegistry = BrowserRegistry::new();
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn state_promise<F>(operation: F) -> Promise
where
    F: std::future::Future<Output = NavResult<ViewState>> + 'static,
{
    future_to_promise(async move {
        operation
            .await
            .map(|state| JsValue::from_str(&state.to_string()))
            .map_err(to_js)
    })
}

/// Matrix metadata from a page callback `(chr1, chr2) => Promise<string>`
/// resolving to the JSON of a matrix descriptor.
struct JsMatrixSource {
    loader: Function,
}

impl MatrixSource for JsMatrixSource {
    fn get_matrix(&self, chr1: usize, chr2: usize) -> LocalBoxFuture<'_, DatasetResult<MatrixDescriptor>> {
        let call = self.loader.call2(&JsValue::NULL, &JsValue::from(chr1 as u32), &JsValue::from(chr2 as u32));
        async move {
            let unavailable = |reason: String| DatasetError::MatrixUnavailable { chr1, chr2, reason };

            let pending = call.map_err(|err| unavailable(format!("{:?}", err)))?;
            let resolved = JsFuture::from(Promise::resolve(&pending))
                .await
                .map_err(|err| unavailable(format!("{:?}", err)))?;
            let json = resolved
                .as_string()
                .ok_or_else(|| unavailable("loader did not resolve to a string".to_string()))?;
            serde_json::from_str(&json).map_err(|err| unavailable(err.to_string()))
        }
        .boxed_local()
    }
}

/// Gene search through a page callback `(genomeId, name) => Promise<string | null>`
/// resolving to a locus string.
struct JsGeneLocator {
    search: Function,
}

impl GeneLocator for JsGeneLocator {
    fn locate<'a>(&'a self, genome_id: &'a str, name: &'a str) -> LocalBoxFuture<'a, Option<String>> {
        let call = self.search.call2(&JsValue::NULL, &JsValue::from_str(genome_id), &JsValue::from_str(name));
        async move {
            let pending = call.ok()?;
            JsFuture::from(Promise::resolve(&pending)).await.ok()?.as_string()
        }
        .boxed_local()
    }
}

fn dataset_from_json(descriptor_json: &str, loader: Function) -> Result<Dataset, JsValue> {
    let descriptor: DatasetDescriptor = serde_json::from_str(descriptor_json).map_err(to_js)?;
    Dataset::new(descriptor, Rc::new(JsMatrixSource { loader })).map_err(to_js)
}

/// One contact-map browser as seen from the page.
#[wasm_bindgen]
pub struct HicBrowserApi {
    browser: Rc<HicBrowser>,
    viewport: Rc<Cell<ViewDimensions>>,
    initial_view: RefCell<Option<InitialView>>,
    subscriptions: RefCell<Vec<SubscriptionId>>,
}

#[wasm_bindgen]
impl HicBrowserApi {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<HicBrowserApi, JsValue> {
        let config = BrowserConfig::from_json(config_json).map_err(to_js)?;
        let initial_view = InitialView::from_config(&config).map_err(to_js)?;
        let viewport = Rc::new(Cell::new(config.dimensions()));

        let browser = REGISTRY.with(|registry| registry.create_browser(config, viewport.clone()));
        get_logger().info(
            LogComponent::Presentation("HicBrowserApi"),
            &format!("🖼️ {} attached to page", browser.id()),
        );

        Ok(Self {
            browser,
            viewport,
            initial_view: RefCell::new(Some(initial_view)),
            subscriptions: RefCell::new(Vec::new()),
        })
    }

    #[wasm_bindgen(getter)]
    pub fn id(&self) -> u32 {
        self.browser.id().value()
    }

    /// Resize; the next navigation clamps to the new viewport.
    #[wasm_bindgen(js_name = setViewport)]
    pub fn set_viewport(&self, width: f64, height: f64) {
        self.viewport.set(ViewDimensions::new(width, height));
    }

    /// Load the main map. The state or sync state from the browser config
    /// positions the first map only.
    #[wasm_bindgen(js_name = loadDataset)]
    pub fn load_dataset(&self, descriptor_json: &str, loader: Function) -> Result<Promise, JsValue> {
        let dataset = dataset_from_json(descriptor_json, loader)?;
        let initial = self.initial_view.borrow_mut().take().unwrap_or_default();
        let browser = Rc::clone(&self.browser);
        Ok(state_promise(async move { browser.load_dataset(dataset, initial).await }))
    }

    #[wasm_bindgen(js_name = loadControlDataset)]
    pub fn load_control_dataset(&self, descriptor_json: &str, loader: Function) -> Result<(), JsValue> {
        let dataset = dataset_from_json(descriptor_json, loader)?;
        self.browser.load_control_dataset(dataset).map_err(to_js)
    }

    #[wasm_bindgen(js_name = setGeneLocator)]
    pub fn set_gene_locator(&self, search: Function) {
        self.browser.set_gene_locator(Rc::new(JsGeneLocator { search }));
    }

    #[wasm_bindgen(js_name = setChromosomes)]
    pub fn set_chromosomes(&self, chr1: usize, chr2: usize) -> Promise {
        let browser = Rc::clone(&self.browser);
        state_promise(async move { browser.set_chromosomes(chr1, chr2).await })
    }

    #[wasm_bindgen(js_name = setZoom)]
    pub fn set_zoom(&self, zoom: usize) -> Promise {
        let browser = Rc::clone(&self.browser);
        state_promise(async move { browser.set_zoom(zoom).await })
    }

    /// `direction > 0` zooms in.
    #[wasm_bindgen(js_name = zoomAndCenter)]
    pub fn zoom_and_center(&self, direction: i32, center_x: Option<f64>, center_y: Option<f64>) -> Promise {
        let browser = Rc::clone(&self.browser);
        let direction = ZoomDirection::from_sign(direction);
        state_promise(async move { browser.zoom_and_center(direction, center_x, center_y).await })
    }

    #[wasm_bindgen(js_name = pinchZoom)]
    pub fn pinch_zoom(&self, anchor_x: f64, anchor_y: f64, scale: f64) -> Promise {
        let browser = Rc::clone(&self.browser);
        state_promise(async move { browser.pinch_zoom(anchor_x, anchor_y, scale).await })
    }

    #[wasm_bindgen(js_name = wheelClickZoom)]
    pub fn wheel_click_zoom(&self, direction: i32, center_x: f64, center_y: f64) -> Promise {
        let browser = Rc::clone(&self.browser);
        let direction = ZoomDirection::from_sign(direction);
        state_promise(async move { browser.wheel_click_zoom(direction, center_x, center_y).await })
    }

    #[wasm_bindgen(js_name = shiftPixels)]
    pub fn shift_pixels(&self, dx: f64, dy: f64) -> Result<String, JsValue> {
        self.browser.shift_pixels(dx, dy).map(|state| state.to_string()).map_err(to_js)
    }

    /// Locus box input: loci or a gene name.
    #[wasm_bindgen(js_name = gotoLocus)]
    pub fn goto_locus(&self, text: String) -> Promise {
        let browser = Rc::clone(&self.browser);
        state_promise(async move { browser.parse_goto_input(&text).await })
    }

    #[wasm_bindgen(js_name = setState)]
    pub fn set_state(&self, state: &str) -> Result<Promise, JsValue> {
        let state: ViewState = state.parse().map_err(to_js)?;
        let browser = Rc::clone(&self.browser);
        Ok(state_promise(async move { browser.set_state(state).await }))
    }

    #[wasm_bindgen(js_name = setNormalization)]
    pub fn set_normalization(&self, normalization: String) {
        self.browser.set_normalization(Normalization::from(normalization));
    }

    /// `A`, `B`, `AOB`, `BOA` or `AMB`.
    #[wasm_bindgen(js_name = setDisplayMode)]
    pub fn set_display_mode(&self, mode: String) -> Result<(), JsValue> {
        let mode: DisplayMode =
            mode.parse().map_err(|_| JsValue::from_str(&format!("Unknown display mode: {}", mode)))?;
        self.browser.set_display_mode(mode);
        Ok(())
    }

    #[wasm_bindgen(js_name = setDisplayModeCycle)]
    pub fn set_display_mode_cycle(&self, cycle: bool) {
        self.browser.set_display_mode_cycle(cycle);
    }

    #[wasm_bindgen(js_name = setResolutionLocked)]
    pub fn set_resolution_locked(&self, locked: bool) {
        self.browser.set_resolution_locked(locked);
    }

    /// Compact state string `chr1,chr2,zoom,x,y,pixelSize,normalization`.
    pub fn state(&self) -> String {
        self.browser.state().to_string()
    }

    #[wasm_bindgen(js_name = locusText)]
    pub fn locus_text(&self) -> Result<String, JsValue> {
        self.browser.current_locus_text().map_err(to_js)
    }

    /// JSON array of `{index, binSize}` usable with the loaded maps.
    pub fn resolutions(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.browser.get_resolutions()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = syncState)]
    pub fn sync_state(&self) -> Result<Option<String>, JsValue> {
        self.browser
            .get_sync_state()
            .map(|sync| serde_json::to_string(&sync))
            .transpose()
            .map_err(to_js)
    }

    /// Follow a sync state; `false` when this browser cannot show it.
    #[wasm_bindgen(js_name = applySyncState)]
    pub fn apply_sync_state(&self, sync_json: &str) -> Result<bool, JsValue> {
        let sync: SyncState = serde_json::from_str(sync_json).map_err(to_js)?;
        Ok(self.browser.sync_state(&sync).is_applied())
    }

    #[wasm_bindgen(js_name = sessionJson)]
    pub fn session_json(&self) -> Result<Option<String>, JsValue> {
        BrowserSession::capture(&self.browser)
            .map(|session| session.to_json())
            .transpose()
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = queryString)]
    pub fn query_string(&self) -> Option<String> {
        BrowserSession::capture(&self.browser).map(|session| session.to_query_string())
    }

    /// Register `(eventType, stateString | undefined) => void` for every
    /// event this browser publishes.
    pub fn subscribe(&self, callback: Function) {
        let id = self.browser.events().subscribe(move |event: &HicEvent| {
            let payload = event
                .as_locus_change()
                .map(|change| JsValue::from_str(&change.state.to_string()))
                .unwrap_or(JsValue::UNDEFINED);
            if let Err(err) = callback.call2(&JsValue::NULL, &JsValue::from_str(event.event_type()), &payload) {
                crate::log_warn!(
                    LogComponent::Presentation("HicBrowserApi"),
                    "Event callback failed: {:?}",
                    err
                );
            }
        });
        self.subscriptions.borrow_mut().push(id);
    }

    /// Make this the browser page-level controls act on.
    pub fn select(&self) -> bool {
        REGISTRY.with(|registry| registry.set_current_browser(self.browser.id()))
    }
}

impl Drop for HicBrowserApi {
    fn drop(&mut self) {
        for id in self.subscriptions.borrow_mut().drain(..) {
            self.browser.events().unsubscribe(id);
        }
        let id = self.browser.id();
        REGISTRY.with(|registry| registry.remove_browser(id));
    }
}

/// Link browsers so that navigating one moves the others. Returns the ids
/// actually linked.
#[wasm_bindgen(js_name = syncBrowsers)]
pub fn sync_browsers(ids: Vec<u32>) -> Vec<u32> {
    let ids: Vec<BrowserId> = ids.into_iter().map(BrowserId::from).collect();
    REGISTRY.with(|registry| {
        registry
            .sync_browsers(&ids)
            .into_iter()
            .map(|id| id.value())
            .collect()
    })
}

/// Query parameters of a shared link, as session JSON.
#[wasm_bindgen(js_name = sessionFromUrl)]
pub fn session_from_url(url: &str) -> Result<Option<String>, JsValue> {
    let query = crate::infrastructure::session::extract_query(url);
    BrowserSession::from_query(&query)
        .map(|session| session.to_json())
        .transpose()
        .map_err(to_js)
}
