#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::executor::block_on;
use futures::future::{FutureExt, LocalBoxFuture};
use hic_browser_wasm::application::{HicBrowser, InitialView};
use hic_browser_wasm::config::BrowserConfig;
use hic_browser_wasm::domain::dataset::{
    ChromosomeDescriptor, Dataset, DatasetDescriptor, MatrixDescriptor, MatrixSource,
};
use hic_browser_wasm::domain::errors::DatasetResult;
use hic_browser_wasm::domain::events::{EventChannel, HicEvent};
use hic_browser_wasm::domain::view::{BrowserId, ViewDimensions};
use hic_browser_wasm::infrastructure::StaticMatrixSource;

pub const LADDER: [u64; 3] = [2_500_000, 1_000_000, 500_000];
pub const VIEW: f64 = 600.0;

/// `All` + chr1 (250 Mb) + chr2 (200 Mb) on hg19.
pub fn descriptor(name: &str, bp_resolutions: &[u64]) -> DatasetDescriptor {
    DatasetDescriptor {
        name: name.to_string(),
        url: Some(format!("https://example.org/{}.hic", name)),
        genome_id: "hg19".to_string(),
        chromosomes: vec![
            ChromosomeDescriptor { name: "All".to_string(), size: 450_000_000 },
            ChromosomeDescriptor { name: "chr1".to_string(), size: 250_000_000 },
            ChromosomeDescriptor { name: "chr2".to_string(), size: 200_000_000 },
        ],
        bp_resolutions: bp_resolutions.to_vec(),
        whole_genome_resolution: None,
        nvi: None,
    }
}

pub fn dataset(name: &str) -> (Dataset, Rc<StaticMatrixSource>) {
    dataset_with_ladder(name, &LADDER)
}

pub fn dataset_with_ladder(name: &str, bp_resolutions: &[u64]) -> (Dataset, Rc<StaticMatrixSource>) {
    let source = Rc::new(StaticMatrixSource::new(bp_resolutions.to_vec()));
    let dataset = Dataset::new(descriptor(name, bp_resolutions), source.clone()).expect("valid descriptor");
    (dataset, source)
}

pub fn config() -> BrowserConfig {
    BrowserConfig { width: VIEW, height: VIEW, ..BrowserConfig::default() }
}

pub fn browser(id: u32) -> Rc<HicBrowser> {
    HicBrowser::new(
        BrowserId::from(id),
        config(),
        Rc::new(ViewDimensions::new(VIEW, VIEW)),
        Rc::new(EventChannel::new()),
    )
}

/// A 600×600 browser showing the fixture dataset's whole-genome view.
pub fn loaded_browser() -> (Rc<HicBrowser>, Rc<StaticMatrixSource>) {
    let browser = browser(1);
    let (dataset, source) = dataset("sample");
    block_on(browser.load_dataset(dataset, InitialView::Default)).expect("dataset loads");
    (browser, source)
}

/// Records every event a browser publishes.
pub fn record_events(browser: &HicBrowser) -> Rc<RefCell<Vec<HicEvent>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    browser.events().subscribe(move |event: &HicEvent| sink.borrow_mut().push(event.clone()));
    seen
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-6, "expected {}, got {}", expected, actual);
}

/// Matrix source whose answers for chosen pairs wait until released.
pub struct GatedMatrixSource {
    bp_resolutions: Vec<u64>,
    gates: RefCell<HashMap<(usize, usize), oneshot::Receiver<()>>>,
}

impl GatedMatrixSource {
    pub fn new(bp_resolutions: &[u64]) -> Self {
        Self { bp_resolutions: bp_resolutions.to_vec(), gates: RefCell::new(HashMap::new()) }
    }

    /// Hold the next fetch of `(chr1, chr2)` until the sender fires or drops.
    pub fn gate(&self, chr1: usize, chr2: usize) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.gates.borrow_mut().insert((chr1, chr2), gate);
        release
    }
}

impl MatrixSource for GatedMatrixSource {
    fn get_matrix(&self, chr1: usize, chr2: usize) -> LocalBoxFuture<'_, DatasetResult<MatrixDescriptor>> {
        let gate = self.gates.borrow_mut().remove(&(chr1, chr2));
        let matrix = MatrixDescriptor::from_ladder(chr1, chr2, &self.bp_resolutions);
        async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            Ok(matrix)
        }
        .boxed_local()
    }
}
