use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::application::coordinator::SyncCoordinator;
use crate::application::in_flight::{InteractionShield, NavigationSlot};
use crate::config::BrowserConfig;
use crate::domain::dataset::{Dataset, GeneLocator, Resolution};
use crate::domain::errors::{ConfigError, DatasetError, NavResult, NavigationError};
use crate::domain::events::{EventChannel, HicEvent, LocusChange};
use crate::domain::genome::{Normalization, format_locus};
use crate::domain::logging::{LogComponent, Logger, get_logger};
use crate::domain::view::{
    Axis, BoundsProvider, BrowserId, DisplayMode, GenomicState, SyncState, ViewDimensions, ViewportSource,
};
use crate::view_state::ViewState;

/// Flags carried by the `LocusChange` published for a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeFlags {
    pub resolution_changed: bool,
    pub chr_changed: bool,
    pub dragging: bool,
    pub propagate: bool,
}

impl ChangeFlags {
    /// User-driven change; linked browsers follow.
    pub fn navigation(resolution_changed: bool, chr_changed: bool) -> Self {
        Self { resolution_changed, chr_changed, dragging: false, propagate: true }
    }

    pub fn drag() -> Self {
        Self { resolution_changed: false, chr_changed: false, dragging: true, propagate: true }
    }

    /// Applied on behalf of a peer; never re-broadcast.
    pub fn sync(resolution_changed: bool, chr_changed: bool) -> Self {
        Self { resolution_changed, chr_changed, dragging: false, propagate: false }
    }
}

/// How the view is positioned once a new dataset is installed.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InitialView {
    #[default]
    Default,
    State(ViewState),
    Sync(SyncState),
}

impl InitialView {
    pub fn from_config(config: &BrowserConfig) -> Result<Self, ConfigError> {
        if let Some(state) = config.initial_state()? {
            return Ok(InitialView::State(state));
        }
        Ok(config.synch_state.clone().map(InitialView::Sync).unwrap_or_default())
    }
}

/// One contact-map browser: its view state, loaded datasets and the event
/// channel every committed change is published on.
pub struct HicBrowser {
    id: BrowserId,
    config: BrowserConfig,
    viewport: Rc<dyn ViewportSource>,
    state: RefCell<ViewState>,
    dataset: RefCell<Option<Rc<Dataset>>>,
    control_dataset: RefCell<Option<Rc<Dataset>>>,
    display_mode: Cell<DisplayMode>,
    display_mode_cycle: Cell<bool>,
    events: Rc<EventChannel<HicEvent>>,
    global_events: Rc<EventChannel<HicEvent>>,
    shield: Rc<InteractionShield>,
    pub(crate) slot: NavigationSlot,
    resolution_locked: Cell<bool>,
    selected_gene: RefCell<Option<String>>,
    gene_locator: RefCell<Option<Rc<dyn GeneLocator>>>,
    sync: Rc<SyncCoordinator>,
}

impl HicBrowser {
    pub fn new(
        id: BrowserId,
        config: BrowserConfig,
        viewport: Rc<dyn ViewportSource>,
        global_events: Rc<EventChannel<HicEvent>>,
    ) -> Rc<Self> {
        let events = Rc::new(EventChannel::new());
        let shield = Rc::new(InteractionShield::new(Rc::clone(&events)));
        let resolution_locked = config.resolution_locked;

        let browser = Rc::new_cyclic(|weak| Self {
            id,
            config,
            viewport,
            state: RefCell::new(ViewState::default()),
            dataset: RefCell::new(None),
            control_dataset: RefCell::new(None),
            display_mode: Cell::new(DisplayMode::default()),
            display_mode_cycle: Cell::new(false),
            events,
            global_events,
            shield,
            slot: NavigationSlot::new(),
            resolution_locked: Cell::new(resolution_locked),
            selected_gene: RefCell::new(None),
            gene_locator: RefCell::new(None),
            sync: Rc::new(SyncCoordinator::new(weak.clone())),
        });

        let sync = Rc::clone(&browser.sync);
        browser.events.subscribe(move |event| {
            if let Some(change) = event.as_locus_change() {
                if change.propagate {
                    sync.propagate();
                }
            }
        });

        get_logger().info(
            LogComponent::Application("HicBrowser"),
            &format!("🧭 Created {}", id),
        );
        browser
    }

    pub fn id(&self) -> BrowserId {
        self.id
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Snapshot of the committed state.
    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn dataset(&self) -> Option<Rc<Dataset>> {
        self.dataset.borrow().clone()
    }

    pub fn control_dataset(&self) -> Option<Rc<Dataset>> {
        self.control_dataset.borrow().clone()
    }

    pub fn events(&self) -> &Rc<EventChannel<HicEvent>> {
        &self.events
    }

    pub fn sync_coordinator(&self) -> &Rc<SyncCoordinator> {
        &self.sync
    }

    pub fn view_dimensions(&self) -> ViewDimensions {
        self.viewport.view_dimensions()
    }

    pub fn is_busy(&self) -> bool {
        self.slot.is_busy()
    }

    pub fn is_shield_engaged(&self) -> bool {
        self.shield.is_engaged()
    }

    pub(crate) fn engage_shield(&self) -> crate::application::in_flight::ShieldGuard {
        self.shield.engage()
    }

    pub fn default_pixel_size(&self) -> f64 {
        self.config.default_pixel_size
    }

    pub fn is_resolution_locked(&self) -> bool {
        self.resolution_locked.get()
    }

    pub fn set_resolution_locked(&self, locked: bool) {
        self.resolution_locked.set(locked);
    }

    pub fn selected_gene(&self) -> Option<String> {
        self.selected_gene.borrow().clone()
    }

    pub(crate) fn set_selected_gene(&self, gene: Option<String>) {
        *self.selected_gene.borrow_mut() = gene;
    }

    pub fn set_gene_locator(&self, locator: Rc<dyn GeneLocator>) {
        *self.gene_locator.borrow_mut() = Some(locator);
    }

    pub(crate) fn gene_locator(&self) -> Option<Rc<dyn GeneLocator>> {
        self.gene_locator.borrow().clone()
    }

    pub fn is_whole_genome(&self) -> bool {
        let chr1 = self.state.borrow().chr1;
        self.dataset().is_some_and(|dataset| dataset.is_whole_genome(chr1))
    }

    pub(crate) fn require_dataset(&self) -> NavResult<Rc<Dataset>> {
        self.dataset().ok_or(NavigationError::NoDataset)
    }

    /// Dataset, committed state and viewport captured at invocation.
    pub(crate) fn snapshot(&self) -> NavResult<(Rc<Dataset>, ViewState, ViewDimensions)> {
        Ok((self.require_dataset()?, self.state(), self.view_dimensions()))
    }

    /// Usable ladder: the dataset's resolutions, restricted to the bin sizes
    /// the control map also has.
    pub fn get_resolutions(&self) -> Vec<Resolution> {
        let Some(dataset) = self.dataset() else {
            return Vec::new();
        };
        let resolutions = dataset.resolutions();
        match self.control_dataset() {
            Some(control) => resolutions
                .into_iter()
                .filter(|resolution| control.bp_resolutions().contains(&resolution.bin_size))
                .collect(),
            None => resolutions,
        }
    }

    /// Current bin size in bp.
    pub fn resolution(&self) -> Option<u64> {
        let zoom = self.state.borrow().zoom;
        self.dataset().and_then(|dataset| dataset.bin_size(zoom))
    }

    /// Canonicalize, clamp, store and publish. Every state change ends here.
    pub(crate) fn commit(&self, mut state: ViewState, flags: ChangeFlags) -> NavResult<ViewState> {
        let dataset = self.require_dataset()?;
        state.canonicalize();

        let len1 = dataset
            .chromosome(state.chr1)
            .ok_or(NavigationError::UnknownChromosome(state.chr1))?
            .size_bp();
        let len2 = dataset
            .chromosome(state.chr2)
            .ok_or(NavigationError::UnknownChromosome(state.chr2))?
            .size_bp();
        let bin_size = dataset.bin_size(state.zoom).ok_or(DatasetError::ZoomOutOfRange {
            zoom: state.zoom,
            available: dataset.bp_resolutions().len(),
        })?;

        state.clamp(len1, len2, bin_size as f64, self.view_dimensions());
        *self.state.borrow_mut() = state.clone();

        crate::log_trace!(
            LogComponent::Application("HicBrowser"),
            "{} committed {} (resolution_changed={}, chr_changed={})",
            self.id,
            state,
            flags.resolution_changed,
            flags.chr_changed
        );

        self.events.post(HicEvent::LocusChange(LocusChange {
            state: state.clone(),
            resolution_changed: flags.resolution_changed,
            chr_changed: flags.chr_changed,
            dragging: flags.dragging,
            propagate: flags.propagate,
        }));
        Ok(state)
    }

    /// Install a new dataset and position the view on it.
    pub async fn load_dataset(&self, dataset: Dataset, initial: InitialView) -> NavResult<ViewState> {
        self.slot.run(self.load_dataset_inner(Rc::new(dataset), initial)).await
    }

    async fn load_dataset_inner(&self, dataset: Rc<Dataset>, initial: InitialView) -> NavResult<ViewState> {
        let _shield = self.shield.engage();
        let dims = self.view_dimensions();
        let normalization = self.state.borrow().normalization.clone();

        let (state, flags) = match initial {
            InitialView::Sync(sync) if sync.can_be_synched(&dataset) => {
                match sync.translate(&dataset, &normalization) {
                    Ok(state) => (state, ChangeFlags::sync(true, true)),
                    Err(_) => {
                        let state = floor_pixel_size(&dataset, dims, ViewState::default()).await?;
                        (state, ChangeFlags::navigation(true, true))
                    }
                }
            }
            InitialView::State(state) => {
                let state = floor_pixel_size(&dataset, dims, state).await?;
                (state, ChangeFlags::navigation(true, true))
            }
            _ => {
                let state = floor_pixel_size(&dataset, dims, ViewState::default()).await?;
                (state, ChangeFlags::navigation(true, true))
            }
        };

        let previous_genome = self.dataset().map(|previous| previous.genome_id().to_string());
        *self.control_dataset.borrow_mut() = None;
        *self.dataset.borrow_mut() = Some(Rc::clone(&dataset));

        get_logger().info(
            LogComponent::Application("HicBrowser"),
            &format!(
                "📂 {} loaded {} ({} chromosomes, {} resolutions)",
                self.id,
                dataset.name(),
                dataset.chromosomes().len(),
                dataset.bp_resolutions().len()
            ),
        );

        if previous_genome.as_deref() != Some(dataset.genome_id()) {
            self.global_events.post(HicEvent::GenomeChange { genome_id: dataset.genome_id().to_string() });
        }
        self.events.post(HicEvent::MapLoad { dataset_name: dataset.name().to_string() });

        self.commit(state, flags)
    }

    /// Attach a control ("B") map. Rejected, keeping the previous control
    /// map, when its genome differs from the main map.
    pub fn load_control_dataset(&self, control: Dataset) -> NavResult<()> {
        if let Some(dataset) = self.dataset() {
            if !dataset.is_compatible_with(&control) {
                let err = DatasetError::GenomeMismatch {
                    expected: dataset.genome_id().to_string(),
                    found: control.genome_id().to_string(),
                };
                crate::log_warn!(LogComponent::Application("HicBrowser"), "{}", err);
                return Err(err.into());
            }
        }

        let name = control.name().to_string();
        *self.control_dataset.borrow_mut() = Some(Rc::new(control));
        self.events.post(HicEvent::ControlMapLoad { dataset_name: name });
        Ok(())
    }

    /// Restore a bookmarked state. Pixel size is raised to the minimum that
    /// still fills the view.
    pub async fn set_state(&self, state: ViewState) -> NavResult<ViewState> {
        self.slot.run(self.set_state_inner(state)).await
    }

    async fn set_state_inner(&self, state: ViewState) -> NavResult<ViewState> {
        let _shield = self.shield.engage();
        let (dataset, current, dims) = self.snapshot()?;
        let state = floor_pixel_size(&dataset, dims, state).await?;
        let chr_changed = !current.same_chromosomes(&state);
        self.commit(state, ChangeFlags::navigation(true, chr_changed))
    }

    pub fn set_normalization(&self, normalization: Normalization) {
        self.state.borrow_mut().normalization = normalization.clone();
        self.events.post(HicEvent::NormalizationChange { normalization });
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode.get()
    }

    pub fn set_display_mode(&self, mode: DisplayMode) {
        self.display_mode.set(mode);
        self.events.post(HicEvent::DisplayModeChange { mode });
    }

    /// Whether the page alternates between the A and B maps.
    pub fn is_display_mode_cycling(&self) -> bool {
        self.display_mode_cycle.get()
    }

    pub fn set_display_mode_cycle(&self, cycle: bool) {
        self.display_mode_cycle.set(cycle);
    }

    pub fn genomic_state(&self, axis: Axis) -> NavResult<GenomicState> {
        let dataset = self.require_dataset()?;
        let state = self.state();
        let dims = self.view_dimensions();
        let bin_size = dataset.bin_size(state.zoom).ok_or(DatasetError::ZoomOutOfRange {
            zoom: state.zoom,
            available: dataset.bp_resolutions().len(),
        })? as f64;
        let bpp = bin_size / state.pixel_size;

        let (chr, offset, extent) = match axis {
            Axis::X => (state.chr1, state.x, dims.width),
            Axis::Y => (state.chr2, state.y, dims.height),
        };
        let chromosome = dataset.chromosome(chr).ok_or(NavigationError::UnknownChromosome(chr))?.clone();
        let start_bp = offset * bin_size;

        Ok(GenomicState { chromosome, start_bp, end_bp: start_bp + bpp * extent, bpp })
    }

    /// Text for the locus box: `chr1:1,000,001-2,000,000`, a bare chromosome
    /// name, or an x and a y locus separated by a space.
    pub fn current_locus_text(&self) -> NavResult<String> {
        let x = self.genomic_state(Axis::X)?;
        if x.chromosome.is_whole_genome() {
            return Ok(x.chromosome.name);
        }
        let y = self.genomic_state(Axis::Y)?;

        let x_text = format_locus(&x.chromosome.name, x.start_bp, x.end_bp, x.chromosome.size);
        let y_text = format_locus(&y.chromosome.name, y.start_bp, y.end_bp, y.chromosome.size);
        if x_text == y_text { Ok(x_text) } else { Ok(format!("{} {}", x_text, y_text)) }
    }
}

/// Raise `pixel_size` to the pair's minimum at its zoom.
pub(crate) async fn floor_pixel_size(
    dataset: &Dataset,
    dims: ViewDimensions,
    mut state: ViewState,
) -> NavResult<ViewState> {
    state.canonicalize();
    let min_pixel_size = BoundsProvider::new(dataset, dims)
        .min_pixel_size(state.chr1, state.chr2, state.zoom)
        .await?;
    state.pixel_size = state.pixel_size.max(min_pixel_size);
    Ok(state)
}
