//! Pan, zoom, pinch and goto on a [`HicBrowser`].
//!
//! Async operations read the dataset, state and viewport captured when they
//! start, await their bounds lookups and commit once at the end. Each public
//! operation claims the browser's navigation slot, so a newer request aborts
//! an older one that is still waiting on matrix metadata.

use crate::application::browser::{ChangeFlags, HicBrowser};
use crate::domain::dataset::{Dataset, Resolution};
use crate::domain::errors::{DatasetError, NavResult, NavigationError};
use crate::domain::events::HicEvent;
use crate::domain::genome::{Locus, parse_locus};
use crate::domain::logging::LogComponent;
use crate::domain::view::{BoundsProvider, ViewDimensions, bin_size_for_zoom, find_matching_zoom_index};
use crate::view_state::{MAX_OVERVIEW_PIXEL_SIZE, MAX_PIXEL_SIZE, ViewState};

/// Finest resolution, in bp, used when jumping to a gene.
pub const GENE_MIN_RESOLUTION: f64 = 5_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Positive means in, anything else out.
    pub fn from_sign(direction: i32) -> Self {
        if direction > 0 { ZoomDirection::In } else { ZoomDirection::Out }
    }
}

/// Base-pair range on one axis. Without `end` the window is centred on
/// `start` and sized to the viewport at the current resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenomicRange {
    pub chr: usize,
    pub start: f64,
    pub end: Option<f64>,
}

impl GenomicRange {
    pub fn new(chr: usize, start: f64, end: Option<f64>) -> Self {
        Self { chr, start, end }
    }

    /// `[start, end)` in bp, deriving a window when no end is given.
    fn window(&self, extent_px: f64, bin_size: f64) -> (f64, f64) {
        match self.end {
            Some(end) if end > self.start => (self.start, end),
            _ => {
                let span = extent_px * bin_size;
                let start = (self.start - (span / 2.0).floor()).max(0.0);
                (start, start + span)
            }
        }
    }
}

impl From<Locus> for GenomicRange {
    fn from(locus: Locus) -> Self {
        Self { chr: locus.chr, start: locus.start as f64, end: locus.end.map(|end| end as f64) }
    }
}

fn zoom_out_of_range(zoom: usize, available: usize) -> NavigationError {
    DatasetError::ZoomOutOfRange { zoom, available }.into()
}

/// Nearest usable ladder entry past `bin_size` in `direction`. The current
/// bin size need not be on the ladder itself.
fn next_resolution(resolutions: &[Resolution], bin_size: u64, direction: ZoomDirection) -> Option<Resolution> {
    match direction {
        ZoomDirection::In => resolutions.iter().find(|resolution| resolution.bin_size < bin_size).copied(),
        ZoomDirection::Out => resolutions.iter().rev().find(|resolution| resolution.bin_size > bin_size).copied(),
    }
}

impl HicBrowser {
    /// Show a chromosome pair in full at the coarsest zoom that fits it.
    pub async fn set_chromosomes(&self, chr1: usize, chr2: usize) -> NavResult<ViewState> {
        self.slot.run(self.set_chromosomes_inner(chr1, chr2)).await
    }

    pub(crate) async fn set_chromosomes_inner(&self, chr1: usize, chr2: usize) -> NavResult<ViewState> {
        let _shield = self.engage_shield();
        let (dataset, current, dims) = self.snapshot()?;
        let (chr1, chr2) = (chr1.min(chr2), chr1.max(chr2));

        let bounds = BoundsProvider::new(&dataset, dims);
        let zoom = bounds.min_zoom(chr1, chr2).await?;
        let min_pixel_size = bounds.min_pixel_size(chr1, chr2, zoom).await?;

        let state = ViewState {
            chr1,
            chr2,
            zoom,
            x: 0.0,
            y: 0.0,
            pixel_size: self.default_pixel_size().max(min_pixel_size).min(MAX_OVERVIEW_PIXEL_SIZE),
            normalization: current.normalization,
        };

        crate::log_info!(
            LogComponent::Application("Navigation"),
            "🧬 {} showing {}-{} at zoom {}",
            self.id(),
            chr1,
            chr2,
            zoom
        );
        self.commit(state, ChangeFlags::navigation(true, true))
    }

    /// Change resolution, keeping the view centre on the same genomic point.
    pub async fn set_zoom(&self, zoom: usize) -> NavResult<ViewState> {
        self.slot.run(self.set_zoom_inner(zoom)).await
    }

    async fn set_zoom_inner(&self, zoom: usize) -> NavResult<ViewState> {
        let _shield = self.engage_shield();
        let (dataset, state, dims) = self.snapshot()?;
        self.apply_zoom(&dataset, dims, state, zoom).await
    }

    async fn apply_zoom(
        &self,
        dataset: &Dataset,
        dims: ViewDimensions,
        mut state: ViewState,
        zoom: usize,
    ) -> NavResult<ViewState> {
        let available = dataset.bp_resolutions().len();
        let current_bin = dataset.bin_size(state.zoom).ok_or(zoom_out_of_range(state.zoom, available))? as f64;
        let new_bin = dataset.bin_size(zoom).ok_or(zoom_out_of_range(zoom, available))? as f64;

        let ratio = current_bin / new_bin;
        let x_center = (state.x + dims.width / (2.0 * state.pixel_size)) * ratio;
        let y_center = (state.y + dims.height / (2.0 * state.pixel_size)) * ratio;

        let min_pixel_size = BoundsProvider::new(dataset, dims)
            .min_pixel_size(state.chr1, state.chr2, zoom)
            .await?;
        let pixel_size = self.default_pixel_size().max(min_pixel_size);
        let zoom_changed = state.zoom != zoom;

        state.zoom = zoom;
        state.x = (x_center - dims.width / (2.0 * pixel_size)).max(0.0);
        state.y = (y_center - dims.height / (2.0 * pixel_size)).max(0.0);
        state.pixel_size = pixel_size;

        self.commit(state, ChangeFlags::navigation(zoom_changed, false))
    }

    /// Double-click zoom centred on a screen point (the view centre when
    /// omitted). From the whole-genome view, zooming in opens the clicked
    /// chromosome pair.
    pub async fn zoom_and_center(
        &self,
        direction: ZoomDirection,
        center_x: Option<f64>,
        center_y: Option<f64>,
    ) -> NavResult<ViewState> {
        self.slot.run(self.zoom_and_center_inner(direction, center_x, center_y)).await
    }

    async fn zoom_and_center_inner(
        &self,
        direction: ZoomDirection,
        center_x: Option<f64>,
        center_y: Option<f64>,
    ) -> NavResult<ViewState> {
        let _shield = self.engage_shield();
        let (dataset, mut state, dims) = self.snapshot()?;

        if dataset.is_whole_genome(state.chr1) && direction == ZoomDirection::In {
            let (chr_x, chr_y) = clicked_chromosomes(&dataset, &state, dims, center_x, center_y)?;
            return self.set_chromosomes_inner(chr_x, chr_y).await;
        }

        let resolutions = self.get_resolutions();
        let current_bin = dataset
            .bin_size(state.zoom)
            .ok_or(zoom_out_of_range(state.zoom, dataset.bp_resolutions().len()))?;
        let next = next_resolution(&resolutions, current_bin, direction);

        let dx = center_x.map_or(0.0, |cx| cx - dims.width / 2.0);
        let dy = center_y.map_or(0.0, |cy| cy - dims.height / 2.0);
        state.x += dx / state.pixel_size;
        state.y += dy / state.pixel_size;

        // Locked, or no further ladder entry this way: resize pixels instead.
        let Some(next) = next.filter(|_| !self.is_resolution_locked()) else {
            let min_pixel_size = BoundsProvider::new(&dataset, dims)
                .min_pixel_size(state.chr1, state.chr2, state.zoom)
                .await?;
            let factor = match direction {
                ZoomDirection::In => 2.0,
                ZoomDirection::Out => 0.5,
            };
            let old_pixel_size = state.pixel_size;
            let new_pixel_size = (old_pixel_size * factor).min(MAX_PIXEL_SIZE).max(min_pixel_size);

            // Offsets move so the view centre stays on the same bin.
            let shift = 1.0 / old_pixel_size - 1.0 / new_pixel_size;
            state.x += dims.width / 2.0 * shift;
            state.y += dims.height / 2.0 * shift;
            state.pixel_size = new_pixel_size;

            return self.commit(state, ChangeFlags::navigation(false, false));
        };

        self.apply_zoom(&dataset, dims, state, next.index).await
    }

    /// Continuous zoom gesture around an anchor point. `scale > 1` magnifies.
    pub async fn pinch_zoom(&self, anchor_x: f64, anchor_y: f64, scale: f64) -> NavResult<ViewState> {
        self.slot.run(self.pinch_zoom_inner(anchor_x, anchor_y, scale)).await
    }

    async fn pinch_zoom_inner(&self, anchor_x: f64, anchor_y: f64, scale: f64) -> NavResult<ViewState> {
        let (dataset, state, dims) = self.snapshot()?;

        if dataset.is_whole_genome(state.chr1) {
            return self.zoom_and_center_inner(ZoomDirection::In, Some(anchor_x), Some(anchor_y)).await;
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Ok(state);
        }

        let _shield = self.engage_shield();
        let resolutions = self.get_resolutions();
        let current_bin = dataset
            .bin_size(state.zoom)
            .ok_or(zoom_out_of_range(state.zoom, dataset.bp_resolutions().len()))?;
        let locked = self.is_resolution_locked();

        let direction = if scale > 1.0 { ZoomDirection::In } else { ZoomDirection::Out };
        let pinned = locked || next_resolution(&resolutions, current_bin, direction).is_none();
        let current_bin = current_bin as f64;

        let (new_zoom, new_bin, pixel_size) = if pinned {
            (state.zoom, current_bin, (state.pixel_size * scale).min(MAX_PIXEL_SIZE))
        } else {
            let target_bin = current_bin / state.pixel_size / scale;
            let zoom = find_matching_zoom_index(target_bin, resolutions.as_slice());
            let bin = bin_size_for_zoom(&resolutions, zoom)
                .ok_or(zoom_out_of_range(zoom, resolutions.len()))? as f64;
            (zoom, bin, (bin / target_bin).min(MAX_PIXEL_SIZE))
        };

        let bounds = BoundsProvider::new(&dataset, dims);
        let min_zoom = bounds.min_zoom(state.chr1, state.chr2).await?;
        if !locked && scale < 1.0 && new_zoom < min_zoom {
            crate::log_debug!(
                LogComponent::Application("Navigation"),
                "Pinch below zoom {} on {}, back to whole genome",
                min_zoom,
                self.id()
            );
            return self.set_chromosomes_inner(0, 0).await;
        }

        let min_pixel_size = bounds.min_pixel_size(state.chr1, state.chr2, new_zoom).await?;
        let pixel_size = pixel_size.max(min_pixel_size);

        // Genomic position under the anchor stays under the anchor.
        let anchor_bp_x = (state.x + anchor_x / state.pixel_size) * current_bin;
        let anchor_bp_y = (state.y + anchor_y / state.pixel_size) * current_bin;

        let zoom_changed = new_zoom != state.zoom;
        let next = ViewState {
            x: anchor_bp_x / new_bin - anchor_x / pixel_size,
            y: anchor_bp_y / new_bin - anchor_y / pixel_size,
            zoom: new_zoom,
            pixel_size,
            ..state
        };
        self.commit(next, ChangeFlags::navigation(zoom_changed, false))
    }

    /// One mouse-wheel notch. Stepping out past the pair's coarsest legal
    /// zoom returns to the whole-genome view.
    pub async fn wheel_click_zoom(&self, direction: ZoomDirection, center_x: f64, center_y: f64) -> NavResult<ViewState> {
        self.slot.run(self.wheel_click_zoom_inner(direction, center_x, center_y)).await
    }

    async fn wheel_click_zoom_inner(&self, direction: ZoomDirection, center_x: f64, center_y: f64) -> NavResult<ViewState> {
        let (dataset, state, dims) = self.snapshot()?;
        if self.is_resolution_locked() || dataset.is_whole_genome(state.chr1) {
            return self.zoom_and_center_inner(direction, Some(center_x), Some(center_y)).await;
        }

        let _shield = self.engage_shield();
        let min_zoom = BoundsProvider::new(&dataset, dims).min_zoom(state.chr1, state.chr2).await?;
        if direction == ZoomDirection::Out && state.zoom <= min_zoom {
            return self.set_chromosomes_inner(0, 0).await;
        }
        self.zoom_and_center_inner(direction, Some(center_x), Some(center_y)).await
    }

    /// Jump to a base-pair region, choosing the finest resolution that shows
    /// the whole range. `min_resolution` caps how fine that can be.
    pub fn goto(&self, x: GenomicRange, y: GenomicRange, min_resolution: Option<f64>) -> NavResult<ViewState> {
        self.slot.supersede();
        self.goto_inner(x, y, min_resolution)
    }

    fn goto_inner(&self, x: GenomicRange, y: GenomicRange, min_resolution: Option<f64>) -> NavResult<ViewState> {
        let (dataset, current, dims) = self.snapshot()?;
        let (x, y) = if x.chr > y.chr { (y, x) } else { (x, y) };
        for chr in [x.chr, y.chr] {
            dataset.chromosome(chr).ok_or(NavigationError::UnknownChromosome(chr))?;
        }

        let resolutions = self.get_resolutions();
        let current_bin = bin_size_for_zoom(&resolutions, current.zoom)
            .or_else(|| dataset.bin_size(current.zoom))
            .ok_or(zoom_out_of_range(current.zoom, resolutions.len()))? as f64;

        let (mut x_start, x_end) = x.window(dims.width, current_bin);
        let (mut y_start, y_end) = y.window(dims.height, current_bin);
        let mut target = ((x_end - x_start) / dims.width).max((y_end - y_start) / dims.height);

        if let Some(floor) = min_resolution.filter(|floor| target < *floor) {
            let extent = dims.width * floor;
            x_start = ((x_start + x_end) / 2.0 - extent / 2.0).max(0.0);
            y_start = ((y_start + y_end) / 2.0 - extent / 2.0).max(0.0);
            target = floor;
        }

        let new_zoom = if self.is_resolution_locked() && min_resolution.is_none() {
            current.zoom
        } else {
            find_matching_zoom_index(target, resolutions.as_slice())
        };
        let new_bin = bin_size_for_zoom(&resolutions, new_zoom)
            .or_else(|| dataset.bin_size(new_zoom))
            .ok_or(zoom_out_of_range(new_zoom, resolutions.len()))? as f64;

        let state = ViewState {
            chr1: x.chr,
            chr2: y.chr,
            zoom: new_zoom,
            x: x_start / new_bin,
            y: y_start / new_bin,
            pixel_size: (new_bin / target).max(1.0).min(MAX_PIXEL_SIZE),
            normalization: current.normalization.clone(),
        };

        self.events().post(HicEvent::TileCacheInvalidated);
        let flags = ChangeFlags::navigation(new_zoom != current.zoom, !current.same_chromosomes(&state));
        self.commit(state, flags)
    }

    /// Drag by a screen-pixel delta.
    pub fn shift_pixels(&self, dx: f64, dy: f64) -> NavResult<ViewState> {
        let (_, mut state, _) = self.snapshot()?;
        self.slot.supersede();
        state.x += dx / state.pixel_size;
        state.y += dy / state.pixel_size;
        self.commit(state, ChangeFlags::drag())
    }

    /// Handle the locus box: `chr1`, `chr1:1,000-2,000`, an x and a y locus,
    /// or a gene name resolved through the gene locator.
    pub async fn parse_goto_input(&self, text: &str) -> NavResult<ViewState> {
        self.slot.run(self.parse_goto_input_inner(text)).await
    }

    async fn parse_goto_input_inner(&self, text: &str) -> NavResult<ViewState> {
        let dataset = self.require_dataset()?;
        let genome = dataset.genome();
        let mut tokens = text.split_whitespace();
        let first = tokens.next().unwrap_or_default();

        let x_locus = parse_locus(genome, first);
        let y_locus = tokens.next().and_then(|token| parse_locus(genome, token)).or_else(|| x_locus.clone());

        if let (Some(x), Some(y)) = (x_locus, y_locus) {
            if x.whole_chromosome && y.whole_chromosome {
                return self.set_chromosomes_inner(x.chr, y.chr).await;
            }
            return self.goto_inner(x.into(), y.into(), None);
        }

        let not_found = || NavigationError::LocusNotFound(first.to_string());
        let locator = self.gene_locator().ok_or_else(not_found)?;

        let _shield = self.engage_shield();
        let locus = locator
            .locate(dataset.genome_id(), first)
            .await
            .and_then(|result| parse_locus(genome, &result));

        let Some(locus) = locus else {
            crate::log_warn!(
                LogComponent::Application("Navigation"),
                "No feature found with name \"{}\"",
                first
            );
            return Err(not_found());
        };

        self.set_selected_gene(Some(first.to_string()));
        let range = GenomicRange::from(locus);
        self.goto_inner(range, range, Some(GENE_MIN_RESOLUTION))
    }
}

/// Chromosome pair under a click on the whole-genome matrix.
fn clicked_chromosomes(
    dataset: &Dataset,
    state: &ViewState,
    dims: ViewDimensions,
    center_x: Option<f64>,
    center_y: Option<f64>,
) -> NavResult<(usize, usize)> {
    let bp_per_bin = dataset.whole_genome_resolution() as f64;
    let cx = center_x.unwrap_or(dims.width / 2.0);
    let cy = center_y.unwrap_or(dims.height / 2.0);
    let genome_x = (state.x + cx / state.pixel_size) * bp_per_bin;
    let genome_y = (state.y + cy / state.pixel_size) * bp_per_bin;

    let genome = dataset.genome();
    let chr_x = genome
        .chromosome_for_coordinate(genome_x)
        .ok_or(NavigationError::UnknownChromosome(state.chr1))?;
    let chr_y = genome
        .chromosome_for_coordinate(genome_y)
        .ok_or(NavigationError::UnknownChromosome(state.chr2))?;
    Ok((chr_x.index, chr_y.index))
}
