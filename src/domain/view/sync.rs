use serde::{Deserialize, Serialize};

use super::resolution::find_matching_zoom_index;
use crate::domain::dataset::Dataset;
use crate::domain::genome::Normalization;
use crate::view_state::{MAX_PIXEL_SIZE, ViewState};

/// Dataset-independent view description exchanged between linked browsers.
/// Chromosomes travel by name and resolution by literal bin size, because
/// peers may order chromosomes and ladders differently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncState {
    pub chr1_name: String,
    pub chr2_name: String,
    pub bin_size: u64,
    pub bin_x: f64,
    pub bin_y: f64,
    pub pixel_size: f64,
}

/// Why a sync state cannot be shown by a dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncRejection {
    UnknownChromosome(String),
    /// Nearest local resolution would need a pixel size above the maximum.
    ResolutionUnavailable { bin_size: u64 },
}

impl SyncState {
    pub fn from_view(dataset: &Dataset, state: &ViewState) -> Option<Self> {
        Some(Self {
            chr1_name: dataset.chromosome(state.chr1)?.name.clone(),
            chr2_name: dataset.chromosome(state.chr2)?.name.clone(),
            bin_size: dataset.bin_size(state.zoom)?,
            bin_x: state.x,
            bin_y: state.y,
            pixel_size: state.pixel_size,
        })
    }

    pub fn can_be_synched(&self, dataset: &Dataset) -> bool {
        dataset.genome().chromosome_index(&self.chr1_name).is_some()
            && dataset.genome().chromosome_index(&self.chr2_name).is_some()
    }

    /// Equivalent local view. An exact bin-size match keeps offsets and pixel
    /// size; otherwise the closest coarser-or-equal resolution is used with
    /// pixel size and offsets rescaled so screen bp-per-pixel and the
    /// top-left genomic position are preserved.
    pub fn translate(&self, dataset: &Dataset, normalization: &Normalization) -> Result<ViewState, SyncRejection> {
        let genome = dataset.genome();
        let chr1 = genome
            .chromosome_index(&self.chr1_name)
            .ok_or_else(|| SyncRejection::UnknownChromosome(self.chr1_name.clone()))?;
        let chr2 = genome
            .chromosome_index(&self.chr2_name)
            .ok_or_else(|| SyncRejection::UnknownChromosome(self.chr2_name.clone()))?;

        let (zoom, x, y, pixel_size) = match dataset.zoom_index_for_bin_size(self.bin_size) {
            Some(zoom) => (zoom, self.bin_x, self.bin_y, self.pixel_size),
            None => {
                let zoom = find_matching_zoom_index(self.bin_size as f64, dataset.bp_resolutions());
                let local_bin = dataset
                    .bin_size(zoom)
                    .ok_or(SyncRejection::ResolutionUnavailable { bin_size: self.bin_size })?
                    as f64;
                let remote_bin = self.bin_size as f64;
                let pixel_size = (self.pixel_size / remote_bin) * local_bin;
                if pixel_size > MAX_PIXEL_SIZE {
                    return Err(SyncRejection::ResolutionUnavailable { bin_size: self.bin_size });
                }
                let scale = remote_bin / local_bin;
                (zoom, self.bin_x * scale, self.bin_y * scale, pixel_size)
            }
        };

        let mut state = ViewState {
            chr1,
            chr2,
            zoom,
            x,
            y,
            pixel_size,
            normalization: normalization.clone(),
        };
        state.canonicalize();
        Ok(state)
    }
}
