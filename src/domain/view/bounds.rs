use super::value_objects::ViewDimensions;
use crate::domain::dataset::Dataset;
use crate::domain::errors::{NavResult, NavigationError};

/// Legal zoom and pixel-size limits for a chromosome pair, computed from
/// lazily fetched matrix metadata and the current viewport.
pub struct BoundsProvider<'a> {
    dataset: &'a Dataset,
    dims: ViewDimensions,
}

impl<'a> BoundsProvider<'a> {
    pub fn new(dataset: &'a Dataset, dims: ViewDimensions) -> Self {
        Self { dataset, dims }
    }

    fn chromosome_lengths(&self, chr1: usize, chr2: usize) -> NavResult<(f64, f64)> {
        let len1 = self
            .dataset
            .chromosome(chr1)
            .ok_or(NavigationError::UnknownChromosome(chr1))?
            .size_bp();
        let len2 = self
            .dataset
            .chromosome(chr2)
            .ok_or(NavigationError::UnknownChromosome(chr2))?
            .size_bp();
        Ok((len1, len2))
    }

    /// Coarsest zoom at which the whole pair fits the viewport.
    pub async fn min_zoom(&self, chr1: usize, chr2: usize) -> NavResult<usize> {
        let (len1, len2) = self.chromosome_lengths(chr1, chr2)?;
        let bin_size = (len1 / self.dims.width).max(len2 / self.dims.height);
        let matrix = self.dataset.get_matrix(chr1, chr2).await?;
        Ok(matrix.find_zoom_for_resolution(bin_size))
    }

    /// Pixel size at which the pair exactly fills the tighter viewport axis.
    pub async fn min_pixel_size(&self, chr1: usize, chr2: usize, zoom: usize) -> NavResult<f64> {
        let (len1, len2) = self.chromosome_lengths(chr1, chr2)?;
        let matrix = self.dataset.get_matrix(chr1, chr2).await?;
        let bin_size = matrix.zoom_data_by_index(zoom)?.bin_size as f64;
        let n_bins1 = len1 / bin_size;
        let n_bins2 = len2 / bin_size;
        Ok((self.dims.width / n_bins1).min(self.dims.height / n_bins2))
    }
}
