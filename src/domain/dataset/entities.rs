use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use derive_more::Constructor;
use serde::{Deserialize, Serialize};

use super::repositories::MatrixSource;
use crate::domain::errors::{DatasetError, DatasetResult};
use crate::domain::genome::{Chromosome, Genome};
use crate::domain::logging::LogComponent;

/// Value Object - a ladder entry that remembers its position in the dataset
/// ladder after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Constructor, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub index: usize,
    pub bin_size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomData {
    pub bin_size: u64,
}

/// Per chromosome-pair matrix metadata, fetched lazily.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixDescriptor {
    pub chr1: usize,
    pub chr2: usize,
    /// Coarse to fine, aligned with the dataset ladder.
    pub zoom_data: Vec<ZoomData>,
}

impl MatrixDescriptor {
    pub fn from_ladder(chr1: usize, chr2: usize, bp_resolutions: &[u64]) -> Self {
        Self {
            chr1,
            chr2,
            zoom_data: bp_resolutions.iter().map(|bin_size| ZoomData { bin_size: *bin_size }).collect(),
        }
    }

    /// Coarsest zoom index whose successor is already finer than `bin_size`;
    /// the finest index when no entry is finer.
    pub fn find_zoom_for_resolution(&self, bin_size: f64) -> usize {
        for i in 1..self.zoom_data.len() {
            if (self.zoom_data[i].bin_size as f64) < bin_size {
                return i - 1;
            }
        }
        self.zoom_data.len().saturating_sub(1)
    }

    pub fn zoom_data_by_index(&self, zoom: usize) -> DatasetResult<&ZoomData> {
        self.zoom_data.get(zoom).ok_or(DatasetError::ZoomOutOfRange {
            zoom,
            available: self.zoom_data.len(),
        })
    }
}

/// Header-level description of a `.hic` map as the host hands it over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    pub genome_id: String,
    pub chromosomes: Vec<ChromosomeDescriptor>,
    pub bp_resolutions: Vec<u64>,
    #[serde(default)]
    pub whole_genome_resolution: Option<u64>,
    #[serde(default)]
    pub nvi: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChromosomeDescriptor {
    pub name: String,
    pub size: u64,
}

/// A loaded contact map: chromosome list, resolution ladder and the cache of
/// matrix descriptors already fetched from its source.
pub struct Dataset {
    name: String,
    url: Option<String>,
    nvi: Option<String>,
    genome: Genome,
    bp_resolutions: Vec<u64>,
    whole_genome_resolution: u64,
    source: Rc<dyn MatrixSource>,
    matrices: RefCell<HashMap<(usize, usize), Rc<MatrixDescriptor>>>,
}

impl Dataset {
    pub fn new(descriptor: DatasetDescriptor, source: Rc<dyn MatrixSource>) -> DatasetResult<Self> {
        if descriptor.chromosomes.is_empty() {
            return Err(DatasetError::InvalidDescriptor("no chromosomes".to_string()));
        }
        if descriptor.bp_resolutions.is_empty() {
            return Err(DatasetError::InvalidDescriptor("empty resolution ladder".to_string()));
        }
        if descriptor.bp_resolutions.contains(&0) {
            return Err(DatasetError::InvalidDescriptor("zero bin size".to_string()));
        }

        let chromosomes = descriptor
            .chromosomes
            .into_iter()
            .enumerate()
            .map(|(index, chr)| Chromosome::new(index, chr.name, chr.size))
            .collect();
        let whole_genome_resolution =
            descriptor.whole_genome_resolution.unwrap_or(descriptor.bp_resolutions[0]);

        Ok(Self {
            name: descriptor.name,
            url: descriptor.url,
            nvi: descriptor.nvi,
            genome: Genome::new(descriptor.genome_id, chromosomes),
            bp_resolutions: descriptor.bp_resolutions,
            whole_genome_resolution,
            source,
            matrices: RefCell::new(HashMap::new()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn nvi(&self) -> Option<&str> {
        self.nvi.as_deref()
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    pub fn genome_id(&self) -> &str {
        self.genome.id()
    }

    pub fn chromosomes(&self) -> &[Chromosome] {
        self.genome.chromosomes()
    }

    pub fn chromosome(&self, index: usize) -> Option<&Chromosome> {
        self.genome.chromosome(index)
    }

    pub fn bp_resolutions(&self) -> &[u64] {
        &self.bp_resolutions
    }

    pub fn bin_size(&self, zoom: usize) -> Option<u64> {
        self.bp_resolutions.get(zoom).copied()
    }

    pub fn whole_genome_resolution(&self) -> u64 {
        self.whole_genome_resolution
    }

    /// Ladder as `{index, bin_size}` pairs.
    pub fn resolutions(&self) -> Vec<Resolution> {
        self.bp_resolutions
            .iter()
            .enumerate()
            .map(|(index, bin_size)| Resolution::new(index, *bin_size))
            .collect()
    }

    /// Exact ladder position of a bin size.
    pub fn zoom_index_for_bin_size(&self, bin_size: u64) -> Option<usize> {
        self.bp_resolutions.iter().position(|candidate| *candidate == bin_size)
    }

    pub fn is_whole_genome(&self, chr: usize) -> bool {
        self.chromosome(chr).is_some_and(Chromosome::is_whole_genome)
    }

    /// Control maps must come from the same assembly.
    pub fn is_compatible_with(&self, other: &Dataset) -> bool {
        self.genome_id() == other.genome_id()
    }

    /// Matrix metadata for a chromosome pair, fetched once and cached.
    pub async fn get_matrix(&self, chr1: usize, chr2: usize) -> DatasetResult<Rc<MatrixDescriptor>> {
        let key = (chr1.min(chr2), chr1.max(chr2));
        if let Some(matrix) = self.matrices.borrow().get(&key) {
            return Ok(Rc::clone(matrix));
        }

        crate::log_debug!(
            LogComponent::Domain("Dataset"),
            "Fetching matrix {}-{} for {}",
            key.0,
            key.1,
            self.name
        );

        let matrix = Rc::new(self.source.get_matrix(key.0, key.1).await?);
        self.matrices.borrow_mut().insert(key, Rc::clone(&matrix));
        Ok(matrix)
    }
}

impl std::fmt::Debug for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dataset")
            .field("name", &self.name)
            .field("genome", &self.genome.id())
            .field("bp_resolutions", &self.bp_resolutions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_zoom_for_resolution_picks_coarsest_sufficient_level() {
        let matrix = MatrixDescriptor::from_ladder(1, 1, &[2_500_000, 1_000_000, 500_000]);
        assert_eq!(matrix.find_zoom_for_resolution(416_666.7), 2);
        assert_eq!(matrix.find_zoom_for_resolution(800_000.0), 1);
        assert_eq!(matrix.find_zoom_for_resolution(2_000_000.0), 0);
        assert_eq!(matrix.find_zoom_for_resolution(9_000_000.0), 0);
    }

    #[test]
    fn zoom_data_outside_ladder_is_an_error() {
        let matrix = MatrixDescriptor::from_ladder(1, 1, &[1_000]);
        assert_eq!(
            matrix.zoom_data_by_index(3),
            Err(DatasetError::ZoomOutOfRange { zoom: 3, available: 1 })
        );
    }
}
