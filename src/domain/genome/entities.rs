use std::collections::HashMap;

use super::value_objects::Chromosome;

/// Chromosome list of one assembly plus the lookups navigation needs:
/// case-insensitive names and genome-wide coordinates.
#[derive(Debug, Clone)]
pub struct Genome {
    id: String,
    chromosomes: Vec<Chromosome>,
    aliases: HashMap<String, usize>,
    /// Genome-wide start offset of every chromosome except `All`.
    cumulative_offsets: Vec<(usize, u64)>,
    genome_length: u64,
}

impl Genome {
    pub fn new(id: impl Into<String>, chromosomes: Vec<Chromosome>) -> Self {
        let mut aliases = HashMap::new();
        let mut cumulative_offsets = Vec::with_capacity(chromosomes.len());
        let mut genome_length = 0u64;

        for chromosome in &chromosomes {
            let lower = chromosome.name.to_lowercase();
            let alternate = match lower.strip_prefix("chr") {
                Some(stripped) => stripped.to_string(),
                None => format!("chr{}", lower),
            };
            aliases.entry(alternate).or_insert(chromosome.index);
            aliases.insert(lower, chromosome.index);

            if !chromosome.is_whole_genome() {
                cumulative_offsets.push((chromosome.index, genome_length));
                genome_length += chromosome.size;
            }
        }

        Self { id: id.into(), chromosomes, aliases, cumulative_offsets, genome_length }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn chromosomes(&self) -> &[Chromosome] {
        &self.chromosomes
    }

    pub fn chromosome(&self, index: usize) -> Option<&Chromosome> {
        self.chromosomes.get(index)
    }

    /// Resolve a name such as `chr1`, `1` or `X` regardless of case.
    pub fn chromosome_by_name(&self, name: &str) -> Option<&Chromosome> {
        self.aliases
            .get(&name.trim().to_lowercase())
            .and_then(|index| self.chromosome(*index))
    }

    pub fn chromosome_index(&self, name: &str) -> Option<usize> {
        self.chromosome_by_name(name).map(|chromosome| chromosome.index)
    }

    pub fn genome_length(&self) -> u64 {
        self.genome_length
    }

    /// Chromosome containing a genome-wide coordinate. Coordinates past the
    /// end map to the last chromosome.
    pub fn chromosome_for_coordinate(&self, bp: f64) -> Option<&Chromosome> {
        let bp = bp.max(0.0);
        let mut found = None;
        for (index, offset) in &self.cumulative_offsets {
            if (*offset as f64) > bp {
                break;
            }
            found = Some(*index);
        }
        found.and_then(|index| self.chromosome(index))
    }
}
