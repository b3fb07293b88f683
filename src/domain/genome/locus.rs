use super::entities::Genome;

/// Parsed `chr[:start[-end]]` text. `start` is 0-based, `end` exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locus {
    pub chr: usize,
    pub start: u64,
    pub end: Option<u64>,
    pub whole_chromosome: bool,
}

/// Parse one locus. Returns `None` when the chromosome is unknown or the
/// start position is not a number, so callers can try a gene lookup.
pub fn parse_locus(genome: &Genome, text: &str) -> Option<Locus> {
    let mut parts = text.trim().splitn(2, ':');
    let chromosome = genome.chromosome_by_name(parts.next()?)?;

    let Some(extent) = parts.next() else {
        return Some(Locus {
            chr: chromosome.index,
            start: 0,
            end: Some(chromosome.size),
            whole_chromosome: true,
        });
    };

    let mut bounds = extent.split('-');
    let start = parse_position(bounds.next()?)?.saturating_sub(1);
    let end = bounds.next().and_then(parse_position);

    Some(Locus { chr: chromosome.index, start, end, whole_chromosome: false })
}

fn parse_position(text: &str) -> Option<u64> {
    let digits: String = text.trim().chars().filter(|c| *c != ',').collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0).map(|v| v as u64)
}

/// `chrName:start-end` with 1-based start and grouped digits, or just the
/// name when the range spans the whole chromosome.
pub fn format_locus(name: &str, start_bp: f64, end_bp: f64, chromosome_size: u64) -> String {
    let start = start_bp.max(0.0).round() as u64;
    let end = end_bp.max(0.0).round() as u64;
    if start == 0 && end >= chromosome_size {
        return name.to_string();
    }
    format!(
        "{}:{}-{}",
        name,
        group_digits(start + 1),
        group_digits(end.min(chromosome_size))
    )
}

fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::genome::Chromosome;

    fn genome() -> Genome {
        Genome::new(
            "hg19",
            vec![
                Chromosome::new(0, "All".into(), 3_000_000),
                Chromosome::new(1, "chr1".into(), 2_000_000),
                Chromosome::new(2, "chr2".into(), 1_000_000),
            ],
        )
    }

    #[test]
    fn chromosome_only_means_whole_chromosome() {
        let locus = parse_locus(&genome(), "chr2").unwrap();
        assert_eq!(locus, Locus { chr: 2, start: 0, end: Some(1_000_000), whole_chromosome: true });
    }

    #[test]
    fn ranges_drop_commas_and_become_zero_based() {
        let locus = parse_locus(&genome(), "CHR1:1,000,001-1,500,000").unwrap();
        assert_eq!(locus.chr, 1);
        assert_eq!(locus.start, 1_000_000);
        assert_eq!(locus.end, Some(1_500_000));
        assert!(!locus.whole_chromosome);
    }

    #[test]
    fn open_ended_and_unparseable_ranges() {
        let locus = parse_locus(&genome(), "chr1:500").unwrap();
        assert_eq!((locus.start, locus.end), (499, None));
        assert_eq!(parse_locus(&genome(), "chr1:abc-100"), None);
        assert_eq!(parse_locus(&genome(), "MYC"), None);
    }

    #[test]
    fn formatting_groups_digits_and_collapses_whole_chromosome() {
        assert_eq!(format_locus("chr1", 999_999.6, 1_500_000.0, 2_000_000), "chr1:1,000,001-1,500,000");
        assert_eq!(format_locus("chr2", 0.0, 1_200_000.0, 1_000_000), "chr2");
    }
}
