use crate::domain::dataset::Resolution;

/// A coarse-to-fine resolution ladder, either plain bin sizes (the position
/// is the zoom index) or filtered `{index, bin_size}` pairs.
pub trait ResolutionLadder {
    fn ladder_len(&self) -> usize;
    /// `(zoom index, bin size)` at a ladder position.
    fn entry(&self, position: usize) -> (usize, u64);
}

impl ResolutionLadder for [u64] {
    fn ladder_len(&self) -> usize {
        self.len()
    }

    fn entry(&self, position: usize) -> (usize, u64) {
        (position, self[position])
    }
}

impl ResolutionLadder for [Resolution] {
    fn ladder_len(&self) -> usize {
        self.len()
    }

    fn entry(&self, position: usize) -> (usize, u64) {
        let resolution = self[position];
        (resolution.index, resolution.bin_size)
    }
}

/// Finest ladder entry whose bins are still at least `target` bp wide.
/// Scans from the finest position down to position 1 and falls back to the
/// coarsest entry (zoom 0 for an unfiltered ladder).
pub fn find_matching_zoom_index<L>(target: f64, ladder: &L) -> usize
where
    L: ResolutionLadder + ?Sized,
{
    for position in (1..ladder.ladder_len()).rev() {
        let (index, bin_size) = ladder.entry(position);
        if bin_size as f64 >= target {
            return index;
        }
    }
    if ladder.ladder_len() > 0 { ladder.entry(0).0 } else { 0 }
}

/// Ladder position holding a given zoom index.
pub fn position_of_zoom(ladder: &[Resolution], zoom: usize) -> Option<usize> {
    ladder.iter().position(|resolution| resolution.index == zoom)
}

/// Bin size stored under a zoom index.
pub fn bin_size_for_zoom(ladder: &[Resolution], zoom: usize) -> Option<u64> {
    position_of_zoom(ladder, zoom).map(|position| ladder[position].bin_size)
}
