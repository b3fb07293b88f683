use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::ViewStateParseError;
use crate::domain::genome::Normalization;
use crate::domain::view::ViewDimensions;

/// Upper pixel size for interactive zooming.
pub const MAX_PIXEL_SIZE: f64 = 12.0;
/// Upper pixel size when a whole chromosome pair is first shown.
pub const MAX_OVERVIEW_PIXEL_SIZE: f64 = 100.0;

/// Locus, resolution and pixel size of one browser.
///
/// `x` and `y` are the top-left offsets in bins at the current `zoom`;
/// `pixel_size` is screen pixels per bin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub chr1: usize,
    pub chr2: usize,
    pub zoom: usize,
    pub x: f64,
    pub y: f64,
    pub pixel_size: f64,
    #[serde(default)]
    pub normalization: Normalization,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            chr1: 0,
            chr2: 0,
            zoom: 0,
            x: 0.0,
            y: 0.0,
            pixel_size: 1.0,
            normalization: Normalization::none(),
        }
    }
}

impl ViewState {
    pub fn new(chr1: usize, chr2: usize, zoom: usize, x: f64, y: f64, pixel_size: f64) -> Self {
        Self { chr1, chr2, zoom, x, y, pixel_size, normalization: Normalization::none() }
    }

    /// Largest legal offsets; zero when the pair does not fill the view.
    pub fn max_offsets(&self, chr1_len: f64, chr2_len: f64, bin_size: f64, dims: ViewDimensions) -> (f64, f64) {
        let max_x = chr1_len / bin_size - dims.width / self.pixel_size;
        let max_y = chr2_len / bin_size - dims.height / self.pixel_size;
        (max_x.max(0.0), max_y.max(0.0))
    }

    /// Keep the view inside the chromosome pair.
    pub fn clamp(&mut self, chr1_len: f64, chr2_len: f64, bin_size: f64, dims: ViewDimensions) {
        let (max_x, max_y) = self.max_offsets(chr1_len, chr2_len, bin_size, dims);
        self.x = clamp_offset(self.x, max_x);
        self.y = clamp_offset(self.y, max_y);
    }

    /// Put the lower chromosome index on the x axis, swapping offsets with it.
    pub fn canonicalize(&mut self) {
        if self.chr1 > self.chr2 {
            std::mem::swap(&mut self.chr1, &mut self.chr2);
            std::mem::swap(&mut self.x, &mut self.y);
        }
    }

    pub fn same_chromosomes(&self, other: &ViewState) -> bool {
        self.chr1 == other.chr1 && self.chr2 == other.chr2
    }
}

fn clamp_offset(value: f64, max: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.max(0.0).min(max) }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{},{}",
            self.chr1, self.chr2, self.zoom, self.x, self.y, self.pixel_size, self.normalization
        )
    }
}

impl FromStr for ViewState {
    type Err = ViewStateParseError;

    /// `chr1,chr2,zoom,x,y,pixelSize[,normalization]`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.trim().split(',').map(str::trim);

        let chr1 = parse_field(fields.next(), "chr1")?;
        let chr2 = parse_field(fields.next(), "chr2")?;
        let zoom = parse_field(fields.next(), "zoom")?;
        let x = parse_finite(fields.next(), "x")?;
        let y = parse_finite(fields.next(), "y")?;
        let pixel_size = parse_finite(fields.next(), "pixelSize")?;
        if pixel_size <= 0.0 {
            return Err(ViewStateParseError::InvalidField {
                field: "pixelSize",
                value: pixel_size.to_string(),
            });
        }
        let normalization = match fields.next() {
            Some(tag) if !tag.is_empty() => Normalization::from(tag),
            _ => Normalization::none(),
        };

        Ok(Self { chr1, chr2, zoom, x, y, pixel_size, normalization })
    }
}

fn parse_field<T: FromStr>(raw: Option<&str>, field: &'static str) -> Result<T, ViewStateParseError> {
    let raw = raw.filter(|r| !r.is_empty()).ok_or(ViewStateParseError::MissingField(field))?;
    raw.parse()
        .map_err(|_| ViewStateParseError::InvalidField { field, value: raw.to_string() })
}

fn parse_finite(raw: Option<&str>, field: &'static str) -> Result<f64, ViewStateParseError> {
    let value: f64 = parse_field(raw, field)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ViewStateParseError::InvalidField { field, value: value.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_whole_genome_overview() {
        assert_eq!(ViewState::default().to_string(), "0,0,0,0,0,1,NONE");
    }

    #[test]
    fn canonicalize_swaps_axes() {
        let mut state = ViewState::new(3, 1, 0, 10.0, 20.0, 1.0);
        state.canonicalize();
        assert_eq!((state.chr1, state.chr2, state.x, state.y), (1, 3, 20.0, 10.0));
    }

    #[test]
    fn nan_offsets_clamp_to_origin() {
        let mut state = ViewState::new(1, 1, 0, f64::NAN, 5.0, 1.0);
        state.clamp(1_000.0, 1_000.0, 1.0, ViewDimensions::new(100.0, 100.0));
        assert_eq!((state.x, state.y), (0.0, 5.0));
    }
}
