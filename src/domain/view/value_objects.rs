use std::cell::Cell;

use derive_more::{Constructor, Display, From};
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumString};

use crate::domain::genome::Chromosome;

/// Value Object - visible size of the contact-matrix viewport in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Constructor, Serialize, Deserialize)]
pub struct ViewDimensions {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewDimensions {
    fn default() -> Self {
        Self { width: 640.0, height: 640.0 }
    }
}

/// Supplies the current viewport size whenever an operation needs it.
pub trait ViewportSource {
    fn view_dimensions(&self) -> ViewDimensions;
}

impl ViewportSource for ViewDimensions {
    fn view_dimensions(&self) -> ViewDimensions {
        *self
    }
}

/// Resizable viewport owned by the host.
impl ViewportSource for Cell<ViewDimensions> {
    fn view_dimensions(&self) -> ViewDimensions {
        self.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

/// How the main ("A") and control ("B") maps are combined on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive)]
pub enum DisplayMode {
    #[default]
    A,
    B,
    #[strum(to_string = "AOB")]
    AOverB,
    #[strum(to_string = "BOA")]
    BOverA,
    #[strum(to_string = "AMB")]
    AMinusB,
}

/// Identity of one browser instance on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize)]
#[display(fmt = "browser-{}", _0)]
pub struct BrowserId(u32);

impl BrowserId {
    pub fn value(&self) -> u32 {
        self.0
    }
}

/// What one axis currently shows, in base pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct GenomicState {
    pub chromosome: Chromosome,
    pub start_bp: f64,
    pub end_bp: f64,
    /// Base pairs per screen pixel.
    pub bpp: f64,
}
