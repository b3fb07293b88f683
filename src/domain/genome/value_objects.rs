use derive_more::{Constructor, Display, From};
use serde::{Deserialize, Serialize};

/// Value Object - one chromosome of a dataset, as listed in its header.
#[derive(Debug, Clone, PartialEq, Eq, Constructor, Serialize, Deserialize)]
pub struct Chromosome {
    pub index: usize,
    pub name: String,
    /// Length in base pairs.
    pub size: u64,
}

impl Chromosome {
    pub fn size_bp(&self) -> f64 {
        self.size as f64
    }

    /// Index 0 named `All` is the whole-genome pseudo-chromosome.
    pub fn is_whole_genome(&self) -> bool {
        self.index == 0 && self.name.eq_ignore_ascii_case("all")
    }
}

/// Value Object - normalization tag (`NONE`, `KR`, `VC`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
#[display(fmt = "{}", _0)]
pub struct Normalization(String);

impl Normalization {
    pub const NONE: &'static str = "NONE";

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn none() -> Self {
        Self(Self::NONE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_none(&self) -> bool {
        self.0 == Self::NONE
    }
}

impl Default for Normalization {
    fn default() -> Self {
        Self::none()
    }
}

impl From<&str> for Normalization {
    fn from(tag: &str) -> Self {
        Self(tag.to_string())
    }
}
