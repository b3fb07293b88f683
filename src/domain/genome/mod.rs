//! Chromosomes, genome assemblies and locus text.

pub mod entities;
pub mod locus;
pub mod value_objects;

pub use entities::*;
pub use locus::*;
pub use value_objects::*;
