//! Loaded contact maps and the collaborators that feed them.

pub mod entities;
pub mod repositories;

pub use entities::*;
pub use repositories::*;
