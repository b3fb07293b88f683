//! Viewport geometry, resolution matching, legal bounds and the
//! cross-browser sync protocol.

pub mod bounds;
pub mod resolution;
pub mod sync;
pub mod value_objects;

pub use bounds::*;
pub use resolution::*;
pub use sync::*;
pub use value_objects::*;
