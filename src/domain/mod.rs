pub mod dataset;
pub mod errors;
pub mod events;
pub mod genome;
pub mod logging;
pub mod view;
