pub mod matrix_source;
pub mod services;
pub mod session;

pub use matrix_source::StaticMatrixSource;
pub use services::{BrowserTimeProvider, ConsoleLogger};
pub use session::BrowserSession;
