pub mod browser;
pub mod coordinator;
pub mod in_flight;
pub mod navigation;
pub mod registry;
pub mod sweep;

pub use browser::{ChangeFlags, HicBrowser, InitialView};
pub use coordinator::{SyncCoordinator, SyncOutcome};
pub use navigation::{GenomicRange, ZoomDirection};
pub use registry::BrowserRegistry;
