mod common;

use std::sync::Arc;

use common::{browser, dataset_with_ladder, loaded_browser};
use futures::executor::block_on;
use hic_browser_wasm::application::{GenomicRange, InitialView, SyncOutcome};
use hic_browser_wasm::domain::logging::{LogLevel, MemoryLogger, init_logger};

#[test]
fn unrepresentable_resolution_is_reported_and_ignored() {
    let logger = Arc::new(MemoryLogger::new(LogLevel::Warn, 32));
    init_logger(Box::new(Arc::clone(&logger)));

    let (leader, _) = loaded_browser();
    let follower = browser(2);
    let (dataset, _) = dataset_with_ladder("coarse", &[2_500_000, 1_000_000, 250_000]);
    block_on(follower.load_dataset(dataset, InitialView::Default)).unwrap();
    let before = follower.state();

    // 12 px per 500 kb bin would need 24 px per 1 Mb bin.
    let range = GenomicRange::new(1, 1_000_000.0, Some(2_000_000.0));
    leader.goto(range, range, None).unwrap();
    let outcome = follower.sync_state(&leader.get_sync_state().unwrap());

    assert_eq!(outcome, SyncOutcome::Unrepresentable { bin_size: 500_000 });
    assert_eq!(follower.state(), before);
    assert!(
        logger
            .entries()
            .iter()
            .any(|entry| entry.level == LogLevel::Warn
                && entry.message.contains("Cannot synch map coarse (resolution 500000 not available)"))
    );
}
