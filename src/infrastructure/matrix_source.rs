use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use futures::future::{self, FutureExt, LocalBoxFuture};

use crate::domain::dataset::{MatrixDescriptor, MatrixSource};
use crate::domain::errors::{DatasetError, DatasetResult};
use crate::domain::logging::LogComponent;

/// Matrix metadata synthesised from a known resolution ladder, for hosts that
/// already hold the header in memory (and for tests).
pub struct StaticMatrixSource {
    bp_resolutions: Vec<u64>,
    unavailable: RefCell<HashSet<(usize, usize)>>,
    fetches: Cell<usize>,
}

impl StaticMatrixSource {
    pub fn new(bp_resolutions: Vec<u64>) -> Self {
        Self { bp_resolutions, unavailable: RefCell::new(HashSet::new()), fetches: Cell::new(0) }
    }

    /// Make every fetch for this pair fail.
    pub fn mark_unavailable(&self, chr1: usize, chr2: usize) {
        self.unavailable.borrow_mut().insert((chr1.min(chr2), chr1.max(chr2)));
    }

    /// Number of `get_matrix` calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }
}

impl MatrixSource for StaticMatrixSource {
    fn get_matrix(&self, chr1: usize, chr2: usize) -> LocalBoxFuture<'_, DatasetResult<MatrixDescriptor>> {
        self.fetches.set(self.fetches.get() + 1);

        let result = if self.unavailable.borrow().contains(&(chr1.min(chr2), chr1.max(chr2))) {
            crate::log_warn!(
                LogComponent::Infrastructure("StaticMatrixSource"),
                "Matrix {}-{} is not available",
                chr1,
                chr2
            );
            Err(DatasetError::MatrixUnavailable { chr1, chr2, reason: "marked unavailable".to_string() })
        } else {
            Ok(MatrixDescriptor::from_ladder(chr1, chr2, &self.bp_resolutions))
        };
        future::ready(result).boxed_local()
    }
}
