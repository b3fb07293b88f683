use futures::future::LocalBoxFuture;

use super::entities::MatrixDescriptor;
use crate::domain::errors::DatasetResult;

/// Where matrix metadata for a chromosome pair comes from (a `.hic` reader,
/// a JS callback, an in-memory table).
pub trait MatrixSource {
    fn get_matrix(&self, chr1: usize, chr2: usize) -> LocalBoxFuture<'_, DatasetResult<MatrixDescriptor>>;
}

/// Gene-name search used when goto text is not a locus. Resolves to a locus
/// string such as `chr8:127,735,434-127,742,951`.
pub trait GeneLocator {
    fn locate<'a>(&'a self, genome_id: &'a str, name: &'a str) -> LocalBoxFuture<'a, Option<String>>;
}
