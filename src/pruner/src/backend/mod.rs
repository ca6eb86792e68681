use std::path::Path;

use anyhow::Result;
#[cfg(test)]
use mockall::automock;

use variants::VariantDataset;

mod native;
pub use native::NativeBackend;

/// Genotype statistics and array-store capabilities required by the pruning pipeline.
///
/// Datasets are moved in and out of each operation: the pipeline never holds two views of the
/// same variant set.
#[cfg_attr(test, automock)]
pub trait LdBackend {
    /// Convert a `.vcf(.gz)` file into a new array store at `store`, with chunks of `chunk_length` variants.
    fn vcf_to_store(&self, vcf: &Path, store: &Path, chunk_length: usize) -> Result<()>;

    /// Load an array store as an in-memory dataset, keeping track of its chunk length.
    fn load(&self, store: &Path) -> Result<VariantDataset>;

    /// Assign variants to windows of `size` variants, every `step` variants.
    fn window_by_variant(&self, data: VariantDataset, size: usize, step: usize) -> Result<VariantDataset>;

    /// Discard window boundaries.
    fn drop_windows(&self, data: VariantDataset) -> VariantDataset;

    /// Remove variants so that no pair sharing a window has an r² of `threshold` or more.
    fn ld_prune(&self, data: VariantDataset, threshold: f64) -> Result<VariantDataset>;

    /// Set the variant chunk length used when persisting `data`.
    fn rechunk(&self, data: VariantDataset, chunk_length: usize) -> Result<VariantDataset>;

    /// Persist `data` as an array store at `store`, overwriting any previous store.
    fn save(&self, data: &VariantDataset, store: &Path) -> Result<()>;
}
