//! Uniform random subsampling of variant sites.

use located_error::prelude::*;
use log::info;

use variants::VariantDataset;

/// Number of variants to retain, given the total number of variants and user-requested limits.
///
/// `subsample_fraction`, when provided, takes precedence over `subsample`, and yields
/// `floor(total * fraction)` variants. Requested counts are capped to `total`.
/// Returns `None` when no subsampling was requested.
#[must_use]
pub fn subsample_size(total: usize, subsample: Option<usize>, subsample_fraction: Option<f64>) -> Option<usize> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let from_fraction = subsample_fraction.map(|fraction| (total as f64 * fraction).floor() as usize);
    from_fraction.or(subsample).map(|n| n.min(total))
}

/// Draw `n` distinct indices out of `0..total`, uniformly and without replacement.
/// Indices are returned in ascending order. `n` is capped to `total`.
pub fn subsample_indices(total: usize, n: usize, rng: &mut fastrand::Rng) -> Vec<usize> {
    let mut indices = rng.choose_multiple(0..total, n.min(total));
    indices.sort_unstable();
    indices
}

/// Randomly select `n` variants of `data`, preserving their positional order.
pub fn subsample(data: &VariantDataset, n: usize, rng: &mut fastrand::Rng) -> Result<VariantDataset> {
    let indices = subsample_indices(data.n_variants(), n, rng);
    info!("Subsampling {} out of {} variants", indices.len(), data.n_variants());
    data.isel(&indices).loc("While subsampling variants")
}
