//! Linkage disequilibrium between variant pairs, computed from dosages.

use located_error::prelude::*;
use log::{debug, trace};

use crate::VariantDataset;

#[derive(Error, Debug)]
pub enum LdError {
    #[error("Dataset does not carry a dosage column. Dosages must be computed before LD")]
    MissingDosage,

    #[error("Dataset does not carry window boundaries. Variants must be windowed before LD")]
    MissingWindows,

    #[error("Invalid LD threshold {0}: must lie between 0.0 and 1.0")]
    InvalidThreshold(f64),
}

/// Squared Pearson correlation between the dosages of two variants.
///
/// Samples with a missing dosage in either variant are ignored. Returns `None` when
/// the correlation is undefined: fewer than two shared samples, or zero variance.
#[must_use]
pub fn r2(a: &[Option<u16>], b: &[Option<u16>]) -> Option<f64> {
    let (mut n, mut sum_a, mut sum_b, mut sum_aa, mut sum_bb, mut sum_ab) = (0f64, 0f64, 0f64, 0f64, 0f64, 0f64);
    for (x, y) in a.iter().zip(b.iter()).filter_map(|(x, y)| Some((f64::from((*x)?), f64::from((*y)?)))) {
        n      += 1.0;
        sum_a  += x;
        sum_b  += y;
        sum_aa += x * x;
        sum_bb += y * y;
        sum_ab += x * y;
    }
    if n < 2.0 {
        return None
    }
    let cov   = n.mul_add(sum_ab, -(sum_a * sum_b));
    let var_a = n.mul_add(sum_aa, -(sum_a * sum_a));
    let var_b = n.mul_add(sum_bb, -(sum_b * sum_b));
    if var_a <= 0.0 || var_b <= 0.0 {
        return None
    }
    Some((cov * cov) / (var_a * var_b))
}

/// Find every pair of variants `(i, j)`, `i < j`, sharing a window and whose r² reaches `threshold`.
///
/// Pairs located within the overlap of two consecutive windows are only evaluated once. The
/// returned pairs are sorted and unique. `on_window` is called once every window was processed.
///
/// # Errors
/// - if the dataset has no dosage, or no windows.
/// - if `threshold` does not lie within `[0, 1]`.
pub fn linked_pairs<F>(data: &VariantDataset, threshold: f64, mut on_window: F) -> Result<Vec<(usize, usize)>>
where
    F: FnMut(),
{
    use LdError::{MissingDosage, MissingWindows, InvalidThreshold};
    let loc_msg = "While searching for variant pairs in linkage";
    if !(0.0..=1.0).contains(&threshold) {
        return Err(InvalidThreshold(threshold)).loc(loc_msg)
    }
    if data.dosage().is_none() {
        return Err(MissingDosage).loc(loc_msg)
    }
    let windows = data.windows().ok_or(MissingWindows).loc(loc_msg)?;

    let mut pairs = Vec::new();
    let mut covered: Option<(crate::coordinate::ContigIdx, usize)> = None;
    for window in windows.iter() {
        // Pairs whose both ends lie before `covered_until` were already seen in the previous window.
        let covered_until = match covered {
            Some((contig, stop)) if contig == window.contig => usize::max(stop, window.range.start),
            _ => window.range.start,
        };
        for j in covered_until..window.range.end {
            let dosage_j = data.dosage_row(j).unwrap_or_default();
            for i in window.range.start..j {
                let dosage_i = data.dosage_row(i).unwrap_or_default();
                if let Some(r2) = r2(dosage_i, dosage_j).filter(|r2| *r2 >= threshold) {
                    trace!("r2({i}, {j}) = {r2:.5}");
                    pairs.push((i, j));
                }
            }
        }
        covered = Some((window.contig, usize::max(covered_until, window.range.end)));
        on_window();
    }
    pairs.sort_unstable();
    pairs.dedup();
    debug!("Found {} variant pairs with r2 >= {threshold}", pairs.len());
    Ok(pairs)
}

/// Greedy maximal independent set over the graph of linked variants.
///
/// Edges are walked in ascending order; whenever neither end of an edge `(i, j)` was already
/// removed, the later variant `j` is removed. Returns the ascending indices of retained variants.
#[must_use]
pub fn maximal_independent_set(n_variants: usize, edges: &[(usize, usize)]) -> Vec<usize> {
    let mut removed = vec![false; n_variants];
    for (i, j) in edges {
        if !removed[*i] && !removed[*j] {
            removed[*j] = true;
        }
    }
    removed.iter()
        .enumerate()
        .filter_map(|(idx, removed)| (!removed).then_some(idx))
        .collect()
}
