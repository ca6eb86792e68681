//! Iterative, windowed LD pruning.

use located_error::prelude::*;
use log::{debug, info};

use variants::VariantDataset;

use crate::{LdBackend, PrunerError};

/// Parameters of the pruning loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PruneParams {
    pub window_size: usize,
    pub window_step: usize,
    pub threshold  : f64,
    pub n_iter     : usize,
}

impl From<&parser::LdPrune> for PruneParams {
    fn from(args: &parser::LdPrune) -> Self {
        Self {
            window_size: args.window_size,
            window_step: args.window_step,
            threshold  : args.threshold,
            n_iter     : args.n_iter,
        }
    }
}

impl PruneParams {
    fn validate(&self) -> Result<(), PrunerError> {
        if self.n_iter == 0 {
            return Err(PrunerError::ZeroIterations)
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(PrunerError::InvalidThreshold(self.threshold))
        }
        Ok(())
    }
}

/// Outcome of a single pruning pass (`iteration` is 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationStats {
    pub iteration: usize,
    pub n_retain : usize,
    pub n_remove : usize,
}

#[derive(Debug)]
pub struct PruneSummary {
    pub iterations: Vec<IterationStats>,
    pub converged : bool,
    pub dataset   : VariantDataset,
}

/// Repeatedly window `data` and remove variants in LD, until a pass removes no variant, or
/// `params.n_iter` passes were performed.
///
/// `data` is expected to carry dosages. Windows are recomputed from scratch between passes.
pub fn prune_ld<B: LdBackend>(backend: &B, data: VariantDataset, params: &PruneParams) -> Result<PruneSummary> {
    let loc_msg = "While pruning variants in linkage disequilibrium";
    params.validate().loc(loc_msg)?;

    let mut data = backend.window_by_variant(data, params.window_size, params.window_step).loc(loc_msg)?;
    let mut iterations = Vec::with_capacity(params.n_iter);
    let mut converged  = false;
    for iteration in 1..=params.n_iter {
        let n_start = data.n_variants();
        data = backend.ld_prune(data, params.threshold).with_loc(|| format!("{loc_msg} (iteration {iteration})"))?;
        let n_retain = data.n_variants();
        let n_remove = n_start.saturating_sub(n_retain);
        info!("LD prune iteration {iteration}; retaining {n_retain}, removing {n_remove}");
        iterations.push(IterationStats{iteration, n_retain, n_remove});

        if n_remove == 0 {
            info!("LD pruning converged after {iteration} iteration(s)");
            converged = true;
            break
        }
        if iteration < params.n_iter {
            data = backend.drop_windows(data);
            data = backend.window_by_variant(data, params.window_size, params.window_step).loc(loc_msg)?;
        }
    }

    if !converged {
        debug!("LD pruning stopped after {} iteration(s) without converging", params.n_iter);
    }
    Ok(PruneSummary{iterations, converged, dataset: data})
}
