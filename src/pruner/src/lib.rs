use std::path::{Path, PathBuf};

use located_error::prelude::*;
use log::{info, warn};

use ldprune_io::{parse, write};
use parser::LdPrune;

mod error;
pub use error::PrunerError;

pub mod backend;
pub use backend::{LdBackend, NativeBackend};

pub mod subsample;
pub use subsample::{subsample, subsample_indices, subsample_size};

pub mod prune;
pub use prune::{prune_ld, IterationStats, PruneParams, PruneSummary};

/// Convert `vcf` into a new array store, and return the path of this store.
///
/// The store is written at `<tmpdir>/<vcf file name>.zarr` when `tmpdir` is provided, and at
/// `<vcf>.zarr` otherwise.
pub fn convert_vcf_to_store<B: LdBackend>(backend: &B, vcf: &Path, tmpdir: Option<&Path>, chunk_length: usize) -> Result<PathBuf> {
    let store = parse::store_path(vcf, tmpdir)?;
    info!("Converting {} into {}", vcf.display(), store.display());
    backend.vcf_to_store(vcf, &store, chunk_length)
        .with_loc(|| format!("While converting {} to an array store", vcf.display()))?;
    Ok(store)
}

/// Files written for a single input VCF, along with the pruning statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct PrunedFile {
    pub vcf       : PathBuf,
    pub store     : PathBuf,
    pub output    : PathBuf,
    pub bed       : Option<PathBuf>,
    pub n_variants: usize,
    pub iterations: Vec<IterationStats>,
    pub converged : bool,
}

/// Convert, subsample, prune and save a single VCF file.
/// - `tmpdir`: directory holding the intermediate store.
/// - `output_dir`: directory receiving pruned outputs. Next to the intermediate store when `None`.
fn prune_file<B: LdBackend>(
    backend   : &B,
    vcf       : &Path,
    args      : &LdPrune,
    tmpdir    : &Path,
    output_dir: Option<&Path>,
    rng       : &mut fastrand::Rng,
) -> Result<PrunedFile> {
    let store  = convert_vcf_to_store(backend, vcf, Some(tmpdir), args.chunk_length)?;
    let output = match output_dir {
        Some(dir) => parse::output_store_path(&parse::store_path(vcf, Some(dir))?, &args.output_suffix)?,
        None      => parse::output_store_path(&store, &args.output_suffix)?,
    };

    // ---- Load, and keep track of the input chunk length.
    let mut data     = backend.load(&store)?;
    let chunk_length = data.chunk_length();
    info!("Loaded {} variants x {} samples from {}", data.n_variants(), data.n_samples(), store.display());

    if let Some(n) = subsample_size(data.n_variants(), args.subsample, args.subsample_fraction) {
        data = subsample(&data, n, rng)?;
    }
    data.compute_dosage();

    // ---- Iterative pruning.
    let summary = prune_ld(backend, data, &PruneParams::from(args))?;
    let mut data = backend.rechunk(summary.dataset, chunk_length)?;
    data.coerce_text_fields();

    // ---- Outputs.
    parse::create_parent_directory(&output)?;
    backend.save(&data, &output)?;
    let bed = if args.as_bed {
        let bed = parse::bed_path(&output)?;
        write::to_bed(&data, &bed)?;
        Some(bed)
    } else {
        None
    };

    Ok(PrunedFile {
        vcf       : vcf.to_path_buf(),
        store,
        output,
        bed,
        n_variants: data.n_variants(),
        iterations: summary.iterations,
        converged : summary.converged,
    })
}

/// Prune every VCF of `vcfs`, in order. The first error aborts the run.
///
/// Intermediate stores are written within `args.tmpdir` when provided, along with pruned outputs.
/// Otherwise, intermediate stores live within a temporary directory removed at the end of the run,
/// and pruned outputs are written next to their input VCF.
pub fn run<B: LdBackend>(backend: &B, vcfs: &[PathBuf], args: &LdPrune) -> Result<Vec<PrunedFile>> {
    if vcfs.is_empty() {
        warn!("No input VCF file was provided. Nothing to do.");
        return Ok(Vec::new())
    }
    if !args.exclude.is_empty() {
        warn!("--exclude is not yet supported: samples {:?} are kept", args.exclude);
    }
    if let Some(output_file) = &args.output_file {
        warn!("--output-file is not yet supported: '{}' is ignored", output_file.display());
    }

    // ---- The scoped directory is removed once dropped, i.e. at the end of the run.
    let scoped_tmpdir;
    let (tmpdir, in_place) = match &args.tmpdir {
        Some(dir) => (dir.as_path(), true),
        None      => {
            scoped_tmpdir = tempfile::tempdir().map_err(PrunerError::TempDir).loc("While preparing intermediate stores")?;
            (scoped_tmpdir.path(), false)
        },
    };

    info!("Subsampling seed: {}", args.seed);
    let mut rng = fastrand::Rng::with_seed(args.seed);

    let mut pruned = Vec::with_capacity(vcfs.len());
    for vcf in vcfs {
        let output_dir = if in_place { None } else { Some(vcf.parent().unwrap_or_else(|| Path::new("."))) };
        let file = prune_file(backend, vcf, args, tmpdir, output_dir, &mut rng)
            .with_loc(|| format!("While pruning {}", vcf.display()))?;
        info!("{}: {} variants retained after {} iteration(s) -> {}", vcf.display(), file.n_variants, file.iterations.len(), file.output.display());
        pruned.push(file);
    }
    Ok(pruned)
}
