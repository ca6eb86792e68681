use std::path::Path;

use located_error::prelude::*;
use log::{debug, info};

use ldprune_io::store;
use logger::Logger;
use variants::{ld, VariantDataset};

use super::LdBackend;

/// In-process backend: VCF parsing, array-store codec and dosage r² from the workspace crates.
/// - `threads`: number of additional BGZF decompression threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBackend {
    threads: usize,
}

impl NativeBackend {
    #[must_use]
    pub fn new(threads: usize) -> Self {
        Self { threads }
    }
}

impl LdBackend for NativeBackend {
    fn vcf_to_store(&self, vcf: &Path, store: &Path, chunk_length: usize) -> Result<()> {
        store::vcf_to_store(vcf, store, chunk_length, self.threads)?;
        Ok(())
    }

    fn load(&self, store: &Path) -> Result<VariantDataset> {
        store::read_dataset(store, self.threads)
    }

    fn window_by_variant(&self, mut data: VariantDataset, size: usize, step: usize) -> Result<VariantDataset> {
        data.window_by_variant(size, step)?;
        Ok(data)
    }

    fn drop_windows(&self, mut data: VariantDataset) -> VariantDataset {
        data.drop_windows();
        data
    }

    fn ld_prune(&self, data: VariantDataset, threshold: f64) -> Result<VariantDataset> {
        let n_windows = data.windows().map_or(0, variants::Windows::len);
        let progress  = Logger::progress_bar(n_windows as u64, "Computing LD");
        let edges = ld::linked_pairs(&data, threshold, || progress.inc(1)).loc("While pruning variants in LD")?;
        progress.finish_and_clear();

        let keep = ld::maximal_independent_set(data.n_variants(), &edges);
        debug!("{} linked pairs across {n_windows} windows: keeping {}/{} variants", edges.len(), keep.len(), data.n_variants());
        data.isel(&keep).loc("While pruning variants in LD")
    }

    fn rechunk(&self, mut data: VariantDataset, chunk_length: usize) -> Result<VariantDataset> {
        data.rechunk(chunk_length)?;
        Ok(data)
    }

    fn save(&self, data: &VariantDataset, store: &Path) -> Result<()> {
        let metadata = store::write_dataset(data, store)?;
        info!("Saved {} variants x {} samples to {}", metadata.n_variants, metadata.n_samples, store.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use variants::{coordinate::{ContigIdx, Position}, VariantRecord};

    fn dataset(rows: &[&[i16]]) -> Result<VariantDataset> {
        let mut data = VariantDataset::new(vec!["1".into()], (0..4).map(|i| format!("S{i}")).collect(), 2)?;
        for (i, genotypes) in rows.iter().enumerate() {
            data.push(VariantRecord {
                contig   : ContigIdx(0),
                position : Position(u32::try_from(i)? * 10 + 1),
                id       : format!("rs{i}"),
                alleles  : vec!["A".into(), "G".into()],
                genotypes: genotypes.to_vec(),
            })?;
        }
        Ok(data)
    }

    #[test]
    fn ld_prune_removes_linked_variants() -> Result<()> {
        let backend = NativeBackend::new(0);
        let mut data = dataset(&[
            &[0, 0, 0, 1, 1, 1, 0, 1], // dosage 0 1 2 1
            &[0, 0, 0, 1, 1, 1, 0, 1], // identical to 0
            &[1, 1, 0, 0, 0, 1, 1, 0], // dosage 2 0 1 1: r² = 0.25 with 0
            &[0, 1, 0, 0, 1, 1, 0, 0], // dosage 1 0 2 0
        ])?;
        data.compute_dosage();
        let data = backend.window_by_variant(data, 4, 4)?;
        let pruned = backend.ld_prune(data, 0.6)?;
        assert_eq!(pruned.variant_id(), ["rs0", "rs2", "rs3"]);
        assert!(pruned.windows().is_none());
        assert!(pruned.dosage().is_some());
        Ok(())
    }

    #[test]
    fn identical_variants_are_pruned_at_threshold_one() -> Result<()> {
        let backend = NativeBackend::new(0);
        let row: &[i16] = &[0, 0, 0, 1, 1, 1, 0, 1];
        let mut data = dataset(&[row, row])?;
        data.compute_dosage();
        let data = backend.window_by_variant(data, 10, 5)?;
        let pruned = backend.ld_prune(data, 1.0)?;
        assert_eq!(pruned.variant_id(), ["rs0"]);
        Ok(())
    }

    #[test]
    fn ld_prune_requires_windows() -> Result<()> {
        let backend = NativeBackend::new(0);
        let mut data = dataset(&[&[0, 0, 0, 1, 1, 1, 0, 1]])?;
        data.compute_dosage();
        assert!(backend.ld_prune(data.clone(), 0.1).is_err());
        let data = backend.window_by_variant(data, 1, 1)?;
        let data = backend.drop_windows(data);
        assert!(data.windows().is_none());
        Ok(())
    }

    #[test]
    fn save_and_load() -> Result<()> {
        let tmpdir  = tempfile::tempdir()?;
        let path    = tmpdir.path().join("test.vcf.zarr");
        let backend = NativeBackend::new(0);
        let data    = backend.rechunk(dataset(&[&[0; 8], &[1; 8], &[0, 1, 0, 1, 0, 1, 0, 1]])?, 2)?;
        backend.save(&data, &path)?;
        assert_eq!(backend.load(&path)?, data);
        Ok(())
    }
}
