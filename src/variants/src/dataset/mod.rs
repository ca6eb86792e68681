use std::ops::Range;

use located_error::prelude::*;
use log::trace;

use crate::{
    coordinate::{ContigIdx, Coordinate, Position},
    window::Windows,
};

mod error;
pub use error::DatasetError;

/// Genotype call value of a missing allele (e.g. `./.` in a VCF).
pub const MISSING_CALL: i16 = -1;
/// Genotype call value padding calls of a lower ploidy than the dataset's (e.g. haploid calls on chrX).
pub const FILL_CALL: i16 = -2;

/// Default variant chunk length of on-disk stores.
pub const DEFAULT_CHUNK_LENGTH: usize = 10_000;

/// A single variant site, along with the genotype calls of every sample.
/// - `genotypes`: flat `[samples x ploidy]` array of allele indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRecord {
    pub contig   : ContigIdx,
    pub position : Position,
    pub id       : String,
    pub alleles  : Vec<String>,
    pub genotypes: Vec<i16>,
}

/// In-memory variant dataset: a collection of arrays keyed by the `variants` and `samples` dimensions.
///
/// Variant-level columns (`variant_contig`, `variant_position`, `variant_id`, `variant_allele`) all
/// share the same ordering, and `call_genotype` is a flat `[variants x samples x ploidy]` array
/// following that same ordering. The optional `dosage` column is a flat `[variants x samples]` array.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantDataset {
    contigs         : Vec<String>,
    sample_id       : Vec<String>,
    ploidy          : usize,
    variant_contig  : Vec<ContigIdx>,
    variant_position: Vec<Position>,
    variant_id      : Vec<String>,
    variant_allele  : Vec<Vec<String>>,
    call_genotype   : Vec<i16>,
    dosage          : Option<Vec<Option<u16>>>,
    windows         : Option<Windows>,
    chunk_length    : usize,
}

impl VariantDataset {
    /// Create an empty dataset, with a fixed contig table, set of samples and ploidy.
    ///
    /// # Errors
    /// - if `ploidy` is zero.
    pub fn new(contigs: Vec<String>, sample_id: Vec<String>, ploidy: usize) -> Result<Self> {
        if ploidy == 0 {
            return Err(DatasetError::InvalidPloidy).loc("While creating a new dataset")
        }
        Ok(Self {
            contigs,
            sample_id,
            ploidy,
            variant_contig  : Vec::new(),
            variant_position: Vec::new(),
            variant_id      : Vec::new(),
            variant_allele  : Vec::new(),
            call_genotype   : Vec::new(),
            dosage          : None,
            windows         : None,
            chunk_length    : DEFAULT_CHUNK_LENGTH,
        })
    }

    /// Append a variant at the end of the dataset. Any previously computed dosage or windows are discarded.
    ///
    /// # Errors
    /// - if the record refers to an unknown contig.
    /// - if the record does not carry exactly `n_samples * ploidy` calls.
    /// - if a call is negative, without being either `MISSING_CALL` or `FILL_CALL`.
    pub fn push(&mut self, record: VariantRecord) -> Result<()> {
        use DatasetError::{UnknownContig, ShapeMismatch, InvalidCall};
        let loc_msg = || format!("While inserting variant {}", Coordinate::new(record.contig, record.position));
        if record.contig.idx() >= self.contigs.len() {
            return Err(UnknownContig(record.contig.idx())).with_loc(loc_msg)
        }
        let want = self.n_samples() * self.ploidy;
        if record.genotypes.len() != want {
            return Err(ShapeMismatch{column: "call_genotype", want, got: record.genotypes.len()}).with_loc(loc_msg)
        }
        if let Some(call) = record.genotypes.iter().find(|call| **call < FILL_CALL) {
            return Err(InvalidCall(*call)).with_loc(loc_msg)
        }

        self.variant_contig.push(record.contig);
        self.variant_position.push(record.position);
        self.variant_id.push(record.id);
        self.variant_allele.push(record.alleles);
        self.call_genotype.extend(record.genotypes);
        self.dosage  = None;
        self.windows = None;
        Ok(())
    }

    #[must_use]
    pub fn n_variants(&self) -> usize {
        self.variant_position.len()
    }

    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.sample_id.len()
    }

    #[must_use]
    pub fn ploidy(&self) -> usize {
        self.ploidy
    }

    #[must_use]
    pub fn contigs(&self) -> &[String] {
        &self.contigs
    }

    /// Name of the contig of a given index.
    #[must_use]
    pub fn contig_name(&self, contig: ContigIdx) -> Option<&str> {
        self.contigs.get(contig.idx()).map(String::as_str)
    }

    #[must_use]
    pub fn sample_id(&self) -> &[String] {
        &self.sample_id
    }

    #[must_use]
    pub fn variant_contig(&self) -> &[ContigIdx] {
        &self.variant_contig
    }

    #[must_use]
    pub fn variant_position(&self) -> &[Position] {
        &self.variant_position
    }

    #[must_use]
    pub fn variant_id(&self) -> &[String] {
        &self.variant_id
    }

    #[must_use]
    pub fn variant_allele(&self) -> &[Vec<String>] {
        &self.variant_allele
    }

    /// Genotype calls of a range of variants, as a flat `[variants x samples x ploidy]` slice.
    #[must_use]
    pub fn call_genotype(&self, variants: Range<usize>) -> &[i16] {
        let row = self.n_samples() * self.ploidy;
        &self.call_genotype[variants.start * row .. variants.end * row]
    }

    /// Genotype calls of a single variant, as a flat `[samples x ploidy]` slice.
    #[must_use]
    pub fn genotypes(&self, variant: usize) -> &[i16] {
        self.call_genotype(variant..variant + 1)
    }

    /// Genomic coordinates of all variants.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.variant_contig.iter()
            .zip(self.variant_position.iter())
            .map(|(contig, position)| Coordinate::new(*contig, *position))
    }

    /// Compute the `dosage` column: for each variant and sample, the sum of allele calls across ploidy.
    ///
    /// `FILL_CALL` values are ignored. A single `MISSING_CALL` within a genotype makes its dosage missing.
    pub fn compute_dosage(&mut self) {
        let dosage = self.call_genotype
            .chunks(self.ploidy)
            .map(|genotype| {
                genotype.iter()
                    .filter(|call| **call != FILL_CALL)
                    .try_fold(0u16, |acc, call| match *call {
                        MISSING_CALL => None,
                        allele       => Some(acc.saturating_add(allele.unsigned_abs())),
                    })
            })
            .collect();
        self.dosage = Some(dosage);
    }

    /// Flat `[variants x samples]` dosage array, if it was computed.
    #[must_use]
    pub fn dosage(&self) -> Option<&[Option<u16>]> {
        self.dosage.as_deref()
    }

    /// Dosages of a single variant, if the dosage column was computed.
    #[must_use]
    pub fn dosage_row(&self, variant: usize) -> Option<&[Option<u16>]> {
        let n = self.n_samples();
        self.dosage.as_ref().map(|dosage| &dosage[variant * n .. (variant + 1) * n])
    }

    /// Assign variants to windows of `size` variants, taking a new window every `step` variants.
    ///
    /// # Errors
    /// - if either `size` or `step` is zero.
    pub fn window_by_variant(&mut self, size: usize, step: usize) -> Result<()> {
        if size == 0 || step == 0 {
            return Err(DatasetError::InvalidWindow).with_loc(|| format!("While windowing variants (size: {size}, step: {step})"))
        }
        let windows = Windows::by_variant(&self.variant_contig, size, step);
        trace!("Partitioned {} variants into {} windows", self.n_variants(), windows.len());
        self.windows = Some(windows);
        Ok(())
    }

    #[must_use]
    pub fn windows(&self) -> Option<&Windows> {
        self.windows.as_ref()
    }

    /// Discard the `window_contig`, `window_start` and `window_stop` columns.
    pub fn drop_windows(&mut self) {
        self.windows = None;
    }

    /// Select a subset of variants, given their indices. Indices must be strictly increasing.
    ///
    /// Sample-level columns, dosages and the chunk length are carried over. Window boundaries
    /// are dropped, since they refer to indices of the previous variant set.
    ///
    /// # Errors
    /// - if any index is out of bounds.
    /// - if indices are not strictly increasing.
    pub fn isel(&self, indices: &[usize]) -> Result<Self> {
        use DatasetError::{IndexOutOfBounds, UnsortedIndices};
        let loc_msg = "While subsetting variants";
        if indices.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(UnsortedIndices).loc(loc_msg)
        }
        if let Some(index) = indices.last().filter(|index| **index >= self.n_variants()) {
            return Err(IndexOutOfBounds{index: *index, len: self.n_variants()}).loc(loc_msg)
        }

        let pick = |column: &[Vec<String>]| indices.iter().map(|i| column[*i].clone()).collect::<Vec<_>>();
        let call_genotype = indices.iter().flat_map(|i| self.genotypes(*i).iter().copied()).collect();
        let dosage = self.dosage.as_ref().map(|_| {
            indices.iter()
                .flat_map(|i| self.dosage_row(*i).unwrap_or_default().iter().copied())
                .collect()
        });

        Ok(Self {
            contigs         : self.contigs.clone(),
            sample_id       : self.sample_id.clone(),
            ploidy          : self.ploidy,
            variant_contig  : indices.iter().map(|i| self.variant_contig[*i]).collect(),
            variant_position: indices.iter().map(|i| self.variant_position[*i]).collect(),
            variant_id      : indices.iter().map(|i| self.variant_id[*i].clone()).collect(),
            variant_allele  : pick(&self.variant_allele),
            call_genotype,
            dosage,
            windows         : None,
            chunk_length    : self.chunk_length,
        })
    }

    #[must_use]
    pub fn chunk_length(&self) -> usize {
        self.chunk_length
    }

    /// Set the number of variants per on-disk chunk.
    ///
    /// # Errors
    /// - if `chunk_length` is zero.
    pub fn rechunk(&mut self, chunk_length: usize) -> Result<()> {
        if chunk_length == 0 {
            return Err(DatasetError::InvalidChunkLength).loc("While rechunking dataset")
        }
        self.chunk_length = chunk_length;
        Ok(())
    }

    /// Variant index ranges of each on-disk chunk.
    pub fn chunks(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.n_variants())
            .step_by(self.chunk_length)
            .map(|start| start..usize::min(start + self.chunk_length, self.n_variants()))
    }

    /// Coerce text columns to a uniform representation:
    /// - every `variant_allele` row is padded with empty strings up to the widest row.
    /// - empty `variant_id` and `sample_id` entries are replaced with '.'
    pub fn coerce_text_fields(&mut self) {
        let width = self.max_alleles();
        for alleles in &mut self.variant_allele {
            alleles.resize(width, String::new());
        }
        for id in self.variant_id.iter_mut().chain(self.sample_id.iter_mut()).filter(|id| id.is_empty()) {
            id.push('.');
        }
    }

    /// Number of alleles of the most polymorphic variant.
    #[must_use]
    pub fn max_alleles(&self) -> usize {
        self.variant_allele.iter().map(Vec::len).max().unwrap_or(0)
    }
}
