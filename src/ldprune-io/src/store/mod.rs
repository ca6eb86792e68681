//! On-disk, chunked, columnar variant store.
//!
//! A store is a directory (conventionally ending with `.zarr`) holding:
//! - `attrs.yaml`: the `StoreMetadata` of the dataset (dimensions, contigs, samples).
//! - `variants/<k>.yaml.gz`: BGZF-compressed variant chunks, each holding up to `chunk_length`
//!   consecutive variants, along with their genotype calls.

use std::{collections::HashMap, fs::{self, File}, io::{BufReader, BufWriter, Write}, path::{Path, PathBuf}};

use gzp::{deflate::Bgzf, par::{compress::{ParCompress, ParCompressBuilder}, decompress::ParDecompressBuilder}, ZWriter};
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use located_error::prelude::*;
use variants::{coordinate::{ContigIdx, Position}, VariantDataset, VariantRecord};

use crate::read::VCFReader;

mod error;
pub use error::StoreError;

pub const METADATA_FILE : &str = "attrs.yaml";
pub const CHUNK_DIR     : &str = "variants";
pub const CHUNK_EXT     : &str = "yaml.gz";
pub const FORMAT_VERSION: u32  = 1;

/// Dataset-level attributes of a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreMetadata {
    pub format_version: u32,
    pub n_variants    : usize,
    pub n_samples     : usize,
    pub ploidy        : usize,
    pub chunk_length  : usize,
    pub n_chunks      : usize,
    pub max_alleles   : usize,
    pub contigs       : Vec<String>,
    pub sample_id     : Vec<String>,
}

/// Variant-level columns + genotype calls of `chunk_length` consecutive variants.
#[derive(Debug, Default, Serialize, Deserialize)]
struct VariantChunk {
    variant_contig  : Vec<u32>,
    variant_position: Vec<u32>,
    variant_id      : Vec<String>,
    variant_allele  : Vec<Vec<String>>,
    call_genotype   : Vec<i16>,
}

impl VariantChunk {
    fn len(&self) -> usize {
        self.variant_position.len()
    }

    fn is_empty(&self) -> bool {
        self.variant_position.is_empty()
    }

    fn push(&mut self, record: VariantRecord) {
        self.variant_contig.push(record.contig.into());
        self.variant_position.push(record.position.into());
        self.variant_id.push(record.id);
        self.variant_allele.push(record.alleles);
        self.call_genotype.extend(record.genotypes);
    }

    /// Split the chunk back into records, checking that every column agrees on the number of variants.
    fn into_records(self, row_len: usize) -> Result<Vec<VariantRecord>> {
        use StoreError::CorruptedChunk;
        let n = self.len();
        let consistent = self.variant_contig.len() == n
            && self.variant_id.len() == n
            && self.variant_allele.len() == n
            && self.call_genotype.len() == n * row_len;
        if !consistent {
            return Err(CorruptedChunk).loc("While decoding variant chunk")
        }

        let genotypes = self.call_genotype.chunks(row_len.max(1)).map(<[i16]>::to_vec).chain(std::iter::repeat_with(Vec::new));
        let records = self.variant_contig.into_iter()
            .zip(self.variant_position)
            .zip(self.variant_id)
            .zip(self.variant_allele)
            .zip(genotypes)
            .map(|((((contig, position), id), alleles), genotypes)| VariantRecord {
                contig  : ContigIdx(contig),
                position: Position(position),
                id,
                alleles,
                genotypes,
            })
            .collect();
        Ok(records)
    }
}

fn chunk_path(store: &Path, k: usize) -> PathBuf {
    store.join(CHUNK_DIR).join(format!("{k}.{CHUNK_EXT}"))
}

/// Remove a pre-existing store at `path`, refusing to touch anything that does not look like one.
fn clear_store(path: &Path) -> Result<()> {
    use StoreError::{NotAStore, Io};
    if !path.exists() {
        return Ok(())
    }
    let is_empty_dir = path.is_dir() && fs::read_dir(path).map_err(Io)?.next().is_none();
    if !(is_empty_dir || path.join(METADATA_FILE).is_file()) {
        return Err(NotAStore(path.to_path_buf())).loc("While overwriting existing store")
    }
    debug!("Overwriting existing store {}", path.display());
    fs::remove_dir_all(path).map_err(Io).loc("While overwriting existing store")
}

/// Streaming store writer: variants are buffered, and flushed to disk one chunk at a time.
pub struct StoreWriter {
    path        : PathBuf,
    sample_id   : Vec<String>,
    ploidy      : usize,
    chunk_length: usize,
    contigs     : Vec<String>,
    contig_map  : HashMap<String, ContigIdx>,
    buffer      : VariantChunk,
    n_variants  : usize,
    n_chunks    : usize,
    max_alleles : usize,
}

impl StoreWriter {
    /// Create a new, empty store at `path`. Any pre-existing store at this location is overwritten.
    ///
    /// # Errors
    /// - if `chunk_length` or `ploidy` is zero.
    /// - if `path` exists and is not a store.
    /// - if the store directory cannot be created.
    pub fn create(path: &Path, sample_id: Vec<String>, ploidy: usize, chunk_length: usize) -> Result<Self> {
        use StoreError::{InvalidDimension, Io};
        let loc_msg = || format!("While creating store {}", path.display());
        if chunk_length == 0 {
            return Err(InvalidDimension("chunk_length")).with_loc(loc_msg)
        }
        if ploidy == 0 {
            return Err(InvalidDimension("ploidy")).with_loc(loc_msg)
        }
        clear_store(path).with_loc(loc_msg)?;
        fs::create_dir_all(path.join(CHUNK_DIR)).map_err(Io).with_loc(loc_msg)?;

        Ok(Self {
            path: path.to_path_buf(),
            sample_id,
            ploidy,
            chunk_length,
            contigs     : Vec::new(),
            contig_map  : HashMap::new(),
            buffer      : VariantChunk::default(),
            n_variants  : 0,
            n_chunks    : 0,
            max_alleles : 0,
        })
    }

    /// Pre-fill the contig table, preserving the indices of an existing dataset.
    ///
    /// # Errors
    /// - if the contig table outgrows the range of `ContigIdx`.
    pub fn with_contigs(mut self, contigs: &[String]) -> Result<Self> {
        for name in contigs {
            let idx = ContigIdx::try_from(self.contigs.len()).loc("While registering existing contigs")?;
            self.contig_map.entry(name.clone()).or_insert(idx);
            self.contigs.push(name.clone());
        }
        Ok(self)
    }

    /// Return the index of a contig, registering it if it was never seen before.
    pub fn contig_idx(&mut self, name: &str) -> Result<ContigIdx> {
        if let Some(idx) = self.contig_map.get(name) {
            return Ok(*idx)
        }
        let idx = ContigIdx::try_from(self.contigs.len()).loc("While registering a new contig")?;
        trace!("Registering contig '{name}' as {idx}");
        self.contig_map.insert(name.to_string(), idx);
        self.contigs.push(name.to_string());
        Ok(idx)
    }

    #[must_use]
    pub fn n_variants(&self) -> usize {
        self.n_variants
    }

    /// Append a variant to the store.
    ///
    /// # Errors
    /// - if the record refers to an unregistered contig, or carries an unexpected number of calls.
    /// - if flushing a full chunk to disk fails.
    pub fn push(&mut self, record: VariantRecord) -> Result<()> {
        use StoreError::{UnknownContig, ShapeMismatch};
        if record.contig.idx() >= self.contigs.len() {
            return Err(UnknownContig(record.contig.idx())).loc("While appending variant to store")
        }
        let want = self.sample_id.len() * self.ploidy;
        if record.genotypes.len() != want {
            return Err(ShapeMismatch{want, got: record.genotypes.len()}).loc("While appending variant to store")
        }
        self.max_alleles = self.max_alleles.max(record.alleles.len());
        self.buffer.push(record);
        self.n_variants += 1;
        if self.buffer.len() == self.chunk_length {
            self.flush_chunk()?;
        }
        Ok(())
    }

    fn flush_chunk(&mut self) -> Result<()> {
        use StoreError::{Io, Encode, Compress};
        if self.buffer.is_empty() {
            return Ok(())
        }
        let path = chunk_path(&self.path, self.n_chunks);
        let loc_msg = || format!("While writing chunk {}", path.display());
        let file = File::create(&path).map_err(Io).with_loc(loc_msg)?;
        let mut writer: ParCompress<Bgzf> = ParCompressBuilder::new().from_writer(BufWriter::new(file));
        serde_yaml::to_writer(&mut writer, &self.buffer).map_err(Encode).with_loc(loc_msg)?;
        writer.finish().map_err(|e| Compress(e.to_string())).with_loc(loc_msg)?;

        trace!("Flushed {} variants to {}", self.buffer.len(), path.display());
        self.buffer = VariantChunk::default();
        self.n_chunks += 1;
        Ok(())
    }

    /// Flush any remaining variants, write the store metadata, and return it.
    pub fn finish(mut self) -> Result<StoreMetadata> {
        use StoreError::{Io, Encode};
        self.flush_chunk()?;
        let metadata = StoreMetadata {
            format_version: FORMAT_VERSION,
            n_variants    : self.n_variants,
            n_samples     : self.sample_id.len(),
            ploidy        : self.ploidy,
            chunk_length  : self.chunk_length,
            n_chunks      : self.n_chunks,
            max_alleles   : self.max_alleles,
            contigs       : self.contigs,
            sample_id     : self.sample_id,
        };
        let path = self.path.join(METADATA_FILE);
        let loc_msg = || format!("While writing {}", path.display());
        let file = File::create(&path).map_err(Io).with_loc(loc_msg)?;
        let mut writer = BufWriter::new(file);
        serde_yaml::to_writer(&mut writer, &metadata).map_err(Encode).with_loc(loc_msg)?;
        writer.flush().map_err(Io).with_loc(loc_msg)?;
        info!("Wrote {} variants across {} chunk(s) to {}", metadata.n_variants, metadata.n_chunks, self.path.display());
        Ok(metadata)
    }
}

/// Persist a dataset as a store at `path`, overwriting any existing store.
/// Chunks follow the dataset's own `chunk_length`.
pub fn write_dataset(data: &VariantDataset, path: &Path) -> Result<StoreMetadata> {
    let loc_msg = || format!("While saving dataset to {}", path.display());
    let mut writer = StoreWriter::create(path, data.sample_id().to_vec(), data.ploidy(), data.chunk_length())
        .with_loc(loc_msg)?
        .with_contigs(data.contigs())
        .with_loc(loc_msg)?;

    for (k, range) in data.chunks().enumerate() {
        trace!("Saving chunk {k} (variants {range:?})");
        for i in range {
            let record = VariantRecord {
                contig   : data.variant_contig()[i],
                position : data.variant_position()[i],
                id       : data.variant_id()[i].clone(),
                alleles  : data.variant_allele()[i].clone(),
                genotypes: data.genotypes(i).to_vec(),
            };
            writer.push(record).with_loc(loc_msg)?;
        }
    }
    writer.finish().with_loc(loc_msg)
}

/// Stream a `.vcf(.gz)` file into a new store at `store`, `chunk_length` variants at a time.
/// Contigs are indexed in their order of first appearance within the VCF.
/// - `threads`: number of additional BGZF decompression threads.
pub fn vcf_to_store(vcf: &Path, store: &Path, chunk_length: usize, threads: usize) -> Result<StoreMetadata> {
    let loc_msg = || format!("While converting {} into {}", vcf.display(), store.display());
    let mut reader = VCFReader::new(vcf, threads).with_loc(loc_msg)?;
    let mut writer = StoreWriter::create(store, reader.samples().to_vec(), reader.ploidy(), chunk_length).with_loc(loc_msg)?;
    while let Some(line) = reader.next_line().with_loc(loc_msg)? {
        let contig = writer.contig_idx(&line.chrom).with_loc(loc_msg)?;
        writer.push(VariantRecord {
            contig,
            position : line.position,
            id       : line.id,
            alleles  : line.alleles,
            genotypes: line.genotypes,
        }).with_loc(loc_msg)?;
    }
    writer.finish().with_loc(loc_msg)
}

/// Read the metadata of the store located at `path`.
pub fn read_metadata(path: &Path) -> Result<StoreMetadata> {
    use StoreError::{NotAStore, Decode, UnsupportedVersion};
    let file = File::open(path.join(METADATA_FILE))
        .map_err(|_| NotAStore(path.to_path_buf()))
        .loc("While reading store metadata")?;
    let metadata: StoreMetadata = serde_yaml::from_reader(BufReader::new(file))
        .map_err(Decode)
        .with_loc(|| format!("While parsing metadata of {}", path.display()))?;
    if metadata.format_version != FORMAT_VERSION {
        return Err(UnsupportedVersion(metadata.format_version)).loc("While reading store metadata")
    }
    Ok(metadata)
}

/// Load the store located at `path` as an in-memory dataset. The dataset's chunk length is
/// set to the one of the store.
/// - `threads`: number of additional BGZF decompression threads.
pub fn read_dataset(path: &Path, threads: usize) -> Result<VariantDataset> {
    use StoreError::{Io, Decode, ShapeMismatch};
    let loc_msg = || format!("While loading dataset from {}", path.display());
    let metadata = read_metadata(path).with_loc(loc_msg)?;
    let row_len  = metadata.n_samples * metadata.ploidy;

    let mut data = VariantDataset::new(metadata.contigs, metadata.sample_id, metadata.ploidy).with_loc(loc_msg)?;
    for k in 0..metadata.n_chunks {
        let chunk_file = chunk_path(path, k);
        let file = File::open(&chunk_file).map_err(Io).with_loc(|| format!("While opening chunk {}", chunk_file.display()))?;
        let reader = BufReader::new(ParDecompressBuilder::<Bgzf>::new().maybe_num_threads(threads).maybe_par_from_reader(file));
        let chunk: VariantChunk = serde_yaml::from_reader(reader)
            .map_err(Decode)
            .with_loc(|| format!("While decoding chunk {}", chunk_file.display()))?;
        for record in chunk.into_records(row_len).with_loc(loc_msg)? {
            data.push(record).with_loc(loc_msg)?;
        }
    }

    if data.n_variants() != metadata.n_variants {
        return Err(ShapeMismatch{want: metadata.n_variants, got: data.n_variants()}).with_loc(loc_msg)
    }
    data.rechunk(metadata.chunk_length).with_loc(loc_msg)?;
    debug!("Loaded {} variants x {} samples from {}", data.n_variants(), data.n_samples(), path.display());
    Ok(data)
}
