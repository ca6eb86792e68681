use std::{ffi::OsStr, io::{BufRead, BufReader, Read}, path::Path, fs::File};

use variants::{coordinate::Position, MISSING_CALL, FILL_CALL};
use located_error::prelude::*;

use gzp::{deflate::Bgzf, par::decompress::ParDecompressBuilder};
use log::{debug, trace};

mod error;
pub use error::VCFReaderError;

const FORMAT_FIELD_INDEX : usize = 8;  // 0-based expected column index of the FORMAT field.
const GENOTYPES_START_IDX: usize = 9;  // 0-based expected column index where genotype entries are expected to begin.

/// Accepted VCF file extensions.
pub const VCF_EXT: [&str; 2] = ["vcf", "vcf.gz"];

/// Number of allele calls per genotype. Calls of a lower ploidy are padded with `FILL_CALL`.
pub const DEFAULT_PLOIDY: usize = 2;

/// A single, parsed VCF data line.
/// - `alleles`  : REF allele, followed by every ALT allele.
/// - `genotypes`: flat `[samples x ploidy]` array of allele indices, parsed from the `GT` subfield.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcfLine {
    pub chrom    : String,
    pub position : Position,
    pub id       : String,
    pub alleles  : Vec<String>,
    pub genotypes: Vec<i16>,
}

impl VcfLine {
    /// Parse a tab-separated VCF data line.
    ///
    /// # Errors
    /// - if the line carries less than the 8 mandatory fields, or less genotype columns than `n_samples`.
    /// - if `POS` is not a valid position.
    /// - if any `GT` call carries more than `ploidy` alleles, or an invalid allele index.
    pub fn parse(line: &str, n_samples: usize, ploidy: usize) -> Result<Self> {
        use VCFReaderError::{MissingFields, ParsePosError};
        let fields: Vec<&str> = line.trim_end_matches(|c: char| c == '\n' || c == '\r').split('\t').collect();
        let want = if n_samples == 0 { FORMAT_FIELD_INDEX } else { GENOTYPES_START_IDX + n_samples };
        if fields.len() < want {
            return Err(MissingFields{want, got: fields.len()}).loc("While parsing VCF line")
        }

        let position: Position = fields[1].parse().map_err(ParsePosError).with_loc(|| format!("While parsing POS field of {}", fields[0]))?;
        let mut alleles = vec![fields[3].to_string()];
        if fields[4] != "." {
            alleles.extend(fields[4].split(',').map(str::to_string));
        }

        let mut genotypes = Vec::with_capacity(n_samples * ploidy);
        if n_samples > 0 {
            let gt_idx = fields[FORMAT_FIELD_INDEX].split(':').position(|key| key == "GT");
            for sample in &fields[GENOTYPES_START_IDX..GENOTYPES_START_IDX + n_samples] {
                let gt = gt_idx.and_then(|idx| sample.split(':').nth(idx)).unwrap_or(".");
                genotypes.extend(parse_gt(gt, ploidy).with_loc(|| format!("While parsing genotype of {}:{position}", fields[0]))?);
            }
        }

        Ok(Self{chrom: fields[0].to_string(), position, id: fields[2].to_string(), alleles, genotypes})
    }
}

/// Parse a `GT` subfield (e.g. `0|1`, `1/1`, `./.`, `1`) into exactly `ploidy` calls.
fn parse_gt(gt: &str, ploidy: usize) -> Result<Vec<i16>> {
    use VCFReaderError::{PloidyOverflow, InvalidAllele};
    let mut calls = gt.split(|c: char| c == '/' || c == '|')
        .map(|allele| match allele {
            "." => Ok(MISSING_CALL),
            _   => allele.parse::<i16>().ok().filter(|idx| *idx >= 0).ok_or_else(|| InvalidAllele(allele.to_string())),
        })
        .collect::<Result<Vec<i16>, _>>()
        .loc("While parsing GT subfield")?;

    if calls.len() > ploidy {
        return Err(PloidyOverflow{gt: gt.to_string(), ploidy}).loc("While parsing GT subfield")
    }
    calls.resize(ploidy, FILL_CALL);
    Ok(calls)
}

/// Line-by-line reader of a `.vcf`, or BGZF-compressed `.vcf.gz` file.
///
/// # Fields:
/// - `source` : Boxed BufReader for the given `.vcf(.gz)` file.
/// - `samples`: Sample ids, extracted from the `#CHROM` header line (fields 9 to n).
/// - `ploidy` : Expected maximum number of calls per genotype.
/// - `buf`    : Raw line buffer.
/// - `line`   : 1-based number of the last line read.
pub struct VCFReader<'a> {
    source : Box<dyn BufRead + 'a>,
    samples: Vec<String>,
    ploidy : usize,
    buf    : String,
    line   : usize,
}

impl<'a> VCFReader<'a> {
    /// Open and initialize a new VCFReader, consuming every header line.
    /// # Arguments:
    /// - `path`   : path leading to the `.vcf(.gz)` file.
    /// - `threads`: number of decompression threads (only relevant for BGZF compressed `.vcf.gz` files)
    pub fn new(path: &Path, threads: usize) -> Result<VCFReader<'a>> {
        let loc_msg = || format!("While attempting to create a new VCFReader for {}", path.display());
        let source = Self::get_reader(path, threads).with_loc(loc_msg)?;
        let mut reader = VCFReader{source, samples: Vec::new(), ploidy: DEFAULT_PLOIDY, buf: String::new(), line: 0};
        reader.parse_samples_id().with_loc(loc_msg)?;
        debug!("Found {} samples within {}", reader.samples.len(), path.display());
        Ok(reader)
    }

    #[must_use]
    pub fn ploidy(&self) -> usize {
        self.ploidy
    }

    /// Sample ids of this VCF.
    #[must_use]
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    /// Read and parse the next data line. Returns `None` once EOF is reached.
    pub fn next_line(&mut self) -> Result<Option<VcfLine>> {
        use VCFReaderError::FillBuffer;
        loop {
            self.buf.clear();
            let read = self.source.read_line(&mut self.buf).map_err(FillBuffer).loc("While reading VCF")?;
            if read == 0 {
                return Ok(None)
            }
            self.line += 1;
            if self.buf.trim().is_empty() {
                continue
            }
            trace!("line {}: {}", self.line, self.buf.trim_end());
            let line = VcfLine::parse(&self.buf, self.samples.len(), self.ploidy)
                .with_loc(|| format!("While parsing line {} of VCF", self.line))?;
            return Ok(Some(line))
        }
    }

    /// Check the file extension of the provided file, and return an appropriate BufReader
    /// - `.vcf`    -> Return a default BufReader
    /// - `.vcf.gz` -> Return a parallel BGZF decompressor/reader
    fn get_reader(path: &Path, threads: usize) -> Result<Box<dyn BufRead + 'a>> {
        use VCFReaderError::{InvalidFileExt, Open};
        let file_name = path.file_name().and_then(OsStr::to_str).loc(InvalidFileExt)?;
        let path_ext  = VCF_EXT.iter()
            .find(|ext| file_name.strip_suffix(*ext).is_some_and(|stem| stem.ends_with('.')))
            .loc(InvalidFileExt)?;

        let vcf = File::open(path).map_err(Open).loc("While opening VCF file")?;
        let source: Box<dyn Read> = match *path_ext {
            "vcf"    => Box::new(vcf),
            "vcf.gz" => ParDecompressBuilder::<Bgzf>::new().maybe_num_threads(threads).maybe_par_from_reader(vcf),
            _        => return loc!(InvalidFileExt)
        };
        Ok(Box::new(BufReader::new(source)))
    }

    /// Skip all meta-information lines until the header line has been found (i.e. the line starts with '#CHROM').
    /// Then, fill `self.samples` with the sample columns of this line.
    fn parse_samples_id(&mut self) -> Result<()> {
        use VCFReaderError::{FillBuffer, MissingHeader};
        loop {
            self.buf.clear();
            if self.source.read_line(&mut self.buf).map_err(FillBuffer).loc("While parsing VCF header")? == 0 {
                return Err(MissingHeader).loc("While parsing VCF header")
            }
            self.line += 1;
            if self.buf.starts_with("#CHROM") {
                self.samples = self.buf.trim_end()
                    .split('\t')
                    .skip(GENOTYPES_START_IDX)
                    .map(str::to_string)
                    .collect();
                return Ok(())
            }
        }
    }
}
