use std::{
    ffi::OsStr,
    fmt::{self, Display, Formatter},
    path::{Path, PathBuf},
};

use located_error::prelude::*;

use clap::{Args, Parser};
use serde::{Serialize, Deserialize};
use log::debug;

mod error;
pub use error::ParserError;

#[derive(Parser, Debug, Serialize, Deserialize)]
#[clap(name="ld-prune", author, version, about, long_about = None)]
/// ld-prune: Prune variants in linkage disequilibrium from VCF files.
pub struct Cli {
    ///Set the verbosity level (-v -vv -vvv)
    ///
    /// Set the verbosity level of this program. Multiple levels allowed {n}
    ///
    /// -v: Info  |  -vv: Debug  | -vvv: Trace {n}
    ///
    /// Note that the program will still output warnings by default, even when this flag is off.
    /// Use The --quiet/-q to disable them
    #[clap(short='v', long, parse(from_occurrences), global=true)]
    pub verbose: u8,

    /// Disable warnings.
    ///
    /// By default, warnings are emmited and redirected to the console, even when verbose mode is off.
    /// Use this argument to disable this. Only errors will be displayed.
    #[clap(short='q', long, global=true)]
    pub quiet: bool,

    /// Input VCF file(s).
    ///
    /// Accepted formats: '.vcf' and BGZF compressed '.vcf.gz'. Each file is pruned independently.
    #[clap(parse(try_from_os_str=valid_input_file))]
    pub vcf: Vec<PathBuf>,

    #[clap(flatten)]
    pub args: LdPrune,
}

impl Cli {
    /// Serialize command line arguments to YAML, and print them at debug level.
    ///
    /// # Errors
    /// if `serde_yaml` fails to serialize `Self` to a string.
    pub fn serialize(&self) -> Result<()> {
        let serialized = serde_yaml::to_string(&self)
            .map_err(ParserError::Serialize)
            .loc("While serializing command line arguments")?;
        debug!("\n---- Command line args ----\n{}\n---", serialized);
        Ok(())
    }

    /// Log verbosity, as expected by `logger::Logger::init()`.
    #[must_use]
    pub fn verbosity(&self) -> u8 {
        if self.quiet { 0 } else { self.verbose.saturating_add(1) }
    }
}

/// Windowed, iterative LD pruning parameters.
#[derive(Args, Debug, Clone, Serialize, Deserialize)]
pub struct LdPrune {
    /// Window size, expressed in number of variants.
    #[clap(long, default_value("500"), parse(try_from_str=parse_nonzero))]
    pub window_size: usize,

    /// Window step, expressed in number of variants.
    ///
    /// A step lower than the window size yields overlapping windows.
    #[clap(long, default_value("250"), parse(try_from_str=parse_nonzero))]
    pub window_step: usize,

    /// r² value from which two variants of the same window are considered linked.
    ///
    /// Pairs of variants whose squared dosage correlation is greater than or equal to this threshold
    /// are considered linked, and one of them is pruned. Must lie between 0.0 and 1.0
    #[clap(long, default_value("0.1"), parse(try_from_str=parse_unit_interval))]
    pub threshold: f64,

    /// Maximum number of pruning iterations.
    ///
    /// Pruning stops earlier as soon as an iteration removes no variant.
    #[clap(long, default_value("5"), parse(try_from_str=parse_nonzero))]
    pub n_iter: usize,

    /// Randomly subsample variants down to this number of sites, prior to pruning.
    #[clap(short='s', long, parse(try_from_str=parse_nonzero))]
    pub subsample: Option<usize>,

    /// Randomly subsample variants down to this fraction of sites, prior to pruning.
    ///
    /// Must lie between 0.0 and 1.0. Takes precedence over --subsample when both are provided.
    #[clap(short='f', long, parse(try_from_str=parse_unit_interval))]
    pub subsample_fraction: Option<f64>,

    /// Samples to exclude.
    ///
    /// Currently accepted, but not applied.
    #[clap(short='e', long, multiple_occurrences(true))]
    pub exclude: Vec<String>,

    /// Additionally write pruned variants as a BED file.
    ///
    /// One interval per variant: 'CHROM  POS-1  POS', without header.
    #[clap(long)]
    pub as_bed: bool,

    /// Output file.
    ///
    /// Currently accepted, but not used: output names are derived from the input VCF and --output-suffix.
    #[clap(short='o', long)]
    pub output_file: Option<PathBuf>,

    /// Suffix inserted before the '.zarr' extension of pruned output stores.
    #[clap(long, default_value(".ld_prune"))]
    pub output_suffix: String,

    /// Directory where intermediate array stores are written.
    ///
    /// When provided, pruned outputs are written alongside intermediate stores, and the directory
    /// is kept after the run. Otherwise, a temporary directory is used and removed at the end of the
    /// run, while pruned outputs are written next to each input VCF.
    #[clap(long, parse(try_from_os_str=valid_output_dir))]
    pub tmpdir: Option<PathBuf>,

    /// Number of variants per chunk of the converted array stores.
    #[clap(long, default_value("10000"), parse(try_from_str=parse_nonzero))]
    pub chunk_length: usize,

    /// Number of additional parallel decompression threads.
    ///
    /// Can increase performance when working with BGZF compressed .vcf.gz files. Note that this parameter has no effect when working with
    /// uncompressed .vcf files.
    #[clap(short='#', long, default_value("0"))]
    pub decompression_threads: usize,

    /// Provide the subsampling RNG with a set seed.
    #[clap(long, required(false), default_value_t=fastrand::u64(u64::MIN..=u64::MAX))]
    pub seed: u64,
}

#[derive(Debug, Clone, Copy)]
pub enum FileEntity {File, Directory}

impl Display for FileEntity {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::File      => write!(f, "File"),
            Self::Directory => write!(f, "Directory"),
        }
    }
}

impl FileEntity {
    fn validate(&self, path: &Path) -> Result<(), ParserError> {
        use ParserError::InvalidFileEntity;
        let valid = match self {
            Self::File      => path.is_file(),
            Self::Directory => path.is_dir()
        };

        if valid {
            Ok(())
        } else {
            Err(InvalidFileEntity(*self, path.display().to_string()))
        }
    }
}

fn assert_filesystem_entity_is_valid(s: &OsStr, entity: &FileEntity) -> Result<()> {
    use ParserError::MissingFileEntity;
    let path = Path::new(s);
    if ! path.exists() {
        return Err(MissingFileEntity(*entity, path.display().to_string()))
            .loc("While parsing arguments.")
    }

    entity.validate(path).loc("While parsing arguments.")
}

fn valid_input_file(s: &OsStr) -> Result<PathBuf> {
    assert_filesystem_entity_is_valid(s, &FileEntity::File)
        .loc("While checking for file validity")?;
    Ok(PathBuf::from(s))
}

fn valid_output_dir(s: &OsStr) -> Result<PathBuf> {
    if ! Path::new(s).exists() {
        std::fs::create_dir_all(s)?;
    }
    assert_filesystem_entity_is_valid(s, &FileEntity::Directory)
        .loc("While checking for directory validity")?;
    Ok(PathBuf::from(s))
}

fn parse_nonzero(s: &str) -> Result<usize> {
    match s.parse::<usize>().with_loc(|| format!("While parsing {s}"))? {
        0 => Err(ParserError::ZeroValue).with_loc(|| format!("While parsing {s}")),
        n => Ok(n),
    }
}

fn parse_unit_interval(s: &str) -> Result<f64> {
    use ParserError::ParseRatio;

    const MIN_RATIO: f64 = 0.0;
    const MAX_RATIO: f64 = 1.0;

    let ratio = s.parse::<f64>().with_loc(|| format!("While parsing {s}"))?;
    match (MIN_RATIO..=MAX_RATIO).contains(&ratio) {
        true  => Ok(ratio),
        false => Err(ParseRatio(MIN_RATIO, MAX_RATIO)).with_loc(|| format!("While parsing {s}"))
    }
}
