mod vcf;
pub use vcf::{VCFReader, VCFReaderError, VcfLine, VCF_EXT, DEFAULT_PLOIDY};
