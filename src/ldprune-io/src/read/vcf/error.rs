use thiserror::Error;

#[derive(Error, Debug)]
pub enum VCFReaderError {
    #[error("Invalid or missing file extension. Accepted format are ['.vcf', '.vcf.gz']")]
    InvalidFileExt,

    #[error("Failed to open VCF file")]
    Open(#[source] std::io::Error),

    #[error("Failed to read the contents of the VCF")]
    FillBuffer(#[source] std::io::Error),

    #[error("Reached EOF without encountering a '#CHROM' header line")]
    MissingHeader,

    #[error("VCF line carries {got} tab-separated fields, while at least {want} were expected")]
    MissingFields{want: usize, got: usize},

    #[error("Failed to convert field into a valid genomic position")]
    ParsePosError(#[source] variants::coordinate::ParsePositionError),

    #[error("Invalid allele index '{0}' within GT subfield")]
    InvalidAllele(String),

    #[error("Genotype '{gt}' carries more alleles than the expected ploidy ({ploidy})")]
    PloidyOverflow{gt: String, ploidy: usize},
}
