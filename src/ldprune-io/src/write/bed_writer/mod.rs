use std::{fmt::{self, Display}, fs::File, io::{BufWriter, Write}, path::Path};

use located_error::prelude::*;
use log::info;
use variants::{coordinate::Position, VariantDataset};

mod error;
pub use error::WriterError;

/// Field separator of BED records.
pub const WRITER_SEPARATOR: &str = "\t";

/// A single BED interval, spanning one variant: `[position - 1, position)`, 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedRecord<'a> {
    pub contig: &'a str,
    pub start : u32,
    pub end   : u32,
}

impl<'a> BedRecord<'a> {
    #[must_use]
    pub fn new(contig: &'a str, position: Position) -> Self {
        let (start, end) = position.bed_interval();
        Self { contig, start, end }
    }
}

impl Display for BedRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{WRITER_SEPARATOR}{}{WRITER_SEPARATOR}{}", self.contig, self.start, self.end)
    }
}

/// Headerless BED file writer.
/// - source: Boxed `BufWriter` (can either handle file-writing, or stdout).
pub struct BedWriter<'a> {
    source: BufWriter<Box<dyn Write + 'a>>
}

impl<'a> BedWriter<'a> {
    /// Instantiate a new `BedWriter`, linked to a file, or stdout if `path` is `None`.
    ///
    /// # Errors
    /// if `path` is either an invalid file, or the user does not have the proper
    /// UNIX permissions to write at this location.
    pub fn new(path: Option<impl AsRef<Path>>) -> Result<BedWriter<'a>> {
        use WriterError::Create;
        Ok(BedWriter{ source: match path {
            Some(path) => {
                let file = File::create(path).map_err(Create).loc("While creating BED file")?;
                BufWriter::new(Box::new(file))
            },
            None => BufWriter::new(Box::new(std::io::stdout()))
        }})
    }

    /// Write the contents of an iterator, one item per line.
    ///
    /// # Errors
    /// - If any of the Items within `iter` fails to get written.
    pub fn write_iter<T, I>(&mut self, iter: T) -> Result<()>
    where   T: IntoIterator<Item = I>,
            I: Display,
    {
        use WriterError::IOError;
        for obj in iter {
            writeln!(self.source, "{obj}").map_err(IOError).loc("While writing contents into file")?;
        }
        self.source.flush().map_err(IOError).loc("While flushing buffer contents of Writer")
    }
}

/// Write every variant of `data` as a BED interval into `path`. Returns the number of written records.
pub fn to_bed(data: &VariantDataset, path: &Path) -> Result<usize> {
    use WriterError::UnknownContig;
    let loc_msg = || format!("While writing BED file {}", path.display());
    let records = data.coordinates()
        .enumerate()
        .map(|(i, coordinate)| {
            data.contig_name(coordinate.contig)
                .map(|name| BedRecord::new(name, coordinate.position))
                .ok_or(UnknownContig(i))
        })
        .collect::<Result<Vec<_>, _>>()
        .with_loc(loc_msg)?;

    let mut writer = BedWriter::new(Some(path)).with_loc(loc_msg)?;
    writer.write_iter(&records).with_loc(loc_msg)?;
    info!("Wrote {} BED records to {}", records.len(), path.display());
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use variants::{coordinate::ContigIdx, VariantRecord};

    #[test]
    fn bed_record_display() {
        assert_eq!(BedRecord::new("chr1", Position(1)).to_string(), "chr1\t0\t1");
        assert_eq!(BedRecord::new("12", Position(60_020)).to_string(), "12\t60019\t60020");
    }

    #[test]
    fn write_bed() -> Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let path   = tmpdir.path().join("test.ld_prune.bed");

        let mut data = VariantDataset::new(vec!["chr1".into(), "chrX".into()], vec!["S1".into()], 2)?;
        for (contig, pos) in [(0, 100), (0, 250), (1, 7)] {
            data.push(VariantRecord{
                contig   : ContigIdx(contig),
                position : Position(pos),
                id       : ".".into(),
                alleles  : vec!["A".into(), "T".into()],
                genotypes: vec![0, 1],
            })?;
        }
        assert_eq!(to_bed(&data, &path)?, 3);

        let got = std::fs::read_to_string(&path)?;
        assert_eq!(got, "chr1\t99\t100\nchr1\t249\t250\nchrX\t6\t7\n");
        for line in got.lines() {
            assert_eq!(line.split('\t').count(), 3);
        }
        Ok(())
    }

    #[test]
    fn write_empty_bed() -> Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let path   = tmpdir.path().join("empty.bed");
        let data   = VariantDataset::new(vec![], vec!["S1".into()], 2)?;
        assert_eq!(to_bed(&data, &path)?, 0);
        assert!(std::fs::read_to_string(&path)?.is_empty());
        Ok(())
    }
}
