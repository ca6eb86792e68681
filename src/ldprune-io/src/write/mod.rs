mod bed_writer;
pub use bed_writer::{BedRecord, BedWriter, WriterError, to_bed, WRITER_SEPARATOR};
