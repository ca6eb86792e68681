use std::{env, fs, io::Write, ops::Deref, path::{Path, PathBuf}};

use gzp::{deflate::Bgzf, par::compress::{ParCompress, ParCompressBuilder}, ZWriter};
use tempfile::TempDir;

pub const TEST_DATA_DIR: &str = "tests/test-data";

/// Path of a file within `tests/test-data`.
pub fn test_data(filename: &str) -> PathBuf {
    let root_dir = env::var("CARGO_MANIFEST_DIR").expect("$CARGO_MANIFEST_DIR");
    Path::new(&root_dir).join(TEST_DATA_DIR).join(filename)
}

/// A copy of a test-data file, living within its own temporary directory.
/// The directory, and every output written within it, is removed once the fixture is dropped.
pub struct Fixture {
    path: PathBuf,
    tempdir: TempDir,
}

impl Fixture {
    /// Copy `tests/test-data/<filename>` into a new temporary directory.
    pub fn copy(filename: &str) -> Self {
        let tempdir = tempfile::tempdir().expect("Failed to generate temp directory");
        let source  = test_data(filename);
        let path    = tempdir.path().join(source.file_name().expect("Invalid filename"));
        fs::copy(&source, &path).unwrap_or_else(|e| panic!("Failed to copy {}: {e}", source.display()));
        Self { path, tempdir }
    }

    /// BGZF-compress `tests/test-data/<filename>` into `<filename>.gz`, within a new temporary directory.
    pub fn bgzf(filename: &str) -> Self {
        let tempdir  = tempfile::tempdir().expect("Failed to generate temp directory");
        let source   = test_data(filename);
        let contents = fs::read(&source).unwrap_or_else(|e| panic!("Failed to read {}: {e}", source.display()));
        let path     = tempdir.path().join(format!("{}.gz", source.file_name().and_then(|f| f.to_str()).expect("Invalid filename")));

        let file = fs::File::create(&path).expect("Failed to create compressed fixture");
        let mut writer: ParCompress<Bgzf> = ParCompressBuilder::new().from_writer(file);
        writer.write_all(&contents).expect("Failed to compress fixture");
        writer.finish().expect("Failed to flush compressed fixture");
        Self { path, tempdir }
    }

    /// Temporary directory holding this fixture.
    pub fn dir(&self) -> &Path {
        self.tempdir.path()
    }
}

impl Deref for Fixture {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.path
    }
}
