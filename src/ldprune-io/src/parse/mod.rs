//! Naming of intermediate stores and pruned outputs.

use std::{fs, path::{Path, PathBuf}};

use lazy_static::lazy_static;
use located_error::prelude::*;
use log::trace;
use regex::Regex;

mod error;
pub use error::ParseError;

/// Extension of array stores.
pub const STORE_EXT: &str = ".zarr";

/// Extension of BED outputs.
pub const BED_EXT: &str = ".bed";

lazy_static! {
    static ref STORE_EXT_RE: Regex = Regex::new(r"\.zarr$").expect("Failed to parse regex.");
}

/// Attempt to create the parent directories of a path (if needed) and return an error if it failed.
pub fn create_parent_directory(path: &Path) -> Result<()> {
    use ParseError::CreateParentDirectory;
    let parent_dir = path.parent().unwrap_or(path);
    let loc_msg = || format!("While attempting to create output directory '{}'", path.display());
    fs::create_dir_all(parent_dir).map_err(CreateParentDirectory).with_loc(loc_msg)?;
    Ok(())
}

/// Attempt to convert a path to string, and return an error if it failed.
fn maybe_to_str(path: &Path) -> Result<&str> {
    use ParseError::InvalidFilename;
    path.to_str().ok_or(InvalidFilename).loc("While converting path to string")
}

/// Replace the trailing `.zarr` of `path` with `replacement`.
fn replace_store_ext(path: &Path, replacement: &str) -> Result<PathBuf> {
    use ParseError::MissingStoreExt;
    let str_path = maybe_to_str(path)?;
    if !STORE_EXT_RE.is_match(str_path) {
        return Err(MissingStoreExt{path: path.to_path_buf()}).loc("While formatting output path")
    }
    let new_path = PathBuf::from(STORE_EXT_RE.replace(str_path, regex::NoExpand(replacement)).as_ref());
    trace!("{} -> {}", path.display(), new_path.display());
    Ok(new_path)
}

/// Path of the intermediate store of `vcf`: `<tmpdir>/<vcf file name>.zarr` when a temporary
/// directory is provided, `<vcf>.zarr` otherwise.
pub fn store_path(vcf: &Path, tmpdir: Option<&Path>) -> Result<PathBuf> {
    use ParseError::InvalidFilename;
    let loc_msg = || format!("While formatting the store path of {}", vcf.display());
    let store = match tmpdir {
        Some(dir) => {
            let file_name = vcf.file_name().ok_or(InvalidFilename).with_loc(loc_msg)?;
            dir.join(file_name)
        },
        None => vcf.to_path_buf(),
    };
    let store = maybe_to_str(&store).with_loc(loc_msg)?;
    Ok(PathBuf::from(format!("{store}{STORE_EXT}")))
}

/// Path of a pruned store: the trailing `.zarr` of `store` is replaced with `<suffix>.zarr`.
pub fn output_store_path(store: &Path, suffix: &str) -> Result<PathBuf> {
    replace_store_ext(store, &format!("{suffix}{STORE_EXT}"))
        .with_loc(|| format!("While formatting the output store path of {}", store.display()))
}

/// Path of the BED output of a pruned store: the trailing `.zarr` of `output_store` is replaced with `.bed`.
pub fn bed_path(output_store: &Path) -> Result<PathBuf> {
    replace_store_ext(output_store, BED_EXT)
        .with_loc(|| format!("While formatting the BED path of {}", output_store.display()))
}
