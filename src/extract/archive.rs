//! Zip member listing

use std::fs::File;
use std::path::Path;

use zip::ZipArchive;

use super::ExtractError;

/// List member names from the zip central directory, in archive order.
///
/// Member contents are never decompressed.
pub fn list_zip_members(path: &Path) -> Result<Vec<String>, ExtractError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;

    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i)?;
        names.push(entry.name().to_string());
    }
    Ok(names)
}
