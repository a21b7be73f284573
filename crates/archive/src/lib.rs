//! Bundles every accepted track into a single ZIP file in the output directory.
//!
//! Entries are stored flat under their canonical filenames, in the order the
//! tracks appear in the [`DownloadResult`]. Cover art and the archive itself
//! are never included. The archive is written to a temporary file first and
//! then moved over any previous [`ARCHIVE_NAME`].

pub mod error;

use crate::error::{ErrorKind, Result};
use cloudtape_acquire::DownloadResult;
use exn::ResultExt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::instrument;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// File name of the archive inside the output directory.
pub const ARCHIVE_NAME: &str = "all_tracks.zip";

/// A written archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Archive {
    pub path: PathBuf,
    /// Entry names, in archive order.
    pub entries: Vec<String>,
    /// Tracks that had vanished from disk and were left out.
    pub missing: Vec<String>,
}

/// Writes `ARCHIVE_NAME` into `output_dir` containing every track in `result`.
#[instrument(skip_all, fields(output = %output_dir.display(), tracks = result.track_count()))]
pub fn build(output_dir: &Path, result: &DownloadResult) -> Result<Archive> {
    let path = output_dir.join(ARCHIVE_NAME);
    let tmp = NamedTempFile::new_in(output_dir).or_raise(|| ErrorKind::Write(path.clone()))?;
    let mut zip = ZipWriter::new(tmp);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries = Vec::new();
    let mut missing = Vec::new();
    for (_, track) in result.tracks() {
        let name = track.filename();
        let mut source = match File::open(output_dir.join(name)) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(file = name, error = %e, "Track missing from output directory; leaving it out");
                missing.push(name.to_string());
                continue;
            },
        };
        zip.start_file(name, options).or_raise(|| ErrorKind::Entry(name.to_string()))?;
        io::copy(&mut source, &mut zip).or_raise(|| ErrorKind::Entry(name.to_string()))?;
        entries.push(name.to_string());
    }

    let tmp = zip.finish().or_raise(|| ErrorKind::Write(path.clone()))?;
    tmp.persist(&path).or_raise(|| ErrorKind::Write(path.clone()))?;
    tracing::info!(archive = %path.display(), entries = entries.len(), "ZIP file created");
    Ok(Archive { path, entries, missing })
}
