//! Directory listings used to work out which files a download produced.
//!
//! The downloader's own reporting is unreliable for partial downloads and
//! already-exists skips, so the filesystem is treated as the source of truth:
//! take a [`Snapshot`] before and after each invocation and [`diff`](Snapshot::diff)
//! them. This only attributes files correctly while downloads are serialized
//! and the tool writes straight into the watched directory.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

/// Extension (without the dot) of files considered downloaded audio.
pub const AUDIO_EXTENSION: &str = "mp3";

/// Returns `true` if `name` has the audio extension, ignoring case.
pub fn is_audio(name: &str) -> bool {
    Path::new(name).extension().is_some_and(|ext| ext.eq_ignore_ascii_case(AUDIO_EXTENSION))
}

/// Regular files directly inside a directory, with their modification times.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: BTreeMap<String, SystemTime>,
}
impl Snapshot {
    /// Lists the files directly inside `dir`.
    ///
    /// Subdirectories are ignored, as are names that are not valid UTF-8
    /// (they cannot be carried through to the page or archive faithfully).
    pub fn capture(dir: &Path) -> Result<Self> {
        let mut entries = BTreeMap::new();
        let listing = fs::read_dir(dir).or_raise(|| ErrorKind::OutputDirectory(dir.to_path_buf()))?;
        for entry in listing {
            let entry = entry.or_raise(|| ErrorKind::OutputDirectory(dir.to_path_buf()))?;
            let Ok(metadata) = entry.metadata() else { continue };
            if !metadata.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => {
                    entries.insert(name, metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH));
                },
                Err(name) => tracing::trace!(name = ?name, "Skipping non UTF-8 filename"),
            }
        }
        Ok(Self { entries })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names present in `after` but not in `self`.
    ///
    /// Ordered by modification time, then name, which approximates the order
    /// the tool wrote them in.
    pub fn diff(&self, after: &Snapshot) -> Vec<String> {
        let mut added: Vec<(&SystemTime, &String)> =
            after.entries.iter().filter(|(name, _)| !self.entries.contains_key(*name)).map(|(n, t)| (t, n)).collect();
        added.sort();
        added.into_iter().map(|(_, name)| name.clone()).collect()
    }
}
impl FromIterator<(String, SystemTime)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (String, SystemTime)>>(iter: T) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}
