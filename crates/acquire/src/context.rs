use crate::error::{ErrorKind, Result};
use cloudtape_artwork::IMAGE_DIR;
use exn::ResultExt;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Canonical filenames accepted so far during a run.
///
/// Grows monotonically and is only ever consulted for duplicate rejection.
/// [`register`](Self::register) checks and inserts under one lock so the
/// at-most-once guarantee holds even if stages are ever run concurrently.
#[derive(Debug, Default)]
pub struct SeenNames {
    names: Mutex<HashSet<String>>,
}
impl SeenNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name`, returning `false` if it was already present.
    pub fn register(&self, name: &str) -> bool {
        let mut names = self.names.lock().unwrap_or_else(PoisonError::into_inner);
        names.insert(name.to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.lock().unwrap_or_else(PoisonError::into_inner).contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// State scoped to a single pipeline run, passed explicitly into each stage.
#[derive(Debug)]
pub struct Context {
    output_dir: PathBuf,
    image_dir: PathBuf,
    seen: SeenNames,
}
impl Context {
    /// Prepares `output_dir` (and its image subdirectory) for a run.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        let image_dir = output_dir.join(IMAGE_DIR);
        fs::create_dir_all(&image_dir).or_raise(|| ErrorKind::OutputDirectory(output_dir.clone()))?;
        tracing::debug!(output = %output_dir.display(), "Initialized run context");
        Ok(Self { output_dir, image_dir, seen: SeenNames::new() })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    pub fn seen(&self) -> &SeenNames {
        &self.seen
    }
}
