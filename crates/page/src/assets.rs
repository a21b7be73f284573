//! Embedded assets for the listing page.
//!
//! The page template, the sequential playback script and the default
//! stylesheet are embedded into the binary at compile time using
//! [`rust-embed`](rust_embed).

use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use rust_embed::Embed;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

pub const TEMPLATE: &str = "template.html";
pub const PLAY_ALL_SCRIPT: &str = "playAll.js";
pub const STYLESHEET: &str = "style.css";

#[derive(Embed)]
#[folder = "../../assets/page/"]
pub(crate) struct Builtins;
impl Builtins {
    pub(crate) fn load(name: impl AsRef<str>) -> Result<Cow<'static, [u8]>> {
        let name = name.as_ref();
        Self::get(name).map(|f| f.data).ok_or_raise(|| ErrorKind::AssetNotFound(name.to_string()))
    }
}

/// Copies the builtin asset `name` into `output_dir`, replacing any existing file.
pub fn install_asset(output_dir: &Path, name: &str) -> Result<PathBuf> {
    let data = Builtins::load(name)?;
    let target = output_dir.join(name);
    fs::write(&target, &data).or_raise(|| ErrorKind::Write(target.clone()))?;
    tracing::debug!(asset = name, target = %target.display(), "Installed page asset");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TEMPLATE)]
    #[case(PLAY_ALL_SCRIPT)]
    #[case(STYLESHEET)]
    fn test_builtins_present(#[case] name: &str) {
        assert!(!Builtins::load(name).unwrap().is_empty());
    }

    #[test]
    fn test_install_writes_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = install_asset(temp_dir.path(), PLAY_ALL_SCRIPT).unwrap();
        assert_eq!(path, temp_dir.path().join("playAll.js"));
        let script = fs::read_to_string(path).unwrap();
        assert!(script.contains("function playAll"));
        assert!(script.contains("#playlist li[data-file]"));
    }

    #[test]
    fn test_unknown_asset() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = install_asset(temp_dir.path(), "nope.js").unwrap_err();
        assert_eq!(*err, ErrorKind::AssetNotFound("nope.js".to_string()));
        assert!(!temp_dir.path().join("nope.js").exists());
    }
}
