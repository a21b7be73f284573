use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use lofty::TaggedFileExt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// MIME type assumed when the tag does not declare one.
const DEFAULT_MIME: &str = "image/jpeg";

/// Cover art persisted beside a track.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoverArt {
    /// File name inside the image directory (no directory prefix).
    pub image_filename: String,
    pub mime_type: String,
}

/// The outcome of attempting to extract cover art from one audio file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Artwork {
    Extracted(CoverArt),
    /// The file carries no tag, or a tag without pictures.
    Missing,
    Failed(ErrorKind),
}
impl Artwork {
    pub fn cover(&self) -> Option<&CoverArt> {
        match self {
            Self::Extracted(cover) => Some(cover),
            _ => None,
        }
    }
}

struct EmbeddedPicture {
    data: Vec<u8>,
    mime_type: String,
}

/// Maps a declared image MIME type to the file extension used on disk.
///
/// Anything other than PNG is written as `.jpg`, which is what the vast
/// majority of embedded artwork is anyway.
pub fn extension_for(mime_type: &str) -> &'static str {
    match mime_type.trim() {
        m if m.eq_ignore_ascii_case("image/png") => "png",
        m if m.eq_ignore_ascii_case("image/jpeg") => "jpg",
        _ => "jpg",
    }
}

/// Extracts the first embedded picture of `audio` into `image_dir`.
#[instrument(skip_all, fields(file = %audio.display()))]
pub fn extract(audio: &Path, image_dir: &Path) -> Artwork {
    let picture = match read_picture(audio) {
        Ok(Some(picture)) => picture,
        Ok(None) => {
            tracing::warn!("No embedded image found");
            return Artwork::Missing;
        },
        Err(e) => {
            let reason = (*e).clone();
            tracing::warn!(%reason, "Error reading embedded image");
            return Artwork::Failed(reason);
        },
    };
    match persist(&picture, audio, image_dir) {
        Ok(cover) => {
            tracing::debug!(image = %cover.image_filename, mime = %cover.mime_type, "Extracted cover art");
            Artwork::Extracted(cover)
        },
        Err(e) => {
            let reason = (*e).clone();
            tracing::warn!(%reason, "Error writing embedded image");
            Artwork::Failed(reason)
        },
    }
}

/// Reads the first picture in tag declaration order, if any.
fn read_picture(audio: &Path) -> Result<Option<EmbeddedPicture>> {
    if !audio.is_file() {
        exn::bail!(ErrorKind::NotFound(audio.to_path_buf()));
    }
    let tagged_file = lofty::read_from_path(audio).or_raise(|| ErrorKind::Metadata)?;
    let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) else {
        return Ok(None);
    };
    Ok(tag.pictures().first().map(|picture| EmbeddedPicture {
        data: picture.data().to_vec(),
        mime_type: picture.mime_type().map(|m| m.as_str().to_string()).unwrap_or_else(|| DEFAULT_MIME.to_string()),
    }))
}

/// Base name for the image of `audio`: its stem, or its whole file name when
/// the extension is not all lowercase. `Song.mp3` and `Song.MP3` can both be
/// accepted in one run and must not share a cover.
fn image_base(audio: &Path) -> String {
    let lowercase_ext = audio.extension().and_then(|e| e.to_str()).is_none_or(|e| !e.chars().any(char::is_uppercase));
    let base = if lowercase_ext { audio.file_stem() } else { audio.file_name() };
    base.map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}

fn persist(picture: &EmbeddedPicture, audio: &Path, image_dir: &Path) -> Result<CoverArt> {
    let image_filename = format!("{}.{}", image_base(audio), extension_for(&picture.mime_type));
    let target: PathBuf = image_dir.join(&image_filename);
    fs::create_dir_all(image_dir).or_raise(|| ErrorKind::Write(target.clone()))?;
    fs::write(&target, &picture.data).or_raise(|| ErrorKind::Write(target.clone()))?;
    Ok(CoverArt { image_filename, mime_type: picture.mime_type.clone() })
}
