use cloudtape_acquire::{DownloadResult, IMAGE_DIR, LinkResult, Track};
use serde::Serialize;
use std::path::Path;

/// One track as it appears on the page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageTrack {
    /// `track-N`, counting from 1 across the whole page.
    pub anchor: String,
    /// Canonical filename without its extension.
    pub title: String,
    /// Canonical filename, relative to the page.
    pub file: String,
    /// Cover image path relative to the page; empty when there is none.
    pub image: String,
    pub has_image: bool,
    /// The link the track was downloaded from.
    pub source: String,
}
impl PageTrack {
    fn new(position: usize, link: &LinkResult, track: &Track) -> Self {
        let file = track.filename().to_string();
        let image = track.cover().map(|c| format!("{IMAGE_DIR}/{}", c.image_filename)).unwrap_or_default();
        Self {
            anchor: format!("track-{position}"),
            title: display_title(&file),
            has_image: !image.is_empty(),
            image,
            file,
            source: link.source.clone(),
        }
    }
}

/// Everything the template needs, fully decided.
///
/// The template only substitutes and iterates; anchors, titles, the playback
/// order and whether to offer the archive are all settled here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub title: String,
    pub tracks: Vec<PageTrack>,
    pub track_count: usize,
    /// Filenames in playback order, identical to the order of `tracks`.
    pub playlist: Vec<String>,
    pub has_archive: bool,
    pub archive: String,
}
impl Listing {
    /// Lays out `result` in link order, then download order within each link.
    pub fn assemble(result: &DownloadResult, archive: Option<&str>, title: impl Into<String>) -> Self {
        let tracks: Vec<PageTrack> = result
            .tracks()
            .enumerate()
            .map(|(index, (link, track))| PageTrack::new(index + 1, link, track))
            .collect();
        let playlist = tracks.iter().map(|t| t.file.clone()).collect();
        Self {
            title: title.into(),
            track_count: tracks.len(),
            tracks,
            playlist,
            has_archive: archive.is_some(),
            archive: archive.unwrap_or_default().to_string(),
        }
    }
}

fn display_title(filename: &str) -> String {
    Path::new(filename).file_stem().and_then(|s| s.to_str()).unwrap_or(filename).to_string()
}
