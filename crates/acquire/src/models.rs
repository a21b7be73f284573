use crate::error::ErrorKind;
use cloudtape_artwork::{Artwork, CoverArt};

/// A downloaded file attributed to the link that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackHandle {
    /// Unique within a run; names exactly one file in the output directory.
    pub canonical_filename: String,
    pub original_filename: String,
    pub source_link: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub handle: TrackHandle,
    pub artwork: Artwork,
}
impl Track {
    pub fn filename(&self) -> &str {
        &self.handle.canonical_filename
    }

    pub fn cover(&self) -> Option<&CoverArt> {
        self.artwork.cover()
    }
}

/// How acquisition went for a single link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkStatus {
    /// At least one new track was accepted.
    Acquired,
    /// The tool ran but nothing new (and non-duplicate) appeared.
    NothingNew,
    /// The tool (or the directory listing around it) failed for this link.
    Failed(ErrorKind),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkResult {
    pub source: String,
    /// Accepted tracks, in download order.
    pub tracks: Vec<Track>,
    /// Raw names of new files rejected as duplicates.
    pub duplicates: Vec<String>,
    pub status: LinkStatus,
}
impl LinkResult {
    pub(crate) fn failed(source: &str, reason: ErrorKind) -> Self {
        Self { source: source.to_string(), tracks: vec![], duplicates: vec![], status: LinkStatus::Failed(reason) }
    }
}

/// Every link in discovery order, each with the tracks attributed to it.
///
/// The single source of truth for both the archive and the listing page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DownloadResult {
    pub links: Vec<LinkResult>,
}
impl DownloadResult {
    /// All tracks, outer loop over links and inner loop over each link's tracks.
    pub fn tracks(&self) -> impl Iterator<Item = (&LinkResult, &Track)> {
        self.links.iter().flat_map(|link| link.tracks.iter().map(move |track| (link, track)))
    }

    pub fn track_count(&self) -> usize {
        self.links.iter().map(|link| link.tracks.len()).sum()
    }

    pub fn duplicate_count(&self) -> usize {
        self.links.iter().map(|link| link.duplicates.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.track_count() == 0
    }
}
impl FromIterator<LinkResult> for DownloadResult {
    fn from_iter<T: IntoIterator<Item = LinkResult>>(iter: T) -> Self {
        Self { links: iter.into_iter().collect() }
    }
}
