use crate::models::{DownloadResult, LinkResult, LinkStatus, Track, TrackHandle};
use crate::normalize::{Admission, admit};
use crate::snapshot::{Snapshot, is_audio};
use crate::{Context, Downloader};
use cloudtape_artwork as artwork;
use tracing::instrument;

/// Downloads every link in order and attributes new files to each.
///
/// Links are processed strictly one at a time: attribution by directory
/// diffing is only sound while nothing else writes to the output directory.
/// Failures are contained per link and recorded in its [`LinkStatus`].
pub fn acquire<D, I, S>(ctx: &Context, downloader: &D, links: I) -> DownloadResult
where
    D: Downloader + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    links.into_iter().map(|link| acquire_link(ctx, downloader, link.as_ref())).collect()
}

/// Runs the downloader for one link and admits the audio files it produced.
#[instrument(skip(ctx, downloader))]
pub fn acquire_link<D: Downloader + ?Sized>(ctx: &Context, downloader: &D, link: &str) -> LinkResult {
    tracing::info!("Downloading from link");
    let before = match Snapshot::capture(ctx.output_dir()) {
        Ok(snapshot) => snapshot,
        Err(e) => return LinkResult::failed(link, (*e).clone()),
    };
    if let Err(e) = downloader.download(link, ctx.output_dir()) {
        let reason = (*e).clone();
        tracing::error!(%reason, "Error downloading link");
        return LinkResult::failed(link, reason);
    }
    let after = match Snapshot::capture(ctx.output_dir()) {
        Ok(snapshot) => snapshot,
        Err(e) => return LinkResult::failed(link, (*e).clone()),
    };

    let mut tracks = Vec::new();
    let mut duplicates = Vec::new();
    for raw in before.diff(&after).into_iter().filter(|name| is_audio(name)) {
        match admit(ctx, &raw) {
            Admission::Accepted { canonical, raw, .. } => {
                let artwork = artwork::extract(&ctx.output_dir().join(&canonical), ctx.image_dir());
                tracing::info!(file = %canonical, cover = ?artwork.cover().map(|c| &c.image_filename), "Downloaded file");
                let handle =
                    TrackHandle { canonical_filename: canonical, original_filename: raw, source_link: link.to_string() };
                tracks.push(Track { handle, artwork });
            },
            Admission::Duplicate { raw, .. } => duplicates.push(raw),
        }
    }

    let status = if tracks.is_empty() {
        tracing::warn!("No new MP3 files for link");
        LinkStatus::NothingNew
    } else {
        LinkStatus::Acquired
    };
    LinkResult { source: link.to_string(), tracks, duplicates, status }
}
