//! The listing page: a summary of every acquired track with anchors, one
//! section per track, an optional archive link, and the ordered playlist
//! consumed by the "Play All" script.
//!
//! Page generation is split in two. [`Listing::assemble`] makes every
//! decision (anchor numbering, titles, cover paths, playback order, archive
//! link) from the [`DownloadResult`](cloudtape_acquire::DownloadResult), and
//! [`PageRenderer`] only substitutes that data into an [upon] template.
//!
//! ```
//! use cloudtape_acquire::DownloadResult;
//! use cloudtape_page::{Listing, PageRenderer};
//!
//! let listing = Listing::assemble(&DownloadResult::default(), None, "Nothing yet");
//! let html = PageRenderer::builtin().unwrap().render(&listing).unwrap();
//! assert!(html.contains("Play All"));
//! assert!(!html.contains("all_tracks.zip"));
//! ```

mod assets;
pub mod error;
mod listing;
mod render;

pub use crate::assets::{PLAY_ALL_SCRIPT, STYLESHEET, install_asset};
pub use crate::listing::{Listing, PageTrack};
pub use crate::render::{PAGE_NAME, PageRenderer};
