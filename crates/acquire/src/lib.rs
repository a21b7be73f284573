//! Track acquisition: run the external downloader once per link, work out
//! which files it produced by diffing the output directory, fold their names
//! to a canonical Unicode form, reject duplicates, and pull out cover art.
//!
//! Everything that lives for the duration of one run (output locations and
//! the registry of accepted names) is carried by an explicit [`Context`].

mod context;
mod downloader;
pub mod error;
mod models;
mod normalize;
mod orchestrate;
mod snapshot;

pub use crate::context::{Context, SeenNames};
pub use crate::downloader::{Downloader, Scdl};
pub use crate::models::{DownloadResult, LinkResult, LinkStatus, Track, TrackHandle};
pub use crate::normalize::{Admission, Rename, admit, canonical_name};
pub use crate::orchestrate::{acquire, acquire_link};
pub use crate::snapshot::{AUDIO_EXTENSION, Snapshot, is_audio};
pub use cloudtape_artwork::{Artwork, CoverArt, IMAGE_DIR};
