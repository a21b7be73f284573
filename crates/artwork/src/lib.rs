//! Embedded cover art extraction.
//!
//! Reads the first picture from an audio file's tag container (ID3v2 `APIC`
//! frames for MP3) with [`lofty`] and writes the raw bytes into a sibling
//! image directory, named after the audio file with an extension derived from
//! the declared MIME type.
//!
//! Extraction never fails the caller: every outcome, including the reason
//! for a failure, is reported as an [`Artwork`] value.

pub mod error;
mod extractor;

pub use crate::extractor::{Artwork, CoverArt, extension_for, extract};

/// Name of the image directory created beside the downloaded audio.
pub const IMAGE_DIR: &str = "img";
