//! Unicode canonicalization and duplicate suppression for downloaded names.
//!
//! Some filesystems (notably macOS) hand back decomposed (NFD) names while
//! others keep whatever bytes were written, so the same track can show up
//! twice under visually identical names. Every new name is folded to NFC and
//! checked against the run's [`SeenNames`](crate::SeenNames).

use crate::Context;
use std::fs;
use tracing::instrument;
use unicode_normalization::UnicodeNormalization;

/// The NFC form of `raw`, used as the deduplication key.
pub fn canonical_name(raw: &str) -> String {
    raw.nfc().collect()
}

/// What happened to the file on disk while admitting it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rename {
    /// Already in canonical form.
    Unchanged,
    Renamed,
    /// The rename failed; the raw name is kept as the canonical one.
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Admission {
    Accepted { canonical: String, raw: String, rename: Rename },
    /// Its canonical name was already registered earlier in the run.
    Duplicate { canonical: String, raw: String },
}

/// Admits a newly downloaded file into the run, or rejects it as a duplicate.
///
/// A file whose canonical name differs from its raw name is renamed in place.
/// A failed rename never drops the file: it is accepted under its raw name.
#[instrument(level = "debug", skip(ctx))]
pub fn admit(ctx: &Context, raw: &str) -> Admission {
    let canonical = canonical_name(raw);
    if !ctx.seen().register(&canonical) {
        tracing::warn!(track = %canonical, "Skipping duplicate track");
        return Admission::Duplicate { canonical, raw: raw.to_string() };
    }
    if canonical == raw {
        return Admission::Accepted { canonical, raw: raw.to_string(), rename: Rename::Unchanged };
    }
    let from = ctx.output_dir().join(raw);
    let to = ctx.output_dir().join(&canonical);
    match fs::rename(&from, &to) {
        Ok(()) => {
            tracing::info!(from = raw, to = %canonical, "Renamed for normalization");
            Admission::Accepted { canonical, raw: raw.to_string(), rename: Rename::Renamed }
        },
        Err(e) => {
            tracing::error!(file = raw, error = %e, "Failed to rename file; keeping original name");
            Admission::Accepted { canonical: raw.to_string(), raw: raw.to_string(), rename: Rename::Failed(e.to_string()) }
        },
    }
}
