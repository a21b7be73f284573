//! Discovery and resolution of SoundCloud links embedded in free text.
//!
//! Two stages live here:
//!
//! - [`extract_links`] scans input strings for anything shaped like a
//!   SoundCloud URL and returns them in first-seen order, with byte-identical
//!   repeats removed.
//! - [`Resolver`] expands short (`on.soundcloud.com`) links into their
//!   canonical form by following redirects. Canonical links pass through
//!   untouched, and a short link that cannot be resolved is kept as-is.

mod consts;
pub mod error;
mod extract;
mod resolve;

pub use crate::extract::{RawLink, extract_links};
pub use crate::resolve::{Follow, HttpFollower, Resolution, ResolveFailure, Resolver, ResolverOptions};
