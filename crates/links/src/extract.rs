use crate::consts;
use std::collections::HashSet;
use std::fmt;
use tracing::instrument;

/// A SoundCloud URL exactly as it appeared in the input text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RawLink {
    text: String,
    short: bool,
}
impl RawLink {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let short = consts::SHORT_LINK_REGEX.is_match(&text);
        Self { text, short }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether this link points at the shortener and needs resolving.
    pub fn is_short_form(&self) -> bool {
        self.short
    }
}
impl AsRef<str> for RawLink {
    fn as_ref(&self) -> &str {
        &self.text
    }
}
impl fmt::Display for RawLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Finds every SoundCloud link across all `inputs`.
///
/// Links are returned in the order they are first encountered across the
/// whole sequence (not per string). Repeats are dropped only when they are
/// byte-identical: no case-folding, no trailing-slash or query normalization.
///
/// ```
/// use cloudtape_links::extract_links;
///
/// let links = extract_links(["foo https://soundcloud.com/a/b", "bar https://soundcloud.com/a/b"]);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].as_str(), "https://soundcloud.com/a/b");
/// ```
#[instrument(level = "debug", skip_all)]
pub fn extract_links<I, S>(inputs: I) -> Vec<RawLink>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for input in inputs {
        for found in consts::LINK_REGEX.find_iter(input.as_ref()) {
            if seen.insert(found.as_str().to_string()) {
                links.push(RawLink::new(found.as_str()));
            }
        }
    }
    tracing::debug!(count = links.len(), "Extracted SoundCloud links");
    links
}
