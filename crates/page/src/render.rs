use crate::assets::{Builtins, TEMPLATE};
use crate::error::{Error, ErrorKind, Result};
use crate::listing::Listing;
use exn::ResultExt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::instrument;
use upon::{Engine, Template};

/// File name of the generated page inside the output directory.
pub const PAGE_NAME: &str = "index.html";

/// A compiled page template.
///
/// Rendering is a pure function of the [`Listing`]: no network access and no
/// filesystem reads happen after construction. Two formatters are available
/// to templates besides upon's defaults:
///
/// - **`html`** escapes text for element content and attribute values.
/// - **`href`** percent-encodes each `/`-separated segment of a relative path.
pub struct PageRenderer {
    engine: Engine<'static>,
    template: Template<'static>,
}
impl FromStr for PageRenderer {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut engine = Engine::new();
        addons::configure(&mut engine);
        let template = engine.compile(s.to_string()).or_raise(|| ErrorKind::Template("does not compile".into()))?;
        Ok(Self { engine, template })
    }
}
impl PageRenderer {
    /// The template shipped inside the binary.
    pub fn builtin() -> Result<Self> {
        let source = Builtins::load(TEMPLATE)?;
        let source = std::str::from_utf8(&source).or_raise(|| ErrorKind::Template(TEMPLATE.to_string()))?;
        source.parse()
    }

    /// A user-supplied template file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).or_raise(|| ErrorKind::Template(path.display().to_string()))?;
        source.parse()
    }

    pub fn render(&self, listing: &Listing) -> Result<String> {
        self.template
            .render(&self.engine, listing)
            .to_string()
            .or_raise(|| ErrorKind::Template("failed to render".into()))
    }

    /// Renders `listing` and writes it to [`PAGE_NAME`] in `output_dir`.
    #[instrument(skip_all, fields(output = %output_dir.display(), tracks = listing.track_count))]
    pub fn write(&self, output_dir: &Path, listing: &Listing) -> Result<PathBuf> {
        let html = self.render(listing)?;
        let target = output_dir.join(PAGE_NAME);
        fs::write(&target, html).or_raise(|| ErrorKind::Write(target.clone()))?;
        tracing::info!(page = %target.display(), "HTML page generated");
        Ok(target)
    }
}

/// Custom [`upon`] formatters for safe HTML output.
mod addons {
    use std::fmt::Write;
    use upon::{Engine, Value, fmt as upon_fmt};

    pub(crate) fn escape_html(s: &str) -> String {
        let mut escaped = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#39;"),
                c => escaped.push(c),
            }
        }
        escaped
    }

    /// Percent-encodes every segment, keeping the separators.
    pub(crate) fn encode_path(s: &str) -> String {
        s.split('/').map(urlencoding::encode).collect::<Vec<_>>().join("/")
    }

    fn html_formatter(f: &mut upon_fmt::Formatter<'_>, value: &Value) -> upon_fmt::Result {
        match value {
            Value::String(s) => write!(f, "{}", escape_html(s))?,
            v => upon_fmt::default(f, v)?,
        };
        Ok(())
    }

    fn href_formatter(f: &mut upon_fmt::Formatter<'_>, value: &Value) -> upon_fmt::Result {
        match value {
            Value::String(s) => write!(f, "{}", encode_path(s))?,
            v => upon_fmt::default(f, v)?,
        };
        Ok(())
    }

    pub(crate) fn configure(engine: &mut Engine<'_>) {
        engine.add_formatter("html", html_formatter);
        engine.add_formatter("href", href_formatter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::tests::result;
    use rstest::rstest;

    fn page(listing: &Listing) -> String {
        PageRenderer::builtin().unwrap().render(listing).unwrap()
    }

    #[rstest]
    #[case("plain", "plain")]
    #[case("A & B", "A &amp; B")]
    #[case("<b>\"x\"</b>", "&lt;b&gt;&quot;x&quot;&lt;/b&gt;")]
    fn test_escape_html(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(addons::escape_html(input), expected);
    }

    #[rstest]
    #[case("song.mp3", "song.mp3")]
    #[case("img/My Song.jpg", "img/My%20Song.jpg")]
    #[case("Caf\u{e9} #1?.mp3", "Caf%C3%A9%20%231%3F.mp3")]
    fn test_encode_path(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(addons::encode_path(input), expected);
    }

    #[test]
    fn test_custom_template() {
        let renderer: PageRenderer =
            "{{ track_count }}|{% for t in tracks %}{{ t.anchor }}={{ t.title }},{% endfor %}".parse().unwrap();
        let listing = Listing::assemble(&result(vec![("l", vec![("a.mp3", None), ("b.mp3", None)])]), None, "T");
        assert_eq!(renderer.render(&listing).unwrap(), "2|track-1=a,track-2=b,");
    }

    #[test]
    fn test_invalid_template() {
        let err = "{% for t in tracks %}".parse::<PageRenderer>().err().unwrap();
        assert!(matches!(*err, ErrorKind::Template(_)));
    }

    #[test]
    fn test_missing_template_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = PageRenderer::from_path(&temp_dir.path().join("template.html")).err().unwrap();
        assert!(matches!(*err, ErrorKind::Template(_)));
    }

    #[test]
    fn test_sections_in_anchor_order() {
        let listing = Listing::assemble(
            &result(vec![("l1", vec![("one.mp3", None)]), ("l2", vec![("two.mp3", None), ("three.mp3", None)])]),
            None,
            "T",
        );
        let html = page(&listing);
        let positions: Vec<usize> =
            (1..=3).map(|n| html.find(&format!("id=\"track-{n}\"")).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(html.contains("href=\"#track-3\""));
        assert_eq!(html.matches("<li data-file=").count(), 3);
    }

    /// The player script matches playlist entries to players by attribute value.
    #[test]
    fn test_playlist_matches_players() {
        let listing = Listing::assemble(
            &result(vec![("l1", vec![("Caf\u{e9} #1.mp3", None)]), ("l2", vec![("b.mp3", None), ("a.mp3", None)])]),
            None,
            "T",
        );
        let html = page(&listing);
        let values = |attr: &str| -> Vec<String> {
            html.split(attr).skip(1).filter_map(|rest| rest.split('"').next()).map(str::to_string).collect()
        };
        assert_eq!(values("<li data-file=\""), vec!["Caf%C3%A9%20%231.mp3", "b.mp3", "a.mp3"]);
        assert_eq!(values("<audio controls preload=\"none\" src=\""), values("<li data-file=\""));
    }

    #[test]
    fn test_no_image_without_cover() {
        let listing = Listing::assemble(&result(vec![("l", vec![("bare.mp3", None)])]), None, "T");
        let html = page(&listing);
        assert!(!html.contains("<img"));
        assert!(html.contains("src=\"bare.mp3\""));
    }

    #[test]
    fn test_image_with_cover() {
        let listing = Listing::assemble(&result(vec![("l", vec![("art.mp3", Some("art.png"))])]), None, "T");
        assert!(page(&listing).contains("<img src=\"img/art.png\""));
    }

    #[rstest]
    #[case(None, false)]
    #[case(Some("all_tracks.zip"), true)]
    fn test_archive_link(#[case] archive: Option<&str>, #[case] linked: bool) {
        let listing = Listing::assemble(&result(vec![("l", vec![("a.mp3", None)])]), archive, "T");
        assert_eq!(page(&listing).contains("href=\"all_tracks.zip\""), linked);
    }

    #[test]
    fn test_text_is_escaped() {
        let listing = Listing::assemble(
            &result(vec![("https://soundcloud.com/a/b?x=1&y=2", vec![("Tom & Jerry <live>.mp3", None)])]),
            None,
            "Mine & Yours",
        );
        let html = page(&listing);
        assert!(html.contains("Tom &amp; Jerry &lt;live&gt;"));
        assert!(html.contains("Tom%20%26%20Jerry%20%3Clive%3E.mp3"));
        assert!(html.contains("https://soundcloud.com/a/b?x=1&amp;y=2"));
        assert!(html.contains("<title>Mine &amp; Yours</title>"));
        assert!(!html.contains("<live>"));
    }

    #[test]
    fn test_write_page() {
        let temp_dir = tempfile::tempdir().unwrap();
        let listing = Listing::assemble(&result(vec![]), None, "T");
        let path = PageRenderer::builtin().unwrap().write(temp_dir.path(), &listing).unwrap();
        assert_eq!(path, temp_dir.path().join(PAGE_NAME));
        assert!(fs::read_to_string(path).unwrap().contains("playAll.js"));
    }
}
