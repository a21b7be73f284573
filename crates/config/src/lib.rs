//! Run configuration.
//!
//! Values are layered with [figment]: built-in defaults, then the YAML file,
//! then environment variables prefixed with `CLOUDTAPE_` (use `__` to reach
//! nested keys, e.g. `CLOUDTAPE_RESOLVER__TIMEOUT_SECS=30`).
//!
//! ```yaml
//! soundcloud_links:
//!   - "new favourite https://on.soundcloud.com/abc123"
//!   - "https://soundcloud.com/artist/track and some notes"
//! output_dir: music/soundcloud_downloads
//! downloader:
//!   program: scdl
//!   args: ["--onlymp3"]
//! page:
//!   title: Summer Mix
//! ```

pub mod error;

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::instrument;

/// Config file read when none is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "links_list.yaml";
/// Directory created next to the config file's stem when `output_dir` is unset.
pub const DOWNLOADS_DIR: &str = "soundcloud_downloads";
pub const ENV_PREFIX: &str = "CLOUDTAPE_";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Free text to scan for links, in order.
    pub soundcloud_links: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    pub downloader: DownloaderConfig,
    pub resolver: ResolverConfig,
    pub page: PageConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloaderConfig {
    /// Program name (looked up on `PATH`) or path.
    pub program: String,
    /// Extra arguments placed before `-l <link> --path <dir>`.
    pub args: Vec<String>,
}
impl Default for DownloaderConfig {
    fn default() -> Self {
        Self { program: "scdl".to_string(), args: vec![] }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub timeout_secs: u64,
    pub max_redirects: usize,
}
impl Default for ResolverConfig {
    fn default() -> Self {
        Self { timeout_secs: 15, max_redirects: 10 }
    }
}
impl ResolverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub title: String,
    /// Replaces the built-in page template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
    /// Whether to write `style.css` next to the page.
    pub stylesheet: bool,
}
impl Default for PageConfig {
    fn default() -> Self {
        Self { title: "SoundCloud Tracks".to_string(), template: None, stylesheet: true }
    }
}

impl Config {
    /// The provider stack used by [`load`](Self::load), without the existence check.
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
        }
        let mut config: Config =
            Self::figment(path).extract().or_raise(|| ErrorKind::Invalid(path.display().to_string()))?;
        config.validate()?;
        if config.output_dir.is_none() {
            config.output_dir = Some(default_output_dir(path));
        }
        tracing::debug!(links = config.soundcloud_links.len(), output = ?config.output_dir, "Loaded configuration");
        Ok(config)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from(DOWNLOADS_DIR))
    }

    fn validate(&self) -> Result<()> {
        if self.downloader.program.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("downloader.program must not be empty".to_string()));
        }
        if self.resolver.timeout_secs == 0 {
            exn::bail!(ErrorKind::Invalid("resolver.timeout_secs must be greater than zero".to_string()));
        }
        Ok(())
    }
}

/// `<config file stem>/soundcloud_downloads`, relative to the working directory.
fn default_output_dir(config_path: &Path) -> PathBuf {
    match config_path.file_stem() {
        Some(stem) => Path::new(stem).join(DOWNLOADS_DIR),
        None => PathBuf::from(DOWNLOADS_DIR),
    }
}
