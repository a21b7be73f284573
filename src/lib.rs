//! Turns SoundCloud links scattered through free text into a browsable local
//! archive: the audio files, their cover art, a ZIP of every track and an
//! `index.html` that can play them all in sequence.
//!
//! A run is a single forward pass: links are extracted and resolved, each is
//! downloaded in turn, and the resulting [`DownloadResult`] feeds both the
//! archive and the page. Problems with one link, file or cover only degrade
//! that item; see [`Report`] for what happened to each.

pub mod error;

use crate::error::{ErrorKind, Result};
use cloudtape_acquire::{Context, DownloadResult, Downloader, LinkStatus, Scdl, acquire};
use cloudtape_archive::ARCHIVE_NAME;
use cloudtape_config::Config;
use cloudtape_links::{Resolution, Resolver, ResolverOptions, extract_links};
use cloudtape_page::{Listing, PLAY_ALL_SCRIPT, PageRenderer, STYLESHEET, install_asset};
use exn::ResultExt;
use std::path::PathBuf;
use tracing::instrument;

pub use cloudtape_config as config;

/// What a run did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    /// Distinct links found in the input.
    pub links_found: usize,
    /// Short links expanded to a canonical URL.
    pub links_resolved: usize,
    /// Short links kept as-is because they could not be expanded.
    pub resolution_fallbacks: usize,
    /// Links whose download failed outright.
    pub links_failed: usize,
    pub tracks: usize,
    pub duplicates: usize,
    pub covers: usize,
    pub archive: Option<PathBuf>,
    /// Tracks written into the archive.
    pub archived: usize,
    /// Tracks that were gone from disk when the archive was built.
    pub missing_from_archive: Vec<String>,
    pub page: Option<PathBuf>,
    pub result: DownloadResult,
}

enum Tool<D> {
    Given(D),
    /// Looked up only once there is something to download.
    Deferred(fn(&Config) -> Result<D>),
}

/// A configured run.
pub struct Pipeline<D> {
    config: Config,
    resolver: Resolver,
    tool: Tool<D>,
}
impl Pipeline<Scdl> {
    /// Builds the real HTTP resolver. The download tool is located by
    /// [`run`](Self::run) after links have been found, so input without links
    /// never requires it.
    pub fn from_config(config: Config) -> Result<Self> {
        let options =
            ResolverOptions { timeout: config.resolver.timeout(), max_redirects: config.resolver.max_redirects };
        let resolver = Resolver::new(options).or_raise(|| ErrorKind::Resolver)?;
        Ok(Self { config, resolver, tool: Tool::Deferred(locate_scdl) })
    }
}
fn locate_scdl(config: &Config) -> Result<Scdl> {
    Scdl::with_program(&config.downloader.program, config.downloader.args.iter().cloned())
        .or_raise(|| ErrorKind::Downloader)
}

impl<D: Downloader> Pipeline<D> {
    pub fn new(config: Config, resolver: Resolver, downloader: D) -> Self {
        Self { config, resolver, tool: Tool::Given(downloader) }
    }

    #[instrument(skip_all, fields(output = %self.config.output_dir().display()))]
    pub fn run(&self) -> Result<Report> {
        let links = extract_links(&self.config.soundcloud_links);
        if links.is_empty() {
            tracing::warn!("No SoundCloud links found in the input; nothing to do");
            return Ok(Report::default());
        }
        tracing::info!(links = links.len(), "Extracted SoundCloud links");

        let located;
        let downloader = match &self.tool {
            Tool::Given(downloader) => downloader,
            Tool::Deferred(locate) => {
                located = locate(&self.config)?;
                &located
            },
        };
        let resolutions = self.resolver.resolve_all(&links);
        let ctx = Context::new(self.config.output_dir()).or_raise(|| ErrorKind::OutputDirectory)?;
        let result = acquire(&ctx, downloader, resolutions.iter().map(Resolution::url));
        tracing::info!(tracks = result.track_count(), duplicates = result.duplicate_count(), "Downloads complete");

        let archive = match cloudtape_archive::build(ctx.output_dir(), &result) {
            Ok(archive) => Some(archive),
            Err(e) => {
                let reason = (*e).clone();
                tracing::error!(%reason, "Failed to create ZIP archive");
                None
            },
        };
        let page = self.write_page(&ctx, &result);
        self.install_assets(&ctx);

        Ok(Report {
            links_found: links.len(),
            links_resolved: resolutions.iter().filter(|r| matches!(r, Resolution::Resolved { .. })).count(),
            resolution_fallbacks: resolutions.iter().filter(|r| r.is_fallback()).count(),
            links_failed: result.links.iter().filter(|l| matches!(l.status, LinkStatus::Failed(_))).count(),
            tracks: result.track_count(),
            duplicates: result.duplicate_count(),
            covers: result.tracks().filter(|(_, t)| t.cover().is_some()).count(),
            archived: archive.as_ref().map_or(0, |a| a.entries.len()),
            missing_from_archive: archive.as_ref().map(|a| a.missing.clone()).unwrap_or_default(),
            archive: archive.map(|a| a.path),
            page,
            result,
        })
    }

    /// Renders `index.html`; a template problem skips the page but not the run.
    fn write_page(&self, ctx: &Context, result: &DownloadResult) -> Option<PathBuf> {
        let archive_exists = ctx.output_dir().join(ARCHIVE_NAME).is_file();
        let listing = Listing::assemble(result, archive_exists.then_some(ARCHIVE_NAME), &self.config.page.title);
        let renderer = match &self.config.page.template {
            Some(path) => PageRenderer::from_path(path),
            None => PageRenderer::builtin(),
        };
        match renderer.and_then(|r| r.write(ctx.output_dir(), &listing)) {
            Ok(path) => Some(path),
            Err(e) => {
                let reason = (*e).clone();
                tracing::error!(%reason, "Page generation skipped");
                None
            },
        }
    }

    fn install_assets(&self, ctx: &Context) {
        let mut assets = vec![PLAY_ALL_SCRIPT];
        if self.config.page.stylesheet {
            assets.push(STYLESHEET);
        }
        for asset in assets {
            if let Err(e) = install_asset(ctx.output_dir(), asset) {
                let reason = (*e).clone();
                tracing::error!(asset, %reason, "Failed to copy page asset");
            }
        }
    }
}
