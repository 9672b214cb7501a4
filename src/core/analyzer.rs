use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::error::{DiscoveryError, Result};
use super::filter::{default_base_dir, SourceFilter};
use super::scanner::DirectoryCrawler;
use crate::config::{DiscoveryConfig, ParseFailurePolicy};
use crate::parsers::common::read_source;
use crate::parsers::{MarkerSet, ParserFactory};

/// A file left out of the result because it could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub line: usize,
    pub column: usize,
}

/// Outcome of one discovery run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiscoveryReport {
    pub root: PathBuf,
    /// Regular files found by the crawl.
    pub scanned: usize,
    /// Files rejected by the include/exclude patterns (never read).
    pub filtered_out: usize,
    pub entrypoints: Vec<PathBuf>,
    pub skipped: Vec<SkippedFile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Inspection {
    Match,
    NoMatch,
}

/// Crawl, filter and import analysis composed into one pipeline.
pub struct EntrypointDiscovery {
    crawler: DirectoryCrawler,
    filter: SourceFilter,
    parser_factory: ParserFactory,
    on_parse_error: ParseFailurePolicy,
    sort: bool,
}

impl EntrypointDiscovery {
    pub fn new(config: &DiscoveryConfig) -> Result<Self> {
        config.validate()?;

        let base_dir = config.base_dir.clone().unwrap_or_else(default_base_dir);
        let filter = SourceFilter::new(config.include.as_ref(), config.exclude.as_ref(), &base_dir)?;

        Ok(Self {
            crawler: DirectoryCrawler::new(),
            filter,
            parser_factory: ParserFactory::new(MarkerSet::new(config.markers.iter().cloned())),
            on_parse_error: config.on_parse_error,
            sort: config.sort,
        })
    }

    pub fn discover_entrypoints(&self, root: &Path) -> Result<Vec<PathBuf>> {
        Ok(self.discover(root)?.entrypoints)
    }

    pub fn discover(&self, root: &Path) -> Result<DiscoveryReport> {
        info!(root = %root.display(), "scanning for entrypoints");
        let files = self.crawler.crawl(root)?;
        let scanned = files.len();

        // Filter before any read: excluded files are never opened.
        let candidates: Vec<PathBuf> = files
            .into_iter()
            .filter(|path| {
                let keep = self.filter.includes(path);
                if !keep {
                    debug!(file = %path.display(), "excluded by pattern");
                }
                keep
            })
            .collect();
        let filtered_out = scanned - candidates.len();

        let inspections: Vec<Result<Inspection>> = candidates
            .par_iter()
            .map(|path| self.inspect(path))
            .collect();

        let mut entrypoints = Vec::new();
        let mut skipped = Vec::new();
        for (path, inspection) in candidates.into_iter().zip(inspections) {
            match inspection {
                Ok(Inspection::Match) => entrypoints.push(path),
                Ok(Inspection::NoMatch) => {}
                Err(DiscoveryError::Parse { path, line, column })
                    if self.on_parse_error == ParseFailurePolicy::Skip =>
                {
                    warn!(file = %path.display(), line, column, "skipping file with syntax errors");
                    skipped.push(SkippedFile { path, line, column });
                }
                Err(err) => return Err(err),
            }
        }

        if self.sort {
            entrypoints.sort();
        }

        info!(
            scanned,
            filtered_out,
            entrypoints = entrypoints.len(),
            skipped = skipped.len(),
            "discovery complete"
        );

        Ok(DiscoveryReport {
            root: root.to_path_buf(),
            scanned,
            filtered_out,
            entrypoints,
            skipped,
        })
    }

    fn inspect(&self, path: &Path) -> Result<Inspection> {
        let analyzer = self.parser_factory.for_path(path);
        let source = read_source(path)?;
        if analyzer.imports_marker(path, &source)? {
            debug!(file = %path.display(), language = analyzer.language_name(), "marker import found");
            Ok(Inspection::Match)
        } else {
            Ok(Inspection::NoMatch)
        }
    }
}

/// Crawl `root`, filter with `config`'s patterns and return the files that
/// import a marker module.
pub fn discover_entrypoints(root: &Path, config: &DiscoveryConfig) -> Result<Vec<PathBuf>> {
    EntrypointDiscovery::new(config)?.discover_entrypoints(root)
}
