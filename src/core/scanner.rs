use dashmap::DashSet;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs::{self, FileType};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use super::error::{DiscoveryError, Result};
use super::resolver::PathResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// A path found while listing a directory, after symlinks have been resolved.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// Canonical directories already entered during one crawl.
///
/// `enter` is an atomic check-and-insert, so sibling recursions running on
/// different threads can never both descend into the same directory.
#[derive(Debug, Default)]
pub struct VisitedSet {
    dirs: DashSet<PathBuf>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when `dir` was already entered.
    pub fn enter(&self, dir: &Path) -> bool {
        self.dirs.insert(dir.to_path_buf())
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

/// Recursive, symlink-following directory crawler.
pub struct DirectoryCrawler {
    resolver: PathResolver,
}

impl Default for DirectoryCrawler {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryCrawler {
    pub fn new() -> Self {
        Self {
            resolver: PathResolver::new(),
        }
    }

    /// List every regular file reachable from `root`.
    ///
    /// Directory symlinks are followed into their resolved targets, file
    /// symlinks are reported by their resolved target path, and dangling
    /// links contribute nothing. A root that does not exist (or is a link to
    /// nothing) is an error.
    pub fn crawl(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let absolute = self.resolver.absolute(root)?;
        let start = self.resolver.canonicalize(&absolute)?;
        if !start.is_dir() {
            return Err(DiscoveryError::NotADirectory { path: start });
        }

        let visited = VisitedSet::new();
        let files = self.crawl_dir(&start, &visited)?;
        debug!(
            root = %start.display(),
            directories = visited.len(),
            files = files.len(),
            "crawl finished"
        );

        Ok(dedup_preserving_order(files))
    }

    fn crawl_dir(&self, dir: &Path, visited: &VisitedSet) -> Result<Vec<PathBuf>> {
        if !visited.enter(dir) {
            trace!(dir = %dir.display(), "directory already visited, skipping");
            return Ok(Vec::new());
        }

        let mut listing = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| DiscoveryError::io(dir, e))? {
            let entry = entry.map_err(|e| DiscoveryError::io(dir, e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| DiscoveryError::io(entry.path(), e))?;
            listing.push((entry.path(), file_type));
        }

        // Siblings are independent; par_iter keeps listing order in the output.
        let nested = listing
            .par_iter()
            .map(|(path, file_type)| self.visit_entry(path, *file_type, visited))
            .collect::<Result<Vec<_>>>()?;

        Ok(nested.into_iter().flatten().collect())
    }

    fn visit_entry(&self, path: &Path, file_type: FileType, visited: &VisitedSet) -> Result<Vec<PathBuf>> {
        let Some(entry) = self.classify(path, file_type)? else {
            return Ok(Vec::new());
        };

        match entry.kind {
            EntryKind::File => Ok(vec![entry.path]),
            EntryKind::Directory => self.crawl_dir(&entry.path, visited),
        }
    }

    /// Turn a listing entry into a crawlable entry, following symlinks.
    ///
    /// Targets reached through a link are canonicalized: a directory link
    /// back to an ancestor lands on a path already in the visited set, and a
    /// file reached by two spellings is reported under one path.
    fn classify(&self, path: &Path, file_type: FileType) -> Result<Option<FileEntry>> {
        if file_type.is_symlink() {
            let resolution = self.resolver.resolve_link(path)?;
            if resolution.is_dangling() {
                debug!(link = %path.display(), target = %resolution.target.display(), "skipping dangling symlink");
                return Ok(None);
            }
            if resolution.is_dir() {
                let target = self.resolver.canonicalize(&resolution.target)?;
                return Ok(Some(FileEntry {
                    path: target,
                    kind: EntryKind::Directory,
                }));
            }
            if resolution.is_file() {
                // Targets may pass through directory links; report the real path.
                let target = self.resolver.canonicalize(&resolution.target)?;
                return Ok(Some(FileEntry {
                    path: target,
                    kind: EntryKind::File,
                }));
            }
            return Ok(None);
        }

        if file_type.is_dir() {
            Ok(Some(FileEntry {
                path: path.to_path_buf(),
                kind: EntryKind::Directory,
            }))
        } else if file_type.is_file() {
            Ok(Some(FileEntry {
                path: path.to_path_buf(),
                kind: EntryKind::File,
            }))
        } else {
            // sockets, fifos, devices
            Ok(None)
        }
    }
}

fn dedup_preserving_order(files: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::with_capacity(files.len());
    files
        .into_iter()
        .filter(|path| seen.insert(path.clone()))
        .collect()
}
