use std::collections::HashSet;
use std::fs::{self, Metadata};
use std::path::{Component, Path, PathBuf};

use tracing::trace;

use super::error::{DiscoveryError, Result};

/// Final target of a symlink chain.
///
/// `metadata` is `None` when the chain ends at a path that does not exist
/// (a dangling link); the caller skips such links silently.
#[derive(Debug, Clone)]
pub struct SymlinkResolution {
    pub target: PathBuf,
    pub metadata: Option<Metadata>,
}

impl SymlinkResolution {
    pub fn is_dangling(&self) -> bool {
        self.metadata.is_none()
    }

    pub fn is_dir(&self) -> bool {
        self.metadata.as_ref().is_some_and(Metadata::is_dir)
    }

    pub fn is_file(&self) -> bool {
        self.metadata.as_ref().is_some_and(Metadata::is_file)
    }
}

/// Absolute-path, canonicalization and symlink-chain resolution used by the crawler.
#[derive(Debug, Clone, Default)]
pub struct PathResolver;

impl PathResolver {
    pub fn new() -> Self {
        Self
    }

    /// Make `path` absolute against the current directory and collapse `.`/`..` lexically.
    pub fn absolute(&self, path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            return Ok(normalize_lexically(path));
        }
        let cwd = std::env::current_dir().map_err(|e| DiscoveryError::io(path, e))?;
        Ok(normalize_lexically(&cwd.join(path)))
    }

    /// Fully resolved, symlink-free form of an existing path.
    pub fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        fs::canonicalize(path).map_err(|e| DiscoveryError::io(path, e))
    }

    /// Follow `link` until the chain reaches something that is not a symlink,
    /// or a target that does not exist.
    ///
    /// Each stored target is resolved relative to the directory holding the
    /// link that stores it. A chain that loops back onto itself never reaches
    /// a real target and is reported as dangling. Errors other than "not
    /// found" are returned to the caller.
    pub fn resolve_link(&self, link: &Path) -> Result<SymlinkResolution> {
        let mut current = link.to_path_buf();
        let mut chain = HashSet::new();

        loop {
            let stored = fs::read_link(&current).map_err(|e| DiscoveryError::io(&current, e))?;
            let base = current.parent().unwrap_or_else(|| Path::new("/"));
            let target = normalize_lexically(&base.join(stored));

            match fs::symlink_metadata(&target) {
                Ok(metadata) if metadata.file_type().is_symlink() => {
                    if !chain.insert(target.clone()) {
                        trace!(link = %link.display(), "symlink chain loops, treating as dangling");
                        return Ok(SymlinkResolution {
                            target,
                            metadata: None,
                        });
                    }
                    current = target;
                }
                Ok(metadata) => {
                    return Ok(SymlinkResolution {
                        target,
                        metadata: Some(metadata),
                    })
                }
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    return Ok(SymlinkResolution {
                        target,
                        metadata: None,
                    })
                }
                Err(err) => return Err(DiscoveryError::io(&target, err)),
            }
        }
    }
}

/// Collapse `.` and `..` components without touching the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                let last = normalized.components().next_back();
                let at_root = matches!(last, Some(Component::RootDir) | Some(Component::Prefix(_)));
                let can_pop = matches!(last, Some(Component::Normal(_)));
                if can_pop {
                    normalized.pop();
                } else if !at_root {
                    normalized.push("..");
                }
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}
