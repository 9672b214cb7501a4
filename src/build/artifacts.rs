use serde::Deserialize;
use std::collections::hash_map::RandomState;
use std::fs;
use std::hash::{BuildHasher, Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::core::error::{DiscoveryError, Result};

/// How the host site is emitted; decides where client artifacts land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Static,
    Server,
    Hybrid,
}

/// Fresh `tmp-<token>` name for staging a client build.
pub fn temp_dir_name() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();

    let mut hasher = RandomState::new().build_hasher();
    nanos.hash(&mut hasher);
    std::process::id().hash(&mut hasher);

    format!("tmp-{}", to_base36(hasher.finish()))
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// Server and hybrid sites serve client assets from the client dir, static
/// sites from the output dir.
pub fn client_output_dir(mode: OutputMode, out_dir: &Path, client_dir: &Path) -> PathBuf {
    match mode {
        OutputMode::Server | OutputMode::Hybrid => client_dir.to_path_buf(),
        OutputMode::Static => out_dir.to_path_buf(),
    }
}

/// Drop a leading drive prefix such as `C:\` or `/C:/` from a URL-derived path.
pub fn strip_windows_drive(path: &str) -> &str {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let bytes = trimmed.as_bytes();
    if bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'\\' || bytes[2] == b'/')
    {
        &trimmed[3..]
    } else {
        path
    }
}

/// Move every immediate entry of `src_dir` into `dest_dir`, replacing what is
/// already there. Returns the number of entries moved.
pub fn move_artifacts(src_dir: &Path, dest_dir: &Path) -> Result<usize> {
    fs::create_dir_all(dest_dir).map_err(|e| DiscoveryError::io(dest_dir, e))?;

    let mut moved = 0;
    for entry in fs::read_dir(src_dir).map_err(|e| DiscoveryError::io(src_dir, e))? {
        let entry = entry.map_err(|e| DiscoveryError::io(src_dir, e))?;
        let source = entry.path();
        let dest = dest_dir.join(entry.file_name());
        move_item(&source, &dest)?;
        moved += 1;
    }

    info!(
        from = %src_dir.display(),
        to = %dest_dir.display(),
        entries = moved,
        "moved build artifacts"
    );
    Ok(moved)
}

fn move_item(source: &Path, dest: &Path) -> Result<()> {
    remove_existing(dest)?;

    // Try rename first (fast path for same filesystem)
    if fs::rename(source, dest).is_ok() {
        return Ok(());
    }

    debug!(source = %source.display(), "rename failed, copying instead");
    let metadata = fs::symlink_metadata(source).map_err(|e| DiscoveryError::io(source, e))?;
    if metadata.is_dir() {
        copy_dir_recursive(source, dest)?;
        fs::remove_dir_all(source).map_err(|e| DiscoveryError::io(source, e))?;
    } else {
        fs::copy(source, dest).map_err(|e| DiscoveryError::io(dest, e))?;
        fs::remove_file(source).map_err(|e| DiscoveryError::io(source, e))?;
    }
    Ok(())
}

fn remove_existing(dest: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(dest) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(DiscoveryError::io(dest, err)),
    };
    let removed = if metadata.is_dir() {
        fs::remove_dir_all(dest)
    } else {
        fs::remove_file(dest)
    };
    removed.map_err(|e| DiscoveryError::io(dest, e))
}

/// Recursively copy a directory (for cross-filesystem moves).
fn copy_dir_recursive(source: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(source).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            DiscoveryError::io(path, e.into())
        })?;
        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| DiscoveryError::io(&target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| DiscoveryError::io(&target, e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_dir_names_are_prefixed_and_distinct() {
        let a = temp_dir_name();
        let b = temp_dir_name();
        assert!(a.starts_with("tmp-"));
        assert!(a[4..].chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_ne!(a, b);
    }

    #[test]
    fn base36_encoding() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn drive_prefix_is_stripped() {
        assert_eq!(strip_windows_drive("/C:/site/dist/"), "site/dist/");
        assert_eq!(strip_windows_drive("D:\\site\\dist"), "site\\dist");
        assert_eq!(strip_windows_drive("/home/site/dist/"), "/home/site/dist/");
    }

    #[test]
    fn output_mode_picks_client_dir_for_servers() {
        let out = Path::new("/site/dist");
        let client = Path::new("/site/dist/client");
        assert_eq!(client_output_dir(OutputMode::Static, out, client), out);
        assert_eq!(client_output_dir(OutputMode::Server, out, client), client);
        assert_eq!(client_output_dir(OutputMode::Hybrid, out, client), client);
    }
}
