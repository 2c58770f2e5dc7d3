use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, trace};

/// A directory on the way up could not be listed.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("cannot read directory {}: {source}", .dir.display())]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot list entries of {}: {source}", .dir.display())]
    ReadEntry {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WalkError {
    /// The directory whose listing failed.
    pub fn dir(&self) -> &Path {
        match self {
            Self::ReadDir { dir, .. } | Self::ReadEntry { dir, .. } => dir,
        }
    }

    pub fn kind(&self) -> io::ErrorKind {
        self.io_error().kind()
    }

    pub fn io_error(&self) -> &io::Error {
        match self {
            Self::ReadDir { source, .. } | Self::ReadEntry { source, .. } => source,
        }
    }
}

/// Walk from `start` toward the filesystem root, passing the full path of every
/// entry at each level to `visit_entry`.
/// Returns the first path `visit_entry` accepts, or `None` once the root is reached.
pub fn walk_up(
    start: impl AsRef<Path>,
    visit_entry: impl FnMut(&Path) -> bool,
) -> Result<Option<PathBuf>, WalkError> {
    walk_up_guarded(start, visit_entry, |_| true)
}

/// Like [`walk_up`], but `visit_parent` is asked before every ascent.
/// It receives the level that was just scanned; returning `false` ends the walk with `None`.
///
/// `start` may be a file, in which case the walk begins in its containing
/// directory. Entries of a level are visited sorted by file name.
///
/// Any directory that cannot be listed aborts the walk with that error; no
/// level above it is visited.
pub fn walk_up_guarded(
    start: impl AsRef<Path>,
    mut visit_entry: impl FnMut(&Path) -> bool,
    mut visit_parent: impl FnMut(&Path) -> bool,
) -> Result<Option<PathBuf>, WalkError> {
    let mut current = start_dir(start.as_ref());

    loop {
        debug!(dir = %current.display(), "scanning level");
        for entry in list_dir(&current)? {
            trace!(entry = %entry.display(), "visiting entry");
            if visit_entry(&entry) {
                debug!(found = %entry.display(), "entry matched");
                return Ok(Some(entry));
            }
        }

        if is_top(&current) {
            debug!(dir = %current.display(), "reached filesystem root");
            return Ok(None);
        }

        let parent = parent_dir(&current);
        if parent == current {
            debug!(dir = %current.display(), "no parent left to visit");
            return Ok(None);
        }

        if !visit_parent(&current) {
            debug!(dir = %current.display(), "ascent declined");
            return Ok(None);
        }

        current = parent;
    }
}

/// Nearest directory for `path`: itself when it is a directory (or cannot be
/// stat'ed), its parent when it is anything else.
fn start_dir(path: &Path) -> PathBuf {
    let dir = match fs::metadata(path) {
        Ok(meta) if !meta.is_dir() => parent_dir(path),
        _ => path.to_path_buf(),
    };
    // Drops trailing separators so only a real root ends in one.
    dir.components().collect()
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => PathBuf::from("."),
        Some(parent) => parent.to_path_buf(),
        None => path.to_path_buf(),
    }
}

/// A path is the top of the filesystem when its text ends in a separator.
fn is_top(path: &Path) -> bool {
    path.as_os_str()
        .as_encoded_bytes()
        .last()
        .is_some_and(|&b| std::path::is_separator(b as char))
}

fn list_dir(dir: &Path) -> Result<Vec<PathBuf>, WalkError> {
    let reader = fs::read_dir(dir).map_err(|source| WalkError::ReadDir {
        dir: dir.to_path_buf(),
        source,
    })?;

    let mut names = reader
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<io::Result<Vec<_>>>()
        .map_err(|source| WalkError::ReadEntry {
            dir: dir.to_path_buf(),
            source,
        })?;
    names.sort();

    // `./name` and `name` compare unequal as paths; keep the cleaner form.
    if dir == Path::new(".") {
        return Ok(names.into_iter().map(PathBuf::from).collect());
    }
    Ok(names.into_iter().map(|name| dir.join(name)).collect())
}
