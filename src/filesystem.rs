//! Filesystem access for the organizer.
//!
//! The organizer never touches `std::fs` directly. It goes through the
//! [`Filesystem`] trait so the naming logic stays pure and failure paths can
//! be exercised without a misbehaving disk.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

/// The four filesystem operations an organization run needs.
pub trait Filesystem {
    /// Names of the regular files directly inside `dir`, sorted.
    /// Subdirectories and their contents are not listed.
    fn list_files(&self, dir: &Path) -> io::Result<Vec<OsString>>;

    /// Whether anything (file, directory, or dangling link) occupies `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Creates `path` and any missing parents. Succeeds if it already exists.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Moves `from` to `to`.
    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// [`Filesystem`] backed by the local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl Filesystem for LocalFs {
    fn list_files(&self, dir: &Path) -> io::Result<Vec<OsString>> {
        let mut names: Vec<OsString> = fs::read_dir(dir)?
            .flatten()
            .filter(|entry| entry.file_type().is_ok_and(|file_type| file_type.is_file()))
            .map(|entry| entry.file_name())
            .collect();
        names.sort();
        Ok(names)
    }

    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }
}
