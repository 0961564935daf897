//! Canonical comic names built from raw filenames.
//!
//! This module ties [`clean_filename`] and [`split_series`] together and
//! decides where a file belongs: a directory named after the series, and a
//! filename of the form `Series – Vol N.ext` (or `Series.ext` when there is
//! no volume number).
//!
//! # Examples
//!
//! ```
//! use comictidy::comic_name::ComicName;
//!
//! let name = ComicName::parse("Naruto T02 -- a1b2c3 [Scan-1830] from Anna's Archive.cbz").unwrap();
//! assert_eq!(name.dir_name(), "Naruto");
//! assert_eq!(name.file_name(), "Naruto – Vol 2.cbz");
//!
//! let name = ComicName::parse("One Piece.pdf").unwrap();
//! assert_eq!(name.file_name(), "One Piece.pdf");
//! ```

use crate::cleanup::{ComicExtension, NameError, clean_filename};
use crate::series::{SeriesSplit, VolumeNumber, split_series};
use std::path::{Path, PathBuf};

/// Separates the series from the volume label in generated filenames.
pub const VOLUME_DASH: char = '\u{2013}';

/// A parsed comic filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComicName {
    series: String,
    volume: Option<VolumeNumber>,
    extension: ComicExtension,
}

impl ComicName {
    /// Parses a raw filename into its series, volume and extension.
    ///
    /// Fails with [`NameError::UnrecognizedExtension`] for non-comic files
    /// and with [`NameError::MalformedName`] when no usable series name is
    /// left, including series that cannot name a directory (`.` and `..`).
    pub fn parse(raw: &str) -> Result<Self, NameError> {
        let cleaned = clean_filename(raw)?;
        let SeriesSplit { series, volume } = split_series(&cleaned.core);

        if matches!(series.as_str(), "" | "." | "..") {
            return Err(NameError::malformed(
                raw,
                format!("'{}' cannot be used as a directory name", series),
            ));
        }

        Ok(Self {
            series,
            volume,
            extension: cleaned.extension,
        })
    }

    pub fn series(&self) -> &str {
        &self.series
    }

    pub fn volume(&self) -> Option<&VolumeNumber> {
        self.volume.as_ref()
    }

    pub fn extension(&self) -> ComicExtension {
        self.extension
    }

    /// Name of the directory this comic belongs in.
    pub fn dir_name(&self) -> &str {
        &self.series
    }

    /// Canonical filename inside the series directory.
    pub fn file_name(&self) -> String {
        match &self.volume {
            Some(volume) => format!(
                "{} {} Vol {}.{}",
                self.series, VOLUME_DASH, volume, self.extension
            ),
            None => format!("{}.{}", self.series, self.extension),
        }
    }

    /// Full destination path for this comic under `base_path`.
    pub fn destination(&self, base_path: &Path) -> PathBuf {
        base_path.join(self.dir_name()).join(self.file_name())
    }
}
