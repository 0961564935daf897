//! comictidy - sorts loose comic and e-book files into per-series directories
//!
//! This library parses comic filenames (stripping checksums, scan tags and
//! source attributions), splits them into series and volume number, and moves
//! each file into a directory named after its series under a canonical name.

pub mod cleanup;
pub mod cli;
pub mod comic_name;
pub mod file_organizer;
pub mod filesystem;
pub mod output;
pub mod series;

pub use cleanup::{ComicExtension, NameError, clean_filename};
pub use comic_name::ComicName;
pub use file_organizer::{FileOrganizer, OrganizeError, OrganizeResult, RunReport};
pub use filesystem::{Filesystem, LocalFs};
pub use series::{SeriesSplit, VolumeNumber, split_series};

pub use cli::{Args, run_cli};
