//! Filename cleanup for comic and e-book files.
//!
//! A raw filename is read as `core [-- chunk] [[tag]] [from source] .ext`,
//! where the three bracketed segments are optional noise appended by
//! scanners and download sites. The core title is the shortest prefix that
//! still lets the rest of the name parse as noise, so everything that looks
//! like noise is dropped.
//!
//! # Examples
//!
//! ```
//! use comictidy::cleanup::{ComicExtension, clean_filename};
//!
//! let cleaned =
//!     clean_filename("Naruto T02 -- a1b2c3 [Scan-1830] from Anna's Archive.cbz").unwrap();
//! assert_eq!(cleaned.core, "Naruto T02");
//! assert_eq!(cleaned.extension, ComicExtension::Cbz);
//! ```

use std::fmt;
use std::iter;
use thiserror::Error;

/// A file extension the organizer knows how to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComicExtension {
    /// RAR-packed comic archive
    Cbr,
    /// ZIP-packed comic archive
    Cbz,
    Pdf,
    Epub,
    /// Plain RAR archive
    Rar,
    /// Kindle format
    Azw3,
}

impl ComicExtension {
    /// Every supported extension.
    pub const ALL: [ComicExtension; 6] = [
        ComicExtension::Cbr,
        ComicExtension::Cbz,
        ComicExtension::Pdf,
        ComicExtension::Epub,
        ComicExtension::Rar,
        ComicExtension::Azw3,
    ];

    /// Looks up an extension (without its dot), ignoring case.
    ///
    /// ```
    /// use comictidy::cleanup::ComicExtension;
    ///
    /// assert_eq!(ComicExtension::from_extension("CBZ"), Some(ComicExtension::Cbz));
    /// assert_eq!(ComicExtension::from_extension("txt"), None);
    /// ```
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(ext))
    }

    /// Returns the lower-case extension without the leading dot.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComicExtension::Cbr => "cbr",
            ComicExtension::Cbz => "cbz",
            ComicExtension::Pdf => "pdf",
            ComicExtension::Epub => "epub",
            ComicExtension::Rar => "rar",
            ComicExtension::Azw3 => "azw3",
        }
    }
}

impl fmt::Display for ComicExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a filename could not be turned into a comic name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    /// Not a comic file at all. Callers skip these without a diagnostic.
    #[error("unsupported file type: {file_name}")]
    UnrecognizedExtension { file_name: String },
    /// A comic extension, but no usable title could be extracted.
    #[error("no match for '{file_name}': {reason}")]
    MalformedName { file_name: String, reason: String },
}

impl NameError {
    pub(crate) fn malformed(file_name: &str, reason: impl Into<String>) -> Self {
        NameError::MalformedName {
            file_name: file_name.to_string(),
            reason: reason.into(),
        }
    }

    fn unrecognized(file_name: &str) -> Self {
        NameError::UnrecognizedExtension {
            file_name: file_name.to_string(),
        }
    }
}

/// The result of stripping extension and noise from a raw filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedName {
    /// Core title, trimmed, original case.
    pub core: String,
    pub extension: ComicExtension,
}

/// Strips the extension and any trailing noise segments from `raw`.
///
/// Returns [`NameError::UnrecognizedExtension`] for anything that is not a
/// comic file, and [`NameError::MalformedName`] when the name has a comic
/// extension but no title can be recovered from it.
pub fn clean_filename(raw: &str) -> Result<CleanedName, NameError> {
    let (stem, ext) = split_extension(raw).ok_or_else(|| NameError::unrecognized(raw))?;
    let extension =
        ComicExtension::from_extension(ext).ok_or_else(|| NameError::unrecognized(raw))?;

    let core_end = shortest_core(stem)
        .ok_or_else(|| NameError::malformed(raw, "title cannot be separated from its suffix"))?;
    let core = stem[..core_end].trim();
    if core.is_empty() {
        return Err(NameError::malformed(raw, "title is blank"));
    }

    Ok(CleanedName {
        core: core.to_string(),
        extension,
    })
}

/// Splits at the last dot. Leading dots belong to the name, so `.cbz` has
/// no extension.
fn split_extension(raw: &str) -> Option<(&str, &str)> {
    let dot = raw.rfind('.')?;
    let stem = &raw[..dot];
    if stem.chars().all(|c| c == '.') {
        return None;
    }
    Some((stem, &raw[dot + 1..]))
}

/// Byte length of the shortest non-empty prefix of `stem` whose remainder
/// parses as noise. The core may not span a newline.
fn shortest_core(stem: &str) -> Option<usize> {
    for (start, c) in stem.char_indices() {
        if c == '\n' {
            return None;
        }
        let end = start + c.len_utf8();
        if is_noise_tail(&stem[end..]) {
            return Some(end);
        }
    }
    None
}

/// True when `tail` is `[-- chunk] [[tag]] [from source]` followed only by
/// whitespace, each segment optional but in that order.
fn is_noise_tail(tail: &str) -> bool {
    iter::once(0)
        .chain(metadata_ends(tail, 0))
        .any(|after_metadata| {
            iter::once(after_metadata)
                .chain(tag_ends(tail, after_metadata))
                .any(|after_tag| {
                    iter::once(after_tag)
                        .chain(attribution_ends(tail, after_tag))
                        .any(|after_attribution| is_blank(&tail[after_attribution..]))
                })
        })
}

/// Possible end offsets of a `-- chunk` segment starting at `from`.
fn metadata_ends(s: &str, from: usize) -> Vec<usize> {
    let start = skip_whitespace(s, from);
    if !s[start..].starts_with("--") {
        return Vec::new();
    }
    text_ends(s, start + 2)
}

/// Possible end offsets of a `[tag]` segment starting at `from`. The tag
/// may contain brackets itself but not a newline.
fn tag_ends(s: &str, from: usize) -> Vec<usize> {
    let start = skip_whitespace(s, from);
    if !s[start..].starts_with('[') {
        return Vec::new();
    }
    let inner = start + 1;
    s[inner..]
        .char_indices()
        .take_while(|&(_, c)| c != '\n')
        .filter(|&(_, c)| c == ']')
        .map(|(i, _)| inner + i + 1)
        .collect()
}

/// Possible end offsets of a `from source` segment starting at `from`.
/// The word must be followed by whitespace. Directly after the core it must
/// also be preceded by whitespace; after a tag or chunk it may touch it.
fn attribution_ends(s: &str, from: usize) -> Vec<usize> {
    let start = skip_whitespace(s, from);
    if from == 0 && start == from {
        return Vec::new();
    }
    let word_end = start + "from".len();
    if !s
        .get(start..word_end)
        .is_some_and(|word| word.eq_ignore_ascii_case("from"))
    {
        return Vec::new();
    }

    let gap_end = skip_whitespace(s, word_end);
    s[word_end..gap_end]
        .char_indices()
        .map(|(i, c)| word_end + i + c.len_utf8())
        .flat_map(|source_start| text_ends(s, source_start))
        .collect()
}

/// End offsets of every non-empty run of characters other than `.` and
/// newline beginning at `from`.
fn text_ends(s: &str, from: usize) -> Vec<usize> {
    s[from..]
        .char_indices()
        .take_while(|&(_, c)| c != '.' && c != '\n')
        .map(|(i, c)| from + i + c.len_utf8())
        .collect()
}

fn skip_whitespace(s: &str, from: usize) -> usize {
    let rest = &s[from..];
    from + (rest.len() - rest.trim_start().len())
}

fn is_blank(s: &str) -> bool {
    s.chars().all(char::is_whitespace)
}
