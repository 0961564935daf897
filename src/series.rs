//! Splits a cleaned title into its series name and volume number.
//!
//! A title such as `Naruto T02`, `Bleach v5` or `Saga - Volume 007` ends in
//! a volume marker (`T`, `v`, `Vol`, `Volume`, any case) followed by digits.
//! Everything before the marker is the series.
//!
//! ```
//! use comictidy::series::split_series;
//!
//! let split = split_series("Saga - Volume 007");
//! assert_eq!(split.series, "Saga");
//! assert_eq!(split.volume.unwrap().as_str(), "7");
//! ```

use std::fmt;

/// Markers that introduce a volume number. Longer spellings come first so
/// `Vol5` is not read as `V` followed by `ol5`.
const VOLUME_MARKERS: [&str; 4] = ["volume", "vol", "v", "t"];

/// A volume or issue number in canonical form: ASCII digits without
/// leading zeros, `"0"` for an all-zero run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VolumeNumber(String);

impl VolumeNumber {
    /// Canonicalizes a run of ASCII digits. Returns `None` if `digits` is
    /// empty or contains anything else.
    ///
    /// ```
    /// use comictidy::series::VolumeNumber;
    ///
    /// assert_eq!(VolumeNumber::from_digits("007").unwrap().as_str(), "7");
    /// assert_eq!(VolumeNumber::from_digits("000").unwrap().as_str(), "0");
    /// assert!(VolumeNumber::from_digits("1a").is_none());
    /// ```
    pub fn from_digits(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let trimmed = digits.trim_start_matches('0');
        let canonical = if trimmed.is_empty() { "0" } else { trimmed };
        Some(VolumeNumber(canonical.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VolumeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A title split into series and optional volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesSplit {
    /// Series name, trimmed.
    pub series: String,
    pub volume: Option<VolumeNumber>,
}

/// Splits `title` at the earliest point where the rest is a volume marker
/// and number running to the end of the string.
///
/// The series part is kept as short as possible, so only a trailing
/// marker+number splits the title; digits earlier in the name stay part of
/// the series. Without a split, the whole title is the series.
pub fn split_series(title: &str) -> SeriesSplit {
    for (start, c) in title.char_indices() {
        let end = start + c.len_utf8();
        if let Some(volume) = volume_suffix(&title[end..]) {
            return SeriesSplit {
                series: title[..end].trim().to_string(),
                volume: Some(volume),
            };
        }
    }

    SeriesSplit {
        series: title.trim().to_string(),
        volume: None,
    }
}

/// Parses `[sep]* marker [sep]* digits` spanning all of `rest`.
fn volume_suffix(rest: &str) -> Option<VolumeNumber> {
    let rest = rest.trim_start_matches(is_separator);
    VOLUME_MARKERS.iter().find_map(|marker| {
        let after_marker = strip_prefix_ignore_case(rest, marker)?;
        VolumeNumber::from_digits(after_marker.trim_start_matches(is_separator))
    })
}

/// Characters allowed between the series, the marker and the number.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '.' | '_' | '-')
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &s[prefix.len()..])
}
