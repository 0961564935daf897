//! Output formatting and styling module.
//!
//! Provides a centralized interface for all human-facing CLI output:
//! colored status lines, the progress bar and the per-series summary table.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Progress bars for runs
/// - Summary tables with per-series statistics
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use comictidy::output::OutputFormatter;
    /// OutputFormatter::success("Moved 'Bleach v5.epub' → 'Bleach/Bleach – Vol 5.epub'");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    ///
    /// # Arguments
    ///
    /// * `header` - The header text
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates a progress bar for a run over `total` files.
    ///
    /// The bar draws on stderr and stays hidden when stderr is not a
    /// terminal.
    ///
    /// # Arguments
    ///
    /// * `total` - Number of files the run will look at
    ///
    /// # Returns
    ///
    /// A styled progress bar ready to be incremented once per file
    ///
    /// # Example
    ///
    /// ```no_run
    /// use comictidy::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(12);
    /// pb.inc(1);
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// Prints a summary table with file counts by series.
    ///
    /// # Arguments
    ///
    /// * `series_counts` - Number of files moved into each series directory
    /// * `total_files` - Total number of files moved
    ///
    /// # Example
    ///
    /// ```no_run
    /// use comictidy::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert("Naruto".to_string(), 3);
    /// counts.insert("One Piece".to_string(), 1);
    /// OutputFormatter::summary_table(&counts, 4);
    /// ```
    pub fn summary_table(series_counts: &BTreeMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let max_series_len = series_counts
            .keys()
            .map(|name| name.chars().count())
            .max()
            .unwrap_or(0)
            .max(6); // At least "Series" width

        println!(
            "{:<width$} | {}",
            "Series".bold(),
            "Files".bold(),
            width = max_series_len
        );
        println!("{}", "-".repeat(max_series_len + 10));

        for (series, count) in series_counts {
            println!(
                "{:<width$} | {} {}",
                series,
                count.to_string().green(),
                file_word(*count),
                width = max_series_len
            );
        }

        println!("{}", "-".repeat(max_series_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            file_word(total_files),
            width = max_series_len
        );
    }
}

fn file_word(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
