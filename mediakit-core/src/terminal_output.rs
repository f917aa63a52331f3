//! Simple terminal output functions for mediakit.
//!
//! This module provides the hierarchical output structure used by the CLI:
//! section headers, indented status lines, success/warning/error lines and
//! the capped error preview printed after every batch task. Output goes to
//! stdout; progress bars go to stderr and are hidden when it is not a terminal.

use std::io::IsTerminal;
use std::path::Path;

use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;

use crate::batch::error_preview;

/// Check if color should be used (respects NO_COLOR environment variable)
fn should_use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Print a section header (Level 1 - Main sections with cyan color)
pub fn print_section(title: &str) {
    println!();
    if should_use_color() {
        println!("===== {} =====", title.to_uppercase().cyan().bold());
    } else {
        println!("===== {} =====", title.to_uppercase());
    }
    println!();
}

/// Print a processing step (Level 2 - Subsections with 2 spaces indentation and bold)
pub fn print_processing(message: &str) {
    if should_use_color() {
        println!("  » {}", style(message).bold());
    } else {
        println!("  » {}", message);
    }
}

/// Formats `label: value` with the label padded to a fixed width.
pub fn format_status(label: &str, value: &str) -> String {
    const LABEL_WIDTH: usize = 15;
    let padding = LABEL_WIDTH.saturating_sub(label.chars().count()).max(1);
    format!("      {}:{}{}", label, " ".repeat(padding), value)
}

/// Print a status line (Level 4 - Primary info with 6 spaces indentation)
pub fn print_status(label: &str, value: &str, highlight: bool) {
    if should_use_color() && highlight {
        println!("{}", format_status(label, &style(value).bold().to_string()));
    } else {
        println!("{}", format_status(label, value));
    }
}

/// Print a success message (Level 2 - Success with 2 spaces indentation and green color)
pub fn print_success(message: &str) {
    if should_use_color() {
        println!("  ✓ {}", message.green());
    } else {
        println!("  ✓ {}", message);
    }
}

pub fn print_warning(message: &str) {
    if should_use_color() {
        println!("  ⚠ {}", message.yellow());
    } else {
        println!("  ⚠ {}", message);
    }
}

pub fn print_error(message: &str) {
    if should_use_color() {
        println!("  ✗ {}", message.red());
    } else {
        println!("  ✗ {}", message);
    }
}

/// Print a sub-item (Level 3 - Operations with 4 spaces indentation)
pub fn print_sub_item(message: &str) {
    println!("    {}", message);
}

/// Prints the success/failure counts of a batch task.
pub fn print_batch_summary(success: usize, failed: usize) {
    print_status("Succeeded", &success.to_string(), true);
    print_status("Failed", &failed.to_string(), failed > 0);
}

/// Prints at most the first few errors, then how many were left out.
pub fn print_error_preview(errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    let (shown, rest) = error_preview(errors);
    println!();
    print_error("Errors:");
    for err in shown {
        print_sub_item(err);
    }
    if rest > 0 {
        print_sub_item(&format!("... and {} more", rest));
    }
}

/// Progress bar for per-file batch work, drawn on stderr.
pub struct FileProgress {
    bar: ProgressBar,
}

impl FileProgress {
    /// Creates a bar that stays hidden until [`FileProgress::update`] learns the total.
    pub fn new(label: &str) -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{prefix}: [{bar:30}] {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##.");
        bar.set_style(style);
        bar.set_prefix(label.to_string());

        if !std::io::stderr().is_terminal() {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        Self { bar }
    }

    /// Moves to item `index` (1-based) of `total`, showing its file name.
    pub fn update(&self, index: usize, total: usize, path: &Path) {
        self.bar.set_length(total as u64);
        self.bar.set_position(index as u64);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.bar.set_message(name);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
