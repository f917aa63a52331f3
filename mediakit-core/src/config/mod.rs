//! Configuration structures and constants for the mediakit-core library.
//!
//! Every operation takes an explicit, fully-typed configuration value. Fields
//! carry defaults so callers only set what they want to change.

mod builder;

use std::collections::BTreeSet;
use std::path::PathBuf;

pub use builder::RenameConfigBuilder;

// ============================================================================
// EXTERNAL TOOLS
// ============================================================================

/// Default ffmpeg binary, resolved through `PATH`.
pub const DEFAULT_FFMPEG: &str = "ffmpeg";

/// Default ffprobe binary, resolved through `PATH`.
pub const DEFAULT_FFPROBE: &str = "ffprobe";

/// Locations of the external encoder and prober binaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from(DEFAULT_FFMPEG),
            ffprobe: PathBuf::from(DEFAULT_FFPROBE),
        }
    }
}

// ============================================================================
// QUALITY CONTROL
// ============================================================================

/// Containers that editors commonly fail to import.
pub const DEFAULT_INCOMPATIBLE_CONTAINERS: &[&str] = &[".mkv", ".webm", ".ogv", ".ogg", ".flv"];

/// Video codecs that editors commonly fail to decode.
pub const DEFAULT_INCOMPATIBLE_CODECS: &[&str] = &["vp8", "vp9", "av1", "theora"];

/// Image formats that are likely unusable downstream.
pub const DEFAULT_INCOMPATIBLE_IMAGES: &[&str] = &[".webp", ".heic", ".avif"];

/// Video extensions picked up by the QC scanner.
pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] = &[
    ".mp4", ".mov", ".avi", ".mkv", ".webm", ".flv", ".wmv", ".m4v", ".ts", ".mts", ".m2ts",
];

/// File name of the QC report written into a scanned directory.
pub const DEFAULT_REPORT_NAME: &str = "QC_报告.txt";

/// Suffix appended to a scanned file's stem to name its report.
pub const REPORT_SUFFIX: &str = "_QC_报告";

/// Named resolution thresholds accepted wherever a `WxH` string is expected.
pub const RESOLUTION_PRESETS: &[(&str, &str)] = &[
    ("4k", "3840x2160"),
    ("2k", "2560x1440"),
    ("1080p", "1920x1080"),
    ("720p", "1280x720"),
    ("480p", "854x480"),
];

/// Resolves a resolution preset name (`1080p`, `4k`, ...) to its `WxH` form.
///
/// Unknown values are returned untouched so custom `WxH` strings pass through.
/// `none` and the empty string disable the threshold.
pub fn resolve_resolution(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return String::new();
    }
    RESOLUTION_PRESETS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(trimmed))
        .map(|(_, res)| (*res).to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Rule set applied to every scanned file.
///
/// Threshold fields set to zero or empty are disabled. Empty blacklist sets
/// fall back to the built-in defaults.
#[derive(Debug, Clone)]
pub struct QcRules {
    /// Bitrate ceiling in kbps (0 disables the rule)
    pub max_bitrate_kbps: u64,

    /// Bitrate floor in kbps (0 disables the rule)
    pub min_bitrate_kbps: u64,

    /// Resolution ceiling as `WxH`; unparsable values are ignored
    pub max_resolution: String,

    /// Resolution floor as `WxH`; unparsable values are ignored
    pub min_resolution: String,

    /// Flag editor-unfriendly containers and codecs
    pub check_video_compat: bool,

    /// Flag image formats that are likely unusable
    pub check_image_compat: bool,

    /// Compare file signatures against extensions
    pub check_signature: bool,

    /// Container blacklist (dot-prefixed, lowercase)
    pub incompatible_containers: BTreeSet<String>,

    /// Codec blacklist (lowercase)
    pub incompatible_codecs: BTreeSet<String>,

    /// Image format blacklist (dot-prefixed, lowercase)
    pub incompatible_images: BTreeSet<String>,

    /// Video extensions to scan (dot-prefixed, lowercase)
    pub video_extensions: BTreeSet<String>,
}

impl Default for QcRules {
    fn default() -> Self {
        Self {
            max_bitrate_kbps: 0,
            min_bitrate_kbps: 0,
            max_resolution: String::new(),
            min_resolution: String::new(),
            check_video_compat: true,
            check_image_compat: true,
            check_signature: true,
            incompatible_containers: BTreeSet::new(),
            incompatible_codecs: BTreeSet::new(),
            incompatible_images: BTreeSet::new(),
            video_extensions: to_set(DEFAULT_VIDEO_EXTENSIONS),
        }
    }
}

impl QcRules {
    /// Container blacklist in effect (custom set, else the default).
    pub fn effective_containers(&self) -> BTreeSet<String> {
        or_default(&self.incompatible_containers, DEFAULT_INCOMPATIBLE_CONTAINERS)
    }

    /// Codec blacklist in effect (custom set, else the default).
    pub fn effective_codecs(&self) -> BTreeSet<String> {
        or_default(&self.incompatible_codecs, DEFAULT_INCOMPATIBLE_CODECS)
    }

    /// Image blacklist in effect (custom set, else the default).
    pub fn effective_images(&self) -> BTreeSet<String> {
        or_default(&self.incompatible_images, DEFAULT_INCOMPATIBLE_IMAGES)
    }

    /// Image extensions the scanner picks up: the defaults plus any custom ones.
    pub fn scanned_image_extensions(&self) -> BTreeSet<String> {
        let mut set = to_set(DEFAULT_INCOMPATIBLE_IMAGES);
        set.extend(self.incompatible_images.iter().cloned());
        set
    }
}

fn to_set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn or_default(custom: &BTreeSet<String>, default: &[&str]) -> BTreeSet<String> {
    if custom.is_empty() {
        to_set(default)
    } else {
        custom.clone()
    }
}

// ============================================================================
// BATCH RENAME
// ============================================================================

/// Default output folder for copy/move renames when none is configured.
pub const DEFAULT_RENAME_OUTPUT: &str = "rename_output";

/// Default image extensions for the renamer.
pub const DEFAULT_RENAME_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg"];

/// Default video extensions for the renamer.
pub const DEFAULT_RENAME_VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov"];

/// Default label used for image file names.
pub const DEFAULT_IMAGE_LABEL: &str = "图片";

/// Default label used for video file names.
pub const DEFAULT_VIDEO_LABEL: &str = "视频";

/// How renamed files are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameMode {
    /// Rename inside the source directory
    InPlace,
    /// Copy into the output directory under the new name
    Copy,
    /// Move into the output directory under the new name
    Move,
}

/// Which media classes are renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameTarget {
    Images,
    Videos,
    Both,
}

impl RenameTarget {
    pub fn includes_images(self) -> bool {
        matches!(self, RenameTarget::Images | RenameTarget::Both)
    }

    pub fn includes_videos(self) -> bool {
        matches!(self, RenameTarget::Videos | RenameTarget::Both)
    }
}

/// Configuration for one batch rename run.
///
/// Extension sets are always lowercase and dot-free; use
/// [`RenameConfigBuilder`] to construct one from user input.
#[derive(Debug, Clone)]
pub struct RenameConfig {
    pub mode: RenameMode,

    /// Output base for copy/move; `None` means `{root}/rename_output`
    pub output_dir: Option<PathBuf>,

    pub target: RenameTarget,

    pub image_extensions: BTreeSet<String>,

    pub video_extensions: BTreeSet<String>,

    /// Walk subdirectories and prefix names with their folder path
    pub recursive: bool,

    /// Cut each folder name at its first underscore before using it as a prefix
    pub truncate_at_underscore: bool,

    pub image_label: String,

    pub video_label: String,
}

impl Default for RenameConfig {
    fn default() -> Self {
        RenameConfigBuilder::new().build()
    }
}

// ============================================================================
// LIST PARSING
// ============================================================================

/// Normalizes extensions to lowercase without a leading dot, dropping empties.
pub fn normalize_extensions<I, S>(extensions: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    extensions
        .into_iter()
        .filter_map(|ext| {
            let ext = ext.as_ref().trim().to_lowercase();
            let ext = ext.strip_prefix('.').unwrap_or(&ext).to_string();
            (!ext.is_empty()).then_some(ext)
        })
        .collect()
}

/// Parses a comma separated list into a lowercase set.
///
/// When `prefix` is non-empty every item is guaranteed to start with it
/// (used to turn `mkv,webm` into `.mkv,.webm`). Blank input yields an empty set.
pub fn parse_comma_list(value: &str, prefix: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .map(|item| {
            if prefix.is_empty() || item.starts_with(prefix) {
                item
            } else {
                format!("{prefix}{item}")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comma_list() {
        assert!(parse_comma_list("", "").is_empty());
        assert!(parse_comma_list("   ", ".").is_empty());
        assert_eq!(
            parse_comma_list(" MKV ,webm,,.flv ", "."),
            to_set(&[".mkv", ".webm", ".flv"])
        );
        assert_eq!(parse_comma_list("VP9,av1", ""), to_set(&["vp9", "av1"]));
    }

    #[test]
    fn test_normalize_extensions() {
        let set = normalize_extensions([".PNG", "jpg", " .Jpeg ", "", "."]);
        assert_eq!(set, to_set(&["png", "jpg", "jpeg"]));
    }

    #[test]
    fn test_resolve_resolution() {
        assert_eq!(resolve_resolution("1080p"), "1920x1080");
        assert_eq!(resolve_resolution("4K"), "3840x2160");
        assert_eq!(resolve_resolution("none"), "");
        assert_eq!(resolve_resolution("1000x500"), "1000x500");
        assert_eq!(resolve_resolution("garbage"), "garbage");
    }

    #[test]
    fn test_effective_sets_fall_back_to_defaults() {
        let mut rules = QcRules::default();
        assert!(rules.effective_containers().contains(".mkv"));
        assert!(rules.effective_codecs().contains("vp9"));

        rules.incompatible_images = to_set(&[".png"]);
        assert_eq!(rules.effective_images(), to_set(&[".png"]));
        let scanned = rules.scanned_image_extensions();
        assert!(scanned.contains(".png"));
        assert!(scanned.contains(".webp"));
    }
}
