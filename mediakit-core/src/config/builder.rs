// ============================================================================
// mediakit-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for RenameConfig
//
// RenameConfig carries several extension sets that must stay normalized
// (lowercase, no leading dot). The builder is the one place user-supplied
// extension lists are accepted, so the invariant holds for every config that
// reaches the rename engine.

use std::path::PathBuf;

use super::{
    normalize_extensions, RenameConfig, RenameMode, RenameTarget, DEFAULT_IMAGE_LABEL,
    DEFAULT_RENAME_IMAGE_EXTENSIONS, DEFAULT_RENAME_VIDEO_EXTENSIONS, DEFAULT_VIDEO_LABEL,
};

/// Builder for creating RenameConfig instances.
///
/// # Examples
///
/// ```rust
/// use mediakit_core::config::{RenameConfigBuilder, RenameMode, RenameTarget};
///
/// let config = RenameConfigBuilder::new()
///     .mode(RenameMode::Copy)
///     .target(RenameTarget::Images)
///     .image_extensions([".PNG", "jpg", "jpeg"])
///     .recursive(false)
///     .build();
///
/// assert!(config.image_extensions.contains("png"));
/// ```
#[derive(Debug, Clone)]
pub struct RenameConfigBuilder {
    mode: RenameMode,
    output_dir: Option<PathBuf>,
    target: RenameTarget,
    image_extensions: Vec<String>,
    video_extensions: Vec<String>,
    recursive: bool,
    truncate_at_underscore: bool,
    image_label: String,
    video_label: String,
}

impl Default for RenameConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenameConfigBuilder {
    /// Creates a builder holding the default rename settings.
    pub fn new() -> Self {
        Self {
            mode: RenameMode::InPlace,
            output_dir: None,
            target: RenameTarget::Both,
            image_extensions: to_vec(DEFAULT_RENAME_IMAGE_EXTENSIONS),
            video_extensions: to_vec(DEFAULT_RENAME_VIDEO_EXTENSIONS),
            recursive: true,
            truncate_at_underscore: true,
            image_label: DEFAULT_IMAGE_LABEL.to_string(),
            video_label: DEFAULT_VIDEO_LABEL.to_string(),
        }
    }

    pub fn mode(mut self, mode: RenameMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the output base used by copy and move modes.
    pub fn output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }

    pub fn target(mut self, target: RenameTarget) -> Self {
        self.target = target;
        self
    }

    /// Replaces the image extension list. Case and leading dots are ignored.
    pub fn image_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.image_extensions = extensions.into_iter().map(|e| e.as_ref().to_string()).collect();
        self
    }

    /// Replaces the video extension list. Case and leading dots are ignored.
    pub fn video_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.video_extensions = extensions.into_iter().map(|e| e.as_ref().to_string()).collect();
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn truncate_at_underscore(mut self, truncate: bool) -> Self {
        self.truncate_at_underscore = truncate;
        self
    }

    /// Sets the labels used in generated names (`{label}_{index}`).
    pub fn labels(mut self, image_label: impl Into<String>, video_label: impl Into<String>) -> Self {
        self.image_label = image_label.into();
        self.video_label = video_label.into();
        self
    }

    /// Builds the configuration, normalizing every extension set.
    pub fn build(self) -> RenameConfig {
        RenameConfig {
            mode: self.mode,
            output_dir: self.output_dir,
            target: self.target,
            image_extensions: normalize_extensions(&self.image_extensions),
            video_extensions: normalize_extensions(&self.video_extensions),
            recursive: self.recursive,
            truncate_at_underscore: self.truncate_at_underscore,
            image_label: self.image_label,
            video_label: self.video_label,
        }
    }
}

fn to_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
