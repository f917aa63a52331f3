// ============================================================================
// mediakit-cli/src/cli.rs
// ============================================================================
//
// COMMAND LINE INTERFACE: Argument structures parsed with clap
//
// KEY COMPONENTS:
// - Cli: Top-level parser with global options
// - Commands: One variant per subcommand
// - *Args: Per-subcommand arguments

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use mediakit_core::config::{RenameMode, RenameTarget};
use mediakit_core::notifications::{DEFAULT_NOTIFY_CONFIG_FILE, FEISHU_COLORS};

// ============================================================================
// TOP LEVEL
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "MediaKit: Media production toolkit",
    long_about = "Quality-checks deliverables, batch renames media, creates folders, \
                  converts images and drives ffmpeg for encode, remux and audio jobs."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output for troubleshooting
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory for log files (no log file when omitted)
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// ffmpeg binary
    #[arg(long, global = true, value_name = "PATH", env = "MEDIAKIT_FFMPEG", default_value = "ffmpeg")]
    pub ffmpeg: PathBuf,

    /// ffprobe binary
    #[arg(long, global = true, value_name = "PATH", env = "MEDIAKIT_FFPROBE", default_value = "ffprobe")]
    pub ffprobe: PathBuf,

    /// Notification preferences file
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        env = "MEDIAKIT_NOTIFY_CONFIG",
        default_value = DEFAULT_NOTIFY_CONFIG_FILE
    )]
    pub notify_config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan media files and write a quality report
    Qc(QcArgs),
    /// Rename images and videos after their folder
    Rename(RenameArgs),
    /// Create folders from a text list, one name per line
    Folders(FoldersArgs),
    /// Convert images to another format
    ConvertImages(ConvertImagesArgs),
    /// Repackage media into another container without re-encoding
    Remux(RemuxArgs),
    /// Encode a video with ffmpeg
    Encode(EncodeArgs),
    /// Replace a video's audio track
    ReplaceAudio(ReplaceAudioArgs),
    /// Extract the audio track from a media file
    ExtractAudio(ExtractAudioArgs),
    /// Manage task-complete notifications
    Notify {
        #[command(subcommand)]
        action: NotifyAction,
    },
}

impl Commands {
    /// Short name used in log file names.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Qc(_) => "qc",
            Commands::Rename(_) => "rename",
            Commands::Folders(_) => "folders",
            Commands::ConvertImages(_) => "convert_images",
            Commands::Remux(_) => "remux",
            Commands::Encode(_) => "encode",
            Commands::ReplaceAudio(_) => "replace_audio",
            Commands::ExtractAudio(_) => "extract_audio",
            Commands::Notify { .. } => "notify",
        }
    }
}

// ============================================================================
// QC
// ============================================================================

#[derive(Args, Debug)]
pub struct QcArgs {
    /// Directory (scanned recursively) or single file
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Report file (defaults to QC_报告.txt in the target directory)
    #[arg(short, long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Maximum video bitrate in kbps (0 disables)
    #[arg(long, value_name = "KBPS", default_value_t = 0)]
    pub max_bitrate: u64,

    /// Minimum video bitrate in kbps (0 disables)
    #[arg(long, value_name = "KBPS", default_value_t = 0)]
    pub min_bitrate: u64,

    /// Maximum resolution: 4k, 2k, 1080p, 720p, 480p or WxH
    #[arg(long, value_name = "RES")]
    pub max_resolution: Option<String>,

    /// Minimum resolution: 4k, 2k, 1080p, 720p, 480p or WxH
    #[arg(long, value_name = "RES")]
    pub min_resolution: Option<String>,

    /// Skip container and codec compatibility checks
    #[arg(long)]
    pub no_video_compat: bool,

    /// Skip image format compatibility checks
    #[arg(long)]
    pub no_image_compat: bool,

    /// Skip file signature checks
    #[arg(long)]
    pub no_signature: bool,

    /// Comma-separated incompatible containers (e.g. ".mkv,.webm")
    #[arg(long, value_name = "LIST")]
    pub containers: Option<String>,

    /// Comma-separated incompatible video codecs (e.g. "vp9,av1")
    #[arg(long, value_name = "LIST")]
    pub codecs: Option<String>,

    /// Comma-separated incompatible image formats (e.g. ".webp,.heic")
    #[arg(long, value_name = "LIST")]
    pub images: Option<String>,
}

// ============================================================================
// RENAME
// ============================================================================

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Rename files where they are
    InPlace,
    /// Copy renamed files into the output directory
    Copy,
    /// Move renamed files into the output directory
    Move,
}

impl From<ModeArg> for RenameMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::InPlace => RenameMode::InPlace,
            ModeArg::Copy => RenameMode::Copy,
            ModeArg::Move => RenameMode::Move,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetArg {
    Images,
    Videos,
    Both,
}

impl From<TargetArg> for RenameTarget {
    fn from(target: TargetArg) -> Self {
        match target {
            TargetArg::Images => RenameTarget::Images,
            TargetArg::Videos => RenameTarget::Videos,
            TargetArg::Both => RenameTarget::Both,
        }
    }
}

#[derive(Args, Debug)]
pub struct RenameArgs {
    /// Root directory
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    #[arg(short, long, value_enum, default_value = "in-place")]
    pub mode: ModeArg,

    /// Output directory for copy/move (defaults to ROOT/rename_output)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value = "both")]
    pub target: TargetArg,

    /// Comma-separated image extensions
    #[arg(long, value_name = "LIST", default_value = "png,jpg")]
    pub image_ext: String,

    /// Comma-separated video extensions
    #[arg(long, value_name = "LIST", default_value = "mp4,mov")]
    pub video_ext: String,

    /// Only rename files directly inside ROOT
    #[arg(long)]
    pub no_recursive: bool,

    /// Use whole folder names instead of the part before the first underscore
    #[arg(long)]
    pub keep_full_prefix: bool,

    /// Label for images in new names
    #[arg(long, value_name = "TEXT")]
    pub image_label: Option<String>,

    /// Label for videos in new names
    #[arg(long, value_name = "TEXT")]
    pub video_label: Option<String>,
}

// ============================================================================
// FOLDERS / IMAGES
// ============================================================================

#[derive(Args, Debug)]
pub struct FoldersArgs {
    /// Text file with one folder name per line
    #[arg(value_name = "LIST")]
    pub list: PathBuf,

    /// Parent directory for the new folders (defaults to the list's directory)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Prefix folders with 1_, 2_, ...
    #[arg(short, long)]
    pub number: bool,
}

#[derive(Args, Debug)]
pub struct ConvertImagesArgs {
    /// Images to convert
    #[arg(value_name = "FILES", required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Target format: png, jpg, jpeg, webp, bmp, gif, tiff, tif or ico
    #[arg(long = "to", value_name = "EXT", default_value = "png")]
    pub target: String,

    /// Output directory (defaults to each image's directory)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// JPEG quality
    #[arg(short, long, default_value_t = 95, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// Delete originals after a successful conversion
    #[arg(long)]
    pub delete_originals: bool,
}

// ============================================================================
// FFMPEG JOBS
// ============================================================================

#[derive(Args, Debug)]
pub struct RemuxArgs {
    /// Files to remux
    #[arg(value_name = "FILES", required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Target container: mp4, mkv, mov, ts, webm, mxf or avi
    #[arg(short, long, value_name = "FORMAT", default_value = "mp4")]
    pub format: String,

    /// Output directory (defaults to each file's directory)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Delete originals after a successful remux
    #[arg(long)]
    pub delete_originals: bool,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file (defaults to INPUT_encoded.mp4)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Quality preset: standard, ultra or nvenc
    #[arg(short, long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Video encoder (e.g. libx264, libx265, h264_nvenc, copy)
    #[arg(long, value_name = "ENCODER")]
    pub encoder: Option<String>,

    /// CRF (or CQ for NVENC encoders), 0-51
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(0..=51))]
    pub quality: Option<u32>,

    /// Target video bitrate (e.g. 8M); overrides --quality
    #[arg(long, value_name = "RATE")]
    pub bitrate: Option<String>,

    /// Encoder speed preset (e.g. medium, slow, p4)
    #[arg(long, value_name = "NAME")]
    pub speed: Option<String>,

    /// Output resolution: 4k, 2k, 1080p, 720p, 480p or WxH
    #[arg(long, value_name = "RES")]
    pub resolution: Option<String>,

    /// Output frame rate
    #[arg(long, value_name = "FPS")]
    pub fps: Option<u32>,

    #[arg(long, value_name = "ENCODER", default_value = "aac")]
    pub audio_encoder: String,

    #[arg(long, value_name = "RATE")]
    pub audio_bitrate: Option<String>,

    /// Subtitle file to burn in
    #[arg(long, value_name = "FILE")]
    pub subtitle: Option<PathBuf>,

    /// Extra ffmpeg arguments, split on whitespace
    #[arg(long, value_name = "ARGS", allow_hyphen_values = true)]
    pub extra: Option<String>,

    /// Print the ffmpeg command without running it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct ReplaceAudioArgs {
    #[arg(value_name = "VIDEO")]
    pub video: PathBuf,

    #[arg(value_name = "AUDIO")]
    pub audio: PathBuf,

    /// Output file (defaults to VIDEO_replaced with the same extension)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[arg(long, value_name = "ENCODER", default_value = "aac")]
    pub audio_encoder: String,

    #[arg(long, value_name = "RATE", default_value = "192k")]
    pub audio_bitrate: String,
}

#[derive(Args, Debug)]
pub struct ExtractAudioArgs {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file (defaults to INPUT_extract with an extension matching the encoder)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[arg(long, value_name = "ENCODER", default_value = "aac")]
    pub audio_encoder: String,

    #[arg(long, value_name = "RATE", default_value = "192k")]
    pub audio_bitrate: String,
}

// ============================================================================
// NOTIFY
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum NotifyAction {
    /// Print the current notification settings
    Show,
    /// Change settings and save them
    Update(NotifyUpdateArgs),
    /// Write the current settings (or the defaults) to the file
    Save,
    /// Delete the settings file
    Delete,
    /// Send a test notification on the configured channels
    Test {
        /// Task name used for {task}
        #[arg(long, default_value = "Test")]
        task: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct NotifyUpdateArgs {
    /// Send notifications automatically after each task
    #[arg(long, conflicts_with = "disable")]
    pub enable: bool,

    /// Stop sending automatic notifications
    #[arg(long)]
    pub disable: bool,

    #[arg(long, value_name = "URL")]
    pub feishu_webhook: Option<String>,

    #[arg(long, value_name = "TEXT")]
    pub feishu_title: Option<String>,

    /// Card content (lark_md); {task} is replaced by the task name
    #[arg(long, value_name = "TEXT")]
    pub feishu_content: Option<String>,

    #[arg(long, value_name = "COLOR", value_parser = clap::builder::PossibleValuesParser::new(FEISHU_COLORS))]
    pub feishu_color: Option<String>,

    #[arg(long, value_name = "URL")]
    pub webhook_url: Option<String>,

    /// JSON object of request headers
    #[arg(long, value_name = "JSON")]
    pub webhook_headers: Option<String>,

    /// JSON request body; {task} is replaced by the task name
    #[arg(long, value_name = "JSON")]
    pub webhook_body: Option<String>,

    /// ntfy topic URL (e.g. https://ntfy.sh/my-topic); empty clears it
    #[arg(long, value_name = "URL")]
    pub ntfy_topic: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_rename_defaults() {
        let cli = Cli::try_parse_from(["mediakit", "rename", "/media"]).unwrap();
        match cli.command {
            Commands::Rename(args) => {
                assert_eq!(args.mode, ModeArg::InPlace);
                assert_eq!(args.target, TargetArg::Both);
                assert_eq!(args.image_ext, "png,jpg");
                assert!(!args.no_recursive);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "mediakit", "folders", "list.txt", "--verbose", "--notify-config", "n.json",
        ])
        .unwrap();
        assert!(cli.global.verbose);
        assert_eq!(cli.global.notify_config, PathBuf::from("n.json"));
        assert_eq!(cli.command.name(), "folders");
    }

    #[test]
    fn test_quality_range_enforced() {
        assert!(Cli::try_parse_from(["mediakit", "convert-images", "a.png", "-q", "0"]).is_err());
    }
}
