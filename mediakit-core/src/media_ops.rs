// ============================================================================
// mediakit-core/src/media_ops.rs
// ============================================================================
//
// MEDIA OPERATIONS: ffmpeg argument construction for transcoding tasks
//
// Each task (encode, replace audio, remux, extract audio) is expressed as a
// pure function returning the ffmpeg argument list, excluding the binary.
// Running the arguments is left to `external::run_ffmpeg`, except for batch
// remuxing which drives the runner itself.
//
// KEY COMPONENTS:
// - QualityPreset / EncodeOptions: encode settings with preset fallbacks
// - build_*_args: argument builders for each task
// - auto_output_path: `{dir}/{stem}{suffix}{ext}` output naming
// - remux_batch: per-file remux with optional removal of the originals

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::batch::BatchOutcome;
use crate::config::resolve_resolution;
use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegSpawner, run_ffmpeg};
use crate::qc::parse_resolution;

/// Default video encoder when neither options nor preset name one.
pub const DEFAULT_VIDEO_ENCODER: &str = "libx264";

pub const DEFAULT_AUDIO_ENCODER: &str = "aac";

pub const DEFAULT_AUDIO_BITRATE: &str = "192k";

/// Highest CRF/CQ value accepted by the x264/x265/NVENC rate control.
pub const MAX_QUALITY: u32 = 51;

/// Container presets for remuxing: name and output extension.
pub const REMUX_PRESETS: &[(&str, &str)] = &[
    ("mp4", ".mp4"),
    ("mkv", ".mkv"),
    ("mov", ".mov"),
    ("ts", ".ts"),
    ("webm", ".webm"),
    ("mxf", ".mxf"),
    ("avi", ".avi"),
];

/// Output extension for a remux preset name (case-insensitive).
pub fn remux_extension(preset: &str) -> Option<&'static str> {
    REMUX_PRESETS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(preset.trim()))
        .map(|(_, ext)| *ext)
}

// ============================================================================
// QUALITY PRESETS
// ============================================================================

/// Named encode presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityPreset {
    /// Balanced 1080p output for everyday uploads
    Standard,
    /// High quality at source resolution and frame rate
    Ultra,
    /// Fast NVIDIA hardware encode
    Nvenc,
}

/// Values a preset contributes when the caller leaves them unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetSettings {
    pub encoder: &'static str,
    pub quality: u32,
    pub speed_preset: &'static str,
    pub resolution: Option<&'static str>,
    pub fps: Option<u32>,
    pub audio_bitrate: &'static str,
}

impl QualityPreset {
    pub fn settings(self) -> PresetSettings {
        match self {
            QualityPreset::Standard => PresetSettings {
                encoder: "libx264",
                quality: 20,
                speed_preset: "medium",
                resolution: Some("1920x1080"),
                fps: Some(18),
                audio_bitrate: "192k",
            },
            QualityPreset::Ultra => PresetSettings {
                encoder: "libx264",
                quality: 16,
                speed_preset: "slow",
                resolution: None,
                fps: None,
                audio_bitrate: "320k",
            },
            QualityPreset::Nvenc => PresetSettings {
                encoder: "h264_nvenc",
                quality: 23,
                speed_preset: "p4",
                resolution: None,
                fps: None,
                audio_bitrate: "192k",
            },
        }
    }
}

impl FromStr for QualityPreset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(QualityPreset::Standard),
            "ultra" => Ok(QualityPreset::Ultra),
            "nvenc" => Ok(QualityPreset::Nvenc),
            other => Err(CoreError::InvalidInput(format!(
                "Unknown quality preset: {other}"
            ))),
        }
    }
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QualityPreset::Standard => "standard",
            QualityPreset::Ultra => "ultra",
            QualityPreset::Nvenc => "nvenc",
        };
        f.write_str(name)
    }
}

// ============================================================================
// ENCODE
// ============================================================================

/// Settings for a single encode. Explicit values override the preset.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    pub preset: Option<QualityPreset>,
    pub encoder: Option<String>,
    /// CRF, or CQ for NVENC encoders
    pub quality: Option<u32>,
    /// Target video bitrate (e.g. `8M`); takes precedence over `quality`
    pub bitrate: Option<String>,
    pub speed_preset: Option<String>,
    /// `WxH` or a resolution preset name such as `1080p`
    pub resolution: Option<String>,
    pub fps: Option<u32>,
    pub audio_encoder: String,
    pub audio_bitrate: Option<String>,
    /// Subtitle file burned in with the `subtitles` filter
    pub subtitle: Option<PathBuf>,
    /// Additional arguments, split on whitespace
    pub extra_args: Option<String>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            preset: None,
            encoder: None,
            quality: None,
            bitrate: None,
            speed_preset: None,
            resolution: None,
            fps: None,
            audio_encoder: DEFAULT_AUDIO_ENCODER.to_string(),
            audio_bitrate: None,
            subtitle: None,
            extra_args: None,
        }
    }
}

/// Escapes a path for use inside an ffmpeg filter argument.
///
/// Backslashes become forward slashes and colons are escaped.
pub fn escape_path_for_ffmpeg(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .replace(':', "\\\\:")
}

/// Builds the argument list for an encode.
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Arguments, excluding the ffmpeg binary
/// * `Err(CoreError::InvalidInput)` - If the resolution is not an integer
///   `WxH` or the quality is above [`MAX_QUALITY`]
pub fn build_encode_args(input: &Path, output: &Path, options: &EncodeOptions) -> CoreResult<Vec<String>> {
    let preset = options.preset.map(QualityPreset::settings);

    let encoder = options
        .encoder
        .clone()
        .or_else(|| preset.as_ref().map(|p| p.encoder.to_string()))
        .unwrap_or_else(|| DEFAULT_VIDEO_ENCODER.to_string());
    let quality = options.quality.or(preset.as_ref().map(|p| p.quality));
    if let Some(quality) = quality.filter(|q| *q > MAX_QUALITY) {
        return Err(CoreError::InvalidInput(format!(
            "Quality out of range (0-{MAX_QUALITY}): {quality}"
        )));
    }
    let speed_preset = options
        .speed_preset
        .clone()
        .or_else(|| preset.as_ref().map(|p| p.speed_preset.to_string()));
    let resolution = options
        .resolution
        .as_deref()
        .map(resolve_resolution)
        .filter(|r| !r.is_empty())
        .or_else(|| preset.as_ref().and_then(|p| p.resolution).map(str::to_string));
    let fps = options.fps.or(preset.as_ref().and_then(|p| p.fps));
    let audio_bitrate = options
        .audio_bitrate
        .clone()
        .or_else(|| preset.as_ref().map(|p| p.audio_bitrate.to_string()))
        .unwrap_or_else(|| DEFAULT_AUDIO_BITRATE.to_string());

    let mut args = vec!["-y".to_string(), "-i".to_string(), path_arg(input)];

    let mut filters = Vec::new();
    if let Some(subtitle) = &options.subtitle {
        filters.push(format!("subtitles='{}'", escape_path_for_ffmpeg(subtitle)));
    }
    if let Some(resolution) = &resolution {
        let (w, h) = parse_resolution(resolution)
            .ok_or_else(|| CoreError::InvalidInput(format!("Invalid resolution: {resolution}")))?;
        filters.push(format!("scale={w}:{h}"));
    }
    if !filters.is_empty() {
        args.push("-vf".to_string());
        args.push(filters.join(","));
    }

    args.push("-c:v".to_string());
    args.push(encoder.clone());

    if encoder != "copy" {
        if let Some(bitrate) = &options.bitrate {
            args.push("-b:v".to_string());
            args.push(bitrate.clone());
        } else if let Some(quality) = quality {
            let flag = if encoder.contains("nvenc") { "-cq" } else { "-crf" };
            args.push(flag.to_string());
            args.push(quality.to_string());
        }
        if let Some(speed) = speed_preset {
            args.push("-preset".to_string());
            args.push(speed);
        }
    }

    if let Some(fps) = fps {
        args.push("-r".to_string());
        args.push(fps.to_string());
    }

    push_audio_args(&mut args, &options.audio_encoder, &audio_bitrate);

    if let Some(extra) = &options.extra_args {
        args.extend(extra.split_whitespace().map(str::to_string));
    }

    args.push(path_arg(output));
    Ok(args)
}

// ============================================================================
// AUDIO / REMUX
// ============================================================================

/// Builds arguments that replace a video's audio track with another file.
///
/// The first video stream of `video` and the first audio stream of `audio`
/// are mapped; video is copied.
pub fn build_replace_audio_args(
    video: &Path,
    audio: &Path,
    output: &Path,
    audio_encoder: &str,
    audio_bitrate: &str,
) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-y".into(),
        "-i".into(),
        path_arg(video),
        "-i".into(),
        path_arg(audio),
        "-map".into(),
        "0:v:0".into(),
        "-map".into(),
        "1:a:0".into(),
        "-c:v".into(),
        "copy".into(),
    ];
    push_audio_args(&mut args, audio_encoder, audio_bitrate);
    args.push(path_arg(output));
    args
}

/// Builds arguments that repackage streams without re-encoding.
pub fn build_remux_args(input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-y".into(),
        "-i".into(),
        path_arg(input),
        "-c".into(),
        "copy".into(),
        path_arg(output),
    ]
}

/// Builds arguments that extract the audio track.
pub fn build_extract_audio_args(
    input: &Path,
    output: &Path,
    audio_encoder: &str,
    audio_bitrate: &str,
) -> Vec<String> {
    let mut args: Vec<String> = vec!["-y".into(), "-i".into(), path_arg(input), "-vn".into()];
    push_audio_args(&mut args, audio_encoder, audio_bitrate);
    args.push(path_arg(output));
    args
}

/// File extension matching an audio encoder's usual container.
pub fn audio_extension_for(encoder: &str) -> &'static str {
    match encoder {
        "libmp3lame" => ".mp3",
        "pcm_s16le" => ".wav",
        "flac" => ".flac",
        _ => ".m4a",
    }
}

fn push_audio_args(args: &mut Vec<String>, encoder: &str, bitrate: &str) {
    args.push("-c:a".to_string());
    args.push(encoder.to_string());
    if encoder != "copy" {
        args.push("-b:a".to_string());
        args.push(bitrate.to_string());
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Renders a command line for display, quoting arguments that contain spaces.
pub fn format_command(program: &Path, args: &[String]) -> String {
    std::iter::once(path_arg(program))
        .chain(args.iter().cloned())
        .map(|arg| {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                format!("\"{arg}\"")
            } else {
                arg
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Derives an output path next to `input`: `{dir}/{stem}{suffix}{ext}`.
///
/// `ext` includes the leading dot; `None` keeps the input's extension.
pub fn auto_output_path(input: &Path, suffix: &str, ext: Option<&str>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = match ext {
        Some(ext) => ext.to_string(),
        None => input
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default(),
    };
    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    dir.join(format!("{stem}{suffix}{ext}"))
}

// ============================================================================
// BATCH REMUX
// ============================================================================

/// Suffix added to remuxed file names.
pub const REMUX_SUFFIX: &str = "_remux";

/// Options for [`remux_batch`].
#[derive(Debug, Clone)]
pub struct RemuxOptions {
    /// Output extension including the dot (e.g. `.mp4`)
    pub extension: String,
    /// Output directory; `None` writes next to each input
    pub output_dir: Option<PathBuf>,
    /// Remove each input after its remux succeeded
    pub delete_originals: bool,
}

/// Output path for one remuxed input.
pub fn remux_output_path(input: &Path, options: &RemuxOptions) -> PathBuf {
    match &options.output_dir {
        Some(dir) => {
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            dir.join(format!("{stem}{REMUX_SUFFIX}{}", options.extension))
        }
        None => auto_output_path(input, REMUX_SUFFIX, Some(&options.extension)),
    }
}

/// Remuxes each input in turn.
///
/// A non-zero ffmpeg exit is recorded as a failure and the batch continues.
/// Originals are removed only after a successful remux and only when the
/// output path differs from the input.
pub fn remux_batch<S, F>(
    spawner: &S,
    ffmpeg: &Path,
    inputs: &[PathBuf],
    options: &RemuxOptions,
    mut on_line: F,
) -> BatchOutcome
where
    S: FfmpegSpawner,
    F: FnMut(&str),
{
    let mut outcome = BatchOutcome::new();
    let total = inputs.len();

    for (i, input) in inputs.iter().enumerate() {
        let output = remux_output_path(input, options);
        log::info!("[{}/{}] Remuxing {} -> {}", i + 1, total, input.display(), output.display());

        if let Some(parent) = output.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                outcome.record_failure(input.display().to_string(), e.to_string());
                continue;
            }
        }

        let code = run_ffmpeg(spawner, ffmpeg, &build_remux_args(input, &output), &mut on_line);
        if code != 0 {
            log::error!("Remux failed for {} (code={})", input.display(), code);
            outcome.record_failure(input.display().to_string(), format!("ffmpeg exited with code {code}"));
            continue;
        }
        outcome.record_success();

        if options.delete_originals && output != *input {
            match fs::remove_file(input) {
                Ok(()) => outcome.deleted_originals += 1,
                Err(e) => log::warn!("Failed to delete {}: {}", input.display(), e),
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_encode_standard_preset() {
        let options = EncodeOptions {
            preset: Some(QualityPreset::Standard),
            ..Default::default()
        };
        let args = build_encode_args(Path::new("in.mov"), Path::new("out.mp4"), &options).unwrap();
        assert_eq!(
            args,
            s(&[
                "-y", "-i", "in.mov", "-vf", "scale=1920:1080", "-c:v", "libx264", "-crf", "20",
                "-preset", "medium", "-r", "18", "-c:a", "aac", "-b:a", "192k", "out.mp4",
            ])
        );
    }

    #[test]
    fn test_encode_nvenc_uses_cq() {
        let options = EncodeOptions {
            preset: Some(QualityPreset::Nvenc),
            ..Default::default()
        };
        let args = build_encode_args(Path::new("a.mp4"), Path::new("b.mp4"), &options).unwrap();
        let joined = args.join(" ");
        assert!(joined.contains("-c:v h264_nvenc -cq 23 -preset p4"));
        assert!(!joined.contains("-crf"));
    }

    #[test]
    fn test_encode_bitrate_overrides_quality_and_extras_appended() {
        let options = EncodeOptions {
            preset: Some(QualityPreset::Ultra),
            bitrate: Some("8M".into()),
            audio_encoder: "copy".into(),
            subtitle: Some(PathBuf::from("C:\\subs\\a.ass")),
            extra_args: Some("-movflags  +faststart".into()),
            ..Default::default()
        };
        let args = build_encode_args(Path::new("a.mp4"), Path::new("b.mp4"), &options).unwrap();
        assert_eq!(
            args,
            s(&[
                "-y", "-i", "a.mp4", "-vf", "subtitles='C\\\\:/subs/a.ass'", "-c:v", "libx264",
                "-b:v", "8M", "-preset", "slow", "-c:a", "copy", "-movflags", "+faststart", "b.mp4",
            ])
        );
    }

    #[test]
    fn test_encode_copy_skips_rate_control() {
        let options = EncodeOptions {
            encoder: Some("copy".into()),
            quality: Some(18),
            resolution: Some("720p".into()),
            ..Default::default()
        };
        let args = build_encode_args(Path::new("a.mp4"), Path::new("b.mp4"), &options).unwrap();
        assert!(args.contains(&"scale=1280:720".to_string()));
        assert!(!args.contains(&"-crf".to_string()));
    }

    #[test]
    fn test_encode_rejects_bad_resolution() {
        for bad in ["wide", "axb", "1920x", "1920x1080.5"] {
            let options = EncodeOptions {
                resolution: Some(bad.into()),
                ..Default::default()
            };
            let result = build_encode_args(Path::new("a"), Path::new("b"), &options);
            assert!(matches!(result, Err(CoreError::InvalidInput(_))), "{bad}");
        }
    }

    #[test]
    fn test_encode_quality_range() {
        let options = EncodeOptions {
            quality: Some(52),
            ..Default::default()
        };
        let result = build_encode_args(Path::new("a"), Path::new("b"), &options);
        assert!(matches!(result, Err(CoreError::InvalidInput(_))));

        let options = EncodeOptions {
            quality: Some(MAX_QUALITY),
            ..Default::default()
        };
        let args = build_encode_args(Path::new("a"), Path::new("b"), &options).unwrap();
        assert!(args.windows(2).any(|w| w == ["-crf", "51"]));
    }

    #[test]
    fn test_format_command_quotes_spaces() {
        let args = s(&["-i", "My Clip.mov", "-c", "copy", "out.mp4"]);
        assert_eq!(
            format_command(Path::new("ffmpeg"), &args),
            "ffmpeg -i \"My Clip.mov\" -c copy out.mp4"
        );
    }

    #[test]
    fn test_replace_and_extract_audio_args() {
        let args = build_replace_audio_args(
            Path::new("v.mp4"),
            Path::new("a.wav"),
            Path::new("o.mp4"),
            "aac",
            "256k",
        );
        assert_eq!(
            args,
            s(&[
                "-y", "-i", "v.mp4", "-i", "a.wav", "-map", "0:v:0", "-map", "1:a:0", "-c:v",
                "copy", "-c:a", "aac", "-b:a", "256k", "o.mp4",
            ])
        );

        let args = build_extract_audio_args(Path::new("v.mp4"), Path::new("v.flac"), "copy", "192k");
        assert_eq!(args, s(&["-y", "-i", "v.mp4", "-vn", "-c:a", "copy", "v.flac"]));
    }

    #[test]
    fn test_output_paths() {
        assert_eq!(
            auto_output_path(Path::new("/v/clip.mov"), "_replaced", None),
            PathBuf::from("/v/clip_replaced.mov")
        );
        assert_eq!(
            auto_output_path(Path::new("/v/clip.mov"), "_extract", Some(".m4a")),
            PathBuf::from("/v/clip_extract.m4a")
        );

        let options = RemuxOptions {
            extension: ".mkv".into(),
            output_dir: Some(PathBuf::from("/out")),
            delete_originals: false,
        };
        assert_eq!(
            remux_output_path(Path::new("/v/clip.mp4"), &options),
            PathBuf::from("/out/clip_remux.mkv")
        );
    }

    #[test]
    fn test_presets_parse() {
        assert_eq!("Ultra".parse::<QualityPreset>().unwrap(), QualityPreset::Ultra);
        assert!("fast".parse::<QualityPreset>().is_err());
        assert_eq!(remux_extension("MXF"), Some(".mxf"));
        assert_eq!(remux_extension("flv"), None);
        assert_eq!(audio_extension_for("libmp3lame"), ".mp3");
        assert_eq!(audio_extension_for("aac"), ".m4a");
    }
}
