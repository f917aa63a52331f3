//! Metadata extraction for the QC scanner.
//!
//! Probing never returns an error: any failure of the external prober is
//! folded into an invalid [`MediaInfo`] so the surrounding scan can continue.

use std::path::Path;

use ffprobe::FfProbe;

use crate::error::CoreError;
use crate::external::{FfprobeExecutor, first_stream};

use super::MediaInfo;

/// Probes a single file and converts the result into a [`MediaInfo`].
pub fn probe<E: FfprobeExecutor + ?Sized>(executor: &E, path: &Path) -> MediaInfo {
    match executor.probe(path) {
        Ok(data) => parse_probe_data(path, &data),
        Err(CoreError::CommandFailed(_, status, stderr)) => {
            let reason = match stderr.trim() {
                "" => format!("ffprobe exited with {status}"),
                text => text.to_string(),
            };
            log::warn!("Cannot read {}: {}", path.display(), reason);
            MediaInfo::invalid(path, format!("Cannot read file: {reason}"))
        }
        Err(e) => {
            log::warn!("Probe failed for {}: {}", path.display(), e);
            MediaInfo::invalid(path, format!("Probe failed: {e}"))
        }
    }
}

/// Builds a [`MediaInfo`] from parsed prober output.
///
/// Only the first video stream and the first audio stream are considered.
/// Missing or unparsable numbers become zero. A video stream without a codec
/// name is reported as `unknown`.
pub fn parse_probe_data(path: &Path, data: &FfProbe) -> MediaInfo {
    let mut info = MediaInfo::new(path);

    info.duration_secs = number(&data.format.duration);
    info.bitrate_kbps = kbps(&data.format.bit_rate);

    if let Some(video) = first_stream(data, "video") {
        info.video_codec = video
            .codec_name
            .clone()
            .unwrap_or_else(|| "unknown".to_string());
        info.width = dimension(video.width);
        info.height = dimension(video.height);
        info.fps = parse_frame_rate(&video.r_frame_rate);
    }

    if let Some(audio) = first_stream(data, "audio") {
        info.audio_codec = audio
            .codec_name
            .clone()
            .unwrap_or_else(|| "unknown".to_string());
        info.audio_bitrate_kbps = kbps(&audio.bit_rate);
    }

    info
}

/// Parses a rational frame rate such as `30000/1001`, rounded to two decimals.
///
/// A zero denominator or any unparsable input yields `0.0`.
pub fn parse_frame_rate(value: &str) -> f64 {
    let Some((num, den)) = value.trim().split_once('/') else {
        return 0.0;
    };
    match (num.trim().parse::<i64>(), den.trim().parse::<i64>()) {
        (Ok(_), Ok(0)) => 0.0,
        (Ok(num), Ok(den)) => ((num as f64 / den as f64) * 100.0).round() / 100.0,
        _ => 0.0,
    }
}

fn number(value: &Option<String>) -> f64 {
    value
        .as_deref()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn dimension(value: Option<i64>) -> u32 {
    value
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0)
}

/// Bits per second to integer kbps, truncating.
fn kbps(value: &Option<String>) -> u64 {
    (number(value) as u64) / 1000
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::error::CoreResult;
    use ffprobe::{Format, Stream};
    use std::io;
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;

    fn video_stream(codec: Option<&str>, width: i64, height: i64, rate: &str) -> Stream {
        let mut stream = Stream::default();
        stream.codec_type = Some("video".to_string());
        stream.codec_name = codec.map(str::to_string);
        stream.width = Some(width);
        stream.height = Some(height);
        stream.r_frame_rate = rate.to_string();
        stream
    }

    #[test]
    fn test_parse_frame_rate() {
        assert_eq!(parse_frame_rate("30000/1001"), 29.97);
        assert_eq!(parse_frame_rate("25/1"), 25.0);
        assert_eq!(parse_frame_rate("24/0"), 0.0);
        assert_eq!(parse_frame_rate("0/0"), 0.0);
        assert_eq!(parse_frame_rate("abc"), 0.0);
        assert_eq!(parse_frame_rate("25"), 0.0);
    }

    #[test]
    fn test_parse_probe_data_fields() {
        let mut audio = Stream::default();
        audio.codec_type = Some("audio".to_string());
        audio.codec_name = Some("opus".to_string());
        audio.bit_rate = Some("160999".to_string());

        let mut format = Format::default();
        format.duration = Some("61.04".to_string());
        format.bit_rate = Some("8123999".to_string());

        let data = FfProbe {
            streams: vec![video_stream(Some("vp9"), 3840, 2160, "60/1"), audio],
            format,
        };
        let info = parse_probe_data(Path::new("/clips/a.webm"), &data);

        assert!(info.is_valid);
        assert_eq!(info.container, ".webm");
        assert_eq!(info.bitrate_kbps, 8123);
        assert_eq!(info.video_codec, "vp9");
        assert_eq!((info.width, info.height), (3840, 2160));
        assert_eq!(info.fps, 60.0);
        assert_eq!(info.audio_codec, "opus");
        assert_eq!(info.audio_bitrate_kbps, 160);
        assert!((info.duration_secs - 61.04).abs() < 1e-9);
    }

    #[test]
    fn test_parse_probe_data_image_without_audio() {
        let mut format = Format::default();
        format.bit_rate = Some("N/A".to_string());
        let data = FfProbe {
            streams: vec![video_stream(None, 640, 480, "0/0")],
            format,
        };
        let info = parse_probe_data(Path::new("still.webp"), &data);
        assert_eq!(info.video_codec, "unknown");
        assert_eq!((info.width, info.height), (640, 480));
        assert_eq!(info.fps, 0.0);
        assert_eq!(info.bitrate_kbps, 0);
        assert!(info.audio_codec.is_empty());
    }

    struct FailingExecutor {
        stderr: Option<&'static str>,
    }

    impl FfprobeExecutor for FailingExecutor {
        fn probe(&self, _path: &Path) -> CoreResult<FfProbe> {
            match self.stderr {
                Some(stderr) => Err(CoreError::CommandFailed(
                    "ffprobe".into(),
                    ExitStatus::from_raw(1 << 8),
                    stderr.into(),
                )),
                None => Err(CoreError::CommandStart(
                    "ffprobe".into(),
                    io::Error::new(io::ErrorKind::NotFound, "no such file"),
                )),
            }
        }
    }

    #[test]
    fn test_unreadable_file_becomes_invalid_info() {
        let executor = FailingExecutor {
            stderr: Some("Invalid data found when processing input\n"),
        };
        let info = probe(&executor, Path::new("bad.mp4"));
        assert!(!info.is_valid);
        assert_eq!(
            info.errors,
            vec!["Cannot read file: Invalid data found when processing input".to_string()]
        );

        let info = probe(&FailingExecutor { stderr: Some("") }, Path::new("bad.mp4"));
        assert!(info.errors[0].starts_with("Cannot read file: ffprobe exited with"));

        let info = probe(&FailingExecutor { stderr: None }, Path::new("bad.mp4"));
        assert!(!info.is_valid);
        assert!(info.errors[0].starts_with("Probe failed:"));
    }
}
