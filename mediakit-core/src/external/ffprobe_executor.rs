//! FFprobe integration for media metadata extraction
//!
//! Probing goes through the `ffprobe` crate, which runs the binary and
//! deserializes its format and stream metadata. The [`FfprobeExecutor`] trait
//! keeps the QC scanner independent of the real binary.

use std::path::{Path, PathBuf};

use ffprobe::{Config, FfProbe, FfProbeError, Stream};

use crate::config::DEFAULT_FFPROBE;
use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};

/// Abstraction over running the metadata prober.
pub trait FfprobeExecutor {
    /// Probes a single file.
    ///
    /// A non-zero exit must surface as `CoreError::CommandFailed` carrying the
    /// prober's diagnostic output.
    fn probe(&self, path: &Path) -> CoreResult<FfProbe>;
}

/// Runs the real `ffprobe` binary.
#[derive(Debug, Clone)]
pub struct ProcessFfprobeExecutor {
    ffprobe: PathBuf,
}

impl Default for ProcessFfprobeExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_FFPROBE)
    }
}

impl ProcessFfprobeExecutor {
    pub fn new(ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffprobe: ffprobe.into(),
        }
    }
}

impl FfprobeExecutor for ProcessFfprobeExecutor {
    fn probe(&self, path: &Path) -> CoreResult<FfProbe> {
        log::debug!("Running ffprobe (via crate) on: {}", path.display());
        let config = Config::builder().ffprobe_bin(&self.ffprobe).build();
        ffprobe::ffprobe_config(config, path).map_err(|err| {
            let mapped = map_ffprobe_error(err);
            log::warn!("ffprobe failed for {}: {}", path.display(), mapped);
            mapped
        })
    }
}

fn map_ffprobe_error(err: FfProbeError) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => command_start_error("ffprobe", io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            command_failed_error("ffprobe", output.status, stderr)
        }
        FfProbeError::Deserialize(err) => {
            CoreError::JsonParseError(format!("ffprobe output deserialization: {err}"))
        }
        _ => CoreError::JsonParseError(format!("Unknown ffprobe error: {err:?}")),
    }
}

/// First stream whose `codec_type` matches.
pub fn first_stream<'a>(data: &'a FfProbe, codec_type: &str) -> Option<&'a Stream> {
    data.streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some(codec_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ffprobe::Format;

    fn stream(codec_type: &str, codec_name: &str) -> Stream {
        let mut stream = Stream::default();
        stream.codec_type = Some(codec_type.to_string());
        stream.codec_name = Some(codec_name.to_string());
        stream
    }

    #[test]
    fn test_first_stream_picks_earliest_match() {
        let data = FfProbe {
            streams: vec![
                stream("audio", "aac"),
                stream("video", "h264"),
                stream("video", "mjpeg"),
            ],
            format: Format::default(),
        };

        assert_eq!(
            first_stream(&data, "video").and_then(|s| s.codec_name.as_deref()),
            Some("h264")
        );
        assert_eq!(
            first_stream(&data, "audio").and_then(|s| s.codec_name.as_deref()),
            Some("aac")
        );
        assert!(first_stream(&data, "subtitle").is_none());
    }

    #[test]
    fn test_missing_binary_is_command_start() {
        let executor = ProcessFfprobeExecutor::new("/definitely/not/ffprobe");
        let result = executor.probe(Path::new("clip.mp4"));
        assert!(matches!(result, Err(CoreError::CommandStart(_, _))));
    }
}
