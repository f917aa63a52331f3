// ============================================================================
// mediakit-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with the ffmpeg and ffprobe binaries
//
// Every feature of the toolkit ends in a subprocess: ffprobe for metadata,
// ffmpeg for transcoding. This module hides both behind traits so the QC
// scanner and media operations can be driven by test doubles.
//
// KEY COMPONENTS:
// - FfprobeExecutor / ProcessFfprobeExecutor: structured metadata probing
// - FfmpegSpawner / SidecarSpawner: ffmpeg process management via ffmpeg-sidecar
// - run_ffmpeg: streams ffmpeg output lines to a callback and returns the exit code
// - check_dependency: verifies that a binary can be started

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{CoreError, CoreResult};

pub mod ffmpeg_executor;
pub mod ffprobe_executor;

pub use ffmpeg_executor::{
    run_ffmpeg, FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner, SPAWN_FAILED_EXIT_CODE,
};
pub use ffprobe_executor::{FfprobeExecutor, ProcessFfprobeExecutor, first_stream};

/// Checks if a required external command is available and executable.
///
/// Runs the command with `-version` and discards its output. Only the ability
/// to start the process matters; the exit status is not inspected.
///
/// # Arguments
///
/// * `cmd` - The command name or path to check (e.g., "ffmpeg")
///
/// # Returns
///
/// * `Ok(())` - If the command could be started
/// * `Err(CoreError::DependencyNotFound)` - If the command does not exist
/// * `Err(CoreError::CommandStart)` - If the command exists but fails to start
pub fn check_dependency(cmd: &Path) -> CoreResult<()> {
    let result = Command::new(cmd)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", cmd.display());
            Err(CoreError::DependencyNotFound(cmd.display().to_string()))
        }
        Err(e) => {
            log::error!(
                "Failed to start dependency check command '{}': {}",
                cmd.display(),
                e
            );
            Err(CoreError::CommandStart(cmd.display().to_string(), e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_dependency_missing_binary() {
        let result = check_dependency(Path::new("mediakit-definitely-not-a-real-binary"));
        assert!(matches!(result, Err(CoreError::DependencyNotFound(_))));
    }
}
