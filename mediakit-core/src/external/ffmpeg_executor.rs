// ============================================================================
// mediakit-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: FFmpeg Process Management and Abstraction
//
// This module provides abstractions for spawning and interacting with FFmpeg
// processes. Media operations build an argument list, hand it to `run_ffmpeg`,
// and receive every output line through a callback until the process exits.
//
// KEY COMPONENTS:
// - FfmpegProcess: Trait representing an active FFmpeg process
// - FfmpegSpawner: Trait for creating new FFmpeg processes
// - SidecarSpawner: Concrete implementation using ffmpeg-sidecar
// - run_ffmpeg: Line-streaming runner returning the exit code

use std::path::Path;
use std::process::ExitStatus;

use ffmpeg_sidecar::child::FfmpegChild as SidecarChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;

use crate::error::{CoreResult, command_failed_error, command_start_error, command_wait_error};

/// Exit code reported when ffmpeg could not be started at all.
pub const SPAWN_FAILED_EXIT_CODE: i32 = -1;

/// Trait representing an active ffmpeg process instance.
pub trait FfmpegProcess {
    /// Processes events from the running command using a provided handler closure.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Waits for the command to complete and returns its exit status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Trait representing something that can spawn an FfmpegProcess.
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;
    /// Spawns the ffmpeg command, consuming the command object.
    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing `FfmpegProcess`.
pub struct SidecarProcess(SidecarChild);

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let iterator = self.0.iter().map_err(|e| {
            log::error!("Failed to get ffmpeg event iterator: {}", e);
            command_failed_error("ffmpeg (sidecar - get iter)", ExitStatus::default(), e.to_string())
        })?;
        for event in iterator {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0
            .wait()
            .map_err(|e| command_wait_error("ffmpeg (sidecar)", e))
    }
}

/// Concrete implementation of `FfmpegSpawner` using `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        cmd.spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_error("ffmpeg (sidecar)", e))
    }
}

/// Runs ffmpeg with the given arguments, streaming output lines to `on_line`.
///
/// Log, error and progress lines are forwarded in the order ffmpeg emits them.
/// The caller decides whether a non-zero exit is fatal.
///
/// # Arguments
///
/// * `spawner` - The spawner used to start the process
/// * `ffmpeg` - Path to the ffmpeg binary
/// * `args` - Arguments, excluding the binary itself
/// * `on_line` - Callback receiving each output line
///
/// # Returns
///
/// The process exit code, or [`SPAWN_FAILED_EXIT_CODE`] when the process
/// could not be started or its status could not be collected.
pub fn run_ffmpeg<S, F>(spawner: &S, ffmpeg: &Path, args: &[String], mut on_line: F) -> i32
where
    S: FfmpegSpawner,
    F: FnMut(&str),
{
    let mut cmd = FfmpegCommand::new_with_path(ffmpeg);
    cmd.args(args);
    log::debug!("Running ffmpeg: {} {}", ffmpeg.display(), args.join(" "));

    let mut process = match spawner.spawn(cmd) {
        Ok(process) => process,
        Err(e) => {
            log::error!("Failed to start ffmpeg: {}", e);
            on_line(&format!("Failed to start ffmpeg: {e}"));
            return SPAWN_FAILED_EXIT_CODE;
        }
    };

    let streamed = process.handle_events(|event| {
        match event {
            FfmpegEvent::Log(_, line) | FfmpegEvent::Error(line) => on_line(&line),
            FfmpegEvent::Progress(progress) => on_line(&progress.raw_log_message),
            _ => {}
        }
        Ok(())
    });
    if let Err(e) = streamed {
        log::warn!("ffmpeg output stream ended early: {}", e);
    }

    match process.wait() {
        Ok(status) => {
            let code = status.code().unwrap_or(SPAWN_FAILED_EXIT_CODE);
            log::debug!("ffmpeg exited with code {}", code);
            code
        }
        Err(e) => {
            log::error!("Failed waiting for ffmpeg: {}", e);
            SPAWN_FAILED_EXIT_CODE
        }
    }
}
