//! Command implementations for the CLI.
//!
//! Each submodule implements one subcommand: collect the arguments into a
//! core configuration, call the core operation and print the summary. Task
//! commands finish through [`finish_task`], which prints the counts and the
//! error preview and sends the task-complete notification.

pub mod audio;
pub mod encode;
pub mod folders;
pub mod images;
pub mod notify;
pub mod qc;
pub mod remux;
pub mod rename;

use std::collections::VecDeque;
use std::path::Path;

use mediakit_core::external::{SidecarSpawner, run_ffmpeg};
use mediakit_core::media_ops::format_command;
use mediakit_core::notifications::{NotifyConfigStore, send_task_complete};
use mediakit_core::terminal_output::{
    print_batch_summary, print_error, print_error_preview, print_sub_item, print_success,
    print_warning,
};
use mediakit_core::CoreError;

use crate::cli::GlobalArgs;
use crate::error::CliResult;

/// Output lines kept for display when an ffmpeg run fails.
const FFMPEG_TAIL_LINES: usize = 10;

/// Prints the batch summary and sends the task-complete notification.
pub fn finish_task(global: &GlobalArgs, task: &str, success: usize, errors: &[String]) {
    println!();
    print_batch_summary(success, errors.len());
    print_error_preview(errors);
    notify_task_complete(global, task);
}

/// Sends the automatic notification; failures are only reported.
pub fn notify_task_complete(global: &GlobalArgs, task: &str) {
    let (config, _) = NotifyConfigStore::new(&global.notify_config).load();
    for (channel, result) in send_task_complete(&config, task) {
        match result {
            Ok(()) => print_success(&format!("Notification sent ({})", channel)),
            Err(e) => print_warning(&format!("Notification failed ({}): {}", channel, e)),
        }
    }
}

/// Runs one ffmpeg job, logging its output.
///
/// The command line is echoed before the run. On failure the last output lines are printed and an `OperationFailed`
/// error is returned.
pub fn run_ffmpeg_job(global: &GlobalArgs, args: &[String]) -> CliResult<()> {
    print_sub_item(&format_command(&global.ffmpeg, args));
    let mut tail: VecDeque<String> = VecDeque::with_capacity(FFMPEG_TAIL_LINES);
    let code = run_ffmpeg(&SidecarSpawner, &global.ffmpeg, args, |line| {
        log::debug!("{}", line);
        if tail.len() == FFMPEG_TAIL_LINES {
            tail.pop_front();
        }
        tail.push_back(line.to_string());
    });

    if code == 0 {
        return Ok(());
    }

    print_error(&format!("ffmpeg exited with code {}", code));
    for line in &tail {
        print_sub_item(line);
    }
    Err(CoreError::OperationFailed(format!(
        "ffmpeg exited with code {}",
        code
    )))
}

/// Display form of a path for status lines.
pub fn show(path: &Path) -> String {
    path.display().to_string()
}
