// ============================================================================
// mediakit-cli/src/commands/remux.rs
// ============================================================================
//
// REMUX COMMAND: Container conversion without re-encoding

use mediakit_core::external::{SidecarSpawner, check_dependency};
use mediakit_core::media_ops::{REMUX_PRESETS, RemuxOptions, remux_batch, remux_extension};
use mediakit_core::terminal_output::{print_section, print_status};
use mediakit_core::CoreError;

use super::finish_task;
use crate::cli::{GlobalArgs, RemuxArgs};
use crate::error::CliResult;

pub const TASK_NAME: &str = "Remux";

pub fn run_remux(args: RemuxArgs, global: &GlobalArgs) -> CliResult<()> {
    let extension = remux_extension(&args.format).ok_or_else(|| {
        let known: Vec<&str> = REMUX_PRESETS.iter().map(|(name, _)| *name).collect();
        CoreError::InvalidInput(format!(
            "Unknown remux format '{}' (expected one of: {})",
            args.format,
            known.join(", ")
        ))
    })?;
    check_dependency(&global.ffmpeg)?;

    let options = RemuxOptions {
        extension: extension.to_string(),
        output_dir: args.output.clone(),
        delete_originals: args.delete_originals,
    };

    print_section("Remux");
    print_status("Files", &args.inputs.len().to_string(), true);
    print_status("Container", &options.extension.to_uppercase(), false);

    let outcome = remux_batch(&SidecarSpawner, &global.ffmpeg, &args.inputs, &options, |line| {
        log::debug!("{}", line);
    });

    if options.delete_originals {
        print_status("Deleted", &outcome.deleted_originals.to_string(), false);
    }
    finish_task(global, TASK_NAME, outcome.success_count, &outcome.errors);

    if outcome.is_clean() {
        Ok(())
    } else {
        Err(CoreError::OperationFailed(format!(
            "{} of {} remux job(s) failed",
            outcome.fail_count(),
            outcome.total()
        )))
    }
}
