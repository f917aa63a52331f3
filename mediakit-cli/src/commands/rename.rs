// ============================================================================
// mediakit-cli/src/commands/rename.rs
// ============================================================================
//
// RENAME COMMAND: Folder-prefixed batch renaming

use mediakit_core::config::{
    DEFAULT_IMAGE_LABEL, DEFAULT_VIDEO_LABEL, RenameConfig, RenameConfigBuilder, RenameMode,
    parse_comma_list,
};
use mediakit_core::rename::batch_rename;
use mediakit_core::terminal_output::{print_section, print_status, print_sub_item};

use super::{finish_task, show};
use crate::cli::{GlobalArgs, RenameArgs};
use crate::error::CliResult;

pub const TASK_NAME: &str = "Batch rename";

/// Turns the command-line options into a rename configuration.
pub fn build_config(args: &RenameArgs) -> RenameConfig {
    let mut builder = RenameConfigBuilder::new()
        .mode(args.mode.into())
        .target(args.target.into())
        .image_extensions(parse_comma_list(&args.image_ext, ""))
        .video_extensions(parse_comma_list(&args.video_ext, ""))
        .recursive(!args.no_recursive)
        .truncate_at_underscore(!args.keep_full_prefix)
        .labels(
            args.image_label.as_deref().unwrap_or(DEFAULT_IMAGE_LABEL),
            args.video_label.as_deref().unwrap_or(DEFAULT_VIDEO_LABEL),
        );
    if let Some(output) = &args.output {
        builder = builder.output_dir(output);
    }
    builder.build()
}

pub fn run_rename(args: RenameArgs, global: &GlobalArgs) -> CliResult<()> {
    let config = build_config(&args);

    print_section("Batch Rename");
    print_status("Root", &show(&args.root), true);
    let mode = match config.mode {
        RenameMode::InPlace => "in place",
        RenameMode::Copy => "copy",
        RenameMode::Move => "move",
    };
    print_status("Mode", mode, false);

    let report = batch_rename(&args.root, &config)?;

    if config.mode != RenameMode::InPlace {
        print_status("Output", &show(&report.output_base), false);
    }
    for renamed in report.items.iter().flatten() {
        log::info!(
            "{} -> {}",
            renamed.source.display(),
            renamed.destination.display()
        );
    }
    if report.items.is_empty() {
        print_sub_item("No matching files");
    }

    finish_task(global, TASK_NAME, report.success_count(), &report.errors());
    Ok(())
}
