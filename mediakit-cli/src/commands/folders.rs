// ============================================================================
// mediakit-cli/src/commands/folders.rs
// ============================================================================
//
// FOLDERS COMMAND: Create folders from a text list

use mediakit_core::folders::{FolderOptions, create_folders, default_output_dir};
use mediakit_core::terminal_output::{print_section, print_status};

use super::{finish_task, show};
use crate::cli::{FoldersArgs, GlobalArgs};
use crate::error::CliResult;

pub const TASK_NAME: &str = "Folder creation";

pub fn run_folders(args: FoldersArgs, global: &GlobalArgs) -> CliResult<()> {
    let options = FolderOptions {
        output_dir: args.output.clone(),
        auto_number: args.number,
    };
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_dir(&args.list));

    print_section("Create Folders");
    print_status("List", &show(&args.list), true);
    print_status("Output", &show(&output_dir), false);

    let outcome = create_folders(&args.list, &options)?;

    finish_task(global, TASK_NAME, outcome.success_count, &outcome.errors);
    Ok(())
}
