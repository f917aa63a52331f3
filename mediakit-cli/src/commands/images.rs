// ============================================================================
// mediakit-cli/src/commands/images.rs
// ============================================================================
//
// CONVERT-IMAGES COMMAND: Batch image format conversion

use mediakit_core::images::{ImageConvertOptions, convert_images, normalize_target_ext};
use mediakit_core::terminal_output::{print_section, print_status};

use super::finish_task;
use crate::cli::{ConvertImagesArgs, GlobalArgs};
use crate::error::CliResult;

pub const TASK_NAME: &str = "Image conversion";

pub fn run_convert_images(args: ConvertImagesArgs, global: &GlobalArgs) -> CliResult<()> {
    let options = ImageConvertOptions {
        target_ext: normalize_target_ext(&args.target),
        output_dir: args.output.clone(),
        quality: args.quality,
        delete_originals: args.delete_originals,
    };

    print_section("Convert Images");
    print_status("Files", &args.inputs.len().to_string(), true);
    print_status("Target", &options.target_ext.to_uppercase(), false);

    let outcome = convert_images(&args.inputs, &options)?;

    if options.delete_originals {
        print_status("Deleted", &outcome.deleted_originals.to_string(), false);
    }
    finish_task(global, TASK_NAME, outcome.success_count, &outcome.errors);
    Ok(())
}
