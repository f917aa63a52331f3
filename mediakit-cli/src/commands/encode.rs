// ============================================================================
// mediakit-cli/src/commands/encode.rs
// ============================================================================
//
// ENCODE COMMAND: Single-file encode with optional quality preset

use std::str::FromStr;
use std::time::Instant;

use mediakit_core::config::resolve_resolution;
use mediakit_core::external::check_dependency;
use mediakit_core::media_ops::{
    EncodeOptions, QualityPreset, auto_output_path, build_encode_args, format_command,
};
use mediakit_core::terminal_output::{
    print_processing, print_section, print_status, print_sub_item, print_success,
};
use mediakit_core::{format_bytes, format_duration};

use super::{finish_task, run_ffmpeg_job, show};
use crate::cli::{EncodeArgs, GlobalArgs};
use crate::error::{CliResult, require_file};

pub const TASK_NAME: &str = "Video encode";

/// Suffix for encodes written next to their input.
pub const ENCODE_SUFFIX: &str = "_encoded";

/// Turns the command-line options into encode options.
pub fn build_options(args: &EncodeArgs) -> CliResult<EncodeOptions> {
    let preset = args
        .preset
        .as_deref()
        .map(QualityPreset::from_str)
        .transpose()?;

    Ok(EncodeOptions {
        preset,
        encoder: args.encoder.clone(),
        quality: args.quality,
        bitrate: args.bitrate.clone(),
        speed_preset: args.speed.clone(),
        resolution: args
            .resolution
            .as_deref()
            .map(resolve_resolution)
            .filter(|r| !r.is_empty()),
        fps: args.fps,
        audio_encoder: args.audio_encoder.clone(),
        audio_bitrate: args.audio_bitrate.clone(),
        subtitle: args.subtitle.clone(),
        extra_args: args.extra.clone(),
    })
}

pub fn run_encode(args: EncodeArgs, global: &GlobalArgs) -> CliResult<()> {
    require_file(&args.input, "Input file")?;
    if let Some(subtitle) = &args.subtitle {
        require_file(subtitle, "Subtitle file")?;
    }
    let options = build_options(&args)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| auto_output_path(&args.input, ENCODE_SUFFIX, Some(".mp4")));
    let ffmpeg_args = build_encode_args(&args.input, &output, &options)?;

    print_section("Encode");
    print_status("Input", &show(&args.input), true);
    print_status("Output", &show(&output), false);
    if let Some(preset) = options.preset {
        print_status("Preset", &preset.to_string(), false);
    }

    if args.dry_run {
        print_processing("Dry run, ffmpeg not started");
        print_sub_item(&format_command(&global.ffmpeg, &ffmpeg_args));
        return Ok(());
    }

    check_dependency(&global.ffmpeg)?;
    print_processing("Encoding");

    let start = Instant::now();
    let result = run_ffmpeg_job(global, &ffmpeg_args);

    match &result {
        Ok(()) => {
            print_success(&format!(
                "Encoded in {}",
                format_duration(start.elapsed().as_secs_f64())
            ));
            if let Ok(meta) = std::fs::metadata(&output) {
                print_status("Size", &format_bytes(meta.len()), false);
            }
            finish_task(global, TASK_NAME, 1, &[]);
        }
        Err(e) => finish_task(global, TASK_NAME, 0, &[format!("{}: {}", show(&args.input), e)]),
    }
    result
}
