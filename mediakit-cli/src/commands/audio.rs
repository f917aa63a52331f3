// ============================================================================
// mediakit-cli/src/commands/audio.rs
// ============================================================================
//
// AUDIO COMMANDS: Replace or extract audio tracks

use mediakit_core::external::check_dependency;
use mediakit_core::media_ops::{
    audio_extension_for, auto_output_path, build_extract_audio_args, build_replace_audio_args,
};
use mediakit_core::terminal_output::{print_processing, print_section, print_status, print_success};

use super::{finish_task, run_ffmpeg_job, show};
use crate::cli::{ExtractAudioArgs, GlobalArgs, ReplaceAudioArgs};
use crate::error::{CliResult, require_file};

pub const REPLACE_TASK_NAME: &str = "Audio replacement";
pub const EXTRACT_TASK_NAME: &str = "Audio extraction";

const REPLACE_SUFFIX: &str = "_replaced";
const EXTRACT_SUFFIX: &str = "_extract";

pub fn run_replace_audio(args: ReplaceAudioArgs, global: &GlobalArgs) -> CliResult<()> {
    require_file(&args.video, "Video file")?;
    require_file(&args.audio, "Audio file")?;
    check_dependency(&global.ffmpeg)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| auto_output_path(&args.video, REPLACE_SUFFIX, None));
    let ffmpeg_args = build_replace_audio_args(
        &args.video,
        &args.audio,
        &output,
        &args.audio_encoder,
        &args.audio_bitrate,
    );

    print_section("Replace Audio");
    print_status("Video", &show(&args.video), true);
    print_status("Audio", &show(&args.audio), false);
    print_status("Output", &show(&output), false);
    print_processing("Muxing");

    run_single(global, REPLACE_TASK_NAME, &args.video, &ffmpeg_args)
}

pub fn run_extract_audio(args: ExtractAudioArgs, global: &GlobalArgs) -> CliResult<()> {
    require_file(&args.input, "Input file")?;
    check_dependency(&global.ffmpeg)?;

    let output = args.output.clone().unwrap_or_else(|| {
        auto_output_path(
            &args.input,
            EXTRACT_SUFFIX,
            Some(audio_extension_for(&args.audio_encoder)),
        )
    });
    let ffmpeg_args =
        build_extract_audio_args(&args.input, &output, &args.audio_encoder, &args.audio_bitrate);

    print_section("Extract Audio");
    print_status("Input", &show(&args.input), true);
    print_status("Output", &show(&output), false);
    print_processing("Extracting");

    run_single(global, EXTRACT_TASK_NAME, &args.input, &ffmpeg_args)
}

fn run_single(
    global: &GlobalArgs,
    task: &str,
    input: &std::path::Path,
    ffmpeg_args: &[String],
) -> CliResult<()> {
    let result = run_ffmpeg_job(global, ffmpeg_args);
    match &result {
        Ok(()) => {
            print_success("Done");
            finish_task(global, task, 1, &[]);
        }
        Err(e) => finish_task(global, task, 0, &[format!("{}: {}", show(input), e)]),
    }
    result
}
