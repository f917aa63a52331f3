// ============================================================================
// mediakit-cli/src/commands/qc.rs
// ============================================================================
//
// QC COMMAND: Scan media and write the quality report

use mediakit_core::config::{QcRules, parse_comma_list, resolve_resolution};
use mediakit_core::external::{ProcessFfprobeExecutor, check_dependency};
use mediakit_core::qc::{ReportSummary, default_report_path, generate_report, scan_path};
use mediakit_core::terminal_output::{
    FileProgress, print_section, print_status, print_sub_item, print_success, print_warning,
};
use mediakit_core::CoreError;

use super::{notify_task_complete, show};
use crate::cli::{GlobalArgs, QcArgs};
use crate::error::{CliErrorContext, CliResult};

pub const TASK_NAME: &str = "QC scan";

/// Turns the command-line options into a rule set.
pub fn build_rules(args: &QcArgs) -> QcRules {
    let list = |value: &Option<String>, prefix: &str| {
        value
            .as_deref()
            .map(|v| parse_comma_list(v, prefix))
            .unwrap_or_default()
    };

    QcRules {
        max_bitrate_kbps: args.max_bitrate,
        min_bitrate_kbps: args.min_bitrate,
        max_resolution: args.max_resolution.as_deref().map(resolve_resolution).unwrap_or_default(),
        min_resolution: args.min_resolution.as_deref().map(resolve_resolution).unwrap_or_default(),
        check_video_compat: !args.no_video_compat,
        check_image_compat: !args.no_image_compat,
        check_signature: !args.no_signature,
        incompatible_containers: list(&args.containers, "."),
        incompatible_codecs: list(&args.codecs, ""),
        incompatible_images: list(&args.images, "."),
        ..QcRules::default()
    }
}

pub fn run_qc(args: QcArgs, global: &GlobalArgs) -> CliResult<()> {
    if !args.target.exists() {
        return Err(CoreError::PathError(format!(
            "Scan target does not exist: {}",
            args.target.display()
        )));
    }
    check_dependency(&global.ffprobe)?;

    let rules = build_rules(&args);
    let report_path = args
        .report
        .clone()
        .unwrap_or_else(|| default_report_path(&args.target));

    print_section("Media QC");
    print_status("Target", &show(&args.target), true);
    if rules.max_bitrate_kbps > 0 {
        print_status("Max bitrate", &format!("{} kbps", rules.max_bitrate_kbps), false);
    }
    if rules.min_bitrate_kbps > 0 {
        print_status("Min bitrate", &format!("{} kbps", rules.min_bitrate_kbps), false);
    }
    if !rules.max_resolution.is_empty() {
        print_status("Max resolution", &rules.max_resolution, false);
    }
    if !rules.min_resolution.is_empty() {
        print_status("Min resolution", &rules.min_resolution, false);
    }

    let executor = ProcessFfprobeExecutor::new(&global.ffprobe);
    let progress = FileProgress::new("Scanning");
    let results = scan_path(&executor, &args.target, &rules, |index, total, path| {
        progress.update(index, total, path);
    });
    progress.finish();
    let results = results?;

    let summary = ReportSummary::from_results(&results);
    if summary.total == 0 {
        print_warning("No media files found");
    }
    generate_report(&results, &report_path)
        .cli_with_context(|| format!("Writing report {}", report_path.display()))?;

    println!();
    print_status("Files", &summary.total.to_string(), true);
    print_status("Passed", &summary.passed.to_string(), false);
    print_status("Warnings", &summary.warned.to_string(), summary.warned > 0);
    print_status("Errors", &summary.errored.to_string(), summary.errored > 0);

    for info in results.iter().filter(|r| r.has_errors()) {
        print_sub_item(&format!("✗ {}", info.filename));
    }

    print_success(&format!("Report written to {}", report_path.display()));
    notify_task_complete(global, TASK_NAME);
    Ok(())
}
