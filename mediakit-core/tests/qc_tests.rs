// mediakit-core/tests/qc_tests.rs
//
// Directory scans driven by a scripted prober, plus report arithmetic.

use ffprobe::{FfProbe, Format, Stream};
use mediakit_core::config::QcRules;
use mediakit_core::error::{CoreError, CoreResult};
use mediakit_core::external::FfprobeExecutor;
use mediakit_core::qc::{ReportSummary, generate_report, scan_directory, scan_path};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::tempdir;

fn stream(codec_type: &str, codec_name: &str) -> Stream {
    let mut stream = Stream::default();
    stream.codec_type = Some(codec_type.to_string());
    stream.codec_name = Some(codec_name.to_string());
    stream
}

fn format(duration: Option<&str>, bit_rate: &str) -> Format {
    let mut format = Format::default();
    format.duration = duration.map(str::to_string);
    format.bit_rate = Some(bit_rate.to_string());
    format
}

fn h264_1080p() -> FfProbe {
    let mut video = stream("video", "h264");
    video.width = Some(1920);
    video.height = Some(1080);
    video.r_frame_rate = "25/1".to_string();
    let mut audio = stream("audio", "aac");
    audio.bit_rate = Some("192000".to_string());
    FfProbe {
        streams: vec![video, audio],
        format: format(Some("12.5"), "8000000"),
    }
}

fn webp_still() -> FfProbe {
    let mut video = stream("video", "webp");
    video.width = Some(800);
    video.height = Some(600);
    video.r_frame_rate = "25/1".to_string();
    FfProbe {
        streams: vec![video],
        format: format(Some("0.04"), "0"),
    }
}

/// Prober double returning canned metadata per file name.
///
/// Files whose name contains "corrupt" fail like an unreadable input.
struct ScriptedProbe {
    data_for: fn(&str) -> FfProbe,
    calls: Mutex<Vec<PathBuf>>,
}

impl ScriptedProbe {
    fn new(data_for: fn(&str) -> FfProbe) -> Self {
        Self {
            data_for,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FfprobeExecutor for ScriptedProbe {
    fn probe(&self, path: &Path) -> CoreResult<FfProbe> {
        self.calls.lock().unwrap().push(path.to_path_buf());
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        if name.contains("corrupt") {
            return Err(CoreError::JsonParseError(
                "Invalid data found when processing input".to_string(),
            ));
        }
        Ok((self.data_for)(&name))
    }
}

fn by_extension(name: &str) -> FfProbe {
    if name.ends_with(".webp") {
        webp_still()
    } else {
        h264_1080p()
    }
}

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"media bytes").unwrap();
}

#[test]
fn test_webp_yields_single_image_error() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("poster.webp"));

    let probe = ScriptedProbe::new(by_extension);
    let results = scan_directory(&probe, dir.path(), &QcRules::default(), |_, _, _| {}).unwrap();

    assert_eq!(results.len(), 1);
    let info = &results[0];
    assert_eq!(info.errors.len(), 1);
    assert!(info.errors[0].contains(".webp"));
    assert!(info.warnings.is_empty());
}

#[test]
fn test_unreadable_file_does_not_halt_scan() {
    let dir = tempdir().unwrap();
    for i in 0..9 {
        touch(&dir.path().join(format!("shots/clip_{i}.mp4")));
    }
    touch(&dir.path().join("shots/corrupt.mp4"));
    touch(&dir.path().join("shots/notes.txt"));

    let probe = ScriptedProbe::new(by_extension);
    let mut seen = Vec::new();
    let results = scan_directory(&probe, dir.path(), &QcRules::default(), |index, total, _| {
        seen.push((index, total));
    })
    .unwrap();

    assert_eq!(results.len(), 10);
    assert_eq!(probe.calls.lock().unwrap().len(), 10);
    assert_eq!(seen.last(), Some(&(10, 10)));

    let invalid: Vec<_> = results.iter().filter(|r| !r.is_valid).collect();
    assert_eq!(invalid.len(), 1);
    assert_eq!(invalid[0].filename, "corrupt.mp4");
    assert!(!invalid[0].errors.is_empty());

    for info in results.iter().filter(|r| r.is_valid) {
        assert_eq!(info.video_codec, "h264");
        assert_eq!((info.width, info.height), (1920, 1080));
        assert_eq!(info.bitrate_kbps, 8000);
        assert_eq!(info.audio_codec, "aac");
        assert!(info.passed());
    }
}

#[test]
fn test_malformed_resolution_is_inert() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("a.mp4"));

    let rules = QcRules {
        max_resolution: "not-a-resolution".to_string(),
        min_resolution: "x".to_string(),
        ..Default::default()
    };
    let probe = ScriptedProbe::new(by_extension);
    let results = scan_directory(&probe, dir.path(), &rules, |_, _, _| {}).unwrap();

    assert!(results[0].warnings.iter().all(|w| !w.contains("Resolution")));
    assert!(results[0].passed());
}

#[test]
fn test_thresholds_and_container_warnings_accumulate() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("master.mkv"));

    let rules = QcRules {
        max_bitrate_kbps: 5000,
        max_resolution: "1280x720".to_string(),
        ..Default::default()
    };
    let probe = ScriptedProbe::new(by_extension);
    let results = scan_directory(&probe, dir.path(), &rules, |_, _, _| {}).unwrap();
    let info = &results[0];

    assert!(info.errors.is_empty());
    assert!(info.warnings[0].starts_with("Bitrate 8000kbps exceeds"));
    assert!(info.warnings[1].starts_with("Resolution 1920x1080 exceeds"));
    assert!(info.warnings.iter().any(|w| w.contains("Container .mkv")));
    assert!(info.warnings.len() >= 4);
}

#[test]
fn test_scan_rejects_missing_root() {
    let dir = tempdir().unwrap();
    let probe = ScriptedProbe::new(by_extension);
    let result = scan_directory(&probe, &dir.path().join("missing"), &QcRules::default(), |_, _, _| {});
    assert!(matches!(result, Err(CoreError::PathError(_))));
}

#[test]
fn test_scan_path_accepts_single_file_with_any_extension() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("delivery.mxf");
    touch(&file);

    let probe = ScriptedProbe::new(by_extension);
    let results = scan_path(&probe, &file, &QcRules::default(), |_, _, _| {}).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].container, ".mxf");
}

#[test]
fn test_report_counts_and_file() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("ok.mp4"));
    touch(&dir.path().join("big.mp4"));
    touch(&dir.path().join("corrupt.mp4"));
    touch(&dir.path().join("still.webp"));

    // big.mp4 only warns; corrupt.mp4 and still.webp (zero bitrate) both error and warn
    let rules = QcRules {
        max_bitrate_kbps: 7000,
        min_bitrate_kbps: 1,
        ..Default::default()
    };
    let probe = ScriptedProbe::new(|name| {
        if name == "ok.mp4" {
            FfProbe {
                streams: Vec::new(),
                format: format(None, "5000000"),
            }
        } else {
            by_extension(name)
        }
    });
    let results = scan_directory(&probe, dir.path(), &rules, |_, _, _| {}).unwrap();

    let summary = ReportSummary::from_results(&results);
    assert_eq!(summary.total, 4);
    assert_eq!(summary.errored, 2);
    assert_eq!(summary.warned, 3);
    assert_eq!(summary.both, 2);
    assert_eq!(
        summary.passed,
        summary.total + summary.both - summary.errored - summary.warned
    );
    assert_eq!(summary.passed, 1);

    let report_path = dir.path().join("reports/qc.txt");
    let text = generate_report(&results, &report_path).unwrap();
    assert_eq!(fs::read_to_string(&report_path).unwrap(), text);
    assert!(text.contains("corrupt.mp4"));
    assert!(text.contains("[ERROR]"));
    assert!(text.contains("[WARN]"));
}
