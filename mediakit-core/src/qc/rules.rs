//! Rule evaluation for scanned media.
//!
//! Rules are independent and additive. Findings are appended in a fixed order:
//! bitrate ceiling, bitrate floor, resolution ceiling, resolution floor,
//! container blacklist, codec blacklist, MKV nudge, image-format blacklist,
//! signature mismatch. Only the image-format rule produces an error; every
//! other rule produces a warning.

use crate::config::QcRules;

use super::MediaInfo;
use super::signature::check_signature;

/// Parses a `WxH` threshold string.
///
/// Returns `None` for anything that is not exactly two unsigned integers
/// separated by a lowercase `x`. Callers treat `None` as "rule disabled".
pub fn parse_resolution(value: &str) -> Option<(u32, u32)> {
    let (w, h) = value.trim().split_once('x')?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

/// Applies `rules` to `info`, appending warnings and errors.
///
/// Evaluation happens at most once per result; later calls leave the
/// findings untouched.
pub fn evaluate(info: &mut MediaInfo, rules: &QcRules) {
    if info.is_evaluated() {
        log::debug!("Skipping repeated evaluation of {}", info.path.display());
        return;
    }
    info.mark_evaluated();

    check_thresholds(info, rules);

    if rules.check_video_compat {
        check_video_compat(info, rules);
    }

    if rules.check_image_compat && rules.effective_images().contains(&info.container) {
        info.errors.push(format!(
            "[Compatibility] Image format {} may not be supported",
            info.container
        ));
    }

    if rules.check_signature {
        if let Some(warning) = check_signature(&info.path, &info.container) {
            info.warnings.push(warning);
        }
    }
}

fn check_thresholds(info: &mut MediaInfo, rules: &QcRules) {
    if rules.max_bitrate_kbps > 0 && info.bitrate_kbps > rules.max_bitrate_kbps {
        info.warnings.push(format!(
            "Bitrate {}kbps exceeds maximum {}kbps",
            info.bitrate_kbps, rules.max_bitrate_kbps
        ));
    }

    if rules.min_bitrate_kbps > 0 && info.bitrate_kbps < rules.min_bitrate_kbps {
        info.warnings.push(format!(
            "Bitrate {}kbps is below minimum {}kbps",
            info.bitrate_kbps, rules.min_bitrate_kbps
        ));
    }

    if let Some((max_w, max_h)) = parse_resolution(&rules.max_resolution) {
        if info.width > max_w || info.height > max_h {
            info.warnings.push(format!(
                "Resolution {}x{} exceeds maximum {}",
                info.width, info.height, rules.max_resolution
            ));
        }
    }

    if let Some((min_w, min_h)) = parse_resolution(&rules.min_resolution) {
        if info.width < min_w || info.height < min_h {
            info.warnings.push(format!(
                "Resolution {}x{} is below minimum {}",
                info.width, info.height, rules.min_resolution
            ));
        }
    }
}

fn check_video_compat(info: &mut MediaInfo, rules: &QcRules) {
    if rules.effective_containers().contains(&info.container) {
        info.warnings.push(format!(
            "[Compatibility] Container {} may cause compatibility issues",
            info.container
        ));
    }

    if rules
        .effective_codecs()
        .contains(&info.video_codec.to_lowercase())
    {
        info.warnings.push(format!(
            "[Compatibility] Codec {} may cause compatibility issues",
            info.video_codec
        ));
    }

    // Independent of the container blacklist.
    if info.container == ".mkv" {
        info.warnings.push(
            "[Compatibility] MKV is not editor-friendly; consider remuxing to MP4/MOV".to_string(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_comma_list;

    fn video(container: &str, codec: &str, width: u32, height: u32, kbps: u64) -> MediaInfo {
        let mut info = MediaInfo::new(format!("/nonexistent/clip{container}"));
        info.video_codec = codec.to_string();
        info.width = width;
        info.height = height;
        info.bitrate_kbps = kbps;
        info
    }

    fn plain_rules() -> QcRules {
        QcRules {
            check_video_compat: false,
            check_image_compat: false,
            check_signature: false,
            ..QcRules::default()
        }
    }

    #[test]
    fn test_parse_resolution() {
        assert_eq!(parse_resolution("1920x1080"), Some((1920, 1080)));
        assert_eq!(parse_resolution(" 1280 x 720 "), Some((1280, 720)));
        assert_eq!(parse_resolution("not-a-resolution"), None);
        assert_eq!(parse_resolution("1920X1080"), None);
        assert_eq!(parse_resolution("1920x"), None);
        assert_eq!(parse_resolution("1x2x3"), None);
        assert_eq!(parse_resolution(""), None);
    }

    #[test]
    fn test_bitrate_ceiling_is_monotonic() {
        let rules = QcRules {
            max_bitrate_kbps: 5000,
            ..plain_rules()
        };
        for (kbps, expect_warning) in [(4999, false), (5000, false), (5001, true), (90000, true)] {
            let mut info = video(".mp4", "h264", 1920, 1080, kbps);
            evaluate(&mut info, &rules);
            assert_eq!(info.has_warnings(), expect_warning, "bitrate {kbps}");
        }
    }

    #[test]
    fn test_bitrate_floor_is_monotonic() {
        let rules = QcRules {
            min_bitrate_kbps: 1000,
            ..plain_rules()
        };
        for (kbps, expect_warning) in [(0, true), (999, true), (1000, false), (1001, false)] {
            let mut info = video(".mp4", "h264", 1920, 1080, kbps);
            evaluate(&mut info, &rules);
            assert_eq!(info.has_warnings(), expect_warning, "bitrate {kbps}");
        }
    }

    #[test]
    fn test_resolution_thresholds() {
        let rules = QcRules {
            max_resolution: "1920x1080".into(),
            min_resolution: "1280x720".into(),
            ..plain_rules()
        };

        let mut big = video(".mp4", "h264", 3840, 2160, 0);
        evaluate(&mut big, &rules);
        assert_eq!(big.warnings, vec!["Resolution 3840x2160 exceeds maximum 1920x1080"]);

        let mut small = video(".mp4", "h264", 640, 480, 0);
        evaluate(&mut small, &rules);
        assert_eq!(small.warnings, vec!["Resolution 640x480 is below minimum 1280x720"]);

        let mut ok = video(".mp4", "h264", 1920, 1080, 0);
        evaluate(&mut ok, &rules);
        assert!(ok.passed());
    }

    #[test]
    fn test_malformed_resolution_is_inert() {
        let rules = QcRules {
            max_resolution: "not-a-resolution".into(),
            min_resolution: "abc".into(),
            ..plain_rules()
        };
        let mut info = video(".mp4", "h264", 99999, 1, 0);
        evaluate(&mut info, &rules);
        assert!(info.passed());
    }

    #[test]
    fn test_mkv_vp9_collects_warnings_in_order() {
        let mut info = video(".mkv", "VP9", 1920, 1080, 0);
        evaluate(&mut info, &QcRules::default());

        assert!(info.errors.is_empty());
        assert_eq!(info.warnings.len(), 3);
        assert!(info.warnings[0].contains("Container .mkv"));
        assert!(info.warnings[1].contains("Codec VP9"));
        assert!(info.warnings[2].contains("MKV"));
    }

    #[test]
    fn test_mkv_nudge_independent_of_container_blacklist() {
        let rules = QcRules {
            incompatible_containers: parse_comma_list("flv", "."),
            check_signature: false,
            ..QcRules::default()
        };
        let mut info = video(".mkv", "h264", 1920, 1080, 0);
        evaluate(&mut info, &rules);
        assert_eq!(info.warnings.len(), 1);
        assert!(info.warnings[0].contains("MKV"));
    }

    #[test]
    fn test_image_format_is_error() {
        let mut info = video(".webp", "webp", 512, 512, 0);
        evaluate(&mut info, &QcRules::default());
        assert_eq!(info.errors.len(), 1);
        assert!(info.errors[0].contains(".webp"));
        assert!(info.warnings.is_empty());
    }

    #[test]
    fn test_custom_image_set_replaces_default() {
        let rules = QcRules {
            incompatible_images: parse_comma_list("png", "."),
            ..plain_rules()
        };
        let rules = QcRules {
            check_image_compat: true,
            ..rules
        };
        let mut webp = video(".webp", "webp", 1, 1, 0);
        evaluate(&mut webp, &rules);
        assert!(webp.errors.is_empty());

        let mut png = video(".png", "png", 1, 1, 0);
        evaluate(&mut png, &rules);
        assert_eq!(png.errors.len(), 1);
    }

    #[test]
    fn test_evaluate_twice_does_not_duplicate() {
        let rules = QcRules::default();
        let mut info = video(".mkv", "av1", 1920, 1080, 0);
        evaluate(&mut info, &rules);
        let first = info.clone();
        evaluate(&mut info, &rules);
        assert_eq!(info.warnings, first.warnings);
        assert_eq!(info.errors, first.errors);
        assert!(info.is_evaluated());
    }
}
