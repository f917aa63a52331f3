//! Directory scanning for the QC workflow.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::QcRules;
use crate::error::{CoreError, CoreResult};
use crate::external::FfprobeExecutor;
use crate::utils::walk_files;

use super::{MediaInfo, container_of, evaluate, probe};

/// Recursively scans `root`, probing and evaluating every matching file.
///
/// A file matches when its extension is in the scanned video set or in the
/// default-plus-custom image set. Results come back in walk order. Per-file
/// failures are recorded inside the returned results. Only a root that is
/// not a directory, or cannot be listed, fails the whole scan.
///
/// `on_file` is called before each file is probed with the 1-based position,
/// the total number of candidates and the file path.
pub fn scan_directory<E, F>(
    executor: &E,
    root: &Path,
    rules: &QcRules,
    mut on_file: F,
) -> CoreResult<Vec<MediaInfo>>
where
    E: FfprobeExecutor + ?Sized,
    F: FnMut(usize, usize, &Path),
{
    if !root.is_dir() {
        return Err(CoreError::PathError(format!(
            "Scan target is not a directory: {}",
            root.display()
        )));
    }

    let candidates = collect_candidates(root, rules)?;
    log::info!(
        "Scanning {} media file(s) under {}",
        candidates.len(),
        root.display()
    );

    let total = candidates.len();
    let results = candidates
        .iter()
        .enumerate()
        .map(|(index, path)| {
            on_file(index + 1, total, path);
            scan_file(executor, path, rules)
        })
        .collect();

    Ok(results)
}

/// Scans a directory, or a single file regardless of its extension.
pub fn scan_path<E, F>(
    executor: &E,
    target: &Path,
    rules: &QcRules,
    mut on_file: F,
) -> CoreResult<Vec<MediaInfo>>
where
    E: FfprobeExecutor + ?Sized,
    F: FnMut(usize, usize, &Path),
{
    if target.is_file() {
        on_file(1, 1, target);
        return Ok(vec![scan_file(executor, target, rules)]);
    }
    scan_directory(executor, target, rules, on_file)
}

fn scan_file<E: FfprobeExecutor + ?Sized>(executor: &E, path: &Path, rules: &QcRules) -> MediaInfo {
    log::debug!("Scanning: {}", path.display());
    let mut info = probe(executor, path);
    evaluate(&mut info, rules);
    info
}

fn collect_candidates(root: &Path, rules: &QcRules) -> CoreResult<Vec<PathBuf>> {
    let images = rules.scanned_image_extensions();
    let files = walk_files(WalkDir::new(root))?;
    Ok(files
        .into_iter()
        .filter(|path| {
            let ext = container_of(path);
            rules.video_extensions.contains(&ext) || images.contains(&ext)
        })
        .collect())
}
