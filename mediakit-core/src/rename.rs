// ============================================================================
// mediakit-core/src/rename.rs
// ============================================================================
//
// BATCH RENAME: Sequential naming of media files
//
// Assigns short sequential names (`图片_1.png`, `视频_3.mp4`, ...) to the media
// files under a root directory. Files are sorted by size, grouped by
// (relative parent directory, media label), and numbered per group starting
// at 1. In recursive mode each name is prefixed with a token derived from the
// file's folder path.
//
// KEY COMPONENTS:
// - batch_rename: collect -> filter -> sort -> group -> sequence -> apply
// - folder_prefix: prefix derivation from a relative directory
// - RenameReport: per-file results plus counts and error strings
//
// Each file is applied independently. A failure is recorded in the report and
// the batch continues; files already renamed stay renamed.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use filetime::FileTime;
use walkdir::WalkDir;

use crate::config::{DEFAULT_RENAME_OUTPUT, RenameConfig, RenameMode};
use crate::error::{CoreError, CoreResult};
use crate::utils::walk_files;

/// Characters that are not allowed in file names on common filesystems.
pub(crate) const ILLEGAL_NAME_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// A file that was renamed, copied or moved successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// A file whose operation failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameFailure {
    pub source: PathBuf,
    pub message: String,
}

impl RenameFailure {
    /// `"{file name}: {message}"`, the form shown to users.
    pub fn describe(&self) -> String {
        let name = self
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{}: {}", name, self.message)
    }
}

/// Outcome of a batch rename.
#[derive(Debug, Clone, Default)]
pub struct RenameReport {
    /// One entry per processed file, in processing order
    pub items: Vec<Result<RenamedFile, RenameFailure>>,
    /// Directory new names were placed under (the root for in-place mode)
    pub output_base: PathBuf,
}

impl RenameReport {
    pub fn success_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_ok()).count()
    }

    pub fn fail_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_err()).count()
    }

    /// Error strings for every failed file.
    pub fn errors(&self) -> Vec<String> {
        self.items
            .iter()
            .filter_map(|item| item.as_ref().err())
            .map(RenameFailure::describe)
            .collect()
    }
}

/// A file scheduled for renaming, before collision handling.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PlannedRename {
    source: PathBuf,
    /// Parent directory relative to the root; empty when not recursive
    rel_dir: PathBuf,
    new_name: String,
}

/// Renames the media files under `root` according to `config`.
///
/// # Returns
///
/// * `Ok(RenameReport)` - Per-file results; an empty report when nothing matched
/// * `Err(CoreError::PathError)` - If `root` is not a directory
/// * `Err(CoreError::Walkdir)` - If `root` cannot be listed
/// * `Err(CoreError::Io)` - If the output directory cannot be created
pub fn batch_rename(root: &Path, config: &RenameConfig) -> CoreResult<RenameReport> {
    if !root.is_dir() {
        return Err(CoreError::PathError(format!(
            "Input path is not a directory: {}",
            root.display()
        )));
    }

    log::info!(
        "Batch rename: {} (mode: {:?}, target: {:?}, recursive: {}, truncate at underscore: {})",
        root.display(),
        config.mode,
        config.target,
        config.recursive,
        config.truncate_at_underscore
    );

    let plan = plan_renames(root, config)?;
    if plan.is_empty() {
        log::info!("No matching files found");
        return Ok(RenameReport {
            items: Vec::new(),
            output_base: root.to_path_buf(),
        });
    }
    log::info!("Found {} file(s)", plan.len());

    let output_base = match config.mode {
        RenameMode::InPlace => root.to_path_buf(),
        RenameMode::Copy | RenameMode::Move => {
            let base = config
                .output_dir
                .clone()
                .unwrap_or_else(|| root.join(DEFAULT_RENAME_OUTPUT));
            fs::create_dir_all(&base)?;
            base
        }
    };

    let items = plan
        .iter()
        .map(|planned| apply(planned, config.mode, &output_base))
        .collect();

    let report = RenameReport { items, output_base };
    log::info!(
        "Rename complete: {} succeeded, {} failed",
        report.success_count(),
        report.fail_count()
    );
    Ok(report)
}

/// Builds the ordered rename plan: filtered, size-sorted, grouped and numbered.
fn plan_renames(root: &Path, config: &RenameConfig) -> CoreResult<Vec<PlannedRename>> {
    let mut files: Vec<(PathBuf, &str, u64)> = collect_files(root, config.recursive)?
        .into_iter()
        .filter_map(|path| {
            let label = media_label(&path, config)?;
            let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            Some((path, label, size))
        })
        .collect();

    // Stable: equal sizes keep listing order.
    files.sort_by_key(|(_, _, size)| *size);

    // Groups keep first-appearance order; counters are independent per group.
    let mut group_index: HashMap<(PathBuf, &str), usize> = HashMap::new();
    let mut groups: Vec<Vec<PathBuf>> = Vec::new();
    let mut keys: Vec<(PathBuf, &str)> = Vec::new();

    for (path, label, _) in files {
        let rel_dir = if config.recursive {
            relative_parent(root, &path)
        } else {
            PathBuf::new()
        };
        let key = (rel_dir, label);
        let index = *group_index.entry(key.clone()).or_insert_with(|| {
            groups.push(Vec::new());
            keys.push(key);
            groups.len() - 1
        });
        groups[index].push(path);
    }

    let mut plan = Vec::new();
    for ((rel_dir, label), members) in keys.into_iter().zip(groups) {
        let prefix = if config.recursive {
            folder_prefix(&rel_dir, config.truncate_at_underscore)
        } else {
            String::new()
        };
        for (i, source) in members.into_iter().enumerate() {
            let ext = source
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default();
            plan.push(PlannedRename {
                new_name: format!("{prefix}{label}_{}{ext}", i + 1),
                rel_dir: rel_dir.clone(),
                source,
            });
        }
    }
    Ok(plan)
}

fn collect_files(root: &Path, recursive: bool) -> CoreResult<Vec<PathBuf>> {
    let mut walker = WalkDir::new(root).min_depth(1);
    if !recursive {
        walker = walker.max_depth(1);
    }
    walk_files(walker)
}

/// Label for a file, or `None` when it is outside the configured target.
fn media_label<'a>(path: &Path, config: &'a RenameConfig) -> Option<&'a str> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    if config.target.includes_images() && config.image_extensions.contains(&ext) {
        return Some(&config.image_label);
    }
    if config.target.includes_videos() && config.video_extensions.contains(&ext) {
        return Some(&config.video_label);
    }
    None
}

fn relative_parent(root: &Path, path: &Path) -> PathBuf {
    path.parent()
        .and_then(|parent| parent.strip_prefix(root).ok())
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

/// Derives the name prefix for files in `rel_dir`.
///
/// Each folder name is optionally cut at its first underscore, has illegal
/// characters replaced with `_` and surrounding underscores trimmed. Empty
/// results are skipped. The remaining parts are joined with `_` and followed
/// by a trailing `_`; no usable part yields an empty prefix.
pub fn folder_prefix(rel_dir: &Path, truncate_at_underscore: bool) -> String {
    let parts: Vec<String> = rel_dir
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .filter_map(|name| {
            let name = if truncate_at_underscore {
                name.split('_').next().unwrap_or_default().to_string()
            } else {
                name
            };
            let cleaned = name.replace(ILLEGAL_NAME_CHARS, "_");
            let trimmed = cleaned.trim_matches('_');
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect();

    if parts.is_empty() {
        String::new()
    } else {
        format!("{}_", parts.join("_"))
    }
}

fn apply(planned: &PlannedRename, mode: RenameMode, output_base: &Path) -> Result<RenamedFile, RenameFailure> {
    let fail = |message: String| {
        log::error!("[FAILED] {}: {}", planned.source.display(), message);
        RenameFailure {
            source: planned.source.clone(),
            message,
        }
    };

    let target_dir = match mode {
        RenameMode::InPlace => planned
            .source
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
        RenameMode::Copy | RenameMode::Move => {
            let dir = output_base.join(&planned.rel_dir);
            fs::create_dir_all(&dir).map_err(|e| fail(e.to_string()))?;
            dir
        }
    };

    let destination = resolve_collision(&planned.source, target_dir.join(&planned.new_name));

    let result = match mode {
        RenameMode::InPlace => fs::rename(&planned.source, &destination),
        RenameMode::Copy => copy_with_times(&planned.source, &destination),
        RenameMode::Move => move_file(&planned.source, &destination),
    };
    result.map_err(|e| fail(e.to_string()))?;

    let op = match mode {
        RenameMode::InPlace => "RENAMED",
        RenameMode::Copy => "COPIED",
        RenameMode::Move => "MOVED",
    };
    log::info!(
        "[{}] {} -> {}",
        op,
        planned.source.display(),
        destination.display()
    );

    Ok(RenamedFile {
        source: planned.source.clone(),
        destination,
    })
}

/// Appends `_1`, `_2`, ... before the extension until `candidate` is free.
///
/// A candidate that is the source file itself is kept as is.
fn resolve_collision(source: &Path, candidate: PathBuf) -> PathBuf {
    if !candidate.exists() || same_file(source, &candidate) {
        return candidate;
    }

    let stem = candidate
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = candidate
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let dir = candidate.parent().map(Path::to_path_buf).unwrap_or_default();

    let mut counter = 1;
    loop {
        let next = dir.join(format!("{stem}_{counter}{ext}"));
        if !next.exists() {
            return next;
        }
        counter += 1;
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Copies a file and carries over its access and modification times.
pub(crate) fn copy_with_times(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to)?;
    let metadata = fs::metadata(from)?;
    let mtime = FileTime::from_last_modification_time(&metadata);
    let atime = FileTime::from_last_access_time(&metadata);
    filetime::set_file_times(to, atime, mtime)
}

/// Moves a file, falling back to copy-and-delete across filesystems.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    copy_with_times(from, to)?;
    fs::remove_file(from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RenameConfigBuilder, RenameTarget};
    use tempfile::tempdir;

    #[test]
    fn test_folder_prefix_truncates_and_sanitizes() {
        assert_eq!(folder_prefix(Path::new(""), true), "");
        assert_eq!(folder_prefix(Path::new("Shoot_2024"), true), "Shoot_");
        assert_eq!(folder_prefix(Path::new("Shoot_2024"), false), "Shoot_2024_");
        assert_eq!(folder_prefix(Path::new("A_x/B_y"), true), "A_B_");
        assert_eq!(folder_prefix(Path::new("what?/ok"), false), "what_ok_");
    }

    #[test]
    fn test_folder_prefix_skips_empty_parts() {
        assert_eq!(folder_prefix(Path::new("___"), false), "");
        assert_eq!(folder_prefix(Path::new("_hidden/Cam"), true), "Cam_");
        assert_eq!(folder_prefix(Path::new("**/Cam"), false), "Cam_");
    }

    #[test]
    fn test_plan_groups_per_folder_and_label() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("Day1_raw")).unwrap();
        fs::write(root.join("a.png"), vec![0u8; 30]).unwrap();
        fs::write(root.join("b.png"), vec![0u8; 10]).unwrap();
        fs::write(root.join("c.mp4"), vec![0u8; 5]).unwrap();
        fs::write(root.join("Day1_raw/d.jpg"), vec![0u8; 20]).unwrap();
        fs::write(root.join("Day1_raw/e.txt"), vec![0u8; 1]).unwrap();

        let config = RenameConfigBuilder::new().labels("image", "video").build();
        let mut plan: Vec<(String, String)> = plan_renames(root, &config)
            .unwrap()
            .into_iter()
            .map(|p| {
                (
                    p.source.file_name().unwrap().to_string_lossy().into_owned(),
                    p.new_name,
                )
            })
            .collect();
        plan.sort();

        assert_eq!(
            plan,
            vec![
                ("a.png".to_string(), "image_2.png".to_string()),
                ("b.png".to_string(), "image_1.png".to_string()),
                ("c.mp4".to_string(), "video_1.mp4".to_string()),
                ("d.jpg".to_string(), "Day1_image_1.jpg".to_string()),
            ]
        );
    }

    #[test]
    fn test_plan_respects_target() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.png"), b"1").unwrap();
        fs::write(dir.path().join("b.mov"), b"1").unwrap();

        let config = RenameConfigBuilder::new()
            .target(RenameTarget::Videos)
            .build();
        let plan = plan_renames(dir.path(), &config).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].new_name, "视频_1.mov");
    }

    #[test]
    fn test_resolve_collision_appends_counter() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("src.png");
        fs::write(&source, b"s").unwrap();
        fs::write(dir.path().join("图片_1.png"), b"x").unwrap();
        fs::write(dir.path().join("图片_1_1.png"), b"x").unwrap();

        let resolved = resolve_collision(&source, dir.path().join("图片_1.png"));
        assert_eq!(resolved, dir.path().join("图片_1_2.png"));

        // The source itself is not a collision.
        assert_eq!(resolve_collision(&source, source.clone()), source);
    }

    #[test]
    fn test_report_counts_and_errors() {
        let report = RenameReport {
            items: vec![
                Ok(RenamedFile {
                    source: "a.png".into(),
                    destination: "图片_1.png".into(),
                }),
                Err(RenameFailure {
                    source: "/x/b.png".into(),
                    message: "permission denied".into(),
                }),
            ],
            output_base: PathBuf::from("/x"),
        };
        assert_eq!(report.success_count(), 1);
        assert_eq!(report.fail_count(), 1);
        assert_eq!(report.errors(), vec!["b.png: permission denied".to_string()]);
    }
}
