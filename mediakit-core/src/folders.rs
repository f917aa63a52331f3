// ============================================================================
// mediakit-core/src/folders.rs
// ============================================================================
//
// FOLDER CREATION: Batch folder creation from a text list
//
// Reads one folder name per line from a text file, sanitizes each name for the
// filesystem and creates the folders under an output directory. Lists exported
// from spreadsheets on Chinese Windows systems are often GBK encoded, so the
// decoder falls back to GBK when the bytes are not valid UTF-8.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::{GBK, UTF_16BE, UTF_16LE};

use crate::batch::BatchOutcome;
use crate::error::{CoreError, CoreResult};
use crate::rename::ILLEGAL_NAME_CHARS;

/// Name used when a line sanitizes to nothing.
pub const UNTITLED_FOLDER: &str = "untitled";

/// Options for [`create_folders`].
#[derive(Debug, Clone, Default)]
pub struct FolderOptions {
    /// Parent directory for the new folders; `None` uses the list's directory
    pub output_dir: Option<PathBuf>,
    /// Prefix every folder with `{n}_`, starting at 1
    pub auto_number: bool,
}

/// Decodes a text list.
///
/// UTF-8 (with or without BOM) and UTF-16 with BOM are detected; anything
/// else is decoded as GBK.
pub fn decode_text(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(rest).into_owned();
    }
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return UTF_16LE.decode_with_bom_removal(bytes).0.into_owned();
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return UTF_16BE.decode_with_bom_removal(bytes).0.into_owned();
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            log::debug!("Text list is not UTF-8, decoding as GBK");
            GBK.decode(bytes).0.into_owned()
        }
    }
}

/// Makes a single line usable as a folder name.
///
/// Illegal characters become `_`, runs of `_` collapse to one and surrounding
/// underscores are trimmed. An empty result becomes [`UNTITLED_FOLDER`].
pub fn sanitize_folder_name(name: &str) -> String {
    let replaced = name.trim().replace(ILLEGAL_NAME_CHARS, "_");

    let mut collapsed = String::with_capacity(replaced.len());
    for c in replaced.chars() {
        if c == '_' && collapsed.ends_with('_') {
            continue;
        }
        collapsed.push(c);
    }

    let trimmed = collapsed.trim_matches('_');
    if trimmed.is_empty() {
        UNTITLED_FOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Extracts unique, sanitized folder names from list text.
///
/// Blank lines are skipped. Duplicates keep their first occurrence.
pub fn parse_folder_names(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(sanitize_folder_name)
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Reads and parses a folder list file.
pub fn read_folder_names(list_path: &Path) -> CoreResult<Vec<String>> {
    let bytes = fs::read(list_path).map_err(|e| {
        CoreError::InvalidInput(format!(
            "Failed to read folder list {}: {}",
            list_path.display(),
            e
        ))
    })?;
    Ok(parse_folder_names(&decode_text(&bytes)))
}

/// Directory that receives the folders when no output directory is given.
pub fn default_output_dir(list_path: &Path) -> PathBuf {
    list_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Creates one folder per name in `list_path`.
///
/// # Returns
///
/// * `Ok(BatchOutcome)` - Created and failed folders; empty for an empty list
/// * `Err(CoreError::InvalidInput)` - If the list cannot be read
/// * `Err(CoreError::Io)` - If the output directory cannot be created
pub fn create_folders(list_path: &Path, options: &FolderOptions) -> CoreResult<BatchOutcome> {
    let names = read_folder_names(list_path)?;
    let output_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(list_path));

    log::info!(
        "Creating folders from {} in {} (auto number: {})",
        list_path.display(),
        output_dir.display(),
        options.auto_number
    );

    let mut outcome = BatchOutcome::new();
    if names.is_empty() {
        log::warn!("Folder list is empty or has no usable lines");
        return Ok(outcome);
    }
    log::info!("Read {} folder name(s)", names.len());

    fs::create_dir_all(&output_dir)?;

    for (i, name) in names.iter().enumerate() {
        let folder_name = if options.auto_number {
            format!("{}_{}", i + 1, name)
        } else {
            name.clone()
        };

        match fs::create_dir_all(output_dir.join(&folder_name)) {
            Ok(()) => {
                log::info!("[CREATED] {}", folder_name);
                outcome.record_success();
            }
            Err(e) => {
                log::error!("[FAILED] {}: {}", folder_name, e);
                outcome.record_failure(&folder_name, e.to_string());
            }
        }
    }

    Ok(outcome)
}
