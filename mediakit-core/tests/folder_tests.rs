// mediakit-core/tests/folder_tests.rs

use mediakit_core::error::CoreError;
use mediakit_core::folders::{FolderOptions, create_folders};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_folders_created_next_to_list_by_default() {
    let dir = tempdir().unwrap();
    let list = dir.path().join("scenes.txt");
    fs::write(&list, "\u{FEFF}Opening\r\nAct: One\r\n   \r\nOpening\r\n").unwrap();

    let outcome = create_folders(&list, &FolderOptions::default()).unwrap();

    assert_eq!(outcome.success_count, 2);
    assert!(outcome.is_clean());
    assert!(dir.path().join("Opening").is_dir());
    assert!(dir.path().join("Act_ One").is_dir());
}

#[test]
fn test_blocked_folder_is_reported_and_batch_continues() {
    let dir = tempdir().unwrap();
    let list = dir.path().join("list.txt");
    fs::write(&list, "taken\nfree\n").unwrap();
    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("2_free"), b"a file, not a folder").unwrap();

    let options = FolderOptions {
        output_dir: Some(out.clone()),
        auto_number: true,
    };
    let outcome = create_folders(&list, &options).unwrap();

    assert_eq!(outcome.success_count, 1);
    assert_eq!(outcome.fail_count(), 1);
    assert!(outcome.errors[0].starts_with("2_free: "));
    assert!(out.join("1_taken").is_dir());
}

#[test]
fn test_empty_list_creates_nothing() {
    let dir = tempdir().unwrap();
    let list = dir.path().join("empty.txt");
    fs::write(&list, "\n  \n").unwrap();
    let out = dir.path().join("never");

    let options = FolderOptions {
        output_dir: Some(out.clone()),
        auto_number: false,
    };
    let outcome = create_folders(&list, &options).unwrap();

    assert_eq!(outcome.total(), 0);
    assert!(!out.exists());
}

#[test]
fn test_missing_list_is_invalid_input() {
    let dir = tempdir().unwrap();
    let result = create_folders(&dir.path().join("absent.txt"), &FolderOptions::default());
    assert!(matches!(result, Err(CoreError::InvalidInput(_))));
}
