/*!
 * Tests for file utility functions
 */

use std::fs;

use anyhow::Result;
use ytsubdl::errors::DeliveryError;
use ytsubdl::file_utils::{Delivery, DirectoryDelivery, FileManager, DEFAULT_FILENAME};

use crate::common;

#[test]
fn test_sanitize_filename_withReservedCharacters_shouldReplaceWithUnderscore() {
    assert_eq!(FileManager::sanitize_filename("a/b:c*d", 200), "a_b_c_d");
    assert_eq!(FileManager::sanitize_filename(r#"x\y?"z"<>|"#, 200), "x_y__z____");
}

#[test]
fn test_sanitize_filename_withLongTitle_shouldTruncateToExactly200() {
    let title = "t".repeat(250);

    let sanitized = FileManager::sanitize_filename(&title, 200);

    assert_eq!(sanitized.chars().count(), 200);
}

#[test]
fn test_sanitize_filename_withEmptyTitle_shouldUseFallback() {
    assert_eq!(FileManager::sanitize_filename("", 200), DEFAULT_FILENAME);
}

#[test]
fn test_derive_filename_shouldJoinTitleLanguageAndExtension() {
    assert_eq!(
        FileManager::derive_filename("Rust: Ownership/Borrowing", "en", "srt", 200),
        "Rust_ Ownership_Borrowing.en.srt"
    );
}

#[test]
fn test_derive_filename_withPathInLanguageCode_shouldStaySingleComponent() {
    let filename = FileManager::derive_filename("clip", "x/../../escaped", "srt", 200);

    assert_eq!(filename, "clip.x_.._.._escaped.srt");
    assert!(FileManager::is_plain_filename(&filename));
}

#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "present.srt", "content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path().join("missing.srt")));
    Ok(())
}

#[test]
fn test_write_to_file_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested").join("deeper").join("out.txt");

    FileManager::write_to_file(&path, "hello")?;

    assert_eq!(FileManager::read_to_string(&path)?, "hello");
    Ok(())
}

#[test]
fn test_directory_delivery_shouldWriteIntoDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let delivery = DirectoryDelivery::new(temp_dir.path().join("subs"));

    let path = delivery.deliver("video.en.srt", "1\n00:00:00,000 --> 00:00:01,000\nHi\n\n")?;

    assert_eq!(path, temp_dir.path().join("subs").join("video.en.srt"));
    assert!(fs::read_to_string(&path)?.contains("Hi"));
    Ok(())
}

#[test]
fn test_directory_delivery_withExistingFile_shouldRefuseUnlessOverwriting() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "video.en.txt", "old")?;

    let refusing = DirectoryDelivery::new(temp_dir.path());
    let result = refusing.deliver("video.en.txt", "new");
    assert!(matches!(result, Err(DeliveryError::AlreadyExists(_))));
    assert_eq!(fs::read_to_string(temp_dir.path().join("video.en.txt"))?, "old");

    let overwriting = DirectoryDelivery::new(temp_dir.path()).overwrite(true);
    overwriting.deliver("video.en.txt", "new")?;
    assert_eq!(fs::read_to_string(temp_dir.path().join("video.en.txt"))?, "new");
    Ok(())
}

#[test]
fn test_directory_delivery_withTraversingFilename_shouldRefuse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let out_dir = temp_dir.path().join("out");
    let delivery = DirectoryDelivery::new(&out_dir).overwrite(true);

    let result = delivery.deliver("x/../../escaped.srt", "content");

    assert!(matches!(result, Err(DeliveryError::InvalidFilename(_))));
    assert!(!temp_dir.path().join("escaped.srt").exists());
    Ok(())
}
