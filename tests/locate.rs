// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs;

use logscribe::DEFAULT_FILE_PREFIX;
use logscribe::ErrorKind;
use logscribe::MAX_FILE_SIZE;
use logscribe::locate;
use regex::Regex;
use tempfile::TempDir;

fn file_name_shape() -> Regex {
    Regex::new(r"^application_\d{4}_\d{1,2}_\d{1,2}_\d+\.log$").unwrap()
}

#[test]
fn test_empty_directory_synthesizes_a_name() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");

    let path = locate(temp_dir.path(), DEFAULT_FILE_PREFIX).unwrap();
    assert!(path.is_absolute());
    assert_eq!(path.parent().unwrap(), temp_dir.path());

    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(file_name_shape().is_match(name), "{name}");

    // locating never creates the file
    assert!(!path.exists());
}

#[test]
fn test_small_file_is_reused() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let existing = temp_dir.path().join("application_1.log");
    fs::write(&existing, vec![b'x'; 500]).unwrap();

    let path = locate(temp_dir.path(), DEFAULT_FILE_PREFIX).unwrap();
    assert_eq!(path, existing);
}

#[test]
fn test_full_file_is_skipped() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let existing = temp_dir.path().join("application_1.log");
    fs::write(&existing, vec![b'x'; 1_200_000]).unwrap();

    let path = locate(temp_dir.path(), DEFAULT_FILE_PREFIX).unwrap();
    assert_ne!(path, existing);
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(file_name_shape().is_match(name), "{name}");
}

#[test]
fn test_file_at_ceiling_is_skipped() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let existing = temp_dir.path().join("application_1.log");
    fs::write(&existing, vec![b'x'; MAX_FILE_SIZE as usize]).unwrap();

    assert_ne!(locate(temp_dir.path(), DEFAULT_FILE_PREFIX).unwrap(), existing);
}

#[test]
fn test_only_matching_prefix_is_considered() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    fs::write(temp_dir.path().join("other_1.log"), "x").unwrap();
    fs::write(temp_dir.path().join("application.txt"), "x").unwrap();

    let path = locate(temp_dir.path(), DEFAULT_FILE_PREFIX).unwrap();
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(file_name_shape().is_match(name), "{name}");

    let audit = temp_dir.path().join("audit_1.log");
    fs::write(&audit, "x").unwrap();
    assert_eq!(locate(temp_dir.path(), "audit").unwrap(), audit);
}

#[test]
fn test_missing_directory_is_an_error() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let missing = temp_dir.path().join("missing");

    let err = locate(&missing, DEFAULT_FILE_PREFIX).unwrap_err();
    assert_eq!(err.message(), "failed to list log directory");
    assert_eq!(err.kind(), ErrorKind::ListDirectory);
    assert!(!missing.exists());
}
