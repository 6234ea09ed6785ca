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
use std::path::Path;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use colored::Color;
use logscribe::DEFAULT_MAX_MSG_LENGTH;
use logscribe::Options;
use logscribe::OptionsOverride;
use logscribe::global;
use serde_json::json;
use tempfile::TempDir;

// The defaults are process-wide; tests in this binary take turns.
static SERIAL: Mutex<()> = Mutex::new(());

fn reset(dir: &Path) -> MutexGuard<'static, ()> {
    let guard = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
    let defaults = Options::default()
        .with_dir_path(dir)
        .with_print_console(false);
    global::set_options(&defaults.into());
    guard
}

fn log_files(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| fs::read_to_string(entry.unwrap().path()).unwrap())
        .collect()
}

#[test]
fn test_set_options_returns_snapshot() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let _guard = reset(temp_dir.path());

    let snapshot = global::set_options(&OptionsOverride::new().file_prefix("svc"));
    assert_eq!(snapshot, global::options());
    assert_eq!(snapshot.file_prefix(), "svc");

    // mutating a snapshot leaves the defaults alone
    let changed = snapshot.with_max_msg_length(1);
    assert_ne!(changed, global::options());
    assert_eq!(global::options().max_msg_length(), DEFAULT_MAX_MSG_LENGTH);
}

#[test]
fn test_setters_ignore_invalid_input() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let _guard = reset(temp_dir.path());

    global::set_max_msg_length(-1i64);
    global::set_print_color("not a color");
    global::set_file_prefix("");
    let options = global::options();
    assert_eq!(options.max_msg_length(), DEFAULT_MAX_MSG_LENGTH);
    assert_eq!(options.print_color(), Color::Green);
    assert_eq!(options.file_prefix(), "application");

    global::set_max_msg_length(16u64);
    global::set_print_color("\x1b[34m");
    global::set_file_prefix("svc");
    global::set_disabled_tags(["debug"]);
    let options = global::options();
    assert_eq!(options.max_msg_length(), 16);
    assert_eq!(options.print_color(), Color::Blue);
    assert_eq!(options.file_prefix(), "svc");
    assert!(options.is_disabled(Some("debug")));
}

#[test]
fn test_set_options_value_drops_mistyped_fields() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let _guard = reset(temp_dir.path());

    let options = global::set_options_value(&json!({
        "dirPath": 7,
        "disabledTags": ["a", 1],
        "filePrefix": "svc",
        "maxMsgLength": "long",
        "printConsole": true,
        "printColor": "magenta",
    }));
    assert_eq!(options.dir_path(), temp_dir.path());
    assert!(options.disabled_tags().is_empty());
    assert_eq!(options.file_prefix(), "svc");
    assert_eq!(options.max_msg_length(), DEFAULT_MAX_MSG_LENGTH);
    assert!(options.print_console());
    assert_eq!(options.print_color(), Color::Magenta);

    assert_eq!(global::set_options_value(&json!("nope")), options);
}

#[test]
fn test_log_sync_writes_before_returning() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let _guard = reset(temp_dir.path());

    global::log_sync("booted", Some("boot"), None, None);

    let files = log_files(temp_dir.path());
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("[boot]\n"));
    assert!(files[0].ends_with("]\nbooted\n\n"));
}

#[test]
fn test_log_and_flush() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let _guard = reset(temp_dir.path());
    global::set_disabled_tags(["debug"]);

    global::log("kept", Some("info"), None, None);
    global::log("dropped", Some("debug"), Some(true), None);
    global::log(
        "truncated",
        None,
        None,
        Some(OptionsOverride::new().max_msg_length(5)),
    );
    global::flush();

    let files = log_files(temp_dir.path());
    assert_eq!(files.len(), 1);
    assert!(files[0].contains("]\nkept\n\n"));
    assert!(files[0].contains("]\ntrunc\n\n"));
    assert!(!files[0].contains("dropped"));
}

#[test]
fn test_print_writes_no_file() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let _guard = reset(temp_dir.path());

    global::print("console only", Some("print"), None);
    assert!(log_files(temp_dir.path()).is_empty());
}
