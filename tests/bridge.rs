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

#![cfg(feature = "bridge-log")]

use std::fs;

use logscribe::global;
use tempfile::TempDir;

#[test]
fn test_log_records_are_tagged_with_their_level() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    global::set_dir_path(temp_dir.path());
    global::set_print_console(false);
    global::set_disabled_tags(["trace"]);

    logscribe::bridge::setup_log_crate();
    assert!(logscribe::bridge::try_setup_log_crate().is_err());

    log::error!("disk {} failed", 3);
    log::info!("recovered");
    log::trace!("hidden");
    global::flush();

    let content = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|entry| fs::read_to_string(entry.unwrap().path()).unwrap())
        .collect::<String>();
    assert!(content.starts_with("[error]\n"), "{content}");
    assert!(content.contains("]\ndisk 3 failed\n\n[info]\n"), "{content}");
    assert!(content.ends_with("]\nrecovered\n\n"), "{content}");
    assert!(!content.contains("hidden"));
}
