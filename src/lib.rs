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

//! Logscribe appends tagged messages to size-rotated plain-text log files and optionally echoes
//! them to the console.
//!
//! # Overview
//!
//! Each call resolves its [`Options`] against a set of defaults, drops the entry when its tag is
//! disabled, picks the first log file in the directory that is still below [`MAX_FILE_SIZE`]
//! (synthesizing a fresh name otherwise) and appends a multi-line entry to it. Errors never reach
//! the caller; they are handed to a [`Trap`].
//!
//! # Examples
//!
//! Log through the process-wide defaults:
//!
//! ```
//! use logscribe::global;
//!
//! let dir = tempfile::tempdir().unwrap();
//! global::set_dir_path(dir.path());
//! global::set_disabled_tags(["debug"]);
//!
//! global::log("service started", Some("boot"), None, None);
//! global::log("dropped", Some("debug"), Some(true), None);
//! global::flush();
//! ```
//!
//! Own the defaults and the writer:
//!
//! ```
//! use logscribe::Options;
//! use logscribe::OptionsOverride;
//! use logscribe::Request;
//! use logscribe::Writer;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let defaults = Options::default().with_dir_path(dir.path());
//! let writer = Writer::builder().no_color().build();
//!
//! writer.write(
//!     &defaults,
//!     Request::new("!!disk almost full")
//!         .tag("storage")
//!         .options(OptionsOverride::new().file_prefix("storage")),
//! );
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod color;
pub mod console;
pub mod fs;
pub mod global;

#[cfg(feature = "non-blocking")]
pub mod non_blocking;

#[cfg(feature = "bridge-log")]
pub mod bridge;

mod clock;
mod entry;
mod error;
mod locate;
mod options;
mod trap;
mod writer;

pub use self::console::Console;
pub use self::console::Stderr;
pub use self::console::Stdout;
pub use self::entry::ALERT_MARKER;
pub use self::entry::Entry;
pub use self::entry::Message;
pub use self::error::Error;
pub use self::error::ErrorKind;
pub use self::fs::FileSystem;
pub use self::fs::StdFileSystem;
pub use self::locate::Locator;
pub use self::locate::MAX_FILE_SIZE;
pub use self::locate::locate;
pub use self::options::DEFAULT_FILE_PREFIX;
pub use self::options::DEFAULT_MAX_MSG_LENGTH;
pub use self::options::Options;
pub use self::options::OptionsOverride;
pub use self::options::WILDCARD_TAG;
pub use self::trap::DefaultTrap;
pub use self::trap::StderrTrap;
pub use self::trap::Trap;
pub use self::writer::Outcome;
pub use self::writer::Request;
pub use self::writer::Writer;
pub use self::writer::WriterBuilder;
