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

//! The process-wide default options and the log calls that use them.
//!
//! Every call snapshots the defaults when it is made, so a later setter never affects an entry
//! that was already requested.
//!
//! # Examples
//!
//! ```
//! use logscribe::global;
//!
//! let dir = tempfile::tempdir().unwrap();
//! global::set_dir_path(dir.path());
//! global::set_print_console(false);
//!
//! global::log("service started", Some("boot"), None, None);
//! global::flush();
//! ```
//!
//! A program that logs with [`log`] should hold the worker guard in `main`, so that entries still
//! queued when `main` returns are written:
//!
//! ```
//! use logscribe::global;
//!
//! let dir = tempfile::tempdir().unwrap();
//! global::set_dir_path(dir.path());
//! global::set_print_console(false);
//!
//! let _guard = global::worker_guard();
//! global::log("service started", Some("boot"), None, None);
//! ```

use std::path::PathBuf;
use std::sync::LazyLock;
use std::sync::PoisonError;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;
#[cfg(feature = "non-blocking")]
use std::sync::Mutex;
#[cfg(feature = "non-blocking")]
use std::sync::OnceLock;
#[cfg(feature = "non-blocking")]
use std::time::Duration;

use serde_json::Value;

use crate::Options;
use crate::OptionsOverride;
use crate::Request;
use crate::Writer;
use crate::color::parse_color;
use crate::entry::Message;
#[cfg(feature = "non-blocking")]
use crate::non_blocking::NonBlocking;
#[cfg(feature = "non-blocking")]
use crate::non_blocking::NonBlockingBuilder;
#[cfg(feature = "non-blocking")]
use crate::non_blocking::WorkerGuard;

static DEFAULTS: LazyLock<RwLock<Options>> = LazyLock::new(|| RwLock::new(Options::default()));

static WRITER: LazyLock<Writer> = LazyLock::new(Writer::default);

#[cfg(feature = "non-blocking")]
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

// None falls back to writing on the caller's thread.
#[cfg(feature = "non-blocking")]
static BACKGROUND: OnceLock<Option<NonBlocking>> = OnceLock::new();

#[cfg(feature = "non-blocking")]
static GUARD: Mutex<Option<WorkerGuard>> = Mutex::new(None);

#[cfg(feature = "non-blocking")]
fn background() -> Option<&'static NonBlocking> {
    BACKGROUND
        .get_or_init(|| {
            let (non_blocking, guard) =
                NonBlockingBuilder::new("logscribe-global", Writer::default())
                    .shutdown_timeout(Some(SHUTDOWN_TIMEOUT))
                    .build()
                    .ok()?;
            *GUARD.lock().unwrap_or_else(PoisonError::into_inner) = Some(guard);
            Some(non_blocking)
        })
        .as_ref()
}

/// Take the guard of the worker that writes the entries queued by [`log`].
///
/// Hold the guard in `main`. Dropping it writes every entry queued so far, waiting at most one
/// second, and stops the worker; entries logged by [`log`] afterwards are dropped. Without the
/// guard, entries still queued when the process exits are lost unless [`flush`] is called.
///
/// Return `None` if the guard was already taken or the worker could not be started.
#[cfg(feature = "non-blocking")]
pub fn worker_guard() -> Option<WorkerGuard> {
    background()?;
    GUARD.lock().unwrap_or_else(PoisonError::into_inner).take()
}

fn read() -> RwLockReadGuard<'static, Options> {
    DEFAULTS.read().unwrap_or_else(PoisonError::into_inner)
}

fn write() -> RwLockWriteGuard<'static, Options> {
    DEFAULTS.write().unwrap_or_else(PoisonError::into_inner)
}

/// Return a snapshot of the current default options.
///
/// Mutating the returned value has no effect on the defaults.
pub fn options() -> Options {
    read().clone()
}

/// Merge `patch` into the default options and return a snapshot of the result.
pub fn set_options(patch: &OptionsOverride) -> Options {
    let mut defaults = write();
    defaults.apply(patch);
    defaults.clone()
}

/// Merge a dynamically typed patch into the default options and return a snapshot of the result.
///
/// Fields of the wrong JSON type are ignored. A value that is not an object changes nothing.
///
/// ```
/// use logscribe::global;
///
/// let options = global::set_options_value(&serde_json::json!({
///     "maxMsgLength": 512,
///     "printConsole": "yes",
/// }));
/// assert_eq!(options.max_msg_length(), 512);
/// ```
pub fn set_options_value(value: &Value) -> Options {
    set_options(&OptionsOverride::from_value(value))
}

/// Set the default directory log files are written to.
pub fn set_dir_path(dir_path: impl Into<PathBuf>) {
    set_options(&OptionsOverride::new().dir_path(dir_path));
}

/// Replace the default set of disabled tags.
pub fn set_disabled_tags<I, S>(tags: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    set_options(&OptionsOverride::new().disabled_tags(tags));
}

/// Set the default log file prefix. An empty prefix is ignored.
pub fn set_file_prefix(file_prefix: impl Into<String>) {
    set_options(&OptionsOverride::new().file_prefix(file_prefix));
}

/// Set the default maximum message length. Values that do not fit a `usize` are ignored.
pub fn set_max_msg_length<T: TryInto<usize>>(max_msg_length: T) {
    if let Ok(max_msg_length) = max_msg_length.try_into() {
        set_options(&OptionsOverride::new().max_msg_length(max_msg_length));
    }
}

/// Set the default console color from a color name or an SGR escape sequence.
///
/// Unrecognized colors are ignored.
pub fn set_print_color(print_color: &str) {
    if let Some(print_color) = parse_color(print_color) {
        set_options(&OptionsOverride::new().print_color(print_color));
    }
}

/// Set whether entries are echoed to the console by default.
pub fn set_print_console(print_console: bool) {
    set_options(&OptionsOverride::new().print_console(print_console));
}

fn request(
    message: impl Into<Message>,
    tag: Option<&str>,
    force_print: Option<bool>,
    options: Option<OptionsOverride>,
) -> Request {
    Request::new(message)
        .with_tag(tag.map(str::to_string))
        .with_force_print(force_print)
        .options(options.unwrap_or_default())
}

/// Log one entry without blocking the caller.
///
/// The entry is written by a background worker using the defaults as they are now. Use [`flush`]
/// to wait for queued entries. Entries still queued when the process exits are lost unless the
/// guard returned by [`worker_guard`] is held in `main`. Errors are swallowed.
pub fn log(
    message: impl Into<Message>,
    tag: Option<&str>,
    force_print: Option<bool>,
    options: Option<OptionsOverride>,
) {
    let request = request(message, tag, force_print, options);

    #[cfg(feature = "non-blocking")]
    {
        if let Some(non_blocking) = background() {
            non_blocking.log(&self::options(), request);
            return;
        }
    }

    WRITER.write(&self::options(), request);
}

/// Log one entry on the caller's thread.
///
/// The entry is on disk when this returns. Errors are swallowed.
pub fn log_sync(
    message: impl Into<Message>,
    tag: Option<&str>,
    force_print: Option<bool>,
    options: Option<OptionsOverride>,
) {
    WRITER.write(&self::options(), request(message, tag, force_print, options));
}

/// Print one entry to the console without writing any log file.
///
/// `print_console` and the disabled tags are not consulted.
pub fn print(message: impl Into<Message>, tag: Option<&str>, options: Option<OptionsOverride>) {
    WRITER.print(&self::options(), request(message, tag, None, options));
}

/// Block until every entry queued by [`log`] has been written.
///
/// Does nothing if [`log`] was never called.
pub fn flush() {
    #[cfg(feature = "non-blocking")]
    {
        if let Some(Some(non_blocking)) = BACKGROUND.get() {
            // A stopped worker has nothing left to write.
            let _ = non_blocking.flush();
        }
    }
}
