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

//! Forward records of the `log` crate to the [`global`](crate::global) logger.

use crate::global;

struct LogCrateLogger(());

fn level_tag(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "error",
        log::Level::Warn => "warn",
        log::Level::Info => "info",
        log::Level::Debug => "debug",
        log::Level::Trace => "trace",
    }
}

impl log::Log for LogCrateLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        !global::options().is_disabled(Some(level_tag(metadata.level())))
    }

    fn log(&self, record: &log::Record) {
        global::log(*record.args(), Some(level_tag(record.level())), None, None);
    }

    fn flush(&self) {
        global::flush();
    }
}

/// Set up the log crate global logger.
///
/// This function calls [`log::set_logger`] to set up a `LogCrateLogger` and all logs from log
/// crate will be forwarded to [`global::log`], tagged with the lowercase name of their level.
/// Disabling the tag `"debug"` therefore drops `log::debug!` records.
///
/// This should be called early in the execution of a Rust program. Any log events that occur
/// before initialization will be ignored.
///
/// This function will set the global maximum log level to `Trace`. To override this, call
/// [`log::set_max_level`] after this function.
///
/// # Errors
///
/// Return an error if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// let dir = tempfile::tempdir().unwrap();
/// logscribe::global::set_dir_path(dir.path());
/// logscribe::global::set_print_console(false);
///
/// logscribe::bridge::try_setup_log_crate().unwrap();
/// log::info!("This is an info message.");
/// logscribe::global::flush();
/// ```
pub fn try_setup_log_crate() -> Result<(), log::SetLoggerError> {
    static LOGGER: LogCrateLogger = LogCrateLogger(());
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Set up the log crate global logger.
///
/// This function calls [`log::set_logger`] to set up a `LogCrateLogger` and all logs from log
/// crate will be forwarded to [`global::log`].
///
/// This function will panic if it is called more than once, or if another library has already
/// initialized the log crate global logger.
///
/// # Panics
///
/// Panic if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// logscribe::global::set_print_console(false);
/// logscribe::global::set_disabled_tags(["*"]);
///
/// logscribe::bridge::setup_log_crate();
/// log::warn!("This is dropped.");
/// ```
pub fn setup_log_crate() {
    try_setup_log_crate().expect(
        "logscribe::bridge::setup_log_crate must be called before the log crate global logger initialized",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_tag() {
        assert_eq!(level_tag(log::Level::Error), "error");
        assert_eq!(level_tag(log::Level::Warn), "warn");
        assert_eq!(level_tag(log::Level::Info), "info");
        assert_eq!(level_tag(log::Level::Debug), "debug");
        assert_eq!(level_tag(log::Level::Trace), "trace");
    }
}
