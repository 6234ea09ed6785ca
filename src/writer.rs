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

//! The writer that resolves options, locates a log file and appends entries to it.
//!
//! # Examples
//!
//! ```
//! use logscribe::Options;
//! use logscribe::Request;
//! use logscribe::Writer;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let defaults = Options::default()
//!     .with_dir_path(dir.path())
//!     .with_print_console(false);
//!
//! let writer = Writer::builder().build();
//! writer.write(&defaults, Request::new("service started").tag("boot"));
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use crate::Error;
use crate::ErrorKind;
use crate::Options;
use crate::OptionsOverride;
use crate::Trap;
use crate::clock::Clock;
use crate::console::Console;
use crate::console::Stdout;
use crate::entry::Entry;
use crate::entry::Message;
use crate::fs::FileSystem;
use crate::fs::StdFileSystem;
use crate::locate::Locator;
use crate::trap::DefaultTrap;

/// A single log call: the message, its tag, the console decision and per-call options.
#[derive(Debug, Clone)]
pub struct Request {
    message: Message,
    tag: Option<String>,
    force_print: Option<bool>,
    options: OptionsOverride,
}

impl Request {
    /// Create a request for an untagged message.
    pub fn new(message: impl Into<Message>) -> Self {
        Self {
            message: message.into(),
            tag: None,
            force_print: None,
            options: OptionsOverride::default(),
        }
    }

    /// Set the tag of the entry.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Decide explicitly whether the entry is echoed to the console.
    ///
    /// Without this, the resolved `print_console` option decides.
    pub fn force_print(mut self, force_print: bool) -> Self {
        self.force_print = Some(force_print);
        self
    }

    /// Set the options overriding the defaults for this call only.
    pub fn options(mut self, options: OptionsOverride) -> Self {
        self.options = options;
        self
    }

    pub(crate) fn with_tag(mut self, tag: Option<String>) -> Self {
        self.tag = tag;
        self
    }

    pub(crate) fn with_force_print(mut self, force_print: Option<bool>) -> Self {
        self.force_print = force_print;
        self
    }
}

/// What a successful write did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The entry was appended to `path`, and echoed to the console if `printed`.
    Written {
        /// The log file the entry was appended to.
        path: PathBuf,
        /// Whether the entry was echoed to the console.
        printed: bool,
    },
    /// The entry's tag is disabled; nothing was written or printed.
    Suppressed,
}

/// Appends entries to rotating log files and echoes them to a console.
#[derive(Debug)]
pub struct Writer {
    locator: Locator,
    filesystem: Arc<dyn FileSystem>,
    console: Box<dyn Console>,
    trap: Arc<dyn Trap>,
    no_color: bool,
}

impl Default for Writer {
    fn default() -> Self {
        WriterBuilder::new().build()
    }
}

impl Writer {
    /// Create a new [`WriterBuilder`].
    pub fn builder() -> WriterBuilder {
        WriterBuilder::new()
    }

    /// Write one entry, swallowing any error.
    ///
    /// Errors are handed to the configured [`Trap`]; the call itself never fails.
    pub fn write(&self, defaults: &Options, request: Request) {
        if let Err(err) = self.try_write(defaults, request) {
            self.trap.trap(&err);
        }
    }

    /// Write one entry.
    ///
    /// The request's options are merged into `defaults`. If the resolved disabled tags contain the
    /// wildcard or the request's tag, nothing happens. Otherwise the entry is appended to the
    /// located log file and, when the request forces it or leaves the decision to a true
    /// `print_console` option, echoed to the console.
    ///
    /// # Errors
    ///
    /// Return an error if no log file can be located, the entry cannot be appended, or the console
    /// cannot be written. When appending fails, the console is not written.
    pub fn try_write(&self, defaults: &Options, request: Request) -> Result<Outcome, Error> {
        let Request {
            message,
            tag,
            force_print,
            options,
        } = request;

        let options = defaults.merge(&options);
        if options.is_disabled(tag.as_deref()) {
            return Ok(Outcome::Suppressed);
        }

        let path = self
            .locator
            .locate(options.dir_path(), options.file_prefix())?;

        let entry = Entry::new(message, tag, self.locator.now(), options);
        self.filesystem
            .append(&path, &entry.to_file_text())
            .map_err(|err| {
                Error::new(ErrorKind::Append, "failed to append log entry")
                    .with_context("file", path.display())
                    .with_source(err)
            })?;

        let printed = force_print.unwrap_or_else(|| entry.options().print_console());
        if printed {
            self.console
                .write_line(&entry.to_console_line(self.no_color))?;
        }

        Ok(Outcome::Written { path, printed })
    }

    /// Print one entry to the console without touching any log file.
    ///
    /// Disabled tags and `print_console` are not consulted. Errors go to the trap.
    pub fn print(&self, defaults: &Options, request: Request) {
        let Request {
            message,
            tag,
            options,
            ..
        } = request;

        let entry = Entry::new(message, tag, self.locator.now(), defaults.merge(&options));
        if let Err(err) = self
            .console
            .write_line(&entry.to_console_line(self.no_color))
        {
            self.trap.trap(&err);
        }
    }

    #[cfg(feature = "non-blocking")]
    pub(crate) fn trap(&self) -> Arc<dyn Trap> {
        self.trap.clone()
    }
}

/// A builder for configuring a [`Writer`].
#[derive(Debug)]
pub struct WriterBuilder {
    filesystem: Arc<dyn FileSystem>,
    console: Box<dyn Console>,
    trap: Arc<dyn Trap>,
    no_color: bool,
    clock: Clock,
}

impl Default for WriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WriterBuilder {
    /// Create a builder writing through [`StdFileSystem`] to [`Stdout`], discarding errors.
    pub fn new() -> Self {
        Self {
            filesystem: Arc::new(StdFileSystem::default()),
            console: Box::new(Stdout::default()),
            trap: Arc::new(DefaultTrap::default()),
            no_color: false,
            clock: Clock::DefaultClock,
        }
    }

    /// Set the filesystem log files are located and appended through.
    pub fn filesystem(mut self, filesystem: impl FileSystem) -> Self {
        self.filesystem = Arc::new(filesystem);
        self
    }

    /// Set the console echoed entries are written to.
    ///
    /// Default to [`Stdout`].
    pub fn console(mut self, console: impl Into<Box<dyn Console>>) -> Self {
        self.console = console.into();
        self
    }

    /// Set the trap receiving swallowed errors.
    ///
    /// Default to [`DefaultTrap`], which discards them.
    pub fn trap(mut self, trap: impl Trap) -> Self {
        self.trap = Arc::new(trap);
        self
    }

    /// Disable colored console output.
    pub fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }

    #[cfg(test)]
    pub(crate) fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Build the [`Writer`].
    pub fn build(self) -> Writer {
        let Self {
            filesystem,
            console,
            trap,
            no_color,
            clock,
        } = self;

        let locator = Locator::shared(filesystem.clone()).with_clock(clock);

        Writer {
            locator,
            filesystem,
            console,
            trap,
            no_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::str::FromStr;
    use std::sync::Arc;
    use std::sync::Mutex;

    use jiff::Zoned;
    use tempfile::TempDir;

    use super::*;
    use crate::clock::ManualClock;

    #[derive(Debug, Clone, Default)]
    struct Lines(Arc<Mutex<Vec<String>>>);

    impl Lines {
        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.0.lock().unwrap())
        }
    }

    impl Console for Lines {
        fn write_line(&self, line: &str) -> Result<(), Error> {
            self.0.lock().unwrap().push(line.to_string());
            Ok(())
        }
    }

    impl Trap for Lines {
        fn trap(&self, err: &Error) {
            self.0.lock().unwrap().push(err.message().to_string());
        }
    }

    fn now() -> Zoned {
        Zoned::from_str("2024-08-10T17:12:52+08[+08]").unwrap()
    }

    fn writer(console: &Lines, trap: &Lines) -> Writer {
        Writer::builder()
            .console(console.clone())
            .trap(trap.clone())
            .no_color()
            .clock(Clock::ManualClock(ManualClock::new(now())))
            .build()
    }

    #[test]
    fn test_write_appends_and_prints() {
        let temp_dir = TempDir::new().unwrap();
        let (console, trap) = (Lines::default(), Lines::default());
        let defaults = Options::default().with_dir_path(temp_dir.path());

        let outcome = writer(&console, &trap)
            .try_write(&defaults, Request::new("ready").tag("boot"))
            .unwrap();

        let Outcome::Written { path, printed } = outcome else {
            panic!("expected a write, got {outcome:?}");
        };
        assert!(printed);
        let millis = now().timestamp().as_millisecond();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            format!("application_2024_7_10_{millis}.log")
        );
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[boot]\n[Sat Aug 10 2024 17:12:52 GMT+0800]\nready\n\n"
        );
        assert_eq!(console.take(), vec!["[boot][17:12:52] - ready"]);
        assert!(trap.take().is_empty());
    }

    #[test]
    fn test_second_write_reuses_file() {
        let temp_dir = TempDir::new().unwrap();
        let (console, trap) = (Lines::default(), Lines::default());
        let defaults = Options::default()
            .with_dir_path(temp_dir.path())
            .with_print_console(false);
        let writer = writer(&console, &trap);

        let first = writer.try_write(&defaults, Request::new("one")).unwrap();
        let second = writer.try_write(&defaults, Request::new("two")).unwrap();
        assert_eq!(first, second);
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
        assert!(console.take().is_empty());
    }

    #[test]
    fn test_disabled_tag_is_suppressed_before_locating() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");
        let (console, trap) = (Lines::default(), Lines::default());
        let defaults = Options::default()
            .with_dir_path(&missing)
            .with_disabled_tags(["debug"]);

        let outcome = writer(&console, &trap)
            .try_write(&defaults, Request::new("x").tag("debug").force_print(true))
            .unwrap();
        assert_eq!(outcome, Outcome::Suppressed);
        assert!(console.take().is_empty());
    }

    #[test]
    fn test_missing_directory_is_trapped() {
        let temp_dir = TempDir::new().unwrap();
        let (console, trap) = (Lines::default(), Lines::default());
        let defaults = Options::default().with_dir_path(temp_dir.path().join("missing"));

        writer(&console, &trap).write(&defaults, Request::new("lost"));
        assert_eq!(trap.take(), vec!["failed to list log directory"]);
        assert!(console.take().is_empty());
    }

    #[test]
    fn test_print_ignores_disabled_tags_and_print_console() {
        let (console, trap) = (Lines::default(), Lines::default());
        let defaults = Options::default()
            .with_disabled_tags(["*"])
            .with_print_console(false);

        writer(&console, &trap).print(&defaults, Request::new("!!on fire").tag("alarm"));
        assert_eq!(console.take(), vec!["[alarm][17:12:52] - on fire"]);
    }
}
