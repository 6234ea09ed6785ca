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

//! Selection of the log file an entry is appended to.
//!
//! Log files are named `{prefix}_{year}_{month}_{day}_{epoch millis}.log`, where the month is
//! zero-based. A file keeps receiving entries while it is smaller than [`MAX_FILE_SIZE`]; once it
//! reaches the ceiling, the next lookup synthesizes a fresh name. Old files are never revisited,
//! renamed or deleted.
//!
//! # Examples
//!
//! ```
//! let dir = std::env::temp_dir();
//! let path = logscribe::locate(&dir, "app").unwrap();
//! assert!(path.starts_with(std::path::absolute(&dir).unwrap()));
//! ```

use std::borrow::Cow;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::LazyLock;

use jiff::Zoned;
use regex::Regex;

use crate::Error;
use crate::ErrorKind;
use crate::clock::Clock;
use crate::fs::FileSystem;
use crate::fs::StdFileSystem;
use crate::options::DEFAULT_FILE_PREFIX;

/// The size in bytes at which a log file stops receiving entries.
pub const MAX_FILE_SIZE: u64 = 1_000_000;

static DEFAULT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{DEFAULT_FILE_PREFIX}_.*log"))
        .expect("invalid default file pattern; this is a bug in logscribe")
});

/// Locate a log file in `dir` for `prefix` with the standard filesystem and the system clock.
///
/// See [`Locator::locate`].
pub fn locate(dir: impl AsRef<Path>, prefix: &str) -> Result<PathBuf, Error> {
    Locator::default().locate(dir.as_ref(), prefix)
}

/// Finds a rotation-eligible log file or names a new one.
#[derive(Debug, Clone)]
pub struct Locator {
    filesystem: Arc<dyn FileSystem>,
    clock: Clock,
}

impl Default for Locator {
    fn default() -> Self {
        Self::new(StdFileSystem::default())
    }
}

impl Locator {
    /// Create a locator over the given filesystem.
    pub fn new(filesystem: impl FileSystem) -> Self {
        Self::shared(Arc::new(filesystem))
    }

    pub(crate) fn shared(filesystem: Arc<dyn FileSystem>) -> Self {
        Self {
            filesystem,
            clock: Clock::DefaultClock,
        }
    }

    pub(crate) fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub(crate) fn now(&self) -> Zoned {
        self.clock.now()
    }

    /// Return the path of the log file the next entry for `prefix` goes to.
    ///
    /// The directory is resolved to an absolute path and listed; an empty path stands for the
    /// current working directory. Among the entries whose names
    /// match `^{prefix}_.*log`, the first one in listing order whose size is below
    /// [`MAX_FILE_SIZE`] is returned. The listing order is whatever the platform yields, so when
    /// several eligible files coexist, which one is picked is not stable across filesystems.
    ///
    /// If no entry qualifies, a new name embedding the current local date and epoch milliseconds
    /// is returned; the file itself is not created.
    ///
    /// # Errors
    ///
    /// Return an error if the directory cannot be resolved or listed, or if the size of a
    /// matching entry cannot be read. Missing directories are never created.
    pub fn locate(&self, dir: &Path, prefix: &str) -> Result<PathBuf, Error> {
        let dir = if dir.as_os_str().is_empty() {
            Path::new(".")
        } else {
            dir
        };
        let dir = std::path::absolute(dir).map_err(|err| {
            Error::new(ErrorKind::ResolveDirectory, "failed to resolve log directory")
                .with_context("dir", dir.display())
                .with_source(err)
        })?;

        let names = self.filesystem.list_dir(&dir).map_err(|err| {
            Error::new(ErrorKind::ListDirectory, "failed to list log directory")
                .with_context("dir", dir.display())
                .with_source(err)
        })?;

        let pattern = file_pattern(prefix)?;
        for name in names.iter().filter(|name| pattern.is_match(name)) {
            let path = dir.join(name);
            let size = self.filesystem.file_size(&path).map_err(|err| {
                Error::new(ErrorKind::ReadFileSize, "failed to read log file size")
                    .with_context("file", path.display())
                    .with_source(err)
            })?;
            if size < MAX_FILE_SIZE {
                return Ok(path);
            }
        }

        Ok(dir.join(new_file_name(prefix, &self.clock.now())))
    }
}

fn file_pattern(prefix: &str) -> Result<Cow<'static, Regex>, Error> {
    if prefix == DEFAULT_FILE_PREFIX {
        return Ok(Cow::Borrowed(&*DEFAULT_PATTERN));
    }

    let pattern = format!("^{}_.*log", regex::escape(prefix));
    Regex::new(&pattern).map(Cow::Owned).map_err(|err| {
        Error::new(ErrorKind::Config, "failed to build file pattern")
            .with_context("prefix", prefix)
            .with_source(err)
    })
}

fn new_file_name(prefix: &str, now: &Zoned) -> String {
    format!(
        "{prefix}_{}_{}_{}_{}.log",
        now.year(),
        now.month() - 1,
        now.day(),
        now.timestamp().as_millisecond()
    )
}
