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

//! Logging options and the type-gated merge of per-call overrides.
//!
//! A process keeps one set of default [`Options`]. Each log call may carry an
//! [`OptionsOverride`]; resolving it never fails. Every override field that is present and valid
//! replaces the default's value, and everything else keeps the default.
//!
//! # Examples
//!
//! ```
//! use logscribe::Options;
//! use logscribe::OptionsOverride;
//!
//! let defaults = Options::default();
//! let resolved = defaults.merge(&OptionsOverride::new().file_prefix("audit").max_msg_length(64));
//! assert_eq!(resolved.file_prefix(), "audit");
//! assert_eq!(resolved.max_msg_length(), 64);
//! assert_eq!(resolved.print_console(), defaults.print_console());
//! ```

use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

use colored::Color;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Value;

use crate::Error;
use crate::ErrorKind;
use crate::color;

/// The file prefix used when none is configured.
pub const DEFAULT_FILE_PREFIX: &str = "application";

/// The message truncation bound used when none is configured.
pub const DEFAULT_MAX_MSG_LENGTH: usize = 8192;

/// The disabled-tag entry that suppresses every entry.
pub const WILDCARD_TAG: &str = "*";

/// Resolved logging options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    dir_path: PathBuf,
    disabled_tags: BTreeSet<String>,
    #[serde(deserialize_with = "deserialize_file_prefix")]
    file_prefix: String,
    max_msg_length: usize,
    print_console: bool,
    #[serde(with = "color::serde_color")]
    print_color: Color,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            dir_path: default_dir_path(),
            disabled_tags: BTreeSet::new(),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            max_msg_length: DEFAULT_MAX_MSG_LENGTH,
            print_console: true,
            print_color: color::DEFAULT_PRINT_COLOR,
        }
    }
}

fn deserialize_file_prefix<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let file_prefix = String::deserialize(deserializer)?;
    if file_prefix.is_empty() {
        return Err(serde::de::Error::custom("filePrefix must not be empty"));
    }
    Ok(file_prefix)
}

// The directory of the running executable, or the working directory if it cannot be found.
fn default_dir_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Options {
    /// The directory holding log files.
    pub fn dir_path(&self) -> &Path {
        &self.dir_path
    }

    /// Tags whose entries are suppressed.
    pub fn disabled_tags(&self) -> &BTreeSet<String> {
        &self.disabled_tags
    }

    /// The base name of log files.
    pub fn file_prefix(&self) -> &str {
        &self.file_prefix
    }

    /// The maximum number of characters persisted for a text message.
    pub fn max_msg_length(&self) -> usize {
        self.max_msg_length
    }

    /// Whether entries are echoed to the console unless a call says otherwise.
    pub fn print_console(&self) -> bool {
        self.print_console
    }

    /// The console color of regular entries.
    pub fn print_color(&self) -> Color {
        self.print_color
    }

    /// Set the directory holding log files.
    pub fn with_dir_path(mut self, dir_path: impl Into<PathBuf>) -> Self {
        self.dir_path = dir_path.into();
        self
    }

    /// Set the tags whose entries are suppressed.
    pub fn with_disabled_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the base name of log files.
    ///
    /// An empty prefix is ignored.
    pub fn with_file_prefix(mut self, file_prefix: impl Into<String>) -> Self {
        let file_prefix = file_prefix.into();
        if !file_prefix.is_empty() {
            self.file_prefix = file_prefix;
        }
        self
    }

    /// Set the maximum number of characters persisted for a text message.
    pub fn with_max_msg_length(mut self, max_msg_length: usize) -> Self {
        self.max_msg_length = max_msg_length;
        self
    }

    /// Set whether entries are echoed to the console by default.
    pub fn with_print_console(mut self, print_console: bool) -> Self {
        self.print_console = print_console;
        self
    }

    /// Set the console color of regular entries.
    pub fn with_print_color(mut self, print_color: Color) -> Self {
        self.print_color = print_color;
        self
    }

    /// Whether entries with `tag` are suppressed by these options.
    ///
    /// The wildcard suppresses everything, including untagged entries.
    pub fn is_disabled(&self, tag: Option<&str>) -> bool {
        if self.disabled_tags.contains(WILDCARD_TAG) {
            return true;
        }
        tag.is_some_and(|tag| self.disabled_tags.contains(tag))
    }

    /// Resolve a per-call override against these options.
    ///
    /// Fields the override leaves unset keep their current value.
    pub fn merge(&self, patch: &OptionsOverride) -> Options {
        let mut resolved = self.clone();
        resolved.apply(patch);
        resolved
    }

    /// Resolve a dynamically typed override against these options.
    ///
    /// Any field whose JSON type disagrees with the option's type falls back to the current
    /// value. A value that is not a JSON object returns these options unchanged.
    pub fn merge_value(&self, value: &Value) -> Options {
        self.merge(&OptionsOverride::from_value(value))
    }

    /// Apply a per-call override in place.
    pub(crate) fn apply(&mut self, patch: &OptionsOverride) {
        if let Some(dir_path) = &patch.dir_path {
            self.dir_path = dir_path.clone();
        }
        if let Some(disabled_tags) = &patch.disabled_tags {
            self.disabled_tags = disabled_tags.clone();
        }
        if let Some(file_prefix) = &patch.file_prefix {
            if !file_prefix.is_empty() {
                self.file_prefix = file_prefix.clone();
            }
        }
        if let Some(max_msg_length) = patch.max_msg_length {
            self.max_msg_length = max_msg_length;
        }
        if let Some(print_console) = patch.print_console {
            self.print_console = print_console;
        }
        if let Some(print_color) = patch.print_color {
            self.print_color = print_color;
        }
    }
}

/// A partial set of options supplied with a single log call.
///
/// # Examples
///
/// ```
/// use logscribe::OptionsOverride;
///
/// let patch = OptionsOverride::new()
///     .dir_path("/tmp")
///     .disabled_tags(["debug"])
///     .print_console(false);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionsOverride {
    dir_path: Option<PathBuf>,
    disabled_tags: Option<BTreeSet<String>>,
    file_prefix: Option<String>,
    max_msg_length: Option<usize>,
    print_console: Option<bool>,
    print_color: Option<Color>,
}

impl OptionsOverride {
    /// Create an empty override.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the directory holding log files.
    pub fn dir_path(mut self, dir_path: impl Into<PathBuf>) -> Self {
        self.dir_path = Some(dir_path.into());
        self
    }

    /// Override the tags whose entries are suppressed.
    pub fn disabled_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled_tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Override the base name of log files.
    ///
    /// An empty prefix is ignored when the override is resolved.
    pub fn file_prefix(mut self, file_prefix: impl Into<String>) -> Self {
        self.file_prefix = Some(file_prefix.into());
        self
    }

    /// Override the message truncation bound.
    pub fn max_msg_length(mut self, max_msg_length: usize) -> Self {
        self.max_msg_length = Some(max_msg_length);
        self
    }

    /// Override the default console echo behavior.
    pub fn print_console(mut self, print_console: bool) -> Self {
        self.print_console = Some(print_console);
        self
    }

    /// Override the console color of regular entries.
    pub fn print_color(mut self, print_color: Color) -> Self {
        self.print_color = Some(print_color);
        self
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Build an override from a JSON object with camelCase keys.
    ///
    /// Each recognized key is kept only when its value has the expected type:
    ///
    /// | key | accepted value |
    /// |---|---|
    /// | `dirPath` | string |
    /// | `disabledTags` | array of strings |
    /// | `filePrefix` | non-empty string |
    /// | `maxMsgLength` | non-negative integer |
    /// | `printConsole` | boolean |
    /// | `printColor` | string naming a color or holding an SGR escape sequence |
    ///
    /// Unknown keys and mistyped values are dropped.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        let dir_path = object
            .get("dirPath")
            .and_then(Value::as_str)
            .map(PathBuf::from);
        let disabled_tags = object
            .get("disabledTags")
            .and_then(Value::as_array)
            .and_then(|tags| {
                tags.iter()
                    .map(|tag| tag.as_str().map(str::to_string))
                    .collect::<Option<BTreeSet<_>>>()
            });
        let file_prefix = object
            .get("filePrefix")
            .and_then(Value::as_str)
            .filter(|prefix| !prefix.is_empty())
            .map(str::to_string);
        let max_msg_length = object
            .get("maxMsgLength")
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok());
        let print_console = object.get("printConsole").and_then(Value::as_bool);
        let print_color = object
            .get("printColor")
            .and_then(Value::as_str)
            .and_then(color::parse_color);

        Self {
            dir_path,
            disabled_tags,
            file_prefix,
            max_msg_length,
            print_console,
            print_color,
        }
    }

    /// Parse JSON text and build an override from it.
    ///
    /// # Errors
    ///
    /// Return an error if the text is not valid JSON. Mistyped fields are not errors; they are
    /// dropped as in [`OptionsOverride::from_value`].
    pub fn from_json_str(src: &str) -> Result<Self, Error> {
        let value = serde_json::from_str::<Value>(src)
            .map_err(|err| {
                Error::new(ErrorKind::Config, "failed to parse options").with_source(err)
            })?;
        Ok(Self::from_value(&value))
    }
}

impl From<Options> for OptionsOverride {
    fn from(options: Options) -> Self {
        Self {
            dir_path: Some(options.dir_path),
            disabled_tags: Some(options.disabled_tags),
            file_prefix: Some(options.file_prefix),
            max_msg_length: Some(options.max_msg_length),
            print_console: Some(options.print_console),
            print_color: Some(options.print_color),
        }
    }
}
