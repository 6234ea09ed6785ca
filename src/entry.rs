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

//! Log entries and their text forms.

use std::fmt;
use std::fmt::Write;

use colored::Colorize;
use jiff::Zoned;

use crate::Options;
use crate::color::ALERT_PRINT_COLOR;

/// A text message starting with this marker is printed to the console as an alert.
pub const ALERT_MARKER: &str = "!!";

const FILE_TIMESTAMP_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT%z";
const CONSOLE_TIMESTAMP_FORMAT: &str = "%H:%M:%S";

/// The payload of a log entry.
///
/// Text is truncated to the configured maximum length when persisted. Any other value is
/// persisted in full through its [`Display`](fmt::Display) form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A text message.
    Text(String),
    /// The display form of a non-text value.
    Value(String),
}

impl Message {
    /// Create a message from a non-text value.
    ///
    /// # Examples
    ///
    /// ```
    /// use logscribe::Message;
    ///
    /// let message = Message::value(42);
    /// assert_eq!(message.as_str(), "42");
    /// ```
    pub fn value(value: impl fmt::Display) -> Self {
        Message::Value(value.to_string())
    }

    /// The full text of the message.
    pub fn as_str(&self) -> &str {
        match self {
            Message::Text(text) => text,
            Message::Value(value) => value,
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(text)
    }
}

impl From<&String> for Message {
    fn from(text: &String) -> Self {
        Message::Text(text.clone())
    }
}

impl From<fmt::Arguments<'_>> for Message {
    fn from(args: fmt::Arguments<'_>) -> Self {
        Message::Text(args.to_string())
    }
}

impl From<serde_json::Value> for Message {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(text) => Message::Text(text),
            value => Message::Value(value.to_string()),
        }
    }
}

/// A log entry: an optional tag, the time it was written, the message and the options it was
/// resolved with.
#[derive(Debug, Clone)]
pub struct Entry {
    tag: Option<String>,
    time: Zoned,
    message: Message,
    options: Options,
}

impl Entry {
    /// Create an entry.
    pub fn new(message: Message, tag: Option<String>, time: Zoned, options: Options) -> Self {
        Self {
            tag,
            time,
            message,
            options,
        }
    }

    /// The tag of this entry, ignoring empty tags.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref().filter(|tag| !tag.is_empty())
    }

    /// The time of this entry.
    pub fn time(&self) -> &Zoned {
        &self.time
    }

    /// The message of this entry.
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// The options this entry was resolved with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Format the entry as it is appended to a log file.
    ///
    /// Output format:
    ///
    /// ```text
    /// [worker]
    /// [Sat Aug 10 2024 17:12:52 GMT+0800]
    /// job 42 finished
    ///
    /// ```
    ///
    /// The tag line is omitted for untagged entries. The timestamp is second-resolution local time
    /// and ends at the numeric UTC offset; no zone name follows it.
    pub fn to_file_text(&self) -> String {
        let mut text = String::new();

        // SAFETY: write to a string always succeeds
        if let Some(tag) = self.tag() {
            writeln!(&mut text, "[{tag}]").unwrap();
        }
        writeln!(&mut text, "[{}]", self.time.strftime(FILE_TIMESTAMP_FORMAT)).unwrap();

        match &self.message {
            Message::Text(message) => {
                text.extend(message.chars().take(self.options.max_msg_length()));
            }
            Message::Value(value) => text.push_str(value),
        }
        text.push_str("\n\n");
        text
    }

    /// Format the entry as one console line.
    ///
    /// Output format, where the part before the message is colored:
    ///
    /// ```text
    /// [worker][17:12:52] - job 42 finished
    /// ```
    ///
    /// A text message starting with [`ALERT_MARKER`] is printed in red without the marker.
    pub fn to_console_line(&self, no_color: bool) -> String {
        let (color, message) = match &self.message {
            Message::Text(text) => match text.strip_prefix(ALERT_MARKER) {
                Some(rest) => (ALERT_PRINT_COLOR, rest),
                None => (self.options.print_color(), text.as_str()),
            },
            Message::Value(value) => (self.options.print_color(), value.as_str()),
        };

        let mut prefix = String::new();
        if let Some(tag) = self.tag() {
            write!(&mut prefix, "[{tag}]").unwrap();
        }
        let time = self.time.strftime(CONSOLE_TIMESTAMP_FORMAT);
        write!(&mut prefix, "[{time}] -").unwrap();

        if no_color {
            format!("{prefix} {message}")
        } else {
            format!("{} {message}", prefix.color(color))
        }
    }
}
