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

//! Console sinks for echoed entries.

use std::fmt;
use std::io::Write;

use crate::Error;
use crate::ErrorKind;

fn console_error(err: std::io::Error) -> Error {
    Error::new(ErrorKind::Console, "failed to write console line").with_source(err)
}

/// A target that echoed entries are written to.
pub trait Console: fmt::Debug + Send + Sync + 'static {
    /// Write one formatted line. The implementation appends the line terminator.
    fn write_line(&self, line: &str) -> Result<(), Error>;
}

impl<T: Console> From<T> for Box<dyn Console> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

/// A console that prints lines to stdout.
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct Stdout {}

impl Console for Stdout {
    fn write_line(&self, line: &str) -> Result<(), Error> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{line}").map_err(console_error)?;
        stdout.flush().map_err(console_error)
    }
}

/// A console that prints lines to stderr.
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct Stderr {}

impl Console for Stderr {
    fn write_line(&self, line: &str) -> Result<(), Error> {
        let mut stderr = std::io::stderr().lock();
        writeln!(stderr, "{line}").map_err(console_error)
    }
}
