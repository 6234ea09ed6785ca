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

//! Traps receive the errors that logging swallows.

use std::fmt;
use std::io;
use std::io::Write;

use crate::Error;

/// A sink for internal errors of the logger.
///
/// Logging never fails from the caller's point of view. Any error raised while locating,
/// formatting or appending an entry is passed to a trap and then dropped.
pub trait Trap: fmt::Debug + Send + Sync + 'static {
    /// Handle an error that logging will not propagate.
    fn trap(&self, err: &Error);
}

/// A trap that discards every error.
///
/// This is the default: a failed log call is observably a no-op.
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct DefaultTrap {}

impl Trap for DefaultTrap {
    fn trap(&self, _: &Error) {}
}

/// A trap that sends errors to standard error if possible.
///
/// If standard error is not available, it does nothing.
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct StderrTrap {}

impl Trap for StderrTrap {
    fn trap(&self, err: &Error) {
        let _ = writeln!(io::stderr(), "{err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_traps_never_fail() {
        let err = Error::new(ErrorKind::Append, "failed to append log entry")
            .with_context("file", "/tmp/a.log");
        let traps: Vec<Box<dyn Trap>> = vec![
            Box::new(DefaultTrap::default()),
            Box::new(StderrTrap::default()),
        ];
        for trap in traps {
            trap.trap(&err);
        }
    }
}
