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

use std::fmt;

/// The stage of logging an [`Error`] comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The log directory could not be made absolute.
    ResolveDirectory,
    /// The log directory could not be listed, usually because it does not exist.
    ListDirectory,
    /// The size of a candidate log file could not be read.
    ReadFileSize,
    /// An entry could not be appended to its log file.
    Append,
    /// An echoed line could not be written to the console.
    Console,
    /// The background worker could not be started or has stopped.
    Worker,
    /// Options or a file prefix could not be turned into a usable configuration.
    Config,
}

impl ErrorKind {
    fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ResolveDirectory => "resolve directory",
            ErrorKind::ListDirectory => "list directory",
            ErrorKind::ReadFileSize => "read file size",
            ErrorKind::Append => "append",
            ErrorKind::Console => "console",
            ErrorKind::Worker => "worker",
            ErrorKind::Config => "config",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error struct of logscribe.
///
/// Errors never escape the public logging entry points; they are handed to the configured
/// [`Trap`](crate::Trap) instead, which can tell failures apart by [`Error::kind`].
pub struct Error {
    kind: ErrorKind,
    message: String,
    sources: Vec<anyhow::Error>,
    context: Vec<(&'static str, String)>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)?;

        if !self.context.is_empty() {
            let context = self
                .context
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect::<Vec<_>>();
            write!(f, ", context: {{ {} }}", context.join(", "))?;
        }

        if !self.sources.is_empty() {
            let sources = self
                .sources
                .iter()
                .map(|source| source.to_string())
                .collect::<Vec<_>>();
            write!(f, ", sources: [{}]", sources.join(", "))?;
        }

        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return f
                .debug_struct("Error")
                .field("kind", &self.kind)
                .field("message", &self.message)
                .field("context", &self.context)
                .field("sources", &self.sources)
                .finish();
        }

        writeln!(f, "{} ({})", self.message, self.kind)?;
        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "Context:")?;
            for (k, v) in self.context.iter() {
                writeln!(f, "   {k}: {v}")?;
            }
        }
        if !self.sources.is_empty() {
            writeln!(f)?;
            writeln!(f, "Sources:")?;
            for source in self.sources.iter() {
                writeln!(f, "   {source:#}")?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.sources.first().map(|v| v.as_ref())
    }
}

impl Error {
    /// Create a new Error of `kind` with the given message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            sources: vec![],
            context: vec![],
        }
    }

    /// Add one more context in error.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Add one more source in error.
    pub fn with_source(mut self, src: impl Into<anyhow::Error>) -> Self {
        self.sources.push(src.into());
        self
    }

    /// Return the stage this error comes from.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return the error message without kind, context or sources.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Return the context value recorded under `key`, if any.
    pub fn context(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn test_display_with_context_and_sources() {
        let err = Error::new(ErrorKind::ListDirectory, "failed to list log directory")
            .with_context("dir", "/var/log/app")
            .with_source(io::Error::new(io::ErrorKind::NotFound, "no such directory"));

        assert_eq!(
            err.to_string(),
            "failed to list log directory (list directory), context: { dir: /var/log/app }, sources: [no such directory]"
        );
        assert_eq!(err.kind(), ErrorKind::ListDirectory);
        assert_eq!(err.context("dir"), Some("/var/log/app"));
        assert_eq!(err.context("file"), None);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_display_message_only() {
        let err = Error::new(ErrorKind::Worker, "boom");
        assert_eq!(err.to_string(), "boom (worker)");
        assert_eq!(err.message(), "boom");
    }

    #[test]
    fn test_alternate_debug_lists_fields() {
        let err = Error::new(ErrorKind::Append, "failed to append log entry")
            .with_context("file", "/tmp/a.log");
        let debug = format!("{err:#?}");
        assert!(debug.contains("Append"), "{debug}");
        assert!(debug.contains("/tmp/a.log"), "{debug}");
    }
}
