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

//! The filesystem operations the logger depends on.

use std::fmt;
use std::fs;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;

/// Filesystem operations used to locate log files and append entries.
///
/// Implementations must never create directories, delete files or truncate them.
pub trait FileSystem: fmt::Debug + Send + Sync + 'static {
    /// List the names of the entries in `dir`, in the order the platform returns them.
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<String>>;

    /// Return the size in bytes of the file at `path`.
    fn file_size(&self, path: &Path) -> io::Result<u64>;

    /// Append `text` to the file at `path`, creating the file if it does not exist.
    fn append(&self, path: &Path, text: &str) -> io::Result<()>;
}

/// A [`FileSystem`] backed by [`std::fs`].
#[derive(Debug, Default, Clone, Copy)]
#[non_exhaustive]
pub struct StdFileSystem {}

impl FileSystem for StdFileSystem {
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<String>> {
        let mut names = vec![];
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            // if the filename is not a UTF-8 string, skip it.
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        Ok(names)
    }

    fn file_size(&self, path: &Path) -> io::Result<u64> {
        fs::metadata(path).map(|metadata| metadata.len())
    }

    fn append(&self, path: &Path, text: &str) -> io::Result<()> {
        let mut file = OpenOptions::new().append(true).create(true).open(path)?;
        file.write_all(text.as_bytes())?;
        file.flush()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_append_creates_and_extends() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("application_1.log");
        let filesystem = StdFileSystem::default();

        filesystem.append(&path, "hello\n").unwrap();
        filesystem.append(&path, "world\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\nworld\n");
        assert_eq!(filesystem.file_size(&path).unwrap(), 12);
        assert_eq!(
            filesystem.list_dir(temp_dir.path()).unwrap(),
            vec!["application_1.log".to_string()]
        );
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");
        let filesystem = StdFileSystem::default();

        assert!(filesystem.list_dir(&missing).is_err());
        assert!(filesystem.append(&missing.join("a.log"), "x").is_err());
        assert!(!missing.exists());
    }
}
