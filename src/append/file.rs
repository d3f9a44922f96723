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

use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::Error;
use crate::append::Append;
use crate::record::Record;

/// How a [`File`] appender opens its file the first time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileMode {
    /// Keep existing content and write at the end.
    #[default]
    Append,
    /// Discard existing content.
    Truncate,
}

/// A builder for configuring a [`File`] appender.
#[derive(Debug, Clone)]
pub struct FileBuilder {
    // required
    path: PathBuf,

    // optional
    mode: FileMode,
    delay: bool,
}

impl FileBuilder {
    /// Creates a new [`FileBuilder`].
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mode: FileMode::Append,
            delay: false,
        }
    }

    /// Sets the open mode.
    ///
    /// Default to [`FileMode::Append`].
    pub fn mode(mut self, mode: FileMode) -> Self {
        self.mode = mode;
        self
    }

    /// Defers opening the file until the first record arrives.
    pub fn delay(mut self, delay: bool) -> Self {
        self.delay = delay;
        self
    }

    /// Builds the [`File`] appender.
    ///
    /// # Errors
    ///
    /// Returns an error if the log directory or the log file cannot be created. With
    /// [`delay`](FileBuilder::delay) the same errors surface on the first record instead.
    pub fn build(self) -> Result<File, Error> {
        let FileBuilder { path, mode, delay } = self;
        let file = if delay { None } else { Some(open(&path, mode)?) };
        Ok(File {
            path,
            mode,
            delay,
            file: Mutex::new(file),
        })
    }
}

fn open(path: &Path, mode: FileMode) -> Result<fs::File, Error> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|err| {
            Error::delivery("failed to create log directory")
                .with_context("path", dir.display())
                .with_source(err)
        })?;
    }

    let fail = |err: std::io::Error| {
        Error::delivery("failed to open log file")
            .with_context("path", path.display())
            .with_source(err)
    };
    if mode == FileMode::Truncate {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(fail)?;
    }
    OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(fail)
}

fn write_line(file: &mut fs::File, path: &Path, formatted: &[u8]) -> Result<(), Error> {
    let mut line = Vec::with_capacity(formatted.len() + 1);
    line.extend_from_slice(formatted);
    line.push(b'\n');
    file.write_all(&line)
        .map_err(|err| Error::from_io_error(err).with_context("path", path.display()))
}

/// An appender that writes log records to a file, one line per record.
///
/// Duplicates reopen the same path in append mode, so a truncating file is only truncated
/// once. A delayed file stays delayed in its duplicates.
#[derive(Debug)]
pub struct File {
    path: PathBuf,
    mode: FileMode,
    delay: bool,
    file: Mutex<Option<fs::File>>,
}

impl File {
    /// The path this appender writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Append for File {
    fn append(&self, _: &Record, formatted: &[u8]) -> Result<(), Error> {
        let mut file = self.file.lock().unwrap_or_else(|e| e.into_inner());
        match file.as_mut() {
            Some(opened) => write_line(opened, &self.path, formatted),
            None => {
                let mut opened = open(&self.path, self.mode)?;
                let result = write_line(&mut opened, &self.path, formatted);
                *file = Some(opened);
                result
            }
        }
    }

    fn flush(&self) -> Result<(), Error> {
        let mut file = self.file.lock().unwrap_or_else(|e| e.into_inner());
        match file.as_mut() {
            Some(file) => file.flush().map_err(Error::from_io_error),
            None => Ok(()),
        }
    }

    fn duplicate(&self) -> Result<Box<dyn Append>, Error> {
        let file = FileBuilder::new(&self.path)
            .mode(FileMode::Append)
            .delay(self.delay)
            .build()?;
        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;
    use rand::distr::Alphanumeric;
    use tempfile::TempDir;

    use super::*;
    use crate::Level;

    fn generate_random_string() -> String {
        let mut rng = rand::rng();
        let len = rng.random_range(50..=100);
        std::iter::repeat(())
            .map(|()| rng.sample(Alphanumeric))
            .map(char::from)
            .take(len)
            .collect()
    }

    #[test]
    fn test_file_creates_parent_directory() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("nested").join("app.log");
        let record = Record::new("app", Level::Info, "ignored");

        let file = FileBuilder::new(&path).build().unwrap();
        let line = generate_random_string();
        file.append(&record, line.as_bytes()).unwrap();
        file.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), format!("{line}\n"));
    }

    #[test]
    fn test_delayed_file_opens_on_first_record() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("delayed.log");

        let file = FileBuilder::new(&path).delay(true).build().unwrap();
        assert!(!path.exists());

        let record = Record::new("app", Level::Info, "ignored");
        file.append(&record, b"hello").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_duplicate_never_truncates_again() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("truncated.log");
        fs::write(&path, "stale\n").unwrap();
        let record = Record::new("app", Level::Info, "ignored");

        let file = FileBuilder::new(&path)
            .mode(FileMode::Truncate)
            .build()
            .unwrap();
        file.append(&record, b"first").unwrap();

        let duplicate = file.duplicate().unwrap();
        duplicate.append(&record, b"second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }
}
