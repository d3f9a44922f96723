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

use std::io::Write;

use crate::Error;
use crate::append::Append;
use crate::record::Record;

/// An appender that prints log records to stdout.
///
/// Duplicates write to the same process stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stdout;

impl Append for Stdout {
    fn append(&self, _: &Record, formatted: &[u8]) -> Result<(), Error> {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(formatted)
            .and_then(|()| stdout.write_all(b"\n"))
            .map_err(Error::from_io_error)
    }

    fn flush(&self) -> Result<(), Error> {
        std::io::stdout().flush().map_err(Error::from_io_error)
    }

    fn duplicate(&self) -> Result<Box<dyn Append>, Error> {
        Ok(Box::new(Stdout))
    }
}

/// An appender that prints log records to stderr.
///
/// Duplicates write to the same process stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stderr;

impl Append for Stderr {
    fn append(&self, _: &Record, formatted: &[u8]) -> Result<(), Error> {
        let mut stderr = std::io::stderr().lock();
        stderr
            .write_all(formatted)
            .and_then(|()| stderr.write_all(b"\n"))
            .map_err(Error::from_io_error)
    }

    fn flush(&self) -> Result<(), Error> {
        std::io::stderr().flush().map_err(Error::from_io_error)
    }

    fn duplicate(&self) -> Result<Box<dyn Append>, Error> {
        Ok(Box::new(Stderr))
    }
}
