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
use std::io::Write;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::Error;
use crate::append::Append;
use crate::record::Record;

/// An appender that writes log records to any [`Write`] target, one line per record.
///
/// Use it for pipes, sockets the caller already owns, a child's stdin or a `Vec<u8>`.
/// Cloning a `Writer` or duplicating it yields another handle on the same target, so every
/// logger wired to it writes through one lock.
///
/// # Examples
///
/// ```
/// use gogo::append::Writer;
///
/// let writer = Writer::new(Vec::<u8>::new());
/// let gogo = gogo::Gogo::builder("app").low_append(writer.clone()).build().unwrap();
/// gogo.get_logger("writer").unwrap().info("hello").unwrap();
/// assert_eq!(writer.with_inner(|buf| buf.clone()), b"hello\n");
/// ```
pub struct Writer<W> {
    inner: Arc<Mutex<W>>,
}

impl<W> Clone for Writer<W> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<W> fmt::Debug for Writer<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Writer {{ ... }}")
    }
}

impl<W: Write + Send + 'static> Writer<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, W> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run `f` with exclusive access to the target.
    pub fn with_inner<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        f(&mut self.lock())
    }
}

impl<W: Write + Send + 'static> Append for Writer<W> {
    fn append(&self, _: &Record, formatted: &[u8]) -> Result<(), Error> {
        let mut inner = self.lock();
        inner
            .write_all(formatted)
            .and_then(|()| inner.write_all(b"\n"))
            .map_err(Error::from_io_error)
    }

    fn flush(&self) -> Result<(), Error> {
        self.lock().flush().map_err(Error::from_io_error)
    }

    fn duplicate(&self) -> Result<Box<dyn Append>, Error> {
        Ok(Box::new(self.clone()))
    }
}
