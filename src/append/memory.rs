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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::Error;
use crate::append::Append;
use crate::record::Record;

/// An appender that writes log records to an in-memory buffer, one line per record.
///
/// Cloning a `Memory` or duplicating it yields another handle on the same buffer, so the
/// caller can keep one handle and read whatever every logger wired to it wrote.
///
/// # Examples
///
/// ```
/// use gogo::append::Memory;
///
/// let memory = Memory::new();
/// assert!(memory.lines().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Memory {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buffer.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Everything written so far, decoded lossily.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    /// Everything written so far, split into lines.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    /// Discard everything written so far.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Whether two handles share the same buffer.
    pub fn same_buffer(&self, other: &Memory) -> bool {
        Arc::ptr_eq(&self.buffer, &other.buffer)
    }
}

impl Append for Memory {
    fn append(&self, _: &Record, formatted: &[u8]) -> Result<(), Error> {
        let mut buffer = self.lock();
        buffer.extend_from_slice(formatted);
        buffer.push(b'\n');
        Ok(())
    }

    fn duplicate(&self) -> Result<Box<dyn Append>, Error> {
        Ok(Box::new(self.clone()))
    }
}
