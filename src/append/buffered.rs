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

use std::sync::Mutex;

use crate::Error;
use crate::Level;
use crate::append::Append;
use crate::append::Stdout;
use crate::record::Record;

/// An appender that holds records in memory and hands them to a target appender in batches.
///
/// The buffer is flushed when it reaches its capacity, when a record at or above the flush
/// level arrives, on [`Append::flush`] and when the appender is dropped.
///
/// Loggers in the [global registry](crate::registry::Registry::global) are never dropped.
/// Call [`gogo::flush`](crate::flush) or [`Gogo::flush`](crate::Gogo::flush) before the
/// process exits, or records still in the buffer are lost.
///
/// Duplicates start with an empty buffer over a duplicate of the target.
#[derive(Debug)]
pub struct Buffered {
    target: Box<dyn Append>,
    capacity: usize,
    flush_level: Level,
    buffer: Mutex<Vec<(Record, Vec<u8>)>>,
}

impl Default for Buffered {
    fn default() -> Self {
        Buffered::new(Stdout)
    }
}

impl Buffered {
    /// The number of records held before the buffer is flushed.
    pub const DEFAULT_CAPACITY: usize = 4096;

    /// Buffer records for `target` with the default capacity and the `error` flush level.
    pub fn new(target: impl Into<Box<dyn Append>>) -> Self {
        Self {
            target: target.into(),
            capacity: Self::DEFAULT_CAPACITY,
            flush_level: Level::Error,
            buffer: Mutex::new(vec![]),
        }
    }

    /// Set the number of records held before the buffer is flushed. Zero behaves like one.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Set the level at which a record flushes the buffer immediately.
    pub fn flush_level(mut self, level: Level) -> Self {
        self.flush_level = level;
        self
    }

    /// The number of records waiting to be flushed.
    pub fn pending(&self) -> usize {
        self.buffer.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn drain(&self) -> Result<(), Error> {
        let pending = std::mem::take(&mut *self.buffer.lock().unwrap_or_else(|e| e.into_inner()));

        let mut errors = vec![];
        for (record, formatted) in pending {
            if let Err(err) = self.target.append(&record, &formatted) {
                errors.push(err);
            }
        }
        if let Err(err) = self.target.flush() {
            errors.push(err);
        }
        match Error::collect(errors, "buffered records failed to deliver") {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Append for Buffered {
    fn append(&self, record: &Record, formatted: &[u8]) -> Result<(), Error> {
        let full = {
            let mut buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
            buffer.push((record.clone(), formatted.to_vec()));
            buffer.len() >= self.capacity
        };

        if full || record.level() >= self.flush_level {
            self.drain()?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), Error> {
        self.drain()
    }

    fn duplicate(&self) -> Result<Box<dyn Append>, Error> {
        let buffered = Buffered::new(self.target.duplicate()?)
            .capacity(self.capacity)
            .flush_level(self.flush_level);
        Ok(Box::new(buffered))
    }
}

impl Drop for Buffered {
    fn drop(&mut self) {
        if let Err(err) = self.drain() {
            eprintln!("failed to flush buffered log records: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::append::Memory;

    fn record(level: Level) -> Record {
        Record::new("app", level, "ignored")
    }

    #[test]
    fn test_flushes_at_flush_level() {
        let memory = Memory::new();
        let buffered = Buffered::new(memory.clone());

        buffered.append(&record(Level::Info), b"one").unwrap();
        buffered.append(&record(Level::Warning), b"two").unwrap();
        assert!(memory.lines().is_empty());
        assert_eq!(buffered.pending(), 2);

        buffered.append(&record(Level::Error), b"three").unwrap();
        assert_eq!(memory.lines(), ["one", "two", "three"]);
        assert_eq!(buffered.pending(), 0);
    }

    #[test]
    fn test_flushes_when_full() {
        let memory = Memory::new();
        let buffered = Buffered::new(memory.clone()).capacity(2);

        buffered.append(&record(Level::Debug), b"one").unwrap();
        assert!(memory.lines().is_empty());
        buffered.append(&record(Level::Debug), b"two").unwrap();
        assert_eq!(memory.lines(), ["one", "two"]);
    }

    #[test]
    fn test_flushes_on_drop() {
        let memory = Memory::new();
        let buffered = Buffered::new(memory.clone()).flush_level(Level::Critical);
        buffered.append(&record(Level::Error), b"pending").unwrap();
        assert!(memory.lines().is_empty());

        drop(buffered);
        assert_eq!(memory.lines(), ["pending"]);
    }

    #[test]
    fn test_duplicate_starts_empty() {
        let memory = Memory::new();
        let buffered = Buffered::new(memory.clone()).flush_level(Level::Critical);
        buffered.append(&record(Level::Info), b"first").unwrap();

        let duplicate = buffered.duplicate().unwrap();
        duplicate.flush().unwrap();
        assert!(memory.lines().is_empty());

        buffered.flush().unwrap();
        assert_eq!(memory.lines(), ["first"]);
    }
}
