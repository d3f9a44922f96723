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

//! Log records and their metadata.

use jiff::Zoned;

use crate::Level;
use crate::kv::Fields;

/// Metadata about a log record: who logged it and how severe it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata<'a> {
    name: &'a str,
    level: Level,
}

impl<'a> Metadata<'a> {
    pub fn new(name: &'a str, level: Level) -> Self {
        Self { name, level }
    }

    /// The name of the logger.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The severity of the record.
    pub fn level(&self) -> Level {
        self.level
    }
}

/// A single log event.
///
/// Records are owned so that sinks which hold them for later (see
/// [`Buffered`](crate::append::Buffered)) can do so without borrowing from the call site.
#[derive(Debug, Clone)]
pub struct Record {
    name: String,
    level: Level,
    message: String,
    time: Zoned,
    fields: Fields,
}

impl Record {
    /// Create a record timestamped now, without fields.
    pub fn new(name: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level,
            message: message.into(),
            time: Zoned::now(),
            fields: Fields::new(),
        }
    }

    /// Replace the fields of this record.
    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    /// Replace the timestamp of this record.
    pub fn with_time(mut self, time: Zoned) -> Self {
        self.time = time;
        self
    }

    pub fn metadata(&self) -> Metadata<'_> {
        Metadata::new(&self.name, self.level)
    }

    /// The name of the logger that produced this record.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn time(&self) -> &Zoned {
        &self.time
    }

    /// The millisecond part of the timestamp.
    pub fn msecs(&self) -> i16 {
        self.time.millisecond()
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut Fields {
        &mut self.fields
    }
}
