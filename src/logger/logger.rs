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

use crate::Error;
use crate::Level;
use crate::kv::Fields;
use crate::logger::Sink;
use crate::record::Metadata;
use crate::record::Record;
use crate::router::Router;

/// A named logger that delivers records to its sinks.
///
/// Loggers are created by [`Gogo`](crate::Gogo) and held by a
/// [`Registry`](crate::registry::Registry); both sinks of a logger carry the filters its
/// [`Router`] wired onto them.
#[derive(Debug)]
pub struct Logger {
    name: String,
    router: Router,
    context: Fields,
    sinks: Vec<Sink>,
}

impl Logger {
    /// Create a logger from the high and the low sink, as wired by `router`.
    pub fn new(name: impl Into<String>, router: Router, high: Sink, low: Sink) -> Self {
        Self {
            name: name.into(),
            router,
            context: Fields::new(),
            sinks: vec![high, low],
        }
    }

    /// Attach context fields to every record of this logger.
    pub fn with_context(mut self, context: Fields) -> Self {
        self.context = context.without_reserved();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// The least severe level this logger delivers.
    pub fn level(&self) -> Level {
        self.router.low_level()
    }

    pub fn context(&self) -> &Fields {
        &self.context
    }

    /// The high sink followed by the low sink.
    pub fn sinks(&self) -> &[Sink] {
        &self.sinks
    }

    /// Whether any sink would deliver a record at `level`.
    pub fn enabled(&self, level: Level) -> bool {
        let metadata = Metadata::new(&self.name, level);
        self.sinks.iter().any(|sink| sink.accepts(&metadata))
    }

    /// Log a message.
    pub fn log(&self, level: Level, message: impl Into<String>) -> Result<(), Error> {
        self.emit(Record::new(self.name.as_str(), level, message))
    }

    /// Log a message with fields for this call only. They override the logger's context.
    pub fn log_with(
        &self,
        level: Level,
        message: impl Into<String>,
        fields: &Fields,
    ) -> Result<(), Error> {
        let record = Record::new(self.name.as_str(), level, message).with_fields(fields.clone());
        self.emit(record)
    }

    /// Deliver a prepared record to every sink that accepts it.
    ///
    /// The record's own fields override the logger's context. Every sink is attempted even if
    /// an earlier one fails.
    pub fn emit(&self, mut record: Record) -> Result<(), Error> {
        let fields = Fields::merge(&self.context, record.fields());
        *record.fields_mut() = fields;

        let mut errors = vec![];
        for sink in &self.sinks {
            if let Err(err) = sink.emit(&record) {
                errors.push(err.with_context("logger", &self.name));
            }
        }

        match Error::collect(errors, "sinks failed to deliver the record") {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn debug(&self, message: impl Into<String>) -> Result<(), Error> {
        self.log(Level::Debug, message)
    }

    pub fn info(&self, message: impl Into<String>) -> Result<(), Error> {
        self.log(Level::Info, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> Result<(), Error> {
        self.log(Level::Warning, message)
    }

    pub fn error(&self, message: impl Into<String>) -> Result<(), Error> {
        self.log(Level::Error, message)
    }

    pub fn critical(&self, message: impl Into<String>) -> Result<(), Error> {
        self.log(Level::Critical, message)
    }

    /// Flush every sink.
    pub fn flush(&self) -> Result<(), Error> {
        let errors = self
            .sinks
            .iter()
            .filter_map(|sink| sink.flush().err())
            .collect::<Vec<_>>();

        match Error::collect(errors, "sinks failed to flush") {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
