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

use crate::Error;
use crate::Level;
use crate::kv::Fields;
use crate::logger::Logger;
use crate::record::Record;

/// A logger handle with bound fields, for structured output.
///
/// Each call merges the bound fields with the fields of that call; the per-call value wins
/// for a key present in both. Keys reserved for record metadata (`message`, `time`, `level`
/// and `name`) are dropped from both, so the metadata always wins.
///
/// ```
/// use gogo::Gogo;
/// use gogo::append::Memory;
/// use gogo::kv::Fields;
///
/// let memory = Memory::new();
/// let gogo = Gogo::builder("doc").low_append(memory.clone()).build().unwrap();
/// let logger = gogo
///     .get_structured_logger(Some("conn"), Fields::new().with("connid", "1234"))
///     .unwrap();
/// logger.info("log message").unwrap();
///
/// let line: serde_json::Value = serde_json::from_str(&memory.lines()[0]).unwrap();
/// assert_eq!(line["connid"], "1234");
/// assert_eq!(line["message"], "log message");
/// assert_eq!(line["name"], "doc.structured.conn");
/// ```
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    logger: Arc<Logger>,
    fields: Fields,
}

impl StructuredLogger {
    pub fn new(logger: Arc<Logger>, fields: Fields) -> Self {
        Self {
            logger,
            fields: fields.without_reserved(),
        }
    }

    /// A new handle on the same logger with `fields` bound on top of the current ones.
    pub fn bind(&self, fields: &Fields) -> Self {
        Self::new(self.logger.clone(), Fields::merge(&self.fields, fields))
    }

    pub fn name(&self) -> &str {
        self.logger.name()
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.logger.enabled(level)
    }

    pub fn log(&self, level: Level, message: impl Into<String>) -> Result<(), Error> {
        self.log_with(level, message, &Fields::new())
    }

    /// Log a message with fields for this call only.
    pub fn log_with(
        &self,
        level: Level,
        message: impl Into<String>,
        fields: &Fields,
    ) -> Result<(), Error> {
        let record = Record::new(self.logger.name(), level, message)
            .with_fields(Fields::merge(&self.fields, fields));
        self.logger.emit(record)
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

    pub fn flush(&self) -> Result<(), Error> {
        self.logger.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::append::Memory;
    use crate::layout::StructuredLayout;
    use crate::logger::Sink;
    use crate::router::Router;

    fn structured(memory: &Memory, fields: Fields) -> StructuredLogger {
        let router = Router::default();
        let logger = Logger::new(
            "app.structured.test",
            router,
            router.wire_high(Sink::new(Memory::new(), StructuredLayout)),
            router.wire_low(Sink::new(memory.clone(), StructuredLayout)),
        );
        StructuredLogger::new(Arc::new(logger), fields)
    }

    fn parse(line: &str) -> serde_json::Map<String, serde_json::Value> {
        serde_json::from_str(line).unwrap()
    }

    #[test]
    fn test_bound_and_per_call_fields() {
        let memory = Memory::new();
        let logger = structured(&memory, Fields::new().with("all", "true"));

        logger.debug("hello").unwrap();
        logger
            .log_with(Level::Debug, "extra", &Fields::new().with("key", "value"))
            .unwrap();

        let lines = memory.lines();
        let first = parse(&lines[0]);
        assert_eq!(first["all"], "true");
        assert_eq!(first["message"], "hello");
        assert!(!first.contains_key("key"));

        let second = parse(&lines[1]);
        assert_eq!(second["all"], "true");
        assert_eq!(second["key"], "value");
        assert_eq!(second["message"], "extra");
    }

    #[test]
    fn test_precedence() {
        let memory = Memory::new();
        let logger = structured(
            &memory,
            Fields::new().with("user", "fred").with("level", "spoofed"),
        );
        assert!(!logger.fields().contains_key("level"));

        let per_call = Fields::new().with("user", "barney").with("name", "spoofed");
        logger.log_with(Level::Info, "hi", &per_call).unwrap();

        let line = parse(&memory.lines()[0]);
        assert_eq!(line["user"], "barney");
        assert_eq!(line["level"], "INFO");
        assert_eq!(line["name"], "app.structured.test");
    }

    #[test]
    fn test_bind() {
        let memory = Memory::new();
        let logger = structured(&memory, Fields::new().with("connid", "1234"));
        let bound = logger.bind(&Fields::new().with("user", "fred"));

        bound.info("bound").unwrap();
        let line = parse(&memory.lines()[0]);
        assert_eq!(line["connid"], "1234");
        assert_eq!(line["user"], "fred");
        assert_eq!(logger.fields().len(), 1);
    }
}
