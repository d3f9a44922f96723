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
use std::sync::Arc;

use crate::Error;
use crate::Level;
use crate::bridge::EnvFilter;
use crate::kv::Fields;
use crate::kv::Value;
use crate::logger::Logger;
use crate::record::Record;

/// A [`log::Log`] implementation that forwards `log` crate records to a [`Logger`].
///
/// Records keep the logger's name; their `log` key-values become record fields. `Trace`
/// records are delivered as [`Level::Debug`].
#[derive(Debug)]
pub struct LogBridge {
    logger: Arc<Logger>,
    filter: Option<EnvFilter>,
}

impl LogBridge {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self {
            logger,
            filter: None,
        }
    }

    /// Only forward records whose target passes `filter`.
    pub fn filter(mut self, filter: EnvFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set up the global logger.
    ///
    /// The global maximum level is set to the most verbose level the logger delivers.
    ///
    /// # Errors
    ///
    /// This function will fail if it is called more than once, or if another library has already
    /// initialized a global logger.
    pub fn try_apply(self) -> Result<(), log::SetLoggerError> {
        let max_level = self.logger.level().to_log_filter();
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(max_level);
        Ok(())
    }

    /// Set up the global logger.
    ///
    /// # Panics
    ///
    /// This function will panic if it is called more than once, or if another library has already
    /// initialized a global logger.
    pub fn apply(self) {
        self.try_apply()
            .expect("LogBridge::apply should not be called after the global logger initialized");
    }

    fn to_record(&self, record: &log::Record) -> Record {
        let mut fields = Fields::new();
        let mut visitor = KeyValueVisitor {
            fields: &mut fields,
        };
        if let Err(err) = record.key_values().visit(&mut visitor) {
            fields.insert("kv_error", err.to_string());
        }

        Record::new(
            self.logger.name(),
            Level::from(record.level()),
            record.args().to_string(),
        )
        .with_fields(fields)
    }
}

struct KeyValueVisitor<'a> {
    fields: &'a mut Fields,
}

impl<'kvs> log::kv::VisitSource<'kvs> for KeyValueVisitor<'_> {
    fn visit_pair(
        &mut self,
        key: log::kv::Key<'kvs>,
        value: log::kv::Value<'kvs>,
    ) -> Result<(), log::kv::Error> {
        let value = serde_json::to_value(&value).unwrap_or_else(|_| Value::String(value.to_string()));
        self.fields.insert(key.as_str(), value);
        Ok(())
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        if let Some(filter) = &self.filter {
            if !filter.enabled(metadata) {
                return false;
            }
        }
        self.logger.enabled(Level::from(metadata.level()))
    }

    fn log(&self, record: &log::Record) {
        if let Some(filter) = &self.filter {
            if !filter.matches(record) {
                return;
            }
        }

        let record = self.to_record(record);
        if let Err(err) = self.logger.emit(record.clone()) {
            handle_log_error(&record, err);
        }
    }

    fn flush(&self) {
        if let Err(err) = self.logger.flush() {
            handle_flush_error(err);
        }
    }
}

fn handle_log_error(record: &Record, error: Error) {
    let Err(fallback_error) = write!(
        std::io::stderr(),
        r###"
Error perform logging.
    Attempted to log: {message}
    Record: {record:?}
    Error: {error:?}
"###,
        message = record.message(),
        record = record,
        error = error,
    ) else {
        return;
    };

    panic!(
        r###"
Error performing stderr logging after error occurred during regular logging.
    Attempted to log: {message}
    Record: {record:?}
    Error: {error:?}
    Fallback error: {fallback_error}
"###,
        message = record.message(),
        record = record,
        error = error,
        fallback_error = fallback_error,
    );
}

fn handle_flush_error(error: Error) {
    let Err(fallback_error) = write!(
        std::io::stderr(),
        r###"
Error perform flush.
    Error: {error:?}
"###,
    ) else {
        return;
    };

    panic!(
        r###"
Error performing stderr logging after error occurred during regular flush.
    Error: {error:?}
    Fallback error: {fallback_error}
"###,
    );
}

#[cfg(test)]
mod tests {
    use log::Log;

    use super::*;
    use crate::append::Memory;
    use crate::layout::StructuredLayout;
    use crate::logger::Sink;
    use crate::router::Router;

    fn bridge(memory: &Memory) -> LogBridge {
        let router = Router::new(Level::Info, Level::Error, false).unwrap();
        let logger = Logger::new(
            "app.bridge",
            router,
            router.wire_high(Sink::new(Memory::new(), StructuredLayout)),
            router.wire_low(Sink::new(memory.clone(), StructuredLayout)),
        );
        LogBridge::new(Arc::new(logger))
    }

    #[test]
    fn test_forwards_records_with_key_values() {
        let memory = Memory::new();
        let bridge = bridge(&memory);

        let kvs = [("user", "fred")];
        bridge.log(
            &log::Record::builder()
                .args(format_args!("logged in"))
                .level(log::Level::Info)
                .target("app::auth")
                .key_values(&kvs)
                .build(),
        );

        let line: serde_json::Value = serde_json::from_str(&memory.lines()[0]).unwrap();
        assert_eq!(line["message"], "logged in");
        assert_eq!(line["user"], "fred");
        assert_eq!(line["name"], "app.bridge");
        assert_eq!(line["level"], "INFO");
    }

    #[test]
    fn test_enabled_follows_router_and_filter() {
        let memory = Memory::new();
        let bridge = bridge(&memory).filter(EnvFilter::parse("app::db=off,info"));

        let metadata = |target, level| {
            log::Metadata::builder()
                .target(target)
                .level(level)
                .build()
        };
        assert!(!bridge.enabled(&metadata("app::auth", log::Level::Debug)));
        assert!(bridge.enabled(&metadata("app::auth", log::Level::Info)));
        assert!(!bridge.enabled(&metadata("app::db", log::Level::Error)));
    }
}
