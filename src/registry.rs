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

//! The process-wide table of named loggers.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::OnceLock;

use crate::Append;
use crate::Error;
use crate::Layout;
use crate::kv::Fields;
use crate::logger::Logger;
use crate::logger::Sink;
use crate::router::Router;

/// The prototype of one sink: an appender to duplicate and a layout to share.
#[derive(Debug)]
pub struct SinkConfig {
    append: Box<dyn Append>,
    layout: Arc<dyn Layout>,
}

impl SinkConfig {
    pub fn new(append: impl Into<Box<dyn Append>>, layout: Arc<dyn Layout>) -> Self {
        Self {
            append: append.into(),
            layout,
        }
    }

    pub fn append(&self) -> &dyn Append {
        self.append.as_ref()
    }

    pub fn layout(&self) -> &Arc<dyn Layout> {
        &self.layout
    }

    /// A sink over a duplicate of the prototype appender.
    fn sink(&self, layout: Option<&Arc<dyn Layout>>) -> Result<Sink, Error> {
        let layout = layout.unwrap_or(&self.layout).clone();
        Ok(Sink::with_shared_layout(self.append.duplicate()?, layout))
    }
}

/// Everything needed to build a logger: the router and the two sink prototypes.
#[derive(Debug)]
pub struct LoggerConfig {
    router: Router,
    high: SinkConfig,
    low: SinkConfig,
}

impl LoggerConfig {
    pub fn new(router: Router, high: SinkConfig, low: SinkConfig) -> Self {
        Self { router, high, low }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn high(&self) -> &SinkConfig {
        &self.high
    }

    pub fn low(&self) -> &SinkConfig {
        &self.low
    }

    /// Build a logger named `name` over duplicates of both prototype appenders.
    ///
    /// `layout` replaces the configured layout of both sinks when given.
    pub fn build(
        &self,
        name: &str,
        context: Fields,
        layout: Option<&Arc<dyn Layout>>,
    ) -> Result<Logger, Error> {
        let high = self.router.wire_high(self.high.sink(layout)?);
        let low = self.router.wire_low(self.low.sink(layout)?);
        Ok(Logger::new(name, self.router, high, low).with_context(context))
    }
}

/// A table of loggers by name.
///
/// Entries are created on the first request for a name and are never replaced or removed.
/// When two threads race to create the same name, the logger inserted first wins and the
/// other is dropped together with its appenders.
#[derive(Debug, Default)]
pub struct Registry {
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by every [`Gogo`](crate::Gogo) that is not given its own.
    pub fn global() -> Arc<Registry> {
        static GLOBAL: OnceLock<Arc<Registry>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(Registry::new())).clone()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<Logger>>> {
        self.loggers.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, name: &str) -> Option<Arc<Logger>> {
        self.lock().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// The registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names = self.lock().keys().cloned().collect::<Vec<_>>();
        names.sort();
        names
    }

    /// Flush every registered logger.
    ///
    /// Loggers are flushed outside the registry lock, so a flush may log without deadlocking.
    /// Every logger is attempted even if an earlier one fails.
    pub fn flush_all(&self) -> Result<(), Error> {
        let loggers = self.lock().values().cloned().collect::<Vec<_>>();
        let errors = loggers
            .iter()
            .filter_map(|logger| logger.flush().err())
            .collect::<Vec<_>>();

        match Error::collect(errors, "loggers failed to flush") {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Return the logger registered under `name`, or build one from `config` and register it.
    ///
    /// `config` is ignored when `name` is already registered.
    pub fn get_or_create(&self, name: &str, config: &LoggerConfig) -> Result<Arc<Logger>, Error> {
        self.get_or_create_with(name, || config.build(name, Fields::new(), None))
    }

    /// Return the logger registered under `name`, or build one with `create` and register it.
    pub fn get_or_create_with<F>(&self, name: &str, create: F) -> Result<Arc<Logger>, Error>
    where
        F: FnOnce() -> Result<Logger, Error>,
    {
        if let Some(logger) = self.get(name) {
            return Ok(logger);
        }

        // built outside the lock: duplicating an appender may open files or sockets
        let logger = Arc::new(create()?);
        let mut loggers = self.lock();
        Ok(loggers.entry(name.to_string()).or_insert(logger).clone())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::Level;
    use crate::append::Buffered;
    use crate::append::Memory;
    use crate::layout::BasicLayout;

    fn config(high: &Memory, low: &Memory) -> LoggerConfig {
        LoggerConfig::new(
            Router::new(Level::Info, Level::Warning, false).unwrap(),
            SinkConfig::new(high.clone(), Arc::new(BasicLayout)),
            SinkConfig::new(low.clone(), Arc::new(BasicLayout)),
        )
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let (high, low) = (Memory::new(), Memory::new());
        let registry = Registry::new();
        let config = config(&high, &low);

        let first = registry.get_or_create("app.x", &config).unwrap();
        let other = LoggerConfig::new(
            Router::new(Level::Debug, Level::Debug, true).unwrap(),
            SinkConfig::new(Memory::new(), Arc::new(BasicLayout)),
            SinkConfig::new(Memory::new(), Arc::new(BasicLayout)),
        );
        let second = registry.get_or_create("app.x", &other).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.names(), ["app.x"]);

        second.warning("once").unwrap();
        assert_eq!(high.lines(), ["once"]);
        assert_eq!(low.lines(), ["once"]);
    }

    #[test]
    fn test_flush_all_drains_buffered_loggers() {
        let target = Memory::new();
        let registry = Registry::new();
        let config = LoggerConfig::new(
            Router::default(),
            SinkConfig::new(Memory::new(), Arc::new(BasicLayout)),
            SinkConfig::new(Buffered::new(target.clone()), Arc::new(BasicLayout)),
        );

        registry.get_or_create("app.a", &config).unwrap().info("from a").unwrap();
        registry.get_or_create("app.b", &config).unwrap().info("from b").unwrap();
        assert!(target.lines().is_empty());

        registry.flush_all().unwrap();
        let mut lines = target.lines();
        lines.sort();
        assert_eq!(lines, ["from a", "from b"]);
    }

    #[test]
    fn test_concurrent_registration_keeps_one_logger() {
        let (high, low) = (Memory::new(), Memory::new());
        let registry = Arc::new(Registry::new());
        let config = Arc::new(config(&high, &low));

        let handles = (0..8)
            .map(|_| {
                let registry = registry.clone();
                let config = config.clone();
                thread::spawn(move || registry.get_or_create("app.race", &config).unwrap())
            })
            .collect::<Vec<_>>();
        let loggers = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect::<Vec<_>>();

        for logger in &loggers {
            assert!(Arc::ptr_eq(logger, &loggers[0]));
        }
        assert_eq!(registry.len(), 1);

        loggers[0].error("exactly once").unwrap();
        assert_eq!(high.lines(), ["exactly once"]);
        assert_eq!(low.lines(), ["exactly once"]);
    }
}
