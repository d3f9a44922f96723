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

use sha2::Digest;
use sha2::Sha256;

use crate::Append;
use crate::Error;
use crate::Layout;
use crate::Level;
use crate::append::Stderr;
use crate::append::Stdout;
use crate::kv::Fields;
use crate::layout::Format;
use crate::layout::StructuredLayout;
use crate::logger::Logger;
use crate::logger::StructuredLogger;
use crate::registry::LoggerConfig;
use crate::registry::Registry;
use crate::registry::SinkConfig;
use crate::router::Router;

/// The name of the logger returned by [`Gogo::logger`].
pub const DEFAULT_LOGGER_NAME: &str = "base";

/// Flush every logger in the [global registry](Registry::global).
///
/// The global registry lives until the process exits and its loggers are never dropped, so
/// records held by a [`Buffered`](crate::append::Buffered) appender are only delivered when
/// the buffer fills, a record reaches its flush level, or this is called. Call it before
/// exiting.
pub fn flush() -> Result<(), Error> {
    Registry::global().flush_all()
}

/// A logging configuration that hands out named loggers.
///
/// Every logger routes its records between a high sink (stderr by default) and a low sink
/// (stdout by default) according to the configured [`Router`].
///
/// ```
/// use gogo::Gogo;
/// use gogo::Level;
/// use gogo::append::Memory;
///
/// let (high, low) = (Memory::new(), Memory::new());
/// let gogo = Gogo::builder("app")
///     .low_level(Level::Info)
///     .monolog(true)
///     .high_append(high.clone())
///     .low_append(low.clone())
///     .build()
///     .unwrap();
///
/// let logger = gogo.logger().unwrap();
/// logger.debug("ignored").unwrap();
/// logger.info("stdout").unwrap();
/// logger.warning("stderr").unwrap();
/// assert_eq!(low.lines(), ["stdout"]);
/// assert_eq!(high.lines(), ["stderr"]);
/// ```
#[derive(Debug)]
pub struct Gogo {
    name: String,
    config: LoggerConfig,
    registry: Arc<Registry>,
}

impl Gogo {
    /// Start configuring a [`Gogo`].
    pub fn builder(name: impl Into<String>) -> GogoBuilder {
        GogoBuilder::new(name)
    }

    /// A [`Gogo`] with the default configuration.
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        GogoBuilder::new(name).build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn router(&self) -> &Router {
        self.config.router()
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Flush every logger in this Gogo's registry.
    ///
    /// This includes loggers registered by other [`Gogo`]s sharing the registry.
    pub fn flush(&self) -> Result<(), Error> {
        self.registry.flush_all()
    }

    /// The logger named [`DEFAULT_LOGGER_NAME`].
    pub fn logger(&self) -> Result<Arc<Logger>, Error> {
        self.get_logger(DEFAULT_LOGGER_NAME)
    }

    /// The logger registered as `"{gogo}.{name}"`, created on first use.
    pub fn get_logger(&self, name: &str) -> Result<Arc<Logger>, Error> {
        self.get_logger_with(name, Fields::new())
    }

    /// Like [`Gogo::get_logger`], with `context` attached to every record of a newly created
    /// logger.
    ///
    /// When the logger already exists, `context` is ignored.
    pub fn get_logger_with(&self, name: &str, context: Fields) -> Result<Arc<Logger>, Error> {
        let name = format!("{}.{name}", self.name);
        self.registry
            .get_or_create_with(&name, || self.config.build(&name, context, None))
    }

    /// A structured logger over the logger registered as `"{gogo}.structured.{name}"`.
    ///
    /// Both sinks of that logger use a [`StructuredLayout`]. Without a name, one is derived
    /// from `fields`, so equal field sets share a logger.
    pub fn get_structured_logger(
        &self,
        name: Option<&str>,
        fields: Fields,
    ) -> Result<StructuredLogger, Error> {
        let name = match name {
            Some(name) => name.to_string(),
            None => fields_digest(&fields)?,
        };
        let name = format!("{}.structured.{name}", self.name);

        let layout: Arc<dyn Layout> = Arc::new(StructuredLayout);
        let logger = self.registry.get_or_create_with(&name, || {
            self.config.build(&name, Fields::new(), Some(&layout))
        })?;
        Ok(StructuredLogger::new(logger, fields))
    }
}

/// A stable name for a field set: the first 32 hex digits of its SHA-256 digest.
fn fields_digest(fields: &Fields) -> Result<String, Error> {
    let canonical = serde_json::to_vec(fields)
        .map_err(|err| Error::unexpected("failed to serialize fields").with_source(err))?;
    let digest = hex::encode(Sha256::digest(&canonical));
    Ok(digest[..32].to_string())
}

/// A builder for configuring a [`Gogo`].
#[must_use = "call `build` to create the Gogo"]
#[derive(Debug)]
pub struct GogoBuilder {
    name: String,
    low_level: Level,
    high_level: Level,
    verbose: Option<bool>,
    monolog: bool,
    high_append: Box<dyn Append>,
    low_append: Box<dyn Append>,
    high_layout: Arc<dyn Layout>,
    low_layout: Arc<dyn Layout>,
    registry: Option<Arc<Registry>>,
}

impl GogoBuilder {
    /// Create a builder with low level `debug`, high level `warning`, stderr as the high
    /// sink, stdout as the low sink and the basic layout on both.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            low_level: Level::Debug,
            high_level: Level::Warning,
            verbose: None,
            monolog: false,
            high_append: Box::new(Stderr),
            low_append: Box::new(Stdout),
            high_layout: Format::Basic.layout(),
            low_layout: Format::Basic.layout(),
            registry: None,
        }
    }

    /// Records at this level or above go to the low sink.
    pub fn low_level(mut self, level: Level) -> Self {
        self.low_level = level;
        self
    }

    /// Records at this level or above go to the high sink.
    pub fn high_level(mut self, level: Level) -> Self {
        self.high_level = level;
        self
    }

    /// Override the low level: `Some(true)` forces `debug`, `Some(false)` forces `info`.
    pub fn verbose(mut self, verbose: Option<bool>) -> Self {
        self.verbose = verbose;
        self
    }

    /// Keep records that reach the high sink out of the low sink.
    pub fn monolog(mut self, monolog: bool) -> Self {
        self.monolog = monolog;
        self
    }

    pub fn high_append(mut self, append: impl Into<Box<dyn Append>>) -> Self {
        self.high_append = append.into();
        self
    }

    pub fn low_append(mut self, append: impl Into<Box<dyn Append>>) -> Self {
        self.low_append = append.into();
        self
    }

    pub fn high_layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        let layout: Box<dyn Layout> = layout.into();
        self.high_layout = Arc::from(layout);
        self
    }

    pub fn low_layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        let layout: Box<dyn Layout> = layout.into();
        self.low_layout = Arc::from(layout);
        self
    }

    /// Use a built-in layout for the high sink.
    pub fn high_format(mut self, format: Format) -> Self {
        self.high_layout = format.layout();
        self
    }

    /// Use a built-in layout for the low sink.
    pub fn low_format(mut self, format: Format) -> Self {
        self.low_layout = format.layout();
        self
    }

    /// Register loggers in `registry` instead of [`Registry::global`].
    pub fn registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Builds the [`Gogo`].
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidConfiguration`](crate::ErrorKind::InvalidConfiguration) error if the
    /// high level is less severe than the (effective) low level.
    pub fn build(self) -> Result<Gogo, Error> {
        let low_level = match self.verbose {
            None => self.low_level,
            Some(true) => Level::Debug,
            Some(false) => Level::Info,
        };
        let router = Router::new(low_level, self.high_level, self.monolog)?;

        let config = LoggerConfig::new(
            router,
            SinkConfig::new(self.high_append, self.high_layout),
            SinkConfig::new(self.low_append, self.low_layout),
        );
        Ok(Gogo {
            name: self.name,
            config,
            registry: self.registry.unwrap_or_else(Registry::global),
        })
    }
}
