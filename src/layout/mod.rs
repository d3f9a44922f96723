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

//! Layouts for formatting log records.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

pub use self::basic::BasicLayout;
pub use self::basic::BomLayout;
pub use self::console::ConsoleLayout;
pub use self::csv::CsvLayout;
pub use self::custom::CustomLayout;
pub use self::fixed::FixedLayout;
pub use self::json::JsonLayout;
pub use self::structured::StructuredLayout;
pub use self::template::TemplateLayout;
use crate::Error;
use crate::record::Record;

mod basic;
mod console;
mod csv;
mod custom;
mod fixed;
mod json;
mod structured;
mod template;

/// The date format used by every built-in layout that renders a timestamp.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A layout for formatting log records.
pub trait Layout: fmt::Debug + Send + Sync + 'static {
    /// Formats a log record.
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error>;
}

impl<T: Layout> From<T> for Box<dyn Layout> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

/// The record time, formatted with [`DATE_FORMAT`] (no sub-second part).
pub(crate) fn asctime(record: &Record) -> String {
    record.time().strftime(DATE_FORMAT).to_string()
}

/// The built-in layouts, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// `{message}`
    #[default]
    Basic,
    /// `{message}` preceded by a byte order mark.
    Bom,
    /// `{name:<12}: {level:<8} {message}`
    Console,
    /// `{time}.{msecs:<3} {name:<12} {level:<8} {message}`
    Fixed,
    /// `"{time}.{msecs}","{name}","{level}","{message}"`
    Csv,
    /// `{"time": ..., "name": ..., "level": ..., "message": ...}`
    Json,
    /// A key-ordered JSON object of the record fields and metadata.
    Structured,
}

impl Format {
    pub const ALL: [Format; 7] = [
        Format::Basic,
        Format::Bom,
        Format::Console,
        Format::Fixed,
        Format::Csv,
        Format::Json,
        Format::Structured,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Format::Basic => "basic",
            Format::Bom => "bom",
            Format::Console => "console",
            Format::Fixed => "fixed",
            Format::Csv => "csv",
            Format::Json => "json",
            Format::Structured => "structured",
        }
    }

    /// Construct the layout this format names.
    pub fn layout(self) -> Arc<dyn Layout> {
        match self {
            Format::Basic => Arc::new(BasicLayout),
            Format::Bom => Arc::new(BomLayout),
            Format::Console => Arc::new(ConsoleLayout::default()),
            Format::Fixed => Arc::new(FixedLayout),
            Format::Csv => Arc::new(CsvLayout),
            Format::Json => Arc::new(JsonLayout),
            Format::Structured => Arc::new(StructuredLayout),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Format::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::invalid_configuration("unknown format").with_context("format", s))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use jiff::Zoned;

    use super::*;
    use crate::Level;
    use crate::kv::Fields;

    /// A record with a fixed timestamp: 2024-08-11 22:44:57.172 UTC.
    pub(crate) fn record(name: &str, level: Level, message: &str) -> Record {
        let time: Zoned = "2024-08-11T22:44:57.172105+00:00[UTC]".parse().unwrap();
        Record::new(name, level, message).with_time(time)
    }

    pub(crate) fn format(layout: &dyn Layout, record: &Record) -> String {
        String::from_utf8(layout.format(record).unwrap()).unwrap()
    }

    #[test]
    fn test_format_table() {
        for format in Format::ALL {
            assert_eq!(format.name().parse::<Format>().unwrap(), format);
        }
        assert_eq!("JSON".parse::<Format>().unwrap(), Format::Json);
        assert!("xml".parse::<Format>().is_err());
    }

    #[test]
    fn test_builtin_layouts() {
        let record = record("console.base", Level::Debug, "hello")
            .with_fields(Fields::new().with("ip", "1.1.1.1"));

        let expected = [
            (Format::Basic, "hello".to_string()),
            (Format::Bom, "\u{feff}hello".to_string()),
            (Format::Console, "console.base: DEBUG    hello".to_string()),
            (
                Format::Fixed,
                "2024-08-11 22:44:57.172 console.base DEBUG    hello".to_string(),
            ),
            (
                Format::Csv,
                r#""2024-08-11 22:44:57.172","console.base","DEBUG","hello""#.to_string(),
            ),
            (
                Format::Json,
                r#"{"time":"2024-08-11 22:44:57.172","name":"console.base","level":"DEBUG","message":"hello"}"#
                    .to_string(),
            ),
            (
                Format::Structured,
                r#"{"ip":"1.1.1.1","level":"DEBUG","message":"hello","name":"console.base","time":"2024-08-11 22:44:57.172"}"#
                    .to_string(),
            ),
        ];

        for (fmt, want) in expected {
            assert_eq!(format(fmt.layout().as_ref(), &record), want, "format {fmt}");
        }
    }
}
