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

//! Gogo routes log records of different severities to two destinations with separate formats,
//! and attaches structured context to records.
//!
//! # Overview
//!
//! A [`Gogo`] holds a low level, a high level and two sinks. Records below the low level are
//! dropped, records from the low level up to the high level go to the low sink, and records at
//! the high level or above go to both sinks. In monolog mode they go to the high sink only.
//!
//! Loggers are created by name, once. Each logger gets its own duplicate of the configured
//! appenders, so loggers never share mutable appender state by accident.
//!
//! # Examples
//!
//! Log to stdout, and to stderr from `warning` up:
//!
//! ```
//! let logger = gogo::Gogo::new("app").unwrap().logger().unwrap();
//!
//! logger.debug("stdout").unwrap();
//! logger.error("stdout and stderr").unwrap();
//! ```
//!
//! Structured records with bound context:
//!
//! ```
//! use gogo::Gogo;
//! use gogo::kv::Fields;
//!
//! let gogo = Gogo::new("app").unwrap();
//! let logger = gogo
//!     .get_structured_logger(None, Fields::new().with("connid", "1234"))
//!     .unwrap();
//! logger.info("log message").unwrap();
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod append;
pub mod bridge;
pub mod color;
pub mod filter;
pub mod kv;
pub mod layout;
pub mod record;
pub mod registry;
pub mod router;

pub use append::Append;
pub use filter::Filter;
pub use layout::Layout;

mod error;
pub use error::Error;
pub use error::ErrorKind;

mod level;
pub use level::Level;

mod logger;
pub use logger::*;

mod gogo;
pub use gogo::*;
