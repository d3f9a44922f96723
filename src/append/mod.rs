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

//! Deliver formatted log records to various targets.
//!
//! Every appender documents what [`Append::duplicate`] means for it. A logger registered
//! under a new name never shares a mutable appender with another logger; it gets its own
//! duplicate, which either re-creates the resource from the same configuration (files,
//! sockets) or opens a new handle on a deliberately shared target (process streams, memory
//! buffers).

use std::fmt;

pub use self::buffered::Buffered;
pub use self::config::HandlerConfig;
pub use self::config::HandlerKind;
pub use self::config::HandlerOptions;
#[cfg(feature = "append-email")]
pub use self::email::Email;
pub use self::file::File;
pub use self::file::FileBuilder;
pub use self::file::FileMode;
pub use self::memory::Memory;
pub use self::socket::Protocol;
pub use self::socket::Socket;
pub use self::stdio::Stderr;
pub use self::stdio::Stdout;
#[cfg(feature = "append-syslog")]
pub use self::syslog::Syslog;
#[cfg(feature = "append-webhook")]
pub use self::webhook::Webhook;
pub use self::writer::Writer;
use crate::Error;
use crate::record::Record;

mod buffered;
mod config;
#[cfg(feature = "append-email")]
mod email;
mod file;
mod memory;
mod socket;
mod stdio;
#[cfg(feature = "append-syslog")]
pub mod syslog;
#[cfg(feature = "append-webhook")]
mod webhook;
mod writer;

/// An appender that delivers formatted log records to a target.
pub trait Append: fmt::Debug + Send + Sync + 'static {
    /// Deliver a record, already formatted by the sink's layout.
    ///
    /// The record itself is passed along for targets that need its metadata, e.g. the syslog
    /// severity or the webhook form fields.
    fn append(&self, record: &Record, formatted: &[u8]) -> Result<(), Error>;

    /// Flush any buffered records.
    ///
    /// Default to a no-op.
    fn flush(&self) -> Result<(), Error> {
        Ok(())
    }

    /// Create an independent appender with the same target, for wiring into another logger.
    fn duplicate(&self) -> Result<Box<dyn Append>, Error>;
}

impl<T: Append> From<T> for Box<dyn Append> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}
