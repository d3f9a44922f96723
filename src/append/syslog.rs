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

//! Appender for writing log records to syslog.
//!
//! # Examples
//!
//!```rust, no_run
//! use gogo::append::syslog::Facility;
//! use gogo::append::syslog::Syslog;
//! use gogo::append::syslog::SyslogTarget;
//!
//! let syslog = Syslog::new(SyslogTarget::udp("localhost", 514)).facility(Facility::LOCAL0);
//! let gogo = gogo::Gogo::builder("app").high_append(syslog).build().unwrap();
//! let logger = gogo.logger().unwrap();
//! logger.error("This record will be written to syslog.").unwrap();
//! ```

use std::path::PathBuf;
use std::sync::Mutex;

use fasyslog::sender::SyslogSender;

use crate::Error;
use crate::Level;
use crate::append::Append;
use crate::record::Record;

// re-exports to avoid version conflicts
mod exported {
    pub use fasyslog::Facility;
    pub use fasyslog::Severity;
    pub use fasyslog::format::SyslogContext;
}
pub use exported::*;

/// The well-known syslog port.
pub const DEFAULT_PORT: u16 = 514;

/// Where a [`Syslog`] appender sends its messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyslogTarget {
    Tcp { host: String, port: u16 },
    Udp { host: String, port: u16 },
    /// A local domain socket, e.g. `/dev/log`.
    Unix(PathBuf),
}

impl SyslogTarget {
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        SyslogTarget::Tcp {
            host: host.into(),
            port,
        }
    }

    pub fn udp(host: impl Into<String>, port: u16) -> Self {
        SyslogTarget::Udp {
            host: host.into(),
            port,
        }
    }

    /// The platform's local syslog socket.
    pub fn local() -> Self {
        if cfg!(target_os = "macos") {
            SyslogTarget::Unix(PathBuf::from("/var/run/syslog"))
        } else {
            SyslogTarget::Unix(PathBuf::from("/dev/log"))
        }
    }

    fn connect(&self) -> std::io::Result<SyslogSender> {
        match self {
            SyslogTarget::Tcp { host, port } => {
                fasyslog::sender::tcp((host.as_str(), *port)).map(SyslogSender::Tcp)
            }
            SyslogTarget::Udp { host, port } => {
                fasyslog::sender::udp(("0.0.0.0", 0), (host.as_str(), *port))
                    .map(SyslogSender::Udp)
            }
            #[cfg(unix)]
            SyslogTarget::Unix(path) => fasyslog::sender::unix(path),
            #[cfg(not(unix))]
            SyslogTarget::Unix(_) => Err(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "unix domain sockets are not supported on this platform",
            )),
        }
    }
}

/// Parse a facility name: `user` or `local0` through `local7`.
pub fn parse_facility(name: &str) -> Result<Facility, Error> {
    match name.trim().to_ascii_lowercase().as_str() {
        "user" => Ok(Facility::USER),
        "local0" => Ok(Facility::LOCAL0),
        "local1" => Ok(Facility::LOCAL1),
        "local2" => Ok(Facility::LOCAL2),
        "local3" => Ok(Facility::LOCAL3),
        "local4" => Ok(Facility::LOCAL4),
        "local5" => Ok(Facility::LOCAL5),
        "local6" => Ok(Facility::LOCAL6),
        "local7" => Ok(Facility::LOCAL7),
        _ => Err(Error::invalid_configuration("unknown syslog facility").with_context("facility", name)),
    }
}

fn level_to_severity(level: Level) -> Severity {
    match level {
        Level::Critical => Severity::CRITICAL,
        Level::Error => Severity::ERROR,
        Level::Warning => Severity::WARNING,
        Level::Info => Severity::INFORMATIONAL,
        Level::Debug => Severity::DEBUG,
    }
}

/// An appender that writes log records to syslog in the RFC 3164 (BSD syslog) format.
///
/// The sender is connected on the first record and re-connected after a failed send.
/// Duplicates connect to the same target on their own.
#[derive(Debug)]
pub struct Syslog {
    target: SyslogTarget,
    facility: Facility,
    context: SyslogContext,
    sender: Mutex<Option<SyslogSender>>,
}

impl Syslog {
    /// Creates a new [`Syslog`] appender with the `user` facility.
    pub fn new(target: SyslogTarget) -> Self {
        Self {
            target,
            facility: Facility::USER,
            context: SyslogContext::default(),
            sender: Mutex::new(None),
        }
    }

    /// Set the facility of the [`Syslog`] appender.
    pub fn facility(mut self, facility: Facility) -> Self {
        self.facility = facility;
        self.context.facility(facility);
        self
    }

    pub fn target(&self) -> &SyslogTarget {
        &self.target
    }
}

impl Append for Syslog {
    fn append(&self, record: &Record, formatted: &[u8]) -> Result<(), Error> {
        let severity = level_to_severity(record.level());
        let message = String::from_utf8_lossy(formatted);
        let message = format!("{}", self.context.format_rfc3164(severity, Some(message)));

        let mut sender = self.sender.lock().unwrap_or_else(|e| e.into_inner());
        let mut conn = match sender.take() {
            Some(conn) => conn,
            None => self.target.connect().map_err(|err| {
                Error::delivery("failed to connect syslog")
                    .with_context("target", format!("{:?}", self.target))
                    .with_source(err)
            })?,
        };
        conn.send_formatted(message.as_bytes())
            .map_err(Error::from_io_error)?;
        *sender = Some(conn);
        Ok(())
    }

    fn flush(&self) -> Result<(), Error> {
        let mut sender = self.sender.lock().unwrap_or_else(|e| e.into_inner());
        match sender.as_mut() {
            Some(conn) => conn.flush().map_err(Error::from_io_error),
            None => Ok(()),
        }
    }

    fn duplicate(&self) -> Result<Box<dyn Append>, Error> {
        Ok(Box::new(
            Syslog::new(self.target.clone()).facility(self.facility),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::net::UdpSocket;

    use super::*;

    #[test]
    fn test_parse_facility() {
        assert_eq!(parse_facility("LOCAL3").unwrap(), Facility::LOCAL3);
        assert_eq!(parse_facility("user").unwrap(), Facility::USER);
        assert!(parse_facility("kern").is_err());
    }

    #[test]
    fn test_udp_message_carries_priority() {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = receiver.local_addr().unwrap().port();

        let syslog = Syslog::new(SyslogTarget::udp("127.0.0.1", port)).facility(Facility::LOCAL0);
        let record = Record::new("app", Level::Error, "ignored");
        syslog.append(&record, b"disk full").unwrap();

        let mut buf = [0u8; 512];
        let n = receiver.recv(&mut buf).unwrap();
        let message = String::from_utf8_lossy(&buf[..n]);
        // local0 (16) * 8 + error (3)
        assert!(message.starts_with("<131>"), "{message}");
        assert!(message.contains("disk full"), "{message}");
    }
}
