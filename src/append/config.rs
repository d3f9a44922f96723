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

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Level;
use crate::append::Append;
use crate::append::Buffered;
use crate::append::FileBuilder;
use crate::append::FileMode;
use crate::append::Memory;
use crate::append::Protocol;
use crate::append::Socket;
use crate::append::Stderr;
use crate::append::Stdout;

/// The built-in appenders, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandlerKind {
    Stdout,
    Stderr,
    File,
    Socket,
    Syslog,
    Buffered,
    Webhook,
    Email,
    Memory,
}

impl HandlerKind {
    pub const ALL: [HandlerKind; 9] = [
        HandlerKind::Stdout,
        HandlerKind::Stderr,
        HandlerKind::File,
        HandlerKind::Socket,
        HandlerKind::Syslog,
        HandlerKind::Buffered,
        HandlerKind::Webhook,
        HandlerKind::Email,
        HandlerKind::Memory,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HandlerKind::Stdout => "stdout",
            HandlerKind::Stderr => "stderr",
            HandlerKind::File => "file",
            HandlerKind::Socket => "socket",
            HandlerKind::Syslog => "syslog",
            HandlerKind::Buffered => "buffered",
            HandlerKind::Webhook => "webhook",
            HandlerKind::Email => "email",
            HandlerKind::Memory => "memory",
        }
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HandlerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        HandlerKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::invalid_configuration("unknown handler").with_context("handler", s))
    }
}

/// Options shared by the built-in appenders. Each kind reads the options it understands and
/// ignores the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerOptions {
    /// `file`: the path to write to.
    pub filename: Option<PathBuf>,
    /// `file`: truncate instead of append on open.
    pub truncate: bool,
    /// `file`: open on the first record.
    pub delay: bool,
    /// `socket`, `syslog`, `email`: the server host.
    pub host: Option<String>,
    /// `socket`, `syslog`, `email`: the server port.
    pub port: Option<u16>,
    /// `socket`, `syslog`: use TCP instead of UDP.
    pub tcp: bool,
    /// `syslog`: write to the platform's local socket instead of `host`.
    pub local: bool,
    /// `syslog`: `user` or `local0`..`local7`.
    pub facility: Option<String>,
    /// `webhook`: the endpoint.
    pub url: Option<String>,
    /// `webhook`: send a `GET` query string instead of a `POST` form.
    pub get: bool,
    /// `email`: the message subject.
    pub subject: Option<String>,
    /// `email`: the sender address.
    pub sender: Option<String>,
    /// `email`: the recipient addresses.
    pub recipients: Vec<String>,
    /// `email`: the SMTP user name.
    pub username: Option<String>,
    /// `email`: the SMTP password.
    pub password: Option<String>,
    /// `email`: upgrade with `STARTTLS`; defaults to on when credentials are set.
    pub starttls: Option<bool>,
    /// `buffered`: the number of records held before flushing.
    pub capacity: Option<usize>,
    /// `buffered`: the level that flushes immediately.
    pub flush_level: Option<Level>,
}

/// A named appender kind and its options.
///
/// ```
/// use gogo::append::HandlerConfig;
/// use gogo::append::HandlerKind;
///
/// let config: HandlerConfig =
///     serde_json::from_str(r#"{"kind": "socket", "host": "127.0.0.1", "tcp": true}"#).unwrap();
/// assert_eq!(config.kind, HandlerKind::Socket);
/// assert_eq!(config.options.port, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerConfig {
    pub kind: HandlerKind,
    #[serde(flatten)]
    pub options: HandlerOptions,
}

impl HandlerConfig {
    pub fn new(kind: HandlerKind) -> Self {
        Self {
            kind,
            options: HandlerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: HandlerOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the appender this configuration names.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidConfiguration`](crate::ErrorKind::InvalidConfiguration) error if a
    /// required option is missing, or if the kind was compiled out.
    pub fn build(&self) -> Result<Box<dyn Append>, Error> {
        let options = &self.options;
        let host = || options.host.clone().unwrap_or_else(|| "localhost".to_string());

        match self.kind {
            HandlerKind::Stdout => Ok(Box::new(Stdout)),
            HandlerKind::Stderr => Ok(Box::new(Stderr)),
            HandlerKind::Memory => Ok(Box::new(Memory::new())),
            HandlerKind::File => {
                let filename = options.filename.as_ref().ok_or_else(|| {
                    Error::invalid_configuration("file handler requires a filename")
                })?;
                let mode = if options.truncate {
                    FileMode::Truncate
                } else {
                    FileMode::Append
                };
                let file = FileBuilder::new(filename)
                    .mode(mode)
                    .delay(options.delay)
                    .build()?;
                Ok(Box::new(file))
            }
            HandlerKind::Socket => {
                let protocol = if options.tcp {
                    Protocol::Tcp
                } else {
                    Protocol::Udp
                };
                let port = options.port.unwrap_or(protocol.default_port());
                Ok(Box::new(Socket::new(host(), port, protocol)))
            }
            HandlerKind::Buffered => {
                let mut buffered = Buffered::new(Stdout);
                if let Some(capacity) = options.capacity {
                    buffered = buffered.capacity(capacity);
                }
                if let Some(level) = options.flush_level {
                    buffered = buffered.flush_level(level);
                }
                Ok(Box::new(buffered))
            }
            HandlerKind::Syslog => self.build_syslog(),
            HandlerKind::Webhook => self.build_webhook(),
            HandlerKind::Email => self.build_email(),
        }
    }

    #[cfg(feature = "append-syslog")]
    fn build_syslog(&self) -> Result<Box<dyn Append>, Error> {
        Ok(Box::new(self.build_syslog_appender()?))
    }

    /// Without `host`, `port` and `tcp`, syslog goes to UDP `localhost:514`; the local socket
    /// is used only when `local` is set.
    #[cfg(feature = "append-syslog")]
    fn build_syslog_appender(&self) -> Result<crate::append::Syslog, Error> {
        use crate::append::syslog;
        use crate::append::syslog::SyslogTarget;

        let options = &self.options;
        let target = if options.local {
            SyslogTarget::local()
        } else {
            let host = options.host.clone().unwrap_or_else(|| "localhost".to_string());
            let port = options.port.unwrap_or(syslog::DEFAULT_PORT);
            if options.tcp {
                SyslogTarget::tcp(host, port)
            } else {
                SyslogTarget::udp(host, port)
            }
        };

        let mut appender = syslog::Syslog::new(target);
        if let Some(facility) = &options.facility {
            appender = appender.facility(syslog::parse_facility(facility)?);
        }
        Ok(appender)
    }

    #[cfg(not(feature = "append-syslog"))]
    fn build_syslog(&self) -> Result<Box<dyn Append>, Error> {
        Err(disabled(self.kind, "append-syslog"))
    }

    #[cfg(feature = "append-webhook")]
    fn build_webhook(&self) -> Result<Box<dyn Append>, Error> {
        let url = self
            .options
            .url
            .as_ref()
            .ok_or_else(|| Error::invalid_configuration("webhook handler requires a url"))?;
        let webhook = crate::append::Webhook::new(url)?.get(self.options.get);
        Ok(Box::new(webhook))
    }

    #[cfg(not(feature = "append-webhook"))]
    fn build_webhook(&self) -> Result<Box<dyn Append>, Error> {
        Err(disabled(self.kind, "append-webhook"))
    }

    #[cfg(feature = "append-email")]
    fn build_email(&self) -> Result<Box<dyn Append>, Error> {
        let options = &self.options;
        let host = options.host.clone().unwrap_or_else(|| "localhost".to_string());
        let mut builder = crate::append::Email::builder(host);
        if let Some(port) = options.port {
            builder = builder.port(port);
        }
        if let Some(subject) = &options.subject {
            builder = builder.subject(subject);
        }
        if let Some(sender) = &options.sender {
            builder = builder.sender(sender);
        }
        for recipient in &options.recipients {
            builder = builder.recipient(recipient);
        }
        if let (Some(username), Some(password)) = (&options.username, &options.password) {
            builder = builder.credentials(username, password);
        }
        if let Some(starttls) = options.starttls {
            builder = builder.starttls(starttls);
        }
        Ok(Box::new(builder.build()?))
    }

    #[cfg(not(feature = "append-email"))]
    fn build_email(&self) -> Result<Box<dyn Append>, Error> {
        Err(disabled(self.kind, "append-email"))
    }
}

#[allow(dead_code)]
fn disabled(kind: HandlerKind, feature: &'static str) -> Error {
    Error::invalid_configuration("handler is not compiled in")
        .with_context("handler", kind)
        .with_context("feature", feature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_handler_names() {
        for kind in HandlerKind::ALL {
            assert_eq!(kind.name().parse::<HandlerKind>().unwrap(), kind);
        }
        let err = "carrier-pigeon".parse::<HandlerKind>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn test_missing_required_options() {
        for kind in [HandlerKind::File, HandlerKind::Webhook] {
            let err = HandlerConfig::new(kind).build().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidConfiguration, "{kind}");
        }
    }

    #[test]
    fn test_deserialize() {
        let config: HandlerConfig = serde_json::from_str(
            r#"{"kind": "buffered", "capacity": 10, "flush_level": "warn"}"#,
        )
        .unwrap();
        assert_eq!(config.kind, HandlerKind::Buffered);
        assert_eq!(config.options.capacity, Some(10));
        assert_eq!(config.options.flush_level, Some(Level::Warning));
        assert!(config.build().is_ok());
    }

    #[cfg(feature = "append-syslog")]
    #[test]
    fn test_syslog_targets() {
        use crate::append::syslog::SyslogTarget;

        let target = |options: HandlerOptions| {
            let config = HandlerConfig::new(HandlerKind::Syslog).with_options(options);
            let appender = config.build_syslog_appender().unwrap();
            appender.target().clone()
        };

        assert_eq!(
            target(HandlerOptions::default()),
            SyslogTarget::udp("localhost", 514)
        );
        assert_eq!(
            target(HandlerOptions {
                host: Some("logs.example.com".to_string()),
                tcp: true,
                ..HandlerOptions::default()
            }),
            SyslogTarget::tcp("logs.example.com", 514)
        );
        assert_eq!(
            target(HandlerOptions {
                local: true,
                ..HandlerOptions::default()
            }),
            SyslogTarget::local()
        );
    }

    #[test]
    fn test_build_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let options = HandlerOptions {
            filename: Some(temp_dir.path().join("app.log")),
            ..HandlerOptions::default()
        };
        let config = HandlerConfig::new(HandlerKind::File).with_options(options);
        assert!(config.build().is_ok());
    }
}
