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

use lettre::Message;
use lettre::SmtpTransport;
use lettre::Transport;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;

use crate::Error;
use crate::append::Append;
use crate::record::Record;

/// The subject of every message unless configured otherwise.
pub const DEFAULT_SUBJECT: &str = "You've got mail";

/// The SMTP submission port.
pub const DEFAULT_PORT: u16 = 587;

/// The sender used when none is configured: `$USER@gmail.com`.
pub fn default_sender() -> String {
    let user = std::env::var("USER").unwrap_or_else(|_| "gogo".to_string());
    format!("{user}@gmail.com")
}

fn mailbox(address: &str) -> Result<Mailbox, Error> {
    address.parse::<Mailbox>().map_err(|err| {
        Error::invalid_configuration("invalid email address")
            .with_context("address", address)
            .with_source(err)
    })
}

/// A builder for configuring an [`Email`] appender.
#[derive(Clone)]
pub struct EmailBuilder {
    host: String,
    port: u16,
    subject: String,
    sender: Option<String>,
    recipients: Vec<String>,
    credentials: Option<(String, String)>,
    starttls: Option<bool>,
}

impl fmt::Debug for EmailBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailBuilder")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("subject", &self.subject)
            .field("sender", &self.sender)
            .field("recipients", &self.recipients)
            .field("starttls", &self.use_starttls())
            .finish_non_exhaustive()
    }
}

impl EmailBuilder {
    /// Set the SMTP port.
    ///
    /// Default to [`DEFAULT_PORT`].
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Set the sender address.
    ///
    /// Default to [`default_sender`].
    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Add a recipient. Without any, the message goes back to the sender.
    pub fn recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipients.push(recipient.into());
        self
    }

    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Upgrade the connection with `STARTTLS` before sending.
    ///
    /// Default to on when credentials are set and off otherwise.
    pub fn starttls(mut self, starttls: bool) -> Self {
        self.starttls = Some(starttls);
        self
    }

    fn use_starttls(&self) -> bool {
        self.starttls.unwrap_or(self.credentials.is_some())
    }

    /// Builds the [`Email`] appender.
    ///
    /// # Errors
    ///
    /// Returns an error if the sender or a recipient is not a valid email address.
    pub fn build(self) -> Result<Email, Error> {
        let sender = mailbox(&self.sender.clone().unwrap_or_else(default_sender))?;
        let mut recipients = self
            .recipients
            .iter()
            .map(|r| mailbox(r))
            .collect::<Result<Vec<_>, _>>()?;
        if recipients.is_empty() {
            recipients.push(sender.clone());
        }

        let transport = if self.use_starttls() {
            SmtpTransport::starttls_relay(&self.host).map_err(|err| {
                Error::invalid_configuration("failed to configure STARTTLS")
                    .with_context("host", &self.host)
                    .with_source(err)
            })?
        } else {
            SmtpTransport::builder_dangerous(&self.host)
        };
        let mut transport = transport.port(self.port);
        if let Some((username, password)) = &self.credentials {
            transport = transport.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Email {
            transport: transport.build(),
            sender,
            recipients,
            builder: self,
        })
    }
}

/// An appender that sends each log record as a plain text email.
///
/// Duplicates build their own SMTP transport with the same configuration.
pub struct Email {
    transport: SmtpTransport,
    sender: Mailbox,
    recipients: Vec<Mailbox>,
    builder: EmailBuilder,
}

impl fmt::Debug for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Email")
            .field("host", &self.builder.host)
            .field("port", &self.builder.port)
            .field("starttls", &self.builder.use_starttls())
            .field("sender", &self.sender)
            .field("recipients", &self.recipients)
            .finish_non_exhaustive()
    }
}

impl Email {
    /// Start configuring an appender that sends through the SMTP server at `host`.
    pub fn builder(host: impl Into<String>) -> EmailBuilder {
        EmailBuilder {
            host: host.into(),
            port: DEFAULT_PORT,
            subject: DEFAULT_SUBJECT.to_string(),
            sender: None,
            recipients: vec![],
            credentials: None,
            starttls: None,
        }
    }

    fn message(&self, formatted: &[u8]) -> Result<Message, Error> {
        let mut message = Message::builder().from(self.sender.clone());
        for recipient in &self.recipients {
            message = message.to(recipient.clone());
        }
        message
            .subject(&self.builder.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(String::from_utf8_lossy(formatted).into_owned())
            .map_err(|err| Error::unexpected("failed to build email").with_source(err))
    }
}

impl Append for Email {
    fn append(&self, _: &Record, formatted: &[u8]) -> Result<(), Error> {
        let message = self.message(formatted)?;
        self.transport.send(&message).map(|_| ()).map_err(|err| {
            Error::delivery("failed to send log record by email")
                .with_context("host", &self.builder.host)
                .with_context("port", self.builder.port)
                .with_source(err)
        })
    }

    fn duplicate(&self) -> Result<Box<dyn Append>, Error> {
        Ok(Box::new(self.builder.clone().build()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_message() {
        let email = Email::builder("localhost")
            .sender("app@example.com")
            .recipient("ops@example.com")
            .build()
            .unwrap();

        let message = email.message(b"disk full").unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("Subject: You've got mail"), "{formatted}");
        assert!(formatted.contains("To: ops@example.com"), "{formatted}");
        assert!(formatted.contains("disk full"), "{formatted}");
    }

    #[test]
    fn test_recipients_default_to_sender() {
        let email = Email::builder("localhost")
            .sender("app@example.com")
            .build()
            .unwrap();
        assert_eq!(email.recipients, [email.sender.clone()]);
    }

    #[test]
    fn test_starttls_follows_credentials() {
        let plain = Email::builder("localhost").build().unwrap();
        assert!(!plain.builder.use_starttls());

        let secured = Email::builder("smtp.example.com")
            .credentials("app", "secret")
            .build()
            .unwrap();
        assert!(secured.builder.use_starttls());
        let debug = format!("{secured:?}");
        assert!(debug.contains("starttls: true"), "{debug}");
        assert!(!debug.contains("secret"), "{debug}");

        let opted_out = Email::builder("localhost")
            .credentials("app", "secret")
            .starttls(false)
            .build()
            .unwrap();
        assert!(!opted_out.builder.use_starttls());

        let duplicate = secured.duplicate().unwrap();
        assert!(format!("{duplicate:?}").contains("starttls: true"));
    }

    #[test]
    fn test_invalid_address() {
        let err = Email::builder("localhost").sender("not an address").build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }
}
