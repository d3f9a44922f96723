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
use std::net::TcpStream;
use std::net::UdpSocket;
use std::sync::Mutex;

use crate::Error;
use crate::append::Append;
use crate::record::Record;

/// The transport of a [`Socket`] appender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Length prefixed frames over a stream connection.
    Tcp,
    /// One datagram per record.
    Udp,
}

impl Protocol {
    /// The port used when none is configured.
    pub fn default_port(self) -> u16 {
        match self {
            Protocol::Tcp => 9020,
            Protocol::Udp => 9021,
        }
    }
}

#[derive(Debug)]
enum Connection {
    Tcp(TcpStream),
    Udp(UdpSocket),
}

/// An appender that sends log records to a network socket.
///
/// TCP frames carry the formatted record preceded by its length as a 4-byte big-endian
/// integer. UDP datagrams carry the formatted record as is.
///
/// The connection is opened on the first record and re-opened after a failed send. Duplicates
/// connect to the same address on their own.
#[derive(Debug)]
pub struct Socket {
    host: String,
    port: u16,
    protocol: Protocol,
    connection: Mutex<Option<Connection>>,
}

impl Socket {
    /// Create a socket appender; nothing is connected until the first record.
    pub fn new(host: impl Into<String>, port: u16, protocol: Protocol) -> Self {
        Self {
            host: host.into(),
            port,
            protocol,
            connection: Mutex::new(None),
        }
    }

    /// A TCP appender to `host` on the default port 9020.
    pub fn tcp(host: impl Into<String>) -> Self {
        Self::new(host, Protocol::Tcp.default_port(), Protocol::Tcp)
    }

    /// A UDP appender to `host` on the default port 9021.
    pub fn udp(host: impl Into<String>) -> Self {
        Self::new(host, Protocol::Udp.default_port(), Protocol::Udp)
    }

    pub fn address(&self) -> (&str, u16) {
        (&self.host, self.port)
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    fn connect(&self) -> Result<Connection, Error> {
        let addr = (self.host.as_str(), self.port);
        let connection = match self.protocol {
            Protocol::Tcp => TcpStream::connect(addr).map(Connection::Tcp),
            Protocol::Udp => UdpSocket::bind(("0.0.0.0", 0))
                .and_then(|socket| socket.connect(addr).map(|()| socket))
                .map(Connection::Udp),
        };
        connection.map_err(|err| {
            Error::delivery("failed to connect log socket")
                .with_context("host", &self.host)
                .with_context("port", self.port)
                .with_source(err)
        })
    }
}

fn send(connection: &mut Connection, formatted: &[u8]) -> std::io::Result<()> {
    match connection {
        Connection::Tcp(stream) => {
            let len = u32::try_from(formatted.len())
                .map_err(|_| std::io::Error::other("log record too large for a frame"))?;
            let mut frame = Vec::with_capacity(formatted.len() + 4);
            frame.extend_from_slice(&len.to_be_bytes());
            frame.extend_from_slice(formatted);
            stream.write_all(&frame)
        }
        Connection::Udp(socket) => socket.send(formatted).map(|_| ()),
    }
}

impl Append for Socket {
    fn append(&self, _: &Record, formatted: &[u8]) -> Result<(), Error> {
        let mut connection = self.connection.lock().unwrap_or_else(|e| e.into_inner());
        let mut conn = match connection.take() {
            Some(conn) => conn,
            None => self.connect()?,
        };

        // a failed connection is dropped, the next record reconnects
        send(&mut conn, formatted).map_err(|err| {
            Error::from_io_error(err)
                .with_context("host", &self.host)
                .with_context("port", self.port)
        })?;
        *connection = Some(conn);
        Ok(())
    }

    fn flush(&self) -> Result<(), Error> {
        let mut connection = self.connection.lock().unwrap_or_else(|e| e.into_inner());
        match connection.as_mut() {
            Some(Connection::Tcp(stream)) => stream.flush().map_err(Error::from_io_error),
            _ => Ok(()),
        }
    }

    fn duplicate(&self) -> Result<Box<dyn Append>, Error> {
        Ok(Box::new(Socket::new(&self.host, self.port, self.protocol)))
    }
}
