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

use std::time::Duration;

use reqwest::blocking::Client;

use crate::Error;
use crate::append::Append;
use crate::kv::Fields;
use crate::layout::asctime;
use crate::record::Record;

/// An appender that posts log records to an HTTP endpoint.
///
/// Each record becomes one urlencoded request carrying `name`, `level`, `time`, `message` (the
/// formatted record) and every field of the record: a form body for `POST`, a query string
/// for `GET`. Non-success responses are delivery errors.
///
/// Duplicates build their own client for the same url.
#[derive(Debug)]
pub struct Webhook {
    url: String,
    get: bool,
    client: Client,
}

impl Webhook {
    /// Post records to `url`.
    pub fn new(url: impl Into<String>) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|err| Error::invalid_configuration("failed to build http client").with_source(err))?;
        Ok(Self {
            url: url.into(),
            get: false,
            client,
        })
    }

    /// Send records as the query string of a `GET` request instead.
    pub fn get(mut self, get: bool) -> Self {
        self.get = get;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn params(record: &Record, formatted: &[u8]) -> Vec<(String, String)> {
        let time = format!("{}.{:03}", asctime(record), record.msecs());
        let mut params = vec![
            ("name".to_string(), record.name().to_string()),
            ("level".to_string(), record.level().as_str().to_string()),
            ("time".to_string(), time),
            (
                "message".to_string(),
                String::from_utf8_lossy(formatted).into_owned(),
            ),
        ];
        params.extend(
            record
                .fields()
                .iter()
                .map(|(k, v)| (k.clone(), Fields::display_value(v))),
        );
        params
    }
}

impl Append for Webhook {
    fn append(&self, record: &Record, formatted: &[u8]) -> Result<(), Error> {
        let params = Self::params(record, formatted);
        let request = if self.get {
            self.client.get(&self.url).query(&params)
        } else {
            self.client.post(&self.url).form(&params)
        };

        request
            .send()
            .and_then(|response| response.error_for_status())
            .map(|_| ())
            .map_err(|err| {
                Error::delivery("failed to deliver log record to webhook")
                    .with_context("url", &self.url)
                    .with_source(err)
            })
    }

    fn duplicate(&self) -> Result<Box<dyn Append>, Error> {
        Ok(Box::new(Webhook::new(&self.url)?.get(self.get)))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;
    use std::io::Write;
    use std::net::TcpListener;
    use std::thread;

    use super::*;
    use crate::Level;

    fn serve_once(listener: TcpListener) -> thread::JoinHandle<String> {
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = vec![];
            let mut buf = [0u8; 4096];
            loop {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text
                        .lines()
                        .find_map(|line| {
                            let (k, v) = line.split_once(':')?;
                            k.eq_ignore_ascii_case("content-length")
                                .then(|| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length {
                        break;
                    }
                }
            }
            stream
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
                .unwrap();
            String::from_utf8(request).unwrap()
        })
    }

    #[test]
    fn test_post_form() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/log", listener.local_addr().unwrap());
        let server = serve_once(listener);

        let record = Record::new("app.base", Level::Error, "ignored")
            .with_fields(Fields::new().with("user", "fred"));
        let webhook = Webhook::new(url).unwrap();
        webhook.append(&record, b"disk full").unwrap();

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /log"), "{request}");
        assert!(request.contains("name=app.base"), "{request}");
        assert!(request.contains("level=ERROR"), "{request}");
        assert!(request.contains("message=disk+full"), "{request}");
        assert!(request.contains("user=fred"), "{request}");
    }

    #[test]
    fn test_get_query() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/log", listener.local_addr().unwrap());
        let server = serve_once(listener);

        let record = Record::new("app.base", Level::Info, "ignored");
        let webhook = Webhook::new(url).unwrap().get(true);
        webhook.duplicate().unwrap().append(&record, b"hello").unwrap();

        let request = server.join().unwrap();
        assert!(request.starts_with("GET /log?name=app.base"), "{request}");
        assert!(request.contains("message=hello"), "{request}");
    }
}
