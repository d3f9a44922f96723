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

use gogo::Gogo;
use gogo::Level;
use gogo::append::Memory;
use gogo::kv::Fields;
use gogo::registry::Registry;
use serde_json::Map;
use serde_json::Value;

fn parse(line: &str) -> Map<String, Value> {
    serde_json::from_str(line).unwrap()
}

#[test]
fn test_bound_context_and_metadata() {
    let low = Memory::new();
    let gogo = Gogo::builder("structured")
        .registry(Arc::new(Registry::new()))
        .low_append(low.clone())
        .build()
        .unwrap();

    let logger = gogo
        .get_structured_logger(None, Fields::new().with("connid", "1234"))
        .unwrap();
    logger.info("log message").unwrap();

    let lines = low.lines();
    assert_eq!(lines.len(), 1);
    let line = parse(&lines[0]);

    let mut keys = line.keys().map(String::as_str).collect::<Vec<_>>();
    keys.sort();
    assert_eq!(keys, ["connid", "level", "message", "name", "time"]);
    assert_eq!(line["connid"], "1234");
    assert_eq!(line["message"], "log message");
    assert_eq!(line["level"], "INFO");
    assert!(
        line["name"]
            .as_str()
            .unwrap()
            .starts_with("structured.structured.")
    );
}

#[test]
fn test_structured_records_follow_the_router() {
    let (high, low) = (Memory::new(), Memory::new());
    let gogo = Gogo::builder("routed")
        .registry(Arc::new(Registry::new()))
        .monolog(true)
        .high_append(high.clone())
        .low_append(low.clone())
        .build()
        .unwrap();

    let logger = gogo
        .get_structured_logger(Some("conn"), Fields::new().with("connid", "1234"))
        .unwrap();
    logger.debug("low").unwrap();
    logger
        .log_with(Level::Error, "high", &Fields::new().with("attempt", 3))
        .unwrap();

    assert_eq!(parse(&low.lines()[0])["message"], "low");
    assert_eq!(high.lines().len(), 1);
    let line = parse(&high.lines()[0]);
    assert_eq!(line["message"], "high");
    assert_eq!(line["attempt"], 3);
    assert_eq!(line["name"], "routed.structured.conn");
}

#[test]
fn test_plain_loggers_are_unaffected() {
    let low = Memory::new();
    let gogo = Gogo::builder("mixed")
        .registry(Arc::new(Registry::new()))
        .low_append(low.clone())
        .build()
        .unwrap();

    gogo.get_structured_logger(Some("s"), Fields::new())
        .unwrap()
        .info("structured")
        .unwrap();
    gogo.logger().unwrap().info("plain").unwrap();

    let lines = low.lines();
    assert!(lines[0].starts_with('{'));
    assert_eq!(lines[1], "plain");
}
