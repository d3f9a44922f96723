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

use std::fs;
use std::sync::Arc;

use gogo::Gogo;
use gogo::append::FileBuilder;
use gogo::append::FileMode;
use gogo::append::HandlerConfig;
use gogo::append::HandlerKind;
use gogo::append::HandlerOptions;
use gogo::layout::Format;
use gogo::registry::Registry;
use tempfile::TempDir;

#[test]
fn test_loggers_append_to_one_file() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let path = temp_dir.path().join("logs").join("app.log");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "stale\n").unwrap();

    let file = FileBuilder::new(&path)
        .mode(FileMode::Truncate)
        .build()
        .unwrap();
    let gogo = Gogo::builder("file")
        .registry(Arc::new(Registry::new()))
        .low_append(file)
        .low_format(Format::Csv)
        .build()
        .unwrap();

    gogo.get_logger("a").unwrap().info("from a").unwrap();
    gogo.get_logger("b").unwrap().info("from b").unwrap();
    gogo.get_logger("a").unwrap().flush().unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 2, "{content}");
    assert!(lines[0].ends_with(r#""file.a","INFO","from a""#), "{content}");
    assert!(lines[1].ends_with(r#""file.b","INFO","from b""#), "{content}");
}

#[test]
fn test_handler_config_from_json() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let path = temp_dir.path().join("configured.log");
    let json = serde_json::json!({
        "kind": "file",
        "filename": path,
        "delay": true,
    });

    let config: HandlerConfig = serde_json::from_value(json).unwrap();
    assert_eq!(config.kind, HandlerKind::File);
    assert_eq!(
        config.options,
        HandlerOptions {
            filename: Some(path.clone()),
            delay: true,
            ..HandlerOptions::default()
        }
    );

    let gogo = Gogo::builder("configured")
        .registry(Arc::new(Registry::new()))
        .high_append(config.build().unwrap())
        .build()
        .unwrap();
    assert!(!path.exists());

    gogo.logger().unwrap().error("written").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "written\n");
}
