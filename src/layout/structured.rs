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

use serde_json::Map;
use serde_json::Value;

use crate::Error;
use crate::layout::Layout;
use crate::layout::asctime;
use crate::record::Record;

/// A structured JSON layout: the record fields and the reserved metadata `message`, `time`,
/// `level` and `name`, as one key-ordered object.
///
/// The metadata always wins over a field with the same key.
///
/// Output format:
///
/// ```json
/// {"connid":"1234","level":"INFO","message":"log message","name":"app.structured.conn","time":"2024-08-11 22:44:57.172"}
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredLayout;

impl StructuredLayout {
    /// Build the structured object for a record.
    pub fn to_value(record: &Record) -> Value {
        let mut object = Map::new();
        for (k, v) in record.fields() {
            object.insert(k.clone(), v.clone());
        }

        let time = format!("{}.{:03}", asctime(record), record.msecs());
        object.insert("message".to_string(), record.message().into());
        object.insert("time".to_string(), time.into());
        object.insert("level".to_string(), record.level().as_str().into());
        object.insert("name".to_string(), record.name().into());
        Value::Object(object)
    }
}

impl Layout for StructuredLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        serde_json::to_vec(&StructuredLayout::to_value(record))
            .map_err(|err| Error::unexpected("failed to serialize record").with_source(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Level;
    use crate::kv::Fields;
    use crate::layout::tests::format;
    use crate::layout::tests::record;

    #[test]
    fn test_metadata_wins() {
        let record = record("app", Level::Info, "real").with_fields(
            Fields::new()
                .with("message", "spoofed")
                .with("level", "NOPE")
                .with("key", "value"),
        );

        let value: Value = serde_json::from_str(&format(&StructuredLayout, &record)).unwrap();
        assert_eq!(value["message"], "real");
        assert_eq!(value["level"], "INFO");
        assert_eq!(value["key"], "value");
        assert_eq!(value.as_object().unwrap().len(), 5);
    }
}
