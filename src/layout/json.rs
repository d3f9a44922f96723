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

use serde::Serialize;

use crate::Error;
use crate::layout::Layout;
use crate::layout::asctime;
use crate::record::Record;

/// A flat JSON layout with a fixed set of keys. Record fields are not rendered; use
/// [`StructuredLayout`](crate::layout::StructuredLayout) for those.
///
/// Output format:
///
/// ```json
/// {"time":"2024-08-11 22:44:57.172","name":"json.base","level":"DEBUG","message":"hello"}
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLayout;

#[derive(Debug, Serialize)]
struct RecordLine<'a> {
    time: String,
    name: &'a str,
    level: &'a str,
    message: &'a str,
}

impl Layout for JsonLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let line = RecordLine {
            time: format!("{}.{}", asctime(record), record.msecs()),
            name: record.name(),
            level: record.level().as_str(),
            message: record.message(),
        };

        serde_json::to_vec(&line)
            .map_err(|err| Error::unexpected("failed to serialize record").with_source(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Level;
    use crate::layout::tests::format;
    use crate::layout::tests::record;

    #[test]
    fn test_message_is_escaped() {
        let record = record("json.base", Level::Info, "say \"hi\"");
        let line: serde_json::Value =
            serde_json::from_str(&format(&JsonLayout, &record)).unwrap();
        assert_eq!(line["message"], "say \"hi\"");
        assert_eq!(line["level"], "INFO");
    }
}
