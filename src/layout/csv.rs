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

use crate::Error;
use crate::layout::Layout;
use crate::layout::asctime;
use crate::record::Record;

/// A comma separated values layout. Every column is quoted; quotes inside a column are
/// doubled.
///
/// Output format:
///
/// ```text
/// "2024-08-11 22:44:57.172","csv.base","DEBUG","hello ""world"""
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvLayout;

fn quote(column: &str) -> String {
    format!("\"{}\"", column.replace('"', "\"\""))
}

impl Layout for CsvLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let time = format!("{}.{}", asctime(record), record.msecs());
        let columns = [
            quote(&time),
            quote(record.name()),
            quote(record.level().as_str()),
            quote(record.message()),
        ];
        Ok(columns.join(",").into_bytes())
    }
}
