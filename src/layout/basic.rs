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
use crate::record::Record;

/// A layout that renders the message only.
///
/// Output format:
///
/// ```text
/// Hello info!
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicLayout;

impl Layout for BasicLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        Ok(record.message().as_bytes().to_vec())
    }
}

/// A layout that renders the message preceded by a UTF-8 byte order mark.
///
/// Some log viewers rely on the mark to detect the encoding of a file.
#[derive(Debug, Clone, Copy, Default)]
pub struct BomLayout;

impl Layout for BomLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        Ok(format!("\u{feff}{}", record.message()).into_bytes())
    }
}
