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

/// A fixed width layout.
///
/// Output format:
///
/// ```text
/// 2024-08-11 22:44:57.172 myapp        INFO     Jackdaws love my big sphinx of quartz.
/// 2024-08-11 22:44:57.9   myapp.area1  DEBUG    Quick zephyrs blow, vexing daft Jim.
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLayout;

impl Layout for FixedLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let time = asctime(record);
        let msecs = record.msecs();
        let name = record.name();
        let level = record.level();
        let message = record.message();
        Ok(format!("{time}.{msecs:<3} {name:<12} {level:<8} {message}").into_bytes())
    }
}
