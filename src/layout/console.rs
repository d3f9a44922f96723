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
use crate::color::LevelColor;
use crate::layout::Layout;
use crate::record::Record;

/// A layout for reading logs in a terminal.
///
/// Output format:
///
/// ```text
/// myapp.area1 : INFO     How quickly daft jumping zebras vex.
/// myapp.area2 : WARNING  Jail zesty vixen who grabbed pay.
/// ```
///
/// Levels are not colored unless [`ConsoleLayout::colored`] is set.
///
/// # Examples
///
/// ```
/// use gogo::color::LevelColor;
/// use gogo::layout::ConsoleLayout;
///
/// let layout = ConsoleLayout::default().colored(LevelColor::default());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConsoleLayout {
    colors: Option<LevelColor>,
}

impl ConsoleLayout {
    /// Color the level with the given colors.
    pub fn colored(mut self, colors: LevelColor) -> Self {
        self.colors = Some(colors);
        self
    }
}

impl Layout for ConsoleLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let name = record.name();
        let level = format!("{:<8}", record.level());
        let message = record.message();

        let text = match self.colors {
            Some(ref colors) => {
                let level = colors.colorize(record.level(), level);
                format!("{name:<12}: {level} {message}")
            }
            None => format!("{name:<12}: {level} {message}"),
        };
        Ok(text.into_bytes())
    }
}
