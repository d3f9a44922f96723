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
use crate::kv::Fields;
use crate::layout::Layout;
use crate::layout::asctime;
use crate::record::Record;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A layout driven by a `{placeholder}` template.
///
/// The placeholders `message`, `name`, `level`, `time` and `msecs` render the record
/// metadata; any other placeholder renders the record field with that key, so a logger with
/// bound context can print it. Use `{{` and `}}` for literal braces.
///
/// # Examples
///
/// ```
/// use gogo::layout::TemplateLayout;
///
/// let layout = TemplateLayout::new("IP: {ip} - {message}").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct TemplateLayout {
    segments: Vec<Segment>,
}

impl TemplateLayout {
    /// Parse a template.
    ///
    /// # Errors
    ///
    /// Returns an error if a brace is unbalanced or a placeholder is empty.
    pub fn new(template: &str) -> Result<Self, Error> {
        let invalid = |reason: &str| {
            Error::invalid_configuration(format!("invalid template: {reason}"))
                .with_context("template", template)
        };

        let mut segments = vec![];
        let mut literal = String::new();
        let mut chars = template.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut key = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some('{') | None => return Err(invalid("unclosed placeholder")),
                            Some(c) => key.push(c),
                        }
                    }
                    let key = key.trim();
                    if key.is_empty() {
                        return Err(invalid("empty placeholder"));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(key.to_string()));
                }
                '}' => return Err(invalid("unmatched '}'")),
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }
}

impl Layout for TemplateLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let mut text = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => text.push_str(s),
                Segment::Placeholder(key) => match key.as_str() {
                    "message" => text.push_str(record.message()),
                    "name" => text.push_str(record.name()),
                    "level" => text.push_str(record.level().as_str()),
                    "time" => text.push_str(&asctime(record)),
                    "msecs" => text.push_str(&record.msecs().to_string()),
                    key => {
                        let value = record.fields().get(key).ok_or_else(|| {
                            Error::unexpected("record has no value for placeholder")
                                .with_context("placeholder", key)
                                .with_context("name", record.name())
                        })?;
                        text.push_str(&Fields::display_value(value));
                    }
                },
            }
        }
        Ok(text.into_bytes())
    }
}
