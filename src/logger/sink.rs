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

use crate::Append;
use crate::Error;
use crate::Filter;
use crate::Layout;
use crate::filter::FilterResult;
use crate::record::Metadata;
use crate::record::Record;

/// A grouped set of filters, a layout and an appender.
///
/// `filters` decide whether a record is delivered. The layout formats accepted records and
/// the appender delivers the formatted bytes.
#[derive(Debug)]
pub struct Sink {
    filters: Vec<Box<dyn Filter>>,
    layout: Arc<dyn Layout>,
    append: Box<dyn Append>,
}

impl Sink {
    /// Create a sink without filters.
    pub fn new(append: impl Into<Box<dyn Append>>, layout: impl Into<Box<dyn Layout>>) -> Self {
        let layout: Box<dyn Layout> = layout.into();
        Self::with_shared_layout(append, Arc::from(layout))
    }

    /// Create a sink without filters, sharing a layout with other sinks.
    pub fn with_shared_layout(append: impl Into<Box<dyn Append>>, layout: Arc<dyn Layout>) -> Self {
        Self {
            filters: vec![],
            layout,
            append: append.into(),
        }
    }

    /// Add a filter. Filters run in the order they were added.
    pub fn filter(mut self, filter: impl Into<Box<dyn Filter>>) -> Self {
        self.filters.push(filter.into());
        self
    }

    pub fn layout(&self) -> &Arc<dyn Layout> {
        &self.layout
    }

    pub fn append(&self) -> &dyn Append {
        self.append.as_ref()
    }

    /// Whether a record with the given metadata would be delivered.
    pub fn accepts(&self, metadata: &Metadata) -> bool {
        for filter in &self.filters {
            match filter.enabled(metadata) {
                FilterResult::Reject => return false,
                FilterResult::Accept => return true,
                FilterResult::Neutral => {}
            }
        }

        true
    }

    /// Format and deliver a record if the filters let it through.
    ///
    /// Returns whether the record was delivered.
    pub fn emit(&self, record: &Record) -> Result<bool, Error> {
        for filter in &self.filters {
            match filter.matches(record) {
                FilterResult::Reject => return Ok(false),
                FilterResult::Accept => break,
                FilterResult::Neutral => {}
            }
        }

        let formatted = self.layout.format(record)?;
        self.append.append(record, &formatted)?;
        Ok(true)
    }

    pub fn flush(&self) -> Result<(), Error> {
        self.append.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Level;
    use crate::append::Memory;
    use crate::filter::CustomFilter;
    use crate::filter::MinLevel;
    use crate::layout::BasicLayout;

    #[test]
    fn test_filters_run_in_order() {
        let memory = Memory::new();
        let sink = Sink::new(memory.clone(), BasicLayout)
            .filter(CustomFilter::new(|metadata: &Metadata| {
                if metadata.name() == "audit" {
                    FilterResult::Accept
                } else {
                    FilterResult::Neutral
                }
            }))
            .filter(MinLevel(Level::Error));

        assert!(sink.accepts(&Metadata::new("audit", Level::Debug)));
        assert!(!sink.accepts(&Metadata::new("app", Level::Debug)));

        assert!(sink.emit(&Record::new("audit", Level::Debug, "kept")).unwrap());
        assert!(!sink.emit(&Record::new("app", Level::Debug, "dropped")).unwrap());
        assert!(sink.emit(&Record::new("app", Level::Error, "kept too")).unwrap());
        assert_eq!(memory.lines(), ["kept", "kept too"]);
    }
}
