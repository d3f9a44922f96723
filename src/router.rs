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

//! The dual-threshold routing policy.

use crate::Error;
use crate::Level;
use crate::filter::BelowLevel;
use crate::filter::MinLevel;
use crate::logger::Sink;

/// Which of the two sinks receive a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Route {
    pub low: bool,
    pub high: bool,
}

impl Route {
    pub const NOWHERE: Route = Route {
        low: false,
        high: false,
    };
    pub const LOW: Route = Route {
        low: true,
        high: false,
    };
    pub const HIGH: Route = Route {
        low: false,
        high: true,
    };
    pub const BOTH: Route = Route {
        low: true,
        high: true,
    };

    pub fn is_dropped(&self) -> bool {
        !self.low && !self.high
    }
}

/// Decides, by severity, whether a record goes to the low sink, the high sink or both.
///
/// | record level                            | delivered to     |
/// |-----------------------------------------|------------------|
/// | below `low_level`                       | nowhere          |
/// | from `low_level` up to `high_level`     | low sink         |
/// | `high_level` or above                   | both sinks       |
/// | `high_level` or above, with `monolog`   | high sink        |
///
/// The router holds no sinks itself. It is applied by wiring level filters onto the two
/// sinks, see [`Router::wire_low`] and [`Router::wire_high`].
///
/// ```
/// use gogo::Level;
/// use gogo::router::Route;
/// use gogo::router::Router;
///
/// let router = Router::new(Level::Info, Level::Warning, true).unwrap();
/// assert_eq!(router.route(Level::Debug), Route::NOWHERE);
/// assert_eq!(router.route(Level::Info), Route::LOW);
/// assert_eq!(router.route(Level::Error), Route::HIGH);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Router {
    low_level: Level,
    high_level: Level,
    monolog: bool,
}

impl Default for Router {
    /// Low `debug`, high `warning`, no monolog.
    fn default() -> Self {
        Self {
            low_level: Level::Debug,
            high_level: Level::Warning,
            monolog: false,
        }
    }
}

impl Router {
    /// Create a router.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidConfiguration`](crate::ErrorKind::InvalidConfiguration) error if
    /// `high_level` is less severe than `low_level`.
    pub fn new(low_level: Level, high_level: Level, monolog: bool) -> Result<Self, Error> {
        if high_level < low_level {
            return Err(
                Error::invalid_configuration("high_level must be >= low_level")
                    .with_context("low_level", low_level)
                    .with_context("high_level", high_level),
            );
        }

        Ok(Self {
            low_level,
            high_level,
            monolog,
        })
    }

    pub fn low_level(&self) -> Level {
        self.low_level
    }

    pub fn high_level(&self) -> Level {
        self.high_level
    }

    pub fn monolog(&self) -> bool {
        self.monolog
    }

    /// The destinations of a record at `level`.
    pub fn route(&self, level: Level) -> Route {
        if level < self.low_level {
            Route::NOWHERE
        } else if level < self.high_level {
            Route::LOW
        } else if self.monolog {
            Route::HIGH
        } else {
            Route::BOTH
        }
    }

    /// Attach the low sink's filters: a gate at `low_level` and, with monolog, an exclusion
    /// of everything at `high_level` or above.
    pub fn wire_low(&self, sink: Sink) -> Sink {
        let sink = sink.filter(MinLevel(self.low_level));
        if self.monolog {
            sink.filter(BelowLevel(self.high_level))
        } else {
            sink
        }
    }

    /// Attach the high sink's filter: a gate at `high_level`.
    pub fn wire_high(&self, sink: Sink) -> Sink {
        sink.filter(MinLevel(self.high_level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::append::Memory;
    use crate::layout::BasicLayout;
    use crate::record::Metadata;

    #[test]
    fn test_construction_fails_iff_high_below_low() {
        for low in Level::ALL {
            for high in Level::ALL {
                let router = Router::new(low, high, false);
                if high < low {
                    let err = router.unwrap_err();
                    assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
                } else {
                    assert!(router.is_ok(), "{low} {high}");
                }
            }
        }
    }

    #[test]
    fn test_route_table() {
        let router = Router::new(Level::Info, Level::Warning, false).unwrap();
        assert_eq!(router.route(Level::Debug), Route::NOWHERE);
        assert_eq!(router.route(Level::Info), Route::LOW);
        assert_eq!(router.route(Level::Warning), Route::BOTH);
        assert_eq!(router.route(Level::Error), Route::BOTH);

        let router = Router::new(Level::Info, Level::Warning, true).unwrap();
        assert_eq!(router.route(Level::Debug), Route::NOWHERE);
        assert_eq!(router.route(Level::Info), Route::LOW);
        assert_eq!(router.route(Level::Warning), Route::HIGH);
        assert_eq!(router.route(Level::Critical), Route::HIGH);
    }

    #[test]
    fn test_equal_levels() {
        let router = Router::new(Level::Error, Level::Error, true).unwrap();
        assert!(router.route(Level::Warning).is_dropped());
        assert_eq!(router.route(Level::Error), Route::HIGH);
    }

    #[test]
    fn test_wired_sinks_agree_with_route() {
        for monolog in [false, true] {
            let router = Router::new(Level::Info, Level::Error, monolog).unwrap();
            let low = router.wire_low(Sink::new(Memory::new(), BasicLayout));
            let high = router.wire_high(Sink::new(Memory::new(), BasicLayout));

            for level in Level::ALL {
                let metadata = Metadata::new("app", level);
                let route = router.route(level);
                assert_eq!(low.accepts(&metadata), route.low, "{level} monolog={monolog}");
                assert_eq!(high.accepts(&metadata), route.high, "{level} monolog={monolog}");
            }
        }
    }
}
