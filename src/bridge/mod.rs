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

//! Bridge the [`log`] crate facade to a [`Logger`](crate::Logger).
//!
//! # Examples
//!
//! ```
//! let gogo = gogo::Gogo::new("app").unwrap();
//! gogo::bridge::LogBridge::new(gogo.logger().unwrap()).apply();
//!
//! log::info!("This is an info message.");
//! ```

pub use self::env::EnvFilter;
pub use self::log::LogBridge;

mod env;
mod log;
