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

use std::path::PathBuf;

use clap::ArgAction;
use clap::Parser;
use gogo::Error;
use gogo::Level;
use gogo::append::HandlerConfig;
use gogo::append::HandlerKind;
use gogo::append::HandlerOptions;
use gogo::layout::Format;

/// The directory name `gogo` runs in.
pub fn current_dir_name() -> String {
    std::env::current_dir()
        .ok()
        .and_then(|dir| dir.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "gogo".to_string())
}

/// Parse a handler name, rejecting `memory`: nothing can read its buffer once the process
/// exits.
fn parse_handler(name: &str) -> Result<HandlerKind, Error> {
    match name.parse::<HandlerKind>()? {
        HandlerKind::Memory => Err(Error::invalid_configuration(
            "the memory handler is not available from the command line",
        )),
        kind => Ok(kind),
    }
}

#[derive(Parser, Debug)]
#[command(name = "gogo")]
#[command(about = "Logs a given message", long_about = None)]
#[command(override_usage = "gogo [options] <message>")]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// The message to log (default: reads from stdin)
    pub message: Option<String>,

    /// The level to log the message
    #[arg(short, long, value_name = "LEVEL", default_value = "info")]
    pub level: Level,

    /// The logger name (default: the current directory name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// The high pass log handler
    #[arg(
        short = 'D',
        long,
        value_name = "HANDLER",
        default_value = "stderr",
        value_parser = parse_handler
    )]
    pub high_hdlr: HandlerKind,

    /// The low pass log handler
    #[arg(
        short = 'd',
        long,
        value_name = "HANDLER",
        default_value = "stdout",
        value_parser = parse_handler
    )]
    pub low_hdlr: HandlerKind,

    /// Min level to log to the high pass handler
    #[arg(short = 'L', long, value_name = "LEVEL", default_value = "warning")]
    pub high_level: Level,

    /// Min level to log to the low pass handler
    #[arg(short = 'e', long, value_name = "LEVEL", default_value = "debug")]
    pub low_level: Level,

    /// High pass handler log format
    #[arg(short = 'F', long, value_name = "FORMAT", default_value = "basic")]
    pub high_format: Format,

    /// Low pass handler log format
    #[arg(short = 'o', long, value_name = "FORMAT", default_value = "basic")]
    pub low_format: Format,

    /// Log high level events only to high pass handler
    #[arg(short, long)]
    pub monolog: bool,

    /// The filename to log to (default: <current dir>.log). Used by: file
    #[arg(short, long, action = ArgAction::Append)]
    pub filename: Vec<PathBuf>,

    /// The log subject (default: You've got mail). Used by: email
    #[arg(short, long, action = ArgAction::Append)]
    pub subject: Vec<String>,

    /// The log url. Required by: webhook
    #[arg(short, long, action = ArgAction::Append)]
    pub url: Vec<String>,

    /// The host (default: localhost). Used by: socket, syslog, email
    #[arg(short = 'H', long, action = ArgAction::Append)]
    pub host: Vec<String>,

    /// The port number (default: the handler's well-known port). Used by: socket, syslog, email
    #[arg(short, long, value_name = "NUM", action = ArgAction::Append)]
    pub port: Vec<u16>,

    /// Use TCP instead of UDP; once for the high pass handler, twice for both. Used by: socket, syslog
    #[arg(short, long, action = ArgAction::Count)]
    pub tcp: u8,

    /// Use a GET request instead of POST; once for the high pass handler, twice for both. Used by: webhook
    #[arg(short, long, action = ArgAction::Count)]
    pub get: u8,

    /// Show version and exit
    #[arg(short = 'v', long)]
    pub version: bool,

    /// Increase output verbosity: log everything from debug up to the low pass handler
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

/// Which handler a repeatable option value feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    High,
    Low,
}

impl Pass {
    /// The high pass handler takes the first value of a repeated option, the low pass
    /// handler the last.
    fn pick<T: Clone>(self, values: &[T]) -> Option<T> {
        match self {
            Pass::High => values.first().cloned(),
            Pass::Low => values.last().cloned(),
        }
    }

    /// The high pass handler needs a counted flag once, the low pass handler twice.
    fn counted(self, count: u8) -> bool {
        match self {
            Pass::High => count >= 1,
            Pass::Low => count >= 2,
        }
    }
}

impl Cli {
    pub fn logger_name(&self) -> String {
        self.name.clone().unwrap_or_else(current_dir_name)
    }

    /// The effective low level: `--verbose` forces `debug`.
    pub fn effective_low_level(&self) -> Level {
        if self.verbose {
            Level::Debug
        } else {
            self.low_level
        }
    }

    /// The handler configuration for one pass.
    pub fn handler(&self, pass: Pass) -> HandlerConfig {
        let kind = match pass {
            Pass::High => self.high_hdlr,
            Pass::Low => self.low_hdlr,
        };
        let filename = pass
            .pick(&self.filename)
            .unwrap_or_else(|| PathBuf::from(format!("{}.log", current_dir_name())));

        let options = HandlerOptions {
            filename: Some(filename),
            subject: pass.pick(&self.subject),
            url: pass.pick(&self.url),
            host: pass.pick(&self.host),
            port: pass.pick(&self.port),
            tcp: pass.counted(self.tcp),
            get: pass.counted(self.get),
            ..HandlerOptions::default()
        };
        HandlerConfig::new(kind).with_options(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["gogo", "hello"]);
        assert_eq!(cli.message.as_deref(), Some("hello"));
        assert_eq!(cli.level, Level::Info);
        assert_eq!(cli.high_hdlr, HandlerKind::Stderr);
        assert_eq!(cli.low_hdlr, HandlerKind::Stdout);
        assert_eq!(cli.high_level, Level::Warning);
        assert_eq!(cli.effective_low_level(), Level::Debug);
        assert_eq!(cli.low_format, Format::Basic);

        let high = cli.handler(Pass::High);
        assert_eq!(high.options.host, None);
        assert!(high.options.filename.unwrap().to_string_lossy().ends_with(".log"));
    }

    #[test]
    fn test_repeated_and_counted_options() {
        let cli = Cli::parse_from([
            "gogo", "-H", "high.example", "-H", "low.example", "-p", "9000", "-t", "-g", "-g",
            "hello",
        ]);

        let high = cli.handler(Pass::High);
        let low = cli.handler(Pass::Low);
        assert_eq!(high.options.host.as_deref(), Some("high.example"));
        assert_eq!(low.options.host.as_deref(), Some("low.example"));
        assert_eq!(high.options.port, Some(9000));
        assert_eq!(low.options.port, Some(9000));
        assert!(high.options.tcp);
        assert!(!low.options.tcp);
        assert!(high.options.get);
        assert!(low.options.get);
    }

    #[test]
    fn test_names_are_parsed() {
        let cli = Cli::parse_from([
            "gogo", "-l", "ERROR", "-D", "file", "-F", "json", "-V", "-e", "error", "-m",
        ]);
        assert_eq!(cli.level, Level::Error);
        assert_eq!(cli.high_hdlr, HandlerKind::File);
        assert_eq!(cli.high_format, Format::Json);
        assert_eq!(cli.effective_low_level(), Level::Debug);
        assert!(cli.monolog);
        assert!(cli.message.is_none());

        assert!(Cli::try_parse_from(["gogo", "-l", "verbose"]).is_err());
    }

    #[test]
    fn test_memory_handler_is_rejected() {
        assert!(Cli::try_parse_from(["gogo", "-D", "memory", "hi"]).is_err());
        assert!(Cli::try_parse_from(["gogo", "-d", "memory", "hi"]).is_err());

        let cli = Cli::try_parse_from(["gogo", "-d", "buffered", "hi"]).unwrap();
        assert_eq!(cli.low_hdlr, HandlerKind::Buffered);
    }
}
