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

//! `gogo [options] <message>`: log a message through a low pass and a high pass handler.

mod cli;

use std::io::Read;
use std::process::ExitCode;

use clap::Parser;
use gogo::Error;
use gogo::Gogo;

use crate::cli::Cli;
use crate::cli::Pass;

fn read_message(cli: &Cli) -> Result<String, Error> {
    if let Some(message) = &cli.message {
        return Ok(message.clone());
    }

    let mut message = String::new();
    std::io::stdin()
        .read_to_string(&mut message)
        .map_err(|err| Error::unexpected("failed to read message from stdin").with_source(err))?;
    if message.ends_with('\n') {
        message.pop();
        if message.ends_with('\r') {
            message.pop();
        }
    }
    Ok(message)
}

fn run(cli: Cli) -> Result<(), Error> {
    if cli.version {
        let logger = Gogo::new("gogo")?.get_logger("run")?;
        return logger.info(format!("gogo v{}", env!("CARGO_PKG_VERSION")));
    }

    let gogo = Gogo::builder(cli.logger_name())
        .high_level(cli.high_level)
        .low_level(cli.effective_low_level())
        .monolog(cli.monolog)
        .high_format(cli.high_format)
        .low_format(cli.low_format)
        .high_append(cli.handler(Pass::High).build()?)
        .low_append(cli.handler(Pass::Low).build()?)
        .build()?;

    let logger = gogo.get_logger("runner")?;
    let message = read_message(&cli)?;
    logger.log(cli.level, message)?;
    logger.flush()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("gogo: {err}");
            ExitCode::FAILURE
        }
    }
}
