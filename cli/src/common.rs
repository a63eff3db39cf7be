// SPDX-FileCopyrightText: 2024 Panthyr contributors
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use clap::Parser;

// common helper functions

/// Start logging to stderr.
///
/// The level defaults to warn, and is raised by each -v, but RUST_LOG takes
/// precedence if set.
pub fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

pub fn format_error(e: &anyhow::Error) -> String {
    format!("{e:#}")
}

pub fn join_numbers(numbers: &[usize]) -> String {
    let numbers: Vec<String> = numbers.iter().map(usize::to_string).collect();
    numbers.join(", ")
}

// common command line parser options

#[derive(Clone, Copy, Debug, Default, Parser)]
pub struct EmitOpts {
    /// Emit output in JSON format
    #[cfg(feature = "json")]
    #[arg(long, group = "emit")]
    pub json: bool,

    /// Display output values as '1' (high), '0' (low) or '-' (unknown)
    #[arg(long, group = "emit")]
    pub numeric: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join() {
        assert_eq!(join_numbers(&[]), "");
        assert_eq!(join_numbers(&[3]), "3");
        assert_eq!(join_numbers(&[1, 2, 6]), "1, 2, 6");
    }

    #[test]
    fn error_chain() {
        use anyhow::Context;

        let e: anyhow::Result<()> = Err(panthyr_gpio::Error::OutOfRange {
            number: 7,
            count: 6,
        })
        .context("unable to set output 7 high");
        assert_eq!(
            format_error(&e.unwrap_err()),
            "unable to set output 7 high: output 7 is out of range, must be 1-6"
        );
    }
}
