// SPDX-FileCopyrightText: 2024 Panthyr contributors
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A command line tool to set up, switch and report the outputs of the
//! Panthyr power-control board.

use clap::Parser;
use std::process::ExitCode;

mod common;
mod interactive;
mod outputs;
mod status;

fn main() -> ExitCode {
    let opts = match outputs::Opts::try_parse() {
        Ok(opts) => opts,
        Err(e) => e.exit(),
    };
    common::init_logger(opts.verbose);
    if outputs::cmd(&opts) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
