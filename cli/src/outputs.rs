// SPDX-FileCopyrightText: 2024 Panthyr contributors
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::common::{format_error, join_numbers, EmitOpts};
use crate::interactive;
use crate::status::{self, OutputValue};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{debug, info};
use panthyr_gpio::cdev::DEFAULT_CONSUMER;
use panthyr_gpio::line::Line;
use panthyr_gpio::{parse_outputs, Bank, Cdev, Mapping, Mode, Provider, Selection, Sim};
#[cfg(feature = "serde")]
use serde_derive::Serialize;

#[derive(Debug, Parser)]
#[command(
    name = "panthyr-gpio",
    version,
    about = "Set up, switch and report the outputs of the Panthyr power-control board.",
    after_help = "
Outputs are numbered 1 to 6.  By default they are driven by these lines:

    output  1     2     3     4    5    6
    line    3:19  3:18  2:12  2:6  0:8  0:9

where each line is identified by chip:offset, with chip N being /dev/gpiochipN.

Examples:
    panthyr-gpio --setup --high 1,2 --status
       Set outputs 1 and 2 high, all others low, and print the values.

    panthyr-gpio --setup -H 3 -L 3
       Set output 3 low, as low takes precedence.

    panthyr-gpio --setup -i --off-on-exit
       Switch outputs interactively, and switch them all off when done."
)]
pub struct Opts {
    /// Set up the lines for all outputs as outputs
    ///
    /// Outputs not also set high are driven low.
    /// Without this the lines are claimed as they are, so the outputs
    /// cannot be set, though their values can still be read.
    #[arg(long)]
    pub setup: bool,

    /// Print the value of every output
    #[arg(long)]
    pub status: bool,

    /// The outputs to set high
    ///
    /// May be repeated, and each may be a comma delimited list, e.g.
    ///     -H 1 -H 3,4
    #[arg(
        short = 'H',
        long,
        value_name = "outputs",
        allow_hyphen_values = true,
        verbatim_doc_comment
    )]
    pub high: Vec<String>,

    /// The outputs to set low
    ///
    /// Takes precedence over --high.
    /// May be repeated, and each may be a comma delimited list.
    #[arg(short = 'L', long, value_name = "outputs", allow_hyphen_values = true)]
    pub low: Vec<String>,

    /// The lines driving outputs 1 to 6, as a comma delimited list of chip:offset
    #[arg(long, value_name = "lines", env = "PANTHYR_GPIO_MAPPING")]
    pub mapping: Option<Mapping>,

    /// The consumer label applied to the claimed lines
    #[arg(
        long,
        value_name = "label",
        env = "PANTHYR_GPIO_CONSUMER",
        default_value = DEFAULT_CONSUMER
    )]
    pub consumer: String,

    /// Drive a simulated board rather than the GPIO chips
    #[arg(long)]
    pub dry_run: bool,

    /// Switch outputs interactively after the other options are applied
    #[arg(short, long)]
    pub interactive: bool,

    /// Set all outputs low when the interactive session ends
    #[arg(long, requires = "interactive")]
    pub off_on_exit: bool,

    /// Log more detail to stderr
    ///
    /// May be repeated, e.g. -vv. RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(flatten)]
    pub emit: EmitOpts,
}

impl Opts {
    fn is_actionable(&self, sel: &Selection) -> bool {
        self.setup || self.status || self.interactive || !sel.is_empty()
    }

    fn mode(&self) -> Mode {
        if self.setup {
            Mode::Output
        } else {
            Mode::Unconfigured
        }
    }
}

pub fn cmd(opts: &Opts) -> bool {
    let mut res = CmdResult::default();
    if let Err(e) = do_cmd(opts, &mut res) {
        res.push_error(e);
    }
    if res.has_output() {
        res.emit(&opts.emit);
    }
    !res.failed()
}

fn do_cmd(opts: &Opts, res: &mut CmdResult) -> Result<()> {
    let (high, errs) = parse_outputs(&opts.high);
    res.errors.extend(errs.into_iter().map(|e| anyhow!(e)));
    let (low, errs) = parse_outputs(&opts.low);
    res.errors.extend(errs.into_iter().map(|e| anyhow!(e)));

    let sel = Selection::resolve(&high, &low);
    res.notices.extend(sel.notices().map(|c| c.to_string()));

    if !opts.is_actionable(&sel) {
        res.notices
            .push("No arguments specified. Use -h or --help for more information.".to_string());
        return Ok(());
    }

    let mapping = opts.mapping.clone().unwrap_or(Mapping::DEFAULT);
    debug!("outputs mapped to {mapping}");
    if opts.dry_run {
        info!("dry run - using simulated lines");
        run(opts, &Sim::new(), &mapping, &sel, res)
    } else {
        let mut cdev = Cdev::new();
        cdev.with_consumer(opts.consumer.as_str());
        run(opts, &cdev, &mapping, &sel, res)
    }
}

fn run<P: Provider>(
    opts: &Opts,
    provider: &P,
    mapping: &Mapping,
    sel: &Selection,
    res: &mut CmdResult,
) -> Result<()> {
    let mut bank = Bank::new(provider, mapping, opts.mode())
        .with_context(|| format!("unable to claim the lines for the outputs ({mapping})"))?;

    if !sel.high.is_empty() {
        res.notices
            .push(format!("setting high: {}", join_numbers(&sel.high)));
        set(&mut bank, &sel.high, true, &mut res.errors);
    }
    if !sel.low.is_empty() {
        res.notices
            .push(format!("setting low: {}", join_numbers(&sel.low)));
        set(&mut bank, &sel.low, false, &mut res.errors);
    }

    if opts.interactive {
        res.flush(&opts.emit);
        let session = interactive::run(&mut bank, &opts.emit);
        end_session(&mut bank, opts.off_on_exit, session, &mut res.errors)?;
    }

    if opts.status {
        res.status = Some(status::read(&mut bank, &mut res.errors));
    }
    Ok(())
}

// applied however the interactive session ended, including on error
fn end_session<L: Line>(
    bank: &mut Bank<L>,
    off_on_exit: bool,
    session: Result<()>,
    errors: &mut Vec<anyhow::Error>,
) -> Result<()> {
    if off_on_exit {
        info!("setting all outputs low");
        let all: Vec<usize> = (1..=bank.len()).collect();
        set(bank, &all, false, errors);
    }
    session
}

/// Drive the outputs, collecting the errors for any that could not be set.
pub fn set<L: Line>(
    bank: &mut Bank<L>,
    numbers: &[usize],
    high: bool,
    errors: &mut Vec<anyhow::Error>,
) {
    let (results, dir) = if high {
        (bank.set_high(numbers), "high")
    } else {
        (bank.set_low(numbers), "low")
    };
    for (number, r) in results {
        if let Err(e) = r {
            errors.push(anyhow!(e).context(format!("unable to set output {number} {dir}")));
        }
    }
}

#[derive(Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
struct CmdResult {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    notices: Vec<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    status: Option<Vec<OutputValue>>,
    #[cfg_attr(
        feature = "serde",
        serde(
            skip_serializing_if = "Vec::is_empty",
            serialize_with = "serialize_errors"
        )
    )]
    errors: Vec<anyhow::Error>,
    #[cfg_attr(feature = "serde", serde(skip))]
    flushed: bool,
    // errors already emitted by a flush
    #[cfg_attr(feature = "serde", serde(skip))]
    flushed_errors: bool,
}

impl CmdResult {
    fn push_error(&mut self, e: anyhow::Error) {
        self.errors.push(e);
    }

    // after a flush only emit what has been added since
    fn has_output(&self) -> bool {
        !self.flushed
            || !self.notices.is_empty()
            || self.status.is_some()
            || !self.errors.is_empty()
    }

    fn failed(&self) -> bool {
        self.flushed_errors || !self.errors.is_empty()
    }

    // emit the results so far, such as before an interactive session takes
    // over the terminal
    fn flush(&mut self, opts: &EmitOpts) {
        let flushed = std::mem::take(self);
        flushed.emit(opts);
        self.flushed = true;
        self.flushed_errors = flushed.failed();
    }

    fn emit(&self, opts: &EmitOpts) {
        #[cfg(feature = "json")]
        if opts.json {
            println!("{}", serde_json::to_string(self).unwrap());
            return;
        }
        self.print(opts);
    }

    fn print(&self, opts: &EmitOpts) {
        for notice in &self.notices {
            println!("{notice}");
        }
        if let Some(values) = &self.status {
            status::print_table(values, opts.numeric);
        }
        for e in &self.errors {
            eprintln!("{}", format_error(e));
        }
    }
}

#[cfg(feature = "serde")]
fn serialize_errors<S>(
    errors: &[anyhow::Error],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeSeq;

    let mut seq = serializer.serialize_seq(Some(errors.len()))?;
    for e in errors {
        seq.serialize_element(&format_error(e))?;
    }
    seq.end()
}
