// SPDX-FileCopyrightText: 2024 Panthyr contributors
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A library for driving the digital outputs of the Panthyr power-control
//! board on Linux platforms using the GPIO character device.
//!
//! The board exposes six logical outputs, numbered 1 to 6, each of which is
//! wired to a line on one of the host's GPIO chips.
//! The [`Mapping`] describes where each output lives, the [`Bank`] claims all
//! of them at once, and each output is driven through its [`Pin`].
//!
//! Access to the hardware is provided by a [`Provider`], so the same bank can
//! be driven by the kernel via [`Cdev`] or by the in-process [`Sim`].
//!
//! Setting outputs on the board:
//! ```no_run
//! # fn example() -> panthyr_gpio::Result<()> {
//! use panthyr_gpio::{Bank, Cdev, Mapping, Mode};
//!
//! let mut bank = Bank::new(&Cdev::new(), &Mapping::DEFAULT, Mode::Output)?;
//! for (number, res) in bank.set_high(&[2, 3]) {
//!     if let Err(e) = res {
//!         eprintln!("output {number}: {e}");
//!     }
//! }
//! for (number, value) in bank.status() {
//!     println!("{number}={}", value?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`Bank`]: struct@bank::Bank
//! [`Cdev`]: struct@cdev::Cdev
//! [`Mapping`]: struct@mapping::Mapping
//! [`Pin`]: struct@pin::Pin
//! [`Provider`]: trait@line::Provider
//! [`Sim`]: struct@sim::Sim

/// The bank of outputs on the board.
pub mod bank;

/// Line access via the GPIO character device.
pub mod cdev;

/// Types and traits describing how lines are located and acquired.
pub mod line;

/// The mapping from logical outputs to physical lines.
pub mod mapping;

/// A single line and the mode it was claimed in.
pub mod pin;

/// Parsing and reconciling lists of requested outputs.
pub mod select;

/// An in-process line provider for testing without hardware.
pub mod sim;

pub use bank::Bank;
pub use cdev::Cdev;
pub use line::{ChipId, Level, Location, Offset, Provider};
pub use mapping::{Mapping, OUTPUT_COUNT};
pub use pin::{Mode, Pin};
pub use select::{parse_outputs, Selection};
pub use sim::Sim;

/// Errors returned by [`panthyr_gpio`] functions.
///
/// [`panthyr_gpio`]: crate
#[derive(Clone, Debug, thiserror::Error, Eq, PartialEq)]
pub enum Error {
    /// The line cannot be claimed in the requested mode.
    #[error("{0} mode is not supported")]
    UnsupportedMode(Mode),

    /// The line could not be claimed from the chip.
    #[error("unable to claim line {location}: {reason}")]
    AcquisitionFailed { location: Location, reason: String },

    /// The line has not been claimed as an output, so cannot be driven.
    #[error("line {0} is not configured as an output")]
    NotAnOutput(Location),

    /// The operation is reserved for a mode that is not implemented yet.
    #[error("{0} is not implemented")]
    NotImplemented(Mode),

    /// The logical output number does not identify an output on the board.
    #[error("output {number} is out of range, must be 1-{count}")]
    OutOfRange { number: usize, count: usize },

    /// A requested output is not a positive integer.
    #[error("invalid output '{0}', should be an integer or a comma delimited list of integers")]
    InvalidToken(String),

    /// The mapping does not describe the board.
    #[error("invalid mapping: {0}")]
    InvalidMapping(String),

    /// A line location is not in chip:offset form.
    #[error("invalid line location '{0}', should be chip:offset")]
    InvalidLocation(String),

    /// An operation on a claimed line failed.
    #[error("line {location}: {reason}")]
    Line { location: Location, reason: String },
}

/// The result for [`panthyr_gpio`] functions.
///
/// [`panthyr_gpio`]: crate
pub type Result<T> = std::result::Result<T, Error>;
