// SPDX-FileCopyrightText: 2024 Panthyr contributors
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::line::{Direction, Level, Line, LineRequest, Location, Provider};
use crate::{Error, Result};
use log::debug;
use std::fmt;

/// The mode a line is claimed in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    /// The line is claimed as-is and may not be driven.
    Unconfigured,
    /// The line is claimed as a digital output.
    Output,
    /// The line is to be sampled by an ADC.
    ///
    /// Reserved - not implemented.
    AnalogInput,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::Unconfigured => "unconfigured",
            Mode::Output => "output",
            Mode::AnalogInput => "analog input",
        };
        write!(f, "{}", s)
    }
}

/// Controls a single claimed line.
///
/// Holding the [`Pin`] grants exclusive access to the line, which is released
/// when the [`Pin`] is dropped.
///
/// The mode is fixed for the life of the [`Pin`].
/// To change mode, drop the [`Pin`] and claim the line again.
#[derive(Debug)]
pub struct Pin<L> {
    line: L,
    location: Location,
    mode: Mode,
    value: Level,
}

impl<L: Line> Pin<L> {
    /// Claim the line at `location` from the `provider` in the given `mode`.
    ///
    /// For outputs, if an `initial` value is provided the line is driven to
    /// that value as part of the claim.
    /// Otherwise the line is driven low and its level is reported as
    /// [`Level::Unknown`] until it is next set or read.
    ///
    /// Fails with [`Error::UnsupportedMode`] for [`Mode::AnalogInput`], and
    /// with [`Error::NotAnOutput`] if an `initial` value is provided for a line
    /// that is not being claimed as an output.
    /// In both cases the line is never claimed.
    pub fn new<P>(
        provider: &P,
        location: Location,
        mode: Mode,
        initial: Option<bool>,
    ) -> Result<Self>
    where
        P: Provider<Line = L>,
    {
        let direction = match mode {
            Mode::Output => Direction::Output,
            Mode::Unconfigured if initial.is_some() => {
                return Err(Error::NotAnOutput(location));
            }
            Mode::Unconfigured => Direction::AsIs,
            Mode::AnalogInput => return Err(Error::UnsupportedMode(mode)),
        };
        let line = provider.request(&LineRequest {
            location,
            direction,
            value: initial,
        })?;
        debug!("claimed line {location} as {mode}");
        Ok(Pin {
            line,
            location,
            mode,
            value: initial.map(Level::from).unwrap_or_default(),
        })
    }

    /// Where the line lives.
    pub fn location(&self) -> Location {
        self.location
    }

    /// The mode the line was claimed in.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The level the line was last driven to or read as.
    pub fn last_known_value(&self) -> Level {
        self.value
    }

    /// Drive the line high.
    pub fn turn_on(&mut self) -> Result<()> {
        self.drive(true)
    }

    /// Drive the line low.
    pub fn turn_off(&mut self) -> Result<()> {
        self.drive(false)
    }

    fn drive(&mut self, value: bool) -> Result<()> {
        if self.mode != Mode::Output {
            return Err(Error::NotAnOutput(self.location));
        }
        self.line.set_value(value)?;
        self.value = value.into();
        debug!("line {} set {}", self.location, self.value);
        Ok(())
    }

    /// Read the level of the line from hardware.
    ///
    /// Lines claimed as-is are read, but as they are not driven the level is
    /// not retained as the last known value.
    ///
    /// Note that reading back the level of an output depends on driver and
    /// hardware support.
    pub fn read_current_value(&mut self) -> Result<Level> {
        match self.mode {
            Mode::Output => {
                self.value = self.line.value()?.into();
                debug!("line {} reads {}", self.location, self.value);
                Ok(self.value)
            }
            Mode::Unconfigured => {
                let value = self.line.value()?.into();
                debug!("line {} reads {}", self.location, value);
                Ok(value)
            }
            Mode::AnalogInput => Err(Error::NotImplemented(self.mode)),
        }
    }
}
