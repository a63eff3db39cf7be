// SPDX-FileCopyrightText: 2024 Panthyr contributors
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{Error, Result};
#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The identifier of a GPIO chip, i.e. the N in /dev/gpiochipN.
pub type ChipId = u32;

/// The offset of a line within its chip.
pub type Offset = u32;

/// The physical location of a line.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Location {
    /// The chip containing the line.
    pub chip: ChipId,

    /// The offset of the line on the chip.
    pub offset: Offset,
}

impl Location {
    /// Create a location from a chip and offset.
    pub const fn new(chip: ChipId, offset: Offset) -> Location {
        Location { chip, offset }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chip, self.offset)
    }
}

impl FromStr for Location {
    type Err = Error;

    /// Parse a location in chip:offset form, e.g. "3:19".
    fn from_str(s: &str) -> Result<Self> {
        let (chip, offset) = s
            .split_once(':')
            .ok_or_else(|| Error::InvalidLocation(s.into()))?;
        let chip = chip
            .trim()
            .parse()
            .map_err(|_| Error::InvalidLocation(s.into()))?;
        let offset = offset
            .trim()
            .parse()
            .map_err(|_| Error::InvalidLocation(s.into()))?;
        Ok(Location { chip, offset })
    }
}

/// The level of a line, as last driven or read back from hardware.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(rename_all = "lowercase"))]
pub enum Level {
    /// The level has not been set or read since the line was claimed.
    #[default]
    Unknown,
    /// The line is low.
    Low,
    /// The line is high.
    High,
}

impl Level {
    /// Is the level known to be high?
    pub fn is_high(&self) -> bool {
        *self == Level::High
    }

    /// Is the level known to be low?
    pub fn is_low(&self) -> bool {
        *self == Level::Low
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Unknown => "unknown",
            Level::Low => "low",
            Level::High => "high",
        };
        f.pad(s)
    }
}

impl From<bool> for Level {
    fn from(b: bool) -> Level {
        match b {
            false => Level::Low,
            true => Level::High,
        }
    }
}

impl From<Level> for Option<bool> {
    fn from(l: Level) -> Option<bool> {
        match l {
            Level::Unknown => None,
            Level::Low => Some(false),
            Level::High => Some(true),
        }
    }
}

/// How a line should be configured when it is claimed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    /// Leave the line configuration unaltered.
    AsIs,
    /// Configure the line as an output.
    Output,
}

/// The details of a line to be claimed from a [`Provider`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LineRequest {
    /// Where the line lives.
    pub location: Location,

    /// How the line is to be configured.
    pub direction: Direction,

    /// The value an output line is driven to as part of the request.
    ///
    /// Outputs requested without a value are driven low.
    pub value: Option<bool>,
}

/// A claimed line.
///
/// The claim is held until the line is dropped.
pub trait Line {
    /// Drive the line to the given value.
    fn set_value(&mut self, value: bool) -> Result<()>;

    /// Read the current value of the line from hardware.
    fn value(&mut self) -> Result<bool>;
}

/// A source of claimed lines.
///
/// The provider is the only access the library has to the hardware.
pub trait Provider {
    /// The type of lines claimed from this provider.
    type Line: Line;

    /// Claim exclusive access to a line, configured as requested.
    ///
    /// Fails with [`Error::AcquisitionFailed`] if the line does not exist or
    /// is already claimed.
    fn request(&self, req: &LineRequest) -> Result<Self::Line>;
}
