// SPDX-FileCopyrightText: 2024 Panthyr contributors
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::line::{ChipId, Direction, Line, LineRequest, Location, Provider};
use crate::{Error, Result};
use gpiocdev::line::Value;
use gpiocdev::Request;
use std::collections::HashMap;
use std::path::PathBuf;

/// The consumer label applied to lines requested by [`Cdev`].
pub const DEFAULT_CONSUMER: &str = "panthyr-gpio";

/// Provides lines from the Linux GPIO character devices.
///
/// Chips are found at /dev/gpiochipN, where N is the chip id, unless
/// an alternate path has been registered for the chip using [`with_chip`].
///
/// [`with_chip`]: #method.with_chip
#[derive(Clone, Debug)]
pub struct Cdev {
    consumer: String,
    chips: HashMap<ChipId, PathBuf>,
}

impl Default for Cdev {
    fn default() -> Self {
        Cdev {
            consumer: DEFAULT_CONSUMER.into(),
            chips: HashMap::new(),
        }
    }
}

impl Cdev {
    /// Create a provider using the default chip paths and consumer label.
    pub fn new() -> Cdev {
        Cdev::default()
    }

    /// Set the consumer label applied to requested lines.
    pub fn with_consumer<N: Into<String>>(&mut self, consumer: N) -> &mut Self {
        self.consumer = consumer.into();
        self
    }

    /// Use the character device at the given path for the chip.
    pub fn with_chip<P: Into<PathBuf>>(&mut self, chip: ChipId, path: P) -> &mut Self {
        self.chips.insert(chip, path.into());
        self
    }

    /// The consumer label applied to requested lines.
    pub fn consumer(&self) -> &str {
        &self.consumer
    }

    /// The path to the character device for the chip.
    pub fn chip_path(&self, chip: ChipId) -> PathBuf {
        match self.chips.get(&chip) {
            Some(path) => path.clone(),
            None => format!("/dev/gpiochip{chip}").into(),
        }
    }
}

impl Provider for Cdev {
    type Line = CdevLine;

    fn request(&self, lr: &LineRequest) -> Result<CdevLine> {
        let location = lr.location;
        let mut bld = Request::builder();
        bld.on_chip(self.chip_path(location.chip))
            .with_consumer(self.consumer.as_str())
            .with_line(location.offset);
        match lr.direction {
            Direction::AsIs => bld.as_is(),
            Direction::Output => bld.as_output(Value::from(lr.value.unwrap_or(false))),
        };
        let req = bld.request().map_err(|e| Error::AcquisitionFailed {
            location,
            reason: e.to_string(),
        })?;
        Ok(CdevLine { req, location })
    }
}

/// A line claimed from a GPIO character device.
///
/// The line is released when dropped.
#[derive(Debug)]
pub struct CdevLine {
    req: Request,
    location: Location,
}

impl CdevLine {
    fn line_error(&self, e: gpiocdev::Error) -> Error {
        Error::Line {
            location: self.location,
            reason: e.to_string(),
        }
    }
}

impl Line for CdevLine {
    fn set_value(&mut self, value: bool) -> Result<()> {
        self.req
            .set_value(self.location.offset, value.into())
            .map_err(|e| self.line_error(e))
    }

    fn value(&mut self) -> Result<bool> {
        self.req
            .value(self.location.offset)
            .map(bool::from)
            .map_err(|e| self.line_error(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_chip_paths() {
        let cdev = Cdev::new();
        assert_eq!(cdev.chip_path(0), PathBuf::from("/dev/gpiochip0"));
        assert_eq!(cdev.chip_path(3), PathBuf::from("/dev/gpiochip3"));
        assert_eq!(cdev.consumer(), DEFAULT_CONSUMER);
    }

    #[test]
    fn registered_chip_paths() {
        let mut cdev = Cdev::new();
        cdev.with_chip(2, "/dev/gpiochip7").with_consumer("tester");
        assert_eq!(cdev.chip_path(2), PathBuf::from("/dev/gpiochip7"));
        assert_eq!(cdev.chip_path(3), PathBuf::from("/dev/gpiochip3"));
        assert_eq!(cdev.consumer(), "tester");
    }

    #[test]
    fn request_missing_chip() {
        let mut cdev = Cdev::new();
        cdev.with_chip(0, "/dev/panthyr-gpio-no-such-chip");
        let location = Location::new(0, 8);
        let err = cdev
            .request(&LineRequest {
                location,
                direction: Direction::Output,
                value: None,
            })
            .unwrap_err();
        assert!(
            matches!(err, Error::AcquisitionFailed { location: l, .. } if l == location),
            "{err:?}"
        );
    }
}
