// SPDX-FileCopyrightText: 2024 Panthyr contributors
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The simulator stands in for the GPIO chips, so banks and pins can be
//! exercised without hardware.
//!
//! Like the kernel, it only allows a line to be claimed once at a time.
//! It also counts acquisitions and releases, and can be primed to fail
//! particular requests, so the handling of failures can be checked.
//!
//! ```
//! # fn example() -> panthyr_gpio::Result<()> {
//! use panthyr_gpio::{Bank, Location, Mapping, Mode, Sim};
//!
//! let sim = Sim::new();
//! let mut bank = Bank::new(&sim, &Mapping::DEFAULT, Mode::Output)?;
//! bank.set_high(&[1]);
//! assert_eq!(sim.level(Location::new(3, 19)), Some(true));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use crate::line::{ChipId, Direction, Line, LineRequest, Location, Provider};
use crate::{Error, Result};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// A simulated set of GPIO chips.
///
/// Clones share the same simulated hardware.
#[derive(Clone, Debug, Default)]
pub struct Sim(Rc<RefCell<State>>);

#[derive(Debug, Default)]
struct State {
    // Number of lines on each declared chip.
    // If no chips are declared then every location exists.
    chips: HashMap<ChipId, u32>,

    // The physical level of lines that have been driven or pulled.
    levels: HashMap<Location, bool>,

    // Lines currently claimed.
    held: HashSet<Location>,

    // Lines that fail any request.
    faulty: HashSet<Location>,

    // The 1-based request number that will fail.
    fail_request: Option<usize>,

    requests: usize,
    acquisitions: usize,
    releases: usize,
}

impl Sim {
    /// Create a simulator where every location exists.
    pub fn new() -> Sim {
        Sim::default()
    }

    /// Declare a chip with the given number of lines.
    ///
    /// Once any chip is declared, requests for lines on undeclared chips,
    /// or beyond the end of a declared chip, fail.
    pub fn with_chip(&self, chip: ChipId, num_lines: u32) -> &Self {
        self.0.borrow_mut().chips.insert(chip, num_lines);
        self
    }

    /// Make every request for the line fail.
    pub fn fail_location(&self, location: Location) -> &Self {
        self.0.borrow_mut().faulty.insert(location);
        self
    }

    /// Make the nth request, counting from 1, fail.
    pub fn fail_request(&self, nth: usize) -> &Self {
        self.0.borrow_mut().fail_request = Some(nth);
        self
    }

    /// Set the physical level of a line, as an external source would.
    pub fn set_level(&self, location: Location, value: bool) {
        self.0.borrow_mut().levels.insert(location, value);
    }

    /// The physical level of a line, if it has ever been driven or set.
    pub fn level(&self, location: Location) -> Option<bool> {
        self.0.borrow().levels.get(&location).copied()
    }

    /// Is the line currently claimed?
    pub fn is_held(&self, location: Location) -> bool {
        self.0.borrow().held.contains(&location)
    }

    /// The number of lines currently claimed.
    pub fn held(&self) -> usize {
        self.0.borrow().held.len()
    }

    /// The number of requests made, successful or not.
    pub fn requests(&self) -> usize {
        self.0.borrow().requests
    }

    /// The number of lines successfully claimed.
    pub fn acquisitions(&self) -> usize {
        self.0.borrow().acquisitions
    }

    /// The number of claimed lines that have since been released.
    pub fn releases(&self) -> usize {
        self.0.borrow().releases
    }
}

impl State {
    fn check(&self, location: Location) -> std::result::Result<(), &'static str> {
        if self.fail_request == Some(self.requests) || self.faulty.contains(&location) {
            return Err("simulated failure");
        }
        if !self.chips.is_empty() {
            match self.chips.get(&location.chip) {
                None => return Err("no such chip"),
                Some(num_lines) if location.offset >= *num_lines => {
                    return Err("offset out of range")
                }
                Some(_) => {}
            }
        }
        if self.held.contains(&location) {
            return Err("line busy");
        }
        Ok(())
    }
}

impl Provider for Sim {
    type Line = SimLine;

    fn request(&self, lr: &LineRequest) -> Result<SimLine> {
        let location = lr.location;
        let mut state = self.0.borrow_mut();
        state.requests += 1;
        state
            .check(location)
            .map_err(|reason| Error::AcquisitionFailed {
                location,
                reason: reason.into(),
            })?;
        state.held.insert(location);
        state.acquisitions += 1;
        if lr.direction == Direction::Output {
            state.levels.insert(location, lr.value.unwrap_or(false));
        }
        Ok(SimLine {
            sim: self.clone(),
            location,
        })
    }
}

/// A line claimed from the [`Sim`].
///
/// The line is released when dropped.
#[derive(Debug)]
pub struct SimLine {
    sim: Sim,
    location: Location,
}

impl Line for SimLine {
    fn set_value(&mut self, value: bool) -> Result<()> {
        self.sim.set_level(self.location, value);
        Ok(())
    }

    fn value(&mut self) -> Result<bool> {
        Ok(self.sim.level(self.location).unwrap_or(false))
    }
}

impl Drop for SimLine {
    fn drop(&mut self) {
        let mut state = self.sim.0.borrow_mut();
        state.held.remove(&self.location);
        state.releases += 1;
    }
}
