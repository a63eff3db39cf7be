// SPDX-FileCopyrightText: 2024 Panthyr contributors
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::line::{Level, Line, Provider};
use crate::mapping::{self, Mapping};
use crate::pin::{Mode, Pin};
use crate::Result;
use log::{debug, info, warn};

/// The outputs of the board.
///
/// The bank claims the lines for all outputs when it is created and holds
/// them until it is dropped.
///
/// Outputs are identified by their 1-based output number.
/// Operations on multiple outputs are applied to each output in turn and
/// report a result for each, so a failure on one output does not prevent the
/// remainder being applied.
#[derive(Debug)]
pub struct Bank<L> {
    mapping: Mapping,
    pins: Vec<Pin<L>>,
}

impl<L: Line> Bank<L> {
    /// Claim the lines for all the outputs in the `mapping`, in the given `mode`.
    ///
    /// Either all lines are claimed or none are.
    /// If any line cannot be claimed, the lines already claimed are released
    /// before the error is returned.
    pub fn new<P>(provider: &P, mapping: &Mapping, mode: Mode) -> Result<Self>
    where
        P: Provider<Line = L>,
    {
        let mut pins = Vec::with_capacity(mapping.locations().len());
        for (number, location) in mapping.iter() {
            match Pin::new(provider, location, mode, None) {
                Ok(pin) => pins.push(pin),
                Err(e) => {
                    warn!(
                        "unable to claim output {number} ({location}), releasing {} claimed lines",
                        pins.len()
                    );
                    return Err(e);
                }
            }
            debug!("claimed output {number} ({location})");
        }
        info!("claimed {} outputs as {mode}", pins.len());
        Ok(Bank {
            mapping: mapping.clone(),
            pins,
        })
    }

    /// The number of outputs in the bank.
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    /// Does the bank contain no outputs?
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// The mapping used to claim the outputs.
    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    /// The pin controlling the output.
    pub fn pin(&self, number: usize) -> Result<&Pin<L>> {
        Ok(&self.pins[mapping::index(number)?])
    }

    /// The pin controlling the output, for modification.
    pub fn pin_mut(&mut self, number: usize) -> Result<&mut Pin<L>> {
        Ok(&mut self.pins[mapping::index(number)?])
    }

    /// Drive the outputs high.
    ///
    /// Returns the result for each distinct output number, in the order the
    /// numbers were first provided.
    pub fn set_high(&mut self, numbers: &[usize]) -> Vec<(usize, Result<()>)> {
        self.apply(numbers, Pin::turn_on)
    }

    /// Drive the outputs low.
    ///
    /// Returns the result for each distinct output number, in the order the
    /// numbers were first provided.
    pub fn set_low(&mut self, numbers: &[usize]) -> Vec<(usize, Result<()>)> {
        self.apply(numbers, Pin::turn_off)
    }

    fn apply<F>(&mut self, numbers: &[usize], op: F) -> Vec<(usize, Result<()>)>
    where
        F: Fn(&mut Pin<L>) -> Result<()>,
    {
        let mut results: Vec<(usize, Result<()>)> = Vec::new();
        for &number in numbers {
            if results.iter().any(|(n, _)| *n == number) {
                continue;
            }
            let res = self.pin_mut(number).and_then(&op);
            if let Err(e) = &res {
                warn!("output {number}: {e}");
            }
            results.push((number, res));
        }
        results
    }

    /// Read the levels of all outputs from hardware, in output order.
    ///
    /// A failure to read one output does not prevent the others being read.
    pub fn status(&mut self) -> Vec<(usize, Result<Level>)> {
        self.pins
            .iter_mut()
            .enumerate()
            .map(|(idx, pin)| (idx + 1, pin.read_current_value()))
            .collect()
    }
}
