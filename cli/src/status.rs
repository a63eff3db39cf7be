// SPDX-FileCopyrightText: 2024 Panthyr contributors
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use anyhow::anyhow;
use panthyr_gpio::line::Line;
use panthyr_gpio::{Bank, Level};
#[cfg(feature = "serde")]
use serde_derive::Serialize;

/// The value of one output, as reported to the user.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct OutputValue {
    pub output: usize,
    pub value: Level,
}

/// Read the value of every output.
///
/// Outputs that cannot be read are reported as unknown, and the reason is
/// added to `errors`.
pub fn read<L: Line>(bank: &mut Bank<L>, errors: &mut Vec<anyhow::Error>) -> Vec<OutputValue> {
    bank.status()
        .into_iter()
        .map(|(output, res)| {
            let value = res.unwrap_or_else(|e| {
                errors.push(anyhow!(e).context(format!("unable to read output {output}")));
                Level::Unknown
            });
            OutputValue { output, value }
        })
        .collect()
}

fn numeric(value: Level) -> &'static str {
    if value.is_high() {
        "1"
    } else if value.is_low() {
        "0"
    } else {
        "-"
    }
}

/// Format the values as a table, one row per output.
pub fn table(values: &[OutputValue], numeric_values: bool) -> Vec<String> {
    let mut rows = Vec::with_capacity(values.len() + 1);
    rows.push("|OUTPUT|VALUE  |".to_string());
    for ov in values {
        if numeric_values {
            rows.push(format!("|{:6}|{:7}|", ov.output, numeric(ov.value)));
        } else {
            rows.push(format!("|{:6}|{:7}|", ov.output, ov.value));
        }
    }
    rows
}

pub fn print_table(values: &[OutputValue], numeric_values: bool) {
    for row in table(values, numeric_values) {
        println!("{row}");
    }
}
