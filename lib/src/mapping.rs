// SPDX-FileCopyrightText: 2024 Panthyr contributors
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::line::Location;
use crate::{Error, Result};
#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The number of outputs on the board.
pub const OUTPUT_COUNT: usize = 6;

/// The locations of the lines driving each of the outputs on the board.
///
/// Outputs are numbered from 1, so output N is at index N-1.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "Vec<Location>", into = "Vec<Location>")
)]
pub struct Mapping([Location; OUTPUT_COUNT]);

impl Mapping {
    /// The wiring of the standard board.
    pub const DEFAULT: Mapping = Mapping([
        Location::new(3, 19),
        Location::new(3, 18),
        Location::new(2, 12),
        Location::new(2, 6),
        Location::new(0, 8),
        Location::new(0, 9),
    ]);

    /// Create a mapping from the locations of outputs 1 to 6, in order.
    ///
    /// Fails if there are not exactly six locations or if any location is
    /// repeated.
    pub fn new(locations: &[Location]) -> Result<Mapping> {
        let locations: [Location; OUTPUT_COUNT] = locations.try_into().map_err(|_| {
            Error::InvalidMapping(format!(
                "requires {} lines, found {}",
                OUTPUT_COUNT,
                locations.len()
            ))
        })?;
        for (idx, loc) in locations.iter().enumerate() {
            if let Some(other) = locations[idx + 1..].iter().position(|l| l == loc) {
                return Err(Error::InvalidMapping(format!(
                    "outputs {} and {} both map to line {}",
                    idx + 1,
                    idx + other + 2,
                    loc
                )));
            }
        }
        Ok(Mapping(locations))
    }

    /// The location of the line for the output.
    pub fn location(&self, number: usize) -> Result<Location> {
        Ok(self.0[index(number)?])
    }

    /// The locations of all outputs, in output order.
    pub fn locations(&self) -> &[Location] {
        &self.0
    }

    /// Iterate over the outputs and their locations, in output order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Location)> + '_ {
        self.0.iter().enumerate().map(|(idx, loc)| (idx + 1, *loc))
    }
}

impl Default for Mapping {
    fn default() -> Self {
        Mapping::DEFAULT
    }
}

/// Convert a 1-based output number to the index of the output.
pub fn index(number: usize) -> Result<usize> {
    if (1..=OUTPUT_COUNT).contains(&number) {
        Ok(number - 1)
    } else {
        Err(Error::OutOfRange {
            number,
            count: OUTPUT_COUNT,
        })
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let locs: Vec<String> = self.0.iter().map(Location::to_string).collect();
        write!(f, "{}", locs.join(","))
    }
}

impl FromStr for Mapping {
    type Err = Error;

    /// Parse a comma delimited list of chip:offset locations,
    /// e.g. "3:19,3:18,2:12,2:6,0:8,0:9".
    fn from_str(s: &str) -> Result<Self> {
        let locations = s
            .split(',')
            .map(str::parse)
            .collect::<Result<Vec<Location>>>()?;
        Mapping::new(&locations)
    }
}

impl TryFrom<Vec<Location>> for Mapping {
    type Error = Error;

    fn try_from(locations: Vec<Location>) -> Result<Self> {
        Mapping::new(&locations)
    }
}

impl From<Mapping> for Vec<Location> {
    fn from(m: Mapping) -> Self {
        m.0.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default() {
        let m = Mapping::default();
        assert_eq!(m, Mapping::DEFAULT);
        assert_eq!(m.location(1).unwrap(), Location::new(3, 19));
        assert_eq!(m.location(2).unwrap(), Location::new(3, 18));
        assert_eq!(m.location(3).unwrap(), Location::new(2, 12));
        assert_eq!(m.location(4).unwrap(), Location::new(2, 6));
        assert_eq!(m.location(5).unwrap(), Location::new(0, 8));
        assert_eq!(m.location(6).unwrap(), Location::new(0, 9));
    }

    #[test]
    fn location_out_of_range() {
        let m = Mapping::DEFAULT;
        for number in [0, 7, 100] {
            assert_eq!(
                m.location(number).unwrap_err(),
                Error::OutOfRange { number, count: 6 }
            );
        }
    }

    #[test]
    fn iter() {
        let numbers: Vec<usize> = Mapping::DEFAULT.iter().map(|(n, _)| n).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
        let locs: Vec<Location> = Mapping::DEFAULT.iter().map(|(_, l)| l).collect();
        assert_eq!(locs.as_slice(), Mapping::DEFAULT.locations());
    }

    #[test]
    fn new_wrong_length() {
        let locs = [Location::new(0, 1); 5];
        assert_eq!(
            Mapping::new(&locs).unwrap_err(),
            Error::InvalidMapping("requires 6 lines, found 5".into())
        );
        let locs: Vec<Location> = (0..7).map(|o| Location::new(1, o)).collect();
        assert_eq!(
            Mapping::new(&locs).unwrap_err(),
            Error::InvalidMapping("requires 6 lines, found 7".into())
        );
    }

    #[test]
    fn new_repeated_location() {
        let mut locs: Vec<Location> = (0..6).map(|o| Location::new(1, o)).collect();
        locs[4] = Location::new(1, 1);
        assert_eq!(
            Mapping::new(&locs).unwrap_err(),
            Error::InvalidMapping("outputs 2 and 5 both map to line 1:1".into())
        );
    }

    #[test]
    fn from_str() {
        assert_eq!(
            "3:19,3:18,2:12,2:6,0:8,0:9".parse::<Mapping>().unwrap(),
            Mapping::DEFAULT
        );
        assert_eq!(
            "0:1, 0:2, 0:3, 1:1, 1:2, 1:3".parse::<Mapping>().unwrap(),
            Mapping::new(&[
                Location::new(0, 1),
                Location::new(0, 2),
                Location::new(0, 3),
                Location::new(1, 1),
                Location::new(1, 2),
                Location::new(1, 3),
            ])
            .unwrap()
        );
        assert_eq!(
            "3:19,3:18".parse::<Mapping>().unwrap_err(),
            Error::InvalidMapping("requires 6 lines, found 2".into())
        );
        assert_eq!(
            "3:19,3:18,2:12,2-6,0:8,0:9".parse::<Mapping>().unwrap_err(),
            Error::InvalidLocation("2-6".into())
        );
        assert_eq!(
            "".parse::<Mapping>().unwrap_err(),
            Error::InvalidLocation("".into())
        );
    }

    #[test]
    fn display() {
        assert_eq!(Mapping::DEFAULT.to_string(), "3:19,3:18,2:12,2:6,0:8,0:9");
    }

    #[test]
    fn index() {
        assert_eq!(super::index(1).unwrap(), 0);
        assert_eq!(super::index(6).unwrap(), 5);
        assert!(super::index(0).is_err());
        assert!(super::index(7).is_err());
    }
}
