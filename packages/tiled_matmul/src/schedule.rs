use std::str::FromStr;

use derive_more::Display;

use crate::ArgumentError;

/// How row tiles are distributed between the workers of a region.
///
/// The display form is the lowercase name accepted on the command line and written to CSV.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Schedule {
    /// Tile `t` belongs to worker `t mod W`, decided before any work starts.
    #[display("static")]
    Static,

    /// Workers claim tiles one at a time from a shared cursor.
    #[display("dynamic")]
    Dynamic,
}

impl Schedule {
    /// The capitalized name used in human-readable output.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Static => "Static",
            Self::Dynamic => "Dynamic",
        }
    }
}

impl FromStr for Schedule {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(Self::Static),
            "dynamic" => Ok(Self::Dynamic),
            _ => Err(ArgumentError::UnknownSchedule { name: s.to_owned() }),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for schedule in [Schedule::Static, Schedule::Dynamic] {
            assert_eq!(schedule.to_string().parse::<Schedule>(), Ok(schedule));
        }
    }

    #[test]
    fn names_are_case_sensitive() {
        assert!("Static".parse::<Schedule>().is_err());
        assert!("guided".parse::<Schedule>().is_err());
    }

    #[test]
    fn titles() {
        assert_eq!(Schedule::Static.title(), "Static");
        assert_eq!(Schedule::Dynamic.title(), "Dynamic");
    }
}
