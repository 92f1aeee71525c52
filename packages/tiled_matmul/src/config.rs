use std::num::NonZero;
use std::str::FromStr;

use argh::{EarlyExit, FromArgs};
use new_zealand::nz;

use crate::{ArgumentError, Schedule};

/// Tile height used by the quick sweep.
pub const QUICK_CHUNK: NonZero<usize> = nz!(16);

/// Schedule used by the quick sweep.
pub const QUICK_SCHEDULE: Schedule = Schedule::Static;

const DEFAULT_SIZES: [NonZero<usize>; 3] = [nz!(256), nz!(512), nz!(1024)];
const DEFAULT_THREADS: [NonZero<usize>; 4] = [nz!(1), nz!(2), nz!(4), nz!(8)];
const DEFAULT_CHUNKS: [NonZero<usize>; 3] = [nz!(1), nz!(16), nz!(64)];

/// Benchmarks parallel matrix multiplication with row tiles distributed under static or dynamic
/// scheduling. Prints one CSV row per experiment unless --verbose is given.
#[derive(Debug, FromArgs)]
#[argh(
    example = "{command_name} -s 512,1024 -t 4,8",
    example = "{command_name} --sizes 256,512,1024 --threads 2,4,8 --chunk 8,16",
    example = "{command_name} -a -v",
    note = "Without --all, every size and thread count is measured with chunk 16 and the static schedule.",
    error_code(1, "Invalid arguments, or no experiment could be completed."),
    help_triggers("-h", "--help")
)]
pub struct Args {
    /// matrix sizes, comma-separated (default: 256,512,1024)
    #[argh(option, short = 's')]
    sizes: Option<PositiveList>,

    /// thread counts, comma-separated (default: 1,2,4,8)
    #[argh(option, short = 't')]
    threads: Option<PositiveList>,

    /// chunk sizes in rows, comma-separated (default: 1,16,64)
    #[argh(option, short = 'c')]
    chunk: Option<PositiveList>,

    /// schedule types, comma-separated from static,dynamic (default: static)
    #[argh(option)]
    schedule: Option<ScheduleList>,

    /// run every combination of size, schedule, chunk and thread count
    #[argh(switch, short = 'a')]
    all: bool,

    /// print human-readable lines instead of CSV
    #[argh(switch, short = 'v')]
    verbose: bool,
}

/// A comma-separated list of positive integers, such as `256,512,1024`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositiveList(Vec<NonZero<usize>>);

impl PositiveList {
    /// The parsed values, in command line order.
    #[must_use]
    pub fn values(&self) -> &[NonZero<usize>] {
        &self.0
    }
}

impl FromStr for PositiveList {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = split_list(s)?
            .map(|item| {
                let value = item
                    .parse::<usize>()
                    .map_err(|_| ArgumentError::InvalidNumber {
                        value: item.to_owned(),
                    })?;

                NonZero::new(value).ok_or(ArgumentError::ZeroValue)
            })
            .collect::<Result<_, _>>()?;

        Ok(Self(values))
    }
}

/// A comma-separated list of schedule names, such as `static,dynamic`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScheduleList(Vec<Schedule>);

impl ScheduleList {
    /// The parsed schedules, in command line order.
    #[must_use]
    pub fn values(&self) -> &[Schedule] {
        &self.0
    }
}

impl FromStr for ScheduleList {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(
            split_list(s)?
                .map(str::parse)
                .collect::<Result<_, _>>()?,
        ))
    }
}

fn split_list(s: &str) -> Result<impl Iterator<Item = &str>, ArgumentError> {
    if s.trim().is_empty() {
        return Err(ArgumentError::EmptyList);
    }

    Ok(s.split(',').map(str::trim))
}

/// Whether to run the quick or the comprehensive sweep.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Sweep {
    /// Every size and thread count at [`QUICK_CHUNK`] and [`QUICK_SCHEDULE`].
    Quick,

    /// Every combination of size, schedule, chunk and thread count, nested in that order.
    Comprehensive,
}

/// A validated benchmark configuration.
///
/// # Examples
///
/// ```
/// use tiled_matmul::{Config, Sweep};
///
/// let config = Config::parse("tiled_matmul", &["-s", "64,128", "--all"]).unwrap();
///
/// assert_eq!(config.sizes().len(), 2);
/// assert_eq!(config.sweep(), Sweep::Comprehensive);
/// assert!(!config.verbose());
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    sizes: Vec<NonZero<usize>>,
    threads: Vec<NonZero<usize>>,
    chunks: Vec<NonZero<usize>>,
    schedules: Vec<Schedule>,
    sweep: Sweep,
    verbose: bool,
}

impl Config {
    /// Parses command line arguments, not including the program name.
    ///
    /// # Errors
    ///
    /// Returns the [`EarlyExit`] produced by `argh`. Its status is `Ok` when help was requested
    /// and `Err` when the arguments are invalid.
    pub fn parse(command_name: &str, args: &[&str]) -> Result<Self, EarlyExit> {
        Args::from_args(&[command_name], args).map(Self::from)
    }

    /// Matrix sides to measure.
    #[must_use]
    pub fn sizes(&self) -> &[NonZero<usize>] {
        &self.sizes
    }

    /// Worker counts to measure.
    #[must_use]
    pub fn threads(&self) -> &[NonZero<usize>] {
        &self.threads
    }

    /// Tile heights to measure in the comprehensive sweep.
    #[must_use]
    pub fn chunks(&self) -> &[NonZero<usize>] {
        &self.chunks
    }

    /// Schedules to measure in the comprehensive sweep.
    #[must_use]
    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    /// Which sweep to run.
    #[must_use]
    pub fn sweep(&self) -> Sweep {
        self.sweep
    }

    /// Whether results are printed as human-readable lines instead of CSV.
    #[must_use]
    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
            threads: DEFAULT_THREADS.to_vec(),
            chunks: DEFAULT_CHUNKS.to_vec(),
            schedules: vec![Schedule::Static],
            sweep: Sweep::Quick,
            verbose: false,
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let defaults = Self::default();

        Self {
            sizes: args.sizes.map_or(defaults.sizes, |list| list.0),
            threads: args.threads.map_or(defaults.threads, |list| list.0),
            chunks: args.chunk.map_or(defaults.chunks, |list| list.0),
            schedules: args.schedule.map_or(defaults.schedules, |list| list.0),
            sweep: if args.all {
                Sweep::Comprehensive
            } else {
                Sweep::Quick
            },
            verbose: args.verbose,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_gives_defaults() {
        assert_eq!(Config::parse("tiled_matmul", &[]).unwrap(), Config::default());
    }

    #[test]
    fn positive_list_accepts_spaces() {
        let list: PositiveList = "1, 2 ,3".parse().unwrap();

        assert_eq!(list.values(), [nz!(1), nz!(2), nz!(3)]);
    }

    #[test]
    fn positive_list_rejects_bad_values() {
        assert_eq!("".parse::<PositiveList>(), Err(ArgumentError::EmptyList));
        assert_eq!("4,0".parse::<PositiveList>(), Err(ArgumentError::ZeroValue));
        assert_eq!(
            "4,x".parse::<PositiveList>(),
            Err(ArgumentError::InvalidNumber {
                value: "x".to_owned()
            })
        );
        assert_eq!(
            "4,,8".parse::<PositiveList>(),
            Err(ArgumentError::InvalidNumber {
                value: String::new()
            })
        );
        assert!("-4".parse::<PositiveList>().is_err());
    }

    #[test]
    fn schedule_list_keeps_order() {
        let list: ScheduleList = "dynamic,static".parse().unwrap();

        assert_eq!(list.values(), [Schedule::Dynamic, Schedule::Static]);
    }

    #[test]
    fn schedule_list_rejects_unknown_names() {
        assert!(matches!(
            "static,guided".parse::<ScheduleList>(),
            Err(ArgumentError::UnknownSchedule { name }) if name == "guided"
        ));
    }
}
