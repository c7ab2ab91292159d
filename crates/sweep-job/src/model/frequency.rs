//! Job run frequency.

use std::num::NonZeroU64;
use std::time::Duration;

const SECONDS_PER_MINUTE: u64 = 60;

/// How often the job runs, stored in seconds and shown in minutes.
///
/// There is no zero frequency: an empty or zero value means "unset" and is
/// represented as `Option::<Frequency>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Frequency(NonZeroU64);

impl Frequency {
    /// Creates a frequency from seconds; zero yields `None`.
    pub fn from_seconds(seconds: u64) -> Option<Self> {
        NonZeroU64::new(seconds).map(Self)
    }

    /// Parses operator input in minutes.
    ///
    /// Blank input and `0` are the unset state. Anything other than a whole,
    /// non-negative number of minutes is rejected with a short reason.
    pub fn parse_minutes(input: &str) -> Result<Option<Self>, String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }

        let minutes: u64 = input
            .parse()
            .map_err(|_| format!("{input:?} is not a whole number"))?;
        let seconds = minutes
            .checked_mul(SECONDS_PER_MINUTE)
            .ok_or_else(|| format!("{minutes} minutes is too large"))?;

        Ok(Self::from_seconds(seconds))
    }

    /// Renders an optional frequency for display; unset renders as empty.
    pub fn display_minutes(frequency: Option<Self>) -> String {
        frequency
            .map(|frequency| frequency.minutes().to_string())
            .unwrap_or_default()
    }

    /// Returns the frequency in seconds.
    pub fn seconds(self) -> u64 {
        self.0.get()
    }

    /// Returns the frequency in whole minutes, rounded up.
    ///
    /// A set frequency never renders as `0`, which would read back as unset.
    pub fn minutes(self) -> u64 {
        self.0.get().div_ceil(SECONDS_PER_MINUTE)
    }

    /// Returns the frequency as a duration.
    pub fn as_duration(self) -> Duration {
        Duration::from_secs(self.0.get())
    }
}
