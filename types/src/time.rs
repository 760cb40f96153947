//! Stamp timestamps and the clock they are checked against.
//!
//! Stamp timestamps are UTC digits, most significant unit first, at one of
//! three granularities: `YYMMDD`, `YYMMDDhhmm` or `YYMMDDhhmmss`. Two-digit
//! years pivot at 69: `69`..=`99` are 1969..=1999, `00`..=`68` are
//! 2000..=2068. A coarse timestamp stands for the start of its unit, so
//! `040806` is 2004-08-06T00:00:00Z.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::StampError;

/// Resolution of a stamp timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Granularity {
    /// `YYMMDD`
    Day,
    /// `YYMMDDhhmm`
    Minute,
    /// `YYMMDDhhmmss`
    Second,
}

impl Granularity {
    /// All granularities, coarsest first.
    pub const COARSEST_FIRST: [Granularity; 3] =
        [Granularity::Day, Granularity::Minute, Granularity::Second];

    /// Length of the unit in seconds.
    pub fn unit_secs(self) -> i64 {
        match self {
            Granularity::Day => 86_400,
            Granularity::Minute => 60,
            Granularity::Second => 1,
        }
    }

    fn digits(self) -> usize {
        match self {
            Granularity::Day => 6,
            Granularity::Minute => 10,
            Granularity::Second => 12,
        }
    }

    fn format(self) -> &'static str {
        match self {
            Granularity::Day => "%y%m%d",
            Granularity::Minute => "%y%m%d%H%M",
            Granularity::Second => "%y%m%d%H%M%S",
        }
    }

    fn from_digits(len: usize) -> Option<Self> {
        Self::COARSEST_FIRST.into_iter().find(|g| g.digits() == len)
    }
}

/// A decoded stamp timestamp: the start of a day, minute or second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StampTime {
    instant: DateTime<Utc>,
    granularity: Granularity,
}

impl StampTime {
    /// Round `instant` down to the start of its `granularity` unit.
    pub fn truncate(instant: DateTime<Utc>, granularity: Granularity) -> Self {
        let secs = instant.timestamp();
        let start = secs - secs.rem_euclid(granularity.unit_secs());
        let instant = DateTime::<Utc>::from_timestamp(start, 0).unwrap_or(instant);
        Self {
            instant,
            granularity,
        }
    }

    /// Decode timestamp digits.
    ///
    /// Only ASCII digits of length 6, 10 or 12 that name a real calendar
    /// time are accepted; no whitespace or separators.
    pub fn parse(text: &str) -> Result<Self, StampError> {
        let invalid = || StampError::InvalidTimestamp(text.to_string());

        let digits = text.as_bytes();
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(invalid());
        }
        let granularity = Granularity::from_digits(digits.len()).ok_or_else(invalid)?;
        let pair = |i: usize| u32::from(digits[i] - b'0') * 10 + u32::from(digits[i + 1] - b'0');

        let year = expand_year(pair(0));
        let date = NaiveDate::from_ymd_opt(year, pair(2), pair(4)).ok_or_else(invalid)?;
        let (hour, minute, second) = match granularity {
            Granularity::Day => (0, 0, 0),
            Granularity::Minute => (pair(6), pair(8), 0),
            Granularity::Second => (pair(6), pair(8), pair(10)),
        };
        let naive = date.and_hms_opt(hour, minute, second).ok_or_else(invalid)?;

        Ok(Self {
            instant: Utc.from_utc_datetime(&naive),
            granularity,
        })
    }

    /// The instant this timestamp denotes (start of its unit).
    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }
}

/// First two-digit year read as 19YY.
const CENTURY_PIVOT: u32 = 69;

fn expand_year(yy: u32) -> i32 {
    if yy >= CENTURY_PIVOT {
        1900 + yy as i32
    } else {
        2000 + yy as i32
    }
}

impl fmt::Display for StampTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.instant.format(self.granularity.format()))
    }
}

/// Source of "now" for minting and window checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
