// Calendar date values and weekday arithmetic

use chrono::{
    DateTime, Datelike, FixedOffset, Months, NaiveDate, NaiveDateTime, TimeDelta, TimeZone,
    Weekday,
};
use serde::Deserialize;
use std::fmt;

pub const DAYS_PER_WEEK: i64 = 7;
pub const MILLIS_IN_DAY: i64 = 86_400_000;
pub const MILLIS_IN_WEEK: i64 = DAYS_PER_WEEK * MILLIS_IN_DAY;

/// Day of the week, numbered Sunday = 1 through Saturday = 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Sunday,
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
    ];

    pub fn number(self) -> i64 {
        match self {
            DayOfWeek::Sunday => 1,
            DayOfWeek::Monday => 2,
            DayOfWeek::Tuesday => 3,
            DayOfWeek::Wednesday => 4,
            DayOfWeek::Thursday => 5,
            DayOfWeek::Friday => 6,
            DayOfWeek::Saturday => 7,
        }
    }

    pub fn from_weekday(weekday: Weekday) -> Self {
        Self::ALL[weekday.num_days_from_sunday() as usize]
    }

    pub fn to_weekday(self) -> Weekday {
        match self {
            DayOfWeek::Sunday => Weekday::Sun,
            DayOfWeek::Monday => Weekday::Mon,
            DayOfWeek::Tuesday => Weekday::Tue,
            DayOfWeek::Wednesday => Weekday::Wed,
            DayOfWeek::Thursday => Weekday::Thu,
            DayOfWeek::Friday => Weekday::Fri,
            DayOfWeek::Saturday => Weekday::Sat,
        }
    }

    /// Days to walk back from `start` to reach `self`, always in `0..7`.
    pub fn days_since(self, start: DayOfWeek) -> i64 {
        (self.number() - start.number()).rem_euclid(DAYS_PER_WEEK)
    }

    /// The weekday `days` after this one.
    pub fn plus(self, days: i64) -> DayOfWeek {
        Self::ALL[(self.number() - 1 + days).rem_euclid(DAYS_PER_WEEK) as usize]
    }

    pub fn short_name(self) -> &'static str {
        match self {
            DayOfWeek::Sunday => "Su",
            DayOfWeek::Monday => "Mo",
            DayOfWeek::Tuesday => "Tu",
            DayOfWeek::Wednesday => "We",
            DayOfWeek::Thursday => "Th",
            DayOfWeek::Friday => "Fr",
            DayOfWeek::Saturday => "Sa",
        }
    }
}

impl Default for DayOfWeek {
    fn default() -> Self {
        DayOfWeek::Sunday
    }
}

/// Calendar unit used for relative navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Day,
    Week,
    Month,
    Year,
}

/// An instant pinned to a UTC offset, viewed as a calendar date.
///
/// Equality and ordering compare instants. Use [`CalendarDate::is_same_day`]
/// for day-granularity comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(DateTime<FixedOffset>);

impl CalendarDate {
    pub fn new(instant: DateTime<FixedOffset>) -> Self {
        Self(instant)
    }

    /// Midnight UTC on the given day.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        let offset = FixedOffset::east_opt(0)?;
        Self::from_ymd_hms(year, month, day, 0, 0, 0, offset)
    }

    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        offset: FixedOffset,
    ) -> Option<Self> {
        let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
        Self::from_local(naive, offset)
    }

    pub fn from_local(naive: NaiveDateTime, offset: FixedOffset) -> Option<Self> {
        offset.from_local_datetime(&naive).single().map(Self)
    }

    /// Parses a date-only string (e.g. `"%m/%d/%Y"`) as local midnight at `offset`.
    pub fn parse(input: &str, format: &str, offset: FixedOffset) -> Option<Self> {
        let date = NaiveDate::parse_from_str(input.trim(), format).ok()?;
        Self::from_local(date.and_hms_opt(0, 0, 0)?, offset)
    }

    pub fn as_datetime(&self) -> &DateTime<FixedOffset> {
        &self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month of year, 1-based.
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn ordinal(&self) -> u32 {
        self.0.ordinal()
    }

    pub fn day_of_week(&self) -> DayOfWeek {
        DayOfWeek::from_weekday(self.0.weekday())
    }

    pub fn date_naive(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Milliseconds since the epoch as seen on a wall clock at this date's offset.
    pub fn local_millis(&self) -> i64 {
        self.0.timestamp_millis() + i64::from(self.0.offset().local_minus_utc()) * 1000
    }

    /// Local millis truncated to the start of the local day.
    pub fn local_day_start_millis(&self) -> i64 {
        self.local_millis().div_euclid(MILLIS_IN_DAY) * MILLIS_IN_DAY
    }

    pub fn is_same_day(&self, other: &CalendarDate) -> bool {
        self.year() == other.year() && self.ordinal() == other.ordinal()
    }

    pub fn plus_days(self, days: i64) -> Option<Self> {
        let delta = TimeDelta::try_days(days)?;
        self.0.checked_add_signed(delta).map(Self)
    }

    pub fn plus_weeks(self, weeks: i64) -> Option<Self> {
        self.plus_days(weeks.checked_mul(DAYS_PER_WEEK)?)
    }

    pub fn plus_months(self, months: i64) -> Option<Self> {
        let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
        if months >= 0 {
            self.0.checked_add_months(magnitude).map(Self)
        } else {
            self.0.checked_sub_months(magnitude).map(Self)
        }
    }

    /// Adds `amount` of `field`, keeping the time of day. Month and year
    /// shifts clamp to the last day of a shorter month.
    pub fn shifted(self, field: DateField, amount: i32) -> Option<Self> {
        let amount = i64::from(amount);
        match field {
            DateField::Day => self.plus_days(amount),
            DateField::Week => self.plus_weeks(amount),
            DateField::Month => self.plus_months(amount),
            DateField::Year => self.plus_months(amount.checked_mul(12)?),
        }
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}
