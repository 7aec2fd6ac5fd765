// Min/max bounds of the scrollable calendar

use crate::date::{CalendarDate, DayOfWeek};
use crate::date_index::weeks_between;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    min: CalendarDate,
    max: CalendarDate,
}

impl DateRange {
    pub fn new(min: CalendarDate, max: CalendarDate) -> Result<Self> {
        Self::check_order(&min, &max)?;
        Ok(Self { min, max })
    }

    fn check_order(min: &CalendarDate, max: &CalendarDate) -> Result<()> {
        if max.date_naive() < min.date_naive() {
            return Err(Error::Configuration(format!(
                "Max date {} cannot be before min date {}",
                max, min
            )));
        }
        Ok(())
    }

    pub fn min(&self) -> &CalendarDate {
        &self.min
    }

    pub fn max(&self) -> &CalendarDate {
        &self.max
    }

    pub fn set_min(&mut self, min: CalendarDate) -> Result<()> {
        Self::check_order(&min, &self.max)?;
        self.min = min;
        Ok(())
    }

    pub fn set_max(&mut self, max: CalendarDate) -> Result<()> {
        Self::check_order(&self.min, &max)?;
        self.max = max;
        Ok(())
    }

    /// Day-granularity containment: the time of day is ignored.
    pub fn contains(&self, date: &CalendarDate) -> bool {
        let day = date.date_naive();
        self.min.date_naive() <= day && day <= self.max.date_naive()
    }

    /// The bound nearest to `date` when it lies outside the range.
    pub fn clamp(&self, date: &CalendarDate) -> CalendarDate {
        if date.date_naive() < self.min.date_naive() {
            self.min
        } else if date.date_naive() > self.max.date_naive() {
            self.max
        } else {
            *date
        }
    }

    pub fn check_contains(&self, date: &CalendarDate) -> Result<()> {
        if self.contains(date) {
            Ok(())
        } else {
            Err(Error::OutOfRange {
                date: *date,
                min: self.min,
                max: self.max,
            })
        }
    }

    /// Rows needed to show the range. One extra row is added when either
    /// bound is off the first day of week; a range misaligned at both ends
    /// still only gets one.
    pub fn total_row_count(&self, first_day_of_week: DayOfWeek) -> usize {
        let mut count = weeks_between(&self.min, &self.max, first_day_of_week).unwrap_or(0);
        if self.min.day_of_week() != first_day_of_week
            || self.max.day_of_week() != first_day_of_week
        {
            count += 1;
        }
        count
    }

    /// Row index of `date`, measured from the row containing `min`.
    pub fn row_of(&self, date: &CalendarDate, first_day_of_week: DayOfWeek) -> Result<usize> {
        weeks_between(&self.min, date, first_day_of_week)
    }
}
