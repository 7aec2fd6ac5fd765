// Mapping between calendar dates and week-row indices

use crate::date::{CalendarDate, DayOfWeek, DAYS_PER_WEEK, MILLIS_IN_DAY, MILLIS_IN_WEEK};
use crate::error::{Error, Result};

/// Number of week rows between the row containing `from` and the row
/// containing `to`, where rows start on `first_day_of_week`.
///
/// Both dates are compared on their local wall-clock day, so a date just
/// across a DST transition (a different UTC offset) still lands in the
/// expected week.
pub fn weeks_between(
    from: &CalendarDate,
    to: &CalendarDate,
    first_day_of_week: DayOfWeek,
) -> Result<usize> {
    let start_millis = from.local_day_start_millis();
    let end_millis = to.local_day_start_millis();
    if end_millis < start_millis {
        return Err(Error::RangeOrder {
            from: *from,
            to: *to,
        });
    }

    // Shift the origin back to the first day of `from`'s week so its partial
    // leading week counts as row 0.
    let day_offset_millis = from.day_of_week().days_since(first_day_of_week) * MILLIS_IN_DAY;
    let weeks = (end_millis - start_millis + day_offset_millis) / MILLIS_IN_WEEK;
    Ok(weeks as usize)
}

/// First day drawn in row `row_index`: `min` plus that many weeks, walked
/// back to `first_day_of_week`. Keeps `min`'s time of day.
pub fn row_start_date(
    row_index: usize,
    min: &CalendarDate,
    first_day_of_week: DayOfWeek,
) -> Option<CalendarDate> {
    let weeks = i64::try_from(row_index).ok()?;
    let shifted = min.plus_weeks(weeks)?;
    let back = shifted.day_of_week().days_since(first_day_of_week);
    shifted.plus_days(-back)
}

/// Maps a horizontal pixel inside a row to a day offset in `0..days_per_week`.
///
/// Returns `None` for the reserved week-number cell and for coordinates
/// outside the row.
pub fn day_offset_from_row_start(
    x: i32,
    row_width: i32,
    num_cells: usize,
    shows_week_number: bool,
) -> Option<usize> {
    if num_cells == 0 || row_width <= 0 {
        return None;
    }
    let days_per_week = if shows_week_number {
        num_cells.checked_sub(1)?
    } else {
        num_cells
    };
    if days_per_week == 0 {
        return None;
    }

    let cells = i64::try_from(num_cells).ok()?;
    let day_start = if shows_week_number {
        i64::from(row_width) / cells
    } else {
        0
    };
    let x = i64::from(x);
    let width = i64::from(row_width);
    if x < day_start || x >= width {
        return None;
    }

    let days = i64::try_from(days_per_week).ok()?;
    let offset = (x - day_start) * days / (width - day_start);
    usize::try_from(offset).ok().filter(|&o| o < days_per_week)
}

/// Cell count for a row, including the week-number cell when shown.
pub fn cells_per_row(shows_week_number: bool) -> usize {
    let days = DAYS_PER_WEEK as usize;
    if shows_week_number {
        days + 1
    } else {
        days
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_same_date_is_row_zero_for_every_first_day() {
        let min = date(1900, 1, 1);
        for fdow in DayOfWeek::ALL {
            assert_eq!(weeks_between(&min, &min, fdow).unwrap(), 0, "{:?}", fdow);
        }
    }

    #[test]
    fn test_reversed_dates_fail() {
        let err = weeks_between(&date(2024, 3, 15), &date(2024, 3, 14), DayOfWeek::Sunday);
        assert!(matches!(err, Err(Error::RangeOrder { .. })));
    }

    #[test]
    fn test_partial_leading_week() {
        // 1900-01-01 is a Monday. With Sunday rows, Saturday Jan 6 is row 0
        // and Sunday Jan 7 starts row 1.
        let min = date(1900, 1, 1);
        assert_eq!(weeks_between(&min, &date(1900, 1, 6), DayOfWeek::Sunday).unwrap(), 0);
        assert_eq!(weeks_between(&min, &date(1900, 1, 7), DayOfWeek::Sunday).unwrap(), 1);
    }

    #[test]
    fn test_first_day_after_min_weekday() {
        // Monday min with Tuesday rows: Monday closes row 0.
        let min = date(1900, 1, 1);
        assert_eq!(weeks_between(&min, &date(1900, 1, 2), DayOfWeek::Tuesday).unwrap(), 1);
        assert_eq!(weeks_between(&min, &date(1900, 1, 8), DayOfWeek::Tuesday).unwrap(), 1);
        assert_eq!(weeks_between(&min, &date(1900, 1, 9), DayOfWeek::Tuesday).unwrap(), 2);
    }

    #[test]
    fn test_row_start_round_trip() {
        let min = date(2023, 12, 27);
        for fdow in DayOfWeek::ALL {
            for day in 0..60 {
                let d = min.plus_days(day).unwrap();
                let row = weeks_between(&min, &d, fdow).unwrap();
                let start = row_start_date(row, &min, fdow).unwrap();
                let next = row_start_date(row + 1, &min, fdow).unwrap();
                assert_eq!(start.day_of_week(), fdow);
                assert!(start.date_naive() <= d.date_naive(), "{:?} {}", fdow, d);
                assert!(d.date_naive() < next.date_naive(), "{:?} {}", fdow, d);
            }
        }
    }

    #[test]
    fn test_offset_change_lands_in_same_week() {
        // Same wall-clock day, one side in winter time and one in summer time.
        let winter = FixedOffset::east_opt(3600).unwrap();
        let summer = FixedOffset::east_opt(2 * 3600).unwrap();
        let min = CalendarDate::from_ymd_hms(2024, 3, 3, 0, 0, 0, winter).unwrap();
        let after_switch = CalendarDate::from_ymd_hms(2024, 3, 31, 0, 30, 0, summer).unwrap();
        // March 31 2024 is a Sunday: exactly four rows after March 3.
        assert_eq!(weeks_between(&min, &after_switch, DayOfWeek::Sunday).unwrap(), 4);
    }

    #[test]
    fn test_day_offset_with_week_number_cell() {
        // 8 cells of 10px; the first is the week number.
        assert_eq!(day_offset_from_row_start(5, 80, 8, true), None);
        assert_eq!(day_offset_from_row_start(10, 80, 8, true), Some(0));
        assert_eq!(day_offset_from_row_start(79, 80, 8, true), Some(6));
        assert_eq!(day_offset_from_row_start(80, 80, 8, true), None);
        assert_eq!(day_offset_from_row_start(-1, 80, 8, true), None);
    }

    #[test]
    fn test_day_offset_without_week_number_cell() {
        assert_eq!(day_offset_from_row_start(0, 70, 7, false), Some(0));
        assert_eq!(day_offset_from_row_start(35, 70, 7, false), Some(3));
        assert_eq!(day_offset_from_row_start(69, 70, 7, false), Some(6));
        assert_eq!(day_offset_from_row_start(10, 0, 7, false), None);
    }
}
