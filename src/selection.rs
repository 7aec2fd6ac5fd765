// Selected-date tracking and change notification

use std::fmt;

use crate::date::{CalendarDate, DateField, DayOfWeek};
use crate::date_range::DateRange;
use crate::error::{Error, Result};

/// Payload delivered to selection listeners. `month` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChanged {
    pub year: i32,
    pub month: u32,
    pub day_of_month: u32,
}

impl From<&CalendarDate> for SelectionChanged {
    fn from(date: &CalendarDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day_of_month: date.day(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Changed,
    Unchanged,
}

impl SelectionChange {
    pub fn is_changed(self) -> bool {
        self == SelectionChange::Changed
    }
}

pub type SelectionListener = Box<dyn FnMut(&SelectionChanged)>;

pub struct SelectionState {
    selected: CalendarDate,
    row_index: usize,
    listeners: Vec<SelectionListener>,
}

impl SelectionState {
    /// Starts with `date` selected. No listener exists yet, so nothing is emitted.
    pub fn new(date: CalendarDate, range: &DateRange, first_day_of_week: DayOfWeek) -> Result<Self> {
        range.check_contains(&date)?;
        let row_index = range.row_of(&date, first_day_of_week)?;
        Ok(Self {
            selected: date,
            row_index,
            listeners: Vec::new(),
        })
    }

    pub fn selected_date(&self) -> &CalendarDate {
        &self.selected
    }

    pub fn row_index(&self) -> usize {
        self.row_index
    }

    pub fn day_of_week(&self) -> DayOfWeek {
        self.selected.day_of_week()
    }

    /// The selected weekday if `row` holds the selection.
    pub fn day_of_week_in_row(&self, row: usize) -> Option<DayOfWeek> {
        (row == self.row_index).then(|| self.day_of_week())
    }

    pub fn subscribe(&mut self, listener: SelectionListener) {
        self.listeners.push(listener);
    }

    pub fn select(
        &mut self,
        date: CalendarDate,
        range: &DateRange,
        first_day_of_week: DayOfWeek,
    ) -> Result<SelectionChange> {
        if date.is_same_day(&self.selected) {
            return Ok(SelectionChange::Unchanged);
        }
        range.check_contains(&date)?;

        self.row_index = range.row_of(&date, first_day_of_week)?;
        self.selected = date;
        log::info!("Selected {} (row {})", self.selected, self.row_index);
        self.notify();
        Ok(SelectionChange::Changed)
    }

    pub fn shift_by(
        &mut self,
        field: DateField,
        amount: i32,
        range: &DateRange,
        first_day_of_week: DayOfWeek,
    ) -> Result<SelectionChange> {
        let target = self.shifted_target(field, amount, range)?;
        self.select(target, range, first_day_of_week)
    }

    /// The date `amount` of `field` away from the selection.
    pub fn shifted_target(
        &self,
        field: DateField,
        amount: i32,
        range: &DateRange,
    ) -> Result<CalendarDate> {
        let target = self.selected.shifted(field, amount).ok_or(Error::OutOfRange {
            date: self.selected,
            min: *range.min(),
            max: *range.max(),
        })?;
        range.check_contains(&target)?;
        Ok(target)
    }

    /// Pulls the selection back inside `range` after a bound moved. Emits a
    /// single notification when the date had to change.
    pub fn clamp_to(
        &mut self,
        range: &DateRange,
        first_day_of_week: DayOfWeek,
    ) -> Result<SelectionChange> {
        if range.contains(&self.selected) {
            self.reindex(range, first_day_of_week)?;
            return Ok(SelectionChange::Unchanged);
        }
        let bound = range.clamp(&self.selected);
        self.row_index = range.row_of(&bound, first_day_of_week)?;
        self.selected = bound;
        log::info!("Selection clamped to {}", self.selected);
        self.notify();
        Ok(SelectionChange::Changed)
    }

    /// Recomputes the row index after the min date or first day of week changed.
    pub fn reindex(&mut self, range: &DateRange, first_day_of_week: DayOfWeek) -> Result<()> {
        self.row_index = range.row_of(&self.selected, first_day_of_week)?;
        Ok(())
    }

    fn notify(&mut self) {
        let event = SelectionChanged::from(&self.selected);
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}

impl fmt::Debug for SelectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionState")
            .field("selected", &self.selected)
            .field("row_index", &self.row_index)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::from_ymd(y, m, d).unwrap()
    }

    fn setup() -> (SelectionState, DateRange, Rc<RefCell<Vec<SelectionChanged>>>) {
        let range = DateRange::new(date(1900, 1, 1), date(2100, 1, 1)).unwrap();
        let mut state = SelectionState::new(date(2024, 1, 1), &range, DayOfWeek::Sunday).unwrap();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        state.subscribe(Box::new(move |event| sink.borrow_mut().push(*event)));
        (state, range, events)
    }

    #[test]
    fn test_select_is_idempotent() {
        let (mut state, range, events) = setup();
        let target = date(2024, 3, 15);
        assert_eq!(state.select(target, &range, DayOfWeek::Sunday).unwrap(), SelectionChange::Changed);
        assert_eq!(state.select(target, &range, DayOfWeek::Sunday).unwrap(), SelectionChange::Unchanged);
        assert_eq!(
            events.borrow().as_slice(),
            &[SelectionChanged { year: 2024, month: 3, day_of_month: 15 }]
        );
    }

    #[test]
    fn test_select_out_of_range_keeps_state() {
        let (mut state, range, events) = setup();
        let result = state.select(date(2200, 1, 1), &range, DayOfWeek::Sunday);
        assert!(matches!(result, Err(Error::OutOfRange { .. })));
        assert_eq!(*state.selected_date(), date(2024, 1, 1));
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_select_updates_row_and_weekday() {
        let (mut state, range, _) = setup();
        state.select(date(2024, 3, 15), &range, DayOfWeek::Sunday).unwrap();
        assert_eq!(state.day_of_week(), DayOfWeek::Friday);
        let row = state.row_index();
        assert_eq!(state.day_of_week_in_row(row), Some(DayOfWeek::Friday));
        assert_eq!(state.day_of_week_in_row(row + 1), None);
    }

    #[test]
    fn test_shift_by_month() {
        let (mut state, range, events) = setup();
        state.shift_by(DateField::Month, 2, &range, DayOfWeek::Sunday).unwrap();
        assert_eq!(*state.selected_date(), date(2024, 3, 1));
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn test_shift_past_bound_fails() {
        let (mut state, range, events) = setup();
        let result = state.shift_by(DateField::Year, 200, &range, DayOfWeek::Sunday);
        assert!(matches!(result, Err(Error::OutOfRange { .. })));
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_clamp_to_new_max() {
        let (mut state, mut range, events) = setup();
        range.set_max(date(2023, 6, 30)).unwrap();
        assert_eq!(state.clamp_to(&range, DayOfWeek::Sunday).unwrap(), SelectionChange::Changed);
        assert_eq!(*state.selected_date(), date(2023, 6, 30));
        assert_eq!(events.borrow().len(), 1);

        assert_eq!(state.clamp_to(&range, DayOfWeek::Sunday).unwrap(), SelectionChange::Unchanged);
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn test_reindex_after_first_day_change() {
        let (mut state, range, _) = setup();
        // 2023-12-31 (Sunday) and 2024-01-01 (Monday) share a Sunday row but
        // not a Monday row.
        state.select(date(2023, 12, 31), &range, DayOfWeek::Sunday).unwrap();
        let sunday_row = state.row_index();
        state.reindex(&range, DayOfWeek::Monday).unwrap();
        let monday_row = state.row_index();
        assert_eq!(monday_row, range.row_of(&date(2023, 12, 31), DayOfWeek::Monday).unwrap());
        assert_eq!(range.row_of(&date(2024, 1, 1), DayOfWeek::Monday).unwrap(), monday_row + 1);
        assert_eq!(range.row_of(&date(2024, 1, 1), DayOfWeek::Sunday).unwrap(), sunday_row);
    }
}
