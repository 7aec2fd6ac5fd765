// Calendar widget: date range, selection and scroll navigation over a viewport

use chrono::Datelike;
use std::time::Instant;

use crate::config::Config;
use crate::date::{CalendarDate, DateField, DayOfWeek, DAYS_PER_WEEK};
use crate::date_index::{cells_per_row, day_offset_from_row_start, row_start_date};
use crate::date_range::DateRange;
use crate::error::Result;
use crate::planner::{ScrollPlanner, ScrollTarget, TickOutcome};
use crate::selection::{SelectionChange, SelectionChanged, SelectionState};
use crate::settle::{settle_delta, SettleDebouncer};
use crate::viewport::ViewportPort;

/// One week row as it should be drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekRow {
    pub index: usize,
    pub first_day: CalendarDate,
    pub week_number: u32,
    /// One cell per weekday starting at `first_day`; `None` outside the range.
    pub days: Vec<Option<CalendarDate>>,
    /// Cell holding the selected date, if this row has it.
    pub selected_cell: Option<usize>,
}

pub struct CalendarView<V: ViewportPort> {
    viewport: V,
    range: DateRange,
    first_day_of_week: DayOfWeek,
    show_week_number: bool,
    selection: SelectionState,
    planner: ScrollPlanner,
    settle: SettleDebouncer,
    adjustment_duration_ms: u32,
}

impl<V: ViewportPort> CalendarView<V> {
    /// Builds the view with the configured bounds resolved at `today`'s offset.
    pub fn new(config: &Config, viewport: V, today: CalendarDate) -> Result<Self> {
        let range = config.date_range(*today.as_datetime().offset())?;
        Self::with_range(config, range, viewport, today)
    }

    /// Selects `today` (or the nearer bound) and queues a centered jump to it,
    /// which completes once the viewport has laid out its first rows.
    pub fn with_range(config: &Config, range: DateRange, mut viewport: V, today: CalendarDate) -> Result<Self> {
        let first_day_of_week = config.first_day_of_week;
        let selection = SelectionState::new(range.clamp(&today), &range, first_day_of_week)?;
        viewport.set_row_count(range.total_row_count(first_day_of_week));

        let mut view = Self {
            viewport,
            range,
            first_day_of_week,
            show_week_number: config.show_week_number,
            selection,
            planner: ScrollPlanner::new(config.scroll_duration_ms, config.fading_edge_px),
            settle: SettleDebouncer::new(config.settle_delay()),
            adjustment_duration_ms: config.adjustment_scroll_duration_ms,
        };
        view.scroll_to_selection(false, true)?;
        Ok(view)
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    pub fn range(&self) -> &DateRange {
        &self.range
    }

    pub fn first_day_of_week(&self) -> DayOfWeek {
        self.first_day_of_week
    }

    pub fn show_week_number(&self) -> bool {
        self.show_week_number
    }

    pub fn selected_date(&self) -> &CalendarDate {
        self.selection.selected_date()
    }

    pub fn selected_row(&self) -> usize {
        self.selection.row_index()
    }

    pub fn selected_day_of_week(&self) -> DayOfWeek {
        self.selection.day_of_week()
    }

    pub fn total_row_count(&self) -> usize {
        self.range.total_row_count(self.first_day_of_week)
    }

    /// True while a navigation sequence is still converging.
    pub fn is_navigating(&self) -> bool {
        self.planner.is_active()
    }

    pub fn on_selection_changed<F>(&mut self, listener: F)
    where
        F: FnMut(&SelectionChanged) + 'static,
    {
        self.selection.subscribe(Box::new(listener));
    }

    pub fn select_date(&mut self, date: CalendarDate, animate: bool, center: bool) -> Result<SelectionChange> {
        if date.is_same_day(self.selection.selected_date()) {
            return Ok(SelectionChange::Unchanged);
        }
        let change = self.selection.select(date, &self.range, self.first_day_of_week)?;
        self.scroll_to_selection(animate, center)?;
        Ok(change)
    }

    /// Moves the selection by `amount` of `field` and scrolls to it, even when
    /// the day did not change.
    pub fn shift_selection(
        &mut self,
        field: DateField,
        amount: i32,
        animate: bool,
        center: bool,
    ) -> Result<SelectionChange> {
        let change = self
            .selection
            .shift_by(field, amount, &self.range, self.first_day_of_week)?;
        self.scroll_to_selection(animate, center)?;
        Ok(change)
    }

    pub fn set_min_date(&mut self, min: CalendarDate) -> Result<()> {
        if min.is_same_day(self.range.min()) {
            return Ok(());
        }
        self.range.set_min(min)?;
        self.apply_range_change()
    }

    pub fn set_max_date(&mut self, max: CalendarDate) -> Result<()> {
        if max.is_same_day(self.range.max()) {
            return Ok(());
        }
        self.range.set_max(max)?;
        self.apply_range_change()
    }

    pub fn set_range(&mut self, min: CalendarDate, max: CalendarDate) -> Result<()> {
        let range = DateRange::new(min, max)?;
        if min.is_same_day(self.range.min()) && max.is_same_day(self.range.max()) {
            return Ok(());
        }
        self.range = range;
        self.apply_range_change()
    }

    pub fn set_first_day_of_week(&mut self, day: DayOfWeek) -> Result<()> {
        if self.first_day_of_week == day {
            return Ok(());
        }
        log::debug!("First day of week {:?} -> {:?}", self.first_day_of_week, day);
        self.first_day_of_week = day;
        self.selection.reindex(&self.range, day)?;
        self.viewport.set_row_count(self.total_row_count());
        self.scroll_to_selection(false, false)
    }

    pub fn set_show_week_number(&mut self, show: bool) {
        if self.show_week_number != show {
            log::debug!("Week number cell {}", if show { "shown" } else { "hidden" });
            self.show_week_number = show;
        }
    }

    /// Resolves a tap at viewport coordinates and selects the date under it.
    /// Taps on the week-number cell, on blank out-of-range cells or outside
    /// any realized row change nothing.
    pub fn tap(&mut self, x: i32, y: i32) -> Result<SelectionChange> {
        self.on_touch();
        let hit = self
            .viewport
            .realized_rows()
            .iter()
            .find(|row| row.top <= y && y < row.bottom())
            .map(|row| row.index);
        let Some(date) = hit.and_then(|index| self.date_at(index, x)) else {
            return Ok(SelectionChange::Unchanged);
        };
        self.selection.select(date, &self.range, self.first_day_of_week)
    }

    /// Date drawn at horizontal pixel `x` of row `row_index`, if any.
    pub fn date_at(&self, row_index: usize, x: i32) -> Option<CalendarDate> {
        let offset = day_offset_from_row_start(
            x,
            self.viewport.width(),
            cells_per_row(self.show_week_number),
            self.show_week_number,
        )?;
        let date = row_start_date(row_index, self.range.min(), self.first_day_of_week)?
            .plus_days(offset as i64)?;
        self.range.contains(&date).then_some(date)
    }

    /// A touch stops any in-flight navigation.
    pub fn on_touch(&mut self) {
        self.planner.cancel();
        self.settle.cancel();
    }

    /// Free scrolling went idle; snap to a row once the burst is over.
    pub fn notify_scroll_idle(&mut self, now: Instant) {
        self.settle.notify(now);
    }

    /// Advances navigation by one frame and runs a due settle snap.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        let outcome = self.planner.tick(&mut self.viewport);
        if self.settle.poll(now) && !self.planner.is_active() {
            self.snap_to_row();
        }
        outcome
    }

    pub fn week_row(&self, index: usize) -> Option<WeekRow> {
        if index >= self.viewport.row_count() {
            return None;
        }
        let first_day = row_start_date(index, self.range.min(), self.first_day_of_week)?;
        let days = (0..DAYS_PER_WEEK)
            .map(|d| first_day.plus_days(d).filter(|date| self.range.contains(date)))
            .collect();
        let monday = first_day.plus_days(DayOfWeek::Monday.days_since(self.first_day_of_week))?;
        let selected_cell = self
            .selection
            .day_of_week_in_row(index)
            .map(|day| day.days_since(self.first_day_of_week) as usize);

        Some(WeekRow {
            index,
            first_day,
            week_number: monday.as_datetime().iso_week().week(),
            days,
            selected_cell,
        })
    }

    fn apply_range_change(&mut self) -> Result<()> {
        log::debug!("Range is now {} to {}", self.range.min(), self.range.max());
        self.selection.clamp_to(&self.range, self.first_day_of_week)?;
        self.viewport.set_row_count(self.total_row_count());
        self.scroll_to_selection(false, false)
    }

    fn scroll_to_selection(&mut self, animate: bool, center: bool) -> Result<()> {
        let count = self.viewport.row_count();
        if count == 0 {
            log::debug!("No rows to scroll to");
            return Ok(());
        }
        // A range aligned on the first day of week at both ends has no row
        // for max itself.
        let row = self.selection.row_index().min(count - 1);
        let target = ScrollTarget::new(row).animated(animate).centered(center);
        self.planner.request(target, &mut self.viewport)
    }

    fn snap_to_row(&mut self) {
        let Some(first) = self.viewport.realized_rows().first().copied() else {
            return;
        };
        let delta = settle_delta(&first);
        if delta != 0 {
            log::trace!("Settling row {} by {}px", first.index, delta);
            self.viewport.scroll_by(delta, self.adjustment_duration_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::SimulatedViewport;

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::from_ymd(y, m, d).unwrap()
    }

    fn view(today: CalendarDate) -> CalendarView<SimulatedViewport> {
        // 8 cells of 10px, rows of 50px.
        let viewport = SimulatedViewport::new(80, 300, 50);
        let mut view = CalendarView::new(&Config::default(), viewport, today).unwrap();
        view.viewport_mut().layout();
        view.tick(Instant::now());
        view
    }

    #[test]
    fn test_week_row_cells() {
        let view = view(date(2024, 3, 15));
        let row = view.week_row(view.selected_row()).unwrap();
        assert_eq!(row.first_day.date_naive(), date(2024, 3, 10).date_naive());
        assert_eq!(row.days.len(), 7);
        assert_eq!(row.selected_cell, Some(5));
        assert_eq!(row.week_number, 11);
    }

    #[test]
    fn test_leading_cells_blank_before_min() {
        let view = view(date(1900, 1, 3));
        let row = view.week_row(0).unwrap();
        // 1900-01-01 is a Monday: the Sunday cell is outside the range.
        assert!(row.days[0].is_none());
        assert_eq!(row.days[1].map(|d| d.day()), Some(1));
        assert!(view.week_row(view.viewport().row_count()).is_none());
    }

    #[test]
    fn test_tap_selects_cell() {
        let mut view = view(date(2024, 3, 15));
        let row = *view
            .viewport()
            .realized_rows()
            .iter()
            .find(|r| r.index == view.selected_row())
            .unwrap();
        // x=25 falls in the Monday column.
        let change = view.tap(25, row.top + 10).unwrap();
        assert_eq!(change, SelectionChange::Changed);
        assert_eq!(view.selected_date().date_naive(), date(2024, 3, 11).date_naive());
    }

    #[test]
    fn test_tap_week_number_cell_is_ignored() {
        let mut view = view(date(2024, 3, 15));
        let row = view.viewport().realized_rows()[0];
        assert_eq!(view.tap(5, row.top + 1).unwrap(), SelectionChange::Unchanged);
        assert_eq!(view.tap(5, 10_000).unwrap(), SelectionChange::Unchanged);
        assert_eq!(view.selected_date().date_naive(), date(2024, 3, 15).date_naive());
    }

    #[test]
    fn test_tap_blank_cell_before_min_is_ignored() {
        let mut view = view(date(1900, 1, 3));
        let row = *view.viewport().realized_rows().iter().find(|r| r.index == 0).unwrap();
        // Sunday cell of row 0 falls on 1899-12-31.
        assert_eq!(view.tap(15, row.top + 1).unwrap(), SelectionChange::Unchanged);
        assert_eq!(view.selected_date().day(), 3);
    }

    #[test]
    fn test_settle_snaps_first_row() {
        let mut view = view(date(2024, 3, 15));
        let start = Instant::now();
        view.viewport_mut().jump_to(100, 0);
        view.viewport_mut().drag_by(10);
        view.viewport_mut().take_commands();
        view.notify_scroll_idle(start);
        view.tick(start);
        assert!(view.viewport().commands().is_empty());
        view.tick(start + std::time::Duration::from_millis(50));
        assert_eq!(
            view.viewport().commands(),
            &[crate::viewport::ViewportCommand::ScrollBy { delta: -10, duration_ms: 500 }]
        );
    }
}
