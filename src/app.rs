// Interactive terminal calendar coordination

use chrono::Local;
use crossterm::event::{Event, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use crossterm::style::Color;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::calendar::{CalendarView, WeekRow};
use crate::config::Config;
use crate::date::{CalendarDate, DAYS_PER_WEEK};
use crate::date_index::cells_per_row;
use crate::error::Result;
use crate::keymap::{map_key, Action};
use crate::planner::TickOutcome;
use crate::selection::SelectionChanged;
use crate::statusline::{StatusInfo, StatusLine};
use crate::terminal::Terminal;
use crate::viewport::{SimulatedViewport, ViewportPort};

// One line of weekday names above the rows, status and message below.
const HEADER_LINES: u16 = 1;
const FOOTER_LINES: u16 = 2;

const FRAME: Duration = Duration::from_millis(16);
const IDLE_POLL: Duration = Duration::from_millis(250);

pub struct App {
    terminal: Terminal,
    calendar: CalendarView<SimulatedViewport>,
    statusline: StatusLine,
    shown_week_count: usize,
    animate: bool,
    center: bool,
    message: Option<String>,
    last_selection: Rc<RefCell<Option<SelectionChanged>>>,
    last_frame: Instant,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let terminal = Terminal::new()?;
        let shown_week_count = config.shown_week_count();
        let (width, height) = terminal.size();
        let (viewport_height, row_height) = row_geometry(height, shown_week_count);
        let viewport = SimulatedViewport::new(i32::from(width), viewport_height, row_height);

        let mut calendar = CalendarView::new(&config, viewport, today())?;
        let last_selection = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&last_selection);
        calendar.on_selection_changed(move |change| {
            *sink.borrow_mut() = Some(*change);
        });

        Ok(Self {
            terminal,
            calendar,
            statusline: StatusLine::new(),
            shown_week_count,
            animate: true,
            center: false,
            message: None,
            last_selection,
            last_frame: Instant::now(),
            should_quit: false,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            let busy = self.frame();
            self.render()?;

            if self.should_quit {
                break;
            }

            let timeout = if busy { FRAME } else { IDLE_POLL };
            if let Some(event) = self.terminal.read_event(timeout)? {
                self.handle_event(event)?;
            }
        }

        Ok(())
    }

    /// Advances the simulated list and the navigation state by the time
    /// since the last frame. Returns `true` while anything is still moving.
    fn frame(&mut self) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_millis();
        self.last_frame = now;

        let viewport = self.calendar.viewport_mut();
        let idle = viewport.advance(u32::try_from(elapsed).unwrap_or(u32::MAX));
        let outcome = self.calendar.tick(now);

        if let Some(change) = self.last_selection.borrow_mut().take() {
            self.message = Some(format!(
                "Selected {:04}-{:02}-{:02}",
                change.year, change.month, change.day_of_month
            ));
        }
        !idle || outcome != TickOutcome::Idle || self.calendar.is_navigating()
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => self.handle_key(key)?,
            Event::Mouse(mouse) => self.handle_mouse(mouse)?,
            Event::Resize(_, _) => {
                self.terminal.update_size()?;
                let (width, height) = self.terminal.size();
                let (viewport_height, row_height) = row_geometry(height, self.shown_week_count);
                self.calendar
                    .viewport_mut()
                    .resize(i32::from(width), viewport_height, row_height);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let action = map_key(key);
        let outcome = match action {
            Action::Shift(field, amount) => self
                .calendar
                .shift_selection(field, amount, self.animate, self.center)
                .map(|_| ()),
            Action::SelectToday => self
                .calendar
                .select_date(today(), self.animate, self.center)
                .map(|_| ()),
            Action::ScrollUp => {
                self.scroll_freely(-1);
                Ok(())
            }
            Action::ScrollDown => {
                self.scroll_freely(1);
                Ok(())
            }
            Action::ToggleAnimate => {
                self.animate = !self.animate;
                Ok(())
            }
            Action::ToggleCenter => {
                self.center = !self.center;
                Ok(())
            }
            Action::ToggleWeekNumber => {
                let show = !self.calendar.show_week_number();
                self.calendar.set_show_week_number(show);
                Ok(())
            }
            Action::CycleFirstDayOfWeek => {
                let next = self.calendar.first_day_of_week().plus(1);
                self.calendar.set_first_day_of_week(next)
            }
            Action::Quit => {
                self.should_quit = true;
                Ok(())
            }
            Action::None => Ok(()),
        };

        // Navigation past the range bounds is reported, not fatal.
        if let Err(e) = outcome {
            log::info!("{}", e);
            self.message = Some(e.to_string());
        }
        Ok(())
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if mouse.row >= HEADER_LINES => {
                let y = i32::from(mouse.row - HEADER_LINES);
                self.calendar.tap(i32::from(mouse.column), y)?;
            }
            MouseEventKind::ScrollUp => self.scroll_freely(-1),
            MouseEventKind::ScrollDown => self.scroll_freely(1),
            _ => {}
        }
        Ok(())
    }

    fn scroll_freely(&mut self, lines: i32) {
        self.calendar.on_touch();
        self.calendar.viewport_mut().drag_by(lines);
        self.calendar.notify_scroll_idle(Instant::now());
    }

    fn render(&mut self) -> Result<()> {
        self.terminal.clear_screen()?;
        self.render_header()?;
        self.render_rows()?;

        let (_, height) = self.terminal.size();
        let info = StatusInfo {
            selected: *self.calendar.selected_date(),
            shown: self.middle_date(),
            first_day_of_week: self.calendar.first_day_of_week(),
            animate: self.animate,
            center: self.center,
            navigating: self.calendar.is_navigating(),
        };
        self.statusline
            .render(&mut self.terminal, height.saturating_sub(FOOTER_LINES), &info)?;

        self.terminal.move_cursor(0, height.saturating_sub(1))?;
        if let Some(ref msg) = self.message {
            self.terminal.print(msg)?;
        }

        self.terminal.flush()?;
        Ok(())
    }

    fn render_header(&mut self) -> Result<()> {
        let columns = self.columns();
        let first_day = self.calendar.first_day_of_week();
        if self.calendar.show_week_number() {
            self.terminal.move_cursor(0, 0)?;
            self.terminal.print_colored("Wk", Color::DarkGrey)?;
        }
        for (cell, &(x, _)) in columns.iter().enumerate() {
            self.terminal.move_cursor(x, 0)?;
            let name = first_day.plus(cell as i64).short_name();
            self.terminal.print_colored(name, Color::Cyan)?;
        }
        Ok(())
    }

    /// Last in-range day of the middle realized row.
    fn middle_date(&self) -> Option<CalendarDate> {
        let rows = self.calendar.viewport().realized_rows();
        let middle = rows.get(rows.len() / 2)?;
        let week = self.calendar.week_row(middle.index)?;
        week.days.iter().flatten().last().copied()
    }

    fn render_rows(&mut self) -> Result<()> {
        let columns = self.columns();
        let viewport_height = self.calendar.viewport().height();
        // Rows are drawn on their top line only; one scrolled partly off the
        // top is left blank.
        let rows: Vec<(u16, WeekRow)> = self
            .calendar
            .viewport()
            .realized_rows()
            .iter()
            .filter(|row| row.top >= 0 && row.top < viewport_height)
            .filter_map(|row| {
                let top = u16::try_from(row.top).ok()?;
                Some((HEADER_LINES + top, self.calendar.week_row(row.index)?))
            })
            .collect();

        for (line, week) in rows {
            if self.calendar.show_week_number() {
                self.terminal.move_cursor(0, line)?;
                self.terminal
                    .print_colored(&format!("{:>2}", week.week_number), Color::DarkGrey)?;
            }
            for (cell, day) in week.days.iter().enumerate() {
                let Some(date) = day else { continue };
                let (x, _) = columns[cell];
                self.terminal.move_cursor(x, line)?;
                let label = day_label(date);
                if week.selected_cell == Some(cell) {
                    self.terminal.print_highlighted(&label)?;
                } else if date.month() % 2 == 0 {
                    self.terminal.print_colored(&label, Color::Grey)?;
                } else {
                    self.terminal.print(&label)?;
                }
            }
        }
        Ok(())
    }

    /// Left edge and width of each day column, matching how taps are mapped.
    fn columns(&self) -> Vec<(u16, u16)> {
        let width = self.calendar.viewport().width();
        let show_week_number = self.calendar.show_week_number();
        day_columns(width, cells_per_row(show_week_number) as i32, show_week_number)
    }
}

fn today() -> CalendarDate {
    CalendarDate::new(Local::now().fixed_offset())
}

fn day_label(date: &CalendarDate) -> String {
    if date.day() == 1 {
        date.as_datetime().format("%b").to_string()
    } else {
        format!("{:>2}", date.day())
    }
}

/// Viewport height and row height for a terminal `height` lines tall.
fn row_geometry(height: u16, shown_week_count: usize) -> (i32, i32) {
    let viewport_height = i32::from(height.saturating_sub(HEADER_LINES + FOOTER_LINES));
    let rows = i32::try_from(shown_week_count).unwrap_or(i32::MAX).max(1);
    (viewport_height, (viewport_height / rows).max(1))
}

/// Day column `d` spans `day_start + ceil(d * span / 7)` up to the next
/// column's start, so every x inside it maps back to `d`.
fn day_columns(width: i32, cells: i32, show_week_number: bool) -> Vec<(u16, u16)> {
    let day_start = if show_week_number { width / cells.max(1) } else { 0 };
    let span = (width - day_start).max(0);
    let left = |d: i64| day_start as i64 + (d * span as i64 + DAYS_PER_WEEK - 1) / DAYS_PER_WEEK;
    (0..DAYS_PER_WEEK)
        .map(|d| {
            let x = left(d);
            let w = left(d + 1) - x;
            (
                u16::try_from(x).unwrap_or(u16::MAX),
                u16::try_from(w).unwrap_or(0),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_index::day_offset_from_row_start;

    #[test]
    fn test_row_geometry() {
        assert_eq!(row_geometry(27, 6), (24, 4));
        assert_eq!(row_geometry(2, 6), (0, 1));
    }

    #[test]
    fn test_day_columns_agree_with_tap_mapping() {
        for &(width, show) in &[(80, true), (57, true), (43, false)] {
            let cells = cells_per_row(show);
            let columns = day_columns(width, cells as i32, show);
            for (d, &(x, w)) in columns.iter().enumerate() {
                for px in x..x + w {
                    assert_eq!(
                        day_offset_from_row_start(i32::from(px), width, cells, show),
                        Some(d),
                        "width {} px {}",
                        width,
                        px
                    );
                }
            }
        }
    }
}
