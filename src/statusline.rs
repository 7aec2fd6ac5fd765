// Status line rendering

use crossterm::style::Color;

use crate::date::{CalendarDate, DayOfWeek};
use crate::terminal::Terminal;

/// What the status line reports about the calendar.
#[derive(Debug, Clone, Copy)]
pub struct StatusInfo {
    pub selected: CalendarDate,
    /// A date from the middle of the screen, for the month/year title.
    pub shown: Option<CalendarDate>,
    pub first_day_of_week: DayOfWeek,
    pub animate: bool,
    pub center: bool,
    pub navigating: bool,
}

pub struct StatusLine;

impl StatusLine {
    pub fn new() -> Self {
        Self
    }

    /// Builds the line padded to `width` columns.
    pub fn compose(&self, info: &StatusInfo, width: usize) -> String {
        let title = info
            .shown
            .map(|date| date.as_datetime().format("%B %Y | ").to_string())
            .unwrap_or_default();
        let left = format!(
            " {}{} {} ",
            title,
            info.selected.day_of_week().short_name(),
            info.selected
        );
        let mut flags = Vec::new();
        if info.animate {
            flags.push("anim");
        }
        if info.center {
            flags.push("center");
        }
        if info.navigating {
            flags.push("...");
        }
        let right = format!(
            " {} | week starts {:?} ",
            flags.join(" "),
            info.first_day_of_week
        );

        let used = left.chars().count() + right.chars().count();
        let padding = " ".repeat(width.saturating_sub(used));
        let line: String = format!("{}{}{}", left, padding, right);
        line.chars().take(width).collect()
    }

    pub fn render(&self, terminal: &mut Terminal, row: u16, info: &StatusInfo) -> crate::error::Result<()> {
        let (width, _) = terminal.size();
        let text = self.compose(info, width as usize);
        terminal.move_cursor(0, row)?;
        terminal.print_bar(&text, Color::Black, Color::Blue)?;
        Ok(())
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> StatusInfo {
        StatusInfo {
            selected: CalendarDate::from_ymd(2024, 3, 15).unwrap(),
            shown: None,
            first_day_of_week: DayOfWeek::Monday,
            animate: true,
            center: false,
            navigating: false,
        }
    }

    #[test]
    fn test_compose_fills_width() {
        let line = StatusLine::new().compose(&info(), 60);
        assert_eq!(line.chars().count(), 60);
        assert!(line.starts_with(" Fr 2024-03-15 "));
        assert!(line.ends_with(" anim | week starts Monday "));
    }

    #[test]
    fn test_compose_shows_month_title() {
        let mut info = info();
        info.shown = CalendarDate::from_ymd(2031, 7, 4);
        let line = StatusLine::new().compose(&info, 80);
        assert!(line.starts_with(" July 2031 | Fr 2024-03-15 "));
    }

    #[test]
    fn test_compose_truncates() {
        let line = StatusLine::new().compose(&info(), 10);
        assert_eq!(line, " Fr 2024-0");
    }
}
