// Weekview - an infinitely scrolling week-row calendar engine
// Module declarations

pub mod app;
pub mod calendar;
pub mod config;
pub mod date;
pub mod date_index;
pub mod date_range;
pub mod error;
pub mod keymap;
pub mod planner;
pub mod selection;
pub mod settle;
pub mod statusline;
pub mod terminal;
pub mod viewport;

// Re-export commonly used types
pub use calendar::{CalendarView, WeekRow};
pub use config::Config;
pub use date::{CalendarDate, DateField, DayOfWeek};
pub use date_range::DateRange;
pub use error::{Error, Result};
pub use planner::{ScrollPlanner, ScrollTarget, TickOutcome};
pub use selection::{SelectionChange, SelectionChanged};
pub use viewport::{RealizedRow, SimulatedViewport, ViewportCommand, ViewportPort};
