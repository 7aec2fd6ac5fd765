// Custom error types for Weekview

use std::io;

use crate::date::CalendarDate;

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Configuration(String),
    OutOfRange {
        date: CalendarDate,
        min: CalendarDate,
        max: CalendarDate,
    },
    RangeOrder {
        from: CalendarDate,
        to: CalendarDate,
    },
    IndexOutOfRange {
        index: usize,
        count: usize,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            Error::OutOfRange { date, min, max } => {
                write!(f, "Date {} not between {} and {}", date, min, max)
            }
            Error::RangeOrder { from, to } => {
                write!(f, "fromDate {} does not precede toDate {}", from, to)
            }
            Error::IndexOutOfRange { index, count } => {
                write!(f, "Row index {} out of range (row count {})", index, count)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
