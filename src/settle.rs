// Debounced row snapping after free scrolling

use std::time::{Duration, Instant};

use crate::viewport::RealizedRow;

pub const DEFAULT_SETTLE_DELAY_MS: u64 = 40;

/// Collapses a burst of scroll-idle notifications into one settle.
#[derive(Debug, Clone)]
pub struct SettleDebouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl SettleDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Re-arms the timer; an earlier pending settle is pushed back.
    pub fn notify(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` exactly once when the delay has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for SettleDebouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_SETTLE_DELAY_MS))
    }
}

/// Scroll needed to snap the first realized row flush with the top edge:
/// back to its top when most of it is showing, otherwise past its bottom.
pub fn settle_delta(first: &RealizedRow) -> i32 {
    let top = first.top;
    let bottom = first.bottom();
    if top + bottom > 0 {
        top
    } else {
        bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(top: i32) -> RealizedRow {
        RealizedRow {
            index: 7,
            top,
            height: 40,
        }
    }

    #[test]
    fn test_burst_collapses_to_one_settle() {
        let start = Instant::now();
        let mut debouncer = SettleDebouncer::new(Duration::from_millis(40));
        debouncer.notify(start);
        debouncer.notify(start + Duration::from_millis(30));
        assert!(!debouncer.poll(start + Duration::from_millis(45)));
        assert!(debouncer.poll(start + Duration::from_millis(70)));
        assert!(!debouncer.poll(start + Duration::from_millis(100)));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut debouncer = SettleDebouncer::default();
        debouncer.notify(start);
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        assert!(!debouncer.poll(start + Duration::from_secs(1)));
    }

    #[test]
    fn test_settle_delta_direction() {
        // Mostly visible: scroll back so the row is flush.
        assert_eq!(settle_delta(&row(-10)), -10);
        // Mostly hidden: scroll it off.
        assert_eq!(settle_delta(&row(-30)), 10);
        assert_eq!(settle_delta(&row(0)), 0);
    }
}
