// Incremental scroll-to-row planning over a virtualized viewport
//
// Only the realized window has known geometry, so every tick re-observes the
// window, derives one bounded scroll command and waits for the viewport to
// realize more rows before deciding again.

use crate::error::{Error, Result};
use crate::viewport::{RealizedRow, ViewportPort};

pub const DEFAULT_SCROLL_DURATION_MS: u32 = 200;

/// Where a navigation request wants a row to end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollTarget {
    pub row: usize,
    pub top_offset: i32,
    pub animate: bool,
    pub center: bool,
}

impl ScrollTarget {
    pub fn new(row: usize) -> Self {
        Self {
            row,
            top_offset: 0,
            animate: false,
            center: false,
        }
    }

    pub fn animated(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    pub fn centered(mut self, center: bool) -> Self {
        self.center = center;
        self
    }

    pub fn with_top_offset(mut self, top_offset: i32) -> Self {
        self.top_offset = top_offset;
        self
    }

    fn is_positioned(&self) -> bool {
        self.center || self.top_offset != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing is in flight.
    Idle,
    /// Another tick is needed once the viewport has moved.
    Continue,
    /// The request converged on this tick.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScrollCommand {
    delta: i32,
    duration_ms: u32,
}

#[derive(Debug, Clone, Copy)]
struct Travel {
    target: usize,
    direction: Direction,
    last_seen: Option<usize>,
    step_duration_ms: u32,
    last_command: Option<ScrollCommand>,
}

impl Travel {
    fn new(target: usize, direction: Direction, step_duration_ms: u32) -> Self {
        Self {
            target,
            direction,
            last_seen: None,
            step_duration_ms,
            last_command: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Plan {
    Idle,
    Deferred(ScrollTarget),
    Walk(Travel),
    Converge { travel: Travel, offset: i32 },
}

#[derive(Debug)]
pub struct ScrollPlanner {
    scroll_duration_ms: u32,
    extra_scroll: i32,
    plan: Plan,
}

impl ScrollPlanner {
    /// `extra_scroll` is the margin revealed past a boundary row while walking.
    pub fn new(scroll_duration_ms: u32, extra_scroll: i32) -> Self {
        Self {
            scroll_duration_ms,
            extra_scroll: extra_scroll.max(0),
            plan: Plan::Idle,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.plan, Plan::Idle)
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self.plan, Plan::Deferred(_))
    }

    /// Row the in-flight request is heading for.
    pub fn target_row(&self) -> Option<usize> {
        match self.plan {
            Plan::Idle => None,
            Plan::Deferred(target) => Some(target.row),
            Plan::Walk(travel) | Plan::Converge { travel, .. } => Some(travel.target),
        }
    }

    /// Drops the in-flight request and its scheduled ticks.
    pub fn cancel(&mut self) {
        if self.is_active() {
            log::debug!("Cancelling scroll to row {:?}", self.target_row());
        }
        self.plan = Plan::Idle;
    }

    /// Starts a new request, superseding any request still in flight.
    ///
    /// Non-animated requests complete here. Animated ones issue their first
    /// command on the next [`tick`](Self::tick). When the viewport has nothing
    /// realized yet the request is parked and retried on later ticks.
    pub fn request<V: ViewportPort + ?Sized>(
        &mut self,
        target: ScrollTarget,
        viewport: &mut V,
    ) -> Result<()> {
        let count = viewport.row_count();
        if target.row >= count {
            return Err(Error::IndexOutOfRange {
                index: target.row,
                count,
            });
        }
        self.cancel();
        self.begin(target, viewport);
        Ok(())
    }

    /// Runs one step of the in-flight request.
    pub fn tick<V: ViewportPort + ?Sized>(&mut self, viewport: &mut V) -> TickOutcome {
        match self.plan {
            Plan::Idle => TickOutcome::Idle,
            Plan::Deferred(target) => {
                self.plan = Plan::Idle;
                self.begin(target, viewport);
                if self.is_active() {
                    TickOutcome::Continue
                } else {
                    TickOutcome::Finished
                }
            }
            Plan::Walk(mut travel) => {
                let outcome = self.walk_step(&mut travel, viewport);
                self.plan = match outcome {
                    TickOutcome::Continue => Plan::Walk(travel),
                    _ => Plan::Idle,
                };
                outcome
            }
            Plan::Converge { mut travel, offset } => {
                let outcome = self.converge_step(&mut travel, offset, viewport);
                self.plan = match outcome {
                    TickOutcome::Continue => Plan::Converge { travel, offset },
                    _ => Plan::Idle,
                };
                outcome
            }
        }
    }

    fn begin<V: ViewportPort + ?Sized>(&mut self, target: ScrollTarget, viewport: &mut V) {
        let rows = viewport.realized_rows();
        let (first_row, last_row) = match (rows.first(), rows.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => {
                log::debug!("No rows realized yet, deferring scroll to row {}", target.row);
                self.plan = Plan::Deferred(target);
                return;
            }
        };
        if target.center && first_row.height <= 0 {
            log::debug!("Rows not measured yet, deferring centered scroll to row {}", target.row);
            self.plan = Plan::Deferred(target);
            return;
        }

        let child_count = rows.len();
        let (first, last) = (first_row.index, last_row.index);
        let top_offset = if target.center {
            (viewport.height() - first_row.height) / 2
        } else {
            target.top_offset
        };

        if !target.animate {
            if !target.is_positioned() && (first..=last).contains(&target.row) {
                log::trace!("Row {} already visible", target.row);
                return;
            }
            log::debug!("Jumping to row {} at offset {}", target.row, top_offset);
            viewport.jump_to(target.row, top_offset);
            return;
        }

        if target.is_positioned() {
            let offset = top_offset + viewport.padding_top();
            self.begin_converge(target.row, offset, first, last, child_count, viewport);
        } else {
            self.begin_walk(target.row, first, last);
        }
    }

    fn begin_walk(&mut self, row: usize, first: usize, last: usize) {
        let (direction, travel_count) = if row < first {
            (Direction::Up, first - row + 1)
        } else if row > last {
            (Direction::Down, row - last + 1)
        } else {
            log::trace!("Row {} already visible", row);
            return;
        };

        let travel_count = u32::try_from(travel_count).unwrap_or(u32::MAX);
        let step = self.scroll_duration_ms / travel_count;
        log::debug!("Walking {:?} to row {} ({} rows away)", direction, row, travel_count);
        self.plan = Plan::Walk(Travel::new(row, direction, step));
    }

    fn begin_converge<V: ViewportPort + ?Sized>(
        &mut self,
        row: usize,
        offset: i32,
        first: usize,
        last: usize,
        child_count: usize,
        viewport: &mut V,
    ) {
        let (direction, travel_count) = if row < first {
            (Direction::Up, first - row)
        } else if row > last {
            (Direction::Down, row - last)
        } else {
            if let Some(target_row) = find_row(viewport.realized_rows(), row) {
                self.final_correction(target_row.top - offset, self.scroll_duration_ms, viewport);
            }
            return;
        };

        let screens = travel_count as f32 / child_count.max(1) as f32;
        let step = if screens < 1.0 {
            self.scroll_duration_ms
        } else {
            (self.scroll_duration_ms as f32 / screens) as u32
        };
        log::debug!(
            "Converging {:?} on row {} at offset {} (~{:.1} screens)",
            direction,
            row,
            offset,
            screens
        );
        self.plan = Plan::Converge {
            travel: Travel::new(row, direction, step),
            offset,
        };
    }

    fn walk_step<V: ViewportPort + ?Sized>(
        &self,
        travel: &mut Travel,
        viewport: &mut V,
    ) -> TickOutcome {
        let Some(window) = Window::observe(viewport.realized_rows()) else {
            return TickOutcome::Continue;
        };
        let boundary = window.boundary(travel.direction);
        if travel.last_seen == Some(boundary.index) {
            reissue(travel, viewport);
            return TickOutcome::Continue;
        }
        travel.last_seen = Some(boundary.index);

        let height = viewport.height();
        match travel.direction {
            Direction::Down => {
                if boundary.index > travel.target {
                    return TickOutcome::Finished;
                }
                let extra = if boundary.index + 1 < viewport.row_count() {
                    viewport.padding_bottom().max(self.extra_scroll)
                } else {
                    viewport.padding_bottom()
                };
                let reveal = boundary.bottom() - height + extra;
                if boundary.index == travel.target {
                    if reveal > 0 {
                        issue(travel, reveal, travel.step_duration_ms, viewport);
                    }
                    return TickOutcome::Finished;
                }
                let modifier = screen_modifier(travel.target - boundary.index, window.count);
                let distance = (height as f32 * modifier) as i32;
                let delta = distance.max(boundary.bottom() - height + extra.max(1));
                let duration = (travel.step_duration_ms as f32 * modifier) as u32;
                issue(travel, delta, duration, viewport);
                TickOutcome::Continue
            }
            Direction::Up => {
                if boundary.index < travel.target {
                    return TickOutcome::Finished;
                }
                let extra = if boundary.index > 0 {
                    viewport.padding_top().max(self.extra_scroll)
                } else {
                    viewport.padding_top()
                };
                let reveal = boundary.top - extra;
                if boundary.index == travel.target {
                    if reveal < 0 {
                        issue(travel, reveal, travel.step_duration_ms, viewport);
                    }
                    return TickOutcome::Finished;
                }
                let modifier = screen_modifier(boundary.index - travel.target, window.count);
                let distance = -((height as f32 * modifier) as i32);
                let delta = distance.min(boundary.top - extra.max(1));
                let duration = (travel.step_duration_ms as f32 * modifier) as u32;
                issue(travel, delta, duration, viewport);
                TickOutcome::Continue
            }
        }
    }

    fn converge_step<V: ViewportPort + ?Sized>(
        &self,
        travel: &mut Travel,
        offset: i32,
        viewport: &mut V,
    ) -> TickOutcome {
        let Some(window) = Window::observe(viewport.realized_rows()) else {
            return TickOutcome::Continue;
        };
        let boundary = window.boundary(travel.direction);
        if travel.last_seen == Some(boundary.index) {
            reissue(travel, viewport);
            return TickOutcome::Continue;
        }
        travel.last_seen = Some(boundary.index);

        let height = viewport.height();
        let target = travel.target;
        if target < window.first.index {
            let modifier = screen_modifier(window.first.index - target + 1, window.count);
            let distance = -((height as f32 * modifier) as i32);
            // A short distance may not realize a new row; reaching one pixel
            // past the first row's top always does.
            let delta = distance.min(window.first.top - 1);
            let duration = (travel.step_duration_ms as f32 * modifier) as u32;
            issue(travel, delta, duration, viewport);
            TickOutcome::Continue
        } else if target > window.last.index {
            let modifier = screen_modifier(target - window.last.index, window.count);
            let distance = (height as f32 * modifier) as i32;
            let delta = distance.max(window.last.bottom() - height + 1);
            let duration = (travel.step_duration_ms as f32 * modifier) as u32;
            issue(travel, delta, duration, viewport);
            TickOutcome::Continue
        } else {
            if let Some(target_row) = find_row(viewport.realized_rows(), target) {
                self.final_correction(target_row.top - offset, travel.step_duration_ms, viewport);
            }
            TickOutcome::Finished
        }
    }

    fn final_correction<V: ViewportPort + ?Sized>(
        &self,
        distance: i32,
        base_duration_ms: u32,
        viewport: &mut V,
    ) {
        if distance.abs() < 1 {
            log::trace!("Target row already aligned");
            return;
        }
        let fraction = distance.abs() as f32 / viewport.height().max(1) as f32;
        let duration = (base_duration_ms as f32 * fraction) as u32;
        log::trace!("Final correction {}px over {}ms", distance, duration);
        viewport.scroll_by(distance, duration);
    }
}

impl Default for ScrollPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_DURATION_MS, 0)
    }
}

/// First, last and count of the realized rows.
struct Window {
    first: RealizedRow,
    last: RealizedRow,
    count: usize,
}

impl Window {
    fn observe(rows: &[RealizedRow]) -> Option<Self> {
        Some(Self {
            first: *rows.first()?,
            last: *rows.last()?,
            count: rows.len(),
        })
    }

    fn boundary(&self, direction: Direction) -> RealizedRow {
        match direction {
            Direction::Up => self.first,
            Direction::Down => self.last,
        }
    }
}

fn find_row(rows: &[RealizedRow], index: usize) -> Option<RealizedRow> {
    rows.iter().find(|row| row.index == index).copied()
}

/// Fraction of a screen still to travel, capped at one.
fn screen_modifier(rows_remaining: usize, rows_per_screen: usize) -> f32 {
    (rows_remaining as f32 / rows_per_screen.max(1) as f32).min(1.0)
}

fn issue<V: ViewportPort + ?Sized>(
    travel: &mut Travel,
    delta: i32,
    duration_ms: u32,
    viewport: &mut V,
) {
    log::trace!("scroll_by {}px over {}ms toward row {}", delta, duration_ms, travel.target);
    viewport.scroll_by(delta, duration_ms);
    travel.last_command = Some(ScrollCommand { delta, duration_ms });
}

// The boundary has not moved since the last command: layout has not caught up.
fn reissue<V: ViewportPort + ?Sized>(travel: &Travel, viewport: &mut V) {
    if let Some(command) = travel.last_command {
        log::trace!("Boundary stalled at {:?}, re-issuing", travel.last_seen);
        viewport.scroll_by(command.delta, command.duration_ms);
    }
}
