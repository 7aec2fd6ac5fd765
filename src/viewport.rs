// Virtualized viewport over week rows

/// Geometry of a row the viewport has laid out. `top` is relative to the
/// viewport's top edge and may be negative for a partially scrolled-off row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RealizedRow {
    pub index: usize,
    pub top: i32,
    pub height: i32,
}

impl RealizedRow {
    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }
}

/// The list container that owns row realization and scrolling.
///
/// Only a sliding window of rows is realized at any time; rows outside it
/// have no known geometry.
pub trait ViewportPort {
    /// Realized rows ordered by index. Empty before the first layout.
    fn realized_rows(&self) -> &[RealizedRow];

    fn first_visible_index(&self) -> Option<usize> {
        self.realized_rows().first().map(|row| row.index)
    }

    fn last_visible_index(&self) -> Option<usize> {
        self.realized_rows().last().map(|row| row.index)
    }

    fn width(&self) -> i32;

    fn height(&self) -> i32;

    fn padding_top(&self) -> i32 {
        0
    }

    fn padding_bottom(&self) -> i32 {
        0
    }

    fn row_count(&self) -> usize;

    /// Supplies a new row count; the viewport re-lays out from scratch.
    fn set_row_count(&mut self, count: usize);

    /// Repositions synchronously so `index` sits `top_offset` pixels below the top.
    fn jump_to(&mut self, index: usize, top_offset: i32);

    /// Starts an animated scroll of `delta` pixels from the current position,
    /// replacing any scroll still in flight.
    fn scroll_by(&mut self, delta: i32, duration_ms: u32);
}

/// Commands received by a [`SimulatedViewport`], recorded in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportCommand {
    SetRowCount(usize),
    JumpTo { index: usize, top_offset: i32 },
    ScrollBy { delta: i32, duration_ms: u32 },
}

#[derive(Debug, Clone, Copy)]
struct PendingScroll {
    remaining: i64,
    remaining_ms: u32,
}

/// In-memory virtualized list with per-row heights.
///
/// Layout after a row-count change is deferred until [`layout`](Self::layout),
/// [`advance`](Self::advance) or [`settle`](Self::settle) runs, and animated
/// scrolls stay pending until time is advanced, so the realized window lags
/// behind commands the way a real list container does.
#[derive(Debug)]
pub struct SimulatedViewport {
    width: i32,
    height: i32,
    default_row_height: i32,
    heights: Vec<i32>,
    offsets: Vec<i64>,
    scroll: i64,
    realized: Vec<RealizedRow>,
    needs_layout: bool,
    pending: Option<PendingScroll>,
    commands: Vec<ViewportCommand>,
}

impl SimulatedViewport {
    pub fn new(width: i32, height: i32, row_height: i32) -> Self {
        Self {
            width,
            height,
            default_row_height: row_height.max(1),
            heights: Vec::new(),
            offsets: vec![0],
            scroll: 0,
            realized: Vec::new(),
            needs_layout: true,
            pending: None,
            commands: Vec::new(),
        }
    }

    pub fn set_row_height(&mut self, index: usize, height: i32) {
        if let Some(h) = self.heights.get_mut(index) {
            *h = height.max(1);
            self.rebuild_offsets();
            self.needs_layout = true;
        }
    }

    /// Resizes the viewport and sets the height used for every row.
    pub fn resize(&mut self, width: i32, height: i32, row_height: i32) {
        self.width = width;
        self.height = height;
        self.default_row_height = row_height.max(1);
        for h in self.heights.iter_mut() {
            *h = self.default_row_height;
        }
        self.rebuild_offsets();
        self.needs_layout = true;
    }

    /// Content pixels scrolled past the top edge.
    pub fn scroll_offset(&self) -> i64 {
        self.scroll
    }

    pub fn is_scrolling(&self) -> bool {
        self.pending.is_some()
    }

    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    pub fn commands(&self) -> &[ViewportCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<ViewportCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Moves the content immediately, as a user drag would.
    pub fn drag_by(&mut self, delta: i32) {
        self.pending = None;
        self.scroll += i64::from(delta);
        self.layout();
    }

    /// Progresses the in-flight scroll by `elapsed_ms`. Returns `true` once
    /// nothing is pending and layout is complete.
    pub fn advance(&mut self, elapsed_ms: u32) -> bool {
        if let Some(mut pending) = self.pending.take() {
            if elapsed_ms >= pending.remaining_ms {
                self.scroll += pending.remaining;
            } else {
                let step = pending.remaining * i64::from(elapsed_ms) / i64::from(pending.remaining_ms);
                self.scroll += step;
                pending.remaining -= step;
                pending.remaining_ms -= elapsed_ms;
                self.pending = Some(pending);
            }
            self.needs_layout = true;
        }
        if self.needs_layout {
            self.layout();
        }
        self.pending.is_none()
    }

    /// Completes any pending scroll and layout.
    pub fn settle(&mut self) {
        self.advance(u32::MAX);
    }

    pub fn layout(&mut self) {
        self.needs_layout = false;
        self.realized.clear();

        let total = self.offsets.last().copied().unwrap_or(0);
        let max_scroll = (total - i64::from(self.height)).max(0);
        self.scroll = self.scroll.clamp(0, max_scroll);

        if self.heights.is_empty() || self.height <= 0 {
            return;
        }

        let mut index = self.offsets.partition_point(|&o| o <= self.scroll).saturating_sub(1);
        while index < self.heights.len() {
            let top = self.offsets[index] - self.scroll;
            if top >= i64::from(self.height) {
                break;
            }
            self.realized.push(RealizedRow {
                index,
                top: top as i32,
                height: self.heights[index],
            });
            index += 1;
        }
        log::trace!(
            "layout: scroll={} rows {:?}..={:?}",
            self.scroll,
            self.first_visible_index(),
            self.last_visible_index()
        );
    }

    fn rebuild_offsets(&mut self) {
        self.offsets.clear();
        self.offsets.reserve(self.heights.len() + 1);
        let mut acc = 0i64;
        self.offsets.push(acc);
        for &h in &self.heights {
            acc += i64::from(h);
            self.offsets.push(acc);
        }
    }
}

impl ViewportPort for SimulatedViewport {
    fn realized_rows(&self) -> &[RealizedRow] {
        &self.realized
    }

    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn row_count(&self) -> usize {
        self.heights.len()
    }

    fn set_row_count(&mut self, count: usize) {
        self.commands.push(ViewportCommand::SetRowCount(count));
        self.heights.resize(count, self.default_row_height);
        self.rebuild_offsets();
        self.pending = None;
        self.realized.clear();
        self.needs_layout = true;
    }

    fn jump_to(&mut self, index: usize, top_offset: i32) {
        self.commands.push(ViewportCommand::JumpTo { index, top_offset });
        let index = index.min(self.heights.len().saturating_sub(1));
        self.pending = None;
        self.scroll = self.offsets.get(index).copied().unwrap_or(0) - i64::from(top_offset);
        self.layout();
    }

    fn scroll_by(&mut self, delta: i32, duration_ms: u32) {
        self.commands.push(ViewportCommand::ScrollBy { delta, duration_ms });
        self.pending = Some(PendingScroll {
            remaining: i64::from(delta),
            remaining_ms: duration_ms.max(1),
        });
    }
}
