//! Scroll position for list-like views (live log, log history).
//!
//! The handler layer issues scroll commands; the TUI reports content and
//! viewport size during render.

// ─────────────────────────────────────────────────────────────────────────────
// ScrollState
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScrollState {
    /// First visible line
    pub offset: usize,
    /// Total number of lines (set during render)
    pub total_lines: usize,
    /// Visible lines (set during render)
    pub visible_lines: usize,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.visible_lines)
    }

    pub fn is_at_bottom(&self) -> bool {
        self.offset >= self.max_offset()
    }

    /// Range of line indices in view, end exclusive.
    pub fn visible_range(&self) -> (usize, usize) {
        let start = self.offset.min(self.total_lines);
        let end = (self.offset + self.visible_lines).min(self.total_lines);
        (start, end)
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.max_offset());
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    pub fn page_up(&mut self) {
        let page = self.visible_lines.saturating_sub(2).max(1);
        self.scroll_up(page);
    }

    pub fn page_down(&mut self) {
        let page = self.visible_lines.saturating_sub(2).max(1);
        self.scroll_down(page);
    }

    /// Record new content size. With `follow` set the view sticks to the
    /// newest line; otherwise the offset is only clamped.
    pub fn update_content_size(&mut self, total: usize, visible: usize, follow: bool) {
        self.total_lines = total;
        self.visible_lines = visible;
        if follow {
            self.offset = self.max_offset();
        } else {
            self.offset = self.offset.min(self.max_offset());
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
