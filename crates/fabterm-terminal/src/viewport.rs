//! Scroll region state
//!
//! The viewport tracks how far the user has scrolled back from the newest
//! line. While pinned it always shows the bottom of the content, which is how
//! appended log entries and animation lines stay in view.

use std::ops::Range;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    /// Lines scrolled back from the bottom; zero means pinned
    offset_from_bottom: usize,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pinned(&self) -> bool {
        self.offset_from_bottom == 0
    }

    /// Snap back to the newest content
    pub fn pin_to_bottom(&mut self) {
        self.offset_from_bottom = 0;
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.offset_from_bottom = self.offset_from_bottom.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.offset_from_bottom = self.offset_from_bottom.saturating_sub(lines);
    }

    /// Range of content lines visible in a region of `height` rows.
    ///
    /// Clamps the stored offset so scrolling past the top stops at line 0.
    pub fn visible_range(&mut self, total: usize, height: usize) -> Range<usize> {
        if total <= height {
            self.offset_from_bottom = 0;
            return 0..total;
        }
        let max_offset = total - height;
        self.offset_from_bottom = self.offset_from_bottom.min(max_offset);
        let end = total - self.offset_from_bottom;
        (end - height)..end
    }
}
