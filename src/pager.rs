//! Page-window arithmetic for paginated search results.
//!
//! `PageState` is a plain value: every transition returns a new state and
//! the view layer owns the single live instance. The navigation window
//! holds at most [`WINDOW_SIZE`] page numbers; selecting a page outside
//! the window re-anchors it rather than scrolling one page at a time.

use serde::Serialize;

/// Maximum number of page links visible in the navigation window.
pub(crate) const WINDOW_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageState {
    current_page: usize,
    page_size: usize,
    window_start: usize,
    total_pages: usize,
    total: usize,
}

fn total_pages_for(total: usize, page_size: usize) -> usize {
    // An empty result set still presents one (empty) page.
    total.div_ceil(page_size).max(1)
}

impl PageState {
    /// Fresh state at page 1. A zero `page_size` is treated as 1.
    pub fn new(total: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            current_page: 1,
            page_size,
            window_start: 1,
            total_pages: total_pages_for(total, page_size),
            total,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn window_start(&self) -> usize {
        self.window_start
    }

    /// Query offset for the current page.
    pub fn offset(&self) -> usize {
        (self.current_page - 1) * self.page_size
    }

    /// Moves to `page`, clamped to `[1, total_pages]`.
    ///
    /// The window re-anchors only when the target falls outside it:
    /// forward past the window end anchors the window at the target,
    /// backward past the window start anchors so the target is the
    /// window's last page.
    pub fn goto(&self, page: usize) -> Self {
        let page = page.clamp(1, self.total_pages);
        let mut next = *self;
        next.current_page = page;
        if page >= self.window_start + WINDOW_SIZE {
            next.window_start = page;
        } else if page < self.window_start {
            next.window_start = page.saturating_sub(WINDOW_SIZE - 1).max(1);
        }
        next
    }

    /// One page forward; a no-op at the last page.
    pub fn next(&self) -> Self {
        self.goto(self.current_page.saturating_add(1))
    }

    /// One page back; a no-op at page 1.
    pub fn prev(&self) -> Self {
        self.goto(self.current_page.saturating_sub(1))
    }

    /// Changes the per-page size and resets to page 1.
    pub fn resize(&self, page_size: usize) -> Self {
        Self::new(self.total, page_size)
    }

    /// Re-derives page counts after the index reports a new hit total,
    /// clamping the current page if it fell off the end.
    pub fn update_total(&self, total: usize) -> Self {
        let mut next = *self;
        next.total = total;
        next.total_pages = total_pages_for(total, self.page_size);
        if next.current_page > next.total_pages {
            return next.goto(next.total_pages);
        }
        next
    }

    /// Page numbers visible in the navigation window.
    pub fn window(&self) -> std::ops::RangeInclusive<usize> {
        let end = (self.window_start + WINDOW_SIZE - 1).min(self.total_pages);
        self.window_start..=end
    }

    /// The last page, when it lies beyond the window end and is offered
    /// as a separate jump target after an ellipsis.
    pub fn overflow_page(&self) -> Option<usize> {
        (self.total_pages >= self.window_start + WINDOW_SIZE).then_some(self.total_pages)
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}
