use crate::model::Window;

/// Navigation over the result set in fixed-width windows.
///
/// `range` remembers the window last requested. Once a page comes back,
/// its upper bound replaces `range.1` if it falls short, which is how the
/// pager learns there is nothing after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    start: u64,
    stop: u64,
    range: (u64, u64),
    next_enabled: bool,
}

impl Pager {
    pub fn new(step: u64) -> Self {
        Self::at(0, step)
    }

    pub fn at(start: u64, step: u64) -> Self {
        let stop = start.saturating_add(step);
        Self {
            start,
            stop,
            range: (start, stop),
            next_enabled: true,
        }
    }

    pub fn window(&self) -> Window {
        Window::new(self.start, self.stop)
    }

    pub fn range(&self) -> (u64, u64) {
        self.range
    }

    /// Resize the window in place, keeping its start.
    pub fn apply_step(&mut self, step: u64) -> Window {
        self.stop = self.start.saturating_add(step);
        self.remember()
    }

    pub fn prev(&mut self, step: u64) -> Window {
        if self.start > step {
            self.stop = self.stop.saturating_sub(step);
            self.start = self.stop.saturating_sub(step);
        } else {
            self.start = 0;
            self.stop = step;
        }
        self.remember()
    }

    /// Advance one window. After a short page the window stays put and the
    /// same range is requested again.
    pub fn next(&mut self, step: u64) -> Window {
        if self.stop == self.range.1 {
            self.start = self.start.saturating_add(step);
            self.stop = self.start.saturating_add(step);
        }
        self.remember()
    }

    pub fn reload(&mut self) -> Window {
        self.remember()
    }

    /// Feed back the upper bound of what the last request returned.
    /// Returns whether moving forward is still possible.
    pub fn record_returned(&mut self, upper: u64) -> bool {
        self.next_enabled = upper == self.range.1;
        if !self.next_enabled {
            self.range.1 = upper;
        }
        self.next_enabled
    }

    pub fn prev_enabled(&self) -> bool {
        self.start != 0
    }

    pub fn next_enabled(&self) -> bool {
        self.next_enabled
    }

    fn remember(&mut self) -> Window {
        self.range = (self.start, self.stop);
        self.window()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        let pager = Pager::new(10);
        assert_eq!(pager.window(), Window::new(0, 10));
        assert_eq!(pager.range(), (0, 10));
        assert!(!pager.prev_enabled());
    }

    #[test]
    fn full_page_keeps_next_enabled() {
        let mut pager = Pager::new(10);
        assert!(pager.record_returned(10));
        assert_eq!(pager.next(10), Window::new(10, 20));
        assert!(pager.prev_enabled());
    }

    #[test]
    fn short_page_disables_next_and_pins_the_window() {
        let mut pager = Pager::new(10);
        pager.record_returned(10);
        pager.next(10);
        assert!(!pager.record_returned(14));
        assert!(!pager.next_enabled());
        assert_eq!(pager.range(), (10, 14));

        // Next does not move past the end; it re-requests the same window.
        assert_eq!(pager.next(10), Window::new(10, 20));
        assert!(!pager.record_returned(14));
    }

    #[test]
    fn empty_first_page() {
        let mut pager = Pager::new(10);
        assert!(!pager.record_returned(0));
        assert!(!pager.prev_enabled());
        assert_eq!(pager.range(), (0, 0));
    }

    #[test]
    fn prev_walks_back_one_window() {
        let mut pager = Pager::at(30, 10);
        assert_eq!(pager.prev(10), Window::new(20, 30));
        assert_eq!(pager.prev(10), Window::new(10, 20));
        // start == step is not greater than step, so snap to the beginning
        assert_eq!(pager.prev(10), Window::new(0, 10));
        assert!(!pager.prev_enabled());
        assert_eq!(pager.prev(10), Window::new(0, 10));
    }

    #[test]
    fn prev_from_a_partial_offset_snaps_to_zero() {
        let mut pager = Pager::at(5, 10);
        assert_eq!(pager.prev(10), Window::new(0, 10));
    }

    #[test]
    fn prev_after_end_reopens_next() {
        let mut pager = Pager::at(20, 10);
        pager.record_returned(23);
        let window = pager.prev(10);
        assert_eq!(window, Window::new(10, 20));
        assert!(pager.record_returned(20));
        assert_eq!(pager.next(10), Window::new(20, 30));
    }

    #[test]
    fn apply_step_resizes_from_current_start() {
        let mut pager = Pager::at(20, 10);
        assert_eq!(pager.apply_step(25), Window::new(20, 45));
        assert_eq!(pager.range(), (20, 45));
    }

    #[test]
    fn reload_forgets_the_short_bound() {
        let mut pager = Pager::at(10, 10);
        pager.record_returned(14);
        assert_eq!(pager.reload(), Window::new(10, 20));
        assert_eq!(pager.range(), (10, 20));
        assert!(!pager.record_returned(14));
    }

    #[test]
    fn windows_clamp_at_the_top_of_the_index_space() {
        let mut pager = Pager::at(u64::MAX - 3, 10);
        assert_eq!(pager.window(), Window::new(u64::MAX - 3, u64::MAX));
        assert_eq!(pager.apply_step(20), Window::new(u64::MAX - 3, u64::MAX));
        pager.record_returned(u64::MAX);
        assert_eq!(pager.next(10), Window::new(u64::MAX, u64::MAX));
    }

    #[test]
    fn windows_are_contiguous() {
        let mut pager = Pager::new(7);
        let mut last = pager.window();
        for _ in 0..5 {
            pager.record_returned(last.stop);
            let next = pager.next(7);
            assert_eq!(next.start, last.stop);
            assert_eq!(next.width(), 7);
            last = next;
        }
    }
}
