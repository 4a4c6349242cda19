//! Page window calculation and clamped pagination state

/// One element of the rendered pagination strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u64),
    Ellipsis,
}

/// Compressed page-number sequence shown as pagination controls.
///
/// Pure and idempotent: `total <= 5` yields the full range, otherwise the
/// strip keeps both endpoints and compresses the far side(s) to an ellipsis.
pub fn page_window(current: u64, total: u64) -> Vec<PageItem> {
    use PageItem::{Ellipsis, Page};

    if total <= 5 {
        return (1..=total).map(Page).collect();
    }

    if current <= 3 {
        vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(total)]
    } else if current >= total - 2 {
        vec![
            Page(1),
            Ellipsis,
            Page(total - 3),
            Page(total - 2),
            Page(total - 1),
            Page(total),
        ]
    } else {
        vec![
            Page(1),
            Ellipsis,
            Page(current - 1),
            Page(current),
            Page(current + 1),
            Ellipsis,
            Page(total),
        ]
    }
}

/// Validate a jump-to-page input; anything that is not an integer inside
/// `[1, total]` is a silent no-op and yields `None`.
pub fn parse_jump(input: &str, total: u64) -> Option<u64> {
    let page: u64 = input.trim().parse().ok()?;
    (1..=total).contains(&page).then_some(page)
}

/// Pagination state for one table.
///
/// Invariant: `current` stays inside `[1, total_pages]` where
/// `total_pages = ceil(total_count / page_size)` (never below 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current: u64,
    page_size: u64,
    total_count: u64,
}

impl PageState {
    pub fn new(page_size: u64) -> Self {
        Self {
            current: 1,
            page_size: page_size.max(1),
            total_count: 0,
        }
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn total_pages(&self) -> u64 {
        self.total_count.div_ceil(self.page_size).max(1)
    }

    /// Update the server-reported total, clamping the current page back
    /// into range when the result set shrank underneath it.
    pub fn set_total_count(&mut self, count: u64) {
        self.total_count = count;
        if self.current > self.total_pages() {
            self.current = self.total_pages();
        }
    }

    /// Move to `page`; returns false (state untouched) when out of range.
    pub fn set_current(&mut self, page: u64) -> bool {
        if page < 1 || page > self.total_pages() {
            return false;
        }
        self.current = page;
        true
    }

    pub fn window(&self) -> Vec<PageItem> {
        page_window(self.current, self.total_pages())
    }
}

#[cfg(test)]
mod tests {
    use super::PageItem::{Ellipsis, Page};
    use super::*;

    #[test]
    fn small_totals_render_in_full() {
        for total in 0..=5 {
            let window = page_window(1, total);
            let expected: Vec<PageItem> = (1..=total).map(Page).collect();
            assert_eq!(window, expected, "total={total}");
            assert!(!window.contains(&Ellipsis));
        }
    }

    #[test]
    fn leading_band_compresses_the_tail() {
        for current in 1..=3 {
            assert_eq!(
                page_window(current, 9),
                vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(9)],
            );
        }
    }

    #[test]
    fn trailing_band_compresses_the_head() {
        for current in 7..=9 {
            assert_eq!(
                page_window(current, 9),
                vec![Page(1), Ellipsis, Page(6), Page(7), Page(8), Page(9)],
            );
        }
    }

    #[test]
    fn middle_band_keeps_endpoints_and_two_ellipses() {
        for current in 4..=6 {
            let window = page_window(current, 9);
            assert_eq!(window.first(), Some(&Page(1)));
            assert_eq!(window.last(), Some(&Page(9)));
            let ellipses = window.iter().filter(|item| **item == Ellipsis).count();
            assert_eq!(ellipses, 2, "current={current}");
            assert!(window.contains(&Page(current - 1)));
            assert!(window.contains(&Page(current)));
            assert!(window.contains(&Page(current + 1)));
        }
    }

    #[test]
    fn window_is_idempotent() {
        assert_eq!(page_window(5, 20), page_window(5, 20));
    }

    #[test]
    fn jump_rejects_garbage_and_out_of_range() {
        assert_eq!(parse_jump("3", 5), Some(3));
        assert_eq!(parse_jump(" 5 ", 5), Some(5));
        assert_eq!(parse_jump("0", 5), None);
        assert_eq!(parse_jump("6", 5), None);
        assert_eq!(parse_jump("2.5", 5), None);
        assert_eq!(parse_jump("abc", 5), None);
        assert_eq!(parse_jump("", 5), None);
        assert_eq!(parse_jump("-1", 5), None);
    }

    #[test]
    fn current_page_is_clamped_to_total_pages() {
        let mut pages = PageState::new(20);
        pages.set_total_count(100); // 5 pages
        assert!(pages.set_current(5));
        assert_eq!(pages.current(), 5);

        // out-of-range moves leave the state untouched
        assert!(!pages.set_current(0));
        assert!(!pages.set_current(6));
        assert_eq!(pages.current(), 5);

        // result set shrank underneath the cursor
        pages.set_total_count(30); // 2 pages
        assert_eq!(pages.current(), 2);
    }

    #[test]
    fn empty_result_set_still_has_one_page() {
        let pages = PageState::new(20);
        assert_eq!(pages.total_pages(), 1);
        assert_eq!(pages.current(), 1);
    }
}
