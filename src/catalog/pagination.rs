use super::model::PageInfo;

/// End cursors of the pages fetched so far, indexed by page number minus one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorTable {
    cursors: Vec<String>,
}

impl CursorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.cursors
    }

    /// End cursor recorded for `page`
    pub fn end_of(&self, page: u32) -> Option<&str> {
        let index = page.checked_sub(1)? as usize;
        self.cursors.get(index).map(String::as_str)
    }

    /// Cursor a request for `page` starts after; `None` for the first page
    pub fn start_of(&self, page: u32) -> Option<&str> {
        if page <= 1 {
            return None;
        }
        self.end_of(page - 1)
    }

    /// Restart the table from a fresh first page
    fn reset(&mut self, first_end_cursor: Option<String>) {
        self.cursors.clear();
        self.cursors.extend(first_end_cursor);
    }

    /// Append the end cursor of `page` if it is the next unrecorded one
    fn record(&mut self, page: u32, cursor: String) -> bool {
        if self.cursors.len() + 1 != page as usize {
            return false;
        }
        self.cursors.push(cursor);
        true
    }
}

/// Forward pagination bookkeeping for the catalog view
///
/// `current_page` always stays within `[1, total_pages]`. `total_pages` is a
/// lower bound on the catalog size: it grows as upstream reports further pages
/// and is pinned to the current page once a page reports no successor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    current_page: u32,
    total_pages: u32,
    cursors: CursorTable,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new()
    }
}

impl Pagination {
    pub fn new() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            cursors: CursorTable::new(),
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn cursors(&self) -> &CursorTable {
        &self.cursors
    }

    /// Whether `page` is a page the user may navigate to
    pub fn can_select(&self, page: u32) -> bool {
        (1..=self.total_pages).contains(&page)
    }

    /// Move to `page`, returning `false` and leaving state untouched when out of range
    pub fn select(&mut self, page: u32) -> bool {
        if !self.can_select(page) {
            ::log::debug!(
                "Ignoring page {} outside of [1, {}]",
                page,
                self.total_pages
            );
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Cursor to request the current page with
    pub fn current_cursor(&self) -> Option<&str> {
        self.cursors.start_of(self.current_page)
    }

    /// Update cursors and page count after `page` was fetched successfully
    ///
    /// A page beyond `page` is only counted once the end cursor of `page` is
    /// known, so `total_pages` never exceeds the number of recorded cursors plus one.
    pub fn record_page(&mut self, page: u32, page_info: &PageInfo) {
        let page = page.max(1);
        if page == 1 {
            self.cursors.reset(page_info.end_cursor.clone());
        } else if page_info.has_next_page {
            if let Some(cursor) = &page_info.end_cursor {
                if self.cursors.record(page, cursor.clone()) {
                    ::log::debug!("Recorded end cursor of page {}", page);
                }
            }
        }

        self.total_pages = if !page_info.has_next_page {
            page
        } else if self.cursors.end_of(page).is_some() {
            if page == 1 {
                2
            } else {
                self.total_pages.max(page + 1)
            }
        } else {
            ::log::warn!(
                "Page {} reports a next page without an end cursor, treating it as the last page",
                page
            );
            page
        };

        self.current_page = self.current_page.clamp(1, self.total_pages);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(has_next_page: bool, end_cursor: Option<&str>) -> PageInfo {
        PageInfo {
            has_next_page,
            end_cursor: end_cursor.map(str::to_string),
        }
    }

    #[test]
    fn test_initial_state() {
        let pagination = Pagination::new();
        assert_eq!(pagination.current_page(), 1);
        assert_eq!(pagination.total_pages(), 1);
        assert!(pagination.cursors().is_empty());
        assert_eq!(pagination.current_cursor(), None);
        assert!(!pagination.has_previous());
        assert!(!pagination.has_next());
    }

    #[test]
    fn test_cursor_table_grows_one_per_page() {
        let mut pagination = Pagination::new();

        for page in 1..=5u32 {
            assert!(pagination.select(page));
            let cursor = format!("C{}", page);
            pagination.record_page(page, &info(true, Some(&cursor)));

            assert_eq!(pagination.cursors().len(), page as usize);
            assert_eq!(pagination.total_pages(), page + 1);
        }

        assert_eq!(pagination.cursors().start_of(3), Some("C2"));
        assert_eq!(pagination.cursors().end_of(5), Some("C5"));
    }

    #[test]
    fn test_first_page_resets_state() {
        let mut pagination = Pagination::new();
        for page in 1..=3u32 {
            pagination.select(page);
            pagination.record_page(page, &info(true, Some(&format!("C{}", page))));
        }
        assert_eq!(pagination.total_pages(), 4);

        assert!(pagination.select(1));
        pagination.record_page(1, &info(true, Some("N1")));

        assert_eq!(pagination.cursors().as_slice(), ["N1".to_string()]);
        assert_eq!(pagination.total_pages(), 2);
        assert_eq!(pagination.current_page(), 1);
    }

    #[test]
    fn test_last_page_pins_total() {
        let mut pagination = Pagination::new();
        pagination.record_page(1, &info(true, Some("C1")));
        assert!(pagination.select(2));
        pagination.record_page(2, &info(false, Some("C2")));

        assert_eq!(pagination.total_pages(), 2);
        assert_eq!(pagination.cursors().as_slice(), ["C1".to_string()]);
        assert!(!pagination.has_next());
        assert!(pagination.has_previous());
    }

    #[test]
    fn test_revisiting_a_page_does_not_mutate_cursors() {
        let mut pagination = Pagination::new();
        for page in 1..=3u32 {
            pagination.select(page);
            pagination.record_page(page, &info(true, Some(&format!("C{}", page))));
        }

        assert!(pagination.select(2));
        pagination.record_page(2, &info(true, Some("other")));

        assert_eq!(
            pagination.cursors().as_slice(),
            ["C1".to_string(), "C2".to_string(), "C3".to_string()]
        );
        assert_eq!(pagination.total_pages(), 4);
        assert_eq!(pagination.current_page(), 2);
    }

    #[test]
    fn test_out_of_range_selection_is_ignored() {
        let mut pagination = Pagination::new();
        pagination.record_page(1, &info(true, Some("C1")));

        assert!(!pagination.select(0));
        assert!(!pagination.select(3));
        assert_eq!(pagination.current_page(), 1);

        assert!(pagination.select(2));
        assert_eq!(pagination.current_cursor(), Some("C1"));
    }

    #[test]
    fn test_current_page_stays_in_range() {
        let mut pagination = Pagination::new();
        let pages = [(1, true), (2, true), (3, true), (2, false), (1, true)];

        for (page, has_next) in pages {
            if pagination.select(page) {
                pagination.record_page(page, &info(has_next, Some(&format!("C{}", page))));
            }
            assert!(pagination.current_page() >= 1);
            assert!(pagination.current_page() <= pagination.total_pages());
        }
    }

    #[test]
    fn test_single_page_catalog() {
        let mut pagination = Pagination::new();
        pagination.record_page(1, &info(false, None));

        assert_eq!(pagination.total_pages(), 1);
        assert!(pagination.cursors().is_empty());
        assert!(!pagination.has_next());
    }

    #[test]
    fn test_next_page_without_cursor_is_not_counted() {
        let mut pagination = Pagination::new();
        pagination.record_page(1, &info(true, None));
        assert_eq!(pagination.total_pages(), 1);
        assert!(!pagination.can_select(2));

        pagination.record_page(1, &info(true, Some("C1")));
        assert!(pagination.select(2));
        pagination.record_page(2, &info(true, None));

        assert_eq!(pagination.total_pages(), 2);
        assert_eq!(pagination.cursors().len(), 1);
        assert!(!pagination.has_next());
    }

    #[test]
    fn test_total_never_outruns_cursors() {
        let mut pagination = Pagination::new();
        let pages = [
            (1, true, Some("C1")),
            (2, true, Some("C2")),
            (3, true, None),
            (2, true, Some("C2")),
            (3, true, Some("C3")),
            (1, true, None),
        ];

        for (page, has_next, cursor) in pages {
            if pagination.select(page) {
                pagination.record_page(page, &info(has_next, cursor));
            }
            assert!(pagination.total_pages() as usize <= pagination.cursors().len() + 1);
        }
    }
}
