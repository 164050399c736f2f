/// Page position of one list view.
///
/// Owned by the view, never derived from cache contents. Changing the page
/// size or the filter goes back to page 1 so an out-of-range page is never
/// requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState<F = ()> {
    page: u32,
    size: u32,
    filter: F,
}

impl<F: Default + PartialEq> PageState<F> {
    pub fn new(size: u32) -> Self {
        Self::with_filter(size, F::default())
    }
}

impl<F: PartialEq> PageState<F> {
    pub fn with_filter(size: u32, filter: F) -> Self {
        Self {
            page: 1,
            size: size.max(1),
            filter,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Advance unless already on the last page. Returns whether the page
    /// changed.
    pub fn next(&mut self, total_pages: u32) -> bool {
        if self.page < total_pages {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    pub fn set_size(&mut self, size: u32) {
        let size = size.max(1);
        if size != self.size {
            self.size = size;
            self.page = 1;
        }
    }

    pub fn set_filter(&mut self, filter: F) {
        if filter != self.filter {
            self.filter = filter;
            self.page = 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogpilot_core::models::InquiryStatus;

    #[test]
    fn test_filter_change_resets_page() {
        let mut state: PageState<Option<InquiryStatus>> = PageState::new(10);
        state.set_page(4);
        state.set_filter(None);
        assert_eq!(state.page(), 4);

        state.set_filter(Some(InquiryStatus::Pending));
        assert_eq!(state.page(), 1);
        assert_eq!(state.filter(), &Some(InquiryStatus::Pending));
    }

    #[test]
    fn test_size_change_resets_page() {
        let mut state: PageState = PageState::new(10);
        state.set_page(3);
        state.set_size(20);
        assert_eq!((state.page(), state.size()), (1, 20));
    }

    #[test]
    fn test_next_prev_clamped() {
        let mut state: PageState = PageState::new(5);
        assert!(!state.prev());
        assert!(state.next(2));
        assert!(!state.next(2));
        assert_eq!(state.page(), 2);
        assert!(state.prev());
        assert_eq!(state.page(), 1);
    }
}
