use super::{RuntimeFilter, SortKey, ViewParams};

/// Owns the user's current filter selection. Every filter or sort change
/// sends the view back to page 1.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    params: ViewParams,
}

impl ViewState {
    pub fn params(&self) -> &ViewParams {
        &self.params
    }

    pub fn into_params(self) -> ViewParams {
        self.params
    }

    pub fn toggle_genre(&mut self, genre: &str, selected: bool) {
        if selected {
            self.params.selected_genres.insert(genre.to_string());
        } else {
            self.params.selected_genres.remove(genre);
        }
        self.reset_page();
    }

    pub fn toggle_year(&mut self, year: i32, selected: bool) {
        if selected {
            self.params.selected_years.insert(year);
        } else {
            self.params.selected_years.remove(&year);
        }
        self.reset_page();
    }

    pub fn toggle_tag(&mut self, tag: &str, selected: bool) {
        if selected {
            self.params.selected_tags.insert(tag.to_string());
        } else {
            self.params.selected_tags.remove(tag);
        }
        self.reset_page();
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.params.search_query = query.into();
        self.reset_page();
    }

    pub fn set_rating_range(&mut self, lo: f64, hi: f64) {
        self.params.imdb_rating_range = (lo, hi);
        self.reset_page();
    }

    pub fn set_runtime_filter(&mut self, filter: RuntimeFilter) {
        self.params.runtime_filter = filter;
        self.reset_page();
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.params.sort_by = sort;
        self.reset_page();
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.params.page_size = page_size;
        self.reset_page();
    }

    /// Page navigation is the one change that does not reset the page.
    pub fn set_page(&mut self, page: usize) {
        self.params.page = page;
    }

    fn reset_page(&mut self) {
        self.params.page = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_changes_reset_page() {
        let mut state = ViewState::default();

        state.set_page(4);
        state.toggle_genre("Drama", true);
        assert_eq!(state.params().page, 1);
        assert!(state.params().selected_genres.contains("Drama"));

        state.set_page(3);
        state.set_search("heat");
        assert_eq!(state.params().page, 1);

        state.set_page(2);
        state.set_runtime_filter(RuntimeFilter::Long);
        assert_eq!(state.params().page, 1);

        state.set_page(2);
        state.toggle_year(1995, true);
        state.toggle_year(1995, false);
        assert_eq!(state.params().page, 1);
        assert!(state.params().selected_years.is_empty());
    }

    #[test]
    fn test_page_navigation_is_kept() {
        let mut state = ViewState::default();
        state.set_sort(SortKey::Title);
        state.set_page(5);
        assert_eq!(state.params().page, 5);
        assert_eq!(state.params().sort_by, SortKey::Title);
    }
}
