// "Load more" state machine of a view

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadState {
    Idle,
    LoadingMore,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pagination {
    page: u32,
    has_more: bool,
    state: LoadState,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            has_more: false,
            state: LoadState::Idle,
        }
    }
}

impl Pagination {
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading_more(&self) -> bool {
        self.state == LoadState::LoadingMore
    }

    /// Back to page 1 / `Idle`; nothing more is known until the next fresh page lands.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Starts a load-more and returns the page to request, or `None` when there is
    /// nothing more to load or a load-more is already pending.
    pub fn begin(&mut self) -> Option<u32> {
        if !self.has_more || self.state == LoadState::LoadingMore {
            return None;
        }
        self.state = LoadState::LoadingMore;
        Some(self.page + 1)
    }

    /// Records the outcome of a fresh fetch for page 1.
    pub fn finish_fresh(&mut self, has_more: bool) {
        self.page = 1;
        self.has_more = has_more;
        self.state = LoadState::Idle;
    }

    /// Records the outcome of the pending load-more. `None` means it failed.
    pub fn finish_more(&mut self, has_more: Option<bool>) {
        match has_more {
            Some(has_more) => {
                self.page += 1;
                self.has_more = has_more;
            }
            None => self.has_more = false,
        }
        self.state = LoadState::Idle;
    }

    /// Fresh fetch failed: nothing to page through.
    pub fn fail_fresh(&mut self) {
        self.finish_fresh(false);
    }
}
