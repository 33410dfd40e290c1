//! UI view state: active tab, search, status filter, per-entity sort and pagination.

use serde::{Deserialize, Serialize};

use crate::models::RecordKind;

/// Dashboard tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Overview,
    Creators,
    Accounts,
    Deals,
}

/// Status filter. Creator and deal variants only constrain their own tab; a variant that
/// does not apply to a collection lets every record through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    /// Creator holds a signed or business contract
    Signed,
    Unsigned,
    /// Deal awaiting transfer (待转账)
    Pending,
    /// Deal transfer in progress (处理中)
    Processing,
    /// Deal transferred (已转账)
    Completed,
    /// Deal not transferred and past its transfer date
    Overdue,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Single-key sort selection for one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortState<K> {
    /// `None` keeps store order.
    pub key: Option<K>,
    pub direction: SortDirection,
}

impl<K> Default for SortState<K> {
    fn default() -> Self {
        Self {
            key: None,
            direction: SortDirection::Asc,
        }
    }
}

impl<K: Copy + PartialEq> SortState<K> {
    /// Column-header click: the same key flips direction, a new key sorts ascending.
    pub fn toggle(&mut self, key: K) {
        if self.key == Some(key) {
            self.direction = match self.direction {
                SortDirection::Asc => SortDirection::Desc,
                SortDirection::Desc => SortDirection::Asc,
            };
        } else {
            self.key = Some(key);
            self.direction = SortDirection::Asc;
        }
    }
}

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// 1-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Changing the page size always returns to the first page.
    pub fn set_size(&mut self, size: usize) {
        self.size = size.max(1);
        self.page = 1;
    }

    /// The current page of `items`. A page past the end is empty.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let size = self.size.max(1);
        let start = self.page.max(1).saturating_sub(1).saturating_mul(size);
        if start >= items.len() {
            return &[];
        }
        let end = start.saturating_add(size).min(items.len());
        &items[start..end]
    }

    /// Number of pages for `len` items; an empty collection still has one page.
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.size.max(1)).max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreatorSortKey {
    Id,
    RealName,
    City,
    Commission,
    InterviewDate,
    ContractStartDate,
    ContractEndDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountSortKey {
    CreatorId,
    Platform,
    Followers,
    Price,
    UpdateDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DealSortKey {
    Id,
    CreatorId,
    Partner,
    Date,
    Amount,
    ReceivedAmount,
    TransferDate,
    TransferStatus,
}

/// Everything the dashboard's controls can change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub tab: Tab,
    pub search_term: String,
    pub status_filter: StatusFilter,
    pub creator_sort: SortState<CreatorSortKey>,
    pub account_sort: SortState<AccountSortKey>,
    pub deal_sort: SortState<DealSortKey>,
    pub creator_page: Pagination,
    pub account_page: Pagination,
    pub deal_page: Pagination,
}

impl ViewState {
    pub fn pagination(&self, kind: RecordKind) -> &Pagination {
        match kind {
            RecordKind::Creators => &self.creator_page,
            RecordKind::Accounts => &self.account_page,
            RecordKind::Deals => &self.deal_page,
        }
    }

    pub fn pagination_mut(&mut self, kind: RecordKind) -> &mut Pagination {
        match kind {
            RecordKind::Creators => &mut self.creator_page,
            RecordKind::Accounts => &mut self.account_page,
            RecordKind::Deals => &mut self.deal_page,
        }
    }

    /// Send every table back to its first page.
    pub fn rewind_pages(&mut self) {
        self.creator_page.page = 1;
        self.account_page.page = 1;
        self.deal_page.page = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_toggle_sequence() {
        let mut state = SortState::default();

        state.toggle(AccountSortKey::CreatorId);
        assert_eq!(state.key, Some(AccountSortKey::CreatorId));
        assert_eq!(state.direction, SortDirection::Asc);

        state.toggle(AccountSortKey::CreatorId);
        assert_eq!(state.direction, SortDirection::Desc);

        state.toggle(AccountSortKey::Followers);
        assert_eq!(state.key, Some(AccountSortKey::Followers));
        assert_eq!(state.direction, SortDirection::Asc);
    }

    #[test]
    fn test_slice_lengths() {
        let items: Vec<u32> = (1..=23).collect();
        let mut pages = Pagination { page: 1, size: 10 };

        assert_eq!(pages.slice(&items), &items[0..10]);
        pages.set_page(3);
        assert_eq!(pages.slice(&items), &[21, 22, 23]);
        pages.set_page(4);
        assert!(pages.slice(&items).is_empty());
        assert_eq!(pages.total_pages(items.len()), 3);
    }

    #[test]
    fn test_set_size_resets_page() {
        let mut pages = Pagination { page: 3, size: 10 };
        pages.set_size(20);
        assert_eq!(pages, Pagination { page: 1, size: 20 });
    }

    #[test]
    fn test_degenerate_values() {
        let items = [1, 2, 3];
        let mut pages = Pagination::default();
        pages.set_page(0);
        assert_eq!(pages.page, 1);
        pages.set_size(0);
        assert_eq!(pages.slice(&items), &[1]);
        assert_eq!(pages.total_pages(0), 1);

        let huge = Pagination {
            page: usize::MAX,
            size: usize::MAX,
        };
        assert!(huge.slice(&items).is_empty());
    }
}
