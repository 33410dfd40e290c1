//! Column sorting for the record tables.

use std::cmp::Ordering;

use super::view::{AccountSortKey, CreatorSortKey, DealSortKey, SortDirection, SortState};
use crate::models::{parse_date, Account, Creator, Deal};

/// A sortable column of `T`.
pub trait SortKey<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Unparseable dates order before every real date.
fn by_date(a: &str, b: &str) -> Ordering {
    parse_date(a).cmp(&parse_date(b))
}

impl SortKey<Creator> for CreatorSortKey {
    fn compare(&self, a: &Creator, b: &Creator) -> Ordering {
        match self {
            CreatorSortKey::Id => a.id.cmp(&b.id),
            CreatorSortKey::RealName => a.real_name.cmp(&b.real_name),
            CreatorSortKey::City => a.city.cmp(&b.city),
            CreatorSortKey::Commission => a.commission.total_cmp(&b.commission),
            CreatorSortKey::InterviewDate => by_date(&a.interview_date, &b.interview_date),
            CreatorSortKey::ContractStartDate => {
                by_date(&a.contract_start_date, &b.contract_start_date)
            }
            CreatorSortKey::ContractEndDate => by_date(&a.contract_end_date, &b.contract_end_date),
        }
    }
}

impl SortKey<Account> for AccountSortKey {
    fn compare(&self, a: &Account, b: &Account) -> Ordering {
        match self {
            AccountSortKey::CreatorId => a.creator_id.cmp(&b.creator_id),
            AccountSortKey::Platform => a.platform.cmp(&b.platform),
            AccountSortKey::Followers => a.followers.cmp(&b.followers),
            AccountSortKey::Price => a.price.total_cmp(&b.price),
            AccountSortKey::UpdateDate => by_date(&a.update_date, &b.update_date),
        }
    }
}

impl SortKey<Deal> for DealSortKey {
    fn compare(&self, a: &Deal, b: &Deal) -> Ordering {
        match self {
            DealSortKey::Id => a.id.cmp(&b.id),
            DealSortKey::CreatorId => a.creator_id.cmp(&b.creator_id),
            DealSortKey::Partner => a.partner.cmp(&b.partner),
            DealSortKey::Date => by_date(&a.date, &b.date),
            DealSortKey::Amount => a.amount.total_cmp(&b.amount),
            DealSortKey::ReceivedAmount => a.received_amount.total_cmp(&b.received_amount),
            DealSortKey::TransferDate => by_date(&a.transfer_date, &b.transfer_date),
            DealSortKey::TransferStatus => a.transfer_status.as_str().cmp(b.transfer_status.as_str()),
        }
    }
}

/// Stable sort by the selected key. Equal rows keep their relative order in both directions.
pub fn sort_records<T, K: SortKey<T>>(records: &mut [&T], state: &SortState<K>) {
    let Some(key) = &state.key else {
        return;
    };
    records.sort_by(|a, b| {
        let ordering = key.compare(a, b);
        match state.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(creator_id: &str, followers: u64) -> Account {
        Account {
            creator_id: creator_id.to_string(),
            platform: "抖音".to_string(),
            followers,
            ..Default::default()
        }
    }

    #[test]
    fn test_sort_numeric_and_direction() {
        let accounts = [account("a", 300), account("b", 20), account("c", 1000)];
        let mut rows: Vec<&Account> = accounts.iter().collect();
        let mut state = SortState::default();

        state.toggle(AccountSortKey::Followers);
        sort_records(&mut rows, &state);
        let order: Vec<u64> = rows.iter().map(|a| a.followers).collect();
        assert_eq!(order, vec![20, 300, 1000]);

        state.toggle(AccountSortKey::Followers);
        sort_records(&mut rows, &state);
        let order: Vec<u64> = rows.iter().map(|a| a.followers).collect();
        assert_eq!(order, vec![1000, 300, 20]);
    }

    #[test]
    fn test_sort_is_stable() {
        let accounts = [account("x", 5), account("y", 1), account("z", 5)];
        let mut rows: Vec<&Account> = accounts.iter().collect();
        let mut state = SortState::default();
        state.toggle(AccountSortKey::Followers);
        state.toggle(AccountSortKey::Followers);

        sort_records(&mut rows, &state);
        let order: Vec<&str> = rows.iter().map(|a| a.creator_id.as_str()).collect();
        assert_eq!(order, vec!["x", "z", "y"]);
    }

    #[test]
    fn test_sort_dates_parse_mixed_formats() {
        let deals = [
            Deal {
                id: "late".to_string(),
                date: "2025/12/1".to_string(),
                ..Default::default()
            },
            Deal {
                id: "early".to_string(),
                date: "2025-02-01".to_string(),
                ..Default::default()
            },
            Deal {
                id: "blank".to_string(),
                ..Default::default()
            },
        ];
        let mut rows: Vec<&Deal> = deals.iter().collect();
        let mut state = SortState::default();
        state.toggle(DealSortKey::Date);
        sort_records(&mut rows, &state);

        let order: Vec<&str> = rows.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(order, vec!["blank", "early", "late"]);
    }

    #[test]
    fn test_no_key_keeps_order() {
        let accounts = [account("b", 1), account("a", 2)];
        let mut rows: Vec<&Account> = accounts.iter().collect();
        sort_records(&mut rows, &SortState::<AccountSortKey>::default());
        assert_eq!(rows[0].creator_id, "b");
    }
}
