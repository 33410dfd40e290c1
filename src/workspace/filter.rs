//! Search and status filtering.
//!
//! These are pure functions of their inputs and return matches in input order.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::view::StatusFilter;
use crate::models::{Account, Creator, Deal, TransferStatus};

/// Case-insensitive substring search over a fixed set of fields.
struct Needle(Option<String>);

impl Needle {
    fn new(search_term: &str) -> Self {
        let term = search_term.trim();
        if term.is_empty() {
            Self(None)
        } else {
            Self(Some(term.to_lowercase()))
        }
    }

    fn matches<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> bool {
        match &self.0 {
            None => true,
            Some(needle) => fields
                .into_iter()
                .any(|field| field.to_lowercase().contains(needle.as_str())),
        }
    }
}

/// Creator id to display name.
pub fn creator_names(creators: &[Creator]) -> HashMap<&str, &str> {
    creators
        .iter()
        .map(|c| (c.id.as_str(), c.real_name.as_str()))
        .collect()
}

fn creator_status_matches(creator: &Creator, status: StatusFilter) -> bool {
    match status {
        StatusFilter::Signed => creator.is_signed(),
        StatusFilter::Unsigned => !creator.is_signed(),
        _ => true,
    }
}

fn deal_status_matches(deal: &Deal, status: StatusFilter, today: NaiveDate) -> bool {
    match status {
        StatusFilter::Pending => deal.transfer_status == TransferStatus::Pending,
        StatusFilter::Processing => deal.transfer_status == TransferStatus::Processing,
        StatusFilter::Completed => deal.transfer_status == TransferStatus::Completed,
        StatusFilter::Overdue => deal.is_overdue(today),
        _ => true,
    }
}

/// Creators matching `search_term` on id, names, city or category, and `status`.
pub fn filter_creators<'a>(
    creators: &'a [Creator],
    search_term: &str,
    status: StatusFilter,
) -> Vec<&'a Creator> {
    let needle = Needle::new(search_term);
    creators
        .iter()
        .filter(|c| creator_status_matches(c, status))
        .filter(|c| {
            let category = c.category.joined();
            needle.matches([
                c.id.as_str(),
                c.real_name.as_str(),
                c.wechat_name.as_str(),
                c.city.as_str(),
                category.as_str(),
            ])
        })
        .collect()
}

/// Accounts matching `search_term` on creator id, platform or the owning creator's name.
pub fn filter_accounts<'a>(
    accounts: &'a [Account],
    creators: &[Creator],
    search_term: &str,
) -> Vec<&'a Account> {
    let needle = Needle::new(search_term);
    let names = creator_names(creators);
    accounts
        .iter()
        .filter(|a| {
            let name = names.get(a.creator_id.as_str()).copied().unwrap_or("");
            needle.matches([a.creator_id.as_str(), a.platform.as_str(), name])
        })
        .collect()
}

/// Deals matching `search_term` on id, partner or creator (name, or raw id when dangling),
/// and `status` evaluated against `today`.
pub fn filter_deals<'a>(
    deals: &'a [Deal],
    creators: &[Creator],
    search_term: &str,
    status: StatusFilter,
    today: NaiveDate,
) -> Vec<&'a Deal> {
    let needle = Needle::new(search_term);
    let names = creator_names(creators);
    deals
        .iter()
        .filter(|d| deal_status_matches(d, status, today))
        .filter(|d| {
            let creator = names
                .get(d.creator_id.as_str())
                .copied()
                .unwrap_or(d.creator_id.as_str());
            needle.matches([d.id.as_str(), d.partner.as_str(), creator])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TagSet;

    fn creator(id: &str, name: &str, city: &str, category: &str, status: &str) -> Creator {
        Creator {
            id: id.to_string(),
            real_name: name.to_string(),
            city: city.to_string(),
            category: TagSet::parse(category),
            contract_status: TagSet::parse(status),
            ..Default::default()
        }
    }

    fn deal(id: &str, creator_id: &str, partner: &str, status: TransferStatus, due: &str) -> Deal {
        Deal {
            id: id.to_string(),
            creator_id: creator_id.to_string(),
            partner: partner.to_string(),
            transfer_status: status,
            transfer_date: due.to_string(),
            ..Default::default()
        }
    }

    fn sample_creators() -> Vec<Creator> {
        vec![
            creator("2501001", "Alice Wang", "上海", "美妆护肤, 生活方式", "已签约"),
            creator("2501002", "Bob Li", "杭州", "美食", "面试中"),
            creator("2502003", "Carol", "上海", "旅行", "商务合作"),
        ]
    }

    fn ids<T>(items: &[&T], id: impl Fn(&T) -> &str) -> Vec<String> {
        items.iter().map(|i| id(i).to_string()).collect()
    }

    #[test]
    fn test_creator_search_is_case_insensitive() {
        let creators = sample_creators();
        let hits = filter_creators(&creators, "  ALICE ", StatusFilter::All);
        assert_eq!(ids(&hits, |c| c.id.as_str()), vec!["2501001"]);

        let hits = filter_creators(&creators, "上海", StatusFilter::All);
        assert_eq!(hits.len(), 2);

        let hits = filter_creators(&creators, "生活", StatusFilter::All);
        assert_eq!(ids(&hits, |c| c.id.as_str()), vec!["2501001"]);
    }

    #[test]
    fn test_creator_status_filter() {
        let creators = sample_creators();
        let signed = filter_creators(&creators, "", StatusFilter::Signed);
        assert_eq!(ids(&signed, |c| c.id.as_str()), vec!["2501001", "2502003"]);

        let unsigned = filter_creators(&creators, "", StatusFilter::Unsigned);
        assert_eq!(ids(&unsigned, |c| c.id.as_str()), vec!["2501002"]);

        // Deal-only filters do not constrain creators.
        assert_eq!(filter_creators(&creators, "", StatusFilter::Overdue).len(), 3);
    }

    #[test]
    fn test_filter_is_repeatable() {
        let creators = sample_creators();
        let first = filter_creators(&creators, "2501", StatusFilter::Signed);
        let _ = filter_creators(&creators, "bob", StatusFilter::Unsigned);
        let again = filter_creators(&creators, "2501", StatusFilter::Signed);
        assert_eq!(first, again);
    }

    #[test]
    fn test_deal_filters() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let creators = sample_creators();
        let deals = vec![
            deal("D1", "2501001", "品牌甲", TransferStatus::Pending, "2025-06-01"),
            deal("D2", "2501002", "品牌乙", TransferStatus::Completed, "2025-01-01"),
            deal("D3", "9999999", "品牌丙", TransferStatus::Processing, "2025-07-01"),
        ];

        let overdue = filter_deals(&deals, &creators, "", StatusFilter::Overdue, today);
        assert_eq!(ids(&overdue, |d| d.id.as_str()), vec!["D1"]);

        let completed = filter_deals(&deals, &creators, "", StatusFilter::Completed, today);
        assert_eq!(ids(&completed, |d| d.id.as_str()), vec!["D2"]);

        // Joined creator name is searchable.
        let by_name = filter_deals(&deals, &creators, "bob", StatusFilter::All, today);
        assert_eq!(ids(&by_name, |d| d.id.as_str()), vec!["D2"]);

        // Dangling creator ids fall back to the raw id.
        let dangling = filter_deals(&deals, &creators, "9999", StatusFilter::All, today);
        assert_eq!(ids(&dangling, |d| d.id.as_str()), vec!["D3"]);
    }

    #[test]
    fn test_account_search_joins_creator_name() {
        let creators = sample_creators();
        let accounts = vec![
            Account {
                creator_id: "2501001".to_string(),
                platform: "抖音".to_string(),
                ..Default::default()
            },
            Account {
                creator_id: "2502003".to_string(),
                platform: "小红书".to_string(),
                ..Default::default()
            },
        ];
        let hits = filter_accounts(&accounts, &creators, "carol");
        assert_eq!(ids(&hits, |a| a.platform.as_str()), vec!["小红书"]);
        assert_eq!(filter_accounts(&accounts, &creators, "").len(), 2);
    }
}
