//! Dashboard aggregates and chart series.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::{parse_date, Account, Creator, Deal};

const TOP_N: usize = 5;
const TREND_MONTHS: u32 = 6;

/// A named count for the top-N bar charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub name: String,
    pub count: usize,
}

/// One point of the revenue trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenue {
    /// `YYYY-MM`
    pub month: String,
    /// `{M}月`
    pub label: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub signed_creators: usize,
    pub total_followers: u64,
    pub total_revenue: f64,
    pub deal_count: usize,
    pub average_deal_value: f64,
    pub top_categories: Vec<Bucket>,
    pub top_partners: Vec<Bucket>,
    pub revenue_trend: Vec<MonthlyRevenue>,
}

impl DashboardStats {
    pub fn compute(
        creators: &[Creator],
        accounts: &[Account],
        deals: &[Deal],
        today: NaiveDate,
    ) -> Self {
        let total_revenue: f64 = deals.iter().map(|d| d.received_amount).sum();
        let average_deal_value = if deals.is_empty() {
            0.0
        } else {
            total_revenue / deals.len() as f64
        };

        Self {
            signed_creators: creators.iter().filter(|c| c.is_signed()).count(),
            total_followers: accounts
                .iter()
                .fold(0u64, |sum, a| sum.saturating_add(a.followers)),
            total_revenue,
            deal_count: deals.len(),
            average_deal_value,
            top_categories: top_categories(creators),
            top_partners: top_partners(deals),
            revenue_trend: revenue_trend(deals, today),
        }
    }
}

fn top_n(counts: HashMap<&str, usize>) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = counts
        .into_iter()
        .map(|(name, count)| Bucket {
            name: name.to_string(),
            count,
        })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    buckets.truncate(TOP_N);
    buckets
}

/// Each category tag of a creator counts once for that creator.
pub fn top_categories(creators: &[Creator]) -> Vec<Bucket> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for creator in creators {
        for tag in creator.category.iter() {
            *counts.entry(tag).or_default() += 1;
        }
    }
    top_n(counts)
}

pub fn top_partners(deals: &[Deal]) -> Vec<Bucket> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for deal in deals {
        let partner = deal.partner.trim();
        if partner.is_empty() {
            continue;
        }
        *counts.entry(partner).or_default() += 1;
    }
    top_n(counts)
}

/// Received amounts over the six months ending with `today`'s month, oldest first.
pub fn revenue_trend(deals: &[Deal], today: NaiveDate) -> Vec<MonthlyRevenue> {
    let months: Vec<(i32, u32)> = (0..TREND_MONTHS)
        .rev()
        .map(|back| months_before(today.year(), today.month(), back))
        .collect();

    let mut revenue: HashMap<(i32, u32), f64> = months.iter().map(|m| (*m, 0.0)).collect();
    for deal in deals {
        let Some(date) = parse_date(&deal.date) else {
            continue;
        };
        if let Some(total) = revenue.get_mut(&(date.year(), date.month())) {
            *total += deal.received_amount;
        }
    }

    months
        .into_iter()
        .map(|(year, month)| MonthlyRevenue {
            month: format!("{year:04}-{month:02}"),
            label: format!("{month}月"),
            revenue: revenue.get(&(year, month)).copied().unwrap_or(0.0),
        })
        .collect()
}

fn months_before(year: i32, month: u32, back: u32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 - back as i32;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TagSet;

    fn creator(category: &str, status: &str) -> Creator {
        Creator {
            category: TagSet::parse(category),
            contract_status: TagSet::parse(status),
            ..Default::default()
        }
    }

    fn deal(partner: &str, date: &str, received: f64) -> Deal {
        Deal {
            partner: partner.to_string(),
            date: date.to_string(),
            received_amount: received,
            ..Default::default()
        }
    }

    #[test]
    fn test_category_counts_each_tag_once_per_creator() {
        let creators = vec![
            creator("美妆, 生活", "已签约"),
            creator("美妆", ""),
            creator("美妆,美妆", ""),
        ];
        let top = top_categories(&creators);
        assert_eq!(
            top,
            vec![
                Bucket {
                    name: "美妆".to_string(),
                    count: 3
                },
                Bucket {
                    name: "生活".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_top_partners_ties_and_limit() {
        let deals: Vec<Deal> = ["f", "e", "d", "c", "b", "a", "a", ""]
            .iter()
            .map(|p| deal(p, "", 0.0))
            .collect();
        let names: Vec<String> = top_partners(&deals).into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_revenue_trend_spans_year_boundary() {
        let today = NaiveDate::from_ymd_opt(2025, 2, 14).unwrap();
        let deals = vec![
            deal("x", "2025-02-01", 100.0),
            deal("y", "2024/11/30", 40.0),
            deal("y", "2024-11-02", 2.5),
            deal("z", "2024-08-31", 999.0),
            deal("z", "not a date", 999.0),
        ];
        let trend = revenue_trend(&deals, today);

        let months: Vec<&str> = trend.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(
            months,
            vec!["2024-09", "2024-10", "2024-11", "2024-12", "2025-01", "2025-02"]
        );
        assert_eq!(trend[0].label, "9月");
        assert_eq!(trend[2].revenue, 42.5);
        assert_eq!(trend[3].revenue, 0.0);
        assert_eq!(trend[5].revenue, 100.0);
    }

    #[test]
    fn test_totals() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let creators = vec![creator("", "已签约"), creator("", "商务合作"), creator("", "面试中")];
        let accounts = vec![
            Account {
                followers: 1200,
                ..Default::default()
            },
            Account {
                followers: 800,
                ..Default::default()
            },
        ];
        let deals = vec![deal("a", "2025-06-01", 300.0), deal("b", "2025-05-01", 100.0)];

        let stats = DashboardStats::compute(&creators, &accounts, &deals, today);
        assert_eq!(stats.signed_creators, 2);
        assert_eq!(stats.total_followers, 2000);
        assert_eq!(stats.total_revenue, 400.0);
        assert_eq!(stats.deal_count, 2);
        assert_eq!(stats.average_deal_value, 200.0);

        let empty = DashboardStats::compute(&[], &[], &[], today);
        assert_eq!(empty.average_deal_value, 0.0);
        assert_eq!(empty.revenue_trend.len(), 6);
    }
}
