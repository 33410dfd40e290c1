//! Deal model: one business collaboration tied to a creator.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::dates::parse_date;

/// Transfer state of a deal's payout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TransferStatus {
    /// 待转账
    Pending,
    /// 处理中
    Processing,
    /// 已转账
    Completed,
    /// Anything else the store holds, kept verbatim.
    Other(String),
    #[default]
    Unset,
}

impl TransferStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TransferStatus::Pending => "待转账",
            TransferStatus::Processing => "处理中",
            TransferStatus::Completed => "已转账",
            TransferStatus::Other(s) => s,
            TransferStatus::Unset => "",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "待转账" => TransferStatus::Pending,
            "处理中" => TransferStatus::Processing,
            "已转账" => TransferStatus::Completed,
            "" => TransferStatus::Unset,
            other => TransferStatus::Other(other.to_string()),
        }
    }
}

impl Serialize for TransferStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TransferStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|s| TransferStatus::parse(&s)).unwrap_or_default())
    }
}

/// A deal record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Deal {
    pub id: String,
    pub creator_id: String,
    pub partner: String,
    #[serde(rename = "type")]
    pub deal_type: String,
    pub date: String,
    pub channel: String,
    pub amount: f64,
    pub transfer_cycle: String,
    pub transfer_date: String,
    pub transfer_status: TransferStatus,
    pub received_amount: f64,
    pub company_share: f64,
    pub creator_share: f64,
    pub unallocated: f64,
    pub informal_details: String,
}

impl Deal {
    /// Overwrite the stored shares from `amount` and the creator's commission.
    pub fn apply_commission(&mut self, commission: f64) {
        let split = ShareSplit::compute(self.amount, commission);
        self.creator_share = split.creator_share;
        self.company_share = split.company_share;
    }

    /// Unpaid and past its transfer date. Deals without a readable transfer date are never overdue.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        if self.transfer_status == TransferStatus::Completed {
            return false;
        }
        parse_date(&self.transfer_date).is_some_and(|due| due < today)
    }
}

/// Creator/company split of a deal amount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShareSplit {
    pub creator_share: f64,
    pub company_share: f64,
}

impl ShareSplit {
    /// The creator's share is rounded half away from zero; the company takes the remainder,
    /// so the two always sum to `amount`.
    pub fn compute(amount: f64, commission: f64) -> Self {
        let commission = if commission.is_finite() {
            commission.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let creator_share = (amount * commission).round();
        Self {
            creator_share,
            company_share: amount - creator_share,
        }
    }
}

/// Generate a deal id: `D` + `YYMMDD` + four digit suffix.
pub fn generate_deal_id(today: NaiveDate) -> String {
    format!(
        "D{:02}{:02}{:02}{:04}",
        today.year() % 100,
        today.month(),
        today.day(),
        rand::random_range(0..10000u32)
    )
}

/// Request body for `PUT /api/deals`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDealRequest {
    pub deal_id: String,
    pub updated_data: Deal,
}

/// Request body for `DELETE /api/deals`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDealRequest {
    pub deal_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_split_even_commission() {
        let split = ShareSplit::compute(1000.0, 0.7);
        assert_eq!(split.creator_share, 700.0);
        assert_eq!(split.company_share, 300.0);
    }

    #[test]
    fn test_split_rounds_creator_share() {
        // 999 * 0.33 = 329.67
        let split = ShareSplit::compute(999.0, 0.33);
        assert_eq!(split.creator_share, 330.0);
        assert_eq!(split.company_share, 669.0);

        // 999 * 0.5 = 499.5 rounds away from zero
        let split = ShareSplit::compute(999.0, 0.5);
        assert_eq!(split.creator_share, 500.0);
        assert_eq!(split.company_share, 499.0);
    }

    #[test]
    fn test_split_sums_to_amount() {
        for (amount, commission) in [(1234.0, 0.15), (1.0, 0.5), (0.0, 0.9), (88888.0, 1.0)] {
            let split = ShareSplit::compute(amount, commission);
            assert_eq!(split.creator_share + split.company_share, amount);
        }
    }

    #[test]
    fn test_split_clamps_bad_commission() {
        assert_eq!(ShareSplit::compute(100.0, f64::NAN).creator_share, 0.0);
        assert_eq!(ShareSplit::compute(100.0, 3.0).creator_share, 100.0);
    }

    #[test]
    fn test_overdue() {
        let today = day(2025, 6, 10);
        let mut deal = Deal {
            transfer_status: TransferStatus::Pending,
            transfer_date: "2025-06-09".to_string(),
            ..Default::default()
        };
        assert!(deal.is_overdue(today));

        deal.transfer_date = "2025-06-10".to_string();
        assert!(!deal.is_overdue(today));

        deal.transfer_date = "2020-01-01".to_string();
        deal.transfer_status = TransferStatus::Completed;
        assert!(!deal.is_overdue(today));

        deal.transfer_status = TransferStatus::Other("部分转账".to_string());
        assert!(deal.is_overdue(today));

        deal.transfer_date = String::new();
        assert!(!deal.is_overdue(today));
    }

    #[test]
    fn test_transfer_status_wire_form() {
        let deal: Deal =
            serde_json::from_str(r#"{"id":"D1","type":"广告","transferStatus":"处理中"}"#).unwrap();
        assert_eq!(deal.transfer_status, TransferStatus::Processing);
        assert_eq!(deal.deal_type, "广告");

        let json = serde_json::to_value(&deal).unwrap();
        assert_eq!(json["transferStatus"], "处理中");
        assert_eq!(json["type"], "广告");
    }

    #[test]
    fn test_generate_deal_id_shape() {
        let id = generate_deal_id(day(2025, 1, 5));
        assert!(id.starts_with("D250105"));
        assert_eq!(id.len(), 11);
    }
}
