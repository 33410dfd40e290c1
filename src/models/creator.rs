//! Creator model: the agency's signed or prospective talent.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::TagSet;

/// Contract-status tags that mark a creator as signed.
pub const SIGNED_TAGS: [&str; 2] = ["已签约", "商务合作"];

/// A creator profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Creator {
    pub id: String,
    pub real_name: String,
    pub wechat_name: String,
    pub contact_method: String,
    pub city: String,
    pub in_group: String,
    pub interview_status: String,
    pub interviewer: String,
    pub interview_date: String,
    pub contract_status: TagSet,
    pub contract_start_date: String,
    pub contract_end_date: String,
    /// Creator's fraction of deal amounts, within [0, 1].
    pub commission: f64,
    pub category: TagSet,
    pub notes: String,
    pub transfer_account: String,
}

impl Creator {
    /// Whether the contract status carries a signed or business-contract tag.
    pub fn is_signed(&self) -> bool {
        SIGNED_TAGS.iter().any(|tag| self.contract_status.contains(tag))
    }
}

/// Generate a human-readable creator id: `YYMM` followed by a three digit suffix.
pub fn generate_creator_id(today: NaiveDate) -> String {
    format!(
        "{:02}{:02}{:03}",
        today.year() % 100,
        today.month(),
        rand::random_range(0..1000u32)
    )
}

/// Request body for `PUT /api/creators`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCreatorRequest {
    pub creator_id: String,
    pub updated_data: Creator,
}

/// Request body for `DELETE /api/creators`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCreatorRequest {
    pub creator_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_signed() {
        let mut creator = Creator {
            contract_status: TagSet::parse("面试中"),
            ..Default::default()
        };
        assert!(!creator.is_signed());

        creator.contract_status = TagSet::parse("面试中,商务合作");
        assert!(creator.is_signed());
    }

    #[test]
    fn test_generate_creator_id_shape() {
        let id = generate_creator_id(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_eq!(id.len(), 7);
        assert!(id.starts_with("2501"));
        assert!(id.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_deserialize_partial_record() {
        let creator: Creator = serde_json::from_str(
            r#"{"id":"2501001","realName":"张三","commission":0.7,"category":"美妆护肤, 生活方式"}"#,
        )
        .unwrap();
        assert_eq!(creator.real_name, "张三");
        assert_eq!(creator.category.len(), 2);
        assert!(creator.city.is_empty());
    }
}
