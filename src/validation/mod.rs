//! Editor validation shared by the dashboard data layer and the store service.
//!
//! Each validator collects every field problem instead of stopping at the first one,
//! so an editor can mark all offending inputs at once.

use serde::{Deserialize, Serialize};

use crate::models::{parse_date, Account, Creator, Deal};

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Join field errors into one human-readable line.
pub fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Default)]
struct Collector {
    errors: Vec<FieldError>,
}

impl Collector {
    fn required(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.errors.push(FieldError::new(field, "is required"));
        }
    }

    fn date(&mut self, field: &str, value: &str) {
        if !value.trim().is_empty() && parse_date(value).is_none() {
            self.errors
                .push(FieldError::new(field, format!("'{}' is not a valid date", value)));
        }
    }

    fn non_negative(&mut self, field: &str, value: f64) {
        if !value.is_finite() || value < 0.0 {
            self.errors
                .push(FieldError::new(field, "must be a non-negative number"));
        }
    }

    fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

pub fn validate_creator(creator: &Creator) -> Result<(), Vec<FieldError>> {
    let mut c = Collector::default();

    c.required("realName", &creator.real_name);

    if !creator.commission.is_finite() || !(0.0..=1.0).contains(&creator.commission) {
        c.errors
            .push(FieldError::new("commission", "must be between 0 and 1"));
    }

    c.date("interviewDate", &creator.interview_date);
    c.date("contractStartDate", &creator.contract_start_date);
    c.date("contractEndDate", &creator.contract_end_date);

    if let (Some(start), Some(end)) = (
        parse_date(&creator.contract_start_date),
        parse_date(&creator.contract_end_date),
    ) {
        if start > end {
            c.errors.push(FieldError::new(
                "contractEndDate",
                "must not be before the contract start date",
            ));
        }
    }

    c.finish()
}

pub fn validate_account(account: &Account) -> Result<(), Vec<FieldError>> {
    let mut c = Collector::default();

    c.required("creatorId", &account.creator_id);
    c.required("platform", &account.platform);
    c.non_negative("price", account.price);
    c.date("updateDate", &account.update_date);

    let link = account.link.trim();
    if !link.is_empty() && !(link.starts_with("http://") || link.starts_with("https://")) {
        c.errors
            .push(FieldError::new("link", "must start with http:// or https://"));
    }

    c.finish()
}

pub fn validate_deal(deal: &Deal) -> Result<(), Vec<FieldError>> {
    let mut c = Collector::default();

    c.required("creatorId", &deal.creator_id);
    c.required("partner", &deal.partner);
    c.non_negative("amount", deal.amount);
    c.non_negative("receivedAmount", deal.received_amount);
    c.date("date", &deal.date);
    c.date("transferDate", &deal.transfer_date);

    c.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(errors: Vec<FieldError>) -> Vec<String> {
        errors.into_iter().map(|e| e.field).collect()
    }

    #[test]
    fn test_valid_creator() {
        let creator = Creator {
            id: "2501001".to_string(),
            real_name: "张三".to_string(),
            commission: 0.7,
            contract_start_date: "2025-01-01".to_string(),
            contract_end_date: "2026-01-01".to_string(),
            ..Default::default()
        };
        assert!(validate_creator(&creator).is_ok());
    }

    #[test]
    fn test_creator_collects_all_errors() {
        let creator = Creator {
            commission: 1.5,
            contract_start_date: "2026-01-01".to_string(),
            contract_end_date: "2025-01-01".to_string(),
            interview_date: "昨天".to_string(),
            ..Default::default()
        };
        let errors = fields(validate_creator(&creator).unwrap_err());
        assert_eq!(
            errors,
            vec!["realName", "commission", "interviewDate", "contractEndDate"]
        );
    }

    #[test]
    fn test_account_rules() {
        let account = Account {
            creator_id: "2501001".to_string(),
            platform: String::new(),
            link: "douyin.com/abc".to_string(),
            price: -1.0,
            ..Default::default()
        };
        let errors = fields(validate_account(&account).unwrap_err());
        assert_eq!(errors, vec!["platform", "price", "link"]);
    }

    #[test]
    fn test_deal_rules() {
        let deal = Deal {
            creator_id: "2501001".to_string(),
            partner: "某品牌".to_string(),
            amount: 1000.0,
            date: "2025-02-01".to_string(),
            ..Default::default()
        };
        assert!(validate_deal(&deal).is_ok());

        let bad = Deal {
            amount: f64::NAN,
            ..deal
        };
        assert_eq!(fields(validate_deal(&bad).unwrap_err()), vec!["amount"]);
    }

    #[test]
    fn test_summarize() {
        let errors = vec![
            FieldError::new("realName", "is required"),
            FieldError::new("commission", "must be between 0 and 1"),
        ];
        assert_eq!(
            summarize(&errors),
            "realName: is required; commission: must be between 0 and 1"
        );
    }
}
