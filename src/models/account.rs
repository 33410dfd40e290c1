//! Platform account model: one creator's presence on one platform.

use serde::{Deserialize, Serialize};

/// A platform account. Identified by `(creator_id, platform)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Account {
    pub creator_id: String,
    pub platform: String,
    pub link: String,
    pub followers: u64,
    pub price: f64,
    pub update_date: String,
}

impl Account {
    /// Synthetic key used by update and delete requests.
    pub fn key(&self) -> String {
        account_key(&self.creator_id, &self.platform)
    }
}

pub fn account_key(creator_id: &str, platform: &str) -> String {
    format!("{}-{}", creator_id, platform)
}

/// Request body for `PUT /api/accounts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub account_id: String,
    pub updated_data: Account,
}

/// Request body for `DELETE /api/accounts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountRequest {
    pub account_id: String,
}
