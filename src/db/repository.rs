//! Database repository for CRUD operations.
//!
//! Rows keep their insertion order (`row_order`) so listings read like the sheet they replace.
//! Writes are whole-record replacements: last write wins.

use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{account_key, Account, Creator, Deal, TagSet, TransferStatus};

const CREATOR_COLUMNS: &str = "id, real_name, wechat_name, contact_method, city, in_group, interview_status, interviewer, interview_date, contract_status, contract_start_date, contract_end_date, commission, category, notes, transfer_account";

const ACCOUNT_COLUMNS: &str = "creator_id, platform, link, followers, price, update_date";

const DEAL_COLUMNS: &str = "id, creator_id, partner, deal_type, date, channel, amount, transfer_cycle, transfer_date, transfer_status, received_amount, company_share, creator_share, unallocated, informal_details";

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Next append position for a table.
    async fn next_row_order(&self, table: &str) -> Result<i64, AppError> {
        let row = sqlx::query(&format!(
            "SELECT COALESCE(MAX(row_order), 0) + 1 AS next FROM {}",
            table
        ))
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get("next"))
    }

    // ==================== CREATOR OPERATIONS ====================

    /// List all creators.
    pub async fn list_creators(&self) -> Result<Vec<Creator>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM creators ORDER BY row_order",
            CREATOR_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(creator_from_row).collect())
    }

    /// Get a creator by ID.
    pub async fn get_creator(&self, id: &str) -> Result<Option<Creator>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM creators WHERE id = ?",
            CREATOR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(creator_from_row))
    }

    /// Create a new creator. The id must be free.
    pub async fn create_creator(&self, creator: &Creator) -> Result<Creator, AppError> {
        if self.get_creator(&creator.id).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Creator {} already exists",
                creator.id
            )));
        }

        let row_order = self.next_row_order("creators").await?;
        bind_creator(
            sqlx::query(&format!(
                "INSERT INTO creators ({}, row_order) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                CREATOR_COLUMNS
            )),
            creator,
        )
        .bind(row_order)
        .execute(&self.pool)
        .await?;

        Ok(creator.clone())
    }

    /// Replace a creator. The id in `creator_id` wins over the body's id.
    pub async fn update_creator(
        &self,
        creator_id: &str,
        creator: &Creator,
    ) -> Result<Creator, AppError> {
        let mut updated = creator.clone();
        updated.id = creator_id.to_string();

        let result = bind_creator(
            sqlx::query(
                r#"UPDATE creators SET
                    id = ?, real_name = ?, wechat_name = ?, contact_method = ?, city = ?,
                    in_group = ?, interview_status = ?, interviewer = ?, interview_date = ?,
                    contract_status = ?, contract_start_date = ?, contract_end_date = ?,
                    commission = ?, category = ?, notes = ?, transfer_account = ?
                WHERE id = ?"#,
            ),
            &updated,
        )
        .bind(creator_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Creator {} not found",
                creator_id
            )));
        }

        Ok(updated)
    }

    /// Insert or replace a creator by id, keeping the row position of an existing record.
    pub async fn upsert_creator(&self, creator: &Creator) -> Result<(), AppError> {
        if self.get_creator(&creator.id).await?.is_some() {
            self.update_creator(&creator.id, creator).await?;
        } else {
            self.create_creator(creator).await?;
        }
        Ok(())
    }

    /// Delete a creator. Accounts and deals that reference it are left alone.
    pub async fn delete_creator(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM creators WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Creator {} not found", id)));
        }

        Ok(())
    }

    // ==================== ACCOUNT OPERATIONS ====================

    /// List all accounts.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM accounts ORDER BY row_order",
            ACCOUNT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(account_from_row).collect())
    }

    /// Get an account by its `creatorId-platform` key.
    pub async fn get_account(&self, key: &str) -> Result<Option<Account>, AppError> {
        // Matching on the joined key avoids guessing where a hyphenated id splits.
        let row = sqlx::query(&format!(
            "SELECT {} FROM accounts WHERE creator_id || '-' || platform = ?",
            ACCOUNT_COLUMNS
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(account_from_row))
    }

    /// Create a new account. `(creator_id, platform)` must be free.
    pub async fn create_account(&self, account: &Account) -> Result<Account, AppError> {
        if self.account_exists(account).await? {
            return Err(AppError::Conflict(format!(
                "Account {} already exists",
                account.key()
            )));
        }

        let row_order = self.next_row_order("accounts").await?;
        bind_account(
            sqlx::query(&format!(
                "INSERT INTO accounts ({}, row_order) VALUES (?, ?, ?, ?, ?, ?, ?)",
                ACCOUNT_COLUMNS
            )),
            account,
        )
        .bind(row_order)
        .execute(&self.pool)
        .await?;

        Ok(account.clone())
    }

    /// Replace the account stored under `key`. The record may move to a new
    /// `(creator_id, platform)` pair when that pair is free.
    pub async fn update_account(&self, key: &str, account: &Account) -> Result<Account, AppError> {
        let existing = self
            .get_account(key)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Account {} not found", key)))?;

        if existing.key() != account.key() && self.account_exists(account).await? {
            return Err(AppError::Conflict(format!(
                "Account {} already exists",
                account.key()
            )));
        }

        bind_account(
            sqlx::query(
                r#"UPDATE accounts SET
                    creator_id = ?, platform = ?, link = ?, followers = ?, price = ?, update_date = ?
                WHERE creator_id = ? AND platform = ?"#,
            ),
            account,
        )
        .bind(&existing.creator_id)
        .bind(&existing.platform)
        .execute(&self.pool)
        .await?;

        Ok(account.clone())
    }

    /// Delete an account by its `creatorId-platform` key.
    pub async fn delete_account(&self, key: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM accounts WHERE creator_id || '-' || platform = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Account {} not found", key)));
        }

        Ok(())
    }

    /// Accounts are addressed by the joined `creatorId-platform` key, so two pairs that
    /// join to the same key (`a-b`/`c` and `a`/`b-c`) cannot both be stored.
    async fn account_exists(&self, account: &Account) -> Result<bool, AppError> {
        let row = sqlx::query("SELECT 1 FROM accounts WHERE creator_id || '-' || platform = ?")
            .bind(account.key())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    // ==================== DEAL OPERATIONS ====================

    /// List all deals.
    pub async fn list_deals(&self) -> Result<Vec<Deal>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM deals ORDER BY row_order",
            DEAL_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(deal_from_row).collect())
    }

    /// Get a deal by ID.
    pub async fn get_deal(&self, id: &str) -> Result<Option<Deal>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM deals WHERE id = ?", DEAL_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(deal_from_row))
    }

    /// Create a new deal. The id must be free.
    pub async fn create_deal(&self, deal: &Deal) -> Result<Deal, AppError> {
        if self.get_deal(&deal.id).await?.is_some() {
            return Err(AppError::Conflict(format!("Deal {} already exists", deal.id)));
        }

        let row_order = self.next_row_order("deals").await?;
        bind_deal(
            sqlx::query(&format!(
                "INSERT INTO deals ({}, row_order) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                DEAL_COLUMNS
            )),
            deal,
        )
        .bind(row_order)
        .execute(&self.pool)
        .await?;

        Ok(deal.clone())
    }

    /// Replace a deal. The id in `deal_id` wins over the body's id.
    pub async fn update_deal(&self, deal_id: &str, deal: &Deal) -> Result<Deal, AppError> {
        let mut updated = deal.clone();
        updated.id = deal_id.to_string();

        let result = bind_deal(
            sqlx::query(
                r#"UPDATE deals SET
                    id = ?, creator_id = ?, partner = ?, deal_type = ?, date = ?, channel = ?,
                    amount = ?, transfer_cycle = ?, transfer_date = ?, transfer_status = ?,
                    received_amount = ?, company_share = ?, creator_share = ?, unallocated = ?,
                    informal_details = ?
                WHERE id = ?"#,
            ),
            &updated,
        )
        .bind(deal_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Deal {} not found", deal_id)));
        }

        Ok(updated)
    }

    /// Delete a deal.
    pub async fn delete_deal(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM deals WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Deal {} not found", id)));
        }

        Ok(())
    }
}

// Helper functions for binding and row conversion

type SqliteQuery<'q> = sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>;

fn bind_creator<'q>(query: SqliteQuery<'q>, creator: &Creator) -> SqliteQuery<'q> {
    query
        .bind(creator.id.clone())
        .bind(creator.real_name.clone())
        .bind(creator.wechat_name.clone())
        .bind(creator.contact_method.clone())
        .bind(creator.city.clone())
        .bind(creator.in_group.clone())
        .bind(creator.interview_status.clone())
        .bind(creator.interviewer.clone())
        .bind(creator.interview_date.clone())
        .bind(creator.contract_status.joined())
        .bind(creator.contract_start_date.clone())
        .bind(creator.contract_end_date.clone())
        .bind(creator.commission)
        .bind(creator.category.joined())
        .bind(creator.notes.clone())
        .bind(creator.transfer_account.clone())
}

fn bind_account<'q>(query: SqliteQuery<'q>, account: &Account) -> SqliteQuery<'q> {
    query
        .bind(account.creator_id.clone())
        .bind(account.platform.clone())
        .bind(account.link.clone())
        .bind(i64::try_from(account.followers).unwrap_or(i64::MAX))
        .bind(account.price)
        .bind(account.update_date.clone())
}

fn bind_deal<'q>(query: SqliteQuery<'q>, deal: &Deal) -> SqliteQuery<'q> {
    query
        .bind(deal.id.clone())
        .bind(deal.creator_id.clone())
        .bind(deal.partner.clone())
        .bind(deal.deal_type.clone())
        .bind(deal.date.clone())
        .bind(deal.channel.clone())
        .bind(deal.amount)
        .bind(deal.transfer_cycle.clone())
        .bind(deal.transfer_date.clone())
        .bind(deal.transfer_status.as_str().to_string())
        .bind(deal.received_amount)
        .bind(deal.company_share)
        .bind(deal.creator_share)
        .bind(deal.unallocated)
        .bind(deal.informal_details.clone())
}

fn creator_from_row(row: &sqlx::sqlite::SqliteRow) -> Creator {
    let contract_status: String = row.get("contract_status");
    let category: String = row.get("category");
    Creator {
        id: row.get("id"),
        real_name: row.get("real_name"),
        wechat_name: row.get("wechat_name"),
        contact_method: row.get("contact_method"),
        city: row.get("city"),
        in_group: row.get("in_group"),
        interview_status: row.get("interview_status"),
        interviewer: row.get("interviewer"),
        interview_date: row.get("interview_date"),
        contract_status: TagSet::parse(&contract_status),
        contract_start_date: row.get("contract_start_date"),
        contract_end_date: row.get("contract_end_date"),
        commission: row.get("commission"),
        category: TagSet::parse(&category),
        notes: row.get("notes"),
        transfer_account: row.get("transfer_account"),
    }
}

fn account_from_row(row: &sqlx::sqlite::SqliteRow) -> Account {
    let followers: i64 = row.get("followers");
    Account {
        creator_id: row.get("creator_id"),
        platform: row.get("platform"),
        link: row.get("link"),
        followers: u64::try_from(followers).unwrap_or(0),
        price: row.get("price"),
        update_date: row.get("update_date"),
    }
}

fn deal_from_row(row: &sqlx::sqlite::SqliteRow) -> Deal {
    let transfer_status: String = row.get("transfer_status");
    Deal {
        id: row.get("id"),
        creator_id: row.get("creator_id"),
        partner: row.get("partner"),
        deal_type: row.get("deal_type"),
        date: row.get("date"),
        channel: row.get("channel"),
        amount: row.get("amount"),
        transfer_cycle: row.get("transfer_cycle"),
        transfer_date: row.get("transfer_date"),
        transfer_status: TransferStatus::parse(&transfer_status),
        received_amount: row.get("received_amount"),
        company_share: row.get("company_share"),
        creator_share: row.get("creator_share"),
        unallocated: row.get("unallocated"),
        informal_details: row.get("informal_details"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use tempfile::TempDir;

    async fn repo() -> (Repository, TempDir) {
        let dir = TempDir::new().unwrap();
        let pool = init_database(&dir.path().join("test.sqlite")).await.unwrap();
        (Repository::new(pool), dir)
    }

    #[tokio::test]
    async fn test_creator_round_trip_keeps_tags_and_order() {
        let (repo, _dir) = repo().await;

        for id in ["2501002", "2501001"] {
            repo.create_creator(&Creator {
                id: id.to_string(),
                real_name: format!("达人{}", id),
                category: TagSet::parse("美妆护肤, 生活方式"),
                commission: 0.6,
                ..Default::default()
            })
            .await
            .unwrap();
        }

        let creators = repo.list_creators().await.unwrap();
        assert_eq!(creators.len(), 2);
        assert_eq!(creators[0].id, "2501002");
        assert_eq!(creators[1].category, TagSet::parse("美妆护肤,生活方式"));
    }

    #[tokio::test]
    async fn test_duplicate_creator_conflicts() {
        let (repo, _dir) = repo().await;
        let creator = Creator {
            id: "2501001".to_string(),
            real_name: "张三".to_string(),
            ..Default::default()
        };
        repo.create_creator(&creator).await.unwrap();
        let err = repo.create_creator(&creator).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_unique_violation_maps_to_conflict() {
        let (repo, _dir) = repo().await;
        let creator = Creator {
            id: "2501001".to_string(),
            real_name: "张三".to_string(),
            ..Default::default()
        };

        let (first, second) = tokio::join!(
            repo.create_creator(&creator),
            repo.create_creator(&creator)
        );
        let conflicts = [first, second]
            .into_iter()
            .filter(|result| matches!(result, Err(AppError::Conflict(_))))
            .count();
        assert_eq!(conflicts, 1);

        // Insert that skips the existence check
        let err = sqlx::query("INSERT INTO creators (id, real_name, row_order) VALUES (?, ?, ?)")
            .bind("2501001")
            .bind("李四")
            .bind(99)
            .execute(&repo.pool)
            .await
            .unwrap_err();
        assert!(matches!(AppError::from(err), AppError::Conflict(_)));
        assert_eq!(repo.list_creators().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_accounts_joining_to_same_key_conflict() {
        let (repo, _dir) = repo().await;
        repo.create_account(&Account {
            creator_id: "a-b".to_string(),
            platform: "c".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

        let other = Account {
            creator_id: "a".to_string(),
            platform: "b-c".to_string(),
            ..Default::default()
        };
        let err = repo.create_account(&other).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        repo.create_account(&Account {
            creator_id: "a".to_string(),
            platform: "d".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
        let err = repo.update_account("a-d", &other).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        repo.delete_account("a-b-c").await.unwrap();
        let remaining = repo.list_accounts().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].key(), "a-d");
    }

    #[tokio::test]
    async fn test_account_key_lookup_with_hyphenated_ids() {
        let (repo, _dir) = repo().await;
        let account = Account {
            creator_id: "25-01".to_string(),
            platform: "小红书".to_string(),
            followers: 12_000,
            ..Default::default()
        };
        repo.create_account(&account).await.unwrap();

        let found = repo.get_account("25-01-小红书").await.unwrap().unwrap();
        assert_eq!(found.followers, 12_000);

        let moved = Account {
            platform: "抖音".to_string(),
            ..account.clone()
        };
        repo.update_account("25-01-小红书", &moved).await.unwrap();
        assert!(repo.get_account("25-01-小红书").await.unwrap().is_none());
        repo.delete_account(&account_key("25-01", "抖音")).await.unwrap();
        assert!(repo.list_accounts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_deal_is_not_found() {
        let (repo, _dir) = repo().await;
        let err = repo
            .update_deal("D-missing", &Deal::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
