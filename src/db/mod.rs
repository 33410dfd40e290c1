//! Database module for SQLite persistence.
//!
//! SQLite stands in for the spreadsheet the dashboard was first built against:
//! one table per collection, multi-valued fields stored comma-joined.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS creators (
            id TEXT PRIMARY KEY,
            real_name TEXT NOT NULL,
            wechat_name TEXT NOT NULL DEFAULT '',
            contact_method TEXT NOT NULL DEFAULT '',
            city TEXT NOT NULL DEFAULT '',
            in_group TEXT NOT NULL DEFAULT '',
            interview_status TEXT NOT NULL DEFAULT '',
            interviewer TEXT NOT NULL DEFAULT '',
            interview_date TEXT NOT NULL DEFAULT '',
            contract_status TEXT NOT NULL DEFAULT '',
            contract_start_date TEXT NOT NULL DEFAULT '',
            contract_end_date TEXT NOT NULL DEFAULT '',
            commission REAL NOT NULL DEFAULT 0,
            category TEXT NOT NULL DEFAULT '',
            notes TEXT NOT NULL DEFAULT '',
            transfer_account TEXT NOT NULL DEFAULT '',
            row_order INTEGER NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            creator_id TEXT NOT NULL,
            platform TEXT NOT NULL,
            link TEXT NOT NULL DEFAULT '',
            followers INTEGER NOT NULL DEFAULT 0,
            price REAL NOT NULL DEFAULT 0,
            update_date TEXT NOT NULL DEFAULT '',
            row_order INTEGER NOT NULL,
            PRIMARY KEY (creator_id, platform)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Deals reference creators by id only; dangling references are allowed.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS deals (
            id TEXT PRIMARY KEY,
            creator_id TEXT NOT NULL,
            partner TEXT NOT NULL DEFAULT '',
            deal_type TEXT NOT NULL DEFAULT '',
            date TEXT NOT NULL DEFAULT '',
            channel TEXT NOT NULL DEFAULT '',
            amount REAL NOT NULL DEFAULT 0,
            transfer_cycle TEXT NOT NULL DEFAULT '',
            transfer_date TEXT NOT NULL DEFAULT '',
            transfer_status TEXT NOT NULL DEFAULT '',
            received_amount REAL NOT NULL DEFAULT 0,
            company_share REAL NOT NULL DEFAULT 0,
            creator_share REAL NOT NULL DEFAULT 0,
            unallocated REAL NOT NULL DEFAULT 0,
            informal_details TEXT NOT NULL DEFAULT '',
            row_order INTEGER NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_creators_row_order ON creators(row_order);
        CREATE INDEX IF NOT EXISTS idx_accounts_row_order ON accounts(row_order);
        CREATE INDEX IF NOT EXISTS idx_deals_row_order ON deals(row_order);
        CREATE INDEX IF NOT EXISTS idx_deals_creator_id ON deals(creator_id);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
