//! Dashboard data layer.
//!
//! A [`Workspace`] owns the creators, accounts and deals fetched from the record store,
//! the dashboard's view state and a queue of user-facing notices. Mutations are sent to
//! the store first and only touch local state once the store has accepted them. After a
//! mutation is applied the [`ReconcilePolicy`] decides whether the collection is fetched
//! again to pick up what the store actually holds.

mod client;
mod error;
pub mod filter;
pub mod sort;
pub mod stats;
pub mod view;

pub use client::{ClientConfig, CrmClient};
pub use error::{AuthError, ClientError, ClientResult, WorkspaceError};
pub use stats::{Bucket, DashboardStats, MonthlyRevenue};
pub use view::*;

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;

use crate::api::ApiResponse;
use crate::models::{
    account_key, generate_creator_id, generate_deal_id, Account, Creator, Deal, ExportFormat,
    ExportRequest, ImportPreview, ImportSummary, RecordKind, Session,
};
use crate::validation::{validate_account, validate_creator, validate_deal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Warning,
}

/// A message for the user, shown as an alert by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutation {
    Create,
    Update,
    Delete,
}

/// What to do after a successful mutation has been applied locally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Reconcile {
    /// Trust the applied change.
    #[default]
    None,
    /// Fetch the whole collection again after the delay. The mutating call awaits the
    /// delay and the refetch before it returns.
    RefetchAfter(Duration),
}

/// Reconcile step per collection and mutation type.
#[derive(Debug, Clone)]
pub struct ReconcilePolicy {
    rules: HashMap<(RecordKind, Mutation), Reconcile>,
}

impl Default for ReconcilePolicy {
    /// Account creation is refetched after two seconds; everything else is trusted.
    fn default() -> Self {
        Self::none().with(
            RecordKind::Accounts,
            Mutation::Create,
            Reconcile::RefetchAfter(Duration::from_secs(2)),
        )
    }
}

impl ReconcilePolicy {
    /// Never refetch after a mutation.
    pub fn none() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    pub fn with(mut self, kind: RecordKind, mutation: Mutation, reconcile: Reconcile) -> Self {
        self.rules.insert((kind, mutation), reconcile);
        self
    }

    pub fn get(&self, kind: RecordKind, mutation: Mutation) -> Reconcile {
        self.rules
            .get(&(kind, mutation))
            .copied()
            .unwrap_or_default()
    }
}

/// Whether a save creates a record or replaces the one stored under `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveMode {
    Create,
    /// `key` is the record's id before the edit (`creatorId-platform` for accounts).
    Update { key: String },
}

impl SaveMode {
    fn mutation(&self) -> Mutation {
        match self {
            SaveMode::Create => Mutation::Create,
            SaveMode::Update { .. } => Mutation::Update,
        }
    }
}

/// Result of an operation that asks the user first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Cancelled,
}

/// Single-entry cache keyed on everything the value depends on.
struct Memo<K, V>(Option<(K, V)>);

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self(None)
    }
}

impl<K: PartialEq, V> Memo<K, V> {
    fn get(&mut self, key: K, compute: impl FnOnce() -> V) -> &V {
        if let Some((cached, _)) = &self.0 {
            if *cached != key {
                self.0 = None;
            }
        }
        &self.0.get_or_insert_with(|| (key, compute())).1
    }
}

type CreatorViewKey = (u64, String, StatusFilter, SortState<CreatorSortKey>);
type AccountViewKey = (u64, String, SortState<AccountSortKey>);
type DealViewKey = (u64, String, StatusFilter, SortState<DealSortKey>, NaiveDate);

fn kind_label(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Creators => "达人",
        RecordKind::Accounts => "账号",
        RecordKind::Deals => "商务合作",
    }
}

async fn read_upload(path: &Path) -> ClientResult<(Vec<u8>, String)> {
    let bytes = tokio::fs::read(path).await?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "import.csv".to_string());
    Ok((bytes, filename))
}

/// Client-side state of the dashboard.
pub struct Workspace {
    client: CrmClient,
    policy: ReconcilePolicy,
    requires_login: bool,
    session: Option<Session>,

    creators: Vec<Creator>,
    accounts: Vec<Account>,
    deals: Vec<Deal>,
    /// Bumped on every change to the collections.
    revision: u64,

    view: ViewState,
    loading: bool,
    refreshing: bool,
    notices: Vec<Notice>,
    today: Option<NaiveDate>,

    creator_view: Memo<CreatorViewKey, Vec<Creator>>,
    account_view: Memo<AccountViewKey, Vec<Account>>,
    deal_view: Memo<DealViewKey, Vec<Deal>>,
    stats: Memo<(u64, NaiveDate), DashboardStats>,
}

impl Workspace {
    /// A workspace for a store that requires password login before anything loads.
    pub fn new(client: CrmClient) -> Self {
        Self {
            client,
            policy: ReconcilePolicy::default(),
            requires_login: true,
            session: None,
            creators: Vec::new(),
            accounts: Vec::new(),
            deals: Vec::new(),
            revision: 0,
            view: ViewState::default(),
            loading: false,
            refreshing: false,
            notices: Vec::new(),
            today: None,
            creator_view: Memo::default(),
            account_view: Memo::default(),
            deal_view: Memo::default(),
            stats: Memo::default(),
        }
    }

    /// A workspace for a store reached with a PSK or running open; no login step.
    pub fn open(client: CrmClient) -> Self {
        Self {
            requires_login: false,
            ..Self::new(client)
        }
    }

    pub fn with_policy(mut self, policy: ReconcilePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Pin "today" for overdue checks, ids and the revenue trend. `None` uses the local date.
    pub fn set_today(&mut self, today: Option<NaiveDate>) {
        self.today = today;
    }

    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    // ========== Session ==========

    pub fn is_authenticated(&self) -> bool {
        !self.requires_login || self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub async fn login(&mut self, password: &str) -> Result<Session, AuthError> {
        let result = self.client.login(password).await;
        match result {
            Ok(session) => {
                tracing::info!("Logged in, session expires {}", session.expires_at);
                self.session = Some(session.clone());
                Ok(session)
            }
            Err(err) => {
                let err = AuthError::from(err);
                tracing::warn!("Login failed: {}", err);
                self.notify(NoticeLevel::Error, format!("登录失败: {}", err));
                Err(err)
            }
        }
    }

    /// End the session and forget all loaded records.
    pub async fn logout(&mut self) {
        if let Err(err) = self.client.logout().await {
            tracing::warn!("Logout request failed: {}", err);
        }
        self.session = None;
        self.creators.clear();
        self.accounts.clear();
        self.deals.clear();
        self.touch();
    }

    fn ensure_authenticated(&self) -> Result<(), WorkspaceError> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(WorkspaceError::NotAuthenticated)
        }
    }

    // ========== Loading ==========

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    /// Fetch all three collections. Does nothing until logged in.
    pub async fn load(&mut self) {
        if !self.is_authenticated() {
            tracing::debug!("Skipping load: not logged in");
            return;
        }
        self.loading = true;
        self.fetch_all().await;
        self.loading = false;
    }

    /// Same as [`Workspace::load`], flagged as a refresh.
    pub async fn refresh(&mut self) {
        if !self.is_authenticated() {
            return;
        }
        self.refreshing = true;
        self.fetch_all().await;
        self.refreshing = false;
    }

    /// Each collection is replaced on its own; a failed fetch keeps the previous rows.
    async fn fetch_all(&mut self) {
        let (creators, accounts, deals) = tokio::join!(
            self.client.list_creators(),
            self.client.list_accounts(),
            self.client.list_deals()
        );

        match creators {
            Ok(rows) => self.creators = rows,
            Err(err) => self.fetch_failed(RecordKind::Creators, &err),
        }
        match accounts {
            Ok(rows) => self.accounts = rows,
            Err(err) => self.fetch_failed(RecordKind::Accounts, &err),
        }
        match deals {
            Ok(rows) => self.deals = rows,
            Err(err) => self.fetch_failed(RecordKind::Deals, &err),
        }
        self.touch();

        tracing::info!(
            "Loaded {} creators, {} accounts, {} deals",
            self.creators.len(),
            self.accounts.len(),
            self.deals.len()
        );
    }

    fn fetch_failed(&mut self, kind: RecordKind, err: &ClientError) {
        tracing::warn!("Failed to load {}: {}", kind, err);
        self.notify(
            NoticeLevel::Error,
            format!("加载{}数据失败: {}", kind_label(kind), err.user_message()),
        );
    }

    async fn refetch(&mut self, kind: RecordKind) -> ClientResult<()> {
        match kind {
            RecordKind::Creators => self.creators = self.client.list_creators().await?,
            RecordKind::Accounts => self.accounts = self.client.list_accounts().await?,
            RecordKind::Deals => self.deals = self.client.list_deals().await?,
        }
        self.touch();
        Ok(())
    }

    /// Runs inline: the caller's mutation future is pending for the whole delay.
    async fn reconcile(&mut self, kind: RecordKind, mutation: Mutation) {
        let Reconcile::RefetchAfter(delay) = self.policy.get(kind, mutation) else {
            return;
        };
        tokio::time::sleep(delay).await;

        if let Err(err) = self.refetch(kind).await {
            tracing::warn!("Reconcile refetch of {} failed: {}", kind, err);
            self.notify(
                NoticeLevel::Warning,
                format!("同步{}数据失败: {}", kind_label(kind), err.user_message()),
            );
        }
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    // ========== Raw data ==========

    pub fn creators(&self) -> &[Creator] {
        &self.creators
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn deals(&self) -> &[Deal] {
        &self.deals
    }

    /// Display name of a creator, or the raw id when no such creator is loaded.
    pub fn creator_name<'a>(&'a self, creator_id: &'a str) -> &'a str {
        self.creators
            .iter()
            .find(|c| c.id == creator_id)
            .map(|c| c.real_name.as_str())
            .unwrap_or(creator_id)
    }

    // ========== View state ==========

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Switching tabs clears the status filter.
    pub fn set_tab(&mut self, tab: Tab) {
        if self.view.tab != tab {
            self.view.tab = tab;
            self.view.status_filter = StatusFilter::All;
            self.view.rewind_pages();
        }
    }

    pub fn set_search_term(&mut self, search_term: impl Into<String>) {
        self.view.search_term = search_term.into();
        self.view.rewind_pages();
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.view.status_filter = status;
        self.view.rewind_pages();
    }

    pub fn sort_creators(&mut self, key: CreatorSortKey) {
        self.view.creator_sort.toggle(key);
    }

    pub fn sort_accounts(&mut self, key: AccountSortKey) {
        self.view.account_sort.toggle(key);
    }

    pub fn sort_deals(&mut self, key: DealSortKey) {
        self.view.deal_sort.toggle(key);
    }

    pub fn set_page(&mut self, kind: RecordKind, page: usize) {
        self.view.pagination_mut(kind).set_page(page);
    }

    pub fn set_page_size(&mut self, kind: RecordKind, size: usize) {
        self.view.pagination_mut(kind).set_size(size);
    }

    // ========== Derived views ==========

    /// Creators after search, status filter and sort.
    pub fn filtered_creators(&mut self) -> &[Creator] {
        let view = &self.view;
        let creators = &self.creators;
        let key = (
            self.revision,
            view.search_term.clone(),
            view.status_filter,
            view.creator_sort,
        );
        self.creator_view.get(key, || {
            let mut rows = filter::filter_creators(creators, &view.search_term, view.status_filter);
            sort::sort_records(&mut rows, &view.creator_sort);
            rows.into_iter().cloned().collect()
        })
    }

    pub fn filtered_accounts(&mut self) -> &[Account] {
        let view = &self.view;
        let accounts = &self.accounts;
        let creators = &self.creators;
        let key = (self.revision, view.search_term.clone(), view.account_sort);
        self.account_view.get(key, || {
            let mut rows = filter::filter_accounts(accounts, creators, &view.search_term);
            sort::sort_records(&mut rows, &view.account_sort);
            rows.into_iter().cloned().collect()
        })
    }

    pub fn filtered_deals(&mut self) -> &[Deal] {
        let today = self.today();
        let view = &self.view;
        let deals = &self.deals;
        let creators = &self.creators;
        let key = (
            self.revision,
            view.search_term.clone(),
            view.status_filter,
            view.deal_sort,
            today,
        );
        self.deal_view.get(key, || {
            let mut rows =
                filter::filter_deals(deals, creators, &view.search_term, view.status_filter, today);
            sort::sort_records(&mut rows, &view.deal_sort);
            rows.into_iter().cloned().collect()
        })
    }

    pub fn creators_page(&mut self) -> &[Creator] {
        let pages = self.view.creator_page;
        pages.slice(self.filtered_creators())
    }

    pub fn accounts_page(&mut self) -> &[Account] {
        let pages = self.view.account_page;
        pages.slice(self.filtered_accounts())
    }

    pub fn deals_page(&mut self) -> &[Deal] {
        let pages = self.view.deal_page;
        pages.slice(self.filtered_deals())
    }

    pub fn total_pages(&mut self, kind: RecordKind) -> usize {
        let pages = *self.view.pagination(kind);
        let len = match kind {
            RecordKind::Creators => self.filtered_creators().len(),
            RecordKind::Accounts => self.filtered_accounts().len(),
            RecordKind::Deals => self.filtered_deals().len(),
        };
        pages.total_pages(len)
    }

    pub fn stats(&mut self) -> &DashboardStats {
        let today = self.today();
        let (creators, accounts, deals) = (&self.creators, &self.accounts, &self.deals);
        self.stats.get((self.revision, today), || {
            DashboardStats::compute(creators, accounts, deals, today)
        })
    }

    // ========== Notices ==========

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice {
            level,
            message: message.into(),
        });
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Turn a client result into a workspace result, leaving an error notice on failure.
    fn report<T>(&mut self, result: ClientResult<T>, context: &str) -> Result<T, WorkspaceError> {
        result.map_err(|err| {
            tracing::warn!("{}: {}", context, err);
            self.notify(
                NoticeLevel::Error,
                format!("{}: {}", context, err.user_message()),
            );
            WorkspaceError::Client(err)
        })
    }

    fn confirm_saved<T>(&mut self, response: ApiResponse<T>, fallback: T, default_message: &str) -> T {
        let message = response
            .message
            .unwrap_or_else(|| default_message.to_string());
        self.notify(NoticeLevel::Success, message);
        response.data.unwrap_or(fallback)
    }

    // ========== Mutations ==========

    pub async fn save_creator(
        &mut self,
        mut creator: Creator,
        mode: SaveMode,
    ) -> Result<Creator, WorkspaceError> {
        self.ensure_authenticated()?;
        validate_creator(&creator).map_err(WorkspaceError::Invalid)?;

        let result = match &mode {
            SaveMode::Create => {
                if creator.id.trim().is_empty() {
                    creator.id = generate_creator_id(self.today());
                }
                self.client.create_creator(&creator).await
            }
            SaveMode::Update { key } => self.client.update_creator(key, &creator).await,
        };
        let response = self.report(result, "保存达人失败")?;
        let saved = self.confirm_saved(response, creator, "达人保存成功");

        match &mode {
            SaveMode::Create => self.creators.push(saved.clone()),
            SaveMode::Update { key } => {
                if let Some(slot) = self.creators.iter_mut().find(|c| c.id == *key) {
                    *slot = saved.clone();
                }
            }
        }
        self.touch();
        tracing::info!("Saved creator {}", saved.id);

        self.reconcile(RecordKind::Creators, mode.mutation()).await;
        Ok(saved)
    }

    /// Save an account. With the default policy a create returns only after the 2 s
    /// reconcile delay and the accounts refetch have completed.
    pub async fn save_account(
        &mut self,
        account: Account,
        mode: SaveMode,
    ) -> Result<Account, WorkspaceError> {
        self.ensure_authenticated()?;
        validate_account(&account).map_err(WorkspaceError::Invalid)?;

        let result = match &mode {
            SaveMode::Create => self.client.create_account(&account).await,
            SaveMode::Update { key } => self.client.update_account(key, &account).await,
        };
        let response = self.report(result, "保存账号失败")?;
        let saved = self.confirm_saved(response, account, "账号保存成功");

        match &mode {
            SaveMode::Create => self.accounts.push(saved.clone()),
            SaveMode::Update { key } => {
                if let Some(slot) = self.accounts.iter_mut().find(|a| a.key() == *key) {
                    *slot = saved.clone();
                }
            }
        }
        self.touch();
        tracing::info!("Saved account {}", saved.key());

        self.reconcile(RecordKind::Accounts, mode.mutation()).await;
        Ok(saved)
    }

    /// Save a deal. Shares are computed from the referenced creator's commission on create,
    /// and on update only when the amount or the creator changed; otherwise the stored split
    /// is kept even if the creator's commission has moved since. A creator that is not loaded
    /// counts as commission 0.
    pub async fn save_deal(&mut self, mut deal: Deal, mode: SaveMode) -> Result<Deal, WorkspaceError> {
        self.ensure_authenticated()?;
        validate_deal(&deal).map_err(WorkspaceError::Invalid)?;

        let recompute = match &mode {
            SaveMode::Create => true,
            SaveMode::Update { key } => self
                .deals
                .iter()
                .find(|d| d.id == *key)
                .is_none_or(|previous| {
                    previous.amount != deal.amount || previous.creator_id != deal.creator_id
                }),
        };
        if recompute {
            let commission = self
                .creators
                .iter()
                .find(|c| c.id == deal.creator_id)
                .map(|c| c.commission)
                .unwrap_or(0.0);
            deal.apply_commission(commission);
        }

        let result = match &mode {
            SaveMode::Create => {
                if deal.id.trim().is_empty() {
                    deal.id = generate_deal_id(self.today());
                }
                self.client.create_deal(&deal).await
            }
            SaveMode::Update { key } => self.client.update_deal(key, &deal).await,
        };
        let response = self.report(result, "保存商务合作失败")?;
        let saved = self.confirm_saved(response, deal, "商务合作保存成功");

        match &mode {
            SaveMode::Create => self.deals.push(saved.clone()),
            SaveMode::Update { key } => {
                if let Some(slot) = self.deals.iter_mut().find(|d| d.id == *key) {
                    *slot = saved.clone();
                }
            }
        }
        self.touch();
        tracing::info!(
            "Saved deal {} ({} to creator, {} to company)",
            saved.id,
            saved.creator_share,
            saved.company_share
        );

        self.reconcile(RecordKind::Deals, mode.mutation()).await;
        Ok(saved)
    }

    /// Delete a creator after `confirm` approves the prompt. Deals and accounts that
    /// reference the creator are left in place.
    pub async fn delete_creator(
        &mut self,
        creator_id: &str,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<Outcome, WorkspaceError> {
        self.ensure_authenticated()?;
        let prompt = format!("确定要删除达人「{}」吗？", self.creator_name(creator_id));
        if !confirm(&prompt) {
            return Ok(Outcome::Cancelled);
        }

        let result = self.client.delete_creator(creator_id).await;
        let response = self.report(result, "删除达人失败")?;
        self.confirm_saved(response, (), "达人删除成功");

        self.creators.retain(|c| c.id != creator_id);
        self.touch();
        tracing::info!("Deleted creator {}", creator_id);

        self.reconcile(RecordKind::Creators, Mutation::Delete).await;
        Ok(Outcome::Applied)
    }

    /// Delete the account stored under `account_id` (`creatorId-platform`).
    pub async fn delete_account(
        &mut self,
        account_id: &str,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<Outcome, WorkspaceError> {
        self.ensure_authenticated()?;
        if !confirm(&format!("确定要删除账号「{}」吗？", account_id)) {
            return Ok(Outcome::Cancelled);
        }

        let result = self.client.delete_account(account_id).await;
        let response = self.report(result, "删除账号失败")?;
        self.confirm_saved(response, (), "账号删除成功");

        self.accounts
            .retain(|a| account_key(&a.creator_id, &a.platform) != account_id);
        self.touch();
        tracing::info!("Deleted account {}", account_id);

        self.reconcile(RecordKind::Accounts, Mutation::Delete).await;
        Ok(Outcome::Applied)
    }

    pub async fn delete_deal(
        &mut self,
        deal_id: &str,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<Outcome, WorkspaceError> {
        self.ensure_authenticated()?;
        if !confirm(&format!("确定要删除商务合作「{}」吗？", deal_id)) {
            return Ok(Outcome::Cancelled);
        }

        let result = self.client.delete_deal(deal_id).await;
        let response = self.report(result, "删除商务合作失败")?;
        self.confirm_saved(response, (), "商务合作删除成功");

        self.deals.retain(|d| d.id != deal_id);
        self.touch();
        tracing::info!("Deleted deal {}", deal_id);

        self.reconcile(RecordKind::Deals, Mutation::Delete).await;
        Ok(Outcome::Applied)
    }

    // ========== Import / export ==========

    /// Upload a creator CSV for a dry-run parse.
    pub async fn preview_import(&mut self, path: &Path) -> Result<ImportPreview, WorkspaceError> {
        self.ensure_authenticated()?;
        let upload = read_upload(path).await;
        let (bytes, filename) = self.report(upload, "读取导入文件失败")?;

        let result = self.client.import_preview(bytes, &filename).await;
        let preview = self.report(result, "预览导入失败")?;
        if preview.validation.invalid > 0 {
            self.notify(
                NoticeLevel::Warning,
                format!("{} 行数据未通过校验", preview.validation.invalid),
            );
        }
        Ok(preview)
    }

    /// Import a creator CSV, then reload creators from the store.
    pub async fn import_creators(&mut self, path: &Path) -> Result<ImportSummary, WorkspaceError> {
        self.ensure_authenticated()?;
        let upload = read_upload(path).await;
        let (bytes, filename) = self.report(upload, "读取导入文件失败")?;

        let result = self.client.import_creators(bytes, &filename).await;
        let response = self.report(result, "导入失败")?;
        let summary = self.confirm_saved(response, ImportSummary::default(), "导入成功");
        tracing::info!(
            "Imported {} creators ({} skipped)",
            summary.imported,
            summary.skipped
        );

        if let Err(err) = self.refetch(RecordKind::Creators).await {
            tracing::warn!("Reload after import failed: {}", err);
            self.notify(
                NoticeLevel::Warning,
                format!("刷新达人数据失败: {}", err.user_message()),
            );
        }
        Ok(summary)
    }

    /// Write the current filtered and sorted view of `kind` to `path`.
    ///
    /// JSON is rendered locally; CSV is rendered by the store from the rows sent along.
    /// Returns the number of rows written.
    pub async fn export(
        &mut self,
        kind: RecordKind,
        format: ExportFormat,
        path: &Path,
    ) -> Result<usize, WorkspaceError> {
        self.ensure_authenticated()?;
        let rows = match kind {
            RecordKind::Creators => to_rows(self.filtered_creators()),
            RecordKind::Accounts => to_rows(self.filtered_accounts()),
            RecordKind::Deals => to_rows(self.filtered_deals()),
        };
        let (count, rows) = self.report(rows, "导出失败")?;

        let body = match format {
            ExportFormat::Json => serde_json::to_vec_pretty(&rows).map_err(ClientError::from),
            ExportFormat::Csv => {
                let request = ExportRequest {
                    kind,
                    format: format.extension().to_string(),
                    data: Some(rows),
                };
                self.client.export(&request).await
            }
        };
        let body = self.report(body, "导出失败")?;

        let written = tokio::fs::write(path, &body).await.map_err(ClientError::from);
        self.report(written, "保存导出文件失败")?;

        tracing::info!("Exported {} {} to {:?}", count, kind, path);
        self.notify(
            NoticeLevel::Success,
            format!("已导出 {} 条{}记录", count, kind_label(kind)),
        );
        Ok(count)
    }
}

fn to_rows<T: Serialize>(rows: &[T]) -> ClientResult<(usize, serde_json::Value)> {
    Ok((rows.len(), serde_json::to_value(rows)?))
}
