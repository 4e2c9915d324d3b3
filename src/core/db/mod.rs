mod activity;
mod attendance;
mod contact;
mod dirigente;
mod document;
mod finance;
mod local;
mod medical;
mod model;
mod news;
mod query;
mod remote;
mod scout;
mod user;

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use time::OffsetDateTime;

use crate::core::error::StoreError;

pub use activity::{Activity, ActivityRepository, ActivityUpdate, NewActivity};
pub use attendance::{
    AttendanceEntry, AttendanceRepository, AttendanceSummary, NewAttendanceEntry,
};
pub use contact::{ContactMessage, ContactRepository, NewContactMessage};
pub use dirigente::{
    Dirigente, DirigenteRepository, DirigenteRole, DirigenteUpdate, NewDirigente,
};
pub use document::{DocumentCategory, DocumentEntry, DocumentRepository, NewDocumentEntry};
pub use finance::{
    Budget, BudgetUsage, FinanceCategory, FinanceRepository, FinanceSummary, NewBudget,
    NewTransaction, Transaction, TransactionKind,
};
pub use local::LocalStore;
pub use medical::{
    DocumentationRecord, DocumentationRepository, MedicalRecord, MedicalRepository,
    NewDocumentationRecord, NewMedicalRecord,
};
pub use model::{MemberStatus, Section, now_rfc3339, parse_date, parse_month, today_iso};
pub use news::{NewNewsPost, NewsPost, NewsPostUpdate, NewsRepository};
pub use query::{Filter, Order, Query, Table};
pub use remote::{RemoteConnector, RemoteStore};
pub use scout::{NewScout, Scout, ScoutRepository, ScoutUpdate};
pub use user::{
    AuditEntry, AuditRepository, NewSystemUser, SystemUser, SystemUserUpdate, UserRepository,
    UserRole,
};

/// Which backend the store decided on at connect time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    Remote,
    LocalFallback,
}

impl std::fmt::Display for StoreMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            StoreMode::Remote => "remote",
            StoreMode::LocalFallback => "local (fallback)",
        })
    }
}

/// Store facade for the whole group console.
///
/// The remote/local decision happens exactly once, in [`GroupDb::connect`]:
/// a connector that initializes gets every operation; one that doesn't
/// selects the local adapter for the lifetime of the handle. A remote
/// failure after a successful init is surfaced to the caller, never
/// silently retargeted at local storage: falling back mid-stream would
/// fork the data set between backends with no way to reconcile.
#[derive(Debug)]
pub struct GroupDb {
    remote: Option<Arc<RemoteStore>>,
    local: LocalStore,
}

impl GroupDb {
    pub async fn connect<P: AsRef<Path>>(
        connector: &RemoteConnector,
        data_dir: P,
    ) -> anyhow::Result<Self> {
        let local = LocalStore::open(data_dir)?;
        let remote = connector.init().await;
        if remote.is_none() {
            tracing::info!("remote backend unavailable, operating on local storage");
        }
        Ok(Self { remote, local })
    }

    pub fn mode(&self) -> StoreMode {
        if self.remote.is_some() {
            StoreMode::Remote
        } else {
            StoreMode::LocalFallback
        }
    }

    /// The local adapter, regardless of mode. Backup and restore always
    /// target local data.
    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    // ---- generic record-level plumbing ------------------------------------

    async fn rows<T: DeserializeOwned>(
        &self,
        table: Table,
        query: &Query,
    ) -> anyhow::Result<Vec<T>> {
        match &self.remote {
            Some(remote) => Ok(remote.fetch_all(table, query).await?),
            None => {
                let items = apply_query(self.local_list(table), query);
                items
                    .into_iter()
                    .map(|item| Ok(serde_json::from_value(item)?))
                    .collect()
            }
        }
    }

    async fn row<T: DeserializeOwned>(
        &self,
        table: Table,
        filters: Vec<Filter>,
    ) -> anyhow::Result<Option<T>> {
        match &self.remote {
            Some(remote) => Ok(remote.fetch_one(table, &filters).await?),
            None => {
                let found = self
                    .local_list(table)
                    .into_iter()
                    .find(|item| filters.iter().all(|f| f.matches(item)));
                match found {
                    Some(item) => Ok(Some(serde_json::from_value(item)?)),
                    None => Ok(None),
                }
            }
        }
    }

    async fn insert_row<T: Serialize, R: DeserializeOwned>(
        &self,
        table: Table,
        record: &T,
    ) -> anyhow::Result<R> {
        match &self.remote {
            Some(remote) => {
                let mut rows: Vec<R> = remote.insert(table, std::slice::from_ref(record)).await?;
                if rows.is_empty() {
                    return Err(StoreError::Remote {
                        op: "insert",
                        table: table.name(),
                        message: "empty representation returned".to_string(),
                    }
                    .into());
                }
                Ok(rows.swap_remove(0))
            }
            None => {
                let mut items = self.local_list(table);
                let mut value = serde_json::to_value(record)?;
                let Value::Object(map) = &mut value else {
                    anyhow::bail!("record for '{}' did not serialize to an object", table.name());
                };
                if map.get("id").is_none_or(Value::is_null) {
                    map.insert("id".to_string(), next_local_id(&items).into());
                }
                items.push(value.clone());
                self.write_local_list(table, items)?;
                Ok(serde_json::from_value(value)?)
            }
        }
    }

    async fn update_row<P: Serialize, R: DeserializeOwned>(
        &self,
        table: Table,
        id: i64,
        patch: &P,
    ) -> anyhow::Result<R> {
        match &self.remote {
            Some(remote) => {
                let mut rows: Vec<R> = remote
                    .update(table, patch, &[Filter::eq("id", id)])
                    .await?;
                if rows.is_empty() {
                    return Err(StoreError::NotFound { table: table.name() }.into());
                }
                Ok(rows.swap_remove(0))
            }
            None => {
                let patch = serde_json::to_value(patch)?;
                let Value::Object(patch) = patch else {
                    anyhow::bail!("patch for '{}' did not serialize to an object", table.name());
                };
                let mut items = self.local_list(table);
                let mut updated = None;
                for item in items.iter_mut() {
                    if item.get("id").and_then(Value::as_i64) == Some(id) {
                        if let Value::Object(map) = item {
                            for (key, value) in &patch {
                                map.insert(key.clone(), value.clone());
                            }
                        }
                        updated = Some(item.clone());
                        break;
                    }
                }
                let updated =
                    updated.ok_or(StoreError::NotFound { table: table.name() })?;
                self.write_local_list(table, items)?;
                Ok(serde_json::from_value(updated)?)
            }
        }
    }

    async fn delete_row(&self, table: Table, id: i64) -> anyhow::Result<()> {
        match &self.remote {
            Some(remote) => Ok(remote.delete(table, &[Filter::eq("id", id)]).await?),
            None => {
                let mut items = self.local_list(table);
                items.retain(|item| item.get("id").and_then(Value::as_i64) != Some(id));
                self.write_local_list(table, items)?;
                Ok(())
            }
        }
    }

    fn local_list(&self, table: Table) -> Vec<Value> {
        match self.local.get(table.name()) {
            Some(Value::Array(items)) => items,
            Some(_) => {
                tracing::warn!(table = table.name(), "local entry is not a list, ignoring");
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    fn write_local_list(&self, table: Table, items: Vec<Value>) -> Result<(), StoreError> {
        self.local.set(table.name(), &Value::Array(items))
    }
}

/// In-memory counterpart of the remote query translation.
fn apply_query(items: Vec<Value>, query: &Query) -> Vec<Value> {
    let mut rows: Vec<Value> = items.into_iter().filter(|r| query.matches(r)).collect();
    if let Some(order) = &query.order {
        rows.sort_by(|a, b| {
            let ordering = query::cmp_values(
                a.get(order.column).unwrap_or(&Value::Null),
                b.get(order.column).unwrap_or(&Value::Null),
            );
            if order.descending { ordering.reverse() } else { ordering }
        });
    }
    let rows = rows.into_iter().skip(query.offset.unwrap_or(0));
    match query.limit {
        Some(limit) => rows.take(limit).collect(),
        None => rows.collect(),
    }
}

/// Local ids are epoch milliseconds; bumped past any existing id so two
/// inserts inside the same millisecond stay distinct.
fn next_local_id(items: &[Value]) -> i64 {
    let now_ms = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
    let max_existing = items
        .iter()
        .filter_map(|item| item.get("id").and_then(Value::as_i64))
        .max()
        .unwrap_or(0);
    now_ms.max(max_existing + 1)
}

// ---- feature repositories -------------------------------------------------

impl ScoutRepository for GroupDb {
    async fn get_scouts(&self) -> anyhow::Result<Vec<Scout>> {
        self.rows(Table::Scouts, &Query::new().order_by("name", false))
            .await
    }

    async fn get_scouts_in_section(&self, section: Section) -> anyhow::Result<Vec<Scout>> {
        self.rows(
            Table::Scouts,
            &Query::new()
                .filter("section", section.as_str())
                .order_by("name", false),
        )
        .await
    }

    async fn get_scout_by_id(&self, id: i64) -> anyhow::Result<Option<Scout>> {
        self.row(Table::Scouts, vec![Filter::eq("id", id)]).await
    }

    async fn add_scout(&self, scout: &NewScout) -> anyhow::Result<Scout> {
        scout.validate()?;
        self.insert_row(Table::Scouts, scout).await
    }

    async fn update_scout(&self, scout: &Scout, update: &ScoutUpdate) -> anyhow::Result<Scout> {
        update.validate()?;
        self.update_row(Table::Scouts, scout.id, update).await
    }

    async fn delete_scout(&self, scout: Scout) -> anyhow::Result<()> {
        // No cascade: medical and documentation records keep their rows.
        self.delete_row(Table::Scouts, scout.id).await
    }

    async fn get_inactive_members(&self) -> anyhow::Result<Vec<Scout>> {
        match &self.remote {
            Some(remote) => Ok(remote
                .fetch_all(
                    Table::InactiveMembers,
                    &Query::new().order_by("name", false),
                )
                .await?),
            None => {
                self.rows(
                    Table::Scouts,
                    &Query::new()
                        .filter("status", MemberStatus::Inactive.as_str())
                        .order_by("name", false),
                )
                .await
            }
        }
    }
}

impl MedicalRepository for GroupDb {
    async fn get_medical_records(&self, scout_id: i64) -> anyhow::Result<Vec<MedicalRecord>> {
        self.rows(
            Table::MedicalRecords,
            &Query::new().filter("scout_id", scout_id),
        )
        .await
    }

    async fn add_medical_record(&self, record: &NewMedicalRecord) -> anyhow::Result<MedicalRecord> {
        record.validate()?;
        let record = WithTimestamp {
            record,
            updated_at: now_rfc3339()?,
        };
        self.insert_row(Table::MedicalRecords, &record).await
    }

    async fn delete_medical_record(&self, record: MedicalRecord) -> anyhow::Result<()> {
        self.delete_row(Table::MedicalRecords, record.id).await
    }
}

impl DocumentationRepository for GroupDb {
    async fn get_documentation_records(
        &self,
        scout_id: i64,
    ) -> anyhow::Result<Vec<DocumentationRecord>> {
        self.rows(
            Table::DocumentationRecords,
            &Query::new().filter("scout_id", scout_id),
        )
        .await
    }

    async fn add_documentation_record(
        &self,
        record: &NewDocumentationRecord,
    ) -> anyhow::Result<DocumentationRecord> {
        record.validate()?;
        self.insert_row(Table::DocumentationRecords, record).await
    }

    async fn set_documentation_delivered(
        &self,
        record: &DocumentationRecord,
        delivered: bool,
        delivered_at: Option<String>,
    ) -> anyhow::Result<DocumentationRecord> {
        self.update_row(
            Table::DocumentationRecords,
            record.id,
            &json!({ "delivered": delivered, "delivered_at": delivered_at }),
        )
        .await
    }
}

impl AttendanceRepository for GroupDb {
    async fn get_attendance_for_activity(
        &self,
        activity_id: i64,
    ) -> anyhow::Result<Vec<AttendanceEntry>> {
        self.rows(
            Table::Attendance,
            &Query::new().filter("activity_id", activity_id),
        )
        .await
    }

    async fn record_attendance(
        &self,
        entry: &NewAttendanceEntry,
    ) -> anyhow::Result<AttendanceEntry> {
        entry.validate()?;
        let entry = WithRecordedAt {
            record: entry,
            recorded_at: now_rfc3339()?,
        };
        self.insert_row(Table::Attendance, &entry).await
    }

    async fn get_attendance_by_group(&self) -> anyhow::Result<Vec<AttendanceSummary>> {
        match &self.remote {
            Some(remote) => Ok(remote
                .fetch_all(Table::AttendanceByGroup, &Query::new())
                .await?),
            None => {
                let entries: Vec<AttendanceEntry> =
                    self.rows(Table::Attendance, &Query::new()).await?;
                let scouts: Vec<Scout> = self.rows(Table::Scouts, &Query::new()).await?;
                let section_of: std::collections::HashMap<i64, Section> =
                    scouts.iter().map(|s| (s.id, s.section)).collect();

                let mut summaries = Vec::new();
                for section in Section::ALL {
                    let mut recorded = 0u64;
                    let mut present = 0u64;
                    for entry in &entries {
                        if section_of.get(&entry.scout_id) == Some(&section) {
                            recorded += 1;
                            if entry.present {
                                present += 1;
                            }
                        }
                    }
                    if recorded > 0 {
                        summaries.push(AttendanceSummary {
                            section,
                            recorded,
                            present,
                            rate_percent: AttendanceSummary::rate(present, recorded),
                        });
                    }
                }
                Ok(summaries)
            }
        }
    }
}

impl DirigenteRepository for GroupDb {
    async fn get_dirigentes(&self) -> anyhow::Result<Vec<Dirigente>> {
        self.rows(Table::Dirigentes, &Query::new().order_by("name", false))
            .await
    }

    async fn get_dirigente_by_id(&self, id: i64) -> anyhow::Result<Option<Dirigente>> {
        self.row(Table::Dirigentes, vec![Filter::eq("id", id)]).await
    }

    async fn add_dirigente(&self, dirigente: &NewDirigente) -> anyhow::Result<Dirigente> {
        dirigente.validate()?;
        self.insert_row(Table::Dirigentes, dirigente).await
    }

    async fn update_dirigente(
        &self,
        dirigente: &Dirigente,
        update: &DirigenteUpdate,
    ) -> anyhow::Result<Dirigente> {
        self.update_row(Table::Dirigentes, dirigente.id, update).await
    }

    async fn delete_dirigente(&self, dirigente: Dirigente) -> anyhow::Result<()> {
        self.delete_row(Table::Dirigentes, dirigente.id).await
    }
}

impl ActivityRepository for GroupDb {
    async fn get_activities(&self) -> anyhow::Result<Vec<Activity>> {
        self.rows(Table::Activities, &Query::new().order_by("date", true))
            .await
    }

    async fn get_activity_by_id(&self, id: i64) -> anyhow::Result<Option<Activity>> {
        self.row(Table::Activities, vec![Filter::eq("id", id)]).await
    }

    async fn add_activity(&self, activity: &NewActivity) -> anyhow::Result<Activity> {
        activity.validate()?;
        self.insert_row(Table::Activities, activity).await
    }

    async fn update_activity(
        &self,
        activity: &Activity,
        update: &ActivityUpdate,
    ) -> anyhow::Result<Activity> {
        update.validate()?;
        self.update_row(Table::Activities, activity.id, update).await
    }

    async fn delete_activity(&self, activity: Activity) -> anyhow::Result<()> {
        self.delete_row(Table::Activities, activity.id).await
    }
}

impl FinanceRepository for GroupDb {
    async fn get_transactions(&self) -> anyhow::Result<Vec<Transaction>> {
        self.rows(Table::Transactions, &Query::new().order_by("date", true))
            .await
    }

    async fn get_transactions_in_category(
        &self,
        category: FinanceCategory,
    ) -> anyhow::Result<Vec<Transaction>> {
        self.rows(
            Table::Transactions,
            &Query::new()
                .filter("category", category.as_str())
                .order_by("date", true),
        )
        .await
    }

    async fn add_transaction(&self, transaction: &NewTransaction) -> anyhow::Result<Transaction> {
        transaction.validate()?;
        self.insert_row(Table::Transactions, transaction).await
    }

    async fn delete_transaction(&self, transaction: Transaction) -> anyhow::Result<()> {
        self.delete_row(Table::Transactions, transaction.id).await
    }

    async fn get_budgets(&self) -> anyhow::Result<Vec<Budget>> {
        self.rows(Table::Budgets, &Query::new().order_by("period", true))
            .await
    }

    async fn set_budget(&self, budget: &NewBudget) -> anyhow::Result<Budget> {
        budget.validate()?;
        let existing: Option<Budget> = self
            .row(
                Table::Budgets,
                vec![
                    Filter::eq("category", budget.category.as_str()),
                    Filter::eq("period", budget.period.clone()),
                ],
            )
            .await?;
        match existing {
            Some(current) => {
                self.update_row(
                    Table::Budgets,
                    current.id,
                    &json!({ "limit_cents": budget.limit_cents }),
                )
                .await
            }
            None => self.insert_row(Table::Budgets, budget).await,
        }
    }

    async fn delete_budget(&self, budget: Budget) -> anyhow::Result<()> {
        self.delete_row(Table::Budgets, budget.id).await
    }

    async fn get_finance_summary(&self) -> anyhow::Result<FinanceSummary> {
        let transactions = self.get_transactions().await?;
        let budgets = self.get_budgets().await?;

        let mut income_cents = 0i64;
        let mut expense_cents = 0i64;
        for transaction in &transactions {
            match transaction.kind {
                TransactionKind::Income => income_cents += transaction.amount_cents,
                TransactionKind::Expense => expense_cents += transaction.amount_cents,
            }
        }

        let usages = budgets
            .into_iter()
            .map(|budget| {
                let spent_cents: i64 = transactions
                    .iter()
                    .filter(|t| {
                        t.kind == TransactionKind::Expense
                            && t.category == budget.category
                            && t.date.starts_with(&budget.period)
                    })
                    .map(|t| t.amount_cents)
                    .sum();
                BudgetUsage {
                    category: budget.category,
                    period: budget.period,
                    limit_cents: budget.limit_cents,
                    spent_cents,
                    used_percent: BudgetUsage::percent(spent_cents, budget.limit_cents),
                }
            })
            .collect();

        Ok(FinanceSummary {
            income_cents,
            expense_cents,
            balance_cents: income_cents - expense_cents,
            budgets: usages,
        })
    }
}

impl ContactRepository for GroupDb {
    async fn get_contact_messages(&self) -> anyhow::Result<Vec<ContactMessage>> {
        self.rows(
            Table::Contacts,
            &Query::new().order_by("received_at", true),
        )
        .await
    }

    async fn add_contact_message(
        &self,
        message: &NewContactMessage,
    ) -> anyhow::Result<ContactMessage> {
        message.validate()?;
        self.insert_row(Table::Contacts, message).await
    }

    async fn set_contact_handled(
        &self,
        message: &ContactMessage,
        handled: bool,
    ) -> anyhow::Result<ContactMessage> {
        self.update_row(Table::Contacts, message.id, &json!({ "handled": handled }))
            .await
    }

    async fn delete_contact_message(&self, message: ContactMessage) -> anyhow::Result<()> {
        self.delete_row(Table::Contacts, message.id).await
    }
}

impl NewsRepository for GroupDb {
    async fn get_news(&self) -> anyhow::Result<Vec<NewsPost>> {
        self.rows(Table::News, &Query::new().order_by("published_at", true))
            .await
    }

    async fn add_news(&self, post: &NewNewsPost) -> anyhow::Result<NewsPost> {
        post.validate()?;
        self.insert_row(Table::News, post).await
    }

    async fn update_news(
        &self,
        post: &NewsPost,
        update: &NewsPostUpdate,
    ) -> anyhow::Result<NewsPost> {
        self.update_row(Table::News, post.id, update).await
    }

    async fn delete_news(&self, post: NewsPost) -> anyhow::Result<()> {
        self.delete_row(Table::News, post.id).await
    }
}

impl DocumentRepository for GroupDb {
    async fn get_documents(&self) -> anyhow::Result<Vec<DocumentEntry>> {
        self.rows(Table::Documents, &Query::new().order_by("title", false))
            .await
    }

    async fn get_documents_in_category(
        &self,
        category: DocumentCategory,
    ) -> anyhow::Result<Vec<DocumentEntry>> {
        self.rows(
            Table::Documents,
            &Query::new()
                .filter("category", category.as_str())
                .order_by("title", false),
        )
        .await
    }

    async fn add_document(&self, document: &NewDocumentEntry) -> anyhow::Result<DocumentEntry> {
        document.validate()?;
        self.insert_row(Table::Documents, document).await
    }

    async fn delete_document(&self, document: DocumentEntry) -> anyhow::Result<()> {
        self.delete_row(Table::Documents, document.id).await
    }
}

impl UserRepository for GroupDb {
    async fn get_users(&self) -> anyhow::Result<Vec<SystemUser>> {
        self.rows(Table::SystemUsers, &Query::new().order_by("username", false))
            .await
    }

    async fn get_user_by_username(&self, username: &str) -> anyhow::Result<Option<SystemUser>> {
        self.row(
            Table::SystemUsers,
            vec![Filter::eq("username", username.to_string())],
        )
        .await
    }

    async fn add_user(&self, user: &NewSystemUser, actor: &str) -> anyhow::Result<SystemUser> {
        user.validate()?;
        if self.get_user_by_username(&user.username).await?.is_some() {
            anyhow::bail!("username already taken: {}", user.username);
        }
        let created: SystemUser = self.insert_row(Table::SystemUsers, user).await?;
        self.record_action(actor, "user.create", Some(created.username.clone()))
            .await?;
        Ok(created)
    }

    async fn update_user(
        &self,
        user: &SystemUser,
        update: &SystemUserUpdate,
        actor: &str,
    ) -> anyhow::Result<SystemUser> {
        let updated: SystemUser = self.update_row(Table::SystemUsers, user.id, update).await?;
        self.record_action(actor, "user.update", Some(updated.username.clone()))
            .await?;
        Ok(updated)
    }

    async fn delete_user(&self, user: SystemUser, actor: &str) -> anyhow::Result<()> {
        self.delete_row(Table::SystemUsers, user.id).await?;
        self.record_action(actor, "user.delete", Some(user.username))
            .await?;
        Ok(())
    }
}

impl AuditRepository for GroupDb {
    async fn record_action(
        &self,
        actor: &str,
        action: &str,
        detail: Option<String>,
    ) -> anyhow::Result<AuditEntry> {
        self.insert_row(
            Table::AuditLog,
            &json!({
                "actor": actor,
                "action": action,
                "detail": detail,
                "at": now_rfc3339()?,
            }),
        )
        .await
    }

    async fn get_audit_entries(&self, limit: Option<usize>) -> anyhow::Result<Vec<AuditEntry>> {
        let mut query = Query::new().order_by("at", true);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        self.rows(Table::AuditLog, &query).await
    }
}

/// Insert payloads that carry a server-side-style timestamp the `New*`
/// struct does not hold.
#[derive(Serialize)]
struct WithTimestamp<'a, T: Serialize> {
    #[serde(flatten)]
    record: &'a T,
    updated_at: String,
}

#[derive(Serialize)]
struct WithRecordedAt<'a, T: Serialize> {
    #[serde(flatten)]
    record: &'a T,
    recorded_at: String,
}
