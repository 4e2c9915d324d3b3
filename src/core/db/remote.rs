use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::config::RemoteConfig;
use crate::core::db::query::{Filter, Query, Table};
use crate::core::error::StoreError;

/// One-time, shared construction of the remote client.
///
/// Concurrent `init` calls before the first resolves all wait on the same
/// cell and receive the same client instance. A connector built without
/// credentials resolves to `None`, which callers treat as "operate in
/// local-only mode" rather than an error.
pub struct RemoteConnector {
    config: Option<RemoteConfig>,
    cell: OnceCell<Option<Arc<RemoteStore>>>,
}

impl RemoteConnector {
    pub fn new(config: Option<RemoteConfig>) -> Self {
        Self {
            config,
            cell: OnceCell::new(),
        }
    }

    /// Idempotent: the first caller constructs the client, everyone else
    /// shares the cached outcome.
    pub async fn init(&self) -> Option<Arc<RemoteStore>> {
        self.cell
            .get_or_init(|| async {
                let config = self.config.as_ref()?;
                match RemoteStore::build(config) {
                    Ok(store) => {
                        tracing::debug!(url = %config.base_url, "remote client initialized");
                        Some(Arc::new(store))
                    }
                    Err(err) => {
                        tracing::error!(%err, "failed to construct remote client");
                        None
                    }
                }
            })
            .await
            .clone()
    }

    /// The cached client, or `None` with a warning when called before
    /// `init` resolved.
    pub fn get_client(&self) -> Option<Arc<RemoteStore>> {
        match self.cell.get() {
            Some(outcome) => outcome.clone(),
            None => {
                tracing::warn!("get_client called before remote init resolved");
                None
            }
        }
    }
}

/// Thin parameter-translation wrapper over the hosted relational API
/// (PostgREST dialect). Every operation logs and returns the API's
/// reported error; there is no retry, backoff, or timeout here.
pub struct RemoteStore {
    client: reqwest::Client,
    base_url: String,
}

impl std::fmt::Debug for RemoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteStore")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl RemoteStore {
    fn build(config: &RemoteConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.api_key)?;
        headers.insert("apikey", key);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key))?,
        );
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table.name())
    }

    async fn check(
        op: &'static str,
        table: Table,
        resp: reqwest::Response,
    ) -> Result<reqwest::Response, StoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let message = format!("{status}: {body}");
        tracing::error!(table = table.name(), op, %message, "remote operation failed");
        Err(StoreError::Remote {
            op,
            table: table.name(),
            message,
        })
    }

    fn send_error(op: &'static str, table: Table, err: reqwest::Error) -> StoreError {
        tracing::error!(table = table.name(), op, %err, "remote request failed");
        StoreError::Remote {
            op,
            table: table.name(),
            message: err.to_string(),
        }
    }

    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        table: Table,
        query: &Query,
    ) -> Result<Vec<T>, StoreError> {
        let resp = self
            .client
            .get(self.endpoint(table))
            .query(&query_pairs(query))
            .send()
            .await
            .map_err(|e| Self::send_error("fetch_all", table, e))?;
        Self::check("fetch_all", table, resp)
            .await?
            .json::<Vec<T>>()
            .await
            .map_err(|e| Self::send_error("fetch_all", table, e))
    }

    pub async fn fetch_one<T: DeserializeOwned>(
        &self,
        table: Table,
        filters: &[Filter],
    ) -> Result<Option<T>, StoreError> {
        let mut query = Query::new().limit(1);
        query.filters = filters.to_vec();
        let mut rows = self.fetch_all::<T>(table, &query).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    pub async fn insert<T: Serialize, R: DeserializeOwned>(
        &self,
        table: Table,
        records: &[T],
    ) -> Result<Vec<R>, StoreError> {
        let resp = self
            .client
            .post(self.endpoint(table))
            .header("Prefer", "return=representation")
            .json(records)
            .send()
            .await
            .map_err(|e| Self::send_error("insert", table, e))?;
        Self::check("insert", table, resp)
            .await?
            .json::<Vec<R>>()
            .await
            .map_err(|e| Self::send_error("insert", table, e))
    }

    pub async fn update<P: Serialize, R: DeserializeOwned>(
        &self,
        table: Table,
        patch: &P,
        filters: &[Filter],
    ) -> Result<Vec<R>, StoreError> {
        let resp = self
            .client
            .patch(self.endpoint(table))
            .query(&filter_pairs(filters))
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await
            .map_err(|e| Self::send_error("update", table, e))?;
        Self::check("update", table, resp)
            .await?
            .json::<Vec<R>>()
            .await
            .map_err(|e| Self::send_error("update", table, e))
    }

    pub async fn delete(&self, table: Table, filters: &[Filter]) -> Result<(), StoreError> {
        let resp = self
            .client
            .delete(self.endpoint(table))
            .query(&filter_pairs(filters))
            .send()
            .await
            .map_err(|e| Self::send_error("delete", table, e))?;
        Self::check("delete", table, resp).await?;
        Ok(())
    }
}

fn filter_param(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn filter_pairs(filters: &[Filter]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|f| (f.column.to_string(), format!("eq.{}", filter_param(&f.value))))
        .collect()
}

fn query_pairs(query: &Query) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    if let Some(select) = query.select {
        pairs.push(("select".to_string(), select.to_string()));
    }
    pairs.extend(filter_pairs(&query.filters));
    if let Some(order) = &query.order {
        let direction = if order.descending { "desc" } else { "asc" };
        pairs.push(("order".to_string(), format!("{}.{direction}", order.column)));
    }
    if let Some(limit) = query.limit {
        pairs.push(("limit".to_string(), limit.to_string()));
    }
    if let Some(offset) = query.offset {
        pairs.push(("offset".to_string(), offset.to_string()));
    }
    pairs
}
