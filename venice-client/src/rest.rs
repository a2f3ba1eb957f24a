//! REST table client
//!
//! Parameterized filter/select/order access to the backend's named
//! collections (`businesses`, `reviews`, `favorites`, `profiles`),
//! PostgREST-style. Reads use column projection with deterministic
//! ordering so downstream consumers see stable results.

use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared bearer token slot, set by the session layer after sign-in and
/// cleared on logout. The anon key is the fallback when empty.
pub type TokenSlot = Arc<RwLock<Option<String>>>;

/// Client for the backend's REST table interface
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
    anon_key: String,
    token: TokenSlot,
}

impl RestClient {
    /// Create a new REST client sharing the given token slot
    pub fn new(config: &ClientConfig, client: Client, token: TokenSlot) -> Self {
        Self {
            client,
            base_url: format!("{}/rest/v1", config.base_url.trim_end_matches('/')),
            anon_key: config.anon_key.clone(),
            token,
        }
    }

    async fn bearer(&self) -> String {
        let token = self.token.read().await;
        format!(
            "Bearer {}",
            token.as_deref().unwrap_or(self.anon_key.as_str())
        )
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    /// Start a read query against a table
    pub fn select<'a>(&'a self, table: &'a str) -> Select<'a> {
        Select {
            rest: self,
            table,
            params: vec![("select".to_string(), "*".to_string())],
        }
    }

    /// Insert one row
    pub async fn insert<B: Serialize>(
        &self,
        operation: &str,
        table: &str,
        row: &B,
    ) -> ClientResult<()> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("apikey", &self.anon_key)
            .header(reqwest::header::AUTHORIZATION, self.bearer().await)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(operation, e))?;
        Self::check_status(operation, response).await.map(|_| ())
    }

    /// Upsert one row (merge on conflict)
    pub async fn upsert<B: Serialize>(
        &self,
        operation: &str,
        table: &str,
        row: &B,
    ) -> ClientResult<()> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("apikey", &self.anon_key)
            .header(reqwest::header::AUTHORIZATION, self.bearer().await)
            .header("Prefer", "return=minimal,resolution=merge-duplicates")
            .json(row)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(operation, e))?;
        Self::check_status(operation, response).await.map(|_| ())
    }

    /// Update rows where `column = value`
    pub async fn update_eq<B: Serialize>(
        &self,
        operation: &str,
        table: &str,
        column: &str,
        value: &str,
        row: &B,
    ) -> ClientResult<()> {
        let response = self
            .client
            .patch(self.table_url(table))
            .query(&[(column, format!("eq.{}", value))])
            .header("apikey", &self.anon_key)
            .header(reqwest::header::AUTHORIZATION, self.bearer().await)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(operation, e))?;
        Self::check_status(operation, response).await.map(|_| ())
    }

    /// Delete rows matching all given column/value pairs
    pub async fn delete_match(
        &self,
        operation: &str,
        table: &str,
        matches: &[(&str, &str)],
    ) -> ClientResult<()> {
        let query: Vec<(String, String)> = matches
            .iter()
            .map(|(col, val)| ((*col).to_string(), format!("eq.{}", val)))
            .collect();
        let response = self
            .client
            .delete(self.table_url(table))
            .query(&query)
            .header("apikey", &self.anon_key)
            .header(reqwest::header::AUTHORIZATION, self.bearer().await)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(operation, e))?;
        Self::check_status(operation, response).await.map(|_| ())
    }

    /// Map a non-success status to a typed error, reading the body for
    /// the message.
    pub(crate) async fn check_status(
        operation: &str,
        response: Response,
    ) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ClientError::Remote {
            operation: operation.to_string(),
            status: Some(status.as_u16()),
            message: if message.is_empty() {
                status.to_string()
            } else {
                message
            },
        })
    }
}

/// Read query builder: column projection, equality and set filters,
/// ordering, and limit.
pub struct Select<'a> {
    rest: &'a RestClient,
    table: &'a str,
    params: Vec<(String, String)>,
}

impl<'a> Select<'a> {
    /// Project specific columns instead of `*`
    pub fn columns(mut self, cols: &str) -> Self {
        if let Some(select) = self.params.iter_mut().find(|(k, _)| k == "select") {
            select.1 = cols.to_string();
        }
        self
    }

    /// Filter on `column = value`
    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.params
            .push((column.to_string(), format!("eq.{}", value)));
        self
    }

    /// Filter on `column IN (values)`
    pub fn in_set(mut self, column: &str, values: &[String]) -> Self {
        self.params
            .push((column.to_string(), format!("in.({})", values.join(","))));
        self
    }

    /// Order ascending by the given column
    pub fn order_asc(mut self, column: &str) -> Self {
        self.params
            .push(("order".to_string(), format!("{}.asc", column)));
        self
    }

    /// Limit the number of returned rows
    pub fn limit(mut self, n: usize) -> Self {
        self.params.push(("limit".to_string(), n.to_string()));
        self
    }

    /// The query string this select resolves to (stable, for logging)
    pub fn query_params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Execute and deserialize the rows
    pub async fn fetch<T: DeserializeOwned>(self, operation: &str) -> ClientResult<Vec<T>> {
        let rest = self.rest;
        tracing::debug!(table = self.table, operation, "rest select");
        let response = rest
            .client
            .get(rest.table_url(self.table))
            .query(&self.params)
            .header("apikey", &rest.anon_key)
            .header(reqwest::header::AUTHORIZATION, rest.bearer().await)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(operation, e))?;
        let response = RestClient::check_status(operation, response).await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::from_reqwest(operation, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> RestClient {
        let config = ClientConfig::new("https://backend.example", "anon");
        RestClient::new(&config, Client::new(), Arc::new(RwLock::new(None)))
    }

    #[test]
    fn test_select_builds_ordered_projection() {
        let rest = test_client();
        let select = rest
            .select("businesses")
            .columns("id,name")
            .order_asc("name")
            .limit(1);
        assert_eq!(
            select.query_params(),
            &[
                ("select".to_string(), "id,name".to_string()),
                ("order".to_string(), "name.asc".to_string()),
                ("limit".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_select_in_set_filter() {
        let rest = test_client();
        let ids = vec!["a".to_string(), "b".to_string()];
        let select = rest.select("reviews").in_set("business_id", &ids);
        assert!(select
            .query_params()
            .contains(&("business_id".to_string(), "in.(a,b)".to_string())));
    }

    #[test]
    fn test_select_eq_filter() {
        let rest = test_client();
        let select = rest.select("favorites").eq("user_id", "u1");
        assert!(select
            .query_params()
            .contains(&("user_id".to_string(), "eq.u1".to_string())));
    }

    #[tokio::test]
    async fn test_bearer_falls_back_to_anon_key() {
        let rest = test_client();
        assert_eq!(rest.bearer().await, "Bearer anon");
        *rest.token.write().await = Some("user-token".to_string());
        assert_eq!(rest.bearer().await, "Bearer user-token");
    }
}
