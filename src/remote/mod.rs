pub mod rows;

use crate::config::BackendConfig;
use crate::errors::{AppError, AppResult};
use crate::redaction::Redactor;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
    msg: Option<String>,
}

/// Thin client for the hosted backend's REST interface
/// (`{url}/rest/v1/{table}`, PostgREST query syntax).
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
    anon_key: String,
    client: Client,
    redactor: Redactor,
}

impl RestClient {
    pub fn new(config: &BackendConfig) -> AppResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|error| AppError::Config(format!("failed to create HTTP client: {}", error)))?;
        Ok(Self {
            base_url: config.base_url().to_string(),
            anon_key: config.anon_key.trim().to_string(),
            client,
            redactor: Redactor::new().with_secret(&config.anon_key),
        })
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/rest/v1/{}", self.base_url, table))
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
            .header("Accept", "application/json")
    }

    pub async fn select<R: DeserializeOwned>(
        &self,
        table: &str,
        select: &str,
        filters: &[(&str, String)],
        order: Option<&str>,
        limit: Option<usize>,
    ) -> AppResult<Vec<R>> {
        let mut query: Vec<(String, String)> = vec![("select".to_string(), select.to_string())];
        for (column, value) in filters {
            query.push((column.to_string(), format!("eq.{}", value)));
        }
        if let Some(order) = order {
            query.push(("order".to_string(), order.to_string()));
        }
        if let Some(limit) = limit {
            query.push(("limit".to_string(), limit.to_string()));
        }

        tracing::debug!(table, filters = filters.len(), "remote select");
        let response = self.send(table, self.request(Method::GET, table).query(&query)).await?;
        self.read_rows(table, response).await
    }

    pub async fn insert<R: DeserializeOwned>(&self, table: &str, body: &Value) -> AppResult<R> {
        let builder = self
            .request(Method::POST, table)
            .header("Prefer", "return=representation")
            .json(body);
        let response = self.send(table, builder).await?;
        let mut rows = self.read_rows::<R>(table, response).await?;
        if rows.is_empty() {
            return Err(AppError::Remote(format!("insert into {} returned no rows", table)));
        }
        Ok(rows.remove(0))
    }

    /// `None` when no row carries `id`.
    pub async fn update<R: DeserializeOwned>(&self, table: &str, id: &str, body: &Value) -> AppResult<Option<R>> {
        let builder = self
            .request(Method::PATCH, table)
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(body);
        let response = self.send(table, builder).await?;
        let mut rows = self.read_rows::<R>(table, response).await?;
        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.remove(0)))
        }
    }

    pub async fn delete(&self, table: &str, id: &str) -> AppResult<bool> {
        let builder = self
            .request(Method::DELETE, table)
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation");
        let response = self.send(table, builder).await?;
        let rows = self.read_rows::<Value>(table, response).await?;
        Ok(!rows.is_empty())
    }

    async fn send(&self, table: &str, builder: RequestBuilder) -> AppResult<Response> {
        builder.send().await.map_err(|error| {
            let message = error.to_string();
            tracing::warn!(
                table,
                error = %self.redactor.redact(&message).content,
                "remote request could not be sent"
            );
            AppError::Remote(message)
        })
    }

    async fn read_rows<R: DeserializeOwned>(&self, table: &str, response: Response) -> AppResult<Vec<R>> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = error_message(status.as_u16(), &body);
            tracing::warn!(
                table,
                status = status.as_u16(),
                error = %self.redactor.redact(&message).content,
                "remote request rejected"
            );
            return Err(AppError::Remote(message));
        }
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str::<Vec<R>>(&body)?)
    }
}

fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message.or(parsed.error).or(parsed.msg))
        .unwrap_or_else(|| {
            let body = body.trim();
            if body.is_empty() {
                format!("request failed with status {}", status)
            } else {
                format!("request failed with status {}: {}", status, body)
            }
        })
}
