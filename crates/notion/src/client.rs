//! Thin authenticated wrapper over the Notion REST API.

use crate::errors::NotionError;
use minutes::config::ExtractionConfig;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

pub const PAGE_SIZE: u32 = 100;

/// One page of a paginated list endpoint.
#[derive(Deserialize, Debug, Default)]
pub struct ListResponse {
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Clone, Debug)]
pub struct NotionClient {
    http: reqwest::Client,
    headers: HeaderMap,
    base_url: String,
}

impl NotionClient {
    pub fn new(token: &str, version: &str, base_url: &str) -> Result<Self, NotionError> {
        Ok(Self {
            http: reqwest::Client::new(),
            headers: construct_headers(token, version)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ExtractionConfig) -> Result<Self, NotionError> {
        Self::new(&config.source_token, &config.api_version, &config.api_base_url)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{path}", self.base_url)
    }

    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, NotionError> {
        debug!("--> GET {path}");
        let response = self
            .http
            .get(self.url(path))
            .headers(self.headers.clone())
            .query(query)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, NotionError> {
        debug!("--> POST {path}");
        let response = self
            .http
            .post(self.url(path))
            .headers(self.headers.clone())
            .json(body)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> Result<Value, NotionError> {
        debug!("--> PATCH {path}");
        let response = self
            .http
            .patch(self.url(path))
            .headers(self.headers.clone())
            .json(body)
            .send()
            .await?;
        read_json(response).await
    }

    /// Queries every page of a database matching `filter`.
    pub async fn query_database(
        &self,
        database_id: &str,
        filter: Value,
    ) -> Result<Vec<Value>, NotionError> {
        let path = format!("databases/{database_id}/query");
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({ "filter": filter, "page_size": PAGE_SIZE });
            if let Some(cursor) = &cursor {
                body["start_cursor"] = json!(cursor);
            }
            let mut list: ListResponse = decode(self.post(&path, &body).await?)?;
            pages.append(&mut list.results);

            match list.next_cursor {
                Some(next) if list.has_more => cursor = Some(next),
                _ => break,
            }
        }

        Ok(pages)
    }

    /// Lists every direct child of a block, following pagination.
    pub async fn list_children(&self, block_id: &str) -> Result<Vec<Value>, NotionError> {
        let path = format!("blocks/{block_id}/children");
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut query = vec![("page_size", PAGE_SIZE.to_string())];
            if let Some(cursor) = &cursor {
                query.push(("start_cursor", cursor.clone()));
            }
            let mut list: ListResponse = decode(self.get(&path, &query).await?)?;
            blocks.append(&mut list.results);

            match list.next_cursor {
                Some(next) if list.has_more => cursor = Some(next),
                _ => break,
            }
        }

        Ok(blocks)
    }
}

fn construct_headers(token: &str, version: &str) -> Result<HeaderMap, NotionError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| NotionError::InvalidHeader(format!("Invalid token: {e}")))?,
    );
    headers.insert(
        "Notion-Version",
        HeaderValue::from_str(version)
            .map_err(|e| NotionError::InvalidHeader(format!("Invalid version: {e}")))?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

async fn read_json(response: reqwest::Response) -> Result<Value, NotionError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(NotionError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json::<Value>().await?)
}

pub(crate) fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, NotionError> {
    serde_json::from_value(value).map_err(|e| NotionError::Decode(e.to_string()))
}
