//! Magento 2 REST client

use async_trait::async_trait;
use recon_core::{Record, RecordType, RemoteContent, RemoteError, RemoteResult};
use reqwest::{Method, StatusCode, header};
use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

use crate::config::ClientConfig;
use crate::retry::LinearBackoff;
use crate::{Error, Result};

/// One page of a `*/search` response
#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    items: Vec<Value>,
    #[serde(default)]
    total_count: usize,
}

/// Client for one instance's `/rest/V1/` API.
///
/// Transport errors and 5xx responses are retried with a linear backoff;
/// any other failure is returned immediately.
#[derive(Debug, Clone)]
pub struct MagentoClient {
    http: reqwest::Client,
    api_root: Url,
    token: String,
    config: ClientConfig,
}

impl MagentoClient {
    /// Create a client for the instance at `base_url`.
    ///
    /// # Errors
    ///
    /// Fails if `base_url` is not an absolute URL or the HTTP client cannot
    /// be built.
    pub fn new(base_url: &str, token: impl Into<String>, config: ClientConfig) -> Result<Self> {
        let api_root = format!("{}/rest/V1/", base_url.trim_end_matches('/'));
        let api_root = Url::parse(&api_root).map_err(|e| Error::InvalidUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;

        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            api_root,
            token: token.into(),
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// List the instance's store views (`GET store/storeViews`)
    pub async fn store_views(&self) -> RemoteResult<Vec<Value>> {
        match self.request(Method::GET, &["store", "storeViews"], &[], None).await? {
            Value::Array(views) => Ok(views),
            Value::Null => Ok(Vec::new()),
            other => Err(RemoteError::InvalidResponse(format!(
                "expected a list of store views, got {other}"
            ))),
        }
    }

    async fn search_page(&self, record_type: RecordType, page: usize) -> RemoteResult<SearchPage> {
        let query = [
            (
                "searchCriteria[pageSize]".to_string(),
                self.config.page_size.to_string(),
            ),
            ("searchCriteria[currentPage]".to_string(), page.to_string()),
        ];
        let resource = record_type.spec().api_resource;
        let body = self
            .request(Method::GET, &[resource, "search"], &query, None)
            .await?;
        if body.is_null() {
            return Ok(SearchPage {
                items: Vec::new(),
                total_count: 0,
            });
        }
        serde_json::from_value(body).map_err(|e| RemoteError::InvalidResponse(e.to_string()))
    }

    /// Send a request, retrying transient failures
    async fn request(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> RemoteResult<Value> {
        let url = self.endpoint(segments)?;
        let policy = LinearBackoff::new(self.config.retry_delay, self.config.retry_attempts);

        backoff::future::retry_notify(
            policy,
            || {
                let method = method.clone();
                let url = url.clone();
                async move {
                    self.send_once(method, url, query, body)
                        .await
                        .map_err(|e| {
                            if e.is_transient() {
                                backoff::Error::transient(e)
                            } else {
                                backoff::Error::permanent(e)
                            }
                        })
                }
            },
            |e: RemoteError, wait| {
                tracing::warn!(url = %url, error = %e, ?wait, "Retrying request");
            },
        )
        .await
    }

    async fn send_once(
        &self,
        method: Method,
        url: Url,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> RemoteResult<Value> {
        tracing::debug!(method = %method, url = %url, "Sending request");

        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(&self.token)
            .header(header::ACCEPT, "application/json")
            .query(query);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(RemoteError::Http {
                status: status.as_u16(),
                message: error_message(status, &text),
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| RemoteError::InvalidResponse(e.to_string()))
    }

    fn endpoint(&self, segments: &[&str]) -> RemoteResult<Url> {
        let mut url = self.api_root.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::InvalidResponse(format!("{} cannot be a base URL", self.api_root)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Magento error bodies look like `{"message": "..."}`; fall back to raw text
fn error_message(status: StatusCode, body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());
    if message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        message
    }
}

/// Wrap a record as `{"block": ...}` / `{"page": ...}`
fn envelope(record_type: RecordType, record: &Record) -> Value {
    let mut body = Map::new();
    body.insert(
        record_type.spec().payload_envelope.to_string(),
        record.clone().into_json(),
    );
    Value::Object(body)
}

fn into_record(value: Value) -> RemoteResult<Record> {
    Record::from_json(value).map_err(|e| RemoteError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl RemoteContent for MagentoClient {
    async fn list(&self, record_type: RecordType) -> RemoteResult<Vec<Record>> {
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            let SearchPage { items, total_count } = self.search_page(record_type, page).await?;
            if items.is_empty() {
                break;
            }
            for item in items {
                records.push(into_record(item)?);
            }
            if records.len() >= total_count {
                break;
            }
            page += 1;
        }

        tracing::debug!(record_type = %record_type, count = records.len(), pages = page, "Listed records");
        Ok(records)
    }

    async fn create(&self, record_type: RecordType, record: &Record) -> RemoteResult<Record> {
        let spec = record_type.spec();
        let body = envelope(record_type, record);
        let created = self
            .request(Method::POST, &[spec.api_resource], &[], Some(&body))
            .await?;
        into_record(created)
    }

    async fn update(&self, record_type: RecordType, id: &str, record: &Record) -> RemoteResult<Record> {
        let spec = record_type.spec();
        let body = envelope(record_type, record);
        let updated = self
            .request(Method::PUT, &[spec.api_resource, id], &[], Some(&body))
            .await?;
        into_record(updated)
    }
}
