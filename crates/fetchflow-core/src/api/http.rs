//! Live REST source backed by libcurl.
//!
//! Each request runs a blocking curl `Easy` transfer on tokio's blocking
//! pool. If the caller's deadline fires first the transfer is not
//! interrupted; it finishes (or hits curl's own timeout) in the background
//! and the result is dropped.

use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use super::{ApiError, DataSource, Post, User};

/// Raw response of one GET.
#[derive(Debug)]
struct Response {
    status: u32,
    body: Vec<u8>,
}

/// JSONPlaceholder-style REST source: `/users`, `/users/{id}`, `/posts`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base: Url,
    connect_timeout: Duration,
    transfer_timeout: Duration,
}

impl HttpSource {
    /// `base_url` is the service root, e.g. `https://jsonplaceholder.typicode.com`.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut base = Url::parse(base_url)?;
        // Join relative paths under the root instead of replacing its last segment.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            base,
            connect_timeout: Duration::from_secs(15),
            transfer_timeout: Duration::from_secs(30),
        })
    }

    /// Hard upper bound for a single curl transfer, independent of any
    /// caller-side deadline.
    pub fn with_transfer_timeout(mut self, timeout: Duration) -> Self {
        self.transfer_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str, query: Option<(&str, String)>) -> Result<Url, ApiError> {
        let mut url = self.base.join(path)?;
        if let Some((key, value)) = query {
            url.query_pairs_mut().append_pair(key, &value);
        }
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<Response, ApiError> {
        tracing::debug!(url = %url, "GET");
        let connect_timeout = self.connect_timeout;
        let transfer_timeout = self.transfer_timeout;
        let target = url.to_string();
        let response = tokio::task::spawn_blocking(move || {
            perform_get(&target, connect_timeout, transfer_timeout)
        })
        .await??;
        tracing::debug!(
            url = %url,
            status = response.status,
            bytes = response.body.len(),
            "response"
        );
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self.get(url.clone()).await?;
        ensure_success(&response, &url)?;
        Ok(serde_json::from_slice(&response.body)?)
    }
}

/// Performs a GET and collects the body. Runs in the current thread.
fn perform_get(
    url: &str,
    connect_timeout: Duration,
    transfer_timeout: Duration,
) -> Result<Response, ApiError> {
    let mut body = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.connect_timeout(connect_timeout)?;
    easy.timeout(transfer_timeout)?;
    easy.useragent(concat!("fetchflow/", env!("CARGO_PKG_VERSION")))?;

    let mut list = curl::easy::List::new();
    list.append("Accept: application/json")?;
    easy.http_headers(list)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    Ok(Response { status, body })
}

fn ensure_success(response: &Response, url: &Url) -> Result<(), ApiError> {
    if (200..300).contains(&response.status) {
        Ok(())
    } else {
        Err(ApiError::Http {
            status: response.status,
            url: url.to_string(),
        })
    }
}

impl DataSource for HttpSource {
    async fn fetch_users(&self) -> Result<Vec<User>, ApiError> {
        self.get_json(self.endpoint("users", None)?).await
    }

    async fn fetch_user_by_id(&self, id: u64) -> Result<Option<User>, ApiError> {
        let url = self.endpoint(&format!("users/{}", id), None)?;
        let response = self.get(url.clone()).await?;
        if response.status == 404 {
            tracing::warn!(id, "user not found");
            return Ok(None);
        }
        ensure_success(&response, &url)?;
        Ok(Some(serde_json::from_slice(&response.body)?))
    }

    async fn fetch_posts(&self) -> Result<Vec<Post>, ApiError> {
        self.get_json(self.endpoint("posts", None)?).await
    }

    async fn fetch_posts_by_user(&self, user_id: u64) -> Result<Vec<Post>, ApiError> {
        let url = self.endpoint("posts", Some(("userId", user_id.to_string())))?;
        self.get_json(url).await
    }
}
