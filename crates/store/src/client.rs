//! REST client for the hosted record store.
//!
//! Wraps the store's collection endpoints (record CRUD, paged listing,
//! password auth and token refresh) using [`reqwest`].

use appraisal_core::record::{PropertyRecord, StoredRecord};
use async_trait::async_trait;

use crate::{AuthSession, ListQuery, RecordPage, RecordStore, StoreConfig, StoreError};

/// HTTP client for one record store instance.
#[derive(Debug)]
pub struct HttpRecordStore {
    client: reqwest::Client,
    base_url: reqwest::Url,
    config: StoreConfig,
}

impl HttpRecordStore {
    /// Create a client for the store described by `config`.
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: StoreConfig) -> Result<Self, StoreError> {
        let base_url = reqwest::Url::parse(&config.base_url)
            .map_err(|e| StoreError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::InvalidUrl(config.base_url.clone()));
        }
        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // ---- URL helpers ----

    /// `{base}/api/collections/{collection}/{tail..}` with every segment
    /// percent-encoded, so identifiers cannot escape their path segment.
    fn collection_url(&self, collection: &str, tail: &[&str]) -> reqwest::Url {
        let mut url = self.base_url.clone();
        // The constructor rejected cannot-be-a-base URLs.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "collections", collection])
                .extend(tail);
        }
        url
    }

    fn records_url(&self) -> reqwest::Url {
        self.collection_url(&self.config.record_collection, &["records"])
    }

    fn record_url(&self, id: &str) -> reqwest::Url {
        self.collection_url(&self.config.record_collection, &["records", id])
    }

    fn auth_url(&self, action: &str) -> reqwest::Url {
        self.collection_url(&self.config.user_collection, &[action])
    }

    /// Attach the service token, when one is configured.
    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.token {
            Some(token) => request.header(reqwest::header::AUTHORIZATION, token),
            None => request,
        }
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`StoreError::Api`] containing
    /// the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(StoreError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        let response = Self::ensure_success(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), StoreError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

/// Map store status codes on record calls to their domain meaning.
fn classify_record_error(err: StoreError, id: Option<&str>) -> StoreError {
    match (err, id) {
        (StoreError::Api { status: 404, .. }, Some(id)) => StoreError::NotFound { id: id.into() },
        (StoreError::Api { status: 400, body }, _) => StoreError::Rejected(body),
        (other, _) => other,
    }
}

/// Map status codes on auth calls: the store answers bad credentials with
/// 400 and stale tokens with 401/403/404.
fn classify_auth_error(err: StoreError) -> StoreError {
    match err {
        StoreError::Api {
            status: 400 | 401 | 403 | 404,
            ..
        } => StoreError::Unauthorized,
        other => other,
    }
}

/// Query-string pairs for a listing request.
fn list_params(page: u32, per_page: u32, query: &ListQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("page", page.to_string()), ("perPage", per_page.to_string())];
    if let Some(filter) = &query.filter {
        params.push(("filter", filter.render()));
    }
    if let Some(sort) = query.sort {
        params.push(("sort", sort.as_str().to_string()));
    }
    if let Some(fields) = &query.fields {
        params.push(("fields", fields.join(",")));
    }
    params
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn list(
        &self,
        page: u32,
        per_page: u32,
        query: &ListQuery,
    ) -> Result<RecordPage, StoreError> {
        tracing::debug!(
            collection = %self.config.record_collection,
            page,
            per_page,
            "Listing records"
        );
        let response = self
            .authorized(self.client.get(self.records_url()))
            .query(&list_params(page, per_page, query))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn get(&self, id: &str) -> Result<StoredRecord, StoreError> {
        let response = self
            .authorized(self.client.get(self.record_url(id)))
            .send()
            .await?;

        Self::parse_response(response)
            .await
            .map_err(|e| classify_record_error(e, Some(id)))
    }

    async fn create(&self, record: &PropertyRecord) -> Result<StoredRecord, StoreError> {
        let response = self
            .authorized(self.client.post(self.records_url()))
            .json(record)
            .send()
            .await?;

        Self::parse_response(response)
            .await
            .map_err(|e| classify_record_error(e, None))
    }

    async fn update(&self, id: &str, record: &PropertyRecord) -> Result<StoredRecord, StoreError> {
        let response = self
            .authorized(self.client.patch(self.record_url(id)))
            .json(record)
            .send()
            .await?;

        Self::parse_response(response)
            .await
            .map_err(|e| classify_record_error(e, Some(id)))
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let response = self
            .authorized(self.client.delete(self.record_url(id)))
            .send()
            .await?;

        Self::check_status(response)
            .await
            .map_err(|e| classify_record_error(e, Some(id)))
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<AuthSession, StoreError> {
        let body = serde_json::json!({
            "identity": email,
            "password": password,
        });

        let response = self
            .client
            .post(self.auth_url("auth-with-password"))
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response)
            .await
            .map_err(classify_auth_error)
    }

    async fn refresh(&self, token: &str) -> Result<AuthSession, StoreError> {
        let response = self
            .client
            .post(self.auth_url("auth-refresh"))
            .header(reqwest::header::AUTHORIZATION, token)
            .send()
            .await?;

        Self::parse_response(response)
            .await
            .map_err(classify_auth_error)
    }
}
