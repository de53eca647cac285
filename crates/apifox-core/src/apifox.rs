//! Apifox shared-doc client: builds doc URLs and wraps fetch results.

use crate::cancel::CancelToken;
use crate::config::{AppConfig, RequestOverrides};
use crate::fetch::FetchClient;
use crate::key::{self, ApiKey};
use crate::response::ApiResult;
use crate::retry::FetchError;

/// Document listing every API in a shared doc.
const LIST_DOCUMENT: &str = "llms.txt";

#[derive(Clone)]
pub struct ApifoxClient {
    config: AppConfig,
    fetch: FetchClient,
}

impl ApifoxClient {
    pub fn new(config: AppConfig, fetch: FetchClient) -> Self {
        tracing::info!(base_url = %config.base_url, "apifox client initialized");
        Self { config, fetch }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Explicit input (UUID or share URL) or the configured default key.
    pub fn resolve_key(&self, input: Option<&str>) -> Result<ApiKey, FetchError> {
        key::resolve_key(input, self.config.api_key.as_deref())
    }

    fn doc_url(&self, key: &ApiKey, document: &str) -> String {
        format!(
            "{}/apidoc/shared/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            key,
            document
        )
    }

    pub fn list_url(&self, key: &ApiKey) -> String {
        self.doc_url(key, LIST_DOCUMENT)
    }

    pub fn detail_url(&self, key: &ApiKey, api_id: &str) -> String {
        self.doc_url(key, &format!("api-{}.md", api_id))
    }

    fn fetch_document(
        &self,
        url: &str,
        overrides: RequestOverrides,
        cancel: &CancelToken,
    ) -> ApiResult {
        let request = self.config.request_config(overrides);
        let result = self.fetch.request(url, &request, cancel);
        match &result {
            Ok(data) => tracing::info!(url, bytes = data.len(), "document fetched"),
            Err(e) => tracing::error!(url, error = %e, "document fetch failed"),
        }
        result.into()
    }

    /// Fetch `llms.txt` for an already-resolved key.
    pub fn list(&self, key: &ApiKey, overrides: RequestOverrides, cancel: &CancelToken) -> ApiResult {
        self.fetch_document(&self.list_url(key), overrides, cancel)
    }

    /// Fetch `api-{api_id}.md` for an already-resolved key.
    pub fn detail(
        &self,
        key: &ApiKey,
        api_id: &str,
        overrides: RequestOverrides,
        cancel: &CancelToken,
    ) -> ApiResult {
        match key::validate_api_id(api_id) {
            Ok(id) => self.fetch_document(&self.detail_url(key, id), overrides, cancel),
            Err(e) => e.into(),
        }
    }

    /// Resolve the key and fetch the API list. Never fails; errors come back in the envelope.
    pub fn get_api_list(
        &self,
        key_input: Option<&str>,
        overrides: RequestOverrides,
        cancel: &CancelToken,
    ) -> ApiResult {
        match self.resolve_key(key_input) {
            Ok(key) => self.list(&key, overrides, cancel),
            Err(e) => e.into(),
        }
    }

    /// Resolve the key and fetch one API's detail document.
    pub fn get_api_detail(
        &self,
        key_input: Option<&str>,
        api_id: &str,
        overrides: RequestOverrides,
        cancel: &CancelToken,
    ) -> ApiResult {
        match self.resolve_key(key_input) {
            Ok(key) => self.detail(&key, api_id, overrides, cancel),
            Err(e) => e.into(),
        }
    }
}
