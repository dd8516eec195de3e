use std::{fmt, sync::Arc};

use reqwest::header;

use crate::{
    policy::ResiliencePolicy, BatchDefinition, BatchDefinitionFilter, BatchInventory,
    BatchInventoryFilter, ClientOptions, CreateBatchDefinitionRequest,
    CreateBatchInventoryRequest, DecodeOptions, QueryFilter, ResilientExecutor, Result,
    UpdateBatchDefinitionRequest, UpdateBatchInventoryRequest,
};

const BATCH_DEFINITIONS: &str = "batch_definitions";
const BATCH_INVENTORIES: &str = "batch_inventories";

#[derive(Clone)]
/// HTTP client for the Waste2Meals batch API.
pub struct Waste2MealsClient {
    executor: ResilientExecutor,
    base_url: String,
    authorization: Option<String>,
}

impl fmt::Debug for Waste2MealsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Waste2MealsClient")
            .field("base_url", &self.base_url)
            .field(
                "authorization",
                &self.authorization.as_ref().map(|_| "<redacted>"),
            )
            .field("executor", &self.executor)
            .finish()
    }
}

impl Waste2MealsClient {
    /// Creates a client with default retry and timeout options.
    ///
    /// Resource paths are appended to `base_url`, e.g.
    /// `https://api.example.com/v1` + `batch_definitions`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    /// Creates a client around an existing `reqwest::Client`.
    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            executor: ResilientExecutor::new(http, &ClientOptions::default()),
            base_url: base_url.into(),
            authorization: None,
        }
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `WASTE2MEALS_BASE_URL`: API root (required)
    /// - `WASTE2MEALS_TOKEN`: bearer token (optional)
    /// - retry and timeout overrides, see [`ClientOptions::from_env`]
    ///
    /// # Example
    ///
    /// ```no_run
    /// use waste2meals_http::Waste2MealsClient;
    ///
    /// let client = Waste2MealsClient::from_env().expect("missing WASTE2MEALS_BASE_URL");
    /// ```
    pub fn from_env() -> std::result::Result<Self, String> {
        let base_url = std::env::var("WASTE2MEALS_BASE_URL")
            .map_err(|_| "missing WASTE2MEALS_BASE_URL environment variable".to_owned())?;
        if base_url.trim().is_empty() {
            return Err("WASTE2MEALS_BASE_URL is set but empty".to_owned());
        }

        let mut client = Self::new(base_url.trim()).with_options(ClientOptions::from_env()?);
        if let Ok(token) = std::env::var("WASTE2MEALS_TOKEN") {
            if !token.trim().is_empty() {
                client = client.with_bearer_token(token);
            }
        }
        Ok(client)
    }

    /// Rebuilds the retry + timeout policy from `opts`.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        let decode = self.executor.decode_options();
        self.executor =
            ResilientExecutor::new(self.executor.http().clone(), &opts).with_decode_options(decode);
        self
    }

    /// Replaces the built policy with a custom one.
    pub fn with_policy(mut self, policy: Arc<dyn ResiliencePolicy>) -> Self {
        let decode = self.executor.decode_options();
        self.executor = ResilientExecutor::with_policy(self.executor.http().clone(), policy)
            .with_decode_options(decode);
        self
    }

    pub fn with_decode_options(mut self, decode: DecodeOptions) -> Self {
        self.executor = self.executor.with_decode_options(decode);
        self
    }

    /// Sends `Authorization: Bearer <token>`; the prefix is added when missing.
    pub fn with_bearer_token(mut self, token: impl AsRef<str>) -> Self {
        self.authorization = Some(normalize_bearer_authorization(token.as_ref()));
        self
    }

    pub fn executor(&self) -> &ResilientExecutor {
        &self.executor
    }

    pub fn batch_definitions(&self) -> BatchDefinitions<'_> {
        BatchDefinitions { client: self }
    }

    pub fn batch_inventories(&self) -> BatchInventories<'_> {
        BatchInventories { client: self }
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    fn request(
        &self,
        http: &reqwest::Client,
        method: reqwest::Method,
        url: &str,
    ) -> reqwest::RequestBuilder {
        let builder = http
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        match &self.authorization {
            Some(value) => builder.header(header::AUTHORIZATION, value),
            None => builder,
        }
    }
}

/// Batch definition endpoints.
#[derive(Clone, Copy, Debug)]
pub struct BatchDefinitions<'a> {
    client: &'a Waste2MealsClient,
}

impl BatchDefinitions<'_> {
    pub async fn list(&self, filter: &BatchDefinitionFilter) -> Result<Vec<BatchDefinition>> {
        let url = self
            .client
            .url(&format!("{BATCH_DEFINITIONS}{}", filter.to_query_string()));
        self.client
            .executor
            .execute_json(|http| self.client.request(http, reqwest::Method::GET, &url))
            .await
    }

    pub async fn get(&self, id: i64) -> Result<BatchDefinition> {
        let url = self.client.url(&format!("{BATCH_DEFINITIONS}/{id}"));
        self.client
            .executor
            .execute_json(|http| self.client.request(http, reqwest::Method::GET, &url))
            .await
    }

    pub async fn create(&self, request: &CreateBatchDefinitionRequest) -> Result<BatchDefinition> {
        let url = self.client.url(BATCH_DEFINITIONS);
        self.client
            .executor
            .execute_json(|http| {
                self.client
                    .request(http, reqwest::Method::POST, &url)
                    .json(request)
            })
            .await
    }

    pub async fn update(&self, request: &UpdateBatchDefinitionRequest) -> Result<BatchDefinition> {
        let url = self.client.url(BATCH_DEFINITIONS);
        self.client
            .executor
            .execute_json(|http| {
                self.client
                    .request(http, reqwest::Method::PUT, &url)
                    .json(request)
            })
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let url = self.client.url(&format!("{BATCH_DEFINITIONS}/{id}"));
        self.client
            .executor
            .execute(|http| self.client.request(http, reqwest::Method::DELETE, &url))
            .await
    }
}

/// Batch inventory endpoints.
#[derive(Clone, Copy, Debug)]
pub struct BatchInventories<'a> {
    client: &'a Waste2MealsClient,
}

impl BatchInventories<'_> {
    pub async fn list(&self, filter: &BatchInventoryFilter) -> Result<Vec<BatchInventory>> {
        let url = self
            .client
            .url(&format!("{BATCH_INVENTORIES}{}", filter.to_query_string()));
        self.client
            .executor
            .execute_json(|http| self.client.request(http, reqwest::Method::GET, &url))
            .await
    }

    pub async fn get(&self, id: i64) -> Result<BatchInventory> {
        let url = self.client.url(&format!("{BATCH_INVENTORIES}/{id}"));
        self.client
            .executor
            .execute_json(|http| self.client.request(http, reqwest::Method::GET, &url))
            .await
    }

    pub async fn create(&self, request: &CreateBatchInventoryRequest) -> Result<BatchInventory> {
        let url = self.client.url(BATCH_INVENTORIES);
        self.client
            .executor
            .execute_json(|http| {
                self.client
                    .request(http, reqwest::Method::POST, &url)
                    .json(request)
            })
            .await
    }

    pub async fn update(&self, request: &UpdateBatchInventoryRequest) -> Result<BatchInventory> {
        let url = self.client.url(BATCH_INVENTORIES);
        self.client
            .executor
            .execute_json(|http| {
                self.client
                    .request(http, reqwest::Method::PUT, &url)
                    .json(request)
            })
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let url = self.client.url(&format!("{BATCH_INVENTORIES}/{id}"));
        self.client
            .executor
            .execute(|http| self.client.request(http, reqwest::Method::DELETE, &url))
            .await
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn normalize_bearer_authorization(token: &str) -> String {
    let trimmed = token.trim();
    let prefix = trimmed.get(..7);
    if prefix.is_some_and(|value| value.eq_ignore_ascii_case("bearer ")) {
        trimmed.to_owned()
    } else {
        format!("Bearer {trimmed}")
    }
}
