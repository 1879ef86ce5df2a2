use std::sync::Arc;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    CatalogError, Result,
    config::{self, ClientConfig},
    management::{KeyValueStore, ResponseCache, UsageTelemetry, load_credential},
    spotify::{
        auth::TokenProvider,
        scheduler::{ApiRequest, RequestScheduler},
    },
    types::{Credential, UsagePressure},
    utils,
};

/// The rate-governed entry point to the provider.
///
/// One instance is built per session and shared by reference. It owns the
/// token provider, the request scheduler, the response cache and the usage
/// telemetry; nothing else talks to the provider directly.
pub struct CatalogClient {
    config: ClientConfig,
    tokens: Arc<TokenProvider>,
    scheduler: RequestScheduler,
    cache: ResponseCache,
    telemetry: Arc<UsageTelemetry>,
    store: Arc<dyn KeyValueStore>,
}

impl CatalogClient {
    /// Builds the client and spawns its scheduler worker.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(
        config: ClientConfig,
        credential: Option<Credential>,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(CatalogError::from_transport)?;

        let tokens = Arc::new(TokenProvider::new(
            http.clone(),
            config.token_url.clone(),
            config.token_expiry_skew,
            credential,
        ));
        let telemetry = Arc::new(UsageTelemetry::new(
            Arc::clone(&store),
            config.default_throttle,
        ));
        let scheduler = RequestScheduler::spawn(
            http,
            Arc::clone(&tokens),
            Arc::clone(&telemetry),
            config.min_request_interval,
        );
        let cache = ResponseCache::new(config.cache_freshness);

        Ok(Self {
            config,
            tokens,
            scheduler,
            cache,
            telemetry,
            store,
        })
    }

    /// Builds the client with the credential from the store, falling back to
    /// the environment.
    pub async fn from_store(config: ClientConfig, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let credential = match load_credential(store.as_ref()).await {
            Some(credential) => Some(credential),
            None => config::credential_from_env(),
        };
        Self::new(config, credential, store)
    }

    /// Swaps the credential and resets all session state.
    ///
    /// The cached token and every cached response are dropped, and requests
    /// still waiting in the queue fail with [`CatalogError::Reinitialized`].
    pub async fn reinitialize(&self, credential: Option<Credential>) {
        self.scheduler.reset();
        self.tokens.reinitialize(credential).await;
        self.cache.clear();
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn tokens(&self) -> &TokenProvider {
        &self.tokens
    }

    pub fn scheduler(&self) -> &RequestScheduler {
        &self.scheduler
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn telemetry(&self) -> &UsageTelemetry {
        &self.telemetry
    }

    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.store)
    }

    pub async fn pressure(&self) -> UsagePressure {
        self.telemetry.get_pressure().await
    }

    /// Absolute URL for an API path such as `/albums/{id}`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url.trim_end_matches('/'), path)
    }

    /// Cache-wrapped GET through the scheduler.
    ///
    /// A response that arrives after a [`reinitialize`](Self::reinitialize)
    /// is returned to the caller but never cached.
    pub async fn fetch_json(&self, request: ApiRequest) -> Result<Value> {
        let key = utils::cache_key(&request.url, &request.query);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let generation = self.scheduler.generation();
        let value = self.scheduler.enqueue(request).await?;
        if self.scheduler.generation() == generation {
            self.cache.put(key, value.clone());
        }
        Ok(value)
    }

    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let value = self.fetch_json(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Adds the configured market, if any, to a request.
    pub(crate) fn with_market(&self, request: ApiRequest) -> ApiRequest {
        match &self.config.market {
            Some(market) => request.query("market", market),
            None => request,
        }
    }
}
