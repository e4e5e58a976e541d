use std::{env, time::Duration};

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use model::{map_tags, Establishment, TagMode};
use serde::Serialize;
use serde_json::Value;
use utility::geo::BoundingBox;

use crate::{
    rpc::{AddNodeParams, Method, RpcRequest, SearchNodesParams, UpdateNodeParams},
    ApiError, ApiResult, Registry,
};

pub const BTCMAP_API_URL: &str = "https://api.btcmap.org/v2/rpc";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct RegistryConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    /// Stamp `check_date:currency:XBT` with today's date on every write.
    pub stamp_check_date: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            api_url: BTCMAP_API_URL.to_owned(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            stamp_check_date: false,
        }
    }
}

impl RegistryConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_url = env::var("BTCMAP_API_URL").unwrap_or(defaults.api_url);
        let api_key = env::var("BTCMAP_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let timeout = env::var("BTCMAP_TIMEOUT_SECS")
            .ok()
            .and_then(|secs| secs.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);
        let stamp_check_date = env::var("BTCMAP_STAMP_CHECK_DATE")
            .map(|flag| flag.eq_ignore_ascii_case("true") || flag == "1")
            .unwrap_or(defaults.stamp_check_date);

        Self {
            api_url,
            api_key,
            timeout,
            stamp_check_date,
        }
    }

    pub fn api_key_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// JSON-RPC client for the BTC Map API.
pub struct BtcMapClient {
    config: RegistryConfig,
    http: reqwest::Client,
}

impl BtcMapClient {
    pub fn new(config: RegistryConfig) -> ApiResult<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn check_date(&self) -> Option<NaiveDate> {
        self.config
            .stamp_check_date
            .then(|| Local::now().date_naive())
    }

    async fn call<P: Serialize>(&self, method: Method, params: P) -> ApiResult<Value> {
        let url = &self.config.api_url;
        let request = RpcRequest { method, params };

        log::info!("Calling '{method}' on '{url}'.");

        let mut builder = self.http.post(url).json(&request);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await.map_err(|why| {
            log::error!("'{method}' request to '{url}' failed: {why}");
            ApiError::from(why)
        })?;

        let status_code = response.status();
        if !status_code.is_success() {
            let response = response.text().await.ok();
            log::error!(
                "'{method}' request to '{url}' answered {status_code}: {}",
                response.as_deref().unwrap_or("<no body>")
            );
            return Err(ApiError::InvalidResponse {
                status_code,
                url: url.clone(),
                response,
            });
        }

        response.json().await.map_err(|why| {
            log::error!("'{method}' response from '{url}' is not valid JSON: {why}");
            ApiError::from(why)
        })
    }
}

#[async_trait]
impl Registry for BtcMapClient {
    async fn add(&self, establishment: &Establishment) -> ApiResult<Value> {
        let coordinates = establishment.validate_for_create()?;
        let tags = map_tags(establishment, TagMode::Create, self.check_date());

        self.call(
            Method::AddNode,
            AddNodeParams {
                lat: coordinates.lat,
                lon: coordinates.lon,
                tags: &tags,
            },
        )
        .await
    }

    async fn update(&self, id: &str, establishment: &Establishment) -> ApiResult<Value> {
        establishment.validate_for_update()?;
        let tags = map_tags(establishment, TagMode::Update, self.check_date());

        self.call(Method::UpdateNode, UpdateNodeParams { id, tags: &tags })
            .await
    }

    async fn search(
        &self,
        bounds: Option<BoundingBox>,
        query: Option<&str>,
        limit: usize,
    ) -> ApiResult<Vec<Value>> {
        let response = self
            .call(
                Method::SearchNodes,
                SearchNodesParams {
                    limit,
                    bounds,
                    query: query.filter(|query| !query.is_empty()),
                },
            )
            .await?;

        Ok(response
            .get("result")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }
}
