use std::time::Duration;

use futures::future::join_all;
use nksctx_config::{ApiConfig, Credentials};
use serde::Deserialize;

use crate::error::{EndpointFailure, NksError};
use crate::signer;
use crate::transport::{HttpTransport, Transport};

/// Regional NKS base URLs keyed by a marker in the gateway host. First match wins;
/// anything unmatched is the commercial cloud.
const REGIONAL_ENDPOINTS: &[(&str, &[&str])] = &[
    ("fin-ntruss.com", &["https://nks.apigw.fin-ntruss.com/nks/v2"]),
    ("gov-ntruss.com", &["https://nks.apigw.gov-ntruss.com/vnks/v2", "https://nks.apigw.gov-ntruss.com/vnks/krs-v2"]),
];

const COMMERCIAL_ENDPOINTS: &[&str] = &[
    "https://nks.apigw.ntruss.com/vnks/v2",
    "https://nks.apigw.ntruss.com/vnks/sgn-v2",
    "https://nks.apigw.ntruss.com/vnks/jpn-v2",
];

/// An NKS cluster as reported by one regional endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub uuid: String,
    pub name: String,
    pub region: String,
    pub status: String,
}

#[derive(Deserialize)]
struct ClusterListResponse {
    #[serde(default)]
    clusters: Vec<ClusterInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClusterInfo {
    #[serde(default)]
    uuid: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    region_code: String,
    #[serde(default)]
    status: String,
}

impl From<ClusterInfo> for Cluster {
    fn from(info: ClusterInfo) -> Self {
        Self { uuid: info.uuid, name: info.name, region: info.region_code, status: info.status }
    }
}

/// Clusters from every endpoint that answered, plus the endpoints that did not.
#[derive(Debug, Clone, Default)]
pub struct ClusterListing {
    pub clusters: Vec<Cluster>,
    pub failures: Vec<EndpointFailure>,
}

pub fn resolve_base_urls(api_url: &str) -> Vec<String> {
    let host = gateway_host(api_url);
    REGIONAL_ENDPOINTS
        .iter()
        .find(|(marker, _)| host.contains(marker))
        .map_or(COMMERCIAL_ENDPOINTS, |(_, urls)| *urls)
        .iter()
        .map(|url| url.to_string())
        .collect()
}

fn gateway_host(api_url: &str) -> &str {
    let rest = api_url.split_once("://").map_or(api_url, |(_, rest)| rest);
    rest.split(['/', '?']).next().unwrap_or(rest)
}

pub struct CloudClient<T = HttpTransport> {
    access_key: String,
    secret_key: String,
    api_url: String,
    base_urls: Vec<String>,
    timeout: Duration,
    transport: T,
}

impl CloudClient<HttpTransport> {
    pub fn from_credentials(credentials: &Credentials, api: &ApiConfig) -> anyhow::Result<Self> {
        Ok(Self::with_transport(credentials, api.request_timeout(), HttpTransport::new()?))
    }
}

impl<T: Transport> CloudClient<T> {
    pub fn with_transport(credentials: &Credentials, timeout: Duration, transport: T) -> Self {
        Self {
            access_key: credentials.access_key.clone(),
            secret_key: credentials.secret_key.clone(),
            api_url: credentials.api_url.clone(),
            base_urls: resolve_base_urls(&credentials.api_url),
            timeout,
            transport,
        }
    }

    /// Replace the resolved regional endpoints.
    pub fn with_base_urls(mut self, base_urls: Vec<String>) -> Self {
        self.base_urls = base_urls;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn base_urls(&self) -> &[String] {
        &self.base_urls
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Query every regional endpoint concurrently. Fails only when no endpoint answered;
    /// otherwise the listing carries one failure per endpoint that did not.
    pub async fn list_clusters(&self) -> Result<ClusterListing, NksError> {
        let results = join_all(self.base_urls.iter().map(|base| self.list_from_endpoint(base))).await;

        let mut listing = ClusterListing::default();
        let mut answered = 0usize;
        for (base, result) in self.base_urls.iter().zip(results) {
            match result {
                Ok(clusters) => {
                    answered += 1;
                    listing.clusters.extend(clusters);
                }
                Err(reason) => {
                    tracing::warn!(endpoint = %base, %reason, "cluster listing failed");
                    listing.failures.push(EndpointFailure { endpoint: base.clone(), reason });
                }
            }
        }

        if answered == 0 && !listing.failures.is_empty() {
            return Err(NksError::AllEndpointsFailed(listing.failures));
        }

        tracing::debug!(clusters = listing.clusters.len(), failed = listing.failures.len(), "listed clusters");
        Ok(listing)
    }

    async fn list_from_endpoint(&self, base: &str) -> Result<Vec<Cluster>, String> {
        let url = format!("{base}/clusters");
        let timestamp_ms = jiff::Timestamp::now().as_millisecond();
        let headers = signer::auth_headers("GET", &url, timestamp_ms, &self.access_key, &self.secret_key);

        tracing::debug!(%url, "GET");
        let response = self.transport.get(&url, &headers, self.timeout).await.map_err(|e| format!("{e:#}"))?;

        if response.status != 200 {
            return Err(format!("API request failed (status {}): {}", response.status, response.body));
        }

        let parsed: ClusterListResponse = serde_json::from_str(&response.body)
            .map_err(|e| format!("failed to parse response: {e} (body: {})", response.body))?;

        Ok(parsed.clusters.into_iter().map(Cluster::from).collect())
    }
}
