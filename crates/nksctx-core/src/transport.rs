use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Issues a single GET. Implemented over reqwest for real use and faked in tests.
pub trait Transport: Send + Sync {
    fn get(
        &self,
        url: &str,
        headers: &[(&'static str, String)],
        timeout: Duration,
    ) -> impl Future<Output = Result<HttpResponse>> + Send;
}

#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder().build().context("failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str, headers: &[(&'static str, String)], timeout: Duration) -> Result<HttpResponse> {
        let mut request = self.client.get(url).timeout(timeout);
        for (name, value) in headers {
            request = request.header(*name, value);
        }

        let response = request.send().await.context("API request failed")?;
        let status = response.status().as_u16();
        let body = response.text().await.context("failed to read response")?;
        Ok(HttpResponse { status, body })
    }
}
