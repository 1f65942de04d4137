//! HTTP probe client with proxy support, request pacing and per-request timeout

use crate::core::rate_limit::RateLimiter;
use crate::http::response::HttpResponse;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, Proxy};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:115.0) Gecko/20100101 Firefox/115.0";

/// Failure to complete an HTTP exchange, as opposed to a successfully
/// classified response. Never aborts a run on its own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("transport failure: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

/// The HTTP capability consumed by tasks, the username enumerator and the
/// wordlist builder. Implemented by [`ProbeClient`] for real traffic and
/// by scripted stand-ins in tests.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError>;

    async fn post_form(
        &self,
        url: &Url,
        fields: &[(String, String)],
    ) -> Result<HttpResponse, TransportError>;
}

pub struct ProbeClient {
    client: Client,
    limiter: RateLimiter,
}

impl ProbeClient {
    /// Redirects stay disabled: login classification needs the raw
    /// `Location` header, and author-archive hits are themselves redirects.
    pub fn new(
        proxy: Option<&str>,
        timeout: Duration,
        limiter: RateLimiter,
    ) -> anyhow::Result<Self> {
        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(true)
            .redirect(Policy::none())
            .timeout(timeout);

        if let Some(proxy) = proxy {
            builder = builder.proxy(Proxy::all(proxy)?);
        }

        Ok(Self {
            client: builder.build()?,
            limiter,
        })
    }

    async fn capture(response: reqwest::Response) -> HttpResponse {
        let status = response.status().as_u16();

        let mut headers: HashMap<String, String> = HashMap::new();
        for (name, value) in response.headers() {
            let name = name.as_str().to_ascii_lowercase();
            let value = value.to_str().unwrap_or("").to_string();
            match headers.get_mut(&name) {
                Some(existing) => {
                    existing.push_str("; ");
                    existing.push_str(&value);
                }
                None => {
                    headers.insert(name, value);
                }
            }
        }

        let body = response.text().await.unwrap_or_default();

        HttpResponse {
            status,
            headers,
            body,
        }
    }
}

#[async_trait]
impl Probe for ProbeClient {
    async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError> {
        self.limiter.wait().await;
        let response = self.client.get(url.clone()).send().await?;
        Ok(Self::capture(response).await)
    }

    async fn post_form(
        &self,
        url: &Url,
        fields: &[(String, String)],
    ) -> Result<HttpResponse, TransportError> {
        self.limiter.wait().await;
        let response = self.client.post(url.clone()).form(fields).send().await?;
        Ok(Self::capture(response).await)
    }
}
