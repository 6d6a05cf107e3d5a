use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::rate_limiter::RateLimiter;

/// HTTP client with built-in rate limiting and bearer authentication
pub struct RateLimitedClient {
    client: Client,
    rate_limiter: RateLimiter,
    token: String,
}

impl RateLimitedClient {
    pub fn new(
        user_agent: &str,
        timeout_secs: u64,
        rate_limit_ms: u64,
        token: String,
    ) -> Result<Self> {
        let client = Self::build_client(user_agent, timeout_secs)?;
        let rate_limiter = RateLimiter::new(rate_limit_ms);

        Ok(Self {
            client,
            rate_limiter,
            token,
        })
    }

    /// POST a JSON body and decode a JSON response
    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        self.rate_limiter.wait().await;
        let response = self.send_post_request(url, body).await?;

        if !response.status().is_success() {
            anyhow::bail!("API returned status: {}", response.status());
        }

        response
            .json()
            .await
            .context("Failed to decode API response body")
    }

    fn build_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
        Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")
    }

    async fn send_post_request<B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<reqwest::Response> {
        self.client
            .post(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .context("Failed to send POST request")
    }
}
