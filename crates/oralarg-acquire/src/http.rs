use crate::retry::{FailureKind, RetryDecision, RetryPolicy};
use anyhow::{Context, Result};
use std::time::Duration;

/// The court's CDN rejects unknown agents, so present as a browser.
pub const USER_AGENT: &str = "Mozilla/5.0";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the HTTP client shared by every fetch in a run.
pub fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")
}

/// GET a page and return its body, retrying transient failures.
pub async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<String> {
    fetch_page_with(client, url, &RetryPolicy::default()).await
}

pub async fn fetch_page_with(
    client: &reqwest::Client,
    url: &str,
    policy: &RetryPolicy,
) -> Result<String> {
    let mut attempt = 1;
    loop {
        let (kind, err) = match client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return response.text().await.context("Failed to read response body");
                }
                (
                    FailureKind::Status(status.as_u16()),
                    anyhow::anyhow!("HTTP {status} for {url}"),
                )
            }
            Err(e) => (classify(&e), anyhow::Error::new(e).context(format!("Failed to fetch {url}"))),
        };

        match policy.decide(attempt, kind) {
            RetryDecision::RetryAfter(delay) => {
                tracing::debug!(url = %url, attempt, ?kind, delay_ms = delay.as_millis() as u64, "Retrying fetch");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            RetryDecision::NoRetry => return Err(err),
        }
    }
}

fn classify(err: &reqwest::Error) -> FailureKind {
    if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_connect() {
        FailureKind::Connection
    } else if let Some(status) = err.status() {
        FailureKind::Status(status.as_u16())
    } else {
        FailureKind::Other
    }
}
