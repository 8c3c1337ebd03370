use crate::domain::ports::StatusChecker;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// GitHub rejects API requests without a User-Agent.
const USER_AGENT: &str = concat!("golden-step/", env!("CARGO_PKG_VERSION"));

/// Checks that a repository API URL answers `200 OK`.
#[derive(Debug, Clone)]
pub struct RepoStatusChecker {
    client: Client,
    url: String,
}

impl RepoStatusChecker {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl StatusChecker for RepoStatusChecker {
    async fn check(&self) -> bool {
        tracing::debug!("Checking repository status at: {}", self.url);
        match self.client.get(&self.url).send().await {
            Ok(response) => {
                let ok = response.status() == StatusCode::OK;
                tracing::info!("Repository accessible: {} ({})", ok, response.status());
                ok
            }
            Err(e) => {
                tracing::error!("Failed to access repo: {}", e);
                false
            }
        }
    }
}

/// Stand-in used when the repository check is disabled in config.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkippedStatusCheck;

#[async_trait]
impl StatusChecker for SkippedStatusCheck {
    async fn check(&self) -> bool {
        tracing::info!("Repository check disabled; reporting unreachable");
        false
    }
}
