use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;
use thiserror::Error;

use crate::{Answer, Question, TemperatureReading};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Error: {0}")]
    Status(u16),

    /// The relay answered 2xx but the body carried an `error` field.
    #[error("{0}")]
    Upstream(String),

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// What the controller needs from the relay.
#[async_trait]
pub trait RelayApi: Send + Sync + Debug {
    async fn temperature(&self) -> Result<TemperatureReading, ClientError>;

    async fn ask(&self, question: &str) -> Result<String, ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpRelayClient {
    base_url: String,
    http: Client,
}

impl HttpRelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }
}

async fn success_body(res: reqwest::Response) -> Result<String, ClientError> {
    let status = res.status();
    if !status.is_success() {
        return Err(ClientError::Status(status.as_u16()));
    }
    Ok(res.text().await?)
}

#[async_trait]
impl RelayApi for HttpRelayClient {
    async fn temperature(&self) -> Result<TemperatureReading, ClientError> {
        let res = self.http.get(self.url("temperature")).send().await?;
        let body = success_body(res).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn ask(&self, question: &str) -> Result<String, ClientError> {
        let res = self
            .http
            .post(self.url("ask"))
            .json(&Question::new(question))
            .send()
            .await?;
        let body = success_body(res).await?;

        let answer: Answer = serde_json::from_str(&body)?;
        answer.into_result().map_err(ClientError::Upstream)
    }
}
