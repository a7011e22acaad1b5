use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};

use crate::Question;

use super::{UpstreamError, UpstreamReply, UpstreamService};

#[derive(Debug, Clone)]
pub struct HttpUpstream {
    base_url: String,
    http: Client,
}

impl HttpUpstream {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn forward(&self, url: String, req: RequestBuilder) -> Result<UpstreamReply, UpstreamError> {
        let res = req.send().await.map_err(|source| UpstreamError::Transport {
            url: url.clone(),
            source,
        })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| UpstreamError::Transport {
            url: url.clone(),
            source,
        })?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                url,
                status,
                body: truncate_body(&body),
            });
        }

        let body = serde_json::from_str(&body).map_err(|source| UpstreamError::Decode { url, source })?;

        Ok(UpstreamReply { status, body })
    }
}

#[async_trait]
impl UpstreamService for HttpUpstream {
    async fn temperature(&self) -> Result<UpstreamReply, UpstreamError> {
        let url = self.url("temperature");
        let req = self.http.get(&url);
        self.forward(url, req).await
    }

    async fn ask(&self, question: &Question) -> Result<UpstreamReply, UpstreamError> {
        let url = self.url("ask");
        let req = self.http.post(&url).json(question);
        self.forward(url, req).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
