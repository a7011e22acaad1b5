use async_trait::async_trait;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::fmt::Debug;
use thiserror::Error;

use crate::Question;

pub mod http;

pub use http::HttpUpstream;

/// Successful upstream reply, passed back to the browser unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Value,
}

impl IntoResponse for UpstreamReply {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with status {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("{url} returned a body that is not JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The external service that owns the temperature sensor and the LLM.
#[async_trait]
pub trait UpstreamService: Send + Sync + Debug {
    async fn temperature(&self) -> Result<UpstreamReply, UpstreamError>;

    async fn ask(&self, question: &Question) -> Result<UpstreamReply, UpstreamError>;
}
