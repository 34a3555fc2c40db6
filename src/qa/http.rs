//! Remote QA service client.

use super::{QaBackend, QaMetadata, QaVerdict};
use crate::error::PipelineError;
use crate::provider::http::build_backend_http_client;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

/// POSTs `{content, content_type, metadata}` and expects `{isValid, issues}` back.
pub struct HttpQaBackend {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpQaBackend {
    pub fn new(endpoint: String, api_key: Option<String>) -> Result<Self, PipelineError> {
        Ok(Self {
            client: build_backend_http_client()?,
            endpoint,
            api_key,
        })
    }
}

fn request_body(content: &str, content_type: &str, metadata: &QaMetadata) -> serde_json::Value {
    json!({
        "content": content,
        "content_type": content_type,
        "metadata": metadata,
    })
}

#[async_trait]
impl QaBackend for HttpQaBackend {
    async fn validate(
        &self,
        content: &str,
        content_type: &str,
        metadata: &QaMetadata,
    ) -> Result<QaVerdict, PipelineError> {
        let body = request_body(content, content_type, metadata);
        let mut builder = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| PipelineError::QaInfrastructure(format!("QA request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(PipelineError::QaInfrastructure(format!(
                "QA service returned {}: {}",
                status, text
            )));
        }

        let verdict: QaVerdict = response.json().await.map_err(|e| {
            PipelineError::QaInfrastructure(format!("Malformed QA response: {}", e))
        })?;
        Ok(verdict.normalized())
    }

    fn backend_name(&self) -> &str {
        "http"
    }
}
