use crate::adapters::loader::CapabilityLoader;
use crate::domain::model::ParsedValue;
use crate::domain::ports::{CapabilityHandle, ParseCapability};
use crate::utils::error::{ParseError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::sync::Arc;

/// Parser behind an HTTP endpoint: the text is POSTed, the JSON body comes back.
#[derive(Debug, Clone)]
pub struct HttpCapability {
    client: Client,
    endpoint: String,
}

impl HttpCapability {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ParseCapability for HttpCapability {
    async fn invoke(&self, text: &str) -> Result<ParsedValue> {
        tracing::debug!("Making parse request to: {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(text.to_string())
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Parse response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ParseError::invocation(format!(
                "{} returned {}: {}",
                self.endpoint,
                status,
                body.trim()
            )));
        }

        let value: serde_json::Value = response.json().await.map_err(|e| {
            ParseError::invocation(format!("{} returned invalid JSON: {}", self.endpoint, e))
        })?;
        Ok(ParsedValue::new(value))
    }
}

/// Loads an [`HttpCapability`] once the endpoint answers at all.
///
/// Any HTTP status counts as up; a parse server typically rejects the GET
/// probe with 405. Only connection failures and timeouts mean "not yet".
#[derive(Debug, Clone)]
pub struct HttpLoader {
    capability: HttpCapability,
}

impl HttpLoader {
    pub fn new(capability: HttpCapability) -> Self {
        Self { capability }
    }
}

#[async_trait]
impl CapabilityLoader for HttpLoader {
    fn describe(&self) -> String {
        format!("endpoint {}", self.capability.endpoint)
    }

    async fn try_load(&self) -> Result<Option<CapabilityHandle>> {
        match self
            .capability
            .client
            .get(&self.capability.endpoint)
            .send()
            .await
        {
            Ok(response) => {
                tracing::debug!("Probe of {} answered {}", self.capability.endpoint, response.status());
                Ok(Some(Arc::new(self.capability.clone())))
            }
            Err(e) if e.is_connect() || e.is_timeout() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
