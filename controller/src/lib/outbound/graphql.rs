use crate::domain::lifecycle::models::error::{GraphQlErrorEntry, TransportError};
use crate::domain::lifecycle::models::request::GraphQlRequest;
use crate::domain::lifecycle::ports::GraphQlTransport;
use log::{debug, error};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.railway.app/graphql";

/// Fixed at construction; a transport never changes its configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportConfig {
    pub endpoint: Url,
    pub token: Option<String>,
    pub timeout: Option<Duration>,
}

#[derive(Deserialize, Debug)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphQlErrorEntry>>,
}

/// GraphQL over HTTP POST.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(TransportError::Build)?;
        if config.token.is_none() {
            debug!("no api token configured, requests are sent unauthenticated");
        }
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn send(&self, request: &GraphQlRequest) -> Result<Value, TransportError> {
        let mut builder = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        let response: GraphQlResponse = serde_json::from_slice(&body)?;
        // `"errors": null` and `[]` both mean no errors
        if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
            return Err(TransportError::GraphQl(errors));
        }
        Ok(response.data.unwrap_or(Value::Null))
    }
}

/// Records the failure without swallowing it.
fn log_failure(err: &TransportError) {
    match err {
        TransportError::GraphQl(errors) => {
            for e in errors {
                error!(
                    "[GraphQL error]: Message: {}, Location: {}, Path: {}",
                    e.message,
                    e.location_text(),
                    e.path_text()
                );
            }
        }
        other => error!("[Network error]: {other}"),
    }
}

impl GraphQlTransport for HttpTransport {
    async fn execute(&self, request: &GraphQlRequest) -> Result<Value, TransportError> {
        self.send(request).await.inspect_err(log_failure)
    }
}
