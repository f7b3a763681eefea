use crate::domain::lifecycle::models::error::TransportError;
use crate::domain::lifecycle::models::request::GraphQlRequest;
use crate::domain::lifecycle::ports::GraphQlTransport;
use crate::outbound::graphql::{HttpTransport, TransportConfig};
use log::debug;
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::sync::Arc;

/// How long a transport handle lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportLifetime {
    /// One handle for the whole process, built on first use.
    Persistent,
    /// A fresh handle for every call, for invocations that keep no memory.
    PerCall,
}

/// Hands out configured transport handles according to a [`TransportLifetime`].
#[derive(Clone)]
pub struct TransportBinder {
    config: Arc<TransportConfig>,
    lifetime: TransportLifetime,
    shared: Arc<OnceCell<Arc<HttpTransport>>>,
}

impl TransportBinder {
    pub fn new(config: TransportConfig, lifetime: TransportLifetime) -> Self {
        Self {
            config: Arc::new(config),
            lifetime,
            shared: Arc::default(),
        }
    }

    pub fn lifetime(&self) -> TransportLifetime {
        self.lifetime
    }

    pub fn get_transport(&self) -> Result<Arc<HttpTransport>, TransportError> {
        match self.lifetime {
            TransportLifetime::PerCall => self.build(),
            TransportLifetime::Persistent => self.shared.get_or_try_init(|| self.build()).cloned(),
        }
    }

    fn build(&self) -> Result<Arc<HttpTransport>, TransportError> {
        debug!("building transport for {}", self.config.endpoint);
        HttpTransport::new(&self.config).map(Arc::new)
    }
}

impl GraphQlTransport for TransportBinder {
    async fn execute(&self, request: &GraphQlRequest) -> Result<Value, TransportError> {
        let transport = self.get_transport()?;
        transport.execute(request).await
    }
}
