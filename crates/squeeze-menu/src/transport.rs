//! Remote command transport.
//!
//! The dispatcher only needs "send this and tell me when you're done".  The
//! HTTP implementation posts one JSON-RPC request per command and ignores
//! the reply body.

use std::future::Future;

use reqwest::StatusCode;
use squeeze_proto::config::ServerConfig;
use squeeze_proto::protocol::RemoteCommand;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered {0}")]
    Status(StatusCode),
}

pub trait Transport: Send + Sync + 'static {
    fn send(
        &self,
        command: &RemoteCommand,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// Posts commands to `<base_url>/jsonrpc.js`.
#[derive(Debug, Clone)]
pub struct JsonRpcTransport {
    client: reqwest::Client,
    url: String,
}

impl JsonRpcTransport {
    pub fn new(server: &ServerConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(server.request_timeout())
            .build()?;
        Ok(Self {
            client,
            url: server.jsonrpc_url(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Transport for JsonRpcTransport {
    fn send(
        &self,
        command: &RemoteCommand,
    ) -> impl Future<Output = Result<(), TransportError>> + Send {
        let request = self
            .client
            .post(&self.url)
            .json(&command.to_request());
        let summary = command.to_string();

        async move {
            debug!("POST jsonrpc: {}", summary);
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(TransportError::Status(status));
            }
            Ok(())
        }
    }
}
