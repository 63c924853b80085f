//! HTTP transport backed by reqwest.

use futures_util::future::BoxFuture;
use futures_util::StreamExt;
use reqwest::Client;
use tracing::debug;

use super::{ByteStream, Transport};
use crate::error::RelayError;
use crate::session::ExecutionContext;
use crate::Result;

/// Posts requests to a single shell endpoint URL and streams the body back.
///
/// No request timeout is configured: a command may legitimately run for as
/// long as the remote side keeps the response open.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    url: String,
}

impl HttpTransport {
    /// Create a transport for the given endpoint URL.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    /// The endpoint URL requests are sent to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Transport for HttpTransport {
    fn post<'a>(
        &'a self,
        context: &'a ExecutionContext,
        body: String,
    ) -> BoxFuture<'a, Result<ByteStream>> {
        Box::pin(async move {
            debug!(url = %self.url, body = %body, "posting shell request");

            let response = self
                .http
                .post(&self.url)
                .query(context.vars())
                .body(body)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                });
                return Err(RelayError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            Ok(response
                .bytes_stream()
                .map(|chunk| chunk.map_err(RelayError::from))
                .boxed())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_url() {
        let transport = HttpTransport::new("http://127.0.0.1:9/~/bin/shell").unwrap();
        assert_eq!(transport.url(), "http://127.0.0.1:9/~/bin/shell");
    }

    #[tokio::test]
    async fn test_connection_refused_is_error() {
        // Port 9 (discard) is essentially never listening on loopback.
        let transport = HttpTransport::new("http://127.0.0.1:9/shell").unwrap();
        let context = ExecutionContext::new();
        let result = transport.post(&context, "[\"init\"]".into()).await;
        assert!(matches!(result, Err(RelayError::Http(_))));
    }
}
