use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Asynchronous HTTP client abstraction.
///
/// This trait provides the minimal interface the gateway needs. Implementations
/// handle their own redirect following and timeout configuration, and must
/// report non-success statuses as errors so that a misbehaving node is
/// penalized like an unreachable one.
///
/// # Implementations
///
/// - [`ReqwestClient`]: Production implementation using `reqwest`
/// - Mock implementations for testing
pub trait HttpClient: Send + Sync {
    /// Error type for HTTP operations.
    type Error: std::error::Error + Send + 'static;

    /// Fetch the whole response body.
    fn get(&self, url: &str) -> impl Future<Output = std::result::Result<Bytes, Self::Error>> + Send;

    /// Open a streaming HTTP connection and return the response body as a stream.
    fn stream(
        &self,
        url: &str,
    ) -> impl Future<Output = std::result::Result<BoxStream<'static, std::result::Result<Bytes, Self::Error>>, Self::Error>>
           + Send;
}

/// GET `url` and parse the body as JSON.
pub(crate) async fn get_json<C: HttpClient, T: DeserializeOwned>(client: &C, url: &str) -> Result<T> {
    let body = client.get(url).await.map_err(|e| Error::http(url, e))?;
    serde_json::from_slice(&body).map_err(Error::Json)
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;
    use futures_util::StreamExt;

    /// Production HTTP client implementation using reqwest.
    #[derive(Clone, Default)]
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        /// Create a new ReqwestClient with default configuration.
        pub fn new() -> Result<Self> {
            let client = reqwest::Client::builder()
                .user_agent(concat!("weft/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(|e| Error::Config(e.to_string()))?;
            Ok(Self { client })
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn get(&self, url: &str) -> std::result::Result<Bytes, Self::Error> {
            self.client.get(url).send().await?.error_for_status()?.bytes().await
        }

        async fn stream(
            &self,
            url: &str,
        ) -> std::result::Result<BoxStream<'static, std::result::Result<Bytes, Self::Error>>, Self::Error> {
            let response = self.client.get(url).send().await?.error_for_status()?;
            let stream = response.bytes_stream().map(|result| result.map(Bytes::from));

            Ok(Box::pin(stream))
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
