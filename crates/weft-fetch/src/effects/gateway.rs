use std::sync::Arc;

use bytes::Bytes;
use futures_util::TryStreamExt;
use tracing::info;

use crate::config::GatewayConfig;
use crate::data::{NodeInfo, RetryOptions};
use crate::effects::cache::ListingCache;
use crate::effects::chunks::{ChunkReconstructor, GatewayChunkSource};
use crate::effects::discovery::PeerDiscovery;
use crate::effects::fetcher::RetryingFetcher;
use crate::effects::http::{BoxStream, HttpClient, get_json};
use crate::effects::registry::NodeRegistry;
use crate::effects::stream::decode_base64url_stream;
use crate::error::{Error, Result};

/// The gateway API over an adaptive, self-extending node set.
///
/// Owns the registry and the one-shot discovery state, so independent
/// instances never share feedback or discovery.
pub struct Gateway<C: HttpClient> {
    client:    Arc<C>,
    registry:  NodeRegistry,
    discovery: Arc<PeerDiscovery<C>>,
    fetcher:   RetryingFetcher,
    hash_list: ListingCache,
}

impl<C: HttpClient + 'static> Gateway<C> {
    pub fn new(client: C, config: &GatewayConfig) -> Self {
        let client = Arc::new(client);
        let registry = NodeRegistry::new(config.nodes.iter().cloned());
        let discovery = Arc::new(PeerDiscovery::new(
            Arc::clone(&client),
            registry.clone(),
            config.bootstrap_url.as_str(),
        ));

        let mut fetcher = RetryingFetcher::new(registry.clone());
        if config.discovery {
            let discovery = Arc::clone(&discovery);
            fetcher = fetcher.before_select(Arc::new(move || {
                discovery.discover_once();
            }));
        }

        Self {
            client,
            registry,
            discovery,
            fetcher,
            hash_list: ListingCache::hash_list(&config.cache_dir),
        }
    }

    pub fn registry(&self) -> &NodeRegistry { &self.registry }

    pub fn discovery(&self) -> &PeerDiscovery<C> { &self.discovery }

    pub fn fetcher(&self) -> &RetryingFetcher { &self.fetcher }

    /// Status of some node, via `GET <node>/info`.
    pub async fn info(&self, options: &RetryOptions) -> Result<NodeInfo> {
        let client = &*self.client;
        self.fetcher
            .fetch(options, |endpoint| async move {
                get_json::<C, NodeInfo>(client, &format!("{endpoint}/info")).await
            })
            .await
    }

    /// The full hash listing, newest first.
    ///
    /// Served from the cache artifact when present, without touching the
    /// network. Otherwise fetched, reversed and persisted before returning.
    pub async fn hash_list(&self) -> Result<Vec<String>> {
        if let Some(list) = self.hash_list.load::<Vec<String>>().await? {
            info!(path = ?self.hash_list.path(), entries = list.len(), "using hash_list from cache");
            return Ok(list);
        }

        info!("fetching the hash_list, this may take a while...");
        let client = &*self.client;
        let mut list = self
            .fetcher
            .fetch(&RetryOptions::default(), |endpoint| async move {
                get_json::<C, Vec<String>>(client, &format!("{endpoint}/hash_list")).await
            })
            .await?;

        list.reverse();
        self.hash_list.store(&list).await?;
        Ok(list)
    }

    /// Raw body of `GET <node>/<id>`.
    pub async fn data(&self, id: &str, options: &RetryOptions) -> Result<Bytes> {
        let client = &*self.client;
        self.fetcher
            .fetch(options, |endpoint| async move {
                let url = format!("{endpoint}/{id}");
                client.get(&url).await.map_err(|e| Error::http(&url, e))
            })
            .await
    }

    /// Streaming body of `GET <node>/<id>`.
    ///
    /// Only opening the stream is retried; errors mid-body end the stream.
    pub async fn data_stream(&self, id: &str, options: &RetryOptions) -> Result<BoxStream<'static, Result<Bytes>>> {
        let client = &*self.client;
        self.fetcher
            .fetch(options, |endpoint| async move {
                let url = format!("{endpoint}/{id}");
                let body = client.stream(&url).await.map_err(|e| Error::http(&url, e))?;
                let body: BoxStream<'static, Result<Bytes>> =
                    Box::pin(body.map_err(move |e| Error::http(&url, e)));
                Ok(body)
            })
            .await
    }

    /// [`data_stream`](Self::data_stream) decoded from base64url on the fly.
    pub async fn decoded_data_stream(
        &self,
        id: &str,
        options: &RetryOptions,
    ) -> Result<BoxStream<'static, Result<Bytes>>> {
        Ok(decode_base64url_stream(self.data_stream(id, options).await?))
    }

    /// Chunk source sharing this gateway's nodes and feedback.
    pub fn chunk_source(&self) -> GatewayChunkSource<C> {
        GatewayChunkSource::new(Arc::clone(&self.client), self.fetcher.clone())
    }

    /// Reconstruct a payload too large for a single request from its chunks.
    ///
    /// `options` governs every offset and chunk request.
    pub async fn data_from_chunks(&self, id: &str, options: &RetryOptions) -> Result<Bytes> {
        ChunkReconstructor::new(self.chunk_source().with_options(options.clone()))
            .reconstruct(id)
            .await
    }
}
