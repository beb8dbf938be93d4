//! Reassembly of payloads served as sequential, offset-addressed chunks.

use std::future::Future;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use serde::Deserialize;
use tracing::{trace, warn};

use crate::core::Base64UrlDecoder;
use crate::data::{ChunkRange, ChunkRecord, RetryOptions};
use crate::effects::fetcher::RetryingFetcher;
use crate::effects::http::{HttpClient, get_json};
use crate::error::{Error, Result};

/// Upper bound on the buffer reserved up front from an advertised payload size.
const MAX_PREALLOC: usize = 64 * 1024 * 1024;

/// Offset resolution and chunk retrieval for one storage network.
pub trait ChunkSource: Send + Sync {
    /// Byte span of the payload identified by `id`.
    fn resolve_offsets(&self, id: &str) -> impl Future<Output = Result<ChunkRange>> + Send;

    /// The chunk starting at the absolute `offset`.
    fn fetch_chunk(&self, offset: u64) -> impl Future<Output = Result<ChunkRecord>> + Send;
}

/// Assembles a whole payload from a [`ChunkSource`].
///
/// Chunks are fetched strictly in sequence because each offset depends on the
/// advertised length of every chunk before it.
pub struct ChunkReconstructor<S> {
    source: S,
}

impl<S: ChunkSource> ChunkReconstructor<S> {
    pub fn new(source: S) -> Self { Self { source } }

    pub fn source(&self) -> &S { &self.source }

    /// Reconstruct the payload, starting over once if anything fails.
    ///
    /// A second failure is returned as [`Error::ChunkReconstruction`].
    pub async fn reconstruct(&self, id: &str) -> Result<Bytes> {
        match self.assemble(id).await {
            Ok(payload) => Ok(payload),
            Err(first) => {
                warn!(
                    id,
                    error = %first,
                    "error retrieving data from chunks, this may be a cancelled transaction, retrying"
                );
                self.assemble(id)
                    .await
                    .map_err(|source| Error::ChunkReconstruction {
                        id:     id.to_string(),
                        source: Box::new(source),
                    })
            }
        }
    }

    async fn assemble(&self, id: &str) -> Result<Bytes> {
        let range = self.source.resolve_offsets(id).await?;
        let total = range.len().ok_or_else(|| {
            Error::ChunkProtocol(format!(
                "inverted offset range {}..{} for {id}",
                range.start_offset, range.end_offset
            ))
        })?;

        let capacity = usize::try_from(total).unwrap_or(MAX_PREALLOC).min(MAX_PREALLOC);
        let mut payload = BytesMut::with_capacity(capacity);
        let mut bytes_so_far = 0u64;

        while bytes_so_far < total {
            // start + bytes_so_far < end, so this cannot overflow
            let offset = range.start_offset + bytes_so_far;
            let chunk = self.source.fetch_chunk(offset).await?;
            if chunk.parsed_length == 0 {
                return Err(Error::ChunkProtocol(format!("zero-length chunk at offset {offset}")));
            }

            bytes_so_far = bytes_so_far
                .checked_add(chunk.parsed_length)
                .filter(|&advanced| advanced <= total)
                .ok_or_else(|| {
                    Error::ChunkProtocol(format!(
                        "chunk at offset {offset} of length {} overruns end offset {}",
                        chunk.parsed_length, range.end_offset
                    ))
                })?;
            payload.extend_from_slice(&chunk.raw_bytes);
            trace!(id, offset, bytes_so_far, total, "fetched chunk");
        }

        Ok(payload.freeze())
    }
}

/// Gateways report offsets as decimal strings; accept plain numbers too.
#[derive(Deserialize)]
#[serde(untagged)]
enum Decimal {
    Text(String),
    Number(u64),
}

impl Decimal {
    fn value(&self, field: &str) -> Result<u64> {
        match self {
            Decimal::Number(n) => Ok(*n),
            Decimal::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| Error::ChunkProtocol(format!("{field} is not a decimal: {s:?}"))),
        }
    }
}

#[derive(Deserialize)]
struct TxOffset {
    size:   Decimal,
    offset: Decimal,
}

#[derive(Deserialize)]
struct ChunkBody {
    chunk: String,
}

/// [`ChunkSource`] backed by the gateway HTTP API.
///
/// - `GET <node>/tx/<id>/offset` returns the size and the offset of the last
///   byte of the payload
/// - `GET <node>/chunk/<offset>` returns the chunk as base64url
///
/// Both go through the [`RetryingFetcher`], so unhealthy nodes are penalized.
pub struct GatewayChunkSource<C: HttpClient> {
    client:  Arc<C>,
    fetcher: RetryingFetcher,
    options: RetryOptions,
}

impl<C: HttpClient> GatewayChunkSource<C> {
    pub fn new(client: Arc<C>, fetcher: RetryingFetcher) -> Self {
        Self {
            client,
            fetcher,
            options: RetryOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: RetryOptions) -> Self {
        self.options = options;
        self
    }
}

impl<C: HttpClient> ChunkSource for GatewayChunkSource<C> {
    async fn resolve_offsets(&self, id: &str) -> Result<ChunkRange> {
        let client = &*self.client;
        let body: TxOffset = self
            .fetcher
            .fetch(&self.options, |endpoint| async move {
                get_json::<C, TxOffset>(client, &format!("{endpoint}/tx/{id}/offset")).await
            })
            .await?;

        let size = body.size.value("size")?;
        let end_offset = body
            .offset
            .value("offset")?
            .checked_add(1)
            .ok_or_else(|| Error::ChunkProtocol("offset overflows".into()))?;
        let start_offset = end_offset
            .checked_sub(size)
            .ok_or_else(|| Error::ChunkProtocol(format!("size {size} exceeds end offset {end_offset}")))?;

        Ok(ChunkRange::new(start_offset, end_offset))
    }

    async fn fetch_chunk(&self, offset: u64) -> Result<ChunkRecord> {
        let client = &*self.client;
        self.fetcher
            .fetch(&self.options, |endpoint| async move {
                let url = format!("{endpoint}/chunk/{offset}");
                let body = get_json::<C, ChunkBody>(client, &url).await?;
                let raw = Base64UrlDecoder::decode_all(body.chunk.as_bytes())?;
                Ok(ChunkRecord::from_bytes(raw))
            })
            .await
    }
}
