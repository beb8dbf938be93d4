//! Stream adapters over response bodies.

use bytes::Bytes;
use futures_util::{Stream, StreamExt, TryStreamExt, future, stream};

use crate::core::Base64UrlDecoder;
use crate::effects::http::BoxStream;
use crate::error::Result;

/// Decode a base64url body as it streams in.
///
/// Each upstream chunk is decoded as soon as it arrives; only the up to three
/// characters that do not complete a group are carried to the next one. The
/// carried tail is flushed when the upstream ends. The first error ends the
/// stream.
pub fn decode_base64url_stream<S>(body: S) -> BoxStream<'static, Result<Bytes>>
where
    S: Stream<Item = Result<Bytes>> + Send + 'static,
{
    let state = Some((Box::pin(body), Base64UrlDecoder::new()));

    let decoded = stream::unfold(state, |state| async move {
        let (mut body, mut decoder) = state?;
        match body.next().await {
            Some(Ok(chunk)) => match decoder.decode_chunk(&chunk) {
                Ok(out) => Some((Ok(Bytes::from(out)), Some((body, decoder)))),
                Err(e) => Some((Err(e), None)),
            },
            Some(Err(e)) => Some((Err(e), None)),
            None => Some((decoder.finish().map(Bytes::from), None)),
        }
    });

    Box::pin(decoded.try_filter(|bytes| future::ready(!bytes.is_empty())))
}
