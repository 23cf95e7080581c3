//! SSE -> [`LLMStream`] adapter.

use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use reqwest::Response;

use crate::provider::{LLMError, LLMStream, Result};
use crate::types::LLMChunk;

fn to_stream_error(err: LLMError) -> LLMError {
    match err {
        LLMError::Stream(msg) => LLMError::Stream(msg),
        other => LLMError::Stream(other.to_string()),
    }
}

/// Convert an SSE HTTP [`Response`] into an [`LLMStream`].
///
/// `handler` receives each event's data payload and returns `Ok(Some(chunk))`
/// to emit, `Ok(None)` to skip, or an error (mapped to `LLMError::Stream`).
/// The stream ends after the first [`LLMChunk::Done`].
pub fn llm_stream_from_sse<H>(response: Response, mut handler: H) -> LLMStream
where
    H: FnMut(&str) -> Result<Option<LLMChunk>> + Send + 'static,
{
    let stream = response
        .bytes_stream()
        .eventsource()
        .map(move |event| {
            let event = event.map_err(|e| LLMError::Stream(e.to_string()))?;
            handler(event.data.as_str()).map_err(to_stream_error)
        })
        .filter_map(|result| async move { result.transpose() })
        .scan(false, |done, item| {
            if *done {
                return futures::future::ready(None);
            }
            *done = matches!(item, Ok(LLMChunk::Done));
            futures::future::ready(Some(item))
        });

    Box::pin(stream)
}
