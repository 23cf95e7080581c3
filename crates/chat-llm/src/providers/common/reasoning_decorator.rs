use async_trait::async_trait;
use chat_core::ChatMessage;
use futures_util::StreamExt;
use serde_json::Value;

use crate::provider::{LLMProvider, LLMStream, Result};
use crate::structured::ObjectRequest;
use crate::types::LLMChunk;

/// Decorates an [`LLMProvider`] whose models inline their reasoning as
/// `<tag>...</tag>` inside the answer text.
///
/// Text inside the tag is re-emitted as [`LLMChunk::Reasoning`], everything
/// else stays [`LLMChunk::Token`].
pub struct ReasoningTagDecorator<P: LLMProvider> {
    inner: P,
    tag: String,
}

impl<P: LLMProvider> ReasoningTagDecorator<P> {
    pub fn new(inner: P, tag: impl Into<String>) -> Self {
        Self {
            inner,
            tag: tag.into(),
        }
    }
}

#[async_trait]
impl<P: LLMProvider> LLMProvider for ReasoningTagDecorator<P> {
    async fn chat_stream(
        &self,
        messages: &[ChatMessage],
        max_output_tokens: Option<u32>,
        model: Option<&str>,
    ) -> Result<LLMStream> {
        let mut inner = self
            .inner
            .chat_stream(messages, max_output_tokens, model)
            .await?;
        let mut splitter = TagSplitter::new(&self.tag);

        let stream = async_stream::stream! {
            while let Some(chunk) = inner.next().await {
                match chunk {
                    Ok(LLMChunk::Token(text)) => {
                        for out in splitter.push(&text) {
                            yield Ok(out);
                        }
                    }
                    Ok(LLMChunk::Done) => {
                        for out in splitter.finish() {
                            yield Ok(out);
                        }
                        yield Ok(LLMChunk::Done);
                    }
                    Ok(other) => {
                        yield Ok(other);
                    }
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }
            for out in splitter.finish() {
                yield Ok(out);
            }
        };

        Ok(Box::pin(stream))
    }

    async fn generate_object(&self, request: &ObjectRequest, model: Option<&str>) -> Result<Value> {
        self.inner.generate_object(request, model).await
    }
}

/// Incremental splitter for `<tag>` / `</tag>` delimited text. Delimiters may
/// arrive split across chunks; a possible partial delimiter is held back until
/// the next push.
#[derive(Debug)]
pub(crate) struct TagSplitter {
    open: String,
    close: String,
    inside: bool,
    pending: String,
}

impl TagSplitter {
    pub(crate) fn new(tag: &str) -> Self {
        Self {
            open: format!("<{tag}>"),
            close: format!("</{tag}>"),
            inside: false,
            pending: String::new(),
        }
    }

    pub(crate) fn push(&mut self, text: &str) -> Vec<LLMChunk> {
        let mut buffer = std::mem::take(&mut self.pending);
        buffer.push_str(text);

        let mut out = Vec::new();
        loop {
            let delimiter = if self.inside { &self.close } else { &self.open };
            match buffer.find(delimiter.as_str()) {
                Some(index) => {
                    let rest = buffer.split_off(index + delimiter.len());
                    buffer.truncate(index);
                    self.emit(&mut out, buffer);
                    self.inside = !self.inside;
                    buffer = rest;
                }
                None => {
                    let held = partial_suffix_len(&buffer, delimiter);
                    self.pending = buffer.split_off(buffer.len() - held);
                    self.emit(&mut out, buffer);
                    return out;
                }
            }
        }
    }

    pub(crate) fn finish(&mut self) -> Vec<LLMChunk> {
        let mut out = Vec::new();
        let pending = std::mem::take(&mut self.pending);
        self.emit(&mut out, pending);
        out
    }

    fn emit(&self, out: &mut Vec<LLMChunk>, text: String) {
        if text.is_empty() {
            return;
        }
        out.push(if self.inside {
            LLMChunk::Reasoning(text)
        } else {
            LLMChunk::Token(text)
        });
    }
}

/// Length of the longest suffix of `text` that is a proper prefix of `delimiter`.
fn partial_suffix_len(text: &str, delimiter: &str) -> usize {
    (1..delimiter.len())
        .rev()
        .find(|&k| text.ends_with(&delimiter[..k]))
        .unwrap_or(0)
}
