/// One unit of a streamed completion.
#[derive(Debug, Clone, PartialEq)]
pub enum LLMChunk {
    /// Visible answer text.
    Token(String),
    /// Model reasoning, shown separately from the answer.
    Reasoning(String),
    Done,
}
