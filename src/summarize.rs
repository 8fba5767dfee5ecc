use crate::error::ApiError;
use crate::ingest::split_into_chunks;
use crate::llm::{ChatCompletion, Message};

/// Instruction sent as the system message for every request
pub fn instruction(reading_level: &str) -> String {
    format!(
        "Summarize the input text below. Limit the summary to 1 paragraph, \
         write it in English even if the input is in another language, \
         and use a {} reading level.",
        reading_level.trim()
    )
}

pub fn build_messages(reading_level: &str, text: &str) -> Vec<Message> {
    vec![Message::system(instruction(reading_level)), Message::user(text)]
}

#[derive(Debug, Clone)]
pub struct SummaryOptions {
    pub reading_level: String,
    /// Inputs longer than this are summarized chunk by chunk; 0 disables chunking
    pub max_chunk_chars: usize,
}

pub struct Summarizer<'a, C> {
    client: &'a C,
    options: SummaryOptions,
}

impl<'a, C: ChatCompletion> Summarizer<'a, C> {
    pub fn new(client: &'a C, options: SummaryOptions) -> Self {
        Self { client, options }
    }

    /// Summarize a document into one paragraph.
    ///
    /// Text within the chunk limit goes out as a single request. Longer text
    /// is summarized per chunk and the joined partial summaries go through
    /// the same path again until they fit. If a round of partial summaries
    /// is no shorter than its input, it is summarized once as is.
    pub async fn summarize(&self, text: &str) -> Result<String, ApiError> {
        let limit = self.options.max_chunk_chars;
        if limit == 0 || text.len() <= limit {
            return self.summarize_once(text).await;
        }

        let chunks = split_into_chunks(text, limit);
        if chunks.len() <= 1 {
            let chunk = chunks.first().map_or(text, String::as_str);
            return self.summarize_once(chunk).await;
        }
        tracing::info!(
            chunks = chunks.len(),
            limit,
            "document exceeds chunk limit, summarizing in parts"
        );

        let mut partials = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            tracing::debug!(
                chunk = i + 1,
                of = chunks.len(),
                bytes = chunk.len(),
                "summarizing chunk"
            );
            partials.push(self.summarize_once(chunk).await?);
        }

        let joined = partials.join(" ");
        if joined.len() >= text.len() {
            tracing::warn!(
                bytes = joined.len(),
                limit,
                "partial summaries did not shrink, summarizing them in one request"
            );
            return self.summarize_once(&joined).await;
        }
        Box::pin(self.summarize(&joined)).await
    }

    async fn summarize_once(&self, text: &str) -> Result<String, ApiError> {
        let messages = build_messages(&self.options.reading_level, text);
        self.client.complete(&messages).await
    }
}
