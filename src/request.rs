use serde::Serialize;
use tokio::sync::mpsc;

use crate::error::DebateError;

/// Body of the single outbound streaming request.
#[derive(Debug, Clone, Serialize)]
pub struct DebateRequest {
    pub project_id: String,
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter_id: Option<String>,
}

impl DebateRequest {
    pub fn new(project_id: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            topic: topic.into(),
            chapter_id: None,
        }
    }

    pub fn with_chapter(mut self, chapter_id: impl Into<String>) -> Self {
        self.chapter_id = Some(chapter_id.into());
        self
    }

    /// Rejects requests that would reach the network with nothing to say.
    pub fn validate(&self) -> Result<(), DebateError> {
        if self.project_id.trim().is_empty() {
            return Err(DebateError::InvalidRequest("missing project id".into()));
        }
        if self.topic.trim().is_empty() {
            return Err(DebateError::InvalidRequest("empty topic".into()));
        }
        Ok(())
    }
}

/// Sends quoted passages from the selection UI to the request builder.
pub type QuoteSender = mpsc::UnboundedSender<String>;
/// Receives quoted passages on the request-builder side.
pub type QuoteReceiver = mpsc::UnboundedReceiver<String>;

/// Hand-off channel for drop-to-quote: whatever region of the UI captured a
/// selection pushes it in, and the request builder drains it when composing
/// the next topic.
pub fn quote_channel() -> (QuoteSender, QuoteReceiver) {
    mpsc::unbounded_channel()
}

/// Drafts the outbound topic from free-form input plus, optionally, a
/// quoted passage handed over from the selection UI.
#[derive(Debug, Clone, Default)]
pub struct TopicDraft {
    pub quoted: Option<String>,
    pub free_text: String,
}

impl TopicDraft {
    pub fn new(free_text: impl Into<String>) -> Self {
        Self {
            quoted: None,
            free_text: free_text.into(),
        }
    }

    pub fn with_quote(mut self, quoted: impl Into<String>) -> Self {
        self.quoted = Some(quoted.into());
        self
    }

    /// Absorb everything queued on the quote channel; the latest snippet
    /// wins.
    pub fn drain_quotes(&mut self, rx: &mut QuoteReceiver) {
        while let Ok(snippet) = rx.try_recv() {
            if !snippet.trim().is_empty() {
                self.quoted = Some(snippet);
            }
        }
    }

    /// True when there is nothing to send: no free text and no quote.
    pub fn is_empty(&self) -> bool {
        self.free_text.trim().is_empty()
            && self.quoted.as_deref().is_none_or(|q| q.trim().is_empty())
    }

    /// The composed topic string the producer receives.
    pub fn compose(&self) -> String {
        match self.quoted.as_deref().map(str::trim) {
            Some(quoted) if !quoted.is_empty() => {
                let free = self.free_text.trim();
                if free.is_empty() {
                    format!("引用：{quoted}")
                } else {
                    format!("引用：{quoted}\n{free}")
                }
            }
            _ => self.free_text.trim().to_string(),
        }
    }
}
