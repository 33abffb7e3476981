use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::protocol::DebateEvent;

/// Display name given to informational and producer-error entries.
pub const SYSTEM_DISPLAY_NAME: &str = "系统";
/// Display name given to the synthetic message holding the user's query.
pub const USER_DISPLAY_NAME: &str = "你";

/// Who produced a transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The user's own submitted query, recorded before the stream starts.
    User,
    System,
    /// A debate agent, tagged with the producer's agent kind.
    Agent(String),
}

/// Rendering affordance only: system entries and agent turns are styled
/// apart by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    System,
    Agent,
}

/// One transcript entry.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: u64,
    pub speaker: Speaker,
    pub display_name: String,
    pub text: String,
    pub complete: bool,
    pub category: Category,
    pub created_at: DateTime<Utc>,
}

/// Ordered, append-only record of one debate session.
///
/// At most one message is open at a time. The open slot is tracked
/// explicitly, never recovered by scanning the message list.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    active: Option<usize>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Clone of the current messages, for handing across a channel.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    /// Record the user's query ahead of the stream, so the question
    /// precedes every answer.
    pub fn record_user_query(&mut self, text: &str) {
        self.push(
            Speaker::User,
            USER_DISPLAY_NAME,
            text.to_string(),
            true,
            Category::Agent,
        );
    }

    /// Apply one event. `Token` and `AgentDone` with no open message are
    /// no-ops that leave the transcript untouched.
    pub fn apply(&mut self, event: DebateEvent) {
        match event {
            DebateEvent::System { text } => {
                self.push(Speaker::System, SYSTEM_DISPLAY_NAME, text, true, Category::System);
            }
            DebateEvent::AgentStart { agent, name } => {
                // An unfinished previous turn stays open-ended; only the
                // slot moves to the new turn.
                let index = self.push(
                    Speaker::Agent(agent),
                    name,
                    String::new(),
                    false,
                    Category::Agent,
                );
                self.active = Some(index);
            }
            DebateEvent::Token { text } => match self.active {
                Some(index) => self.messages[index].text.push_str(&text),
                None => debug!("token with no open message dropped"),
            },
            DebateEvent::AgentDone => match self.active.take() {
                Some(index) => self.messages[index].complete = true,
                None => debug!("agent_done with no open message dropped"),
            },
            DebateEvent::Error { text } => {
                self.push(Speaker::System, SYSTEM_DISPLAY_NAME, text, true, Category::System);
            }
        }
    }

    fn push(
        &mut self,
        speaker: Speaker,
        display_name: impl Into<String>,
        text: String,
        complete: bool,
        category: Category,
    ) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(Message {
            id,
            speaker,
            display_name: display_name.into(),
            text,
            complete,
            category,
            created_at: Utc::now(),
        });
        self.messages.len() - 1
    }
}
