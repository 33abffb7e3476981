use crate::transcript::Message;

/// Lifecycle updates emitted while a debate session runs, for UI streaming.
///
/// `Ended` and `Failed` are terminal; exactly one of them arrives per
/// session, after which the channel closes. An abandoned session closes the
/// channel without a terminal update.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Started,
    Snapshot { messages: Vec<Message> },
    Ended,
    Failed { message: String },
}
