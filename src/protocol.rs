use serde_json::Value;
use tracing::debug;

/// One parsed instruction from the debate stream, keyed by the producer's
/// `event` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebateEvent {
    /// Informational entry, complete on arrival.
    System { text: String },
    /// A named speaker opens a new in-progress message.
    AgentStart { agent: String, name: String },
    /// Text appended to whichever message is currently open.
    Token { text: String },
    /// The open message is finished.
    AgentDone,
    /// Producer-side failure, surfaced as a system entry.
    Error { text: String },
}

const UNKNOWN_ERROR: &str = "unknown error";

/// Decode one frame payload into an event.
///
/// Malformed JSON and unrecognized kinds are dropped here; a bad frame
/// never ends the stream. Absent fields read as empty strings.
pub fn parse_frame(payload: &str) -> Option<DebateEvent> {
    let value: Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "dropping malformed frame");
            return None;
        }
    };

    let field = |name: &str| value[name].as_str().unwrap_or("").to_string();

    match value["event"].as_str() {
        Some("system") => Some(DebateEvent::System { text: field("text") }),
        Some("agent_start") => Some(DebateEvent::AgentStart {
            agent: field("agent"),
            name: field("name"),
        }),
        Some("token") => Some(DebateEvent::Token { text: field("text") }),
        Some("agent_done") => Some(DebateEvent::AgentDone),
        Some("error") => {
            let text = field("text");
            Some(DebateEvent::Error {
                text: if text.is_empty() {
                    UNKNOWN_ERROR.to_string()
                } else {
                    text
                },
            })
        }
        other => {
            debug!(kind = ?other, "ignoring unrecognized event kind");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_event_kind() {
        assert_eq!(
            parse_frame(r#"{"event": "system", "text": "剧本围读会议开始"}"#),
            Some(DebateEvent::System {
                text: "剧本围读会议开始".into()
            })
        );
        assert_eq!(
            parse_frame(r#"{"event": "agent_start", "agent": "villain", "name": "反派主脑"}"#),
            Some(DebateEvent::AgentStart {
                agent: "villain".into(),
                name: "反派主脑".into()
            })
        );
        assert_eq!(
            parse_frame(r#"{"event": "token", "agent": "villain", "text": "你"}"#),
            Some(DebateEvent::Token { text: "你".into() })
        );
        assert_eq!(
            parse_frame(r#"{"event": "agent_done", "agent": "villain"}"#),
            Some(DebateEvent::AgentDone)
        );
        assert_eq!(
            parse_frame(r#"{"event": "error", "agent": "system", "text": "模型服务未初始化"}"#),
            Some(DebateEvent::Error {
                text: "模型服务未初始化".into()
            })
        );
    }

    #[test]
    fn malformed_json_is_dropped() {
        assert_eq!(parse_frame("not json"), None);
        assert_eq!(parse_frame(r#"{"event": "token""#), None);
        assert_eq!(parse_frame(""), None);
    }

    #[test]
    fn unrecognized_or_missing_kind_is_ignored() {
        assert_eq!(parse_frame(r#"{"event": "heartbeat"}"#), None);
        assert_eq!(parse_frame(r#"{"text": "no discriminant"}"#), None);
        assert_eq!(parse_frame(r#"{"event": 42}"#), None);
        assert_eq!(parse_frame("[1, 2, 3]"), None);
    }

    #[test]
    fn absent_fields_default_to_empty() {
        assert_eq!(
            parse_frame(r#"{"event": "token"}"#),
            Some(DebateEvent::Token { text: "".into() })
        );
        assert_eq!(
            parse_frame(r#"{"event": "agent_start"}"#),
            Some(DebateEvent::AgentStart {
                agent: "".into(),
                name: "".into()
            })
        );
    }

    #[test]
    fn error_without_text_gets_generic_message() {
        assert_eq!(
            parse_frame(r#"{"event": "error"}"#),
            Some(DebateEvent::Error {
                text: "unknown error".into()
            })
        );
        assert_eq!(
            parse_frame(r#"{"event": "error", "text": ""}"#),
            Some(DebateEvent::Error {
                text: "unknown error".into()
            })
        );
    }
}
