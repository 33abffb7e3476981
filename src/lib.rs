pub mod decode;
pub mod error;
pub mod events;
pub mod protocol;
pub mod request;
pub mod transcript;
pub mod transport;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub use decode::{frame_payload, LineDecoder};
pub use error::{DebateError, TransportError};
pub use events::SessionEvent;
pub use protocol::{parse_frame, DebateEvent};
pub use request::{quote_channel, DebateRequest, QuoteReceiver, QuoteSender, TopicDraft};
pub use transcript::{Category, Message, Speaker, Transcript};
pub use transport::{ByteStream, DebateTransport, HttpTransport};

/// The session controller. Wire up a transport and drive one end-to-end
/// exchange per call: request out, events in, transcript built as they land.
pub struct DebateClient {
    transport: Box<dyn DebateTransport>,
}

impl DebateClient {
    pub fn new(transport: impl DebateTransport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
        }
    }

    /// Run a session to its terminal outcome and return the final transcript.
    pub async fn run(&self, request: DebateRequest) -> Result<Transcript, DebateError> {
        self.drive(request, None, None).await
    }

    /// Run a session with live updates streamed to `tx`.
    pub async fn run_streaming(
        &self,
        request: DebateRequest,
        tx: mpsc::Sender<SessionEvent>,
    ) -> Result<Transcript, DebateError> {
        self.drive(request, Some(tx), None).await
    }

    /// Run a session the caller may abandon. Once `cancel` fires, no
    /// further updates are forwarded, even if the transport has not yet
    /// noticed.
    pub async fn run_cancellable(
        &self,
        request: DebateRequest,
        tx: mpsc::Sender<SessionEvent>,
        cancel: CancellationToken,
    ) -> Result<Transcript, DebateError> {
        self.drive(request, Some(tx), Some(cancel)).await
    }

    async fn drive(
        &self,
        request: DebateRequest,
        tx: Option<mpsc::Sender<SessionEvent>>,
        cancel: Option<CancellationToken>,
    ) -> Result<Transcript, DebateError> {
        request.validate()?;

        let mut transcript = Transcript::new();
        transcript.record_user_query(&request.topic);

        info!(project_id = %request.project_id, "starting debate session");

        let result = self
            .pump(&request, &mut transcript, tx.as_ref(), cancel.as_ref())
            .await;

        match &result {
            Ok(()) => {
                info!(messages = transcript.len(), "debate session completed");
                if let Some(tx) = &tx {
                    let _ = tx.send(SessionEvent::Ended).await;
                }
            }
            Err(DebateError::Cancelled) => {
                info!("debate session abandoned");
            }
            Err(e) => {
                warn!(error = %e, "debate session failed");
                if let Some(tx) = &tx {
                    let _ = tx
                        .send(SessionEvent::Failed {
                            message: e.to_string(),
                        })
                        .await;
                }
            }
        }

        result.map(|()| transcript)
    }

    /// One sequential path per session: await chunk, decode lines, parse
    /// frames, apply events. Ordering correctness depends on never
    /// reordering this.
    async fn pump(
        &self,
        request: &DebateRequest,
        transcript: &mut Transcript,
        tx: Option<&mpsc::Sender<SessionEvent>>,
        cancel: Option<&CancellationToken>,
    ) -> Result<(), DebateError> {
        if cancel.is_some_and(|c| c.is_cancelled()) {
            return Err(DebateError::Cancelled);
        }

        let open = self.transport.open(request);
        let mut stream = if let Some(cancel) = cancel {
            tokio::select! {
                opened = open => opened?,
                _ = cancel.cancelled() => return Err(DebateError::Cancelled),
            }
        } else {
            open.await?
        };

        if let Some(tx) = tx {
            let _ = tx.send(SessionEvent::Started).await;
        }

        let mut decoder = LineDecoder::new();
        loop {
            if cancel.is_some_and(|c| c.is_cancelled()) {
                return Err(DebateError::Cancelled);
            }

            let chunk = if let Some(cancel) = cancel {
                tokio::select! {
                    chunk = stream.next() => chunk,
                    _ = cancel.cancelled() => return Err(DebateError::Cancelled),
                }
            } else {
                stream.next().await
            };

            // End of stream is the completed outcome; a trailing
            // unterminated line in the decoder is dropped with it.
            let Some(chunk) = chunk else {
                return Ok(());
            };

            for line in decoder.push(&chunk?) {
                // A cancel can land between events decoded from the same
                // chunk; nothing more is applied or forwarded after it.
                if cancel.is_some_and(|c| c.is_cancelled()) {
                    return Err(DebateError::Cancelled);
                }
                let Some(payload) = frame_payload(&line) else {
                    continue;
                };
                let Some(event) = parse_frame(payload) else {
                    continue;
                };
                transcript.apply(event);
                if let Some(tx) = tx {
                    let _ = tx
                        .send(SessionEvent::Snapshot {
                            messages: transcript.snapshot(),
                        })
                        .await;
                }
            }
        }
    }
}
