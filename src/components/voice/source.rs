use crate::error::AppResult;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Lifecycle and utterance events emitted by a continuous transcript source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    /// The source began listening
    Started,
    /// One finalized utterance
    Utterance(String),
    /// The source stopped listening
    Stopped,
    /// The source failed; listening has ended
    Error(String),
}

/// Control surface of an external speech-to-text stream.
///
/// The core depends only on receiving one string per finalized utterance and
/// on `start`/`stop` being idempotent; capture and transcription internals
/// live behind this boundary.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn start(&mut self) -> AppResult<()>;
    async fn stop(&mut self) -> AppResult<()>;
}

/// Channel-backed transcript source.
///
/// Utterances are pushed in from outside through the paired sender; start and
/// stop emit the matching lifecycle events. Used by the console front-end and
/// by tests in place of a real speech backend.
pub struct PipedTranscriptSource {
    events_tx: mpsc::Sender<TranscriptEvent>,
    started: bool,
}

impl PipedTranscriptSource {
    /// Create a source plus the sender used to feed utterances into it and
    /// the receiver the voice actor drains
    pub fn new() -> (
        Self,
        mpsc::Sender<TranscriptEvent>,
        mpsc::Receiver<TranscriptEvent>,
    ) {
        let (events_tx, events_rx) = mpsc::channel(32);
        let source = Self {
            events_tx: events_tx.clone(),
            started: false,
        };
        (source, events_tx, events_rx)
    }
}

#[async_trait]
impl TranscriptSource for PipedTranscriptSource {
    async fn start(&mut self) -> AppResult<()> {
        if !self.started {
            self.started = true;
            let _ = self.events_tx.send(TranscriptEvent::Started).await;
        }
        Ok(())
    }

    async fn stop(&mut self) -> AppResult<()> {
        if self.started {
            self.started = false;
            let _ = self.events_tx.send(TranscriptEvent::Stopped).await;
        }
        Ok(())
    }
}
