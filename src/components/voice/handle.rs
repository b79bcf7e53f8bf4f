use super::actor::{VoiceActor, VoiceCommand};
use super::source::{TranscriptEvent, TranscriptSource};
use crate::components::assistant::AssistantHandle;
use crate::config::Config;
use crate::error::{voice_error, AppResult};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;

/// Handle for interacting with the voice actor
#[derive(Clone)]
pub struct VoiceHandle {
    command_tx: mpsc::Sender<VoiceCommand>,
    _actor_task: Arc<JoinHandle<()>>,
}

impl VoiceHandle {
    /// Create a new handle and spawn the voice actor
    pub fn new(
        config: Arc<RwLock<Config>>,
        assistant: AssistantHandle,
        source: Box<dyn TranscriptSource>,
        events_rx: mpsc::Receiver<TranscriptEvent>,
    ) -> Self {
        let (mut actor, command_tx) = VoiceActor::new(config, assistant, source, events_rx);

        // Spawn a task to run the actor
        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            command_tx,
            _actor_task: Arc::new(actor_task),
        }
    }

    /// Begin listening for voice commands (idempotent)
    pub async fn start_listening(&self) -> AppResult<()> {
        self.command_tx
            .send(VoiceCommand::StartListening)
            .await
            .map_err(|e| voice_error(&format!("Actor mailbox error: {}", e)))
    }

    /// Stop listening for voice commands (idempotent)
    pub async fn stop_listening(&self) -> AppResult<()> {
        self.command_tx
            .send(VoiceCommand::StopListening)
            .await
            .map_err(|e| voice_error(&format!("Actor mailbox error: {}", e)))
    }

    /// Current user-visible voice status line
    pub async fn status(&self) -> AppResult<String> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(VoiceCommand::GetStatus(response_tx))
            .await
            .map_err(|e| voice_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| voice_error("Response channel closed"))
    }

    /// Whether the actor is currently listening
    pub async fn is_listening(&self) -> AppResult<bool> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(VoiceCommand::IsListening(response_tx))
            .await
            .map_err(|e| voice_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| voice_error("Response channel closed"))
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> AppResult<()> {
        let _ = self.command_tx.send(VoiceCommand::Shutdown).await;
        Ok(())
    }
}
