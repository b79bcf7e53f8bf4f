use super::source::{TranscriptEvent, TranscriptSource};
use super::trigger::extract_command;
use crate::components::assistant::AssistantHandle;
use crate::config::Config;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, warn};

/// Commands that can be sent to the voice actor
pub enum VoiceCommand {
    StartListening,
    StopListening,
    GetStatus(mpsc::Sender<String>),
    IsListening(mpsc::Sender<bool>),
    Shutdown,
}

/// The voice actor: drains the transcript stream and the command mailbox
/// sequentially, extracting trigger-phrase commands while listening.
pub struct VoiceActor {
    config: Arc<RwLock<Config>>,
    assistant: AssistantHandle,
    source: Box<dyn TranscriptSource>,
    events_rx: mpsc::Receiver<TranscriptEvent>,
    command_rx: mpsc::Receiver<VoiceCommand>,
    listening: bool,
    events_closed: bool,
    status: String,
}

impl VoiceActor {
    /// Create a new actor and return it with its command sender
    pub fn new(
        config: Arc<RwLock<Config>>,
        assistant: AssistantHandle,
        source: Box<dyn TranscriptSource>,
        events_rx: mpsc::Receiver<TranscriptEvent>,
    ) -> (Self, mpsc::Sender<VoiceCommand>) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            config,
            assistant,
            source,
            events_rx,
            command_rx,
            listening: false,
            events_closed: false,
            status: String::from("Voice commands are off. Start listening to enable them."),
        };

        (actor, command_tx)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Voice actor started");

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(VoiceCommand::StartListening) => {
                            if let Err(e) = self.source.start().await {
                                warn!("Failed to start transcript source: {}", e);
                                self.status = format!("Error: {}. Please try again.", e);
                            }
                        }
                        Some(VoiceCommand::StopListening) => {
                            // Takes effect immediately for future utterances;
                            // an in-flight classification is never cancelled
                            self.listening = false;
                            if let Err(e) = self.source.stop().await {
                                warn!("Failed to stop transcript source: {}", e);
                            }
                        }
                        Some(VoiceCommand::GetStatus(response_tx)) => {
                            let _ = response_tx.send(self.status.clone()).await;
                        }
                        Some(VoiceCommand::IsListening(response_tx)) => {
                            let _ = response_tx.send(self.listening).await;
                        }
                        Some(VoiceCommand::Shutdown) | None => {
                            info!("Voice actor shutting down");
                            break;
                        }
                    }
                }
                event = self.events_rx.recv(), if !self.events_closed => {
                    match event {
                        Some(event) => self.handle_event(event).await,
                        None => {
                            self.events_closed = true;
                            self.listening = false;
                        }
                    }
                }
            }
        }

        info!("Voice actor shut down");
    }

    /// React to one lifecycle or utterance event from the source
    async fn handle_event(&mut self, event: TranscriptEvent) {
        match event {
            TranscriptEvent::Started => {
                self.listening = true;
                let trigger_word = {
                    let config = self.config.read().await;
                    config.trigger_word.clone()
                };
                self.status = format!(
                    "Listening... Say \"{}\" followed by your command.",
                    trigger_word
                );
                info!("Voice listening started");
            }
            TranscriptEvent::Utterance(transcript) => {
                if !self.listening {
                    return;
                }
                self.handle_utterance(&transcript).await;
            }
            TranscriptEvent::Stopped => {
                self.listening = false;
                self.status =
                    String::from("Voice commands stopped. Start listening to re-enable them.");
                info!("Voice listening stopped");
            }
            TranscriptEvent::Error(reason) => {
                // No automatic retry; the user must re-initiate listening
                self.listening = false;
                self.status = format!("Error: {}. Please try again.", reason);
                warn!("Voice recognition error: {}", reason);
            }
        }
    }

    /// Match one finalized utterance against the trigger phrase current at
    /// this moment and submit any extracted command
    async fn handle_utterance(&mut self, transcript: &str) {
        let trigger_word = {
            let config = self.config.read().await;
            config.trigger_word.clone()
        };

        let Some(command) = extract_command(transcript, &trigger_word) else {
            return;
        };

        self.status = format!("Command received: \"{}\"", command);

        if !self.assistant.try_submit(&command, None) {
            // Pipeline busy; voice submissions are dropped silently
            debug!("Voice command ignored, pipeline busy: \"{}\"", command);
        }
    }
}
