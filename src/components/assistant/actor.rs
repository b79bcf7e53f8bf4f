use super::launcher::AppLauncher;
use crate::components::calendar::{CalendarEvent, CalendarStore, ImageAttachment};
use crate::components::classifier::{Intent, IntentService, SUMMARY_FALLBACK};
use crate::components::transcript::{ChatMessage, ChatTranscript, Sender};
use crate::config::Config;
use crate::utils::time::today_key;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{info, warn};

/// Reply when the classifier produced nothing usable
pub const FALLBACK_REPLY: &str = "I'm not sure how to help with that. Can you rephrase?";
/// Reply when the classification call itself failed
pub const ERROR_REPLY: &str =
    "Sorry, something went wrong while processing that request. Please try again.";

/// Commands that can be sent to the assistant actor
pub enum AssistantCommand {
    /// Dispatch a user request through the pipeline
    Submit {
        text: String,
        image: Option<ImageAttachment>,
    },
    /// Produce and log the scheduled daily summary for a date
    DailySummary { date: String },
    GetEvents(mpsc::Sender<Vec<CalendarEvent>>),
    GetMessages(mpsc::Sender<Vec<ChatMessage>>),
    MessagesSince(usize, mpsc::Sender<Vec<ChatMessage>>),
    Shutdown,
}

/// The assistant actor: owns the calendar store and chat transcript and runs
/// one dispatch cycle at a time off its mailbox.
pub struct AssistantActor {
    config: Arc<RwLock<Config>>,
    store: CalendarStore,
    transcript: ChatTranscript,
    classifier: Arc<dyn IntentService>,
    launcher: Arc<dyn AppLauncher>,
    busy: Arc<AtomicBool>,
    command_rx: mpsc::Receiver<AssistantCommand>,
}

impl AssistantActor {
    /// Create a new actor and return it with its command sender and busy flag
    pub fn new(
        config: Arc<RwLock<Config>>,
        classifier: Arc<dyn IntentService>,
        launcher: Arc<dyn AppLauncher>,
    ) -> (Self, mpsc::Sender<AssistantCommand>, Arc<AtomicBool>) {
        let (command_tx, command_rx) = mpsc::channel(32);
        let busy = Arc::new(AtomicBool::new(false));

        let actor = Self {
            config,
            store: CalendarStore::new(),
            transcript: ChatTranscript::new(),
            classifier,
            launcher,
            busy: Arc::clone(&busy),
            command_rx,
        };

        (actor, command_tx, busy)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Assistant actor started");

        // Seed the transcript with a greeting naming the current trigger phrase
        let trigger_word = {
            let config = self.config.read().await;
            config.trigger_word.clone()
        };
        self.transcript.push(
            Sender::Assistant,
            format!(
                "Hello! I'm your smart calendar assistant. You can ask me to add, find, or \
                 summarize events. Try saying \"{}, add an event for tomorrow at 10am called \
                 project kickoff\".",
                trigger_word
            ),
        );

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                AssistantCommand::Submit { text, image } => {
                    self.dispatch(text, image).await;
                }
                AssistantCommand::DailySummary { date } => {
                    self.daily_summary(date).await;
                }
                AssistantCommand::GetEvents(response_tx) => {
                    let _ = response_tx.send(self.store.events().to_vec()).await;
                }
                AssistantCommand::GetMessages(response_tx) => {
                    let _ = response_tx.send(self.transcript.messages().to_vec()).await;
                }
                AssistantCommand::MessagesSince(index, response_tx) => {
                    let _ = response_tx
                        .send(self.transcript.messages_since(index).to_vec())
                        .await;
                }
                AssistantCommand::Shutdown => {
                    info!("Assistant actor shutting down");
                    break;
                }
            }
        }

        info!("Assistant actor shut down");
    }

    /// One complete dispatch cycle: log, classify, branch, clear busy.
    ///
    /// The busy flag was set by the handle that accepted this submission; it
    /// is cleared here on every path, including classification failure.
    async fn dispatch(&mut self, text: String, image: Option<ImageAttachment>) {
        // User-visible history reflects what was asked even if classification fails
        if !text.is_empty() {
            self.transcript.push(Sender::User, &text);
        }

        let snapshot = self.store.events().to_vec();
        match self
            .classifier
            .classify(&text, &snapshot, image.as_ref())
            .await
        {
            Ok(intent) => self.apply_intent(intent, image),
            Err(e) => {
                warn!("Classification failed: {}", e);
                self.transcript.push(Sender::Assistant, ERROR_REPLY);
            }
        }

        self.busy.store(false, Ordering::SeqCst);
    }

    /// Branch on the classified intent
    fn apply_intent(&mut self, intent: Intent, image: Option<ImageAttachment>) {
        match intent {
            Intent::CreateEvent(draft) => match (draft.title, draft.date) {
                (Some(title), Some(date)) => {
                    // The image travels with the original request, not the
                    // classifier output, and attaches to this event only
                    let event =
                        CalendarEvent::new(title, date, draft.time, draft.description, image);

                    let confirmation = match event.time.as_deref() {
                        Some(time) => format!(
                            "OK, I've added \"{}\" to your calendar for {} at {}.",
                            event.title, event.date, time
                        ),
                        None => format!(
                            "OK, I've added \"{}\" to your calendar for {}.",
                            event.title, event.date
                        ),
                    };

                    info!("Created event \"{}\" on {}", event.title, event.date);
                    self.store.add(event);
                    self.transcript.push(Sender::Assistant, confirmation);
                }
                _ => {
                    // Malformed intent: required fields missing
                    warn!("CreateEvent intent missing title or date");
                    self.transcript.push(Sender::Assistant, FALLBACK_REPLY);
                }
            },
            Intent::ReadEvents { date } => {
                let date = date.unwrap_or_else(today_key);
                let found = self.store.events_for_date(&date);

                let reply = if found.is_empty() {
                    format!("You have no events scheduled for {}.", date)
                } else {
                    let lines: Vec<String> = found
                        .iter()
                        .map(|e| format!("- {}", e.format_line()))
                        .collect();
                    format!("Here are your events for {}:\n{}", date, lines.join("\n"))
                };

                self.transcript.push(Sender::Assistant, reply);
            }
            Intent::SummarizeDay { summary } => {
                let text = summary.unwrap_or_else(|| String::from(SUMMARY_FALLBACK));
                self.transcript.push(Sender::Assistant, text);
            }
            Intent::OpenApp { app_name } => match app_name {
                Some(app) => {
                    self.transcript
                        .push(Sender::System, format!("Attempting to open {}...", app));
                    self.launcher.open(&app);
                }
                None => {
                    warn!("OpenApp intent missing app name");
                    self.transcript.push(Sender::Assistant, FALLBACK_REPLY);
                }
            },
            Intent::Greeting { reply } | Intent::Unknown { reply } => {
                let text = reply.unwrap_or_else(|| String::from(FALLBACK_REPLY));
                self.transcript.push(Sender::Assistant, text);
            }
        }
    }

    /// Produce the scheduled daily summary and log it as a system message
    async fn daily_summary(&mut self, date: String) {
        let snapshot = self.store.events().to_vec();

        let summary = match self.classifier.summarize(&snapshot, &date).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Daily summary failed: {}", e);
                String::from(SUMMARY_FALLBACK)
            }
        };

        self.transcript.push(Sender::System, summary);
        self.busy.store(false, Ordering::SeqCst);
    }
}
