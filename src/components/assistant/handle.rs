use super::actor::{AssistantActor, AssistantCommand};
use super::launcher::AppLauncher;
use crate::components::calendar::{CalendarEvent, ImageAttachment};
use crate::components::classifier::IntentService;
use crate::components::transcript::ChatMessage;
use crate::config::Config;
use crate::error::{component_error, AppResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::debug;

/// Handle for interacting with the assistant actor.
///
/// The busy flag is the sole mutual-exclusion primitive for submissions: a
/// handle accepts a submission only by flipping the flag from false to true,
/// which guarantees at most one classification in flight at a time. The
/// actor clears the flag at the end of every dispatch cycle.
#[derive(Clone)]
pub struct AssistantHandle {
    command_tx: mpsc::Sender<AssistantCommand>,
    busy: Arc<AtomicBool>,
    _actor_task: Arc<JoinHandle<()>>,
}

impl AssistantHandle {
    /// Create a new handle and spawn the assistant actor
    pub fn new(
        config: Arc<RwLock<Config>>,
        classifier: Arc<dyn IntentService>,
        launcher: Arc<dyn AppLauncher>,
    ) -> Self {
        let (mut actor, command_tx, busy) = AssistantActor::new(config, classifier, launcher);

        // Spawn a task to run the actor
        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            command_tx,
            busy,
            _actor_task: Arc::new(actor_task),
        }
    }

    /// Whether a dispatch cycle is currently in flight
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Submit a user request into the pipeline.
    ///
    /// Returns false without side effects when the submission is empty (no
    /// text and no image) or when a dispatch cycle is already in flight.
    pub fn try_submit(&self, text: &str, image: Option<ImageAttachment>) -> bool {
        let text = text.trim();

        // Boundary validation: an empty request never enters the pipeline
        if text.is_empty() && image.is_none() {
            return false;
        }

        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Submission rejected: pipeline busy");
            return false;
        }

        let accepted = self
            .command_tx
            .try_send(AssistantCommand::Submit {
                text: text.to_string(),
                image,
            })
            .is_ok();

        if !accepted {
            // Mailbox unavailable; release the claim so the pipeline can't lock up
            self.busy.store(false, Ordering::SeqCst);
        }

        accepted
    }

    /// Request the scheduled daily summary for a date.
    ///
    /// Shares the submission gate with [`try_submit`]; a busy pipeline simply
    /// skips the request, the scheduler will tick again.
    pub fn try_submit_summary(&self, date: &str) -> bool {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Daily summary skipped: pipeline busy");
            return false;
        }

        let accepted = self
            .command_tx
            .try_send(AssistantCommand::DailySummary {
                date: date.to_string(),
            })
            .is_ok();

        if !accepted {
            self.busy.store(false, Ordering::SeqCst);
        }

        accepted
    }

    /// Snapshot of all calendar events, in insertion order
    pub async fn events(&self) -> AppResult<Vec<CalendarEvent>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(AssistantCommand::GetEvents(response_tx))
            .await
            .map_err(|e| component_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))
    }

    /// Snapshot of the full chat transcript
    pub async fn messages(&self) -> AppResult<Vec<ChatMessage>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(AssistantCommand::GetMessages(response_tx))
            .await
            .map_err(|e| component_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))
    }

    /// Messages appended at or after the given index
    pub async fn messages_since(&self, index: usize) -> AppResult<Vec<ChatMessage>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(AssistantCommand::MessagesSince(index, response_tx))
            .await
            .map_err(|e| component_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> AppResult<()> {
        let _ = self.command_tx.send(AssistantCommand::Shutdown).await;
        Ok(())
    }
}
