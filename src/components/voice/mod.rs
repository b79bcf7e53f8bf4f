mod actor;
mod handle;
pub mod source;
pub mod trigger;

pub use handle::VoiceHandle;
pub use source::{PipedTranscriptSource, TranscriptEvent, TranscriptSource};

use crate::components::assistant::AssistantHandle;
use crate::config::Config;
use crate::error::{component_error, AppResult};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

/// Voice command component: trigger-phrase extraction over a continuous
/// transcript stream
pub struct Voice {
    parts: RwLock<Option<(Box<dyn TranscriptSource>, mpsc::Receiver<TranscriptEvent>)>>,
    handle: RwLock<Option<VoiceHandle>>,
}

impl Voice {
    /// Create the component around a transcript source and its event stream
    pub fn new(
        source: Box<dyn TranscriptSource>,
        events_rx: mpsc::Receiver<TranscriptEvent>,
    ) -> Self {
        Self {
            parts: RwLock::new(Some((source, events_rx))),
            handle: RwLock::new(None),
        }
    }

    /// Get the handle if the component has been initialized
    pub async fn get_handle(&self) -> Option<VoiceHandle> {
        let handle_lock = self.handle.read().await;
        handle_lock.clone()
    }
}

#[async_trait]
impl super::Component for Voice {
    fn name(&self) -> &'static str {
        "voice"
    }

    async fn init(
        &self,
        config: Arc<RwLock<Config>>,
        assistant: AssistantHandle,
    ) -> AppResult<()> {
        let (source, events_rx) = self
            .parts
            .write()
            .await
            .take()
            .ok_or_else(|| component_error("Voice component already initialized"))?;

        let mut handle_lock = self.handle.write().await;
        *handle_lock = Some(VoiceHandle::new(config, assistant, source, events_rx));

        Ok(())
    }

    async fn shutdown(&self) -> AppResult<()> {
        let handle_lock = self.handle.read().await;
        if let Some(handle) = &*handle_lock {
            handle.shutdown().await?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
