pub mod scheduler;

use crate::components::assistant::AssistantHandle;
use crate::config::Config;
use crate::error::AppResult;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Daily summary component: fires the scheduled summary once per matching
/// clock minute while enabled
#[derive(Default)]
pub struct DailySummary {
    task: RwLock<Option<JoinHandle<()>>>,
}

impl DailySummary {
    /// Create a new daily summary component
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl super::Component for DailySummary {
    fn name(&self) -> &'static str {
        "daily_summary"
    }

    async fn init(
        &self,
        config: Arc<RwLock<Config>>,
        assistant: AssistantHandle,
    ) -> AppResult<()> {
        let mut task_lock = self.task.write().await;
        if task_lock.is_none() {
            *task_lock = scheduler::start_scheduler(config, assistant);
        }
        Ok(())
    }

    async fn shutdown(&self) -> AppResult<()> {
        let mut task_lock = self.task.write().await;
        if let Some(task) = task_lock.take() {
            task.abort();
            scheduler::mark_stopped();
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
