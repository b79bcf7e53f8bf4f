#![allow(dead_code)]

use async_trait::async_trait;
use calvox::components::assistant::{AppLauncher, AssistantHandle};
use calvox::components::calendar::{CalendarEvent, ImageAttachment};
use calvox::components::classifier::{Intent, IntentService};
use calvox::config::Config;
use calvox::error::{classifier_error, AppResult};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;

/// One scripted classifier response
pub enum MockReply {
    Intent(Intent),
    Failure(String),
}

/// Scripted stand-in for the external classification service
pub struct MockClassifier {
    replies: Mutex<VecDeque<MockReply>>,
    delay: Duration,
    summary: String,
}

impl MockClassifier {
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            delay: Duration::ZERO,
            summary: String::from("Here is your day."),
        }
    }

    /// Delay every classify call, to hold the pipeline busy
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = summary.to_string();
        self
    }
}

#[async_trait]
impl IntentService for MockClassifier {
    async fn classify(
        &self,
        _text: &str,
        _events: &[CalendarEvent],
        _image: Option<&ImageAttachment>,
    ) -> AppResult<Intent> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(MockReply::Intent(intent)) => Ok(intent),
            Some(MockReply::Failure(message)) => Err(classifier_error(&message)),
            None => Ok(Intent::Unknown { reply: None }),
        }
    }

    async fn summarize(&self, _events: &[CalendarEvent], _date: &str) -> AppResult<String> {
        Ok(self.summary.clone())
    }
}

/// Launcher that records app names instead of opening anything
#[derive(Default)]
pub struct RecordingLauncher {
    pub opened: Mutex<Vec<String>>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AppLauncher for RecordingLauncher {
    fn open(&self, app_name: &str) {
        self.opened.lock().unwrap().push(app_name.to_string());
    }
}

/// A minimal config for tests
pub fn test_config() -> Arc<RwLock<Config>> {
    Arc::new(RwLock::new(Config {
        gemini_api_key: String::from("test_api_key"),
        gemini_model: String::from("gemini-test"),
        classify_timeout_secs: 5,
        trigger_word: String::from("hey assistant"),
        summary_time: String::from("08:00"),
        summary_enabled: true,
    }))
}

/// Spawn an assistant actor wired to the given classifier
pub fn spawn_assistant(
    config: Arc<RwLock<Config>>,
    classifier: Arc<dyn IntentService>,
) -> AssistantHandle {
    AssistantHandle::new(config, classifier, Arc::new(RecordingLauncher::new()))
}

/// Poll the transcript until a message containing `needle` appears
pub async fn wait_for_message_containing(assistant: &AssistantHandle, needle: &str) -> bool {
    for _ in 0..200 {
        if let Ok(messages) = assistant.messages().await {
            if messages.iter().any(|m| m.text.contains(needle)) {
                return true;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

/// Poll a voice handle until listening starts
pub async fn wait_until_listening(voice: &calvox::components::voice::VoiceHandle) {
    for _ in 0..200 {
        if voice.is_listening().await.unwrap_or(false) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("voice never started listening");
}

/// Poll a voice handle until listening stops
pub async fn wait_until_stopped(voice: &calvox::components::voice::VoiceHandle) {
    for _ in 0..200 {
        if !voice.is_listening().await.unwrap_or(true) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("voice never stopped listening");
}
