mod client;
pub mod intent;

pub use client::{GeminiClassifier, SUMMARY_FALLBACK};
pub use intent::{EventDraft, Intent};

use crate::components::calendar::{CalendarEvent, ImageAttachment};
use crate::error::AppResult;
use async_trait::async_trait;

/// Boundary trait for the external language-understanding service.
///
/// The dispatcher and scheduler depend only on this contract; the production
/// implementation is [`GeminiClassifier`], tests substitute mocks.
#[async_trait]
pub trait IntentService: Send + Sync {
    /// Classify free-form input into exactly one intent.
    ///
    /// `text` may be empty when only an image is supplied. The event list is
    /// read-only context for grounding queries like "what do I have tomorrow"
    /// and may be empty.
    async fn classify(
        &self,
        text: &str,
        events: &[CalendarEvent],
        image: Option<&ImageAttachment>,
    ) -> AppResult<Intent>;

    /// Produce a natural-language digest of the given date's events
    async fn summarize(&self, events: &[CalendarEvent], date: &str) -> AppResult<String>;
}
