use super::intent::{parse_intent, Intent};
use super::IntentService;
use crate::components::calendar::{CalendarEvent, ImageAttachment};
use crate::config::Config;
use crate::error::{classifier_error, AppResult};
use crate::utils::time::today_key;
use async_trait::async_trait;
use rig::completion::{Chat, Message};
use rig::providers::gemini::Client as GeminiClient;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{timeout, Duration};
use tracing::{error, info, warn};

/// Digest returned when the summary service fails
pub const SUMMARY_FALLBACK: &str = "I couldn't generate a summary.";

const CLASSIFY_SYSTEM_PROMPT: &str = "You are the intent classifier for a smart calendar \
assistant. You analyze a user request, together with the user's current calendar, and map it to \
exactly one supported action. Respond with a single JSON object and nothing else.";

const CLASSIFY_PROMPT_TEMPLATE: &str = "Today's date is {date}.

The user's calendar, as a JSON array of events:
{events}

The user's request: \"{text}\"{image_note}

Classify the request into exactly one of these actions:
- CREATE_EVENT: the user wants to add an event. Include an \"eventDetails\" object with \"title\" and \"date\" (YYYY-MM-DD, resolved against today's date) and, when mentioned, \"time\" (24-hour HH:MM) and \"description\".
- READ_EVENTS: the user asks what is on the calendar. Include \"queryDate\" (YYYY-MM-DD) when a date is implied.
- SUMMARIZE_DAY: the user asks for a summary of a day. Include a \"summary\" string describing that day's events conversationally.
- OPEN_APP: the user asks to open another application. Include \"appName\".
- GREETING: the user is just greeting or making small talk. Include a friendly \"responseText\".
- UNKNOWN: anything else. Include a helpful \"responseText\".

Respond with a single JSON object of the form {\"action\": \"...\", ...}. The response must start with '{' and end with '}' and contain no other text.";

const SUMMARY_SYSTEM_PROMPT: &str = "You are a smart calendar assistant delivering a scheduled \
daily briefing. Be concise and friendly. Respond with plain text only.";

const SUMMARY_PROMPT_TEMPLATE: &str = "Write a short spoken-style summary of the user's schedule \
for {date}. The events for that day, as a JSON array:
{events}

Mention each event with its time when one is set. Two or three sentences at most.";

/// Intent classification client backed by Google Gemini
pub struct GeminiClassifier {
    config: Arc<RwLock<Config>>,
}

impl GeminiClassifier {
    /// Create a new classifier client
    pub fn new(config: Arc<RwLock<Config>>) -> Self {
        Self { config }
    }

    /// Read the service parameters current at call time
    async fn service_params(&self) -> (String, String, Duration) {
        let config = self.config.read().await;
        (
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            Duration::from_secs(config.classify_timeout_secs),
        )
    }

    /// Send a prompt to the service with a bounded timeout
    async fn chat_with_timeout(&self, system_prompt: &str, prompt: String) -> AppResult<String> {
        let (api_key, model, deadline) = self.service_params().await;

        let client = GeminiClient::new(&api_key);
        let agent = client
            .agent(&model)
            .preamble(system_prompt)
            .temperature(0.2)
            .build();

        let response = timeout(deadline, agent.chat(prompt, Vec::<Message>::new()))
            .await
            .map_err(|_| classifier_error("Classification service call timed out"))?
            .map_err(|e| classifier_error(&format!("Service request failed: {}", e)))?;

        Ok(response)
    }
}

/// Extract the outermost JSON object from a model response
fn parse_json_from_response(response: &str) -> AppResult<Value> {
    if let (Some(start), Some(end)) = (response.find('{'), response.rfind('}')) {
        if start < end {
            let json_str = &response[start..=end];
            match serde_json::from_str::<Value>(json_str) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    error!("Failed to parse JSON from response: {}", e);
                    error!("JSON string: {}", json_str);
                }
            }
        }
    }

    error!("Could not extract valid JSON from response: {}", response);
    Err(classifier_error(
        "Could not extract valid JSON from the model response",
    ))
}

/// Serialize the calendar snapshot for prompt grounding
fn events_as_json(events: &[CalendarEvent]) -> String {
    serde_json::to_string(events).unwrap_or_else(|_| String::from("[]"))
}

#[async_trait]
impl IntentService for GeminiClassifier {
    async fn classify(
        &self,
        text: &str,
        events: &[CalendarEvent],
        image: Option<&ImageAttachment>,
    ) -> AppResult<Intent> {
        let image_note = match image {
            Some(attachment) => format!(
                "\n\nThe user attached an image ({}). Treat it as context for the request, \
                 for example an invitation or poster for an event.",
                attachment.mime_type
            ),
            None => String::new(),
        };

        let prompt = CLASSIFY_PROMPT_TEMPLATE
            .replace("{date}", &today_key())
            .replace("{events}", &events_as_json(events))
            .replace("{text}", text)
            .replace("{image_note}", &image_note);

        let response = self.chat_with_timeout(CLASSIFY_SYSTEM_PROMPT, prompt).await?;
        info!("Received classification response");

        let value = parse_json_from_response(&response)?;
        Ok(parse_intent(&value))
    }

    async fn summarize(&self, events: &[CalendarEvent], date: &str) -> AppResult<String> {
        let day_events: Vec<&CalendarEvent> = events.iter().filter(|e| e.date == date).collect();

        // Nothing to digest; skip the service round-trip entirely
        if day_events.is_empty() {
            return Ok(format!(
                "You have nothing on your calendar for {}. Enjoy your free day!",
                date
            ));
        }

        let events_json =
            serde_json::to_string(&day_events).unwrap_or_else(|_| String::from("[]"));
        let prompt = SUMMARY_PROMPT_TEMPLATE
            .replace("{date}", date)
            .replace("{events}", &events_json);

        match self.chat_with_timeout(SUMMARY_SYSTEM_PROMPT, prompt).await {
            Ok(summary) if !summary.trim().is_empty() => Ok(summary.trim().to_string()),
            Ok(_) => Ok(String::from(SUMMARY_FALLBACK)),
            Err(e) => {
                // A failed briefing must still produce text, never an error
                warn!("Summary service call failed: {}", e);
                Ok(String::from(SUMMARY_FALLBACK))
            }
        }
    }
}
