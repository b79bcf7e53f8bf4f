use crate::error::{AppResult, Error};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An image payload attached to a request or an event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageAttachment {
    /// Base64-encoded image bytes
    pub data: String,
    /// Mime type, e.g. "image/png"
    pub mime_type: String,
}

impl ImageAttachment {
    /// Create an attachment, rejecting payloads that are not valid base64
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> AppResult<Self> {
        let data = data.into();
        BASE64
            .decode(&data)
            .map_err(|e| Error::InvalidInput(format!("Invalid image payload: {}", e)))?;

        Ok(Self {
            data,
            mime_type: mime_type.into(),
        })
    }
}

/// A single calendar event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Unique identifier, stable once created
    pub id: String,
    /// Event title, never empty
    pub title: String,
    /// Opaque YYYY-MM-DD date key, no time zone conversion
    pub date: String,
    /// Optional 24-hour HH:MM time of day
    pub time: Option<String>,
    /// Optional free-text description
    pub description: Option<String>,
    /// Optional image attached at creation time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageAttachment>,
}

impl CalendarEvent {
    /// Create a new event with a freshly generated identifier
    pub fn new(
        title: impl Into<String>,
        date: impl Into<String>,
        time: Option<String>,
        description: Option<String>,
        image: Option<ImageAttachment>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            date: date.into(),
            time,
            description,
            image,
        }
    }

    /// Format the event as a single "{time or All-day}: {title}" line
    pub fn format_line(&self) -> String {
        match self.time.as_deref() {
            Some(time) => format!("{}: {}", time, self.title),
            None => format!("All-day: {}", self.title),
        }
    }
}
