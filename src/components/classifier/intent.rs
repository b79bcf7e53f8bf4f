use serde_json::Value;

/// Event fields extracted by the classification service.
///
/// All fields are optional on the wire; the dispatcher validates that title
/// and date are present before creating an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub description: Option<String>,
}

/// Structured outcome of classifying free-form input, one variant per action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    CreateEvent(EventDraft),
    ReadEvents { date: Option<String> },
    SummarizeDay { summary: Option<String> },
    OpenApp { app_name: Option<String> },
    Greeting { reply: Option<String> },
    Unknown { reply: Option<String> },
}

/// Read an optional non-empty string field from a JSON object
fn string_field(value: &Value, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Parse a service response object into an intent.
///
/// Unrecognized or missing action tags map to `Unknown`; absent payload
/// fields are tolerated and surface as `None`.
pub fn parse_intent(value: &Value) -> Intent {
    let action = value.get("action").and_then(|a| a.as_str()).unwrap_or("");
    let reply = string_field(value, "responseText");

    match action {
        "CREATE_EVENT" => {
            let details = value.get("eventDetails").cloned().unwrap_or(Value::Null);
            Intent::CreateEvent(EventDraft {
                title: string_field(&details, "title"),
                date: string_field(&details, "date"),
                time: string_field(&details, "time"),
                description: string_field(&details, "description"),
            })
        }
        "READ_EVENTS" => Intent::ReadEvents {
            date: string_field(value, "queryDate"),
        },
        "SUMMARIZE_DAY" => Intent::SummarizeDay {
            summary: string_field(value, "summary"),
        },
        "OPEN_APP" => Intent::OpenApp {
            app_name: string_field(value, "appName"),
        },
        "GREETING" => Intent::Greeting { reply },
        _ => Intent::Unknown { reply },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_create_event_with_full_details() {
        let value = json!({
            "action": "CREATE_EVENT",
            "eventDetails": {
                "title": "Team Sync",
                "date": "2024-06-05",
                "time": "09:00",
                "description": "Weekly sync"
            }
        });

        match parse_intent(&value) {
            Intent::CreateEvent(draft) => {
                assert_eq!(draft.title.as_deref(), Some("Team Sync"));
                assert_eq!(draft.date.as_deref(), Some("2024-06-05"));
                assert_eq!(draft.time.as_deref(), Some("09:00"));
                assert_eq!(draft.description.as_deref(), Some("Weekly sync"));
            }
            other => panic!("expected CreateEvent, got {:?}", other),
        }
    }

    #[test]
    fn tolerates_missing_event_details() {
        let value = json!({ "action": "CREATE_EVENT" });
        assert_eq!(parse_intent(&value), Intent::CreateEvent(EventDraft::default()));
    }

    #[test]
    fn parses_read_events_with_and_without_date() {
        let with_date = json!({ "action": "READ_EVENTS", "queryDate": "2024-06-05" });
        assert_eq!(
            parse_intent(&with_date),
            Intent::ReadEvents {
                date: Some("2024-06-05".into())
            }
        );

        let without = json!({ "action": "READ_EVENTS" });
        assert_eq!(parse_intent(&without), Intent::ReadEvents { date: None });
    }

    #[test]
    fn unknown_or_missing_action_maps_to_unknown() {
        let missing = json!({ "responseText": "hello" });
        assert_eq!(
            parse_intent(&missing),
            Intent::Unknown {
                reply: Some("hello".into())
            }
        );

        let bogus = json!({ "action": "DO_A_BACKFLIP" });
        assert_eq!(parse_intent(&bogus), Intent::Unknown { reply: None });
    }

    #[test]
    fn blank_fields_are_treated_as_absent() {
        let value = json!({ "action": "OPEN_APP", "appName": "   " });
        assert_eq!(parse_intent(&value), Intent::OpenApp { app_name: None });
    }

    #[test]
    fn parses_remaining_variants() {
        let summarize = json!({ "action": "SUMMARIZE_DAY", "summary": "A quiet day." });
        assert_eq!(
            parse_intent(&summarize),
            Intent::SummarizeDay {
                summary: Some("A quiet day.".into())
            }
        );

        let greeting = json!({ "action": "GREETING", "responseText": "Hi there!" });
        assert_eq!(
            parse_intent(&greeting),
            Intent::Greeting {
                reply: Some("Hi there!".into())
            }
        );
    }
}
