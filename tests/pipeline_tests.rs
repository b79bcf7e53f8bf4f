mod common;

use calvox::components::calendar::ImageAttachment;
use calvox::components::classifier::{EventDraft, Intent};
use calvox::components::transcript::Sender;
use common::{spawn_assistant, test_config, MockClassifier, MockReply, RecordingLauncher};
use std::sync::Arc;
use std::time::Duration;

fn create_event_intent(title: &str, date: &str, time: Option<&str>) -> Intent {
    Intent::CreateEvent(EventDraft {
        title: Some(title.to_string()),
        date: Some(date.to_string()),
        time: time.map(String::from),
        description: None,
    })
}

/// Creating an event then reading its date must surface it exactly once
#[tokio::test]
async fn create_event_then_read_events() {
    let classifier = Arc::new(MockClassifier::new(vec![
        MockReply::Intent(create_event_intent("Team Sync", "2024-06-05", Some("09:00"))),
        MockReply::Intent(Intent::ReadEvents {
            date: Some(String::from("2024-06-05")),
        }),
    ]));
    let assistant = spawn_assistant(test_config(), classifier);

    assert!(!assistant.is_busy());
    assert!(assistant.try_submit("add team sync on june 5th at 9", None));

    // The mailbox serializes this query behind the dispatch cycle
    let events = assistant.events().await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title, "Team Sync");
    assert_eq!(events[0].date, "2024-06-05");
    assert_eq!(events[0].time.as_deref(), Some("09:00"));

    let messages = assistant.messages().await.unwrap();
    let confirmation = &messages.last().unwrap().text;
    assert!(confirmation.contains("Team Sync"));
    assert!(confirmation.contains("2024-06-05"));
    assert!(confirmation.contains("09:00"));
    assert!(!assistant.is_busy());

    assert!(assistant.try_submit("what do I have on june 5th", None));
    let messages = assistant.messages().await.unwrap();
    let reply = messages.last().unwrap();
    assert_eq!(reply.sender, Sender::Assistant);
    assert_eq!(
        reply.text,
        "Here are your events for 2024-06-05:\n- 09:00: Team Sync"
    );
}

/// Reading a date with no events yields the fixed message and mutates nothing
#[tokio::test]
async fn read_events_for_empty_date() {
    let classifier = Arc::new(MockClassifier::new(vec![MockReply::Intent(
        Intent::ReadEvents {
            date: Some(String::from("2030-01-01")),
        },
    )]));
    let assistant = spawn_assistant(test_config(), classifier);

    assert!(assistant.try_submit("what's on new year's day 2030", None));

    let messages = assistant.messages().await.unwrap();
    assert_eq!(
        messages.last().unwrap().text,
        "You have no events scheduled for 2030-01-01."
    );
    assert!(assistant.events().await.unwrap().is_empty());
}

/// Listing preserves store insertion order, not time order
#[tokio::test]
async fn read_events_keeps_insertion_order() {
    let classifier = Arc::new(MockClassifier::new(vec![
        MockReply::Intent(create_event_intent("Late", "2024-06-05", Some("14:30"))),
        MockReply::Intent(create_event_intent("Early", "2024-06-05", Some("09:00"))),
        MockReply::Intent(Intent::ReadEvents {
            date: Some(String::from("2024-06-05")),
        }),
    ]));
    let assistant = spawn_assistant(test_config(), classifier);

    assert!(assistant.try_submit("add late meeting", None));
    assert!(assistant.events().await.unwrap().len() == 1);
    assert!(assistant.try_submit("add early meeting", None));
    assert!(assistant.events().await.unwrap().len() == 2);
    assert!(assistant.try_submit("list june 5th", None));

    let messages = assistant.messages().await.unwrap();
    assert_eq!(
        messages.last().unwrap().text,
        "Here are your events for 2024-06-05:\n- 14:30: Late\n- 09:00: Early"
    );
}

/// A failed classification appends a fallback reply and releases the pipeline
#[tokio::test]
async fn classifier_failure_recovers() {
    let classifier = Arc::new(MockClassifier::new(vec![MockReply::Failure(
        String::from("simulated timeout"),
    )]));
    let assistant = spawn_assistant(test_config(), classifier);

    assert!(!assistant.is_busy());
    assert!(assistant.try_submit("do something", None));

    let messages = assistant.messages().await.unwrap();
    let reply = messages.last().unwrap();
    assert_eq!(reply.sender, Sender::Assistant);
    assert!(reply.text.contains("something went wrong"));

    // Failure path must still clear the busy flag and leave the store untouched
    assert!(!assistant.is_busy());
    assert!(assistant.events().await.unwrap().is_empty());

    // The pipeline accepts new submissions afterwards
    assert!(assistant.try_submit("hello again", None));
}

/// At most one classification in flight: concurrent submissions are rejected
#[tokio::test]
async fn busy_pipeline_rejects_concurrent_submissions() {
    let classifier = Arc::new(
        MockClassifier::new(vec![MockReply::Intent(Intent::Greeting {
            reply: Some(String::from("Hello!")),
        })])
        .with_delay(Duration::from_millis(200)),
    );
    let assistant = spawn_assistant(test_config(), classifier);

    assert!(assistant.try_submit("hi", None));
    assert!(assistant.is_busy());
    assert!(!assistant.try_submit("second request", None));

    let messages = assistant.messages().await.unwrap();
    assert!(!assistant.is_busy());

    // Only the first submission went through: greeting seed, user text, reply
    let user_messages: Vec<_> = messages
        .iter()
        .filter(|m| m.sender == Sender::User)
        .collect();
    assert_eq!(user_messages.len(), 1);
    assert_eq!(user_messages[0].text, "hi");
}

/// CreateEvent without its required fields downgrades to the fallback reply
#[tokio::test]
async fn malformed_create_event_falls_back() {
    let classifier = Arc::new(MockClassifier::new(vec![MockReply::Intent(
        Intent::CreateEvent(EventDraft {
            title: Some(String::from("Dentist")),
            date: None,
            time: None,
            description: None,
        }),
    )]));
    let assistant = spawn_assistant(test_config(), classifier);

    assert!(assistant.try_submit("add dentist", None));

    let messages = assistant.messages().await.unwrap();
    assert_eq!(
        messages.last().unwrap().text,
        "I'm not sure how to help with that. Can you rephrase?"
    );
    assert!(assistant.events().await.unwrap().is_empty());
}

/// OpenApp logs a system message and fires the launcher side effect
#[tokio::test]
async fn open_app_invokes_launcher() {
    let classifier = Arc::new(MockClassifier::new(vec![MockReply::Intent(
        Intent::OpenApp {
            app_name: Some(String::from("spotify")),
        },
    )]));
    let launcher = Arc::new(RecordingLauncher::new());
    let assistant = calvox::components::assistant::AssistantHandle::new(
        test_config(),
        classifier,
        Arc::clone(&launcher) as Arc<dyn calvox::components::assistant::AppLauncher>,
    );

    assert!(assistant.try_submit("open spotify", None));

    let messages = assistant.messages().await.unwrap();
    let note = messages.last().unwrap();
    assert_eq!(note.sender, Sender::System);
    assert_eq!(note.text, "Attempting to open spotify...");
    assert_eq!(*launcher.opened.lock().unwrap(), vec!["spotify"]);
}

/// The request's image attaches to the event created in the same cycle
#[tokio::test]
async fn image_attaches_to_created_event() {
    let classifier = Arc::new(MockClassifier::new(vec![MockReply::Intent(
        create_event_intent("Concert", "2024-07-01", None),
    )]));
    let assistant = spawn_assistant(test_config(), classifier);

    let image = ImageAttachment::new("aGVsbG8=", "image/png").unwrap();
    // Image-only submissions are valid: text may be empty
    assert!(assistant.try_submit("", Some(image.clone())));

    let events = assistant.events().await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].image.as_ref(), Some(&image));

    // No user message was logged for the empty text
    let messages = assistant.messages().await.unwrap();
    assert!(messages.iter().all(|m| m.sender != Sender::User));
}

/// Empty submissions never enter the pipeline
#[tokio::test]
async fn empty_submission_is_rejected() {
    let classifier = Arc::new(MockClassifier::new(vec![]));
    let assistant = spawn_assistant(test_config(), classifier);

    assert!(!assistant.try_submit("", None));
    assert!(!assistant.try_submit("   ", None));
    assert!(!assistant.is_busy());

    // Only the greeting seed is in the transcript
    let messages = assistant.messages().await.unwrap();
    assert_eq!(messages.len(), 1);
}

/// SummarizeDay replies verbatim, with a fixed fallback when absent
#[tokio::test]
async fn summarize_day_reply_and_fallback() {
    let classifier = Arc::new(MockClassifier::new(vec![
        MockReply::Intent(Intent::SummarizeDay {
            summary: Some(String::from("A busy morning, a quiet afternoon.")),
        }),
        MockReply::Intent(Intent::SummarizeDay { summary: None }),
    ]));
    let assistant = spawn_assistant(test_config(), classifier);

    assert!(assistant.try_submit("summarize my day", None));
    let messages = assistant.messages().await.unwrap();
    assert_eq!(
        messages.last().unwrap().text,
        "A busy morning, a quiet afternoon."
    );

    assert!(assistant.try_submit("summarize again", None));
    let messages = assistant.messages().await.unwrap();
    assert_eq!(messages.last().unwrap().text, "I couldn't generate a summary.");
}
