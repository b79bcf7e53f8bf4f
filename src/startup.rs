use crate::components::assistant::{AssistantHandle, SchemeLauncher};
use crate::components::classifier::GeminiClassifier;
use crate::components::summary::DailySummary;
use crate::components::transcript::Sender;
use crate::components::voice::{PipedTranscriptSource, TranscriptEvent, Voice, VoiceHandle};
use crate::components::ComponentManager;
use crate::config::{Config, SettingsUpdate};
use crate::error::Error;
use crate::shutdown;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub async fn load_config() -> miette::Result<Arc<RwLock<Config>>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(RwLock::new(config))),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Wire up the pipeline and run the console front-end until shutdown
pub async fn run(config: Arc<RwLock<Config>>) -> miette::Result<()> {
    // Central assistant actor: classifier boundary, app launcher, dispatcher
    let classifier = Arc::new(GeminiClassifier::new(Arc::clone(&config)));
    let launcher = Arc::new(SchemeLauncher);
    let assistant = AssistantHandle::new(Arc::clone(&config), classifier, launcher);

    // Transcript source for the voice pipeline; the console feeds it
    let (source, utterance_tx, events_rx) = PipedTranscriptSource::new();

    // Initialize component manager
    let mut component_manager = ComponentManager::new(Arc::clone(&config));
    component_manager.register(Voice::new(Box::new(source), events_rx));
    component_manager.register(DailySummary::new());

    let component_manager = Arc::new(component_manager);
    component_manager
        .init_all(Arc::clone(&config), assistant.clone())
        .await
        .map_err(miette::Report::from)?;

    let voice = match component_manager.get_component_by_name("voice") {
        Some(component) => match component.as_any().downcast_ref::<Voice>() {
            Some(voice) => voice.get_handle().await,
            None => None,
        },
        None => None,
    };

    // Create shutdown channel and spawn the signal handler task
    let (shutdown_send, mut shutdown_recv) = oneshot::channel();
    let shutdown_components = Arc::clone(&component_manager);
    let shutdown_assistant = assistant.clone();
    tokio::spawn(async move {
        shutdown::handle_signals(shutdown_send, shutdown_components, shutdown_assistant).await;
    });

    let mut console = Console {
        assistant: assistant.clone(),
        voice,
        utterance_tx,
        config: Arc::clone(&config),
        printed: 0,
    };

    // Show the greeting the assistant seeded into the transcript
    console.print_new_messages().await;
    println!("Type a request, or /help for commands.");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            _ = &mut shutdown_recv => {
                info!("Received shutdown signal, exiting");
                return Ok(());
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        if !console.handle_line(line.trim()).await {
                            break;
                        }
                    }
                    // Stdin closed
                    Ok(None) => break,
                    Err(e) => {
                        error!("Failed to read input: {}", e);
                        break;
                    }
                }
            }
        }
    }

    // Console exit: shut everything down ourselves
    if let Err(e) = component_manager.shutdown_all().await {
        error!("Error shutting down components: {:?}", e);
    }
    if let Err(e) = assistant.shutdown().await {
        error!("Error shutting down assistant actor: {:?}", e);
    }

    Ok(())
}

/// Line-oriented front-end over the pipeline; purely presentational
struct Console {
    assistant: AssistantHandle,
    voice: Option<VoiceHandle>,
    utterance_tx: mpsc::Sender<TranscriptEvent>,
    config: Arc<RwLock<Config>>,
    printed: usize,
}

impl Console {
    /// Handle one input line; returns false when the user quits
    async fn handle_line(&mut self, line: &str) -> bool {
        match line {
            "" => return true,
            "/quit" | "/exit" => return false,
            "/help" => {
                println!("/listen            start voice listening");
                println!("/stop              stop voice listening");
                println!("/status            show voice status");
                println!("/say <utterance>   feed a finalized utterance to the voice pipeline");
                println!("/events            list calendar events");
                println!("/trigger <phrase>  change the voice trigger phrase");
                println!("/summary-time <HH:MM>  change the daily summary time");
                println!("/summary on|off    enable or disable the daily summary");
                println!("/quit              exit");
                println!("Anything else is sent to the assistant as a request.");
            }
            "/listen" => {
                if let Some(voice) = &self.voice {
                    if let Err(e) = voice.start_listening().await {
                        warn!("Failed to start listening: {}", e);
                    }
                    self.print_voice_status().await;
                }
            }
            "/stop" => {
                if let Some(voice) = &self.voice {
                    if let Err(e) = voice.stop_listening().await {
                        warn!("Failed to stop listening: {}", e);
                    }
                    self.print_voice_status().await;
                }
            }
            "/status" => self.print_voice_status().await,
            "/events" => {
                match self.assistant.events().await {
                    Ok(events) if events.is_empty() => println!("No events in the calendar."),
                    Ok(events) => {
                        for event in events {
                            println!("{} {}", event.date, event.format_line());
                        }
                    }
                    Err(e) => warn!("Failed to fetch events: {}", e),
                }
            }
            _ => {
                if let Some(utterance) = line.strip_prefix("/say ") {
                    let _ = self
                        .utterance_tx
                        .send(TranscriptEvent::Utterance(utterance.to_string()))
                        .await;
                    self.print_voice_status().await;
                } else if let Some(rest) = line.strip_prefix('/') {
                    if !self.handle_settings(rest).await {
                        println!("Unknown command; /help lists the options.");
                        return true;
                    }
                } else if !self.assistant.try_submit(line, None) {
                    println!("The assistant is busy, try again in a moment.");
                }
            }
        }

        self.print_new_messages().await;
        true
    }

    /// Apply a settings command; returns false for unrecognized commands
    async fn handle_settings(&self, command: &str) -> bool {
        let update = if let Some(phrase) = command.strip_prefix("trigger ") {
            SettingsUpdate {
                trigger_word: Some(phrase.to_string()),
                ..Default::default()
            }
        } else if let Some(time) = command.strip_prefix("summary-time ") {
            SettingsUpdate {
                summary_time: Some(time.to_string()),
                ..Default::default()
            }
        } else if let Some(flag) = command.strip_prefix("summary ") {
            match flag {
                "on" => SettingsUpdate {
                    summary_enabled: Some(true),
                    ..Default::default()
                },
                "off" => SettingsUpdate {
                    summary_enabled: Some(false),
                    ..Default::default()
                },
                _ => return false,
            }
        } else {
            return false;
        };

        let mut config = self.config.write().await;
        match config.apply_update(update) {
            Ok(()) => {
                if let Err(e) = config.save_settings() {
                    warn!("Failed to persist settings: {}", e);
                }
                println!(
                    "Settings updated: trigger \"{}\", summary {} at {}.",
                    config.trigger_word,
                    if config.summary_enabled { "on" } else { "off" },
                    config.summary_time
                );
            }
            Err(e) => println!("{}", e),
        }

        true
    }

    /// Print the current voice status line
    async fn print_voice_status(&self) {
        if let Some(voice) = &self.voice {
            if let Ok(status) = voice.status().await {
                println!("(voice) {}", status);
            }
        } else {
            println!("(voice) Voice commands are unavailable.");
        }
    }

    /// Print transcript messages appended since the last poll.
    ///
    /// The assistant mailbox serializes this query behind any in-flight
    /// dispatch, so a submit followed by this call observes the reply.
    async fn print_new_messages(&mut self) {
        if let Ok(messages) = self.assistant.messages_since(self.printed).await {
            for message in &messages {
                let tag = match message.sender {
                    Sender::User => "you",
                    Sender::Assistant => "assistant",
                    Sender::System => "system",
                };
                println!("[{}] {}", tag, message.text);
            }
            self.printed += messages.len();
        }
    }
}
