use chrono::{DateTime, Local};
use lazy_static::lazy_static;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::components::assistant::AssistantHandle;
use crate::config::Config;
use crate::utils::time::{date_key, minute_matches};

lazy_static! {
    static ref SCHEDULER_TASK_RUNNING: AtomicBool = AtomicBool::new(false);
}

/// Whether a summary should fire at the given instant under the given config
pub fn should_fire(now: &DateTime<Local>, config: &Config) -> bool {
    config.summary_enabled && minute_matches(now, &config.summary_time)
}

/// Run one scheduler check against a fresh config snapshot.
///
/// Returns true when a summary request was accepted by the pipeline. A busy
/// pipeline skips the request; the next tick is an idempotent no-op unless
/// the minute still matches.
pub async fn check_and_fire(
    now: &DateTime<Local>,
    config: &Arc<RwLock<Config>>,
    assistant: &AssistantHandle,
) -> bool {
    // Re-read settings every tick so changes take effect on the next check
    let snapshot = {
        let config_read = config.read().await;
        config_read.clone()
    };

    if !should_fire(now, &snapshot) {
        return false;
    }

    let today = date_key(now);
    info!("Daily summary time reached, requesting summary for {}", today);

    let accepted = assistant.try_submit_summary(&today);
    if !accepted {
        debug!("Daily summary request dropped, pipeline busy");
    }
    accepted
}

/// Start the daily summary scheduler.
///
/// One scheduler task per process; a second start is refused. The tick
/// period equals the match granularity (one check per minute), so at most
/// one firing occurs per matching minute without any last-fired marker.
pub fn start_scheduler(
    config: Arc<RwLock<Config>>,
    assistant: AssistantHandle,
) -> Option<JoinHandle<()>> {
    if SCHEDULER_TASK_RUNNING.swap(true, Ordering::SeqCst) {
        warn!("Daily summary scheduler is already running, skipping initialization");
        return None;
    }

    info!("Starting daily summary scheduler");

    Some(tokio::spawn(async move {
        run_scheduler_loop(config, assistant).await;
    }))
}

/// Release the single-instance guard after the scheduler task ends
pub fn mark_stopped() {
    SCHEDULER_TASK_RUNNING.store(false, Ordering::SeqCst);
}

/// Main scheduler loop: one wall-clock check per minute
async fn run_scheduler_loop(config: Arc<RwLock<Config>>, assistant: AssistantHandle) {
    let mut ticker = interval(Duration::from_secs(60));
    // A delayed tick must not bunch up with the next one, or a single minute
    // could be checked twice
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let now = Local::now();
        check_and_fire(&now, &config, &assistant).await;
    }
}
