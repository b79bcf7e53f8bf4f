use tracing::{info, warn};

/// Collaborator interface for the app-open side effect.
///
/// Fire-and-forget: the pipeline never consumes a return value, failures are
/// only logged.
pub trait AppLauncher: Send + Sync {
    fn open(&self, app_name: &str);
}

/// Opens applications by navigating to their URL scheme
#[derive(Debug, Default)]
pub struct SchemeLauncher;

impl AppLauncher for SchemeLauncher {
    fn open(&self, app_name: &str) {
        let url = format!("{}://", app_name);
        info!("Opening app scheme {}", url);

        if let Err(e) = webbrowser::open(&url) {
            warn!("Failed to open {}: {}", url, e);
        }
    }
}
