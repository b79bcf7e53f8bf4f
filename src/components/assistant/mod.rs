mod actor;
mod handle;
pub mod launcher;

pub use handle::AssistantHandle;
pub use launcher::{AppLauncher, SchemeLauncher};
