pub mod models;
pub mod store;

pub use models::{CalendarEvent, ImageAttachment};
pub use store::CalendarStore;
