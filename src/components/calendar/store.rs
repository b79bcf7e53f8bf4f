use super::models::CalendarEvent;

/// In-memory ordered collection of calendar events.
///
/// Events are kept in insertion order; queries never re-sort. The store is
/// the sole owner of event data for the lifetime of the process.
#[derive(Debug, Default)]
pub struct CalendarStore {
    events: Vec<CalendarEvent>,
}

impl CalendarStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event to the store
    pub fn add(&mut self, event: CalendarEvent) {
        self.events.push(event);
    }

    /// All events, in insertion order
    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    /// Events whose date key equals the given key exactly, in insertion order
    pub fn events_for_date(&self, date: &str) -> Vec<CalendarEvent> {
        self.events
            .iter()
            .filter(|e| e.date == date)
            .cloned()
            .collect()
    }

    /// Remove an event by identifier, returning it if it existed
    pub fn remove(&mut self, id: &str) -> Option<CalendarEvent> {
        let index = self.events.iter().position(|e| e.id == id)?;
        Some(self.events.remove(index))
    }

    /// Number of stored events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the store holds no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
