use herald_events::event_map;
use parking_lot::Mutex;
use std::sync::Arc;

event_map! {
    /// Events shared by the integration suites.
    pub TestEvents {
        CaseOne = "case-one" => (String,),
        CaseTwo = "case-two" => (String, String),
        CaseThree = "case-three" => (String, bool),
    }
}

/// Shared call log that listeners append to.
#[derive(Debug, Clone, Default)]
pub struct Calls(Arc<Mutex<Vec<String>>>);

impl Calls {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.0.lock().push(entry.into());
    }

    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    #[must_use]
    pub fn count(&self, entry: &str) -> usize {
        self.0.lock().iter().filter(|e| e.as_str() == entry).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }
}
