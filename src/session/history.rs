use crate::session::result::ScoredEvent;

/// Ordered list of events scored during this session.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<ScoredEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: ScoredEvent) {
        self.events.push(event);
    }

    /// Remove every event, returning how many were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.events.len();
        self.events.clear();
        count
    }

    pub fn remove(&mut self, index: usize) -> Option<ScoredEvent> {
        if index < self.events.len() {
            Some(self.events.remove(index))
        } else {
            None
        }
    }

    pub fn pop(&mut self) -> Option<ScoredEvent> {
        self.events.pop()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> Option<&ScoredEvent> {
        self.events.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoredEvent> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[ScoredEvent] {
        &self.events
    }

    pub fn max_score(&self) -> Option<f64> {
        self.events.iter().map(|e| e.score).reduce(f64::max)
    }
}
