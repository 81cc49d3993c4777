//! In-memory collaborators that record what the controller did.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{BusySignal, OutputSink};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One observed busy/idle transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalEvent {
    Busy(String),
    Idle,
}

/// Records every busy/idle instruction in order.
#[derive(Debug, Default)]
pub struct CapturedSignal {
    events: Mutex<Vec<SignalEvent>>,
}

impl CapturedSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SignalEvent> {
        lock(&self.events).clone()
    }

    /// Whether the trigger is currently disabled.
    pub fn is_busy(&self) -> bool {
        matches!(lock(&self.events).last(), Some(SignalEvent::Busy(_)))
    }

    pub fn idle_count(&self) -> usize {
        lock(&self.events)
            .iter()
            .filter(|e| **e == SignalEvent::Idle)
            .count()
    }
}

impl BusySignal for CapturedSignal {
    fn set_busy(&self, status: &str) {
        lock(&self.events).push(SignalEvent::Busy(status.to_string()));
    }

    fn set_idle(&self) {
        lock(&self.events).push(SignalEvent::Idle);
    }
}

/// Records every write to the output field.
#[derive(Debug, Default)]
pub struct CapturedOutput {
    writes: Mutex<Vec<String>>,
}

impl CapturedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> Vec<String> {
        lock(&self.writes).clone()
    }

    /// What the output field shows now.
    pub fn last(&self) -> Option<String> {
        lock(&self.writes).last().cloned()
    }
}

impl OutputSink for CapturedOutput {
    fn write(&self, text: &str) {
        lock(&self.writes).push(text.to_string());
    }
}
