//! Terminal renditions of the busy signal and the output field.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{BusySignal, OutputSink};
use crate::spinner::Spinner;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shows a spinner with the status text while busy.
///
/// Stopping is split in two: [`set_idle`](BusySignal::set_idle) is
/// synchronous and only cancels, [`settle`](Self::settle) waits for the
/// spinner line to be cleared. Call `settle` before drawing the next prompt.
#[derive(Default)]
pub struct SpinnerSignal {
    active: Mutex<Option<Spinner>>,
    retired: Mutex<Vec<Spinner>>,
}

impl SpinnerSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        lock(&self.active).is_some()
    }

    fn retire_active(&self) {
        if let Some(spinner) = lock(&self.active).take() {
            spinner.cancel();
            lock(&self.retired).push(spinner);
        }
    }

    /// Wait until every cancelled spinner has cleared its line.
    pub async fn settle(&self) {
        let retired: Vec<Spinner> = lock(&self.retired).drain(..).collect();
        for spinner in retired {
            spinner.stop().await;
        }
    }
}

impl BusySignal for SpinnerSignal {
    fn set_busy(&self, status: &str) {
        self.retire_active();
        *lock(&self.active) = Some(Spinner::start(status));
    }

    fn set_idle(&self) {
        self.retire_active();
    }
}

/// Prints each result to stdout verbatim, ending on a fresh line.
#[derive(Debug, Default)]
pub struct TerminalOutput;

impl OutputSink for TerminalOutput {
    fn write(&self, text: &str) {
        if text.ends_with('\n') {
            print!("{text}");
        } else {
            println!("{text}");
        }
    }
}
