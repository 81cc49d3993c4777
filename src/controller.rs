//! One interpret round-trip per trigger: busy on entry, result or error
//! into the output field, idle again on every exit path.
//!
//! Overlapping submissions are not serialized. Each one writes to the
//! output field when it settles, so the last to settle wins, and the first
//! to settle re-enables the trigger while the others are still in flight.
//! The disabled trigger is the only guard against overlap.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::task::JoinHandle;

use crate::consts::WORKING_STATUS;
use crate::interpreter::{InterpretRequest, Interpreter};
use crate::ui::{BusySignal, OutputSink};

/// Raw script text. Forwarded as-is, empty included.
pub type ScriptInput = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    InFlight,
}

/// Drives interpret requests against injected collaborators.
pub struct InterpretRequestController {
    interpreter: Arc<dyn Interpreter>,
    busy: Arc<dyn BusySignal>,
    output: Arc<dyn OutputSink>,
    in_flight: Arc<AtomicBool>,
}

impl InterpretRequestController {
    pub fn new(
        interpreter: Arc<dyn Interpreter>,
        busy: Arc<dyn BusySignal>,
        output: Arc<dyn OutputSink>,
    ) -> Self {
        Self {
            interpreter,
            busy,
            output,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> RequestState {
        if self.in_flight.load(Ordering::SeqCst) {
            RequestState::InFlight
        } else {
            RequestState::Idle
        }
    }

    /// Run one round-trip and wait for it to settle.
    ///
    /// Effects are only visible through the busy signal and the output
    /// sink. Dropping the future before it settles still restores idle.
    pub async fn submit(&self, input: impl Into<ScriptInput>) {
        let guard = self.enter();
        self.run(input.into(), guard).await;
    }

    /// Fire-and-forget form of [`submit`](Self::submit). The busy state is
    /// entered before this returns; the request runs on a Tokio task.
    pub fn spawn_submit(self: &Arc<Self>, input: impl Into<ScriptInput>) -> JoinHandle<()> {
        let guard = self.enter();
        let input = input.into();
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.run(input, guard).await })
    }

    fn enter(&self) -> IdleGuard {
        self.in_flight.store(true, Ordering::SeqCst);
        self.busy.set_busy(WORKING_STATUS);
        IdleGuard {
            busy: Arc::clone(&self.busy),
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    async fn run(&self, input: ScriptInput, _guard: IdleGuard) {
        let request = InterpretRequest::new(input);
        tracing::debug!(bytes = request.input.len(), "interpret request dispatched");

        match self.interpreter.interpret(&request).await {
            Ok(result) => self.output.write(&result.result),
            Err(e) => {
                tracing::debug!(error = %e, "interpret request failed");
                self.output.write(&e.to_string());
            }
        }
    }
}

/// Returns the controller to idle when dropped. Runs exactly once per
/// submission, whether it settled, failed, panicked, or was abandoned.
struct IdleGuard {
    busy: Arc<dyn BusySignal>,
    in_flight: Arc<AtomicBool>,
}

impl Drop for IdleGuard {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::SeqCst);
        self.busy.set_idle();
        tracing::debug!("interpret request settled");
    }
}
