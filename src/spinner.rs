//! Terminal status indicator shown while a request is in flight.

use std::io::Write;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Braille spinner frames.
const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Frame interval.
const INTERVAL: Duration = Duration::from_millis(80);

/// A spinner drawn on stderr by a background task, so stdout only ever
/// carries results.
///
/// Must be started inside a Tokio runtime.
pub struct Spinner {
    handle: JoinHandle<()>,
    cancel: watch::Sender<bool>,
}

impl Spinner {
    /// Start a spinner next to the given status text.
    pub fn start(status: &str) -> Self {
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let status = status.to_string();

        let handle = tokio::spawn(async move {
            let mut i = 0;
            loop {
                let frame = FRAMES[i % FRAMES.len()];
                // \x1b[2K clears the line, \r returns to its start
                eprint!("\x1b[2K\r{frame} {status}");
                let _ = std::io::stderr().flush();

                tokio::select! {
                    _ = tokio::time::sleep(INTERVAL) => {}
                    _ = cancel_rx.changed() => break,
                }
                i += 1;
            }
            eprint!("\x1b[2K\r");
            let _ = std::io::stderr().flush();
        });

        Self {
            handle,
            cancel: cancel_tx,
        }
    }

    /// Tell the spinner to clear its line and exit. Does not wait.
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }

    /// Cancel and wait until the line is cleared.
    pub async fn stop(self) {
        self.cancel();
        let _ = self.handle.await;
    }
}
