//! Line input read on a plain OS thread.
//!
//! A blocking read on the Tokio blocking pool cannot be cancelled, and the
//! runtime waits for it on shutdown. A detached thread does not hold the
//! process open, so the REPL can exit while a read is pending.

use std::io::{self, BufRead};
use std::thread;

use tokio::sync::mpsc;

/// Start forwarding lines from `reader`. The channel closes at EOF, after a
/// read error (which is sent first), or once the receiver is dropped.
pub fn spawn_line_reader<R>(reader: R) -> mpsc::UnboundedReceiver<io::Result<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        for line in reader.lines() {
            let failed = line.is_err();
            if tx.send(line).is_err() || failed {
                break;
            }
        }
    });
    rx
}

/// Lines from stdin.
pub fn stdin_lines() -> mpsc::UnboundedReceiver<io::Result<String>> {
    spawn_line_reader(io::BufReader::new(io::stdin()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::time::Duration;

    #[tokio::test]
    async fn forwards_lines_then_closes() {
        let mut rx = spawn_line_reader(Cursor::new("1+1\n\nprint(x)"));
        assert_eq!(rx.recv().await.unwrap().unwrap(), "1+1");
        assert_eq!(rx.recv().await.unwrap().unwrap(), "");
        assert_eq!(rx.recv().await.unwrap().unwrap(), "print(x)");
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn read_error_is_forwarded_then_closes() {
        struct Broken;
        impl io::Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("stdin gone"))
            }
        }

        let mut rx = spawn_line_reader(io::BufReader::new(Broken));
        let err = rx.recv().await.unwrap().unwrap_err();
        assert_eq!(err.to_string(), "stdin gone");
        assert!(rx.recv().await.is_none());
    }

    /// A reader that never returns, standing in for an idle terminal.
    struct Stalled;
    impl io::Read for Stalled {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            loop {
                thread::park();
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn pending_read_does_not_block_runtime_shutdown() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let (done_tx, done_rx) = std::sync::mpsc::channel();

        thread::spawn(move || {
            runtime.block_on(async {
                let mut rx = spawn_line_reader(io::BufReader::new(Stalled));
                tokio::select! {
                    _ = rx.recv() => {}
                    _ = tokio::time::sleep(Duration::from_millis(20)) => {}
                }
            });
            drop(runtime);
            let _ = done_tx.send(());
        });

        let finished = tokio::task::spawn_blocking(move || {
            done_rx.recv_timeout(Duration::from_secs(2)).is_ok()
        })
        .await
        .unwrap();
        assert!(finished, "runtime shutdown waited on a pending read");
    }
}
