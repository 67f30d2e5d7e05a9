//! Line-based command prompt for the interactive result page.

use std::io::{self, BufRead};
use std::thread;

use tokio::sync::mpsc;

use crate::results::Command;

/// Read commands from stdin on a dedicated thread.
///
/// The thread is never joined: a read blocked on the terminal must not keep the
/// process alive after the page quits.
pub fn spawn_stdin_prompt(tx: mpsc::Sender<Command>) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("vidinsight-prompt".to_string())
        .spawn(move || forward_commands(io::stdin().lock(), &tx))
}

/// Forward recognised lines to `tx`.
///
/// Stops after sending `Quit`, when the page stops listening, or at end of input
/// (which is sent as `Quit`). Must not be called from async context.
pub fn forward_commands<R: BufRead>(reader: R, tx: &mpsc::Sender<Command>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read from stdin");
                return;
            }
        };

        match Command::parse(&line) {
            Some(command) => {
                let quit = command == Command::Quit;
                if tx.blocking_send(command).is_err() || quit {
                    return;
                }
            }
            None if line.trim().is_empty() => {}
            None => eprintln!("Unknown command: {}", line.trim()),
        }
    }

    let _ = tx.blocking_send(Command::Quit);
}
