//! Terminal input on a dedicated thread.
//!
//! rustyline blocks, so it runs on its own OS thread and hands completed
//! lines and keystroke signals to the async side through channels.

use rustyline::{
    Cmd, ConditionalEventHandler, DefaultEditor, Event, EventContext, EventHandler, KeyCode,
    KeyEvent, RepeatCount, error::ReadlineError,
};
use tokio::sync::mpsc;

use crate::typing::InputSignal;

/// Receivers fed by the input thread
pub struct InputChannels {
    /// Completed, non-empty lines
    pub lines: mpsc::UnboundedReceiver<String>,
    /// Keystroke / submit signals for the typing notifier
    pub signals: mpsc::UnboundedReceiver<InputSignal>,
}

/// Reports every key press except Enter, then lets rustyline handle it
struct KeystrokeHandler {
    signals: mpsc::UnboundedSender<InputSignal>,
}

impl ConditionalEventHandler for KeystrokeHandler {
    fn handle(
        &self,
        evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        _ctx: &EventContext,
    ) -> Option<Cmd> {
        let is_enter = matches!(evt.get(0), Some(KeyEvent(KeyCode::Enter, _)));
        if !is_enter {
            let _ = self.signals.send(InputSignal::Keystroke);
        }
        None
    }
}

/// Spawn the readline thread for `user`.
///
/// The thread ends on Ctrl+C, Ctrl+D or when the receivers are dropped.
pub fn spawn_input_thread(user: &str) -> InputChannels {
    let (line_tx, line_rx) = mpsc::unbounded_channel::<String>();
    let (signal_tx, signal_rx) = mpsc::unbounded_channel::<InputSignal>();
    let prompt = format!("{}> ", user);

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };
        rl.bind_sequence(
            Event::Any,
            EventHandler::Conditional(Box::new(KeystrokeHandler {
                signals: signal_tx.clone(),
            })),
        );

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line).ok();
                    let _ = signal_tx.send(InputSignal::Submitted);
                    if line_tx.send(line.to_string()).is_err() {
                        // Channel closed, exit thread
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    InputChannels {
        lines: line_rx,
        signals: signal_rx,
    }
}
