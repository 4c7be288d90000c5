//! Typing presence on the client side.
//!
//! `TypingUsers` mirrors who the server says is typing. `TypingNotifier`
//! turns local keystrokes into `isTyping` transitions: the first keystroke
//! after an idle period starts typing, and `idle_timeout` without input stops
//! it. Submitting a line resets the state silently; the server's own expiry
//! clears the indicator on the peers.

use std::{collections::BTreeSet, time::Duration};

use buzz_server::infrastructure::dto::websocket::TypingData;
use tokio::{sync::mpsc, time::Instant};

/// Idle period after the last keystroke before typing is reported as stopped
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_millis(2000);

/// Set of remote users currently typing
#[derive(Debug)]
pub struct TypingUsers {
    local_user: String,
    users: BTreeSet<String>,
}

impl TypingUsers {
    pub fn new(local_user: impl Into<String>) -> Self {
        Self {
            local_user: local_user.into(),
            users: BTreeSet::new(),
        }
    }

    /// Apply a typing event; returns `true` if the visible set changed.
    pub fn apply(&mut self, event: &TypingData) -> bool {
        if event.user == self.local_user {
            return false;
        }
        if event.is_typing {
            self.users.insert(event.user.clone())
        } else {
            self.users.remove(&event.user)
        }
    }

    /// Remote typists in name order
    pub fn visible(&self) -> Vec<&str> {
        self.users.iter().map(String::as_str).collect()
    }
}

/// Local input observed by the notifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSignal {
    Keystroke,
    Submitted,
}

/// Idle-timer state machine for the local user's typing status
#[derive(Debug)]
pub struct TypingNotifier {
    idle_timeout: Duration,
    typing: bool,
    deadline: Option<Instant>,
}

impl TypingNotifier {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            idle_timeout,
            typing: false,
            deadline: None,
        }
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `Some(true)` when this keystroke starts typing.
    pub fn on_keystroke(&mut self, now: Instant) -> Option<bool> {
        self.deadline = Some(now + self.idle_timeout);
        if self.typing {
            return None;
        }
        self.typing = true;
        Some(true)
    }

    pub fn on_submit(&mut self) {
        self.typing = false;
        self.deadline = None;
    }

    /// Returns `Some(false)` once the idle deadline has passed while typing.
    pub fn poll_idle(&mut self, now: Instant) -> Option<bool> {
        match self.deadline {
            Some(deadline) if self.typing && now >= deadline => {
                self.typing = false;
                self.deadline = None;
                Some(false)
            }
            _ => None,
        }
    }
}

/// Drive a `TypingNotifier` from input signals, emitting each transition.
///
/// Ends when either channel closes.
pub async fn run_typing_notifier(
    mut notifier: TypingNotifier,
    mut signals: mpsc::UnboundedReceiver<InputSignal>,
    transitions: mpsc::UnboundedSender<bool>,
) {
    loop {
        let deadline = notifier.deadline();
        let idle = async move {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        let transition = tokio::select! {
            signal = signals.recv() => match signal {
                Some(InputSignal::Keystroke) => notifier.on_keystroke(Instant::now()),
                Some(InputSignal::Submitted) => {
                    notifier.on_submit();
                    None
                }
                None => break,
            },
            _ = idle => notifier.poll_idle(Instant::now()),
        };

        if let Some(is_typing) = transition
            && transitions.send(is_typing).is_err()
        {
            break;
        }
    }
}
