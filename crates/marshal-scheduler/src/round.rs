//! The per-round cancellation signal. Iterators that read from the job store check it once per
//! pull and turn it into an error; nothing is ever interrupted mid-pull.

use derive_more::{Display, Error};
use slog::Logger;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Why a scheduling round stopped early.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum RoundCancelled {
    #[display("scheduling round cancelled")]
    Cancelled,
    #[display("scheduling round deadline exceeded")]
    DeadlineExceeded,
}

/// Ambient state for one scheduling round: its cancellation token, optional deadline, and logger.
/// Clones share the same token.
#[derive(Clone, Debug)]
pub struct RoundContext {
    token: CancellationToken,
    deadline: Option<Instant>,
    log: Logger,
}

impl RoundContext {
    pub fn new(log: Logger) -> Self {
        RoundContext {
            token: CancellationToken::new(),
            deadline: None,
            log,
        }
    }

    /// Use `token` as this round's cancellation signal, for example a child of a process-wide
    /// shutdown token.
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn log(&self) -> &Logger {
        &self.log
    }

    /// `None` while the round may continue. Explicit cancellation wins over an expired deadline.
    pub fn err(&self) -> Option<RoundCancelled> {
        if self.token.is_cancelled() {
            Some(RoundCancelled::Cancelled)
        } else if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            Some(RoundCancelled::DeadlineExceeded)
        } else {
            None
        }
    }
}
