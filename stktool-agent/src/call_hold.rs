//! Call hold for looping tones
//!
//! When the user chooses to wait on a looping tone, the pending `LoopTone`
//! reply is held until a voice call is added or the hold times out. At most
//! one hold exists; starting a new one cancels the previous hold.

use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// How a hold ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldOutcome {
    /// A voice call was added while holding
    CallStarted,
    /// The hold ran out
    TimedOut,
    /// A newer hold replaced this one, or the hold was cancelled
    Superseded,
}

struct PendingHold {
    release: oneshot::Sender<()>,
    cancel: CancellationToken,
}

#[derive(Default)]
pub struct CallHold {
    pending: Mutex<Option<PendingHold>>,
}

impl CallHold {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until a call is added, `timeout` elapses or a newer hold starts
    pub async fn hold(&self, timeout: Duration) -> HoldOutcome {
        let (release, released) = oneshot::channel();
        let cancel = CancellationToken::new();

        let previous = self.lock().replace(PendingHold {
            release,
            cancel: cancel.clone(),
        });
        if let Some(previous) = previous {
            tracing::debug!("Superseding pending call hold");
            previous.cancel.cancel();
        }

        let outcome = tokio::select! {
            _ = cancel.cancelled() => HoldOutcome::Superseded,
            result = released => match result {
                Ok(()) => HoldOutcome::CallStarted,
                // Sender dropped without release: only happens when superseded
                Err(_) => HoldOutcome::Superseded,
            },
            _ = tokio::time::sleep(timeout) => HoldOutcome::TimedOut,
        };

        if outcome == HoldOutcome::TimedOut {
            let mut pending = self.lock();
            if pending.as_ref().is_some_and(|p| p.cancel.is_cancelled() || p.release.is_closed()) {
                *pending = None;
            }
        }

        tracing::debug!("Call hold ended: {:?}", outcome);
        outcome
    }

    /// Release the pending hold because a call was added
    ///
    /// Returns whether a hold was pending.
    pub fn release(&self) -> bool {
        match self.lock().take() {
            Some(pending) => pending.release.send(()).is_ok(),
            None => false,
        }
    }

    /// End the pending hold without a call, e.g. when ofono cancels the prompt
    ///
    /// Returns whether a hold was pending.
    pub fn cancel(&self) -> bool {
        match self.lock().take() {
            Some(pending) => {
                pending.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Whether a hold is currently waiting
    pub fn is_pending(&self) -> bool {
        self.lock()
            .as_ref()
            .is_some_and(|p| !p.release.is_closed() && !p.cancel.is_cancelled())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<PendingHold>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}
