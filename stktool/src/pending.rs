//! Shared holder for a responder that several widgets may answer

use std::cell::RefCell;
use std::rc::Rc;

use stktool_agent::request::{Abort, Responder};

/// A responder shared between the buttons of one page or dialog
///
/// Whichever widget answers first consumes the responder; later answers are
/// ignored. Dropping every clone unanswered drops the responder, which the
/// agent reports to ofono as `EndSession`.
pub struct PendingReply<T>(Rc<RefCell<Option<Responder<T>>>>);

impl<T> Clone for PendingReply<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> PendingReply<T> {
    pub fn new(responder: Responder<T>) -> Self {
        Self(Rc::new(RefCell::new(Some(responder))))
    }

    /// Answer with a value; returns false if already answered
    pub fn reply(&self, value: T) -> bool {
        let responder = self.0.borrow_mut().take();
        match responder {
            Some(responder) => {
                responder.reply(value);
                true
            }
            None => false,
        }
    }

    /// Decline; returns false if already answered
    pub fn abort(&self, reason: Abort) -> bool {
        let responder = self.0.borrow_mut().take();
        match responder {
            Some(responder) => {
                responder.abort(reason);
                true
            }
            None => false,
        }
    }

    /// Decline with `EndSession` and run `on_ended` if this was the answer
    pub fn end_session(&self, on_ended: impl FnOnce()) -> bool {
        let ended = self.abort(Abort::EndSession);
        if ended {
            on_ended();
        }
        ended
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_only_first_answer_counts() {
        let (responder, rx) = Responder::channel();
        let pending = PendingReply::new(responder);
        let other = pending.clone();

        assert!(pending.reply(true));
        assert!(!other.reply(false));
        assert!(!other.abort(Abort::GoBack));
        assert_eq!(rx.await.unwrap(), Ok(true));
    }

    #[tokio::test]
    async fn test_end_session_runs_once() {
        let (responder, rx) = Responder::<u8>::channel();
        let pending = PendingReply::new(responder);
        let ended = std::cell::Cell::new(0);

        assert!(pending.end_session(|| ended.set(ended.get() + 1)));
        assert!(!pending.clone().end_session(|| ended.set(ended.get() + 1)));
        assert_eq!(ended.get(), 1);
        assert_eq!(rx.await.unwrap(), Err(Abort::EndSession));
    }

    #[tokio::test]
    async fn test_end_session_after_reply_does_nothing() {
        let (responder, rx) = Responder::<u8>::channel();
        let pending = PendingReply::new(responder);
        let mut ended = false;

        assert!(pending.reply(3));
        assert!(!pending.end_session(|| ended = true));
        assert!(!ended);
        assert_eq!(rx.await.unwrap(), Ok(3));
    }

    #[tokio::test]
    async fn test_dropping_all_clones_drops_responder() {
        let (responder, rx) = Responder::<()>::channel();
        let pending = PendingReply::new(responder);
        let other = pending.clone();
        drop(pending);
        drop(other);
        assert!(rx.await.is_err());
    }
}
