//! Requests the agent hands to the front-end
//!
//! Every prompt ofono sends to the agent becomes one [`AgentRequest`]. Prompts
//! that expect an answer carry a [`Responder`], a one-shot continuation the
//! front-end consumes exactly once with either a value or an [`Abort`].

use tokio::sync::oneshot;

use crate::tone::Tone;
use crate::MenuItem;

/// Ways the user can decline a prompt, mapped to ofono error names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Abort {
    /// `org.ofono.Error.GoBack`
    GoBack,
    /// `org.ofono.Error.EndSession`
    EndSession,
    /// `org.ofono.Error.Busy`
    Busy,
}

/// One-shot continuation for a pending agent call
#[derive(Debug)]
pub struct Responder<T> {
    tx: oneshot::Sender<Result<T, Abort>>,
}

impl<T> Responder<T> {
    /// Create a responder and the receiver the agent awaits
    pub fn channel() -> (Self, oneshot::Receiver<Result<T, Abort>>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Answer the pending call
    pub fn reply(self, value: T) {
        if self.tx.send(Ok(value)).is_err() {
            tracing::debug!("Agent call was gone before the reply was sent");
        }
    }

    /// Decline the pending call
    pub fn abort(self, reason: Abort) {
        if self.tx.send(Err(reason)).is_err() {
            tracing::debug!("Agent call was gone before the abort was sent");
        }
    }
}

/// Kind of free-text entry ofono asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Digits,
}

impl InputKind {
    /// Whether `c` may be typed into an entry of this kind
    pub fn accepts(self, c: char) -> bool {
        match self {
            InputKind::Text => true,
            InputKind::Digits => c.is_ascii_digit() || matches!(c, '*' | '#' | '+'),
        }
    }
}

/// Constraints for a `RequestInput`/`RequestDigits` prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
    pub kind: InputKind,
    pub default: String,
    pub min_chars: u8,
    pub max_chars: u8,
    pub hide_typing: bool,
}

impl InputSpec {
    /// Whether `text` would be an acceptable answer
    pub fn is_valid(&self, text: &str) -> bool {
        let len = text.chars().count();
        len >= self.min_chars as usize
            && (self.max_chars == 0 || len <= self.max_chars as usize)
            && text.chars().all(|c| self.kind.accepts(c))
    }
}

/// Which confirmation ofono asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmKind {
    /// `RequestConfirmation`
    Generic,
    /// `ConfirmCallSetup`
    CallSetup,
    /// `ConfirmLaunchBrowser`
    LaunchBrowser { url: String },
    /// `ConfirmOpenChannel`
    OpenChannel,
}

/// How the user left a looping tone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopToneChoice {
    /// Stop the tone and answer right away
    End,
    /// Keep the session on hold until a call starts or the hold times out
    Wait,
}

/// A prompt for the front-end to render
#[derive(Debug)]
pub enum AgentRequest {
    /// ofono released the agent
    Release,
    /// ofono cancelled whatever is on screen
    Cancel,
    Selection {
        title: String,
        items: Vec<MenuItem>,
        default: Option<usize>,
        responder: Responder<u8>,
    },
    DisplayText {
        text: String,
        urgent: bool,
        responder: Responder<()>,
    },
    Input {
        title: String,
        spec: InputSpec,
        responder: Responder<String>,
    },
    Key {
        title: String,
        kind: InputKind,
        responder: Responder<String>,
    },
    Confirm {
        title: String,
        body: Option<String>,
        kind: ConfirmKind,
        responder: Responder<bool>,
    },
    PlayTone {
        tone: Tone,
        text: String,
        responder: Responder<()>,
    },
    LoopTone {
        tone: Tone,
        text: String,
        responder: Responder<LoopToneChoice>,
    },
    ActionInformation {
        text: String,
    },
    Action {
        text: String,
        responder: Responder<()>,
    },
}

impl AgentRequest {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            AgentRequest::Release => "Release",
            AgentRequest::Cancel => "Cancel",
            AgentRequest::Selection { .. } => "Selection",
            AgentRequest::DisplayText { .. } => "DisplayText",
            AgentRequest::Input { .. } => "Input",
            AgentRequest::Key { .. } => "Key",
            AgentRequest::Confirm { .. } => "Confirm",
            AgentRequest::PlayTone { .. } => "PlayTone",
            AgentRequest::LoopTone { .. } => "LoopTone",
            AgentRequest::ActionInformation { .. } => "ActionInformation",
            AgentRequest::Action { .. } => "Action",
        }
    }
}
