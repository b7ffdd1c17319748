//! `org.ofono.SimToolkitAgent` implementation
//!
//! ofono calls into this object whenever the SIM wants something shown or
//! asked. Each method forwards one [`AgentRequest`] to the front-end and awaits
//! the user's answer through the request's [`Responder`]. A call always ends
//! in exactly one reply or one error: a responder that is dropped unanswered
//! is reported as `EndSession`.

use std::sync::Arc;
use std::time::Duration;
use zbus::{interface, DBusError};

use crate::call_hold::{CallHold, HoldOutcome};
use crate::request::{
    Abort, AgentRequest, ConfirmKind, InputKind, InputSpec, LoopToneChoice, Responder,
};
use crate::tone::Tone;
use crate::MenuItem;

/// Errors returned to ofono
#[derive(Debug, DBusError)]
#[zbus(prefix = "org.ofono.Error")]
pub enum AgentError {
    #[zbus(error)]
    ZBus(zbus::Error),
    /// The user wants the previous SIM screen
    GoBack(String),
    /// The user ended the SIM Toolkit session
    EndSession(String),
    /// The user cannot take the request right now
    Busy(String),
}

impl From<Abort> for AgentError {
    fn from(abort: Abort) -> Self {
        match abort {
            Abort::GoBack => AgentError::GoBack("User wishes to go back".to_string()),
            Abort::EndSession => AgentError::EndSession("User ended the session".to_string()),
            Abort::Busy => AgentError::Busy("User is busy".to_string()),
        }
    }
}

/// Title and body of a confirmation prompt
fn confirmation_text(kind: &ConfirmKind, info: &str) -> (String, Option<String>) {
    let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
    match kind {
        ConfirmKind::Generic => (info.to_string(), None),
        ConfirmKind::CallSetup => ("Confirm Call Setup".to_string(), non_empty(info)),
        ConfirmKind::LaunchBrowser { url } => {
            let mut body = info.to_string();
            if !url.is_empty() {
                if !body.is_empty() {
                    body.push_str("\n\n");
                }
                body.push_str(&format!("URL: {}", url));
            }
            ("Confirm Launch Browser".to_string(), non_empty(&body))
        }
        ConfirmKind::OpenChannel => (
            "Confirm Open Channel".to_string(),
            non_empty(info).map(|info| format!("Information: {}", info)),
        ),
    }
}

/// Whether `key` is a valid answer to a `RequestKey`/`RequestDigit` prompt
fn is_valid_key(kind: InputKind, key: &str) -> bool {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => kind.accepts(c),
        _ => false,
    }
}

/// The agent object exported to ofono
pub struct StkAgent {
    requests: async_channel::Sender<AgentRequest>,
    call_hold: Arc<CallHold>,
    hold_timeout: Duration,
}

impl StkAgent {
    pub fn new(
        requests: async_channel::Sender<AgentRequest>,
        call_hold: Arc<CallHold>,
        hold_timeout: Duration,
    ) -> Self {
        Self {
            requests,
            call_hold,
            hold_timeout,
        }
    }

    async fn post(&self, request: AgentRequest) -> Result<(), AgentError> {
        let name = request.name();
        self.requests.send(request).await.map_err(|_| {
            tracing::error!("No front-end is listening for {} requests", name);
            AgentError::Busy("No front-end available".to_string())
        })
    }

    /// Post a request and wait for the user's answer
    async fn ask<T>(
        &self,
        build: impl FnOnce(Responder<T>) -> AgentRequest,
    ) -> Result<T, AgentError> {
        let (responder, answer) = Responder::channel();
        self.post(build(responder)).await?;

        match answer.await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(abort)) => {
                tracing::debug!("Prompt declined: {:?}", abort);
                Err(abort.into())
            }
            Err(_) => Err(AgentError::EndSession("Prompt was dismissed".to_string())),
        }
    }

    async fn confirm(&self, kind: ConfirmKind, info: &str) -> Result<bool, AgentError> {
        let (title, body) = confirmation_text(&kind, info);
        self.ask(|responder| AgentRequest::Confirm {
            title,
            body,
            kind,
            responder,
        })
        .await
    }

    async fn input(&self, title: String, spec: InputSpec) -> Result<String, AgentError> {
        let answer = self
            .ask(|responder| AgentRequest::Input {
                title,
                spec: spec.clone(),
                responder,
            })
            .await?;

        if !spec.is_valid(&answer) {
            tracing::warn!("Rejecting input outside {}..={} chars", spec.min_chars, spec.max_chars);
            return Err(AgentError::EndSession("Invalid input".to_string()));
        }
        Ok(answer)
    }

    async fn key(&self, title: String, kind: InputKind) -> Result<String, AgentError> {
        let key = self
            .ask(|responder| AgentRequest::Key {
                title,
                kind,
                responder,
            })
            .await?;

        if !is_valid_key(kind, &key) {
            tracing::warn!("Rejecting key answer {:?}", key);
            return Err(AgentError::EndSession("Invalid key".to_string()));
        }
        Ok(key)
    }
}

#[interface(name = "org.ofono.SimToolkitAgent")]
impl StkAgent {
    async fn release(&self) {
        tracing::info!("Agent released by ofono");
        let _ = self.post(AgentRequest::Release).await;
    }

    async fn request_selection(
        &self,
        title: String,
        _icon: u8,
        items: Vec<(String, u8)>,
        default: i16,
    ) -> Result<u8, AgentError> {
        tracing::debug!("RequestSelection: {} ({} items, default {})", title, items.len(), default);

        let items: Vec<MenuItem> = items.into_iter().map(MenuItem::from).collect();
        let count = items.len();
        let default = usize::try_from(default).ok().filter(|&d| d < count);

        let index = self
            .ask(|responder| AgentRequest::Selection {
                title,
                items,
                default,
                responder,
            })
            .await?;

        if index as usize >= count {
            tracing::warn!("Selection {} out of range ({} items)", index, count);
            return Err(AgentError::EndSession("Invalid selection".to_string()));
        }
        Ok(index)
    }

    async fn display_text(&self, text: String, _icon: u8, urgent: bool) -> Result<(), AgentError> {
        tracing::debug!("DisplayText: {} (urgent: {})", text, urgent);
        self.ask(|responder| AgentRequest::DisplayText {
            text,
            urgent,
            responder,
        })
        .await
    }

    async fn request_input(
        &self,
        title: String,
        _icon: u8,
        default: String,
        min_chars: u8,
        max_chars: u8,
        hide_typing: bool,
    ) -> Result<String, AgentError> {
        tracing::debug!("RequestInput: {} ({}..={} chars)", title, min_chars, max_chars);
        let spec = InputSpec {
            kind: InputKind::Text,
            default,
            min_chars,
            max_chars,
            hide_typing,
        };
        self.input(title, spec).await
    }

    async fn request_digits(
        &self,
        title: String,
        _icon: u8,
        default: String,
        min_chars: u8,
        max_chars: u8,
        hide_typing: bool,
    ) -> Result<String, AgentError> {
        tracing::debug!("RequestDigits: {} ({}..={} digits)", title, min_chars, max_chars);
        let spec = InputSpec {
            kind: InputKind::Digits,
            default,
            min_chars,
            max_chars,
            hide_typing,
        };
        self.input(title, spec).await
    }

    async fn request_key(&self, title: String, _icon: u8) -> Result<String, AgentError> {
        tracing::debug!("RequestKey: {}", title);
        self.key(title, InputKind::Text).await
    }

    async fn request_digit(&self, title: String, _icon: u8) -> Result<String, AgentError> {
        tracing::debug!("RequestDigit: {}", title);
        self.key(title, InputKind::Digits).await
    }

    async fn request_confirmation(&self, title: String, _icon: u8) -> Result<bool, AgentError> {
        tracing::debug!("RequestConfirmation: {}", title);
        self.confirm(ConfirmKind::Generic, &title).await
    }

    async fn confirm_call_setup(&self, info: String, _icon: u8) -> Result<bool, AgentError> {
        tracing::debug!("ConfirmCallSetup: {}", info);
        self.confirm(ConfirmKind::CallSetup, &info).await
    }

    async fn confirm_launch_browser(
        &self,
        info: String,
        _icon: u8,
        url: String,
    ) -> Result<bool, AgentError> {
        tracing::debug!("ConfirmLaunchBrowser: {} ({})", info, url);
        self.confirm(ConfirmKind::LaunchBrowser { url }, &info).await
    }

    async fn cancel(&self) {
        tracing::debug!("Cancel");
        if self.call_hold.cancel() {
            tracing::debug!("Cancelled pending call hold");
        }
        let _ = self.post(AgentRequest::Cancel).await;
    }

    async fn play_tone(&self, tone: String, text: String, _icon: u8) -> Result<(), AgentError> {
        tracing::debug!("PlayTone: {} ({})", tone, text);
        let tone = Tone::from_name(&tone);
        self.ask(|responder| AgentRequest::PlayTone {
            tone,
            text,
            responder,
        })
        .await
    }

    async fn loop_tone(&self, tone: String, text: String, _icon: u8) -> Result<(), AgentError> {
        tracing::debug!("LoopTone: {} ({})", tone, text);
        let tone = Tone::from_name(&tone);
        let choice = self
            .ask(|responder| AgentRequest::LoopTone {
                tone,
                text,
                responder,
            })
            .await?;

        if choice == LoopToneChoice::Wait {
            tracing::info!("Holding tone reply for up to {:?}", self.hold_timeout);
            match self.call_hold.hold(self.hold_timeout).await {
                HoldOutcome::CallStarted | HoldOutcome::TimedOut => {}
                HoldOutcome::Superseded => {
                    return Err(AgentError::EndSession("Call hold was cancelled".to_string()));
                }
            }
        }
        Ok(())
    }

    async fn display_action_information(&self, text: String, _icon: u8) {
        tracing::debug!("DisplayActionInformation: {}", text);
        let _ = self.post(AgentRequest::ActionInformation { text }).await;
    }

    async fn display_action(&self, text: String, _icon: u8) -> Result<(), AgentError> {
        tracing::debug!("DisplayAction: {}", text);
        self.ask(|responder| AgentRequest::Action { text, responder })
            .await
    }

    async fn confirm_open_channel(&self, info: String, _icon: u8) -> Result<bool, AgentError> {
        tracing::debug!("ConfirmOpenChannel: {}", info);
        self.confirm(ConfirmKind::OpenChannel, &info).await
    }
}

/// Export the agent on `connection` at `path`
pub async fn serve(
    connection: &zbus::Connection,
    path: &str,
    agent: StkAgent,
) -> crate::error::Result<()> {
    connection.object_server().at(path, agent).await?;
    tracing::info!("Serving {} at {}", crate::dbus::AGENT_INTERFACE, path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent() -> (StkAgent, async_channel::Receiver<AgentRequest>, Arc<CallHold>) {
        let (tx, rx) = async_channel::unbounded();
        let hold = Arc::new(CallHold::new());
        (
            StkAgent::new(tx, hold.clone(), Duration::from_secs(60)),
            rx,
            hold,
        )
    }

    /// Answer the next request with `answer`, counting how many requests arrive
    fn answer_with(
        rx: async_channel::Receiver<AgentRequest>,
        answer: impl FnOnce(AgentRequest) + Send + 'static,
    ) -> tokio::task::JoinHandle<usize> {
        tokio::spawn(async move {
            let mut seen = 0;
            if let Ok(request) = rx.recv().await {
                seen += 1;
                answer(request);
            }
            while rx.try_recv().is_ok() {
                seen += 1;
            }
            seen
        })
    }

    #[tokio::test]
    async fn test_selection_reply() {
        let (agent, rx, _) = agent();
        let task = answer_with(rx, |request| match request {
            AgentRequest::Selection {
                title,
                items,
                default,
                responder,
            } => {
                assert_eq!(title, "Services");
                assert_eq!(items.len(), 2);
                assert_eq!(default, Some(1));
                responder.reply(1);
            }
            other => panic!("unexpected request {}", other.name()),
        });

        let items = vec![("News".to_string(), 0), ("Weather".to_string(), 0)];
        let index = agent
            .request_selection("Services".to_string(), 0, items, 1)
            .await
            .unwrap();
        assert_eq!(index, 1);
        assert_eq!(task.await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_selection_out_of_range_default_is_ignored() {
        let (agent, rx, _) = agent();
        let task = answer_with(rx, |request| match request {
            AgentRequest::Selection {
                default, responder, ..
            } => {
                assert_eq!(default, None);
                responder.abort(Abort::GoBack);
            }
            other => panic!("unexpected request {}", other.name()),
        });

        let err = agent
            .request_selection("Menu".to_string(), 0, vec![("Only".to_string(), 0)], -1)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::GoBack(_)));
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_selection_invalid_reply_is_error() {
        let (agent, rx, _) = agent();
        let task = answer_with(rx, |request| {
            if let AgentRequest::Selection { responder, .. } = request {
                responder.reply(9);
            }
        });

        let err = agent
            .request_selection("Menu".to_string(), 0, vec![("Only".to_string(), 0)], 0)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::EndSession(_)));
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_dropped_responder_ends_session() {
        let (agent, rx, _) = agent();
        let task = answer_with(rx, drop);

        let err = agent
            .display_text("Hello".to_string(), 0, false)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::EndSession(_)));
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_input_cancel_is_busy() {
        let (agent, rx, _) = agent();
        let task = answer_with(rx, |request| match request {
            AgentRequest::Input { spec, responder, .. } => {
                assert_eq!(spec.kind, InputKind::Digits);
                assert_eq!(spec.default, "12");
                responder.abort(Abort::Busy);
            }
            other => panic!("unexpected request {}", other.name()),
        });

        let err = agent
            .request_digits("PIN".to_string(), 0, "12".to_string(), 4, 8, true)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Busy(_)));
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_input_reply_checked_against_limits() {
        let (agent, rx, _) = agent();
        let task = answer_with(rx, |request| {
            if let AgentRequest::Input { responder, .. } = request {
                responder.reply("toolong".to_string());
            }
        });

        let err = agent
            .request_input("Name".to_string(), 0, String::new(), 1, 3, false)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::EndSession(_)));
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_request_digit() {
        let (agent, rx, _) = agent();
        let task = answer_with(rx, |request| match request {
            AgentRequest::Key {
                kind, responder, ..
            } => {
                assert_eq!(kind, InputKind::Digits);
                responder.reply("7".to_string());
            }
            other => panic!("unexpected request {}", other.name()),
        });

        let key = agent.request_digit("Digit".to_string(), 0).await.unwrap();
        assert_eq!(key, "7");
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_request_key_go_back() {
        let (agent, rx, _) = agent();
        let task = answer_with(rx, |request| {
            if let AgentRequest::Key { responder, .. } = request {
                responder.abort(Abort::GoBack);
            }
        });

        let err = agent.request_key("Key".to_string(), 0).await.unwrap_err();
        assert!(matches!(err, AgentError::GoBack(_)));
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_confirm_launch_browser_body() {
        let (agent, rx, _) = agent();
        let task = answer_with(rx, |request| match request {
            AgentRequest::Confirm {
                title,
                body,
                responder,
                ..
            } => {
                assert_eq!(title, "Confirm Launch Browser");
                assert_eq!(body.as_deref(), Some("Open portal\n\nURL: http://sim.example"));
                responder.reply(true);
            }
            other => panic!("unexpected request {}", other.name()),
        });

        let confirmed = agent
            .confirm_launch_browser(
                "Open portal".to_string(),
                0,
                "http://sim.example".to_string(),
            )
            .await
            .unwrap();
        assert!(confirmed);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_confirm_open_channel_is_async() {
        let (agent, rx, _) = agent();
        let task = answer_with(rx, |request| match request {
            AgentRequest::Confirm {
                kind, responder, ..
            } => {
                assert_eq!(kind, ConfirmKind::OpenChannel);
                responder.reply(false);
            }
            other => panic!("unexpected request {}", other.name()),
        });

        let confirmed = agent
            .confirm_open_channel("Data".to_string(), 0)
            .await
            .unwrap();
        assert!(!confirmed);
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_tone_wait_released_by_call() {
        let (agent, rx, hold) = agent();
        let task = answer_with(rx, |request| match request {
            AgentRequest::LoopTone {
                tone, responder, ..
            } => {
                assert_eq!(tone, Tone::RingingTone);
                responder.reply(LoopToneChoice::Wait);
            }
            other => panic!("unexpected request {}", other.name()),
        });

        let releaser = tokio::spawn({
            let hold = hold.clone();
            async move {
                while !hold.is_pending() {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
                hold.release()
            }
        });

        agent
            .loop_tone("ringing-tone".to_string(), "Calling".to_string(), 0)
            .await
            .unwrap();
        assert!(releaser.await.unwrap());
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_tone_wait_times_out() {
        let (agent, rx, hold) = agent();
        let task = answer_with(rx, |request| {
            if let AgentRequest::LoopTone { responder, .. } = request {
                responder.reply(LoopToneChoice::Wait);
            }
        });

        agent
            .loop_tone("busy".to_string(), "Busy".to_string(), 0)
            .await
            .unwrap();
        assert!(!hold.is_pending());
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_loop_tone_end() {
        let (agent, rx, hold) = agent();
        let task = answer_with(rx, |request| {
            if let AgentRequest::LoopTone { responder, .. } = request {
                responder.reply(LoopToneChoice::End);
            }
        });

        agent
            .loop_tone("dial-tone".to_string(), String::new(), 0)
            .await
            .unwrap();
        assert!(!hold.is_pending());
        assert_eq!(task.await.unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_ends_held_loop_tone() {
        let (agent, rx, hold) = agent();
        let agent = Arc::new(agent);
        let looping = tokio::spawn({
            let agent = agent.clone();
            async move {
                agent
                    .loop_tone("dial-tone".to_string(), "Dialling".to_string(), 0)
                    .await
            }
        });

        match rx.recv().await.unwrap() {
            AgentRequest::LoopTone { responder, .. } => responder.reply(LoopToneChoice::Wait),
            other => panic!("unexpected request {}", other.name()),
        }
        while !hold.is_pending() {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        agent.cancel().await;
        let err = looping.await.unwrap().unwrap_err();
        assert!(matches!(err, AgentError::EndSession(_)));
        assert!(!hold.is_pending());
        assert!(matches!(rx.try_recv().unwrap(), AgentRequest::Cancel));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_cancel_without_hold_reaches_front_end() {
        let (agent, rx, hold) = agent();
        agent.cancel().await;
        assert!(!hold.is_pending());
        assert!(matches!(rx.try_recv().unwrap(), AgentRequest::Cancel));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_release_reaches_front_end() {
        let (agent, rx, _) = agent();
        agent.release().await;
        assert!(matches!(rx.try_recv().unwrap(), AgentRequest::Release));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_play_tone_reply() {
        let (agent, rx, _) = agent();
        let task = answer_with(rx, |request| match request {
            AgentRequest::PlayTone {
                tone,
                text,
                responder,
            } => {
                assert_eq!(tone, Tone::PositiveAcknowledgement);
                assert_eq!(text, "Done");
                responder.reply(());
            }
            other => panic!("unexpected request {}", other.name()),
        });

        agent
            .play_tone("positive-acknowledgement".to_string(), "Done".to_string(), 0)
            .await
            .unwrap();
        assert_eq!(task.await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_play_tone_unknown_name_beeps() {
        let (agent, rx, _) = agent();
        let task = answer_with(rx, |request| match request {
            AgentRequest::PlayTone {
                tone, responder, ..
            } => {
                assert_eq!(tone, Tone::GeneralBeep);
                responder.abort(Abort::EndSession);
            }
            other => panic!("unexpected request {}", other.name()),
        });

        let err = agent
            .play_tone("warble".to_string(), String::new(), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::EndSession(_)));
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_display_action_reply() {
        let (agent, rx, _) = agent();
        let task = answer_with(rx, |request| match request {
            AgentRequest::Action { text, responder } => {
                assert_eq!(text, "Sending USSD");
                responder.reply(());
            }
            other => panic!("unexpected request {}", other.name()),
        });

        agent
            .display_action("Sending USSD".to_string(), 0)
            .await
            .unwrap();
        assert_eq!(task.await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_confirm_call_setup() {
        let (agent, rx, _) = agent();
        let task = answer_with(rx, |request| match request {
            AgentRequest::Confirm {
                title,
                body,
                kind,
                responder,
            } => {
                assert_eq!(kind, ConfirmKind::CallSetup);
                assert_eq!(title, "Confirm Call Setup");
                assert_eq!(body.as_deref(), Some("Call +4412345"));
                responder.reply(true);
            }
            other => panic!("unexpected request {}", other.name()),
        });

        let confirmed = agent
            .confirm_call_setup("Call +4412345".to_string(), 0)
            .await
            .unwrap();
        assert!(confirmed);
        assert_eq!(task.await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_request_input_reply() {
        let (agent, rx, _) = agent();
        let task = answer_with(rx, |request| match request {
            AgentRequest::Input {
                title,
                spec,
                responder,
            } => {
                assert_eq!(title, "Name");
                assert_eq!(spec.kind, InputKind::Text);
                assert!(!spec.hide_typing);
                responder.reply("Ann".to_string());
            }
            other => panic!("unexpected request {}", other.name()),
        });

        let text = agent
            .request_input("Name".to_string(), 0, String::new(), 1, 3, false)
            .await
            .unwrap();
        assert_eq!(text, "Ann");
        assert_eq!(task.await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_action_information_needs_no_answer() {
        let (agent, rx, _) = agent();
        agent
            .display_action_information("Sending SMS".to_string(), 0)
            .await;
        match rx.try_recv().unwrap() {
            AgentRequest::ActionInformation { text } => assert_eq!(text, "Sending SMS"),
            other => panic!("unexpected request {}", other.name()),
        }
    }

    #[tokio::test]
    async fn test_no_front_end_is_busy() {
        let (agent, rx, _) = agent();
        drop(rx);
        let err = agent
            .request_confirmation("Sure?".to_string(), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Busy(_)));
    }

    #[test]
    fn test_confirmation_text() {
        assert_eq!(
            confirmation_text(&ConfirmKind::OpenChannel, "GPRS"),
            (
                "Confirm Open Channel".to_string(),
                Some("Information: GPRS".to_string())
            )
        );
        assert_eq!(
            confirmation_text(&ConfirmKind::CallSetup, ""),
            ("Confirm Call Setup".to_string(), None)
        );
        assert_eq!(
            confirmation_text(&ConfirmKind::Generic, "Proceed?"),
            ("Proceed?".to_string(), None)
        );
    }

    #[test]
    fn test_abort_error_names() {
        let name = |abort| AgentError::from(abort).name().as_str().to_string();
        assert_eq!(name(Abort::GoBack), "org.ofono.Error.GoBack");
        assert_eq!(name(Abort::EndSession), "org.ofono.Error.EndSession");
        assert_eq!(name(Abort::Busy), "org.ofono.Error.Busy");
    }
}
