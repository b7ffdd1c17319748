//! Alert dialogs for short SIM prompts

use gtk4::prelude::*;
use gtk4::{gio, glib};
use std::cell::RefCell;
use std::rc::Rc;

use crate::pending::PendingReply;
use crate::window::StkWindow;
use stktool_agent::request::{Abort, LoopToneChoice, Responder};
use stktool_agent::tone::{Tone, ToneHandle};

/// Show `dialog` over the window; `on_choice` gets `None` when it was
/// dismissed through its cancellable
fn present(
    window: &StkWindow,
    dialog: &gtk4::AlertDialog,
    on_choice: impl FnOnce(Option<i32>) + 'static,
) -> gio::Cancellable {
    let cancellable = window.track_dialog();
    let tracked = cancellable.clone();
    let weak = window.downgrade();

    dialog.choose(Some(window), Some(&cancellable), move |result| {
        if let Some(window) = weak.upgrade() {
            window.untrack_dialog(&tracked);
        }
        match result {
            Ok(index) => on_choice(Some(index)),
            Err(e) => {
                tracing::debug!("Dialog dismissed: {}", e);
                on_choice(None);
            }
        }
    });

    cancellable
}

fn alert(message: &str, detail: Option<&str>, buttons: &[&str]) -> gtk4::AlertDialog {
    let dialog = gtk4::AlertDialog::builder()
        .message(message)
        .modal(true)
        .buttons(buttons.to_vec())
        .build();
    if let Some(detail) = detail {
        dialog.set_detail(detail);
    }
    dialog
}

fn start_tone(window: &StkWindow, tone: Tone) -> Option<ToneHandle> {
    match window.tone_player().play(tone) {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!("Failed to play tone {}: {:#}", tone.name(), e);
            None
        }
    }
}

/// `DisplayText`
pub fn show_display_text(window: &StkWindow, text: &str, urgent: bool, responder: Responder<()>) {
    if urgent {
        window.present();
    }

    let dialog = alert("Message", Some(text), &["Back", "OK"]);
    dialog.set_cancel_button(0);
    dialog.set_default_button(1);

    let pending = PendingReply::new(responder);
    present(window, &dialog, move |choice| match choice {
        Some(1) => {
            pending.reply(());
        }
        Some(_) => {
            pending.abort(Abort::GoBack);
        }
        None => {}
    });
}

/// `RequestConfirmation`, `ConfirmCallSetup` and `ConfirmLaunchBrowser`
pub fn show_confirmation(
    window: &StkWindow,
    title: &str,
    body: Option<&str>,
    responder: Responder<bool>,
) {
    let dialog = alert(title, body, &["No", "Yes"]);
    dialog.set_cancel_button(0);
    dialog.set_default_button(0);

    let pending = PendingReply::new(responder);
    present(window, &dialog, move |choice| {
        if let Some(index) = choice {
            pending.reply(index == 1);
        }
    });
}

/// `PlayTone`: sound the tone until ended or the timeout runs out
pub fn show_tone(window: &StkWindow, tone: Tone, text: &str, responder: Responder<()>) {
    let message = if text.is_empty() { tone.label() } else { text };
    let dialog = alert(message, Some(tone.label()), &["End Tone"]);
    dialog.set_cancel_button(0);
    dialog.set_default_button(0);

    let pending = PendingReply::new(responder);
    let handle = Rc::new(RefCell::new(start_tone(window, tone)));
    let timer: Rc<RefCell<Option<glib::SourceId>>> = Rc::new(RefCell::new(None));

    let cancellable = present(window, &dialog, {
        let pending = pending.clone();
        let handle = handle.clone();
        let timer = timer.clone();
        move |choice| {
            if let Some(timer) = timer.borrow_mut().take() {
                timer.remove();
            }
            handle.borrow_mut().take();
            if choice.is_some() {
                pending.reply(());
            }
        }
    });

    if let Some(timeout) = window.play_tone_timeout() {
        let source = glib::timeout_add_local_once(timeout, {
            let timer = timer.clone();
            move || {
                timer.borrow_mut().take();
                handle.borrow_mut().take();
                pending.reply(());
                cancellable.cancel();
            }
        });
        timer.replace(Some(source));
    }
}

/// `LoopTone`: sound the tone until the user ends it or chooses to wait
pub fn show_loop_tone(
    window: &StkWindow,
    tone: Tone,
    text: &str,
    responder: Responder<LoopToneChoice>,
) {
    let message = if text.is_empty() { tone.label() } else { text };
    let dialog = alert(message, Some(tone.label()), &["Wait", "End Tone"]);
    dialog.set_cancel_button(1);
    dialog.set_default_button(1);

    let pending = PendingReply::new(responder);
    let handle = start_tone(window, tone);
    present(window, &dialog, move |choice| {
        drop(handle);
        match choice {
            Some(0) => {
                pending.reply(LoopToneChoice::Wait);
            }
            Some(_) => {
                pending.reply(LoopToneChoice::End);
            }
            None => {}
        }
    });
}

/// `DisplayActionInformation`: ofono has already been answered
pub fn show_action_information(window: &StkWindow, text: &str) {
    let dialog = alert("Information", Some(text), &["OK"]);
    dialog.set_cancel_button(0);
    dialog.set_default_button(0);
    present(window, &dialog, |_| {});
}
