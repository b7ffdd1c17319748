//! Stacked pages for SIM prompts
//!
//! Every page answers its responder exactly once and closes itself. A page
//! removed from outside (SIM cancel) drops its responder unanswered.

use gtk4::glib;
use gtk4::prelude::*;

use crate::pending::PendingReply;
use crate::window::StkWindow;
use stktool_agent::request::{Abort, InputKind, InputSpec, Responder};
use stktool_agent::MenuItem;

/// Horizontal row of buttons
pub fn button_row(buttons: &[&gtk4::Button]) -> gtk4::Box {
    let row = gtk4::Box::new(gtk4::Orientation::Horizontal, 6);
    row.set_margin_top(12);
    row.set_margin_bottom(24);
    row.set_margin_start(12);
    row.set_margin_end(12);
    for button in buttons {
        row.append(*button);
    }
    row
}

/// A list row showing one menu entry
pub fn menu_row(label: &str) -> gtk4::ListBoxRow {
    let text = gtk4::Label::new(Some(label));
    text.set_xalign(0.0);
    text.set_wrap(true);
    text.set_margin_top(12);
    text.set_margin_bottom(12);
    text.set_margin_start(12);
    text.set_margin_end(12);

    let row = gtk4::ListBoxRow::new();
    row.set_child(Some(&text));
    row
}

fn page_box() -> gtk4::Box {
    gtk4::Box::new(gtk4::Orientation::Vertical, 12)
}

fn heading(text: &str) -> gtk4::Label {
    let label = gtk4::Label::new(Some(text));
    label.set_wrap(true);
    label.set_wrap_mode(gtk4::pango::WrapMode::WordChar);
    label.set_max_width_chars(30);
    label.add_css_class("title-4");
    label.set_margin_top(12);
    label.set_margin_bottom(12);
    label.set_margin_start(12);
    label.set_margin_end(12);
    label
}

fn body(text: &str) -> gtk4::Label {
    let label = gtk4::Label::new(Some(text));
    label.set_wrap(true);
    label.set_wrap_mode(gtk4::pango::WrapMode::WordChar);
    label.set_selectable(true);
    label.set_margin_start(12);
    label.set_margin_end(12);
    label
}

/// `RequestSelection`: pick one entry of a list
pub fn show_selection(
    window: &StkWindow,
    title: &str,
    items: &[MenuItem],
    default: Option<usize>,
    responder: Responder<u8>,
) {
    let name = window.next_page_name();
    let pending = PendingReply::new(responder);

    let content = page_box();
    content.append(&heading(title));

    let current = gtk4::Label::new(None);
    current.add_css_class("dim-label");
    current.set_wrap(true);
    content.append(&current);

    let list = gtk4::ListBox::new();
    list.set_selection_mode(gtk4::SelectionMode::Single);
    list.add_css_class("boxed-list");
    list.set_margin_start(12);
    list.set_margin_end(12);
    list.set_valign(gtk4::Align::Start);
    for item in items {
        list.append(&menu_row(&item.label));
    }

    let scroller = gtk4::ScrolledWindow::new();
    scroller.set_policy(gtk4::PolicyType::Never, gtk4::PolicyType::Automatic);
    scroller.set_min_content_height(400);
    scroller.set_vexpand(true);
    scroller.set_child(Some(&list));
    content.append(&scroller);

    if let Some(row) = default.and_then(|d| list.row_at_index(d as i32)) {
        list.select_row(Some(&row));
        if let Some(item) = items.get(row.index() as usize) {
            current.set_text(&item.label);
        }
    }

    let labels: Vec<String> = items.iter().map(|i| i.label.clone()).collect();
    list.connect_row_selected(glib::clone!(
        #[weak]
        current,
        move |_, row| {
            let label = row
                .and_then(|row| labels.get(row.index() as usize))
                .map(String::as_str)
                .unwrap_or("");
            current.set_text(label);
        }
    ));

    let ok = gtk4::Button::with_label("OK");
    ok.add_css_class("suggested-action");
    let back = gtk4::Button::with_label("Back");
    let cancel = gtk4::Button::with_label("Cancel");

    let choose = {
        let pending = pending.clone();
        let name = name.clone();
        glib::clone!(
            #[weak]
            window,
            #[weak]
            list,
            move || {
                let Some(index) = list
                    .selected_row()
                    .and_then(|row| u8::try_from(row.index()).ok())
                else {
                    window.show_toast("Please select an option");
                    return;
                };
                window.close_page(&name);
                pending.reply(index);
            }
        )
    };
    let choose = std::rc::Rc::new(choose);

    ok.connect_clicked({
        let choose = choose.clone();
        move |_| choose()
    });
    list.connect_row_activated(move |_, _| choose());

    back.connect_clicked({
        let pending = pending.clone();
        let name = name.clone();
        glib::clone!(
            #[weak]
            window,
            move |_| {
                window.close_page(&name);
                pending.abort(Abort::GoBack);
            }
        )
    });

    cancel.connect_clicked({
        let name = name.clone();
        glib::clone!(
            #[weak]
            window,
            move |_| {
                window.close_page(&name);
                pending.end_session(|| window.reregister_agent());
            }
        )
    });

    let buttons = button_row(&[&ok, &back, &cancel]);
    buttons.set_halign(gtk4::Align::Center);
    content.append(&buttons);

    window.push_page(&name, title, &content);
}

/// `RequestInput` / `RequestDigits`: free text entry
pub fn show_input(window: &StkWindow, title: &str, spec: &InputSpec, responder: Responder<String>) {
    let name = window.next_page_name();
    let pending = PendingReply::new(responder);

    let content = page_box();
    content.append(&heading(title));

    let entry = gtk4::Entry::new();
    entry.set_margin_start(12);
    entry.set_margin_end(12);
    entry.set_text(&spec.default);
    entry.set_visibility(!spec.hide_typing);
    if spec.max_chars > 0 {
        entry.set_max_length(i32::from(spec.max_chars));
    }
    match spec.kind {
        InputKind::Digits => {
            entry.set_input_purpose(gtk4::InputPurpose::Phone);
            entry.set_placeholder_text(Some("Digits"));
        }
        InputKind::Text => entry.set_placeholder_text(Some("Input")),
    }
    content.append(&entry);

    let limits = gtk4::Label::new(Some(&match (spec.min_chars, spec.max_chars) {
        (min, 0) => format!("At least {} characters", min),
        (min, max) if min == max => format!("Exactly {} characters", min),
        (min, max) => format!("{} to {} characters", min, max),
    }));
    limits.add_css_class("dim-label");
    content.append(&limits);

    let ok = gtk4::Button::with_label("OK");
    ok.add_css_class("suggested-action");
    ok.set_sensitive(spec.is_valid(&spec.default));
    let cancel = gtk4::Button::with_label("Cancel");

    let check = spec.clone();
    entry.connect_changed(glib::clone!(
        #[weak]
        ok,
        move |entry| ok.set_sensitive(check.is_valid(&entry.text()))
    ));

    let submit = {
        let pending = pending.clone();
        let name = name.clone();
        let spec = spec.clone();
        glib::clone!(
            #[weak]
            window,
            #[weak]
            entry,
            move || {
                let text = entry.text().to_string();
                if !spec.is_valid(&text) {
                    return;
                }
                window.close_page(&name);
                pending.reply(text);
            }
        )
    };
    let submit = std::rc::Rc::new(submit);
    ok.connect_clicked({
        let submit = submit.clone();
        move |_| submit()
    });
    entry.connect_activate(move |_| submit());

    cancel.connect_clicked({
        let name = name.clone();
        glib::clone!(
            #[weak]
            window,
            move |_| {
                window.close_page(&name);
                pending.abort(Abort::Busy);
            }
        )
    });

    let buttons = button_row(&[&ok, &cancel]);
    buttons.set_halign(gtk4::Align::End);
    content.append(&buttons);

    window.push_page(&name, title, &content);
    entry.grab_focus();
}

/// `RequestKey` / `RequestDigit`: a single key press
pub fn show_key(window: &StkWindow, title: &str, kind: InputKind, responder: Responder<String>) {
    let name = window.next_page_name();
    let pending = PendingReply::new(responder);

    let content = page_box();
    content.append(&heading(title));

    let entry = gtk4::Entry::new();
    entry.set_margin_start(12);
    entry.set_margin_end(12);
    entry.set_max_length(1);
    match kind {
        InputKind::Digits => {
            entry.set_input_purpose(gtk4::InputPurpose::Phone);
            entry.set_placeholder_text(Some("Digit"));
        }
        InputKind::Text => entry.set_placeholder_text(Some("Key")),
    }
    content.append(&entry);

    let ok = gtk4::Button::with_label("OK");
    ok.add_css_class("suggested-action");
    ok.set_sensitive(false);
    let back = gtk4::Button::with_label("Back");

    let is_valid = move |text: &str| {
        let mut chars = text.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if kind.accepts(c))
    };

    entry.connect_changed(glib::clone!(
        #[weak]
        ok,
        move |entry| ok.set_sensitive(is_valid(&entry.text()))
    ));

    let submit = {
        let pending = pending.clone();
        let name = name.clone();
        glib::clone!(
            #[weak]
            window,
            #[weak]
            entry,
            move || {
                let key = entry.text().to_string();
                if !is_valid(&key) {
                    return;
                }
                window.close_page(&name);
                pending.reply(key);
            }
        )
    };
    let submit = std::rc::Rc::new(submit);
    ok.connect_clicked({
        let submit = submit.clone();
        move |_| submit()
    });
    entry.connect_activate(move |_| submit());

    back.connect_clicked({
        let name = name.clone();
        glib::clone!(
            #[weak]
            window,
            move |_| {
                window.close_page(&name);
                pending.abort(Abort::GoBack);
            }
        )
    });

    let buttons = button_row(&[&ok, &back]);
    buttons.set_halign(gtk4::Align::End);
    content.append(&buttons);

    window.push_page(&name, title, &content);
    entry.grab_focus();
}

/// `DisplayAction`: show what the SIM is doing until acknowledged
pub fn show_action(window: &StkWindow, text: &str, responder: Responder<()>) {
    let name = window.next_page_name();
    let pending = PendingReply::new(responder);

    let content = page_box();
    content.append(&heading("Action"));
    content.append(&body(text));

    let ok = gtk4::Button::with_label("OK");
    ok.connect_clicked({
        let name = name.clone();
        glib::clone!(
            #[weak]
            window,
            move |_| {
                window.close_page(&name);
                pending.reply(());
            }
        )
    });

    let buttons = button_row(&[&ok]);
    buttons.set_halign(gtk4::Align::End);
    content.append(&buttons);

    window.push_page(&name, "Action", &content);
}

/// `ConfirmOpenChannel`: yes/no as a page
pub fn show_confirm(
    window: &StkWindow,
    title: &str,
    text: Option<&str>,
    responder: Responder<bool>,
) {
    let name = window.next_page_name();
    let pending = PendingReply::new(responder);

    let content = page_box();
    content.append(&heading(title));
    if let Some(text) = text {
        content.append(&body(text));
    }

    let yes = gtk4::Button::with_label("Yes");
    yes.add_css_class("suggested-action");
    let no = gtk4::Button::with_label("No");

    for (button, answer) in [(&yes, true), (&no, false)] {
        let pending = pending.clone();
        let name = name.clone();
        button.connect_clicked(glib::clone!(
            #[weak]
            window,
            move |_| {
                window.close_page(&name);
                pending.reply(answer);
            }
        ));
    }

    let buttons = button_row(&[&yes, &no]);
    buttons.set_halign(gtk4::Align::End);
    content.append(&buttons);

    window.push_page(&name, title, &content);
}
