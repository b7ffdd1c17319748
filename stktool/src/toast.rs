//! Transient in-window notifications

use gtk4::prelude::*;
use gtk4::glib;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Overlay that shows one short message at the bottom of the window
#[derive(Clone)]
pub struct Toaster {
    overlay: gtk4::Overlay,
    revealer: gtk4::Revealer,
    label: gtk4::Label,
    hide_timer: Rc<RefCell<Option<glib::SourceId>>>,
}

impl Toaster {
    pub fn new() -> Self {
        let label = gtk4::Label::new(None);
        label.set_wrap(true);
        label.set_margin_top(8);
        label.set_margin_bottom(8);
        label.set_margin_start(16);
        label.set_margin_end(16);

        // Toasts are announced to screen readers as status updates
        label.set_accessible_role(gtk4::AccessibleRole::Status);

        let frame = gtk4::Frame::new(None);
        frame.set_child(Some(&label));
        frame.add_css_class("app-notification");

        let revealer = gtk4::Revealer::new();
        revealer.set_transition_type(gtk4::RevealerTransitionType::SlideUp);
        revealer.set_child(Some(&frame));
        revealer.set_halign(gtk4::Align::Center);
        revealer.set_valign(gtk4::Align::End);
        revealer.set_margin_bottom(24);
        revealer.set_can_target(false);

        let overlay = gtk4::Overlay::new();
        overlay.add_overlay(&revealer);

        Self {
            overlay,
            revealer,
            label,
            hide_timer: Rc::new(RefCell::new(None)),
        }
    }

    /// The widget to use as the window content
    pub fn overlay(&self) -> &gtk4::Overlay {
        &self.overlay
    }

    pub fn set_child(&self, child: &impl IsA<gtk4::Widget>) {
        self.overlay.set_child(Some(child));
    }

    /// Show `message`, replacing any toast already on screen
    pub fn show(&self, message: &str, duration: Duration) {
        if let Some(timer) = self.hide_timer.borrow_mut().take() {
            timer.remove();
        }

        self.label.set_text(message);
        self.revealer.set_reveal_child(true);

        let revealer = self.revealer.clone();
        let hide_timer = self.hide_timer.clone();
        let timer = glib::timeout_add_local_once(duration, move || {
            // The source is gone once this runs; forget its id
            hide_timer.borrow_mut().take();
            revealer.set_reveal_child(false);
        });
        self.hide_timer.replace(Some(timer));
    }
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new()
    }
}
