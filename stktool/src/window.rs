//! Main window for the StkTool client
//!
//! Shows the SIM main menu as its root page and stacks one page per SIM
//! prompt on top of it. Dialog-style prompts are presented as alert dialogs.

use gtk4::prelude::*;
use gtk4::subclass::prelude::*;
use gtk4::{gio, glib};
use std::cell::{Cell, RefCell};
use std::sync::Arc;
use std::time::Duration;

use crate::backend::Backend;
use crate::dialogs;
use crate::pages;
use crate::toast::Toaster;
use stktool_agent::config::Config;
use stktool_agent::navigation::NavStack;
use stktool_agent::properties::{PropertyEvent, StkProperties};
use stktool_agent::request::{AgentRequest, ConfirmKind};
use stktool_agent::session::Session;
use stktool_agent::tone::TonePlayer;

const MAIN_PAGE: &str = "main";
const MAIN_TITLE: &str = "SIM Toolkit";

mod imp {
    use super::*;
    use gtk4::subclass::application_window::ApplicationWindowImpl;
    use gtk4::subclass::widget::WidgetImpl;
    use gtk4::subclass::window::WindowImpl;

    pub struct StkWindow {
        pub toaster: Toaster,
        pub stack: gtk4::Stack,
        pub menu_title: gtk4::Label,
        pub menu_list: gtk4::ListBox,
        pub menu_scroller: gtk4::ScrolledWindow,
        pub unavailable: gtk4::Box,
        pub unavailable_detail: gtk4::Label,
        pub ok_button: gtk4::Button,
        pub cancel_button: gtk4::Button,
        pub nav: RefCell<NavStack<String>>,
        pub next_page_id: Cell<u64>,
        /// Cancellables of the alert dialogs currently on screen
        pub open_dialogs: RefCell<Vec<gio::Cancellable>>,
        pub session: RefCell<Option<Arc<Session>>>,
        pub backend: RefCell<Option<Backend>>,
        pub config: RefCell<Config>,
        pub tone_player: RefCell<TonePlayer>,
    }

    impl Default for StkWindow {
        fn default() -> Self {
            Self {
                toaster: Toaster::new(),
                stack: gtk4::Stack::new(),
                menu_title: gtk4::Label::new(Some(MAIN_TITLE)),
                menu_list: gtk4::ListBox::new(),
                menu_scroller: gtk4::ScrolledWindow::new(),
                unavailable: gtk4::Box::new(gtk4::Orientation::Vertical, 12),
                unavailable_detail: gtk4::Label::new(Some("SIM Toolkit is not available right now")),
                ok_button: gtk4::Button::with_label("OK"),
                cancel_button: gtk4::Button::with_label("Cancel"),
                nav: RefCell::new(NavStack::new(MAIN_PAGE.to_string())),
                next_page_id: Cell::new(0),
                open_dialogs: RefCell::new(Vec::new()),
                session: RefCell::new(None),
                backend: RefCell::new(None),
                config: RefCell::new(Config::default()),
                tone_player: RefCell::new(TonePlayer::default()),
            }
        }
    }

    #[glib::object_subclass]
    impl ObjectSubclass for StkWindow {
        const NAME: &'static str = "StkWindow";
        type Type = super::StkWindow;
        type ParentType = gtk4::ApplicationWindow;
    }

    impl ObjectImpl for StkWindow {
        fn constructed(&self) {
            self.parent_constructed();

            let obj = self.obj();

            obj.set_title(Some(MAIN_TITLE));
            obj.set_default_size(400, 600);

            // Main menu title
            self.menu_title.add_css_class("title-1");
            self.menu_title.set_wrap(true);
            self.menu_title.set_wrap_mode(gtk4::pango::WrapMode::WordChar);
            self.menu_title.set_margin_top(24);
            self.menu_title.set_margin_bottom(12);
            self.menu_title.set_margin_start(12);
            self.menu_title.set_margin_end(12);

            // Main menu entries
            self.menu_list.set_selection_mode(gtk4::SelectionMode::Single);
            self.menu_list.add_css_class("boxed-list");
            self.menu_list.set_margin_start(12);
            self.menu_list.set_margin_end(12);
            self.menu_list.set_valign(gtk4::Align::Start);
            self.menu_list.connect_row_activated(glib::clone!(
                #[weak]
                obj,
                move |_, _| obj.select_main_menu_item()
            ));

            // Shown instead of the list while the SIM offers no menu
            let warning = gtk4::Image::from_icon_name("dialog-warning-symbolic");
            warning.set_pixel_size(64);
            let unavailable_title = gtk4::Label::new(Some("SIM Toolkit Unavailable"));
            unavailable_title.add_css_class("title-2");
            self.unavailable_detail.set_wrap(true);
            self.unavailable_detail.set_justify(gtk4::Justification::Center);
            self.unavailable.set_valign(gtk4::Align::Center);
            self.unavailable.append(&warning);
            self.unavailable.append(&unavailable_title);
            self.unavailable.append(&self.unavailable_detail);

            self.menu_scroller
                .set_policy(gtk4::PolicyType::Never, gtk4::PolicyType::Automatic);
            self.menu_scroller.set_min_content_height(400);
            self.menu_scroller.set_vexpand(true);
            self.menu_scroller.set_child(Some(&self.unavailable));

            // OK / Cancel
            self.ok_button.add_css_class("suggested-action");
            self.ok_button.connect_clicked(glib::clone!(
                #[weak]
                obj,
                move |_| obj.select_main_menu_item()
            ));
            self.cancel_button.connect_clicked(glib::clone!(
                #[weak]
                obj,
                move |_| obj.reset_session()
            ));
            let buttons = pages::button_row(&[&self.ok_button, &self.cancel_button]);
            buttons.set_halign(gtk4::Align::Center);

            let main_box = gtk4::Box::new(gtk4::Orientation::Vertical, 12);
            main_box.append(&self.menu_title);
            main_box.append(&self.menu_scroller);
            main_box.append(&buttons);

            self.stack
                .set_transition_type(gtk4::StackTransitionType::SlideLeftRight);
            self.stack.add_titled(&main_box, Some(MAIN_PAGE), MAIN_TITLE);

            self.toaster.set_child(&self.stack);
            obj.set_child(Some(self.toaster.overlay()));

            obj.set_menu_available(false);
        }
    }

    impl WidgetImpl for StkWindow {}
    impl WindowImpl for StkWindow {}
    impl ApplicationWindowImpl for StkWindow {}
}

glib::wrapper! {
    pub struct StkWindow(ObjectSubclass<imp::StkWindow>)
        @extends gtk4::ApplicationWindow, gtk4::Window, gtk4::Widget,
        @implements gio::ActionGroup, gio::ActionMap, gtk4::Accessible, gtk4::Buildable,
                    gtk4::ConstraintTarget, gtk4::Native, gtk4::Root, gtk4::ShortcutManager;
}

impl StkWindow {
    pub fn new(app: &gtk4::Application, config: Config) -> Self {
        let window: Self = glib::Object::builder()
            .property("application", app)
            .build();

        let imp = window.imp();
        imp.tone_player
            .replace(TonePlayer::new(config.tones.enabled, config.tones.volume));
        imp.config.replace(config);

        window.connect_to_ofono();

        window
    }

    /// Connect to ofono, then follow property changes and agent requests
    fn connect_to_ofono(&self) {
        let window = self.clone();
        let config = self.imp().config.borrow().clone();

        glib::spawn_future_local(async move {
            match Backend::connect(&config).await {
                Ok(backend) => {
                    if let Some(e) = &backend.registration_error {
                        window.show_toast(&format!("Failed to register agent: {}", e));
                    }

                    let session = backend.session.clone();
                    let requests = backend.requests.clone();
                    window.imp().session.replace(Some(session.clone()));
                    window.imp().backend.replace(Some(backend));

                    window.update_menu(&session.store().snapshot().await);
                    window.listen_for_property_changes(session);
                    window.listen_for_requests(requests);
                }
                Err(e) => {
                    tracing::error!("Failed to set up SIM Toolkit: {:#}", e);
                    window.imp().unavailable_detail.set_text(&format!(
                        "SIM Toolkit is not available right now\n\n{}",
                        e
                    ));
                    window.show_toast("Could not reach the telephony service");
                }
            }
        });
    }

    /// Redraw the main menu whenever the SIM Toolkit properties change
    fn listen_for_property_changes(&self, session: Arc<Session>) {
        let window = self.clone();
        let mut rx = session.store().subscribe();

        glib::spawn_future_local(async move {
            loop {
                match rx.recv().await {
                    Ok(PropertyEvent::Refreshed) | Ok(PropertyEvent::Changed(_)) => {}
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!("Skipped {} property events", skipped);
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
                window.update_menu(&session.store().snapshot().await);
            }
        });
    }

    /// Render agent requests as they arrive
    fn listen_for_requests(&self, requests: async_channel::Receiver<AgentRequest>) {
        let window = self.clone();

        glib::spawn_future_local(async move {
            while let Ok(request) = requests.recv().await {
                tracing::debug!("Handling {} request", request.name());
                window.handle_request(request);
            }
            tracing::warn!("Agent request channel closed");
        });
    }

    fn handle_request(&self, request: AgentRequest) {
        match request {
            AgentRequest::Release => {
                self.pop_to_main_page();
                self.show_toast("SIM Toolkit agent released");
            }
            AgentRequest::Cancel => self.pop_to_main_page(),
            AgentRequest::Selection {
                title,
                items,
                default,
                responder,
            } => pages::show_selection(self, &title, &items, default, responder),
            AgentRequest::DisplayText {
                text,
                urgent,
                responder,
            } => dialogs::show_display_text(self, &text, urgent, responder),
            AgentRequest::Input {
                title,
                spec,
                responder,
            } => pages::show_input(self, &title, &spec, responder),
            AgentRequest::Key {
                title,
                kind,
                responder,
            } => pages::show_key(self, &title, kind, responder),
            AgentRequest::Confirm {
                title,
                body,
                kind: ConfirmKind::OpenChannel,
                responder,
            } => pages::show_confirm(self, &title, body.as_deref(), responder),
            AgentRequest::Confirm {
                title,
                body,
                responder,
                ..
            } => dialogs::show_confirmation(self, &title, body.as_deref(), responder),
            AgentRequest::PlayTone {
                tone,
                text,
                responder,
            } => dialogs::show_tone(self, tone, &text, responder),
            AgentRequest::LoopTone {
                tone,
                text,
                responder,
            } => dialogs::show_loop_tone(self, tone, &text, responder),
            AgentRequest::ActionInformation { text } => dialogs::show_action_information(self, &text),
            AgentRequest::Action { text, responder } => pages::show_action(self, &text, responder),
        }
    }

    /// Rebuild the main menu from the latest properties
    fn update_menu(&self, props: &StkProperties) {
        let imp = self.imp();

        imp.menu_title
            .set_text(props.main_menu_title.as_deref().unwrap_or(MAIN_TITLE));

        imp.menu_list.remove_all();
        for item in &props.main_menu {
            imp.menu_list.append(&pages::menu_row(&item.label));
        }

        let available = props.has_main_menu();
        self.set_menu_available(available);
        if available {
            imp.unavailable_detail
                .set_text("SIM Toolkit is not available right now");
            if let Some(first) = imp.menu_list.row_at_index(0) {
                imp.menu_list.select_row(Some(&first));
            }
        }
    }

    fn set_menu_available(&self, available: bool) {
        let imp = self.imp();
        if available {
            imp.menu_scroller.set_child(Some(&imp.menu_list));
        } else {
            imp.menu_scroller.set_child(Some(&imp.unavailable));
        }
        imp.ok_button.set_sensitive(available);
        imp.cancel_button.set_sensitive(available);
    }

    /// OK on the main menu: ask ofono to open the selected entry
    fn select_main_menu_item(&self) {
        let imp = self.imp();
        let Some(row) = imp.menu_list.selected_row() else {
            self.show_toast("Please select an item first.");
            return;
        };
        let Ok(index) = u8::try_from(row.index()) else {
            return;
        };

        let session = imp.session.borrow().clone();
        let Some(session) = session else {
            return;
        };

        let window = self.clone();
        glib::spawn_future_local(async move {
            if let Err(e) = session.select_item(index).await {
                tracing::warn!("SelectItem({}) failed: {}", index, e);
                window.show_toast("Operation in progress. Please wait.");
            }
        });
    }

    /// Cancel on the main menu: drop every prompt and end the SIM session
    fn reset_session(&self) {
        self.pop_to_main_page();
        self.reregister_agent();
    }

    /// End the SIM session by unregistering and registering the agent once
    pub fn reregister_agent(&self) {
        let session = self.imp().session.borrow().clone();
        let Some(session) = session else {
            return;
        };

        let window = self.clone();
        glib::spawn_future_local(async move {
            if let Err(e) = session.reset_agent().await {
                tracing::error!("Failed to register agent: {}", e);
                window.show_toast(&format!("Failed to register agent: {}", e));
            }
        });
    }

    /// Show a short message over the current page
    pub fn show_toast(&self, message: &str) {
        let duration = self.imp().config.borrow().toast_duration();
        self.imp().toaster.show(message, duration);
    }

    pub fn tone_player(&self) -> TonePlayer {
        self.imp().tone_player.borrow().clone()
    }

    pub fn play_tone_timeout(&self) -> Option<Duration> {
        self.imp().config.borrow().play_tone_timeout()
    }

    /// Reserve a unique stack name for a new page
    pub fn next_page_name(&self) -> String {
        let imp = self.imp();
        let id = imp.next_page_id.get() + 1;
        imp.next_page_id.set(id);
        format!("page-{}", id)
    }

    /// Push `content` as a new page and show it
    pub fn push_page(&self, name: &str, title: &str, content: &impl IsA<gtk4::Widget>) {
        let imp = self.imp();
        imp.stack.add_titled(content, Some(name), title);
        imp.nav.borrow_mut().push(name.to_string());
        tracing::debug!("Showing {} at depth {}", name, imp.nav.borrow().depth());
        self.show_visible_page();
    }

    /// Remove a page, wherever it sits in the stack
    pub fn close_page(&self, name: &str) {
        let imp = self.imp();
        let removed = imp.nav.borrow_mut().remove(&name.to_string());
        if removed.is_none() {
            return;
        }
        if let Some(child) = imp.stack.child_by_name(name) {
            imp.stack.remove(&child);
        }
        self.show_visible_page();
    }

    /// Drop every page above the main menu and dismiss open dialogs
    pub fn pop_to_main_page(&self) {
        let imp = self.imp();

        let popped = imp.nav.borrow_mut().pop_to_root();
        for name in popped {
            if let Some(child) = imp.stack.child_by_name(&name) {
                imp.stack.remove(&child);
            }
        }

        let dialogs: Vec<gio::Cancellable> = imp.open_dialogs.borrow_mut().drain(..).collect();
        for cancellable in dialogs {
            cancellable.cancel();
        }

        self.show_visible_page();
    }

    fn show_visible_page(&self) {
        let imp = self.imp();
        let visible = imp.nav.borrow().visible().clone();
        imp.stack.set_visible_child_name(&visible);

        let title = imp
            .stack
            .child_by_name(&visible)
            .and_then(|child| imp.stack.page(&child).title())
            .map(|t| t.to_string())
            .unwrap_or_else(|| MAIN_TITLE.to_string());
        self.set_title(Some(&title));
    }

    /// Register an alert dialog so a SIM cancel can dismiss it
    pub fn track_dialog(&self) -> gio::Cancellable {
        let cancellable = gio::Cancellable::new();
        self.imp().open_dialogs.borrow_mut().push(cancellable.clone());
        cancellable
    }

    pub fn untrack_dialog(&self, cancellable: &gio::Cancellable) {
        self.imp()
            .open_dialogs
            .borrow_mut()
            .retain(|c| c != cancellable);
    }
}
