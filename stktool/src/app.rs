//! GTK4 Application setup

use gtk4::prelude::*;
use gtk4::{gio, glib};

use crate::window::StkWindow;
use stktool_agent::config::Config;

/// The main GTK application
pub struct StkApp {
    app: gtk4::Application,
}

impl StkApp {
    pub fn new(config: Config) -> Self {
        let app = gtk4::Application::builder()
            .application_id("io.FuriOS.StkTool")
            .flags(gio::ApplicationFlags::FLAGS_NONE)
            .build();

        app.connect_activate(move |app| {
            // Only ever one window; ofono talks to a single agent
            if let Some(window) = app.active_window() {
                window.present();
                return;
            }

            let window = StkWindow::new(app, config.clone());
            window.present();
        });

        Self { app }
    }

    pub fn run(&self) -> glib::ExitCode {
        self.app.run()
    }
}
