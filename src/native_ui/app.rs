//! The overlay application and its UI event loop
//!
//! Everything here runs on the UI thread: window state, the refresh timer,
//! the HTTP call (blocking, bounded by the request timeout) and rendering.

use std::time::Instant;

use chrono::Local;
use eframe::egui::{self, text::LayoutJob, Align, FontId, Sense, ViewportCommand};
use tokio::runtime::Runtime;

use super::overlay::{self, DragState, UiState};
use super::settings::{self, SettingsAction, SettingsForm};
use super::theme::{FontSize, Theme};
use crate::config::ConfigStore;
use crate::core::AppConfig;
use crate::dispatch::{self, UiCommand, UiQueue};
use crate::quote::{QuoteSource, SinaQuoteSource};
use crate::refresh::RefreshLoop;
use crate::tray::TrayHandle;

/// Launch the overlay. Blocks until the user picks Exit.
pub fn run() -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let store = ConfigStore::new();
    let config = AppConfig::new(store.load());
    tracing::info!(
        "Starting StockBar for {} (config: {})",
        config.ticker,
        store.path().display()
    );

    let options = eframe::NativeOptions {
        viewport: overlay::viewport(config.topmost),
        ..Default::default()
    };

    eframe::run_native(
        "StockBar",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());

            let (sender, commands) = dispatch::channel();
            let tray =
                TrayHandle::spawn(sender, cc.egui_ctx.clone()).map_err(|e| e.to_string())?;

            Ok(Box::new(StockBarApp::new(
                config,
                store,
                runtime,
                Box::new(SinaQuoteSource::new()),
                commands,
                Some(tray),
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))
}

pub struct StockBarApp {
    config: AppConfig,
    store: ConfigStore,
    runtime: Runtime,
    source: Box<dyn QuoteSource>,
    refresh: RefreshLoop,
    commands: UiQueue,
    tray: Option<TrayHandle>,
    ui: UiState,
    drag: DragState,
    settings: Option<SettingsForm>,
    exiting: bool,
}

impl StockBarApp {
    pub fn new(
        config: AppConfig,
        store: ConfigStore,
        runtime: Runtime,
        source: Box<dyn QuoteSource>,
        commands: UiQueue,
        tray: Option<TrayHandle>,
    ) -> Self {
        Self {
            config,
            store,
            runtime,
            source,
            refresh: RefreshLoop::default(),
            commands,
            tray,
            ui: UiState::new(),
            drag: DragState::default(),
            settings: None,
            exiting: false,
        }
    }

    /// Apply a command posted from the tray thread
    fn handle_command(&mut self, command: UiCommand) -> Vec<ViewportCommand> {
        match command {
            UiCommand::Show => {
                self.ui.visible = true;
                vec![ViewportCommand::MousePassthrough(false)]
            }
            UiCommand::Hide => self.hide(),
            UiCommand::OpenSettings => {
                self.open_settings();
                Vec::new()
            }
            UiCommand::Exit => {
                tracing::info!("Exit requested");
                // Stops the tray thread and removes the icon before the window goes away
                self.tray = None;
                self.settings = None;
                self.exiting = true;
                vec![ViewportCommand::Close]
            }
        }
    }

    /// Stop drawing the overlay and let clicks fall through it.
    ///
    /// The native window stays mapped: eframe only runs `update` for
    /// windows that get redraws, and the tray commands and refresh ticks
    /// are applied there.
    fn hide(&mut self) -> Vec<ViewportCommand> {
        self.ui.visible = false;
        self.drag.release();
        vec![ViewportCommand::MousePassthrough(true)]
    }

    fn open_settings(&mut self) {
        if self.settings.is_none() {
            self.settings = Some(SettingsForm::from_config(&self.config));
        }
    }

    /// Close the Settings window and apply the chosen action
    fn handle_settings_action(&mut self, action: SettingsAction) -> Vec<ViewportCommand> {
        let Some(form) = self.settings.take() else {
            return Vec::new();
        };

        match action {
            SettingsAction::Confirm => {
                form.confirm(&mut self.config, &self.store);
                self.refresh.force();
                vec![ViewportCommand::WindowLevel(overlay::window_level(
                    self.config.topmost,
                ))]
            }
            SettingsAction::Cancel => Vec::new(),
            SettingsAction::Hide => self.hide(),
        }
    }

    fn refresh_if_due(&mut self) {
        let now = Instant::now();
        if !self.refresh.due(now) {
            return;
        }

        let display = self
            .refresh
            .tick(&self.runtime, self.source.as_ref(), &self.config.ticker, now);
        if let Some(tray) = &self.tray {
            tray.show_quote(display, Local::now());
        }
    }

    fn place_initially(&mut self, ctx: &egui::Context) {
        if self.ui.position.is_some() {
            return;
        }
        let Some(monitor_size) = ctx.input(|i| i.viewport().monitor_size) else {
            return;
        };

        let position = overlay::initial_position(monitor_size);
        self.ui.position = Some(position);
        ctx.send_viewport_cmd(ViewportCommand::OuterPosition(position));
    }

    fn show_overlay(&mut self, ctx: &egui::Context) {
        let frame = egui::Frame::none().fill(Theme::overlay_background());

        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            let rect = ui.max_rect();
            let response = ui.interact(rect, ui.id().with("quote_label"), Sense::click_and_drag());

            let mut job = LayoutJob::simple(
                self.refresh.display().text(),
                FontId::proportional(FontSize::OVERLAY),
                Theme::overlay_text(),
                f32::INFINITY,
            );
            job.halign = Align::Center;
            let galley = ui.fonts(|fonts| fonts.layout_job(job));
            let top = rect.center().y - galley.size().y / 2.0;
            ui.painter()
                .galley(egui::pos2(rect.center().x, top), galley, Theme::overlay_text());

            self.handle_pointer(ctx, &response);
        });
    }

    fn handle_pointer(&mut self, ctx: &egui::Context, response: &egui::Response) {
        if response.double_clicked() {
            self.drag.release();
            self.open_settings();
            return;
        }

        let (pressed, released, local) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
            )
        });
        let origin = ctx
            .input(|i| i.viewport().outer_rect.map(|r| r.min))
            .or(self.ui.position);

        if let (Some(local), Some(origin)) = (local, origin) {
            let pointer = origin + local.to_vec2();
            if pressed && response.is_pointer_button_down_on() {
                self.drag.press(pointer, origin);
            } else if response.dragged() {
                if let Some(position) = self.drag.drag_to(pointer) {
                    self.ui.position = Some(position);
                    ctx.send_viewport_cmd(ViewportCommand::OuterPosition(position));
                }
            }
        }

        if released {
            self.drag.release();
        }
    }

    /// One UI pass: apply queued commands, refresh, draw
    fn frame(&mut self, ctx: &egui::Context) {
        for command in self.commands.drain() {
            for viewport_command in self.handle_command(command) {
                ctx.send_viewport_cmd(viewport_command);
            }
        }
        if self.exiting {
            return;
        }

        self.place_initially(ctx);
        self.refresh_if_due();
        if self.ui.visible {
            self.show_overlay(ctx);
        }

        if let Some(form) = self.settings.as_mut() {
            if let Some(action) = settings::show(ctx, form) {
                for viewport_command in self.handle_settings_action(action) {
                    ctx.send_viewport_cmd(viewport_command);
                }
            }
        }

        // Settings confirm may have forced a refresh; run it before sleeping
        if self.refresh.due(Instant::now()) {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(self.refresh.time_until_next(Instant::now()));
        }
    }
}

impl eframe::App for StockBarApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.frame(ctx);
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0, 0.0, 0.0, 0.0]
    }
}
