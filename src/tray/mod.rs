//! System tray controller
//!
//! The tray icon is created and owned by the `tray` thread, which pumps the
//! platform event loop and forwards menu clicks to the UI as
//! [`UiCommand`]s. The UI only talks back through [`TrayUpdate`] messages;
//! neither side touches the other's state.

pub mod icon;
mod platform;

use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{DateTime, Local};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use muda::{Menu, MenuEvent, MenuId, MenuItem, PredefinedMenuItem};
use thiserror::Error;
use tray_icon::{TrayIcon, TrayIconBuilder};

use crate::core::{QuoteDisplay, Trend};
use crate::dispatch::{UiCommand, UiSender};

/// Tooltip before the first quote arrives
pub const DEFAULT_TOOLTIP: &str = "Stock monitor";

/// How long the tray thread waits for a UI update between message pumps
const PUMP_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Error)]
pub enum TrayError {
    #[error("Failed to build tray menu: {0}")]
    Menu(#[from] muda::Error),

    #[error("Failed to create tray icon image: {0}")]
    Icon(#[from] tray_icon::BadIcon),

    #[error("Failed to create tray icon: {0}")]
    Build(#[from] tray_icon::Error),

    #[error("Failed to initialize the platform event loop: {0}")]
    Platform(String),

    #[error("Failed to spawn tray thread: {0}")]
    Thread(#[from] std::io::Error),

    #[error("Tray thread failed to start: {0}")]
    Startup(String),
}

/// Menu item ids, used to map menu events back to commands
#[derive(Debug, Clone)]
pub struct MenuIds {
    pub show: MenuId,
    pub hide: MenuId,
    pub settings: MenuId,
    pub exit: MenuId,
}

impl MenuIds {
    pub fn command_for(&self, id: &MenuId) -> Option<UiCommand> {
        if *id == self.show {
            Some(UiCommand::Show)
        } else if *id == self.hide {
            Some(UiCommand::Hide)
        } else if *id == self.settings {
            Some(UiCommand::OpenSettings)
        } else if *id == self.exit {
            Some(UiCommand::Exit)
        } else {
            None
        }
    }
}

/// Message from the UI thread to the tray thread
#[derive(Debug, Clone, PartialEq)]
pub enum TrayUpdate {
    Quote { tooltip: String, trend: Trend },
}

/// Forward menu clicks to the UI.
///
/// `wake` is called after every post so the UI loop notices the command
/// even while it is idle. Exit is forwarded like any other item; the tray
/// keeps running until the UI has acted on it and hung up.
pub fn forward_menu_events(
    events: impl IntoIterator<Item = MenuId>,
    ids: &MenuIds,
    sender: &UiSender,
    wake: impl Fn(),
) {
    for id in events {
        let Some(command) = ids.command_for(&id) else {
            tracing::debug!("Ignoring unknown menu item {:?}", id);
            continue;
        };

        tracing::debug!("Tray menu: {:?}", command);
        sender.post(command);
        wake();
    }
}

/// Body of the tray thread. Returns once the UI drops its [`TrayHandle`].
fn run_tray_loop(
    menu_events: &Receiver<MenuEvent>,
    updates: &Receiver<TrayUpdate>,
    ids: &MenuIds,
    sender: &UiSender,
    wake: impl Fn(),
    mut pump: impl FnMut(),
    mut apply: impl FnMut(TrayUpdate),
) {
    loop {
        pump();
        forward_menu_events(menu_events.try_iter().map(|event| event.id), ids, sender, &wake);

        match updates.recv_timeout(PUMP_INTERVAL) {
            Ok(update) => apply(update),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    tracing::debug!("Tray loop stopped");
}

/// Tooltip text for the last rendered quote
pub fn tooltip_text(display: &QuoteDisplay, updated_at: DateTime<Local>) -> String {
    match display {
        QuoteDisplay::Loading => DEFAULT_TOOLTIP.to_string(),
        _ => format!(
            "{} ({})",
            display.text().replace('\n', " "),
            updated_at.format("%H:%M:%S")
        ),
    }
}

/// The icon as owned by the tray thread
struct TrayIconState {
    icon: TrayIcon,
    trend: Trend,
}

impl TrayIconState {
    fn build() -> Result<(Self, MenuIds), TrayError> {
        let show = MenuItem::new("Show", true, None);
        let hide = MenuItem::new("Hide", true, None);
        let settings = MenuItem::new("Settings", true, None);
        let exit = MenuItem::new("Exit", true, None);

        let menu = Menu::new();
        menu.append_items(&[
            &show,
            &hide,
            &settings,
            &PredefinedMenuItem::separator(),
            &exit,
        ])?;

        let ids = MenuIds {
            show: show.id().clone(),
            hide: hide.id().clone(),
            settings: settings.id().clone(),
            exit: exit.id().clone(),
        };

        let (rgba, width, height) = icon::render_rgba(Trend::Unknown);
        let icon = TrayIconBuilder::new()
            .with_menu(Box::new(menu))
            .with_tooltip(DEFAULT_TOOLTIP)
            .with_icon(tray_icon::Icon::from_rgba(rgba, width, height)?)
            .build()?;

        Ok((
            Self {
                icon,
                trend: Trend::Unknown,
            },
            ids,
        ))
    }

    fn apply(&mut self, update: TrayUpdate) {
        let TrayUpdate::Quote { tooltip, trend } = update;
        if let Err(e) = self.icon.set_tooltip(Some(tooltip)) {
            tracing::warn!("Failed to update tray tooltip: {}", e);
        }

        if trend == self.trend {
            return;
        }

        let (rgba, width, height) = icon::render_rgba(trend);
        let result = tray_icon::Icon::from_rgba(rgba, width, height)
            .map_err(TrayError::from)
            .and_then(|image| self.icon.set_icon(Some(image)).map_err(TrayError::from));
        match result {
            Ok(()) => self.trend = trend,
            Err(e) => tracing::warn!("Failed to update tray icon: {}", e),
        }
    }
}

/// UI-side handle to the tray thread. Dropping it stops the thread and
/// waits for the icon to be removed.
pub struct TrayHandle {
    updates: Option<Sender<TrayUpdate>>,
    thread: Option<JoinHandle<()>>,
}

impl TrayHandle {
    /// Start the tray thread and wait until its icon exists
    pub fn spawn(sender: UiSender, ctx: egui::Context) -> Result<Self, TrayError> {
        let (updates_tx, updates_rx) = crossbeam_channel::unbounded();
        let (ready_tx, ready_rx) = crossbeam_channel::bounded(1);

        let thread = thread::Builder::new()
            .name("tray".to_string())
            .spawn(move || {
                let built = platform::init().and_then(|()| TrayIconState::build());
                let (mut state, ids) = match built {
                    Ok(parts) => {
                        let _ = ready_tx.send(Ok(()));
                        parts
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.to_string()));
                        return;
                    }
                };

                run_tray_loop(
                    MenuEvent::receiver(),
                    &updates_rx,
                    &ids,
                    &sender,
                    || ctx.request_repaint(),
                    platform::pump,
                    |update| state.apply(update),
                );
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                tracing::info!("Tray icon installed");
                Ok(Self {
                    updates: Some(updates_tx),
                    thread: Some(thread),
                })
            }
            Ok(Err(message)) => Err(TrayError::Startup(message)),
            Err(_) => Err(TrayError::Startup("tray thread exited early".to_string())),
        }
    }

    /// Reflect a freshly rendered quote in the tooltip and icon color
    pub fn show_quote(&self, display: &QuoteDisplay, updated_at: DateTime<Local>) {
        let update = TrayUpdate::Quote {
            tooltip: tooltip_text(display, updated_at),
            trend: display.trend(),
        };
        if let Some(updates) = &self.updates {
            if updates.send(update).is_err() {
                tracing::debug!("Tray thread gone, dropping quote update");
            }
        }
    }
}

impl Drop for TrayHandle {
    fn drop(&mut self) {
        // Hanging up ends the tray loop, which drops the icon
        self.updates.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::warn!("Tray thread panicked");
            }
        }
    }
}
