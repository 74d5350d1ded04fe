//! Settings window: ticker code and always-on-top toggle

use eframe::egui::{self, RichText, ViewportBuilder, ViewportId};

use super::theme::{FontSize, Spacing, SETTINGS_SIZE};
use crate::config::ConfigStore;
use crate::core::{AppConfig, TickerCode};

/// Button pressed in the Settings window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    Confirm,
    Cancel,
    /// Close the window and hide the overlay
    Hide,
}

/// Edit buffer for the Settings window
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsForm {
    pub code_input: String,
    pub topmost: bool,
}

impl SettingsForm {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            code_input: config.ticker.digits().to_string(),
            topmost: config.topmost,
        }
    }

    /// Apply the form to `config`.
    ///
    /// A well-formed 6-digit code replaces and persists the ticker; anything
    /// else is silently ignored. The topmost flag is always applied.
    /// Returns whether the ticker changed.
    pub fn confirm(&self, config: &mut AppConfig, store: &ConfigStore) -> bool {
        let ticker_changed = match TickerCode::from_input(&self.code_input) {
            Some(ticker) => {
                if let Err(e) = store.save(&ticker) {
                    tracing::error!("Failed to save ticker: {}", e);
                }
                config.ticker = ticker;
                true
            }
            None => {
                tracing::debug!("Ignoring malformed code input {:?}", self.code_input);
                false
            }
        };

        config.topmost = self.topmost;
        ticker_changed
    }
}

/// Draw the Settings window. Returns the action chosen this frame, if any.
///
/// Closing the window from its title bar counts as Cancel.
pub fn show(ctx: &egui::Context, form: &mut SettingsForm) -> Option<SettingsAction> {
    let mut action = None;

    ctx.show_viewport_immediate(
        ViewportId::from_hash_of("stockbar_settings"),
        ViewportBuilder::default()
            .with_title("Settings")
            .with_inner_size(SETTINGS_SIZE)
            .with_resizable(false),
        |ctx, _class| {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(Spacing::SM);
                    ui.label(RichText::new("Stock code:").size(FontSize::LABEL));
                    ui.add_space(Spacing::XS);
                    ui.add(egui::TextEdit::singleline(&mut form.code_input).desired_width(120.0));
                    ui.add_space(Spacing::SM);
                    ui.checkbox(&mut form.topmost, "Always on top");
                    ui.add_space(Spacing::MD);

                    ui.horizontal(|ui| {
                        ui.add_space(Spacing::MD);
                        let button = |text: &str| egui::Button::new(text).min_size(egui::vec2(56.0, 0.0));
                        if ui.add(button("OK")).clicked() {
                            action = Some(SettingsAction::Confirm);
                        }
                        if ui.add(button("Cancel")).clicked() {
                            action = Some(SettingsAction::Cancel);
                        }
                        if ui.add(button("Hide")).clicked() {
                            action = Some(SettingsAction::Hide);
                        }
                    });
                });
            });

            if action.is_none() && ctx.input(|i| i.viewport().close_requested()) {
                action = Some(SettingsAction::Cancel);
            }
        },
    );

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (tempfile::TempDir, ConfigStore, AppConfig) {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::at(dir.path().join("config.txt"));
        let config = AppConfig::new(TickerCode::new("sh600000"));
        (dir, store, config)
    }

    #[test]
    fn test_form_prefilled_from_config() {
        let mut config = AppConfig::new(TickerCode::new("sz000001"));
        config.topmost = false;

        let form = SettingsForm::from_config(&config);
        assert_eq!(form.code_input, "000001");
        assert!(!form.topmost);
    }

    #[test]
    fn test_confirm_valid_code_updates_and_persists() {
        let (_dir, store, mut config) = setup();
        let form = SettingsForm {
            code_input: "300750".to_string(),
            topmost: true,
        };

        assert!(form.confirm(&mut config, &store));
        assert_eq!(config.ticker.as_str(), "sz300750");
        assert_eq!(store.load().as_str(), "sz300750");
    }

    // Malformed input is dropped without telling the user. This documents
    // current behavior; it is a known usability gap rather than a contract.
    #[test]
    fn test_confirm_malformed_code_keeps_previous_ticker() {
        let (_dir, store, mut config) = setup();
        store.save(&config.ticker).unwrap();

        for input in ["60000", "6000001", "abcdef", "60 000", ""] {
            let form = SettingsForm {
                code_input: input.to_string(),
                topmost: true,
            };
            assert!(!form.confirm(&mut config, &store), "input {:?}", input);
            assert_eq!(config.ticker.as_str(), "sh600000");
            assert_eq!(store.load().as_str(), "sh600000");
        }
    }

    #[test]
    fn test_confirm_applies_topmost_even_with_bad_code() {
        let (_dir, store, mut config) = setup();
        let form = SettingsForm {
            code_input: "bad".to_string(),
            topmost: false,
        };

        form.confirm(&mut config, &store);
        assert!(!config.topmost);
    }

    #[test]
    fn test_unrecognized_prefix_is_stored_bare() {
        let (_dir, store, mut config) = setup();
        let form = SettingsForm {
            code_input: "900001".to_string(),
            topmost: true,
        };

        assert!(form.confirm(&mut config, &store));
        assert_eq!(config.ticker.as_str(), "900001");
    }
}
