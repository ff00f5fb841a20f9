use std::time::{Duration, Instant};

use crate::config::Config;
use crate::engine::scoring::ScoringVersion;
use crate::session::form::{EventForm, FormAction};
use crate::session::history::EventLog;
use crate::ui::theme::Theme;

use crossterm::event::KeyEvent;

const STATUS_TTL: Duration = Duration::from_secs(4);

/// Number of rows on the settings screen.
pub const SETTINGS_FIELDS: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Calculator,
    Settings,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Clone, Debug)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
    pub set_at: Instant,
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub theme: &'static Theme,
    pub version: ScoringVersion,
    pub form: EventForm,
    pub events: EventLog,
    pub show_help: bool,
    pub confirm_clear: bool,
    pub status: Option<StatusMessage>,
    pub settings_selected: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        let config = match Config::load() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load config, using defaults");
                Config::default()
            }
        };
        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let version = config.scoring_version;
        let form = EventForm::new(version, &config.form_defaults());

        Self {
            screen: AppScreen::Calculator,
            config,
            theme,
            version,
            form,
            events: EventLog::new(),
            show_help: false,
            confirm_clear: false,
            status: None,
            settings_selected: 0,
            should_quit: false,
        }
    }

    pub fn handle_form_key(&mut self, key: KeyEvent) {
        if self.form.handle_key(key) == FormAction::Submit {
            self.submit_event();
        }
    }

    /// Score the form and append the result; a bad field leaves the log untouched.
    pub fn submit_event(&mut self) {
        match self.form.submit() {
            Ok(event) => {
                let label = event.display_name(self.events.len());
                self.set_status(
                    StatusKind::Info,
                    format!("{label}: {:.2} grit points", event.score),
                );
                self.events.push(event);
            }
            Err(err) => {
                tracing::warn!(error = %err, "rejected event input");
                self.set_status(StatusKind::Error, err.to_string());
            }
        }
    }

    pub fn request_clear(&mut self) {
        if !self.events.is_empty() {
            self.confirm_clear = true;
        }
    }

    pub fn clear_events(&mut self) {
        let removed = self.events.clear();
        self.confirm_clear = false;
        tracing::info!(removed, "cleared events");
        self.set_status(StatusKind::Info, format!("Cleared {removed} events"));
    }

    pub fn delete_last_event(&mut self) {
        let position = self.events.len().saturating_sub(1);
        match self.events.pop() {
            Some(event) => {
                let label = event.display_name(position);
                self.set_status(StatusKind::Info, format!("Removed {label}"));
            }
            None => self.set_status(StatusKind::Info, "No events to remove".to_string()),
        }
    }

    /// Switch the version used for new events. Logged events keep their own.
    pub fn set_version(&mut self, version: ScoringVersion) {
        self.version = version;
        self.config.scoring_version = version;
        self.form.set_version(version);
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn set_status(&mut self, kind: StatusKind, text: String) {
        self.status = Some(StatusMessage {
            kind,
            text,
            set_at: Instant::now(),
        });
    }

    pub fn expire_status(&mut self) {
        if self
            .status
            .as_ref()
            .is_some_and(|s| s.set_at.elapsed() >= STATUS_TTL)
        {
            self.status = None;
        }
    }

    pub fn go_to_settings(&mut self) {
        self.settings_selected = 0;
        self.show_help = false;
        self.screen = AppScreen::Settings;
    }

    pub fn leave_settings(&mut self) {
        if let Err(err) = self.config.save() {
            tracing::error!(error = %err, "failed to save config");
            self.set_status(StatusKind::Error, format!("Could not save settings: {err}"));
        }
        self.screen = AppScreen::Calculator;
    }

    pub fn settings_cycle_forward(&mut self) {
        self.settings_cycle(true);
    }

    pub fn settings_cycle_backward(&mut self) {
        self.settings_cycle(false);
    }

    fn settings_cycle(&mut self, forward: bool) {
        match self.settings_selected {
            0 => {
                let themes = Theme::available_themes();
                if let Some(idx) = themes.iter().position(|t| *t == self.config.theme) {
                    let next = if forward {
                        (idx + 1) % themes.len()
                    } else if idx == 0 {
                        themes.len() - 1
                    } else {
                        idx - 1
                    };
                    self.config.theme = themes[next].clone();
                } else if let Some(first) = themes.first() {
                    self.config.theme = first.clone();
                }
                if let Some(new_theme) = Theme::load(&self.config.theme) {
                    let theme: &'static Theme = Box::leak(Box::new(new_theme));
                    self.theme = theme;
                }
            }
            1 => self.set_version(self.version.toggle()),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::session::form::FormField;

    fn app() -> App {
        App::with_config(Config::default())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn submit_named(app: &mut App, name: &str) {
        app.form.name.set_value(name);
        app.handle_form_key(key(KeyCode::Enter));
    }

    #[test]
    fn submit_appends_in_order() {
        let mut app = app();
        submit_named(&mut app, "First");
        submit_named(&mut app, "Second");
        let names: Vec<&str> = app.events.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["First", "Second"]);
        assert_eq!(app.events.last().map(|e| e.score), Some(2.0));
        assert_eq!(app.status.as_ref().map(|s| s.kind), Some(StatusKind::Info));
    }

    #[test]
    fn invalid_number_reports_error_and_keeps_log() {
        let mut app = app();
        app.form.distance.set_value("4x");
        app.submit_event();
        assert!(app.events.is_empty());
        let status = app.status.as_ref().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert!(status.text.contains("distance"));
    }

    #[test]
    fn clear_needs_events_then_empties_log() {
        let mut app = app();
        app.request_clear();
        assert!(!app.confirm_clear);

        submit_named(&mut app, "A");
        submit_named(&mut app, "B");
        app.request_clear();
        assert!(app.confirm_clear);
        app.clear_events();
        assert!(app.events.is_empty());
        assert!(!app.confirm_clear);
    }

    #[test]
    fn delete_last_removes_newest() {
        let mut app = app();
        submit_named(&mut app, "Keep");
        submit_named(&mut app, "Drop");
        app.delete_last_event();
        assert_eq!(app.events.len(), 1);
        assert_eq!(app.events.last().map(|e| e.name.as_str()), Some("Keep"));
        app.delete_last_event();
        app.delete_last_event();
        assert!(app.events.is_empty());
    }

    #[test]
    fn version_switch_keeps_logged_scores() {
        let mut app = app();
        submit_named(&mut app, "Short");
        app.set_version(ScoringVersion::V2);
        assert_eq!(app.form.version, ScoringVersion::V2);
        assert!(app.form.fields().contains(&FormField::Roughness));
        assert_eq!(app.config.scoring_version, ScoringVersion::V2);

        let before = app.events.last().map(|e| (e.scoring_version, e.score));
        assert_eq!(before, Some((ScoringVersion::V1, 2.0)));
    }

    #[test]
    fn settings_cycle_theme_wraps_and_version_toggles() {
        let mut app = app();
        app.go_to_settings();
        assert_eq!(app.screen, AppScreen::Settings);

        let themes = Theme::available_themes();
        let start = app.config.theme.clone();
        for _ in 0..themes.len() {
            app.settings_cycle_forward();
        }
        assert_eq!(app.config.theme, start);
        app.settings_cycle_backward();
        assert_ne!(app.config.theme, start);

        app.settings_selected = 1;
        app.settings_cycle_forward();
        assert_eq!(app.version, ScoringVersion::V2);
        app.settings_cycle_backward();
        assert_eq!(app.version, ScoringVersion::V1);
    }

    #[test]
    fn fresh_status_is_not_expired() {
        let mut app = app();
        app.set_status(StatusKind::Info, "hello".to_string());
        app.expire_status();
        assert!(app.status.is_some());
    }
}
