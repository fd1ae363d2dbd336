//! Screen state and key handling for the terminal front end.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{info, warn};

use crate::config::{Config, ConfigStore};
use crate::editor::{SessionEditor, SetDirection};
use crate::scoring::{format_for_export, ArrowScore, Session, SessionConfig};
use crate::store::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    List,
    Record,
    Results,
}

/// A yes/no question blocking other input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    EarlyFinish { kept: usize },
    Delete { id: String },
}

impl Prompt {
    pub fn question(&self) -> String {
        match self {
            Prompt::EarlyFinish { kept } => {
                format!("Finish early and keep the first {kept} set(s)? (y/n)")
            }
            Prompt::Delete { .. } => "Delete this session? (y/n)".to_string(),
        }
    }
}

/// Keypad mapping: `x`, `0` for 10, `1`-`9`, `m`
pub fn score_for_key(c: char) -> Option<ArrowScore> {
    match c.to_ascii_lowercase() {
        'x' => Some(ArrowScore::X),
        '0' => Some(ArrowScore::Ten),
        '9' => Some(ArrowScore::Nine),
        '8' => Some(ArrowScore::Eight),
        '7' => Some(ArrowScore::Seven),
        '6' => Some(ArrowScore::Six),
        '5' => Some(ArrowScore::Five),
        '4' => Some(ArrowScore::Four),
        '3' => Some(ArrowScore::Three),
        '2' => Some(ArrowScore::Two),
        '1' => Some(ArrowScore::One),
        'm' => Some(ArrowScore::M),
        _ => None,
    }
}

/// Which part of the config a selector key cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    BowType,
    Distance,
    Sets,
    ArrowsPerSet,
}

impl ConfigField {
    fn advance(self, cfg: SessionConfig) -> SessionConfig {
        let mut next = cfg;
        match self {
            ConfigField::BowType => next.bow_type = cfg.bow_type.next(),
            ConfigField::Distance => next.distance = cfg.distance.next(),
            ConfigField::Sets => next.set_count = cfg.set_count.next(),
            ConfigField::ArrowsPerSet => next.arrows_per_set = cfg.arrows_per_set.next(),
        }
        next
    }
}

pub struct App {
    store: Box<dyn SessionStore>,
    config_store: Box<dyn ConfigStore>,
    pub state: AppState,
    pub editor: Option<SessionEditor>,
    pub viewing: Option<Session>,
    pub sessions: Vec<Session>,
    pub selected: usize,
    pub note_mode: bool,
    pub prompt: Option<Prompt>,
    pub status: Option<String>,
    pub export_preview: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: Box<dyn SessionStore>, config_store: Box<dyn ConfigStore>) -> Self {
        let mut app = Self {
            store,
            config_store,
            state: AppState::List,
            editor: None,
            viewing: None,
            sessions: Vec::new(),
            selected: 0,
            note_mode: false,
            prompt: None,
            status: None,
            export_preview: None,
            should_quit: false,
        };
        app.show_list();
        app
    }

    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    /// The remembered config for a new session
    pub fn default_session_config(&self) -> SessionConfig {
        self.config_store.load().session_config()
    }

    pub fn show_list(&mut self) {
        self.sessions = self.store.newest_first();
        self.selected = self.selected.min(self.sessions.len().saturating_sub(1));
        self.viewing = None;
        self.editor = None;
        self.note_mode = false;
        self.state = AppState::List;
    }

    pub fn start_recording(&mut self, config: Option<SessionConfig>) {
        let config = config.unwrap_or_else(|| self.default_session_config());
        self.editor = Some(SessionEditor::new(config));
        self.viewing = None;
        self.note_mode = false;
        self.state = AppState::Record;
    }

    /// Show a saved session, or fall back to the list when it is gone
    pub fn open_result(&mut self, id: &str) {
        match self.store.find(id) {
            Ok(session) => {
                self.viewing = Some(session);
                self.editor = None;
                self.state = AppState::Results;
            }
            Err(e) => {
                warn!("{e}");
                self.show_list();
                self.status = Some(e.to_string());
            }
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.export_preview.take().is_some() {
            return;
        }

        if let Some(prompt) = self.prompt.take() {
            self.answer_prompt(prompt, key);
            return;
        }

        self.status = None;
        match self.state {
            AppState::List => self.on_list_key(key),
            AppState::Record => self.on_record_key(key),
            AppState::Results => self.on_results_key(key),
        }
    }

    fn answer_prompt(&mut self, prompt: Prompt, key: KeyEvent) {
        let confirmed = matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y'));
        if !confirmed {
            return;
        }
        match prompt {
            Prompt::EarlyFinish { .. } => {
                let result = self.editor.as_ref().map(SessionEditor::early_finish);
                match result {
                    Some(Ok(session)) => self.persist(session),
                    Some(Err(e)) => self.status = Some(e.to_string()),
                    None => {}
                }
            }
            Prompt::Delete { id } => {
                match self.store.delete(&id) {
                    Ok(()) => {
                        self.show_list();
                        self.status = Some("session deleted".to_string());
                    }
                    Err(e) => self.status = Some(format!("could not delete: {e}")),
                }
            }
        }
    }

    fn on_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.sessions.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(id) = self.sessions.get(self.selected).map(|s| s.id.clone()) {
                    self.open_result(&id);
                }
            }
            KeyCode::Char('r') | KeyCode::Char('n') => self.start_recording(None),
            _ => {}
        }
    }

    fn on_record_key(&mut self, key: KeyEvent) {
        let Some(editor) = self.editor.as_mut() else {
            self.show_list();
            return;
        };

        if self.note_mode {
            let mut note = editor.current_set().note.clone();
            match key.code {
                KeyCode::Enter | KeyCode::Esc => self.note_mode = false,
                KeyCode::Backspace => {
                    note.pop();
                    editor.set_note(note);
                }
                KeyCode::Char(c) => {
                    note.push(c);
                    editor.set_note(note);
                }
                _ => {}
            }
            return;
        }

        let field = match key.code {
            KeyCode::F(1) | KeyCode::Char('b') => Some(ConfigField::BowType),
            KeyCode::F(2) | KeyCode::Char('d') => Some(ConfigField::Distance),
            KeyCode::F(3) | KeyCode::Char('s') => Some(ConfigField::Sets),
            KeyCode::F(4) | KeyCode::Char('a') => Some(ConfigField::ArrowsPerSet),
            _ => None,
        };
        if let Some(field) = field {
            let next = field.advance(editor.config());
            editor.reconfigure(next);
            return;
        }

        match key.code {
            KeyCode::Char(c) if score_for_key(c).is_some() => {
                if let Some(score) = score_for_key(c) {
                    editor.record_score(score);
                }
            }
            KeyCode::Left => {
                let idx = editor.selected_arrow_index();
                if idx > 0 {
                    editor.navigate_arrow(idx - 1);
                }
            }
            KeyCode::Right => {
                let idx = editor.selected_arrow_index();
                editor.navigate_arrow(idx + 1);
            }
            KeyCode::Up | KeyCode::PageUp => editor.navigate_set(SetDirection::Prev),
            KeyCode::Down | KeyCode::PageDown => editor.navigate_set(SetDirection::Next),
            KeyCode::Backspace | KeyCode::Delete => editor.delete_selected_arrow(),
            KeyCode::Char('c') => editor.clear_set(),
            KeyCode::Char('n') => self.note_mode = true,
            KeyCode::Char('f') => match editor.completed_set_count() {
                0 => {
                    if let Err(e) = editor.early_finish() {
                        self.status = Some(e.to_string());
                    }
                }
                kept => self.prompt = Some(Prompt::EarlyFinish { kept }),
            },
            KeyCode::Enter => {
                let session = editor.finalize();
                self.persist(session);
            }
            KeyCode::Esc => {
                info!("discarded in-progress session");
                self.show_list();
                self.status = Some("recording discarded".to_string());
            }
            _ => {}
        }
    }

    fn on_results_key(&mut self, key: KeyEvent) {
        let Some(session) = self.viewing.as_ref() else {
            self.show_list();
            return;
        };
        match key.code {
            KeyCode::Char('e') => {
                let text = format_for_export(session);
                info!(id = %session.id, "exported session");
                self.export_preview = Some(text);
            }
            KeyCode::Char('d') => {
                self.prompt = Some(Prompt::Delete {
                    id: session.id.clone(),
                })
            }
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => self.show_list(),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    /// Save a finished session, remember its shape and show its result
    fn persist(&mut self, session: Session) {
        if let Err(e) = self.store.save(&session) {
            warn!(id = %session.id, "save failed: {e}");
            self.status = Some(format!("could not save: {e}"));
            return;
        }
        if let Some(editor) = &self.editor {
            if let Err(e) = self.config_store.save(&Config::from(&editor.config())) {
                warn!("could not remember config: {e}");
            }
        }
        self.editor = None;
        self.note_mode = false;
        self.viewing = Some(session);
        self.state = AppState::Results;
        self.status = Some("session saved".to_string());
    }
}
