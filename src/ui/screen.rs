use ratatui::Frame;

use crate::{
    app::{App, AppState},
    ui::{list::render_list, record::render_record, results::render_results},
};

/// A UI Screen boundary: responsible for rendering one app state
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Saved sessions, newest first
pub struct ListScreen;

impl Screen for ListScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_list(app, f);
    }
}

/// Arrow entry for the session in progress
pub struct RecordScreen;

impl Screen for RecordScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_record(app, f);
    }
}

/// Review of one saved session
pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_results(app, f);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::List => Box::new(ListScreen),
        AppState::Record => Box::new(RecordScreen),
        AppState::Results => Box::new(ResultsScreen),
    }
}
