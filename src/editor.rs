//! The in-progress session and the edits a user can make to it.
//!
//! Every mutating call leaves the set totals, `total_score` and
//! `average_score` in agreement with the arrows before it returns.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{QuiverError, Result};
use crate::id::generate_session_id;
use crate::scoring::{
    average_score, session_total, ArrowScore, Session, SessionConfig, SetCount,
    SetScore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetDirection {
    Prev,
    Next,
}

#[derive(Debug, Clone)]
pub struct SessionEditor {
    session: Session,
    current_set_index: usize,
    selected_arrow_index: usize,
}

impl SessionEditor {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_identity(generate_session_id(), config, Utc::now())
    }

    pub fn with_identity(
        id: impl Into<String>,
        config: SessionConfig,
        created_at: DateTime<Utc>,
    ) -> Self {
        let session = Session::new(id, config, created_at);
        debug!(id = %session.id, ?config, "initialized session");
        Self {
            session,
            current_set_index: 0,
            selected_arrow_index: 0,
        }
    }

    /// Throw away the current session and start a fresh one
    pub fn initialize(&mut self, config: SessionConfig) {
        *self = Self::new(config);
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> SessionConfig {
        self.session.config
    }

    pub fn current_set_index(&self) -> usize {
        self.current_set_index
    }

    pub fn selected_arrow_index(&self) -> usize {
        self.selected_arrow_index
    }

    pub fn current_set(&self) -> &SetScore {
        &self.session.sets[self.current_set_index]
    }

    pub fn selected_arrow(&self) -> ArrowScore {
        self.current_set().arrows[self.selected_arrow_index]
    }

    /// Swap in a new config, keeping every arrow and note that still fits
    pub fn reconfigure(&mut self, new_config: SessionConfig) -> &Session {
        let old_config = self.session.config;
        let arrows_per_set = new_config.arrows_per_set.get();

        let mut old_sets = std::mem::take(&mut self.session.sets).into_iter();
        let sets: Vec<SetScore> = (0..new_config.set_count.get())
            .map(|_| match old_sets.next() {
                Some(existing) => {
                    let mut arrows = existing.arrows;
                    arrows.resize(arrows_per_set, ArrowScore::M);
                    SetScore::from_arrows(arrows, existing.note)
                }
                None => SetScore::empty(arrows_per_set),
            })
            .collect();

        self.session.sets = sets;
        self.session.config = new_config;
        self.refresh_session_totals();

        self.current_set_index = self
            .current_set_index
            .min(new_config.set_count.get().saturating_sub(1));
        self.selected_arrow_index = self.selected_arrow_index.min(arrows_per_set - 1);

        debug!(old = ?old_config, new = ?new_config, "reconfigured session");
        &self.session
    }

    /// Overwrite the selected arrow and step to the next one in the set
    pub fn record_score(&mut self, value: ArrowScore) {
        let set_idx = self.current_set_index;
        let arrow_idx = self.selected_arrow_index;
        self.write_arrow(value);
        debug!(set = set_idx, arrow = arrow_idx, %value, "recorded arrow");

        if self.selected_arrow_index + 1 < self.session.config.arrows_per_set.get() {
            self.selected_arrow_index += 1;
        }
    }

    /// Select an arrow in the current set. Indices past the end are ignored.
    pub fn navigate_arrow(&mut self, index: usize) {
        if index < self.current_set().arrows.len() {
            self.selected_arrow_index = index;
        }
    }

    pub fn set_note(&mut self, text: impl Into<String>) {
        self.session.sets[self.current_set_index].note = text.into();
    }

    /// Move one set back or forward; a no-op at either end
    pub fn navigate_set(&mut self, direction: SetDirection) {
        let target = match direction {
            SetDirection::Prev => self.current_set_index.checked_sub(1),
            SetDirection::Next => Some(self.current_set_index + 1),
        };
        if let Some(idx) = target.filter(|&i| i < self.session.sets.len()) {
            self.current_set_index = idx;
            self.selected_arrow_index = 0;
        }
    }

    pub fn clear_set(&mut self) {
        let arrows = self.session.config.arrows_per_set.get();
        self.session.sets[self.current_set_index] = SetScore::empty(arrows);
        self.refresh_session_totals();
        self.selected_arrow_index = 0;
        debug!(set = self.current_set_index, "cleared set");
    }

    /// Reset the selected arrow to M; the cursor stays put
    pub fn delete_selected_arrow(&mut self) {
        self.write_arrow(ArrowScore::M);
        debug!(
            set = self.current_set_index,
            arrow = self.selected_arrow_index,
            "deleted arrow"
        );
    }

    /// Sets up to and including the last one with any arrow or note
    pub fn completed_set_count(&self) -> usize {
        self.session
            .sets
            .iter()
            .rposition(SetScore::has_activity)
            .map_or(0, |idx| idx + 1)
    }

    /// The session as it stands, stamped complete
    pub fn finalize(&self) -> Session {
        let mut session = self.session.clone();
        session.completed_at = Some(Utc::now());
        info!(
            id = %session.id,
            total = session.total_score,
            "finalized session"
        );
        session
    }

    /// The session cut down to its active prefix, stamped complete.
    ///
    /// The editor itself is left untouched either way.
    pub fn early_finish(&self) -> Result<Session> {
        let kept = self.completed_set_count();
        if kept == 0 {
            info!(id = %self.session.id, "early finish rejected: no scored sets");
            return Err(QuiverError::EarlyFinishRejected);
        }

        let mut session = self.session.clone();
        session.sets.truncate(kept);
        session.config.set_count = SetCount::kept(kept);
        session.total_score = session_total(&session);
        session.average_score = average_score(session.total_score, session.arrow_count());
        session.completed_at = Some(Utc::now());

        info!(
            id = %session.id,
            kept,
            total = session.total_score,
            "finished session early"
        );
        Ok(session)
    }

    fn write_arrow(&mut self, value: ArrowScore) {
        let set = &mut self.session.sets[self.current_set_index];
        if let Some(arrow) = set.arrows.get_mut(self.selected_arrow_index) {
            *arrow = value;
        }
        self.refresh_session_totals();
    }

    fn refresh_session_totals(&mut self) {
        for set in &mut self.session.sets {
            set.recompute();
        }
        self.session.total_score = session_total(&self.session);
        self.session.average_score = average_score(
            self.session.total_score,
            self.session.config.arrow_count(),
        );
    }
}
