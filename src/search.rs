//! Search controller state machine.
//!
//! Owns the query, hint, busy flag and accumulated results. The app event
//! loop is the only mutator; network work happens elsewhere and comes back
//! through [`SearchState::settle`] as one atomic transition.

use crossterm::event::KeyCode;
use rand::seq::IndexedRandom;

use crate::api::SearchOutcome;
use crate::media::{MediaItem, ResultItem};

/// Queries must be longer than this (in characters) to hint or search.
pub const MIN_QUERY_CHARS: usize = 2;

/// Status text shown under the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Hint {
    #[default]
    Empty,
    /// Guidance such as "Hit enter to search cats".
    Prompt(String),
    /// A failed or empty search.
    Error(String),
}

impl Hint {
    pub fn text(&self) -> &str {
        match self {
            Hint::Empty => "",
            Hint::Prompt(s) | Hint::Error(s) => s.as_str(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Hint::Error(_))
    }
}

/// Which part of the screen receives keystrokes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Input,
    Results,
}

/// Identifies one started search. Only the most recent ticket may settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

/// What [`SearchState::settle`] did with a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// A random pick was appended under this entry key.
    Appended { key: u64, url: String },
    NotFound,
    Failed,
    /// Superseded by a newer search or a clear; nothing changed.
    Stale,
}

#[derive(Debug, Default)]
pub struct SearchState {
    pub query: String,
    pub hint: Hint,
    pub busy: bool,
    pub results: Vec<MediaItem>,
    pub focus: Focus,
    last_ticket: u64,
    in_flight: Option<SearchTicket>,
    next_key: u64,
}

fn long_enough(text: &str) -> bool {
    text.chars().count() > MIN_QUERY_CHARS
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }

    /// The input text changed.
    pub fn on_keystroke(&mut self, text: impl Into<String>) {
        self.query = text.into();
        self.hint = if long_enough(&self.query) {
            Hint::Prompt(format!("Hit enter to search {}", self.query))
        } else {
            Hint::Empty
        };
    }

    /// A key was pressed in the input. Starts a search on Enter with a long
    /// enough query.
    pub fn on_key_trigger(&mut self, key: KeyCode, text: &str) -> Option<SearchTicket> {
        if key == KeyCode::Enter && long_enough(text) {
            Some(self.start_search(text))
        } else {
            None
        }
    }

    /// Mark a search as in flight. Any earlier in-flight search becomes stale.
    pub fn start_search(&mut self, term: &str) -> SearchTicket {
        self.last_ticket += 1;
        let ticket = SearchTicket(self.last_ticket);
        self.in_flight = Some(ticket);
        self.busy = true;
        tracing::debug!(term, ticket = ticket.0, "search started");
        ticket
    }

    /// Apply a finished search.
    pub fn settle(
        &mut self,
        ticket: SearchTicket,
        term: &str,
        outcome: SearchOutcome,
    ) -> Settlement {
        if self.in_flight != Some(ticket) {
            tracing::debug!(term, ticket = ticket.0, "discarding stale search result");
            return Settlement::Stale;
        }
        self.in_flight = None;
        self.busy = false;

        match outcome {
            SearchOutcome::Found(items) => match items.choose(&mut rand::rng()) {
                Some(pick) => {
                    let settlement = self.append(pick.clone());
                    self.hint = Hint::Prompt(format!("Hit enter to see more {term}"));
                    settlement
                }
                None => self.not_found(term),
            },
            SearchOutcome::Empty => self.not_found(term),
            SearchOutcome::Failed(message) => {
                self.hint = Hint::Error(message);
                Settlement::Failed
            }
        }
    }

    fn not_found(&mut self, term: &str) -> Settlement {
        self.hint = Hint::Error(format!("Nothing found for {term}"));
        Settlement::NotFound
    }

    fn append(&mut self, item: ResultItem) -> Settlement {
        let key = self.next_key;
        self.next_key += 1;
        let url = item.url.clone();
        self.results.push(MediaItem::new(key, item));
        Settlement::Appended { key, url }
    }

    /// Reset query, hint and results and return focus to the input.
    ///
    /// An in-flight search is retired, so it can no longer settle and the
    /// busy flag drops with it.
    pub fn clear(&mut self) {
        self.query.clear();
        self.hint = Hint::Empty;
        self.results.clear();
        self.focus = Focus::Input;
        if self.in_flight.take().is_some() {
            self.busy = false;
        }
    }

    /// The asset behind entry `key` finished loading. Returns false if the
    /// entry is gone (cleared since).
    pub fn mark_ready(&mut self, key: u64, size_bytes: Option<u64>) -> bool {
        match self.results.iter_mut().find(|m| m.key == key) {
            Some(media) => {
                media.mark_ready(size_bytes);
                true
            }
            None => false,
        }
    }
}
