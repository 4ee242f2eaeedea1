use std::sync::Arc;

use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::DefaultTerminal;

use crate::api::{GiphyClient, SearchOutcome};
use crate::config::AppConfig;
use crate::credentials::API_KEY_VAR;
use crate::event::{ApiResult, AppEvent, Event, EventHandler};
use crate::search::{Focus, SearchState, SearchTicket, Settlement};
use crate::ui;

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    pub running: bool,
    pub events: EventHandler,
    pub config: AppConfig,

    // Search controller state
    pub search: SearchState,

    // View state
    pub selected_index: usize,
    pub spinner_frame: usize,
    pub show_help: bool,

    // API client (shared with spawned tasks)
    pub api_client: Option<Arc<GiphyClient>>,
}

impl App {
    pub fn new(config: AppConfig, api_client: Option<GiphyClient>) -> Self {
        let events = EventHandler::new(config.tick_rate_fps);
        Self::with_events(config, api_client, events)
    }

    fn with_events(
        config: AppConfig,
        api_client: Option<GiphyClient>,
        events: EventHandler,
    ) -> Self {
        Self {
            running: true,
            events,
            config,
            search: SearchState::new(),
            selected_index: 0,
            spinner_frame: 0,
            show_help: false,
            api_client: api_client.map(Arc::new),
        }
    }

    // -- Main event loop ----------------------------------------------------

    pub async fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        while self.running {
            terminal.draw(|frame| self.draw(frame))?;
            let event = self.events.next().await?;
            self.handle_event(event);
        }
        Ok(())
    }

    fn draw(&self, frame: &mut ratatui::Frame) {
        ui::draw(frame, self);
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Tick => self.tick(),
            Event::Crossterm(event) => match event {
                crossterm::event::Event::Key(key)
                    if key.kind == crossterm::event::KeyEventKind::Press =>
                {
                    self.handle_key_event(key);
                }
                crossterm::event::Event::Mouse(mouse) => self.handle_mouse_event(mouse),
                _ => {}
            },
            Event::App(app_event) => self.handle_app_event(*app_event),
        }
    }

    fn tick(&mut self) {
        if self.search.busy {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    // -- Key event routing --------------------------------------------------

    fn handle_key_event(&mut self, key: KeyEvent) {
        // Ctrl-C always quits.
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c' | 'C'))
        {
            self.events.send(AppEvent::Quit);
            return;
        }

        if self.show_help {
            // Any key dismisses the overlay.
            self.show_help = false;
            return;
        }
        if key.code == KeyCode::F(1) {
            self.show_help = true;
            return;
        }

        match self.search.focus {
            Focus::Input => self.handle_input_key(key),
            Focus::Results => self.handle_results_key(key),
        }
    }

    /// A left click on the header row is the reset control.
    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        if self.show_help {
            self.show_help = false;
            return;
        }
        if mouse.row < ui::HEADER_HEIGHT && self.search.has_results() {
            self.clear();
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                if self.search.has_results() {
                    self.clear();
                } else {
                    self.events.send(AppEvent::Quit);
                }
            }
            KeyCode::Tab => {
                if self.search.has_results() {
                    self.search.focus = Focus::Results;
                    self.selected_index = self.search.results.len() - 1;
                }
            }
            KeyCode::Backspace => {
                let mut text = self.search.query.clone();
                text.pop();
                self.search.on_keystroke(text);
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                let mut text = self.search.query.clone();
                text.push(c);
                self.search.on_keystroke(text);
            }
            code => {
                let query = self.search.query.clone();
                if let Some(ticket) = self.search.on_key_trigger(code, &query) {
                    self.dispatch_search(ticket, query);
                }
            }
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::Esc => {
                self.search.focus = Focus::Input;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected_index + 1 < self.search.results.len() {
                    self.selected_index += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected_index = self.selected_index.saturating_sub(1);
            }
            KeyCode::Enter | KeyCode::Char('o') => {
                self.open_selected();
            }
            _ => {}
        }
    }

    fn clear(&mut self) {
        self.search.clear();
        self.selected_index = 0;
    }

    fn open_selected(&self) {
        let Some(media) = self.search.results.get(self.selected_index) else {
            return;
        };
        let target = media.item.open_target();
        if let Err(e) = open::that_detached(target) {
            tracing::warn!(url = target, "failed to open browser: {e}");
        }
    }

    // -- App event handling -------------------------------------------------

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Quit => {
                self.running = false;
            }
            AppEvent::SearchSettled {
                ticket,
                term,
                outcome,
            } => match self.search.settle(ticket, &term, outcome) {
                Settlement::Appended { key, url } => {
                    tracing::info!(term = %term, key, "result added");
                    if self.config.prefetch_media {
                        self.dispatch_prefetch(key, url);
                    } else {
                        self.search.mark_ready(key, None);
                    }
                }
                Settlement::NotFound => tracing::info!(term = %term, "nothing found"),
                Settlement::Failed => tracing::warn!(term = %term, "search failed"),
                Settlement::Stale => {}
            },
            AppEvent::MediaLoaded { key, result } => match result {
                Ok(size) => {
                    self.search.mark_ready(key, Some(size));
                }
                Err(e) => {
                    tracing::warn!(key, "failed to load media: {e}");
                }
            },
        }
    }

    // -- Task dispatch ------------------------------------------------------

    fn dispatch_search(&self, ticket: SearchTicket, term: String) {
        let Some(ref client) = self.api_client else {
            // Settle right away so the busy flag does not stick.
            self.events.send(AppEvent::SearchSettled {
                ticket,
                term,
                outcome: SearchOutcome::Failed(format!("{API_KEY_VAR} is not set")),
            });
            return;
        };
        let client = Arc::clone(client);
        let sender = self.events.sender();

        tokio::spawn(async move {
            let outcome = client.search(&term).await;
            let _ = sender.send(Event::App(Box::new(AppEvent::SearchSettled {
                ticket,
                term,
                outcome,
            })));
        });
    }

    fn dispatch_prefetch(&self, key: u64, url: String) {
        let Some(ref client) = self.api_client else {
            return;
        };
        let client = Arc::clone(client);
        let sender = self.events.sender();

        tokio::spawn(async move {
            let result: ApiResult<u64> = client
                .fetch_asset(&url)
                .await
                .map_err(|e| Arc::new(e.to_string()));
            let _ = sender.send(Event::App(Box::new(AppEvent::MediaLoaded { key, result })));
        });
    }
}
