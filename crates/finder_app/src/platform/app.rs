use std::io::{self, Stdout};
use std::sync::Arc;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use finder_core::{update, AppState, Msg};
use finder_engine::ReqwestSearchClient;
use finder_logging::{finder_info, finder_warn};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::widgets::ListState;
use ratatui::Terminal;

use super::browser::open_in_browser;
use super::config::Settings;
use super::effects::EffectRunner;
use super::{logging, ui};

#[derive(Debug, thiserror::Error)]
pub enum TuiError {
    #[error("terminal io error: {0}")]
    Io(#[from] io::Error),
}

pub fn run_app(settings: Settings) -> anyhow::Result<()> {
    logging::initialize(&settings.config.log_file);
    finder_info!(
        "Starting job finder endpoint={} policy={:?} api_key_set={}",
        settings.config.endpoint,
        settings.config.overlap_policy,
        settings.api_key.is_some()
    );

    let client = ReqwestSearchClient::new(
        settings.search_settings(),
        Arc::new(settings.credentials()),
    )?;
    let runner = EffectRunner::new(Arc::new(client))?;
    let mut app = SearchApp::new(settings.initial_state(), runner);

    let mut session = TerminalSession::enter()?;
    app.run(&mut session.terminal)?;
    finder_info!("Job finder exiting");
    Ok(())
}

/// Raw mode and the alternate screen, restored on drop even on error paths.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = stdout.execute(EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err);
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = self.terminal.backend_mut().execute(LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum UiAction {
    Dispatch(Msg),
    SelectNext,
    SelectPrevious,
    OpenSelected,
    Quit,
    Ignore,
}

fn map_key(key: KeyEvent, query: &str) -> UiAction {
    if key.kind == KeyEventKind::Release {
        return UiAction::Ignore;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => UiAction::Quit,
        KeyCode::Char('c') if ctrl => UiAction::Quit,
        KeyCode::Char('o') if ctrl => UiAction::OpenSelected,
        KeyCode::Char('u') if ctrl => UiAction::Dispatch(Msg::QueryChanged(String::new())),
        KeyCode::Char(_) if ctrl => UiAction::Ignore,
        KeyCode::Char(ch) => {
            let mut text = query.to_string();
            text.push(ch);
            UiAction::Dispatch(Msg::QueryChanged(text))
        }
        KeyCode::Backspace => {
            let mut text = query.to_string();
            if text.pop().is_none() {
                return UiAction::Ignore;
            }
            UiAction::Dispatch(Msg::QueryChanged(text))
        }
        KeyCode::Enter => UiAction::Dispatch(Msg::SearchRequested),
        KeyCode::Down => UiAction::SelectNext,
        KeyCode::Up => UiAction::SelectPrevious,
        _ => UiAction::Ignore,
    }
}

struct SearchApp {
    state: AppState,
    runner: EffectRunner,
    list_state: ListState,
    notice: Option<String>,
    should_quit: bool,
}

impl SearchApp {
    fn new(state: AppState, runner: EffectRunner) -> Self {
        Self {
            state,
            runner,
            list_state: ListState::default(),
            notice: None,
            should_quit: false,
        }
    }

    fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), TuiError> {
        self.dispatch(Msg::Activated);
        self.draw(terminal)?;

        while !self.should_quit {
            let mut redraw = false;
            if event::poll(ui::constants::TICK_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) => {
                        self.handle_key(key);
                        redraw = true;
                    }
                    Event::Resize(..) => redraw = true,
                    _ => {}
                }
            } else {
                self.dispatch(Msg::Tick);
            }

            self.pump();
            if self.state.consume_dirty() || redraw {
                self.draw(terminal)?;
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        if !effects.is_empty() {
            self.notice = None;
        }
        self.runner.enqueue(effects);
    }

    /// Applies every engine result that has arrived.
    fn pump(&mut self) {
        for msg in self.runner.drain() {
            self.dispatch(msg);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match map_key(key, self.state.query()) {
            UiAction::Dispatch(msg) => self.dispatch(msg),
            UiAction::SelectNext => self.list_state.select_next(),
            UiAction::SelectPrevious => self.list_state.select_previous(),
            UiAction::OpenSelected => self.open_selected(),
            UiAction::Quit => self.should_quit = true,
            UiAction::Ignore => {}
        }
    }

    fn open_selected(&mut self) {
        let view = self.state.view();
        let Some(card) = self
            .list_state
            .selected()
            .and_then(|index| view.cards.get(index))
        else {
            return;
        };

        if !card.link.is_navigable() {
            self.notice = Some(format!("Not a web link: {:?}", card.link.href));
            return;
        }
        self.notice = Some(match open_in_browser(&card.link.href) {
            Ok(()) => {
                finder_info!("Opened job link #{}", card.key);
                format!("Opened {}", card.link.href)
            }
            Err(err) => {
                finder_warn!("Failed to open {}: {}", card.link.href, err);
                format!("Could not open browser: {err}")
            }
        });
    }

    fn sync_selection(&mut self, card_count: usize) {
        let selected = match (card_count, self.list_state.selected()) {
            (0, _) => None,
            (_, None) => Some(0),
            (count, Some(index)) => Some(index.min(count - 1)),
        };
        self.list_state.select(selected);
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), TuiError> {
        let view = self.state.view();
        self.sync_selection(view.cards.len());
        let notice = self.notice.as_deref();
        let list_state = &mut self.list_state;
        terminal.draw(|frame| ui::render::render(frame, &view, list_state, notice))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finder_engine::{JobPosting, JobSearchClient, SearchError};
    use ratatui::backend::TestBackend;
    use std::time::{Duration, Instant};

    struct StubClient;

    #[async_trait::async_trait]
    impl JobSearchClient for StubClient {
        async fn search(&self, query: &str) -> Result<Vec<JobPosting>, SearchError> {
            Ok(vec![
                JobPosting {
                    title: format!("{query} Engineer"),
                    url: "https://example.com/1".to_string(),
                    ..JobPosting::default()
                },
                JobPosting {
                    title: format!("{query} Lead"),
                    url: "javascript:alert(1)".to_string(),
                    ..JobPosting::default()
                },
            ])
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn app() -> SearchApp {
        let runner = EffectRunner::new(Arc::new(StubClient)).unwrap();
        SearchApp::new(AppState::new(), runner)
    }

    fn pump_until_idle(app: &mut SearchApp) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.state.is_loading() && Instant::now() < deadline {
            app.pump();
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let area = buffer.area();
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn typing_appends_and_backspace_removes() {
        assert_eq!(
            map_key(key(KeyCode::Char('s')), "Rust"),
            UiAction::Dispatch(Msg::QueryChanged("Rusts".to_string()))
        );
        assert_eq!(
            map_key(key(KeyCode::Backspace), "Rust"),
            UiAction::Dispatch(Msg::QueryChanged("Rus".to_string()))
        );
        assert_eq!(map_key(key(KeyCode::Backspace), ""), UiAction::Ignore);
    }

    #[test]
    fn control_keys() {
        assert_eq!(map_key(key(KeyCode::Enter), "x"), UiAction::Dispatch(Msg::SearchRequested));
        assert_eq!(map_key(key(KeyCode::Esc), "x"), UiAction::Quit);
        assert_eq!(map_key(ctrl('c'), "x"), UiAction::Quit);
        assert_eq!(map_key(ctrl('o'), "x"), UiAction::OpenSelected);
        assert_eq!(
            map_key(ctrl('u'), "x"),
            UiAction::Dispatch(Msg::QueryChanged(String::new()))
        );
        assert_eq!(map_key(ctrl('z'), "x"), UiAction::Ignore);
    }

    #[test]
    fn key_release_is_ignored() {
        let mut release = key(KeyCode::Enter);
        release.kind = KeyEventKind::Release;
        assert_eq!(map_key(release, "x"), UiAction::Ignore);
    }

    #[test]
    fn activation_searches_and_renders_cards() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();

        app.dispatch(Msg::Activated);
        app.draw(&mut terminal).unwrap();
        assert!(screen(&terminal).contains("Loading..."));

        pump_until_idle(&mut app);
        app.draw(&mut terminal).unwrap();
        let text = screen(&terminal);
        assert!(text.contains("ReactJs Engineer"));
        assert!(text.contains("ReactJs Lead"));
        assert!(!text.contains("Loading..."));
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn edited_query_is_searched_on_enter() {
        let mut app = app();
        app.dispatch(Msg::Activated);
        pump_until_idle(&mut app);

        app.handle_key(ctrl('u'));
        for ch in "Backend".chars() {
            app.handle_key(key(KeyCode::Char(ch)));
        }
        assert_eq!(app.state.query(), "Backend");
        assert!(!app.state.is_loading());

        app.handle_key(key(KeyCode::Enter));
        assert!(app.state.is_loading());
        assert!(app.state.results().is_empty());

        pump_until_idle(&mut app);
        assert_eq!(app.state.results()[0].title, "Backend Engineer");
    }

    #[test]
    fn non_web_links_are_not_opened() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        app.dispatch(Msg::Activated);
        pump_until_idle(&mut app);
        app.draw(&mut terminal).unwrap();

        app.handle_key(key(KeyCode::Down));
        app.draw(&mut terminal).unwrap();
        assert_eq!(app.list_state.selected(), Some(1));

        app.handle_key(ctrl('o'));
        assert_eq!(
            app.notice.as_deref(),
            Some("Not a web link: \"javascript:alert(1)\"")
        );
    }

    #[test]
    fn selection_is_clamped_to_cards() {
        let mut app = app();
        app.list_state.select(Some(7));
        app.sync_selection(2);
        assert_eq!(app.list_state.selected(), Some(1));

        app.sync_selection(0);
        assert_eq!(app.list_state.selected(), None);
    }
}
