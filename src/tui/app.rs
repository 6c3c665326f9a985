//! Main TUI application state machine.
//!
//! Handles:
//! - Page navigation through the shell
//! - Input event handling
//! - Service wiring from configuration
//! - Backend calls on background workers with a UI-side timeout

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend as TerminalBackend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};

use crate::adapters::{HttpGateway, InMemoryHistoryStore, KeywordAssistant, MockAuth, MockPredictor};
use crate::application::auth::{SIGN_IN_FAILED, SIGN_UP_FAILED};
use crate::application::prediction::{failure_message, ANALYSIS_FAILED};
use crate::application::{AuthService, HistoryService, NavEvent, Page, PredictionService, Shell};
use crate::config::{AppConfig, Backend};
use crate::domain::{Assessment, Credentials, HistoricalRecord, Registration, UserSession};
use crate::domain::intake::sample_values;
use crate::ports::{AuthGateway, GatewayError, HealthAssistant, HistoryStore, PredictorGateway};
use crate::CardioError;

use super::ui::{
    auth::{render_auth, AuthMode, AuthPageState},
    history::{render_history, HistoryPageState},
    home::{render_home, HomeFocus, HomeState, PredictionState},
    render_disclaimer, render_nav_bar,
};
use super::worker::{Worker, WorkerHandle, WorkerOutcome};

/// Length of one sweep of the pending progress bar.
const PROGRESS_CYCLE_SECS: f64 = 3.0;

const HISTORY_LOAD_FAILED: &str = "Failed to load your health history. Please try again.";

/// Main application state
pub struct App {
    config: AppConfig,

    /// Current page and session
    shell: Shell,

    should_quit: bool,

    prediction_service: PredictionService,
    auth_service: AuthService,
    history_service: HistoryService,
    assistant: Arc<dyn HealthAssistant>,

    home: HomeState,
    sign_in: AuthPageState,
    sign_up: AuthPageState,
    history: HistoryPageState,

    // One slot per kind of backend call. Dropping a handle cancels it.
    prediction_job: Option<WorkerHandle<Result<Assessment, CardioError>>>,
    auth_job: Option<WorkerHandle<Result<UserSession, CardioError>>>,
    history_job: Option<WorkerHandle<Result<Vec<HistoricalRecord>, CardioError>>>,
    chat_job: Option<WorkerHandle<Result<String, GatewayError>>>,
}

impl App {
    /// Create the application with the adapters selected by `config`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: AppConfig) -> Result<Self> {
        let (predictor, auth): (Arc<dyn PredictorGateway>, Arc<dyn AuthGateway>) =
            match config.backend {
                Backend::Mock => (
                    Arc::new(MockPredictor::new(config.mock_delay)),
                    Arc::new(MockAuth::new(config.mock_auth_delay())),
                ),
                Backend::Http => {
                    let gateway = Arc::new(HttpGateway::new(config.clone())?);
                    (gateway.clone(), gateway)
                }
            };
        tracing::info!("Using {:?} backend at {}", config.backend, config.api_url);

        // No backend endpoint exists for history or chat.
        let store: Arc<dyn HistoryStore> =
            Arc::new(InMemoryHistoryStore::new(config.mock_history_delay()));
        let assistant: Arc<dyn HealthAssistant> =
            Arc::new(KeywordAssistant::new(config.mock_history_delay()));

        Ok(Self::with_dependencies(
            config,
            PredictionService::new(predictor),
            AuthService::new(auth),
            HistoryService::new(store),
            assistant,
        ))
    }

    /// Create application with injected services (composition root for
    /// `main` and tests).
    #[must_use]
    pub fn with_dependencies(
        config: AppConfig,
        prediction_service: PredictionService,
        auth_service: AuthService,
        history_service: HistoryService,
        assistant: Arc<dyn HealthAssistant>,
    ) -> Self {
        Self {
            config,
            shell: Shell::new(),
            should_quit: false,
            prediction_service,
            auth_service,
            history_service,
            assistant,
            home: HomeState::default(),
            sign_in: AuthPageState::sign_in(),
            sign_up: AuthPageState::sign_up(),
            history: HistoryPageState::default(),
            prediction_job: None,
            auth_job: None,
            history_job: None,
            chat_job: None,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal even if the loop failed
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop<B: TerminalBackend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            self.tick();

            terminal.draw(|f| self.draw(f))?;

            // Short poll to keep workers and the progress bar moving
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn draw(&self, f: &mut Frame) {
        let nav_height = if self.shell.shows_nav_bar() { 2 } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(nav_height),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(f.area());

        if self.shell.shows_nav_bar() {
            render_nav_bar(f, chunks[0], &self.shell);
        }

        match self.shell.page() {
            Page::Home => render_home(f, chunks[1], &self.home),
            Page::SignIn => render_auth(f, chunks[1], &self.sign_in),
            Page::SignUp => render_auth(f, chunks[1], &self.sign_up),
            Page::History => render_history(f, chunks[1], &self.history),
        }

        render_disclaimer(f, chunks[2]);
    }

    /// Poll every worker and advance the progress animation.
    fn tick(&mut self) {
        self.poll_prediction();
        self.poll_auth();
        self.poll_history();
        self.poll_chat();
    }

    fn poll_prediction(&mut self) {
        let Some(job) = &self.prediction_job else {
            return;
        };

        let Some(outcome) = job.poll() else {
            let cycle = job.elapsed().as_secs_f64() % PROGRESS_CYCLE_SECS;
            self.home.prediction = PredictionState::Pending {
                progress: cycle / PROGRESS_CYCLE_SECS,
            };
            return;
        };
        self.prediction_job = None;

        match outcome {
            WorkerOutcome::Finished(Ok(assessment)) => {
                self.home.chat.enable();
                self.home.complete(assessment);
            }
            WorkerOutcome::Finished(Err(e)) => {
                tracing::warn!("Prediction failed: {}", e);
                self.home.prediction = PredictionState::Failed(failure_message(&e));
            }
            WorkerOutcome::Crashed(_) | WorkerOutcome::TimedOut => {
                self.home.prediction = PredictionState::Failed(ANALYSIS_FAILED.to_string());
            }
        }
    }

    fn poll_auth(&mut self) {
        let Some(outcome) = self.auth_job.as_ref().and_then(WorkerHandle::poll) else {
            return;
        };
        self.auth_job = None;

        let page = match self.shell.page() {
            Page::SignUp => &mut self.sign_up,
            _ => &mut self.sign_in,
        };
        page.pending = false;

        match outcome {
            WorkerOutcome::Finished(Ok(session)) => {
                page.reset();
                self.shell.dispatch(NavEvent::SignedIn(session));
            }
            WorkerOutcome::Finished(Err(_))
            | WorkerOutcome::Crashed(_)
            | WorkerOutcome::TimedOut => {
                page.error = Some(
                    match page.mode {
                        AuthMode::SignIn => SIGN_IN_FAILED,
                        AuthMode::SignUp => SIGN_UP_FAILED,
                    }
                    .to_string(),
                );
            }
        }
    }

    fn poll_history(&mut self) {
        let Some(outcome) = self.history_job.as_ref().and_then(WorkerHandle::poll) else {
            return;
        };
        self.history_job = None;

        match outcome {
            WorkerOutcome::Finished(Ok(records)) => self.history.loaded(records),
            WorkerOutcome::Finished(Err(e)) => {
                tracing::warn!("History load failed: {}", e);
                self.history.failed(HISTORY_LOAD_FAILED);
            }
            WorkerOutcome::Crashed(_) | WorkerOutcome::TimedOut => {
                self.history.failed(HISTORY_LOAD_FAILED);
            }
        }
    }

    fn poll_chat(&mut self) {
        let Some(outcome) = self.chat_job.as_ref().and_then(WorkerHandle::poll) else {
            return;
        };
        self.chat_job = None;

        let reply = match outcome {
            WorkerOutcome::Finished(reply) => reply,
            WorkerOutcome::Crashed(message) => Err(GatewayError::Rejected(message)),
            WorkerOutcome::TimedOut => Err(GatewayError::Timeout),
        };
        self.home.chat.receive(reply);
    }

    /// Move to another page, cancelling work owned by the page being left.
    fn navigate(&mut self, event: NavEvent) {
        let from = self.shell.page();
        let to = self.shell.dispatch(event);
        if from == to {
            return;
        }
        tracing::debug!("Navigating {:?} -> {:?}", from, to);

        match from {
            Page::Home => {
                if self.prediction_job.take().is_some() {
                    tracing::info!("Cancelled pending prediction");
                    self.home.cancel_pending();
                }
            }
            Page::SignIn | Page::SignUp => {
                if self.auth_job.take().is_some() {
                    tracing::info!("Cancelled pending {:?} request", from);
                }
            }
            Page::History => {
                if self.history_job.take().is_some() {
                    tracing::info!("Cancelled history load");
                    self.history.loading = false;
                }
            }
        }

        match to {
            Page::SignIn => self.sign_in.reset(),
            Page::SignUp => self.sign_up.reset(),
            Page::History => self.load_history(),
            Page::Home => {}
        }
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key, KeyCode::Char('q') | KeyCode::Char('c'))
        {
            self.should_quit = true;
            return;
        }

        match key {
            KeyCode::F(1) => return self.navigate(NavEvent::GoHome),
            KeyCode::F(2) => return self.navigate(NavEvent::GoHistory),
            KeyCode::F(3) => return self.navigate(NavEvent::GoSignIn),
            KeyCode::F(4) => return self.navigate(NavEvent::GoSignUp),
            KeyCode::F(5) if self.shell.is_signed_in() => {
                return self.navigate(NavEvent::SignOut)
            }
            _ => {}
        }

        match self.shell.page() {
            Page::Home => self.handle_home_key(key, modifiers),
            Page::SignIn | Page::SignUp => self.handle_auth_key(key, modifiers),
            Page::History => self.handle_history_key(key),
        }
    }

    fn handle_home_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Tab {
            self.home.focus = match self.home.focus {
                HomeFocus::Form if self.home.chat.is_enabled() => HomeFocus::Chat,
                _ => HomeFocus::Form,
            };
            return;
        }

        if self.home.focus == HomeFocus::Chat {
            match key {
                KeyCode::Enter => self.send_chat(),
                KeyCode::Backspace => {
                    self.home.chat_input.pop();
                }
                KeyCode::Esc => self.home.focus = HomeFocus::Form,
                KeyCode::Char(c) => self.home.chat_input.push(c),
                _ => {}
            }
            return;
        }

        if key == KeyCode::Enter {
            return self.submit_assessment();
        }

        let form = &mut self.home.form;
        match key {
            KeyCode::Char('s') if modifiers.contains(KeyModifiers::CONTROL) => {
                form.load(&sample_values());
            }
            KeyCode::Up | KeyCode::BackTab => form.prev_field(),
            KeyCode::Down => form.next_field(),
            KeyCode::Left => form.cycle(false),
            KeyCode::Right => form.cycle(true),
            KeyCode::Char(c) => form.input_char(c),
            KeyCode::Backspace => form.delete_char(),
            KeyCode::Delete => form.clear_field(),
            _ => {}
        }
    }

    fn handle_auth_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        let mode = if self.shell.page() == Page::SignUp {
            AuthMode::SignUp
        } else {
            AuthMode::SignIn
        };

        match key {
            KeyCode::Esc => return self.navigate(NavEvent::GoHome),
            KeyCode::Enter => return self.submit_auth(mode),
            KeyCode::Char('f')
                if mode == AuthMode::SignIn && modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.sign_in.error = None;
                self.sign_in.notice = Some(self.auth_service.forgot_password().to_string());
                return;
            }
            _ => {}
        }

        let page = match mode {
            AuthMode::SignIn => &mut self.sign_in,
            AuthMode::SignUp => &mut self.sign_up,
        };
        if page.pending {
            return;
        }
        match key {
            KeyCode::Up | KeyCode::BackTab => page.form.prev_field(),
            KeyCode::Down | KeyCode::Tab => page.form.next_field(),
            KeyCode::Char(c) => page.form.input_char(c),
            KeyCode::Backspace => page.form.delete_char(),
            KeyCode::Delete => page.form.clear_field(),
            _ => {}
        }
    }

    fn handle_history_key(&mut self, key: KeyCode) {
        if self.history.show_detail {
            if matches!(key, KeyCode::Esc | KeyCode::Enter) {
                self.history.show_detail = false;
            }
            return;
        }

        if self.history.searching {
            match key {
                KeyCode::Enter | KeyCode::Esc => self.history.searching = false,
                KeyCode::Backspace => self.history.pop_search(),
                KeyCode::Char(c) => self.history.push_search(c),
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Esc => self.navigate(NavEvent::GoHome),
            KeyCode::Char('/') if self.history.view.is_some() => {
                self.history.searching = true;
                self.history.notice = None;
            }
            KeyCode::Char('s') | KeyCode::Char('S') => self.history.cycle_sort(),
            KeyCode::Up => self.history.select_prev(),
            KeyCode::Down => self.history.select_next(),
            KeyCode::Enter => {
                self.history.show_detail = self.history.selected_record().is_some();
            }
            KeyCode::Char('d') | KeyCode::Char('D') => self.delete_selected_record(),
            KeyCode::Char('e') | KeyCode::Char('E') => self.export_history(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.load_history(),
            _ => {}
        }
    }

    fn submit_assessment(&mut self) {
        if self.prediction_job.is_some() || self.home.is_pending() {
            return;
        }
        if !self.home.form.validate_all() {
            tracing::debug!(
                "Intake blocked by {} field errors",
                self.home.form.errors().len()
            );
            return;
        }

        let payload = match self.prediction_service.prepare(&self.home.form.values()) {
            Ok(payload) => payload,
            Err(errors) => {
                self.home.prediction = PredictionState::Failed(failure_message(&errors.into()));
                return;
            }
        };

        let service = self.prediction_service.clone();
        self.prediction_job = Some(Worker::spawn(
            "prediction",
            self.config.request_timeout,
            move || service.predict(&payload),
        ));
        self.home.prediction = PredictionState::Pending { progress: 0.0 };
    }

    fn submit_auth(&mut self, mode: AuthMode) {
        if self.auth_job.is_some() {
            return;
        }
        let page = match mode {
            AuthMode::SignIn => &mut self.sign_in,
            AuthMode::SignUp => &mut self.sign_up,
        };
        page.notice = None;
        if !page.form.validate_all() {
            return;
        }

        let values = page.form.values();
        let service = self.auth_service.clone();
        let timeout = self.config.request_timeout;
        let job = match mode {
            AuthMode::SignIn => match Credentials::parse(&values) {
                Ok(credentials) => {
                    Worker::spawn("sign-in", timeout, move || service.sign_in(credentials))
                }
                Err(errors) => {
                    tracing::debug!("Sign in blocked: {}", errors);
                    return;
                }
            },
            AuthMode::SignUp => match Registration::parse(&values) {
                Ok(registration) => {
                    Worker::spawn("sign-up", timeout, move || service.sign_up(registration))
                }
                Err(errors) => {
                    tracing::debug!("Sign up blocked: {}", errors);
                    return;
                }
            },
        };
        drop(values);

        // Plaintext now lives only in the worker's zeroize-on-drop request.
        page.form.clear_sensitive();
        page.error = None;
        page.pending = true;
        self.auth_job = Some(job);
    }

    fn send_chat(&mut self) {
        let input = std::mem::take(&mut self.home.chat_input);
        let Some(text) = self.home.chat.begin(&input) else {
            return;
        };

        let assistant = Arc::clone(&self.assistant);
        let context = self.home.assessment().cloned();
        self.chat_job = Some(Worker::spawn(
            "assistant",
            self.config.request_timeout,
            move || assistant.respond(&text, context.as_ref()),
        ));
    }

    fn load_history(&mut self) {
        self.history.begin_loading();
        let service = self.history_service.clone();
        self.history_job = Some(Worker::spawn(
            "history",
            self.config.request_timeout,
            move || service.load(),
        ));
    }

    fn delete_selected_record(&mut self) {
        let Some(id) = self.history.selected_record().map(|r| r.id.clone()) else {
            return;
        };

        match self.history_service.delete(&id) {
            Ok(_) => {
                if let Some(view) = &mut self.history.view {
                    view.remove(&id);
                }
                self.history.clamp_selection();
                self.history.notice = Some("Record deleted".to_string());
            }
            Err(e) => {
                tracing::error!("Failed to delete record: {}", e);
                self.history.notice = Some("Could not delete the record".to_string());
            }
        }
    }

    fn export_history(&mut self) {
        let Some(view) = &self.history.view else {
            return;
        };

        self.history.notice = Some(match view.export_json(&self.config.export_dir) {
            Ok(path) => format!("Exported {} records to {}", view.visible().len(), path.display()),
            Err(e) => {
                tracing::error!("History export failed: {}", e);
                "Export failed".to_string()
            }
        });
    }
}
