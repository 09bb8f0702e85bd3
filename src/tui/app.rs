//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation (form, result, metrics)
//! - Input event handling
//! - Synchronous prediction per submit (single-row classical inference;
//!   no background work, no cancellation)

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::artifact::{
    load_pipeline, DEFAULT_METRICS_PATH, DEFAULT_MODEL_PATH,
};
use crate::adapters::linear::LinearPipeline;
use crate::application::{MetricsService, PredictionService};

use super::ui::{
    form::{render_form, FormState},
    metrics::{render_metrics, MetricsViewState},
    render_disclaimer,
    result::{render_result, ResultState},
};

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Form,
    Result,
    Metrics,
}

/// Main application state
pub struct App {
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    /// Prediction service over the process-wide pipeline
    prediction_service: PredictionService<LinearPipeline>,

    /// Lazy metrics holder
    metrics_service: MetricsService,

    /// Patient form state
    form_state: FormState,

    /// Last prediction outcome, if any
    result_state: Option<ResultState>,
}

impl App {
    /// Create a new application instance using the default artifact paths.
    ///
    /// Refuses to start when the model artifact cannot be loaded: there is
    /// no partial operation without a model.
    ///
    /// # Errors
    /// Returns error if the pipeline artifact is missing or malformed.
    pub fn new() -> Result<Self> {
        let model_path = std::env::var("CARDIORISK_MODEL_PATH")
            .unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string());
        let pipeline = load_pipeline(std::path::Path::new(&model_path)).map_err(|e| {
            anyhow!("Cannot start without a model: {e}. Set CARDIORISK_MODEL_PATH to a pipeline JSON export.")
        })?;

        let metrics_path = std::env::var("CARDIORISK_METRICS_PATH")
            .unwrap_or_else(|_| DEFAULT_METRICS_PATH.to_string());

        Ok(Self::with_services(
            PredictionService::new(Arc::new(pipeline)),
            MetricsService::new(metrics_path),
        ))
    }

    /// Create the application with injected services (Composition Root
    /// pattern), for tests and alternative wiring.
    #[must_use]
    pub fn with_services(
        prediction_service: PredictionService<LinearPipeline>,
        metrics_service: MetricsService,
    ) -> Self {
        Self {
            screen: Screen::Form,
            should_quit: false,
            prediction_service,
            metrics_service,
            form_state: FormState::default(),
            result_state: None,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            // Resolve the metrics view outside the draw closure; entering
            // the screen triggers the lazy one-time load.
            let metrics_view = if self.screen == Screen::Metrics {
                Some(self.metrics_view())
            } else {
                None
            };

            terminal.draw(|f| {
                let area = f.area();
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(area);

                let content_area = chunks[0];
                let disclaimer_area = chunks[1];

                match self.screen {
                    Screen::Form => render_form(f, content_area, &self.form_state),
                    Screen::Result => {
                        if let Some(state) = &self.result_state {
                            render_result(f, content_area, state);
                        }
                    }
                    Screen::Metrics => {
                        if let Some(view) = &metrics_view {
                            render_metrics(f, content_area, view);
                        }
                    }
                }

                render_disclaimer(f, disclaimer_area);
            })?;

            // Short poll to stay responsive
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key.code, key.modifiers);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn metrics_view(&self) -> MetricsViewState {
        match self.metrics_service.report() {
            Ok(report) => MetricsViewState::Available {
                report: report.clone(),
            },
            Err(e) => MetricsViewState::Unavailable {
                reason: e.to_string(),
            },
        }
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Form => self.handle_form_key(key),
            Screen::Result => self.handle_result_key(key),
            Screen::Metrics => self.handle_metrics_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up => {
                self.form_state.prev_field();
            }
            KeyCode::Down | KeyCode::Tab => {
                self.form_state.next_field();
            }
            KeyCode::Left => {
                self.form_state.cycle_choice(false);
            }
            KeyCode::Right => {
                self.form_state.cycle_choice(true);
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.form_state.load_sample_data();
            }
            KeyCode::Char('m') | KeyCode::Char('M') => {
                self.screen = Screen::Metrics;
            }
            KeyCode::Char(c) => {
                self.form_state.input_char(c);
            }
            KeyCode::Backspace => {
                self.form_state.delete_char();
            }
            KeyCode::Delete => {
                self.form_state.clear_field();
            }
            KeyCode::Enter => {
                self.submit_form();
            }
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        let is_error = matches!(self.result_state, Some(ResultState::Error { .. }));
        match key {
            KeyCode::Enter if is_error => {
                // Retry: back to the form with values preserved.
                self.screen = Screen::Form;
            }
            KeyCode::Enter | KeyCode::Char('n') | KeyCode::Char('N') => {
                // New prediction: values reset, as on a fresh page load.
                self.form_state = FormState::default();
                self.result_state = None;
                self.screen = Screen::Form;
            }
            KeyCode::Char('m') | KeyCode::Char('M') if !is_error => {
                self.screen = Screen::Metrics;
            }
            KeyCode::Esc => {
                self.screen = Screen::Form;
            }
            _ => {}
        }
    }

    fn handle_metrics_key(&mut self, key: KeyCode) {
        if key == KeyCode::Esc {
            self.screen = Screen::Form;
        }
    }

    fn submit_form(&mut self) {
        let input = match self.form_state.to_patient_input() {
            Ok(input) => input,
            Err(e) => {
                self.form_state.error_message = Some(e);
                return;
            }
        };

        // One synchronous pass; recoverable failures surface inline and
        // the user may resubmit. No automatic retries.
        match self.prediction_service.run(&input) {
            Ok(prediction) => {
                self.result_state = Some(ResultState::Complete { prediction });
            }
            Err(e) => {
                tracing::warn!("Prediction attempt failed: {e}");
                self.result_state = Some(ResultState::Error {
                    message: e.to_string(),
                });
            }
        }
        self.screen = Screen::Result;
    }
}
