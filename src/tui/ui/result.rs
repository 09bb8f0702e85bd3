//! Prediction result view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::domain::Prediction;
use crate::tui::styles::MedicalTheme;

/// Result screen state
#[derive(Debug, Clone)]
pub enum ResultState {
    /// Prediction completed
    Complete { prediction: Prediction },
    /// Prediction attempt failed; user may retry with adjusted input
    Error { message: String },
}

/// Render the prediction result view
pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_result_header(f, chunks[0]);
    match state {
        ResultState::Complete { prediction } => render_prediction(f, chunks[1], prediction),
        ResultState::Error { message } => render_error(f, chunks[1], message),
    }
    render_result_footer(f, chunks[2], state);
}

fn render_result_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Prediction Result", MedicalTheme::title()),
        Span::styled(" │ Cardiovascular Risk", MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_prediction(f: &mut Frame, area: Rect, prediction: &Prediction) {
    let block = Block::default()
        .title(Span::styled(" Diagnosis ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Label headline
            Constraint::Length(4), // Probability gauge
            Constraint::Length(3), // Tier message
            Constraint::Min(0),    // Padding
        ])
        .margin(1)
        .split(inner);

    let label_style = MedicalTheme::label(prediction.label);
    let headline = Paragraph::new(Line::from(Span::styled(
        prediction.label.headline(),
        label_style.add_modifier(ratatui::style::Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    f.render_widget(headline, chunks[0]);

    match prediction.probability {
        Some(probability) => {
            let gauge_style = prediction
                .tier
                .map_or_else(MedicalTheme::info, MedicalTheme::tier);
            let gauge = Gauge::default()
                .block(
                    Block::default()
                        .title(Span::styled(
                            " Estimated Probability ",
                            MedicalTheme::text_secondary(),
                        ))
                        .borders(Borders::ALL)
                        .border_style(MedicalTheme::border()),
                )
                .gauge_style(gauge_style)
                .percent((probability * 100.0).clamp(0.0, 100.0) as u16)
                .label(format!("{probability:.2}"));
            f.render_widget(gauge, chunks[1]);
        }
        None => {
            let notice = Paragraph::new(Line::from(Span::styled(
                "This model does not provide probability estimates.",
                MedicalTheme::text_muted(),
            )))
            .alignment(Alignment::Center);
            f.render_widget(notice, chunks[1]);
        }
    }

    if let Some(tier) = prediction.tier {
        let tier_line = Paragraph::new(Line::from(vec![
            Span::styled(
                format!("{tier}: "),
                MedicalTheme::tier(tier).add_modifier(ratatui::style::Modifier::BOLD),
            ),
            Span::styled(tier.description(), MedicalTheme::text_secondary()),
        ]))
        .alignment(Alignment::Center);
        f.render_widget(tier_line, chunks[2]);
    }
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Prediction Failed", MedicalTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, MedicalTheme::text())),
        Line::from(""),
        Line::from(Span::styled(
            "Adjust the input and submit again.",
            MedicalTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::danger()),
    );

    f.render_widget(content, area);
}

fn render_result_footer(f: &mut Frame, area: Rect, state: &ResultState) {
    let content = match state {
        ResultState::Complete { .. } => Line::from(vec![
            Span::styled("[N/Enter] ", MedicalTheme::key_hint()),
            Span::styled("New Prediction ", MedicalTheme::key_desc()),
            Span::styled("[M] ", MedicalTheme::key_hint()),
            Span::styled("Metrics ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Back", MedicalTheme::key_desc()),
        ]),
        ResultState::Error { .. } => Line::from(vec![
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Retry ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Back", MedicalTheme::key_desc()),
        ]),
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
