//! Model evaluation view: confusion matrix and named test metrics.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::domain::MetricsReport;
use crate::tui::styles::MedicalTheme;

/// Metrics screen state, resolved once from the lazy metrics holder.
#[derive(Debug, Clone)]
pub enum MetricsViewState {
    Available { report: MetricsReport },
    Unavailable { reason: String },
}

/// Render the metrics view
pub fn render_metrics(f: &mut Frame, area: Rect, state: &MetricsViewState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_metrics_header(f, chunks[0]);
    match state {
        MetricsViewState::Available { report } => render_report(f, chunks[1], report),
        MetricsViewState::Unavailable { reason } => render_unavailable(f, chunks[1], reason),
    }
    render_metrics_footer(f, chunks[2]);
}

fn render_metrics_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Model Evaluation", MedicalTheme::title()),
        Span::styled(" │ Held-out Test Set", MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_report(f: &mut Frame, area: Rect, report: &MetricsReport) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .margin(1)
        .split(area);

    render_confusion_matrix(f, chunks[0], report);
    render_test_metrics(f, chunks[1], report);
}

fn render_confusion_matrix(f: &mut Frame, area: Rect, report: &MetricsReport) {
    let block = Block::default()
        .title(Span::styled(" Confusion Matrix ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let m = &report.confusion_matrix;
    let width = m.iter().flatten().map(|v| v.to_string().len()).max().unwrap_or(1);

    let lines = vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            format!(
                "{:>16}  {:>w$}  {:>w$}",
                "",
                "Pred 0",
                "Pred 1",
                w = width.max(6)
            ),
            MedicalTheme::text_secondary(),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{:>16}  ", "Actual 0"), MedicalTheme::text_secondary()),
            Span::styled(
                format!("{:>w$}", m[0][0], w = width.max(6)),
                MedicalTheme::success(),
            ),
            Span::raw("  "),
            Span::styled(
                format!("{:>w$}", m[0][1], w = width.max(6)),
                MedicalTheme::warning(),
            ),
        ]),
        Line::from(vec![
            Span::styled(format!("{:>16}  ", "Actual 1"), MedicalTheme::text_secondary()),
            Span::styled(
                format!("{:>w$}", m[1][0], w = width.max(6)),
                MedicalTheme::warning(),
            ),
            Span::raw("  "),
            Span::styled(
                format!("{:>w$}", m[1][1], w = width.max(6)),
                MedicalTheme::success(),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Test samples: ", MedicalTheme::text_secondary()),
            Span::styled(report.total_samples().to_string(), MedicalTheme::text()),
        ]),
    ];

    f.render_widget(Paragraph::new(lines), inner);
}

fn render_test_metrics(f: &mut Frame, area: Rect, report: &MetricsReport) {
    let block = Block::default()
        .title(Span::styled(" Test Metrics ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let inner = block.inner(area);
    f.render_widget(block, area);

    if report.test_metrics.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No named metrics in the report",
            MedicalTheme::text_muted(),
        )))
        .alignment(Alignment::Center);
        f.render_widget(empty, inner);
        return;
    }

    let constraints: Vec<Constraint> = report
        .test_metrics
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(inner);

    for (i, (name, value)) in report.test_metrics.iter().enumerate() {
        let clamped = value.clamp(0.0, 1.0);
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .title(Span::styled(
                        format!(" {name} "),
                        MedicalTheme::text_secondary(),
                    ))
                    .borders(Borders::ALL)
                    .border_style(MedicalTheme::border()),
            )
            .gauge_style(MedicalTheme::gauge(clamped))
            .percent((clamped * 100.0) as u16)
            .label(format!("{value:.3}"));
        f.render_widget(gauge, chunks[i]);
    }
}

fn render_unavailable(f: &mut Frame, area: Rect, reason: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "! Metrics Unavailable",
            MedicalTheme::warning(),
        )),
        Line::from(""),
        Line::from(Span::styled(reason, MedicalTheme::text())),
        Line::from(""),
        Line::from(Span::styled(
            "Prediction remains fully functional.",
            MedicalTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_metrics_footer(f: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("[Esc] ", MedicalTheme::key_hint()),
        Span::styled("Back to form", MedicalTheme::key_desc()),
    ]))
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
