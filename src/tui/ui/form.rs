//! Patient data input form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::{CholesterolLevel, GlucoseLevel, PatientInput};
use crate::tui::styles::MedicalTheme;

/// A single form field: free-text numeric entry or a cycle-to-select choice.
#[derive(Debug, Clone)]
pub enum FormField {
    Numeric {
        label: &'static str,
        hint: &'static str,
        value: String,
        min: f64,
        max: f64,
    },
    Choice {
        label: &'static str,
        options: &'static [&'static str],
        selected: usize,
    },
}

impl FormField {
    fn label(&self) -> &'static str {
        match self {
            Self::Numeric { label, .. } | Self::Choice { label, .. } => label,
        }
    }
}

// Field indices, matching the order built in `Default`.
const FIELD_AGE: usize = 0;
const FIELD_HEIGHT: usize = 1;
const FIELD_WEIGHT: usize = 2;
const FIELD_SYSTOLIC: usize = 3;
const FIELD_DIASTOLIC: usize = 4;
const FIELD_CHOLESTEROL: usize = 5;
const FIELD_GLUCOSE: usize = 6;
const FIELD_SMOKE: usize = 7;
const FIELD_ALCOHOL: usize = 8;
const FIELD_ACTIVITY: usize = 9;

/// Patient form state
pub struct FormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            fields: vec![
                FormField::Numeric {
                    label: "Age",
                    hint: "years (18-100)",
                    value: String::new(),
                    min: 18.0,
                    max: 100.0,
                },
                FormField::Numeric {
                    label: "Height",
                    hint: "cm (120-220)",
                    value: String::new(),
                    min: 120.0,
                    max: 220.0,
                },
                FormField::Numeric {
                    label: "Weight",
                    hint: "kg (40-200)",
                    value: String::new(),
                    min: 40.0,
                    max: 200.0,
                },
                FormField::Numeric {
                    label: "Systolic BP",
                    hint: "ap_hi, mmHg (80-250)",
                    value: String::new(),
                    min: 80.0,
                    max: 250.0,
                },
                FormField::Numeric {
                    label: "Diastolic BP",
                    hint: "ap_lo, mmHg (50-200)",
                    value: String::new(),
                    min: 50.0,
                    max: 200.0,
                },
                FormField::Choice {
                    label: "Cholesterol",
                    options: &["Normal", "Medio", "Alto"],
                    selected: 0,
                },
                FormField::Choice {
                    label: "Glucose",
                    options: &["Normal", "Elevada", "Muy Elevada"],
                    selected: 0,
                },
                FormField::Choice {
                    label: "Smoking",
                    options: &["No fuma", "Fuma"],
                    selected: 0,
                },
                FormField::Choice {
                    label: "Alcohol",
                    options: &["No consume alcohol", "Consume alcohol"],
                    selected: 0,
                },
                FormField::Choice {
                    label: "Physical activity",
                    options: &["Activo", "Inactivo"],
                    selected: 0,
                },
            ],
            selected_field: 0,
            error_message: None,
        }
    }
}

impl FormState {
    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Add a character to the current numeric field
    pub fn input_char(&mut self, c: char) {
        if let FormField::Numeric { value, .. } = &mut self.fields[self.selected_field] {
            if c.is_ascii_digit() || c == '.' {
                value.push(c);
                self.error_message = None;
            }
        }
    }

    /// Delete the last character of the current numeric field
    pub fn delete_char(&mut self) {
        if let FormField::Numeric { value, .. } = &mut self.fields[self.selected_field] {
            value.pop();
        }
    }

    /// Clear the current numeric field
    pub fn clear_field(&mut self) {
        if let FormField::Numeric { value, .. } = &mut self.fields[self.selected_field] {
            value.clear();
        }
    }

    /// Cycle the current choice field forward or backward
    pub fn cycle_choice(&mut self, forward: bool) {
        if let FormField::Choice {
            options, selected, ..
        } = &mut self.fields[self.selected_field]
        {
            if forward {
                *selected = (*selected + 1) % options.len();
            } else {
                *selected = (*selected + options.len() - 1) % options.len();
            }
            self.error_message = None;
        }
    }

    fn numeric_value(&self, index: usize) -> Result<f64, String> {
        match &self.fields[index] {
            FormField::Numeric {
                label,
                value,
                min,
                max,
                ..
            } => {
                let parsed: f64 = value
                    .parse()
                    .map_err(|_| format!("{label}: Invalid number"))?;
                if parsed < *min || parsed > *max {
                    return Err(format!(
                        "{label}: Value must be between {min} and {max}"
                    ));
                }
                Ok(parsed)
            }
            FormField::Choice { label, .. } => Err(format!("{label}: not a numeric field")),
        }
    }

    fn choice_index(&self, index: usize) -> usize {
        match &self.fields[index] {
            FormField::Choice { selected, .. } => *selected,
            FormField::Numeric { .. } => 0,
        }
    }

    /// Validate and convert the form into a `PatientInput`.
    ///
    /// # Errors
    /// Returns the first parse/range violation as a display string.
    pub fn to_patient_input(&self) -> Result<PatientInput, String> {
        let input = PatientInput {
            age_years: self.numeric_value(FIELD_AGE)? as u32,
            height_cm: self.numeric_value(FIELD_HEIGHT)? as u32,
            weight_kg: self.numeric_value(FIELD_WEIGHT)?,
            systolic: self.numeric_value(FIELD_SYSTOLIC)? as u32,
            diastolic: self.numeric_value(FIELD_DIASTOLIC)? as u32,
            cholesterol: CholesterolLevel::ALL[self.choice_index(FIELD_CHOLESTEROL)],
            glucose: GlucoseLevel::ALL[self.choice_index(FIELD_GLUCOSE)],
            smokes: self.choice_index(FIELD_SMOKE) == 1,
            drinks_alcohol: self.choice_index(FIELD_ALCOHOL) == 1,
            physically_active: self.choice_index(FIELD_ACTIVITY) == 0,
        };

        if let Err(errors) = input.validate() {
            return Err(errors.join(", "));
        }

        Ok(input)
    }

    /// Load sample data (the dataset's reference patient).
    pub fn load_sample_data(&mut self) {
        let sample = ["50", "165", "70", "120", "80"];
        for (i, val) in sample.iter().enumerate() {
            if let FormField::Numeric { value, .. } = &mut self.fields[i] {
                *value = (*val).to_string();
            }
        }
        for field in self.fields.iter_mut() {
            if let FormField::Choice { selected, .. } = field {
                *selected = 0;
            }
        }
    }
}

/// Render the patient data input form
pub fn render_form(f: &mut Frame, area: Rect, state: &FormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0]);
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Patient Data Entry", MedicalTheme::title()),
        Span::styled(
            " │ Cardiovascular Risk Prediction",
            MedicalTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &FormState) {
    // Two-column layout
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = (state.fields.len() + 1) / 2;

    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[mid..],
        mid,
        state.selected_field,
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let field_height = 3;
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(field_height))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let border_style = if is_selected {
            MedicalTheme::border_focused()
        } else {
            MedicalTheme::border()
        };

        let title_style = if is_selected {
            MedicalTheme::focused()
        } else {
            MedicalTheme::text_secondary()
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label()), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let content = match field {
            FormField::Numeric { value, hint, .. } => {
                let value_display = if value.is_empty() {
                    Span::styled(*hint, MedicalTheme::text_muted())
                } else {
                    Span::styled(value.as_str(), MedicalTheme::text())
                };
                Line::from(vec![
                    Span::raw(" "),
                    value_display,
                    if is_selected {
                        Span::styled("▌", MedicalTheme::focused())
                    } else {
                        Span::raw("")
                    },
                ])
            }
            FormField::Choice {
                options, selected, ..
            } => {
                let arrows_style = if is_selected {
                    MedicalTheme::focused()
                } else {
                    MedicalTheme::text_muted()
                };
                Line::from(vec![
                    Span::styled(" ◄ ", arrows_style),
                    Span::styled(options[*selected], MedicalTheme::text()),
                    Span::styled(" ► ", arrows_style),
                ])
            }
        };

        f.render_widget(Paragraph::new(content).block(block), chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &FormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.clone(), MedicalTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", MedicalTheme::key_hint()),
            Span::styled("Navigate ", MedicalTheme::key_desc()),
            Span::styled("[◄►] ", MedicalTheme::key_hint()),
            Span::styled("Select ", MedicalTheme::key_desc()),
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Predict ", MedicalTheme::key_desc()),
            Span::styled("[S] ", MedicalTheme::key_hint()),
            Span::styled("Sample ", MedicalTheme::key_desc()),
            Span::styled("[M] ", MedicalTheme::key_hint()),
            Span::styled("Metrics ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> FormState {
        let mut state = FormState::default();
        state.load_sample_data();
        state
    }

    #[test]
    fn test_sample_data_parses_to_reference_patient() {
        let input = filled_form().to_patient_input().expect("Should parse");
        assert_eq!(input.age_years, 50);
        assert_eq!(input.height_cm, 165);
        assert!((input.weight_kg - 70.0).abs() < f64::EPSILON);
        assert_eq!(input.systolic, 120);
        assert_eq!(input.diastolic, 80);
        assert_eq!(input.cholesterol, CholesterolLevel::Normal);
        assert_eq!(input.glucose, GlucoseLevel::Normal);
        assert!(!input.smokes);
        assert!(!input.drinks_alcohol);
        assert!(input.physically_active);
    }

    #[test]
    fn test_empty_numeric_field_is_an_error() {
        let state = FormState::default();
        let err = state.to_patient_input().unwrap_err();
        assert!(err.contains("Age"));
    }

    #[test]
    fn test_out_of_range_is_an_error() {
        let mut state = filled_form();
        if let FormField::Numeric { value, .. } = &mut state.fields[FIELD_SYSTOLIC] {
            *value = "300".to_string();
        }
        let err = state.to_patient_input().unwrap_err();
        assert!(err.contains("Systolic"));
    }

    #[test]
    fn test_choice_cycling_wraps() {
        let mut state = filled_form();
        state.selected_field = FIELD_CHOLESTEROL;
        state.cycle_choice(false);
        let input = state.to_patient_input().expect("Should parse");
        assert_eq!(input.cholesterol, CholesterolLevel::High);

        state.cycle_choice(true);
        let input = state.to_patient_input().expect("Should parse");
        assert_eq!(input.cholesterol, CholesterolLevel::Normal);
    }

    #[test]
    fn test_activity_choice_maps_inverted() {
        let mut state = filled_form();
        state.selected_field = FIELD_ACTIVITY;
        state.cycle_choice(true); // "Inactivo"
        let input = state.to_patient_input().expect("Should parse");
        assert!(!input.physically_active);
    }

    #[test]
    fn test_input_char_ignores_letters() {
        let mut state = FormState::default();
        state.input_char('a');
        state.input_char('4');
        state.input_char('2');
        if let FormField::Numeric { value, .. } = &state.fields[FIELD_AGE] {
            assert_eq!(value, "42");
        } else {
            panic!("age field must be numeric");
        }
    }
}
