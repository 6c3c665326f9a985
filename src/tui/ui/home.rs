//! Home page: intake form, result panel and health assistant chat.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::application::{Conversation, Sender};
use crate::domain::intake::{fields, intake_schema, Education, Gender};
use crate::domain::{Assessment, ModelResult};
use crate::tui::styles::MedicalTheme;

use super::form::{render_form_fields, FieldKind, FormField, FormState};
use super::{key_hints, render_page_header};

const GENDER_OPTIONS: &[(&str, &str)] = &Gender::CHOICES;

const EDUCATION_OPTIONS: &[(&str, &str)] = &Education::CHOICES;

const YES_NO_OPTIONS: &[(&str, &str)] = &[("yes", "Yes"), ("no", "No")];

/// Status of the latest submission. The last good result lives in
/// [`HomeState::last_assessment`] so a failed or cancelled run keeps it.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PredictionState {
    #[default]
    Idle,
    /// Waiting on the predictor; `progress` loops 0..1 for the bar
    Pending { progress: f64 },
    Complete,
    Failed(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HomeFocus {
    #[default]
    Form,
    Chat,
}

pub struct HomeState {
    pub form: FormState,
    pub prediction: PredictionState,
    pub last_assessment: Option<Assessment>,
    pub chat: Conversation,
    pub chat_input: String,
    pub focus: HomeFocus,
}

impl Default for HomeState {
    fn default() -> Self {
        Self {
            form: intake_form(),
            prediction: PredictionState::default(),
            last_assessment: None,
            chat: Conversation::new(),
            chat_input: String::new(),
            focus: HomeFocus::default(),
        }
    }
}

impl HomeState {
    /// Latest successful assessment, if any.
    #[must_use]
    pub fn assessment(&self) -> Option<&Assessment> {
        self.last_assessment.as_ref()
    }

    pub fn complete(&mut self, assessment: Assessment) {
        self.last_assessment = Some(assessment);
        self.prediction = PredictionState::Complete;
    }

    /// Drop a pending run. The previous result, if any, stays on screen.
    pub fn cancel_pending(&mut self) {
        if self.is_pending() {
            self.prediction = match self.last_assessment {
                Some(_) => PredictionState::Complete,
                None => PredictionState::Idle,
            };
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.prediction, PredictionState::Pending { .. })
    }
}

/// The fourteen intake fields in display order.
#[must_use]
pub fn intake_form() -> FormState {
    use fields::*;
    use FieldKind::{Choice, Number};

    FormState::new(
        intake_schema(),
        vec![
            FormField::new(GENDER, "Gender", "←/→ to choose", Choice(GENDER_OPTIONS)),
            FormField::new(AGE, "Age", "years", Number),
            FormField::new(EDUCATION, "Education", "←/→ to choose", Choice(EDUCATION_OPTIONS)),
            FormField::new(CURRENT_SMOKER, "Current smoker?", "←/→", Choice(YES_NO_OPTIONS)),
            FormField::new(BP_MEDS, "On BP medication?", "←/→", Choice(YES_NO_OPTIONS)),
            FormField::new(
                PREVALENT_STROKE,
                "Ever had a stroke?",
                "←/→",
                Choice(YES_NO_OPTIONS),
            ),
            FormField::new(PREVALENT_HYP, "Hypertension?", "←/→", Choice(YES_NO_OPTIONS)),
            FormField::new(DIABETES, "Diabetes?", "←/→", Choice(YES_NO_OPTIONS)),
            FormField::new(TOT_CHOL, "Total cholesterol", "mg/dL", Number),
            FormField::new(SYS_BP, "Systolic BP", "mmHg", Number),
            FormField::new(DIA_BP, "Diastolic BP", "mmHg", Number),
            FormField::new(BMI, "BMI", "kg/m²", Number),
            FormField::new(HEART_RATE, "Heart rate", "bpm", Number),
            FormField::new(GLUCOSE, "Glucose", "mg/dL", Number),
        ],
    )
}

pub fn render_home(f: &mut Frame, area: Rect, state: &HomeState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form + results
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_page_header(f, chunks[0], "Cardiovascular Risk Assessment", "User Recent Health Data");

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    render_form_fields(f, body[0], &state.form, 2, state.focus == HomeFocus::Form);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(12), Constraint::Length(12)])
        .split(body[1]);

    render_result_panel(f, right[0], state);
    render_chat(f, right[1], state);
    render_home_footer(f, chunks[2], state);
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .title(Span::styled(format!(" {title} "), MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border())
}

fn render_result_panel(f: &mut Frame, area: Rect, state: &HomeState) {
    match (&state.prediction, state.assessment()) {
        (PredictionState::Pending { progress }, _) => render_pending(f, area, *progress),
        (PredictionState::Failed(message), None) => render_failure(f, area, message),
        (PredictionState::Failed(message), Some(assessment)) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(5), Constraint::Min(0)])
                .split(area);
            render_failure(f, chunks[0], message);
            render_assessment(f, chunks[1], assessment);
        }
        (_, Some(assessment)) => render_assessment(f, area, assessment),
        (_, None) => {
            let p = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled("No Results Yet", MedicalTheme::text_secondary())),
                Line::from(""),
                Line::from(Span::styled(
                    "Please fill out the form to get your cardiovascular risk prediction",
                    MedicalTheme::text_muted(),
                )),
            ])
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(panel("Results"));
            f.render_widget(p, area);
        }
    }
}

fn render_failure(f: &mut Frame, area: Rect, message: &str) {
    let p = Paragraph::new(vec![
        Line::from(Span::styled("! Analysis Error", MedicalTheme::danger())),
        Line::from(Span::styled(message, MedicalTheme::text())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(panel("Results").border_style(MedicalTheme::danger()));
    f.render_widget(p, area);
}

fn render_pending(f: &mut Frame, area: Rect, progress: f64) {
    let block = panel("Results");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
        .margin(1)
        .split(inner);

    let text = Paragraph::new(vec![
        Line::from(Span::styled("Analyzing Your Health Data", MedicalTheme::focused())),
        Line::from(Span::styled(
            "Our AI models are processing your information...",
            MedicalTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(text, chunks[0]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).border_style(MedicalTheme::border()))
        .gauge_style(MedicalTheme::info())
        .ratio(progress.clamp(0.0, 1.0))
        .label("");
    f.render_widget(gauge, chunks[1]);
}

fn render_assessment(f: &mut Frame, area: Rect, assessment: &Assessment) {
    let block =
        panel("Cardiovascular Risk Assessment").border_style(MedicalTheme::border_focused());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Headline
            Constraint::Length(3), // Risk meter
            Constraint::Length(2), // Best model
            Constraint::Min(0),    // All models
        ])
        .split(inner);

    let tier_style = MedicalTheme::tier(assessment.tier);
    let headline = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                format!("{:.1}%", assessment.average_prediction * 100.0),
                tier_style.add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(format!("{} Risk", assessment.tier), tier_style),
        ]),
        Line::from(Span::styled(assessment.tier.advice(), MedicalTheme::text_secondary())),
    ])
    .alignment(Alignment::Center);
    f.render_widget(headline, chunks[0]);

    let meter = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" Low Risk ", MedicalTheme::text_muted()))
                .title_top(
                    Line::from(Span::styled(" High Risk ", MedicalTheme::text_muted()))
                        .right_aligned(),
                )
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(tier_style)
        .ratio(assessment.average_prediction.clamp(0.0, 1.0))
        .label(format!("{:.1}%", assessment.average_prediction * 100.0));
    f.render_widget(meter, chunks[1]);

    let best = assessment.best();
    let best_line = Paragraph::new(Line::from(vec![
        Span::styled("Most Accurate Model: ", MedicalTheme::text_secondary()),
        Span::styled(best.name.as_str(), MedicalTheme::success().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!(
                "  accuracy {:.1}%  confidence {:.1}%",
                best.accuracy * 100.0,
                best.confidence * 100.0
            ),
            MedicalTheme::text_secondary(),
        ),
    ]));
    f.render_widget(best_line, chunks[2]);

    let items: Vec<ListItem> = assessment
        .results
        .iter()
        .enumerate()
        .map(|(i, model)| model_row(model, assessment.is_best(i)))
        .collect();
    let list = List::new(items).block(
        Block::default()
            .title(Span::styled(" All Model Results ", MedicalTheme::text_secondary()))
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(list, chunks[3]);
}

fn model_row(model: &ModelResult, best: bool) -> ListItem<'_> {
    let tier = model.risk_tier();
    let marker = if best { "★ " } else { "  " };
    let name_style = if best {
        MedicalTheme::success().add_modifier(Modifier::BOLD)
    } else {
        MedicalTheme::text()
    };
    ListItem::new(Line::from(vec![
        Span::styled(marker, MedicalTheme::success()),
        Span::styled(format!("{:<24}", model.name), name_style),
        Span::styled(
            format!("acc {:>5.1}%  ", model.accuracy * 100.0),
            MedicalTheme::text_secondary(),
        ),
        Span::styled(
            format!("{:>5.1}% {}", model.prediction * 100.0, tier),
            MedicalTheme::tier(tier),
        ),
    ]))
}

fn render_chat(f: &mut Frame, area: Rect, state: &HomeState) {
    let focused = state.focus == HomeFocus::Chat;
    let block = panel("AI Health Assistant").border_style(if focused {
        MedicalTheme::border_focused()
    } else {
        MedicalTheme::border()
    });

    if !state.chat.is_enabled() {
        let p = Paragraph::new(Span::styled(
            "Complete your health assessment to unlock personalized AI-powered health guidance and insights.",
            MedicalTheme::text_muted(),
        ))
        .wrap(Wrap { trim: true })
        .block(block);
        f.render_widget(p, area);
        return;
    }

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let mut lines: Vec<Line> = Vec::new();
    for message in state.chat.messages() {
        let (who, style) = match message.sender {
            Sender::User => ("You", MedicalTheme::focused()),
            Sender::Assistant => ("Assistant", MedicalTheme::info()),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{who} {}: ", message.at.format("%H:%M")), style),
            Span::styled(message.text.as_str(), MedicalTheme::text()),
        ]));
    }
    if state.chat.is_awaiting_reply() {
        lines.push(Line::from(Span::styled(
            "Assistant is typing...",
            MedicalTheme::text_muted(),
        )));
    }

    // Keep the newest messages in view.
    let height = chunks[0].height;
    let approx_rows: u16 = lines
        .iter()
        .map(|l| (l.width() as u16 / chunks[0].width.max(1)) + 1)
        .sum();
    let scroll = approx_rows.saturating_sub(height);

    let history = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(history, chunks[0]);

    let input = if state.chat_input.is_empty() && !focused {
        Line::from(Span::styled(
            "Ask me about your heart health...",
            MedicalTheme::text_muted(),
        ))
    } else {
        Line::from(vec![
            Span::styled("> ", MedicalTheme::key_hint()),
            Span::styled(state.chat_input.as_str(), MedicalTheme::text()),
            if focused {
                Span::styled("▌", MedicalTheme::cursor())
            } else {
                Span::raw("")
            },
        ])
    };
    f.render_widget(Paragraph::new(input), chunks[1]);
}

fn render_home_footer(f: &mut Frame, area: Rect, state: &HomeState) {
    let hints: &[(&str, &str)] = match state.focus {
        HomeFocus::Form => &[
            ("[↑↓]", "Field"),
            ("[←→]", "Choose"),
            ("[Enter]", "Analyze"),
            ("[Ctrl+S]", "Sample Data"),
            ("[Tab]", "Chat"),
        ],
        HomeFocus::Chat => &[("[Enter]", "Send"), ("[Tab]", "Form")],
    };
    key_hints(f, area, hints);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intake::sample_values;
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_sample_data_fills_every_field() {
        let mut state = HomeState::default();
        state.form.load(&sample_values());
        assert!(state.form.validate_all());
        assert!(state.form.fields.iter().all(|f| !f.value.is_empty()));
    }

    #[test]
    fn test_render_idle_and_complete() {
        let mut terminal = Terminal::new(TestBackend::new(160, 48)).expect("terminal");
        let mut state = HomeState::default();

        terminal
            .draw(|f| render_home(f, f.area(), &state))
            .expect("draw idle");
        assert!(buffer_text(&terminal).contains("No Results Yet"));

        let assessment = Assessment::from_results(vec![
            ModelResult::new("Random Forest", 0.89, 0.22, 0.92),
            ModelResult::new("Neural Network", 0.91, 0.28, 0.94),
        ])
        .expect("non-empty");
        state.complete(assessment);
        state.chat.enable();

        terminal
            .draw(|f| render_home(f, f.area(), &state))
            .expect("draw complete");
        let text = buffer_text(&terminal);
        assert!(text.contains("Most Accurate Model: Neural Network"));
        assert!(text.contains("Low Risk"));
    }

    #[test]
    fn test_failure_keeps_previous_result_visible() {
        let mut terminal = Terminal::new(TestBackend::new(160, 48)).expect("terminal");
        let mut state = HomeState::default();
        state.complete(
            Assessment::from_results(vec![ModelResult::new("Random Forest", 0.89, 0.22, 0.92)])
                .expect("non-empty"),
        );
        state.prediction = PredictionState::Failed("Service unavailable".to_string());

        terminal
            .draw(|f| render_home(f, f.area(), &state))
            .expect("draw failed");
        let text = buffer_text(&terminal);
        assert!(text.contains("Analysis Error"));
        assert!(text.contains("Service unavailable"));
        assert!(text.contains("Most Accurate Model: Random Forest"));
    }

    #[test]
    fn test_cancel_restores_previous_result() {
        let mut state = HomeState::default();
        state.prediction = PredictionState::Pending { progress: 0.5 };
        state.cancel_pending();
        assert_eq!(state.prediction, PredictionState::Idle);

        state.complete(
            Assessment::from_results(vec![ModelResult::new("Random Forest", 0.89, 0.22, 0.92)])
                .expect("non-empty"),
        );
        state.prediction = PredictionState::Pending { progress: 0.5 };
        state.cancel_pending();
        assert_eq!(state.prediction, PredictionState::Complete);
        assert!(state.assessment().is_some());
    }

    #[test]
    fn test_render_pending() {
        let mut terminal = Terminal::new(TestBackend::new(160, 48)).expect("terminal");
        let state = HomeState {
            prediction: PredictionState::Pending { progress: 0.4 },
            ..HomeState::default()
        };
        terminal
            .draw(|f| render_home(f, f.area(), &state))
            .expect("draw pending");
        assert!(buffer_text(&terminal).contains("Analyzing Your Health Data"));
    }
}
