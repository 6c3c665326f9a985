//! Sign-in and sign-up pages.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::domain::session::{fields, sign_in_schema, sign_up_schema};

use super::form::{render_form_fields, FieldKind, FormField, FormState};
use super::key_hints;
use crate::tui::styles::{MedicalTheme, LOGO_SMALL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    SignIn,
    SignUp,
}

impl AuthMode {
    fn title(self) -> &'static str {
        match self {
            Self::SignIn => "Welcome Back",
            Self::SignUp => "Create Account",
        }
    }

    fn subtitle(self) -> &'static str {
        match self {
            Self::SignIn => "Sign in to view your assessment history",
            Self::SignUp => "Join our cardiovascular health platform",
        }
    }

    fn pending_label(self) -> &'static str {
        match self {
            Self::SignIn => "Signing In...",
            Self::SignUp => "Creating Account...",
        }
    }
}

/// State of one auth page.
pub struct AuthPageState {
    pub mode: AuthMode,
    pub form: FormState,
    /// Request in flight; submit is disabled
    pub pending: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl AuthPageState {
    #[must_use]
    pub fn sign_in() -> Self {
        use fields::*;
        Self::with_form(
            AuthMode::SignIn,
            FormState::new(
                sign_in_schema(),
                vec![
                    FormField::new(EMAIL, "Email Address", "john.doe@example.com", FieldKind::Text),
                    FormField::new(PASSWORD, "Password", "Enter your password", FieldKind::Secret),
                ],
            ),
        )
    }

    #[must_use]
    pub fn sign_up() -> Self {
        use fields::*;
        Self::with_form(
            AuthMode::SignUp,
            FormState::new(
                sign_up_schema(),
                vec![
                    FormField::new(FIRST_NAME, "First Name", "John", FieldKind::Text),
                    FormField::new(LAST_NAME, "Last Name", "Doe", FieldKind::Text),
                    FormField::new(EMAIL, "Email Address", "john.doe@example.com", FieldKind::Text),
                    FormField::new(PASSWORD, "Password", "Enter your password", FieldKind::Secret),
                    FormField::new(
                        CONFIRM_PASSWORD,
                        "Confirm Password",
                        "Confirm your password",
                        FieldKind::Secret,
                    ),
                    FormField::new(
                        AGREE_TO_TERMS,
                        "I agree to the Terms of Service and Privacy Policy",
                        "",
                        FieldKind::Checkbox,
                    ),
                ],
            ),
        )
    }

    fn with_form(mode: AuthMode, form: FormState) -> Self {
        Self {
            mode,
            form,
            pending: false,
            error: None,
            notice: None,
        }
    }

    /// Clear messages and every typed value.
    pub fn reset(&mut self) {
        self.form.clear_sensitive();
        self.pending = false;
        self.error = None;
        self.notice = None;
    }
}

pub fn render_auth(f: &mut Frame, area: Rect, state: &AuthPageState) {
    let form_height = state.form.fields.len() as u16 * 3;
    let card_height = (form_height + 9).min(area.height);
    let card_width = 64.min(area.width);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(card_height),
            Constraint::Min(0),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(card_width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);
    let card = horizontal[1];

    let block = Block::default()
        .title(Span::styled(format!(" {LOGO_SMALL} "), MedicalTheme::danger()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused());
    let inner = block.inner(card);
    f.render_widget(block, card);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),           // Title
            Constraint::Length(form_height), // Fields
            Constraint::Length(2),           // Status
            Constraint::Min(0),              // Hints
        ])
        .split(inner);

    let heading = Paragraph::new(vec![
        Line::from(Span::styled(state.mode.title(), MedicalTheme::title())),
        Line::from(Span::styled(state.mode.subtitle(), MedicalTheme::text_muted())),
    ])
    .alignment(Alignment::Center);
    f.render_widget(heading, chunks[0]);

    render_form_fields(f, chunks[1], &state.form, 1, !state.pending);

    let status = if state.pending {
        Line::from(Span::styled(state.mode.pending_label(), MedicalTheme::info()))
    } else if let Some(error) = &state.error {
        Line::from(Span::styled(error.as_str(), MedicalTheme::danger()))
    } else if let Some(notice) = &state.notice {
        Line::from(Span::styled(notice.as_str(), MedicalTheme::warning()))
    } else {
        Line::from("")
    };
    f.render_widget(
        Paragraph::new(status)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[2],
    );

    let hints: &[(&str, &str)] = match state.mode {
        AuthMode::SignIn => &[
            ("[Enter]", "Sign In"),
            ("[Ctrl+F]", "Forgot?"),
            ("[F4]", "Sign Up"),
            ("[Esc]", "Home"),
        ],
        AuthMode::SignUp => &[
            ("[Enter]", "Create"),
            ("[Space]", "Agree"),
            ("[F3]", "Sign In"),
            ("[Esc]", "Home"),
        ],
    };
    key_hints(f, chunks[3], hints);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_sign_up_requires_terms() {
        let mut state = AuthPageState::sign_up();
        assert!(!state.form.validate_all());
        assert_eq!(
            state.form.error_for(fields::AGREE_TO_TERMS),
            Some("You must agree to the terms and conditions")
        );
    }

    #[test]
    fn test_reset_wipes_password() {
        let mut state = AuthPageState::sign_in();
        state.form.selected_field = 1;
        for c in "Secret123".chars() {
            state.form.input_char(c);
        }
        state.error = Some("boom".to_string());

        state.reset();
        assert!(state.form.fields[1].value.is_empty());
        assert!(state.error.is_none());
    }

    #[test]
    fn test_render_sign_in() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("terminal");
        let state = AuthPageState::sign_in();
        terminal
            .draw(|f| render_auth(f, f.area(), &state))
            .expect("draw");
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Welcome Back"));
    }
}
