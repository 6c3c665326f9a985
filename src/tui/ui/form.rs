//! Keyboard-driven form shared by the intake, sign-in and sign-up pages.
//!
//! Fields are validated against a [`Schema`] as they change. An error is
//! only shown once its field has been touched, or after a submit attempt.

use std::collections::HashSet;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{FieldErrors, FormValues, Schema};
use crate::tui::styles::MedicalTheme;

/// How a field accepts input and displays its value.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Number,
    Text,
    /// Masked text
    Secret,
    /// Cycled with ←/→; `(value, label)` pairs
    Choice(&'static [(&'static str, &'static str)]),
    /// Toggled with space; value is `"true"` or `"false"`
    Checkbox,
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub hint: &'static str,
    pub kind: FieldKind,
    pub value: String,
}

impl FormField {
    #[must_use]
    pub fn new(
        name: &'static str,
        label: &'static str,
        hint: &'static str,
        kind: FieldKind,
    ) -> Self {
        let value = match kind {
            FieldKind::Checkbox => "false".to_string(),
            _ => String::new(),
        };
        Self {
            name,
            label,
            hint,
            kind,
            value,
        }
    }

    /// Text shown in the field box.
    #[must_use]
    pub fn display(&self) -> String {
        match self.kind {
            FieldKind::Secret => "•".repeat(self.value.chars().count()),
            FieldKind::Choice(options) => options
                .iter()
                .find(|(v, _)| *v == self.value)
                .map(|(_, label)| format!("◂ {label} ▸"))
                .unwrap_or_default(),
            FieldKind::Checkbox => {
                if self.value == "true" {
                    "[x] Yes".to_string()
                } else {
                    "[ ] No".to_string()
                }
            }
            FieldKind::Number | FieldKind::Text => self.value.clone(),
        }
    }

    fn is_blank(&self) -> bool {
        match self.kind {
            FieldKind::Checkbox => false,
            _ => self.value.is_empty(),
        }
    }
}

pub struct FormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    schema: &'static Schema,
    touched: HashSet<&'static str>,
    errors: FieldErrors,
}

impl FormState {
    #[must_use]
    pub fn new(schema: &'static Schema, fields: Vec<FormField>) -> Self {
        Self {
            fields,
            selected_field: 0,
            schema,
            touched: HashSet::new(),
            errors: FieldErrors::new(),
        }
    }

    #[must_use]
    pub fn values(&self) -> FormValues {
        let mut values = FormValues::new();
        for field in &self.fields {
            values.set(field.name, field.value.clone());
        }
        values
    }

    #[must_use]
    pub fn current(&self) -> &FormField {
        &self.fields[self.selected_field]
    }

    /// Visible error for a field, if any.
    #[must_use]
    pub fn error_for(&self, name: &str) -> Option<&str> {
        self.errors.get(name)
    }

    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Type a character into the selected field. Space toggles a checkbox.
    pub fn input_char(&mut self, c: char) {
        let accepted = match self.current().kind {
            FieldKind::Number => c.is_ascii_digit() || c == '.' || c == '-',
            FieldKind::Text | FieldKind::Secret => !c.is_control(),
            FieldKind::Checkbox => {
                if c == ' ' {
                    self.toggle();
                }
                return;
            }
            FieldKind::Choice(_) => false,
        };
        if accepted {
            self.fields[self.selected_field].value.push(c);
            self.changed();
        }
    }

    pub fn delete_char(&mut self) {
        let field = &mut self.fields[self.selected_field];
        if matches!(field.kind, FieldKind::Number | FieldKind::Text | FieldKind::Secret) {
            field.value.pop();
            self.changed();
        }
    }

    pub fn clear_field(&mut self) {
        let field = &mut self.fields[self.selected_field];
        match field.kind {
            FieldKind::Checkbox => field.value = "false".to_string(),
            _ => field.value.zeroize(),
        }
        self.changed();
    }

    /// Step a choice field forward or back. Blank steps to the first/last option.
    pub fn cycle(&mut self, forward: bool) {
        let field = &mut self.fields[self.selected_field];
        let FieldKind::Choice(options) = field.kind else {
            return;
        };
        if options.is_empty() {
            return;
        }
        let len = options.len();
        let next = match options.iter().position(|(v, _)| *v == field.value) {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None if forward => 0,
            None => len - 1,
        };
        field.value = options[next].0.to_string();
        self.changed();
    }

    pub fn toggle(&mut self) {
        let field = &mut self.fields[self.selected_field];
        if matches!(field.kind, FieldKind::Checkbox) {
            field.value = if field.value == "true" { "false" } else { "true" }.to_string();
            self.changed();
        }
    }

    /// Replace every field value present in `values`.
    pub fn load(&mut self, values: &FormValues) {
        for field in &mut self.fields {
            field.value = values.get(field.name).to_string();
        }
        self.touched.extend(self.fields.iter().map(|f| f.name));
        self.revalidate();
    }

    /// Touch every field and validate. Returns `true` if the form is clean.
    pub fn validate_all(&mut self) -> bool {
        self.touched.extend(self.fields.iter().map(|f| f.name));
        self.revalidate();
        self.errors.is_empty()
    }

    /// Wipe all buffers and reset validation state.
    pub fn clear_sensitive(&mut self) {
        for field in &mut self.fields {
            field.value.zeroize();
            if matches!(field.kind, FieldKind::Checkbox) {
                field.value.push_str("false");
            }
        }
        self.touched.clear();
        self.errors = FieldErrors::new();
        self.selected_field = 0;
    }

    fn changed(&mut self) {
        let name = self.fields[self.selected_field].name;
        self.touched.insert(name);
        self.revalidate();
    }

    // Touched fields are re-checked together so cross-field rules
    // (password confirmation) track edits to either side.
    fn revalidate(&mut self) {
        let values = self.values();
        let mut errors = FieldErrors::new();
        for field in &self.fields {
            if !self.touched.contains(field.name) {
                continue;
            }
            if let Some(message) = self.schema.validate_field(field.name, &values) {
                errors.insert(field.name, message);
            }
        }
        self.errors = errors;
    }
}

/// Render fields as a grid of bordered boxes, filling columns top to bottom.
pub fn render_form_fields(
    f: &mut Frame,
    area: Rect,
    state: &FormState,
    columns: usize,
    focused: bool,
) {
    let columns = columns.max(1);
    let per_column = state.fields.len().div_ceil(columns);

    let column_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
        .split(area);

    for (col, column_area) in column_areas.iter().enumerate() {
        let start = col * per_column;
        let end = (start + per_column).min(state.fields.len());
        if start >= end {
            continue;
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                (start..end)
                    .map(|_| Constraint::Length(3))
                    .chain(std::iter::once(Constraint::Min(0)))
                    .collect::<Vec<_>>(),
            )
            .split(*column_area);

        for (row, index) in (start..end).enumerate() {
            render_field(f, rows[row], state, index, focused);
        }
    }
}

fn render_field(f: &mut Frame, area: Rect, state: &FormState, index: usize, focused: bool) {
    let field = &state.fields[index];
    let is_selected = focused && index == state.selected_field;
    let error = state.error_for(field.name);

    let border_style = match (error, is_selected) {
        (Some(_), _) => MedicalTheme::danger(),
        (None, true) => MedicalTheme::border_focused(),
        (None, false) => MedicalTheme::border(),
    };
    let title_style = if is_selected {
        MedicalTheme::focused()
    } else {
        MedicalTheme::text_secondary()
    };

    let mut block = Block::default()
        .title(Span::styled(format!(" {} ", field.label), title_style))
        .borders(Borders::ALL)
        .border_style(border_style);
    if let Some(message) = error {
        block = block.title_bottom(Span::styled(format!(" {message} "), MedicalTheme::danger()));
    }

    let value = if field.is_blank() {
        Span::styled(field.hint, MedicalTheme::text_muted())
    } else {
        Span::styled(field.display(), MedicalTheme::text())
    };

    let content = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        value,
        if is_selected {
            Span::styled("▌", MedicalTheme::cursor())
        } else {
            Span::raw("")
        },
    ]))
    .block(block);

    f.render_widget(content, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::{fields, sign_up_schema};

    fn sign_up_form() -> FormState {
        FormState::new(
            sign_up_schema(),
            vec![
                FormField::new(fields::PASSWORD, "Password", "", FieldKind::Secret),
                FormField::new(fields::CONFIRM_PASSWORD, "Confirm", "", FieldKind::Secret),
                FormField::new(fields::AGREE_TO_TERMS, "Terms", "", FieldKind::Checkbox),
            ],
        )
    }

    fn type_str(form: &mut FormState, s: &str) {
        for c in s.chars() {
            form.input_char(c);
        }
    }

    #[test]
    fn test_errors_only_for_touched_fields() {
        let mut form = sign_up_form();
        type_str(&mut form, "short");
        assert_eq!(
            form.error_for(fields::PASSWORD),
            Some("Password must be at least 8 characters")
        );
        assert_eq!(form.error_for(fields::CONFIRM_PASSWORD), None);
        assert_eq!(form.error_for(fields::AGREE_TO_TERMS), None);
    }

    #[test]
    fn test_confirmation_tracks_both_fields() {
        let mut form = sign_up_form();
        type_str(&mut form, "Secret123");
        form.next_field();
        type_str(&mut form, "Secret12");
        assert_eq!(form.error_for(fields::CONFIRM_PASSWORD), Some("Passwords must match"));

        form.prev_field();
        form.delete_char();
        assert_eq!(form.error_for(fields::CONFIRM_PASSWORD), None);
    }

    #[test]
    fn test_secret_is_masked_and_wiped() {
        let mut form = sign_up_form();
        type_str(&mut form, "abc");
        assert_eq!(form.current().display(), "•••");

        form.clear_sensitive();
        assert!(form.fields.iter().take(2).all(|f| f.value.is_empty()));
        assert_eq!(form.fields[2].value, "false");
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_checkbox_toggle_and_submit_validation() {
        let mut form = sign_up_form();
        assert!(!form.validate_all());
        assert!(form.error_for(fields::AGREE_TO_TERMS).is_some());

        form.selected_field = 2;
        form.input_char(' ');
        assert_eq!(form.fields[2].value, "true");
        assert_eq!(form.error_for(fields::AGREE_TO_TERMS), None);
    }

    #[test]
    fn test_choice_cycling() {
        const OPTIONS: &[(&str, &str)] = &[("male", "Male"), ("female", "Female")];
        let mut form = FormState::new(
            sign_up_schema(),
            vec![FormField::new("gender", "Gender", "", FieldKind::Choice(OPTIONS))],
        );
        form.cycle(false);
        assert_eq!(form.fields[0].value, "female");
        form.cycle(true);
        assert_eq!(form.fields[0].value, "male");
        assert_eq!(form.current().display(), "◂ Male ▸");
        form.input_char('x');
        assert_eq!(form.fields[0].value, "male");
    }
}
