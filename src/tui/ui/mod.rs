//! UI module: View components for the TUI.

pub mod auth;
pub mod form;
pub mod history;
pub mod home;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::application::{Page, Shell};
use crate::tui::styles::{MedicalTheme, LOGO_SMALL};

/// F-key bound to each page in the nav bar.
fn nav_key(page: Page) -> &'static str {
    match page {
        Page::Home => "F1",
        Page::History => "F2",
        Page::SignIn => "F3",
        Page::SignUp => "F4",
    }
}

/// Brand, page tabs and the session line.
pub fn render_nav_bar(f: &mut Frame, area: Rect, shell: &Shell) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(36)])
        .split(area);

    let mut tabs = vec![Span::styled(format!(" {LOGO_SMALL} "), MedicalTheme::header())];
    let pages: &[Page] = if shell.is_signed_in() {
        &[Page::Home, Page::History]
    } else {
        &[Page::Home, Page::History, Page::SignIn, Page::SignUp]
    };
    for page in pages {
        tabs.push(Span::styled(" │ ", MedicalTheme::text_muted()));
        tabs.push(Span::styled(format!("{} ", nav_key(*page)), MedicalTheme::key_hint()));
        let style = if *page == shell.page() {
            MedicalTheme::focused()
        } else {
            MedicalTheme::key_desc()
        };
        tabs.push(Span::styled(page.title(), style));
    }

    let bar = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(MedicalTheme::border());
    f.render_widget(Paragraph::new(Line::from(tabs)).block(bar.clone()), chunks[0]);

    let session = match shell.welcome() {
        Some(welcome) => Line::from(vec![
            Span::styled(welcome, MedicalTheme::text()),
            Span::styled("  F5 ", MedicalTheme::key_hint()),
            Span::styled("Sign Out", MedicalTheme::key_desc()),
        ]),
        None => Line::from(Span::styled("Not signed in", MedicalTheme::text_muted())),
    };
    f.render_widget(
        Paragraph::new(session)
            .alignment(ratatui::layout::Alignment::Right)
            .block(bar),
        chunks[1],
    );
}

/// Page title and subtitle.
pub fn render_page_header(f: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled(title, MedicalTheme::title()),
        Span::styled(" │ ", MedicalTheme::text_muted()),
        Span::styled(subtitle, MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

/// One-line footer of `[key] action` pairs.
pub fn key_hints(f: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, desc) in hints {
        spans.push(Span::styled(format!("{key} "), MedicalTheme::key_hint()));
        spans.push(Span::styled(format!("{desc}  "), MedicalTheme::key_desc()));
    }

    let p = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(p, area);
}

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![Line::from(vec![Span::styled(
        "DISCLAIMER: Predictions are indicative estimates and do not replace professional medical evaluation.",
        MedicalTheme::text_muted(),
    )])];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(MedicalTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
