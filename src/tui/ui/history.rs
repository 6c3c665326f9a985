//! Assessment history page.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::application::HistoryView;
use crate::domain::{HistoricalRecord, TrendDirection};
use crate::tui::styles::MedicalTheme;

use super::{key_hints, render_page_header};

#[derive(Debug, Default)]
pub struct HistoryPageState {
    /// Loaded records; `None` until the first load finishes
    pub view: Option<HistoryView>,
    pub loading: bool,
    pub error: Option<String>,
    pub selected: usize,
    /// Keystrokes go to the search box
    pub searching: bool,
    pub show_detail: bool,
    /// One-line status (export path, delete result)
    pub notice: Option<String>,
}

impl HistoryPageState {
    pub fn begin_loading(&mut self) {
        self.loading = true;
        self.error = None;
        self.notice = None;
    }

    /// Install freshly loaded records, keeping the search and sort.
    pub fn loaded(&mut self, records: Vec<HistoricalRecord>) {
        let mut view = HistoryView::new(records);
        if let Some(previous) = &self.view {
            view.search = previous.search.clone();
            view.sort = previous.sort;
        }
        self.view = Some(view);
        self.loading = false;
        self.clamp_selection();
    }

    pub fn failed(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    #[must_use]
    pub fn visible_len(&self) -> usize {
        self.view.as_ref().map_or(0, |v| v.visible().len())
    }

    #[must_use]
    pub fn selected_record(&self) -> Option<&HistoricalRecord> {
        self.view
            .as_ref()
            .and_then(|v| v.visible().get(self.selected).copied())
    }

    pub fn select_next(&mut self) {
        let len = self.visible_len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keep the cursor on a visible row after the list changes.
    pub fn clamp_selection(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            self.selected = 0;
            self.show_detail = false;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn push_search(&mut self, c: char) {
        if let Some(view) = &mut self.view {
            view.search.push(c);
            self.selected = 0;
        }
    }

    pub fn pop_search(&mut self) {
        if let Some(view) = &mut self.view {
            view.search.pop();
            self.selected = 0;
        }
    }

    pub fn cycle_sort(&mut self) {
        if let Some(view) = &mut self.view {
            view.cycle_sort();
            self.selected = 0;
        }
    }
}

pub fn render_history(f: &mut Frame, area: Rect, state: &HistoryPageState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(5), // Summary cards
            Constraint::Length(3), // Search + sort
            Constraint::Min(0),    // Records
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_page_header(
        f,
        chunks[0],
        "Health History",
        "Track your cardiovascular health assessments over time",
    );

    if state.loading && state.view.is_none() {
        render_centered(
            f,
            area_below_header(&chunks),
            "Loading Your Health History",
            "Retrieving your cardiovascular assessments...",
            MedicalTheme::info(),
        );
        render_footer(f, chunks[4], state);
        return;
    }

    if let Some(error) = &state.error {
        render_centered(
            f,
            area_below_header(&chunks),
            "Could Not Load History",
            error,
            MedicalTheme::danger(),
        );
        render_footer(f, chunks[4], state);
        return;
    }

    let Some(view) = &state.view else {
        render_footer(f, chunks[4], state);
        return;
    };

    render_summary(f, chunks[1], view);
    render_search_bar(f, chunks[2], view, state.searching);
    render_records(f, chunks[3], view, state.selected);
    render_footer(f, chunks[4], state);

    if state.show_detail {
        if let Some(record) = state.selected_record() {
            render_detail(f, area, record);
        }
    }
}

fn area_below_header(chunks: &[Rect]) -> Rect {
    let top = chunks[1];
    let bottom = chunks[3];
    Rect::new(top.x, top.y, top.width, bottom.y + bottom.height - top.y)
}

fn render_centered(
    f: &mut Frame,
    area: Rect,
    title: &str,
    detail: &str,
    style: ratatui::style::Style,
) {
    let p = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(title, style.add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled(detail, MedicalTheme::text_muted())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(p, area);
}

fn card<'a>(title: &'a str, value: Span<'a>) -> Paragraph<'a> {
    Paragraph::new(vec![Line::from(""), Line::from(value)])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(Span::styled(format!(" {title} "), MedicalTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
}

fn render_summary(f: &mut Frame, area: Rect, view: &HistoryView) {
    let summary = view.summary();
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    f.render_widget(
        card(
            "Total Assessments",
            Span::styled(summary.total.to_string(), MedicalTheme::title()),
        ),
        cards[0],
    );

    let latest = match summary.latest {
        Some(record) => Span::styled(
            format!("{:.1}%", record.risk_level * 100.0),
            MedicalTheme::tier(record.tier()).add_modifier(Modifier::BOLD),
        ),
        None => Span::styled("N/A", MedicalTheme::text_muted()),
    };
    f.render_widget(card("Latest Risk Level", latest), cards[1]);

    let trend = match summary.trend {
        Some(t) => {
            let (arrow, style) = match t.direction {
                TrendDirection::Increase => ("▲", MedicalTheme::danger()),
                TrendDirection::Decrease => ("▼", MedicalTheme::success()),
            };
            Span::styled(format!("{arrow} {:.1}%", t.percentage()), style)
        }
        None => Span::styled("N/A", MedicalTheme::text_muted()),
    };
    f.render_widget(card("Trend", trend), cards[2]);
}

fn render_search_bar(f: &mut Frame, area: Rect, view: &HistoryView, searching: bool) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(24)])
        .split(area);

    let search = if view.search.is_empty() && !searching {
        Line::from(Span::styled(
            " Search by model or date...",
            MedicalTheme::text_muted(),
        ))
    } else {
        Line::from(vec![
            Span::raw(" "),
            Span::styled(view.search.as_str(), MedicalTheme::text()),
            if searching {
                Span::styled("▌", MedicalTheme::cursor())
            } else {
                Span::raw("")
            },
        ])
    };
    let search_box = Paragraph::new(search).block(
        Block::default()
            .title(Span::styled(" Search ", MedicalTheme::text_secondary()))
            .borders(Borders::ALL)
            .border_style(if searching {
                MedicalTheme::border_focused()
            } else {
                MedicalTheme::border()
            }),
    );
    f.render_widget(search_box, chunks[0]);

    let sort = Paragraph::new(Span::styled(view.sort.label(), MedicalTheme::text()))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        );
    f.render_widget(sort, chunks[1]);
}

fn render_records(f: &mut Frame, area: Rect, view: &HistoryView, selected: usize) {
    let records = view.visible();

    if records.is_empty() {
        let hint = if view.search.is_empty() {
            "Start by taking your first health assessment"
        } else {
            "Try adjusting your search criteria"
        };
        render_centered(f, area, "No Records Found", hint, MedicalTheme::text_secondary());
        return;
    }

    let items: Vec<ListItem> = records.iter().map(|r| record_row(r)).collect();
    let list = List::new(items)
        .block(
            Block::default()
                .title(Span::styled(
                    format!(" Assessments ({}) ", records.len()),
                    MedicalTheme::subtitle(),
                ))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .highlight_style(MedicalTheme::selected())
        .highlight_symbol("▶ ");

    let mut list_state = ListState::default().with_selected(Some(selected));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn record_row(record: &HistoricalRecord) -> ListItem<'static> {
    let tier = record.tier();
    ListItem::new(Line::from(vec![
        Span::styled("♥ ", MedicalTheme::tier(tier)),
        Span::styled(
            format!("Assessment from {:<11}", record.short_date()),
            MedicalTheme::text(),
        ),
        Span::styled(
            format!("{:>6.1}% {:<10}", record.risk_level * 100.0, tier.label()),
            MedicalTheme::tier(tier),
        ),
        Span::styled(
            format!(
                "{:<16} {:>5.1}% accuracy  ",
                record.best_model,
                record.accuracy * 100.0
            ),
            MedicalTheme::text_secondary(),
        ),
        Span::styled(
            format!(
                "BP {}/{}  BMI {}",
                record.systolic_bp, record.diastolic_bp, record.bmi
            ),
            MedicalTheme::text_muted(),
        ),
    ]))
}

fn render_detail(f: &mut Frame, area: Rect, record: &HistoricalRecord) {
    let width = 60.min(area.width);
    let height = 16.min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    let tier = record.tier();
    let row = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("  {label:<18}"), MedicalTheme::text_secondary()),
            Span::styled(value, MedicalTheme::text()),
        ])
    };

    let lines = vec![
        Line::from(Span::styled(
            format!("  {}", record.long_date()),
            MedicalTheme::subtitle(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("  {:<18}", "Risk Level"), MedicalTheme::text_secondary()),
            Span::styled(
                format!("{:.1}% ({} Risk)", record.risk_level * 100.0, tier),
                MedicalTheme::tier(tier).add_modifier(Modifier::BOLD),
            ),
        ]),
        row("Best Model", record.best_model.clone()),
        row("Accuracy", format!("{:.1}%", record.accuracy * 100.0)),
        Line::from(""),
        row("Age", record.age.to_string()),
        row("Gender", record.gender.clone()),
        row(
            "Blood Pressure",
            format!("{}/{} mmHg", record.systolic_bp, record.diastolic_bp),
        ),
        row("Cholesterol", format!("{} mg/dL", record.cholesterol)),
        row("BMI", format!("{} kg/m²", record.bmi)),
        row("Heart Rate", format!("{} bpm", record.heart_rate)),
    ];

    let detail = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(" Assessment Details ", MedicalTheme::title()))
            .title_bottom(Span::styled(" [Esc] Close ", MedicalTheme::key_hint()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border_focused()),
    );

    f.render_widget(Clear, popup);
    f.render_widget(detail, popup);
}

fn render_footer(f: &mut Frame, area: Rect, state: &HistoryPageState) {
    if let Some(notice) = &state.notice {
        let p = Paragraph::new(Span::styled(notice.as_str(), MedicalTheme::info()))
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(MedicalTheme::border()),
            );
        f.render_widget(p, area);
        return;
    }

    let hints: &[(&str, &str)] = if state.searching {
        &[("[Enter/Esc]", "Done"), ("[Backspace]", "Delete")]
    } else {
        &[
            ("[/]", "Search"),
            ("[S]", "Sort"),
            ("[↑↓]", "Select"),
            ("[Enter]", "View"),
            ("[D]", "Delete"),
            ("[E]", "Export Data"),
            ("[R]", "Reload"),
        ]
    };
    key_hints(f, area, hints);
}
