//! Color palette and preset styles.
//!
//! Tier colors follow the severity scale: green, blue, yellow, orange, red.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::{RiskTier, Severity};

pub struct MedicalTheme;

impl MedicalTheme {
    /// Deep teal, used for focus and brand
    pub const PRIMARY: Color = Color::Rgb(13, 148, 136);
    pub const PRIMARY_LIGHT: Color = Color::Rgb(45, 212, 191);
    pub const PRIMARY_DARK: Color = Color::Rgb(15, 118, 110);

    pub const BORDER: Color = Color::Rgb(148, 163, 184);

    // Severity scale
    pub const GREEN: Color = Color::Rgb(16, 185, 129);
    pub const BLUE: Color = Color::Rgb(59, 130, 246);
    pub const YELLOW: Color = Color::Rgb(251, 191, 36);
    pub const ORANGE: Color = Color::Rgb(249, 115, 22);
    pub const RED: Color = Color::Rgb(244, 63, 94);

    pub const BG_DARK: Color = Color::Rgb(15, 23, 42);

    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252);
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184);
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139);

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::GREEN)
    }

    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::YELLOW)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::RED)
    }

    #[must_use]
    pub fn info() -> Style {
        Style::default().fg(Self::BLUE)
    }

    /// Highlighted list row
    #[must_use]
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::BG_DARK)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn cursor() -> Style {
        Style::default().fg(Self::PRIMARY_LIGHT)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    /// Nav bar background
    #[must_use]
    pub fn header() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .bg(Self::PRIMARY_DARK)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn severity(severity: Severity) -> Color {
        match severity {
            Severity::Green => Self::GREEN,
            Severity::Blue => Self::BLUE,
            Severity::Yellow => Self::YELLOW,
            Severity::Orange => Self::ORANGE,
            Severity::Red => Self::RED,
        }
    }

    /// Foreground style for a risk tier.
    #[must_use]
    pub fn tier(tier: RiskTier) -> Style {
        Style::default().fg(Self::severity(tier.severity()))
    }
}

/// Nav bar brand
pub const LOGO_SMALL: &str = "♥ CardioPredict";
