//! Color theme and glyphs for the PST TUI.
//!
//! Uses Kanagawa Wave palette by default with an optional high-contrast override.

use ratatui::style::{Color, Modifier, Style};

use pst_types::UiOptions;

/// Kanagawa Wave color palette constants.
mod colors {
    use super::Color;

    // === Backgrounds (Sumi Ink) ===
    pub const BG_DARK: Color = Color::Rgb(22, 22, 29); // sumiInk0
    pub const BG_PANEL: Color = Color::Rgb(31, 31, 40); // sumiInk3
    pub const BG_HIGHLIGHT: Color = Color::Rgb(42, 42, 55); // sumiInk4
    pub const BG_BORDER: Color = Color::Rgb(84, 84, 109); // sumiInk6

    // === Foregrounds (Fuji) ===
    pub const TEXT_PRIMARY: Color = Color::Rgb(220, 215, 186); // fujiWhite
    pub const TEXT_SECONDARY: Color = Color::Rgb(200, 192, 147); // oldWhite
    pub const TEXT_MUTED: Color = Color::Rgb(114, 113, 105); // fujiGray
    pub const TEXT_DISABLED: Color = Color::Rgb(113, 124, 124); // katanaGray

    pub const PRIMARY: Color = Color::Rgb(149, 127, 184); // oniViolet

    pub const CYAN: Color = Color::Rgb(127, 180, 202); // springBlue
    pub const GREEN: Color = Color::Rgb(152, 187, 108); // springGreen
    pub const YELLOW: Color = Color::Rgb(230, 195, 132); // carpYellow
    pub const ORANGE: Color = Color::Rgb(255, 160, 102); // surimiOrange
    pub const RED: Color = Color::Rgb(255, 93, 98); // peachRed
}

/// Resolved theme palette used by the UI.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_dark: Color,
    pub bg_panel: Color,
    pub bg_highlight: Color,
    pub bg_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub text_disabled: Color,
    pub primary: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub peach: Color,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg_dark: colors::BG_DARK,
            bg_panel: colors::BG_PANEL,
            bg_highlight: colors::BG_HIGHLIGHT,
            bg_border: colors::BG_BORDER,
            text_primary: colors::TEXT_PRIMARY,
            text_secondary: colors::TEXT_SECONDARY,
            text_muted: colors::TEXT_MUTED,
            text_disabled: colors::TEXT_DISABLED,
            primary: colors::PRIMARY,
            accent: colors::CYAN,
            success: colors::GREEN,
            warning: colors::YELLOW,
            error: colors::RED,
            peach: colors::ORANGE,
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            bg_dark: Color::Black,
            bg_panel: Color::Black,
            bg_highlight: Color::DarkGray,
            bg_border: Color::Gray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            text_muted: Color::DarkGray,
            text_disabled: Color::DarkGray,
            primary: Color::White,
            accent: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            peach: Color::Yellow,
        }
    }
}

#[must_use]
pub fn palette(options: UiOptions) -> Palette {
    if options.high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

/// ASCII/Unicode glyphs for list markers, toggles and the error banner.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub selected: &'static str,
    pub unselected: &'static str,
    pub toggle_on: &'static str,
    pub toggle_off: &'static str,
    pub read_only: &'static str,
    pub arrow_up: &'static str,
    pub arrow_down: &'static str,
    pub separator: &'static str,
    pub banner_fill: char,
}

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            selected: ">",
            unselected: " ",
            toggle_on: "[x]",
            toggle_off: "[ ]",
            read_only: "-",
            arrow_up: "^",
            arrow_down: "v",
            separator: "|",
            banner_fill: '#',
        }
    } else {
        Glyphs {
            selected: "▸",
            unselected: " ",
            toggle_on: "[✓]",
            toggle_off: "[ ]",
            read_only: "⊘",
            arrow_up: "↑",
            arrow_down: "↓",
            separator: "│",
            banner_fill: '█',
        }
    }
}

/// Pre-defined styles for common UI elements.
pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn frame_title(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.text_primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn button(palette: &Palette, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(palette.bg_dark)
                .bg(palette.primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text_secondary)
        }
    }

    #[must_use]
    pub fn selection(palette: &Palette, focused: bool) -> Style {
        let style = Style::default().bg(palette.bg_highlight);
        if focused {
            style.fg(palette.accent).add_modifier(Modifier::BOLD)
        } else {
            style.fg(palette.text_secondary)
        }
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn key_highlight(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.peach)
            .add_modifier(Modifier::BOLD)
    }
}
