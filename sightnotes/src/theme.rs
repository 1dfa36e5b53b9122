//! Color theme system for sightnotes.
//!
//! A `Theme` holds named `ratatui::style::Color` fields covering every UI surface
//! sightnotes renders. Two built-in themes are provided:
//!
//! - `dark`: uses ANSI 16 colors so it works on any terminal, including
//!   256-color SSH sessions with no truecolor support.
//! - `catppuccin_mocha`: Catppuccin Mocha palette in RGB; requires truecolor.

use ratatui::style::Color;

/// All color values used across the UI.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    /// Border color for the active panel.
    pub border_active: Color,
    /// Border color for inactive panels and dividers.
    pub border_inactive: Color,

    // Tabs
    pub tab_active: Color,
    pub tab_inactive: Color,

    // Snapshot cards
    /// Card title line.
    pub card_title: Color,
    /// Card title of a newly arrived snapshot.
    pub card_new: Color,
    /// Section headings inside a card ("Key Concepts", "Summary", ...).
    pub section_heading: Color,
    /// Bullet glyphs and other list decoration.
    pub bullet: Color,
    /// Definition terms.
    pub definition_term: Color,
    /// Normal body text.
    pub text: Color,
    /// Placeholders and secondary text.
    pub muted: Color,

    // Session list
    pub session_date: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    /// Live indicator when the feed is reachable.
    pub status_live: Color,
    /// Live indicator when polls are failing.
    pub status_offline: Color,
}

impl Theme {
    /// Returns the built-in dark theme using ANSI 16 colors.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            tab_active: Color::Cyan,
            tab_inactive: Color::DarkGray,

            card_title: Color::White,
            card_new: Color::Yellow,
            section_heading: Color::Cyan,
            bullet: Color::DarkGray,
            definition_term: Color::Green,
            text: Color::Reset,
            muted: Color::DarkGray,

            session_date: Color::Blue,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_live: Color::Green,
            status_offline: Color::Red,
        }
    }

    /// Returns the Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161);    // #a6e3a1
        let red = Color::Rgb(243, 139, 168);      // #f38ba8
        let blue = Color::Rgb(137, 180, 250);     // #89b4fa
        let teal = Color::Rgb(148, 226, 213);     // #94e2d5
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90);    // #45475a
        let text = Color::Rgb(205, 214, 244);     // #cdd6f4
        let peach = Color::Rgb(250, 179, 135);    // #fab387

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            tab_active: lavender,
            tab_inactive: overlay1,

            card_title: text,
            card_new: peach,
            section_heading: teal,
            bullet: overlay1,
            definition_term: green,
            text,
            muted: overlay1,

            session_date: blue,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_live: green,
            status_offline: red,
        }
    }

    /// Resolves a theme name string to the corresponding built-in theme.
    ///
    /// Unknown names fall back to `dark()` so a typo in config never prevents
    /// startup.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!(theme = other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }
}
