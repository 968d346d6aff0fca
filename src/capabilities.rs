//! Terminal capability detection so frame rendering matches host support.
//!
//! Detection never fails: every query degrades to a safe fallback (ASCII
//! borders, no color, 80x24) instead of returning an error.

use std::env;

use crossterm::terminal::size as terminal_size;

/// Narrowest terminal the menu will open in. Below this the frame cannot hold
/// the breadcrumb, hints, and a usable item column.
pub const MIN_COLS: u16 = 40;
pub const MIN_ROWS: u16 = 16;

/// Color mode capabilities of the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// 24-bit true color
    TrueColor,
    /// 256 color mode
    Color256,
    /// Basic 16 ANSI colors
    #[default]
    Ansi16,
    /// No color support
    None,
}

impl ColorMode {
    /// Detect the terminal's color capabilities from environment variables.
    pub fn detect() -> Self {
        // NO_COLOR wins over everything else (https://no-color.org/)
        if env::var("NO_COLOR").is_ok() {
            return Self::None;
        }

        if let Ok(colorterm) = env::var("COLORTERM") {
            if colorterm == "truecolor" || colorterm == "24bit" {
                return Self::TrueColor;
            }
        }

        if let Ok(term) = env::var("TERM") {
            if term.contains("256color") || term.contains("256-color") {
                return Self::Color256;
            }
            if term.contains("color") || term.contains("xterm") || term.contains("screen") {
                return Self::Ansi16;
            }
            if term == "dumb" {
                return Self::None;
            }
        }

        Self::Ansi16
    }

    pub fn supports_color(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl std::fmt::Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TrueColor => write!(f, "truecolor"),
            Self::Color256 => write!(f, "256"),
            Self::Ansi16 => write!(f, "ansi"),
            Self::None => write!(f, "none"),
        }
    }
}

/// What the attached terminal can do, plus its current dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub color: bool,
    pub unicode: bool,
    pub width: u16,
    pub height: u16,
}

impl Capabilities {
    /// Detect capabilities, honoring explicit `--no-color` / `--ascii` overrides.
    pub fn detect(no_color: bool, ascii: bool) -> Self {
        let color = !no_color && ColorMode::detect().supports_color();
        let unicode = !ascii && locale_supports_unicode();
        let (width, height) = terminal_size().unwrap_or((80, 24));
        Self {
            color,
            unicode,
            width,
            height,
        }
    }

    /// Refresh only the dimensions (after SIGWINCH).
    pub fn refresh_size(&mut self) {
        if let Ok((width, height)) = terminal_size() {
            self.width = width;
            self.height = height;
        }
    }

    pub fn size_ok(&self) -> bool {
        self.width >= MIN_COLS && self.height >= MIN_ROWS
    }
}

fn locale_supports_unicode() -> bool {
    for var in ["LC_ALL", "LC_CTYPE", "LANG"] {
        if let Ok(value) = env::var(var) {
            if value.is_empty() {
                continue;
            }
            let lower = value.to_lowercase();
            return lower.contains("utf-8") || lower.contains("utf8");
        }
    }
    false
}
