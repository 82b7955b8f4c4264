use ratatui::style::{Color as RatatuiColor, Modifier, Style as RatatuiStyle};

/// RGB color. Construct with `Color::new(r, g, b)` or use the named constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const DARK_GRAY: Color = Color::new(100, 100, 100);
    pub const SKY_BLUE: Color = Color::new(135, 206, 235);
    pub const GOLD: Color = Color::new(255, 215, 0);

    // Slate palette of the keyboard housing
    pub const SLATE_100: Color = Color::new(241, 245, 249);
    pub const SLATE_300: Color = Color::new(203, 213, 225);
    pub const SLATE_500: Color = Color::new(100, 116, 139);
    pub const SLATE_600: Color = Color::new(71, 85, 105);
    pub const SLATE_700: Color = Color::new(51, 65, 85);
    pub const SLATE_800: Color = Color::new(30, 41, 59);
    pub const SLATE_900: Color = Color::new(15, 23, 42);

    // Key faces
    pub const WHITE_KEY: Color = Color::WHITE;
    pub const WHITE_KEY_DOWN: Color = Color::SLATE_300;
    pub const BLACK_KEY: Color = Color::SLATE_900;
    pub const BLACK_KEY_DOWN: Color = Color::SLATE_600;

    pub const KNOB_ACTIVE: Color = Color::new(96, 165, 250); // blue-400
}

/// Text style: optional colors plus bold/underline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub underline: bool,
}

impl Style {
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            bold: false,
            underline: false,
        }
    }

    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    pub const fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

// --- Conversions to ratatui types ---

impl From<Color> for RatatuiColor {
    fn from(c: Color) -> Self {
        RatatuiColor::Rgb(c.r, c.g, c.b)
    }
}

impl From<Style> for RatatuiStyle {
    fn from(s: Style) -> Self {
        let mut rs = RatatuiStyle::default();
        if let Some(fg) = s.fg {
            rs = rs.fg(RatatuiColor::from(fg));
        }
        if let Some(bg) = s.bg {
            rs = rs.bg(RatatuiColor::from(bg));
        }
        if s.bold {
            rs = rs.add_modifier(Modifier::BOLD);
        }
        if s.underline {
            rs = rs.add_modifier(Modifier::UNDERLINED);
        }
        rs
    }
}
