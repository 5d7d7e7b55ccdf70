use ratatui::style::Color;

/// Colors used by the document view and status bar
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg0: Color,
    pub bg2: Color,
    pub fg0: Color,
    pub grey1: Color,
    pub grey2: Color,
    pub aqua: Color,

    // Semantic colors
    pub heading: Color,
    pub current: Color,
    pub notice: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Gruvbox Dark
        Self {
            bg0: Color::Rgb(0x28, 0x28, 0x28),
            bg2: Color::Rgb(0x45, 0x40, 0x3d),
            fg0: Color::Rgb(0xd4, 0xbe, 0x98),
            grey1: Color::Rgb(0x92, 0x83, 0x74),
            grey2: Color::Rgb(0xa8, 0x99, 0x84),
            aqua: Color::Rgb(0x89, 0xb4, 0x82),
            heading: Color::Rgb(0xe7, 0x8a, 0x4e),
            current: Color::Rgb(0xa9, 0xb6, 0x65),
            notice: Color::Rgb(0xd8, 0xa6, 0x57),
        }
    }
}
