use ratatui::style::Color;

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub space_token: Color,
    pub tab_token: Color,
    pub lf_token: Color,
    pub mnemonic: Color,
    pub number: Color,
    pub breakpoint: Color,
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),   // Blue
    secondary: Color::Rgb(250, 179, 135), // Orange
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    space_token: Color::Rgb(148, 226, 213),    // Cyan
    tab_token: Color::Rgb(245, 194, 231),      // Pink
    lf_token: Color::Rgb(108, 112, 134),       // Grey, line ends fade out
    mnemonic: Color::Rgb(249, 226, 175),       // Yellow
    number: Color::Rgb(250, 179, 135),         // Orange
    breakpoint: Color::Rgb(243, 139, 168),     // Red dot
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for focus
    border_normal: Color::Rgb(108, 112, 134),  // Grey border for normal
    current_line_bg: Color::Rgb(50, 50, 70),   // Slightly lighter BG for current line
};
