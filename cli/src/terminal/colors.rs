use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const ACCENT: Color = Color::Cyan;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const STATUS_OK: Color = Color::Green;
pub const STATUS_NOT_OK: Color = Color::Yellow;
pub const STATUS_DOWN: Color = Color::Red;
pub const STATUS_ERROR: Color = Color::Magenta;
