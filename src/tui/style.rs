//! Color constants for the TUI.

use ratatui::style::Color;

use super::runtime::MessageKind;
use crate::devices::DeviceStatus;

/// Status cell color for running devices.
pub const ON_COLOR: Color = Color::Green;
/// Status cell color for stopped devices.
pub const OFF_COLOR: Color = Color::Red;
/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::Blue;
/// Highlighted table row background.
pub const SELECTED_BG: Color = Color::DarkGray;
/// Border color of the field being edited.
pub const ACTIVE_INPUT: Color = Color::Cyan;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Info message color.
pub const INFO_FG: Color = Color::Cyan;
/// Error message color.
pub const ERROR_FG: Color = Color::LightRed;

/// Returns the status cell color for a device.
pub fn status_color(status: DeviceStatus) -> Color {
    match status {
        DeviceStatus::On => ON_COLOR,
        DeviceStatus::Off => OFF_COLOR,
    }
}

/// Returns the footer color for a message.
pub fn message_color(kind: MessageKind) -> Color {
    match kind {
        MessageKind::Info => INFO_FG,
        MessageKind::Error => ERROR_FG,
    }
}
