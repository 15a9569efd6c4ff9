//! Abstract input key event, independent of terminal library.
//!
//! Keeps ideck-app free of crossterm so the headless runner can drive the
//! engine without a terminal.

/// Abstract input key event, converted from crossterm at the TUI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    /// Regular character key (letters, digits, symbols)
    Char(char),
    /// Character with Ctrl modifier
    CharCtrl(char),

    Left,
    Right,
    Up,
    Down,

    Enter,
    Esc,
    Tab,
    /// Shift+Tab
    BackTab,
}
