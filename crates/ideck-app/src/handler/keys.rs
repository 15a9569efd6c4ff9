//! Key bindings

use ideck_core::TabId;

use crate::input_key::InputKey;
use crate::message::Message;
use crate::state::AppState;

/// Map a key press to a message.
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('q') | InputKey::Esc | InputKey::CharCtrl('c') => Some(Message::Quit),

        InputKey::Tab | InputKey::Right | InputKey::Char('l') => Some(Message::NextTab),
        InputKey::BackTab | InputKey::Left | InputKey::Char('h') => Some(Message::PrevTab),

        // 'r' retries whatever failed: the whole page, or the active tab
        InputKey::Char('r') => {
            if state.page.is_error() {
                Some(Message::RetryInitialLoad)
            } else {
                Some(Message::RetryTab(state.active_tab))
            }
        }
        InputKey::Char('R') => Some(Message::RefreshTab(state.active_tab)),

        InputKey::Char(c) => TabId::from_hotkey(c).map(Message::SelectTab),

        _ => None,
    }
}
