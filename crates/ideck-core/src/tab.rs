//! Dashboard section identifiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One section of the insights dashboard.
///
/// The set is closed: every tab the UI can show is listed here, so an invalid
/// tab id cannot reach the state machine. String ids only enter through
/// configuration and the command line, where [`FromStr`] validates them.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TabId {
    #[default]
    Overview,
    Concepts,
    Memories,
    Evolution,
    Performance,
    Realtime,
    KnowledgeGraph,
    Agents,
    DeepAnalytics,
}

impl TabId {
    /// All tabs in display order.
    pub const ALL: [TabId; 9] = [
        TabId::Overview,
        TabId::Concepts,
        TabId::Memories,
        TabId::Evolution,
        TabId::Performance,
        TabId::Realtime,
        TabId::KnowledgeGraph,
        TabId::Agents,
        TabId::DeepAnalytics,
    ];

    /// Stable string id, used in config files, CLI flags and headless output.
    pub fn as_str(self) -> &'static str {
        match self {
            TabId::Overview => "overview",
            TabId::Concepts => "concepts",
            TabId::Memories => "memories",
            TabId::Evolution => "evolution",
            TabId::Performance => "performance",
            TabId::Realtime => "realtime",
            TabId::KnowledgeGraph => "knowledge_graph",
            TabId::Agents => "agents",
            TabId::DeepAnalytics => "deep_analytics",
        }
    }

    /// Title shown in the tab bar.
    pub fn label(self) -> &'static str {
        match self {
            TabId::Overview => "Overview",
            TabId::Concepts => "Concepts",
            TabId::Memories => "Memories",
            TabId::Evolution => "Evolution",
            TabId::Performance => "Performance",
            TabId::Realtime => "Real-time",
            TabId::KnowledgeGraph => "Knowledge Graph",
            TabId::Agents => "Agents",
            TabId::DeepAnalytics => "Deep Analytics",
        }
    }

    /// Position in [`TabId::ALL`].
    pub fn index(self) -> usize {
        // ALL is ordered like the enum declaration
        self as usize
    }

    /// Number key that selects this tab (`'1'`..=`'9'`).
    pub fn hotkey(self) -> char {
        char::from(b'1' + self.index() as u8)
    }

    /// Tab selected by a number key, if any.
    pub fn from_hotkey(c: char) -> Option<TabId> {
        let digit = c.to_digit(10)? as usize;
        if digit == 0 {
            return None;
        }
        Self::ALL.get(digit - 1).copied()
    }

    /// Next tab, wrapping around.
    pub fn next(self) -> TabId {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous tab, wrapping around.
    pub fn prev(self) -> TabId {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TabId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|tab| tab.as_str() == normalized)
            .ok_or_else(|| Error::unknown_tab(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_in_declaration_order() {
        for (i, tab) in TabId::ALL.iter().enumerate() {
            assert_eq!(tab.index(), i);
        }
    }

    #[test]
    fn test_hotkeys() {
        assert_eq!(TabId::Overview.hotkey(), '1');
        assert_eq!(TabId::DeepAnalytics.hotkey(), '9');
        assert_eq!(TabId::from_hotkey('2'), Some(TabId::Concepts));
        assert_eq!(TabId::from_hotkey('0'), None);
        assert_eq!(TabId::from_hotkey('x'), None);
    }

    #[test]
    fn test_next_prev_wrap() {
        assert_eq!(TabId::Overview.next(), TabId::Concepts);
        assert_eq!(TabId::DeepAnalytics.next(), TabId::Overview);
        assert_eq!(TabId::Overview.prev(), TabId::DeepAnalytics);
        assert_eq!(TabId::Concepts.prev(), TabId::Overview);
    }

    #[test]
    fn test_from_str_round_trips_every_tab() {
        for tab in TabId::ALL {
            assert_eq!(tab.as_str().parse::<TabId>().unwrap(), tab);
        }
    }

    #[test]
    fn test_from_str_accepts_dashes_and_case() {
        assert_eq!(
            "Knowledge-Graph".parse::<TabId>().unwrap(),
            TabId::KnowledgeGraph
        );
        assert_eq!(" agents ".parse::<TabId>().unwrap(), TabId::Agents);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "settings".parse::<TabId>().unwrap_err();
        assert!(matches!(err, Error::UnknownTab { .. }));
    }

    #[test]
    fn test_serde_uses_snake_case_ids() {
        let json = serde_json::to_string(&TabId::DeepAnalytics).unwrap();
        assert_eq!(json, "\"deep_analytics\"");
    }
}
