use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::actions::Action;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        if key.code != self.code {
            return false;
        }
        // Shifted symbols such as `?` arrive with SHIFT on some terminals.
        let mods = if matches!(key.code, KeyCode::Char(_)) {
            key.modifiers.difference(KeyModifiers::SHIFT)
        } else {
            key.modifiers
        };
        mods == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        let mut kb = Self::new();
        kb.add(Quit, KeyCombo::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        kb.add(Quit, KeyCombo::plain('q'));
        kb.add(ToggleHelp, KeyCombo::plain('?'));
        kb.add(ToggleHelp, KeyCombo::new(KeyCode::F(1), KeyModifiers::NONE));
        kb.add(ToggleLog, KeyCombo::plain('g'));
        kb.add(ToggleOverview, KeyCombo::plain('v'));

        kb.add(NewWindow, KeyCombo::plain('n'));
        kb.add(CloseWindow, KeyCombo::plain('x'));
        kb.add(CycleWindow, KeyCombo::new(KeyCode::Tab, KeyModifiers::NONE));

        kb.add(ToggleFloat, KeyCombo::plain('f'));
        kb.add(SnapPrimary, KeyCombo::plain('['));
        kb.add(SnapPrimary, KeyCombo::new(KeyCode::Left, KeyModifiers::ALT));
        kb.add(SnapSecondary, KeyCombo::plain(']'));
        kb.add(SnapSecondary, KeyCombo::new(KeyCode::Right, KeyModifiers::ALT));
        kb.add(EndSplitView, KeyCombo::plain('e'));
        kb.add(Maximize, KeyCombo::plain('m'));
        kb.add(Minimize, KeyCombo::plain('-'));
        kb.add(Restore, KeyCombo::plain('r'));

        kb.add(TuckLeft, KeyCombo::plain('h'));
        kb.add(TuckRight, KeyCombo::plain('l'));
        kb.add(Untuck, KeyCombo::plain('u'));

        kb.add(ToggleTabletMode, KeyCombo::plain('t'));
        kb.add(Rotate, KeyCombo::plain('o'));
        kb.add(ToggleKeyboard, KeyCombo::plain('k'));
        kb.add(NextDesk, KeyCombo::plain('d'));
        kb
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        self.map
            .get(&action)
            .is_some_and(|list| list.iter().any(|c| c.matches(key)))
    }

    pub fn action_for_key(&self, key: &KeyEvent) -> Option<Action> {
        self.map
            .iter()
            .find(|(_, list)| list.iter().any(|c| c.matches(key)))
            .map(|(action, _)| *action)
    }

    /// Every binding, ordered by action.
    pub fn help_entries(&self) -> Vec<(Action, Vec<String>)> {
        let mut entries: Vec<(Action, Vec<String>)> = self
            .map
            .iter()
            .map(|(action, list)| (*action, list.iter().map(KeyCombo::display).collect()))
            .collect();
        entries.sort_by_key(|(action, _)| *action);
        entries
    }

    pub fn combos_for(&self, action: Action) -> Vec<String> {
        self.map
            .get(&action)
            .map(|list| list.iter().map(KeyCombo::display).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_quit() {
        let kb = KeyBindings::default();
        let ev = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(kb.matches(Action::Quit, &ev));
        assert_eq!(kb.action_for_key(&ev), Some(Action::Quit));
    }

    #[test]
    fn default_combos_are_unambiguous() {
        let kb = KeyBindings::default();
        let mut seen: Vec<String> = Vec::new();
        for (_, combos) in kb.help_entries() {
            for combo in combos {
                assert!(!seen.contains(&combo), "{combo} bound twice");
                seen.push(combo);
            }
        }
    }

    #[test]
    fn snap_has_bracket_and_alt_arrow() {
        let kb = KeyBindings::default();
        assert_eq!(kb.combos_for(Action::SnapPrimary), vec!["[", "Alt+Left"]);
        let ev = KeyEvent::new(KeyCode::Right, KeyModifiers::ALT);
        assert_eq!(kb.action_for_key(&ev), Some(Action::SnapSecondary));
    }
}
