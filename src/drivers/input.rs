use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};

/// Filters raw terminal input down to what the playground reacts to.
///
/// Key releases and repeats are dropped (Windows reports both), Shift+Tab
/// arrives as `BackTab`, and bare pointer motion is discarded since gestures
/// only track motion with a button held.
#[derive(Debug, Default)]
pub struct InputNormalizer;

impl InputNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&mut self, evt: Event) -> Option<Event> {
        match evt {
            Event::Key(mut key) => {
                if key.kind != KeyEventKind::Press {
                    return None;
                }
                if key.code == KeyCode::Tab && key.modifiers.contains(KeyModifiers::SHIFT) {
                    key.code = KeyCode::BackTab;
                    key.modifiers.remove(KeyModifiers::SHIFT);
                }
                Some(Event::Key(key))
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Moved => None,
            Event::FocusGained | Event::FocusLost | Event::Paste(_) => None,
            other => Some(other),
        }
    }
}

/// Whether `next` supersedes `prev`: two drags with the same button, of
/// which only the latest position matters.
pub fn coalesces(prev: &Event, next: &Event) -> bool {
    match (prev, next) {
        (Event::Mouse(a), Event::Mouse(b)) => {
            matches!((a.kind, b.kind), (MouseEventKind::Drag(x), MouseEventKind::Drag(y)) if x == y)
        }
        _ => false,
    }
}
