use crate::layout::SnapPosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowStateType {
    #[default]
    Normal,
    Maximized,
    Minimized,
    PrimarySnapped,
    SecondarySnapped,
    Floated,
}

impl WindowStateType {
    pub fn is_snapped(self) -> bool {
        matches!(
            self,
            WindowStateType::PrimarySnapped | WindowStateType::SecondarySnapped
        )
    }

    pub fn snap_position(self) -> Option<SnapPosition> {
        match self {
            WindowStateType::PrimarySnapped => Some(SnapPosition::Primary),
            WindowStateType::SecondarySnapped => Some(SnapPosition::Secondary),
            _ => None,
        }
    }

    fn from_snap(position: SnapPosition) -> Self {
        match position {
            SnapPosition::Primary => WindowStateType::PrimarySnapped,
            SnapPosition::Secondary => WindowStateType::SecondarySnapped,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WmEvent {
    ToggleFloat,
    Float,
    Snap(SnapPosition),
    Maximize,
    Restore,
    Minimize,
}

/// What the host-side policy allows for a window right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    pub can_float: bool,
    pub can_snap: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: WindowStateType,
    pub to: WindowStateType,
}

/// Per-window state machine. The window manager performs the side effects
/// of every transition it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowState {
    current: WindowStateType,
    /// State to return to when leaving float or minimize.
    restore: WindowStateType,
}

impl WindowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state_type(&self) -> WindowStateType {
        self.current
    }

    /// Returns the transition to apply, or `None` when the event is ignored.
    pub fn on_event(&mut self, event: WmEvent, eligibility: Eligibility) -> Option<Transition> {
        let next = match event {
            WmEvent::ToggleFloat => match self.current {
                WindowStateType::Minimized => None,
                WindowStateType::Floated => Some(self.restore_target()),
                _ if eligibility.can_float => Some(WindowStateType::Floated),
                _ => None,
            },
            WmEvent::Float if eligibility.can_float => Some(WindowStateType::Floated),
            WmEvent::Float => None,
            WmEvent::Snap(position) if eligibility.can_snap => {
                Some(WindowStateType::from_snap(position))
            }
            WmEvent::Snap(_) => None,
            WmEvent::Maximize => Some(WindowStateType::Maximized),
            WmEvent::Restore => Some(match self.current {
                WindowStateType::Minimized | WindowStateType::Floated => self.restore_target(),
                _ => WindowStateType::Normal,
            }),
            WmEvent::Minimize => Some(WindowStateType::Minimized),
        }?;
        if next == self.current {
            return None;
        }
        Some(self.set(next))
    }

    /// Records a state reached outside the event path, e.g. a float drag
    /// that ends in a snap.
    pub fn set(&mut self, next: WindowStateType) -> Transition {
        let from = self.current;
        if matches!(
            from,
            WindowStateType::Normal | WindowStateType::Maximized
        ) && matches!(next, WindowStateType::Floated | WindowStateType::Minimized)
        {
            self.restore = from;
        }
        self.current = next;
        Transition { from, to: next }
    }

    fn restore_target(&self) -> WindowStateType {
        match self.restore {
            WindowStateType::Maximized => WindowStateType::Maximized,
            _ => WindowStateType::Normal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANY: Eligibility = Eligibility {
        can_float: true,
        can_snap: true,
    };

    #[test]
    fn toggle_float_round_trips_to_previous_state() {
        let mut state = WindowState::new();
        state.on_event(WmEvent::Maximize, ANY);
        let t = state.on_event(WmEvent::ToggleFloat, ANY);
        assert_eq!(
            t,
            Some(Transition {
                from: WindowStateType::Maximized,
                to: WindowStateType::Floated
            })
        );
        let t = state.on_event(WmEvent::ToggleFloat, ANY);
        assert_eq!(t.map(|t| t.to), Some(WindowStateType::Maximized));
    }

    #[test]
    fn minimized_windows_ignore_toggle_float() {
        let mut state = WindowState::new();
        state.on_event(WmEvent::Minimize, ANY);
        assert_eq!(state.on_event(WmEvent::ToggleFloat, ANY), None);
        assert_eq!(state.state_type(), WindowStateType::Minimized);
    }

    #[test]
    fn ineligible_windows_do_not_float() {
        let mut state = WindowState::new();
        let blocked = Eligibility {
            can_float: false,
            can_snap: true,
        };
        assert_eq!(state.on_event(WmEvent::ToggleFloat, blocked), None);
        assert_eq!(state.on_event(WmEvent::Float, blocked), None);
    }

    #[test]
    fn restore_from_minimize_returns_to_normal() {
        let mut state = WindowState::new();
        state.on_event(WmEvent::Minimize, ANY);
        let t = state.on_event(WmEvent::Restore, ANY);
        assert_eq!(t.map(|t| t.to), Some(WindowStateType::Normal));
    }

    #[test]
    fn snap_records_side() {
        let mut state = WindowState::new();
        state.on_event(WmEvent::Snap(SnapPosition::Secondary), ANY);
        assert_eq!(state.state_type(), WindowStateType::SecondarySnapped);
        assert_eq!(
            state.state_type().snap_position(),
            Some(SnapPosition::Secondary)
        );
        assert_eq!(state.on_event(WmEvent::Snap(SnapPosition::Secondary), ANY), None);
    }
}
