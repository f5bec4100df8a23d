use std::fmt;

/// Commands the playground understands. Keys map onto these through
/// [`crate::keybindings::KeyBindings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    Quit,
    ToggleHelp,
    ToggleLog,
    ToggleOverview,
    // Windows
    NewWindow,
    CloseWindow,
    CycleWindow,
    // Window state
    ToggleFloat,
    SnapPrimary,
    SnapSecondary,
    EndSplitView,
    Maximize,
    Minimize,
    Restore,
    // Tucking
    TuckLeft,
    TuckRight,
    Untuck,
    // Display
    ToggleTabletMode,
    Rotate,
    ToggleKeyboard,
    NextDesk,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "Quit",
            Action::ToggleHelp => "Toggle help",
            Action::ToggleLog => "Toggle debug log",
            Action::ToggleOverview => "Toggle overview (desks bar)",
            Action::NewWindow => "New window",
            Action::CloseWindow => "Close active window",
            Action::CycleWindow => "Activate next window",
            Action::ToggleFloat => "Float / unfloat",
            Action::SnapPrimary => "Snap to primary side",
            Action::SnapSecondary => "Snap to secondary side",
            Action::EndSplitView => "End split view",
            Action::Maximize => "Maximize",
            Action::Minimize => "Minimize",
            Action::Restore => "Restore",
            Action::TuckLeft => "Tuck float left",
            Action::TuckRight => "Tuck float right",
            Action::Untuck => "Untuck float",
            Action::ToggleTabletMode => "Toggle tablet mode",
            Action::Rotate => "Rotate display",
            Action::ToggleKeyboard => "Toggle on-screen keyboard",
            Action::NextDesk => "Switch to next desk",
        };
        write!(f, "{}", s)
    }
}
