//! UI-facing state published by the orchestrator.

use converter_types::{AlertInfo, Direction};

/// An alert event. A newer alert replaces the current one as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Pass to `dismiss_alert` to dismiss this alert.
    pub id: u64,
    pub info: AlertInfo,
}

/// Snapshot of everything the presentation layer may render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub pending: bool,
    pub result_text: String,
    pub direction: Direction,
    pub direction_icon: &'static str,
    pub alert: Option<Alert>,
}

impl ViewState {
    pub(crate) fn new(direction: Direction) -> Self {
        Self {
            pending: false,
            result_text: String::new(),
            direction,
            direction_icon: direction.icon_name(),
            alert: None,
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(Direction::default())
    }
}
