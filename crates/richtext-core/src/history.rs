use serde::{Deserialize, Serialize};

/// Whether the host can currently perform an undo or a redo. Polled from the
/// host after every dispatch; never derived from core-owned state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryAvailability {
    #[serde(default)]
    pub can_undo: bool,
    #[serde(default)]
    pub can_redo: bool,
}
