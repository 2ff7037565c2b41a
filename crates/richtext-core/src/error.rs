use thiserror::Error;

/// Dispatch failures surfaced to the caller. Empty selections and cancelled
/// value prompts are defined no-ops, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}
