//! Submodule defining the errors used across the crate.

/// Errors raised while parsing DDL.
///
/// Tokenizing and table parsing never fail; they return whatever they could
/// recover. Only a trigger without any event is rejected, since it cannot be
/// represented and signals that the wrong statement was passed in.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No `INSERT`, `UPDATE` or `DELETE` event was found in a trigger definition.
    #[error("Trigger definition has no INSERT, UPDATE or DELETE event (at position {pos})")]
    MissingTriggerEvent {
        /// Position in input where an event was expected.
        pos: usize,
    },
}
