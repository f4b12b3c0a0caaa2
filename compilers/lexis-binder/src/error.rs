use lexis_ecs::WorldError;
use thiserror::Error;

use crate::automaton::State;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    /// The automaton has no transition for this phrase in this state.
    #[error("no transition from state {state} on {phrase}")]
    Structural { state: State, phrase: String },

    #[error(transparent)]
    World(#[from] WorldError),
}
