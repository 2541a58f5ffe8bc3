use thiserror::Error;

use crate::nfa::Violation;

/// Reasons an automaton can't be constructed.
///
/// Offending states and symbols are carried in their `Debug` rendering so the
/// error type doesn't depend on the automaton's type parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("empty-string marker {0} is also in the alphabet")]
    EmptyMarkerInAlphabet(String),

    #[error("invalid transition format: {0}")]
    InvalidTransitionFormat(String),

    #[error("start state {0} is not in the set of states")]
    StartStateNotInStates(String),

    #[error("accept states {0} are not a subset of the set of states")]
    AcceptStatesNotSubset(String),

    #[error("transition from {0}, which is not in the set of states")]
    TransitionStateInvalid(String),

    #[error("transition on {0}, which is neither in the alphabet nor the empty-string marker")]
    TransitionSymbolInvalid(String),

    #[error("transition ({from}, {symbol}) leads to {destination}, which is not in the set of states")]
    TransitionDestinationInvalid {
        from: String,
        symbol: String,
        destination: String,
    },

    #[error("automaton is not deterministic: {0}")]
    NotDeterministic(Violation),
}

pub type Result<T> = std::result::Result<T, Error>;
