//! Simulation of nondeterministic finite automata with empty-string
//! transitions, and of the deterministic automata among them.
//!
//! ```
//! use enfa::{Automaton, Destinations::One, Transitions, NFA};
//!
//! let nfa = NFA::new(
//!     vec!["q1", "q2"],
//!     vec!['0', '1'],
//!     Transitions::map(vec![
//!         (("q1", '0'), One("q2")),
//!         (("q1", '1'), One("q1")),
//!         (("q2", '0'), One("q1")),
//!         (("q2", '1'), One("q2")),
//!     ]),
//!     "q1",
//!     vec!["q2"],
//! )
//! .unwrap();
//! assert!(nfa.accepts("10".chars()));
//! assert!(nfa.is_deterministic());
//! ```

pub mod automaton;
pub mod dfa;
pub mod error;
pub mod nfa;
pub mod symbol;
pub mod transitions;

pub use crate::automaton::{Automaton, Run, Step};
pub use crate::dfa::{DFAState, DFA};
pub use crate::error::{Error, Result};
pub use crate::nfa::{StateNumber, Violation, NFA};
pub use crate::symbol::{StateLabel, Symbol};
pub use crate::transitions::{Destinations, Field, Label, TransitionTable, Transitions};

#[cfg(test)]
mod tests;
