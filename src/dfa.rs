use std::fmt;

use bit_vec::BitVec;
use log::debug;

use crate::automaton::Automaton;
use crate::error::{Error, Result};
use crate::nfa::{StateNumber, Violation, NFA};
use crate::symbol::{StateLabel, Symbol};
use crate::transitions::Transitions;

/// Outgoing transitions of one state, indexed by symbol number.
#[derive(Clone, Debug)]
pub struct DFAState {
    pub transitions: Box<[StateNumber]>,
}

/// An `NFA` that is known to be deterministic.
///
/// The transition function is frozen into a dense table, so a step is two
/// lookups instead of set operations.
#[derive(Clone, Debug)]
pub struct DFA<S, A> {
    nfa: NFA<S, A>,
    states: Box<[DFAState]>,
    finals: BitVec,
}

impl<S: StateLabel, A: Symbol> DFA<S, A> {
    pub fn new<IS, IA, IF>(
        states: IS,
        alphabet: IA,
        transitions: Transitions<S, A>,
        start: S,
        accept: IF,
    ) -> Result<Self>
    where
        IS: IntoIterator<Item = S>,
        IA: IntoIterator<Item = A>,
        IF: IntoIterator<Item = S>,
    {
        DFA::try_from(NFA::new(states, alphabet, transitions, start, accept)?)
    }

    pub fn with_empty_marker<IS, IA, IF>(
        states: IS,
        alphabet: IA,
        transitions: Transitions<S, A>,
        start: S,
        accept: IF,
        empty_marker: A,
    ) -> Result<Self>
    where
        IS: IntoIterator<Item = S>,
        IA: IntoIterator<Item = A>,
        IF: IntoIterator<Item = S>,
    {
        DFA::try_from(NFA::with_empty_marker(
            states,
            alphabet,
            transitions,
            start,
            accept,
            empty_marker,
        )?)
    }

    /// The destination of `state` on `symbol`, if both are known.
    pub fn next(&self, state: &S, symbol: &A) -> Option<&S> {
        let state = self.nfa.state_number(state)?;
        self.next_state(&state, symbol)
            .and_then(|next| self.nfa.state(next))
    }
}

impl<S, A> DFA<S, A> {
    pub fn as_nfa(&self) -> &NFA<S, A> {
        &self.nfa
    }

    pub fn into_nfa(self) -> NFA<S, A> {
        self.nfa
    }
}

fn freeze<S: StateLabel, A: Symbol>(nfa: &NFA<S, A>) -> Result<Box<[DFAState]>> {
    let mut states = Vec::with_capacity(nfa.states().len());
    for (number, from) in nfa.states().iter().enumerate() {
        let transitions = nfa
            .alphabet()
            .iter()
            .map(|symbol| {
                nfa.successors(number, symbol)
                    .and_then(|to| to.iter().next())
                    .ok_or_else(|| {
                        Error::NotDeterministic(Violation::MissingTransition {
                            from: format!("{:?}", from),
                            symbol: format!("{:?}", symbol),
                        })
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        states.push(DFAState {
            transitions: transitions.into_boxed_slice(),
        });
    }
    Ok(states.into_boxed_slice())
}

impl<S: StateLabel, A: Symbol> TryFrom<NFA<S, A>> for DFA<S, A> {
    type Error = Error;

    fn try_from(nfa: NFA<S, A>) -> Result<Self> {
        if let Some(violation) = nfa.determinism_violation() {
            debug!("rejected automaton: {}", violation);
            return Err(Error::NotDeterministic(violation));
        }
        let states = freeze(&nfa)?;
        let finals = BitVec::from_fn(states.len(), |number| nfa.is_final(number));
        Ok(DFA { nfa, states, finals })
    }
}

impl<S: StateLabel, A: Symbol> Automaton<A> for DFA<S, A> {
    type State = StateNumber;

    fn start_state(&self) -> StateNumber {
        self.nfa.start_number()
    }

    fn next_state(&self, &state: &StateNumber, symbol: &A) -> Option<StateNumber> {
        let symbol = self.nfa.alphabet().get_index_of(symbol)?;
        self.states
            .get(state)
            .map(|dfa_state| dfa_state.transitions[symbol])
    }

    fn is_accepting(&self, &state: &StateNumber) -> bool {
        self.finals.get(state).unwrap_or(false)
    }
}

impl<S: fmt::Debug, A: fmt::Debug> fmt::Display for DFA<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.nfa.fmt_with_title(f, "DFA")
    }
}
