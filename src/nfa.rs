use std::collections::HashMap;
use std::fmt;

use bit_set::BitSet;
use indexmap::IndexSet;
use log::{debug, trace};

use crate::automaton::Automaton;
use crate::error::{Error, Result};
use crate::symbol::{StateLabel, Symbol};
use crate::transitions::{TransitionTable, Transitions};

/// Position of a state in declaration order.
pub type StateNumber = usize;

// Transitions out of one state, keyed by symbol, with the empty-string
// transitions kept apart.
#[derive(Clone, Debug)]
struct NFAState<Input> {
    transitions: HashMap<Input, BitSet>,
    epsilons: BitSet,
}

impl<Input> NFAState<Input> {
    fn new(states: usize) -> Self {
        NFAState {
            transitions: HashMap::new(),
            epsilons: BitSet::with_capacity(states),
        }
    }
}

/// The first reason an automaton fails to be deterministic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    /// A transition on the empty string.
    EpsilonTransition { from: String },
    /// A transition with zero or several destinations.
    NotSingleDestination {
        from: String,
        symbol: String,
        destinations: usize,
    },
    /// A `(state, symbol)` pair without a transition.
    MissingTransition { from: String, symbol: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::EpsilonTransition { from } => {
                write!(f, "{} has an empty-string transition", from)
            }
            Violation::NotSingleDestination {
                from,
                symbol,
                destinations,
            } => write!(
                f,
                "({}, {}) has {} destinations instead of one",
                from, symbol, destinations
            ),
            Violation::MissingTransition { from, symbol } => {
                write!(f, "({}, {}) has no transition", from, symbol)
            }
        }
    }
}

/// A nondeterministic finite automaton with empty-string transitions.
///
/// States and symbols are arbitrary values. Internally states are numbered in
/// the order they were declared, and sets of states are `BitSet`s over those
/// numbers. An `NFA` can't be changed after construction.
#[derive(Clone, Debug)]
pub struct NFA<S, A> {
    states: IndexSet<S>,
    alphabet: IndexSet<A>,
    empty_marker: Option<A>,
    table: TransitionTable<S, A>,
    nfa_states: Vec<NFAState<A>>,
    start: StateNumber,
    finals: BitSet,
}

impl<S: StateLabel, A: Symbol> NFA<S, A> {
    /// Builds an automaton whose empty-string transitions are labelled with
    /// `Label::Epsilon` (or the `e` shorthand), so every value of `A` can be
    /// an input symbol.
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
        Self::build(states, alphabet, transitions, start, accept, None)
    }

    /// Like [`NFA::new`], but `empty_marker` also labels the empty string.
    ///
    /// The marker can't be a member of the alphabet; that is reported as
    /// `EmptyMarkerInAlphabet` before anything else is checked.
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
        Self::build(states, alphabet, transitions, start, accept, Some(empty_marker))
    }

    // A marker that is also a symbol is refused up front. Transitions are
    // normalized next, then checked in this order: start state, accept
    // states, and per transition its source, symbol and destinations. The
    // first problem found is returned.
    fn build<IS, IA, IF>(
        states: IS,
        alphabet: IA,
        transitions: Transitions<S, A>,
        start: S,
        accept: IF,
        empty_marker: Option<A>,
    ) -> Result<Self>
    where
        IS: IntoIterator<Item = S>,
        IA: IntoIterator<Item = A>,
        IF: IntoIterator<Item = S>,
    {
        let states: IndexSet<S> = states.into_iter().collect();
        let alphabet: IndexSet<A> = alphabet.into_iter().collect();
        let accept: IndexSet<S> = accept.into_iter().collect();
        let table = match empty_marker.as_ref() {
            Some(marker) if alphabet.contains(marker) => {
                Err(Error::EmptyMarkerInAlphabet(format!("{:?}", marker)))
            }
            marker => TransitionTable::new(transitions, &alphabet, marker),
        };
        let result = table
            .and_then(|table| Self::validated(states, alphabet, table, &start, &accept, empty_marker));
        match result {
            Ok(nfa) => {
                debug!(
                    "built automaton with {} states, {} symbols and {} transitions",
                    nfa.states.len(),
                    nfa.alphabet.len(),
                    nfa.table.len()
                );
                Ok(nfa)
            }
            Err(err) => {
                debug!("rejected automaton: {}", err);
                Err(err)
            }
        }
    }

    fn validated(
        states: IndexSet<S>,
        alphabet: IndexSet<A>,
        table: TransitionTable<S, A>,
        start: &S,
        accept: &IndexSet<S>,
        empty_marker: Option<A>,
    ) -> Result<Self> {
        let start = states
            .get_index_of(start)
            .ok_or_else(|| Error::StartStateNotInStates(format!("{:?}", start)))?;

        let strays: Vec<&S> = accept.iter().filter(|s| !states.contains(*s)).collect();
        if !strays.is_empty() {
            return Err(Error::AcceptStatesNotSubset(format!("{:?}", strays)));
        }

        let mut nfa_states: Vec<NFAState<A>> =
            (0..states.len()).map(|_| NFAState::new(states.len())).collect();
        for (from, label, destinations) in table.iter() {
            let n = states
                .get_index_of(from)
                .ok_or_else(|| Error::TransitionStateInvalid(format!("{:?}", from)))?;
            if let Some(symbol) = label {
                if !alphabet.contains(symbol) {
                    return Err(Error::TransitionSymbolInvalid(format!("{:?}", symbol)));
                }
            }
            let mut to = BitSet::with_capacity(states.len());
            for destination in destinations {
                let d = states.get_index_of(destination).ok_or_else(|| {
                    Error::TransitionDestinationInvalid {
                        from: format!("{:?}", from),
                        symbol: label_text(label, empty_marker.as_ref()),
                        destination: format!("{:?}", destination),
                    }
                })?;
                to.insert(d);
            }
            let nfa_state = &mut nfa_states[n];
            match label {
                None => nfa_state.epsilons.union_with(&to),
                Some(symbol) => nfa_state
                    .transitions
                    .entry(symbol.clone())
                    .or_insert_with(BitSet::new)
                    .union_with(&to),
            }
        }
        let finals = accept
            .iter()
            .filter_map(|s| states.get_index_of(s))
            .collect();

        Ok(NFA {
            states,
            alphabet,
            empty_marker,
            table,
            nfa_states,
            start,
            finals,
        })
    }

    pub fn state_number(&self, state: &S) -> Option<StateNumber> {
        self.states.get_index_of(state)
    }

    /// Numbers of the given states; states this automaton doesn't have are
    /// skipped.
    pub fn state_set<'s, I>(&self, states: I) -> BitSet
    where
        I: IntoIterator<Item = &'s S>,
        S: 's,
    {
        states
            .into_iter()
            .filter_map(|s| self.states.get_index_of(s))
            .collect()
    }

    /// Every state reachable from `states` by zero or more empty-string
    /// transitions, `states` included.
    pub fn epsilon_closure(&self, states: &BitSet) -> BitSet {
        let mut closure = states.clone();
        let mut frontier = states.clone();
        let mut rounds = 0;
        while !frontier.is_empty() {
            let mut discovered = BitSet::with_capacity(self.states.len());
            for state in frontier.iter() {
                if let Some(nfa_state) = self.nfa_states.get(state) {
                    discovered.union_with(&nfa_state.epsilons);
                }
            }
            discovered.difference_with(&closure);
            closure.union_with(&discovered);
            frontier = discovered;
            rounds += 1;
        }
        trace!("closure of {:?} took {} rounds", states, rounds);
        closure
    }

    /// Union of the destinations of every state in `states` on `symbol`.
    /// Empty-string transitions are not followed.
    pub fn transition(&self, states: &BitSet, symbol: &A) -> BitSet {
        let mut next = BitSet::with_capacity(self.states.len());
        for state in states.iter() {
            if let Some(to) = self.successors(state, symbol) {
                next.union_with(to);
            }
        }
        next
    }

    /// The epsilon closure of the start state.
    pub fn start_closure(&self) -> BitSet {
        let mut start = BitSet::with_capacity(self.states.len());
        start.insert(self.start);
        self.epsilon_closure(&start)
    }

    pub(crate) fn successors(&self, state: StateNumber, symbol: &A) -> Option<&BitSet> {
        self.nfa_states
            .get(state)
            .and_then(|nfa_state| nfa_state.transitions.get(symbol))
    }

    /// Whether every `(state, symbol)` pair has exactly one destination and
    /// there are no empty-string transitions.
    pub fn is_deterministic(&self) -> bool {
        self.determinism_violation().is_none()
    }

    pub fn determinism_violation(&self) -> Option<Violation> {
        for (from, label, destinations) in self.table.iter() {
            match label {
                None => {
                    return Some(Violation::EpsilonTransition {
                        from: format!("{:?}", from),
                    })
                }
                Some(symbol) if destinations.len() != 1 => {
                    return Some(Violation::NotSingleDestination {
                        from: format!("{:?}", from),
                        symbol: format!("{:?}", symbol),
                        destinations: destinations.len(),
                    })
                }
                Some(_) => {}
            }
        }
        for (from, nfa_state) in self.states.iter().zip(&self.nfa_states) {
            if let Some(symbol) = self
                .alphabet
                .iter()
                .find(|symbol| !nfa_state.transitions.contains_key(*symbol))
            {
                return Some(Violation::MissingTransition {
                    from: format!("{:?}", from),
                    symbol: format!("{:?}", symbol),
                });
            }
        }
        None
    }
}

impl<S, A> NFA<S, A> {
    pub fn states(&self) -> &IndexSet<S> {
        &self.states
    }

    pub fn alphabet(&self) -> &IndexSet<A> {
        &self.alphabet
    }

    pub fn transitions(&self) -> &TransitionTable<S, A> {
        &self.table
    }

    /// The extra value labelling the empty string, if one was configured.
    pub fn empty_marker(&self) -> Option<&A> {
        self.empty_marker.as_ref()
    }

    pub fn start(&self) -> &S {
        &self.states[self.start]
    }

    pub fn start_number(&self) -> StateNumber {
        self.start
    }

    pub fn state(&self, number: StateNumber) -> Option<&S> {
        self.states.get_index(number)
    }

    pub fn accept(&self) -> impl Iterator<Item = &S> + '_ {
        self.states_in(&self.finals)
    }

    pub fn is_final(&self, number: StateNumber) -> bool {
        self.finals.contains(number)
    }

    pub fn states_in<'a>(&'a self, states: &'a BitSet) -> impl Iterator<Item = &'a S> + 'a {
        states.iter().filter_map(move |n| self.states.get_index(n))
    }

    pub(crate) fn fmt_with_title(&self, f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result
    where
        S: fmt::Debug,
        A: fmt::Debug,
    {
        writeln!(f, "{}", title)?;
        writeln!(f, "  states: {}", braced(self.states.iter()))?;
        writeln!(f, "  alphabet: {}", braced(self.alphabet.iter()))?;
        writeln!(f, "  transitions:")?;
        for (from, label, destinations) in self.table.iter() {
            writeln!(
                f,
                "    ({:?}, {}) -> {}",
                from,
                label_text(label, self.empty_marker.as_ref()),
                braced(destinations.iter())
            )?;
        }
        writeln!(f, "  start: {:?}", self.start())?;
        writeln!(f, "  accept: {}", braced(self.accept()))?;
        write!(f, "  empty string: {}", label_text(None, self.empty_marker.as_ref()))
    }
}

// The empty string shows as the configured marker, or a bare ε.
fn label_text<A: fmt::Debug>(label: Option<&A>, empty_marker: Option<&A>) -> String {
    match label.or(empty_marker) {
        Some(symbol) => format!("{:?}", symbol),
        None => "ε".to_string(),
    }
}

fn braced<T: fmt::Debug>(items: impl Iterator<Item = T>) -> String {
    let items: Vec<String> = items.map(|item| format!("{:?}", item)).collect();
    format!("{{{}}}", items.join(", "))
}

impl<S: fmt::Debug, A: fmt::Debug> fmt::Display for NFA<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with_title(f, "NFA")
    }
}

impl<S: StateLabel, A: Symbol> Automaton<A> for NFA<S, A> {
    type State = BitSet;

    fn start_state(&self) -> BitSet {
        self.start_closure()
    }

    fn next_state(&self, states: &BitSet, symbol: &A) -> Option<BitSet> {
        let next = self.transition(states, symbol);
        if next.is_empty() {
            trace!("no transitions on {:?} from {:?}", symbol, states);
            return None;
        }
        Some(self.epsilon_closure(&next))
    }

    fn is_accepting(&self, states: &BitSet) -> bool {
        !states.is_disjoint(&self.finals)
    }
}
