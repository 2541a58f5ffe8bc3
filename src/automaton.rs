use std::borrow::Borrow;
use std::fmt::Debug;
use std::marker::PhantomData;

use log::trace;

/// Symbol-by-symbol simulation of an automaton.
pub trait Automaton<Input> {
    type State: Clone + Debug;

    fn start_state(&self) -> Self::State;

    /// The state after reading `input`, or `None` if nothing is left active.
    fn next_state(&self, state: &Self::State, input: &Input) -> Option<Self::State>;

    fn is_accepting(&self, state: &Self::State) -> bool;

    /// Whether `input` is in the language of the automaton.
    ///
    /// Stops reading as soon as no state is active.
    fn accepts<I>(&self, input: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<Input>,
        Self: Sized,
    {
        let mut state = self.start_state();
        for symbol in input {
            match self.next_state(&state, symbol.borrow()) {
                Some(next) => state = next,
                None => return false,
            }
        }
        self.is_accepting(&state)
    }

    fn run<I>(&self, input: I) -> Run<'_, Input, Self, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: Borrow<Input>,
        Self: Sized,
    {
        Run {
            aut: self,
            input: input.into_iter(),
            consumed: 0,
            state: Some(self.start_state()),
            _symbols: PhantomData,
        }
    }
}

/// The active state after a symbol was read.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub struct Step<State> {
    pub state: State,
    /// Number of symbols read so far.
    pub end: usize,
    pub accepting: bool,
}

/// An iterator over the steps of a run of an automaton.
///
/// Ends with the input or as soon as no state is active, so a run that yields
/// fewer steps than there were symbols got stuck.
#[derive(Debug)]
pub struct Run<'a, Input, A: 'a + Automaton<Input>, I> {
    aut: &'a A,
    input: I,
    consumed: usize,
    state: Option<A::State>,
    _symbols: PhantomData<fn(&Input)>,
}

impl<'a, Input, A: Automaton<Input>, I> Run<'a, Input, A, I> {
    /// The active state, `None` once the run got stuck.
    pub fn state(&self) -> Option<&A::State> {
        self.state.as_ref()
    }
}

impl<'a, Input, A, I> Iterator for Run<'a, Input, A, I>
where
    A: Automaton<Input>,
    I: Iterator,
    I::Item: Borrow<Input>,
{
    type Item = Step<A::State>;

    fn next(&mut self) -> Option<Self::Item> {
        let state = self.state.as_ref()?;
        let symbol = self.input.next()?;
        self.consumed += 1;
        self.state = self.aut.next_state(state, symbol.borrow());
        trace!("after {} symbols: {:?}", self.consumed, self.state);
        self.state.as_ref().map(|state| Step {
            state: state.clone(),
            end: self.consumed,
            accepting: self.aut.is_accepting(state),
        })
    }
}
