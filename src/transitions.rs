use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};
use log::debug;

use crate::error::{Error, Result};
use crate::symbol::{StateLabel, Symbol};

/// What a raw transition is taken on.
///
/// `Epsilon` is the empty string. It is distinct from every symbol, so an
/// alphabet can use any value of its symbol type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label<A> {
    Epsilon,
    Symbol(A),
}

impl<A> From<A> for Label<A> {
    fn from(symbol: A) -> Self {
        Label::Symbol(symbol)
    }
}

/// The destination(s) of one entry in the mapping form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destinations<S> {
    One(S),
    Many(Vec<S>),
}

impl<S> Destinations<S> {
    fn into_vec(self) -> Vec<S> {
        match self {
            Destinations::One(state) => vec![state],
            Destinations::Many(states) => states,
        }
    }
}

/// A positional field of a transition record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<S, A> {
    State(S),
    Symbol(A),
    Epsilon,
}

/// A transition specification as the caller writes it down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transitions<S, A> {
    /// `(state, label)` keys, each with one or more destinations.
    Map(Vec<((S, Label<A>), Destinations<S>)>),
    /// Records laid out as `state, label, destination...`.
    Records(Vec<Vec<Field<S, A>>>),
}

impl<S, A> Default for Transitions<S, A> {
    fn default() -> Self {
        Transitions::Map(Vec::new())
    }
}

impl<S, A> Transitions<S, A> {
    /// Entries keyed by `(state, symbol)` or `(state, Label)`.
    pub fn map<I, L>(entries: I) -> Self
    where
        I: IntoIterator<Item = ((S, L), Destinations<S>)>,
        L: Into<Label<A>>,
    {
        Transitions::Map(
            entries
                .into_iter()
                .map(|((state, label), destinations)| ((state, label.into()), destinations))
                .collect(),
        )
    }

    pub fn records<I, R>(records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = Field<S, A>>,
    {
        Transitions::Records(
            records
                .into_iter()
                .map(|record| record.into_iter().collect())
                .collect(),
        )
    }

    /// Well-formed records built from `(state, label, destinations)` triples.
    pub fn triples<I, L, D>(triples: I) -> Self
    where
        I: IntoIterator<Item = (S, L, D)>,
        L: Into<Label<A>>,
        D: IntoIterator<Item = S>,
    {
        Transitions::Records(
            triples
                .into_iter()
                .map(|(state, label, destinations)| {
                    let label = match label.into() {
                        Label::Epsilon => Field::Epsilon,
                        Label::Symbol(symbol) => Field::Symbol(symbol),
                    };
                    let mut record = vec![Field::State(state), label];
                    record.extend(destinations.into_iter().map(Field::State));
                    record
                })
                .collect(),
        )
    }
}

/// Canonical transition relation: `(state, label) -> destinations`, where a
/// `None` label is the empty string.
///
/// Entries keep the order in which they were given.
#[derive(Debug, Clone)]
pub struct TransitionTable<S, A> {
    entries: IndexMap<(S, Option<A>), IndexSet<S>>,
}

impl<S: StateLabel, A: Symbol> TransitionTable<S, A> {
    /// Normalizes a raw specification.
    ///
    /// Besides `Label::Epsilon`, the literal `e` becomes the empty-string
    /// label unless `e` is itself in `alphabet`, and so does `empty_marker`
    /// when one is given. A later entry for the same `(state, label)` replaces
    /// an earlier one.
    pub fn new(
        raw: Transitions<S, A>,
        alphabet: &IndexSet<A>,
        empty_marker: Option<&A>,
    ) -> Result<Self> {
        let mut table = TransitionTable {
            entries: IndexMap::new(),
        };
        let label = |label: Label<A>| match label {
            Label::Epsilon => None,
            Label::Symbol(symbol)
                if Some(&symbol) == empty_marker
                    || (symbol.is_epsilon_shorthand() && !alphabet.contains(&symbol)) =>
            {
                None
            }
            Label::Symbol(symbol) => Some(symbol),
        };
        match raw {
            Transitions::Map(entries) => {
                for ((state, symbol), destinations) in entries {
                    table.insert(state, label(symbol), destinations.into_vec());
                }
            }
            Transitions::Records(records) => {
                for (index, record) in records.into_iter().enumerate() {
                    let (state, raw_label, destinations) = split_record(index, record)?;
                    table.insert(state, label(raw_label), destinations);
                }
            }
        }
        Ok(table)
    }

    fn insert(&mut self, state: S, label: Option<A>, destinations: Vec<S>) {
        let destinations: IndexSet<S> = destinations.into_iter().collect();
        match self.entries.entry((state, label)) {
            Entry::Occupied(mut entry) => {
                debug!("replacing transitions for {:?}", entry.key());
                entry.insert(destinations);
            }
            Entry::Vacant(entry) => {
                entry.insert(destinations);
            }
        }
    }

    /// Destinations of `state` on `label` (`None` for the empty string).
    pub fn get(&self, state: &S, label: Option<&A>) -> Option<&IndexSet<S>> {
        self.entries.get(&(state.clone(), label.cloned()))
    }

    pub fn contains(&self, state: &S, label: Option<&A>) -> bool {
        self.get(state, label).is_some()
    }
}

// Order doesn't matter for equality.
impl<S: StateLabel, A: Symbol> PartialEq for TransitionTable<S, A> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<S: StateLabel, A: Symbol> Eq for TransitionTable<S, A> {}

impl<S, A> TransitionTable<S, A> {
    pub fn iter(&self) -> impl Iterator<Item = (&S, Option<&A>, &IndexSet<S>)> + '_ {
        self.entries
            .iter()
            .map(|((state, label), destinations)| (state, label.as_ref(), destinations))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn split_record<S: StateLabel, A: Symbol>(
    index: usize,
    record: Vec<Field<S, A>>,
) -> Result<(S, Label<A>, Vec<S>)> {
    let mut fields = record.into_iter();
    let (state, label) = match (fields.next(), fields.next()) {
        (Some(Field::State(state)), Some(Field::Symbol(symbol))) => (state, Label::Symbol(symbol)),
        (Some(Field::State(state)), Some(Field::Epsilon)) => (state, Label::Epsilon),
        _ => {
            return Err(Error::InvalidTransitionFormat(format!(
                "record {} does not start with a state and a label",
                index
            )))
        }
    };
    let destinations = fields
        .map(|field| match field {
            Field::State(state) => Ok(state),
            other => Err(Error::InvalidTransitionFormat(format!(
                "record {} lists {:?} as a destination",
                index, other
            ))),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((state, label, destinations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transitions::Destinations::{Many, One};

    fn alphabet(symbols: &[char]) -> IndexSet<char> {
        symbols.iter().cloned().collect()
    }

    #[test]
    fn map_form_wraps_and_collapses() {
        let raw = Transitions::map(vec![
            ((1, 'a'), One(2)),
            ((2, 'a'), Many(vec![1, 2, 1])),
        ]);
        let table = TransitionTable::new(raw, &alphabet(&['a']), None).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&1, Some(&'a')).unwrap().len(), 1);
        assert_eq!(table.get(&2, Some(&'a')).unwrap().len(), 2);
        assert!(table.get(&3, Some(&'a')).is_none());
    }

    #[test]
    fn shorthand_e_is_epsilon_outside_the_alphabet() {
        let raw = Transitions::map(vec![((1, 'e'), One(2))]);
        let table = TransitionTable::new(raw, &alphabet(&['a']), None).unwrap();
        assert!(table.contains(&1, None));
        assert!(!table.contains(&1, Some(&'e')));
    }

    #[test]
    fn shorthand_e_is_a_symbol_inside_the_alphabet() {
        let raw = Transitions::map(vec![((1, 'e'), One(2))]);
        let table = TransitionTable::new(raw, &alphabet(&['a', 'e']), None).unwrap();
        assert!(table.contains(&1, Some(&'e')));
        assert!(!table.contains(&1, None));
    }

    #[test]
    fn configured_marker_is_epsilon() {
        let raw = Transitions::triples(vec![(1, 'ε', vec![2]), (1, '#', vec![1])]);
        let table = TransitionTable::new(raw, &alphabet(&['e']), Some(&'#')).unwrap();
        assert!(table.contains(&1, None));
        // Only '#' was configured, so 'ε' is just an (undeclared) symbol.
        assert!(table.contains(&1, Some(&'ε')));
    }

    #[test]
    fn explicit_epsilon_labels() {
        let raw = Transitions::map(vec![
            ((1, Label::Epsilon), One(2)),
            ((1, Label::Symbol(255u8)), One(1)),
        ]);
        let bytes: IndexSet<u8> = (0..=255).collect();
        let table = TransitionTable::new(raw, &bytes, None).unwrap();
        assert!(table.contains(&1, None));
        assert!(table.contains(&1, Some(&255)));

        let raw = Transitions::records(vec![vec![Field::State(1), Field::Epsilon, Field::State(2)]]);
        let table = TransitionTable::new(raw, &alphabet(&['a']), None).unwrap();
        assert_eq!(table.get(&1, None).unwrap().len(), 1);
    }

    #[test]
    fn empty_input_is_an_empty_table() {
        let table = TransitionTable::<u32, char>::new(Transitions::default(), &alphabet(&[]), None)
            .unwrap();
        assert!(table.is_empty());
        let table =
            TransitionTable::<u32, char>::new(Transitions::Records(vec![]), &alphabet(&[]), None)
                .unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn records_allow_no_destinations() {
        let raw = Transitions::records(vec![vec![Field::State(1), Field::Symbol('a')]]);
        let table = TransitionTable::new(raw, &alphabet(&['a']), None).unwrap();
        assert!(table.get(&1, Some(&'a')).unwrap().is_empty());
    }

    #[test]
    fn later_records_replace_earlier_ones() {
        let raw = Transitions::triples(vec![(1, 'a', vec![1]), (1, 'a', vec![2, 3])]);
        let table = TransitionTable::new(raw, &alphabet(&['a']), None).unwrap();
        assert_eq!(table.len(), 1);
        let destinations: Vec<_> = table.get(&1, Some(&'a')).unwrap().iter().cloned().collect();
        assert_eq!(destinations, vec![2, 3]);
    }

    #[test]
    fn malformed_records() {
        let short = Transitions::records(vec![vec![Field::<u32, char>::State(1)]]);
        let swapped = Transitions::records(vec![vec![Field::Symbol('a'), Field::State(1)]]);
        let symbol_destination = Transitions::records(vec![vec![
            Field::State(1),
            Field::Symbol('a'),
            Field::Symbol('a'),
        ]]);
        let epsilon_destination =
            Transitions::records(vec![vec![Field::State(1), Field::Symbol('a'), Field::Epsilon]]);
        for raw in vec![short, swapped, symbol_destination, epsilon_destination] {
            match TransitionTable::new(raw, &alphabet(&['a']), None) {
                Err(Error::InvalidTransitionFormat(_)) => {}
                other => panic!("expected a format error, got {:?}", other),
            }
        }
    }
}
