use proptest::{collection, prelude::*, sample::select};

use crate::{Automaton, Transitions, DFA, NFA};

fn arb_symbol() -> impl Strategy<Value = char> {
    select(vec!['a', 'b'])
}

fn arb_input() -> impl Strategy<Value = Vec<char>> {
    collection::vec(arb_symbol(), 0..12)
}

// Arbitrary automata over {a, b} with up to five states, the `e` shorthand
// included as a transition label.
fn arb_nfa() -> impl Strategy<Value = NFA<u8, char>> {
    (1u8..6).prop_flat_map(|n| {
        let triple = (
            0..n,
            select(vec!['a', 'b', 'e']),
            collection::vec(0..n, 0..3),
        );
        (
            collection::vec(triple, 0..12),
            0..n,
            collection::vec(0..n, 0..3),
        )
            .prop_map(move |(triples, start, accept)| {
                NFA::new(0..n, vec!['a', 'b'], Transitions::triples(triples), start, accept)
                    .expect("generated automata only reference declared states")
            })
    })
}

fn arb_dfa() -> impl Strategy<Value = DFA<u8, char>> {
    (1u8..6).prop_flat_map(|n| {
        (
            collection::vec((0..n, 0..n), n as usize),
            0..n,
            collection::vec(0..n, 0..3),
        )
            .prop_map(move |(targets, start, accept)| {
                let triples = targets
                    .into_iter()
                    .zip(0..n)
                    .flat_map(|((on_a, on_b), from)| {
                        vec![(from, 'a', vec![on_a]), (from, 'b', vec![on_b])]
                    });
                DFA::new(0..n, vec!['a', 'b'], Transitions::triples(triples), start, accept)
                    .expect("generated automata are total and deterministic")
            })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn closure_is_idempotent(nfa in arb_nfa(), seed in collection::vec(0u8..6, 0..4)) {
        let states = nfa.state_set(&seed);
        let closure = nfa.epsilon_closure(&states);
        prop_assert!(states.is_subset(&closure));
        prop_assert_eq!(nfa.epsilon_closure(&closure), closure);
    }

    #[test]
    fn empty_input_is_the_start_closure(nfa in arb_nfa()) {
        let closure = nfa.start_closure();
        let expected = nfa.accept().any(|state| {
            nfa.state_number(state).map_or(false, |number| closure.contains(number))
        });
        prop_assert_eq!(nfa.accepts(Vec::<char>::new()), expected);
    }

    #[test]
    fn run_agrees_with_accepts(nfa in arb_nfa(), input in arb_input()) {
        let steps: Vec<_> = nfa.run(&input).collect();
        prop_assert!(steps.len() <= input.len());
        let accepted = if input.is_empty() {
            nfa.is_accepting(&nfa.start_state())
        } else {
            steps.len() == input.len() && steps.last().map_or(false, |step| step.accepting)
        };
        prop_assert_eq!(nfa.accepts(&input), accepted);
    }

    #[test]
    fn frozen_dfa_agrees_with_set_simulation(dfa in arb_dfa(), input in arb_input()) {
        prop_assert!(dfa.as_nfa().is_deterministic());
        prop_assert_eq!(dfa.accepts(&input), dfa.as_nfa().accepts(&input));
    }
}
