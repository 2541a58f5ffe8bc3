use std::env;

use enfa::Destinations::{Many, One};
use enfa::{Automaton, Transitions, DFA, NFA};

fn main() {
    let nfa = NFA::new(
        vec!["q1", "q2", "q3", "q4", "q5"],
        vec!['0', '1'],
        Transitions::map(vec![
            (("q1", 'e'), Many(vec!["q2", "q4"])),
            (("q2", '0'), One("q2")),
            (("q2", '1'), One("q3")),
            (("q3", '0'), One("q3")),
            (("q3", '1'), One("q2")),
            (("q4", '0'), One("q5")),
            (("q4", '1'), One("q4")),
            (("q5", '0'), One("q5")),
            (("q5", '1'), One("q4")),
        ]),
        "q1",
        vec!["q3", "q5"],
    )
    .unwrap();
    println!("{}", nfa);
    match nfa.determinism_violation() {
        None => println!("deterministic"),
        Some(violation) => println!("not deterministic: {}", violation),
    }

    let mut words: Vec<String> = env::args().skip(1).collect();
    if words.is_empty() {
        words = ["", "0", "11", "110", "0101"].iter().map(|w| w.to_string()).collect();
    }
    for word in &words {
        println!("{:?} -> {}", word, nfa.accepts(word.chars()));
    }

    let dfa = DFA::new(
        vec![1, 2],
        vec!['0', '1'],
        Transitions::triples(vec![
            (1, '0', vec![2]),
            (1, '1', vec![1]),
            (2, '0', vec![1]),
            (2, '1', vec![2]),
        ]),
        1,
        vec![2],
    )
    .unwrap();
    println!("{}", dfa);
    for word in &words {
        println!("{:?} -> {}", word, dfa.accepts(word.chars()));
    }
}
