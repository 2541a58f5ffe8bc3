use std::fmt::Debug;
use std::hash::Hash;

/// Anything that can label a state. Only equality, hashing and a debug
/// rendering are needed.
pub trait StateLabel: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> StateLabel for T {}

/// An input symbol of an automaton.
///
/// No symbol value stands for the empty string unless a marker is configured;
/// see `transitions::Label`.
pub trait Symbol: Clone + Eq + Hash + Debug {
    /// Whether this symbol is the literal `e`, which stands for the empty
    /// string as long as `e` isn't part of the alphabet.
    fn is_epsilon_shorthand(&self) -> bool {
        false
    }
}

impl Symbol for char {
    fn is_epsilon_shorthand(&self) -> bool {
        *self == 'e'
    }
}

impl Symbol for &'static str {
    fn is_epsilon_shorthand(&self) -> bool {
        *self == "e"
    }
}

impl Symbol for String {
    fn is_epsilon_shorthand(&self) -> bool {
        self == "e"
    }
}

macro_rules! integer_symbols {
    ($($t:ty),*) => {
        $(
            impl Symbol for $t {}
        )*
    }
}

integer_symbols!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);
