//! Kinds of chain data lines.

/// Whether a data line ends its chain.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    /// A line followed by another block, carrying the gaps to it.
    NonTerminating,

    /// The last line of a chain.
    Terminating,
}
