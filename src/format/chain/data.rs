//! The data lines of a chain.

use omics::coordinate::position::Number;

use crate::format::chain::data::record::Kind;

pub mod record;

/// The separator between data fields.
const DELIMITER: char = ' ';

/// One data line of a chain.
///
/// Every line but the last holds the size of an ungapped block followed by
/// the gaps to the next block on the target (`dt`) and query (`dq`). The last
/// line holds only a size.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    /// The size of the ungapped block.
    size: Number,

    /// The gaps to the next block as `(dt, dq)`.
    gaps: Option<(Number, Number)>,
}

impl Record {
    /// Creates a line for a block that is followed by another block.
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::format::chain::data::Record;
    /// use cactus_export::format::chain::data::record::Kind;
    ///
    /// let record = Record::gapped(10, 0, 1);
    ///
    /// assert_eq!(record.size(), 10);
    /// assert_eq!(record.dt(), Some(0));
    /// assert_eq!(record.dq(), Some(1));
    /// assert_eq!(record.kind(), Kind::NonTerminating);
    /// assert_eq!(record.to_string(), "10 0 1");
    /// ```
    pub fn gapped(size: Number, dt: Number, dq: Number) -> Self {
        Record {
            size,
            gaps: Some((dt, dq)),
        }
    }

    /// Creates the line for the last block of a chain.
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::format::chain::data::Record;
    /// use cactus_export::format::chain::data::record::Kind;
    ///
    /// let record = Record::terminating(9);
    ///
    /// assert_eq!(record.dt(), None);
    /// assert_eq!(record.kind(), Kind::Terminating);
    /// assert_eq!(record.to_string(), "9");
    /// ```
    pub fn terminating(size: Number) -> Self {
        Record { size, gaps: None }
    }

    /// Gets the size of the ungapped block.
    pub fn size(&self) -> Number {
        self.size
    }

    /// Gets the gap to the next block on the target.
    pub fn dt(&self) -> Option<Number> {
        self.gaps.map(|(dt, _)| dt)
    }

    /// Gets the gap to the next block on the query.
    pub fn dq(&self) -> Option<Number> {
        self.gaps.map(|(_, dq)| dq)
    }

    /// Gets whether this line ends its chain.
    pub fn kind(&self) -> Kind {
        match self.gaps {
            Some(_) => Kind::NonTerminating,
            None => Kind::Terminating,
        }
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.size)?;

        if let Some((dt, dq)) = self.gaps {
            write!(f, "{DELIMITER}{dt}{DELIMITER}{dq}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_gaps_are_written() {
        let record = Record::gapped(4, 0, 0);

        assert_eq!(record.kind(), Kind::NonTerminating);
        assert_eq!(record.to_string(), "4 0 0");
    }

    #[test]
    fn gapped_and_terminating_lines_differ() {
        assert_ne!(Record::gapped(9, 0, 0), Record::terminating(9));
        assert_eq!(Record::terminating(9).dq(), None);
    }
}
