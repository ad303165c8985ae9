//! One aligned interval of a chain header.

use omics::coordinate::Strand;
use omics::coordinate::position::Number;

use crate::format::chain::header::DELIMITER;

/// An error related to a [`Sequence`].
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The interval ends before it starts.
    EndBeforeStart(Number, Number),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::EndBeforeStart(start, end) => {
                write!(f, "aligned interval ends at {end} before it starts at {start}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// An aligned interval on one chromosome, written as the five fields
/// `name size strand start end` of a chain header.
///
/// Coordinates are zero-based and half-open, counted on `strand`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sequence {
    /// The chromosome name.
    chromosome_name: String,

    /// The chromosome size.
    chromosome_size: Number,

    /// The strand the interval is counted on.
    strand: Strand,

    /// The first aligned position.
    alignment_start: Number,

    /// One past the last aligned position.
    alignment_end: Number,
}

impl Sequence {
    /// Attempts to create an aligned interval.
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::format::chain::header::Sequence;
    /// use omics::coordinate::Strand;
    ///
    /// let sequence = Sequence::try_new("chr7", 100, Strand::Negative, 10, 20)?;
    /// assert_eq!(sequence.to_string(), "chr7 100 - 10 20");
    ///
    /// let err = Sequence::try_new("chr7", 100, Strand::Negative, 20, 10).unwrap_err();
    /// assert_eq!(err.to_string(), "aligned interval ends at 10 before it starts at 20");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(
        chromosome_name: impl Into<String>,
        chromosome_size: Number,
        strand: Strand,
        alignment_start: Number,
        alignment_end: Number,
    ) -> Result<Self> {
        if alignment_end < alignment_start {
            return Err(Error::EndBeforeStart(alignment_start, alignment_end));
        }

        Ok(Self {
            chromosome_name: chromosome_name.into(),
            chromosome_size,
            strand,
            alignment_start,
            alignment_end,
        })
    }

    /// Gets the chromosome name.
    pub fn chromosome_name(&self) -> &str {
        &self.chromosome_name
    }

    /// Gets the chromosome size.
    pub fn chromosome_size(&self) -> Number {
        self.chromosome_size
    }

    /// Gets the strand.
    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Gets the first aligned position.
    pub fn alignment_start(&self) -> Number {
        self.alignment_start
    }

    /// Gets one past the last aligned position.
    pub fn alignment_end(&self) -> Number {
        self.alignment_end
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}",
            self.chromosome_name,
            self.chromosome_size,
            self.strand,
            self.alignment_start,
            self.alignment_end
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_intervals_are_allowed() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let sequence = Sequence::try_new("chr1", 10, Strand::Positive, 4, 4)?;

        assert_eq!(sequence.alignment_start(), sequence.alignment_end());
        assert_eq!(sequence.to_string(), "chr1 10 + 4 4");

        Ok(())
    }

    #[test]
    fn it_rejects_reversed_intervals() {
        let err = Sequence::try_new("chr1", 10, Strand::Positive, 5, 4).unwrap_err();
        assert_eq!(err, Error::EndBeforeStart(5, 4));
    }
}
