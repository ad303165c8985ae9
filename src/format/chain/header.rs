//! The header line of a chain.

pub mod sequence;

use omics::coordinate::position::Number;
pub use sequence::Sequence;

/// The keyword opening a header line.
pub const HEADER_PREFIX: &str = "chain";

/// The separator between header fields.
pub const DELIMITER: char = ' ';

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to a [`Record`].
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// An aligned interval runs past the end of its chromosome.
    ///
    /// Carries the chromosome name, the interval end, and the chromosome
    /// size.
    PastChromosomeEnd(String, Number, Number),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::PastChromosomeEnd(chromosome, end, size) => write!(
                f,
                "aligned interval ends at {end}, past the end of `{chromosome}` (size {size})"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Record
////////////////////////////////////////////////////////////////////////////////////////

/// The header line of a chain: a score, the two aligned intervals, and an
/// id.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    /// The score.
    score: usize,

    /// The interval on the target genome.
    target_sequence: Sequence,

    /// The interval on the query genome.
    query_sequence: Sequence,

    /// The id.
    id: usize,
}

/// Fails if `sequence` ends past its chromosome.
fn fits(sequence: &Sequence) -> Result<()> {
    if sequence.alignment_end() > sequence.chromosome_size() {
        return Err(Error::PastChromosomeEnd(
            sequence.chromosome_name().to_string(),
            sequence.alignment_end(),
            sequence.chromosome_size(),
        ));
    }

    Ok(())
}

impl Record {
    /// Attempts to create a header line.
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::format::chain::header::Record;
    /// use cactus_export::format::chain::header::Sequence;
    /// use omics::coordinate::Strand;
    ///
    /// let target = Sequence::try_new("chr7", 100, Strand::Positive, 10, 20)?;
    /// let query = Sequence::try_new("chr2", 50, Strand::Negative, 0, 10)?;
    /// let header = Record::try_new(0, target, query, 3)?;
    ///
    /// assert_eq!(header.to_string(), "chain 0 chr7 100 + 10 20 chr2 50 - 0 10 3");
    ///
    /// let target = Sequence::try_new("chr7", 15, Strand::Positive, 10, 20)?;
    /// let query = Sequence::try_new("chr2", 50, Strand::Negative, 0, 10)?;
    /// let err = Record::try_new(0, target, query, 3).unwrap_err();
    ///
    /// assert_eq!(
    ///     err.to_string(),
    ///     "aligned interval ends at 20, past the end of `chr7` (size 15)"
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(
        score: usize,
        target_sequence: Sequence,
        query_sequence: Sequence,
        id: usize,
    ) -> Result<Self> {
        fits(&target_sequence)?;
        fits(&query_sequence)?;

        Ok(Self {
            score,
            target_sequence,
            query_sequence,
            id,
        })
    }

    /// Gets the score.
    pub fn score(&self) -> usize {
        self.score
    }

    /// Gets the interval on the target genome.
    pub fn target_sequence(&self) -> &Sequence {
        &self.target_sequence
    }

    /// Gets the interval on the query genome.
    pub fn query_sequence(&self) -> &Sequence {
        &self.query_sequence
    }

    /// Gets the id.
    pub fn id(&self) -> usize {
        self.id
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{HEADER_PREFIX}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}",
            self.score, self.target_sequence, self.query_sequence, self.id
        )
    }
}
