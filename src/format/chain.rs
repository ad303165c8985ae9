//! Chain records.
//!
//! A chain is a header line followed by one data line per ungapped block. All
//! but the last data line carry the gaps to the next block on the target and
//! the query.

use nonempty::NonEmpty;

mod builder;
pub mod data;
pub mod header;

pub use builder::Builder;
pub use builder::Error as BuildError;

/// A chain.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Section {
    /// The header record.
    header: header::Record,

    /// The data records.
    data: NonEmpty<data::Record>,
}

impl Section {
    /// Gets the header record for the [`Section`] by reference.
    pub fn header(&self) -> &header::Record {
        &self.header
    }

    /// Gets the data records for the [`Section`] by reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::format::chain::Builder;
    /// use cactus_export::format::chain::data::Record;
    /// use cactus_export::format::chain::header;
    /// use cactus_export::format::chain::header::Sequence;
    /// use omics::coordinate::Strand;
    ///
    /// let target = Sequence::try_new("chr1", 100, Strand::Positive, 0, 8)?;
    /// let query = Sequence::try_new("chr2", 100, Strand::Positive, 10, 16)?;
    ///
    /// let section = Builder::default()
    ///     .header(header::Record::try_new(0, target, query, 0)?)?
    ///     .push_data(Record::gapped(3, 2, 0))
    ///     .push_data(Record::terminating(3))
    ///     .try_build()?;
    ///
    /// let sizes = section.data().iter().map(|r| r.size()).collect::<Vec<_>>();
    /// assert_eq!(sizes, vec![3, 3]);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn data(&self) -> &NonEmpty<data::Record> {
        &self.data
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.header)?;

        for record in self.data.iter() {
            write!(f, "\n{record}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use omics::coordinate::Strand;

    use super::*;
    use crate::format::chain::header::Sequence;

    #[test]
    fn it_displays_a_section() -> Result<(), Box<dyn std::error::Error>> {
        let target = Sequence::try_new("chr1", 100, Strand::Positive, 0, 8)?;
        let query = Sequence::try_new("chr2", 100, Strand::Negative, 10, 16)?;

        let section = Builder::default()
            .header(header::Record::try_new(0, target, query, 0)?)?
            .push_data(data::Record::gapped(3, 2, 0))
            .push_data(data::Record::terminating(3))
            .try_build()?;

        assert_eq!(
            section.to_string(),
            "chain 0 chr1 100 + 0 8 chr2 100 - 10 16 0\n3 2 0\n3"
        );

        Ok(())
    }
}
