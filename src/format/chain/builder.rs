//! A builder for a chain [`Section`].

use nonempty::NonEmpty;
use omics::coordinate::position::Number;

use crate::format::chain::Section;
use crate::format::chain::data;
use crate::format::chain::data::record::Kind;
use crate::format::chain::header;

/// An error that occurs when a required field was never provided to the
/// [`Builder`].
#[derive(Debug)]
pub enum MissingError {
    /// No data was provided to the [`Builder`].
    Data,

    /// No header was provided to the [`Builder`].
    Header,
}

impl std::fmt::Display for MissingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingError::Data => write!(f, "data"),
            MissingError::Header => write!(f, "header"),
        }
    }
}

impl std::error::Error for MissingError {}

/// An error that occurs when a singular field was provided multiple times to
/// the [`Builder`].
#[derive(Debug)]
pub enum MultipleError {
    /// The header field was provided multiple times to the [`Builder`].
    Header,
}

impl std::fmt::Display for MultipleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MultipleError::Header => write!(f, "header"),
        }
    }
}

impl std::error::Error for MultipleError {}

/// An error related to a [`Builder`].
#[derive(Debug)]
pub enum Error {
    /// An error where a required field was never provided to the [`Builder`].
    Missing(MissingError),

    /// An error where a singular field was provided to the [`Builder`] more
    /// than once.
    Multiple(MultipleError),

    /// Only the last data record may be terminating.
    MisplacedTerminator(usize),

    /// The data records do not cover the span declared by the header.
    SpanMismatch(&'static str, Number, Number),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Missing(err) => write!(f, "missing required field: {err}"),
            Error::Multiple(err) => write!(f, "singular field set multiple times: {err}"),
            Error::MisplacedTerminator(index) => {
                write!(f, "data record {index} is terminating but is not the last")
            }
            Error::SpanMismatch(side, expected, found) => write!(
                f,
                "{side} span mismatch: header spans {expected} positions, data covers {found}"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A builder for a [`Section`].
#[derive(Debug, Default)]
pub struct Builder {
    /// The header record.
    header: Option<header::Record>,

    /// The data records.
    data: Option<NonEmpty<data::Record>>,
}

impl Builder {
    /// Sets the header record for the [`Builder`].
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::format::chain::Builder;
    /// use cactus_export::format::chain::header::Record;
    /// use cactus_export::format::chain::header::Sequence;
    /// use omics::coordinate::Strand;
    ///
    /// let target = Sequence::try_new("seq0", 2, Strand::Positive, 0, 2)?;
    /// let query = Sequence::try_new("seq1", 2, Strand::Negative, 0, 2)?;
    /// let header = Record::try_new(0, target, query, 1)?;
    ///
    /// let err = Builder::default()
    ///     .header(header.clone())?
    ///     .header(header)
    ///     .unwrap_err();
    ///
    /// assert_eq!(err.to_string(), "singular field set multiple times: header");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn header(mut self, record: header::Record) -> Result<Self> {
        if self.header.is_some() {
            return Err(Error::Multiple(MultipleError::Header));
        }

        self.header = Some(record);
        Ok(self)
    }

    /// Pushes a [data record](crate::format::chain::data::Record) into the
    /// [`Builder`].
    pub fn push_data(mut self, record: data::Record) -> Self {
        let data = match self.data {
            Some(mut data) => {
                data.push(record);
                data
            }
            None => NonEmpty::new(record),
        };

        self.data = Some(data);
        self
    }

    /// Consumes `self` to attempt to build a [`Section`].
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::format::chain::Builder;
    /// use cactus_export::format::chain::data;
    /// use cactus_export::format::chain::header::Record;
    /// use cactus_export::format::chain::header::Sequence;
    /// use omics::coordinate::Strand;
    ///
    /// let target = Sequence::try_new("seq0", 10, Strand::Positive, 0, 6)?;
    /// let query = Sequence::try_new("seq1", 10, Strand::Negative, 0, 5)?;
    ///
    /// let section = Builder::default()
    ///     .header(Record::try_new(0, target, query, 1)?)?
    ///     .push_data(data::Record::gapped(3, 1, 0))
    ///     .push_data(data::Record::terminating(2))
    ///     .try_build()?;
    ///
    /// assert_eq!(section.header().id(), 1);
    /// assert_eq!(section.data().len(), 2);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build(self) -> Result<Section> {
        let header = self.header.ok_or(Error::Missing(MissingError::Header))?;
        let data = self.data.ok_or(Error::Missing(MissingError::Data))?;

        let last = data.len() - 1;
        if let Some(index) = data
            .iter()
            .enumerate()
            .position(|(i, record)| (record.kind() == Kind::Terminating) != (i == last))
        {
            return Err(Error::MisplacedTerminator(index));
        }

        let sizes = data.iter().map(|record| record.size()).sum::<Number>();
        let dt = data.iter().filter_map(|record| record.dt()).sum::<Number>();
        let dq = data.iter().filter_map(|record| record.dq()).sum::<Number>();

        for (side, sequence, gaps) in [
            ("target", header.target_sequence(), dt),
            ("query", header.query_sequence(), dq),
        ] {
            let expected = sequence.alignment_end() - sequence.alignment_start();

            if expected != sizes + gaps {
                return Err(Error::SpanMismatch(side, expected, sizes + gaps));
            }
        }

        Ok(Section { header, data })
    }
}

#[cfg(test)]
mod tests {
    use omics::coordinate::Strand;

    use super::*;
    use crate::format::chain::header::Sequence;

    /// A header whose target spans `target` positions and whose query spans
    /// `query` positions, both starting at 0 on a chromosome of size 20.
    fn header(
        target: Number,
        query: Number,
    ) -> std::result::Result<header::Record, Box<dyn std::error::Error>> {
        Ok(header::Record::try_new(
            0,
            Sequence::try_new("seq0", 20, Strand::Positive, 0, target)?,
            Sequence::try_new("seq1", 20, Strand::Positive, 0, query)?,
            1,
        )?)
    }

    #[test]
    fn it_fails_to_produce_a_section_when_no_header_is_provided() {
        let err = Builder::default()
            .push_data(data::Record::terminating(1))
            .try_build()
            .unwrap_err();

        assert_eq!(err.to_string(), "missing required field: header");
    }

    #[test]
    fn it_fails_to_produce_a_section_when_no_data_is_provided()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = Builder::default()
            .header(header(2, 2)?)?
            .try_build()
            .unwrap_err();

        assert_eq!(err.to_string(), "missing required field: data");

        Ok(())
    }

    #[test]
    fn it_fails_when_a_terminator_is_not_last()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = Builder::default()
            .header(header(4, 4)?)?
            .push_data(data::Record::terminating(2))
            .push_data(data::Record::terminating(2))
            .try_build()
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "data record 0 is terminating but is not the last"
        );

        Ok(())
    }

    #[test]
    fn it_fails_when_the_last_record_carries_gaps()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = Builder::default()
            .header(header(4, 4)?)?
            .push_data(data::Record::gapped(4, 0, 0))
            .try_build()
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "data record 0 is terminating but is not the last"
        );

        Ok(())
    }

    #[test]
    fn it_fails_when_the_data_do_not_cover_the_header()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = Builder::default()
            .header(header(9, 5)?)?
            .push_data(data::Record::gapped(3, 5, 0))
            .push_data(data::Record::terminating(2))
            .try_build()
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "target span mismatch: header spans 9 positions, data covers 10"
        );

        Ok(())
    }
}
