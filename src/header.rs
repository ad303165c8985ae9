//! Sequence headers.
//!
//! A sequence header is a free-text string whose first whitespace-delimited
//! token (the _display name_) encodes where the sequence sits on its
//! chromosome: `{genome}.{chromosome}.{chromosome size}.{start}`. Two
//! assembler-specific dialects only carry a chromosome name.

use std::sync::LazyLock;

use regex::Regex;

use crate::graph::Graph;
use crate::graph::SequenceId;

/// The delimiter between components of a standard header.
const DELIMITER: char = '.';

/// The prefix of a contig name produced by the Velvet assembler.
const VELVET_PREFIX: &str = "NODE";

/// The delimiter between tokens of a Velvet contig name.
const VELVET_DELIMITER: char = '_';

/// The markers that together identify a RefSeq-style header.
const REFSEQ_MARKERS: [&str; 2] = ["Gi", "Ref"];

/// Captures the text between the first `_` and the next `.` of a RefSeq-style
/// header.
static REFSEQ_CHROMOSOME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^_*[^_]+_\.*([^.]*)").unwrap());

/// The dialect a header was written in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Dialect {
    /// `{genome}.{chromosome}.{chromosome size}.{start}`.
    Standard,

    /// A Velvet contig name (`NODE_{id}_...`).
    Velvet,

    /// A RefSeq-style name carrying both a `Gi` and a `Ref` marker.
    RefSeq,
}

impl Dialect {
    /// Detects the dialect of a display name.
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::header::Dialect;
    ///
    /// assert_eq!(Dialect::detect("hg18.chr7.158821424.0"), Dialect::Standard);
    /// assert_eq!(Dialect::detect("NODE_12_length_90_cov_3.1"), Dialect::Velvet);
    /// assert_eq!(Dialect::detect("Gi_4917_Ref_NC_000913.2"), Dialect::RefSeq);
    /// ```
    pub fn detect(name: &str) -> Self {
        if name.starts_with(VELVET_PREFIX) {
            Dialect::Velvet
        } else if REFSEQ_MARKERS.iter().all(|marker| name.contains(marker)) {
            Dialect::RefSeq
        } else {
            Dialect::Standard
        }
    }
}

/// A parsed sequence header.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Header {
    /// The dialect.
    dialect: Dialect,

    /// The chromosome name.
    chromosome: String,

    /// The chromosome size.
    chromosome_size: Option<i64>,

    /// The 0-based offset of the sequence within its chromosome.
    start: i64,
}

impl Header {
    /// Parses a display name.
    ///
    /// Parsing never fails: missing or malformed components fall back to an
    /// empty chromosome name, an unknown chromosome size, and a zero offset.
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::header::Header;
    ///
    /// let header = Header::parse("hg18.chr7.158821424.1000");
    /// assert_eq!(header.chromosome(), "chr7");
    /// assert_eq!(header.chromosome_size(), Some(158821424));
    /// assert_eq!(header.start(), 1000);
    ///
    /// let header = Header::parse("ctgOnly");
    /// assert_eq!(header.chromosome(), "");
    /// assert_eq!(header.chromosome_size(), None);
    /// assert_eq!(header.start(), 0);
    /// ```
    pub fn parse(name: &str) -> Self {
        let dialect = Dialect::detect(name);

        let chromosome = match dialect {
            Dialect::Standard => return Self::parse_standard(name),
            Dialect::Velvet => name
                .split(VELVET_DELIMITER)
                .filter(|token| !token.is_empty())
                .nth(1)
                .unwrap_or_default(),
            Dialect::RefSeq => REFSEQ_CHROMOSOME
                .captures(name)
                .and_then(|captures| captures.get(1))
                .map(|m| m.as_str())
                .unwrap_or_default(),
        };

        Self {
            dialect,
            chromosome: chromosome.to_string(),
            chromosome_size: None,
            start: 0,
        }
    }

    /// Parses a display name written in the standard dialect.
    fn parse_standard(name: &str) -> Self {
        let mut components = name.split(DELIMITER).filter(|c| !c.is_empty()).skip(1);

        let chromosome = components.next().unwrap_or_default().to_string();

        let chromosome_size = components.next().and_then(|size| match size.parse() {
            Ok(size) => Some(size),
            Err(_) => {
                tracing::debug!(name, size, "ignoring malformed chromosome size");
                None
            }
        });

        let start = chromosome_size
            .and(components.next())
            .and_then(|start| start.parse().ok())
            .unwrap_or(0);

        Self {
            dialect: Dialect::Standard,
            chromosome,
            chromosome_size,
            start,
        }
    }

    /// Gets the dialect.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Gets the chromosome name.
    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    /// Gets the chromosome size (if the header carries one).
    pub fn chromosome_size(&self) -> Option<i64> {
        self.chromosome_size
    }

    /// Gets the 0-based offset of the sequence within its chromosome.
    pub fn start(&self) -> i64 {
        self.start
    }
}

/// Gets the display name of a sequence: the first whitespace-delimited token
/// of its header, or its name when the header is blank.
///
/// # Examples
///
/// ```
/// use cactus_export::graph::Builder;
/// use cactus_export::header::display_name;
///
/// let graph = Builder::default()
///     .sequence("s0", "hg18", 0, 10, "hg18.chr7.100.0 description")?
///     .sequence("s1", "hg18", 0, 10, "")?
///     .try_build()?;
///
/// let names = graph
///     .sequences()
///     .map(|(id, _)| display_name(&graph, id))
///     .collect::<Vec<_>>();
///
/// assert_eq!(names, vec!["hg18.chr7.100.0", "s1"]);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn display_name(graph: &Graph, sequence: SequenceId) -> &str {
    let sequence = graph.sequence(sequence);

    sequence
        .header()
        .split_whitespace()
        .next()
        .unwrap_or(sequence.name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_parses_a_header_without_a_start() {
        let header = Header::parse("hg18.chr7.158821424");
        assert_eq!(header.chromosome(), "chr7");
        assert_eq!(header.chromosome_size(), Some(158821424));
        assert_eq!(header.start(), 0);
    }

    #[test]
    fn it_parses_a_header_with_only_a_chromosome() {
        let header = Header::parse("hg18.chrX");
        assert_eq!(header.chromosome(), "chrX");
        assert_eq!(header.chromosome_size(), None);
        assert_eq!(header.start(), 0);
    }

    #[test]
    fn it_skips_empty_components() {
        let header = Header::parse("hg18..chr7.100.5");
        assert_eq!(header.chromosome(), "chr7");
        assert_eq!(header.chromosome_size(), Some(100));
        assert_eq!(header.start(), 5);
    }

    #[test]
    fn it_ignores_a_start_without_a_valid_size() {
        let header = Header::parse("hg18.chr7.big.5");
        assert_eq!(header.chromosome_size(), None);
        assert_eq!(header.start(), 0);
    }

    #[test]
    fn it_parses_a_velvet_header() {
        let header = Header::parse("NODE_12_length_90_cov_3.1");
        assert_eq!(header.dialect(), Dialect::Velvet);
        assert_eq!(header.chromosome(), "12");
        assert_eq!(header.chromosome_size(), None);
        assert_eq!(header.start(), 0);
    }

    #[test]
    fn it_parses_a_refseq_header() {
        let header = Header::parse("Gi_49175990_Ref_NC_000913.2");
        assert_eq!(header.dialect(), Dialect::RefSeq);
        assert_eq!(header.chromosome(), "49175990_Ref_NC_000913");
        assert_eq!(header.chromosome_size(), None);
    }

    #[test]
    fn it_requires_both_refseq_markers() {
        assert_eq!(Dialect::detect("Gi_only.chr1"), Dialect::Standard);
        assert_eq!(Dialect::detect("Ref_only.chr1"), Dialect::Standard);
    }
}
