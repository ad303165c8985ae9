//! BED records.
//!
//! Records are written as twelve space-delimited columns. The strand column
//! is always `.` and the block lists are comma-terminated.

use nonempty::NonEmpty;

/// The delimiter between columns.
const DELIMITER: char = ' ';

/// The terminator after every entry of a block list.
const LIST_TERMINATOR: char = ',';

/// The name given to records that do not come from a chain.
pub const UNCHAINED: &str = "NA";

/// The name of a record: its originating chain and the depth of the scope it
/// was found in.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Name {
    /// The originating chain (if any).
    chain: Option<String>,

    /// The depth of the scope.
    depth: usize,
}

impl Name {
    /// Creates a name for a record built from a chain.
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::format::bed::Name;
    ///
    /// assert_eq!(Name::chained("42", 3).to_string(), "42.3");
    /// assert_eq!(Name::unchained(0).to_string(), "NA.0");
    /// ```
    pub fn chained(chain: impl Into<String>, depth: usize) -> Self {
        Self {
            chain: Some(chain.into()),
            depth,
        }
    }

    /// Creates a name for a record built from a block outside any chain.
    pub fn unchained(depth: usize) -> Self {
        Self { chain: None, depth }
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}",
            self.chain.as_deref().unwrap_or(UNCHAINED),
            self.depth
        )
    }
}

/// One block of a record.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Block {
    /// The size.
    size: i64,

    /// The start relative to the first block.
    start: i64,
}

impl Block {
    /// Creates a block.
    pub fn new(size: i64, start: i64) -> Self {
        Self { size, start }
    }

    /// Gets the size.
    pub fn size(&self) -> i64 {
        self.size
    }

    /// Gets the start relative to the first block.
    pub fn start(&self) -> i64 {
        self.start
    }
}

/// A BED record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    /// The chromosome name.
    chromosome: String,

    /// The start on the chromosome.
    start: i64,

    /// The end on the chromosome.
    end: i64,

    /// The name.
    name: Name,

    /// The blocks.
    blocks: NonEmpty<Block>,
}

impl Record {
    /// Creates a record.
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::format::bed::Block;
    /// use cactus_export::format::bed::Name;
    /// use cactus_export::format::bed::Record;
    /// use nonempty::nonempty;
    ///
    /// let record = Record::new(
    ///     "chr7",
    ///     509,
    ///     534,
    ///     Name::chained("0", 0),
    ///     nonempty![Block::new(5, 0), Block::new(5, 20)],
    /// );
    ///
    /// assert_eq!(
    ///     record.to_string(),
    ///     "chr7 509 534 0.0 0 . 509 534 0 2 5,5, 0,20,"
    /// );
    /// ```
    pub fn new(
        chromosome: impl Into<String>,
        start: i64,
        end: i64,
        name: Name,
        blocks: NonEmpty<Block>,
    ) -> Self {
        Self {
            chromosome: chromosome.into(),
            start,
            end,
            name,
            blocks,
        }
    }

    /// Gets the chromosome name.
    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    /// Gets the start on the chromosome.
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Gets the end on the chromosome.
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Gets the name.
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Gets the blocks.
    pub fn blocks(&self) -> &NonEmpty<Block> {
        &self.blocks
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let d = DELIMITER;
        let (start, end) = (self.start, self.end);

        write!(
            f,
            "{}{d}{start}{d}{end}{d}{}{d}0{d}.{d}{start}{d}{end}{d}0{d}{}{d}",
            self.chromosome,
            self.name,
            self.blocks.len(),
        )?;

        for block in self.blocks.iter() {
            write!(f, "{}{LIST_TERMINATOR}", block.size)?;
        }

        write!(f, "{d}")?;

        for block in self.blocks.iter() {
            write!(f, "{}{LIST_TERMINATOR}", block.start)?;
        }

        Ok(())
    }
}
