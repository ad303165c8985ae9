//! Projecting sequence coordinates onto chromosomes.
//!
//! A sequence is a window onto a chromosome: its header names the chromosome,
//! the chromosome's size, and the offset of the window (see
//! [`Header`](crate::header::Header)). A [`Frame`] carries that window and
//! converts between coordinate systems. A [`Projection`] is a whole paired run
//! converted to chromosome coordinates on both genomes, ready to be written
//! as a chain.

use nonempty::NonEmpty;
use omics::coordinate::Strand;
use omics::coordinate::position::Number;

use crate::graph::CapView;
use crate::graph::Graph;
use crate::graph::SequenceId;
use crate::header::Header;
use crate::header::display_name;
use crate::thread::Member;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to projecting a run.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The run has no members.
    EmptyRun,

    /// A member of the run has no target cap.
    Unpaired(usize),

    /// A cap of the run has no owning sequence.
    Unplaced(&'static str, usize),

    /// The projected interval does not fit on its chromosome.
    ///
    /// The fields are the side, the chromosome, the start, the end, and the
    /// chromosome size.
    OutOfBounds(&'static str, String, i64, i64, i64),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::EmptyRun => write!(f, "run has no members"),
            Error::Unpaired(index) => write!(f, "run member {index} has no target cap"),
            Error::Unplaced(side, index) => {
                write!(f, "{side} cap of run member {index} has no sequence")
            }
            Error::OutOfBounds(side, chromosome, start, end, size) => write!(
                f,
                "{side} interval {start}-{end} does not fit on `{chromosome}` (size {size})"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Frames
////////////////////////////////////////////////////////////////////////////////////////

/// The convention of projected coordinates.
///
/// The legacy BED arithmetic subtracts one from every projected coordinate
/// ([`Convention::OneBased`]).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Convention {
    /// Coordinates are shifted down by one.
    #[default]
    OneBased,

    /// Coordinates are used as is.
    ZeroBased,
}

impl Convention {
    /// Gets the adjustment added to every projected coordinate.
    pub fn adjustment(&self) -> i64 {
        match self {
            Convention::OneBased => -1,
            Convention::ZeroBased => 0,
        }
    }
}

/// The placement of one sequence on its chromosome.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Frame {
    /// The chromosome name.
    chromosome: String,

    /// The chromosome size.
    size: i64,

    /// The offset of the sequence within the chromosome.
    offset: i64,

    /// The length of the sequence.
    length: i64,
}

impl Frame {
    /// Creates a frame.
    pub fn new(chromosome: impl Into<String>, size: i64, offset: i64, length: i64) -> Self {
        Self {
            chromosome: chromosome.into(),
            size,
            offset,
            length,
        }
    }

    /// Reads the frame of a sequence from its display name.
    ///
    /// When the header carries no chromosome size, the length of the sequence
    /// is used instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::graph::Builder;
    /// use cactus_export::projection::Frame;
    ///
    /// let graph = Builder::default()
    ///     .sequence("s0", "hg18", 0, 100, "hg18.chr7.1000.500")?
    ///     .sequence("s1", "hg18", 0, 100, "NODE_12_length_100")?
    ///     .try_build()?;
    ///
    /// let ids = graph.sequences().map(|(id, _)| id).collect::<Vec<_>>();
    ///
    /// let frame = Frame::of_sequence(&graph, ids[0]);
    /// assert_eq!(frame.chromosome(), "chr7");
    /// assert_eq!(frame.size(), 1000);
    /// assert_eq!(frame.offset(), 500);
    ///
    /// let frame = Frame::of_sequence(&graph, ids[1]);
    /// assert_eq!(frame.chromosome(), "12");
    /// assert_eq!(frame.size(), 100);
    /// assert_eq!(frame.offset(), 0);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn of_sequence(graph: &Graph, sequence: SequenceId) -> Self {
        let header = Header::parse(display_name(graph, sequence));
        let length = graph.sequence(sequence).length();

        Self {
            chromosome: header.chromosome().to_string(),
            size: header.chromosome_size().unwrap_or(length),
            offset: header.start(),
            length,
        }
    }

    /// Gets the chromosome name.
    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    /// Gets the chromosome size.
    pub fn size(&self) -> i64 {
        self.size
    }

    /// Gets the offset of the sequence within the chromosome.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Gets the length of the sequence.
    pub fn length(&self) -> i64 {
        self.length
    }

    /// Projects a sequence coordinate onto the forward chromosome.
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::projection::Convention;
    /// use cactus_export::projection::Frame;
    ///
    /// let frame = Frame::new("chr7", 1000, 500, 100);
    ///
    /// assert_eq!(frame.project(10, Convention::OneBased), 509);
    /// assert_eq!(frame.project(10, Convention::ZeroBased), 510);
    /// ```
    pub fn project(&self, coordinate: i64, convention: Convention) -> i64 {
        coordinate + self.offset + convention.adjustment()
    }

    /// Reverses [`Frame::project()`].
    pub fn unproject(&self, coordinate: i64, convention: Convention) -> i64 {
        coordinate - self.offset - convention.adjustment()
    }

    /// Converts a strand-relative sequence coordinate into a coordinate on the
    /// same strand of the chromosome.
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::projection::Frame;
    /// use omics::coordinate::Strand;
    ///
    /// let frame = Frame::new("chr7", 1000, 500, 100);
    ///
    /// assert_eq!(frame.to_chromosome(10, Strand::Positive), 510);
    /// // The sequence covers the negative-strand interval [400, 500).
    /// assert_eq!(frame.to_chromosome(10, Strand::Negative), 410);
    /// ```
    pub fn to_chromosome(&self, local: i64, strand: Strand) -> i64 {
        match strand {
            Strand::Positive => local + self.offset,
            Strand::Negative => local + self.size - (self.offset + self.length),
        }
    }

    /// Reverses [`Frame::to_chromosome()`].
    pub fn from_chromosome(&self, coordinate: i64, strand: Strand) -> i64 {
        match strand {
            Strand::Positive => coordinate - self.offset,
            Strand::Negative => coordinate - self.size + (self.offset + self.length),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Projections
////////////////////////////////////////////////////////////////////////////////////////

/// One genome's side of a projection.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Side {
    /// The frame of the sequence.
    frame: Frame,

    /// The strand.
    strand: Strand,

    /// The start on the chromosome strand.
    start: i64,

    /// The (exclusive) end on the chromosome strand.
    end: i64,
}

impl Side {
    /// Creates a side.
    pub fn new(frame: Frame, strand: Strand, start: i64, end: i64) -> Self {
        Self {
            frame,
            strand,
            start,
            end,
        }
    }

    /// Gets the frame.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Gets the strand.
    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Gets the start.
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Gets the end.
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Mirrors the interval onto the other strand.
    fn reverse(self) -> Self {
        let size = self.frame.size;

        Self {
            start: size - self.end,
            end: size - self.start,
            strand: self.strand.complement(),
            frame: self.frame,
        }
    }

    /// Gets the chromosome size, start, and end as positions, checking that
    /// the interval fits on the chromosome.
    pub fn bounds(&self, side: &'static str) -> Result<(Number, Number, Number)> {
        let out_of_bounds = || {
            Error::OutOfBounds(
                side,
                self.frame.chromosome.clone(),
                self.start,
                self.end,
                self.frame.size,
            )
        };

        if self.start > self.end || self.end > self.frame.size {
            return Err(out_of_bounds());
        }

        let size = Number::try_from(self.frame.size).map_err(|_| out_of_bounds())?;
        let start = Number::try_from(self.start).map_err(|_| out_of_bounds())?;
        let end = Number::try_from(self.end).map_err(|_| out_of_bounds())?;

        Ok((size, start, end))
    }
}

/// The gap between two consecutive blocks of a projection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Gap {
    /// The gap on the target.
    target: i64,

    /// The gap on the query.
    query: i64,
}

impl Gap {
    /// Creates a gap.
    pub fn new(target: i64, query: i64) -> Self {
        Self { target, query }
    }

    /// Gets the gap on the target.
    pub fn target(&self) -> i64 {
        self.target
    }

    /// Gets the gap on the query.
    pub fn query(&self) -> i64 {
        self.query
    }
}

/// A paired run in chromosome coordinates.
///
/// There is always one more block than there are gaps, and gap `i` separates
/// blocks `i` and `i + 1`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Projection {
    /// The target side.
    target: Side,

    /// The query side.
    query: Side,

    /// The block sizes.
    blocks: NonEmpty<i64>,

    /// The gaps between blocks.
    gaps: Vec<Gap>,
}

impl Projection {
    /// Projects a paired run.
    ///
    /// The query runs along the positive strand of its segments. Each side is
    /// placed on its own chromosome using its own frame.
    pub fn of_run(graph: &Graph, run: &[Member]) -> Result<Self> {
        let mut caps = run.iter().enumerate().map(|(i, member)| {
            let query = member.segment().cap5(graph);
            let target = member.target().ok_or(Error::Unpaired(i))?;
            Ok::<_, Error>((i, query, target, member.segment().length(graph)))
        });

        let (_, query, target, length) = caps.next().ok_or(Error::EmptyRun)??;

        let query_sequence = query.sequence(graph).ok_or(Error::Unplaced("query", 0))?;
        let target_sequence = target.sequence(graph).ok_or(Error::Unplaced("target", 0))?;

        let query_start = local(graph, query, "query", 0)?;
        let target_start = local(graph, target, "target", 0)?;
        let mut query_end = end(graph, query, "query", 0)?;
        let mut target_end = end(graph, target, "target", 0)?;

        let mut blocks = NonEmpty::new(length);
        let mut gaps = Vec::new();

        for result in caps {
            let (i, query, target, length) = result?;

            let query_next = local(graph, query, "query", i)?;
            let target_next = local(graph, target, "target", i)?;

            gaps.push(Gap::new(
                (target_next - target_end).abs(),
                (query_next - query_end).abs(),
            ));
            blocks.push(length);

            query_end = end(graph, query, "query", i)?;
            target_end = end(graph, target, "target", i)?;
        }

        let side = |sequence, cap: CapView, start, end| {
            let frame = Frame::of_sequence(graph, sequence);
            let strand = cap.strand(graph);

            Side {
                start: frame.to_chromosome(start, strand),
                end: frame.to_chromosome(end, strand),
                strand,
                frame,
            }
        };

        let target = side(target_sequence, target, target_start, target_end);
        let query = side(query_sequence, query, query_start, query_end);

        Ok(Self {
            target,
            query,
            blocks,
            gaps,
        })
    }

    /// Creates a projection from its parts.
    pub fn new(target: Side, query: Side, blocks: NonEmpty<i64>, gaps: Vec<Gap>) -> Self {
        Self {
            target,
            query,
            blocks,
            gaps,
        }
    }

    /// Gets the target side.
    pub fn target(&self) -> &Side {
        &self.target
    }

    /// Gets the query side.
    pub fn query(&self) -> &Side {
        &self.query
    }

    /// Gets the block sizes.
    pub fn blocks(&self) -> &NonEmpty<i64> {
        &self.blocks
    }

    /// Gets the gaps between blocks.
    pub fn gaps(&self) -> &[Gap] {
        &self.gaps
    }

    /// Reads the projection from the other strand of both chromosomes.
    ///
    /// Reversing twice gives back the original projection.
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::projection::Frame;
    /// use cactus_export::projection::Gap;
    /// use cactus_export::projection::Projection;
    /// use cactus_export::projection::Side;
    /// use nonempty::nonempty;
    /// use omics::coordinate::Strand;
    ///
    /// let projection = Projection::new(
    ///     Side::new(Frame::new("chr2", 500, 0, 500), Strand::Negative, 385, 400),
    ///     Side::new(Frame::new("chr1", 1000, 0, 1000), Strand::Positive, 210, 233),
    ///     nonempty![5, 3],
    ///     vec![Gap::new(7, 15)],
    /// );
    ///
    /// let reversed = projection.clone().reverse();
    /// assert_eq!(reversed.target().strand(), Strand::Positive);
    /// assert_eq!((reversed.target().start(), reversed.target().end()), (100, 115));
    /// assert_eq!(reversed.query().strand(), Strand::Negative);
    /// assert_eq!((reversed.query().start(), reversed.query().end()), (767, 790));
    /// assert_eq!(reversed.blocks(), &nonempty![3, 5]);
    ///
    /// assert_eq!(reversed.reverse(), projection);
    /// ```
    pub fn reverse(self) -> Self {
        let NonEmpty { head, mut tail } = self.blocks;

        let blocks = match tail.pop() {
            Some(last) => {
                let mut reversed = NonEmpty::new(last);

                for size in tail.into_iter().rev() {
                    reversed.push(size);
                }

                reversed.push(head);
                reversed
            }
            None => NonEmpty::new(head),
        };

        Self {
            target: self.target.reverse(),
            query: self.query.reverse(),
            blocks,
            gaps: self.gaps.into_iter().rev().collect(),
        }
    }

    /// Puts the target on the positive strand, reversing if needed.
    pub fn normalized(self) -> Self {
        match self.target.strand {
            Strand::Positive => self,
            Strand::Negative => self.reverse(),
        }
    }
}

/// Gets the strand-relative coordinate of a cap within its sequence.
fn local(graph: &Graph, cap: CapView, side: &'static str, index: usize) -> Result<i64> {
    cap.local_coordinate(graph)
        .ok_or(Error::Unplaced(side, index))
}

/// Gets the exclusive strand-relative end of the segment starting at `cap`.
fn end(graph: &Graph, cap: CapView, side: &'static str, index: usize) -> Result<i64> {
    local(graph, cap.other_segment_cap(graph), side, index).map(|coordinate| coordinate + 1)
}
