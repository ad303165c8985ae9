//! A read-only, nested alignment graph.
//!
//! The graph is an arena: every entity lives in a flat table and is referred
//! to by a small, typed identifier. Identifiers are assigned in declaration
//! order, so they double as a stable enumeration order for every iteration
//! the exporters perform.
//!
//! Segments, caps, and ends are only ever stored in one orientation. Anything
//! that needs to look at them "the other way around" goes through an
//! [`Oriented`] view (see [`view`]), which never mutates the graph.

use std::collections::HashMap;

use omics::coordinate::Strand;

pub mod builder;
pub mod view;

pub use builder::Builder;
pub use view::CapView;
pub use view::EndView;
pub use view::Oriented;
pub use view::SegmentView;

////////////////////////////////////////////////////////////////////////////////////////
// Identifiers
////////////////////////////////////////////////////////////////////////////////////////

/// Declares an arena identifier.
macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
        pub struct $name(usize);

        impl $name {
            /// Gets the index of this identifier within its arena.
            pub fn index(&self) -> usize {
                self.0
            }
        }
    };
}

identifier!(
    /// The identifier of a [`Scope`].
    ScopeId
);
identifier!(
    /// The identifier of a [`Group`].
    GroupId
);
identifier!(
    /// The identifier of an [`End`].
    EndId
);
identifier!(
    /// The identifier of a [`Cap`].
    CapId
);
identifier!(
    /// The identifier of a [`Block`].
    BlockId
);
identifier!(
    /// The identifier of a [`Chain`].
    ChainId
);
identifier!(
    /// The identifier of a [`Segment`].
    SegmentId
);
identifier!(
    /// The identifier of a [`Sequence`].
    SequenceId
);

////////////////////////////////////////////////////////////////////////////////////////
// Entities
////////////////////////////////////////////////////////////////////////////////////////

/// One level of the nested alignment problem.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Scope {
    /// The name.
    name: String,

    /// The blocks directly owned by this scope.
    blocks: Vec<BlockId>,

    /// The chains directly owned by this scope.
    chains: Vec<ChainId>,

    /// The groups directly owned by this scope.
    groups: Vec<GroupId>,
}

impl Scope {
    /// Gets the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the blocks directly owned by this scope.
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    /// Gets the chains directly owned by this scope.
    pub fn chains(&self) -> &[ChainId] {
        &self.chains
    }

    /// Gets the groups directly owned by this scope.
    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }
}

/// A link certifying that there is no sequence gap between two ends.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Link {
    /// The 5' end (positive orientation).
    end5: EndId,

    /// The 3' end (positive orientation).
    end3: EndId,
}

impl Link {
    /// Gets the 5' end.
    pub fn end5(&self) -> EndId {
        self.end5
    }

    /// Gets the 3' end.
    pub fn end3(&self) -> EndId {
        self.end3
    }
}

/// A set of ends, either terminal or nesting exactly one child scope.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Group {
    /// The name.
    name: String,

    /// The scope owning this group.
    scope: ScopeId,

    /// The nested child scope, if the group is not terminal.
    nested: Option<ScopeId>,

    /// The link carried by this group, if any.
    link: Option<Link>,
}

impl Group {
    /// Gets the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the scope owning this group.
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    /// Gets the nested child scope (if it exists).
    pub fn nested(&self) -> Option<ScopeId> {
        self.nested
    }

    /// Gets the link (if it exists).
    pub fn link(&self) -> Option<Link> {
        self.link
    }
}

/// A block boundary that groups the caps of all segments sitting there.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct End {
    /// The name.
    name: String,

    /// The enclosing group.
    group: Option<GroupId>,

    /// The caps attached to this end.
    caps: Vec<CapId>,
}

impl End {
    /// Gets the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the enclosing group (if it exists).
    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    /// Gets the caps attached to this end.
    pub fn caps(&self) -> &[CapId] {
        &self.caps
    }
}

/// One boundary of a segment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Cap {
    /// The end this cap is attached to.
    end: EndId,

    /// The absolute coordinate within the owning sequence.
    coordinate: i64,

    /// The strand.
    strand: Strand,

    /// The owning sequence.
    sequence: Option<SequenceId>,

    /// The owning segment.
    segment: SegmentId,
}

impl Cap {
    /// Gets the end this cap is attached to.
    pub fn end(&self) -> EndId {
        self.end
    }

    /// Gets the absolute coordinate.
    pub fn coordinate(&self) -> i64 {
        self.coordinate
    }

    /// Gets the strand.
    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Gets the owning sequence (if it exists).
    pub fn sequence(&self) -> Option<SequenceId> {
        self.sequence
    }

    /// Gets the owning segment.
    pub fn segment(&self) -> SegmentId {
        self.segment
    }
}

/// An ungapped alignment column.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Block {
    /// The name.
    name: String,

    /// The scope owning this block.
    scope: ScopeId,

    /// The length of every segment in this block.
    length: i64,

    /// The 5' end.
    end5: EndId,

    /// The 3' end.
    end3: EndId,

    /// The segments aligned in this block.
    segments: Vec<SegmentId>,

    /// The chain this block belongs to (if any).
    chain: Option<ChainId>,
}

impl Block {
    /// Gets the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the scope owning this block.
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    /// Gets the length.
    pub fn length(&self) -> i64 {
        self.length
    }

    /// Gets the 5' end.
    pub fn end5(&self) -> EndId {
        self.end5
    }

    /// Gets the 3' end.
    pub fn end3(&self) -> EndId {
        self.end3
    }

    /// Gets the segments.
    pub fn segments(&self) -> &[SegmentId] {
        &self.segments
    }

    /// Gets the chain (if it exists).
    pub fn chain(&self) -> Option<ChainId> {
        self.chain
    }
}

/// An ordered run of blocks representing one contiguous alignment path.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Chain {
    /// The name.
    name: String,

    /// The scope owning this chain.
    scope: ScopeId,

    /// The blocks, in chain order.
    blocks: Vec<BlockId>,
}

impl Chain {
    /// Gets the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the scope owning this chain.
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    /// Gets the blocks in chain order.
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }
}

/// One genome's occurrence within a block, stored in block orientation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Segment {
    /// The block.
    block: BlockId,

    /// The owning sequence (absent for ancestral reconstructions).
    sequence: Option<SequenceId>,

    /// The strand.
    strand: Strand,

    /// The 5' cap.
    cap5: CapId,

    /// The 3' cap.
    cap3: CapId,
}

impl Segment {
    /// Gets the block.
    pub fn block(&self) -> BlockId {
        self.block
    }

    /// Gets the owning sequence (if it exists).
    pub fn sequence(&self) -> Option<SequenceId> {
        self.sequence
    }

    /// Gets the strand.
    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Gets the 5' cap.
    pub fn cap5(&self) -> CapId {
        self.cap5
    }

    /// Gets the 3' cap.
    pub fn cap3(&self) -> CapId {
        self.cap3
    }
}

/// A genome, assembly, or contig source.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sequence {
    /// The name.
    name: String,

    /// The identifier of the genome this sequence belongs to.
    genome: String,

    /// The free-text header.
    header: String,

    /// The absolute coordinate of the first base.
    start: i64,

    /// The length.
    length: i64,
}

impl Sequence {
    /// Gets the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the genome identifier.
    pub fn genome(&self) -> &str {
        &self.genome
    }

    /// Gets the free-text header.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Gets the absolute coordinate of the first base.
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Gets the length.
    pub fn length(&self) -> i64 {
        self.length
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Graph
////////////////////////////////////////////////////////////////////////////////////////

/// An immutable alignment graph.
///
/// Use a [`Builder`] to construct one.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    /// The scopes.
    scopes: Vec<Scope>,

    /// The groups.
    groups: Vec<Group>,

    /// The ends.
    ends: Vec<End>,

    /// The caps.
    caps: Vec<Cap>,

    /// The blocks.
    blocks: Vec<Block>,

    /// The chains.
    chains: Vec<Chain>,

    /// The segments.
    segments: Vec<Segment>,

    /// The sequences.
    sequences: Vec<Sequence>,

    /// A lookup from scope names to scopes.
    scope_names: HashMap<String, ScopeId>,
}

impl Graph {
    /// Gets a scope.
    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    /// Finds a scope by name.
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::graph::Builder;
    ///
    /// let graph = Builder::default().scope("0")?.try_build()?;
    ///
    /// assert!(graph.scope_by_name("0").is_some());
    /// assert!(graph.scope_by_name("1").is_none());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn scope_by_name(&self, name: &str) -> Option<ScopeId> {
        self.scope_names.get(name).copied()
    }

    /// Gets a group.
    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups[id.0]
    }

    /// Gets an end.
    pub fn end(&self, id: EndId) -> &End {
        &self.ends[id.0]
    }

    /// Iterates over every end identifier in declaration order.
    pub fn end_ids(&self) -> impl Iterator<Item = EndId> {
        (0..self.ends.len()).map(EndId)
    }

    /// Gets a cap.
    pub fn cap(&self, id: CapId) -> &Cap {
        &self.caps[id.0]
    }

    /// Gets a block.
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.0]
    }

    /// Gets a chain.
    pub fn chain(&self, id: ChainId) -> &Chain {
        &self.chains[id.0]
    }

    /// Gets a segment.
    pub fn segment(&self, id: SegmentId) -> &Segment {
        &self.segments[id.0]
    }

    /// Gets a sequence.
    pub fn sequence(&self, id: SequenceId) -> &Sequence {
        &self.sequences[id.0]
    }

    /// Iterates over every sequence in declaration order.
    pub fn sequences(&self) -> impl Iterator<Item = (SequenceId, &Sequence)> {
        self.sequences
            .iter()
            .enumerate()
            .map(|(i, sequence)| (SequenceId(i), sequence))
    }

    /// Returns whether any sequence belongs to `genome`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::graph::Builder;
    ///
    /// let graph = Builder::default()
    ///     .sequence("s0", "hg18", 0, 100, "hg18.chr7")?
    ///     .try_build()?;
    ///
    /// assert!(graph.contains_genome("hg18"));
    /// assert!(!graph.contains_genome("mm9"));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn contains_genome(&self, genome: &str) -> bool {
        self.sequences.iter().any(|s| s.genome() == genome)
    }

    /// Iterates over the child scopes nested beneath `scope`, in group order.
    pub fn children(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        self.scope(scope)
            .groups()
            .iter()
            .filter_map(|group| self.group(*group).nested())
    }
}
