//! A builder for an alignment [`Graph`].

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use omics::coordinate::Strand;

use crate::graph::Block;
use crate::graph::BlockId;
use crate::graph::Cap;
use crate::graph::CapId;
use crate::graph::Chain;
use crate::graph::ChainId;
use crate::graph::End;
use crate::graph::EndId;
use crate::graph::Graph;
use crate::graph::Group;
use crate::graph::GroupId;
use crate::graph::Link;
use crate::graph::Scope;
use crate::graph::ScopeId;
use crate::graph::Segment;
use crate::graph::SegmentId;
use crate::graph::Sequence;
use crate::graph::SequenceId;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// A kind of named graph entity.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    /// A scope.
    Scope,

    /// A group.
    Group,

    /// An end.
    End,

    /// A block.
    Block,

    /// A chain.
    Chain,

    /// A sequence.
    Sequence,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Scope => write!(f, "scope"),
            Kind::Group => write!(f, "group"),
            Kind::End => write!(f, "end"),
            Kind::Block => write!(f, "block"),
            Kind::Chain => write!(f, "chain"),
            Kind::Sequence => write!(f, "sequence"),
        }
    }
}

/// An error related to a [`Builder`].
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// An entity was declared more than once.
    Duplicate(Kind, String),

    /// An entity was referenced before it was declared.
    Unknown(Kind, String),

    /// A group was given more than one link.
    MultipleLinks(String),

    /// A block was placed in more than one chain.
    MultipleChains(String),

    /// A chain was declared without any blocks.
    EmptyChain(String),

    /// A scope was nested beneath more than one group.
    MultipleParents(String),

    /// Scope nesting does not form a tree.
    NestingCycle(String),

    /// A block or sequence was declared with a length that cannot hold a base.
    InvalidLength(Kind, String, i64),

    /// A link joins an end that does not belong to the link's group.
    ForeignLinkEnd(String, String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Duplicate(kind, name) => write!(f, "duplicate {kind}: {name}"),
            Error::Unknown(kind, name) => write!(f, "unknown {kind}: {name}"),
            Error::MultipleLinks(group) => write!(f, "group has multiple links: {group}"),
            Error::MultipleChains(block) => {
                write!(f, "block belongs to multiple chains: {block}")
            }
            Error::EmptyChain(chain) => write!(f, "chain has no blocks: {chain}"),
            Error::MultipleParents(scope) => {
                write!(f, "scope is nested more than once: {scope}")
            }
            Error::NestingCycle(scope) => write!(f, "scope nesting forms a cycle: {scope}"),
            Error::InvalidLength(kind, name, length) => {
                write!(f, "invalid {kind} length: {name} has length {length}")
            }
            Error::ForeignLinkEnd(group, end) => {
                write!(f, "link of group {group} joins an end outside it: {end}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Builder
////////////////////////////////////////////////////////////////////////////////////////

/// A builder for a [`Graph`].
///
/// Entities are declared by name, and every reference must name an entity
/// that was already declared.
#[derive(Debug, Default)]
pub struct Builder {
    /// The graph under construction.
    graph: Graph,

    /// Group names.
    groups: HashMap<String, GroupId>,

    /// End names.
    ends: HashMap<String, EndId>,

    /// Block names.
    blocks: HashMap<String, BlockId>,

    /// Chain names.
    chains: HashMap<String, ChainId>,

    /// Sequence names.
    sequences: HashMap<String, SequenceId>,

    /// The parent of every nested scope.
    parents: HashMap<ScopeId, ScopeId>,
}

/// Looks up a declared entity by name.
fn find<I: Copy>(names: &HashMap<String, I>, kind: Kind, name: &str) -> Result<I> {
    names
        .get(name)
        .copied()
        .ok_or_else(|| Error::Unknown(kind, name.to_string()))
}

/// Registers a new name.
fn declare<I>(names: &mut HashMap<String, I>, kind: Kind, name: &str, id: I) -> Result<()> {
    match names.entry(name.to_string()) {
        Entry::Occupied(_) => Err(Error::Duplicate(kind, name.to_string())),
        Entry::Vacant(entry) => {
            entry.insert(id);
            Ok(())
        }
    }
}

impl Builder {
    /// Looks up a declared scope by name.
    fn find_scope(&self, name: &str) -> Result<ScopeId> {
        find(&self.graph.scope_names, Kind::Scope, name)
    }

    /// Declares a scope.
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::graph::Builder;
    ///
    /// let err = Builder::default().scope("0")?.scope("0").unwrap_err();
    /// assert_eq!(err.to_string(), "duplicate scope: 0");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn scope(mut self, name: &str) -> Result<Self> {
        let id = ScopeId(self.graph.scopes.len());
        declare(&mut self.graph.scope_names, Kind::Scope, name, id)?;

        self.graph.scopes.push(Scope {
            name: name.to_string(),
            blocks: Vec::new(),
            chains: Vec::new(),
            groups: Vec::new(),
        });

        Ok(self)
    }

    /// Declares a sequence.
    pub fn sequence(
        mut self,
        name: &str,
        genome: &str,
        start: i64,
        length: i64,
        header: &str,
    ) -> Result<Self> {
        if length < 0 {
            return Err(Error::InvalidLength(
                Kind::Sequence,
                name.to_string(),
                length,
            ));
        }

        let id = SequenceId(self.graph.sequences.len());
        declare(&mut self.sequences, Kind::Sequence, name, id)?;

        self.graph.sequences.push(Sequence {
            name: name.to_string(),
            genome: genome.to_string(),
            header: header.to_string(),
            start,
            length,
        });

        Ok(self)
    }

    /// Declares a group within `scope`, optionally nesting a previously
    /// declared child scope.
    pub fn group(mut self, name: &str, scope: &str, nested: Option<&str>) -> Result<Self> {
        let scope = self.find_scope(scope)?;
        let nested = nested.map(|n| self.find_scope(n)).transpose()?;

        let id = GroupId(self.graph.groups.len());
        declare(&mut self.groups, Kind::Group, name, id)?;

        if let Some(child) = nested {
            if child == scope || self.parents.insert(child, scope).is_some() {
                return Err(Error::MultipleParents(
                    self.graph.scope(child).name().to_string(),
                ));
            }
        }

        self.graph.groups.push(Group {
            name: name.to_string(),
            scope,
            nested,
            link: None,
        });
        self.graph.scopes[scope.0].groups.push(id);

        Ok(self)
    }

    /// Declares an end, optionally within a group.
    pub fn end(mut self, name: &str, group: Option<&str>) -> Result<Self> {
        let group = group.map(|g| find(&self.groups, Kind::Group, g)).transpose()?;

        let id = EndId(self.graph.ends.len());
        declare(&mut self.ends, Kind::End, name, id)?;

        self.graph.ends.push(End {
            name: name.to_string(),
            group,
            caps: Vec::new(),
        });

        Ok(self)
    }

    /// Finds the end named `name`, which must belong to the group `id`.
    fn find_link_end(&self, id: GroupId, group: &str, name: &str) -> Result<EndId> {
        let end = find(&self.ends, Kind::End, name)?;

        if self.graph.ends[end.0].group != Some(id) {
            return Err(Error::ForeignLinkEnd(group.to_string(), name.to_string()));
        }

        Ok(end)
    }

    /// Gives `group` a link between two ends.
    ///
    /// Both ends must belong to `group`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::graph::Builder;
    ///
    /// let err = Builder::default()
    ///     .scope("0")?
    ///     .group("g0", "0", None)?
    ///     .end("e0", Some("g0"))?
    ///     .end("e1", Some("g0"))?
    ///     .link("g0", "e0", "e1")?
    ///     .link("g0", "e0", "e1")
    ///     .unwrap_err();
    ///
    /// assert_eq!(err.to_string(), "group has multiple links: g0");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn link(mut self, group: &str, end5: &str, end3: &str) -> Result<Self> {
        let id = find(&self.groups, Kind::Group, group)?;
        let end5 = self.find_link_end(id, group, end5)?;
        let end3 = self.find_link_end(id, group, end3)?;

        let group = &mut self.graph.groups[id.0];

        if group.link.is_some() {
            return Err(Error::MultipleLinks(group.name.clone()));
        }

        group.link = Some(Link { end5, end3 });
        Ok(self)
    }

    /// Declares a block of `length` bases between two ends.
    pub fn block(
        mut self,
        name: &str,
        scope: &str,
        length: i64,
        end5: &str,
        end3: &str,
    ) -> Result<Self> {
        let scope = self.find_scope(scope)?;
        let end5 = find(&self.ends, Kind::End, end5)?;
        let end3 = find(&self.ends, Kind::End, end3)?;

        if length < 1 {
            return Err(Error::InvalidLength(Kind::Block, name.to_string(), length));
        }

        let id = BlockId(self.graph.blocks.len());
        declare(&mut self.blocks, Kind::Block, name, id)?;

        self.graph.blocks.push(Block {
            name: name.to_string(),
            scope,
            length,
            end5,
            end3,
            segments: Vec::new(),
            chain: None,
        });
        self.graph.scopes[scope.0].blocks.push(id);

        Ok(self)
    }

    /// Adds a segment to `block`.
    ///
    /// `start` is the leftmost absolute coordinate covered by the segment.
    /// The segment spans the length of its block, and its caps attach to the
    /// block's ends in block orientation.
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::graph::Builder;
    /// use cactus_export::graph::SegmentView;
    /// use omics::coordinate::Strand;
    ///
    /// let graph = Builder::default()
    ///     .scope("0")?
    ///     .sequence("s0", "hg18", 0, 100, "hg18.chr7")?
    ///     .end("e0", None)?
    ///     .end("e1", None)?
    ///     .block("b0", "0", 5, "e0", "e1")?
    ///     .segment("b0", Some("s0"), Strand::Negative, 10)?
    ///     .try_build()?;
    ///
    /// let block = graph.block(graph.scope(graph.scope_by_name("0").unwrap()).blocks()[0]);
    /// let segment = SegmentView::forward(block.segments()[0]);
    ///
    /// assert_eq!(segment.cap5(&graph).coordinate(&graph), 14);
    /// assert_eq!(segment.cap3(&graph).coordinate(&graph), 10);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn segment(
        mut self,
        block: &str,
        sequence: Option<&str>,
        strand: Strand,
        start: i64,
    ) -> Result<Self> {
        let block = find(&self.blocks, Kind::Block, block)?;
        let sequence = sequence
            .map(|s| find(&self.sequences, Kind::Sequence, s))
            .transpose()?;

        let id = SegmentId(self.graph.segments.len());
        let (end5, end3, length) = {
            let block = self.graph.block(block);
            (block.end5, block.end3, block.length)
        };

        let last = start + length - 1;
        let (first, second) = match strand {
            Strand::Positive => (start, last),
            Strand::Negative => (last, start),
        };

        let cap5 = self.push_cap(end5, first, strand, sequence, id);
        let cap3 = self.push_cap(end3, second, strand, sequence, id);

        self.graph.segments.push(Segment {
            block,
            sequence,
            strand,
            cap5,
            cap3,
        });
        self.graph.blocks[block.0].segments.push(id);

        Ok(self)
    }

    /// Adds a cap and attaches it to `end`.
    fn push_cap(
        &mut self,
        end: EndId,
        coordinate: i64,
        strand: Strand,
        sequence: Option<SequenceId>,
        segment: SegmentId,
    ) -> CapId {
        let id = CapId(self.graph.caps.len());

        self.graph.caps.push(Cap {
            end,
            coordinate,
            strand,
            sequence,
            segment,
        });
        self.graph.ends[end.0].caps.push(id);

        id
    }

    /// Declares a chain over previously declared blocks, in chain order.
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::graph::Builder;
    ///
    /// let builder = Builder::default()
    ///     .scope("0")?
    ///     .end("e0", None)?
    ///     .end("e1", None)?
    ///     .block("b0", "0", 5, "e0", "e1")?
    ///     .chain("c0", "0", ["b0"])?;
    ///
    /// let err = builder.chain("c1", "0", ["b0"]).unwrap_err();
    /// assert_eq!(err.to_string(), "block belongs to multiple chains: b0");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn chain<'a>(
        mut self,
        name: &str,
        scope: &str,
        blocks: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self> {
        let scope = self.find_scope(scope)?;
        let blocks = blocks
            .into_iter()
            .map(|b| find(&self.blocks, Kind::Block, b))
            .collect::<Result<Vec<_>>>()?;

        if blocks.is_empty() {
            return Err(Error::EmptyChain(name.to_string()));
        }

        let id = ChainId(self.graph.chains.len());
        declare(&mut self.chains, Kind::Chain, name, id)?;

        for block in &blocks {
            let block = &mut self.graph.blocks[block.0];

            if block.chain.is_some() {
                return Err(Error::MultipleChains(block.name.clone()));
            }

            block.chain = Some(id);
        }

        self.graph.chains.push(Chain {
            name: name.to_string(),
            scope,
            blocks,
        });
        self.graph.scopes[scope.0].chains.push(id);

        Ok(self)
    }

    /// Consumes `self` to attempt to build a [`Graph`].
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::graph::Builder;
    ///
    /// let err = Builder::default()
    ///     .scope("0")?
    ///     .scope("1")?
    ///     .group("g0", "0", Some("1"))?
    ///     .group("g1", "1", Some("0"))?
    ///     .try_build()
    ///     .unwrap_err();
    ///
    /// assert_eq!(err.to_string(), "scope nesting forms a cycle: 0");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build(self) -> Result<Graph> {
        let limit = self.graph.scopes.len();

        for scope in (0..limit).map(ScopeId) {
            let mut current = scope;

            for _ in 0..=limit {
                match self.parents.get(&current) {
                    Some(parent) => current = *parent,
                    None => break,
                }
            }

            if self.parents.contains_key(&current) {
                return Err(Error::NestingCycle(
                    self.graph.scope(scope).name().to_string(),
                ));
            }
        }

        Ok(self.graph)
    }
}
