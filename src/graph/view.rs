//! Oriented, read-only views over segments, caps, and ends.

use omics::coordinate::Strand;

use crate::graph::CapId;
use crate::graph::EndId;
use crate::graph::Graph;
use crate::graph::GroupId;
use crate::graph::SegmentId;
use crate::graph::SequenceId;

/// An entity seen either in its stored orientation or reversed.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Oriented<I> {
    /// The identifier of the stored entity.
    id: I,

    /// Whether the entity is seen reversed.
    reversed: bool,
}

impl<I: Copy> Oriented<I> {
    /// Views an entity in its stored orientation.
    pub fn forward(id: I) -> Self {
        Self {
            id,
            reversed: false,
        }
    }

    /// Gets the identifier of the stored entity.
    pub fn id(&self) -> I {
        self.id
    }

    /// Returns whether the entity is seen reversed.
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Returns the opposite view of the same entity.
    pub fn reverse(self) -> Self {
        Self {
            id: self.id,
            reversed: !self.reversed,
        }
    }

    /// Returns the view in the stored (positive) orientation.
    pub fn positive(self) -> Self {
        Self::forward(self.id)
    }

    /// Reverses the view if `flip` is set.
    fn flipped(self, flip: bool) -> Self {
        if flip {
            self.reverse()
        } else {
            self
        }
    }
}

/// A segment seen in some orientation.
pub type SegmentView = Oriented<SegmentId>;

/// A cap seen in some orientation.
pub type CapView = Oriented<CapId>;

/// An end seen in some orientation.
pub type EndView = Oriented<EndId>;

/// Flips `strand` if `reversed` is set.
fn orient(strand: Strand, reversed: bool) -> Strand {
    if reversed {
        strand.complement()
    } else {
        strand
    }
}

impl Oriented<SegmentId> {
    /// Gets the strand of this view.
    pub fn strand(&self, graph: &Graph) -> Strand {
        orient(graph.segment(self.id).strand(), self.reversed)
    }

    /// Gets the 5' cap of this view.
    pub fn cap5(&self, graph: &Graph) -> CapView {
        let segment = graph.segment(self.id);

        match self.reversed {
            false => CapView::forward(segment.cap5()),
            true => CapView::forward(segment.cap3()).reverse(),
        }
    }

    /// Gets the 3' cap of this view.
    pub fn cap3(&self, graph: &Graph) -> CapView {
        let segment = graph.segment(self.id);

        match self.reversed {
            false => CapView::forward(segment.cap3()),
            true => CapView::forward(segment.cap5()).reverse(),
        }
    }

    /// Gets the start of this view (the coordinate of its 5' cap).
    pub fn start(&self, graph: &Graph) -> i64 {
        self.cap5(graph).coordinate(graph)
    }

    /// Gets the length.
    pub fn length(&self, graph: &Graph) -> i64 {
        graph.block(graph.segment(self.id).block()).length()
    }

    /// Gets the owning sequence (if it exists).
    pub fn sequence(&self, graph: &Graph) -> Option<SequenceId> {
        graph.segment(self.id).sequence()
    }

    /// Returns the positive-strand view of this segment.
    ///
    /// All ordering and comparison of segments happens on this view.
    pub fn canonical(self, graph: &Graph) -> Self {
        match self.strand(graph) {
            Strand::Positive => self,
            Strand::Negative => self.reverse(),
        }
    }
}

impl Oriented<CapId> {
    /// Gets the absolute coordinate.
    pub fn coordinate(&self, graph: &Graph) -> i64 {
        graph.cap(self.id).coordinate()
    }

    /// Gets the strand of this view.
    pub fn strand(&self, graph: &Graph) -> Strand {
        orient(graph.cap(self.id).strand(), self.reversed)
    }

    /// Gets the end of this view.
    pub fn end(&self, graph: &Graph) -> EndView {
        EndView::forward(graph.cap(self.id).end()).flipped(self.reversed)
    }

    /// Gets the owning sequence (if it exists).
    pub fn sequence(&self, graph: &Graph) -> Option<SequenceId> {
        graph.cap(self.id).sequence()
    }

    /// Gets the cap at the other side of the owning segment, in the same
    /// orientation as this view.
    pub fn other_segment_cap(&self, graph: &Graph) -> CapView {
        let segment = graph.segment(graph.cap(self.id).segment());

        let other = if segment.cap5() == self.id {
            segment.cap3()
        } else {
            segment.cap5()
        };

        CapView::forward(other).flipped(self.reversed)
    }

    /// Gets the coordinate relative to the start of the owning sequence on
    /// the strand of this view.
    ///
    /// Returns [`None`] if the cap has no owning sequence.
    pub fn local_coordinate(&self, graph: &Graph) -> Option<i64> {
        let sequence = graph.sequence(self.sequence(graph)?);
        let coordinate = self.coordinate(graph);

        Some(match self.strand(graph) {
            Strand::Positive => coordinate - sequence.start(),
            Strand::Negative => sequence.start() + sequence.length() - 1 - coordinate,
        })
    }
}

impl Oriented<EndId> {
    /// Gets the enclosing group (if it exists).
    pub fn group(&self, graph: &Graph) -> Option<GroupId> {
        graph.end(self.id).group()
    }

    /// Iterates over the caps attached to this end, oriented like the end.
    pub fn caps<'g>(&self, graph: &'g Graph) -> impl Iterator<Item = CapView> + 'g {
        let reversed = self.reversed;

        graph
            .end(self.id)
            .caps()
            .iter()
            .map(move |cap| CapView::forward(*cap).flipped(reversed))
    }
}

#[cfg(test)]
mod tests {
    use omics::coordinate::Strand;

    use crate::graph::Block;
    use crate::graph::Builder;
    use crate::graph::EndView;
    use crate::graph::Graph;
    use crate::graph::SegmentView;

    fn graph() -> Result<Graph, Box<dyn std::error::Error>> {
        Ok(Builder::default()
            .scope("0")?
            .sequence("s0", "hg18", 2, 100, "hg18.chr1")?
            .end("e0", None)?
            .end("e1", None)?
            .block("b0", "0", 5, "e0", "e1")?
            .segment("b0", Some("s0"), Strand::Positive, 10)?
            .segment("b0", Some("s0"), Strand::Negative, 40)?
            .try_build()?)
    }

    fn block(graph: &Graph) -> &Block {
        let scope = graph.scope_by_name("0").unwrap();
        graph.block(graph.scope(scope).blocks()[0])
    }

    #[test]
    fn positive_segment_caps() -> Result<(), Box<dyn std::error::Error>> {
        let graph = graph()?;
        let segment = SegmentView::forward(block(&graph).segments()[0]);

        assert_eq!(segment.strand(&graph), Strand::Positive);
        assert_eq!(segment.start(&graph), 10);
        assert_eq!(segment.cap3(&graph).coordinate(&graph), 14);
        assert_eq!(segment.canonical(&graph), segment);

        Ok(())
    }

    #[test]
    fn negative_segment_is_canonicalized_without_mutation()
    -> Result<(), Box<dyn std::error::Error>> {
        let graph = graph()?;
        let block = block(&graph);
        let stored = SegmentView::forward(block.segments()[1]);

        assert_eq!(stored.strand(&graph), Strand::Negative);
        assert_eq!(stored.start(&graph), 44);

        let canonical = stored.canonical(&graph);
        assert!(canonical.is_reversed());
        assert_eq!(canonical.strand(&graph), Strand::Positive);
        assert_eq!(canonical.start(&graph), 40);
        assert_eq!(canonical.cap3(&graph).coordinate(&graph), 44);

        // The 5' cap of the reversed view sits on the reversed 3' end of the block.
        let end = canonical.cap5(&graph).end(&graph);
        assert!(end.is_reversed());
        assert_eq!(end.id(), block.end3());

        // The stored segment is untouched.
        assert_eq!(graph.segment(stored.id()).strand(), Strand::Negative);

        Ok(())
    }

    #[test]
    fn other_segment_cap_keeps_orientation() -> Result<(), Box<dyn std::error::Error>> {
        let graph = graph()?;
        let block = block(&graph);
        let canonical = SegmentView::forward(block.segments()[1]).canonical(&graph);

        let cap5 = canonical.cap5(&graph);
        assert_eq!(cap5.other_segment_cap(&graph), canonical.cap3(&graph));
        assert_eq!(canonical.cap3(&graph).other_segment_cap(&graph), cap5);

        Ok(())
    }

    #[test]
    fn local_coordinates_are_strand_relative() -> Result<(), Box<dyn std::error::Error>> {
        let graph = graph()?;
        let block = block(&graph);

        let positive = SegmentView::forward(block.segments()[0]);
        assert_eq!(positive.cap5(&graph).local_coordinate(&graph), Some(8));

        // start 2, length 100: the last base (101) is local position 0 on the
        // negative strand.
        let negative = SegmentView::forward(block.segments()[1]);
        assert_eq!(negative.cap5(&graph).local_coordinate(&graph), Some(101 - 44));
        assert_eq!(
            negative.cap5(&graph).reverse().local_coordinate(&graph),
            Some(44 - 2)
        );

        Ok(())
    }

    #[test]
    fn end_caps_follow_end_orientation() -> Result<(), Box<dyn std::error::Error>> {
        let graph = graph()?;
        let block = block(&graph);

        let forward = EndView::forward(block.end5());
        assert!(forward.caps(&graph).all(|cap| !cap.is_reversed()));
        assert_eq!(forward.caps(&graph).count(), 2);

        let strands = forward
            .reverse()
            .caps(&graph)
            .map(|cap| cap.strand(&graph))
            .collect::<Vec<_>>();
        assert_eq!(strands, vec![Strand::Negative, Strand::Positive]);

        Ok(())
    }
}
