//! Threads: the ordered occurrences of one genome across a set of blocks.

use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::graph::BlockId;
use crate::graph::CapView;
use crate::graph::EndView;
use crate::graph::Graph;
use crate::graph::SegmentId;
use crate::graph::SegmentView;
use crate::graph::SequenceId;
use crate::header::display_name;

/// One occurrence within a thread.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Member {
    /// The segment, in positive orientation.
    segment: SegmentView,

    /// The target cap sitting at the same end as the segment's 5' cap.
    target: Option<CapView>,
}

impl Member {
    /// Gets the segment in positive orientation.
    pub fn segment(&self) -> SegmentView {
        self.segment
    }

    /// Gets the co-located target cap (only present in paired threads).
    pub fn target(&self) -> Option<CapView> {
        self.target
    }

    /// Gets the end through which the thread enters this member.
    pub fn entry_end(&self, graph: &Graph) -> EndView {
        self.segment.cap5(graph).end(graph)
    }

    /// Gets the end through which the thread leaves this member.
    pub fn exit_end(&self, graph: &Graph) -> EndView {
        self.segment.cap3(graph).end(graph)
    }
}

/// The occurrences of one sequence, ordered by canonical start.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Thread {
    /// The display name of the sequence.
    name: String,

    /// The sequence.
    sequence: SequenceId,

    /// The members in order.
    members: Vec<Member>,
}

impl Thread {
    /// Gets the display name of the sequence.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the sequence the thread runs along.
    pub fn sequence(&self) -> SequenceId {
        self.sequence
    }

    /// Gets the members in order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }
}

/// A thread under construction.
#[derive(Debug)]
struct Pending {
    /// The display name.
    name: String,

    /// The sequence of the first member.
    sequence: SequenceId,

    /// The members, keyed by canonical start with the segment as a tie-break.
    members: BTreeMap<(i64, SegmentId), Member>,
}

/// Threads collected from a set of blocks.
///
/// Threads are kept in the order their display names were first seen.
#[derive(Debug, Default)]
pub struct Threads {
    /// The threads in first-seen order.
    threads: Vec<Pending>,

    /// A lookup from display names to positions in `threads`.
    index: HashMap<String, usize>,

    /// The number of segments excluded for lacking a target cap.
    skipped: usize,
}

impl Threads {
    /// Collects the segments of `genome` found in `blocks`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::store::Reader;
    /// use cactus_export::thread::Threads;
    ///
    /// let data = b"\
    /// scope 0
    /// sequence s0 hg18 0 100 hg18.chr7.1000.0
    /// sequence s1 mm9 0 100 mm9.chr2.1000.0
    /// end e0 -
    /// end e1 -
    /// block b0 0 5 e0 e1
    /// segment b0 s0 + 30
    /// segment b0 s1 - 50
    /// segment b0 s0 - 10
    /// ";
    /// let graph = Reader::new(&data[..]).graph()?;
    /// let root = graph.scope_by_name("0").unwrap();
    ///
    /// let threads = Threads::collect(&graph, graph.scope(root).blocks().iter().copied(), "hg18")
    ///     .into_threads();
    ///
    /// assert_eq!(threads.len(), 1);
    /// assert_eq!(threads[0].name(), "hg18.chr7.1000.0");
    ///
    /// let starts = threads[0]
    ///     .members()
    ///     .iter()
    ///     .map(|member| member.segment().start(&graph))
    ///     .collect::<Vec<_>>();
    /// assert_eq!(starts, vec![10, 30]);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn collect(
        graph: &Graph,
        blocks: impl IntoIterator<Item = BlockId>,
        genome: &str,
    ) -> Self {
        let mut threads = Self::default();

        for (segment, sequence) in matching(graph, blocks, genome) {
            threads.insert(
                graph,
                sequence,
                Member {
                    segment,
                    target: None,
                },
            );
        }

        threads
    }

    /// Collects the segments of `query` found in `blocks` that have a cap of
    /// `target` at the end of their 5' cap.
    ///
    /// Segments without such a cap are excluded and counted in
    /// [`Threads::skipped()`].
    pub fn collect_paired(
        graph: &Graph,
        blocks: impl IntoIterator<Item = BlockId>,
        query: &str,
        target: &str,
    ) -> Self {
        let mut threads = Self::default();

        for (segment, sequence) in matching(graph, blocks, query) {
            match target_cap(graph, segment.cap5(graph).end(graph), target) {
                Some(cap) => threads.insert(
                    graph,
                    sequence,
                    Member {
                        segment,
                        target: Some(cap),
                    },
                ),
                None => {
                    tracing::debug!(
                        sequence = display_name(graph, sequence),
                        start = segment.start(graph),
                        target,
                        "skipping segment without a target cap"
                    );
                    threads.skipped += 1;
                }
            }
        }

        threads
    }

    /// Adds a member to the thread of its sequence.
    fn insert(&mut self, graph: &Graph, sequence: SequenceId, member: Member) {
        let name = display_name(graph, sequence);

        let position = match self.index.get(name) {
            Some(position) => *position,
            None => {
                self.threads.push(Pending {
                    name: name.to_string(),
                    sequence,
                    members: BTreeMap::new(),
                });
                self.index.insert(name.to_string(), self.threads.len() - 1);
                self.threads.len() - 1
            }
        };

        let key = (member.segment.start(graph), member.segment.id());
        self.threads[position].members.insert(key, member);
    }

    /// Gets the number of segments excluded for lacking a target cap.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Finalizes the threads in first-seen order.
    pub fn into_threads(self) -> Vec<Thread> {
        self.threads
            .into_iter()
            .map(|pending| {
                let starts = pending.members.keys().map(|(start, _)| *start);

                if starts.clone().zip(starts.skip(1)).any(|(a, b)| a == b) {
                    tracing::debug!(
                        thread = pending.name,
                        "members share a canonical start; ordering them by segment"
                    );
                }

                Thread {
                    name: pending.name,
                    sequence: pending.sequence,
                    members: pending.members.into_values().collect(),
                }
            })
            .collect()
    }
}

/// Iterates over the positive views of the segments of `genome` within
/// `blocks`, skipping segments without a sequence.
fn matching<'g>(
    graph: &'g Graph,
    blocks: impl IntoIterator<Item = BlockId> + 'g,
    genome: &'g str,
) -> impl Iterator<Item = (SegmentView, SequenceId)> + 'g {
    blocks
        .into_iter()
        .flat_map(|block| graph.block(block).segments().iter().copied())
        .filter_map(move |segment| {
            let sequence = graph.segment(segment).sequence()?;

            (graph.sequence(sequence).genome() == genome)
                .then(|| (SegmentView::forward(segment).canonical(graph), sequence))
        })
}

/// Finds the first cap of `genome` attached to `end`.
pub fn target_cap(graph: &Graph, end: EndView, genome: &str) -> Option<CapView> {
    end.caps(graph).find(|cap| {
        cap.sequence(graph)
            .is_some_and(|sequence| graph.sequence(sequence).genome() == genome)
    })
}

#[cfg(test)]
mod tests {
    use omics::coordinate::Strand;

    use super::*;
    use crate::graph::Builder;

    fn graph() -> Result<Graph, Box<dyn std::error::Error>> {
        Ok(Builder::default()
            .scope("0")?
            .sequence("s0", "hg18", 0, 100, "hg18.chr7.1000.0")?
            .sequence("s1", "hg18", 0, 100, "hg18.chr8.1000.0")?
            .sequence("s2", "mm9", 0, 100, "mm9.chr2.1000.0")?
            .end("e0", None)?
            .end("e1", None)?
            .end("e2", None)?
            .end("e3", None)?
            .block("b0", "0", 5, "e0", "e1")?
            .block("b1", "0", 5, "e2", "e3")?
            .segment("b0", Some("s1"), Strand::Positive, 40)?
            .segment("b0", Some("s0"), Strand::Positive, 20)?
            .segment("b0", Some("s2"), Strand::Negative, 60)?
            .segment("b0", None, Strand::Positive, 0)?
            .segment("b1", Some("s0"), Strand::Positive, 20)?
            .segment("b1", Some("s0"), Strand::Negative, 5)?
            .try_build()?)
    }

    fn blocks(graph: &Graph) -> Vec<BlockId> {
        let root = graph.scope_by_name("0").unwrap();
        graph.scope(root).blocks().to_vec()
    }

    #[test]
    fn threads_follow_first_seen_order() -> Result<(), Box<dyn std::error::Error>> {
        let graph = graph()?;
        let threads = Threads::collect(&graph, blocks(&graph), "hg18").into_threads();

        let names = threads.iter().map(|t| t.name()).collect::<Vec<_>>();
        assert_eq!(names, vec!["hg18.chr8.1000.0", "hg18.chr7.1000.0"]);

        Ok(())
    }

    #[test]
    fn equal_starts_are_kept_and_ordered_by_segment() -> Result<(), Box<dyn std::error::Error>> {
        let graph = graph()?;
        let threads = Threads::collect(&graph, blocks(&graph), "hg18").into_threads();
        let members = threads[1].members();

        assert_eq!(members.len(), 3);

        let keys = members
            .iter()
            .map(|m| (m.segment().start(&graph), m.segment().id()))
            .collect::<Vec<_>>();
        let mut sorted = keys.clone();
        sorted.sort();

        assert_eq!(keys, sorted);
        assert_eq!(keys[0].0, 5);
        assert_eq!(keys[1].0, 20);
        assert_eq!(keys[2].0, 20);

        Ok(())
    }

    #[test]
    fn members_are_positive() -> Result<(), Box<dyn std::error::Error>> {
        let graph = graph()?;
        let threads = Threads::collect(&graph, blocks(&graph), "hg18").into_threads();

        for thread in &threads {
            for member in thread.members() {
                assert_eq!(member.segment().strand(&graph), Strand::Positive);
                assert!(member.target().is_none());
            }
        }

        Ok(())
    }

    #[test]
    fn unknown_genomes_produce_no_threads() -> Result<(), Box<dyn std::error::Error>> {
        let graph = graph()?;
        assert!(
            Threads::collect(&graph, blocks(&graph), "panTro2")
                .into_threads()
                .is_empty()
        );
        Ok(())
    }

    #[test]
    fn paired_threads_skip_segments_without_a_target() -> Result<(), Box<dyn std::error::Error>> {
        let graph = graph()?;
        let threads = Threads::collect_paired(&graph, blocks(&graph), "hg18", "mm9");

        // Only b0 carries an mm9 segment.
        assert_eq!(threads.skipped(), 2);

        let threads = threads.into_threads();
        assert_eq!(threads.len(), 2);

        for thread in &threads {
            for member in thread.members() {
                let target = member.target().unwrap();
                let sequence = target.sequence(&graph).unwrap();
                assert_eq!(graph.sequence(sequence).genome(), "mm9");

                // The target cap sits at the same (oriented) end as the query's 5' cap.
                assert_eq!(target.end(&graph), member.entry_end(&graph));
            }
        }

        Ok(())
    }
}
