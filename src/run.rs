//! Splitting threads into runs.
//!
//! A run is a maximal stretch of consecutive thread members where each member
//! is joined to the previous one by a link. Every run becomes one record.

use crate::graph::CapView;
use crate::graph::Graph;
use crate::link::is_linked;
use crate::thread::Member;

/// Returns whether `next` continues a run ending in `previous`.
///
/// The exit end of `previous` must be linked to the entry end of `next`. In
/// paired threads both targets must also lie on the same sequence and strand,
/// with the target of `next` starting after the target of `previous` ends.
pub fn continues(graph: &Graph, previous: &Member, next: &Member) -> bool {
    if !is_linked(graph, previous.exit_end(graph), next.entry_end(graph)) {
        return false;
    }

    match (previous.target(), next.target()) {
        (Some(a), Some(b)) => {
            a.sequence(graph) == b.sequence(graph)
                && a.strand(graph) == b.strand(graph)
                && advances(graph, a, b)
        }
        _ => true,
    }
}

/// Returns whether the segment starting at `next` begins past the end of the
/// segment starting at `previous`, along their strand.
///
/// Unplaced caps are left for projection to reject.
fn advances(graph: &Graph, previous: CapView, next: CapView) -> bool {
    let last = previous.other_segment_cap(graph).local_coordinate(graph);

    match (last, next.local_coordinate(graph)) {
        (Some(last), Some(first)) => first > last,
        _ => true,
    }
}

/// An iterator over the runs of a thread.
///
/// Each member is inspected once. Runs are never empty.
#[derive(Debug)]
pub struct Runs<'g, 't> {
    /// The graph the members belong to.
    graph: &'g Graph,

    /// The members not yet yielded.
    remaining: &'t [Member],
}

impl<'g, 't> Runs<'g, 't> {
    /// Creates an iterator over the runs of `members`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::run::Runs;
    /// use cactus_export::store::Reader;
    /// use cactus_export::thread::Threads;
    ///
    /// let data = b"\
    /// scope 0
    /// sequence s0 hg18 0 100 hg18.chr7.1000.500
    /// group g0 0
    /// end e0 -
    /// end e1 g0
    /// end e2 g0
    /// end e3 -
    /// link g0 e1 e2
    /// block b0 0 5 e0 e1
    /// block b1 0 5 e2 e3
    /// segment b0 s0 + 10
    /// segment b1 s0 + 30
    /// ";
    /// let graph = Reader::new(&data[..]).graph()?;
    /// let root = graph.scope_by_name("0").unwrap();
    /// let blocks = graph.scope(root).blocks().iter().copied();
    ///
    /// let threads = Threads::collect(&graph, blocks, "hg18").into_threads();
    /// let runs = Runs::new(&graph, threads[0].members()).collect::<Vec<_>>();
    ///
    /// assert_eq!(runs.len(), 1);
    /// assert_eq!(runs[0].len(), 2);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(graph: &'g Graph, members: &'t [Member]) -> Self {
        Self {
            graph,
            remaining: members,
        }
    }
}

impl<'t> Iterator for Runs<'_, 't> {
    type Item = &'t [Member];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() {
            return None;
        }

        let length = self
            .remaining
            .windows(2)
            .position(|pair| !continues(self.graph, &pair[0], &pair[1]))
            .map_or(self.remaining.len(), |i| i + 1);

        let (run, rest) = self.remaining.split_at(length);
        self.remaining = rest;

        Some(run)
    }
}
