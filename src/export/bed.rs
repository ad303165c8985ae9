//! Exporting the threads of one genome as BED records.

use std::io::Write;

use nonempty::NonEmpty;

use crate::export::Result;
use crate::export::Summary;
use crate::export::require;
use crate::format::bed::Block;
use crate::format::bed::Name;
use crate::format::bed::Record;
use crate::graph::Graph;
use crate::graph::ScopeId;
use crate::projection::Convention;
use crate::projection::Frame;
use crate::run::Runs;
use crate::thread::Member;
use crate::thread::Threads;
use crate::walk::walk;

/// The default depth below which scopes are not visited.
pub const DEFAULT_DEPTH_LIMIT: usize = 5;

/// Genomes whose name contains this marker must be present in the graph.
const REFERENCE_MARKER: &str = "reference";

/// An exporter of BED records for one genome.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Exporter {
    /// The genome to export.
    genome: String,

    /// The depth below which scopes are not visited.
    depth_limit: Option<usize>,

    /// Whether the genome must be present in the graph.
    require_genome: bool,
}

impl Exporter {
    /// Creates an exporter for `genome`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::export::bed::Exporter;
    ///
    /// let exporter = Exporter::new("hg18");
    /// assert_eq!(exporter.genome(), "hg18");
    /// assert_eq!(exporter.depth_limit(), Some(5));
    ///
    /// let exporter = exporter.with_depth_limit(None);
    /// assert_eq!(exporter.depth_limit(), None);
    /// ```
    pub fn new(genome: impl Into<String>) -> Self {
        Self {
            genome: genome.into(),
            depth_limit: Some(DEFAULT_DEPTH_LIMIT),
            require_genome: false,
        }
    }

    /// Sets the depth below which scopes are not visited ([`None`] visits
    /// every scope).
    pub fn with_depth_limit(mut self, depth_limit: Option<usize>) -> Self {
        self.depth_limit = depth_limit;
        self
    }

    /// Sets whether the genome must be present in the graph.
    pub fn with_required_genome(mut self, require_genome: bool) -> Self {
        self.require_genome = require_genome;
        self
    }

    /// Gets the genome.
    pub fn genome(&self) -> &str {
        &self.genome
    }

    /// Gets the depth limit.
    pub fn depth_limit(&self) -> Option<usize> {
        self.depth_limit
    }

    /// Returns whether the genome must be present in the graph.
    ///
    /// This is always the case for reference genomes.
    pub fn requires_genome(&self) -> bool {
        self.require_genome || self.genome.contains(REFERENCE_MARKER)
    }

    /// Writes one record per line for every scope beneath `root`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::export::bed::Exporter;
    /// use cactus_export::store::Reader;
    ///
    /// let data = b"\
    /// scope 0
    /// sequence s0 hg18 0 1000 hg18.chr7.1000.500
    /// end e0 -
    /// end e1 -
    /// block b0 0 5 e0 e1
    /// segment b0 s0 + 10
    /// ";
    /// let graph = Reader::new(&data[..]).graph()?;
    /// let root = graph.scope_by_name("0").unwrap();
    ///
    /// let mut output = Vec::new();
    /// let summary = Exporter::new("hg18").export(&graph, root, &mut output)?;
    ///
    /// assert_eq!(summary.records(), 1);
    /// assert_eq!(
    ///     String::from_utf8(output)?,
    ///     "chr7 509 514 NA.0 0 . 509 514 0 1 5, 0,\n"
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn export<W: Write>(
        &self,
        graph: &Graph,
        root: ScopeId,
        writer: &mut W,
    ) -> Result<Summary> {
        if self.requires_genome() {
            require(graph, &self.genome)?;
        }

        let mut summary = Summary::default();

        walk(graph, root, self.depth_limit, &mut |scope, depth| -> Result<()> {
            let records = self.records(graph, scope, depth);

            tracing::debug!(
                scope = graph.scope(scope).name(),
                depth,
                records = records.len(),
                "exporting scope"
            );

            for record in &records {
                writeln!(writer, "{record}")?;
            }

            summary.records += records.len();
            summary.scopes += 1;

            Ok(())
        })?;

        Ok(summary)
    }

    /// Builds the records of one scope at `depth`: one per run of every
    /// chain, then one per segment of every block outside a chain.
    pub fn records(&self, graph: &Graph, scope: ScopeId, depth: usize) -> Vec<Record> {
        let mut records = Vec::new();
        let scope = graph.scope(scope);

        for chain in scope.chains().iter().map(|chain| graph.chain(*chain)) {
            let threads = Threads::collect(graph, chain.blocks().iter().copied(), &self.genome);

            for thread in threads.into_threads() {
                let frame = Frame::of_sequence(graph, thread.sequence());

                records.extend(Runs::new(graph, thread.members()).filter_map(|run| {
                    chained(graph, &frame, Name::chained(chain.name(), depth), run)
                }));
            }
        }

        for block in scope
            .blocks()
            .iter()
            .filter(|block| graph.block(**block).chain().is_none())
        {
            let threads = Threads::collect(graph, [*block], &self.genome);

            for thread in threads.into_threads() {
                let frame = Frame::of_sequence(graph, thread.sequence());

                records.extend(
                    thread
                        .members()
                        .iter()
                        .map(|member| singleton(graph, &frame, Name::unchained(depth), member)),
                );
            }
        }

        records
    }
}

/// Builds the record of a run.
///
/// Block starts are relative to the first block. Returns [`None`] for an
/// empty run.
fn chained(graph: &Graph, frame: &Frame, name: Name, run: &[Member]) -> Option<Record> {
    let (first, rest) = run.split_first()?;
    let last = rest.last().unwrap_or(first);

    let origin = first.segment().start(graph);
    let block = |member: &Member| {
        let segment = member.segment();
        Block::new(segment.length(graph), segment.start(graph) - origin)
    };

    let mut blocks = NonEmpty::new(block(first));
    for member in rest {
        blocks.push(block(member));
    }

    let end = last.segment().start(graph) + last.segment().length(graph);

    Some(Record::new(
        frame.chromosome(),
        frame.project(origin, Convention::OneBased),
        frame.project(end, Convention::OneBased),
        name,
        blocks,
    ))
}

/// Builds the record of a lone segment from its caps.
fn singleton(graph: &Graph, frame: &Frame, name: Name, member: &Member) -> Record {
    let segment = member.segment();
    let start = segment.cap5(graph).coordinate(graph);
    let end = segment.cap3(graph).coordinate(graph);

    Record::new(
        frame.chromosome(),
        frame.project(start, Convention::OneBased),
        frame.project(end, Convention::ZeroBased),
        name,
        NonEmpty::new(Block::new(segment.length(graph), 0)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Reader;

    /// Two segments of `hg18` at 10 and 30 in blocks `b0` and `b1`.
    fn graph(
        linked: bool,
        chained: bool,
        header: &str,
    ) -> std::result::Result<Graph, Box<dyn std::error::Error>> {
        let mut data = format!(
            "\
scope 0
sequence s0 hg18 0 1000 {header}
sequence s1 mm9 0 1000 mm9.chr2.1000.0
group g0 0
end e0 -
end e1 g0
end e2 g0
end e3 -
block b0 0 5 e0 e1
block b1 0 5 e2 e3
segment b0 s0 + 10
segment b1 s0 + 30
segment b0 s1 + 70
segment b1 s1 + 80
"
        );

        if linked {
            data.push_str("link g0 e1 e2\n");
        }

        if chained {
            data.push_str("chain 0 0 b0 b1\n");
        }

        Ok(Reader::new(data.as_bytes()).graph()?)
    }

    fn export(
        graph: &Graph,
        exporter: &Exporter,
    ) -> std::result::Result<String, Box<dyn std::error::Error>> {
        let root = graph.scope_by_name("0").unwrap();
        let mut output = Vec::new();
        exporter.export(graph, root, &mut output)?;
        Ok(String::from_utf8(output)?)
    }

    #[test]
    fn linked_segments_form_one_record() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let graph = graph(true, true, "hg18.chr7.1000.500")?;

        assert_eq!(
            export(&graph, &Exporter::new("hg18"))?,
            "chr7 509 534 0.0 0 . 509 534 0 2 5,5, 0,20,\n"
        );

        Ok(())
    }

    #[test]
    fn unlinked_segments_form_one_record_each()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let graph = graph(false, true, "hg18.chr7.1000.500")?;

        assert_eq!(
            export(&graph, &Exporter::new("hg18"))?,
            "chr7 509 514 0.0 0 . 509 514 0 1 5, 0,\n\
             chr7 529 534 0.0 0 . 529 534 0 1 5, 0,\n"
        );

        Ok(())
    }

    #[test]
    fn singletons_match_one_block_runs() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let exporter = Exporter::new("hg18");
        let chained = export(&graph(false, true, "hg18.chr7.1000.500")?, &exporter)?;
        let unchained = export(&graph(false, false, "hg18.chr7.1000.500")?, &exporter)?;

        assert_eq!(chained.replace(" 0.0 ", " NA.0 "), unchained);

        Ok(())
    }

    #[test]
    fn headers_without_a_chromosome_give_an_empty_name()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let graph = graph(false, false, "ctgOnly")?;

        assert_eq!(
            export(&graph, &Exporter::new("hg18"))?,
            " 9 14 NA.0 0 . 9 14 0 1 5, 0,\n 29 34 NA.0 0 . 29 34 0 1 5, 0,\n"
        );

        Ok(())
    }

    #[test]
    fn negative_segments_are_canonicalized()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let data = b"\
scope 0
sequence s0 hg18 0 1000 hg18.chr7.1000.500
end e0 -
end e1 -
block b0 0 5 e0 e1
segment b0 s0 - 10
";
        let graph = Reader::new(&data[..]).graph()?;

        assert_eq!(
            export(&graph, &Exporter::new("hg18"))?,
            "chr7 509 514 NA.0 0 . 509 514 0 1 5, 0,\n"
        );

        Ok(())
    }

    #[test]
    fn depth_limits_bound_the_walk() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let data = b"\
scope 0
scope 1
sequence s0 hg18 0 1000 hg18.chr7.1000.0
group g0 0 1
end e0 -
end e1 -
end e2 -
end e3 -
block b0 0 5 e0 e1
block b1 1 5 e2 e3
segment b0 s0 + 10
segment b1 s0 + 20
";
        let graph = Reader::new(&data[..]).graph()?;

        assert_eq!(
            export(&graph, &Exporter::new("hg18").with_depth_limit(Some(0)))?,
            "chr7 9 14 NA.0 0 . 9 14 0 1 5, 0,\n"
        );

        assert_eq!(
            export(&graph, &Exporter::new("hg18"))?,
            "chr7 9 14 NA.0 0 . 9 14 0 1 5, 0,\nchr7 19 24 NA.1 0 . 19 24 0 1 5, 0,\n"
        );

        Ok(())
    }

    #[test]
    fn it_fails_when_a_required_genome_is_missing()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let graph = graph(true, true, "hg18.chr7.1000.500")?;

        assert_eq!(export(&graph, &Exporter::new("panTro2"))?, "");

        let exporter = Exporter::new("panTro2").with_required_genome(true);
        let err = export(&graph, &exporter).unwrap_err();
        assert_eq!(err.to_string(), "genome not found in graph: panTro2");

        let err = export(&graph, &Exporter::new("reference")).unwrap_err();
        assert_eq!(err.to_string(), "genome not found in graph: reference");

        Ok(())
    }

    #[test]
    fn it_summarizes_the_export() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let graph = graph(false, true, "hg18.chr7.1000.500")?;
        let root = graph.scope_by_name("0").unwrap();

        let summary = Exporter::new("hg18").export(&graph, root, &mut std::io::sink())?;
        assert_eq!(summary.records(), 2);
        assert_eq!(summary.scopes(), 1);

        Ok(())
    }
}
