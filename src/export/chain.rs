//! Exporting a query genome against a target genome as chains.

use std::io::Write;

use omics::coordinate::position::Number;

use crate::export::Result;
use crate::export::Summary;
use crate::export::require;
use crate::format::chain::Builder;
use crate::format::chain::Section;
use crate::format::chain::data;
use crate::format::chain::header;
use crate::format::chain::header::Sequence;
use crate::graph::Graph;
use crate::graph::ScopeId;
use crate::projection::Projection;
use crate::projection::Side;
use crate::run::Runs;
use crate::thread::Member;
use crate::thread::Threads;
use crate::walk::walk;

/// The score given to every chain.
const SCORE: usize = 0;

/// An exporter of chains between a query and a target genome.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Exporter {
    /// The query genome.
    query: String,

    /// The target genome.
    target: String,

    /// The depth below which scopes are not visited.
    depth_limit: Option<usize>,

    /// Whether both genomes must be present in the graph.
    require_genomes: bool,

    /// The id of the first chain.
    first_id: usize,
}

impl Exporter {
    /// Creates an exporter of `query` against `target`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::export::chain::Exporter;
    ///
    /// let exporter = Exporter::new("hg18", "mm9").with_first_id(10);
    ///
    /// assert_eq!(exporter.query(), "hg18");
    /// assert_eq!(exporter.target(), "mm9");
    /// assert_eq!(exporter.depth_limit(), None);
    /// assert_eq!(exporter.first_id(), 10);
    /// ```
    pub fn new(query: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            target: target.into(),
            depth_limit: None,
            require_genomes: false,
            first_id: 0,
        }
    }

    /// Sets the depth below which scopes are not visited ([`None`] visits
    /// every scope).
    pub fn with_depth_limit(mut self, depth_limit: Option<usize>) -> Self {
        self.depth_limit = depth_limit;
        self
    }

    /// Sets whether both genomes must be present in the graph.
    pub fn with_required_genomes(mut self, require_genomes: bool) -> Self {
        self.require_genomes = require_genomes;
        self
    }

    /// Sets the id of the first chain.
    pub fn with_first_id(mut self, first_id: usize) -> Self {
        self.first_id = first_id;
        self
    }

    /// Gets the query genome.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Gets the target genome.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Gets the depth limit.
    pub fn depth_limit(&self) -> Option<usize> {
        self.depth_limit
    }

    /// Gets the id of the first chain.
    pub fn first_id(&self) -> usize {
        self.first_id
    }

    /// Writes one chain for every paired run beneath `root`, each followed by
    /// a blank line.
    ///
    /// Chain ids increase by one per chain written, across all scopes.
    ///
    /// # Examples
    ///
    /// ```
    /// use cactus_export::export::chain::Exporter;
    /// use cactus_export::store::Reader;
    ///
    /// let data = b"\
    /// scope 0
    /// sequence s0 hg18 0 100 hg18.chr1.1000.200
    /// sequence s1 mm9 0 100 mm9.chr2.500.50
    /// end e0 -
    /// end e1 -
    /// block b0 0 5 e0 e1
    /// segment b0 s0 + 10
    /// segment b0 s1 + 40
    /// ";
    /// let graph = Reader::new(&data[..]).graph()?;
    /// let root = graph.scope_by_name("0").unwrap();
    ///
    /// let mut output = Vec::new();
    /// Exporter::new("hg18", "mm9").export(&graph, root, &mut output)?;
    ///
    /// assert_eq!(
    ///     String::from_utf8(output)?,
    ///     "chain 0 chr2 500 + 90 95 chr1 1000 + 210 215 0\n5\n\n"
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
        if self.require_genomes {
            require(graph, &self.query)?;
            require(graph, &self.target)?;
        }

        let mut emitter = Emitter::new(writer, self.first_id);

        walk(graph, root, self.depth_limit, &mut |scope, depth| -> Result<()> {
            let before = emitter.summary.records;
            self.export_scope(graph, scope, &mut emitter)?;

            tracing::debug!(
                scope = graph.scope(scope).name(),
                depth,
                records = emitter.summary.records - before,
                "exporting scope"
            );

            emitter.summary.scopes += 1;
            Ok(())
        })?;

        Ok(emitter.summary)
    }

    /// Emits the chains of one scope: one per run of every chain, then one
    /// per segment of every block outside a chain.
    fn export_scope<W: Write>(
        &self,
        graph: &Graph,
        scope: ScopeId,
        emitter: &mut Emitter<'_, W>,
    ) -> Result<()> {
        let scope = graph.scope(scope);

        for chain in scope.chains().iter().map(|chain| graph.chain(*chain)) {
            let threads = Threads::collect_paired(
                graph,
                chain.blocks().iter().copied(),
                &self.query,
                &self.target,
            );
            emitter.summary.skipped_members += threads.skipped();

            for thread in threads.into_threads() {
                for run in Runs::new(graph, thread.members()) {
                    emitter.emit(graph, run)?;
                }
            }
        }

        for block in scope
            .blocks()
            .iter()
            .filter(|block| graph.block(**block).chain().is_none())
        {
            let threads = Threads::collect_paired(graph, [*block], &self.query, &self.target);
            emitter.summary.skipped_members += threads.skipped();

            for thread in threads.into_threads() {
                for member in thread.members() {
                    emitter.emit(graph, std::slice::from_ref(member))?;
                }
            }
        }

        Ok(())
    }
}

/// Writes chains and hands out their ids.
#[derive(Debug)]
struct Emitter<'w, W> {
    /// The destination.
    writer: &'w mut W,

    /// The id of the next chain.
    next_id: usize,

    /// The running counts.
    summary: Summary,
}

impl<'w, W: Write> Emitter<'w, W> {
    /// Creates an emitter whose first chain has id `first_id`.
    fn new(writer: &'w mut W, first_id: usize) -> Self {
        Self {
            writer,
            next_id: first_id,
            summary: Summary::default(),
        }
    }

    /// Projects a run and writes it as a chain.
    ///
    /// Runs that cannot be projected onto their chromosomes, or whose blocks
    /// do not add up to their spans, are skipped with a warning.
    fn emit(&mut self, graph: &Graph, run: &[Member]) -> Result<()> {
        let projected = Projection::of_run(graph, run).and_then(|projection| {
            let projection = projection.normalized();
            let target = projection.target().bounds("target")?;
            let query = projection.query().bounds("query")?;
            Ok((projection, target, query))
        });

        let (projection, target, query) = match projected {
            Ok(projected) => projected,
            Err(err) => {
                self.skip(err);
                return Ok(());
            }
        };

        let section = match section(&projection, target, query, self.next_id) {
            Ok(section) => section,
            Err(err) => {
                self.skip(err);
                return Ok(());
            }
        };

        write!(self.writer, "{section}\n\n")?;

        self.next_id += 1;
        self.summary.records += 1;

        Ok(())
    }

    /// Records a run that was left out.
    fn skip(&mut self, err: impl std::fmt::Display) {
        tracing::warn!("skipping run: {err}");
        self.summary.skipped_runs += 1;
    }
}

/// The chromosome size, start, and end of one side of a chain.
type Bounds = (Number, Number, Number);

/// Creates a chain sequence.
fn sequence(side: &Side, (size, start, end): Bounds) -> Result<Sequence> {
    Ok(Sequence::try_new(
        side.frame().chromosome(),
        size,
        side.strand(),
        start,
        end,
    )?)
}

/// Forms the chain of a projection.
fn section(projection: &Projection, target: Bounds, query: Bounds, id: usize) -> Result<Section> {
    let target = sequence(projection.target(), target)?;
    let query = sequence(projection.query(), query)?;

    let header = header::Record::try_new(SCORE, target, query, id)?;
    let mut builder = Builder::default().header(header)?;
    let sizes = projection.blocks();

    for (size, gap) in sizes.iter().zip(projection.gaps()) {
        builder = builder.push_data(data::Record::gapped(
            size.unsigned_abs(),
            gap.target().unsigned_abs(),
            gap.query().unsigned_abs(),
        ));
    }

    Ok(builder
        .push_data(data::Record::terminating(sizes.last().unsigned_abs()))
        .try_build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Reader;

    /// Two linked blocks in chain `c0`, of length 5 and 3, with the query on
    /// the positive strand and the target on the given strand.
    fn chained(target_strand: char) -> std::result::Result<Graph, Box<dyn std::error::Error>> {
        let (b0, b1) = match target_strand {
            '+' => (40, 47),
            _ => (60, 50),
        };

        let data = format!(
            "\
scope 0
sequence s0 hg18 0 100 hg18.chr1.1000.200
sequence s1 mm9 0 100 mm9.chr2.500.50
group g0 0
end e0 -
end e1 g0
end e2 g0
end e3 -
link g0 e1 e2
block b0 0 5 e0 e1
block b1 0 3 e2 e3
segment b0 s0 + 10
segment b1 s0 + 30
segment b0 s1 {target_strand} {b0}
segment b1 s1 {target_strand} {b1}
chain c0 0 b0 b1
"
        );

        Ok(Reader::new(data.as_bytes()).graph()?)
    }

    /// A root and a nested scope, each with one block shared by both genomes
    /// and one block holding only the query.
    fn nested(target_header: &str) -> std::result::Result<Graph, Box<dyn std::error::Error>> {
        let data = format!(
            "\
scope 0
scope 1
sequence s0 hg18 0 100 hg18.chr1.1000.0
sequence s1 mm9 0 100 {target_header}
group g0 0 1
end e0 -
end e1 -
end e2 -
end e3 -
end e4 -
end e5 -
block b0 0 5 e0 e1
block b1 1 5 e2 e3
block b2 1 5 e4 e5
segment b0 s0 + 10
segment b0 s1 + 20
segment b1 s0 + 50
segment b1 s1 + 60
segment b2 s0 + 80
"
        );

        Ok(Reader::new(data.as_bytes()).graph()?)
    }

    /// Three blocks of 5 in chain `c0` (the first two and the last two
    /// linked) and a block outside any chain, holding the query at `query`
    /// and the targets at `(sequence, start)`.
    fn three_blocks(
        query: [i64; 4],
        targets: [(&str, i64); 4],
    ) -> std::result::Result<Graph, Box<dyn std::error::Error>> {
        let mut data = String::from(
            "\
scope 0
sequence s0 hg18 0 100 hg18.chr1.1000.0
sequence s1 mm9 0 100 mm9.chrA.1000.0
sequence s2 mm9 0 100 mm9.chrB.1000.0
group g0 0
group g1 0
end e0 -
end e1 g0
end e2 g0
end e3 g1
end e4 g1
end e5 -
end e6 -
end e7 -
link g0 e1 e2
link g1 e3 e4
block b0 0 5 e0 e1
block b1 0 5 e2 e3
block b2 0 5 e4 e5
block b3 0 5 e6 e7
chain c0 0 b0 b1 b2
",
        );

        for (i, (start, (sequence, target))) in query.into_iter().zip(targets).enumerate() {
            data.push_str(&format!("segment b{i} s0 + {start}\n"));
            data.push_str(&format!("segment b{i} {sequence} + {target}\n"));
        }

        Ok(Reader::new(data.as_bytes()).graph()?)
    }

    fn export(
        graph: &Graph,
        exporter: &Exporter,
    ) -> std::result::Result<(String, Summary), Box<dyn std::error::Error>> {
        let root = graph.scope_by_name("0").unwrap();
        let mut output = Vec::new();
        let summary = exporter.export(graph, root, &mut output)?;
        Ok((String::from_utf8(output)?, summary))
    }

    #[test]
    fn it_exports_a_positive_chain() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let graph = chained('+')?;
        let (output, summary) = export(&graph, &Exporter::new("hg18", "mm9"))?;

        assert_eq!(
            output,
            "chain 0 chr2 500 + 90 100 chr1 1000 + 210 233 0\n5 2 15\n3\n\n"
        );
        assert_eq!(summary.records(), 1);

        Ok(())
    }

    #[test]
    fn negative_targets_are_reversed() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let graph = chained('-')?;
        let (output, _) = export(&graph, &Exporter::new("hg18", "mm9"))?;

        assert_eq!(
            output,
            "chain 0 chr2 500 + 100 115 chr1 1000 - 767 790 0\n3 7 15\n5\n\n"
        );

        Ok(())
    }

    #[test]
    fn reversed_chains_keep_gaps_between_their_blocks()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let data = "\
scope 0
sequence s0 hg18 0 100 hg18.chr1.1000.0
sequence s1 mm9 0 100 mm9.chr2.1000.0
group g0 0
group g1 0
group g2 0
end e0 -
end e1 g0
end e2 g0
end e3 g1
end e4 g1
end e5 g2
end e6 g2
end e7 -
link g0 e1 e2
link g1 e3 e4
link g2 e5 e6
block b0 0 2 e0 e1
block b1 0 3 e2 e3
block b2 0 4 e4 e5
block b3 0 5 e6 e7
segment b0 s0 + 10
segment b1 s0 + 13
segment b2 s0 + 20
segment b3 s0 + 30
segment b0 s1 - 93
segment b1 s1 - 88
segment b2 s1 - 81
segment b3 s1 - 71
chain c0 0 b0 b1 b2 b3
";
        let graph = Reader::new(data.as_bytes()).graph()?;
        let (output, summary) = export(&graph, &Exporter::new("hg18", "mm9"))?;

        // Query gaps 1, 4, 6 and target gaps 2, 3, 5 come out last to first.
        assert_eq!(
            output,
            "chain 0 chr2 1000 + 71 95 chr1 1000 - 965 990 0\n5 5 6\n4 3 4\n3 2 1\n2\n\n"
        );
        assert_eq!(summary.records(), 1);

        Ok(())
    }

    #[test]
    fn ids_increase_across_scopes() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let graph = nested("mm9.chr2.1000.0")?;
        let (output, summary) = export(&graph, &Exporter::new("hg18", "mm9").with_first_id(7))?;

        let ids = output
            .lines()
            .filter(|line| line.starts_with("chain"))
            .map(|line| line.rsplit(' ').next().unwrap())
            .collect::<Vec<_>>();

        assert_eq!(ids, vec!["7", "8"]);
        assert_eq!(summary.records(), 2);
        assert_eq!(summary.scopes(), 2);

        Ok(())
    }

    #[test]
    fn segments_without_a_target_are_counted()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let graph = nested("mm9.chr2.1000.0")?;
        let (_, summary) = export(&graph, &Exporter::new("hg18", "mm9"))?;

        assert_eq!(summary.skipped_members(), 1);

        let (_, summary) = export(
            &graph,
            &Exporter::new("hg18", "mm9").with_depth_limit(Some(0)),
        )?;

        assert_eq!(summary.records(), 1);
        assert_eq!(summary.skipped_members(), 0);

        Ok(())
    }

    #[test]
    fn runs_off_the_chromosome_are_skipped()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        // A chromosome of size 50 cannot hold a sequence at offset 50.
        let graph = nested("mm9.chr2.50.50")?;
        let (output, summary) = export(&graph, &Exporter::new("hg18", "mm9"))?;

        assert_eq!(output, "");
        assert_eq!(summary.records(), 0);
        assert_eq!(summary.skipped_runs(), 2);

        Ok(())
    }

    #[test]
    fn targets_out_of_order_start_a_new_chain()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let graph = three_blocks(
            [10, 20, 30, 80],
            [("s1", 40), ("s1", 60), ("s1", 50), ("s1", 70)],
        )?;
        let (output, summary) = export(&graph, &Exporter::new("hg18", "mm9"))?;

        assert_eq!(
            output,
            "chain 0 chrA 1000 + 40 65 chr1 1000 + 10 25 0\n5 15 5\n5\n\n\
             chain 1 chrA 1000 + 50 55 chr1 1000 + 30 35 0\n5\n\n\
             chain 2 chrA 1000 + 70 75 chr1 1000 + 80 85 0\n5\n\n"
        );
        assert_eq!(summary.records(), 3);
        assert_eq!(summary.skipped_runs(), 0);

        Ok(())
    }

    #[test]
    fn target_sequence_changes_start_a_new_chain()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let graph = three_blocks(
            [10, 20, 30, 80],
            [("s1", 40), ("s2", 50), ("s2", 60), ("s1", 70)],
        )?;
        let (output, _) = export(&graph, &Exporter::new("hg18", "mm9"))?;

        assert_eq!(
            output,
            "chain 0 chrA 1000 + 40 45 chr1 1000 + 10 15 0\n5\n\n\
             chain 1 chrB 1000 + 50 65 chr1 1000 + 20 35 0\n5 5 5\n5\n\n\
             chain 2 chrA 1000 + 70 75 chr1 1000 + 80 85 0\n5\n\n"
        );

        Ok(())
    }

    #[test]
    fn unbuildable_chains_are_skipped_and_the_walk_goes_on()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        // The query blocks overlap, so their gaps cannot add up to the span.
        let graph = three_blocks(
            [10, 12, 30, 80],
            [("s1", 20), ("s1", 30), ("s1", 40), ("s1", 70)],
        )?;
        let (output, summary) = export(&graph, &Exporter::new("hg18", "mm9"))?;

        assert_eq!(output, "chain 0 chrA 1000 + 70 75 chr1 1000 + 80 85 0\n5\n\n");
        assert_eq!(summary.records(), 1);
        assert_eq!(summary.skipped_runs(), 1);

        Ok(())
    }

    #[test]
    fn it_fails_when_required_genomes_are_missing()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let graph = chained('+')?;

        let (output, _) = export(&graph, &Exporter::new("hg18", "panTro2"))?;
        assert_eq!(output, "");

        let exporter = Exporter::new("hg18", "panTro2").with_required_genomes(true);
        let err = export(&graph, &exporter).unwrap_err();
        assert_eq!(err.to_string(), "genome not found in graph: panTro2");

        Ok(())
    }
}
