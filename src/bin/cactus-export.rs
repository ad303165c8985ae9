//! A binary to export genome threads from an alignment graph dump.
//!
//! ```shell
//! cargo run --release --bin=cactus-export --features=binaries -- \
//!     --cactusDisk graph.txt.gz --flowerName 0 --outputFile hg18.bed \
//!     bed --species hg18
//! ```
//!
//! The `bed` subcommand writes one BED record per run of a single genome.
//! The `chain` subcommand writes one chain per run of a query genome that is
//! aligned to a target genome. Outputs ending in `.gz` are compressed.

use std::fs::File;
use std::io;
use std::io::BufRead;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use cactus_export::export;
use cactus_export::store::Reader;
use clap::Parser;
use clap::Subcommand;
use clap_verbosity_flag::Verbosity;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tracing::Level;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

/// The file extension of gzipped files.
const GZIP_EXTENSION: &str = "gz";

/// The path that stands for standard output.
const STDOUT: &str = "-";

////////////////////////////////////////////////////////////////////////////////////////
// Arguments
////////////////////////////////////////////////////////////////////////////////////////

/// Exports genome threads from an alignment graph as BED or chain records.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// The alignment graph dump (optionally gzipped).
    #[arg(long = "cactusDisk")]
    cactus_disk: PathBuf,

    /// The name of the scope to start from.
    #[arg(long = "flowerName")]
    flower_name: String,

    /// Where to write the records (`-` for standard output).
    #[arg(long = "outputFile")]
    output_file: PathBuf,

    /// The log level (overrides `-v` and `-q`).
    #[arg(long = "logLevel")]
    log_level: Option<Level>,

    /// The format to export.
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbose: Verbosity,
}

/// The export formats.
#[derive(Debug, Subcommand)]
enum Command {
    /// Exports every run of one genome as a BED record.
    Bed {
        /// The genome to export.
        #[arg(long)]
        species: String,

        /// The deepest scope to visit.
        #[arg(long = "maxDepth", default_value_t = export::bed::DEFAULT_DEPTH_LIMIT)]
        max_depth: usize,

        /// Visit every scope, ignoring `--maxDepth`.
        #[arg(long = "allDepths", conflicts_with = "max_depth")]
        all_depths: bool,

        /// Fail if the genome is not in the graph.
        #[arg(long = "requireGenome")]
        require_genome: bool,
    },

    /// Exports every run of a query genome aligned to a target genome as a
    /// chain.
    Chain {
        /// The query genome.
        #[arg(long)]
        query: String,

        /// The target genome.
        #[arg(long)]
        target: String,

        /// The deepest scope to visit (every scope if not set).
        #[arg(long = "maxDepth")]
        max_depth: Option<usize>,

        /// Fail if either genome is not in the graph.
        #[arg(long = "requireGenomes")]
        require_genomes: bool,

        /// The id of the first chain.
        #[arg(long = "firstId", default_value_t = 0)]
        first_id: usize,
    },
}

////////////////////////////////////////////////////////////////////////////////////////
// Files
////////////////////////////////////////////////////////////////////////////////////////

/// Returns whether `path` names a gzipped file.
fn is_gzipped(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == GZIP_EXTENSION)
}

/// Opens the graph dump at `path`.
fn open(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path)
        .with_context(|| format!("opening the graph dump at `{}`", path.display()))?;

    if is_gzipped(path) {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// A destination for records.
enum Output {
    /// Standard output.
    Stdout(BufWriter<io::StdoutLock<'static>>),

    /// A plain file.
    File(BufWriter<File>),

    /// A gzipped file.
    Gzip(GzEncoder<BufWriter<File>>),
}

impl Output {
    /// Creates the output at `path`.
    fn create(path: &Path) -> Result<Self> {
        if path == Path::new(STDOUT) {
            return Ok(Output::Stdout(BufWriter::new(io::stdout().lock())));
        }

        let file = File::create(path)
            .with_context(|| format!("creating the output at `{}`", path.display()))?;

        if is_gzipped(path) {
            Ok(Output::Gzip(GzEncoder::new(
                BufWriter::new(file),
                Compression::default(),
            )))
        } else {
            Ok(Output::File(BufWriter::new(file)))
        }
    }

    /// Flushes the output, writing the gzip trailer if there is one.
    fn finish(self) -> io::Result<()> {
        match self {
            Output::Stdout(mut writer) => writer.flush(),
            Output::File(mut writer) => writer.flush(),
            Output::Gzip(encoder) => encoder.finish()?.flush(),
        }
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout(writer) => writer.write(buf),
            Output::File(writer) => writer.write(buf),
            Output::Gzip(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout(writer) => writer.flush(),
            Output::File(writer) => writer.flush(),
            Output::Gzip(writer) => writer.flush(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Main
////////////////////////////////////////////////////////////////////////////////////////

fn main() -> Result<()> {
    let args = Args::parse();

    let level = args
        .log_level
        .map(LevelFilter::from_level)
        .unwrap_or_else(|| args.verbose.log_level_filter().as_trace());

    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(io::stderr)
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(io::stderr)
            .init(),
    };

    let graph = Reader::new(open(&args.cactus_disk)?)
        .graph()
        .with_context(|| format!("reading the graph dump at `{}`", args.cactus_disk.display()))?;

    let root = graph
        .scope_by_name(&args.flower_name)
        .with_context(|| format!("scope not found in graph: {}", args.flower_name))?;

    let mut output = Output::create(&args.output_file)?;

    let summary = match args.command {
        Command::Bed {
            species,
            max_depth,
            all_depths,
            require_genome,
        } => export::bed::Exporter::new(species)
            .with_depth_limit((!all_depths).then_some(max_depth))
            .with_required_genome(require_genome)
            .export(&graph, root, &mut output),
        Command::Chain {
            query,
            target,
            max_depth,
            require_genomes,
            first_id,
        } => export::chain::Exporter::new(query, target)
            .with_depth_limit(max_depth)
            .with_required_genomes(require_genomes)
            .with_first_id(first_id)
            .export(&graph, root, &mut output),
    }
    .context("exporting records")?;

    output.finish().context("finishing the output")?;

    info!("exported {summary}");

    Ok(())
}
