//! Exporters that walk a graph and write records.
//!
//! Both exporters share the same shape: walk the scopes beneath a root, build
//! threads for every chain (and for every block outside a chain), split the
//! threads into runs, and write one record per run.

use std::io;

use crate::format::chain::BuildError;
use crate::format::chain::header;
use crate::graph::Graph;

pub mod bed;
pub mod chain;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to exporting.
#[derive(Debug)]
pub enum Error {
    /// An I/O error while writing records.
    Io(io::Error),

    /// A genome asserted to be present is not in the graph.
    MissingGenome(String),

    /// A chain sequence could not be created.
    Sequence(header::sequence::Error),

    /// A chain header could not be created.
    Header(header::Error),

    /// A chain could not be built.
    Section(BuildError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::MissingGenome(genome) => write!(f, "genome not found in graph: {genome}"),
            Error::Sequence(err) => write!(f, "sequence error: {err}"),
            Error::Header(err) => write!(f, "header error: {err}"),
            Error::Section(err) => write!(f, "chain error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<header::sequence::Error> for Error {
    fn from(err: header::sequence::Error) -> Self {
        Error::Sequence(err)
    }
}

impl From<header::Error> for Error {
    fn from(err: header::Error) -> Self {
        Error::Header(err)
    }
}

impl From<BuildError> for Error {
    fn from(err: BuildError) -> Self {
        Error::Section(err)
    }
}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// Fails if no sequence of `genome` exists in the graph.
fn require(graph: &Graph, genome: &str) -> Result<()> {
    if graph.contains_genome(genome) {
        Ok(())
    } else {
        Err(Error::MissingGenome(genome.to_string()))
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Summary
////////////////////////////////////////////////////////////////////////////////////////

/// Counts gathered over one export.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    /// The number of records written.
    records: usize,

    /// The number of segments left out for lacking a target cap.
    skipped_members: usize,

    /// The number of runs left out because they could not be projected.
    skipped_runs: usize,

    /// The number of scopes visited.
    scopes: usize,
}

impl Summary {
    /// Gets the number of records written.
    pub fn records(&self) -> usize {
        self.records
    }

    /// Gets the number of segments left out for lacking a target cap.
    pub fn skipped_members(&self) -> usize {
        self.skipped_members
    }

    /// Gets the number of runs left out because they could not be projected.
    pub fn skipped_runs(&self) -> usize {
        self.skipped_runs
    }

    /// Gets the number of scopes visited.
    pub fn scopes(&self) -> usize {
        self.scopes
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} records from {} scopes ({} segments and {} runs skipped)",
            self.records, self.scopes, self.skipped_members, self.skipped_runs
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_displays_a_summary() {
        let summary = Summary {
            records: 3,
            skipped_members: 1,
            skipped_runs: 0,
            scopes: 2,
        };

        assert_eq!(
            summary.to_string(),
            "3 records from 2 scopes (1 segments and 0 runs skipped)"
        );
    }

    #[test]
    fn it_requires_present_genomes() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let graph = crate::graph::Builder::default()
            .sequence("s0", "hg18", 0, 10, "hg18.chr1")?
            .try_build()?;

        assert!(require(&graph, "hg18").is_ok());
        assert_eq!(
            require(&graph, "mm9").unwrap_err().to_string(),
            "genome not found in graph: mm9"
        );

        Ok(())
    }
}
