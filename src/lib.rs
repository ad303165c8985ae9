//! `cactus_export` is a crate for exporting the alignments held in a nested
//! alignment graph as BED and chain records.
//!
//! The graph is a tree of scopes. Each scope owns blocks (ungapped alignment
//! columns), chains of blocks, and groups of block ends, some of which nest a
//! child scope. Every genome that takes part in a block does so through a
//! segment.
//!
//! Exporting comes down to four steps, each of which lives in its own module:
//!
//! - [`thread`] gathers the segments of a genome and orders them along their
//!   sequences.
//! - [`run`] splits those threads wherever two consecutive segments are not
//!   joined by a [link](crate::link).
//! - [`projection`] places every run on its chromosome, using the conventions
//!   encoded in sequence [headers](crate::header).
//! - [`export`] walks the scopes (see [`walk`]) and writes one
//!   [record](crate::format) per run.
//!
//! ## Reading a graph
//!
//! Graphs are read from a line-oriented dump with a [`store::Reader`] (or
//! built directly with a [`graph::Builder`]).
//!
//! ## Exporting
//!
//! Below is a representative example of reading a graph in which one genome
//! has two linked segments and writing them out as a single BED record and
//! as a single chain against a second genome.
//!
//! ```
//! use cactus_export::export;
//! use cactus_export::store::Reader;
//!
//! let data = b"\
//! scope 0
//! sequence s0 hg18 0 1000 hg18.chr7.1000.500
//! sequence s1 mm9 0 1000 mm9.chr2.5000.0
//! group g0 0
//! end e0 -
//! end e1 g0
//! end e2 g0
//! end e3 -
//! link g0 e1 e2
//! block b0 0 5 e0 e1
//! block b1 0 5 e2 e3
//! segment b0 s0 + 10
//! segment b1 s0 + 30
//! segment b0 s1 + 100
//! segment b1 s1 + 110
//! chain 0 0 b0 b1
//! ";
//!
//! let graph = Reader::new(&data[..]).graph()?;
//! let root = graph.scope_by_name("0").unwrap();
//!
//! let mut bed = Vec::new();
//! export::bed::Exporter::new("hg18").export(&graph, root, &mut bed)?;
//! assert_eq!(
//!     String::from_utf8(bed)?,
//!     "chr7 509 534 0.0 0 . 509 534 0 2 5,5, 0,20,\n"
//! );
//!
//! let mut chain = Vec::new();
//! export::chain::Exporter::new("hg18", "mm9").export(&graph, root, &mut chain)?;
//! assert_eq!(
//!     String::from_utf8(chain)?,
//!     "chain 0 chr2 5000 + 100 115 chr7 1000 + 510 535 0\n5 5 15\n5\n\n"
//! );
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod export;
pub mod format;
pub mod graph;
pub mod header;
pub mod link;
pub mod projection;
pub mod run;
pub mod store;
pub mod thread;
pub mod walk;

pub use graph::Graph;
